//! Issuer and verifier options.

use crate::algorithms::Algorithm;
use crate::error::{TokenError, TokenResult};
use chrono::Duration;

/// Lifetime in seconds given to tokens that carry no `exp`
pub const DEFAULT_LIFETIME_SECS: i64 = 3600;

/// Token issuance options.
#[derive(Debug, Clone)]
pub struct IssueOptions {
    /// Signature algorithm written to the header.
    pub algorithm: Algorithm,
    /// Key identifier written to the header.
    pub key_id: Option<String>,
    /// Added to `iat` when the caller supplied no `exp`.
    pub lifetime: Duration,
}

impl IssueOptions {
    /// Options for `algorithm` with no key id and a one hour lifetime.
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            key_id: None,
            lifetime: Duration::seconds(DEFAULT_LIFETIME_SECS),
        }
    }

    /// Set the header key id.
    #[must_use]
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Set the default token lifetime.
    #[must_use]
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub(crate) fn validate(&self) -> TokenResult<()> {
        // timestamps are whole seconds
        if self.lifetime.num_seconds() < 1 {
            return Err(TokenError::InvalidOptions(format!(
                "token lifetime must be at least one second, got {}ms",
                self.lifetime.num_milliseconds()
            )));
        }
        Ok(())
    }
}

/// Token verification options.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Algorithms a token header may declare.
    pub allowed_algorithms: Vec<Algorithm>,
    /// Clock skew tolerated on `iat`, `nbf` and `exp`.
    pub leeway: Duration,
    /// Validate not-before.
    pub validate_nbf: bool,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            allowed_algorithms: Algorithm::ALL.to_vec(),
            leeway: Duration::zero(),
            validate_nbf: true,
        }
    }
}

impl VerifyOptions {
    /// Accept only tokens signed with `algorithm`.
    #[must_use]
    pub fn pinned(algorithm: Algorithm) -> Self {
        Self::default().with_allowed_algorithms([algorithm])
    }

    /// Set the allowed algorithms.
    #[must_use]
    pub fn with_allowed_algorithms(
        mut self,
        algorithms: impl IntoIterator<Item = Algorithm>,
    ) -> Self {
        self.allowed_algorithms = algorithms.into_iter().collect();
        self
    }

    /// Set the time leeway for validation.
    #[must_use]
    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Set whether to validate not-before.
    #[must_use]
    pub fn validate_not_before(mut self, validate: bool) -> Self {
        self.validate_nbf = validate;
        self
    }

    pub(crate) fn leeway_seconds(&self) -> TokenResult<i64> {
        if self.leeway < Duration::zero() {
            return Err(TokenError::InvalidOptions(format!(
                "leeway must not be negative, got {}s",
                self.leeway.num_seconds()
            )));
        }
        Ok(self.leeway.num_seconds())
    }

    pub(crate) fn validate(&self) -> TokenResult<()> {
        if self.allowed_algorithms.is_empty() {
            return Err(TokenError::InvalidOptions(
                "at least one algorithm must be allowed".to_string(),
            ));
        }
        self.leeway_seconds().map(drop)
    }
}
