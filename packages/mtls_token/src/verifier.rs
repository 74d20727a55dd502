//! Verification pipeline for certificate-bound tokens
//!
//! ```text
//! Received -> HeaderParsed -> AlgorithmResolved -> ClaimsParsed
//!          -> SignatureChecked -> TemporalChecked -> PoPChecked -> Accepted
//! ```
//!
//! Any stage may reject; the first failure is returned and nothing after it
//! runs. Structure is checked before the signature, and the signature before
//! any claim content is trusted.

use crate::channel::ChannelState;
use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::error::TokenResult;
use crate::keys::VerifyingKey;
use crate::options::VerifyOptions;
use crate::token::Token;
use std::fmt;

/// Last stage a token reached in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerificationStage {
    /// Compact string received
    Received,
    /// Header decoded
    HeaderParsed,
    /// `alg` resolved to an allowed method
    AlgorithmResolved,
    /// Claims decoded
    ClaimsParsed,
    /// Signature verified
    SignatureChecked,
    /// `iat`, `nbf` and `exp` accepted
    TemporalChecked,
    /// Certificate binding matched the live channel
    PoPChecked,
    /// Token accepted
    Accepted,
}

impl VerificationStage {
    /// Stage name used in log events
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStage::Received => "received",
            VerificationStage::HeaderParsed => "header_parsed",
            VerificationStage::AlgorithmResolved => "algorithm_resolved",
            VerificationStage::ClaimsParsed => "claims_parsed",
            VerificationStage::SignatureChecked => "signature_checked",
            VerificationStage::TemporalChecked => "temporal_checked",
            VerificationStage::PoPChecked => "pop_checked",
            VerificationStage::Accepted => "accepted",
        }
    }
}

impl fmt::Display for VerificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verifies tokens against the mTLS channel they arrive on.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier<C: Clock = SystemClock> {
    options: VerifyOptions,
    clock: C,
}

impl TokenVerifier<SystemClock> {
    /// Create a new verifier using wall-clock time.
    pub fn new(options: VerifyOptions) -> Self {
        Self {
            options,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> TokenVerifier<C> {
    /// Use a different time source.
    pub fn with_clock<K: Clock>(self, clock: K) -> TokenVerifier<K> {
        TokenVerifier {
            options: self.options,
            clock,
        }
    }

    /// Get a reference to the verify options.
    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify `compact` as presented on `channel` and return its claims.
    ///
    /// # Errors
    /// The first failing check, see [`TokenError`](crate::TokenError)
    pub fn verify(
        &self,
        channel: &ChannelState<'_>,
        compact: &str,
        key: &VerifyingKey,
    ) -> TokenResult<Claims> {
        let mut stage = VerificationStage::Received;
        let result = self.run(channel, compact, key, &mut stage);
        match &result {
            Ok(_) => tracing::trace!(stage = %stage, "token accepted"),
            Err(error) => tracing::debug!(after = %stage, %error, "token rejected"),
        }
        result
    }

    fn run(
        &self,
        channel: &ChannelState<'_>,
        compact: &str,
        key: &VerifyingKey,
        stage: &mut VerificationStage,
    ) -> TokenResult<Claims> {
        self.options.validate()?;
        let leeway = self.options.leeway_seconds()?;
        advance(stage, VerificationStage::Received);

        let token = Token::parse_observed(compact, &self.options.allowed_algorithms, |reached| {
            advance(stage, reached);
        })?;

        let thumbprint = channel.thumbprint()?;

        token.verify_signature(key)?;
        advance(stage, VerificationStage::SignatureChecked);

        let claims = token.into_claims();
        let now = self.clock.unix_seconds();
        claims.verify_issued_at(now, leeway)?;
        if self.options.validate_nbf {
            claims.verify_not_before(now, leeway)?;
        }
        claims.verify_expires_at(now, leeway)?;
        advance(stage, VerificationStage::TemporalChecked);

        claims.verify_binding(&thumbprint)?;
        advance(stage, VerificationStage::PoPChecked);

        advance(stage, VerificationStage::Accepted);
        Ok(claims)
    }
}

fn advance(stage: &mut VerificationStage, reached: VerificationStage) {
    tracing::trace!(stage = %reached, "verification stage");
    *stage = reached;
}
