//! Token issuance bound to the caller's mTLS channel.

use crate::channel::ChannelState;
use crate::claims::Claims;
use crate::clock::{Clock, SystemClock};
use crate::error::TokenResult;
use crate::header::Header;
use crate::keys::SigningKey;
use crate::options::IssueOptions;
use crate::token;

/// Issues tokens bound to the client certificate of the requesting channel.
///
/// Holds only options and a clock; keys and channel state are borrowed per
/// call, so one issuer can serve many connections concurrently.
#[derive(Debug, Clone)]
pub struct TokenIssuer<C: Clock = SystemClock> {
    options: IssueOptions,
    clock: C,
}

impl TokenIssuer<SystemClock> {
    /// Create a new issuer using wall-clock time.
    pub fn new(options: IssueOptions) -> Self {
        Self {
            options,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> TokenIssuer<C> {
    /// Use a different time source.
    pub fn with_clock<K: Clock>(self, clock: K) -> TokenIssuer<K> {
        TokenIssuer {
            options: self.options,
            clock,
        }
    }

    /// Get a reference to the issue options.
    pub fn options(&self) -> &IssueOptions {
        &self.options
    }

    /// Issue a token for `claims`, bound to the leaf certificate of `channel`.
    ///
    /// `iat`, `exp` and `cnf.x5t#S256` are filled in when the caller left them
    /// out; anything the caller set is kept.
    ///
    /// # Errors
    /// `InvalidOptions` for a lifetime under one second, `MissingMutualTls`
    /// when the channel has no client certificate, `ClaimShapeConflict` for a
    /// malformed reserved claim, an `exp` not after `iat` or a non-finite
    /// number, `InvalidKeyType` when `key` does not fit the configured
    /// algorithm
    pub fn issue(
        &self,
        channel: &ChannelState<'_>,
        key: &SigningKey,
        mut claims: Claims,
    ) -> TokenResult<String> {
        self.options.validate()?;
        let thumbprint = channel.thumbprint()?;

        claims.apply_defaults(&thumbprint, self.clock.unix_seconds(), self.options.lifetime)?;

        let mut header = Header::new(self.options.algorithm);
        header.kid = self.options.key_id.clone();

        let compact = token::sign(&header, &claims, key)?;
        tracing::debug!(
            algorithm = %self.options.algorithm,
            kid = header.kid.as_deref().unwrap_or("-"),
            "issued certificate-bound token"
        );
        Ok(compact)
    }
}
