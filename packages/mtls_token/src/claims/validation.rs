//! Temporal and binding checks over decoded claims
//!
//! `now` and `leeway` are Unix seconds. Leeway widens every window in the
//! token's favour and is zero unless the verifier is configured otherwise.

use super::Claims;
use crate::channel::Thumbprint;
use crate::error::{TokenError, TokenResult};

impl Claims {
    /// `iat` must be present and not after `now + leeway`
    ///
    /// # Errors
    /// `ClaimsNotYetValid` when absent or future-dated, `ClaimShapeConflict` when not a number
    pub fn verify_issued_at(&self, now: i64, leeway: i64) -> TokenResult<()> {
        let iat = self
            .issued_at()?
            .ok_or_else(|| TokenError::not_yet_valid("token has no iat"))?;
        if iat > now.saturating_add(leeway) {
            return Err(TokenError::ClaimsNotYetValid(format!(
                "iat {iat} is after {now}"
            )));
        }
        Ok(())
    }

    /// `exp` must be present and strictly after `now - leeway`
    ///
    /// # Errors
    /// `ClaimsExpired` when absent or reached, `ClaimShapeConflict` when not a number
    pub fn verify_expires_at(&self, now: i64, leeway: i64) -> TokenResult<()> {
        let exp = self
            .expires_at()?
            .ok_or_else(|| TokenError::expired("token has no exp"))?;
        if exp <= now.saturating_sub(leeway) {
            return Err(TokenError::ClaimsExpired(format!(
                "exp {exp} is not after {now}"
            )));
        }
        Ok(())
    }

    /// `nbf`, when present, must not be after `now + leeway`
    ///
    /// # Errors
    /// `ClaimsNotYetValid` when the token is not usable yet
    pub fn verify_not_before(&self, now: i64, leeway: i64) -> TokenResult<()> {
        match self.not_before()? {
            Some(nbf) if nbf > now.saturating_add(leeway) => Err(TokenError::ClaimsNotYetValid(
                format!("nbf {nbf} is after {now}"),
            )),
            _ => Ok(()),
        }
    }

    /// `cnf.x5t#S256` must equal the thumbprint of the live channel
    ///
    /// # Errors
    /// `ProofOfPossessionMismatch` when the binding is missing, malformed or different
    pub fn verify_binding(&self, expected: &Thumbprint) -> TokenResult<()> {
        match self.certificate_thumbprint() {
            Ok(Some(bound)) if expected.matches(bound) => Ok(()),
            _ => Err(TokenError::ProofOfPossessionMismatch),
        }
    }
}
