//! Certificate-bound proof-of-possession tokens over mutual TLS
//!
//! Tokens are compact JWS (RS256, HS256 or ES256) whose claims carry
//! `cnf.x5t#S256`, the SHA-256 thumbprint of the client certificate the
//! token was issued to. A resource server accepts a token only on a
//! connection whose peer certificate has that same thumbprint, so a leaked
//! token string is useless from any other channel.
//!
//! ```no_run
//! use cryypt_mtls_token::{issue_token, verify_token, ChannelState, Claims, SigningKey};
//!
//! # fn main() -> cryypt_mtls_token::TokenResult<()> {
//! # let client_certificate: Vec<u8> = Vec::new();
//! let channel = ChannelState::new([client_certificate.as_slice()]);
//! let key = SigningKey::hmac(*b"0123456789abcdef0123456789abcdef");
//!
//! let token = issue_token(&channel, &key, Claims::new().with("sub", "alice"))?;
//! let claims = verify_token(&channel, &token, &key.verifying_key())?;
//! assert_eq!(claims.get("sub").and_then(|v| v.as_str()), Some("alice"));
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod authorization;
pub mod channel;
pub mod claims;
pub mod clock;
mod encoding;
mod error;
pub mod header;
pub mod issuer;
pub mod keys;
pub mod options;
pub mod token;
pub mod verifier;

pub use algorithms::{Algorithm, SignatureMethod};
pub use authorization::{authorization_value, token_from_authorization};
pub use channel::{ChannelState, Thumbprint};
pub use claims::{ClaimMap, ClaimValue, Claims, Confirmation, PopClaims};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{TokenError, TokenResult};
pub use header::Header;
pub use issuer::TokenIssuer;
pub use keys::{HmacSecret, KeyKind, SigningKey, VerifyingKey};
pub use options::{IssueOptions, VerifyOptions};
pub use token::{encode_unsigned, Token, UnverifiedToken};
pub use verifier::{TokenVerifier, VerificationStage};

/// Issue a token bound to `channel` with the algorithm natural to `key`
/// (RS256 for RSA, ES256 for P-256, HS256 for a shared secret), default
/// options and wall-clock time.
///
/// # Errors
/// See [`TokenIssuer::issue`]
pub fn issue_token(
    channel: &ChannelState<'_>,
    key: &SigningKey,
    claims: Claims,
) -> TokenResult<String> {
    TokenIssuer::new(IssueOptions::new(key.kind().default_algorithm())).issue(channel, key, claims)
}

/// Verify `compact` on `channel` with default options and wall-clock time.
///
/// # Errors
/// See [`TokenVerifier::verify`]
pub fn verify_token(
    channel: &ChannelState<'_>,
    compact: &str,
    key: &VerifyingKey,
) -> TokenResult<Claims> {
    TokenVerifier::new(VerifyOptions::default()).verify(channel, compact, key)
}
