//! `POP` authorization scheme carried in request metadata
//!
//! Transports move the compact token as `authorization: POP <token>`; these
//! helpers are the only place that format is known.

use crate::error::{TokenError, TokenResult};

/// Metadata / header key carrying the token
pub const AUTHORIZATION_METADATA_KEY: &str = "authorization";
/// Authorization scheme for certificate-bound tokens
pub const POP_SCHEME: &str = "POP";

/// `POP <token>`
#[must_use]
pub fn authorization_value(token: &str) -> String {
    format!("{POP_SCHEME} {token}")
}

/// Extract the token from a `POP <token>` authorization value.
///
/// The scheme is matched case-insensitively.
///
/// # Errors
/// `InvalidAuthorization` for any other scheme, a missing separator or an empty token
pub fn token_from_authorization(value: &str) -> TokenResult<&str> {
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| TokenError::InvalidAuthorization("expected `POP <token>`".to_string()))?;
    if !scheme.eq_ignore_ascii_case(POP_SCHEME) {
        return Err(TokenError::InvalidAuthorization(format!(
            "token type should be {POP_SCHEME}: {scheme:?}"
        )));
    }
    if token.is_empty() {
        return Err(TokenError::InvalidAuthorization("token is empty".to_string()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_round_trips() {
        let value = authorization_value("a.b.c");
        assert_eq!(value, "POP a.b.c");
        assert_eq!(token_from_authorization(&value).unwrap(), "a.b.c");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(token_from_authorization("pop a.b.c").unwrap(), "a.b.c");
        assert_eq!(token_from_authorization("Pop a.b.c").unwrap(), "a.b.c");
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        for value in ["Bearer a.b.c", "POP", "POPa.b.c", "POP ", ""] {
            assert!(
                matches!(
                    token_from_authorization(value),
                    Err(TokenError::InvalidAuthorization(_))
                ),
                "{value:?}"
            );
        }
    }
}
