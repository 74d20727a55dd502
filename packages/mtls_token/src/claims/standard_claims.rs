//! Fixed-schema view of the claims an authorization server usually issues

use serde::{Deserialize, Serialize};

/// The `cnf` claim of a certificate-bound token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// base64url SHA-256 of the bound client certificate
    #[serde(rename = "x5t#S256")]
    pub x5t_s256: String,
}

impl Confirmation {
    /// Binding to `thumbprint`
    #[must_use]
    pub fn new(thumbprint: impl Into<String>) -> Self {
        Self {
            x5t_s256: thumbprint.into(),
        }
    }
}

/// Typed claims of an access token bound to a client certificate.
///
/// Converted to and from the open map with [`Claims::from_typed`] and
/// [`Claims::to_typed`]; claims outside this schema are ignored on the way in.
/// Unset fields are omitted, so issuance still fills in `iat`, `exp` and `cnf`.
///
/// [`Claims::from_typed`]: super::Claims::from_typed
/// [`Claims::to_typed`]: super::Claims::to_typed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopClaims {
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Subject
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Audience
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Space-separated scopes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Certificate binding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cnf: Option<Confirmation>,
    /// Issued at (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiry (Unix seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl PopClaims {
    /// Thumbprint from `cnf`, if bound
    #[must_use]
    pub fn thumbprint(&self) -> Option<&str> {
        self.cnf.as_ref().map(|cnf| cnf.x5t_s256.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Claims;
    use super::*;

    #[test]
    fn test_typed_view_round_trips_through_open_map() {
        let typed = PopClaims {
            iss: Some("issuer".into()),
            sub: Some("alice".into()),
            scope: Some("read write".into()),
            cnf: Some(Confirmation::new("tp")),
            iat: Some(10),
            exp: Some(20),
            ..PopClaims::default()
        };
        let claims = Claims::from_typed(&typed).unwrap();
        assert_eq!(claims.certificate_thumbprint().unwrap(), Some("tp"));
        assert!(!claims.contains("aud"));

        let back: PopClaims = claims.to_typed().unwrap();
        assert_eq!(back, typed);
    }

    #[test]
    fn test_extra_claims_are_ignored_by_the_view() {
        let claims = Claims::new().with("iss", "issuer").with("custom", true);
        let typed: PopClaims = claims.to_typed().unwrap();
        assert_eq!(typed.iss.as_deref(), Some("issuer"));
        assert_eq!(typed.thumbprint(), None);
    }

    #[test]
    fn test_wrong_shape_does_not_fit_the_view() {
        let claims = Claims::new().with("iat", "soon");
        assert!(claims.to_typed::<PopClaims>().is_err());
    }
}
