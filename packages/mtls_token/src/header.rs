//! JOSE header: `alg`, `typ`, `kid`

use crate::algorithms::Algorithm;
use crate::error::{TokenError, TokenResult};
use serde::{Deserialize, Serialize};

/// Token type written at issuance
pub const JWT_TYPE: &str = "JWT";

/// JWS header.
///
/// Absent fields stay absent through encoding and decoding, so a decoded
/// header re-encodes to the same JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Signature algorithm name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Token type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,
    /// Key identifier hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl Header {
    /// Header for a token signed with `algorithm`
    #[must_use]
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            alg: Some(algorithm.as_str().to_string()),
            typ: Some(JWT_TYPE.to_string()),
            kid: None,
        }
    }

    /// Set the key identifier
    #[must_use]
    pub fn with_key_id(mut self, kid: impl Into<String>) -> Self {
        self.kid = Some(kid.into());
        self
    }

    /// Resolve the declared algorithm
    ///
    /// # Errors
    /// `UnsupportedAlgorithm` when `alg` is missing or not one of the supported names
    pub fn algorithm(&self) -> TokenResult<Algorithm> {
        self.alg
            .as_deref()
            .ok_or_else(|| TokenError::unsupported_algorithm("header declares no alg"))?
            .parse()
    }
}
