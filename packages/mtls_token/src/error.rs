//! Error taxonomy for token issuance and verification

use thiserror::Error;

/// Token operation result type
pub type TokenResult<T> = Result<T, TokenError>;

/// Every way issuing or verifying a certificate-bound token can fail.
///
/// Verification is all-or-nothing: the first failing check is returned and
/// nothing later in the pipeline runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The channel carries no TLS state or no peer certificate
    #[error("connection must use mutual TLS: {0}")]
    MissingMutualTls(String),

    /// Key does not match the algorithm's expected type, curve or size
    #[error("invalid key type: {0}")]
    InvalidKeyType(String),

    /// No claims to issue, or no token to decode
    #[error("empty claims or token: {0}")]
    EmptyClaimsOrToken(String),

    /// Wrong segment count or a segment that does not decode
    #[error("malformed compact serialization: {0}")]
    MalformedCompactForm(String),

    /// Header `alg` is missing, unknown, or not allowed by the verifier
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Cryptographic verification failed
    #[error("invalid token signature")]
    SignatureInvalid,

    /// A reserved claim exists with an incompatible shape
    #[error("claim shape conflict: {0}")]
    ClaimShapeConflict(String),

    /// `iat` or `nbf` places the token in the future
    #[error("token cannot be used yet: {0}")]
    ClaimsNotYetValid(String),

    /// `exp` is missing or not after the verifier's clock
    #[error("token has expired: {0}")]
    ClaimsExpired(String),

    /// `cnf.x5t#S256` does not match the certificate on the live channel
    #[error("failed to verify proof of possession")]
    ProofOfPossessionMismatch,

    /// Authorization header value is not `POP <token>`
    #[error("invalid authorization value: {0}")]
    InvalidAuthorization(String),

    /// Issuer or verifier options are unusable
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// JSON encoding of a header or claims segment failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The signing primitive itself failed
    #[error("signing error: {0}")]
    SigningFailed(String),
}

impl TokenError {
    /// Create a missing mutual TLS error
    #[inline]
    #[must_use]
    pub fn missing_mutual_tls(msg: &str) -> Self {
        TokenError::MissingMutualTls(msg.to_string())
    }

    /// Create an invalid key type error
    #[inline]
    #[must_use]
    pub fn invalid_key_type(msg: &str) -> Self {
        TokenError::InvalidKeyType(msg.to_string())
    }

    /// Create an empty claims or token error
    #[inline]
    #[must_use]
    pub fn empty(msg: &str) -> Self {
        TokenError::EmptyClaimsOrToken(msg.to_string())
    }

    /// Create a malformed compact form error
    #[inline]
    #[must_use]
    pub fn malformed(msg: &str) -> Self {
        TokenError::MalformedCompactForm(msg.to_string())
    }

    /// Create an unsupported algorithm error
    #[inline]
    #[must_use]
    pub fn unsupported_algorithm(alg: &str) -> Self {
        TokenError::UnsupportedAlgorithm(alg.to_string())
    }

    /// Create a claim shape conflict error
    #[inline]
    #[must_use]
    pub fn claim_shape(msg: &str) -> Self {
        TokenError::ClaimShapeConflict(msg.to_string())
    }

    /// Create a not-yet-valid error
    #[inline]
    #[must_use]
    pub fn not_yet_valid(msg: &str) -> Self {
        TokenError::ClaimsNotYetValid(msg.to_string())
    }

    /// Create an expired error
    #[inline]
    #[must_use]
    pub fn expired(msg: &str) -> Self {
        TokenError::ClaimsExpired(msg.to_string())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: &str) -> Self {
        TokenError::Serialization(msg.to_string())
    }

    /// Create a signing error
    #[inline]
    #[must_use]
    pub fn signing_failed(msg: &str) -> Self {
        TokenError::SigningFailed(msg.to_string())
    }
}
