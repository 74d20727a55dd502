//! Signature methods: RS256, HS256 and ES256
//!
//! Each algorithm is a stateless [`SignatureMethod`]. The name→method mapping
//! in [`Algorithm::method`] is a closed match over static instances, so it is
//! shared by every caller without locking and can never fall through to a
//! default algorithm.

mod ecdsa;
mod hmac;
mod rsa;

pub use self::ecdsa::Es256;
pub use self::hmac::Hs256;
pub use self::rsa::Rs256;

use crate::error::{TokenError, TokenResult};
use crate::keys::{SigningKey, VerifyingKey};
use std::fmt;
use std::str::FromStr;

/// Supported JWS algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    Rs256,
    /// HMAC with SHA-256
    Hs256,
    /// ECDSA on P-256 with SHA-256
    Es256,
}

impl Algorithm {
    /// Every supported algorithm
    pub const ALL: [Algorithm; 3] = [Algorithm::Rs256, Algorithm::Hs256, Algorithm::Es256];

    /// Header `alg` value
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Algorithm::Rs256 => "RS256",
            Algorithm::Hs256 => "HS256",
            Algorithm::Es256 => "ES256",
        }
    }

    /// The signature method implementing this algorithm
    #[must_use]
    pub fn method(self) -> &'static dyn SignatureMethod {
        match self {
            Algorithm::Rs256 => &Rs256,
            Algorithm::Hs256 => &Hs256,
            Algorithm::Es256 => &Es256,
        }
    }
}

impl FromStr for Algorithm {
    type Err = TokenError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "RS256" => Ok(Algorithm::Rs256),
            "HS256" => Ok(Algorithm::Hs256),
            "ES256" => Ok(Algorithm::Es256),
            other => Err(TokenError::unsupported_algorithm(other)),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JWS signature algorithm.
///
/// `signing_input` is always the ASCII `header.payload` prefix of the compact
/// serialization. Implementations reject keys of the wrong family with
/// `InvalidKeyType` before touching any bytes.
pub trait SignatureMethod: Send + Sync {
    /// Algorithm implemented by this method
    fn algorithm(&self) -> Algorithm;

    /// Sign `signing_input`
    ///
    /// # Errors
    /// `InvalidKeyType` when `key` does not fit the algorithm
    fn sign(&self, key: &SigningKey, signing_input: &str) -> TokenResult<Vec<u8>>;

    /// Check `signature` over `signing_input`
    ///
    /// # Errors
    /// `InvalidKeyType` when `key` does not fit the algorithm, `SignatureInvalid`
    /// when the signature does not verify
    fn verify(&self, key: &VerifyingKey, signing_input: &str, signature: &[u8])
        -> TokenResult<()>;
}

fn wrong_key(algorithm: Algorithm, expected: &str, found: crate::keys::KeyKind) -> TokenError {
    TokenError::InvalidKeyType(format!("{algorithm} requires {expected}, got {found} key"))
}
