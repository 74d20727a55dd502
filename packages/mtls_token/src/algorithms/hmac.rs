//! HMAC-SHA256 (HS256)

use super::{wrong_key, Algorithm, SignatureMethod};
use crate::error::{TokenError, TokenResult};
use crate::keys::{HmacSecret, SigningKey, VerifyingKey};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Secrets shorter than the digest size are refused
const MIN_SECRET_LEN: usize = 32;

/// HMAC-SHA256
#[derive(Debug, Clone, Copy, Default)]
pub struct Hs256;

impl Hs256 {
    fn mac(secret: &HmacSecret, signing_input: &str) -> TokenResult<HmacSha256> {
        let secret = secret.expose();
        if secret.len() < MIN_SECRET_LEN {
            return Err(TokenError::InvalidKeyType(format!(
                "HS256 secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                secret.len()
            )));
        }
        let mut mac = HmacSha256::new_from_slice(secret)
            .map_err(|_| TokenError::invalid_key_type("invalid HMAC key"))?;
        mac.update(signing_input.as_bytes());
        Ok(mac)
    }
}

impl SignatureMethod for Hs256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Hs256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> TokenResult<Vec<u8>> {
        let SigningKey::Hmac(secret) = key else {
            return Err(wrong_key(Algorithm::Hs256, "a shared secret", key.kind()));
        };
        Ok(Self::mac(secret, signing_input)?
            .finalize()
            .into_bytes()
            .to_vec())
    }

    fn verify(
        &self,
        key: &VerifyingKey,
        signing_input: &str,
        signature: &[u8],
    ) -> TokenResult<()> {
        let VerifyingKey::Hmac(secret) = key else {
            return Err(wrong_key(Algorithm::Hs256, "a shared secret", key.kind()));
        };
        // verify_slice compares in constant time
        Self::mac(secret, signing_input)?
            .verify_slice(signature)
            .map_err(|_| TokenError::SignatureInvalid)
    }
}
