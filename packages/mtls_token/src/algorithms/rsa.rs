//! RSASSA-PKCS1-v1_5 with SHA-256 (RS256)

use super::{wrong_key, Algorithm, SignatureMethod};
use crate::error::{TokenError, TokenResult};
use crate::keys::{SigningKey, VerifyingKey};
use rsa::traits::PublicKeyParts;
use rsa::Pkcs1v15Sign;
use sha2::{Digest, Sha256};

/// Smallest modulus accepted for signing or verification
const MIN_MODULUS_BITS: usize = 2048;

/// RSA PKCS#1 v1.5 over SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Rs256;

fn check_modulus(key: &impl PublicKeyParts) -> TokenResult<()> {
    let bits = key.size() * 8;
    if bits < MIN_MODULUS_BITS {
        return Err(TokenError::InvalidKeyType(format!(
            "RS256 requires an RSA key of at least {MIN_MODULUS_BITS} bits, got {bits}"
        )));
    }
    Ok(())
}

impl SignatureMethod for Rs256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rs256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> TokenResult<Vec<u8>> {
        let SigningKey::Rsa(private_key) = key else {
            return Err(wrong_key(Algorithm::Rs256, "an RSA private key", key.kind()));
        };
        check_modulus(&**private_key)?;

        let digest = Sha256::digest(signing_input.as_bytes());
        private_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .map_err(|e| TokenError::signing_failed(&e.to_string()))
    }

    fn verify(
        &self,
        key: &VerifyingKey,
        signing_input: &str,
        signature: &[u8],
    ) -> TokenResult<()> {
        let VerifyingKey::Rsa(public_key) = key else {
            return Err(wrong_key(Algorithm::Rs256, "an RSA public key", key.kind()));
        };
        check_modulus(public_key)?;

        let digest = Sha256::digest(signing_input.as_bytes());
        public_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &digest, signature)
            .map_err(|_| TokenError::SignatureInvalid)
    }
}
