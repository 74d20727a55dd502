//! ECDSA on P-256 with SHA-256 (ES256)
//!
//! The JWS form of an ECDSA signature is not DER: it is the big-endian R and
//! S scalars, each left-padded with zeros to the 32-byte field size, written
//! back to back (RFC 7518 §3.4).

use super::{wrong_key, Algorithm, SignatureMethod};
use crate::error::{TokenError, TokenResult};
use crate::keys::{SigningKey, VerifyingKey};
use p256::ecdsa::signature::{Signer, Verifier};
use p256::ecdsa::Signature;

/// Byte length of one P-256 coordinate
const COORDINATE_LEN: usize = 32;
/// Byte length of an encoded ES256 signature
const SIGNATURE_LEN: usize = 2 * COORDINATE_LEN;

/// ECDSA P-256 over SHA-256
#[derive(Debug, Clone, Copy, Default)]
pub struct Es256;

/// Left-pad a big-endian coordinate to exactly `COORDINATE_LEN` bytes.
/// A longer input is an error, never truncated.
pub(crate) fn pad_coordinate(coordinate: &[u8]) -> TokenResult<[u8; COORDINATE_LEN]> {
    if coordinate.len() > COORDINATE_LEN {
        return Err(TokenError::SigningFailed(format!(
            "ES256 coordinate is {} bytes, expected at most {COORDINATE_LEN}",
            coordinate.len()
        )));
    }
    let mut padded = [0u8; COORDINATE_LEN];
    padded[COORDINATE_LEN - coordinate.len()..].copy_from_slice(coordinate);
    Ok(padded)
}

/// R ‖ S, each padded to the coordinate size
pub(crate) fn encode_signature(r: &[u8], s: &[u8]) -> TokenResult<[u8; SIGNATURE_LEN]> {
    let mut encoded = [0u8; SIGNATURE_LEN];
    encoded[..COORDINATE_LEN].copy_from_slice(&pad_coordinate(r)?);
    encoded[COORDINATE_LEN..].copy_from_slice(&pad_coordinate(s)?);
    Ok(encoded)
}

/// Split an encoded signature back into R and S
pub(crate) fn decode_signature(encoded: &[u8]) -> TokenResult<Signature> {
    if encoded.len() != SIGNATURE_LEN {
        tracing::debug!(len = encoded.len(), "ES256 signature has wrong length");
        return Err(TokenError::SignatureInvalid);
    }
    let (r, s) = encoded.split_at(COORDINATE_LEN);
    let r: [u8; COORDINATE_LEN] = r.try_into().map_err(|_| TokenError::SignatureInvalid)?;
    let s: [u8; COORDINATE_LEN] = s.try_into().map_err(|_| TokenError::SignatureInvalid)?;
    Signature::from_scalars(r, s).map_err(|_| TokenError::SignatureInvalid)
}

impl SignatureMethod for Es256 {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Es256
    }

    fn sign(&self, key: &SigningKey, signing_input: &str) -> TokenResult<Vec<u8>> {
        let SigningKey::Ec(signing_key) = key else {
            return Err(wrong_key(Algorithm::Es256, "a P-256 private key", key.kind()));
        };
        let signature: Signature = signing_key
            .try_sign(signing_input.as_bytes())
            .map_err(|e| TokenError::signing_failed(&e.to_string()))?;
        let (r, s) = signature.split_bytes();
        Ok(encode_signature(&r, &s)?.to_vec())
    }

    fn verify(
        &self,
        key: &VerifyingKey,
        signing_input: &str,
        signature: &[u8],
    ) -> TokenResult<()> {
        let VerifyingKey::Ec(verifying_key) = key else {
            return Err(wrong_key(Algorithm::Es256, "a P-256 public key", key.kind()));
        };
        let signature = decode_signature(signature)?;
        verifying_key
            .verify(signing_input.as_bytes(), &signature)
            .map_err(|_| TokenError::SignatureInvalid)
    }
}
