//! Typed key handles and PKCS#8 / SPKI / X.509 loading
//!
//! A key handle carries its own family (RSA, P-256, shared secret) so a
//! signature method can reject the wrong kind of key up front. Loading checks
//! the algorithm identifier of the encoded key before handing it to the
//! family-specific parser, which is how a P-384 key is told apart from a
//! P-256 one instead of failing with an opaque parse error.

use crate::algorithms::Algorithm;
use crate::error::{TokenError, TokenResult};
use p256::pkcs8::{
    DecodePrivateKey, DecodePublicKey, Document, ObjectIdentifier, PrivateKeyInfo, SecretDocument,
    SubjectPublicKeyInfoRef,
};
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::fmt;
use x509_cert::der::{Decode, DecodePem, Encode};
use x509_cert::Certificate;
use zeroize::Zeroizing;

/// rsaEncryption
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
/// id-ecPublicKey
const EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
/// secp256r1 / P-256
const SECP256R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");

const PRIVATE_KEY_LABEL: &str = "PRIVATE KEY";
const PUBLIC_KEY_LABEL: &str = "PUBLIC KEY";

/// Key family, used in error messages and to pick a default algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// RSA key pair half
    Rsa,
    /// ECDSA key on NIST P-256
    EcP256,
    /// Shared HMAC secret
    Hmac,
}

impl KeyKind {
    /// The algorithm this family signs with
    #[must_use]
    pub fn default_algorithm(self) -> Algorithm {
        match self {
            KeyKind::Rsa => Algorithm::Rs256,
            KeyKind::EcP256 => Algorithm::Es256,
            KeyKind::Hmac => Algorithm::Hs256,
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyKind::Rsa => "RSA",
            KeyKind::EcP256 => "EC P-256",
            KeyKind::Hmac => "HMAC secret",
        })
    }
}

/// HMAC shared secret, wiped on drop
#[derive(Clone)]
pub struct HmacSecret(Zeroizing<Vec<u8>>);

impl HmacSecret {
    /// Wrap secret bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }

    /// Raw secret bytes
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HmacSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HmacSecret({} bytes)", self.0.len())
    }
}

/// Key material used to sign tokens
#[derive(Clone)]
pub enum SigningKey {
    /// RSA private key (RS256)
    Rsa(Box<RsaPrivateKey>),
    /// P-256 private key (ES256)
    Ec(p256::ecdsa::SigningKey),
    /// Shared secret (HS256)
    Hmac(HmacSecret),
}

impl SigningKey {
    /// Shared HMAC secret
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Self {
        SigningKey::Hmac(HmacSecret::new(secret))
    }

    /// Key family
    #[must_use]
    pub fn kind(&self) -> KeyKind {
        match self {
            SigningKey::Rsa(_) => KeyKind::Rsa,
            SigningKey::Ec(_) => KeyKind::EcP256,
            SigningKey::Hmac(_) => KeyKind::Hmac,
        }
    }

    /// The key that verifies signatures made with this one
    #[must_use]
    pub fn verifying_key(&self) -> VerifyingKey {
        match self {
            SigningKey::Rsa(key) => VerifyingKey::Rsa(key.to_public_key()),
            SigningKey::Ec(key) => VerifyingKey::Ec(*key.verifying_key()),
            SigningKey::Hmac(secret) => VerifyingKey::Hmac(secret.clone()),
        }
    }

    /// Load an RSA or P-256 private key from PKCS#8 DER
    ///
    /// # Errors
    /// `InvalidKeyType` for undecodable input, an unsupported key algorithm, or
    /// an EC key on any curve other than P-256
    pub fn from_pkcs8_der(der: &[u8]) -> TokenResult<Self> {
        let info = PrivateKeyInfo::try_from(der)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid PKCS#8 private key: {e}")))?;

        let oid = info.algorithm.oid;
        if oid == RSA_ENCRYPTION {
            RsaPrivateKey::from_pkcs8_der(der)
                .map(|key| SigningKey::Rsa(Box::new(key)))
                .map_err(|e| TokenError::InvalidKeyType(format!("invalid RSA private key: {e}")))
        } else if oid == EC_PUBLIC_KEY {
            require_p256(info.algorithm.parameters_oid().ok())?;
            p256::ecdsa::SigningKey::from_pkcs8_der(der)
                .map(SigningKey::Ec)
                .map_err(|e| TokenError::InvalidKeyType(format!("invalid EC private key: {e}")))
        } else {
            Err(TokenError::InvalidKeyType(format!(
                "unsupported private key algorithm {oid}"
            )))
        }
    }

    /// Load a `PRIVATE KEY` PEM block
    ///
    /// # Errors
    /// Same as [`SigningKey::from_pkcs8_der`], plus a wrong PEM label
    pub fn from_pkcs8_pem(pem: &str) -> TokenResult<Self> {
        let (label, document) = SecretDocument::from_pem(pem)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid PEM: {e}")))?;
        if label != PRIVATE_KEY_LABEL {
            return Err(TokenError::InvalidKeyType(format!(
                "expected a {PRIVATE_KEY_LABEL} PEM block, found {label}"
            )));
        }
        Self::from_pkcs8_der(document.as_bytes())
    }
}

impl From<RsaPrivateKey> for SigningKey {
    fn from(key: RsaPrivateKey) -> Self {
        SigningKey::Rsa(Box::new(key))
    }
}

impl From<p256::ecdsa::SigningKey> for SigningKey {
    fn from(key: p256::ecdsa::SigningKey) -> Self {
        SigningKey::Ec(key)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningKey({})", self.kind())
    }
}

/// Key material used to verify tokens
#[derive(Clone)]
pub enum VerifyingKey {
    /// RSA public key (RS256)
    Rsa(RsaPublicKey),
    /// P-256 public key (ES256)
    Ec(p256::ecdsa::VerifyingKey),
    /// Shared secret (HS256)
    Hmac(HmacSecret),
}

impl VerifyingKey {
    /// Shared HMAC secret
    pub fn hmac(secret: impl Into<Vec<u8>>) -> Self {
        VerifyingKey::Hmac(HmacSecret::new(secret))
    }

    /// Key family
    #[must_use]
    pub fn kind(&self) -> KeyKind {
        match self {
            VerifyingKey::Rsa(_) => KeyKind::Rsa,
            VerifyingKey::Ec(_) => KeyKind::EcP256,
            VerifyingKey::Hmac(_) => KeyKind::Hmac,
        }
    }

    /// Load an RSA or P-256 public key from SubjectPublicKeyInfo DER
    ///
    /// # Errors
    /// `InvalidKeyType` for undecodable input, an unsupported key algorithm, or
    /// an EC key on any curve other than P-256
    pub fn from_public_key_der(der: &[u8]) -> TokenResult<Self> {
        let spki = SubjectPublicKeyInfoRef::try_from(der)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid public key: {e}")))?;

        let oid = spki.algorithm.oid;
        if oid == RSA_ENCRYPTION {
            RsaPublicKey::from_public_key_der(der)
                .map(VerifyingKey::Rsa)
                .map_err(|e| TokenError::InvalidKeyType(format!("invalid RSA public key: {e}")))
        } else if oid == EC_PUBLIC_KEY {
            require_p256(spki.algorithm.parameters_oid().ok())?;
            p256::ecdsa::VerifyingKey::from_public_key_der(der)
                .map(VerifyingKey::Ec)
                .map_err(|e| TokenError::InvalidKeyType(format!("invalid EC public key: {e}")))
        } else {
            Err(TokenError::InvalidKeyType(format!(
                "unsupported public key algorithm {oid}"
            )))
        }
    }

    /// Load a `PUBLIC KEY` PEM block
    ///
    /// # Errors
    /// Same as [`VerifyingKey::from_public_key_der`], plus a wrong PEM label
    pub fn from_public_key_pem(pem: &str) -> TokenResult<Self> {
        let (label, document) = Document::from_pem(pem)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid PEM: {e}")))?;
        if label != PUBLIC_KEY_LABEL {
            return Err(TokenError::InvalidKeyType(format!(
                "expected a {PUBLIC_KEY_LABEL} PEM block, found {label}"
            )));
        }
        Self::from_public_key_der(document.as_bytes())
    }

    /// Public key of a DER-encoded X.509 certificate
    ///
    /// # Errors
    /// `InvalidKeyType` when the certificate or its key cannot be decoded
    pub fn from_certificate_der(der: &[u8]) -> TokenResult<Self> {
        let certificate = Certificate::from_der(der)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid certificate: {e}")))?;
        Self::from_certificate(&certificate)
    }

    /// Public key of a PEM-encoded X.509 certificate
    ///
    /// # Errors
    /// `InvalidKeyType` when the certificate or its key cannot be decoded
    pub fn from_certificate_pem(pem: &str) -> TokenResult<Self> {
        let certificate = Certificate::from_pem(pem)
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid certificate: {e}")))?;
        Self::from_certificate(&certificate)
    }

    fn from_certificate(certificate: &Certificate) -> TokenResult<Self> {
        let spki = certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| TokenError::InvalidKeyType(format!("invalid certificate key: {e}")))?;
        Self::from_public_key_der(&spki)
    }
}

impl From<RsaPublicKey> for VerifyingKey {
    fn from(key: RsaPublicKey) -> Self {
        VerifyingKey::Rsa(key)
    }
}

impl From<p256::ecdsa::VerifyingKey> for VerifyingKey {
    fn from(key: p256::ecdsa::VerifyingKey) -> Self {
        VerifyingKey::Ec(key)
    }
}

impl fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerifyingKey({})", self.kind())
    }
}

fn require_p256(curve: Option<ObjectIdentifier>) -> TokenResult<()> {
    match curve {
        Some(oid) if oid == SECP256R1 => Ok(()),
        Some(other) => Err(TokenError::InvalidKeyType(format!(
            "ES256 requires a P-256 key, found curve {other}"
        ))),
        None => Err(TokenError::invalid_key_type("EC key without named curve")),
    }
}
