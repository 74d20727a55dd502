//! Live mTLS channel state and the certificate thumbprint derived from it

use crate::encoding::base64_url_encode;
use crate::error::{TokenError, TokenResult};
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// `x5t#S256` of a certificate: base64url (no padding) SHA-256 of its DER.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thumbprint(String);

impl Thumbprint {
    /// Thumbprint of a DER-encoded certificate
    #[must_use]
    pub fn from_certificate_der(der: &[u8]) -> Self {
        Self(base64_url_encode(&Sha256::digest(der)))
    }

    /// Encoded thumbprint text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a thumbprint carried in a token
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl fmt::Display for Thumbprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Thumbprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Thumbprint> for String {
    fn from(thumbprint: Thumbprint) -> Self {
        thumbprint.0
    }
}

/// Peer certificates of an established connection, leaf first.
///
/// Transport adapters build one of these per request; the certificate bytes
/// are only borrowed for the duration of an issue or verify call.
#[derive(Debug, Clone, Default)]
pub struct ChannelState<'a> {
    peer_certificates: Option<Vec<&'a [u8]>>,
}

impl<'a> ChannelState<'a> {
    /// A TLS channel whose peer presented `certificates` (DER, leaf first)
    pub fn new<I, C>(certificates: I) -> Self
    where
        I: IntoIterator<Item = &'a C>,
        C: AsRef<[u8]> + ?Sized + 'a,
    {
        Self {
            peer_certificates: Some(certificates.into_iter().map(|c| c.as_ref()).collect()),
        }
    }

    /// A channel without any TLS state
    #[must_use]
    pub fn plaintext() -> Self {
        Self {
            peer_certificates: None,
        }
    }

    /// Peer certificate chain, `None` when the channel is not TLS
    #[must_use]
    pub fn peer_certificates(&self) -> Option<&[&'a [u8]]> {
        self.peer_certificates.as_deref()
    }

    /// The client's leaf certificate
    ///
    /// # Errors
    /// `MissingMutualTls` when there is no TLS state or the peer sent no certificate
    pub fn leaf_certificate(&self) -> TokenResult<&'a [u8]> {
        let chain = self
            .peer_certificates
            .as_ref()
            .ok_or_else(|| TokenError::missing_mutual_tls("no TLS connection state"))?;
        match chain.first() {
            Some(leaf) if !leaf.is_empty() => Ok(*leaf),
            _ => Err(TokenError::missing_mutual_tls("peer presented no certificate")),
        }
    }

    /// Thumbprint of the leaf certificate, recomputed on every call
    ///
    /// # Errors
    /// `MissingMutualTls` when there is no leaf certificate
    pub fn thumbprint(&self) -> TokenResult<Thumbprint> {
        self.leaf_certificate().map(Thumbprint::from_certificate_der)
    }
}

#[cfg(feature = "rustls")]
impl<'a> ChannelState<'a> {
    /// Channel state of a rustls client or server connection
    #[must_use]
    pub fn from_rustls(connection: &'a rustls::CommonState) -> Self {
        match connection.peer_certificates() {
            Some(certificates) => Self::new(certificates.iter()),
            None => Self::plaintext(),
        }
    }
}
