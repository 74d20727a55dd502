//! Shared fixtures for the integration tests
#![allow(dead_code)]

use cryypt_mtls_token::{
    Algorithm, ChannelState, FixedClock, IssueOptions, SigningKey, TokenIssuer, TokenVerifier,
    VerifyOptions, VerifyingKey,
};

/// P-256 self-signed client certificate; its key is `ES256_PRIVATE_PEM`
pub const CLIENT_A_DER: &[u8] = include_bytes!("../fixtures/client_a.der");
pub const CLIENT_A_PEM: &str = include_str!("../fixtures/client_a.pem");
pub const CLIENT_A_THUMBPRINT: &str = "ItZVspLCix6Wj4rhi7bIKpuKpScyyWCsNM5iUM9Z9RE";

/// RSA 2048 self-signed client certificate; its key is `RS256_PRIVATE_PEM`
pub const CLIENT_B_DER: &[u8] = include_bytes!("../fixtures/client_b.der");
pub const CLIENT_B_PEM: &str = include_str!("../fixtures/client_b.pem");
pub const CLIENT_B_THUMBPRINT: &str = "WBd_8WU8l-A__mBlTPYBh2863lcydKNDPsOBfQaKY3A";

pub const ES256_PRIVATE_PEM: &str = include_str!("../fixtures/es256_private.pem");
pub const ES256_PUBLIC_PEM: &str = include_str!("../fixtures/es256_public.pem");
pub const RS256_PRIVATE_PEM: &str = include_str!("../fixtures/rs256_private.pem");
pub const RS256_PUBLIC_PEM: &str = include_str!("../fixtures/rs256_public.pem");
pub const P384_PRIVATE_PEM: &str = include_str!("../fixtures/p384_private.pem");
pub const RSA1024_PRIVATE_PEM: &str = include_str!("../fixtures/rsa1024_private.pem");

pub const HMAC_SECRET: &[u8; 32] = b"0123456789abcdef0123456789abcdef";

/// 2018-03-21T15:07:47Z
pub const NOW: i64 = 1_521_644_867;

pub fn channel_a() -> ChannelState<'static> {
    ChannelState::new([CLIENT_A_DER])
}

pub fn channel_b() -> ChannelState<'static> {
    ChannelState::new([CLIENT_B_DER])
}

pub fn clock_at(seconds: i64) -> FixedClock {
    FixedClock::from_unix(seconds).unwrap()
}

/// Signing and verifying key for `algorithm`
pub fn key_pair(algorithm: Algorithm) -> (SigningKey, VerifyingKey) {
    match algorithm {
        Algorithm::Rs256 => (
            SigningKey::from_pkcs8_pem(RS256_PRIVATE_PEM).unwrap(),
            VerifyingKey::from_public_key_pem(RS256_PUBLIC_PEM).unwrap(),
        ),
        Algorithm::Es256 => (
            SigningKey::from_pkcs8_pem(ES256_PRIVATE_PEM).unwrap(),
            VerifyingKey::from_public_key_pem(ES256_PUBLIC_PEM).unwrap(),
        ),
        Algorithm::Hs256 => (
            SigningKey::hmac(HMAC_SECRET.to_vec()),
            VerifyingKey::hmac(HMAC_SECRET.to_vec()),
        ),
    }
}

pub fn issuer(algorithm: Algorithm) -> TokenIssuer<FixedClock> {
    TokenIssuer::new(IssueOptions::new(algorithm)).with_clock(clock_at(NOW))
}

pub fn verifier_at(seconds: i64) -> TokenVerifier<FixedClock> {
    TokenVerifier::new(VerifyOptions::default()).with_clock(clock_at(seconds))
}
