//! Compact JWS serialization: `b64url(header).b64url(claims).b64url(signature)`

use crate::algorithms::Algorithm;
use crate::claims::Claims;
use crate::encoding::{base64_url_decode, base64_url_encode, decode_segment, encode_segment};
use crate::error::{TokenError, TokenResult};
use crate::header::Header;
use crate::keys::{SigningKey, VerifyingKey};
use crate::verifier::VerificationStage;

/// Segment separator
const SEPARATOR: char = '.';

/// Header and claims encoded as `header.claims`, without a signature.
///
/// This is the signing input of a signed token.
///
/// # Errors
/// `Serialization` when either part fails to encode
pub fn encode_unsigned(header: &Header, claims: &Claims) -> TokenResult<String> {
    Ok(format!(
        "{}{SEPARATOR}{}",
        encode_segment(header)?,
        encode_segment(claims)?
    ))
}

/// Sign `claims` under `header` and return the compact token.
///
/// The signature method is the one `header.alg` declares, so a header and
/// signature can never disagree.
///
/// # Errors
/// `UnsupportedAlgorithm` for a missing or unknown `alg`, `InvalidKeyType` when
/// `key` does not fit it
pub fn sign(header: &Header, claims: &Claims, key: &SigningKey) -> TokenResult<String> {
    let method = header.algorithm()?.method();
    let signing_input = encode_unsigned(header, claims)?;
    let signature = method.sign(key, &signing_input)?;
    Ok(format!(
        "{signing_input}{SEPARATOR}{}",
        base64_url_encode(&signature)
    ))
}

fn decode_claims(segment: &str) -> TokenResult<Claims> {
    decode_segment::<Option<Claims>>(segment, "claims")?
        .ok_or_else(|| TokenError::empty("claims segment is null"))
}

/// A decoded token whose signature has not been checked.
///
/// For inspection only: nothing read from here may be trusted.
#[derive(Debug, Clone, PartialEq)]
pub struct UnverifiedToken {
    /// Decoded header
    pub header: Header,
    /// Decoded claims
    pub claims: Claims,
}

impl UnverifiedToken {
    /// Decode the first two segments of `compact`; any signature is ignored
    ///
    /// # Errors
    /// `EmptyClaimsOrToken` for an empty string, `MalformedCompactForm` when
    /// there are fewer than two segments or either does not decode
    pub fn decode(compact: &str) -> TokenResult<Self> {
        if compact.is_empty() {
            return Err(TokenError::empty("token is empty"));
        }
        let mut segments = compact.split(SEPARATOR);
        let (Some(header), Some(claims)) = (segments.next(), segments.next()) else {
            return Err(TokenError::malformed("expected at least 2 segments"));
        };
        Ok(Self {
            header: decode_segment(header, "header")?,
            claims: decode_claims(claims)?,
        })
    }
}

/// A structurally valid signed token with its algorithm resolved.
///
/// Produced by [`Token::parse`]. The claims are not trustworthy until
/// [`Token::verify_signature`] succeeds.
#[derive(Debug, Clone)]
pub struct Token<'t> {
    signing_input: &'t str,
    signature: &'t str,
    header: Header,
    claims: Claims,
    algorithm: Algorithm,
}

impl<'t> Token<'t> {
    /// Parse a three-segment token, accepting only algorithms in `allowed`.
    ///
    /// Order is header, algorithm, claims: an unknown or disallowed `alg`
    /// fails before the claims or signature bytes are read.
    ///
    /// # Errors
    /// `EmptyClaimsOrToken`, `MalformedCompactForm` or `UnsupportedAlgorithm`
    pub fn parse(compact: &'t str, allowed: &[Algorithm]) -> TokenResult<Self> {
        Self::parse_observed(compact, allowed, |_| {})
    }

    /// [`Token::parse`], reporting each stage as it is reached
    pub(crate) fn parse_observed(
        compact: &'t str,
        allowed: &[Algorithm],
        mut reached: impl FnMut(VerificationStage),
    ) -> TokenResult<Self> {
        if compact.is_empty() {
            return Err(TokenError::empty("token is empty"));
        }
        let segments: Vec<&str> = compact.split(SEPARATOR).collect();
        let &[header, claims, signature] = segments.as_slice() else {
            return Err(TokenError::MalformedCompactForm(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let header: Header = decode_segment(header, "header")?;
        reached(VerificationStage::HeaderParsed);

        let algorithm = header.algorithm()?;
        if !allowed.contains(&algorithm) {
            return Err(TokenError::UnsupportedAlgorithm(format!(
                "{algorithm} is not allowed here"
            )));
        }
        reached(VerificationStage::AlgorithmResolved);

        let claims = decode_claims(claims)?;
        reached(VerificationStage::ClaimsParsed);

        // header and claims segments plus the separator between them
        let signing_input = &compact[..compact.len() - signature.len() - 1];
        Ok(Self {
            signing_input,
            signature,
            header,
            claims,
            algorithm,
        })
    }

    /// Check the signature with the method the header declared
    ///
    /// # Errors
    /// `MalformedCompactForm` when the signature segment does not decode,
    /// `InvalidKeyType` or `SignatureInvalid` from the method
    pub fn verify_signature(&self, key: &VerifyingKey) -> TokenResult<()> {
        let signature = base64_url_decode(self.signature).map_err(|e| {
            TokenError::MalformedCompactForm(format!("invalid signature encoding: {e}"))
        })?;
        self.algorithm
            .method()
            .verify(key, self.signing_input, &signature)
    }

    /// Decoded header
    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Decoded claims
    #[must_use]
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Algorithm resolved from the header
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The `header.claims` prefix the signature covers
    #[must_use]
    pub fn signing_input(&self) -> &'t str {
        self.signing_input
    }

    /// Take the claims
    #[must_use]
    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsigned_encoding_is_stable() {
        let header = Header {
            kid: Some("kid".into()),
            ..Header::default()
        };
        let claims = Claims::new().with("iss", "iss");
        assert_eq!(
            encode_unsigned(&header, &claims).unwrap(),
            "eyJraWQiOiJraWQifQ.eyJpc3MiOiJpc3MifQ"
        );

        let claims = Claims::new().with("iss", "iss").with("aud", "aud");
        assert_eq!(
            encode_unsigned(&header, &claims).unwrap(),
            "eyJraWQiOiJraWQifQ.eyJhdWQiOiJhdWQiLCJpc3MiOiJpc3MifQ"
        );
    }

    #[test]
    fn test_unverified_decode_needs_two_segments() {
        assert!(matches!(
            UnverifiedToken::decode("eyJraWQiOiJraWQifQ"),
            Err(TokenError::MalformedCompactForm(_))
        ));
        assert!(matches!(
            UnverifiedToken::decode(""),
            Err(TokenError::EmptyClaimsOrToken(_))
        ));
        let decoded = UnverifiedToken::decode("eyJraWQiOiJraWQifQ.eyJpc3MiOiJpc3MifQ.sig").unwrap();
        assert_eq!(decoded.header.kid.as_deref(), Some("kid"));
        assert_eq!(decoded.header.alg, None);
    }

    #[test]
    fn test_signed_parse_needs_exactly_three_segments() {
        for compact in ["a.b", "a.b.c.d", "abc"] {
            assert!(matches!(
                Token::parse(compact, &Algorithm::ALL),
                Err(TokenError::MalformedCompactForm(_))
            ));
        }
    }

    #[test]
    fn test_null_claims_are_empty() {
        let header = base64_url_encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let compact = format!("{header}.{}.", base64_url_encode(b"null"));
        assert!(matches!(
            Token::parse(&compact, &Algorithm::ALL),
            Err(TokenError::EmptyClaimsOrToken(_))
        ));
    }

    #[test]
    fn test_algorithm_is_resolved_before_claims() {
        let header = base64_url_encode(br#"{"alg":"none"}"#);
        let compact = format!("{header}.!!not-base64!!.!!");
        assert!(matches!(
            Token::parse(&compact, &Algorithm::ALL),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_disallowed_algorithm_is_unsupported() {
        let header = base64_url_encode(br#"{"alg":"HS256"}"#);
        let compact = format!("{header}.{}.", base64_url_encode(b"{}"));
        assert!(matches!(
            Token::parse(&compact, &[Algorithm::Es256]),
            Err(TokenError::UnsupportedAlgorithm(_))
        ));
        let token = Token::parse(&compact, &[Algorithm::Hs256]).unwrap();
        assert_eq!(token.signing_input(), &compact[..compact.len() - 1]);
    }

    #[test]
    fn test_sign_then_verify_hs256() {
        let key = SigningKey::hmac([7u8; 32]);
        let compact = sign(
            &Header::new(Algorithm::Hs256),
            &Claims::new().with("sub", "alice"),
            &key,
        )
        .unwrap();
        let token = Token::parse(&compact, &Algorithm::ALL).unwrap();
        token.verify_signature(&key.verifying_key()).unwrap();
        assert_eq!(token.claims().get("sub").and_then(|v| v.as_str()), Some("alice"));
    }
}
