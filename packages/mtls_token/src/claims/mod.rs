//! Token claims: an open map with typed access to the reserved claims
//!
//! Custom claims of any shape pass through untouched. The reserved claims
//! (`iat`, `exp`, `nbf`, `cnf`) are read through accessors that refuse to
//! reinterpret a claim of the wrong shape: a `cnf` that is not an object is a
//! [`TokenError::ClaimShapeConflict`], not something to overwrite.

mod standard_claims;
mod validation;
mod value;

pub use standard_claims::{Confirmation, PopClaims};
pub use value::{ClaimMap, ClaimValue};

use crate::channel::Thumbprint;
use crate::error::{TokenError, TokenResult};
use chrono::Duration;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Issued-at claim name
pub const ISSUED_AT: &str = "iat";
/// Expiry claim name
pub const EXPIRES_AT: &str = "exp";
/// Not-before claim name
pub const NOT_BEFORE: &str = "nbf";
/// Confirmation claim name
pub const CONFIRMATION: &str = "cnf";
/// Certificate thumbprint member of `cnf`
pub const X5T_S256: &str = "x5t#S256";

/// Claims of one token.
///
/// Serializes as a flat JSON object with keys in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    entries: ClaimMap,
}

impl Claims {
    /// Empty claim set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a claim, builder style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a claim, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ClaimValue>,
    ) -> Option<ClaimValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Claim by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.entries.get(name)
    }

    /// Remove a claim
    pub fn remove(&mut self, name: &str) -> Option<ClaimValue> {
        self.entries.remove(name)
    }

    /// Whether a claim is present
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of top-level claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Claims in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ClaimValue)> {
        self.entries.iter()
    }

    /// Underlying map
    #[must_use]
    pub fn into_inner(self) -> ClaimMap {
        self.entries
    }

    /// `iat` in Unix seconds
    ///
    /// # Errors
    /// `ClaimShapeConflict` when present but not a number
    pub fn issued_at(&self) -> TokenResult<Option<i64>> {
        self.timestamp(ISSUED_AT)
    }

    /// `exp` in Unix seconds
    ///
    /// # Errors
    /// `ClaimShapeConflict` when present but not a number
    pub fn expires_at(&self) -> TokenResult<Option<i64>> {
        self.timestamp(EXPIRES_AT)
    }

    /// `nbf` in Unix seconds
    ///
    /// # Errors
    /// `ClaimShapeConflict` when present but not a number
    pub fn not_before(&self) -> TokenResult<Option<i64>> {
        self.timestamp(NOT_BEFORE)
    }

    /// Set `iat`
    pub fn set_issued_at(&mut self, seconds: i64) {
        self.insert(ISSUED_AT, seconds);
    }

    /// Set `exp`
    pub fn set_expires_at(&mut self, seconds: i64) {
        self.insert(EXPIRES_AT, seconds);
    }

    /// Set `nbf`
    pub fn set_not_before(&mut self, seconds: i64) {
        self.insert(NOT_BEFORE, seconds);
    }

    /// The `cnf` object
    ///
    /// # Errors
    /// `ClaimShapeConflict` when `cnf` is present but not an object
    pub fn confirmation(&self) -> TokenResult<Option<&ClaimMap>> {
        match self.entries.get(CONFIRMATION) {
            None => Ok(None),
            Some(ClaimValue::Map(cnf)) => Ok(Some(cnf)),
            Some(other) => Err(TokenError::ClaimShapeConflict(format!(
                "{CONFIRMATION} must be an object, found {}",
                other.kind()
            ))),
        }
    }

    /// `cnf.x5t#S256`, the thumbprint this token is bound to
    ///
    /// # Errors
    /// `ClaimShapeConflict` when `cnf` is not an object or the thumbprint is not a string
    pub fn certificate_thumbprint(&self) -> TokenResult<Option<&str>> {
        let Some(cnf) = self.confirmation()? else {
            return Ok(None);
        };
        match cnf.get(X5T_S256) {
            None => Ok(None),
            Some(ClaimValue::Text(thumbprint)) => Ok(Some(thumbprint)),
            Some(other) => Err(TokenError::ClaimShapeConflict(format!(
                "{CONFIRMATION}.{X5T_S256} must be a string, found {}",
                other.kind()
            ))),
        }
    }

    /// Fill in the claims every issued token carries.
    ///
    /// - `iat` defaults to `now`
    /// - `exp` defaults to `iat + lifetime`
    /// - `cnf.x5t#S256` defaults to `thumbprint`; other `cnf` members are
    ///   kept and an existing thumbprint is never replaced
    ///
    /// # Errors
    /// `ClaimShapeConflict` when a reserved claim already exists with the wrong
    /// shape, `exp` is not after `iat`, or any claim holds NaN or infinity
    pub fn apply_defaults(
        &mut self,
        thumbprint: &Thumbprint,
        now: i64,
        lifetime: Duration,
    ) -> TokenResult<()> {
        for (name, value) in &self.entries {
            reject_non_finite(name, value)?;
        }
        let issued_at = match self.issued_at()? {
            Some(iat) => iat,
            None => {
                self.set_issued_at(now);
                now
            }
        };

        let expires_at = match self.expires_at()? {
            Some(exp) => exp,
            None => {
                let exp = issued_at
                    .checked_add(lifetime.num_seconds())
                    .ok_or_else(|| TokenError::claim_shape("exp overflows i64"))?;
                self.set_expires_at(exp);
                exp
            }
        };
        if expires_at <= issued_at {
            return Err(TokenError::ClaimShapeConflict(format!(
                "exp {expires_at} must be after iat {issued_at}"
            )));
        }

        // shape check before touching cnf
        self.certificate_thumbprint()?;
        if let Some(cnf) = self
            .entries
            .entry(CONFIRMATION.to_string())
            .or_insert_with(|| ClaimValue::Map(ClaimMap::new()))
            .as_map_mut()
        {
            cnf.entry(X5T_S256.to_string())
                .or_insert_with(|| thumbprint.as_str().into());
        }
        Ok(())
    }

    /// View these claims as a fixed-schema struct
    ///
    /// # Errors
    /// `ClaimShapeConflict` when the claims do not fit `T`
    pub fn to_typed<T: DeserializeOwned>(&self) -> TokenResult<T> {
        let value = serde_json::to_value(&self.entries)
            .map_err(|e| TokenError::serialization(&e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TokenError::claim_shape(&e.to_string()))
    }

    /// Build claims from a fixed-schema struct
    ///
    /// # Errors
    /// `ClaimShapeConflict` when `typed` does not serialize to a JSON object
    pub fn from_typed<T: Serialize>(typed: &T) -> TokenResult<Self> {
        let value =
            serde_json::to_value(typed).map_err(|e| TokenError::serialization(&e.to_string()))?;
        serde_json::from_value(value).map_err(|e| TokenError::claim_shape(&e.to_string()))
    }

    fn timestamp(&self, name: &str) -> TokenResult<Option<i64>> {
        match self.entries.get(name) {
            None => Ok(None),
            Some(ClaimValue::Integer(seconds)) => Ok(Some(*seconds)),
            // other issuers emit e.g. 1521644867.0; drop the fraction
            #[allow(clippy::cast_possible_truncation)]
            Some(ClaimValue::Float(seconds)) if seconds.is_finite() => Ok(Some(*seconds as i64)),
            Some(other) => Err(TokenError::ClaimShapeConflict(format!(
                "{name} must be a number, found {}",
                other.kind()
            ))),
        }
    }
}

// JSON has no NaN or infinity; serde_json would write them as null
fn reject_non_finite(path: &str, value: &ClaimValue) -> TokenResult<()> {
    match value {
        ClaimValue::Float(number) if !number.is_finite() => Err(TokenError::ClaimShapeConflict(
            format!("{path} must be a finite number, found {number}"),
        )),
        ClaimValue::Sequence(items) => items
            .iter()
            .try_for_each(|item| reject_non_finite(path, item)),
        ClaimValue::Map(map) => map
            .iter()
            .try_for_each(|(name, item)| reject_non_finite(&format!("{path}.{name}"), item)),
        _ => Ok(()),
    }
}

impl From<ClaimMap> for Claims {
    fn from(entries: ClaimMap) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<ClaimValue>> FromIterator<(K, V)> for Claims {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Claims {
    type Item = (String, ClaimValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ClaimValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_521_644_867;

    fn thumbprint() -> Thumbprint {
        Thumbprint::from_certificate_der(b"client")
    }

    fn defaulted(mut claims: Claims) -> TokenResult<Claims> {
        claims.apply_defaults(&thumbprint(), NOW, Duration::hours(1))?;
        Ok(claims)
    }

    #[test]
    fn test_time_claims_default_from_now() {
        let claims = defaulted(Claims::new().with("iss", "iss")).unwrap();
        assert_eq!(claims.issued_at().unwrap(), Some(NOW));
        assert_eq!(claims.expires_at().unwrap(), Some(NOW + 3600));
        assert_eq!(claims.get("iss"), Some(&ClaimValue::from("iss")));
    }

    #[test]
    fn test_explicit_exp_is_kept() {
        let claims = defaulted(Claims::new().with("exp", NOW + 10)).unwrap();
        assert_eq!(claims.expires_at().unwrap(), Some(NOW + 10));
        assert_eq!(claims.issued_at().unwrap(), Some(NOW));
    }

    #[test]
    fn test_exp_not_after_iat_is_a_conflict() {
        for exp in [NOW - 100, NOW] {
            let err = defaulted(Claims::new().with("exp", exp)).unwrap_err();
            assert!(matches!(err, TokenError::ClaimShapeConflict(_)), "{exp}");
        }
        let err = defaulted(Claims::new().with("iat", 50).with("exp", 10)).unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
    }

    #[test]
    fn test_sub_second_lifetime_cannot_default_exp() {
        let mut claims = Claims::new();
        let err = claims
            .apply_defaults(&thumbprint(), NOW, Duration::milliseconds(500))
            .unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
    }

    #[test]
    fn test_non_finite_numbers_are_a_conflict() {
        for number in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = defaulted(Claims::new().with("ratio", number)).unwrap_err();
            assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
        }

        let mut nested = ClaimMap::new();
        nested.insert("values".to_string(), vec![1.5, f64::NAN].into());
        let err = defaulted(Claims::new().with("stats", nested)).unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));

        assert!(defaulted(Claims::new().with("ratio", 0.25)).is_ok());
    }

    #[test]
    fn test_exp_defaults_from_explicit_iat() {
        let claims = defaulted(Claims::new().with("iat", 1)).unwrap();
        assert_eq!(claims.issued_at().unwrap(), Some(1));
        assert_eq!(claims.expires_at().unwrap(), Some(3601));
    }

    #[test]
    fn test_binding_is_added_when_cnf_is_absent() {
        let claims = defaulted(Claims::new()).unwrap();
        assert_eq!(
            claims.certificate_thumbprint().unwrap(),
            Some(thumbprint().as_str())
        );
    }

    #[test]
    fn test_binding_joins_existing_cnf_members() {
        let mut cnf = ClaimMap::new();
        cnf.insert("jkt".to_string(), "key-thumbprint".into());
        let claims = defaulted(Claims::new().with(CONFIRMATION, cnf)).unwrap();

        let cnf = claims.confirmation().unwrap().unwrap();
        assert_eq!(cnf["jkt"], ClaimValue::from("key-thumbprint"));
        assert_eq!(cnf[X5T_S256], ClaimValue::from(thumbprint().as_str()));
    }

    #[test]
    fn test_pinned_binding_is_never_replaced() {
        let mut cnf = ClaimMap::new();
        cnf.insert(X5T_S256.to_string(), "pinned".into());
        let claims = defaulted(Claims::new().with(CONFIRMATION, cnf)).unwrap();
        assert_eq!(claims.certificate_thumbprint().unwrap(), Some("pinned"));
    }

    #[test]
    fn test_non_object_cnf_is_a_conflict() {
        let err = defaulted(Claims::new().with(CONFIRMATION, "thumbprint")).unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
    }

    #[test]
    fn test_non_string_binding_is_a_conflict() {
        let mut cnf = ClaimMap::new();
        cnf.insert(X5T_S256.to_string(), 7.into());
        let err = defaulted(Claims::new().with(CONFIRMATION, cnf)).unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
    }

    #[test]
    fn test_non_numeric_iat_is_a_conflict() {
        let err = defaulted(Claims::new().with("iat", "yesterday")).unwrap_err();
        assert!(matches!(err, TokenError::ClaimShapeConflict(_)));
    }

    #[test]
    fn test_float_timestamps_are_truncated() {
        let claims = Claims::new().with("exp", 1_521_644_867.9);
        assert_eq!(claims.expires_at().unwrap(), Some(1_521_644_867));
    }

    #[test]
    fn test_serializes_with_sorted_keys() {
        let claims = Claims::new().with("iss", "iss").with("aud", "aud");
        assert_eq!(
            serde_json::to_string(&claims).unwrap(),
            r#"{"aud":"aud","iss":"iss"}"#
        );
    }
}
