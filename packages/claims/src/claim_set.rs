//! The immutable claim set and its typed accessors.

use crate::error::{ClaimsError, ClaimsResult};
use crate::names::{
    AUDIENCE, ClaimNameValidator, EXPIRATION, ISSUED_AT, ISSUER, JWT_ID, NOT_BEFORE,
    RegisteredClaims, SUBJECT,
};
use crate::options::ParseOptions;
use crate::parser::{ClaimMap, parse_claims};
use crate::value::{ClaimKind, ClaimValue, epoch_seconds};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// An immutable, validated JWT claim set.
///
/// Produced by [`ClaimSetBuilder::build`](crate::ClaimSetBuilder::build) or by
/// [`ClaimSet::from_json`]. If the audience claim is present it is always a non-empty
/// array of strings. Typed getters never coerce: asking for the wrong shape, or reading
/// a null claim, is an error naming the claim.
#[derive(Debug, Clone)]
pub struct ClaimSet<V = RegisteredClaims> {
    claims: ClaimMap,
    validator: V,
}

impl ClaimSet {
    /// Parse an untrusted JSON payload with the registered claim table and default limits.
    ///
    /// # Errors
    /// Returns an invalid-input error if the text is not a JSON object, repeats a claim
    /// name, exceeds the default limits, or a registered claim has the wrong shape.
    pub fn from_json(text: &str) -> ClaimsResult<Self> {
        Self::from_json_with(text, RegisteredClaims, &ParseOptions::default())
    }
}

impl<V: ClaimNameValidator> ClaimSet<V> {
    /// Parse an untrusted JSON payload with an explicit name policy and limits.
    ///
    /// # Errors
    /// See [`ClaimSet::from_json`].
    pub fn from_json_with(text: &str, validator: V, options: &ParseOptions) -> ClaimsResult<Self> {
        let claims = parse_claims(text, options)?;
        Ok(Self::from_parts(claims, validator))
    }

    pub(crate) fn from_parts(claims: ClaimMap, validator: V) -> Self {
        Self { claims, validator }
    }

    /// Serialize to JSON text, claims in insertion order.
    ///
    /// The builder bounds nesting but not size: a set whose text exceeds
    /// [`ParseOptions::max_payload_len`] parses back only with a larger limit.
    ///
    /// # Errors
    /// Returns [`ClaimsError::Serialization`] if the serializer fails.
    pub fn to_json(&self) -> ClaimsResult<String> {
        serde_json::to_string(self).map_err(|err| ClaimsError::Serialization(err.to_string()))
    }

    /// Number of claims
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Whether the set holds no claims
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Raw value of any claim, registered or custom
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    /// All claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.claims.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Names of all claims that are not registered names
    #[must_use]
    pub fn custom_claim_names(&self) -> HashSet<String> {
        self.claims
            .keys()
            .filter(|name| !self.validator.is_registered_name(name))
            .cloned()
            .collect()
    }

    /// Whether the issuer (`iss`) claim is present
    #[must_use]
    pub fn has_issuer(&self) -> bool {
        self.claims.contains_key(ISSUER)
    }

    /// Principal that issued the token.
    ///
    /// # Errors
    /// Fails if `iss` is absent.
    pub fn get_issuer(&self) -> ClaimsResult<&str> {
        self.string_claim(ISSUER)
    }

    /// Whether the subject (`sub`) claim is present
    #[must_use]
    pub fn has_subject(&self) -> bool {
        self.claims.contains_key(SUBJECT)
    }

    /// Principal the token is about.
    ///
    /// # Errors
    /// Fails if `sub` is absent.
    pub fn get_subject(&self) -> ClaimsResult<&str> {
        self.string_claim(SUBJECT)
    }

    /// Whether the JWT ID (`jti`) claim is present
    #[must_use]
    pub fn has_jwt_id(&self) -> bool {
        self.claims.contains_key(JWT_ID)
    }

    /// Unique identifier of the token.
    ///
    /// # Errors
    /// Fails if `jti` is absent.
    pub fn get_jwt_id(&self) -> ClaimsResult<&str> {
        self.string_claim(JWT_ID)
    }

    /// Whether the audience (`aud`) claim is present
    #[must_use]
    pub fn has_audiences(&self) -> bool {
        self.claims.contains_key(AUDIENCE)
    }

    /// Audiences in the order they were given. Never empty.
    ///
    /// # Errors
    /// Fails if `aud` is absent.
    pub fn get_audiences(&self) -> ClaimsResult<Vec<String>> {
        match self.lookup(AUDIENCE)? {
            ClaimValue::Array(text) => text
                .string_items()
                .map_err(|_| ClaimsError::NonStringAudience(AUDIENCE.to_string())),
            other => Err(ClaimsError::type_mismatch(
                AUDIENCE,
                ClaimKind::Array,
                other.kind(),
            )),
        }
    }

    /// Whether the expiration (`exp`) claim is present
    #[must_use]
    pub fn has_expiration(&self) -> bool {
        self.claims.contains_key(EXPIRATION)
    }

    /// Instant on or after which the token must not be accepted.
    ///
    /// # Errors
    /// Fails if `exp` is absent.
    pub fn get_expiration(&self) -> ClaimsResult<DateTime<Utc>> {
        self.timestamp_claim(EXPIRATION)
    }

    /// Whether the not-before (`nbf`) claim is present
    #[must_use]
    pub fn has_not_before(&self) -> bool {
        self.claims.contains_key(NOT_BEFORE)
    }

    /// Instant before which the token must not be accepted.
    ///
    /// # Errors
    /// Fails if `nbf` is absent.
    pub fn get_not_before(&self) -> ClaimsResult<DateTime<Utc>> {
        self.timestamp_claim(NOT_BEFORE)
    }

    /// Whether the issued-at (`iat`) claim is present
    #[must_use]
    pub fn has_issued_at(&self) -> bool {
        self.claims.contains_key(ISSUED_AT)
    }

    /// Instant at which the token was issued.
    ///
    /// # Errors
    /// Fails if `iat` is absent.
    pub fn get_issued_at(&self) -> ClaimsResult<DateTime<Utc>> {
        self.timestamp_claim(ISSUED_AT)
    }

    /// Whether a custom claim is present (null counts as present).
    ///
    /// # Errors
    /// Fails if `name` is not a valid custom claim name.
    pub fn has_claim(&self, name: &str) -> ClaimsResult<bool> {
        self.validator.validate(name)?;
        Ok(self.claims.contains_key(name))
    }

    /// Whether a custom claim is present with value null.
    ///
    /// # Errors
    /// Fails if `name` is not a valid custom claim name.
    pub fn is_null_claim(&self, name: &str) -> ClaimsResult<bool> {
        self.validator.validate(name)?;
        Ok(self.claims.get(name).is_some_and(ClaimValue::is_null))
    }

    /// Value of a custom boolean claim.
    ///
    /// # Errors
    /// Fails on an invalid name, an absent or null claim, or a non-boolean value.
    pub fn get_boolean_claim(&self, name: &str) -> ClaimsResult<bool> {
        self.validator.validate(name)?;
        match self.lookup(name)? {
            ClaimValue::Bool(flag) => Ok(*flag),
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::Bool, other.kind())),
        }
    }

    /// Value of a custom number claim; integral and floating literals both qualify.
    ///
    /// # Errors
    /// Fails on an invalid name, an absent or null claim, or a non-number value.
    pub fn get_number_claim(&self, name: &str) -> ClaimsResult<f64> {
        self.validator.validate(name)?;
        match self.lookup(name)? {
            ClaimValue::Number(number) => number.as_f64().ok_or_else(|| {
                ClaimsError::type_mismatch(name, ClaimKind::Number, ClaimKind::Number)
            }),
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::Number, other.kind())),
        }
    }

    /// Value of a custom string claim.
    ///
    /// # Errors
    /// Fails on an invalid name, an absent or null claim, or a non-string value.
    pub fn get_string_claim(&self, name: &str) -> ClaimsResult<&str> {
        self.validator.validate(name)?;
        self.string_claim(name)
    }

    /// The claim's JSON object text.
    ///
    /// # Errors
    /// Fails on an invalid name, an absent or null claim, or a non-object value.
    pub fn get_json_object_claim(&self, name: &str) -> ClaimsResult<&str> {
        self.validator.validate(name)?;
        match self.lookup(name)? {
            ClaimValue::Object(text) => Ok(text.as_str()),
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::Object, other.kind())),
        }
    }

    /// The claim's JSON array text.
    ///
    /// # Errors
    /// Fails on an invalid name, an absent or null claim, or a non-array value.
    pub fn get_json_array_claim(&self, name: &str) -> ClaimsResult<&str> {
        self.validator.validate(name)?;
        match self.lookup(name)? {
            ClaimValue::Array(text) => Ok(text.as_str()),
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::Array, other.kind())),
        }
    }

    /// Present and non-null, or the matching error.
    fn lookup(&self, name: &str) -> ClaimsResult<&ClaimValue> {
        match self.claims.get(name) {
            None => Err(ClaimsError::MissingClaim(name.to_string())),
            Some(ClaimValue::Null) => Err(ClaimsError::NullClaim(name.to_string())),
            Some(value) => Ok(value),
        }
    }

    fn string_claim(&self, name: &str) -> ClaimsResult<&str> {
        match self.lookup(name)? {
            ClaimValue::String(text) => Ok(text),
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::String, other.kind())),
        }
    }

    fn timestamp_claim(&self, name: &str) -> ClaimsResult<DateTime<Utc>> {
        match self.lookup(name)? {
            ClaimValue::Number(number) => {
                let seconds = epoch_seconds(name, number)?;
                DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                    ClaimsError::TimestampOutOfRange {
                        claim: name.to_string(),
                        value: number.to_string(),
                    }
                })
            }
            other => Err(ClaimsError::type_mismatch(name, ClaimKind::Number, other.kind())),
        }
    }
}

/// Equal when both sets hold the same claims, regardless of order.
impl<V, W> PartialEq<ClaimSet<W>> for ClaimSet<V> {
    fn eq(&self, other: &ClaimSet<W>) -> bool {
        self.claims == other.claims
    }
}

impl<V> Serialize for ClaimSet<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.claims.serialize(serializer)
    }
}
