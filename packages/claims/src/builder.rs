//! Claim set builder
//!
//! Registered claims have their own typed setters; custom claims go through the name
//! policy first and are rejected on the spot if the name is empty, malformed, or
//! registered. Nothing is deferred to [`ClaimSetBuilder::build`].

use crate::claim_set::ClaimSet;
use crate::error::{ClaimsError, ClaimsResult};
use crate::limits::{MAX_TIMESTAMP, MIN_TIMESTAMP};
use crate::names::{
    AUDIENCE, ClaimNameValidator, EXPIRATION, ISSUED_AT, ISSUER, JWT_ID, NOT_BEFORE,
    RegisteredClaims, SUBJECT,
};
use crate::parser::ClaimMap;
use crate::value::{ClaimKind, ClaimValue, JsonText};
use chrono::{DateTime, Utc};
use serde_json::Number;

/// Builder for [`ClaimSet`]
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use cryypt_claims::ClaimSetBuilder;
///
/// # fn main() -> cryypt_claims::ClaimsResult<()> {
/// let claims = ClaimSetBuilder::new()
///     .set_issuer("issuer")
///     .add_audience("api")
///     .set_expiration(Utc.timestamp_opt(1_700_000_000, 0).unwrap())?
///     .add_string_claim("role", "admin")?
///     .build();
///
/// assert_eq!(claims.get_audiences()?, vec!["api"]);
/// assert_eq!(claims.get_string_claim("role")?, "admin");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClaimSetBuilder<V = RegisteredClaims> {
    claims: ClaimMap,
    audiences: Vec<String>,
    validator: V,
}

impl ClaimSetBuilder {
    /// Create an empty builder using the registered claim table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_validator(RegisteredClaims)
    }
}

impl Default for ClaimSetBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ClaimNameValidator + Clone> ClaimSetBuilder<V> {
    /// Create an empty builder with an explicit claim name policy
    #[must_use]
    pub fn with_validator(validator: V) -> Self {
        Self {
            claims: ClaimMap::new(),
            audiences: Vec::new(),
            validator,
        }
    }

    fn insert(mut self, name: &str, value: ClaimValue) -> Self {
        self.claims.insert(name.to_string(), value);
        self
    }

    /// Set the issuer claim.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.1>
    #[must_use]
    pub fn set_issuer(self, value: impl Into<String>) -> Self {
        self.insert(ISSUER, ClaimValue::String(value.into()))
    }

    /// Set the subject claim.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.2>
    #[must_use]
    pub fn set_subject(self, value: impl Into<String>) -> Self {
        self.insert(SUBJECT, ClaimValue::String(value.into()))
    }

    /// Set the JWT ID claim.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.7>
    #[must_use]
    pub fn set_jwt_id(self, value: impl Into<String>) -> Self {
        self.insert(JWT_ID, ClaimValue::String(value.into()))
    }

    /// Append an audience. Repeated calls keep call order, duplicates included.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.3>
    #[must_use]
    pub fn add_audience(mut self, value: impl Into<String>) -> Self {
        self.audiences.push(value.into());
        let audiences = JsonText::string_array(&self.audiences);
        self.insert(AUDIENCE, ClaimValue::Array(audiences))
    }

    /// Set the expiration claim, truncated to whole seconds.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.4>
    ///
    /// # Errors
    /// Fails if the instant is before the Unix epoch or after year 9999.
    pub fn set_expiration(self, value: DateTime<Utc>) -> ClaimsResult<Self> {
        self.set_timestamp(EXPIRATION, value)
    }

    /// Set the not-before claim, truncated to whole seconds.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.5>
    ///
    /// # Errors
    /// Fails if the instant is before the Unix epoch or after year 9999.
    pub fn set_not_before(self, value: DateTime<Utc>) -> ClaimsResult<Self> {
        self.set_timestamp(NOT_BEFORE, value)
    }

    /// Set the issued-at claim, truncated to whole seconds.
    ///
    /// <https://tools.ietf.org/html/rfc7519#section-4.1.6>
    ///
    /// # Errors
    /// Fails if the instant is before the Unix epoch or after year 9999.
    pub fn set_issued_at(self, value: DateTime<Utc>) -> ClaimsResult<Self> {
        self.set_timestamp(ISSUED_AT, value)
    }

    fn set_timestamp(self, name: &str, value: DateTime<Utc>) -> ClaimsResult<Self> {
        // Sub-second precision is dropped; in range, timestamp() truncates.
        let seconds = value.timestamp();
        if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&seconds) {
            return Err(ClaimsError::invalid_argument(
                name,
                format!("{value} is outside the accepted timestamp range"),
            ));
        }
        Ok(self.insert(name, ClaimValue::Number(Number::from(seconds))))
    }

    /// Add a custom boolean claim.
    ///
    /// # Errors
    /// Fails if `name` is rejected by the claim name policy.
    pub fn add_boolean_claim(self, name: &str, value: bool) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        Ok(self.insert(name, ClaimValue::Bool(value)))
    }

    /// Add a custom number claim.
    ///
    /// # Errors
    /// Fails if `name` is rejected, or `value` is NaN or infinite.
    pub fn add_number_claim(self, name: &str, value: f64) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        let number = Number::from_f64(value).ok_or_else(|| {
            ClaimsError::invalid_argument(name, "NaN and infinity cannot be represented in JSON")
        })?;
        Ok(self.insert(name, ClaimValue::Number(number)))
    }

    /// Add a custom string claim.
    ///
    /// # Errors
    /// Fails if `name` is rejected by the claim name policy.
    pub fn add_string_claim(self, name: &str, value: impl Into<String>) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        Ok(self.insert(name, ClaimValue::String(value.into())))
    }

    /// Add a custom claim whose value is JSON null.
    ///
    /// # Errors
    /// Fails if `name` is rejected by the claim name policy.
    pub fn add_null_claim(self, name: &str) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        Ok(self.insert(name, ClaimValue::Null))
    }

    /// Add a custom claim from JSON object text. The text is stored as given.
    ///
    /// # Errors
    /// Fails if `name` is rejected, or `json` is not a well-formed JSON object.
    pub fn add_json_object_claim(self, name: &str, json: &str) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        let text = JsonText::parse(name, json, ClaimKind::Object)?;
        Ok(self.insert(name, ClaimValue::Object(text)))
    }

    /// Add a custom claim from JSON array text. The text is stored as given.
    ///
    /// # Errors
    /// Fails if `name` is rejected, or `json` is not a well-formed JSON array.
    pub fn add_json_array_claim(self, name: &str, json: &str) -> ClaimsResult<Self> {
        self.validator.validate(name)?;
        let text = JsonText::parse(name, json, ClaimKind::Array)?;
        Ok(self.insert(name, ClaimValue::Array(text)))
    }

    /// Snapshot the current claims into an immutable [`ClaimSet`].
    ///
    /// The builder stays usable; later changes do not reach sets already built.
    #[must_use]
    pub fn build(&self) -> ClaimSet<V> {
        tracing::trace!(claims = self.claims.len(), "building JWT claim set");
        ClaimSet::from_parts(self.claims.clone(), self.validator.clone())
    }
}
