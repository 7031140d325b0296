//! The JSON shapes a claim may hold.
//!
//! Nested objects and arrays are kept as opaque JSON text and never walked after they
//! have been validated once. Numbers keep the exact literal kind (`serde_json::Number`
//! tracks unsigned, signed and floating values separately) so that `1700000000` and
//! `1700000000.0` are both numbers and both read back as the same instant.

use crate::error::{ClaimsError, ClaimsResult};
use crate::limits::{DEFAULT_MAX_NESTING_DEPTH, MAX_TIMESTAMP, MIN_TIMESTAMP};
use crate::parser::check_nesting_depth;
use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

/// Shape tag of a [`ClaimValue`], used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    /// JSON string
    String,
    /// JSON number
    Number,
    /// JSON `true` / `false`
    Bool,
    /// JSON `null`
    Null,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClaimKind::String => "string",
            ClaimKind::Number => "number",
            ClaimKind::Bool => "boolean",
            ClaimKind::Null => "null",
            ClaimKind::Object => "JSON object",
            ClaimKind::Array => "JSON array",
        };
        f.write_str(name)
    }
}

/// Immutable, validated JSON text of a nested object or array claim.
///
/// Cloning shares the text; nothing can mutate it, so sets built from a reused builder
/// never observe each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonText(Arc<str>);

impl JsonText {
    /// Validate `text` as JSON of the `expected` shape.
    ///
    /// The claim sits one level below the top-level object, so it may nest at most
    /// `DEFAULT_MAX_NESTING_DEPTH - 1` levels for the set to parse back with default limits.
    pub(crate) fn parse(claim: &str, text: &str, expected: ClaimKind) -> ClaimsResult<Self> {
        let malformed = |reason: String| ClaimsError::MalformedNestedJson {
            claim: claim.to_string(),
            expected,
            reason,
        };
        check_nesting_depth(text, DEFAULT_MAX_NESTING_DEPTH - 1)
            .map_err(|err| malformed(err.to_string()))?;
        let raw: Box<RawValue> =
            serde_json::from_str(text).map_err(|err| malformed(err.to_string()))?;
        let opening = match expected {
            ClaimKind::Object => b'{',
            ClaimKind::Array => b'[',
            _ => return Err(malformed(format!("{expected} is not a nested JSON shape"))),
        };
        if raw.get().as_bytes().first() != Some(&opening) {
            return Err(malformed(format!("value is not a {expected}")));
        }
        Ok(Self::from_raw(&raw))
    }

    /// Wrap text the JSON parser has already accepted.
    pub(crate) fn from_raw(raw: &RawValue) -> Self {
        Self(Arc::from(raw.get()))
    }

    /// Encode a list of strings as a JSON array.
    pub(crate) fn string_array(items: &[String]) -> Self {
        Self(Arc::from(Value::from(items.to_vec()).to_string()))
    }

    /// Decode a JSON array whose entries must all be strings.
    pub(crate) fn string_items(&self) -> Result<Vec<String>, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// The JSON text.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JsonText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for JsonText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: &RawValue = serde_json::from_str(&self.0).map_err(S::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Value of a single claim.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// JSON string
    String(String),
    /// JSON number, integral or floating
    Number(Number),
    /// JSON boolean
    Bool(bool),
    /// JSON null; present, but distinct from an absent claim
    Null,
    /// Nested JSON object, kept as text
    Object(JsonText),
    /// Nested JSON array, kept as text
    Array(JsonText),
}

impl ClaimValue {
    /// Shape tag of this value
    #[must_use]
    pub fn kind(&self) -> ClaimKind {
        match self {
            ClaimValue::String(_) => ClaimKind::String,
            ClaimValue::Number(_) => ClaimKind::Number,
            ClaimValue::Bool(_) => ClaimKind::Bool,
            ClaimValue::Null => ClaimKind::Null,
            ClaimValue::Object(_) => ClaimKind::Object,
            ClaimValue::Array(_) => ClaimKind::Array,
        }
    }

    /// Whether this is JSON null
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    /// Classify a raw JSON value by its first byte and decode scalars.
    ///
    /// `raw` has been through the JSON parser, so its text has no leading whitespace and
    /// the first byte determines the shape.
    pub(crate) fn from_raw(raw: &RawValue) -> ClaimsResult<Self> {
        let text = raw.get();
        let value = match text.as_bytes().first() {
            Some(b'"') => ClaimValue::String(serde_json::from_str(text)?),
            Some(b'{') => ClaimValue::Object(JsonText::from_raw(raw)),
            Some(b'[') => ClaimValue::Array(JsonText::from_raw(raw)),
            Some(b't' | b'f') => ClaimValue::Bool(serde_json::from_str(text)?),
            Some(b'n') => ClaimValue::Null,
            _ => ClaimValue::Number(serde_json::from_str(text)?),
        };
        Ok(value)
    }
}

impl Serialize for ClaimValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClaimValue::String(text) => serializer.serialize_str(text),
            ClaimValue::Number(number) => number.serialize(serializer),
            ClaimValue::Bool(flag) => serializer.serialize_bool(*flag),
            ClaimValue::Null => serializer.serialize_unit(),
            ClaimValue::Object(text) | ClaimValue::Array(text) => text.serialize(serializer),
        }
    }
}

/// Interpret a number as whole epoch seconds.
///
/// Integral and floating literals are treated alike; a fractional part is truncated.
/// Values outside `MIN_TIMESTAMP..=MAX_TIMESTAMP` are rejected.
pub(crate) fn epoch_seconds(claim: &str, number: &Number) -> ClaimsResult<i64> {
    let out_of_range = || ClaimsError::TimestampOutOfRange {
        claim: claim.to_string(),
        value: number.to_string(),
    };
    let seconds = match (number.as_i64(), number.as_f64()) {
        (Some(seconds), _) => seconds,
        (None, Some(float))
            if float.is_finite()
                && float >= MIN_TIMESTAMP as f64
                && float < (MAX_TIMESTAMP + 1) as f64 =>
        {
            float.trunc() as i64
        }
        _ => return Err(out_of_range()),
    };
    if !(MIN_TIMESTAMP..=MAX_TIMESTAMP).contains(&seconds) {
        return Err(out_of_range());
    }
    Ok(seconds)
}
