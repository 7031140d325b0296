//! Parsing untrusted JSON text into a claim set.
//!
//! Limits are checked first (length, then nesting depth), then the text is parsed as an
//! object whose member values are captured as raw JSON. Registered claims are validated
//! in a fixed order: `iss`/`sub`/`jti` must be strings, `exp`/`nbf`/`iat` numbers within
//! the timestamp range, and `aud` a string (normalized to a one-element array) or a
//! non-empty array of strings. Custom claims pass through unexamined.

use crate::error::{ClaimsError, ClaimsResult};
use crate::names::{AUDIENCE, EXPIRATION, ISSUED_AT, ISSUER, JWT_ID, NOT_BEFORE, SUBJECT};
use crate::options::ParseOptions;
use crate::value::{ClaimKind, ClaimValue, JsonText, epoch_seconds};
use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::value::RawValue;
use std::fmt;

pub(crate) type ClaimMap = IndexMap<String, ClaimValue>;

/// Parse and validate `text` into an ordered claim map.
pub(crate) fn parse_claims(text: &str, options: &ParseOptions) -> ClaimsResult<ClaimMap> {
    let result = parse_and_validate(text, options);
    match &result {
        Ok(claims) => tracing::debug!(claims = claims.len(), "accepted JWT payload"),
        Err(err) => tracing::debug!(claim = ?err.claim(), error = %err, "rejected JWT payload"),
    }
    result
}

fn parse_and_validate(text: &str, options: &ParseOptions) -> ClaimsResult<ClaimMap> {
    if text.len() > options.max_payload_len {
        return Err(ClaimsError::PayloadTooLarge {
            size: text.len(),
            max: options.max_payload_len,
        });
    }
    check_nesting_depth(text, options.max_nesting_depth)?;

    if !text.trim_start().starts_with('{') {
        return Err(match serde_json::from_str::<IgnoredAny>(text) {
            Ok(_) => ClaimsError::NotAnObject,
            Err(err) => ClaimsError::MalformedJson(err.to_string()),
        });
    }
    let RawClaims { members, duplicate } = serde_json::from_str(text)?;
    if let Some(name) = duplicate {
        return Err(ClaimsError::DuplicateClaim(name));
    }

    let mut claims = ClaimMap::with_capacity(members.len());
    for (name, raw) in members {
        let value = ClaimValue::from_raw(&raw)?;
        claims.insert(name, value);
    }

    for name in [ISSUER, SUBJECT, JWT_ID] {
        validate_string_claim(&claims, name)?;
    }
    for name in [EXPIRATION, NOT_BEFORE, ISSUED_AT] {
        validate_timestamp_claim(&claims, name)?;
    }
    normalize_audience(&mut claims)?;
    Ok(claims)
}

fn validate_string_claim(claims: &ClaimMap, name: &str) -> ClaimsResult<()> {
    match claims.get(name) {
        None | Some(ClaimValue::String(_)) => Ok(()),
        Some(_) => Err(ClaimsError::wrong_claim_type(name, ClaimKind::String)),
    }
}

fn validate_timestamp_claim(claims: &ClaimMap, name: &str) -> ClaimsResult<()> {
    match claims.get(name) {
        None => Ok(()),
        Some(ClaimValue::Number(number)) => epoch_seconds(name, number).map(|_| ()),
        Some(_) => Err(ClaimsError::wrong_claim_type(name, ClaimKind::Number)),
    }
}

/// A bare string audience becomes a one-element array; an array must hold only strings
/// and at least one of them.
fn normalize_audience(claims: &mut ClaimMap) -> ClaimsResult<()> {
    let Some(value) = claims.get_mut(AUDIENCE) else {
        return Ok(());
    };
    match value {
        ClaimValue::String(audience) => {
            let normalized = JsonText::string_array(std::slice::from_ref(audience));
            *value = ClaimValue::Array(normalized);
            Ok(())
        }
        ClaimValue::Array(text) => {
            let audiences = text
                .string_items()
                .map_err(|_| ClaimsError::NonStringAudience(AUDIENCE.to_string()))?;
            if audiences.is_empty() {
                return Err(ClaimsError::EmptyAudience(AUDIENCE.to_string()));
            }
            Ok(())
        }
        _ => Err(ClaimsError::wrong_claim_type(AUDIENCE, ClaimKind::Array)),
    }
}

/// Linear scan for object/array nesting deeper than `max`, ignoring brackets inside
/// string literals. Runs before the recursive JSON parser sees the text.
pub(crate) fn check_nesting_depth(text: &str, max: usize) -> ClaimsResult<()> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in text.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > max {
                    return Err(ClaimsError::NestingTooDeep { max });
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

/// Top-level object members, in document order, with the first repeated name.
struct RawClaims {
    members: IndexMap<String, Box<RawValue>>,
    duplicate: Option<String>,
}

impl<'de> Deserialize<'de> for RawClaims {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RawClaimsVisitor)
    }
}

struct RawClaimsVisitor;

impl<'de> Visitor<'de> for RawClaimsVisitor {
    type Value = RawClaims;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object of claims")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut members = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
        let mut duplicate = None;
        while let Some(name) = map.next_key::<String>()? {
            let value = map.next_value::<Box<RawValue>>()?;
            if members.contains_key(&name) {
                duplicate.get_or_insert(name);
                continue;
            }
            members.insert(name, value);
        }
        Ok(RawClaims { members, duplicate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_scan_counts_containers() {
        assert!(check_nesting_depth(r#"{"a":{"b":[1]}}"#, 3).is_ok());
        assert_eq!(
            check_nesting_depth(r#"{"a":{"b":[1]}}"#, 2),
            Err(ClaimsError::NestingTooDeep { max: 2 })
        );
    }

    #[test]
    fn depth_scan_ignores_brackets_in_strings() {
        assert!(check_nesting_depth(r#"{"a":"[[[[{{{{"}"#, 1).is_ok());
        assert!(check_nesting_depth(r#"{"a":"\"[[[["}"#, 1).is_ok());
        assert!(check_nesting_depth(r#"{"a\\":[[1]]}"#, 2).is_err());
    }

    #[test]
    fn duplicate_names_are_reported() {
        let err = parse_claims(r#"{"sub":"a","x":1,"sub":"b"}"#, &ParseOptions::default())
            .unwrap_err();
        assert_eq!(err, ClaimsError::DuplicateClaim("sub".to_string()));
    }

    #[test]
    fn audience_string_is_normalized_in_place() {
        let claims = parse_claims(r#"{"aud":"foo"}"#, &ParseOptions::default()).unwrap();
        match claims.get(AUDIENCE) {
            Some(ClaimValue::Array(text)) => assert_eq!(text.as_str(), r#"["foo"]"#),
            other => panic!("unexpected audience {other:?}"),
        }
    }
}
