//! Tests for typed claim accessors, error classes and collaborator traits

use cryypt_claims::*;
use std::collections::HashSet;
use std::sync::Arc;

const PAYLOAD: &str = r#"{"iss":"issuer","aud":["api"],"s":"text","n":7,"b":true,"z":null,"o":{"k":"v"},"a":[1,2]}"#;

fn sample() -> ClaimSet {
    ClaimSet::from_json(PAYLOAD).expect("Should parse sample payload")
}

#[test]
fn test_typed_getters_match_stored_shape() {
    let claims = sample();

    assert_eq!(claims.get_string_claim("s").unwrap(), "text");
    assert_eq!(claims.get_number_claim("n").unwrap(), 7.0);
    assert!(claims.get_boolean_claim("b").unwrap());
    assert_eq!(claims.get_json_object_claim("o").unwrap(), r#"{"k":"v"}"#);
    assert_eq!(claims.get_json_array_claim("a").unwrap(), "[1,2]");
}

#[test]
fn test_wrong_typed_getter_is_type_mismatch() {
    let claims = sample();

    let err = claims
        .get_number_claim("s")
        .expect_err("String claim is not a number");
    assert_eq!(
        err,
        ClaimsError::TypeMismatch {
            claim: "s".to_string(),
            expected: ClaimKind::Number,
            found: ClaimKind::String,
        }
    );
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains('s'));

    assert!(matches!(
        claims.get_string_claim("n"),
        Err(ClaimsError::TypeMismatch { found: ClaimKind::Number, .. })
    ));
    assert!(matches!(
        claims.get_boolean_claim("o"),
        Err(ClaimsError::TypeMismatch { found: ClaimKind::Object, .. })
    ));
    assert!(matches!(
        claims.get_json_object_claim("a"),
        Err(ClaimsError::TypeMismatch { found: ClaimKind::Array, .. })
    ));
    assert!(matches!(
        claims.get_json_array_claim("b"),
        Err(ClaimsError::TypeMismatch { found: ClaimKind::Bool, .. })
    ));
    // Numbers are never coerced to strings or booleans
    assert!(claims.get_boolean_claim("n").is_err());
}

#[test]
fn test_null_and_absent_are_distinct() {
    let claims = sample();

    assert!(claims.has_claim("z").unwrap());
    assert!(claims.is_null_claim("z").unwrap());
    assert_eq!(
        claims.get_string_claim("z"),
        Err(ClaimsError::NullClaim("z".to_string()))
    );

    assert!(!claims.has_claim("missing").unwrap());
    assert!(!claims.is_null_claim("missing").unwrap());
    let err = claims
        .get_boolean_claim("missing")
        .expect_err("Absent claim has no value");
    assert_eq!(err, ClaimsError::MissingClaim("missing".to_string()));
    assert!(err.is_invalid_input());

    // Present, non-null claims are not null
    assert!(!claims.is_null_claim("s").unwrap());
}

#[test]
fn test_absent_registered_claims() {
    let claims = ClaimSet::from_json("{}").expect("Should parse empty object");

    for err in [
        claims.get_subject().expect_err("No subject"),
        claims.get_jwt_id().expect_err("No id"),
        claims.get_audiences().expect_err("No audience"),
        claims.get_not_before().expect_err("No not-before"),
    ] {
        assert!(matches!(err, ClaimsError::MissingClaim(_)), "{err}");
    }
}

#[test]
fn test_custom_accessors_reject_registered_names() {
    let claims = sample();

    let err = claims
        .has_claim("iss")
        .expect_err("Registered names are not custom claims");
    assert!(err.is_misuse());
    assert_eq!(err.category(), ErrorCategory::Misuse);

    assert!(claims.is_null_claim("aud").unwrap_err().is_misuse());
    assert!(claims.get_string_claim("iss").unwrap_err().is_misuse());
    assert!(claims.get_json_array_claim("aud").unwrap_err().is_misuse());
    assert!(claims.get_string_claim("").unwrap_err().is_misuse());
}

#[test]
fn test_custom_claim_names_exclude_registered() {
    let expected: HashSet<String> = ["s", "n", "b", "z", "o", "a"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(sample().custom_claim_names(), expected);
}

#[test]
fn test_raw_access_and_iteration() {
    let claims = sample();

    assert_eq!(claims.len(), 8);
    assert_eq!(claims.get("n").map(ClaimValue::kind), Some(ClaimKind::Number));
    assert_eq!(claims.get("aud").map(ClaimValue::kind), Some(ClaimKind::Array));
    assert!(claims.get("z").is_some_and(ClaimValue::is_null));
    assert!(claims.get("missing").is_none());

    let first = claims.iter().next().expect("Should have a first claim");
    assert_eq!(first, ("iss", &ClaimValue::String("issuer".to_string())));
}

#[test]
fn test_to_json_reparses_to_equal_set() {
    let claims = sample();
    let json = claims.to_json().expect("Should serialize");

    assert_eq!(json, PAYLOAD);
    let reparsed = ClaimSet::from_json(&json).expect("Should reparse");
    assert_eq!(reparsed, claims);
}

#[test]
fn test_equality_ignores_claim_order() {
    let left = ClaimSet::from_json(r#"{"a":1,"b":2}"#).expect("Should parse");
    let right = ClaimSet::from_json(r#"{"b":2,"a":1}"#).expect("Should parse");
    let different = ClaimSet::from_json(r#"{"a":1,"b":3}"#).expect("Should parse");

    assert_eq!(left, right);
    assert_ne!(left, different);
}

#[test]
fn test_claim_sets_are_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClaimSet>();
    assert_send_sync::<ClaimSetBuilder>();
    assert_send_sync::<ClaimsError>();

    let claims = Arc::new(sample());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let claims = Arc::clone(&claims);
            std::thread::spawn(move || claims.get_issuer().map(str::to_string))
        })
        .collect();

    for handle in handles {
        let issuer = handle.join().expect("Thread should not panic");
        assert_eq!(issuer.unwrap(), "issuer");
    }
}

/// Only accepts custom names under an `x-` prefix
#[derive(Debug, Clone, Copy)]
struct PrefixedNames;

impl ClaimNameValidator for PrefixedNames {
    fn validate(&self, name: &str) -> ClaimsResult<()> {
        RegisteredClaims.validate(name)?;
        if !name.starts_with("x-") {
            return Err(ClaimsError::invalid_claim_name(name, "custom claims must start with x-"));
        }
        Ok(())
    }

    fn is_registered_name(&self, name: &str) -> bool {
        RegisteredClaims.is_registered_name(name)
    }
}

#[test]
fn test_custom_name_policy() {
    let builder = ClaimSetBuilder::with_validator(PrefixedNames);
    assert!(builder.clone().add_string_claim("plain", "v").unwrap_err().is_misuse());
    assert!(builder.clone().add_string_claim("iss", "v").unwrap_err().is_misuse());

    let claims = builder
        .set_issuer("issuer")
        .add_string_claim("x-role", "admin")
        .expect("Prefixed name should be accepted")
        .build();
    assert_eq!(claims.get_string_claim("x-role").unwrap(), "admin");
    assert!(claims.get_string_claim("role").unwrap_err().is_misuse());

    // Parsing does not apply the custom name policy; reads do
    let parsed = ClaimSet::from_json_with(
        r#"{"plain":1,"x-n":2}"#,
        PrefixedNames,
        &ParseOptions::default(),
    )
    .expect("Should parse any custom names");
    assert_eq!(parsed.get_number_claim("x-n").unwrap(), 2.0);
    assert!(parsed.get_number_claim("plain").unwrap_err().is_misuse());
    assert_eq!(parsed.get("plain").map(ClaimValue::kind), Some(ClaimKind::Number));
}

#[test]
fn test_shared_name_policy() {
    let policy = Arc::new(RegisteredClaims);
    let claims = ClaimSetBuilder::with_validator(Arc::clone(&policy))
        .add_boolean_claim("flag", true)
        .expect("Should accept custom claim")
        .build();

    assert!(claims.get_boolean_claim("flag").unwrap());
    assert!(claims.has_claim("exp").is_err());
}

/// Test double: prefixes the context and flips plaintext bits
struct XorEncrypt(u8);

impl HybridEncrypt for XorEncrypt {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> ClaimsResult<Vec<u8>> {
        let mut out = context_info.to_vec();
        out.extend(plaintext.iter().map(|byte| byte ^ self.0));
        Ok(out)
    }
}

fn seal<E: HybridEncrypt>(primitive: &E, claims: &ClaimSet) -> ClaimsResult<Vec<u8>> {
    primitive.encrypt(claims.to_json()?.as_bytes(), b"ctx")
}

#[test]
fn test_hybrid_encrypt_through_shared_handle() {
    let primitive = Arc::new(XorEncrypt(0xff));
    let claims = ClaimSetBuilder::new().set_subject("s").build();

    let sealed = seal(&primitive, &claims).expect("Should encrypt");
    let json = claims.to_json().expect("Should serialize");

    assert_eq!(&sealed[..3], b"ctx");
    assert_eq!(sealed.len(), 3 + json.len());
    let opened: Vec<u8> = sealed[3..].iter().map(|byte| byte ^ 0xff).collect();
    assert_eq!(opened, json.as_bytes());

    // Empty context is allowed
    let bare = primitive.encrypt(b"", b"").expect("Should encrypt empty input");
    assert!(bare.is_empty());
}
