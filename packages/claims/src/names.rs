//! Registered claim names and the custom claim name policy
//!
//! The policy is an explicit value handed to the builder, the parser and the
//! accessors. [`RegisteredClaims`] is the RFC 7519 table and is what every entry point
//! uses unless told otherwise.

use crate::error::{ClaimsError, ClaimsResult};

/// Issuer, <https://tools.ietf.org/html/rfc7519#section-4.1.1>
pub const ISSUER: &str = "iss";
/// Subject, <https://tools.ietf.org/html/rfc7519#section-4.1.2>
pub const SUBJECT: &str = "sub";
/// Audience, <https://tools.ietf.org/html/rfc7519#section-4.1.3>
pub const AUDIENCE: &str = "aud";
/// Expiration time, <https://tools.ietf.org/html/rfc7519#section-4.1.4>
pub const EXPIRATION: &str = "exp";
/// Not before, <https://tools.ietf.org/html/rfc7519#section-4.1.5>
pub const NOT_BEFORE: &str = "nbf";
/// Issued at, <https://tools.ietf.org/html/rfc7519#section-4.1.6>
pub const ISSUED_AT: &str = "iat";
/// JWT ID, <https://tools.ietf.org/html/rfc7519#section-4.1.7>
pub const JWT_ID: &str = "jti";

/// All registered claim names
pub const REGISTERED_CLAIM_NAMES: [&str; 7] = [
    ISSUER, SUBJECT, JWT_ID, EXPIRATION, NOT_BEFORE, ISSUED_AT, AUDIENCE,
];

/// Decides which names may be used for custom claims.
///
/// Implementations must be deterministic: the same name always validates the same way.
pub trait ClaimNameValidator: Send + Sync {
    /// Fails if `name` is empty, syntactically invalid, or a registered name.
    fn validate(&self, name: &str) -> ClaimsResult<()>;

    /// Whether `name` is one of the registered claim names.
    fn is_registered_name(&self, name: &str) -> bool;
}

/// The fixed RFC 7519 registered claim table.
///
/// Custom names must be non-empty, contain no ASCII control characters, and not collide
/// with a registered name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisteredClaims;

impl ClaimNameValidator for RegisteredClaims {
    fn validate(&self, name: &str) -> ClaimsResult<()> {
        if name.is_empty() {
            return Err(ClaimsError::invalid_claim_name(name, "claim names must not be empty"));
        }
        if name.chars().any(|c| c.is_ascii_control()) {
            return Err(ClaimsError::invalid_claim_name(
                name,
                "claim names must not contain control characters",
            ));
        }
        if self.is_registered_name(name) {
            return Err(ClaimsError::invalid_claim_name(
                name,
                "it is a registered name; use the corresponding setter",
            ));
        }
        Ok(())
    }

    #[inline]
    fn is_registered_name(&self, name: &str) -> bool {
        REGISTERED_CLAIM_NAMES.contains(&name)
    }
}

impl<T: ClaimNameValidator> ClaimNameValidator for std::sync::Arc<T> {
    fn validate(&self, name: &str) -> ClaimsResult<()> {
        (**self).validate(name)
    }

    fn is_registered_name(&self, name: &str) -> bool {
        (**self).is_registered_name(name)
    }
}
