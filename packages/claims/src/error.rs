//! Claim set error types
//!
//! Every failure names the claim it concerns where one exists. Errors fall into two
//! classes, see [`ErrorCategory`].

use crate::value::ClaimKind;
use thiserror::Error;

/// Claim set operation result type
pub type ClaimsResult<T> = Result<T, ClaimsError>;

/// Broad class of a [`ClaimsError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Untrusted data did not have the expected shape, or a typed read did not match the
    /// stored value. Expected at runtime; report it, do not abort.
    InvalidInput,
    /// The caller broke an argument contract (bad claim name, unrepresentable value).
    Misuse,
}

/// Claim set errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClaimsError {
    /// Payload text is not valid JSON
    #[error("invalid JWT payload: {0}")]
    MalformedJson(String),

    /// Payload is valid JSON but not an object
    #[error("invalid JWT payload: payload is not a JSON object")]
    NotAnObject,

    /// The same claim name appears twice in one payload
    #[error("invalid JWT payload: claim {0} appears more than once")]
    DuplicateClaim(String),

    /// Payload exceeds the configured size limit
    #[error("invalid JWT payload: {size} bytes exceeds the limit of {max} bytes")]
    PayloadTooLarge {
        /// Payload length in bytes
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// Payload nests objects/arrays deeper than the configured limit
    #[error("invalid JWT payload: nesting exceeds the limit of {max} levels")]
    NestingTooDeep {
        /// Configured maximum depth
        max: usize,
    },

    /// A registered claim carries the wrong JSON type
    #[error("invalid JWT payload: claim {claim} is not a {expected}")]
    WrongClaimType {
        /// Claim name
        claim: String,
        /// Shape the registered claim requires
        expected: ClaimKind,
    },

    /// The audience claim is an empty array
    #[error("invalid JWT payload: claim {0} is present but empty")]
    EmptyAudience(String),

    /// The audience array holds something other than strings
    #[error("invalid JWT payload: claim {0} contains a non-string entry")]
    NonStringAudience(String),

    /// A time claim is not a representable instant
    #[error("claim {claim}: timestamp {value} is outside the accepted range")]
    TimestampOutOfRange {
        /// Claim name
        claim: String,
        /// Offending value as written
        value: String,
    },

    /// Typed read of a claim that is absent
    #[error("claim {0} is not present")]
    MissingClaim(String),

    /// Typed read of a claim whose value is JSON null
    #[error("claim {0} is null")]
    NullClaim(String),

    /// Typed read that does not match the stored shape
    #[error("claim {claim}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Claim name
        claim: String,
        /// Requested shape
        expected: ClaimKind,
        /// Stored shape
        found: ClaimKind,
    },

    /// JSON text handed to the builder is malformed or of the wrong shape
    #[error("invalid JSON {expected} for claim {claim}: {reason}")]
    MalformedNestedJson {
        /// Claim name
        claim: String,
        /// Required shape (object or array)
        expected: ClaimKind,
        /// Parser message
        reason: String,
    },

    /// Custom claim name is empty, syntactically invalid, or registered
    #[error("claim name '{name}' is invalid: {reason}")]
    InvalidClaimName {
        /// Rejected name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// Value handed to a builder setter cannot be stored
    #[error("invalid value for claim {claim}: {reason}")]
    InvalidArgument {
        /// Claim name
        claim: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Claim set could not be written as JSON
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ClaimsError {
    /// Which of the two error classes this error belongs to
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidClaimName { .. } | Self::InvalidArgument { .. } => ErrorCategory::Misuse,
            _ => ErrorCategory::InvalidInput,
        }
    }

    /// True for data-dependent failures on untrusted input or typed reads
    #[inline]
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        self.category() == ErrorCategory::InvalidInput
    }

    /// True for argument-contract violations by the caller
    #[inline]
    #[must_use]
    pub fn is_misuse(&self) -> bool {
        self.category() == ErrorCategory::Misuse
    }

    /// The claim this error refers to, if any
    #[must_use]
    pub fn claim(&self) -> Option<&str> {
        match self {
            Self::DuplicateClaim(claim)
            | Self::EmptyAudience(claim)
            | Self::NonStringAudience(claim)
            | Self::MissingClaim(claim)
            | Self::NullClaim(claim)
            | Self::WrongClaimType { claim, .. }
            | Self::TimestampOutOfRange { claim, .. }
            | Self::TypeMismatch { claim, .. }
            | Self::MalformedNestedJson { claim, .. }
            | Self::InvalidArgument { claim, .. } => Some(claim),
            Self::InvalidClaimName { name, .. } => Some(name),
            Self::MalformedJson(_)
            | Self::NotAnObject
            | Self::PayloadTooLarge { .. }
            | Self::NestingTooDeep { .. }
            | Self::Serialization(_) => None,
        }
    }

    /// Create an invalid claim name error
    #[inline]
    #[must_use]
    pub fn invalid_claim_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidClaimName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    #[inline]
    #[must_use]
    pub fn invalid_argument(claim: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            claim: claim.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a wrong registered-claim type error
    #[inline]
    #[must_use]
    pub fn wrong_claim_type(claim: &str, expected: ClaimKind) -> Self {
        Self::WrongClaimType {
            claim: claim.to_string(),
            expected,
        }
    }

    /// Create a type mismatch error for a typed read
    #[inline]
    #[must_use]
    pub fn type_mismatch(claim: &str, expected: ClaimKind, found: ClaimKind) -> Self {
        Self::TypeMismatch {
            claim: claim.to_string(),
            expected,
            found,
        }
    }
}

impl From<serde_json::Error> for ClaimsError {
    fn from(err: serde_json::Error) -> Self {
        ClaimsError::MalformedJson(err.to_string())
    }
}
