//! JSON Web Token claim sets
//!
//! This crate provides the claims object of RFC 7519 with:
//! - A typed builder that rejects bad claim names and values at the call site
//! - A strict parser for untrusted payload text with size and nesting limits
//! - Typed, non-coercing accessors over the immutable result
//!
//! Signing, compact serialization and wall-clock validation live elsewhere; this crate
//! only guarantees that a [`ClaimSet`] is well-shaped and serializes back to the same
//! logical JSON object.

mod builder;
mod claim_set;
mod error;
pub mod limits;
pub mod names;
mod options;
mod parser;
mod traits;
mod value;

pub use builder::ClaimSetBuilder;
pub use claim_set::ClaimSet;
pub use error::{ClaimsError, ClaimsResult, ErrorCategory};
pub use names::{ClaimNameValidator, RegisteredClaims};
pub use options::ParseOptions;
pub use traits::HybridEncrypt;
pub use value::{ClaimKind, ClaimValue, JsonText};
