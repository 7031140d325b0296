//! Collaborator traits implemented outside this crate.

use crate::error::ClaimsResult;

/// Hybrid (public-key) encryption primitive.
///
/// `context_info` is bound to the ciphertext: decryption must be given the same value,
/// and tampering with it is detectable. It is not kept confidential. It may be empty.
/// Implementations must be thread-safe (Send + Sync).
pub trait HybridEncrypt: Send + Sync {
    /// Encrypt `plaintext`, binding `context_info` to the result.
    ///
    /// # Errors
    /// Implementation-defined; the primitive reports its own failures.
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> ClaimsResult<Vec<u8>>;
}

/// Implementation of `HybridEncrypt` for Arc<T> to allow shared ownership.
impl<T: HybridEncrypt> HybridEncrypt for std::sync::Arc<T> {
    fn encrypt(&self, plaintext: &[u8], context_info: &[u8]) -> ClaimsResult<Vec<u8>> {
        (**self).encrypt(plaintext, context_info)
    }
}
