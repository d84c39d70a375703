//! Password hashing.
//!
//! bcrypt with the crate's default cost. Hashing failures propagate (the
//! caller surfaces them as internal errors); verification is infallible and
//! reports a mismatch or an undecodable digest as `false`.

use bcrypt::BcryptError;

/// Hash a plaintext password into a salted bcrypt digest.
///
/// Two calls on the same input produce different digests; both verify.
pub fn hash(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
}

/// Check a plaintext password against a stored digest.
///
/// Returns `false` on mismatch and on digests that cannot be decoded.
pub fn verify(plaintext: &str, digest: &str) -> bool {
    bcrypt::verify(plaintext, digest).unwrap_or(false)
}
