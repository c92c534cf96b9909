//! One-way password digests.
//!
//! Passwords are stored as the SHA-256 hex digest of the plaintext and
//! compared at login by re-digesting the candidate. The digest is
//! deliberately unsalted so that `digest(candidate) == stored` is the whole
//! comparison; a salted KDF would need a different login flow.

use sha2::{Digest, Sha256};

/// Digest a plaintext password into its stored representation.
pub fn digest_password(plaintext: &str) -> String {
    hex::encode(Sha256::digest(plaintext.as_bytes()))
}

/// Compare a login candidate against a stored digest.
pub fn verify_password(candidate: &str, stored_digest: &str) -> bool {
    digest_password(candidate) == stored_digest
}
