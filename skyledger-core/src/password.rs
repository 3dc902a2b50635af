use sha2::{Digest, Sha256};

/// One-way credential digest: SHA-256 over the UTF-8 password bytes,
/// hex-encoded. The plaintext is never stored.
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    digest_password(password) == stored_digest
}
