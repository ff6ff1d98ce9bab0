use bcrypt::{hash, verify};

use crate::Result;

/// Hashes `password` with a fresh random salt at the given bcrypt cost.
///
/// bcrypt is deliberately slow, so the work runs on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String> {
    let hashed = tokio::task::spawn_blocking(move || hash(password, cost)).await??;
    Ok(hashed)
}

/// Returns `Ok(false)` on mismatch; errors only on a malformed hash.
pub async fn verify_password(password: String, hashed: String) -> Result<bool> {
    let matches = tokio::task::spawn_blocking(move || verify(password, &hashed)).await??;
    Ok(matches)
}
