use crate::error::Result;

/// Hash a password with bcrypt at the given work factor.
///
/// A fresh random salt is drawn on every call, so hashing the same password
/// twice yields two different strings that both verify.
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password_hash = bcrypt::hash(password, cost)?;
    Ok(password_hash)
}

/// Verify a password against a bcrypt hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(password, password_hash)?)
}

/// Shortened form of a hash, safe to echo to the operator
pub fn hash_preview(password_hash: &str) -> String {
    let prefix: String = password_hash.chars().take(20).collect();
    format!("{}...", prefix)
}
