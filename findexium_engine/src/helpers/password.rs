//! Password hashing and the password policy for user accounts.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`) with a random 16-byte salt, so the parameters travel with
//! the hash and older hashes keep verifying if the defaults change.
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("{0}")]
    PolicyViolation(String),
    #[error("{0}")]
    HashError(String),
}

fn salt() -> Result<SaltString, PasswordError> {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes).map_err(|e| PasswordError::HashError(e.to_string()))
}

pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt()?)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Returns false for a wrong password and for a hash that cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

/// Runs [`hash_password`] on the blocking thread pool, so that the async workers keep serving other requests.
pub async fn hash_in_background(password: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashError(e.to_string()))?
}

/// Runs [`verify_password`] on the blocking thread pool. A task that fails to complete counts as a failed check.
pub async fn verify_in_background(password: String, hash: String) -> bool {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await.unwrap_or(false)
}

/// Passwords need at least [`MIN_PASSWORD_LENGTH`] characters, including a digit, a lowercase and an uppercase letter.
pub fn check_password_policy(password: &str) -> Result<(), PasswordError> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        problems.push(format!("at least {MIN_PASSWORD_LENGTH} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("a digit".to_string());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        problems.push("a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        problems.push("an uppercase letter".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(PasswordError::PolicyViolation(format!("The password must contain {}.", problems.join(", "))))
    }
}
