//! Credential hashing for the predefined-user directory — Argon2id.
//!
//! The directory persisted in client storage carries only PHC-format hash
//! strings; plaintext credentials exist solely in the compiled-in seed list
//! and are hashed before anything reaches storage.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a credential with a fresh random salt. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| format!("No se pudo generar el hash: {err}"))
}

/// Check a credential against a stored PHC-format string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed =
        PasswordHash::new(hash).map_err(|err| format!("Hash almacenado inválido: {err}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("est123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("est123", &hash).unwrap());
        assert!(!verify_password("otra", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("est123", "no-es-un-hash").is_err());
    }
}
