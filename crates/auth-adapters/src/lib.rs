//! # auth-adapters
//!
//! Argon2-based implementation of `AuthProvider`.
//! The admin password is never stored, only its PHC hash string.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use domains::AuthProvider;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

pub struct Argon2AuthProvider {
    password_hash: Option<SecretString>,
}

impl Argon2AuthProvider {
    /// Without a configured hash every login attempt is refused.
    pub fn new(password_hash: Option<SecretString>) -> Self {
        if password_hash.is_none() {
            warn!("No admin password hash configured; admin login is disabled");
        }
        Self { password_hash }
    }
}

impl AuthProvider for Argon2AuthProvider {
    /// Verifies the password against the stored Argon2 hash.
    fn verify_admin_password(&self, password: &str) -> bool {
        let Some(hash) = &self.password_hash else {
            return false;
        };
        let parsed_hash = match PasswordHash::new(hash.expose_secret()) {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "Configured admin password hash is malformed");
                return false;
            }
        };
        let ok = Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok();
        debug!(ok, "Admin password checked");
        ok
    }
}

/// Produces a PHC string for the `admin.password_hash` setting, salted
/// from the OS random source.
pub fn hash_password(password: &str) -> argon2::password_hash::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    hash_with_salt(password, &salt)
}

/// Same as [`hash_password`] with caller-chosen salt bytes (at least 8).
pub fn hash_password_with_salt(
    password: &str,
    salt: &[u8],
) -> argon2::password_hash::Result<String> {
    hash_with_salt(password, &SaltString::encode_b64(salt)?)
}

fn hash_with_salt(password: &str, salt: &SaltString) -> argon2::password_hash::Result<String> {
    let hash = Argon2::default().hash_password(password.as_bytes(), salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_for(password: &str) -> Argon2AuthProvider {
        let hash = hash_password_with_salt(password, b"confession-wall-salt").unwrap();
        Argon2AuthProvider::new(Some(SecretString::from(hash)))
    }

    #[test]
    fn test_accepts_only_the_configured_password() {
        let auth = provider_for("letmein");
        assert!(auth.verify_admin_password("letmein"));
        assert!(!auth.verify_admin_password("LetMeIn"));
        assert!(!auth.verify_admin_password(""));
    }

    #[test]
    fn test_without_hash_everything_is_refused() {
        let auth = Argon2AuthProvider::new(None);
        assert!(!auth.verify_admin_password("letmein"));
    }

    #[test]
    fn test_random_salts_differ_but_both_verify() {
        let first = hash_password("letmein").unwrap();
        let second = hash_password("letmein").unwrap();
        assert_ne!(first, second);

        for hash in [first, second] {
            let auth = Argon2AuthProvider::new(Some(SecretString::from(hash)));
            assert!(auth.verify_admin_password("letmein"));
        }
    }

    #[test]
    fn test_malformed_hash_is_refused() {
        let auth = Argon2AuthProvider::new(Some(SecretString::from("not-a-phc-string")));
        assert!(!auth.verify_admin_password("anything"));
    }
}
