//! Password value object - hashing and verification.
//!
//! Wraps Argon2 so that nothing outside this module handles raw hashes
//! or plaintext comparisons.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::UNUSABLE_PASSWORD_PREFIX;
use crate::error::{DomainError, DomainResult};

/// Length of the random suffix of an unusable password marker.
const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Password value object that holds a stored hash.
///
/// The plaintext never lives inside this type; it is consumed by
/// [`Password::new`] and only ever compared through [`Password::verify`].
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns an internal error if the hasher rejects the input.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Hash the plain text when given, or produce an unusable password otherwise.
    pub fn from_option(plain_text: Option<&str>) -> DomainResult<Self> {
        match plain_text {
            Some(raw) => Self::new(raw),
            None => Ok(Self::unusable()),
        }
    }

    /// Create a password that never verifies.
    pub fn unusable() -> Self {
        let mut hash = String::with_capacity(UNUSABLE_PASSWORD_SUFFIX_LENGTH + 1);
        hash.push(UNUSABLE_PASSWORD_PREFIX);
        while hash.len() <= UNUSABLE_PASSWORD_SUFFIX_LENGTH {
            hash.push_str(SaltString::generate(&mut OsRng).as_str());
        }
        hash.truncate(UNUSABLE_PASSWORD_SUFFIX_LENGTH + 1);
        Self { hash }
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Whether this password can ever verify.
    pub fn is_usable(&self) -> bool {
        !self.hash.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        if !self.is_usable() {
            return false;
        }
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    fn hash(plain_text: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    fn verify_hash(plain_text: &str, hash: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| DomainError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "SecurePassword123!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("WrongPassword123"));
    }

    #[test]
    fn test_hash_is_argon2_and_not_plaintext() {
        let password = Password::new("password").unwrap();

        assert!(password.as_str().starts_with("$argon2"));
        assert!(!password.as_str().contains("password"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "TestPassword123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_short_passwords_are_still_hashed() {
        let password = Password::new("pw").unwrap();
        assert!(password.verify("pw"));
    }

    #[test]
    fn test_unusable_password() {
        let password = Password::unusable();

        assert!(!password.is_usable());
        assert_eq!(password.as_str().len(), UNUSABLE_PASSWORD_SUFFIX_LENGTH + 1);
        assert!(!password.verify(""));
        assert!(!password.verify(password.as_str()));
    }

    #[test]
    fn test_from_option() {
        assert!(Password::from_option(Some("secret")).unwrap().verify("secret"));
        assert!(!Password::from_option(None).unwrap().is_usable());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("not-a-phc-string"));
    }

    #[test]
    fn test_debug_redacts_hash() {
        let password = Password::new("hunter22").unwrap();
        let debug = format!("{:?}", password);

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(password.as_str()));
    }
}
