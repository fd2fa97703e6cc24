//! Password strength validation.
//!
//! Validators are independent of hashing: the account manager hashes whatever
//! it is given, and callers that accept passwords from people (the management
//! commands) run a [`PasswordPolicy`] first.

use std::collections::HashMap;

use crate::constants::{COMMON_PASSWORDS, MAX_PASSWORD_SIMILARITY, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};
use crate::user::User;

/// Account attributes a password is compared against.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAttributes<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl<'a> UserAttributes<'a> {
    pub fn new(email: &'a str) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    pub fn with_names(mut self, first_name: &'a str, last_name: &'a str) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    fn named(&self) -> [(&'static str, &'a str); 3] {
        [
            ("email address", self.email),
            ("first name", self.first_name),
            ("last name", self.last_name),
        ]
    }
}

impl<'a> From<&'a User> for UserAttributes<'a> {
    fn from(user: &'a User) -> Self {
        Self::new(&user.email).with_names(&user.first_name, &user.last_name)
    }
}

/// A single password rule.
pub trait PasswordValidator: Send + Sync {
    /// Return the failure message when `password` breaks the rule.
    fn validate(&self, password: &str, user: Option<&UserAttributes<'_>>) -> Result<(), String>;

    /// Human-readable description of the rule.
    fn help_text(&self) -> String;
}

/// Rejects passwords too similar to the account's own attributes.
#[derive(Debug, Clone)]
pub struct UserAttributeSimilarityValidator {
    max_similarity: f64,
}

impl UserAttributeSimilarityValidator {
    pub fn new(max_similarity: f64) -> Self {
        Self { max_similarity }
    }

    /// Skip values far shorter than the password; they cannot be similar enough.
    fn exceeds_length_ratio(&self, password: &str, value: &str) -> bool {
        let password_len = password.chars().count();
        let value_len = value.chars().count();
        let length_bound = self.max_similarity / 2.0 * password_len as f64;
        password_len >= 10 * value_len && (value_len as f64) < length_bound
    }
}

impl Default for UserAttributeSimilarityValidator {
    fn default() -> Self {
        Self::new(MAX_PASSWORD_SIMILARITY)
    }
}

impl PasswordValidator for UserAttributeSimilarityValidator {
    fn validate(&self, password: &str, user: Option<&UserAttributes<'_>>) -> Result<(), String> {
        let Some(user) = user else {
            return Ok(());
        };
        let password = password.to_lowercase();

        for (verbose_name, value) in user.named() {
            if value.is_empty() {
                continue;
            }
            let value = value.to_lowercase();
            let parts = value
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|part| !part.is_empty())
                .chain(std::iter::once(value.as_str()));

            for part in parts {
                if self.exceeds_length_ratio(&password, part) {
                    continue;
                }
                if quick_ratio(&password, part) >= self.max_similarity {
                    return Err(format!("The password is too similar to the {}.", verbose_name));
                }
            }
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be too similar to your other personal information.".to_string()
    }
}

/// Rejects passwords shorter than a minimum number of characters.
#[derive(Debug, Clone)]
pub struct MinimumLengthValidator {
    min_length: usize,
}

impl MinimumLengthValidator {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }
}

impl Default for MinimumLengthValidator {
    fn default() -> Self {
        Self::new(MIN_PASSWORD_LENGTH)
    }
}

impl PasswordValidator for MinimumLengthValidator {
    fn validate(&self, password: &str, _user: Option<&UserAttributes<'_>>) -> Result<(), String> {
        if password.chars().count() < self.min_length {
            return Err(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        format!(
            "Your password must contain at least {} characters.",
            self.min_length
        )
    }
}

/// Rejects passwords from a list of commonly used ones.
#[derive(Debug, Clone, Default)]
pub struct CommonPasswordValidator;

impl PasswordValidator for CommonPasswordValidator {
    fn validate(&self, password: &str, _user: Option<&UserAttributes<'_>>) -> Result<(), String> {
        let candidate = password.trim().to_lowercase();
        if COMMON_PASSWORDS.contains(&candidate.as_str()) {
            return Err("This password is too common.".to_string());
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be a commonly used password.".to_string()
    }
}

/// Rejects passwords made only of digits.
#[derive(Debug, Clone, Default)]
pub struct NumericPasswordValidator;

impl PasswordValidator for NumericPasswordValidator {
    fn validate(&self, password: &str, _user: Option<&UserAttributes<'_>>) -> Result<(), String> {
        if !password.is_empty() && password.chars().all(|c| c.is_numeric()) {
            return Err("This password is entirely numeric.".to_string());
        }
        Ok(())
    }

    fn help_text(&self) -> String {
        "Your password can't be entirely numeric.".to_string()
    }
}

/// Ordered set of validators applied together.
pub struct PasswordPolicy {
    validators: Vec<Box<dyn PasswordValidator>>,
}

impl PasswordPolicy {
    pub fn new(validators: Vec<Box<dyn PasswordValidator>>) -> Self {
        Self { validators }
    }

    /// Run every validator and report all failures at once.
    pub fn validate(&self, password: &str, user: Option<&UserAttributes<'_>>) -> DomainResult<()> {
        let errors: Vec<String> = self
            .validators
            .iter()
            .filter_map(|v| v.validate(password, user).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::password(errors.join("\n")))
        }
    }

    pub fn help_texts(&self) -> Vec<String> {
        self.validators.iter().map(|v| v.help_text()).collect()
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(vec![
            Box::new(UserAttributeSimilarityValidator::default()),
            Box::new(MinimumLengthValidator::default()),
            Box::new(CommonPasswordValidator),
            Box::new(NumericPasswordValidator),
        ])
    }
}

impl std::fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordPolicy")
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Order-insensitive upper bound on sequence similarity: twice the number of
/// shared characters over the combined length.
fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available: HashMap<char, usize> = HashMap::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    2.0 * matches as f64 / total as f64
}
