//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Account fields
// =============================================================================

/// Field used as the login identifier
pub const USERNAME_FIELD: &str = "email";

/// Name of the staff flag, as reported by privilege errors
pub const FIELD_IS_STAFF: &str = "is_staff";

/// Name of the superuser flag, as reported by privilege errors
pub const FIELD_IS_SUPERUSER: &str = "is_superuser";

// =============================================================================
// Passwords
// =============================================================================

/// Prefix marking a password that can never verify
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Similarity ratio above which a password is rejected as too close to a user attribute
pub const MAX_PASSWORD_SIMILARITY: f64 = 0.7;

/// Passwords rejected outright by the common password validator.
pub const COMMON_PASSWORDS: &[&str] = &[
    "123456", "password", "12345678", "qwerty", "123456789", "12345", "1234", "111111",
    "1234567", "dragon", "123123", "baseball", "abc123", "football", "monkey", "letmein",
    "696969", "shadow", "master", "666666", "qwertyuiop", "123321", "mustang", "1234567890",
    "michael", "654321", "superman", "1qaz2wsx", "7777777", "121212", "000000", "qazwsx",
    "123qwe", "killer", "trustno1", "jordan", "jennifer", "zxcvbnm", "asdfgh", "hunter",
    "buster", "soccer", "harley", "batman", "andrew", "tigger", "sunshine", "iloveyou",
    "2000", "charlie", "robert", "thomas", "hockey", "ranger", "daniel", "starwars",
    "klaster", "112233", "george", "computer", "michelle", "jessica", "pepper", "1111",
    "zxcvbn", "555555", "11111111", "131313", "freedom", "777777", "pass", "maggie",
    "159753", "aaaaaa", "ginger", "princess", "joshua", "cheese", "amanda", "summer",
    "love", "ashley", "nicole", "chelsea", "biteme", "matthew", "access", "yankees",
    "987654321", "dallas", "austin", "thunder", "taylor", "matrix", "password1",
    "password123", "welcome", "admin", "administrator", "changeme", "passw0rd",
    "qwerty123", "letmein123", "welcome1", "secret",
];
