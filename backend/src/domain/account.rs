//! Account primitives: usernames, passwords, and validated credential pairs.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Bounds applied to usernames at registration time.
pub const USERNAME_MIN: usize = 3;
/// Upper bound applied to usernames at registration time.
pub const USERNAME_MAX: usize = 30;
/// Minimum password length accepted at registration time.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when a username value is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    Empty,
}

/// Registered account name.
///
/// ## Invariants
/// - Non-empty once trimmed; surrounding whitespace is removed on
///   construction so lookups compare the canonical spelling.
/// - Comparison is exact and case-sensitive: `Fraser` and `fraser` are
///   two different accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`] from raw input.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UsernameValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UsernameValidationError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials used by the authentication flow.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("fraser", "pass1").unwrap();
/// assert_eq!(creds.username().as_ref(), "fraser");
/// assert_eq!(creds.password(), "pass1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username =
            Username::new(username).map_err(|_| LoginValidationError::EmptyUsername)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username suitable for account lookups.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Domain error returned when a registration payload is invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username falls outside the accepted length bounds.
    #[error("username must be between {USERNAME_MIN} and {USERNAME_MAX} characters")]
    UsernameLength,
    /// Username carries characters outside `[A-Za-z0-9]`.
    #[error("username must contain only letters and numbers")]
    UsernameCharset,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password is shorter than the accepted minimum.
    #[error("password must be at least {PASSWORD_MIN} characters long")]
    PasswordTooShort,
    /// Password misses one of the required character classes.
    #[error(
        "password must contain at least one uppercase letter, one lowercase letter, and one number"
    )]
    PasswordTooWeak,
}

/// Validated registration payload.
///
/// Registration applies stricter rules than login: the account name is
/// bounded alphanumeric and the password must carry upper, lower, and digit
/// characters. Existing accounts are never re-validated against these rules,
/// so tightening them does not lock anyone out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let username =
            Username::new(username).map_err(|_| RegistrationValidationError::EmptyUsername)?;

        let length = username.as_ref().chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(RegistrationValidationError::UsernameLength);
        }
        if !username.as_ref().chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RegistrationValidationError::UsernameCharset);
        }

        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort);
        }
        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(has_lower && has_upper && has_digit) {
            return Err(RegistrationValidationError::PasswordTooWeak);
        }

        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username to register.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Plaintext password to hash and store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
