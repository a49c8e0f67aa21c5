//! Login and registration input.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::form::FormErrors;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

fn check_email(errors: &mut FormErrors, email: &str) {
    if email.trim().is_empty() {
        errors.insert("email", "email is required");
    } else if !is_email(email.trim()) {
        errors.insert("email", "email is not valid");
    }
}

fn check_password(errors: &mut FormErrors, password: &str) {
    if password.is_empty() {
        errors.insert("password", "password is required");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(
            "password",
            format!("password must be at least {} characters", MIN_PASSWORD_LEN),
        );
    }
}

/// Login credentials.
///
/// The identifier is the account email; the secret is never exposed in
/// Debug output.
///
/// # Example
///
/// ```
/// use sesame_core::Credentials;
///
/// let creds = Credentials::new("alice@example.com", "hunter22");
/// assert_eq!(creds.identifier(), "alice@example.com");
/// assert!(creds.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    /// Returns the identifier (email).
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the password.
    ///
    /// # Security
    ///
    /// Use this only when constructing authentication requests.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Client-side checks run before anything is sent to the server.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        check_email(&mut errors, &self.identifier);
        check_password(&mut errors, &self.password);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

// Intentionally hide password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Data for creating a new account.
#[derive(Clone)]
pub struct Registration {
    name: String,
    email: String,
    password: String,
    confirmation: String,
}

impl Registration {
    /// Create a registration whose confirmation matches the password.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            name: name.into(),
            email: email.into(),
            confirmation: password.clone(),
            password,
        }
    }

    /// Set the password confirmation typed by the user.
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.confirmation = confirmation.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Client-side checks run before anything is sent to the server.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        if self.name.trim().is_empty() {
            errors.insert("name", "name is required");
        }
        check_email(&mut errors, &self.email);
        check_password(&mut errors, &self.password);
        if self.password != self.confirmation {
            errors.insert("confirmPassword", "passwords do not match");
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
