//! Request validation built on pluggable field rules.
//!
//! Each rule is a small strategy type implementing [`Rule`]. Request bodies
//! implement [`Validate`] by running their fields through a [`Validator`],
//! which keeps the first failing rule per field. Handlers receive validated
//! bodies through the [`ValidatedJson`] extractor.
//!
//! ```rust,ignore
//! impl Validate for UpdateUserRequest {
//!     fn validate(&self) -> AppResult<()> {
//!         Validator::new()
//!             .field("name", &self.name, &[&Required])
//!             .field("email", &self.email, &[&Required, &Email])
//!             .finish()
//!     }
//! }
//! ```

use std::sync::LazyLock;

use axum::Json;
use axum::extract::{FromRequest, Request};
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

// =============================================================================
// Patterns
// =============================================================================

#[allow(clippy::expect_used)]
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is a valid literal")
});

/// Mainland China mobile number.
#[allow(clippy::expect_used)]
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("phone pattern is a valid literal"));

#[allow(clippy::expect_used)]
static USERNAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]{3,20}$").expect("username pattern is a valid literal")
});

/// Minimum password length for the [`Password`] rule.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Rule Interface
// =============================================================================

/// A single validation rule applied to a string field.
pub trait Rule: Send + Sync {
    /// Short identifier reported back to clients (e.g. `required`, `email`).
    fn tag(&self) -> &'static str;

    /// Returns `true` when `value` satisfies the rule.
    fn check(&self, value: &str) -> bool;

    /// Human-readable failure message for `field`.
    fn message(&self, field: &str) -> String;
}

/// Field must be present and not blank.
#[derive(Debug, Clone, Copy)]
pub struct Required;

impl Rule for Required {
    fn tag(&self) -> &'static str {
        "required"
    }

    fn check(&self, value: &str) -> bool {
        !value.trim().is_empty()
    }

    fn message(&self, field: &str) -> String {
        format!("{field} is required")
    }
}

/// Field must look like an email address.
#[derive(Debug, Clone, Copy)]
pub struct Email;

impl Rule for Email {
    fn tag(&self) -> &'static str {
        "email"
    }

    fn check(&self, value: &str) -> bool {
        EMAIL_PATTERN.is_match(value)
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be a valid email address")
    }
}

/// Field must be at least `n` characters long.
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Rule for MinLength {
    fn tag(&self) -> &'static str {
        "min"
    }

    fn check(&self, value: &str) -> bool {
        value.chars().count() >= self.0
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be at least {} characters", self.0)
    }
}

/// Field must be at most `n` characters long.
#[derive(Debug, Clone, Copy)]
pub struct MaxLength(pub usize);

impl Rule for MaxLength {
    fn tag(&self) -> &'static str {
        "max"
    }

    fn check(&self, value: &str) -> bool {
        value.chars().count() <= self.0
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be at most {} characters", self.0)
    }
}

/// At least 8 characters with an uppercase letter, a lowercase letter and a digit.
#[derive(Debug, Clone, Copy)]
pub struct Password;

impl Rule for Password {
    fn tag(&self) -> &'static str {
        "password"
    }

    fn check(&self, value: &str) -> bool {
        value.chars().count() >= MIN_PASSWORD_LENGTH
            && value.chars().any(|c| c.is_ascii_uppercase())
            && value.chars().any(|c| c.is_ascii_lowercase())
            && value.chars().any(|c| c.is_ascii_digit())
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be at least 8 characters with uppercase, lowercase and number")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Phone;

impl Rule for Phone {
    fn tag(&self) -> &'static str {
        "phone"
    }

    fn check(&self, value: &str) -> bool {
        PHONE_PATTERN.is_match(value)
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be a valid phone number")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Username;

impl Rule for Username {
    fn tag(&self) -> &'static str {
        "username"
    }

    fn check(&self, value: &str) -> bool {
        USERNAME_PATTERN.is_match(value)
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be 3-20 characters with only letters, numbers and underscore")
    }
}

/// Field must be a target the relay can forward to.
#[derive(Debug, Clone, Copy)]
pub struct HttpUrl;

impl Rule for HttpUrl {
    fn tag(&self) -> &'static str {
        "url"
    }

    fn check(&self, value: &str) -> bool {
        crate::relay::parse_target(value).is_ok()
    }

    fn message(&self, field: &str) -> String {
        format!("{field} must be an absolute http or https URL")
    }
}

// =============================================================================
// Validator
// =============================================================================

/// A single failed rule, reported to clients in the `details` list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub message: String,
}

/// Collects field errors across a request body.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `value` against `rules` in order, recording the first failure.
    pub fn field(&mut self, name: &str, value: &str, rules: &[&dyn Rule]) -> &mut Self {
        self.check(name, value, rules, true)
    }

    /// Like [`Validator::field`], but the value is never echoed back.
    pub fn secret(&mut self, name: &str, value: &str, rules: &[&dyn Rule]) -> &mut Self {
        self.check(name, value, rules, false)
    }

    /// Validate an optional field only when it is present.
    pub fn optional(&mut self, name: &str, value: Option<&str>, rules: &[&dyn Rule]) -> &mut Self {
        match value {
            Some(v) => self.field(name, v, rules),
            None => self,
        }
    }

    /// Validate an optional secret field only when it is present.
    pub fn optional_secret(
        &mut self,
        name: &str,
        value: Option<&str>,
        rules: &[&dyn Rule],
    ) -> &mut Self {
        match value {
            Some(v) => self.secret(name, v, rules),
            None => self,
        }
    }

    fn check(&mut self, name: &str, value: &str, rules: &[&dyn Rule], echo: bool) -> &mut Self {
        if let Some(rule) = rules.iter().find(|rule| !rule.check(value)) {
            self.errors.push(FieldError {
                field: name.to_string(),
                tag: rule.tag(),
                value: echo.then(|| value.to_string()),
                message: rule.message(name),
            });
        }
        self
    }

    /// Errors collected so far.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Finish validation, failing with `AppError::Validation` if any rule failed.
    pub fn finish(&mut self) -> AppResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

/// Implemented by request bodies that carry validation rules.
pub trait Validate {
    fn validate(&self) -> AppResult<()>;
}

// =============================================================================
// Extractor
// =============================================================================

/// JSON body extractor that runs [`Validate`] before the handler sees the value.
///
/// Malformed or mistyped JSON is rejected with `400 Invalid request body`;
/// rule failures are rejected with `400 validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}
