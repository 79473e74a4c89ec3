use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::validation::{Email, MinLength, Required, Validate, Validator};

/// Minimum password length accepted on user creation.
pub const MIN_CREATE_PASSWORD_LENGTH: usize = 6;

/// A user record. Nothing is stored; handlers build these per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// Request to create a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Optional; checked for length when present and never echoed back
    #[serde(default)]
    pub password: Option<String>,
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> AppResult<()> {
        Validator::new()
            .field("name", &self.name, &[&Required])
            .field("email", &self.email, &[&Required, &Email])
            .optional_secret(
                "password",
                self.password.as_deref(),
                &[&MinLength(MIN_CREATE_PASSWORD_LENGTH)],
            )
            .finish()
    }
}

/// Request to update a user. The id comes from the path.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> AppResult<()> {
        Validator::new()
            .field("name", &self.name, &[&Required])
            .field("email", &self.email, &[&Required, &Email])
            .finish()
    }
}

/// Response listing users.
#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub count: usize,
}

/// Response for create and update.
#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub message: String,
    pub id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_create_request_without_password_is_valid() {
        let json = r#"{"name": "Test User", "email": "test@example.com"}"#;
        let request: CreateUserRequest =
            serde_json::from_str(json).expect("Deserialization should succeed");

        assert!(request.password.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_short_password_rejected() {
        let json = r#"{"name": "Test User", "email": "test@example.com", "password": "abc"}"#;
        let request: CreateUserRequest = serde_json::from_str(json).unwrap();

        match request.validate() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "password");
                assert_eq!(errors[0].tag, "min");
                assert!(errors[0].value.is_none());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_request_missing_fields_default_to_empty() {
        let request: UpdateUserRequest = serde_json::from_str("{}").unwrap();

        match request.validate() {
            Err(AppError::Validation(errors)) => {
                assert_eq!(errors.len(), 2);
                assert!(errors.iter().all(|e| e.tag == "required"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_user_envelope_serialization() {
        let envelope = UserEnvelope {
            message: "User created successfully".to_string(),
            user: User::new("new-id", "Test User", "test@example.com"),
        };

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["user"]["id"], "new-id");
        assert_eq!(value["message"], "User created successfully");
    }
}
