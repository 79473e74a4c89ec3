//! User endpoints.
//!
//! Nothing is persisted: list and get return fixed records, and writes echo
//! the validated input back.

use axum::Json;
use axum::extract::Path;
use axum::http::StatusCode;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::models::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, User, UserEnvelope, UserList,
};
use crate::validation::ValidatedJson;

/// List users.
#[instrument]
pub async fn list_users() -> Json<UserList> {
    let users = vec![
        User::new("1", "John Doe", "john@example.com"),
        User::new("2", "Jane Smith", "jane@example.com"),
        User::new("3", "Bob Johnson", "bob@example.com"),
    ];
    let count = users.len();

    Json(UserList { users, count })
}

/// Get a user by id. The id is echoed back as-is.
#[instrument]
pub async fn get_user(Path(id): Path<String>) -> Json<User> {
    Json(User::new(id, "John Doe", "john@example.com"))
}

/// Create a user with a freshly generated id.
#[instrument(skip_all)]
pub async fn create_user(
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> (StatusCode, Json<UserEnvelope>) {
    let user = User::new(Uuid::new_v4().to_string(), payload.name, payload.email);
    info!(user_id = %user.id, "User created");

    (
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User created successfully".to_string(),
            user,
        }),
    )
}

/// Update a user. The id comes from the path, never the body.
#[instrument(skip(payload))]
pub async fn update_user(
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> Json<UserEnvelope> {
    Json(UserEnvelope {
        message: "User updated successfully".to_string(),
        user: User::new(id, payload.name, payload.email),
    })
}

#[instrument]
pub async fn delete_user(Path(id): Path<String>) -> Json<DeleteUserResponse> {
    Json(DeleteUserResponse {
        message: "User deleted successfully".to_string(),
        id,
    })
}
