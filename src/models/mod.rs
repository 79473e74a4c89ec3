mod api;
mod relay;
mod user;

pub use api::{EndpointIndex, HealthResponse, HomeResponse};
pub use relay::{MAX_RELAY_TIMEOUT_SECS, RelayConfigRequest};
pub use user::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, User, UserEnvelope, UserList,
};
