//! HTTP middleware.
//!
//! Global layers (outermost first) are assembled in [`crate::routes`]:
//!
//! ```text
//! Request → Recover → Request ID → Trace → CORS → Body Limit → Router
//!              ↓           ↓                 ↓          ↓
//!          JSON 500   X-Request-Id    preflight     413
//! ```
//!
//! The `/api/v1` group additionally passes through the [`rate_limit`] and
//! [`authenticate`] hooks, both of which currently admit every request.

pub mod auth;
pub mod rate_limit;
pub mod recover;

pub use auth::authenticate;
pub use rate_limit::rate_limit;
pub use recover::recovery_layer;
