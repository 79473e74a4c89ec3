//! # Relay API
//!
//! A small Axum HTTP service with two halves:
//!
//! - **Users**: stateless CRUD endpoints that validate input and echo it back
//! - **Relay**: a single-hop forward relay that sends one request to a
//!   caller-named `http`/`https` target and returns the answer verbatim
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Middleware (Recover → Request ID → Trace → CORS → Limit)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /api/v1 hooks (Rate Limit → Auth)                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Handlers (health, users, relay)                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Forwarder (reqwest, one request per relay)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use relay_api::{AppState, Config, build_router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let addr = config.server_addr();
//!
//!     let app = build_router(AppState::new(config)?);
//!     let listener = tokio::net::TcpListener::bind(addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Relaying
//!
//! ```bash
//! curl "http://localhost:8080/api/v1/relay?target=https://httpbin.org/get"
//! curl -H "X-Target-URL: https://httpbin.org/get" http://localhost:8080/api/v1/relay
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod relay;
pub mod routes;
pub mod state;
pub mod utils;
pub mod validation;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use relay::{Forwarder, RelayRequest, RelayResponse};
pub use routes::build_router;
pub use state::AppState;
