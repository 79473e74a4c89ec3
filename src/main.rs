use std::net::SocketAddr;
use std::process::ExitCode;

use tokio::net::{TcpListener, lookup_host};
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

use relay_api::{AppState, Config, build_router, utils};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = init_tracing();

    info!("Starting Relay API v{}", env!("CARGO_PKG_VERSION"));

    match run(filter).await {
        Ok(()) => ExitCode::from(exitcode::OK as u8),
        Err(exit_code) => ExitCode::from(exit_code as u8),
    }
}

/// Initialize logging at `info` until the configured level is known.
/// `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() -> FilterHandle {
    // A .env file may carry LOG_FORMAT; Config::from_env reloads it later
    let _ = dotenvy::dotenv();

    let (filter, handle) = reload::Layer::new(EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let layer = fmt::layer().with_target(true).with_thread_ids(true);
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(layer.json()).init();
    } else {
        registry.with(layer).init();
    }

    handle
}

/// Run the application, returning an exit code on error.
async fn run(filter: FilterHandle) -> Result<(), exitcode::ExitCode> {
    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Configuration error: {e}");
        exitcode::CONFIG
    })?;

    if let Err(e) = filter.reload(config.log_filter()) {
        warn!("Failed to apply RUST_LOG={}: {e}", config.log_level);
    }

    info!(
        host = %config.server.host,
        port = %config.server.port,
        relay_timeout = ?config.relay.timeout,
        "Configuration loaded"
    );

    let server_addr = config.server_addr();

    // Build application state and router
    let state = AppState::new(config).map_err(|e| {
        error!("Failed to initialize application state: {e}");
        exitcode::CONFIG
    })?;
    let app = build_router(state.clone());

    // HOST may be a name such as "localhost"; bind the first address it resolves to
    let addr: SocketAddr = lookup_host(&server_addr)
        .await
        .map_err(|e| {
            error!("Invalid server address {server_addr}: {e}");
            exitcode::CONFIG
        })?
        .next()
        .ok_or_else(|| {
            error!("Server address {server_addr} did not resolve");
            exitcode::CONFIG
        })?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind to {addr}: {e}");
        exitcode::UNAVAILABLE
    })?;

    info!("Server listening on http://{addr}");
    info!("API endpoints:");
    info!("  GET    /                      - Landing page");
    info!("  GET    /health                - Health check");
    info!("  GET    /api/v1/users          - List users");
    info!("  POST   /api/v1/users          - Create user");
    info!("  GET    /api/v1/users/{{id}}     - Get user");
    info!("  PUT    /api/v1/users/{{id}}     - Update user");
    info!("  DELETE /api/v1/users/{{id}}     - Delete user");
    info!("  ANY    /api/v1/relay          - Relay to ?target= or X-Target-URL");
    info!("  ANY    /api/v1/relay/config   - Relay described by a JSON body");

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown_signal())
        .await
        .map_err(|e| {
            error!("Server error: {e}");
            exitcode::SOFTWARE
        })?;

    info!(
        uptime_seconds = state.uptime_seconds(),
        "Server shutdown complete"
    );
    Ok(())
}
