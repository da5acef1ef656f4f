//! Binary entrypoint for the solcanvas HTTP server.
//!
//! Configuration comes from environment variables; see
//! [`ServerConfig`](solcanvas_server::config::ServerConfig).

use solcanvas_server::config::ServerConfig;
use solcanvas_server::router::build_router;
use solcanvas_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env().expect("Invalid server configuration");
    let state = AppState::new(&config).expect("Failed to initialize application state");

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!(
        db = %config.db_path,
        sandbox = %config.sandbox_dir.display(),
        "solcanvas server starting on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
