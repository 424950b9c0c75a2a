//! Binary entrypoint for the penfix HTTP server.
//!
//! Reads configuration from environment variables:
//! - `PENFIX_PORT`: Server listen port (default: "3000")
//! - `PENFIX_MAX_CONCURRENT_SCORING`: scoring batches allowed to run at
//!   once (default: available parallelism)

use penfix_server::router::build_router;
use penfix_server::state::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let port = std::env::var("PENFIX_PORT").unwrap_or_else(|_| "3000".to_string());
    let config = match std::env::var("PENFIX_MAX_CONCURRENT_SCORING") {
        Ok(raw) => match raw.parse::<usize>() {
            Ok(n) if n > 0 => ServerConfig {
                max_concurrent_scoring: n,
            },
            _ => {
                tracing::warn!(value = %raw, "invalid PENFIX_MAX_CONCURRENT_SCORING, using default");
                ServerConfig::default()
            }
        },
        Err(_) => ServerConfig::default(),
    };

    let app = build_router(AppState::new(config));

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("penfix server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await
}
