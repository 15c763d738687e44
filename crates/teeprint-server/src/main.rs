//! Teeprint proxy server binary.

use teeprint_server::{ServerConfig, router};
use tracing::info;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teeprint_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env().expect("invalid server configuration");
    let app = router(&config);

    info!("Teeprint proxy listening on {}", config.bind);
    info!("Forwarding /api/users to {}", config.upstream_url);
    info!("Serving /assets from {}", config.assets_dir.display());

    let listener = tokio::net::TcpListener::bind(config.bind).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
