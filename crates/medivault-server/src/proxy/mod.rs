// crates/medivault-server/src/proxy/mod.rs
// Query proxy: one action-routed endpoint in front of vector search and the LLM gateway

pub mod error;
pub mod gateway;
pub mod prompt;
pub mod routes;
pub mod search;
pub mod service;

pub use error::ProxyError;
pub use gateway::{GatewayClient, GatewayError};
pub use routes::create_router;
pub use search::VectorSearchClient;
pub use service::{Action, ProxyService};

use tokio::net::TcpListener;
use tracing::info;

/// Bind and serve until Ctrl+C or SIGTERM
pub async fn run(service: ProxyService, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        addr = %addr,
        search = service.has_search(),
        gateway = service.has_gateway(),
        "MediVault proxy listening"
    );

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. A handler that fails to install never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
