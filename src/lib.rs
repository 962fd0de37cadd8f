// src/lib.rs
pub mod config;
pub mod effects;
pub mod error;
pub mod link;
pub mod page;
pub mod params;
pub mod render;
pub mod routes;
pub mod token;
pub mod types;

use std::net::SocketAddr;

use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use config::Config;

pub async fn start_server() -> anyhow::Result<()> {
    let config = Config::load();
    let addr = SocketAddr::new(config.bind_addr, config.port);
    let app = routes::app(config);

    info!("valentine links listening on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!("failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
