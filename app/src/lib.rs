//! Placeholder product service.
//!
//! Serves a liveness probe on `/health` and a fixed product list on `/`.
//! The load balancer's target-group health check polls `/`, so both routes
//! must keep answering 200.

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use routes::{Product, PRODUCTS};

use routes::{health_handler, products_handler};

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(products_handler))
        .layer(TraceLayer::new_for_http())
}

/// Bind `0.0.0.0:{port}` and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> AppResult<()> {
    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| AppError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("Listening at port:{}", config.port);
    serve(listener).await
}

/// Serve on an already-bound listener.
pub async fn serve(listener: TcpListener) -> AppResult<()> {
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        } else {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
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
}
