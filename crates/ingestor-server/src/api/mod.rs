//! Router assembly and the HTTP server loop

use axum::{middleware as axum_middleware, Router};
use std::{
    future::{Future, IntoFuture},
    net::SocketAddr,
    sync::Arc,
    time::Duration,
};
use tokio::{net::TcpListener, signal, sync::Notify};
use tracing::{info, warn};

use crate::{
    config::{Config, CorsConfig},
    features::{self, AppState},
    middleware,
    storage::SharedStore,
};

/// Create the application router with all routes and middleware
///
/// Layers run outermost first: request id, CORS, tracing, panic capture.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    features::router(state)
        .layer(middleware::catch_panic_layer())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(cors))
        .layer(axum_middleware::from_fn(middleware::request_id))
}

/// Bind the configured address and serve until a shutdown signal arrives
pub async fn serve(config: Config, store: SharedStore) -> anyhow::Result<()> {
    let state = AppState::new(store, config.storage.region.as_str());
    let app = create_router(state, &config.cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", listener.local_addr()?);

    serve_with_shutdown(
        listener,
        app,
        shutdown_signal(),
        Duration::from_secs(config.server.shutdown_timeout_secs),
    )
    .await
}

/// Serve `app` until `signal` resolves, then drain open connections for at
/// most `grace`.
///
/// The listener stops accepting as soon as the signal fires. Connections
/// still open when the grace period ends are abandoned.
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let signalled = signalled.clone();
        async move {
            signal.await;
            signalled.notify_one();
        }
    });

    let grace_elapsed = async {
        signalled.notified().await;
        info!("Waiting up to {} seconds for connections to close", grace.as_secs());
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server.into_future() => {
            result?;
            info!("Server shut down gracefully");
        },
        _ = grace_elapsed => {
            warn!("Shutdown grace period elapsed, dropping open connections");
        },
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
