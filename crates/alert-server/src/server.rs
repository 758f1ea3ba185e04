use std::net::SocketAddr;

use alert_core::error::{AlertError, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

/// Bind `addr` and serve until Ctrl+C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AlertError::Server(format!("bind {addr} failed: {e}")))?;
    serve_on(listener, state, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_on<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| AlertError::Server(format!("listener has no address: {e}")))?;
    info!(addr = %local, rows = state.engine.table().len(), "query API listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AlertError::Server(format!("server failed: {e}")))?;

    info!("query API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}
