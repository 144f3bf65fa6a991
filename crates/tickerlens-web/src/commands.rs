//! Subcommand implementations.

use tickerlens_core::{DuckDbHistoryStore, HistoryRecord, HistoryStore};
use tickerlens_warehouse::{HistoryLedger, LedgerConfig};

use crate::config::ServerConfig;
use crate::dispatch::Dispatcher;
use crate::routes::router;
use crate::ServerError;

/// Bind the listener and serve until the process is stopped.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let dispatcher = Dispatcher::from_config(&config);
    let app = router(dispatcher);

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.listen,
            source,
        })?;
    tracing::info!(
        listen = %config.listen,
        db_path = %config.ledger.db_path.display(),
        timeout_ms = config.upstream_timeout_ms(),
        "tickerlens listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Recorded lookups for `user_id`.
pub async fn history(ledger: LedgerConfig, user_id: &str) -> Result<Vec<HistoryRecord>, ServerError> {
    let store = DuckDbHistoryStore::open(ledger);
    Ok(store.history(user_id).await?)
}

/// Remove every recorded lookup; returns the number removed.
pub async fn purge_history(ledger: LedgerConfig) -> Result<usize, ServerError> {
    let ledger = HistoryLedger::new(ledger);
    let removed = tokio::task::spawn_blocking(move || ledger.purge())
        .await
        .map_err(|e| ServerError::Io(std::io::Error::other(e)))??;
    Ok(removed)
}
