use tickerlens_warehouse::{HistoryLedger, LedgerConfig};

use crate::provider::{HistoryStore, ProviderFuture, SourceError};
use crate::{HistoryRecord, ProviderId, Symbol};

/// History store backed by the DuckDB ledger.
///
/// Ledger calls block, so each one runs on the blocking pool.
#[derive(Clone)]
pub struct DuckDbHistoryStore {
    ledger: HistoryLedger,
}

impl DuckDbHistoryStore {
    pub fn new(ledger: HistoryLedger) -> Self {
        Self { ledger }
    }

    pub fn open(config: LedgerConfig) -> Self {
        Self::new(HistoryLedger::new(config))
    }
}

impl HistoryStore for DuckDbHistoryStore {
    fn id(&self) -> ProviderId {
        ProviderId::Duckdb
    }

    fn record<'a>(&'a self, user_id: &'a str, symbol: &'a Symbol) -> ProviderFuture<'a, ()> {
        let ledger = self.ledger.clone();
        let user_id = user_id.to_owned();
        let symbol = symbol.as_str().to_owned();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || ledger.append(&user_id, &symbol))
                .await
                .map_err(|e| SourceError::store_unavailable(format!("history task failed: {e}")))?
                .map_err(SourceError::from)
        })
    }

    fn history<'a>(&'a self, user_id: &'a str) -> ProviderFuture<'a, Vec<HistoryRecord>> {
        let ledger = self.ledger.clone();
        let user_id = user_id.to_owned();
        Box::pin(async move {
            tokio::task::spawn_blocking(move || ledger.list_by_user(&user_id))
                .await
                .map_err(|e| SourceError::store_unavailable(format!("history task failed: {e}")))?
                .map_err(SourceError::from)
        })
    }
}
