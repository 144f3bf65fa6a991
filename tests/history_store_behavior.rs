//! Behaviour tests for the DuckDB-backed history store.

use tempfile::tempdir;
use tickerlens_core::{
    DuckDbHistoryStore, HistoryRecord, HistoryStore, LedgerConfig, ProviderId, SourceErrorKind,
    Symbol,
};

fn store_in(dir: &std::path::Path) -> DuckDbHistoryStore {
    DuckDbHistoryStore::open(LedgerConfig::with_db_path(dir.join("history.duckdb")))
}

#[tokio::test]
async fn recorded_lookup_appears_in_user_history() {
    // Given: An empty store
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    let ibm = Symbol::parse("IBM").expect("symbol");

    // When: u1 looks up IBM
    store.record("u1", &ibm).await.expect("record");

    // Then: u1's history contains the lookup
    let history = store.history("u1").await.expect("history");
    assert_eq!(history, vec![HistoryRecord::new("u1", "IBM")]);
    assert_eq!(store.id(), ProviderId::Duckdb);
}

#[tokio::test]
async fn history_is_append_only_and_per_user() {
    let dir = tempdir().expect("tempdir");
    let store = store_in(dir.path());
    let ibm = Symbol::parse("IBM").expect("symbol");
    let aapl = Symbol::parse("AAPL").expect("symbol");

    store.record("u1", &ibm).await.expect("record");
    store.record("u1", &ibm).await.expect("record");
    store.record("u2", &aapl).await.expect("record");

    let u1 = store.history("u1").await.expect("history");
    assert_eq!(u1.len(), 2, "repeat lookups are kept");
    assert!(u1.iter().all(|r| r.user_id == "u1" && r.symbol == "IBM"));

    let u2 = store.history("u2").await.expect("history");
    assert_eq!(u2, vec![HistoryRecord::new("u2", "AAPL")]);

    assert!(store.history("nobody").await.expect("history").is_empty());
}

#[tokio::test]
async fn history_survives_a_new_store_instance() {
    let dir = tempdir().expect("tempdir");
    let ibm = Symbol::parse("IBM").expect("symbol");

    store_in(dir.path()).record("u1", &ibm).await.expect("record");

    let reopened = store_in(dir.path());
    assert_eq!(reopened.history("u1").await.expect("history").len(), 1);
}

#[tokio::test]
async fn unreachable_store_is_store_unavailable() {
    // Given: A database path underneath a regular file
    let dir = tempdir().expect("tempdir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").expect("write blocker");
    let store = DuckDbHistoryStore::open(LedgerConfig::with_db_path(blocker.join("history.duckdb")));
    let ibm = Symbol::parse("IBM").expect("symbol");

    // Then: Both operations fail as StoreUnavailable
    let err = store.record("u1", &ibm).await.expect_err("unreachable");
    assert_eq!(err.kind(), SourceErrorKind::StoreUnavailable);
    let err = store.history("u1").await.expect_err("unreachable");
    assert_eq!(err.code(), "source.store_unavailable");
}
