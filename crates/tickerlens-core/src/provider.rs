//! Provider contracts and the shared error taxonomy.
//!
//! # Contracts
//!
//! | Trait | Operation | Result |
//! |-------|-----------|--------|
//! | [`NewsProvider`] | [`fetch`](NewsProvider::fetch) | `Vec<Headline>`, document order |
//! | [`SeriesProvider`] | [`fetch`](SeriesProvider::fetch) | `Vec<DailyCandle>`, ascending by date |
//! | [`HistoryStore`] | [`record`](HistoryStore::record) / [`history`](HistoryStore::history) | append / `Vec<HistoryRecord>` |
//!
//! Implementations must be `Send + Sync`; the dispatcher shares them behind
//! `Arc<dyn ...>` across request tasks.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use tickerlens_warehouse::StoreError;

use crate::candles::CandleError;
use crate::headlines::HeadlineError;
use crate::http_client::HttpError;
use crate::{DailyCandle, Headline, HistoryRecord, ProviderId, Symbol};

/// Boxed future returned by every provider operation.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Network,
    Parse,
    MalformedPayload,
    EmptyResult,
    RateLimited,
    InvalidSymbol,
    StoreUnavailable,
    Internal,
}

/// Structured provider error. The message is for server-side logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Network, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Parse, message)
    }

    pub fn malformed_payload(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::MalformedPayload, message)
    }

    pub fn empty_result(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::EmptyResult, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_symbol(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidSymbol, message)
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::StoreUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Network => "source.network",
            SourceErrorKind::Parse => "source.parse",
            SourceErrorKind::MalformedPayload => "source.malformed_payload",
            SourceErrorKind::EmptyResult => "source.empty_result",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidSymbol => "source.invalid_symbol",
            SourceErrorKind::StoreUnavailable => "source.store_unavailable",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

impl From<CandleError> for SourceError {
    fn from(error: CandleError) -> Self {
        match error {
            CandleError::RateLimited => Self::rate_limited(error.to_string()),
            CandleError::InvalidSymbol => Self::invalid_symbol(error.to_string()),
            CandleError::MalformedPayload(_) => Self::malformed_payload(error.to_string()),
        }
    }
}

impl From<HeadlineError> for SourceError {
    fn from(error: HeadlineError) -> Self {
        match error {
            HeadlineError::EmptyResult => Self::empty_result(error.to_string()),
        }
    }
}

impl From<StoreError> for SourceError {
    fn from(error: StoreError) -> Self {
        Self::store_unavailable(error.to_string())
    }
}

impl From<HttpError> for SourceError {
    fn from(error: HttpError) -> Self {
        if error.timed_out() {
            Self::network(format!("upstream timed out: {}", error.message()))
        } else {
            Self::network(format!("upstream transport error: {}", error.message()))
        }
    }
}

/// Headline source for a symbol.
pub trait NewsProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch headlines in the upstream page's order.
    ///
    /// # Errors
    ///
    /// `Network` when the page cannot be fetched, `Parse` when the body is
    /// unusable, `EmptyResult` when no headline qualifies.
    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<Headline>>;
}

/// Daily candle source for a symbol.
pub trait SeriesProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch the daily series, oldest session first.
    ///
    /// # Errors
    ///
    /// `RateLimited`, `InvalidSymbol` and `MalformedPayload` classify the
    /// upstream body; `Network` covers transport failures and non-2xx
    /// statuses.
    fn fetch<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, Vec<DailyCandle>>;
}

/// Append-only per-user lookup history.
pub trait HistoryStore: Send + Sync {
    fn id(&self) -> ProviderId;

    fn record<'a>(&'a self, user_id: &'a str, symbol: &'a Symbol) -> ProviderFuture<'a, ()>;

    /// All records for `user_id` in the store's native order.
    fn history<'a>(&'a self, user_id: &'a str) -> ProviderFuture<'a, Vec<HistoryRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candle_errors_keep_their_classification() {
        assert_eq!(
            SourceError::from(CandleError::RateLimited).kind(),
            SourceErrorKind::RateLimited
        );
        assert_eq!(
            SourceError::from(CandleError::InvalidSymbol).code(),
            "source.invalid_symbol"
        );
        let malformed = SourceError::from(CandleError::MalformedPayload("entry 2024-01-02".into()));
        assert_eq!(malformed.kind(), SourceErrorKind::MalformedPayload);
        assert!(malformed.message().contains("entry 2024-01-02"));
    }

    #[test]
    fn store_and_transport_errors_map_to_single_kinds() {
        let store = SourceError::from(StoreError::Connection("refused".into()));
        assert_eq!(store.kind(), SourceErrorKind::StoreUnavailable);

        let timeout = SourceError::from(HttpError::timeout("5000ms elapsed"));
        assert_eq!(timeout.kind(), SourceErrorKind::Network);
        assert!(timeout.message().contains("timed out"));
    }

    #[test]
    fn display_includes_code() {
        let error = SourceError::empty_result("no anchors");
        assert_eq!(error.to_string(), "no anchors (source.empty_result)");
    }
}
