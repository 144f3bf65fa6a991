//! Core contracts for tickerlens.
//!
//! This crate contains:
//! - Domain values (`Symbol`, `DailyCandle`, `Headline`, `HistoryRecord`)
//! - The provider contracts and the `SourceError` taxonomy
//! - The Candle Normalizer and the Headline Extractor
//! - Default adapters for Alpha Vantage, Yahoo Finance and the DuckDB ledger

pub mod adapters;
pub mod candles;
pub mod domain;
pub mod error;
pub mod headlines;
pub mod http_client;
pub mod provider;
pub mod source;

pub use adapters::{
    AlphaVantageSeriesAdapter, DuckDbHistoryStore, YahooNewsAdapter, ALPHAVANTAGE_BASE_URL,
};
pub use candles::{normalize, CandleError};
pub use domain::{DailyCandle, Headline, HistoryRecord, Symbol, TradingDate};
pub use error::ValidationError;
pub use headlines::{HeadlineError, HeadlineExtractor, STORY_MARKER_CLASS, YAHOO_ORIGIN};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};
pub use provider::{
    HistoryStore, NewsProvider, ProviderFuture, SeriesProvider, SourceError, SourceErrorKind,
};
pub use source::ProviderId;
pub use tickerlens_warehouse::{HistoryLedger, LedgerConfig, StoreError};
