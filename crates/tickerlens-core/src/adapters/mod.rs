//! Default provider implementations.

mod alphavantage;
mod duckdb_history;
mod yahoo;

pub use alphavantage::{AlphaVantageSeriesAdapter, ALPHAVANTAGE_BASE_URL};
pub use duckdb_history::DuckDbHistoryStore;
pub use yahoo::YahooNewsAdapter;
