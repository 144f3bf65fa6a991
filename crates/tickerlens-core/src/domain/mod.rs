//! # Domain Models
//!
//! Value types returned by the providers.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Caller-supplied ticker, trimmed and uppercased |
//! | [`TradingDate`] | Calendar date of a session (`YYYY-MM-DD`) |
//! | [`DailyCandle`] | One day of OHLC prices and volume |
//! | [`Headline`] | News headline text with an absolute link |
//! | [`HistoryRecord`] | One recorded (user, symbol) lookup |
//!
//! `DailyCandle` and `Headline` sequences are produced fresh for each
//! request and owned by the caller. `HistoryRecord`s live in the history
//! store; the core only appends and reads them.

mod date;
mod models;
mod symbol;

pub use date::TradingDate;
pub use models::{DailyCandle, Headline};
pub use symbol::Symbol;
pub use tickerlens_warehouse::HistoryRecord;
