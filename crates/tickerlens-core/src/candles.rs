//! Daily time-series normalization.
//!
//! Turns the Alpha Vantage `TIME_SERIES_DAILY` payload into an ascending
//! sequence of [`DailyCandle`]s. Upstream failure notices arrive as HTTP 200
//! JSON bodies, so the raw text is classified before any structured parsing.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{DailyCandle, TradingDate};

/// Envelope key holding the per-day map.
pub const TIME_SERIES_LABEL: &str = "Time Series (Daily)";

/// Substrings marking an upstream throttle notice. Checked first.
pub const RATE_LIMIT_SENTINELS: [&str; 3] = ["\"Note\"", "API call frequency", "API rate limit"];

/// Substring marking an upstream rejection of the requested symbol.
pub const INVALID_SYMBOL_SENTINEL: &str = "Invalid API call";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CandleError {
    #[error("upstream rate limit notice")]
    RateLimited,

    #[error("upstream rejected the symbol")]
    InvalidSymbol,

    #[error("malformed time series payload: {0}")]
    MalformedPayload(String),
}

#[derive(Debug, Deserialize)]
struct SeriesEnvelope {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct DailyRecord {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

/// Parse a raw daily-series payload into candles sorted ascending by date.
///
/// An empty series object is a valid empty result. Any malformed entry
/// fails the whole payload.
pub fn normalize(raw_payload: &str) -> Result<Vec<DailyCandle>, CandleError> {
    classify_notice(raw_payload)?;

    let envelope: SeriesEnvelope = serde_json::from_str(raw_payload)
        .map_err(|e| CandleError::MalformedPayload(format!("invalid JSON envelope: {e}")))?;
    let series = envelope.series.ok_or_else(|| {
        CandleError::MalformedPayload(format!("missing '{TIME_SERIES_LABEL}' object"))
    })?;

    let mut candles = series
        .into_iter()
        .map(|(date, entry)| parse_day(&date, entry))
        .collect::<Result<Vec<_>, _>>()?;

    candles.sort_by_key(|candle| candle.date);

    if let Some(pair) = candles.windows(2).find(|pair| pair[0].date == pair[1].date) {
        return Err(CandleError::MalformedPayload(format!(
            "duplicate date {}",
            pair[0].date
        )));
    }

    Ok(candles)
}

fn classify_notice(raw_payload: &str) -> Result<(), CandleError> {
    if RATE_LIMIT_SENTINELS
        .iter()
        .any(|sentinel| raw_payload.contains(sentinel))
    {
        return Err(CandleError::RateLimited);
    }
    if raw_payload.contains(INVALID_SYMBOL_SENTINEL) {
        return Err(CandleError::InvalidSymbol);
    }
    Ok(())
}

fn parse_day(date: &str, entry: Value) -> Result<DailyCandle, CandleError> {
    let date = TradingDate::parse(date).map_err(|e| CandleError::MalformedPayload(e.to_string()))?;
    let record: DailyRecord = serde_json::from_value(entry)
        .map_err(|e| CandleError::MalformedPayload(format!("entry {date}: {e}")))?;

    Ok(DailyCandle::new(
        date,
        parse_price(date, "open", &record.open)?,
        parse_price(date, "high", &record.high)?,
        parse_price(date, "low", &record.low)?,
        parse_price(date, "close", &record.close)?,
        record.volume.trim().parse::<u64>().map_err(|_| {
            CandleError::MalformedPayload(format!(
                "entry {date}: volume '{}' is not a non-negative integer",
                record.volume
            ))
        })?,
    ))
}

fn parse_price(date: TradingDate, field: &str, raw: &str) -> Result<Decimal, CandleError> {
    Decimal::from_str(raw.trim()).map_err(|_| {
        CandleError::MalformedPayload(format!("entry {date}: {field} '{raw}' is not a decimal"))
    })
}
