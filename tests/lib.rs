// Shared fixtures for the behaviour tests.
pub use tickerlens_core::Symbol;

/// Two IBM sessions, newest first, as Alpha Vantage returns them.
pub const IBM_SERIES: &str = r#"{
    "Meta Data": {"2. Symbol": "IBM"},
    "Time Series (Daily)": {
        "2024-03-08": {"1. open": "195.0900", "2. high": "196.5000", "3. low": "194.3100", "4. close": "196.1600", "5. volume": "3914121"},
        "2024-03-07": {"1. open": "193.2000", "2. high": "195.0000", "3. low": "192.8800", "4. close": "194.9500", "5. volume": "2900000"}
    }
}"#;

/// Alpha Vantage body for a symbol it does not know.
pub const INVALID_CALL: &str = r#"{"Error Message":"Invalid API call. Please retry or visit the documentation (https://www.alphavantage.co/documentation/) for TIME_SERIES_DAILY."}"#;

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}
