//! HTTP facade for tickerlens.
//!
//! Serves three commands over plain HTTP:
//! - `/news?symbol=S` headlines for a symbol
//! - `/plot?symbol=S` daily candles for a symbol
//! - `/db?user=U&symbol=S` records a lookup in the history store
//!
//! The binary also exposes `history` and `purge-history` for the store.

pub mod cli;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod routes;
pub mod telemetry;

pub use config::{OriginPolicy, ServerConfig};
pub use dispatch::{Dispatcher, Endpoint, Outcome};
pub use error::ServerError;
pub use routes::router;
