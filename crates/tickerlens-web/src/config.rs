//! Runtime configuration assembled from CLI arguments and environment.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::http::HeaderValue;
use tickerlens_warehouse::LedgerConfig;

use crate::cli::ServeArgs;
use crate::ServerError;

/// How `Access-Control-Allow-Origin` is chosen for a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Reflect the request's `Origin` verbatim; empty when absent.
    #[default]
    Echo,
    /// Reflect the request's `Origin` only when listed; empty otherwise.
    AllowList(Vec<String>),
}

impl OriginPolicy {
    pub fn from_allowed(origins: &[String]) -> Self {
        if origins.is_empty() {
            Self::Echo
        } else {
            Self::AllowList(origins.to_vec())
        }
    }

    /// Header value to send back for a request carrying `origin`.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        let empty = HeaderValue::from_static("");
        match (self, origin) {
            (_, None) => empty,
            (Self::Echo, Some(origin)) => origin.clone(),
            (Self::AllowList(allowed), Some(origin)) => match origin.to_str() {
                Ok(value) if allowed.iter().any(|entry| entry == value) => origin.clone(),
                _ => empty,
            },
        }
    }
}

/// Settings for `tickerlens serve`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub ledger: LedgerConfig,
    pub alphavantage_key: String,
    pub upstream_timeout: Duration,
    pub origin_policy: OriginPolicy,
}

impl ServerConfig {
    pub fn from_args(db_path: Option<&Path>, args: &ServeArgs) -> Result<Self, ServerError> {
        let listen = args.listen.parse::<SocketAddr>().map_err(|e| {
            ServerError::Config(format!("listen address '{}': {e}", args.listen))
        })?;
        if args.timeout_ms == 0 {
            return Err(ServerError::Config(String::from(
                "timeout-ms must be greater than zero",
            )));
        }
        if args.alphavantage_key.trim().is_empty() {
            return Err(ServerError::Config(String::from(
                "alphavantage key must not be empty",
            )));
        }

        Ok(Self {
            listen,
            ledger: ledger_config(db_path),
            alphavantage_key: args.alphavantage_key.clone(),
            upstream_timeout: Duration::from_millis(args.timeout_ms),
            origin_policy: OriginPolicy::from_allowed(&args.allowed_origins),
        })
    }

    /// Upstream timeout in whole milliseconds, saturating at `u64::MAX`.
    pub fn upstream_timeout_ms(&self) -> u64 {
        u64::try_from(self.upstream_timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Ledger location: the explicit path when given, otherwise the home default.
pub fn ledger_config(db_path: Option<&Path>) -> LedgerConfig {
    match db_path {
        Some(path) => LedgerConfig::with_db_path(path),
        None => LedgerConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn serve_args(argv: &[&str]) -> (Option<std::path::PathBuf>, ServeArgs) {
        let cli = Cli::try_parse_from(argv).expect("valid arguments");
        match cli.command {
            Command::Serve(args) => (cli.db_path, args),
            other => panic!("expected serve, got {other:?}"),
        }
    }

    #[test]
    fn explicit_flags_build_config() {
        let (db_path, args) = serve_args(&[
            "tickerlens",
            "serve",
            "--listen",
            "127.0.0.1:9000",
            "--db-path",
            "/tmp/tl/history.duckdb",
            "--alphavantage-key",
            "abc",
            "--timeout-ms",
            "1500",
            "--allowed-origin",
            "https://a.example",
            "--allowed-origin",
            "https://b.example",
        ]);

        let config = ServerConfig::from_args(db_path.as_deref(), &args).expect("valid config");

        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.ledger.db_path, Path::new("/tmp/tl/history.duckdb"));
        assert_eq!(config.upstream_timeout, Duration::from_millis(1500));
        assert_eq!(config.upstream_timeout_ms(), 1500);
        assert_eq!(
            config.origin_policy,
            OriginPolicy::AllowList(vec!["https://a.example".into(), "https://b.example".into()])
        );
    }

    #[test]
    fn oversized_timeout_saturates_in_milliseconds() {
        let (db_path, args) = serve_args(&["tickerlens", "serve", "--alphavantage-key", "abc"]);
        let mut config = ServerConfig::from_args(db_path.as_deref(), &args).expect("valid config");

        config.upstream_timeout = Duration::MAX;

        assert_eq!(config.upstream_timeout_ms(), u64::MAX);
    }

    #[test]
    fn rejects_bad_listen_address_and_zero_timeout() {
        let (db_path, mut args) = serve_args(&["tickerlens", "serve", "--listen", "nope"]);
        let err = ServerConfig::from_args(db_path.as_deref(), &args).expect_err("bad listen");
        assert!(matches!(err, ServerError::Config(_)));

        args.listen = String::from("127.0.0.1:8888");
        args.timeout_ms = 0;
        let err = ServerConfig::from_args(db_path.as_deref(), &args).expect_err("zero timeout");
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn echo_policy_reflects_origin_or_empty() {
        let origin = HeaderValue::from_static("https://app.example");
        assert_eq!(OriginPolicy::Echo.allow_origin(Some(&origin)), origin);
        assert_eq!(OriginPolicy::Echo.allow_origin(None), "");
    }

    #[test]
    fn allow_list_policy_blanks_unlisted_origins() {
        let policy = OriginPolicy::from_allowed(&["https://app.example".to_string()]);
        let listed = HeaderValue::from_static("https://app.example");
        let other = HeaderValue::from_static("https://evil.example");

        assert_eq!(policy.allow_origin(Some(&listed)), listed);
        assert_eq!(policy.allow_origin(Some(&other)), "");
    }
}
