use thiserror::Error;

/// Startup and command failures mapped to process exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error("failed to initialise logging: {0}")]
    Telemetry(String),

    #[error(transparent)]
    Store(#[from] tickerlens_warehouse::StoreError),

    #[error(transparent)]
    Source(#[from] tickerlens_core::SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Bind { .. } => 3,
            Self::Store(_) | Self::Source(_) => 4,
            Self::Telemetry(_) | Self::Serialization(_) | Self::Io(_) => 10,
        }
    }
}
