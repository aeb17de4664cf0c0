use thiserror::Error;

/// Top-level error type for Tempo.
#[derive(Debug, Error)]
pub enum TempoError {
    /// A response could not be delivered over the transport.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Error from a transport while receiving requests.
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Persistence error.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
