//! Error type shared by the harness.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("vector lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("non-finite element {value} at index {index} of the {side} vector")]
    NonFinite {
        side: &'static str,
        index: usize,
        value: f64,
    },

    #[error("algorithm '{name}' not found (available: {available})")]
    UnknownAlgorithm { name: String, available: String },

    #[error("variant '{variant}' failed verification: {reason}")]
    Verification { variant: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write CSV to {path}")]
    Csv {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("logger initialization failed")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

pub type Result<T> = std::result::Result<T, BenchError>;
