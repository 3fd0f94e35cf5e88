//! Error types.

use thiserror::Error;

/// An invalid predictor configuration, detected when building a predictor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid counter width: {bits} bits (expected 1..=8)")]
    CounterWidth { bits: u8 },

    #[error("invalid history table size: {size} entries (must be a power of two)")]
    HistoryTableSize { size: usize },

    /// The tables for this many history bits can't be allocated.
    #[error("invalid history length: {bits} bits")]
    HistoryLength { bits: usize },

    #[error("invalid instruction shift amount: {bits} bits")]
    ShiftAmount { bits: u32 },
}

/// Failure to load a branch trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to read trace '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trace '{name}' is {len} bytes, not a multiple of the {record}-byte record size")]
    Truncated { name: String, len: usize, record: usize },
}
