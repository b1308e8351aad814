//! Structured error types for sheetview.
//!
//! Only setup mistakes are errors. Stale indices, missing provider cells and
//! unsupported selections fall back to safe defaults instead.

/// All errors that sheetview reports to its caller.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// A reuse identifier was registered twice.
    #[error("reuse identifier `{0}` is already registered")]
    DuplicateReuseIdentifier(String),

    /// A cell was dequeued for an identifier that was never registered.
    #[error("reuse identifier `{0}` was not registered for reuse")]
    UnregisteredReuseIdentifier(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetError>;
