use thiserror::Error;

/// Unified result type for the reflow engine.
pub type Result<T> = std::result::Result<T, ReflowError>;

/// Errors surfaced while building or querying a reflow table.
///
/// Malformed descriptor tokens and exhausted placement searches are not
/// errors; they degrade silently (or through a log event) instead.
#[derive(Debug, Error)]
pub enum ReflowError {
    #[error("grid defines no cells")]
    EmptyGrid,
    #[error("invalid breakpoint profile: {0}")]
    InvalidProfile(String),
    #[error("breakpoint `{0}` not found")]
    UnknownBreakpoint(String),
    #[error("cell `{0}` not found")]
    UnknownCell(String),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
