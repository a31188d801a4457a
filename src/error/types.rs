use thiserror::Error;

/// Unified result type for the engine.
pub type Result<T> = std::result::Result<T, WindowError>;

/// Errors surfaced by the window engine. All of them are caller-contract
/// violations discovered synchronously at the offending call; none are
/// retried or swallowed, and no operation leaves partial state behind.
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("window `{0}` already registered")]
    DuplicateName(String),
    #[error("window `{0}` not found")]
    UnknownWindow(String),
    #[error("cell ({row}, {col}) outside grid of {rows} x {cols}")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("geometry source for `{name}` produced a zero-extent rect ({width} x {height})")]
    InvalidGeometry {
        name: String,
        width: u16,
        height: u16,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
