use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal too small: {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

/// Result type for TUI operations
pub type TuiResult<T> = Result<T, TuiError>;
