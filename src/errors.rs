use std::io;
use thiserror::Error;

/// Error type shared across the shell's subsystems.
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("invalid destination")]
    InvalidDestination,

    #[error("{0}")]
    InvalidArgument(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type ShellResult<T> = Result<T, ShellError>;

impl ShellError {
    /// User-level errors are reported in-band and the prompt loop continues;
    /// everything else tears the shell down after cooked mode is restored.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ShellError::CommandNotFound(_) | ShellError::InvalidDestination
        )
    }
}
