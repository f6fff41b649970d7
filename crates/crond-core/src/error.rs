//! Application-level error type shared across crond crates.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrondError>;

#[derive(Debug, Error)]
pub enum CrondError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Crontab line {line}: {message}")]
    Crontab { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
