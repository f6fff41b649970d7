//! # crond core
//!
//! Configuration and the shared error type used by the scheduler crate and the CLI.

pub mod config;
pub mod error;

pub use config::{CrondConfig, LogConfig, PreviewConfig};
pub use error::{CrondError, Result};
