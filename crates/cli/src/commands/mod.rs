//! CLI command implementations.

pub mod cart;
pub mod render;

use cheesecake_cart::CartError;
use cheesecake_cart::config::ConfigError;
use thiserror::Error;

/// Errors that end a CLI invocation with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Cart(#[from] CartError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}
