use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ShopError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ShopError {
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal I/O error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("Malformed row {row} in '{}': {source}", .path.display())]
    MalformedRow {
        path:   PathBuf,
        row:    u64,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid {field} '{input}': {reason}")]
    InvalidInput {
        field:  &'static str,
        input:  String,
        reason: String,
    },

    #[error("Input closed while waiting for {0}")]
    InputClosed(&'static str),

    #[cfg(feature = "cli")]
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("{0}")]
    Any(String),
}

impl ShopError {
    pub fn io<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_input<E: ToString>(field: &'static str, input: &str, reason: E) -> Self {
        Self::InvalidInput {
            field,
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[macro_export]
macro_rules! shoperr {
    ($($arg:tt)+) => {
        $crate::types::ShopError::Any(format!($($arg)+))
    };
}
