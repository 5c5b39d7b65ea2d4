use crate::selector::SelectorError;
use thiserror::Error;

/// Errors raised by properties finders.
#[derive(Debug, Error)]
pub enum FinderError {
    /// The properties source could not be read.
    #[error("Failed to read properties from '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The properties source was read but is not a valid properties mapping.
    #[error("Failed to parse properties from '{name}'")]
    Parse {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// A lookup value could not be used as a selector.
    #[error("Invalid selector in lookup value")]
    Selector(#[from] SelectorError),

    /// Backend specific lookup failure.
    #[error("Properties lookup failed: {0}")]
    Lookup(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
