use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a molecule catalog.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog file could not be read.
    #[error("failed to read catalog file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog document is not valid TOML or does not fit the schema.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    /// An entry violates a catalog invariant.
    #[error("invalid catalog entry #{index} ({name}): {detail}")]
    InvalidEntry {
        /// Zero-based position of the entry in the catalog.
        index: usize,
        /// Entry name, or `<unnamed>` when the name itself is missing.
        name: String,
        detail: String,
    },
}

impl Error {
    pub fn invalid_entry(index: usize, name: &str, detail: impl Into<String>) -> Self {
        let name = if name.trim().is_empty() {
            "<unnamed>".to_string()
        } else {
            name.to_string()
        };
        Self::InvalidEntry {
            index,
            name,
            detail: detail.into(),
        }
    }
}
