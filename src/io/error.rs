use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("unknown output format '{0}' (expected svg or sdf)")]
    UnknownFormat(String),
}
