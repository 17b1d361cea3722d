use std::path::PathBuf;

/// Fatal failure while producing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Creating, writing or flushing a file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An emission config file could not be parsed.
    #[error("invalid config '{path}': {message}")]
    Config { path: String, message: String },
}
