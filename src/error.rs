use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GhostwriteError {
    #[error("Cannot read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
