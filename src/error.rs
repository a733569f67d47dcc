use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can end a graph build. None of these are retried.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no PNG images found in {}", dir.display())]
    NoInputImages { dir: PathBuf },

    #[error("cannot list input directory {}: {source}", dir.display())]
    InputDirectory {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("unable to decode image {}: {source}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
