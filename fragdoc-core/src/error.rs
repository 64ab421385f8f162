//! Error type shared by every stage of the assembly pipeline.
//!
//! Errors travel in-band: a [`LineStream`](crate::transforms::LineStream) yields
//! `Err(AssembleError)` items, and every consumer stops at the first one.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssembleError {
    /// A fragment file referenced by the manifest does not exist.
    #[error("fragment not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An override directive without a block kind after it.
    #[error("override directive without a block kind: {:?}", line.trim_end())]
    MalformedOverride { line: String },

    /// Any other read or write failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl AssembleError {
    /// Map an error raised while opening `path`, keeping missing files distinct.
    pub fn from_open(path: impl Into<PathBuf>, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            AssembleError::NotFound {
                path: path.into(),
                source: err,
            }
        } else {
            AssembleError::Io(err)
        }
    }
}
