use std::io;
use std::path::PathBuf;

use crate::codec::DecodeError;

/// Failures raised by [`super::HistoryStore`]
///
/// Only the `try_*` methods return these. The plain methods log them and carry on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to resolve directory for category {category:?}: {source}")]
    PathResolution {
        category: String,
        #[source]
        source: io::Error,
    },

    #[error("History file already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }

    pub(crate) fn path_resolution(category: &str) -> impl FnOnce(io::Error) -> Self {
        let category = category.to_string();
        move |source| Self::PathResolution { category, source }
    }
}
