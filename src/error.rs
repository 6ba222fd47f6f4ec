//! Error types for streams, the catalog and the pipeline runner.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A failure carried as the terminal status of a stream.
///
/// A clean end of stream is not an error; streams signal it by ending.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidEncoding { offset: u64 },

    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl StreamError {
    pub fn is_invalid_encoding(&self) -> bool {
        matches!(self, StreamError::InvalidEncoding { .. })
    }
}

/// Raised while resolving catalog keys, before any input is processed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown transformer: {0}")]
    UnknownKey(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("write error: {0}")]
    Write(#[source] io::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to start stage thread: {0}")]
    Spawn(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_encoding_message() {
        let err = StreamError::InvalidEncoding { offset: 7 };
        assert_eq!(err.to_string(), "invalid UTF-8 at byte 7");
        assert!(err.is_invalid_encoding());
    }

    #[test]
    fn test_catalog_error_converts() {
        let err: PipelineError = CatalogError::UnknownKey("bogus".to_string()).into();
        assert_eq!(err.to_string(), "unknown transformer: bogus");
    }

    #[test]
    fn test_io_error_is_not_encoding() {
        let err = StreamError::from(io::Error::other("disk gone"));
        assert!(!err.is_invalid_encoding());
        assert_eq!(err.to_string(), "read error: disk gone");
    }
}
