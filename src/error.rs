// Error taxonomy for catalog, event log and persistence operations.
//
// Every failure is recoverable by the caller: the core never exits the process.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad input shape (empty title, negative or non-integer rating, unknown flag)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A record with this exact title already exists
    #[error("a movie titled '{0}' is already in the list")]
    DuplicateTitle(String),

    /// Lookup or filter produced nothing (includes the empty catalog)
    #[error("no movies found: {0}")]
    NotFound(String),

    /// File open/read/write failure
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted data is structurally invalid
    #[error("malformed document: {0}")]
    MalformedDocument(String),
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_names_title() {
        let err = CatalogError::DuplicateTitle("Dune".to_string());
        assert_eq!(err.to_string(), "a movie titled 'Dune' is already in the list");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CatalogError::io("data/movieList.json", source);

        assert!(err.to_string().contains("data/movieList.json"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(!err.is_not_found());
    }
}
