//! Error handling module for the catalog engine
//!
//! Every failure mode degrades to a smaller, still-consistent catalog. None of
//! these errors is fatal to the process.

use thiserror::Error;

/// Main error type for the catalog engine
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Entry failed field checks; the operation was aborted
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted payload could not be parsed
    #[error("Failed to read user scripts: {0}")]
    PersistenceRead(String),

    /// Storage medium rejected a write; the mutation is not durable
    #[error("Failed to save user scripts: {0}")]
    PersistenceWrite(String),

    /// No user entry with this id
    #[error("Script {0} not found")]
    NotFound(u64),

    /// Insertion would duplicate an id already in the catalog
    #[error("Script id {0} is already in use")]
    IdCollision(u64),

    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a persistence read error
    pub fn persistence_read(msg: impl Into<String>) -> Self {
        Self::PersistenceRead(msg.into())
    }

    /// Create a persistence write error
    pub fn persistence_write(msg: impl Into<String>) -> Self {
        Self::PersistenceWrite(msg.into())
    }

    /// True when the error means a mutation did not reach storage
    pub fn is_not_durable(&self) -> bool {
        matches!(self, Self::PersistenceWrite(_) | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::validation("title is required");
        assert_eq!(err.to_string(), "Validation error: title is required");

        let err = CatalogError::NotFound(42);
        assert_eq!(err.to_string(), "Script 42 not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CatalogError = io_err.into();
        assert!(matches!(err, CatalogError::Io(_)));
        assert!(err.is_not_durable());
    }

    #[test]
    fn test_error_constructors() {
        let err = CatalogError::persistence_read("bad json");
        assert!(matches!(err, CatalogError::PersistenceRead(_)));
        assert!(!err.is_not_durable());

        let err = CatalogError::persistence_write("quota exceeded");
        assert!(matches!(err, CatalogError::PersistenceWrite(_)));
        assert!(err.is_not_durable());
    }
}
