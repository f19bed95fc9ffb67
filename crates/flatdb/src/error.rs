use crate::validate::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`StoreError`].
///
/// Callers branch on this rather than on individual variants: an HTTP front end,
/// for example, maps it straight to a status code via [`StoreError::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or malformed identifiers, rejected payloads, bad queries.
    InvalidInput,
    /// The resource (or whole collection) does not exist.
    NotFound,
    /// Filesystem or (de)serialization failure.
    Internal,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid {what} '{value}': {reason}")]
    InvalidIdentifier {
        what: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("validation failed for collection '{collection}': {source}")]
    Validation {
        collection: String,
        #[source]
        source: ValidationError,
    },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("resource '{resource}' not found in collection '{collection}'")]
    NotFound {
        collection: String,
        resource: String,
    },

    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("failed to {context} '{}': {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {context}: {source}")]
    Serialization {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch write failed at '{resource}': {source}")]
    Batch {
        resource: String,
        #[source]
        source: Box<StoreError>,
    },

    #[error("Store error: {0}")]
    Store(String),
}

impl StoreError {
    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn serialization(context: &'static str, source: serde_json::Error) -> Self {
        StoreError::Serialization { context, source }
    }

    pub(crate) fn not_found(collection: &str, resource: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidIdentifier { .. }
            | StoreError::Validation { .. }
            | StoreError::InvalidQuery(_) => ErrorKind::InvalidInput,
            StoreError::NotFound { .. } | StoreError::CollectionNotFound(_) => ErrorKind::NotFound,
            StoreError::Io { .. }
            | StoreError::Serialization { .. }
            | StoreError::Batch { .. }
            | StoreError::Store(_) => ErrorKind::Internal,
        }
    }

    /// HTTP-flavoured status code for the error's kind (400, 404 or 500).
    pub fn code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kinds_map_to_codes() {
        let err = StoreError::not_found("bands", "rush");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.code(), 404);

        let err = StoreError::InvalidQuery("unknown operator 'ne'".into());
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.code(), 400);

        let err = StoreError::Store("boom".into());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn io_error_keeps_cause_and_path() {
        let cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StoreError::io("write file", "/tmp/x.json", cause);

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert!(err.to_string().contains("/tmp/x.json"));
        assert!(err.source().is_some());
    }

    #[test]
    fn batch_error_is_internal_and_chains_inner() {
        let inner = StoreError::Validation {
            collection: "bands".into(),
            source: ValidationError::new("missing field 'name'"),
        };
        let err = StoreError::Batch {
            resource: "yes".into(),
            source: Box::new(inner),
        };

        assert_eq!(err.kind(), ErrorKind::Internal);
        let source = err.source().expect("batch error has a source");
        assert!(source.to_string().contains("missing field 'name'"));
    }
}
