//! Unified error handling for SceneBridge
//!
//! Every failure the exporter can report is one of these variants. The three
//! domain kinds drive recovery: malformed geometry is replaced with a safe
//! default, unresolvable references drop the optional field, and violated
//! preconditions abort the export.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all SceneBridge operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    // ==================== Serialization Errors ====================

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be decoded
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ==================== Scene Errors ====================

    /// Geometry that cannot be flattened as-is (degenerate polygon,
    /// out-of-range index, non-finite normal)
    #[error("Malformed geometry in '{node}': {message}")]
    MalformedGeometry {
        node: String,
        message: String,
    },

    /// A material, texture node or parameter reference that points nowhere
    #[error("Unresolvable reference: {reference}")]
    UnresolvableReference {
        reference: String,
    },

    /// An invariant downstream consumers rely on does not hold
    #[error("Precondition violated: {message}")]
    PreconditionViolated {
        message: String,
    },

    /// Required node parameter is absent
    #[error("Missing parameter '{name}' on '{node}'")]
    MissingParameter {
        node: String,
        name: String,
    },

    /// Node parameter has an unexpected value type
    #[error("Parameter '{name}' on '{node}' is not a {expected}")]
    ParameterType {
        node: String,
        name: String,
        expected: &'static str,
    },

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Recovered by substituting a default value
    MalformedGeometry,
    /// Recovered by omitting the optional field
    UnresolvableReference,
    /// Aborts the export
    PreconditionViolated,
    /// Input document is unreadable or has the wrong shape
    InvalidInput,
    /// Filesystem failure
    Io,
}

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a malformed geometry error
    pub fn malformed_geometry(node: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedGeometry {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Create an unresolvable reference error
    pub fn unresolvable(reference: impl Into<String>) -> Self {
        Error::UnresolvableReference {
            reference: reference.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition(message: impl Into<String>) -> Self {
        Error::PreconditionViolated {
            message: message.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_parameter(node: impl Into<String>, name: impl Into<String>) -> Self {
        Error::MissingParameter {
            node: node.into(),
            name: name.into(),
        }
    }

    /// Create a parameter type error
    pub fn parameter_type(
        node: impl Into<String>,
        name: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Error::ParameterType {
            node: node.into(),
            name: name.into(),
            expected,
        }
    }

    /// Classify this error, looking through context wrappers
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::FileNotFound(_) => ErrorKind::Io,
            Error::Json(_)
            | Error::Yaml(_)
            | Error::MissingParameter { .. }
            | Error::ParameterType { .. } => ErrorKind::InvalidInput,
            Error::MalformedGeometry { .. } => ErrorKind::MalformedGeometry,
            Error::UnresolvableReference { .. } => ErrorKind::UnresolvableReference,
            Error::PreconditionViolated { .. } => ErrorKind::PreconditionViolated,
            Error::WithContext { source, .. } => source.kind(),
        }
    }

    /// Check if the export can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedGeometry | ErrorKind::UnresolvableReference
        )
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_context() {
        let err = Error::FileNotFound(PathBuf::from("/scene.json"));
        let contextualized = err.with_context("while loading scene");

        assert!(contextualized.to_string().contains("while loading scene"));
    }

    #[test]
    fn test_kind_looks_through_context() {
        let err = Error::precondition("scene has no cameras").with_context("exporting");
        assert_eq!(err.kind(), ErrorKind::PreconditionViolated);
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_recoverable_kinds() {
        assert!(Error::malformed_geometry("Cube", "polygon 3 has 2 corners").is_recoverable());
        assert!(Error::unresolvable("material #4").is_recoverable());
        assert!(!Error::missing_parameter("Cube", "position").is_recoverable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::unresolvable("node 7"));
        let with_context = result.context("resolving 'Wood'");

        assert!(with_context.is_err());
        assert!(with_context.unwrap_err().to_string().contains("resolving 'Wood'"));
    }
}
