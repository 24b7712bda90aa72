//! Error taxonomy shared by the tree and asset operations
//!
//! Three failure kinds cover the whole surface: a caller omitted a required
//! argument, the host loader had nothing at a path, or a value exists but is
//! not of the requested type. All three are raised at the point of detection
//! and are meant to surface to the caller, not to be caught and retried.

use thiserror::Error;

/// Errors raised by scene-tree queries, resource loading, and instancing
#[derive(Debug, Error)]
pub enum SceneError {
    /// A required argument was absent or empty
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),

    /// The host loader produced nothing for the given path
    #[error("resource not found: {path}")]
    ResourceNotFound {
        /// Path that was requested from the host loader
        path: String,
    },

    /// A value was produced but does not satisfy the requested type or capability
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The requested type or capability
        expected: &'static str,
        /// What was actually produced
        actual: String,
    },
}

impl SceneError {
    /// Shorthand for a [`SceneError::TypeMismatch`] with a described actual value
    pub fn type_mismatch(expected: &'static str, actual: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected,
            actual: actual.into(),
        }
    }
}
