//! Error types for the Galaxy3D scene graph
//!
//! This module defines the error types used throughout the scene graph,
//! including structural edits, traversal, and device buffer configuration.

use std::fmt;

/// Result type for Galaxy3D scene graph operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D scene graph errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (device, lock poisoning, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, texture, geometry, etc.)
    InvalidResource(String),

    /// Invalid argument (unknown node key, index out of range, illegal edge, etc.)
    InvalidArgument(String),

    /// A matrix that must be inverted is singular
    SingularMatrix(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::SingularMatrix(msg) => write!(f, "Singular matrix: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
