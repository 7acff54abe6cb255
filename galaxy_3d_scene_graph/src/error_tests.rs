//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug, Clone, std::error::Error).

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("geometry lock poisoned".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("geometry lock poisoned"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_argument_display() {
    let err = Error::InvalidArgument("drawable index 3 out of range".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid argument"));
    assert!(display.contains("drawable index 3 out of range"));
}

#[test]
fn test_singular_matrix_display() {
    let err = Error::SingularMatrix("model-view".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Singular matrix"));
    assert!(display.contains("model-view"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone_and_eq() {
    let err = Error::InvalidResource("vertex buffer".to_string());
    assert_eq!(err.clone(), err);
    assert_ne!(err, Error::OutOfMemory);
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::SingularMatrix("x".to_string()));
    assert!(debug.contains("SingularMatrix"));
}

// ============================================================================
// RESULT ALIAS
// ============================================================================

fn fails() -> Result<u32> {
    Err(Error::InvalidArgument("nope".to_string()))
}

fn propagates() -> Result<u32> {
    let value = fails()?;
    Ok(value + 1)
}

#[test]
fn test_result_propagation() {
    match propagates() {
        Err(Error::InvalidArgument(msg)) => assert_eq!(msg, "nope"),
        other => panic!("unexpected result: {:?}", other),
    }
}
