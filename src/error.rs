//! Custom error types for the bridge.
//!
//! This module defines the primary error type, `BridgeError`, for the whole crate.
//! Using the `thiserror` crate, it provides a centralized way to report the
//! infrastructure problems the bridge can run into: interpreter failures,
//! configuration issues, and host property errors.
//!
//! ## What is *not* an error here
//!
//! Failures of the user's Python code are routine and never leave the bridge as a
//! `BridgeError`. A module that cannot be imported or a function that does not exist
//! only flips the `function_found` output, and an exception raised by the function
//! is copied into the `error` output. `BridgeError` covers the plumbing around that:
//!
//! - **`Python`**: Wraps a `PyErr` raised by the interpreter itself while the bridge
//!   was preparing or tearing down a session (e.g., `sys.path` could not be read).
//! - **`NestedSession`**: A session was opened while the current thread already held
//!   one. Sessions are not reentrant.
//! - **`Config`** / **`ConfigValidation`**: Parsing and semantic configuration errors.
//! - **`PropertyIdOutOfRange`**, **`NoSuchInput`**, **`Host`**: Problems reported by,
//!   or about, the host's property list.
//!
//! By using `#[from]`, `BridgeError` can be created from the underlying error types,
//! so the `?` operator works throughout the crate.

use thiserror::Error;

/// Convenience alias for results using the bridge error type.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// Infrastructure errors raised by the bridge.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The interpreter raised while the bridge was driving it.
    #[error("Python error: {0}")]
    Python(#[from] pyo3::PyErr),

    /// A session was requested while this thread already holds one.
    #[error("Interpreter session is already open on this thread")]
    NestedSession,

    /// The configuration could not be loaded or deserialized.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The configuration loaded but holds invalid values.
    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),

    /// Too many synthesized properties to encode a property ID.
    #[error("Property index {0} cannot be encoded as a property ID")]
    PropertyIdOutOfRange(usize),

    /// The host has no input property at this one-based index.
    #[error("No input property at index {0}")]
    NoSuchInput(usize),

    /// The host rejected a property operation.
    #[error("Host property error: {0}")]
    Host(String),

    /// The tracing subscriber could not be installed.
    #[error("Logging initialization error: {0}")]
    Logging(String),
}

impl From<figment::Error> for BridgeError {
    fn from(err: figment::Error) -> Self {
        BridgeError::Config(Box::new(err))
    }
}
