//! Error types for secure-media
//!
//! This module defines the error hierarchy used throughout the crate.
//! We use `thiserror` for library-style errors that are part of the API,
//! and convert to HTTP responses at the server boundary.

mod http;

use std::error::Error as StdError;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Access error: {0}")]
    Access(#[from] AccessError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid policy '{policy}': {reason}")]
    InvalidPolicy { policy: String, reason: String },

    #[error("Default policy registry is already initialized")]
    DefaultRegistryInitialized,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure raised by an access checker while deciding a request.
///
/// Carries the checker's own error untouched; the access layer never turns
/// a failing check into a denial.
#[derive(Error, Debug)]
#[error("access check failed: {source}")]
pub struct PredicateError {
    source: Box<dyn StdError + Send + Sync>,
}

impl PredicateError {
    pub fn new(source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Recover the checker's original error
    pub fn into_inner(self) -> Box<dyn StdError + Send + Sync> {
        self.source
    }
}

/// Errors produced when enforcing media access
#[derive(Error, Debug)]
pub enum AccessError {
    /// The request may not see this path. Deliberately indistinguishable from
    /// a missing file.
    #[error("Restricted media file")]
    NotFound { path: String },

    #[error(transparent)]
    Predicate(#[from] PredicateError),
}

impl AccessError {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AccessError::NotFound { .. })
    }
}

/// Reference server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid bind address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for access checks
pub type CheckResult = std::result::Result<bool, PredicateError>;
