//! Unified application error types for DocVault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. Access denials are *not* errors;
//! they are ordinary decision values produced by the authorization guard.

use std::fmt;
use thiserror::Error;

/// Uniform message used for every "resource does not exist" report,
/// whether the row is absent or owned by another organization.
pub const RESOURCE_NOT_FOUND_MESSAGE: &str = "Resource not found";

/// Uniform message shown to callers for any rejected access.
pub const FORBIDDEN_MESSAGE: &str = "Forbidden";

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested resource was not found (or lives in another organization).
    NotFound,
    /// The caller does not have permission to perform the action.
    Authorization,
    /// No tenant was bound to the request where one is required.
    MissingTenant,
    /// A tenant assignment was malformed (non-positive organization id).
    InvalidContext,
    /// Input validation failed.
    Validation,
    /// A conflict occurred (duplicate access entry, etc.).
    Conflict,
    /// An operation did not complete before its deadline; the outcome is unknown.
    Timeout,
    /// An internal server error occurred.
    Internal,
    /// A database error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Authorization => write!(f, "AUTHORIZATION"),
            Self::MissingTenant => write!(f, "MISSING_TENANT"),
            Self::InvalidContext => write!(f, "INVALID_CONTEXT"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Internal => write!(f, "INTERNAL"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout DocVault.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// The single not-found error reported for missing *and* cross-tenant resources.
    pub fn resource_not_found() -> Self {
        Self::new(ErrorKind::NotFound, RESOURCE_NOT_FOUND_MESSAGE)
    }

    /// Create an authorization error.
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Authorization, message)
    }

    /// The generic rejection shown for every kind of denial.
    pub fn forbidden() -> Self {
        Self::new(ErrorKind::Authorization, FORBIDDEN_MESSAGE)
    }

    /// Create a missing-tenant error.
    pub fn missing_tenant(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingTenant, message)
    }

    /// Create an invalid-context error.
    pub fn invalid_context(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidContext, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether a transport layer must present this error as a plain "forbidden".
    ///
    /// Covers denials and not-found results so that callers can never tell a
    /// missing resource from one owned by another organization.
    pub fn is_forbidden_like(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound | ErrorKind::Authorization)
    }

    /// Collapse forbidden-like errors into the uniform [`AppError::forbidden`].
    ///
    /// Other kinds pass through untouched.
    pub fn into_public(self) -> Self {
        if self.is_forbidden_like() {
            Self::forbidden()
        } else {
            self
        }
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::with_source(ErrorKind::Validation, format!("Invalid input: {err}"), err)
    }
}
