//! Error types for bplog.
//!
//! This module defines all error types used throughout the bplog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bplog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Entry Errors ===
    /// A form field was missing or could not be parsed.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },

    // === Camera Errors ===
    /// The camera could not be acquired (denied, missing or unreadable).
    #[error("camera '{device}' unavailable: {message}")]
    CameraUnavailable {
        /// Name of the camera device.
        device: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    /// A camera operation was requested in the wrong state.
    #[error("camera is {actual}, expected {expected}")]
    CameraState {
        /// The state the operation requires.
        expected: &'static str,
        /// The state the camera is actually in.
        actual: &'static str,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bplog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid input error for a form field.
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Create a camera unavailable error.
    #[must_use]
    pub fn camera_unavailable(device: &'static str, message: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            device,
            message: message.into(),
        }
    }

    /// Check if this error came from the camera collaborator.
    #[must_use]
    pub fn is_camera_error(&self) -> bool {
        matches!(
            self,
            Self::CameraUnavailable { .. } | Self::CameraState { .. }
        )
    }

    /// Check if this error is a rejected form field.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
