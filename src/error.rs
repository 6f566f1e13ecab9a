use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only error shape that crosses the source / executor boundary.
///
/// Serialized as `{"type": "NotFound", "data": {"pid": 42}}`.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum AppError {
    #[error("Process {pid} not found")]
    NotFound { pid: u32 },

    #[error("Permission denied for process {pid}: {message}")]
    PermissionDenied { pid: u32, message: String },

    #[error("Invalid PID: {pid}")]
    InvalidPid { pid: u32 },

    #[error("OS error: {message}")]
    OsError { message: String },

    #[error("Feature not supported on this OS: {feature}")]
    Unsupported { feature: String },
}

impl AppError {
    pub fn os(err: impl std::fmt::Display) -> Self {
        AppError::OsError {
            message: err.to_string(),
        }
    }

    pub fn unsupported(feature: &str) -> Self {
        AppError::Unsupported {
            feature: feature.to_string(),
        }
    }

    /// Variant tag, used as a metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "not_found",
            AppError::PermissionDenied { .. } => "permission_denied",
            AppError::InvalidPid { .. } => "invalid_pid",
            AppError::OsError { .. } => "os_error",
            AppError::Unsupported { .. } => "unsupported",
        }
    }
}

/// Reason a diff event was refused by the process table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("pid {pid} appears in both the {first} and {second} sets of one event")]
    OverlappingPid {
        pid: u32,
        first: &'static str,
        second: &'static str,
    },
}
