//! Application error handling
//!
//! Unifies domain, storage and configuration failures so the CLI can
//! report them with a stable exit code.

use thiserror::Error;
use treadmill_calc_shared::validation::ValidationError;
use treadmill_calc_shared::CalcError;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Domain(#[from] CalcError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored data could not be encoded: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Configuration could not be encoded: {0}")]
    ConfigEncode(#[from] toml::ser::Error),
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Domain(CalcError::Validation(err))
    }
}

impl AppError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Domain(CalcError::Validation(_)) | AppError::InvalidInput(_) => "VALIDATION_ERROR",
            AppError::Domain(CalcError::EntryNotFound(_)) => "NOT_FOUND",
            AppError::Domain(_) => "SESSION_ERROR",
            AppError::Io(_) | AppError::Json(_) => "STORAGE_ERROR",
            AppError::Csv(_) => "EXPORT_ERROR",
            AppError::Config(_) | AppError::ConfigEncode(_) => "CONFIG_ERROR",
        }
    }

    /// Process exit code: 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Domain(_) | AppError::InvalidInput(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for services and repositories
pub type AppResult<T> = Result<T, AppError>;
