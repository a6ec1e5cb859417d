//! Error types for the treadmill calculator
//!
//! The metabolic calculators are total functions and never produce these;
//! they cover session editing and the weight log.

use chrono::NaiveDate;
use thiserror::Error;

use crate::validation::ValidationError;

/// Domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("A session holds at most {max} sets")]
    TooManySets { max: usize },

    #[error("A session needs at least {min} set")]
    TooFewSets { min: usize },

    #[error("No set at index {index} (session has {len})")]
    SetIndexOutOfRange { index: usize, len: usize },

    #[error("No log entry for {0}")]
    EntryNotFound(NaiveDate),
}

/// Result alias for domain operations
pub type CalcResult<T> = Result<T, CalcError>;
