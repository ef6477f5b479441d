//! The module contains the errors a processing run can fail with.
//!
//! Every error is terminal for the run that raised it: no partial
//! [`Settlement`] is produced.
//!
//! - [`InvalidDate`] an effective date is malformed or impossible.
//! - [`InvalidAmount`] an amount field is not a whole number.
//! - [`KeyNotFound`] a record references a budget or item that does not exist.
//! - [`ExistingKey`] the same budget or item id was supplied twice.
//! - [`BudgetMismatch`] a draw request names a different budget than its item.
//!
//!  [`InvalidDate`]: EngineError::InvalidDate
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`BudgetMismatch`]: EngineError::BudgetMismatch
//!  [`Settlement`]: super::Settlement
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Budget mismatch: {0}")]
    BudgetMismatch(String),
}
