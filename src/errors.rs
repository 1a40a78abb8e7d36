//! Unified error types for the event workflow.
//!
//! Foreground operations (decisions, direct edits) return these errors to the caller.
//! Background housekeeping wraps them in [`crate::core::housekeeping::Housekeeping`]
//! so they are logged instead of propagated.

use crate::entities::ApprovalStatus;
use thiserror::Error;

/// Errors produced by the workflow engine and its store access.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Input rejected before any write was attempted
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// The referenced event does not exist
    #[error("Event not found: {id}")]
    EventNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// The referenced approval does not exist
    #[error("Approval not found: {id}")]
    ApprovalNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// The referenced task does not exist
    #[error("Task not found: {id}")]
    TaskNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// The referenced budget item does not exist
    #[error("Budget item not found: {id}")]
    BudgetItemNotFound {
        /// Identifier that was looked up
        id: i64,
    },

    /// A decision was attempted on an approval that is no longer pending
    #[error("Approval {id} was already decided ({status})")]
    ApprovalAlreadyDecided {
        /// Approval identifier
        id: i64,
        /// Status the approval currently holds
        status: ApprovalStatus,
    },

    /// Failure reported by the store
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Whether this error only reports a missing record.
    ///
    /// Background paths treat these as benign, everything else is worth alerting on.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EventNotFound { .. }
                | Self::ApprovalNotFound { .. }
                | Self::TaskNotFound { .. }
                | Self::BudgetItemNotFound { .. }
        )
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
