//! Store errors

use signoff_core::{CommandId, UserId};
use thiserror::Error;

/// Errors from the vote and configuration stores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User {voter_id} already voted on command {command_id}")]
    DuplicateVote { command_id: CommandId, voter_id: UserId },

    #[error("No active approval configuration")]
    MissingConfiguration,

    #[error("Corrupt approval configuration: {0}")]
    CorruptConfiguration(String),

    #[error("Corrupt decision for command {command_id}: {value}")]
    CorruptDecision { command_id: CommandId, value: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_duplicate_vote(&self) -> bool {
        matches!(self, StoreError::DuplicateVote { .. })
    }

    /// Missing or undecodable configuration; needs administrative repair
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            StoreError::MissingConfiguration | StoreError::CorruptConfiguration(_)
        )
    }
}
