//! Engine errors

use std::fmt;

use serde::{Deserialize, Serialize};
use signoff_core::{CommandId, UserId};
use signoff_store::StoreError;
use thiserror::Error;

/// One rejected field of a settings update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Request parameter at fault, e.g. `requiredApprovals`
    pub parameter: String,
    /// Machine-readable code, e.g. `not.greater.than.zero`
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        parameter: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            parameter: parameter.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parameter, self.message)
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from the approval coordinator
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("User has already voted on command {0}")]
    MultipleVotes(CommandId),

    #[error("Validation failed: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    #[error("Approval configuration is corrupt: {0}")]
    ConfigurationCorruption(String),

    #[error("Command not found: {0}")]
    CommandNotFound(CommandId),

    #[error("Maker {0} cannot vote on their own command")]
    MakerCannotVote(UserId),

    #[error("User {user_id} lacks permission {permission}")]
    PermissionDenied { user_id: UserId, permission: String },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateVote { command_id, .. } => EngineError::MultipleVotes(command_id),
            StoreError::MissingConfiguration => {
                EngineError::ConfigurationCorruption("no active approval configuration".to_string())
            }
            StoreError::CorruptConfiguration(reason) => {
                EngineError::ConfigurationCorruption(reason)
            }
            other => EngineError::Store(other),
        }
    }
}

impl EngineError {
    /// Retrying the same request can never succeed
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EngineError::MultipleVotes(_)
                | EngineError::Validation(_)
                | EngineError::CommandNotFound(_)
                | EngineError::MakerCannotVote(_)
                | EngineError::PermissionDenied { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            EngineError::Validation(issues) => issues,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_vote_maps_to_multiple_votes() {
        let err: EngineError = StoreError::DuplicateVote {
            command_id: CommandId(5),
            voter_id: UserId(2),
        }
        .into();

        assert!(matches!(err, EngineError::MultipleVotes(CommandId(5))));
        assert!(err.is_terminal());
    }

    #[test]
    fn test_configuration_faults_map_to_corruption() {
        let err: EngineError = StoreError::CorruptConfiguration("mode 9".into()).into();
        assert!(matches!(err, EngineError::ConfigurationCorruption(ref r) if r == "mode 9"));

        let err: EngineError = StoreError::MissingConfiguration.into();
        assert!(matches!(err, EngineError::ConfigurationCorruption(_)));
        assert!(!err.is_terminal());
    }

    #[test]
    fn test_validation_message_lists_issues() {
        let err = EngineError::Validation(vec![
            ValidationIssue::new("approvalMode", "invalid", "unknown mode FOO"),
            ValidationIssue::new("requiredApprovals", "not.greater.than.zero", "must be > 0"),
        ]);

        assert!(err.is_validation());
        assert_eq!(err.issues().len(), 2);
        assert_eq!(
            err.to_string(),
            "Validation failed: approvalMode: unknown mode FOO; requiredApprovals: must be > 0"
        );
    }
}
