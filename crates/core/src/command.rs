//! Command-under-approval - the external operation votes are cast against

use crate::ids::{CommandId, UserId};
use serde::{Deserialize, Serialize};

/// Metadata the engine needs about a pending command.
///
/// The command body and its execution belong to the surrounding pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandUnderApproval {
    pub id: CommandId,
    pub action_name: String,
    pub entity_name: String,
    /// User who submitted the command
    pub maker_id: UserId,
    pub resource_id: Option<i64>,
}

impl CommandUnderApproval {
    pub fn new(
        id: CommandId,
        action_name: impl Into<String>,
        entity_name: impl Into<String>,
        maker_id: UserId,
    ) -> Self {
        Self {
            id,
            action_name: action_name.into(),
            entity_name: entity_name.into(),
            maker_id,
            resource_id: None,
        }
    }

    pub fn with_resource(mut self, resource_id: i64) -> Self {
        self.resource_id = Some(resource_id);
        self
    }

    /// Permission a user needs to act as checker on this command,
    /// e.g. `APPROVE_LOAN_CHECKER`
    pub fn checker_permission(&self) -> String {
        format!(
            "{}_{}_CHECKER",
            self.action_name.to_uppercase(),
            self.entity_name.to_uppercase()
        )
    }

    pub fn is_maker(&self, user: UserId) -> bool {
        self.maker_id == user
    }
}
