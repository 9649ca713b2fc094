//! Collaborator traits - what the engine needs from the host platform

use async_trait::async_trait;
use signoff_core::{CommandId, CommandUnderApproval, Decision, UserId, UserProfile};

use crate::error::EngineResult;

/// Source of commands waiting for approval
#[async_trait]
pub trait CommandSource: Send + Sync {
    async fn find_command(&self, id: CommandId) -> EngineResult<Option<CommandUnderApproval>>;
}

/// The platform's user and permission directory
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user(&self, id: UserId) -> EngineResult<Option<UserProfile>>;

    async fn has_permission(&self, id: UserId, permission: &str) -> EngineResult<bool>;

    /// Every user holding `permission`, directly or through a wildcard grant
    async fn users_with_permission(&self, permission: &str) -> EngineResult<Vec<UserProfile>>;

    async fn is_system_account(&self, id: UserId) -> EngineResult<bool> {
        Ok(self
            .find_user(id)
            .await?
            .map(|u| u.is_system_account)
            .unwrap_or(false))
    }
}

/// Receives terminal decisions, e.g. the pipeline that executes or
/// discards the command
#[async_trait]
pub trait DecisionListener: Send + Sync {
    /// Listener name for logging
    fn name(&self) -> &str;

    /// Called once per command, after the vote that produced `decision`
    /// and the decision itself are stored.
    ///
    /// Errors are logged by the coordinator and do not undo the vote.
    async fn on_decision(
        &self,
        command: &CommandUnderApproval,
        decision: Decision,
    ) -> EngineResult<()>;
}
