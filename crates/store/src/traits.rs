//! Store traits - the seams between the coordinator and persistence

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signoff_core::{ApprovalConfiguration, CommandId, Decision, UserId, Vote};

use crate::error::StoreResult;

/// Append-only ledger of votes, and the decision each command settled on
#[async_trait]
pub trait VoteStore: Send + Sync {
    /// Record a vote.
    ///
    /// Fails with `StoreError::DuplicateVote` if this voter already voted on
    /// the command. The write is atomic: on failure nothing is stored.
    async fn record(
        &self,
        command_id: CommandId,
        voter_id: UserId,
        is_approval: bool,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<Vote>;

    /// All votes for a command, in submission order
    async fn list_votes(&self, command_id: CommandId) -> StoreResult<Vec<Vote>>;

    /// Store the terminal decision for a command unless one is already stored.
    ///
    /// Returns true only for the call that wrote it; a stored decision is
    /// never replaced.
    async fn settle(
        &self,
        command_id: CommandId,
        decision: Decision,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<bool>;

    /// The stored decision, if the command has settled
    async fn decision(&self, command_id: CommandId) -> StoreResult<Option<Decision>>;
}

/// Holder of the single active approval configuration
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// The active configuration. Absence is `StoreError::MissingConfiguration`.
    async fn get_active(&self) -> StoreResult<ApprovalConfiguration>;

    /// Global maker-checker switch stored alongside the configuration
    async fn maker_checker_enabled(&self) -> StoreResult<bool>;

    /// Replace the configuration and the maker-checker flag in one atomic write
    async fn save(
        &self,
        config: &ApprovalConfiguration,
        maker_checker_enabled: bool,
    ) -> StoreResult<()>;

    /// Seed the singleton if absent. Returns true if a row was written.
    async fn ensure_default(&self, config: &ApprovalConfiguration) -> StoreResult<bool>;
}
