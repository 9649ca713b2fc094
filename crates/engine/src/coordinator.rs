//! Approval coordinator - records votes and decides commands
//!
//! ```text
//! approve/reject ──► guards ──► VoteStore::record ──► decide ──► settle ──► listeners
//!                                (duplicate = error)    │           (first terminal
//!                                                       │            decision only)
//!                                                       ├─ stored decision → returned as is
//!                                                       ├─ any rejection → REJECTED
//!                                                       └─ policy_for(mode) → PENDING | APPROVED
//! ```
//!
//! A terminal decision is stored once and never re-evaluated: later votes
//! and settings changes do not move a settled command.
//!
//! Settings updates take the write half of `settings_lock`; evaluations read
//! the configuration under the read half, so a decision never mixes an old
//! and a new configuration.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use signoff_core::{
    ApprovalConfiguration, ApprovalSetting, CommandId, CommandUnderApproval, Decision, UserId,
    VoteView,
};
use signoff_policy::{policy_for, PolicyInput};
use signoff_store::{ConfigurationStore, VoteStore};
use tokio::sync::RwLock;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::traits::{CommandSource, DecisionListener, UserDirectory};
use crate::validation::{self, SettingsRequest};

/// Permission required to change the approval settings
pub const UPDATE_APPROVAL_SETTINGS: &str = "UPDATE_APPROVAL_SETTINGS";

/// Result of an approve vote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveOutcome {
    pub decision: Decision,
    /// The signing mandate is met and the command may execute
    pub satisfied: bool,
}

impl ApproveOutcome {
    fn from_decision(decision: Decision) -> Self {
        Self {
            decision,
            satisfied: decision.is_approved(),
        }
    }
}

pub struct ApprovalCoordinator {
    votes: Arc<dyn VoteStore>,
    configuration: Arc<dyn ConfigurationStore>,
    commands: Arc<dyn CommandSource>,
    directory: Arc<dyn UserDirectory>,
    listeners: Vec<Arc<dyn DecisionListener>>,
    config: EngineConfig,
    settings_lock: RwLock<()>,
}

impl ApprovalCoordinator {
    pub fn new(
        votes: Arc<dyn VoteStore>,
        configuration: Arc<dyn ConfigurationStore>,
        commands: Arc<dyn CommandSource>,
        directory: Arc<dyn UserDirectory>,
        config: EngineConfig,
    ) -> Self {
        Self {
            votes,
            configuration,
            commands,
            directory,
            listeners: Vec::new(),
            config,
            settings_lock: RwLock::new(()),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn DecisionListener>) -> Self {
        self.register_listener(listener);
        self
    }

    pub fn register_listener(&mut self, listener: Arc<dyn DecisionListener>) {
        self.listeners.push(listener);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Seed the configured initial settings if none are stored yet
    pub async fn initialize(&self) -> EngineResult<bool> {
        let _guard = self.settings_lock.write().await;
        let initial = &self.config.initial_configuration;
        let seeded = self.configuration.ensure_default(initial).await?;
        if seeded {
            tracing::info!(
                mode = %initial.approval_mode,
                required_approvals = initial.required_approvals,
                "Seeded approval configuration"
            );
        }
        Ok(seeded)
    }

    /// Cast an approving vote and evaluate the command
    pub async fn approve(
        &self,
        command_id: CommandId,
        voter_id: UserId,
    ) -> EngineResult<ApproveOutcome> {
        let command = self.load_command(command_id).await?;
        self.check_voter(&command, voter_id).await?;

        self.votes
            .record(command_id, voter_id, true, Utc::now())
            .await?;

        let decision = self.decide(&command).await?;
        tracing::info!(
            command_id = %command_id,
            voter_id = %voter_id,
            decision = %decision,
            "Approval recorded"
        );

        Ok(ApproveOutcome::from_decision(decision))
    }

    /// Cast a rejecting vote. One rejection decides a pending command; a
    /// command that already settled keeps its decision.
    pub async fn reject(&self, command_id: CommandId, voter_id: UserId) -> EngineResult<Decision> {
        let command = self.load_command(command_id).await?;
        self.check_voter(&command, voter_id).await?;

        self.votes
            .record(command_id, voter_id, false, Utc::now())
            .await?;

        let decision = self.settle(&command, Decision::Rejected).await?;
        tracing::info!(
            command_id = %command_id,
            voter_id = %voter_id,
            decision = %decision,
            "Rejection recorded"
        );

        Ok(decision)
    }

    /// Current decision for a command, without casting a vote
    pub async fn status(&self, command_id: CommandId) -> EngineResult<Decision> {
        let command = self.load_command(command_id).await?;
        self.decide(&command).await
    }

    /// Votes cast on a command, with voter usernames resolved
    pub async fn votes(&self, command_id: CommandId) -> EngineResult<Vec<VoteView>> {
        let votes = self.votes.list_votes(command_id).await?;

        let mut views = Vec::with_capacity(votes.len());
        for vote in &votes {
            let username = self
                .directory
                .find_user(vote.voter_id)
                .await?
                .map(|u| u.username);
            views.push(VoteView::new(vote, username));
        }
        Ok(views)
    }

    pub async fn active_configuration(&self) -> EngineResult<ApprovalConfiguration> {
        let _guard = self.settings_lock.read().await;
        Ok(self.configuration.get_active().await?)
    }

    /// Active configuration with the leader's display name
    pub async fn active_setting(&self) -> EngineResult<ApprovalSetting> {
        let config = self.active_configuration().await?;

        let leader_name = match config.required_user_id {
            Some(id) => self
                .directory
                .find_user(id)
                .await?
                .map(|u| u.name().to_string()),
            None => None,
        };
        Ok(ApprovalSetting::new(&config, leader_name))
    }

    pub async fn maker_checker_enabled(&self) -> EngineResult<bool> {
        let _guard = self.settings_lock.read().await;
        Ok(self.configuration.maker_checker_enabled().await?)
    }

    /// Validate and store new settings.
    ///
    /// Maker-checker is switched on exactly when more than one signature is
    /// required, and the flag is written in the same atomic save.
    pub async fn update_configuration(
        &self,
        actor: UserId,
        request: &SettingsRequest,
    ) -> EngineResult<ApprovalConfiguration> {
        if !self
            .directory
            .has_permission(actor, UPDATE_APPROVAL_SETTINGS)
            .await?
        {
            tracing::warn!(actor = %actor, "Settings update denied");
            return Err(EngineError::PermissionDenied {
                user_id: actor,
                permission: UPDATE_APPROVAL_SETTINGS.to_string(),
            });
        }

        let config = validation::validate(request, self.directory.as_ref()).await?;
        let maker_checker = config.maker_checker_enabled();

        {
            let _guard = self.settings_lock.write().await;
            self.configuration.save(&config, maker_checker).await?;
        }

        tracing::info!(
            actor = %actor,
            mode = %config.approval_mode,
            required_approvals = config.required_approvals,
            maker_checker,
            "Approval settings updated"
        );
        Ok(config)
    }

    async fn load_command(&self, command_id: CommandId) -> EngineResult<CommandUnderApproval> {
        self.commands
            .find_command(command_id)
            .await?
            .ok_or(EngineError::CommandNotFound(command_id))
    }

    async fn check_voter(&self, command: &CommandUnderApproval, voter_id: UserId) -> EngineResult<()> {
        if command.is_maker(voter_id) && !self.config.allow_maker_vote {
            tracing::warn!(
                command_id = %command.id,
                voter_id = %voter_id,
                "Maker attempted to vote on own command"
            );
            return Err(EngineError::MakerCannotVote(voter_id));
        }

        if self.config.enforce_checker_permission {
            let permission = command.checker_permission();
            if !self.directory.has_permission(voter_id, &permission).await? {
                tracing::warn!(
                    command_id = %command.id,
                    voter_id = %voter_id,
                    permission = %permission,
                    "Voter lacks checker permission"
                );
                return Err(EngineError::PermissionDenied {
                    user_id: voter_id,
                    permission,
                });
            }
        }

        Ok(())
    }

    /// Stored decision if the command settled, otherwise a fresh evaluation.
    /// A terminal evaluation is settled before it is returned.
    async fn decide(&self, command: &CommandUnderApproval) -> EngineResult<Decision> {
        if let Some(decision) = self.votes.decision(command.id).await? {
            return Ok(decision);
        }

        let decision = self.evaluate(command).await?;
        if decision.is_terminal() {
            return self.settle(command, decision).await;
        }
        Ok(decision)
    }

    /// Store a terminal decision and notify listeners, unless another
    /// decision got there first; then that one is returned and nobody is told.
    async fn settle(
        &self,
        command: &CommandUnderApproval,
        decision: Decision,
    ) -> EngineResult<Decision> {
        if self.votes.settle(command.id, decision, Utc::now()).await? {
            tracing::info!(
                command_id = %command.id,
                decision = %decision,
                "Command settled"
            );
            self.notify(command, decision).await;
            return Ok(decision);
        }

        let stored = self.votes.decision(command.id).await?;
        tracing::debug!(
            command_id = %command.id,
            evaluated = %decision,
            stored = ?stored,
            "Command already settled"
        );
        Ok(stored.unwrap_or(decision))
    }

    async fn evaluate(&self, command: &CommandUnderApproval) -> EngineResult<Decision> {
        let configuration = {
            let _guard = self.settings_lock.read().await;
            self.configuration.get_active().await?
        };

        let votes = self.votes.list_votes(command.id).await?;
        if votes.iter().any(|v| !v.is_approval) {
            return Ok(Decision::Rejected);
        }

        let policy = policy_for(configuration.approval_mode);
        let eligible = if policy.needs_eligible_approvers() {
            Some(self.eligible_approvers(command).await?)
        } else {
            None
        };

        let mut input = PolicyInput::new(&configuration, &votes, command);
        if let Some(eligible) = &eligible {
            input = input.with_eligible_approvers(eligible);
        }

        policy
            .evaluate(&input)
            .map_err(|e| EngineError::ConfigurationCorruption(e.to_string()))
    }

    /// Checkers whose approvals count towards a unanimous vote
    async fn eligible_approvers(
        &self,
        command: &CommandUnderApproval,
    ) -> EngineResult<Vec<UserId>> {
        let permission = command.checker_permission();
        let candidates = self.directory.users_with_permission(&permission).await?;
        let exclusions = &self.config.exclusions;

        let mut eligible = Vec::with_capacity(candidates.len());
        for user in &candidates {
            if exclusions.excludes(user) {
                continue;
            }
            if exclusions.exclude_system_accounts
                && self.directory.is_system_account(user.id).await?
            {
                continue;
            }
            // The maker cannot sign twice
            if command.is_maker(user.id) && !self.config.allow_maker_vote {
                continue;
            }
            eligible.push(user.id);
        }

        tracing::debug!(
            command_id = %command.id,
            permission = %permission,
            candidates = candidates.len(),
            eligible = eligible.len(),
            "Counted eligible approvers"
        );
        Ok(eligible)
    }

    async fn notify(&self, command: &CommandUnderApproval, decision: Decision) {
        for listener in &self.listeners {
            if let Err(e) = listener.on_decision(command, decision).await {
                tracing::error!(
                    listener = listener.name(),
                    command_id = %command.id,
                    decision = %decision,
                    error = %e,
                    "Decision listener failed"
                );
            }
        }
    }
}
