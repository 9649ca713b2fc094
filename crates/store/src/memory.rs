//! In-memory stores (tests, embedded use)

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signoff_core::{ApprovalConfiguration, CommandId, Decision, UserId, Vote};
use tokio::sync::{Mutex, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::{ConfigurationStore, VoteStore};

#[derive(Debug, Default)]
struct VoteLedger {
    next_id: i64,
    votes: HashMap<CommandId, Vec<Vote>>,
    /// Uniqueness index over (command, voter)
    cast: HashSet<(CommandId, UserId)>,
    decisions: HashMap<CommandId, Decision>,
}

/// Vote ledger held in process memory.
///
/// The uniqueness check and the insert happen under the same lock, which is
/// what makes `record` atomic for concurrent voters.
#[derive(Debug, Default)]
pub struct InMemoryVoteStore {
    ledger: Mutex<VoteLedger>,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of votes across all commands
    pub async fn len(&self) -> usize {
        self.ledger.lock().await.cast.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl VoteStore for InMemoryVoteStore {
    async fn record(
        &self,
        command_id: CommandId,
        voter_id: UserId,
        is_approval: bool,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<Vote> {
        let mut ledger = self.ledger.lock().await;

        if !ledger.cast.insert((command_id, voter_id)) {
            return Err(StoreError::DuplicateVote {
                command_id,
                voter_id,
            });
        }

        ledger.next_id += 1;
        let vote = Vote {
            id: ledger.next_id,
            command_id,
            voter_id,
            is_approval,
            submitted_at,
        };
        ledger
            .votes
            .entry(command_id)
            .or_default()
            .push(vote.clone());

        Ok(vote)
    }

    async fn list_votes(&self, command_id: CommandId) -> StoreResult<Vec<Vote>> {
        let ledger = self.ledger.lock().await;
        Ok(ledger.votes.get(&command_id).cloned().unwrap_or_default())
    }

    async fn settle(
        &self,
        command_id: CommandId,
        decision: Decision,
        _decided_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let mut ledger = self.ledger.lock().await;
        if ledger.decisions.contains_key(&command_id) {
            return Ok(false);
        }
        ledger.decisions.insert(command_id, decision);
        Ok(true)
    }

    async fn decision(&self, command_id: CommandId) -> StoreResult<Option<Decision>> {
        Ok(self.ledger.lock().await.decisions.get(&command_id).copied())
    }
}

#[derive(Debug, Clone)]
struct ActiveConfiguration {
    config: ApprovalConfiguration,
    maker_checker_enabled: bool,
}

/// Configuration singleton held in process memory
#[derive(Debug, Default)]
pub struct InMemoryConfigurationStore {
    active: RwLock<Option<ActiveConfiguration>>,
}

impl InMemoryConfigurationStore {
    /// A store with no configuration (every read fails until seeded)
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store seeded with `config`; the flag follows the toggle rule
    pub fn with_configuration(config: ApprovalConfiguration) -> Self {
        let maker_checker_enabled = config.maker_checker_enabled();
        Self {
            active: RwLock::new(Some(ActiveConfiguration {
                config,
                maker_checker_enabled,
            })),
        }
    }
}

#[async_trait]
impl ConfigurationStore for InMemoryConfigurationStore {
    async fn get_active(&self) -> StoreResult<ApprovalConfiguration> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|a| a.config.clone())
            .ok_or(StoreError::MissingConfiguration)
    }

    async fn maker_checker_enabled(&self) -> StoreResult<bool> {
        self.active
            .read()
            .await
            .as_ref()
            .map(|a| a.maker_checker_enabled)
            .ok_or(StoreError::MissingConfiguration)
    }

    async fn save(
        &self,
        config: &ApprovalConfiguration,
        maker_checker_enabled: bool,
    ) -> StoreResult<()> {
        *self.active.write().await = Some(ActiveConfiguration {
            config: config.clone(),
            maker_checker_enabled,
        });
        Ok(())
    }

    async fn ensure_default(&self, config: &ApprovalConfiguration) -> StoreResult<bool> {
        let mut active = self.active.write().await;
        if active.is_some() {
            return Ok(false);
        }
        *active = Some(ActiveConfiguration {
            config: config.clone(),
            maker_checker_enabled: config.maker_checker_enabled(),
        });
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_record_and_list() {
        let store = InMemoryVoteStore::new();
        let now = Utc::now();

        let first = store.record(CommandId(1), UserId(10), true, now).await.unwrap();
        let second = store.record(CommandId(1), UserId(11), false, now).await.unwrap();
        store.record(CommandId(2), UserId(10), true, now).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let votes = store.list_votes(CommandId(1)).await.unwrap();
        assert_eq!(votes.len(), 2);
        assert_eq!(votes[0].voter_id, UserId(10));
        assert!(!votes[1].is_approval);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_duplicate_vote_rejected() {
        let store = InMemoryVoteStore::new();
        let now = Utc::now();

        store.record(CommandId(1), UserId(10), true, now).await.unwrap();
        let err = store
            .record(CommandId(1), UserId(10), false, now)
            .await
            .unwrap_err();

        assert!(err.is_duplicate_vote());
        // Nothing from the failed write is visible
        let votes = store.list_votes(CommandId(1)).await.unwrap();
        assert_eq!(votes.len(), 1);
        assert!(votes[0].is_approval);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_votes() {
        let store = Arc::new(InMemoryVoteStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.record(CommandId(5), UserId(1), true, Utc::now()).await
            }));
        }

        let mut ok = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) if e.is_duplicate_vote() => duplicates += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(duplicates, 15);
        assert_eq!(store.list_votes(CommandId(5)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_first_settled_decision_wins() {
        let store = InMemoryVoteStore::new();
        let now = Utc::now();

        assert_eq!(store.decision(CommandId(3)).await.unwrap(), None);
        assert!(store.settle(CommandId(3), Decision::Approved, now).await.unwrap());
        assert!(!store.settle(CommandId(3), Decision::Rejected, now).await.unwrap());

        assert_eq!(
            store.decision(CommandId(3)).await.unwrap(),
            Some(Decision::Approved)
        );
        assert_eq!(store.decision(CommandId(4)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_configuration_is_missing() {
        let store = InMemoryConfigurationStore::empty();
        assert!(matches!(
            store.get_active().await,
            Err(StoreError::MissingConfiguration)
        ));
        assert!(store.maker_checker_enabled().await.is_err());
    }

    #[tokio::test]
    async fn test_save_replaces_configuration_and_flag() {
        let store = InMemoryConfigurationStore::with_configuration(ApprovalConfiguration::quorum(1));
        assert!(!store.maker_checker_enabled().await.unwrap());

        let leader = ApprovalConfiguration::leader(2, UserId(7));
        store.save(&leader, true).await.unwrap();

        assert_eq!(store.get_active().await.unwrap(), leader);
        assert!(store.maker_checker_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_default_only_seeds_once() {
        let store = InMemoryConfigurationStore::empty();

        assert!(store.ensure_default(&ApprovalConfiguration::quorum(2)).await.unwrap());
        assert!(!store.ensure_default(&ApprovalConfiguration::quorum(5)).await.unwrap());

        assert_eq!(store.get_active().await.unwrap().required_approvals, 2);
        assert!(store.maker_checker_enabled().await.unwrap());
    }
}
