//! Policy trait and evaluation input

use signoff_core::{ApprovalConfiguration, ApprovalMode, CommandUnderApproval, Decision, UserId, Vote};

use crate::error::PolicyResult;

/// Snapshot handed to a policy
#[derive(Debug, Clone, Copy)]
pub struct PolicyInput<'a> {
    pub configuration: &'a ApprovalConfiguration,
    /// Every vote currently recorded for the command
    pub votes: &'a [Vote],
    pub command: &'a CommandUnderApproval,
    /// Filtered checker set; only computed for policies that ask
    pub eligible_approvers: Option<&'a [UserId]>,
}

impl<'a> PolicyInput<'a> {
    pub fn new(
        configuration: &'a ApprovalConfiguration,
        votes: &'a [Vote],
        command: &'a CommandUnderApproval,
    ) -> Self {
        Self {
            configuration,
            votes,
            command,
            eligible_approvers: None,
        }
    }

    pub fn with_eligible_approvers(mut self, approvers: &'a [UserId]) -> Self {
        self.eligible_approvers = Some(approvers);
        self
    }

    /// Number of approving votes
    pub fn approvals(&self) -> usize {
        self.votes.iter().filter(|v| v.is_approval).count()
    }

    pub fn approved_by(&self, user: UserId) -> bool {
        self.votes
            .iter()
            .any(|v| v.is_approval && v.voter_id == user)
    }
}

/// A signing mandate.
///
/// Implementations must be pure: the same input always yields the same
/// decision, and only `Pending` or `Approved` are returned.
pub trait ApprovalPolicy: Send + Sync {
    /// Mode this policy implements
    fn mode(&self) -> ApprovalMode;

    /// Whether `PolicyInput::eligible_approvers` must be supplied
    fn needs_eligible_approvers(&self) -> bool {
        false
    }

    fn evaluate(&self, input: &PolicyInput<'_>) -> PolicyResult<Decision>;
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::Utc;
    use signoff_core::{CommandId, CommandUnderApproval, UserId, Vote};

    pub const MAKER: UserId = UserId(100);

    pub fn command() -> CommandUnderApproval {
        CommandUnderApproval::new(CommandId(1), "APPROVE", "LOAN", MAKER)
    }

    pub fn approvals(voters: &[i64]) -> Vec<Vote> {
        voters
            .iter()
            .enumerate()
            .map(|(i, voter)| Vote {
                id: i as i64 + 1,
                command_id: CommandId(1),
                voter_id: UserId(*voter),
                is_approval: true,
                submitted_at: Utc::now(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_input_counts_only_approvals() {
        let config = ApprovalConfiguration::quorum(3);
        let cmd = command();
        let mut votes = approvals(&[1, 2]);
        votes[1].is_approval = false;

        let input = PolicyInput::new(&config, &votes, &cmd);
        assert_eq!(input.approvals(), 1);
        assert!(input.approved_by(UserId(1)));
        assert!(!input.approved_by(UserId(2)));
    }
}
