//! Leader: a designated user signs, plus a minimum count

use signoff_core::{ApprovalMode, Decision};

use crate::error::{PolicyError, PolicyResult};
use crate::traits::{ApprovalPolicy, PolicyInput};

/// Approved when both hold:
/// - approvals >= `required_approvals - 1`
/// - the leader approved, or the leader is the command's maker
///
/// A leader who submitted the command has signed by submitting it and does
/// not vote again.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeaderPolicy;

impl ApprovalPolicy for LeaderPolicy {
    fn mode(&self) -> ApprovalMode {
        ApprovalMode::Leader
    }

    fn evaluate(&self, input: &PolicyInput<'_>) -> PolicyResult<Decision> {
        let leader = input
            .configuration
            .required_user_id
            .ok_or(PolicyError::LeaderNotConfigured)?;

        let enough = input.approvals() >= input.configuration.checker_votes_required();
        let leader_signed = input.command.is_maker(leader) || input.approved_by(leader);

        if enough && leader_signed {
            Ok(Decision::Approved)
        } else {
            Ok(Decision::Pending)
        }
    }
}
