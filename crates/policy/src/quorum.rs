//! Quorum: a minimum number of signatures

use signoff_core::{ApprovalMode, Decision};

use crate::error::PolicyResult;
use crate::traits::{ApprovalPolicy, PolicyInput};

/// Approved once `required_approvals - 1` checkers approved.
///
/// With `required_approvals == 1` no checker vote is needed at all, which is
/// the configuration where maker-checker is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuorumPolicy;

impl ApprovalPolicy for QuorumPolicy {
    fn mode(&self) -> ApprovalMode {
        ApprovalMode::Quorum
    }

    fn evaluate(&self, input: &PolicyInput<'_>) -> PolicyResult<Decision> {
        if input.approvals() >= input.configuration.checker_votes_required() {
            Ok(Decision::Approved)
        } else {
            Ok(Decision::Pending)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::fixtures::*;
    use signoff_core::ApprovalConfiguration;

    fn evaluate(required: u32, voters: &[i64]) -> Decision {
        let config = ApprovalConfiguration::quorum(required);
        let cmd = command();
        let votes = approvals(voters);
        QuorumPolicy
            .evaluate(&PolicyInput::new(&config, &votes, &cmd))
            .unwrap()
    }

    #[test]
    fn test_required_three_needs_two_votes() {
        assert_eq!(evaluate(3, &[]), Decision::Pending);
        assert_eq!(evaluate(3, &[1]), Decision::Pending);
        assert_eq!(evaluate(3, &[1, 2]), Decision::Approved);
        assert_eq!(evaluate(3, &[1, 2, 3]), Decision::Approved);
    }

    #[test]
    fn test_required_one_is_already_approved() {
        assert_eq!(evaluate(1, &[]), Decision::Approved);
    }

    #[test]
    fn test_required_two_needs_one_vote() {
        assert_eq!(evaluate(2, &[]), Decision::Pending);
        assert_eq!(evaluate(2, &[5]), Decision::Approved);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let config = ApprovalConfiguration::quorum(4);
        let cmd = command();
        let votes = approvals(&[1, 2]);
        let input = PolicyInput::new(&config, &votes, &cmd);

        let first = QuorumPolicy.evaluate(&input).unwrap();
        let second = QuorumPolicy.evaluate(&input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Decision::Pending);
    }
}
