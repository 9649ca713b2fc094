//! Unanimous: every eligible checker signs

use signoff_core::{ApprovalMode, Decision};

use crate::error::{PolicyError, PolicyResult};
use crate::traits::{ApprovalPolicy, PolicyInput};

/// Approved when every eligible checker has approved. The eligible set is
/// computed by the caller from the user directory, after
/// [`ApproverExclusions`](crate::ApproverExclusions).
///
/// Approvals from users outside the set are not counted, so an excluded
/// account can neither stand in for a checker nor push the count past the
/// set size.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnanimousPolicy;

impl ApprovalPolicy for UnanimousPolicy {
    fn mode(&self) -> ApprovalMode {
        ApprovalMode::All
    }

    fn needs_eligible_approvers(&self) -> bool {
        true
    }

    fn evaluate(&self, input: &PolicyInput<'_>) -> PolicyResult<Decision> {
        let eligible = input
            .eligible_approvers
            .ok_or(PolicyError::MissingEligibleApprovers)?;

        let signed = eligible
            .iter()
            .filter(|user| input.approved_by(**user))
            .count();

        if signed == eligible.len() {
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
    use signoff_core::{ApprovalConfiguration, UserId};

    const CHECKERS: [UserId; 2] = [UserId(1), UserId(2)];

    #[test]
    fn test_approved_when_all_eligible_signed() {
        let config = ApprovalConfiguration::unanimous(1);
        let cmd = command();

        let votes = approvals(&[1]);
        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);
        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Pending);

        let votes = approvals(&[1, 2]);
        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);
        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Approved);
    }

    #[test]
    fn test_required_approvals_is_ignored() {
        let config = ApprovalConfiguration::unanimous(10);
        let cmd = command();
        let votes = approvals(&[1, 2]);
        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);

        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Approved);
    }

    #[test]
    fn test_votes_outside_eligible_set_do_not_count() {
        let config = ApprovalConfiguration::unanimous(1);
        let cmd = command();

        // 9 is an excluded account: it cannot replace checker 2
        let votes = approvals(&[1, 9]);
        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);
        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Pending);

        // nor block approval once every checker signed
        let votes = approvals(&[1, 9, 2]);
        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);
        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Approved);
    }

    #[test]
    fn test_rejection_by_checker_is_not_a_signature() {
        let config = ApprovalConfiguration::unanimous(1);
        let cmd = command();
        let mut votes = approvals(&[1, 2]);
        votes[1].is_approval = false;

        let input = PolicyInput::new(&config, &votes, &cmd).with_eligible_approvers(&CHECKERS);
        assert_eq!(UnanimousPolicy.evaluate(&input).unwrap(), Decision::Pending);
    }

    #[test]
    fn test_missing_eligible_count_is_an_error() {
        let config = ApprovalConfiguration::unanimous(1);
        let cmd = command();
        let votes = approvals(&[1]);

        assert!(UnanimousPolicy.needs_eligible_approvers());
        assert_eq!(
            UnanimousPolicy.evaluate(&PolicyInput::new(&config, &votes, &cmd)),
            Err(PolicyError::MissingEligibleApprovers)
        );
    }
}
