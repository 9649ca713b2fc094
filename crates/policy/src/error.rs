//! Policy errors

use thiserror::Error;

/// Evaluation failures. Both indicate inputs the coordinator should never
/// hand to a policy, and are treated as configuration faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Unanimous policy evaluated without an eligible approver count")]
    MissingEligibleApprovers,

    #[error("Leader policy evaluated without a designated leader")]
    LeaderNotConfigured,
}

/// Result type for policy evaluation
pub type PolicyResult<T> = Result<T, PolicyError>;
