//! Signoff Policies
//!
//! One policy per [`ApprovalMode`](signoff_core::ApprovalMode):
//!
//! | Mode     | Approved when                                                        |
//! |----------|----------------------------------------------------------------------|
//! | `QUORUM` | approvals >= required - 1                                            |
//! | `ALL`    | approvals == eligible checkers (after exclusions)                    |
//! | `LEADER` | approvals >= required - 1 and the leader voted or is the maker       |
//!
//! The `- 1` counts the maker's submission as the first signature.
//!
//! Policies are pure: they read a snapshot of votes and never perform I/O.
//! Rejections are terminal and handled by the coordinator before a policy
//! is consulted, so a policy only answers `Pending` or `Approved`.

pub mod error;
pub mod exclusions;
pub mod leader;
pub mod quorum;
pub mod select;
pub mod traits;
pub mod unanimous;

pub use error::{PolicyError, PolicyResult};
pub use exclusions::ApproverExclusions;
pub use leader::LeaderPolicy;
pub use quorum::QuorumPolicy;
pub use select::policy_for;
pub use traits::{ApprovalPolicy, PolicyInput};
pub use unanimous::UnanimousPolicy;
