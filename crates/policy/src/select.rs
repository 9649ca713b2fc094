//! Mode to policy dispatch

use signoff_core::ApprovalMode;

use crate::leader::LeaderPolicy;
use crate::quorum::QuorumPolicy;
use crate::traits::ApprovalPolicy;
use crate::unanimous::UnanimousPolicy;

static QUORUM: QuorumPolicy = QuorumPolicy;
static UNANIMOUS: UnanimousPolicy = UnanimousPolicy;
static LEADER: LeaderPolicy = LeaderPolicy;

/// Policy implementing `mode`
pub fn policy_for(mode: ApprovalMode) -> &'static dyn ApprovalPolicy {
    match mode {
        ApprovalMode::Quorum => &QUORUM,
        ApprovalMode::All => &UNANIMOUS,
        ApprovalMode::Leader => &LEADER,
    }
}
