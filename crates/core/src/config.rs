//! Approval configuration - the active signing mandate
//!
//! Exactly one configuration is active at a time. Its mode selects the
//! policy, and its required approval count decides whether maker-checker
//! review is switched on at all.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Errors decoding an approval mode from storage or user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("Unknown approval mode code: {0}")]
    UnknownCode(i64),

    #[error("Unknown approval mode: {0}")]
    UnknownName(String),
}

/// How votes are counted for a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalMode {
    /// A minimum number of signatures
    Quorum,
    /// Every eligible checker must sign
    All,
    /// A designated user must sign, alongside a minimum number of signatures
    Leader,
}

impl ApprovalMode {
    /// Stable integer code used in persisted rows
    pub fn code(&self) -> i64 {
        match self {
            ApprovalMode::Quorum => 1,
            ApprovalMode::All => 2,
            ApprovalMode::Leader => 3,
        }
    }

    /// Decode a persisted mode. Unknown codes are an error, never a default.
    pub fn from_code(code: i64) -> Result<Self, ModeError> {
        match code {
            1 => Ok(ApprovalMode::Quorum),
            2 => Ok(ApprovalMode::All),
            3 => Ok(ApprovalMode::Leader),
            other => Err(ModeError::UnknownCode(other)),
        }
    }

    /// Parse a mode name as accepted by the settings API (`QUORUM`, `ALL`, `LEADER`)
    pub fn parse_name(name: &str) -> Result<Self, ModeError> {
        name.trim()
            .to_uppercase()
            .parse()
            .map_err(|_| ModeError::UnknownName(name.to_string()))
    }

    pub fn all() -> [ApprovalMode; 3] {
        [ApprovalMode::Quorum, ApprovalMode::All, ApprovalMode::Leader]
    }
}

/// The singleton approval configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalConfiguration {
    pub approval_mode: ApprovalMode,

    /// Total signatures needed, counting the maker's own submission
    pub required_approvals: u32,

    /// Designated leader; required when `approval_mode` is `Leader`
    pub required_user_id: Option<UserId>,
}

impl ApprovalConfiguration {
    pub fn quorum(required_approvals: u32) -> Self {
        Self {
            approval_mode: ApprovalMode::Quorum,
            required_approvals,
            required_user_id: None,
        }
    }

    pub fn unanimous(required_approvals: u32) -> Self {
        Self {
            approval_mode: ApprovalMode::All,
            required_approvals,
            required_user_id: None,
        }
    }

    pub fn leader(required_approvals: u32, leader: UserId) -> Self {
        Self {
            approval_mode: ApprovalMode::Leader,
            required_approvals,
            required_user_id: Some(leader),
        }
    }

    /// Checker votes needed on top of the maker's implicit signature.
    ///
    /// Submitting a command counts as the first approval, so a mandate of
    /// N signatures needs N - 1 votes.
    pub fn checker_votes_required(&self) -> usize {
        self.required_approvals.saturating_sub(1) as usize
    }

    /// Maker-checker is off when a single signature suffices.
    pub fn maker_checker_enabled(&self) -> bool {
        self.required_approvals != 1
    }
}

impl Default for ApprovalConfiguration {
    /// Single signature quorum: maker-checker off
    fn default() -> Self {
        Self::quorum(1)
    }
}

/// Read view of the active configuration, as shown to administrators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalSetting {
    pub approval_mode: String,
    pub required_approvals: u32,
    pub required_user: Option<String>,
    pub required_user_id: Option<UserId>,
}

impl ApprovalSetting {
    pub fn new(config: &ApprovalConfiguration, required_user_name: Option<String>) -> Self {
        Self {
            approval_mode: config.approval_mode.to_string(),
            required_approvals: config.required_approvals,
            required_user: required_user_name,
            required_user_id: config.required_user_id,
        }
    }
}
