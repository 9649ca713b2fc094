//! Approval decisions
//!
//! `Pending -> {Approved, Rejected}`; both outcomes are terminal.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Still collecting votes
    #[default]
    Pending,
    /// Signing mandate satisfied; the command may execute
    Approved,
    /// A checker rejected the command
    Rejected,
}

impl Decision {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Decision::Pending)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Decision::Approved)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Decision::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!Decision::Pending.is_terminal());
        assert!(Decision::Approved.is_terminal());
        assert!(Decision::Rejected.is_terminal());
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(Decision::default(), Decision::Pending);
    }

    #[test]
    fn test_decision_names() {
        assert_eq!(Decision::Approved.to_string(), "APPROVED");
        assert_eq!("PENDING".parse::<Decision>().unwrap(), Decision::Pending);
        assert_eq!(
            serde_json::to_string(&Decision::Rejected).unwrap(),
            "\"REJECTED\""
        );
    }
}
