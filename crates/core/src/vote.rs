//! Votes cast by checkers
//!
//! A vote is written once and never edited or deleted; the set of votes for a
//! command doubles as its audit trail.

use crate::ids::{CommandId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single approve/reject ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub command_id: CommandId,
    pub voter_id: UserId,
    pub is_approval: bool,
    pub submitted_at: DateTime<Utc>,
}

impl Vote {
    pub fn label(&self) -> &'static str {
        if self.is_approval {
            "APPROVED"
        } else {
            "REJECTED"
        }
    }
}

/// Vote as listed for auditors: who voted, when, and which way
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteView {
    pub id: i64,
    pub user: Option<String>,
    pub submitted: DateTime<Utc>,
    pub vote: String,
}

impl VoteView {
    pub fn new(vote: &Vote, username: Option<String>) -> Self {
        Self {
            id: vote.id,
            user: username,
            submitted: vote.submitted_at,
            vote: vote.label().to_string(),
        }
    }
}
