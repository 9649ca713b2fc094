//! Identity newtypes for external entities
//!
//! Commands and users are owned by the surrounding platform; the engine only
//! ever refers to them by numeric id.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a command awaiting approval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandId(pub i64);

/// Identifier of a platform user (maker, checker or leader)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl CommandId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl UserId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommandId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CommandId)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(UserId)
    }
}

impl From<i64> for CommandId {
    fn from(value: i64) -> Self {
        CommandId(value)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        UserId(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        assert_eq!("42".parse::<CommandId>().unwrap(), CommandId(42));
        assert_eq!(" 7 ".parse::<UserId>().unwrap(), UserId(7));
        assert!("abc".parse::<UserId>().is_err());
    }

    #[test]
    fn test_ids_serialize_as_numbers() {
        let json = serde_json::to_string(&UserId(5)).unwrap();
        assert_eq!(json, "5");

        let parsed: CommandId = serde_json::from_str("12").unwrap();
        assert_eq!(parsed, CommandId(12));
    }
}
