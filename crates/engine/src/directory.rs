//! Static directory - users, permissions and commands held in memory
//!
//! Backs the CLI (deserialized from `directory.json`) and the tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use signoff_core::{CommandId, CommandUnderApproval, UserId, UserProfile};

use crate::error::EngineResult;
use crate::traits::{CommandSource, UserDirectory};

/// Permission that implies every other permission
pub const ALL_FUNCTIONS: &str = "ALL_FUNCTIONS";

/// A directory user with the permissions granted to them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl DirectoryEntry {
    fn grants(&self, permission: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p == ALL_FUNCTIONS || p.eq_ignore_ascii_case(permission))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticDirectory {
    #[serde(default)]
    pub users: Vec<DirectoryEntry>,
    #[serde(default)]
    pub commands: Vec<CommandUnderApproval>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, profile: UserProfile, permissions: &[&str]) -> Self {
        self.users.push(DirectoryEntry {
            profile,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        });
        self
    }

    pub fn with_command(mut self, command: CommandUnderApproval) -> Self {
        self.commands.push(command);
        self
    }

    fn entry(&self, id: UserId) -> Option<&DirectoryEntry> {
        self.users.iter().find(|e| e.profile.id == id)
    }
}

#[async_trait]
impl CommandSource for StaticDirectory {
    async fn find_command(&self, id: CommandId) -> EngineResult<Option<CommandUnderApproval>> {
        Ok(self.commands.iter().find(|c| c.id == id).cloned())
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn find_user(&self, id: UserId) -> EngineResult<Option<UserProfile>> {
        Ok(self.entry(id).map(|e| e.profile.clone()))
    }

    async fn has_permission(&self, id: UserId, permission: &str) -> EngineResult<bool> {
        Ok(self.entry(id).map(|e| e.grants(permission)).unwrap_or(false))
    }

    async fn users_with_permission(&self, permission: &str) -> EngineResult<Vec<UserProfile>> {
        Ok(self
            .users
            .iter()
            .filter(|e| e.grants(permission))
            .map(|e| e.profile.clone())
            .collect())
    }
}
