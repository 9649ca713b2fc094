//! Platform users as seen by the approval engine

use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// Directory record of a user.
///
/// Supplied by the platform's user directory; the engine reads it to
/// resolve leaders and to filter the unanimity denominator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Service/system accounts never count as human checkers
    #[serde(default)]
    pub is_system_account: bool,
}

impl UserProfile {
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: None,
            display_name: None,
            is_system_account: false,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system_account = true;
        self
    }

    /// Display name, falling back to the username
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }

    /// Domain part of the email address, lowercased
    pub fn email_domain(&self) -> Option<String> {
        self.email
            .as_deref()
            .and_then(|e| e.rsplit_once('@'))
            .map(|(_, domain)| domain.trim().to_lowercase())
    }
}
