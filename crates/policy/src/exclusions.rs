//! Who does not count towards a unanimous vote
//!
//! The unanimity denominator is the set of users holding the checker
//! permission, minus service accounts and administrative identities that
//! hold every permission but never take part in approvals.

use serde::{Deserialize, Serialize};
use signoff_core::UserProfile;

/// Filter applied to the checker set before counting eligible approvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverExclusions {
    /// Drop users flagged as system accounts
    #[serde(default = "default_exclude_system_accounts")]
    pub exclude_system_accounts: bool,

    /// Usernames never counted (case-insensitive)
    #[serde(default = "default_usernames")]
    pub usernames: Vec<String>,

    /// Email domains never counted; subdomains match too
    #[serde(default)]
    pub email_domains: Vec<String>,
}

fn default_exclude_system_accounts() -> bool {
    true
}

fn default_usernames() -> Vec<String> {
    vec!["mifos".to_string()]
}

impl Default for ApproverExclusions {
    fn default() -> Self {
        Self {
            exclude_system_accounts: default_exclude_system_accounts(),
            usernames: default_usernames(),
            email_domains: Vec::new(),
        }
    }
}

impl ApproverExclusions {
    /// Exclude nobody
    pub fn none() -> Self {
        Self {
            exclude_system_accounts: false,
            usernames: Vec::new(),
            email_domains: Vec::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.usernames.push(username.into());
        self
    }

    pub fn with_email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domains.push(domain.into());
        self
    }

    /// True if the user must not be counted as an eligible approver
    pub fn excludes(&self, user: &UserProfile) -> bool {
        if self.exclude_system_accounts && user.is_system_account {
            return true;
        }

        if self
            .usernames
            .iter()
            .any(|name| name.trim().eq_ignore_ascii_case(user.username.trim()))
        {
            return true;
        }

        match user.email_domain() {
            Some(domain) => self
                .email_domains
                .iter()
                .any(|excluded| domain_matches(&domain, excluded)),
            None => false,
        }
    }

    /// Number of users in `users` that survive the filter
    pub fn count_eligible<'a, I>(&self, users: I) -> usize
    where
        I: IntoIterator<Item = &'a UserProfile>,
    {
        users.into_iter().filter(|u| !self.excludes(u)).count()
    }
}

fn domain_matches(domain: &str, excluded: &str) -> bool {
    let excluded = excluded.trim().trim_start_matches('@').to_lowercase();
    if excluded.is_empty() {
        return false;
    }
    domain == excluded || domain.ends_with(&format!(".{excluded}"))
}
