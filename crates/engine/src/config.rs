//! Engine configuration
//!
//! Loaded from `engine.json` next to the database. Every field has a default,
//! so an empty object (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use signoff_core::ApprovalConfiguration;
use signoff_policy::ApproverExclusions;

/// Configuration for the approval coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Accounts left out of the unanimity denominator
    #[serde(default)]
    pub exclusions: ApproverExclusions,

    /// Let a maker vote on their own command
    #[serde(default)]
    pub allow_maker_vote: bool,

    /// Require voters to hold `<ACTION>_<ENTITY>_CHECKER`
    #[serde(default = "default_enforce_checker_permission")]
    pub enforce_checker_permission: bool,

    /// Configuration seeded by `init` when none exists yet
    #[serde(default)]
    pub initial_configuration: ApprovalConfiguration,
}

fn default_enforce_checker_permission() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exclusions: ApproverExclusions::default(),
            allow_maker_vote: false,
            enforce_checker_permission: default_enforce_checker_permission(),
            initial_configuration: ApprovalConfiguration::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
