//! # Signoff Engine
//!
//! Maker-checker approval for sensitive commands. A maker submits a command;
//! checkers approve or reject it; the active [`ApprovalConfiguration`]
//! decides when enough signatures have been collected.
//!
//! ## Lifecycle
//!
//! `PENDING -> APPROVED | REJECTED`. A single rejection is final. Approval
//! depends on the configured mode (see `signoff_policy`).
//!
//! ## Guards
//! - one vote per user per command, enforced by the vote store
//! - the maker does not vote on their own command (configurable)
//! - checkers hold `<ACTION>_<ENTITY>_CHECKER` (configurable)
//! - settings changes need `UPDATE_APPROVAL_SETTINGS`
//!
//! [`ApprovalConfiguration`]: signoff_core::ApprovalConfiguration

pub mod config;
pub mod coordinator;
pub mod directory;
pub mod error;
pub mod traits;
pub mod validation;

pub use config::EngineConfig;
pub use coordinator::{ApprovalCoordinator, ApproveOutcome, UPDATE_APPROVAL_SETTINGS};
pub use directory::{DirectoryEntry, StaticDirectory, ALL_FUNCTIONS};
pub use error::{EngineError, EngineResult, ValidationIssue};
pub use traits::{CommandSource, DecisionListener, UserDirectory};
pub use validation::SettingsRequest;
