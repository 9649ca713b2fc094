//! Signoff Core - Domain types
//!
//! This crate contains the types shared by every layer of the approval engine:
//! - `CommandId` / `UserId`: identities of external commands and users
//! - `Vote`: an immutable approve/reject ballot on a command
//! - `ApprovalMode` / `ApprovalConfiguration`: the active signing mandate
//! - `Decision`: the engine's verdict for a command
//! - `UserProfile`: directory record of a maker or checker

pub mod command;
pub mod config;
pub mod decision;
pub mod ids;
pub mod user;
pub mod vote;

pub use command::CommandUnderApproval;
pub use config::{ApprovalConfiguration, ApprovalMode, ApprovalSetting, ModeError};
pub use decision::Decision;
pub use ids::{CommandId, UserId};
pub use user::UserProfile;
pub use vote::{Vote, VoteView};
