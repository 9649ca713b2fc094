//! # Signoff Store
//!
//! Durable state of the approval engine:
//! - the vote ledger, append-only, one vote per `(command, voter)`
//! - the singleton approval configuration and the maker-checker flag
//!
//! ## Duplicate votes
//!
//! The "one vote per user per command" rule is enforced by the storage
//! layer itself. The SQLite adapter relies on a `UNIQUE (command_id, voter_id)`
//! constraint; the in-memory adapter checks and inserts under a single lock.
//! Callers never pre-check.
//!
//! ## Adapters
//! - [`memory::InMemoryVoteStore`], [`memory::InMemoryConfigurationStore`]
//! - [`sqlite::SqliteVoteStore`], [`sqlite::SqliteConfigurationStore`]

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryConfigurationStore, InMemoryVoteStore};
pub use sqlite::{SqliteConfigurationStore, SqliteVoteStore};
pub use traits::{ConfigurationStore, VoteStore};
