//! SQLite adapters (sqlx)
//!
//! Both stores share one pool. Schema is created idempotently by [`init_schema`].

mod configuration;
mod votes;

pub use configuration::SqliteConfigurationStore;
pub use votes::SqliteVoteStore;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::StoreResult;

/// Name of the maker-checker row in `global_configuration`
pub const MAKER_CHECKER_FLAG: &str = "maker-checker";

/// Open (creating if missing) a database file
pub async fn open(db_path: impl AsRef<Path>) -> StoreResult<SqlitePool> {
    let db_url = format!("sqlite:{}?mode=rwc", db_path.as_ref().display());
    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;
    Ok(pool)
}

/// Open a private in-memory database.
///
/// Pinned to one connection: every new connection to `:memory:` would see
/// its own empty database.
pub async fn open_in_memory() -> StoreResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Create tables and indexes
pub async fn init_schema(pool: &SqlitePool) -> StoreResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS approval_votes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            command_id INTEGER NOT NULL,
            voter_id INTEGER NOT NULL,
            is_approval INTEGER NOT NULL,
            submitted_at TEXT NOT NULL,
            UNIQUE (command_id, voter_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_approval_votes_command
        ON approval_votes(command_id, id)
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS approval_decisions (
            command_id INTEGER PRIMARY KEY,
            decision TEXT NOT NULL,
            decided_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS approval_configuration (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            approval_mode INTEGER NOT NULL,
            required_approvals INTEGER NOT NULL,
            required_user_id INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS global_configuration (
            name TEXT PRIMARY KEY,
            enabled INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
