//! SQLite vote ledger and settled decisions

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use signoff_core::{CommandId, Decision, UserId, Vote};
use sqlx::{FromRow, SqlitePool};

use crate::error::{StoreError, StoreResult};
use crate::traits::VoteStore;

#[derive(Debug, FromRow)]
struct VoteRow {
    id: i64,
    command_id: i64,
    voter_id: i64,
    is_approval: bool,
    submitted_at: DateTime<Utc>,
}

impl From<VoteRow> for Vote {
    fn from(row: VoteRow) -> Self {
        Vote {
            id: row.id,
            command_id: CommandId(row.command_id),
            voter_id: UserId(row.voter_id),
            is_approval: row.is_approval,
            submitted_at: row.submitted_at,
        }
    }
}

/// Vote ledger backed by the `approval_votes` table.
///
/// Duplicate detection is the table's `UNIQUE (command_id, voter_id)`
/// constraint; a violation maps to `StoreError::DuplicateVote`. Decisions
/// live in `approval_decisions`, keyed by command.
pub struct SqliteVoteStore {
    pool: SqlitePool,
}

impl SqliteVoteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the schema if needed
    pub async fn init(&self) -> StoreResult<()> {
        super::init_schema(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl VoteStore for SqliteVoteStore {
    async fn record(
        &self,
        command_id: CommandId,
        voter_id: UserId,
        is_approval: bool,
        submitted_at: DateTime<Utc>,
    ) -> StoreResult<Vote> {
        let result = sqlx::query(
            r#"
            INSERT INTO approval_votes (command_id, voter_id, is_approval, submitted_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(command_id.value())
        .bind(voter_id.value())
        .bind(is_approval)
        .bind(submitted_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(Vote {
                id: done.last_insert_rowid(),
                command_id,
                voter_id,
                is_approval,
                submitted_at,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::debug!(%command_id, %voter_id, "Unique constraint rejected vote");
                Err(StoreError::DuplicateVote {
                    command_id,
                    voter_id,
                })
            }
            Err(e) => Err(StoreError::Database(e)),
        }
    }

    async fn list_votes(&self, command_id: CommandId) -> StoreResult<Vec<Vote>> {
        let rows = sqlx::query_as::<_, VoteRow>(
            r#"
            SELECT id, command_id, voter_id, is_approval, submitted_at
            FROM approval_votes
            WHERE command_id = ?
            ORDER BY id
            "#,
        )
        .bind(command_id.value())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Vote::from).collect())
    }

    async fn settle(
        &self,
        command_id: CommandId,
        decision: Decision,
        decided_at: DateTime<Utc>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO approval_decisions (command_id, decision, decided_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(command_id.value())
        .bind(decision.to_string())
        .bind(decided_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn decision(&self, command_id: CommandId) -> StoreResult<Option<Decision>> {
        let stored: Option<String> = sqlx::query_scalar(
            "SELECT decision FROM approval_decisions WHERE command_id = ?",
        )
        .bind(command_id.value())
        .fetch_optional(&self.pool)
        .await?;

        stored
            .map(|value| {
                value
                    .parse::<Decision>()
                    .map_err(|_| StoreError::CorruptDecision { command_id, value })
            })
            .transpose()
    }
}
