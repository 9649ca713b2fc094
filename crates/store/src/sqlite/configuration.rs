//! SQLite configuration singleton

use async_trait::async_trait;
use signoff_core::{ApprovalConfiguration, ApprovalMode, UserId};
use sqlx::{FromRow, SqlitePool};

use super::MAKER_CHECKER_FLAG;
use crate::error::{StoreError, StoreResult};
use crate::traits::ConfigurationStore;

#[derive(Debug, FromRow)]
struct ConfigurationRow {
    approval_mode: i64,
    required_approvals: i64,
    required_user_id: Option<i64>,
}

impl TryFrom<ConfigurationRow> for ApprovalConfiguration {
    type Error = StoreError;

    fn try_from(row: ConfigurationRow) -> Result<Self, Self::Error> {
        let approval_mode = ApprovalMode::from_code(row.approval_mode)
            .map_err(|e| StoreError::CorruptConfiguration(e.to_string()))?;

        let required_approvals = u32::try_from(row.required_approvals)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                StoreError::CorruptConfiguration(format!(
                    "required_approvals = {}",
                    row.required_approvals
                ))
            })?;

        let required_user_id = row.required_user_id.map(UserId);
        if approval_mode == ApprovalMode::Leader && required_user_id.is_none() {
            return Err(StoreError::CorruptConfiguration(
                "LEADER mode without a required user".to_string(),
            ));
        }

        Ok(ApprovalConfiguration {
            approval_mode,
            required_approvals,
            required_user_id,
        })
    }
}

/// Configuration singleton in `approval_configuration` (row id 1) plus the
/// maker-checker row of `global_configuration`
pub struct SqliteConfigurationStore {
    pool: SqlitePool,
}

impl SqliteConfigurationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the schema if needed
    pub async fn init(&self) -> StoreResult<()> {
        super::init_schema(&self.pool).await
    }
}

#[async_trait]
impl ConfigurationStore for SqliteConfigurationStore {
    async fn get_active(&self) -> StoreResult<ApprovalConfiguration> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r#"
            SELECT approval_mode, required_approvals, required_user_id
            FROM approval_configuration
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => ApprovalConfiguration::try_from(row),
            None => Err(StoreError::MissingConfiguration),
        }
    }

    async fn maker_checker_enabled(&self) -> StoreResult<bool> {
        let enabled: Option<bool> =
            sqlx::query_scalar("SELECT enabled FROM global_configuration WHERE name = ?")
                .bind(MAKER_CHECKER_FLAG)
                .fetch_optional(&self.pool)
                .await?;

        enabled.ok_or(StoreError::MissingConfiguration)
    }

    async fn save(
        &self,
        config: &ApprovalConfiguration,
        maker_checker_enabled: bool,
    ) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO approval_configuration (id, approval_mode, required_approvals, required_user_id)
            VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                approval_mode = excluded.approval_mode,
                required_approvals = excluded.required_approvals,
                required_user_id = excluded.required_user_id
            "#,
        )
        .bind(config.approval_mode.code())
        .bind(i64::from(config.required_approvals))
        .bind(config.required_user_id.map(|u| u.value()))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO global_configuration (name, enabled)
            VALUES (?, ?)
            ON CONFLICT(name) DO UPDATE SET enabled = excluded.enabled
            "#,
        )
        .bind(MAKER_CHECKER_FLAG)
        .bind(maker_checker_enabled)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn ensure_default(&self, config: &ApprovalConfiguration) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO approval_configuration (id, approval_mode, required_approvals, required_user_id)
            VALUES (1, ?, ?, ?)
            "#,
        )
        .bind(config.approval_mode.code())
        .bind(i64::from(config.required_approvals))
        .bind(config.required_user_id.map(|u| u.value()))
        .execute(&mut *tx)
        .await?;
        let inserted = result.rows_affected() > 0;

        if inserted {
            sqlx::query(
                r#"
                INSERT INTO global_configuration (name, enabled)
                VALUES (?, ?)
                ON CONFLICT(name) DO UPDATE SET enabled = excluded.enabled
                "#,
            )
            .bind(MAKER_CHECKER_FLAG)
            .bind(config.maker_checker_enabled())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::open_in_memory;

    async fn create_test_store() -> SqliteConfigurationStore {
        let store = SqliteConfigurationStore::new(open_in_memory().await.unwrap());
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_missing_configuration() {
        let store = create_test_store().await;
        assert!(matches!(
            store.get_active().await,
            Err(StoreError::MissingConfiguration)
        ));
        assert!(matches!(
            store.maker_checker_enabled().await,
            Err(StoreError::MissingConfiguration)
        ));
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let store = create_test_store().await;

        let config = ApprovalConfiguration::leader(3, UserId(12));
        store.save(&config, true).await.unwrap();

        assert_eq!(store.get_active().await.unwrap(), config);
        assert!(store.maker_checker_enabled().await.unwrap());

        let quorum = ApprovalConfiguration::quorum(1);
        store.save(&quorum, false).await.unwrap();

        assert_eq!(store.get_active().await.unwrap(), quorum);
        assert!(!store.maker_checker_enabled().await.unwrap());
    }

    #[tokio::test]
    async fn test_ensure_default_does_not_overwrite() {
        let store = create_test_store().await;

        assert!(store.ensure_default(&ApprovalConfiguration::quorum(1)).await.unwrap());
        store.save(&ApprovalConfiguration::unanimous(2), true).await.unwrap();
        assert!(!store.ensure_default(&ApprovalConfiguration::quorum(1)).await.unwrap());

        let active = store.get_active().await.unwrap();
        assert_eq!(active.approval_mode, ApprovalMode::All);
    }

    #[tokio::test]
    async fn test_unknown_mode_code_is_corruption() {
        let store = create_test_store().await;

        sqlx::query(
            "INSERT INTO approval_configuration (id, approval_mode, required_approvals) VALUES (1, 9, 2)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        let err = store.get_active().await.unwrap_err();
        assert!(matches!(err, StoreError::CorruptConfiguration(_)));
        assert!(err.to_string().contains('9'));
    }

    #[tokio::test]
    async fn test_leader_without_user_is_corruption() {
        let store = create_test_store().await;

        sqlx::query(
            "INSERT INTO approval_configuration (id, approval_mode, required_approvals) VALUES (1, 3, 2)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(store.get_active().await.unwrap_err().is_configuration_fault());
    }

    #[tokio::test]
    async fn test_non_positive_required_approvals_is_corruption() {
        let store = create_test_store().await;

        sqlx::query(
            "INSERT INTO approval_configuration (id, approval_mode, required_approvals) VALUES (1, 1, 0)",
        )
        .execute(&store.pool)
        .await
        .unwrap();

        assert!(matches!(
            store.get_active().await,
            Err(StoreError::CorruptConfiguration(_))
        ));
    }
}
