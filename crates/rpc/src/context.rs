//! Application context - wires everything together

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use signoff_core::{CommandUnderApproval, Decision};
use signoff_engine::{
    ApprovalCoordinator, DecisionListener, EngineConfig, EngineResult, StaticDirectory,
};
use signoff_store::sqlite::{self, SqliteConfigurationStore, SqliteVoteStore};
use sqlx::SqlitePool;

/// Users, permissions and pending commands
pub const DIRECTORY_FILE: &str = "directory.json";
/// Optional engine settings
pub const ENGINE_CONFIG_FILE: &str = "engine.json";
pub const DATABASE_FILE: &str = "signoff.db";

/// Logs every terminal decision; stands in for the execution pipeline
struct DecisionLog;

#[async_trait]
impl DecisionListener for DecisionLog {
    fn name(&self) -> &str {
        "decision-log"
    }

    async fn on_decision(
        &self,
        command: &CommandUnderApproval,
        decision: Decision,
    ) -> EngineResult<()> {
        tracing::info!(
            command_id = %command.id,
            action = %command.action_name,
            entity = %command.entity_name,
            decision = %decision,
            "Command decided"
        );
        Ok(())
    }
}

/// Application context - wires together all components
pub struct AppContext {
    pub coordinator: ApprovalCoordinator,
    pub directory: Arc<StaticDirectory>,
    pool: SqlitePool,
    data_path: PathBuf,
}

impl AppContext {
    /// Create a new application context
    pub async fn new(data_path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let data_path = data_path.as_ref();
        std::fs::create_dir_all(data_path)?;

        let directory = Arc::new(Self::load_directory(&data_path.join(DIRECTORY_FILE))?);
        let config = Self::load_config(&data_path.join(ENGINE_CONFIG_FILE))?;

        let pool = sqlite::open(data_path.join(DATABASE_FILE)).await?;
        sqlite::init_schema(&pool).await?;

        let coordinator = ApprovalCoordinator::new(
            Arc::new(SqliteVoteStore::new(pool.clone())),
            Arc::new(SqliteConfigurationStore::new(pool.clone())),
            directory.clone(),
            directory.clone(),
            config,
        )
        .with_listener(Arc::new(DecisionLog));

        Ok(Self {
            coordinator,
            directory,
            pool,
            data_path: data_path.to_path_buf(),
        })
    }

    /// Read the directory file; a missing file is an empty directory
    pub fn load_directory(path: &Path) -> Result<StaticDirectory, anyhow::Error> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "No directory file, starting empty");
            return Ok(StaticDirectory::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn load_config(path: &Path) -> Result<EngineConfig, anyhow::Error> {
        if !path.exists() {
            return Ok(EngineConfig::default());
        }
        Ok(EngineConfig::from_file(path)?)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_path.join(DATABASE_FILE)
    }

    /// Close the database pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
