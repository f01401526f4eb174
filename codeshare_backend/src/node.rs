use crate::api;
use crate::config::CodeshareConfig;
use crate::database::Database;
use anyhow::{Context, Result};

/// Bootstrapped backend: configuration plus the connected store. The store
/// connection is made exactly once here; a missing data directory or an
/// unopenable database is fatal, since no request can be served without it.
pub struct CodeshareNode {
    config: CodeshareConfig,
    database: Database,
}

#[derive(Clone)]
pub struct NodeSnapshot {
    pub config: CodeshareConfig,
    pub database: Database,
}

impl CodeshareNode {
    pub fn start(config: CodeshareConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.paths.data_dir).with_context(|| {
            format!(
                "failed to create data directory {}",
                config.paths.data_dir.display()
            )
        })?;
        let database = Database::connect(&config.paths).with_context(|| {
            format!("failed to open post store {}", config.paths.db_path.display())
        })?;
        let newly_created = database.ensure_migrations()?;
        if newly_created {
            tracing::info!(db_path = %config.paths.db_path.display(), "created new post store");
        }
        Ok(Self { config, database })
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            config: self.config.clone(),
            database: self.database.clone(),
        }
    }

    pub async fn run_http_server(self) -> Result<()> {
        api::serve_http(self.config, self.database).await
    }
}
