//! PostgreSQL/PostGIS storage adapter implementation

pub mod config;
pub mod layers;

pub use config::{ConfigError, PoolConfig, PostgresConfig};

use geolayer_core::error::{GeolayerError, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresStore {
    /// Create a new PostgreSQL store with the given configuration
    pub async fn new(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| GeolayerError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| GeolayerError::Store(format!("Failed to connect to database: {}", e)))?;

        let store = Self { pool, config };
        store.health_check().await?;
        Ok(store)
    }

    /// Create a new PostgreSQL store and make sure the layer table exists
    pub async fn with_schema(config: PostgresConfig) -> Result<Self> {
        let store = Self::new(config).await?;
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Create the PostGIS extension, layer table and indexes if missing
    pub async fn ensure_schema(&self) -> Result<()> {
        for statement in layers::schema_statements(self.config.srid) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| GeolayerError::Store(format!("Schema setup failed: {}", e)))?;
        }

        tracing::debug!(srid = self.config.srid, "Layer schema ready");
        Ok(())
    }

    /// Perform a health check on the database connection
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| GeolayerError::Store(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}
