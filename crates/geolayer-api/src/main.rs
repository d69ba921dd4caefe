use std::sync::Arc;

use anyhow::Context;
use geolayer_core::config::LayeredConfig;
use geolayer_geo::{GeometryNormalizer, ProjTransformer};
use geolayer_store::memory::MemoryLayerStore;
use geolayer_store::ports::LayerStore;
use geolayer_store::postgres::{PostgresConfig, PostgresStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geolayer_api::cors::build_cors_layer;
use geolayer_api::router::create_router_with_limit;
use geolayer_api::{ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geolayer_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let layered = LayeredConfig::load().context("Failed to load configuration")?;
    let config = ApiConfig::from_layered(&layered).context("Invalid configuration")?;

    tracing::info!(
        port = config.port,
        source_crs = %layered.source_crs(),
        target_crs = %layered.target_crs(),
        "Starting Geolayer API server"
    );

    let transformer = ProjTransformer::new(&layered.source_crs(), &layered.target_crs())
        .context("Failed to create coordinate transformer")?;
    let normalizer = GeometryNormalizer::new(Arc::new(transformer))
        .with_coordinate_tracing(layered.trace_coordinates.value);

    // Initialize storage backend based on DATABASE_URL
    let store: Arc<dyn LayerStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            let store = init_postgres_storage(database_url, config.srid).await.context(
                "Failed to connect to PostgreSQL. Ensure it is running with PostGIS \
                 available and that DATABASE_URL is correct",
            )?;
            tracing::info!("Connected to PostgreSQL");
            store
        }
        None => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            Arc::new(MemoryLayerStore::new())
        }
    };

    let state = Arc::new(
        AppState::new(store, normalizer, layered.summary_fields.value.clone())
            .with_query_normalization(layered.normalize_query_geometry.value),
    );

    let cors = build_cors_layer(&config.cors_origins)?;
    let app = create_router_with_limit(state, config.max_upload_bytes).layer(cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origins.join(", "));

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Initialize PostgreSQL storage from a database URL
async fn init_postgres_storage(
    database_url: &str,
    srid: i32,
) -> anyhow::Result<Arc<dyn LayerStore>> {
    let config = PostgresConfig::from_database_url(database_url)
        .context("Invalid DATABASE_URL")?
        .with_srid(srid);

    let store = PostgresStore::with_schema(config).await?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
