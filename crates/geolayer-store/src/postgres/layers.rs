use async_trait::async_trait;
use geojson::{Geometry, JsonObject};
use geolayer_core::error::{GeolayerError, Result};
use geolayer_core::models::{LayerDetail, LayerId, LayerRecord, LayerSummary, StoredLayer};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use super::PostgresStore;
use crate::ports::LayerStore;

/// Idempotent DDL for the layer table
///
/// `seq` keeps insertion order for listings; `id` is the identifier handed
/// out to callers.
pub(crate) fn schema_statements(srid: i32) -> Vec<String> {
    vec![
        "CREATE EXTENSION IF NOT EXISTS postgis".to_string(),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS layers (
                seq BIGSERIAL NOT NULL,
                id UUID PRIMARY KEY,
                feature_type TEXT NOT NULL,
                feature_id JSONB,
                geometry geometry(Geometry, {}),
                properties JSONB
            )
            "#,
            srid
        ),
        "CREATE INDEX IF NOT EXISTS layers_geometry_idx ON layers USING GIST (geometry)"
            .to_string(),
        "CREATE INDEX IF NOT EXISTS layers_seq_idx ON layers (seq)".to_string(),
    ]
}

#[async_trait]
impl LayerStore for PostgresStore {
    async fn insert_many(&self, records: &[LayerRecord]) -> Result<Vec<LayerId>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        // One transaction per batch so a failing record rejects the whole upload
        let mut tx = self.pool.begin().await.map_err(|e| {
            GeolayerError::Store(format!("Failed to begin transaction: {}", e))
        })?;

        let mut ids = Vec::with_capacity(records.len());

        for record in records {
            let layer_id = LayerId::new();

            let geometry_json = record
                .geometry
                .as_ref()
                .map(serde_json::to_string)
                .transpose()
                .map_err(|e| {
                    GeolayerError::Serialization(format!("Failed to serialize geometry: {}", e))
                })?;

            let properties = record.properties.clone().map(JsonValue::Object);

            sqlx::query(
                r#"
                INSERT INTO layers (id, feature_type, feature_id, geometry, properties)
                VALUES ($1, $2, $3, ST_SetSRID(ST_GeomFromGeoJSON($4), $5), $6)
                "#,
            )
            .bind(layer_id.0)
            .bind(&record.feature_type)
            .bind(record.id.clone())
            .bind(geometry_json)
            .bind(self.config.srid)
            .bind(properties)
            .execute(&mut *tx)
            .await
            .map_err(|e| GeolayerError::Store(format!("Failed to store layer: {}", e)))?;

            ids.push(layer_id);
        }

        tx.commit().await.map_err(|e| {
            GeolayerError::Store(format!("Failed to commit transaction: {}", e))
        })?;

        tracing::debug!(count = ids.len(), "Inserted layer batch");
        Ok(ids)
    }

    async fn find_intersecting(&self, geometry: &Geometry) -> Result<Vec<StoredLayer>> {
        let geometry_json = serde_json::to_string(geometry).map_err(|e| {
            GeolayerError::Serialization(format!("Failed to serialize geometry: {}", e))
        })?;

        let rows = sqlx::query(
            r#"
            SELECT id, feature_type, feature_id, ST_AsGeoJSON(geometry) AS geometry, properties
            FROM layers
            WHERE ST_Intersects(geometry, ST_SetSRID(ST_GeomFromGeoJSON($1), $2))
            ORDER BY seq
            "#,
        )
        .bind(geometry_json)
        .bind(self.config.srid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GeolayerError::Store(format!("Failed to execute spatial query: {}", e)))?;

        rows.iter().map(stored_layer_from_row).collect()
    }

    async fn list_layers(&self, fields: &[String]) -> Result<Vec<LayerSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id,
                   COALESCE(
                       (SELECT jsonb_object_agg(key, value)
                        FROM jsonb_each(properties)
                        WHERE key = ANY($1)),
                       '{}'::jsonb
                   ) AS properties
            FROM layers
            ORDER BY seq
            "#,
        )
        .bind(fields.to_vec())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| GeolayerError::Store(format!("Failed to list layers: {}", e)))?;

        rows.iter()
            .map(|row| {
                let uuid: Uuid = column(row, "id")?;
                let properties: Option<JsonValue> = column(row, "properties")?;
                Ok(LayerSummary {
                    layer_id: LayerId(uuid),
                    properties: into_object(properties).unwrap_or_default(),
                })
            })
            .collect()
    }

    async fn get_layer(&self, id: LayerId) -> Result<Option<LayerDetail>> {
        let row = sqlx::query(
            r#"
            SELECT ST_AsGeoJSON(geometry) AS geometry, properties
            FROM layers
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| GeolayerError::Store(format!("Failed to get layer: {}", e)))?;

        match row {
            Some(row) => {
                let properties: Option<JsonValue> = column(&row, "properties")?;
                Ok(Some(LayerDetail {
                    geometry: geometry_from_row(&row)?,
                    properties: into_object(properties),
                }))
            }
            None => Ok(None),
        }
    }
}

fn stored_layer_from_row(row: &PgRow) -> Result<StoredLayer> {
    let uuid: Uuid = column(row, "id")?;
    let properties: Option<JsonValue> = column(row, "properties")?;

    Ok(StoredLayer {
        layer_id: LayerId(uuid),
        record: LayerRecord {
            feature_type: column(row, "feature_type")?,
            id: column(row, "feature_id")?,
            geometry: geometry_from_row(row)?,
            properties: into_object(properties),
        },
    })
}

fn geometry_from_row(row: &PgRow) -> Result<Option<Geometry>> {
    let geometry: Option<String> = column(row, "geometry")?;
    geometry
        .map(|text| {
            serde_json::from_str::<Geometry>(&text).map_err(|e| {
                GeolayerError::Serialization(format!("Failed to parse stored geometry: {}", e))
            })
        })
        .transpose()
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| GeolayerError::Store(format!("Failed to read column '{}': {}", name, e)))
}

fn into_object(value: Option<JsonValue>) -> Option<JsonObject> {
    match value {
        Some(JsonValue::Object(map)) => Some(map),
        _ => None,
    }
}
