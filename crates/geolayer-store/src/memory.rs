//! In-memory storage implementation for development and testing.
//!
//! Intersection is evaluated on the plane with the `geo` crate, which is close
//! enough to a spherical index for small regions. Use the PostgreSQL backend
//! for production workloads.

use async_trait::async_trait;
use geojson::Geometry;
use geolayer_core::error::{GeolayerError, Result};
use geolayer_core::models::{LayerDetail, LayerId, LayerRecord, LayerSummary, StoredLayer};
use geolayer_geo::spatial::IntersectionFilter;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ports::LayerStore;

/// In-memory implementation of LayerStore, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryLayerStore {
    layers: Arc<RwLock<Vec<(LayerId, LayerRecord)>>>,
}

impl MemoryLayerStore {
    /// Create a new in-memory layer store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<(LayerId, LayerRecord)>>> {
        self.layers.read().map_err(|_| GeolayerError::Store("layer store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<(LayerId, LayerRecord)>>> {
        self.layers.write().map_err(|_| GeolayerError::Store("layer store lock poisoned".into()))
    }
}

#[async_trait]
impl LayerStore for MemoryLayerStore {
    async fn insert_many(&self, records: &[LayerRecord]) -> Result<Vec<LayerId>> {
        let mut layers = self.write()?;

        let ids: Vec<LayerId> = records.iter().map(|_| LayerId::new()).collect();
        layers.extend(ids.iter().copied().zip(records.iter().cloned()));

        Ok(ids)
    }

    async fn find_intersecting(&self, geometry: &Geometry) -> Result<Vec<StoredLayer>> {
        let filter = IntersectionFilter::new(geometry)?;
        let layers = self.read()?;

        Ok(layers
            .iter()
            .filter(|(_, record)| {
                // No geometry, can't match spatial filter
                record.geometry.as_ref().is_some_and(|g| filter.matches(g))
            })
            .map(|(layer_id, record)| StoredLayer {
                layer_id: *layer_id,
                record: record.clone(),
            })
            .collect())
    }

    async fn list_layers(&self, fields: &[String]) -> Result<Vec<LayerSummary>> {
        let layers = self.read()?;
        Ok(layers.iter().map(|(layer_id, record)| record.summarize(*layer_id, fields)).collect())
    }

    async fn get_layer(&self, id: LayerId) -> Result<Option<LayerDetail>> {
        let layers = self.read()?;
        Ok(layers.iter().find(|(layer_id, _)| *layer_id == id).map(|(_, record)| record.detail()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::{JsonObject, Value};
    use serde_json::json;

    fn props(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    fn square(min: f64, max: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]]))
    }

    fn sample_records() -> Vec<LayerRecord> {
        vec![
            LayerRecord::new(
                Some(square(12.0, 12.5)),
                props(json!({"nome": "Parco", "vincolo": "A", "area": 3})),
            )
            .with_id(1),
            LayerRecord::new(
                Some(Geometry::new(Value::Point(vec![14.2, 40.8]))),
                props(json!({"nome": "Pozzo"})),
            )
            .with_id(2),
            LayerRecord::new(None, props(json!({"nome": "Senza geometria", "vincolo": "B"})))
                .with_id(3),
        ]
    }

    #[tokio::test]
    async fn test_insert_returns_ids_in_order() {
        let store = MemoryLayerStore::new();
        let ids = store.insert_many(&sample_records()).await.unwrap();

        assert_eq!(ids.len(), 3);
        assert_eq!(store.len().unwrap(), 3);

        let listed: Vec<LayerId> =
            store.list_layers(&[]).await.unwrap().into_iter().map(|s| s.layer_id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_no_op() {
        let store = MemoryLayerStore::new();
        let ids = store.insert_many(&[]).await.unwrap();
        assert!(ids.is_empty());
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_find_intersecting() {
        let store = MemoryLayerStore::new();
        let ids = store.insert_many(&sample_records()).await.unwrap();

        let hits = store.find_intersecting(&square(12.2, 13.0)).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].layer_id, ids[0]);
        assert_eq!(hits[0].record.id, Some(json!(1)));

        let none = store.find_intersecting(&square(-5.0, -4.0)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_list_layers_projects_fields() {
        let store = MemoryLayerStore::new();
        store.insert_many(&sample_records()).await.unwrap();

        let fields = vec!["nome".to_string(), "vincolo".to_string()];
        let summaries = store.list_layers(&fields).await.unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].properties.len(), 2);
        assert!(!summaries[0].properties.contains_key("area"));
        assert_eq!(summaries[1].properties.len(), 1);
        assert_eq!(summaries[2].properties["vincolo"], json!("B"));
    }

    #[tokio::test]
    async fn test_get_layer() {
        let store = MemoryLayerStore::new();
        let ids = store.insert_many(&sample_records()).await.unwrap();

        let detail = store.get_layer(ids[1]).await.unwrap().unwrap();
        assert_eq!(detail.geometry, Some(Geometry::new(Value::Point(vec![14.2, 40.8]))));
        assert_eq!(detail.properties.unwrap()["nome"], json!("Pozzo"));

        assert!(store.get_layer(LayerId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_a_store_error() {
        let store = MemoryLayerStore::new();
        store.insert_many(&sample_records()).await.unwrap();

        let layers = Arc::clone(&store.layers);
        let _ = std::thread::spawn(move || {
            let _guard = layers.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(GeolayerError::Store(_))));
        assert!(store.is_empty().is_err());
        assert!(store.list_layers(&[]).await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let store = MemoryLayerStore::new();
        let handle = store.clone();
        handle.insert_many(&sample_records()).await.unwrap();
        assert_eq!(store.len().unwrap(), 3);
    }
}
