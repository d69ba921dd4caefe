use async_trait::async_trait;
use geojson::Geometry;
use geolayer_core::error::Result;
use geolayer_core::models::{LayerDetail, LayerId, LayerRecord, LayerSummary, StoredLayer};

/// Port for layer storage operations
///
/// Spatial evaluation belongs to the adapter; callers hand over GeoJSON
/// geometry as-is.
#[async_trait]
pub trait LayerStore: Send + Sync {
    /// Insert a batch of records, all-or-nothing, returning their identifiers in order
    async fn insert_many(&self, records: &[LayerRecord]) -> Result<Vec<LayerId>>;

    /// Every stored record whose geometry intersects the given geometry
    async fn find_intersecting(&self, geometry: &Geometry) -> Result<Vec<StoredLayer>>;

    /// Identifier plus the named property sub-fields of every record
    async fn list_layers(&self, fields: &[String]) -> Result<Vec<LayerSummary>>;

    /// Geometry and properties of a single record
    async fn get_layer(&self, id: LayerId) -> Result<Option<LayerDetail>>;
}
