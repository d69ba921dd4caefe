use geolayer_geo::GeometryNormalizer;
use geolayer_store::ports::LayerStore;
use std::sync::Arc;

/// Shared request state: the store handle and the normalizer built at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LayerStore>,
    pub normalizer: GeometryNormalizer,
    /// Property sub-fields returned by `GET /layers`
    pub summary_fields: Vec<String>,
    pub normalize_query_geometry: bool,
}

impl AppState {
    pub fn new(
        store: Arc<dyn LayerStore>,
        normalizer: GeometryNormalizer,
        summary_fields: Vec<String>,
    ) -> Self {
        Self {
            store,
            normalizer,
            summary_fields,
            normalize_query_geometry: false,
        }
    }

    /// Also normalize the geometry of region queries
    pub fn with_query_normalization(mut self, enabled: bool) -> Self {
        self.normalize_query_geometry = enabled;
        self
    }
}
