pub mod crs;
pub mod layer;

pub use crs::Crs;
pub use layer::{LayerDetail, LayerId, LayerRecord, LayerSummary, StoredLayer};
