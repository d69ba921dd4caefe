mod health;
mod layers;
mod query;
mod upload;

pub use health::health_check;
pub use layers::{get_layer, list_layers};
pub use query::query_region;
pub use upload::upload_layers;
