mod query;
mod upload;

pub use query::{parse_region, QueryService};
pub use upload::{parse_feature_collection, UploadService};
