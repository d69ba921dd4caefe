mod request;
mod response;

pub use request::UploadedFeature;
pub use response::{HealthResponse, QueryResponse, UploadResponse};
