use geolayer_core::config::LayeredConfig;
use geolayer_core::{GeolayerError, Result};

const MIB: usize = 1024 * 1024;

/// HTTP server settings derived from the layered configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub database_url: Option<String>,
    pub max_upload_bytes: usize,
    /// SRID of stored geometry, taken from the target CRS
    pub srid: i32,
}

impl ApiConfig {
    /// Validate the layered configuration and derive the server settings
    pub fn from_layered(config: &LayeredConfig) -> Result<Self> {
        config.validate()?;

        let srid = i32::try_from(config.target_crs.value).map_err(|_| {
            GeolayerError::ConfigInvalid {
                key: "target_crs".to_string(),
                reason: format!("EPSG:{} does not fit a SRID", config.target_crs.value),
            }
        })?;

        Ok(Self {
            port: config.port.value,
            cors_origins: config.cors_origins.value.clone(),
            database_url: config.database_url.value.clone(),
            max_upload_bytes: config.max_upload_mb.value.saturating_mul(MIB),
            srid,
        })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
