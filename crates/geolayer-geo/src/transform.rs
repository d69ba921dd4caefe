//! CRS transformation port and its PROJ adapter

use geolayer_core::error::{GeolayerError, Result};
use geolayer_core::models::Crs;
use proj::Proj;
use std::sync::Mutex;

/// Port for reprojecting a single coordinate pair
///
/// Implementations receive `(x, y)` in the source CRS and return
/// `(longitude, latitude)`.
pub trait CoordinateTransformer: Send + Sync {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64)>;
}

/// Reprojects through PROJ between two EPSG-coded reference systems
pub struct ProjTransformer {
    proj: Mutex<Proj>,
    from_crs: Crs,
    to_crs: Crs,
}

impl ProjTransformer {
    /// Create a transformer from one CRS to another
    ///
    /// `new_known_crs` normalizes axis order, so geographic output is always
    /// longitude first.
    pub fn new(from_crs: &Crs, to_crs: &Crs) -> Result<Self> {
        let from_proj = from_crs.code();
        let to_proj = to_crs.code();

        let proj = Proj::new_known_crs(&from_proj, &to_proj, None).map_err(|e| {
            GeolayerError::ConfigInvalid {
                key: "crs".to_string(),
                reason: format!(
                    "Failed to create projection from {} to {}: {}",
                    from_proj, to_proj, e
                ),
            }
        })?;

        tracing::debug!(from = %from_crs, to = %to_crs, "Created coordinate transformer");

        Ok(Self {
            proj: Mutex::new(proj),
            from_crs: from_crs.clone(),
            to_crs: to_crs.clone(),
        })
    }
}

impl std::fmt::Debug for ProjTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjTransformer")
            .field("from_crs", &self.from_crs)
            .field("to_crs", &self.to_crs)
            .finish()
    }
}

impl CoordinateTransformer for ProjTransformer {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let proj = self
            .proj
            .lock()
            .map_err(|_| GeolayerError::transform(x, y, "projection handle is poisoned"))?;

        proj.convert((x, y))
            .map_err(|e| GeolayerError::transform(x, y, format!("Projection failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm33n_to_wgs84() {
        let transformer = ProjTransformer::new(&Crs::etrs89_utm33n(), &Crs::wgs84()).unwrap();

        // Central meridian of zone 33 at the false easting
        let (lon, lat) = transformer.transform(500000.0, 5800000.0).unwrap();
        assert!((lon - 15.0).abs() < 1e-6, "lon = {}", lon);
        assert!(lat > 52.0 && lat < 52.5, "lat = {}", lat);
    }

    #[test]
    fn test_unknown_crs_is_config_error() {
        let result = ProjTransformer::new(&Crs::new(999999, "bogus"), &Crs::wgs84());
        assert!(matches!(result, Err(GeolayerError::ConfigInvalid { .. })));
    }
}
