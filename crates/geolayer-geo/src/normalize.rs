//! Coordinate normalization for GeoJSON geometry.
//!
//! A pair that already reads as longitude/latitude is left untouched. Any
//! other pair is assumed to be in the transformer's source CRS and is
//! reprojected. Only `Point`, `Polygon` and `MultiPolygon` are accepted;
//! other kinds and positions that are not exactly two-dimensional are
//! rejected rather than stored half-normalized.

use geojson::{Geometry, PolygonType, Position, Value};
use geolayer_core::error::{GeolayerError, Result};
use std::sync::Arc;

use crate::transform::CoordinateTransformer;

/// Longitude in [-180, 180] and latitude in [-90, 90]
pub fn is_lon_lat(x: f64, y: f64) -> bool {
    (-180.0..=180.0).contains(&x) && (-90.0..=90.0).contains(&y)
}

/// Return the pair unchanged if it is already lon/lat, otherwise reproject it
pub fn check_and_transform(
    pair: (f64, f64),
    transformer: &dyn CoordinateTransformer,
) -> Result<(f64, f64)> {
    let (x, y) = pair;
    if is_lon_lat(x, y) {
        return Ok(pair);
    }

    if !x.is_finite() || !y.is_finite() {
        return Err(GeolayerError::transform(x, y, "Coordinates must be finite"));
    }

    let (lon, lat) = transformer.transform(x, y)?;

    if !is_lon_lat(lon, lat) {
        return Err(GeolayerError::transform(
            x,
            y,
            format!("Result ({}, {}) is outside longitude/latitude bounds", lon, lat),
        ));
    }

    Ok((lon, lat))
}

/// GeoJSON type name of a geometry value
pub fn geometry_kind(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

/// Walks geometries and normalizes every coordinate pair in place
#[derive(Clone)]
pub struct GeometryNormalizer {
    transformer: Arc<dyn CoordinateTransformer>,
    trace_coordinates: bool,
}

impl GeometryNormalizer {
    pub fn new(transformer: Arc<dyn CoordinateTransformer>) -> Self {
        Self { transformer, trace_coordinates: false }
    }

    /// Emit a trace event for every pair examined
    pub fn with_coordinate_tracing(mut self, enabled: bool) -> Self {
        self.trace_coordinates = enabled;
        self
    }

    pub fn check_and_transform(&self, pair: (f64, f64)) -> Result<(f64, f64)> {
        if self.trace_coordinates {
            tracing::trace!(x = pair.0, y = pair.1, "Checking coordinate pair");
        }
        check_and_transform(pair, self.transformer.as_ref())
    }

    /// Normalize one geometry, stopping at the first failing pair
    ///
    /// Returns the number of pairs that were reprojected. A geometry-level
    /// `bbox` is dropped when anything was reprojected since it would still
    /// be expressed in the source CRS.
    pub fn normalize_geometry(&self, geometry: &mut Geometry) -> Result<usize> {
        let reprojected = match &mut geometry.value {
            Value::Point(position) => self.normalize_position(position)?,
            Value::Polygon(rings) => self.normalize_polygon(rings)?,
            Value::MultiPolygon(polygons) => {
                let mut count = 0;
                for polygon in polygons.iter_mut() {
                    count += self.normalize_polygon(polygon)?;
                }
                count
            }
            other @ (Value::MultiPoint(_)
            | Value::LineString(_)
            | Value::MultiLineString(_)
            | Value::GeometryCollection(_)) => {
                return Err(GeolayerError::unsupported(geometry_kind(other)));
            }
        };

        if reprojected > 0 {
            geometry.bbox = None;
            tracing::debug!(
                kind = geometry_kind(&geometry.value),
                reprojected,
                "Reprojected geometry coordinates"
            );
        }

        Ok(reprojected)
    }

    /// Normalize a batch of geometries, stopping at the first failure
    pub fn normalize_geometries<'a, I>(&self, geometries: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a mut Geometry>,
    {
        let mut total = 0;
        for geometry in geometries {
            total += self.normalize_geometry(geometry)?;
        }
        Ok(total)
    }

    fn normalize_polygon(&self, rings: &mut PolygonType) -> Result<usize> {
        let mut count = 0;
        for ring in rings.iter_mut() {
            for position in ring.iter_mut() {
                count += self.normalize_position(position)?;
            }
        }
        Ok(count)
    }

    fn normalize_position(&self, position: &mut Position) -> Result<usize> {
        let (x, y) = match position.as_slice() {
            [x, y] => (*x, *y),
            other => {
                return Err(GeolayerError::unsupported(format!(
                    "{}-dimensional position {:?}",
                    other.len(),
                    other
                )));
            }
        };

        let (lon, lat) = self.check_and_transform((x, y))?;
        if (lon, lat) == (x, y) {
            return Ok(0);
        }

        position[0] = lon;
        position[1] = lat;
        Ok(1)
    }
}

impl std::fmt::Debug for GeometryNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeometryNormalizer")
            .field("trace_coordinates", &self.trace_coordinates)
            .finish_non_exhaustive()
    }
}
