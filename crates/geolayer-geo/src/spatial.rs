//! Planar spatial predicates over GeoJSON geometry

use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use geo::{Geometry as GeoGeometry, Rect};
use geojson::Geometry;
use geolayer_core::error::{GeolayerError, Result};

/// Convert a GeoJSON geometry into a `geo` geometry
pub fn to_geo_geometry(geometry: &Geometry) -> Result<GeoGeometry<f64>> {
    GeoGeometry::<f64>::try_from(geometry.clone()).map_err(|e| {
        GeolayerError::format(format!("Geometry cannot be evaluated spatially: {}", e))
    })
}

/// A query geometry converted once and checked against many candidates
pub struct IntersectionFilter {
    geometry: GeoGeometry<f64>,
    bbox: Option<Rect<f64>>,
}

impl IntersectionFilter {
    pub fn new(query: &Geometry) -> Result<Self> {
        let geometry = to_geo_geometry(query)?;
        let bbox = geometry.bounding_rect();
        Ok(Self { geometry, bbox })
    }

    /// Check if a candidate geometry intersects the query geometry
    ///
    /// Candidates that cannot be converted never match.
    pub fn matches(&self, candidate: &Geometry) -> bool {
        let Ok(candidate) = to_geo_geometry(candidate) else {
            return false;
        };

        // Cheap rejection before the exact predicate
        if let (Some(query_bbox), Some(candidate_bbox)) = (self.bbox, candidate.bounding_rect()) {
            if !bounding_boxes_intersect(&query_bbox, &candidate_bbox) {
                return false;
            }
        }

        candidate.intersects(&self.geometry)
    }
}

/// Check if two bounding boxes intersect
fn bounding_boxes_intersect(bbox1: &Rect, bbox2: &Rect) -> bool {
    let x_overlap = bbox1.min().x <= bbox2.max().x && bbox1.max().x >= bbox2.min().x;
    let y_overlap = bbox1.min().y <= bbox2.max().y && bbox1.max().y >= bbox2.min().y;

    x_overlap && y_overlap
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Value;

    fn square(min: f64, max: f64) -> Geometry {
        Geometry::new(Value::Polygon(vec![vec![
            vec![min, min],
            vec![max, min],
            vec![max, max],
            vec![min, max],
            vec![min, min],
        ]]))
    }

    fn intersects(geometry: &Geometry, query: &Geometry) -> bool {
        IntersectionFilter::new(query).unwrap().matches(geometry)
    }

    #[test]
    fn test_point_in_polygon() {
        let point = Geometry::new(Value::Point(vec![0.5, 0.5]));
        assert!(intersects(&point, &square(0.0, 1.0)));
        assert!(!intersects(&point, &square(2.0, 3.0)));
    }

    #[test]
    fn test_overlapping_polygons() {
        assert!(intersects(&square(0.0, 2.0), &square(1.0, 3.0)));
        assert!(!intersects(&square(0.0, 1.0), &square(1.5, 3.0)));
    }

    #[test]
    fn test_touching_boundaries_intersect() {
        assert!(intersects(&square(0.0, 1.0), &square(1.0, 2.0)));
    }

    #[test]
    fn test_multipolygon_candidate() {
        let multi = Geometry::new(Value::MultiPolygon(vec![
            vec![vec![
                vec![10.0, 10.0],
                vec![11.0, 10.0],
                vec![11.0, 11.0],
                vec![10.0, 10.0],
            ]],
            vec![vec![vec![0.0, 0.0], vec![0.5, 0.0], vec![0.5, 0.5], vec![0.0, 0.0]]],
        ]));
        let filter = IntersectionFilter::new(&square(0.0, 1.0)).unwrap();
        assert!(filter.matches(&multi));
    }

    #[test]
    fn test_bounding_boxes_intersect() {
        let a = Rect::new((0.0, 0.0), (1.0, 1.0));
        let b = Rect::new((0.5, 0.5), (2.0, 2.0));
        let c = Rect::new((3.0, 3.0), (4.0, 4.0));
        assert!(bounding_boxes_intersect(&a, &b));
        assert!(!bounding_boxes_intersect(&a, &c));
    }
}
