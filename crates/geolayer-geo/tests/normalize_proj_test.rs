//! Normalization through a real PROJ pipeline (EPSG:25833 -> EPSG:4326)

use geojson::{Geometry, Value};
use geolayer_core::models::Crs;
use geolayer_geo::{is_lon_lat, GeometryNormalizer, ProjTransformer};
use std::sync::Arc;

fn normalizer() -> GeometryNormalizer {
    let transformer = ProjTransformer::new(&Crs::etrs89_utm33n(), &Crs::wgs84()).unwrap();
    GeometryNormalizer::new(Arc::new(transformer))
}

#[test]
fn test_utm_point_lands_in_eastern_germany() {
    let mut geometry = Geometry::new(Value::Point(vec![600000.0, 5800000.0]));

    let reprojected = normalizer().normalize_geometry(&mut geometry).unwrap();
    assert_eq!(reprojected, 1);

    let Value::Point(position) = geometry.value else {
        panic!("expected a point");
    };
    let (lon, lat) = (position[0], position[1]);
    assert!(is_lon_lat(lon, lat));
    // Longitude first: ~16.5E, ~52.3N
    assert!(lon > 16.0 && lon < 17.0, "lon = {}", lon);
    assert!(lat > 52.0 && lat < 52.6, "lat = {}", lat);
}

#[test]
fn test_lon_lat_point_is_not_reprojected() {
    let mut geometry = Geometry::new(Value::Point(vec![12.5, 41.9]));

    let reprojected = normalizer().normalize_geometry(&mut geometry).unwrap();

    assert_eq!(reprojected, 0);
    assert_eq!(geometry.value, Value::Point(vec![12.5, 41.9]));
}

#[test]
fn test_utm_multipolygon_is_fully_normalized() {
    let ring = vec![
        vec![390000.0, 5818000.0],
        vec![392000.0, 5818000.0],
        vec![392000.0, 5820000.0],
        vec![390000.0, 5818000.0],
    ];
    let mut geometry = Geometry::new(Value::MultiPolygon(vec![vec![ring.clone()], vec![ring]]));

    let reprojected = normalizer().normalize_geometry(&mut geometry).unwrap();
    assert_eq!(reprojected, 8);

    let Value::MultiPolygon(polygons) = &geometry.value else {
        panic!("expected a multipolygon");
    };
    for polygon in polygons {
        assert_eq!(polygon[0].len(), 4);
        assert_eq!(polygon[0][0], polygon[0][3]);
        for position in &polygon[0] {
            // Berlin area
            assert!(position[0] > 13.0 && position[0] < 13.6, "lon = {}", position[0]);
            assert!(position[1] > 52.3 && position[1] < 52.7, "lat = {}", position[1]);
        }
    }
}
