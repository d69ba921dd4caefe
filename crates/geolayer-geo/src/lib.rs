//! Geolayer Geo - Coordinate normalization and spatial predicates
//!
//! This crate decides, per coordinate pair, whether a GeoJSON geometry needs
//! reprojection to longitude/latitude and applies it across nested rings and
//! polygons. It also evaluates intersections for the in-memory store.

pub mod normalize;
pub mod spatial;
pub mod transform;

pub use normalize::{check_and_transform, geometry_kind, is_lon_lat, GeometryNormalizer};
pub use transform::{CoordinateTransformer, ProjTransformer};
