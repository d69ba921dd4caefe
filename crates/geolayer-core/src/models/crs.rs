use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic (longitude/latitude in degrees) systems accepted as a target
const GEOGRAPHIC_EPSG: &[u32] = &[
    4326, // WGS 84
    4258, // ETRS89
    4269, // NAD83
    4283, // GDA94
    4617, // NAD83(CSRS)
    4674, // SIRGAS 2000
    7844, // GDA2020
];

/// Coordinate Reference System identified by EPSG code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    pub epsg: u32,
    pub name: String,
}

impl Default for Crs {
    fn default() -> Self {
        Self::wgs84()
    }
}

impl Crs {
    pub fn new(epsg: u32, name: impl Into<String>) -> Self {
        Self { epsg, name: name.into() }
    }

    /// Build a CRS from a bare EPSG code, naming the ones we know
    pub fn from_epsg(epsg: u32) -> Self {
        match epsg {
            4326 => Self::wgs84(),
            25833 => Self::etrs89_utm33n(),
            3857 => Self::new(3857, "Web Mercator"),
            other => Self::new(other, format!("EPSG:{}", other)),
        }
    }

    /// WGS 84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::new(4326, "WGS 84")
    }

    /// ETRS89 / UTM zone 33N (EPSG:25833)
    pub fn etrs89_utm33n() -> Self {
        Self::new(25833, "ETRS89 / UTM zone 33N")
    }

    /// Coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        GEOGRAPHIC_EPSG.contains(&self.epsg)
    }

    /// Authority code understood by PROJ, e.g. `EPSG:4326`
    pub fn code(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{} ({})", self.epsg, self.name)
    }
}
