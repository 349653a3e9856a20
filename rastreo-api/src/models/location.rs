use serde::{Deserialize, Serialize};

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    /// Latitude in degrees
    pub latitud: f64,
    /// Longitude in degrees
    pub longitud: f64,
}
