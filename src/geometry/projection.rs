use geo::coord;

use super::Point;

/// Simple equirectangular projection from WGS84 to local meters
///
/// Uses approximation suitable for city-scale maps:
/// - x = (lon - center_lon) * cos(center_lat) * 111320
/// - y = (lat - center_lat) * 111320
///
/// Accurate enough for district-level choropleths up to ~50km across.
#[derive(Debug, Clone)]
pub struct Projector {
    center_lon: f64,
    center_lat: f64,
    cos_lat: f64,
}

impl Projector {
    // Meters per degree at equator
    const METERS_PER_DEGREE: f64 = 111320.0;

    /// Create a new projector centered at the given (lon, lat)
    pub fn new(center_lon: f64, center_lat: f64) -> Self {
        Self {
            center_lon,
            center_lat,
            cos_lat: center_lat.to_radians().cos(),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.center_lon, self.center_lat)
    }

    /// Project a lon/lat point to local meters, north up
    pub fn project(&self, lon: f64, lat: f64) -> Point {
        let x = (lon - self.center_lon) * self.cos_lat * Self::METERS_PER_DEGREE;
        let y = (lat - self.center_lat) * Self::METERS_PER_DEGREE;

        coord! { x: x, y: y }
    }

    /// Inverse of [`Projector::project`]
    pub fn unproject(&self, point: Point) -> (f64, f64) {
        let lon = if self.cos_lat.abs() > f64::EPSILON {
            point.x / (self.cos_lat * Self::METERS_PER_DEGREE) + self.center_lon
        } else {
            self.center_lon
        };
        let lat = point.y / Self::METERS_PER_DEGREE + self.center_lat;
        (lon, lat)
    }
}
