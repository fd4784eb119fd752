use cgmath::{EuclideanSpace, InnerSpace, Point3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::helpers::VisError;

/// Mean Earth radius used for human-readable distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.0;

/// A point on the globe in degrees. Latitude in [-90, 90], longitude in (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Validating constructor for caller-side input (search boxes, geolocation).
    /// Longitude is normalized, so 180 and -180 produce the same point.
    pub fn new_checked(latitude: f64, longitude: f64) -> Result<Self, VisError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(VisError::InvalidInput(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(VisError::InvalidInput(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        Ok(Self::new(latitude, normalize_longitude(longitude)))
    }

    pub fn approx_eq(&self, other: &GeoPoint, tol_deg: f64) -> bool {
        (self.latitude - other.latitude).abs() <= tol_deg
            && longitude_delta(self.longitude, other.longitude).abs() <= tol_deg
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(t: (f64, f64)) -> Self {
        Self::new(t.0, t.1)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{}, {:.4}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}

/// Wraps any longitude into the canonical range (-180, 180].
#[inline]
pub fn normalize_longitude(mut lon: f64) -> f64 {
    if !lon.is_finite() {
        return 0.0;
    }
    lon %= 360.0;
    while lon <= -180.0 {
        lon += 360.0;
    }
    while lon > 180.0 {
        lon -= 360.0;
    }
    lon
}

/// Signed shortest difference `a - b` in degrees, in [-180, 180].
#[inline]
pub fn longitude_delta(a: f64, b: f64) -> f64 {
    let mut d = a - b;
    if d > 180.0 {
        d -= 360.0;
    }
    if d < -180.0 {
        d += 360.0;
    }
    d
}

/// Projects latitude/longitude onto a sphere of `radius` centered at the origin.
///
/// North pole is +Y. Longitude is measured with a 180° offset, which puts the
/// prime meridian on +X and 90°W on +Z, matching an equirectangular texture
/// wrapped on a default UV sphere. `to_geo` is the exact inverse.
pub fn to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Point3<f64> {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Point3::new(
        -radius * sin_phi * cos_theta,
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

pub fn geo_to_cartesian(point: &GeoPoint, radius: f64) -> Point3<f64> {
    to_cartesian(point.latitude, point.longitude, radius)
}

/// Inverse of `to_cartesian`. The point's own distance from the origin is used
/// when it is not degenerate, so a raycast hit slightly off the surface still
/// resolves to the right coordinates.
pub fn to_geo(point: Point3<f64>, radius: f64) -> GeoPoint {
    let r = point.to_vec().magnitude();
    let r = if r > 1e-12 { r } else { radius.max(1e-12) };

    let cos_phi = (point.y / r).clamp(-1.0, 1.0);
    let latitude = 90.0 - cos_phi.acos().to_degrees();

    // At the poles x == z == 0 and atan2 yields 0; any longitude is valid there.
    let theta = point.z.atan2(-point.x).to_degrees();
    let longitude = normalize_longitude(theta - 180.0);

    GeoPoint::new(latitude, longitude)
}

/// Central angle between two points in radians (haversine).
pub fn central_angle(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let dphi = phi2 - phi1;
    let dlambda = longitude_delta(b.longitude, a.longitude).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

pub fn great_circle_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    central_angle(a, b) * EARTH_MEAN_RADIUS_KM
}

/// Straight-line distance through the planet, i.e. the chord length.
pub fn through_earth_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    2.0 * EARTH_MEAN_RADIUS_KM * (central_angle(a, b) / 2.0).sin()
}

/// Unit vector from the globe center through `point`.
pub fn radial_direction(point: Point3<f64>) -> Option<cgmath::Vector3<f64>> {
    let v = point.to_vec();
    let m = v.magnitude();
    if m > 1e-12 {
        Some(v / m)
    } else {
        None
    }
}
