use crate::geo::{normalize_longitude, GeoPoint};

/// The point diametrically opposite `(lat, lng)`.
#[inline]
pub fn antipode(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(-lat, normalize_longitude(lng + 180.0))
}

#[inline]
pub fn antipode_of(point: &GeoPoint) -> GeoPoint {
    antipode(point.latitude, point.longitude)
}

/// True when `point` is its own antipode within `tol_deg`. On a sphere this never
/// happens for a valid point; it guards against garbage input reaching the path builder.
pub fn is_self_antipodal(point: &GeoPoint, tol_deg: f64) -> bool {
    point.approx_eq(&antipode_of(point), tol_deg)
}
