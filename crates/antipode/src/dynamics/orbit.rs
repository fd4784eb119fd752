use cgmath::{EuclideanSpace, InnerSpace, Point3};
use std::f64::consts::PI;
use std::time::Duration;

use crate::dynamics::CameraState;

const DAMPING_PER_SEC: f64 = 4.0;
const ROTATE_RAD_PER_PX: f64 = 0.005;
const ZOOM_IMPULSE: f64 = 0.15;
const POLAR_EPS: f64 = 0.01;
const REST_EPS: f64 = 1e-5;

/// Damped orbit around the globe center.
///
/// Drags and wheel steps add velocity; `update` integrates and decays it.
/// Spherical coordinates: `polar` from +Y, `azimuth` around Y from +Z.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    azimuth: f64,
    polar: f64,
    distance: f64,

    azimuth_vel: f64,
    polar_vel: f64,
    zoom_vel: f64,

    min_distance: f64,
    max_distance: f64,
    enabled: bool,
}

impl OrbitControls {
    pub fn new(radius: f64, initial: &CameraState) -> Self {
        let mut controls = Self {
            azimuth: 0.0,
            polar: PI / 2.0,
            distance: radius * 3.0,
            azimuth_vel: 0.0,
            polar_vel: 0.0,
            zoom_vel: 0.0,
            min_distance: radius * 1.2,
            max_distance: radius * 10.0,
            enabled: true,
        };
        controls.sync_from(initial);
        controls
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling also kills any momentum so nothing leaks into the next session.
    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.stop();
        }
        self.enabled = enabled;
    }

    pub fn stop(&mut self) {
        self.azimuth_vel = 0.0;
        self.polar_vel = 0.0;
        self.zoom_vel = 0.0;
    }

    /// Adopt the camera's current position so user control resumes without a jump.
    pub fn sync_from(&mut self, camera: &CameraState) {
        let v = camera.position.to_vec();
        let d = v.magnitude();
        if !d.is_finite() || d < 1e-9 {
            return;
        }
        self.distance = d.clamp(self.min_distance, self.max_distance);
        self.polar = (v.y / d).clamp(-1.0, 1.0).acos().clamp(POLAR_EPS, PI - POLAR_EPS);
        self.azimuth = v.x.atan2(v.z);
    }

    pub fn rotate(&mut self, dx_px: f64, dy_px: f64) {
        if !self.enabled {
            return;
        }
        // Slower when close so the surface tracks the pointer.
        let scale = ROTATE_RAD_PER_PX * (self.distance / self.max_distance).sqrt() * 3.0;
        self.azimuth_vel -= dx_px * scale * DAMPING_PER_SEC;
        self.polar_vel -= dy_px * scale * DAMPING_PER_SEC;
    }

    /// Positive `delta` zooms in.
    pub fn zoom(&mut self, delta: f64) {
        if !self.enabled || delta.abs() < f64::EPSILON {
            return;
        }
        let signed_strength = delta.signum() * (1.0 + delta.abs()).ln();
        self.zoom_vel -= signed_strength * self.distance * ZOOM_IMPULSE * DAMPING_PER_SEC;
    }

    /// Integrates one step. Returns the new camera pose if anything moved.
    pub fn update(&mut self, dt: Duration) -> Option<CameraState> {
        if !self.enabled {
            return None;
        }
        if self.azimuth_vel.abs() < REST_EPS
            && self.polar_vel.abs() < REST_EPS
            && self.zoom_vel.abs() < REST_EPS
        {
            self.stop();
            return None;
        }

        let dt_s = dt.as_secs_f64().max(1e-6);

        self.azimuth += self.azimuth_vel * dt_s;
        self.polar = (self.polar + self.polar_vel * dt_s).clamp(POLAR_EPS, PI - POLAR_EPS);
        self.distance =
            (self.distance + self.zoom_vel * dt_s).clamp(self.min_distance, self.max_distance);

        let decay = (-DAMPING_PER_SEC * dt_s).exp();
        self.azimuth_vel *= decay;
        self.polar_vel *= decay;
        self.zoom_vel *= decay;

        Some(CameraState::looking_at(self.position(), Point3::origin()))
    }

    pub fn position(&self) -> Point3<f64> {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        Point3::new(
            self.distance * sp * sa,
            self.distance * cp,
            self.distance * sp * ca,
        )
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}
