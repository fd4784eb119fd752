use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::helpers::VisError;

pub const EASING_CUBIC_IN_OUT: &str = "cubic-in-out";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub earth_radius: f64,
    pub segment_count: usize,
    pub journey_duration_ms: u64,
    pub focus_duration_ms: u64,
    pub cutaway_duration_ms: u64,
    pub traveler_removal_delay_ms: u64,
    pub focus_distance_factor: f64,
    pub cutaway_distance_factor: f64,
    pub default_camera_distance_factor: f64,
    pub easing: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            earth_radius: 100.0,
            segment_count: 50,
            journey_duration_ms: 6_000,
            focus_duration_ms: 1_500,
            cutaway_duration_ms: 1_200,
            traveler_removal_delay_ms: 2_000,
            focus_distance_factor: 2.5,
            cutaway_distance_factor: 4.0,
            default_camera_distance_factor: 3.0,
            easing: EASING_CUBIC_IN_OUT.to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), VisError> {
        if !self.earth_radius.is_finite() || self.earth_radius <= 0.0 {
            return Err(VisError::InvalidConfig(format!(
                "earth_radius must be positive, got {}",
                self.earth_radius
            )));
        }
        if self.segment_count < 2 {
            return Err(VisError::InvalidConfig(format!(
                "segment_count must be at least 2, got {}",
                self.segment_count
            )));
        }
        for (name, ms) in [
            ("journey_duration_ms", self.journey_duration_ms),
            ("focus_duration_ms", self.focus_duration_ms),
            ("cutaway_duration_ms", self.cutaway_duration_ms),
        ] {
            if ms == 0 {
                return Err(VisError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        for (name, factor) in [
            ("focus_distance_factor", self.focus_distance_factor),
            ("cutaway_distance_factor", self.cutaway_distance_factor),
            (
                "default_camera_distance_factor",
                self.default_camera_distance_factor,
            ),
        ] {
            // Cameras must stay outside the globe.
            if !factor.is_finite() || factor <= 1.0 {
                return Err(VisError::InvalidConfig(format!(
                    "{name} must be greater than 1, got {factor}"
                )));
            }
        }
        if self.easing != EASING_CUBIC_IN_OUT {
            return Err(VisError::InvalidConfig(format!(
                "unsupported easing '{}', only '{}' is available",
                self.easing, EASING_CUBIC_IN_OUT
            )));
        }
        Ok(())
    }

    pub fn journey_duration(&self) -> Duration {
        Duration::from_millis(self.journey_duration_ms)
    }

    pub fn focus_duration(&self) -> Duration {
        Duration::from_millis(self.focus_duration_ms)
    }

    pub fn cutaway_duration(&self) -> Duration {
        Duration::from_millis(self.cutaway_duration_ms)
    }

    pub fn traveler_removal_delay(&self) -> Duration {
        Duration::from_millis(self.traveler_removal_delay_ms)
    }

    pub fn focus_distance(&self) -> f64 {
        self.earth_radius * self.focus_distance_factor
    }

    pub fn cutaway_distance(&self) -> f64 {
        self.earth_radius * self.cutaway_distance_factor
    }

    pub fn default_camera_distance(&self) -> f64 {
        self.earth_radius * self.default_camera_distance_factor
    }
}
