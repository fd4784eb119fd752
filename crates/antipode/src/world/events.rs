use cgmath::Point3;
use serde::Serialize;

use crate::dynamics::AnimationId;
use crate::geo::GeoPoint;
use crate::world::JourneyPhase;

/// Everything the visualizer reports to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VisualizerEvent {
    #[serde(rename_all = "camelCase")]
    MarkerPlaced {
        id: String,
        geo: GeoPoint,
        position: [f64; 3],
    },
    #[serde(rename_all = "camelCase")]
    StatusUpdate {
        message: String,
        progress_percent: f64,
    },
    JourneyPhaseChanged {
        phase: JourneyPhase,
    },
    JourneyComplete,
    LocationPicked {
        start: GeoPoint,
        end: GeoPoint,
    },
    CameraAnimationComplete {
        id: AnimationId,
    },
}

impl VisualizerEvent {
    pub fn marker_placed(id: &str, geo: GeoPoint, position: Point3<f64>) -> Self {
        VisualizerEvent::MarkerPlaced {
            id: id.to_string(),
            geo,
            position: position.into(),
        }
    }

    /// The serialized `type` tag, e.g. `"statusUpdate"`.
    pub fn kind(&self) -> &'static str {
        match self {
            VisualizerEvent::MarkerPlaced { .. } => "markerPlaced",
            VisualizerEvent::StatusUpdate { .. } => "statusUpdate",
            VisualizerEvent::JourneyPhaseChanged { .. } => "journeyPhaseChanged",
            VisualizerEvent::JourneyComplete => "journeyComplete",
            VisualizerEvent::LocationPicked { .. } => "locationPicked",
            VisualizerEvent::CameraAnimationComplete { .. } => "cameraAnimationComplete",
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let json = VisualizerEvent::StatusUpdate {
            message: "Almost there...".into(),
            progress_percent: 95.0,
        }
        .to_json();
        assert_eq!(
            json,
            r#"{"type":"statusUpdate","message":"Almost there...","progressPercent":95.0}"#
        );

        assert_eq!(
            VisualizerEvent::JourneyComplete.to_json(),
            r#"{"type":"journeyComplete"}"#
        );
    }

    #[test]
    fn kind_matches_tag() {
        let events = [
            VisualizerEvent::marker_placed("start", GeoPoint::new(1.0, 2.0), Point3::new(0.0, 0.0, 1.0)),
            VisualizerEvent::JourneyPhaseChanged {
                phase: JourneyPhase::AtCore,
            },
            VisualizerEvent::LocationPicked {
                start: GeoPoint::new(0.0, 0.0),
                end: GeoPoint::new(0.0, 180.0),
            },
            VisualizerEvent::CameraAnimationComplete { id: 3 },
        ];
        for event in events {
            let json = event.to_json();
            assert!(
                json.starts_with(&format!(r#"{{"type":"{}""#, event.kind())),
                "{}",
                json
            );
        }
        assert!(VisualizerEvent::JourneyPhaseChanged {
            phase: JourneyPhase::AtCore
        }
        .to_json()
        .contains(r#""phase":"at-core""#));
    }
}
