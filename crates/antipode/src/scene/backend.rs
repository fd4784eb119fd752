use cgmath::{Point3, Vector3};
use serde::Serialize;

use crate::dynamics::CameraState;
use crate::helpers::VisError;

/// Opaque id of one live visual object owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct VisualHandle(pub u64);

pub type Rgba = [f32; 4];

pub const GLOBE_COLOR: Rgba = [0.16, 0.42, 0.78, 0.85];
pub const START_COLOR: Rgba = [0.18, 0.8, 0.34, 1.0];
pub const END_COLOR: Rgba = [0.92, 0.22, 0.2, 1.0];
pub const TRAVELER_COLOR: Rgba = [1.0, 0.84, 0.1, 1.0];
pub const TUNNEL_COLOR: Rgba = [1.0, 0.55, 0.1, 0.9];

/// Everything the core ever asks a renderer to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Sphere {
        center: Point3<f64>,
        radius: f64,
        color: Rgba,
    },
    Stem {
        from: Point3<f64>,
        to: Point3<f64>,
        radius: f64,
        color: Rgba,
    },
    Halo {
        center: Point3<f64>,
        normal: Vector3<f64>,
        radius: f64,
        color: Rgba,
    },
    Label {
        anchor: Point3<f64>,
        text: String,
    },
    Tube {
        points: Vec<Point3<f64>>,
        radius: f64,
        color: Rgba,
    },
}

impl Primitive {
    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Sphere { .. } => "sphere",
            Primitive::Stem { .. } => "stem",
            Primitive::Halo { .. } => "halo",
            Primitive::Label { .. } => "label",
            Primitive::Tube { .. } => "tube",
        }
    }
}

/// The render surface the visualizer draws through.
///
/// Implementations own the GPU/DOM resources behind each handle; `destroy`
/// must release all of them. Handles are never reused by the core after
/// `destroy`.
pub trait SceneBackend {
    fn create(&mut self, primitive: &Primitive) -> Result<VisualHandle, VisError>;

    fn update(&mut self, handle: VisualHandle, primitive: &Primitive) -> Result<(), VisError>;

    fn destroy(&mut self, handle: VisualHandle);

    fn set_camera(&mut self, camera: &CameraState);
}
