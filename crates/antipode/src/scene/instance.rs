use bytemuck::{Pod, Zeroable};
use cgmath::Point3;

use crate::scene::Primitive;

/// Per-sphere instance record as uploaded to a GPU instance buffer or handed
/// to JavaScript as a `Float32Array`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    pub position: [f32; 3],
    pub scale: f32,
    pub color: [f32; 4],
}

impl MarkerInstance {
    pub fn from_primitive(primitive: &Primitive) -> Option<Self> {
        match primitive {
            Primitive::Sphere {
                center,
                radius,
                color,
            } => Some(Self {
                position: point_f32(center),
                scale: *radius as f32,
                color: *color,
            }),
            Primitive::Halo {
                center,
                radius,
                color,
                ..
            } => Some(Self {
                position: point_f32(center),
                scale: *radius as f32,
                color: *color,
            }),
            _ => None,
        }
    }
}

#[inline]
pub fn point_f32(p: &Point3<f64>) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

/// Flattens curve samples for a line/tube vertex buffer.
pub fn pack_points(points: &[Point3<f64>]) -> Vec<[f32; 3]> {
    points.iter().map(point_f32).collect()
}

pub fn instances_as_floats(instances: &[MarkerInstance]) -> &[f32] {
    bytemuck::cast_slice(instances)
}

pub fn points_as_floats(points: &[[f32; 3]]) -> &[f32] {
    bytemuck::cast_slice(points)
}
