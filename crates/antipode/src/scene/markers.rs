use cgmath::{EuclideanSpace, Point3, Vector3};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{event, Level};

use crate::dynamics::{AnimationId, CameraChoreographer};
use crate::geo::{geo_to_cartesian, radial_direction, GeoPoint};
use crate::helpers::{SceneContext, VisError};
use crate::scene::{
    Primitive, Rgba, SceneBackend, VisualHandle, END_COLOR, START_COLOR, TRAVELER_COLOR,
};

pub const START_MARKER: &str = "start";
pub const END_MARKER: &str = "end";
pub const TRAVELER_MARKER: &str = "traveler";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    Start,
    End,
    Traveler,
}

impl MarkerKind {
    fn color(self) -> Rgba {
        match self {
            MarkerKind::Start => START_COLOR,
            MarkerKind::End => END_COLOR,
            MarkerKind::Traveler => TRAVELER_COLOR,
        }
    }
}

/// Handles of every sub-part of one marker, recorded at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerVisual {
    /// Pinned to the globe: head on a stem, a halo ring on the surface and a
    /// coordinate label.
    Surface {
        head: VisualHandle,
        stem: VisualHandle,
        halo: VisualHandle,
        label: VisualHandle,
    },
    /// Free inside the globe: a body sphere with a translucent glow.
    Floating { body: VisualHandle, glow: VisualHandle },
}

impl MarkerVisual {
    /// The part the eye tracks: the head of a pin, or the traveler's body.
    pub fn head(&self) -> VisualHandle {
        match *self {
            MarkerVisual::Surface { head, .. } => head,
            MarkerVisual::Floating { body, .. } => body,
        }
    }

    pub fn stem(&self) -> Option<VisualHandle> {
        match *self {
            MarkerVisual::Surface { stem, .. } => Some(stem),
            MarkerVisual::Floating { .. } => None,
        }
    }

    pub fn label(&self) -> Option<VisualHandle> {
        match *self {
            MarkerVisual::Surface { label, .. } => Some(label),
            MarkerVisual::Floating { .. } => None,
        }
    }

    fn handles(&self) -> Vec<VisualHandle> {
        match *self {
            MarkerVisual::Surface {
                head,
                stem,
                halo,
                label,
            } => vec![head, halo, stem, label],
            MarkerVisual::Floating { body, glow } => vec![body, glow],
        }
    }

    fn destroy<S: SceneBackend>(&self, scene: &mut S) {
        for handle in self.handles() {
            scene.destroy(handle);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub id: String,
    pub kind: MarkerKind,
    pub geo: Option<GeoPoint>,
    pub position: Point3<f64>,
    pub visual: MarkerVisual,
}

/// Marker geometry in globe-radius units.
#[derive(Debug, Clone, Copy)]
struct MarkerStyle {
    head_radius: f64,
    head_lift: f64,
    stem_radius: f64,
    halo_radius: f64,
    label_lift: f64,
    traveler_radius: f64,
    traveler_glow: f64,
}

impl MarkerStyle {
    fn for_radius(r: f64) -> Self {
        Self {
            head_radius: r * 0.02,
            head_lift: r * 0.06,
            stem_radius: r * 0.004,
            halo_radius: r * 0.035,
            label_lift: r * 0.04,
            traveler_radius: r * 0.025,
            traveler_glow: r * 0.05,
        }
    }
}

/// Owns at most one live marker per id. Setting an id again builds a brand
/// new visual and tears the previous one down completely.
#[derive(Debug)]
pub struct MarkerManager {
    radius: f64,
    style: MarkerStyle,
    markers: HashMap<String, Marker>,
}

impl MarkerManager {
    pub fn new(radius: f64) -> Self {
        Self {
            radius,
            style: MarkerStyle::for_radius(radius),
            markers: HashMap::new(),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Places (or replaces) a surface marker and returns its projected position.
    pub fn set_marker<S: SceneBackend>(
        &mut self,
        scene: &mut S,
        id: &str,
        kind: MarkerKind,
        geo: &GeoPoint,
    ) -> Result<Point3<f64>, VisError> {
        let position = geo_to_cartesian(geo, self.radius);
        let normal = radial_direction(position).unwrap_or_else(Vector3::unit_y);
        let visual = self
            .surface_parts(kind, position, normal, geo.to_string())
            .build(scene)
            .scene(&format!("building marker '{id}'"))?;

        self.register(
            scene,
            Marker {
                id: id.to_string(),
                kind,
                geo: Some(*geo),
                position,
                visual,
            },
        );
        event!(Level::DEBUG, id, %geo, "MarkerManager: marker set");
        Ok(position)
    }

    /// Places (or replaces) a free-floating marker, e.g. the traveler inside the globe.
    pub fn set_marker_at<S: SceneBackend>(
        &mut self,
        scene: &mut S,
        id: &str,
        kind: MarkerKind,
        position: Point3<f64>,
    ) -> Result<(), VisError> {
        let visual = self
            .floating_parts(kind, position)
            .build(scene)
            .scene(&format!("building marker '{id}'"))?;
        self.register(
            scene,
            Marker {
                id: id.to_string(),
                kind,
                geo: None,
                position,
                visual,
            },
        );
        Ok(())
    }

    /// Moves a free-floating marker in place. Used every frame for the traveler,
    /// where rebuilding would churn backend resources.
    pub fn move_marker<S: SceneBackend>(
        &mut self,
        scene: &mut S,
        id: &str,
        position: Point3<f64>,
    ) -> Result<(), VisError> {
        let Some(marker) = self.markers.get(id) else {
            return Err(VisError::InvalidInput(format!("no marker '{id}' to move")));
        };
        let MarkerVisual::Floating { body, glow } = marker.visual else {
            return Err(VisError::InvalidInput(format!(
                "marker '{id}' is anchored to the surface"
            )));
        };

        let parts = self.floating_parts(marker.kind, position);
        scene.update(body, &parts.body)?;
        scene.update(glow, &parts.glow)?;
        if let Some(marker) = self.markers.get_mut(id) {
            marker.position = position;
        }
        Ok(())
    }

    /// Destroys and deregisters; no-op if absent.
    pub fn remove_marker<S: SceneBackend>(&mut self, scene: &mut S, id: &str) -> bool {
        match self.markers.remove(id) {
            Some(marker) => {
                marker.visual.destroy(scene);
                event!(Level::DEBUG, id, "MarkerManager: marker removed");
                true
            }
            None => false,
        }
    }

    pub fn clear<S: SceneBackend>(&mut self, scene: &mut S) {
        for (_, marker) in self.markers.drain() {
            marker.visual.destroy(scene);
        }
    }

    /// Starts a camera move centering the marker. A missing marker is logged
    /// and ignored; the UI may ask before anything has been placed.
    pub fn focus(
        &self,
        id: &str,
        camera: &mut CameraChoreographer,
        distance: f64,
        duration: Duration,
    ) -> Option<AnimationId> {
        let Some(marker) = self.markers.get(id) else {
            event!(Level::WARN, id, "MarkerManager: focus on missing marker ignored");
            return None;
        };
        let (position, look_at) = focus_pose(marker.position, distance);
        Some(camera.animate_to(position, look_at, duration, None))
    }

    pub fn get(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    pub fn position(&self, id: &str) -> Option<Point3<f64>> {
        self.markers.get(id).map(|m| m.position)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.markers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    fn register<S: SceneBackend>(&mut self, scene: &mut S, marker: Marker) {
        if let Some(old) = self.markers.insert(marker.id.clone(), marker) {
            old.visual.destroy(scene);
            event!(Level::TRACE, id = %old.id, "MarkerManager: replaced previous visual");
        }
    }

    fn surface_parts(
        &self,
        kind: MarkerKind,
        surface: Point3<f64>,
        normal: Vector3<f64>,
        text: String,
    ) -> SurfaceParts {
        let s = self.style;
        let color = kind.color();
        let head = surface + normal * s.head_lift;

        SurfaceParts {
            head: Primitive::Sphere {
                center: head,
                radius: s.head_radius,
                color,
            },
            halo: Primitive::Halo {
                center: surface,
                normal,
                radius: s.halo_radius,
                color: [color[0], color[1], color[2], 0.5],
            },
            stem: Primitive::Stem {
                from: surface,
                to: head,
                radius: s.stem_radius,
                color,
            },
            label: Primitive::Label {
                anchor: head + normal * s.label_lift,
                text,
            },
        }
    }

    fn floating_parts(&self, kind: MarkerKind, position: Point3<f64>) -> FloatingParts {
        let s = self.style;
        let color = kind.color();
        FloatingParts {
            body: Primitive::Sphere {
                center: position,
                radius: s.traveler_radius,
                color,
            },
            glow: Primitive::Sphere {
                center: position,
                radius: s.traveler_glow,
                color: [color[0], color[1], color[2], 0.35],
            },
        }
    }
}

struct SurfaceParts {
    head: Primitive,
    halo: Primitive,
    stem: Primitive,
    label: Primitive,
}

impl SurfaceParts {
    fn build<S: SceneBackend>(&self, scene: &mut S) -> Result<MarkerVisual, VisError> {
        let mut builder = VisualBuilder::new(scene);
        let head = builder.create(&self.head)?;
        let halo = builder.create(&self.halo)?;
        let stem = builder.create(&self.stem)?;
        let label = builder.create(&self.label)?;
        Ok(MarkerVisual::Surface {
            head,
            stem,
            halo,
            label,
        })
    }
}

struct FloatingParts {
    body: Primitive,
    glow: Primitive,
}

impl FloatingParts {
    fn build<S: SceneBackend>(&self, scene: &mut S) -> Result<MarkerVisual, VisError> {
        let mut builder = VisualBuilder::new(scene);
        let body = builder.create(&self.body)?;
        let glow = builder.create(&self.glow)?;
        Ok(MarkerVisual::Floating { body, glow })
    }
}

/// Creates parts one by one. If a creation fails, the parts created so far
/// are destroyed before the error is returned.
struct VisualBuilder<'a, S: SceneBackend> {
    scene: &'a mut S,
    created: Vec<VisualHandle>,
}

impl<'a, S: SceneBackend> VisualBuilder<'a, S> {
    fn new(scene: &'a mut S) -> Self {
        Self {
            scene,
            created: Vec::with_capacity(4),
        }
    }

    fn create(&mut self, primitive: &Primitive) -> Result<VisualHandle, VisError> {
        match self.scene.create(primitive) {
            Ok(handle) => {
                self.created.push(handle);
                Ok(handle)
            }
            Err(e) => {
                for handle in self.created.drain(..) {
                    self.scene.destroy(handle);
                }
                Err(e)
            }
        }
    }
}

/// Camera pose that looks at the globe center from `distance` along the
/// marker's radial direction.
pub fn focus_pose(target: Point3<f64>, distance: f64) -> (Point3<f64>, Point3<f64>) {
    let dir = radial_direction(target).unwrap_or_else(Vector3::unit_z);
    (Point3::from_vec(dir * distance), Point3::origin())
}
