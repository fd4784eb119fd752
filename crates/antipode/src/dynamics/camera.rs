use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix3, Matrix4, Point3, Quaternion, SquareMatrix, Vector3,
};
use std::fmt;
use std::time::Duration;
use tracing::{event, Level};

use crate::helpers::{ease_in_out_cubic, lerp};

/// Camera orientation looks down its local -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub position: Point3<f64>,
    pub look_at: Point3<f64>,
    pub orientation: Quaternion<f64>,
}

impl CameraState {
    pub fn looking_at(position: Point3<f64>, look_at: Point3<f64>) -> Self {
        Self {
            position,
            look_at,
            orientation: orientation_looking_at(position, look_at),
        }
    }

    pub fn forward(&self) -> Vector3<f64> {
        (self.orientation * Vector3::new(0.0, 0.0, -1.0)).normalize()
    }

    pub fn up(&self) -> Vector3<f64> {
        (self.orientation * Vector3::unit_y()).normalize()
    }

    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }
}

/// Up hint for a view direction; swaps to Z near the poles to avoid a degenerate basis.
fn up_hint_for(forward: Vector3<f64>) -> Vector3<f64> {
    if forward.y.abs() > 0.999 {
        if forward.y > 0.0 {
            Vector3::new(0.0, 0.0, -1.0)
        } else {
            Vector3::unit_z()
        }
    } else {
        Vector3::unit_y()
    }
}

/// Rotation taking the camera's local -Z onto `look_at - position`.
pub fn orientation_looking_at(position: Point3<f64>, look_at: Point3<f64>) -> Quaternion<f64> {
    let mut forward = look_at - position;
    if forward.magnitude2() < 1e-18 {
        // Eye on the target: look at the globe center instead, or straight down -Z.
        forward = -position.to_vec();
        if forward.magnitude2() < 1e-18 {
            forward = Vector3::new(0.0, 0.0, -1.0);
        }
    }
    let forward = forward.normalize();
    let right = forward.cross(up_hint_for(forward)).normalize();
    let up = right.cross(forward);

    Quaternion::from(Matrix3::from_cols(right, up, -forward)).normalize()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraProjection {
    pub fovy: Deg<f64>,
    pub viewport_wh: (f64, f64),
    pub near: f64,
    pub far: f64,
}

impl CameraProjection {
    pub fn new(radius: f64) -> Self {
        Self {
            fovy: Deg(45.0),
            viewport_wh: (800.0, 600.0),
            near: radius * 0.01,
            far: radius * 100.0,
        }
    }

    pub fn aspect(&self) -> f64 {
        let (w, h) = self.viewport_wh;
        if h > 0.0 {
            w / h
        } else {
            1.0
        }
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport_wh = (width.max(1.0), height.max(1.0));
    }

    pub fn proj_view(&self, camera: &CameraState) -> Matrix4<f64> {
        cgmath::perspective(self.fovy, self.aspect(), self.near, self.far) * camera.view_matrix()
    }

    pub fn proj_view_inv(&self, camera: &CameraState) -> Matrix4<f64> {
        self.proj_view(camera)
            .invert()
            .unwrap_or_else(Matrix4::identity)
    }
}

pub type AnimationId = u64;

/// Runs after the final interpolation step of the animation it was attached to.
pub type CompletionCallback = Box<dyn FnOnce(AnimationId)>;

struct ActiveAnimation {
    id: AnimationId,
    from: CameraState,
    to: CameraState,
    from_look_dist: f64,
    to_look_dist: f64,
    elapsed: Duration,
    duration: Duration,
    on_complete: Option<CompletionCallback>,
}

impl ActiveAnimation {
    fn raw_progress(&self) -> f64 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
        }
    }

    /// Interpolated state at raw progress `t`; position and rotation share the eased value.
    fn sample(&self, t: f64) -> CameraState {
        if t >= 1.0 {
            return self.to;
        }
        let e = ease_in_out_cubic(t);
        if e <= 0.0 {
            return self.from;
        }

        let position = self.from.position + (self.to.position - self.from.position) * e;
        let orientation = self.from.orientation.slerp(self.to.orientation, e);
        let forward = (orientation * Vector3::new(0.0, 0.0, -1.0)).normalize();
        let look_at = position + forward * lerp(self.from_look_dist, self.to_look_dist, e);

        CameraState {
            position,
            look_at,
            orientation,
        }
    }
}

enum CameraMotion {
    Idle,
    Animating(ActiveAnimation),
}

/// Sole owner and writer of the camera state.
///
/// `Idle -> Animating` on `animate_to`, back to `Idle` once elapsed time
/// reaches the duration. A new `animate_to` while animating supersedes the
/// running animation, starting from wherever the camera is right now; the
/// superseded animation's callback is dropped without running.
pub struct CameraChoreographer {
    state: CameraState,
    motion: CameraMotion,
    next_id: AnimationId,
}

impl fmt::Debug for CameraChoreographer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraChoreographer")
            .field("state", &self.state)
            .field("animating", &self.current_animation())
            .finish()
    }
}

impl CameraChoreographer {
    pub fn new(initial: CameraState) -> Self {
        Self {
            state: initial,
            motion: CameraMotion::Idle,
            next_id: 1,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.motion, CameraMotion::Animating(_))
    }

    pub fn current_animation(&self) -> Option<AnimationId> {
        match &self.motion {
            CameraMotion::Animating(anim) => Some(anim.id),
            CameraMotion::Idle => None,
        }
    }

    pub fn animate_to(
        &mut self,
        target_position: Point3<f64>,
        target_look_at: Point3<f64>,
        duration: Duration,
        on_complete: Option<CompletionCallback>,
    ) -> AnimationId {
        let id = self.next_id;
        self.next_id += 1;

        if let CameraMotion::Animating(prev) = &self.motion {
            event!(
                Level::DEBUG,
                superseded = prev.id,
                by = id,
                "CameraChoreographer: animation superseded"
            );
        }

        let from = self.state;
        let to = CameraState::looking_at(target_position, target_look_at);
        self.motion = CameraMotion::Animating(ActiveAnimation {
            id,
            from,
            to,
            from_look_dist: (from.look_at - from.position).magnitude(),
            to_look_dist: (to.look_at - to.position).magnitude(),
            elapsed: Duration::ZERO,
            duration,
            on_complete,
        });
        id
    }

    /// Advances the running animation. Returns the id of an animation that
    /// completed during this tick, after its callback has run.
    pub fn tick(&mut self, dt: Duration) -> Option<AnimationId> {
        let CameraMotion::Animating(anim) = &mut self.motion else {
            return None;
        };

        anim.elapsed = anim.elapsed.saturating_add(dt);
        let t = anim.raw_progress();
        self.state = anim.sample(t);

        if t < 1.0 {
            return None;
        }

        let CameraMotion::Animating(mut finished) =
            std::mem::replace(&mut self.motion, CameraMotion::Idle)
        else {
            return None;
        };
        event!(Level::TRACE, id = finished.id, "CameraChoreographer: animation complete");
        if let Some(callback) = finished.on_complete.take() {
            callback(finished.id);
        }
        Some(finished.id)
    }

    /// Interpolated state of the running animation at raw progress `t`,
    /// without advancing it.
    pub fn sample(&self, t: f64) -> Option<CameraState> {
        match &self.motion {
            CameraMotion::Animating(anim) => Some(anim.sample(t.clamp(0.0, 1.0))),
            CameraMotion::Idle => None,
        }
    }

    /// User-driven placement; refused while an animation owns the camera.
    pub fn set_state(&mut self, state: CameraState) -> bool {
        if self.is_animating() {
            return false;
        }
        self.state = state;
        true
    }

    /// Drops any running animation (and its callback) and keeps the current pose.
    pub fn cancel(&mut self) -> Option<AnimationId> {
        match std::mem::replace(&mut self.motion, CameraMotion::Idle) {
            CameraMotion::Animating(anim) => {
                event!(Level::DEBUG, id = anim.id, "CameraChoreographer: animation cancelled");
                Some(anim.id)
            }
            CameraMotion::Idle => None,
        }
    }

    /// Cancels any animation and places the camera immediately.
    pub fn jump_to(&mut self, position: Point3<f64>, look_at: Point3<f64>) {
        self.cancel();
        self.state = CameraState::looking_at(position, look_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_points_forward() {
        let s = CameraState::looking_at(Point3::new(0.0, 0.0, 300.0), Point3::origin());
        let f = s.forward();
        assert!((f - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-12);
        assert!((s.up() - Vector3::unit_y()).magnitude() < 1e-12);
    }

    #[test]
    fn orientation_over_the_pole_is_finite() {
        let s = CameraState::looking_at(Point3::new(0.0, 250.0, 0.0), Point3::origin());
        let f = s.forward();
        assert!((f - Vector3::new(0.0, -1.0, 0.0)).magnitude() < 1e-9);
        assert!(s.orientation.s.is_finite());
    }

    #[test]
    fn degenerate_look_falls_back() {
        let q = orientation_looking_at(Point3::origin(), Point3::origin());
        assert!(q.s.is_finite() && q.v.x.is_finite());
    }
}
