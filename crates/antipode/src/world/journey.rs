use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};
use serde::Serialize;
use std::time::Duration;
use tracing::{event, Level};

use crate::dynamics::{AnimationId, CameraChoreographer};
use crate::geo::{
    build_path, geo_to_cartesian, radial_direction, through_earth_distance_km, GeoPoint, PathCurve,
};
use crate::helpers::channel::Sender;
use crate::scene::{
    focus_pose, MarkerKind, MarkerManager, Primitive, SceneBackend, VisualHandle, END_MARKER,
    START_MARKER, TRAVELER_MARKER, TUNNEL_COLOR,
};
use crate::world::{Config, VisualizerEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyPhase {
    Idle,
    FocusingStart,
    Digging,
    AtCore,
    Emerging,
    Complete,
}

/// Narration bands keyed to path progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DigStage {
    Starting,
    CrustAndMantle,
    OuterCore,
    Core,
    Ascending,
    AlmostThere,
}

impl DigStage {
    pub fn from_progress(progress: f64) -> Self {
        match progress {
            p if p < 0.10 => DigStage::Starting,
            p if p < 0.45 => DigStage::CrustAndMantle,
            p if p < 0.50 => DigStage::OuterCore,
            p if p < 0.55 => DigStage::Core,
            p if p < 0.90 => DigStage::Ascending,
            _ => DigStage::AlmostThere,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            DigStage::Starting => "Starting to dig...",
            DigStage::CrustAndMantle => "Digging through the crust and mantle...",
            DigStage::OuterCore => "Approaching the outer core...",
            DigStage::Core => "Reached the Earth's core!",
            DigStage::Ascending => "Ascending toward the other side...",
            DigStage::AlmostThere => "Almost there...",
        }
    }
}

/// Borrowed view of the collaborators a journey drives.
pub struct JourneyContext<'a, S: SceneBackend> {
    pub scene: &'a mut S,
    pub markers: &'a mut MarkerManager,
    pub camera: &'a mut CameraChoreographer,
    pub events: &'a Sender<VisualizerEvent>,
    pub config: &'a Config,
}

impl<S: SceneBackend> JourneyContext<'_, S> {
    fn emit(&self, event: VisualizerEvent) {
        // A dropped receiver only means nobody is listening.
        let _ = self.events.send(event);
    }
}

/// State of one run. Everything scheduled for a run (pending camera moves,
/// the traveler removal timer) lives here, so dropping the session on
/// `reset` also drops anything that could fire later.
#[derive(Debug)]
pub struct JourneySession {
    id: u64,
    start: GeoPoint,
    end: GeoPoint,
    path: Option<PathCurve>,
    tunnel: Option<VisualHandle>,
    progress: f64,
    phase: JourneyPhase,
    pending_camera: Option<AnimationId>,
    core_reached: bool,
    /// Progress past the core on the tick that reached it, applied once the
    /// cutaway finishes.
    core_overshoot: f64,
    last_percent: Option<u32>,
    last_stage: Option<DigStage>,
    removal_timer: Option<Duration>,
}

impl JourneySession {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn start(&self) -> GeoPoint {
        self.start
    }

    pub fn end(&self) -> GeoPoint {
        self.end
    }

    pub fn path(&self) -> Option<&PathCurve> {
        self.path.as_ref()
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn phase(&self) -> JourneyPhase {
        self.phase
    }

    /// Still running; a completed session is no longer active.
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, JourneyPhase::Idle | JourneyPhase::Complete)
    }
}

/// `Idle -> FocusingStart -> Digging -> AtCore -> Digging -> Emerging -> Complete`.
///
/// Driven entirely by `tick`; each phase waits on the camera animation it
/// started before advancing.
#[derive(Debug, Default)]
pub struct JourneyAnimator {
    session: Option<JourneySession>,
    next_session_id: u64,
}

impl JourneyAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JourneyPhase {
        self.session
            .as_ref()
            .map(|s| s.phase)
            .unwrap_or(JourneyPhase::Idle)
    }

    pub fn is_idle(&self) -> bool {
        self.phase() == JourneyPhase::Idle
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn session(&self) -> Option<&JourneySession> {
        self.session.as_ref()
    }

    pub fn progress(&self) -> f64 {
        self.session.as_ref().map(|s| s.progress).unwrap_or(0.0)
    }

    /// Begins a run. Ignored (returns false) unless the animator is idle.
    pub fn start<S: SceneBackend>(
        &mut self,
        ctx: &mut JourneyContext<'_, S>,
        start: GeoPoint,
        end: GeoPoint,
    ) -> bool {
        if !self.is_idle() {
            event!(
                Level::INFO,
                phase = ?self.phase(),
                "JourneyAnimator: start ignored, a journey is already running"
            );
            return false;
        }

        self.next_session_id += 1;
        let id = self.next_session_id;

        let target = ctx
            .markers
            .position(START_MARKER)
            .unwrap_or_else(|| geo_to_cartesian(&start, ctx.config.earth_radius));
        let (position, look_at) = focus_pose(target, ctx.config.focus_distance());
        let pending = ctx
            .camera
            .animate_to(position, look_at, ctx.config.focus_duration(), None);

        event!(Level::INFO, session = id, %start, %end, "JourneyAnimator: journey started");

        self.session = Some(JourneySession {
            id,
            start,
            end,
            path: None,
            tunnel: None,
            progress: 0.0,
            phase: JourneyPhase::FocusingStart,
            pending_camera: Some(pending),
            core_reached: false,
            core_overshoot: 0.0,
            last_percent: None,
            last_stage: None,
            removal_timer: None,
        });

        ctx.emit(VisualizerEvent::JourneyPhaseChanged {
            phase: JourneyPhase::FocusingStart,
        });
        ctx.emit(VisualizerEvent::StatusUpdate {
            message: format!("Locating {start}..."),
            progress_percent: 0.0,
        });
        true
    }

    /// Advances the run by `dt`. Call after the camera has been ticked for
    /// the same frame.
    ///
    /// A phase waiting on the camera advances once the camera is idle, so a
    /// move that superseded the journey's own animation delays the journey
    /// instead of stalling it.
    pub fn tick<S: SceneBackend>(&mut self, ctx: &mut JourneyContext<'_, S>, dt: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let camera_done = session.pending_camera.is_some() && !ctx.camera.is_animating();

        match session.phase {
            JourneyPhase::Idle => {}

            JourneyPhase::FocusingStart => {
                if camera_done {
                    session.pending_camera = None;
                    begin_digging(ctx, session);
                }
            }

            JourneyPhase::Digging => {
                let step = dt.as_secs_f64() / ctx.config.journey_duration().as_secs_f64();
                let mut progress = (session.progress + step).min(1.0);

                if !session.core_reached && progress >= 0.5 {
                    session.core_overshoot = progress - 0.5;
                    progress = 0.5;
                    session.progress = progress;
                    session.core_reached = true;
                    move_traveler(ctx, session);
                    enter_core(ctx, session);
                } else if progress >= 1.0 {
                    session.progress = 1.0;
                    move_traveler(ctx, session);
                    begin_emerging(ctx, session);
                } else {
                    session.progress = progress;
                    move_traveler(ctx, session);
                    narrate(ctx, session);
                }
            }

            JourneyPhase::AtCore => {
                if camera_done {
                    session.pending_camera = None;
                    set_phase(ctx, session, JourneyPhase::Digging);
                    resume_from_core(ctx, session);
                }
            }

            JourneyPhase::Emerging => {
                if camera_done {
                    session.pending_camera = None;
                    finish(ctx, session);
                }
            }

            JourneyPhase::Complete => {
                if let Some(remaining) = session.removal_timer {
                    let remaining = remaining.saturating_sub(dt);
                    if remaining.is_zero() {
                        session.removal_timer = None;
                        ctx.markers.remove_marker(ctx.scene, TRAVELER_MARKER);
                        event!(Level::DEBUG, session = session.id, "JourneyAnimator: traveler removed");
                    } else {
                        session.removal_timer = Some(remaining);
                    }
                }
            }
        }
    }

    /// Valid from any phase and idempotent. Tears down everything the run
    /// created; no event is emitted for the torn-down run afterwards.
    pub fn reset<S: SceneBackend>(&mut self, ctx: &mut JourneyContext<'_, S>) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Some(pending) = session.pending_camera {
            if ctx.camera.current_animation() == Some(pending) {
                ctx.camera.cancel();
            }
        }
        if let Some(tunnel) = session.tunnel {
            ctx.scene.destroy(tunnel);
        }
        ctx.markers.remove_marker(ctx.scene, TRAVELER_MARKER);

        event!(
            Level::INFO,
            session = session.id,
            phase = ?session.phase,
            "JourneyAnimator: reset"
        );
    }
}

fn set_phase<S: SceneBackend>(
    ctx: &JourneyContext<'_, S>,
    session: &mut JourneySession,
    phase: JourneyPhase,
) {
    event!(
        Level::DEBUG,
        session = session.id,
        from = ?session.phase,
        to = ?phase,
        "JourneyAnimator: phase"
    );
    session.phase = phase;
    ctx.emit(VisualizerEvent::JourneyPhaseChanged { phase });
}

fn status<S: SceneBackend>(ctx: &JourneyContext<'_, S>, message: String, progress: f64) {
    ctx.emit(VisualizerEvent::StatusUpdate {
        message,
        progress_percent: (progress * 100.0).clamp(0.0, 100.0),
    });
}

fn begin_digging<S: SceneBackend>(ctx: &mut JourneyContext<'_, S>, session: &mut JourneySession) {
    let radius = ctx.config.earth_radius;
    let start = ctx
        .markers
        .position(START_MARKER)
        .unwrap_or_else(|| geo_to_cartesian(&session.start, radius));
    let end = ctx
        .markers
        .position(END_MARKER)
        .unwrap_or_else(|| geo_to_cartesian(&session.end, radius));

    let path = build_path(start, end, ctx.config.segment_count);

    let tunnel = Primitive::Tube {
        points: path.samples().to_vec(),
        radius: radius * 0.01,
        color: TUNNEL_COLOR,
    };
    match ctx.scene.create(&tunnel) {
        Ok(handle) => session.tunnel = Some(handle),
        Err(e) => event!(Level::WARN, error = %e, "JourneyAnimator: tunnel visual unavailable"),
    }

    if let Err(e) =
        ctx.markers
            .set_marker_at(ctx.scene, TRAVELER_MARKER, MarkerKind::Traveler, path.start())
    {
        event!(Level::WARN, error = %e, "JourneyAnimator: traveler visual unavailable");
    }

    session.path = Some(path);
    session.progress = 0.0;
    set_phase(ctx, session, JourneyPhase::Digging);

    let km = through_earth_distance_km(&session.start, &session.end);
    status(ctx, format!("Digging {km:.0} km through the Earth..."), 0.0);
    narrate(ctx, session);
}

fn move_traveler<S: SceneBackend>(ctx: &mut JourneyContext<'_, S>, session: &JourneySession) {
    let Some(path) = session.path.as_ref() else {
        return;
    };
    if !ctx.markers.contains(TRAVELER_MARKER) {
        return;
    }
    let position = path.point_at(session.progress);
    if let Err(e) = ctx.markers.move_marker(ctx.scene, TRAVELER_MARKER, position) {
        event!(Level::WARN, error = %e, "JourneyAnimator: traveler update failed");
    }
}

/// Emits a status update when the stage or the whole percent changes.
fn narrate<S: SceneBackend>(ctx: &JourneyContext<'_, S>, session: &mut JourneySession) {
    let stage = DigStage::from_progress(session.progress);
    let percent = (session.progress * 100.0).floor() as u32;

    if session.last_stage == Some(stage) && session.last_percent == Some(percent) {
        return;
    }
    session.last_stage = Some(stage);
    session.last_percent = Some(percent);
    status(ctx, stage.message().to_string(), session.progress);
}

fn enter_core<S: SceneBackend>(ctx: &mut JourneyContext<'_, S>, session: &mut JourneySession) {
    set_phase(ctx, session, JourneyPhase::AtCore);
    narrate(ctx, session);

    let axis = session
        .path
        .as_ref()
        .and_then(|p| radial_direction(p.start()))
        .unwrap_or_else(Vector3::unit_z);
    let side = cutaway_direction(axis);
    let position = Point3::from_vec(side * ctx.config.cutaway_distance());

    session.pending_camera = Some(ctx.camera.animate_to(
        position,
        Point3::origin(),
        ctx.config.cutaway_duration(),
        None,
    ));
}

/// Applies the progress the core tick cut off. Reaching the end is left to the
/// next `Digging` tick.
fn resume_from_core<S: SceneBackend>(
    ctx: &mut JourneyContext<'_, S>,
    session: &mut JourneySession,
) {
    let overshoot = std::mem::take(&mut session.core_overshoot);
    if overshoot <= 0.0 {
        return;
    }
    session.progress = (session.progress + overshoot).min(1.0);
    move_traveler(ctx, session);
    narrate(ctx, session);
}

/// A direction perpendicular to the dig axis, preferring one that keeps the
/// camera level with the equator.
fn cutaway_direction(axis: Vector3<f64>) -> Vector3<f64> {
    let side = axis.cross(Vector3::unit_y());
    if side.magnitude2() > 1e-12 {
        side.normalize()
    } else {
        Vector3::unit_x()
    }
}

fn begin_emerging<S: SceneBackend>(ctx: &mut JourneyContext<'_, S>, session: &mut JourneySession) {
    set_phase(ctx, session, JourneyPhase::Emerging);
    status(ctx, format!("Emerging at {}!", session.end), 1.0);

    let target = ctx
        .markers
        .position(END_MARKER)
        .or_else(|| session.path.as_ref().map(|p| p.end()))
        .unwrap_or_else(|| geo_to_cartesian(&session.end, ctx.config.earth_radius));
    let (position, look_at) = focus_pose(target, ctx.config.focus_distance());
    session.pending_camera = Some(ctx.camera.animate_to(
        position,
        look_at,
        ctx.config.focus_duration(),
        None,
    ));
}

fn finish<S: SceneBackend>(ctx: &mut JourneyContext<'_, S>, session: &mut JourneySession) {
    set_phase(ctx, session, JourneyPhase::Complete);
    status(ctx, format!("You made it to {}!", session.end), 1.0);
    ctx.emit(VisualizerEvent::JourneyComplete);
    session.removal_timer = Some(ctx.config.traveler_removal_delay());
    event!(Level::INFO, session = session.id, "JourneyAnimator: journey complete");
}
