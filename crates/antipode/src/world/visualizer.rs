use cgmath::{Point2, Point3};
use std::time::Duration;
use tracing::{event, Level};

use crate::{
    dynamics::{
        screen_to_globe, AnimationId, CameraChoreographer, CameraProjection, CameraState,
        CompletionCallback, InputEvent, InputState, OrbitControls, PointerAction,
    },
    geo::{antipode_of, sample_location, to_geo, GeoPoint},
    helpers::{
        channel::{channel, Receiver, Sender},
        FrameClock, SceneContext, Tick, VisError,
    },
    scene::{
        MarkerKind, MarkerManager, Primitive, SceneBackend, VisualHandle, END_MARKER, GLOBE_COLOR,
        START_MARKER,
    },
    world::{Config, JourneyAnimator, JourneyContext, JourneyPhase, VisualizerEvent},
};

/// One globe, one camera, at most one journey.
///
/// Owns every component; the UI layer owns the `Visualizer` and reads events
/// from the receiver returned by [`Visualizer::new`].
pub struct Visualizer<S: SceneBackend> {
    scene: S,
    config: Config,
    globe: VisualHandle,

    camera: CameraChoreographer,
    projection: CameraProjection,
    controls: OrbitControls,
    input: InputState,

    markers: MarkerManager,
    journey: JourneyAnimator,

    events: Sender<VisualizerEvent>,
    clock: FrameClock,
}

impl<S: SceneBackend> Visualizer<S> {
    /// Fails once, with no retry, if the config is invalid or the globe
    /// cannot be created on `scene`.
    pub fn new(mut scene: S, config: Config) -> Result<(Self, Receiver<VisualizerEvent>), VisError> {
        config.validate()?;

        let globe = scene
            .create(&Primitive::Sphere {
                center: Point3::new(0.0, 0.0, 0.0),
                radius: config.earth_radius,
                color: GLOBE_COLOR,
            })
            .scene("creating globe")?;

        let initial = default_camera(&config);
        scene.set_camera(&initial);

        let (events, receiver) = channel();

        event!(
            Level::INFO,
            radius = config.earth_radius,
            segments = config.segment_count,
            "Visualizer: created"
        );

        Ok((
            Self {
                globe,
                camera: CameraChoreographer::new(initial),
                projection: CameraProjection::new(config.earth_radius),
                controls: OrbitControls::new(config.earth_radius, &initial),
                input: InputState::new(),
                markers: MarkerManager::new(config.earth_radius),
                journey: JourneyAnimator::new(),
                events,
                clock: FrameClock::default(),
                scene,
                config,
            },
            receiver,
        ))
    }

    /// Places the start and end markers and begins a journey to the antipode
    /// of `start`. Returns `Ok(false)` when a journey is already running.
    ///
    /// A completed journey is torn down first, so a new start after
    /// completion does not need an explicit `reset`.
    pub fn start_journey(&mut self, start: GeoPoint) -> Result<bool, VisError> {
        let start = GeoPoint::new_checked(start.latitude, start.longitude)?;

        if self.journey.is_active() {
            event!(
                Level::INFO,
                phase = ?self.journey.phase(),
                "Visualizer: journey already running, start ignored"
            );
            return Ok(false);
        }
        if self.journey.phase() == JourneyPhase::Complete {
            self.reset();
        }

        let end = antipode_of(&start);
        let start_position =
            self.markers
                .set_marker(&mut self.scene, START_MARKER, MarkerKind::Start, &start)?;
        let end_position = match self.markers.set_marker(
            &mut self.scene,
            END_MARKER,
            MarkerKind::End,
            &end,
        ) {
            Ok(p) => p,
            Err(e) => {
                // Either both markers exist or neither does.
                self.markers.remove_marker(&mut self.scene, START_MARKER);
                self.markers.remove_marker(&mut self.scene, END_MARKER);
                return Err(e);
            }
        };
        self.emit(VisualizerEvent::marker_placed(START_MARKER, start, start_position));
        self.emit(VisualizerEvent::marker_placed(END_MARKER, end, end_position));

        let mut ctx = JourneyContext {
            scene: &mut self.scene,
            markers: &mut self.markers,
            camera: &mut self.camera,
            events: &self.events,
            config: &self.config,
        };
        Ok(self.journey.start(&mut ctx, start, end))
    }

    /// `start_journey` for one of the named sample locations.
    pub fn start_sample(&mut self, name: &str) -> Result<bool, VisError> {
        let sample = sample_location(name)
            .ok_or_else(|| VisError::InvalidInput(format!("unknown sample location '{name}'")))?;
        self.start_journey(sample.point)
    }

    /// Places (or replaces) a surface marker and reports it.
    pub fn set_marker(
        &mut self,
        id: &str,
        kind: MarkerKind,
        geo: &GeoPoint,
    ) -> Result<Point3<f64>, VisError> {
        let position = self.markers.set_marker(&mut self.scene, id, kind, geo)?;
        self.emit(VisualizerEvent::marker_placed(id, *geo, position));
        Ok(position)
    }

    pub fn remove_marker(&mut self, id: &str) -> bool {
        self.markers.remove_marker(&mut self.scene, id)
    }

    /// Centers the camera on a marker. A missing marker is logged and ignored.
    pub fn focus(&mut self, id: &str) -> Option<AnimationId> {
        self.markers.focus(
            id,
            &mut self.camera,
            self.config.focus_distance(),
            self.config.focus_duration(),
        )
    }

    pub fn animate_camera_to(
        &mut self,
        position: Point3<f64>,
        look_at: Point3<f64>,
        duration: Duration,
        on_complete: Option<CompletionCallback>,
    ) -> AnimationId {
        self.camera.animate_to(position, look_at, duration, on_complete)
    }

    /// Advances everything by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let was_animating = self.camera.is_animating();

        if let Some(id) = self.camera.tick(dt) {
            self.emit(VisualizerEvent::CameraAnimationComplete { id });
        }

        let mut ctx = JourneyContext {
            scene: &mut self.scene,
            markers: &mut self.markers,
            camera: &mut self.camera,
            events: &self.events,
            config: &self.config,
        };
        self.journey.tick(&mut ctx, dt);

        if self.camera.is_animating() {
            if self.controls.is_enabled() {
                self.controls.set_enabled(false);
            }
        } else {
            if was_animating || !self.controls.is_enabled() {
                self.controls.sync_from(self.camera.state());
                self.controls.set_enabled(true);
            }
            if let Some(state) = self.controls.update(dt) {
                self.camera.set_state(state);
            }
        }

        self.scene.set_camera(self.camera.state());
    }

    /// Host frame entry point: `now` is the host's monotonic timestamp.
    pub fn frame(&mut self, now: Duration) -> Tick {
        let tick = self.clock.tick_at(now);
        self.tick(tick.dt);
        tick
    }

    pub fn input(&mut self, event: InputEvent) {
        if let Some(PointerAction::Click(px)) = self.input.queue_event(&mut self.controls, event) {
            self.pick(px.x, px.y);
        }
    }

    /// Picks the globe under a viewport pixel and reports the location and
    /// its antipode.
    pub fn pick(&mut self, x: f64, y: f64) -> Option<(GeoPoint, GeoPoint)> {
        let hit = screen_to_globe(
            Point2::new(x, y),
            self.camera.state(),
            &self.projection,
            self.config.earth_radius,
        )?;
        let start = to_geo(hit, self.config.earth_radius);
        let end = antipode_of(&start);
        event!(Level::DEBUG, %start, %end, "Visualizer: location picked");
        self.emit(VisualizerEvent::LocationPicked { start, end });
        Some((start, end))
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.projection.set_viewport(width, height);
    }

    /// Returns to the initial view with no markers and no journey. Safe to
    /// call at any time, any number of times.
    pub fn reset(&mut self) {
        let mut ctx = JourneyContext {
            scene: &mut self.scene,
            markers: &mut self.markers,
            camera: &mut self.camera,
            events: &self.events,
            config: &self.config,
        };
        self.journey.reset(&mut ctx);
        self.markers.clear(&mut self.scene);

        let home = default_camera(&self.config);
        self.camera.jump_to(home.position, home.look_at);
        self.controls.sync_from(self.camera.state());
        self.controls.set_enabled(true);
        self.input.reset();
        self.scene.set_camera(self.camera.state());
    }

    pub fn phase(&self) -> JourneyPhase {
        self.journey.phase()
    }

    /// Path progress of the current journey in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.journey.progress()
    }

    pub fn journey(&self) -> &JourneyAnimator {
        &self.journey
    }

    pub fn camera(&self) -> &CameraState {
        self.camera.state()
    }

    pub fn is_camera_animating(&self) -> bool {
        self.camera.is_animating()
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn projection(&self) -> &CameraProjection {
        &self.projection
    }

    pub fn markers(&self) -> &MarkerManager {
        &self.markers
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn globe(&self) -> VisualHandle {
        self.globe
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    fn emit(&self, event: VisualizerEvent) {
        let _ = self.events.send(event);
    }
}

fn default_camera(config: &Config) -> CameraState {
    CameraState::looking_at(
        Point3::new(0.0, 0.0, config.default_camera_distance()),
        Point3::new(0.0, 0.0, 0.0),
    )
}
