use antipode::dynamics::CameraState;
use antipode::helpers::channel::Receiver;
use antipode::scene::{
    instances_as_floats, pack_points, point_f32, points_as_floats, MarkerInstance,
};
use antipode::{
    get_config, GeoPoint, InputEvent, MouseButton, Primitive, SceneBackend, VisError,
    VisualHandle, Visualizer, VisualizerEvent,
};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{event, Level};
use wasm_bindgen::prelude::*;

fn setup_console_log() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"console_log already initialized".into());
        }
        // Also show panic messages in console
        console_error_panic_hook::set_once();

        event!(Level::INFO, "Console logging initialized");
    });
}

// The page-side renderer (three.js or similar). Each create call returns a
// numeric handle the core keeps for later updates and teardown.
#[wasm_bindgen]
extern "C" {
    pub type SceneHost;

    /// `instance` is `[x, y, z, radius, r, g, b, a]`.
    #[wasm_bindgen(method, catch, js_name = createSphere)]
    fn create_sphere(this: &SceneHost, instance: &[f32]) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createStem)]
    fn create_stem(
        this: &SceneHost,
        from: &[f32],
        to: &[f32],
        radius: f32,
        color: &[f32],
    ) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createHalo)]
    fn create_halo(this: &SceneHost, instance: &[f32], normal: &[f32]) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = createLabel)]
    fn create_label(this: &SceneHost, anchor: &[f32], text: &str) -> Result<f64, JsValue>;

    /// `points` is a flat `[x0, y0, z0, x1, ...]` list.
    #[wasm_bindgen(method, catch, js_name = createTube)]
    fn create_tube(
        this: &SceneHost,
        points: &[f32],
        radius: f32,
        color: &[f32],
    ) -> Result<f64, JsValue>;

    #[wasm_bindgen(method, catch, js_name = updateInstance)]
    fn update_instance(this: &SceneHost, handle: f64, instance: &[f32]) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn destroy(this: &SceneHost, handle: f64);

    #[wasm_bindgen(method, js_name = setCamera)]
    fn set_camera(this: &SceneHost, position: &[f32], look_at: &[f32], up: &[f32]);
}

fn js_err(e: JsValue) -> VisError {
    VisError::Scene(e.as_string().unwrap_or_else(|| format!("{e:?}")))
}

fn to_js_err(e: VisError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `SceneBackend` over a JS `SceneHost`.
pub struct JsScene {
    host: SceneHost,
}

impl SceneBackend for JsScene {
    fn create(&mut self, primitive: &Primitive) -> Result<VisualHandle, VisError> {
        let id = match primitive {
            Primitive::Sphere { .. } => {
                let inst = MarkerInstance::from_primitive(primitive)
                    .ok_or_else(|| VisError::Internal("sphere without instance".into()))?;
                self.host
                    .create_sphere(instance_floats(&inst))
                    .map_err(js_err)?
            }
            Primitive::Halo { normal, .. } => {
                let inst = MarkerInstance::from_primitive(primitive)
                    .ok_or_else(|| VisError::Internal("halo without instance".into()))?;
                let normal = [normal.x as f32, normal.y as f32, normal.z as f32];
                self.host
                    .create_halo(instance_floats(&inst), &normal)
                    .map_err(js_err)?
            }
            Primitive::Stem {
                from,
                to,
                radius,
                color,
            } => self
                .host
                .create_stem(&point_f32(from), &point_f32(to), *radius as f32, color)
                .map_err(js_err)?,
            Primitive::Label { anchor, text } => self
                .host
                .create_label(&point_f32(anchor), text)
                .map_err(js_err)?,
            Primitive::Tube {
                points,
                radius,
                color,
            } => {
                let packed = pack_points(points);
                self.host
                    .create_tube(points_as_floats(&packed), *radius as f32, color)
                    .map_err(js_err)?
            }
        };

        if !id.is_finite() || id < 0.0 {
            return Err(VisError::Scene(format!(
                "host returned invalid handle {id} for {}",
                primitive.kind()
            )));
        }
        Ok(VisualHandle(id as u64))
    }

    fn update(&mut self, handle: VisualHandle, primitive: &Primitive) -> Result<(), VisError> {
        let inst = MarkerInstance::from_primitive(primitive).ok_or_else(|| {
            VisError::Scene(format!("{} visuals cannot be updated", primitive.kind()))
        })?;
        self.host
            .update_instance(handle.0 as f64, instance_floats(&inst))
            .map_err(js_err)
    }

    fn destroy(&mut self, handle: VisualHandle) {
        self.host.destroy(handle.0 as f64);
    }

    fn set_camera(&mut self, camera: &CameraState) {
        let up = camera.up();
        self.host.set_camera(
            &point_f32(&camera.position),
            &point_f32(&camera.look_at),
            &[up.x as f32, up.y as f32, up.z as f32],
        );
    }
}

fn instance_floats(inst: &MarkerInstance) -> &[f32] {
    instances_as_floats(std::slice::from_ref(inst))
}

/// The one visualizer a page owns. Created by the page and passed around
/// explicitly; nothing is stored globally.
#[wasm_bindgen]
pub struct WebVisualizer {
    inner: Visualizer<JsScene>,
    events: Receiver<VisualizerEvent>,
    handlers: HashMap<String, js_sys::Function>,
}

#[wasm_bindgen]
impl WebVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new(host: SceneHost, width: f64, height: f64) -> Result<WebVisualizer, JsValue> {
        setup_console_log();

        let (mut inner, events) =
            Visualizer::new(JsScene { host }, get_config()).map_err(to_js_err)?;
        inner.resize(width, height);

        Ok(WebVisualizer {
            inner,
            events,
            handlers: HashMap::new(),
        })
    }

    /// Registers `callback` for one event type (`"statusUpdate"`,
    /// `"journeyComplete"`, ...), or `"*"` for all of them.
    #[wasm_bindgen(js_name = on)]
    pub fn set_handler(&mut self, kind: &str, callback: js_sys::Function) {
        self.handlers.insert(kind.to_string(), callback);
    }

    #[wasm_bindgen(js_name = startJourney)]
    pub fn start_journey(&mut self, latitude: f64, longitude: f64) -> Result<bool, JsValue> {
        let started = self
            .inner
            .start_journey(GeoPoint::new(latitude, longitude))
            .map_err(to_js_err);
        self.dispatch();
        started
    }

    #[wasm_bindgen(js_name = startSample)]
    pub fn start_sample(&mut self, name: &str) -> Result<bool, JsValue> {
        let started = self.inner.start_sample(name).map_err(to_js_err);
        self.dispatch();
        started
    }

    /// Call from `requestAnimationFrame` with its timestamp.
    pub fn frame(&mut self, now_ms: f64) {
        if !now_ms.is_finite() {
            return;
        }
        let now = Duration::from_secs_f64(now_ms.max(0.0) / 1000.0);
        self.inner.frame(now);
        self.dispatch();
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.input(InputEvent::MouseMoved(x, y));
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, button: u16) {
        if let Some(button) = map_button(button) {
            self.input(InputEvent::MouseButtonPressed(button));
        }
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, button: u16) {
        if let Some(button) = map_button(button) {
            self.input(InputEvent::MouseButtonReleased(button));
        }
    }

    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self) {
        self.input(InputEvent::PointerCancel);
    }

    /// `deltaY` from a `WheelEvent`; negative scrolls zoom in.
    pub fn wheel(&mut self, delta_y: f64) {
        self.input(InputEvent::MouseScrolled(-delta_y / 100.0));
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.inner.resize(width, height);
    }

    pub fn focus(&mut self, id: &str) -> bool {
        self.inner.focus(id).is_some()
    }

    pub fn reset(&mut self) {
        self.inner.reset();
        self.dispatch();
    }

    pub fn phase(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.phase()).map_err(JsValue::from)
    }

    pub fn progress(&self) -> f64 {
        self.inner.progress()
    }

    fn input(&mut self, event: InputEvent) {
        self.inner.input(event);
        self.dispatch();
    }

    fn dispatch(&self) {
        for event in self.events.drain() {
            let targets = [self.handlers.get(event.kind()), self.handlers.get("*")];
            if targets.iter().all(Option::is_none) {
                continue;
            }
            let value = match serde_wasm_bindgen::to_value(&event) {
                Ok(v) => v,
                Err(e) => {
                    event!(Level::ERROR, "Failed to convert event {}: {}", event.kind(), e);
                    continue;
                }
            };
            for callback in targets.into_iter().flatten() {
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    web_sys::console::error_1(&e);
                }
            }
        }
    }
}

fn map_button(button: u16) -> Option<MouseButton> {
    match button {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

/// `[latitude, longitude]` of the antipode.
#[wasm_bindgen(js_name = antipode)]
pub fn antipode_js(latitude: f64, longitude: f64) -> Vec<f64> {
    let p = antipode::antipode(latitude, longitude);
    vec![p.latitude, p.longitude]
}
