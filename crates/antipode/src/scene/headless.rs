use std::collections::BTreeMap;
use tracing::{event, Level};

use crate::dynamics::CameraState;
use crate::helpers::VisError;
use crate::scene::{Primitive, SceneBackend, VisualHandle};

/// In-memory backend: keeps every live primitive so callers can inspect what
/// would be on screen. Used by tests and the native runner.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    next_id: u64,
    live: BTreeMap<VisualHandle, Primitive>,
    camera: Option<CameraState>,
    fail_after: Option<usize>,
    created_total: usize,
    destroyed_total: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let the next `successes` creations succeed, then fail exactly one.
    pub fn fail_create_after(&mut self, successes: usize) {
        self.fail_after = Some(successes);
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&Primitive> {
        self.live.get(&handle)
    }

    pub fn is_live(&self, handle: VisualHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn live(&self) -> impl Iterator<Item = (&VisualHandle, &Primitive)> {
        self.live.iter()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.live.values().filter(|p| p.kind() == kind).count()
    }

    pub fn camera(&self) -> Option<&CameraState> {
        self.camera.as_ref()
    }

    pub fn created_total(&self) -> usize {
        self.created_total
    }

    pub fn destroyed_total(&self) -> usize {
        self.destroyed_total
    }
}

impl SceneBackend for HeadlessScene {
    fn create(&mut self, primitive: &Primitive) -> Result<VisualHandle, VisError> {
        if let Some(remaining) = self.fail_after {
            if remaining == 0 {
                self.fail_after = None;
                return Err(VisError::Scene(format!(
                    "injected failure creating {}",
                    primitive.kind()
                )));
            }
            self.fail_after = Some(remaining - 1);
        }

        self.next_id += 1;
        let handle = VisualHandle(self.next_id);
        self.live.insert(handle, primitive.clone());
        self.created_total += 1;
        event!(Level::TRACE, handle = handle.0, kind = primitive.kind(), "HeadlessScene: create");
        Ok(handle)
    }

    fn update(&mut self, handle: VisualHandle, primitive: &Primitive) -> Result<(), VisError> {
        match self.live.get_mut(&handle) {
            Some(slot) => {
                *slot = primitive.clone();
                Ok(())
            }
            None => Err(VisError::Scene(format!("update of unknown visual {}", handle.0))),
        }
    }

    fn destroy(&mut self, handle: VisualHandle) {
        if self.live.remove(&handle).is_some() {
            self.destroyed_total += 1;
        } else {
            event!(Level::WARN, handle = handle.0, "HeadlessScene: destroy of unknown visual");
        }
    }

    fn set_camera(&mut self, camera: &CameraState) {
        self.camera = Some(*camera);
    }
}
