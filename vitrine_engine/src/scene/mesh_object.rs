/// MeshObject: drawables produced by an asynchronous asset load.
///
/// The object can be registered before its asset exists. The loader keeps an
/// `AssetSlot` handle and fills it from its completion callback; the object
/// reports ready on the next readiness poll.

use std::sync::{Arc, Mutex, MutexGuard};
use super::drawable::Drawable;
use super::scene_object::SceneObject;

/// Shared, fill-once landing spot for loaded drawables
#[derive(Debug, Clone, Default)]
pub struct AssetSlot(Arc<Mutex<Option<Vec<Drawable>>>>);

impl AssetSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the loaded drawables. A second completion replaces the first.
    pub fn complete(&self, drawables: Vec<Drawable>) {
        *self.lock() = Some(drawables);
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().is_some()
    }

    fn drawables(&self) -> Vec<Drawable> {
        self.lock().clone().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Vec<Drawable>>> {
        // A loader that panicked mid-store leaves the previous value intact
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct MeshObject {
    name: String,
    slot: AssetSlot,
    extra: Vec<Drawable>,
}

impl MeshObject {
    /// Mesh whose asset is still loading
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), slot: AssetSlot::new(), extra: Vec::new() }
    }

    /// Mesh whose drawables are already available
    pub fn from_drawables(name: &str, drawables: Vec<Drawable>) -> Self {
        let object = Self::new(name);
        object.slot.complete(drawables);
        object
    }

    /// Handle for the loader's completion callback
    pub fn asset_slot(&self) -> AssetSlot {
        self.slot.clone()
    }

    /// Extra drawable attached next to the loaded asset (occluder boxes,
    /// helpers). Exposed once the asset is loaded.
    pub fn add_drawable(&mut self, drawable: Drawable) {
        self.extra.push(drawable);
    }
}

impl SceneObject for MeshObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.slot.is_loaded()
    }

    fn drawables(&self) -> Vec<Drawable> {
        if !self.slot.is_loaded() {
            return Vec::new();
        }
        let mut drawables = self.slot.drawables();
        drawables.extend(self.extra.iter().cloned());
        drawables
    }

    /// A mesh always goes through the pipeline, loaded or not
    fn is_drawable(&self) -> bool {
        true
    }
}
