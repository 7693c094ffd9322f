/// SceneObject: a named participant registered into a `World`.
///
/// Every capability has a default, so a concrete object only overrides
/// what it uses. Cameras expose their projection state through
/// `camera()` / `camera_mut()`.

use crate::camera::PerspectiveCamera;
use super::context::SceneContext;
use super::drawable::Drawable;
use super::light::Light;
use super::message::Message;

pub trait SceneObject {
    /// Addressing key for registry lookup and messaging
    fn name(&self) -> &str;

    /// Gate for admission into the render pipeline. Polled once per frame
    /// while the object is pending.
    fn is_ready(&self) -> bool {
        true
    }

    fn drawables(&self) -> Vec<Drawable> {
        Vec::new()
    }

    fn lights(&self) -> Vec<Light> {
        Vec::new()
    }

    /// Whether admission hands anything to the render pipeline
    fn is_drawable(&self) -> bool {
        !self.drawables().is_empty() || !self.lights().is_empty()
    }

    fn on_message(&mut self, _ctx: &mut SceneContext<'_>, _message: &Message) {}

    /// Fired once, when the object is admitted
    fn on_start(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Fired every frame after the pipeline has rendered, while admitted
    fn on_render(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Fired once, when the object is unregistered or replaced
    fn on_end(&mut self, _ctx: &mut SceneContext<'_>) {}

    /// Fired when this object becomes the active camera
    fn on_active(&mut self, _ctx: &mut SceneContext<'_>) {}

    fn camera(&self) -> Option<&PerspectiveCamera> {
        None
    }

    fn camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        None
    }
}
