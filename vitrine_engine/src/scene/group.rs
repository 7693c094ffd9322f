/// SceneObjectGroup: a composite scene object.
///
/// Owns its children and fans every callback and message out to them in
/// insertion order. Membership is append-only. Drawables and lights are
/// aggregated on request, so they always equal the union of the children's
/// current lists (a child with a deferred asset contributes once loaded).

use super::context::SceneContext;
use super::drawable::Drawable;
use super::light::Light;
use super::message::Message;
use super::scene_object::SceneObject;

pub struct SceneObjectGroup {
    name: String,
    children: Vec<Box<dyn SceneObject>>,
}

impl SceneObjectGroup {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            children: Vec::new(),
        }
    }

    pub fn add(&mut self, child: Box<dyn SceneObject>) {
        self.children.push(child);
    }

    pub fn with(mut self, child: Box<dyn SceneObject>) -> Self {
        self.add(child);
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name()).collect()
    }
}

impl SceneObject for SceneObjectGroup {
    fn name(&self) -> &str {
        &self.name
    }

    /// Ready once every child is ready
    fn is_ready(&self) -> bool {
        self.children.iter().all(|c| c.is_ready())
    }

    fn drawables(&self) -> Vec<Drawable> {
        self.children.iter().flat_map(|c| c.drawables()).collect()
    }

    fn lights(&self) -> Vec<Light> {
        self.children.iter().flat_map(|c| c.lights()).collect()
    }

    fn is_drawable(&self) -> bool {
        self.children.iter().any(|c| c.is_drawable())
    }

    fn on_message(&mut self, ctx: &mut SceneContext<'_>, message: &Message) {
        for child in &mut self.children {
            child.on_message(ctx, message);
        }
    }

    fn on_start(&mut self, ctx: &mut SceneContext<'_>) {
        for child in &mut self.children {
            child.on_start(ctx);
        }
    }

    fn on_render(&mut self, ctx: &mut SceneContext<'_>) {
        for child in &mut self.children {
            child.on_render(ctx);
        }
    }

    fn on_end(&mut self, ctx: &mut SceneContext<'_>) {
        for child in &mut self.children {
            child.on_end(ctx);
        }
    }

    fn on_active(&mut self, ctx: &mut SceneContext<'_>) {
        for child in &mut self.children {
            child.on_active(ctx);
        }
    }
}
