/// SceneContext: what a scene object can reach from inside a callback.
///
/// Messages sent through the context are not delivered re-entrantly: they go
/// to the world's outbox and are delivered, in order, right after the
/// current callback returns.

use std::collections::VecDeque;
use std::time::Duration;
use glam::{Vec2, Vec3};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::render::RenderScene;
use crate::visibility;
use super::message::Payload;

/// Deferred world operation requested from a callback
#[derive(Debug)]
pub(crate) enum Command {
    Send { from: String, to: String, payload: Payload },
    Broadcast { from: String, payload: Payload },
    SubscribeInput(String),
    UnsubscribeInput(String),
}

pub struct SceneContext<'a> {
    outbox: &'a mut VecDeque<Command>,
    camera: Option<&'a PerspectiveCamera>,
    scene: &'a RenderScene,
    viewport: Viewport,
    now: Duration,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(
        outbox: &'a mut VecDeque<Command>,
        camera: Option<&'a PerspectiveCamera>,
        scene: &'a RenderScene,
        viewport: Viewport,
        now: Duration,
    ) -> Self {
        Self { outbox, camera, scene, viewport, now }
    }

    /// Point-to-point message; held for `to` if it is not registered yet
    pub fn send(&mut self, from: &str, to: &str, payload: Payload) {
        self.outbox.push_back(Command::Send {
            from: from.to_string(),
            to: to.to_string(),
            payload,
        });
    }

    /// Message to every registered object except `from`
    pub fn broadcast(&mut self, from: &str, payload: Payload) {
        self.outbox.push_back(Command::Broadcast { from: from.to_string(), payload });
    }

    /// Start receiving input events as messages from `"Input"`
    pub fn subscribe_input(&mut self, name: &str) {
        self.outbox.push_back(Command::SubscribeInput(name.to_string()));
    }

    pub fn unsubscribe_input(&mut self, name: &str) {
        self.outbox.push_back(Command::UnsubscribeInput(name.to_string()));
    }

    /// Project `point` with the active camera and check it is the nearest
    /// ray-castable surface at that pixel. See [`visibility::raster_coord_if_nearest`].
    pub fn raster_coord_if_nearest(&self, point: Vec3) -> (Vec2, bool) {
        visibility::raster_coord_if_nearest(
            self.camera,
            self.viewport,
            point,
            self.scene.ray_castable_drawables(),
        )
    }

    /// Active camera as of the start of this frame
    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Time since the world's clock started
    pub fn now(&self) -> Duration {
        self.now
    }
}
