/// World: owns the scene objects, the message bus, the active camera and the
/// render pipeline, and drives one frame per `tick()`.
///
/// Per-object lifecycle is `Pending -> Active -> Ended` (or `Pending -> Ended`).
/// A frame runs, in order:
/// 1. refresh the active camera's aspect ratio and matrices
/// 2. admit pending objects that became ready (skipped when none are pending)
/// 3. render one pipeline frame (skipped without an active camera)
/// 4. `on_render` on every active object, in registration order
///
/// Callbacks cannot reach the world directly. What they send through their
/// `SceneContext` lands in an outbox that is drained, in order, after each
/// callback returns.

use std::collections::VecDeque;
use std::time::Duration;
use glam::{Vec2, Vec3};
use winit::event::WindowEvent;
use crate::camera::{PerspectiveCamera, Viewport};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::input::{InputEvent, InputRouter, INPUT_SENDER};
use crate::render::{RenderDevice, RenderPipeline};
use crate::scene::{
    Command, Message, MessageQueue, ObjectKey, ObjectRegistry, ObjectState, Payload, SceneContext,
    SceneObject,
};
use crate::visibility;

pub struct World {
    registry: ObjectRegistry,
    pending_messages: MessageQueue,
    outbox: VecDeque<Command>,
    pipeline: RenderPipeline,
    active_camera: Option<String>,
    /// Copy of the active camera as of the last refresh, handed to callbacks
    camera_state: Option<PerspectiveCamera>,
    input_subscribers: Vec<String>,
    input_router: InputRouter,
    viewport: Viewport,
    clock: Box<dyn Clock>,
    frame_count: u64,
}

impl World {
    pub fn new(device: Box<dyn RenderDevice>) -> Self {
        Self::with_pipeline(RenderPipeline::new(device))
    }

    pub fn with_pipeline(pipeline: RenderPipeline) -> Self {
        Self {
            registry: ObjectRegistry::new(),
            pending_messages: MessageQueue::new(),
            outbox: VecDeque::new(),
            pipeline,
            active_camera: None,
            camera_state: None,
            input_subscribers: Vec::new(),
            input_router: InputRouter::new(),
            viewport: Viewport::new(0, 0),
            clock: Box::new(SystemClock::new()),
            frame_count: 0,
        }
    }

    /// Replace the time source (e.g. a `ManualClock` in tests)
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // ===== REGISTRATION =====

    /// Register `object` under its name.
    ///
    /// A previous object with the same name is unregistered first. A ready
    /// object is admitted immediately (pipeline + `on_start`), otherwise it
    /// stays pending and is polled every frame. Messages held for the name
    /// are delivered afterwards, in the order they were sent.
    pub fn register(&mut self, object: Box<dyn SceneObject>) -> ObjectKey {
        let name = object.name().to_string();
        if self.registry.contains(&name) {
            crate::engine_debug!("vitrine::World", "Replacing object '{}'", name);
            self.unregister(&name);
        }

        let now = self.clock.now();
        let ready = object.is_ready();
        let key = self.registry.insert(object, ObjectState::Pending);
        crate::engine_debug!("vitrine::World", "Registered '{}' ({})",
            name, if ready { "ready" } else { "pending" });

        if ready {
            self.admit(key, now);
        }
        self.flush_pending_messages(key, &name, now);
        key
    }

    /// Remove `name` from the pipeline and the registry, firing `on_end`.
    /// Returns the object, or `None` if nothing was registered under `name`.
    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn SceneObject>> {
        let Some(key) = self.registry.key(name) else {
            crate::engine_trace!("vitrine::World", "Unregister of unknown '{}' ignored", name);
            return None;
        };
        let now = self.clock.now();

        self.pipeline.remove(name);
        self.registry.set_state(key, ObjectState::Ended);
        self.invoke(key, now, |object, ctx| object.on_end(ctx));
        let object = self.registry.remove(key);

        self.input_subscribers.retain(|n| n != name);
        if self.active_camera.as_deref() == Some(name) {
            crate::engine_info!("vitrine::World", "Active camera '{}' unregistered", name);
            self.active_camera = None;
            self.camera_state = None;
        }
        crate::engine_debug!("vitrine::World", "Unregistered '{}'", name);
        self.drain_outbox(now);
        object
    }

    fn admit(&mut self, key: ObjectKey, now: Duration) {
        let Some(object) = self.registry.get(key) else {
            return;
        };
        let name = object.name().to_string();
        if object.is_drawable() {
            let (drawables, lights) = (object.drawables(), object.lights());
            self.pipeline.add(&name, drawables, lights);
        }
        self.registry.set_state(key, ObjectState::Active);
        crate::engine_debug!("vitrine::World", "Admitted '{}'", name);

        self.invoke(key, now, |object, ctx| object.on_start(ctx));
        self.drain_outbox(now);
    }

    fn flush_pending_messages(&mut self, key: ObjectKey, name: &str, now: Duration) {
        let held = self.pending_messages.take(name);
        if !held.is_empty() {
            crate::engine_debug!("vitrine::World", "Delivering {} held message(s) to '{}'", held.len(), name);
        }
        for message in held {
            if !self.invoke(key, now, |object, ctx| object.on_message(ctx, &message)) {
                self.pending_messages.push(message);
                continue;
            }
            self.drain_outbox(now);
        }
    }

    // ===== MESSAGING =====

    /// Point-to-point message. Held until `to` registers if it is absent.
    pub fn send(&mut self, from: &str, to: &str, payload: Payload) {
        self.outbox.push_back(Command::Send {
            from: from.to_string(),
            to: to.to_string(),
            payload,
        });
        self.drain_outbox(self.clock.now());
    }

    /// Message to every currently registered object except `from`. Objects
    /// registered later never see it.
    pub fn broadcast(&mut self, from: &str, payload: Payload) {
        self.outbox.push_back(Command::Broadcast { from: from.to_string(), payload });
        self.drain_outbox(self.clock.now());
    }

    fn drain_outbox(&mut self, now: Duration) {
        while let Some(command) = self.outbox.pop_front() {
            match command {
                Command::Send { from, to, payload } => {
                    self.deliver(Message::new(&from, &to, payload), now);
                }
                Command::Broadcast { from, payload } => {
                    let recipients: Vec<ObjectKey> = self
                        .registry
                        .keys()
                        .iter()
                        .copied()
                        .filter(|k| self.registry.name(*k) != Some(from.as_str()))
                        .collect();
                    for key in recipients {
                        let Some(to) = self.registry.name(key).map(str::to_string) else {
                            continue;
                        };
                        let message = Message::new(&from, &to, payload.clone());
                        self.invoke(key, now, |object, ctx| object.on_message(ctx, &message));
                    }
                }
                Command::SubscribeInput(name) => {
                    if self.registry.contains(&name) && !self.input_subscribers.contains(&name) {
                        self.input_subscribers.push(name);
                    }
                }
                Command::UnsubscribeInput(name) => {
                    self.input_subscribers.retain(|n| *n != name);
                }
            }
        }
    }

    fn deliver(&mut self, message: Message, now: Duration) {
        let delivered = match self.registry.key(&message.to) {
            Some(key) => self.invoke(key, now, |object, ctx| object.on_message(ctx, &message)),
            None => false,
        };
        if !delivered {
            crate::engine_trace!("vitrine::World", "Holding message from '{}' for '{}'", message.from, message.to);
            self.pending_messages.push(message);
        }
    }

    /// Run one callback on a checked-out object. Returns `false` if the
    /// object is gone or already checked out.
    fn invoke<F>(&mut self, key: ObjectKey, now: Duration, callback: F) -> bool
    where
        F: FnOnce(&mut dyn SceneObject, &mut SceneContext<'_>),
    {
        let Some(mut object) = self.registry.take(key) else {
            return false;
        };
        {
            let mut ctx = SceneContext::new(
                &mut self.outbox,
                self.camera_state.as_ref(),
                self.pipeline.scene(),
                self.viewport,
                now,
            );
            callback(object.as_mut(), &mut ctx);
        }
        self.registry.restore(key, object);
        true
    }

    // ===== CAMERA =====

    /// Make `name` the active camera: fire its `on_active` and rebind the
    /// pipeline's scene stages to it. Unknown names and objects without a
    /// camera are ignored (returns `false`).
    pub fn set_active_camera(&mut self, name: &str) -> bool {
        let Some(key) = self.registry.key(name) else {
            crate::engine_debug!("vitrine::World", "No object '{}' to activate", name);
            return false;
        };
        if self.registry.get(key).and_then(|o| o.camera()).is_none() {
            crate::engine_debug!("vitrine::World", "'{}' is not a camera", name);
            return false;
        }
        if self.active_camera.as_deref() == Some(name) {
            return true;
        }

        let now = self.clock.now();
        self.active_camera = Some(name.to_string());
        self.refresh_camera();
        self.invoke(key, now, |object, ctx| object.on_active(ctx));
        self.drain_outbox(now);
        self.pipeline.setup(name);
        crate::engine_info!("vitrine::World", "Active camera is now '{}'", name);
        true
    }

    pub fn active_camera(&self) -> Option<&str> {
        self.active_camera.as_deref()
    }

    /// Active camera state as of the last refresh
    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.camera_state.as_ref()
    }

    fn refresh_camera(&mut self) {
        let key = self.active_camera.as_deref().and_then(|n| self.registry.key(n));
        let Some(camera) = key.and_then(|k| self.registry.get_mut(k)).and_then(|o| o.camera_mut()) else {
            self.camera_state = None;
            return;
        };
        if !self.viewport.is_empty() {
            camera.set_aspect(self.viewport.aspect_ratio());
        }
        camera.update_matrices();
        self.camera_state = Some(camera.clone());
    }

    // ===== INPUT =====

    /// Deliver `event` synchronously to every input subscriber
    pub fn handle_input(&mut self, event: InputEvent) {
        let now = self.clock.now();
        let subscribers = self.input_subscribers.clone();
        for name in subscribers {
            let Some(key) = self.registry.key(&name) else {
                continue;
            };
            let message = Message::new(INPUT_SENDER, &name, Payload::new(event));
            self.invoke(key, now, |object, ctx| object.on_message(ctx, &message));
            self.drain_outbox(now);
        }
    }

    /// Route a window event through the input router
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let Some(input) = self.input_router.handle_window_event(event) {
            self.handle_input(input);
        }
    }

    pub fn input_router_mut(&mut self) -> &mut InputRouter {
        &mut self.input_router
    }

    pub fn input_subscribers(&self) -> &[String] {
        &self.input_subscribers
    }

    // ===== FRAME =====

    /// Run one frame at `viewport`. A device failure is returned as-is and
    /// leaves the frame unfinished.
    pub fn tick(&mut self, viewport: Viewport) -> Result<()> {
        self.viewport = viewport;
        let now = self.clock.now();

        self.refresh_camera();
        self.promote_ready(now);

        if let Some(camera) = &self.camera_state {
            let snapshot = camera.snapshot(viewport);
            self.pipeline.render(&snapshot)?;
        }

        for key in self.registry.keys_in_state(ObjectState::Active) {
            if self.registry.state(key) != Some(ObjectState::Active) {
                continue;
            }
            self.invoke(key, now, |object, ctx| object.on_render(ctx));
            self.drain_outbox(now);
        }

        self.frame_count += 1;
        Ok(())
    }

    fn promote_ready(&mut self, now: Duration) {
        if !self.registry.has_pending() {
            return;
        }
        for key in self.registry.pending_keys().to_vec() {
            if self.registry.get(key).is_some_and(|o| o.is_ready()) {
                self.admit(key, now);
            }
        }
    }

    // ===== QUERIES =====

    /// Project `point` with the active camera and check it is the nearest
    /// ray-castable surface there. Invalid without an active camera.
    pub fn raster_coord_if_nearest(&self, point: Vec3) -> (Vec2, bool) {
        visibility::raster_coord_if_nearest(
            self.camera_state.as_ref(),
            self.viewport,
            point,
            self.pipeline.scene().ray_castable_drawables(),
        )
    }

    pub fn state(&self, name: &str) -> Option<ObjectState> {
        self.registry.key(name).and_then(|k| self.registry.state(k))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn object(&self, name: &str) -> Option<&dyn SceneObject> {
        self.registry.key(name).and_then(|k| self.registry.get(k))
    }

    pub fn object_mut(&mut self, name: &str) -> Option<&mut (dyn SceneObject + 'static)> {
        let key = self.registry.key(name)?;
        self.registry.get_mut(key)
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Messages held for `name` until it registers
    pub fn pending_message_count(&self, name: &str) -> usize {
        self.pending_messages.pending_for(name)
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut RenderPipeline {
        &mut self.pipeline
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
