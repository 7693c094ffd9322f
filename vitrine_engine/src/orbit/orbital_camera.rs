/// OrbitalCamera: camera scene object that orbits a look-at point.
///
/// Drag input pans yaw about world +Y and pitch about the camera's right
/// axis, each through its own `OrbitControl` so restrictions can be set per
/// direction. Auto orbit runs continuous yaw steps from the frame loop.

use std::time::Duration;
use glam::{Vec2, Vec3};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::input::InputEvent;
use crate::scene::{Message, SceneContext, SceneObject};
use super::orbit_control::{step_interval, OrbitControl};

/// Default auto orbit speed, in degrees per second
pub const DEFAULT_ORBIT_SPEED: f32 = 60.0;

const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 1000.0;

pub struct OrbitalCamera {
    name: String,
    camera: PerspectiveCamera,
    look_at: Vec3,
    yaw: OrbitControl,
    pitch: OrbitControl,
    orbit_speed: f32,
    auto_orbit_requested: bool,
}

impl OrbitalCamera {
    pub fn new(name: &str, fov_y_degrees: f32, look_at: Vec3) -> Self {
        let mut camera = PerspectiveCamera::new(fov_y_degrees, 1.0, NEAR_PLANE, FAR_PLANE);
        camera.transform.look_at(look_at, Vec3::Y);
        camera.update_matrices();

        Self {
            name: name.to_string(),
            camera,
            look_at,
            yaw: OrbitControl::new(look_at),
            pitch: OrbitControl::new(look_at),
            orbit_speed: DEFAULT_ORBIT_SPEED,
            auto_orbit_requested: false,
        }
    }

    pub fn look_at_point(&self) -> Vec3 {
        self.look_at
    }

    pub fn position(&self) -> Vec3 {
        self.camera.transform.position
    }

    /// Move the camera and face the look-at point again
    pub fn set_position(&mut self, position: Vec3) {
        self.camera.transform.position = position;
        self.camera.transform.look_at(self.look_at, Vec3::Y);
        self.camera.update_matrices();
    }

    pub fn add_yaw_restriction<F>(&mut self, restriction: F)
    where
        F: Fn(Vec3, Vec3) -> (bool, Vec3) + 'static,
    {
        self.yaw.add_restriction(restriction);
    }

    pub fn add_pitch_restriction<F>(&mut self, restriction: F)
    where
        F: Fn(Vec3, Vec3) -> (bool, Vec3) + 'static,
    {
        self.pitch.add_restriction(restriction);
    }

    pub fn orbit_speed(&self) -> f32 {
        self.orbit_speed
    }

    /// Ignored for speeds `step_interval` rejects
    pub fn set_orbit_speed(&mut self, degrees_per_second: f32) {
        if step_interval(degrees_per_second).is_some() {
            self.orbit_speed = degrees_per_second;
        }
    }

    /// Start yaw auto orbit at the current orbit speed.
    ///
    /// Returns false when it is already running.
    pub fn start_auto_orbit(&mut self, now: Duration) -> bool {
        self.auto_orbit_requested = false;
        self.yaw.start_continuous(Vec3::Y, self.orbit_speed, now)
    }

    /// Start auto orbit on the next rendered frame, using the frame clock
    pub fn request_auto_orbit(&mut self) {
        self.auto_orbit_requested = true;
    }

    pub fn stop_auto_orbit(&mut self) {
        self.auto_orbit_requested = false;
        self.yaw.stop();
    }

    pub fn is_auto_orbiting(&self) -> bool {
        self.yaw.is_running()
    }

    /// Drag handler: yaw by `-dx` degrees, then pitch by `-dy` degrees
    pub fn handle_move(&mut self, dx: f32, dy: f32) {
        let transform = &mut self.camera.transform;
        self.yaw.rotate(transform, Vec3::Y, -dx);
        let right = transform.right();
        self.pitch.rotate(transform, right, -dy);
    }

    /// Run the auto orbit steps due at `now`
    pub fn advance(&mut self, now: Duration) -> usize {
        self.yaw.advance(&mut self.camera.transform, now)
    }

    pub fn world_to_raster(&self, point: Vec3, viewport: Viewport) -> (Vec2, bool) {
        self.camera.world_to_raster(point, viewport)
    }

    pub fn world_to_view(&self, point: Vec3) -> Vec3 {
        self.camera.world_to_view(point)
    }
}

impl SceneObject for OrbitalCamera {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_active(&mut self, ctx: &mut SceneContext<'_>) {
        ctx.subscribe_input(&self.name);
    }

    fn on_message(&mut self, _ctx: &mut SceneContext<'_>, message: &Message) {
        if let Some(InputEvent::Move { dx, dy }) = message.get::<InputEvent>() {
            self.handle_move(*dx, *dy);
        }
    }

    fn on_render(&mut self, ctx: &mut SceneContext<'_>) {
        if self.auto_orbit_requested {
            self.start_auto_orbit(ctx.now());
        }
        self.advance(ctx.now());
    }

    fn camera(&self) -> Option<&PerspectiveCamera> {
        Some(&self.camera)
    }

    fn camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        Some(&mut self.camera)
    }
}

#[cfg(test)]
#[path = "orbital_camera_tests.rs"]
mod tests;
