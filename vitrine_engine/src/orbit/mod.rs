//! Orbit module: pivot orbiting for transforms and the orbital camera.

mod orbit_control;
mod orbital_camera;
mod repeating_timer;

pub use orbit_control::{step_interval, OrbitControl, Restriction, CONTINUOUS_STEP_DEGREES};
pub use orbital_camera::{OrbitalCamera, DEFAULT_ORBIT_SPEED};
pub use repeating_timer::{RepeatingTimer, TimerTick};
