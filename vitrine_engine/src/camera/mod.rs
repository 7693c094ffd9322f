//! Camera module: projection state, frustum and screen rays.
//!
//! `PerspectiveCamera` is the live camera owned by camera scene objects.
//! `Camera` is the passive per-frame copy handed to the render device.

mod camera;
mod frustum;
mod perspective_camera;
mod ray;

pub use camera::{Camera, Viewport};
pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use perspective_camera::PerspectiveCamera;
pub use ray::{Ray, RayHit};
