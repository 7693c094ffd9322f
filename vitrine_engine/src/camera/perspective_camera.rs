/// PerspectiveCamera: the live projection state of a camera scene object.
///
/// Holds a world transform plus field of view, aspect ratio and clip
/// distances. Matrices are cached and only refreshed by `update_matrices()`,
/// which the world calls once per frame for the active camera.

use glam::{Mat4, Vec2, Vec3};
use crate::scene::Transform;
use super::camera::{Camera, Viewport};
use super::frustum::Frustum;
use super::ray::Ray;

#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// World transform; the camera looks down its local -Z axis
    pub transform: Transform,
    fov_y_degrees: f32,
    aspect: f32,
    near: f32,
    far: f32,
    view: Mat4,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Create a camera at the origin. Matrices are computed immediately.
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            transform: Transform::default(),
            fov_y_degrees,
            aspect,
            near,
            far,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_matrices();
        camera
    }

    // ===== PROJECTION PARAMETERS =====

    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y_degrees
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the aspect ratio. Non-finite or non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    pub fn set_fov_y_degrees(&mut self, fov_y_degrees: f32) {
        if fov_y_degrees.is_finite() && fov_y_degrees > 0.0 && fov_y_degrees < 180.0 {
            self.fov_y_degrees = fov_y_degrees;
        }
    }

    /// Recompute the cached view and projection matrices.
    pub fn update_matrices(&mut self) {
        self.view = self.transform.matrix().inverse();
        self.projection = Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    // ===== CACHED MATRICES =====

    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }

    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection_matrix())
    }

    /// Passive copy of the current matrices for the render device
    pub fn snapshot(&self, viewport: Viewport) -> Camera {
        Camera::new(self.view, self.projection, self.frustum(), viewport)
    }

    // ===== SPACE CONVERSIONS =====

    /// World point to view space (right-handed, camera looks down -Z)
    pub fn world_to_view(&self, point: Vec3) -> Vec3 {
        self.view.transform_point3(point)
    }

    /// Distance in front of the camera along its view direction
    pub fn view_depth(&self, point: Vec3) -> f32 {
        -self.world_to_view(point).z
    }

    /// World point to normalized device coordinates.
    ///
    /// Returns `None` when the point is on or behind the camera plane.
    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection_matrix() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// World point to raster (pixel) coordinates, origin top-left.
    ///
    /// The flag is true when the point lies inside the view volume.
    pub fn world_to_raster(&self, point: Vec3, viewport: Viewport) -> (Vec2, bool) {
        match self.world_to_ndc(point) {
            Some(ndc) => {
                let raster = Vec2::new(
                    (ndc.x + 1.0) * 0.5 * viewport.width as f32,
                    (1.0 - ndc.y) * 0.5 * viewport.height as f32,
                );
                let inside = ndc.x.abs() <= 1.0
                    && ndc.y.abs() <= 1.0
                    && (0.0..=1.0).contains(&ndc.z);
                (raster, inside)
            }
            None => (Vec2::ZERO, false),
        }
    }

    /// Ray from the camera through a raster coordinate
    pub fn raster_to_ray(&self, raster: Vec2, viewport: Viewport) -> Option<Ray> {
        if viewport.is_empty() {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * raster.x / viewport.width as f32 - 1.0,
            1.0 - 2.0 * raster.y / viewport.height as f32,
        );
        Ray::from_ndc(&self.view_projection_matrix().inverse(), ndc)
    }
}

#[cfg(test)]
#[path = "perspective_camera_tests.rs"]
mod tests;
