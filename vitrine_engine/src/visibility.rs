//! Nearest-point visibility query.
//!
//! Answers "where does this world point land on screen, and is it the
//! nearest surface there?" for hotspots and other screen-anchored UI.

use glam::{Vec2, Vec3};
use crate::camera::{PerspectiveCamera, RayHit, Viewport};
use crate::scene::Drawable;

/// Slack added to the hit depth so a point lying on the hit surface counts
/// as visible
pub const DEPTH_EPSILON: f32 = 1e-4;

/// Nearest hit of the ray through `raster` against ray-castable drawables
pub fn nearest_hit<'a>(
    camera: &PerspectiveCamera,
    viewport: Viewport,
    raster: Vec2,
    occluders: impl IntoIterator<Item = &'a Drawable>,
) -> Option<RayHit> {
    let ray = camera.raster_to_ray(raster, viewport)?;
    occluders
        .into_iter()
        .filter(|d| d.is_ray_castable())
        .filter_map(|d| d.intersect_ray(&ray))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Project `point` and test it against the occluders.
///
/// Returns the raster coordinate (origin top-left) and a validity flag.
/// The flag is false when there is no camera, the point is outside the
/// view frustum, the ray through its pixel hits nothing, or something
/// ray-castable sits in front of it. Depths are compared in camera space;
/// ties count as visible.
pub fn raster_coord_if_nearest<'a>(
    camera: Option<&PerspectiveCamera>,
    viewport: Viewport,
    point: Vec3,
    occluders: impl IntoIterator<Item = &'a Drawable>,
) -> (Vec2, bool) {
    let Some(camera) = camera else {
        return (Vec2::ZERO, false);
    };

    let (raster, inside) = camera.world_to_raster(point, viewport);
    if !inside || !camera.frustum().contains_point(point) {
        return (raster, false);
    }

    let Some(hit) = nearest_hit(camera, viewport, raster, occluders) else {
        return (raster, false);
    };

    let point_depth = camera.view_depth(point);
    let hit_depth = camera.view_depth(hit.point);
    (raster, point_depth <= hit_depth + DEPTH_EPSILON)
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
