/// Drawable: a GPU-renderable surface owned by exactly one scene object.
///
/// The GPU mesh/material resource itself is opaque to the core; a drawable
/// carries what the pipeline and occlusion queries need: its sub-surfaces
/// with their materials, optional triangle data for ray casting, a world
/// matrix and classification flags.

use std::sync::Arc;
use bitflags::bitflags;
use glam::{Mat4, Vec3};
use crate::camera::{Ray, RayHit};
use super::aabb::AABB;
use super::material::Material;

bitflags! {
    /// Classification flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DrawableFlags: u32 {
        /// Participates in occlusion queries
        const RAY_CASTABLE = 1 << 0;
        /// Rendered through the bloom isolation path instead of the main path
        const LUMINANT     = 1 << 1;
    }
}

/// One material-bearing (or bare) part of a drawable
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub material: Option<Arc<Material>>,
    pub visible: bool,
}

impl Surface {
    pub fn new(name: &str, material: Arc<Material>) -> Self {
        Self { name: name.to_string(), material: Some(material), visible: true }
    }

    /// Surface without a material (helpers, grouping nodes)
    pub fn bare(name: &str) -> Self {
        Self { name: name.to_string(), material: None, visible: true }
    }
}

/// Local-space triangle soup used for ray casting
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    bounds: AABB,
}

impl MeshData {
    /// Indices referencing missing vertices are dropped.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let count = positions.len() as u32;
        let triangles = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| i < count))
            .collect();
        let bounds = AABB::from_points(&positions);
        Self { positions, triangles, bounds }
    }

    /// Axis-aligned box centered on the origin
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // back
            [4, 5, 6], [4, 6, 7], // front
            [0, 1, 5], [0, 5, 4], // bottom
            [3, 7, 6], [3, 6, 2], // top
            [0, 4, 7], [0, 7, 3], // left
            [1, 2, 6], [1, 6, 5], // right
        ];
        Self::new(positions, triangles)
    }

    /// Single quad in the XY plane facing +Z
    pub fn quad(width: f32, height: f32) -> Self {
        let (hw, hh) = (width * 0.5, height * 0.5);
        let positions = vec![
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ];
        Self::new(positions, vec![[0, 1, 2], [0, 2, 3]])
    }

    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Nearest hit of a world ray against this mesh placed at `world`
    pub fn intersect_ray(&self, ray: &Ray, world: &Mat4) -> Option<RayHit> {
        self.bounds.transformed(world).intersect_ray(ray)?;

        self.triangles
            .iter()
            .filter_map(|t| {
                let [a, b, c] = t.map(|i| world.transform_point3(self.positions[i as usize]));
                ray.intersect_triangle(a, b, c)
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|distance| RayHit { distance, point: ray.point_at(distance) })
    }
}

#[derive(Debug, Clone)]
pub struct Drawable {
    pub name: String,
    pub mesh: Option<Arc<MeshData>>,
    pub surfaces: Vec<Surface>,
    pub world_matrix: Mat4,
    pub flags: DrawableFlags,
}

impl Drawable {
    /// Ray-castable, non-luminant drawable with a single surface
    pub fn new(name: &str, mesh: Arc<MeshData>, material: Arc<Material>) -> Self {
        Self {
            name: name.to_string(),
            mesh: Some(mesh),
            surfaces: vec![Surface::new(name, material)],
            world_matrix: Mat4::IDENTITY,
            flags: DrawableFlags::RAY_CASTABLE,
        }
    }

    pub fn with_surfaces(mut self, surfaces: Vec<Surface>) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn with_world_matrix(mut self, world_matrix: Mat4) -> Self {
        self.world_matrix = world_matrix;
        self
    }

    pub fn with_position(self, position: Vec3) -> Self {
        self.with_world_matrix(Mat4::from_translation(position))
    }

    pub fn luminant(mut self, luminant: bool) -> Self {
        self.flags.set(DrawableFlags::LUMINANT, luminant);
        self
    }

    pub fn ray_castable(mut self, ray_castable: bool) -> Self {
        self.flags.set(DrawableFlags::RAY_CASTABLE, ray_castable);
        self
    }

    pub fn is_luminant(&self) -> bool {
        self.flags.contains(DrawableFlags::LUMINANT)
    }

    pub fn is_ray_castable(&self) -> bool {
        self.flags.contains(DrawableFlags::RAY_CASTABLE)
    }

    /// World-space bounds, if the drawable carries mesh data
    pub fn world_bounds(&self) -> Option<AABB> {
        self.mesh.as_ref().map(|m| m.bounds().transformed(&self.world_matrix))
    }

    /// Nearest hit of a world ray. Visibility and opacity are ignored:
    /// an invisible ray-castable drawable still occludes.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        self.mesh.as_ref()?.intersect_ray(ray, &self.world_matrix)
    }
}

#[cfg(test)]
#[path = "drawable_tests.rs"]
mod tests;
