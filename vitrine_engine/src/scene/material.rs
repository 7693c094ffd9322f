/// Surface material as seen by the composite pipeline.
///
/// Only the properties the pipeline inspects are modelled: base color,
/// emissive color and the three see-through switches.

use std::sync::{Arc, OnceLock};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: Vec3,
    pub emissive: Vec3,
    /// Alpha-blended
    pub transparent: bool,
    pub opacity: f32,
    /// Fragments below this alpha are discarded (0 = disabled)
    pub alpha_test: f32,
}

impl Material {
    pub fn new(name: &str, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            color,
            emissive: Vec3::ZERO,
            transparent: false,
            opacity: 1.0,
            alpha_test: 0.0,
        }
    }

    pub fn with_transparency(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    pub fn with_alpha_test(mut self, alpha_test: f32) -> Self {
        self.alpha_test = alpha_test;
        self
    }

    pub fn with_emissive(mut self, emissive: Vec3) -> Self {
        self.emissive = emissive;
        self
    }

    /// Any degree of see-through: alpha-blended, partial opacity or alpha-tested
    pub fn is_see_through(&self) -> bool {
        self.transparent || self.opacity < 1.0 || self.alpha_test > 0.0
    }

    /// Shared stand-in used while isolating effect buffers
    pub fn neutral_black() -> Arc<Material> {
        static BLACK: OnceLock<Arc<Material>> = OnceLock::new();
        BLACK
            .get_or_init(|| Arc::new(Material::new("neutral_black", Vec3::ZERO)))
            .clone()
    }
}
