/// LightObject: a scene object that only contributes light sources.

use glam::Vec3;
use super::light::Light;
use super::scene_object::SceneObject;

pub struct LightObject {
    name: String,
    lights: Vec<Light>,
}

impl LightObject {
    pub fn new(name: &str, light: Light) -> Self {
        Self { name: name.to_string(), lights: vec![light] }
    }

    pub fn ambient(name: &str, color: Vec3, intensity: f32) -> Self {
        Self::new(name, Light::ambient(name, color, intensity))
    }

    pub fn directional(name: &str, color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self::new(name, Light::directional(name, color, intensity, position))
    }

    pub fn point(name: &str, color: Vec3, intensity: f32, position: Vec3, range: f32) -> Self {
        Self::new(name, Light::point(name, color, intensity, position, range))
    }

    /// Move every positional light of this object. Takes effect on the next
    /// admission (lights are copied into the pipeline when admitted).
    pub fn set_position(&mut self, position: Vec3) {
        for light in &mut self.lights {
            light.set_position(position);
        }
    }
}

impl SceneObject for LightObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn lights(&self) -> Vec<Light> {
        self.lights.clone()
    }
}
