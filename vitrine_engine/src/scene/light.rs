/// Light sources contributed by scene objects.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional { position: Vec3 },
    Point { position: Vec3, range: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub name: String,
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn ambient(name: &str, color: Vec3, intensity: f32) -> Self {
        Self { name: name.to_string(), color, intensity, kind: LightKind::Ambient }
    }

    /// Directional light shining from `position` toward the origin
    pub fn directional(name: &str, color: Vec3, intensity: f32, position: Vec3) -> Self {
        Self { name: name.to_string(), color, intensity, kind: LightKind::Directional { position } }
    }

    /// Point light; a `range` of 0 means unlimited
    pub fn point(name: &str, color: Vec3, intensity: f32, position: Vec3, range: f32) -> Self {
        Self { name: name.to_string(), color, intensity, kind: LightKind::Point { position, range } }
    }

    pub fn position(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Ambient => None,
            LightKind::Directional { position } | LightKind::Point { position, .. } => Some(position),
        }
    }

    pub fn set_position(&mut self, new_position: Vec3) {
        match &mut self.kind {
            LightKind::Ambient => {}
            LightKind::Directional { position } | LightKind::Point { position, .. } => {
                *position = new_position;
            }
        }
    }
}
