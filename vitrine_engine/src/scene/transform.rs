/// Position, rotation and scale of a scene participant.

use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Self::default() }
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Local -Z axis in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Local +X axis in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y axis in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Orient so the local -Z axis points at `target`.
    ///
    /// When `up` is parallel to the view direction the current up vector is
    /// used instead. Does nothing if `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let direction = target - self.position;
        if direction.length_squared() < 1e-12 {
            return;
        }

        let mut up = up.normalize_or_zero();
        if direction.normalize().cross(up).length_squared() < 1e-8 {
            up = self.up();
            if direction.normalize().cross(up).length_squared() < 1e-8 {
                up = self.rotation * Vec3::Z;
            }
        }

        let view = Mat4::look_at_rh(self.position, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
