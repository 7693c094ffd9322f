//! Scene module: participants, their drawable content and the registry.
//!
//! Scene objects are owned by the `World`. Their drawables and lights are
//! copied into the render pipeline on admission.

mod aabb;
mod context;
mod drawable;
mod group;
mod hotspot;
mod light;
mod light_object;
mod material;
mod mesh_object;
mod message;
mod registry;
mod scene_object;
mod transform;

pub use aabb::AABB;
pub(crate) use context::Command;
pub use context::SceneContext;
pub use drawable::{Drawable, DrawableFlags, MeshData, Surface};
pub use group::SceneObjectGroup;
pub use hotspot::{Hotspot, HotspotClicked, HotspotWidget, DEFAULT_PICK_RADIUS};
pub use light::{Light, LightKind};
pub use light_object::LightObject;
pub use material::Material;
pub use mesh_object::{AssetSlot, MeshObject};
pub use message::{Message, MessageQueue, Payload};
pub use registry::{ObjectKey, ObjectRegistry, ObjectState};
pub use scene_object::SceneObject;
pub use transform::Transform;
