/*!
# Vitrine Engine

Core of an interactive 3D product viewer.

A `World` owns named scene objects (cameras, lights, meshes, hotspots and
groups of them), delivers messages between them, and drives one frame per
`tick()`. Each frame is rendered by a multi-pass `RenderPipeline` that
re-renders the scene with material overrides to isolate bloom and ambient
occlusion, then composites the effect buffers in a fixed order. GPU work
goes through the `RenderDevice` trait, so the pipeline runs headless
against the recording `MockDevice`.

## Architecture

- **World**: registry, message bus, active camera, frame loop
- **SceneObject**: capability trait of every scene participant
- **RenderPipeline**: bloom, ambient occlusion, main and final chains
- **OrbitControl**: restricted orbit about a pivot, manual or continuous
- **visibility**: nearest-point query for screen-anchored markers
- **ParameterPanel**: parameter registry with flat `group/param` export
*/

// Internal modules
mod error;
mod engine;
mod clock;
mod world;
pub mod log;
pub mod camera;
pub mod input;
pub mod orbit;
pub mod render;
pub mod scene;
pub mod ui;
pub mod visibility;

// Main vitrine namespace module
pub mod vitrine {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (global logger)
    pub use crate::engine::Engine;

    // Scene lifecycle manager
    pub use crate::world::World;

    // Time sources
    pub use crate::clock::{Clock, ManualClock, SystemClock};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    pub mod camera {
        pub use crate::camera::*;
    }

    pub mod scene {
        pub use crate::scene::{
            AABB, AssetSlot, Drawable, DrawableFlags, Hotspot, HotspotClicked, HotspotWidget,
            Light, LightKind, LightObject, Material, MeshData, MeshObject, Message, MessageQueue,
            ObjectKey, ObjectRegistry, ObjectState, Payload, SceneContext, SceneObject,
            SceneObjectGroup, Surface, Transform, DEFAULT_PICK_RADIUS,
        };
    }

    pub mod orbit {
        pub use crate::orbit::*;
    }

    pub mod render {
        pub use crate::render::*;
    }

    pub mod input {
        pub use crate::input::*;
    }

    pub mod ui {
        pub use crate::ui::*;
    }

    pub mod visibility {
        pub use crate::visibility::*;
    }
}

// Re-export math library at crate root
pub use glam;
