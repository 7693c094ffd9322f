/// RenderScene: the base scene graph the pipeline renders.
///
/// Admitted content is classified once:
/// - lights go straight into the graph
/// - non-luminant drawables go into the graph and the main set, with each
///   material-bearing surface's material and visibility snapshotted
/// - luminant drawables go into the bloom set only, outside the graph
///
/// `isolate_for_effects` and `restore_for_final` bracket the effect chains:
/// the first blacks out the main set, hides see-through surfaces, inserts
/// the bloom set and clears the background; the second undoes all of it.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use crate::camera::Camera;
use crate::scene::{Drawable, Light, Material};
use super::settings::ToneMapping;

new_key_type! {
    /// Key of one admitted drawable
    pub struct NodeKey;
}

/// Scene background
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    None,
    Color(Vec3),
    /// Equirectangular environment map, by asset handle
    EnvironmentMap(String),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Vec3::ONE)
    }
}

struct Node {
    owner: String,
    drawable: Drawable,
    /// Material and visibility per surface at admission
    originals: Vec<(Option<Arc<Material>>, bool)>,
    in_graph: bool,
}

/// One visible surface as seen by a scene-sampling stage
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    pub owner: String,
    pub drawable: String,
    pub surface: String,
    pub material: Option<String>,
    pub world_matrix: Mat4,
    pub luminant: bool,
}

/// Scene graph state handed to a scene-sampling stage
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub camera: Camera,
    pub surfaces: Vec<SurfaceSnapshot>,
    pub lights: Vec<Light>,
    pub background: Background,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
}

impl SceneSnapshot {
    pub fn surface(&self, name: &str) -> Option<&SurfaceSnapshot> {
        self.surfaces.iter().find(|s| s.surface == name)
    }
}

#[derive(Default)]
pub struct RenderScene {
    nodes: SlotMap<NodeKey, Node>,
    main: Vec<NodeKey>,
    bloom: Vec<NodeKey>,
    lights: Vec<(String, Light)>,
    background: Background,
    environment: Background,
    isolated: bool,
}

impl RenderScene {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== CONTENT =====

    /// Admit an owner's drawables and lights
    pub fn add(&mut self, owner: &str, drawables: Vec<Drawable>, lights: Vec<Light>) {
        for light in lights {
            self.lights.push((owner.to_string(), light));
        }

        for drawable in drawables {
            let luminant = drawable.is_luminant();
            let originals = drawable
                .surfaces
                .iter()
                .map(|s| (s.material.clone(), s.visible))
                .collect();
            let key = self.nodes.insert(Node {
                owner: owner.to_string(),
                drawable,
                originals,
                in_graph: !luminant || self.isolated,
            });
            if luminant {
                self.bloom.push(key);
            } else {
                self.main.push(key);
            }
        }
    }

    /// Drop everything `owner` contributed. Returns whether anything was removed.
    pub fn remove(&mut self, owner: &str) -> bool {
        let before = self.nodes.len() + self.lights.len();
        self.lights.retain(|(o, _)| o != owner);
        self.nodes.retain(|_, node| node.owner != owner);
        let nodes = &self.nodes;
        self.main.retain(|k| nodes.contains_key(*k));
        self.bloom.retain(|k| nodes.contains_key(*k));
        before != self.nodes.len() + self.lights.len()
    }

    pub fn contains_owner(&self, owner: &str) -> bool {
        self.nodes.values().any(|n| n.owner == owner) || self.lights.iter().any(|(o, _)| o == owner)
    }

    pub fn main_count(&self) -> usize {
        self.main.len()
    }

    pub fn bloom_count(&self) -> usize {
        self.bloom.len()
    }

    pub fn light_count(&self) -> usize {
        self.lights.len()
    }

    /// Every admitted drawable that takes part in occlusion queries,
    /// whether or not it is in the graph or visible
    pub fn ray_castable_drawables(&self) -> impl Iterator<Item = &Drawable> + '_ {
        self.nodes
            .values()
            .map(|n| &n.drawable)
            .filter(|d| d.is_ray_castable())
    }

    // ===== BACKGROUND =====

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn environment(&self) -> &Background {
        &self.environment
    }

    /// Background restored after the effect chains
    pub fn set_environment(&mut self, environment: Background) {
        if !self.isolated {
            self.background = environment.clone();
        }
        self.environment = environment;
    }

    // ===== COMPOSITE BRACKET =====

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn isolate_for_effects(&mut self) {
        let black = Material::neutral_black();
        for key in &self.main {
            let Some(node) = self.nodes.get_mut(*key) else { continue };
            for surface in &mut node.drawable.surfaces {
                let see_through = match &surface.material {
                    Some(material) => material.is_see_through(),
                    None => continue,
                };
                if see_through {
                    surface.visible = false;
                } else {
                    surface.material = Some(black.clone());
                }
            }
        }
        for key in &self.bloom {
            if let Some(node) = self.nodes.get_mut(*key) {
                node.in_graph = true;
            }
        }
        self.background = Background::None;
        self.isolated = true;
    }

    pub fn restore_for_final(&mut self) {
        for key in &self.main {
            let Some(node) = self.nodes.get_mut(*key) else { continue };
            for (surface, (material, visible)) in node.drawable.surfaces.iter_mut().zip(&node.originals) {
                surface.material = material.clone();
                surface.visible = *visible;
            }
        }
        for key in &self.bloom {
            if let Some(node) = self.nodes.get_mut(*key) {
                node.in_graph = false;
            }
        }
        self.background = self.environment.clone();
        self.isolated = false;
    }

    // ===== SNAPSHOT =====

    /// Visible surfaces of the drawables currently in the graph
    pub fn snapshot(&self, camera: &Camera, tone_mapping: ToneMapping, exposure: f32) -> SceneSnapshot {
        let surfaces = self
            .main
            .iter()
            .chain(&self.bloom)
            .filter_map(|k| self.nodes.get(*k))
            .filter(|n| n.in_graph)
            .flat_map(|n| {
                n.drawable.surfaces.iter().filter(|s| s.visible).map(move |s| SurfaceSnapshot {
                    owner: n.owner.clone(),
                    drawable: n.drawable.name.clone(),
                    surface: s.name.clone(),
                    material: s.material.as_ref().map(|m| m.name.clone()),
                    world_matrix: n.drawable.world_matrix,
                    luminant: n.drawable.is_luminant(),
                })
            })
            .collect();

        SceneSnapshot {
            camera: camera.clone(),
            surfaces,
            lights: self.lights.iter().map(|(_, l)| l.clone()).collect(),
            background: self.background.clone(),
            tone_mapping,
            exposure,
        }
    }
}

#[cfg(test)]
#[path = "render_scene_tests.rs"]
mod tests;
