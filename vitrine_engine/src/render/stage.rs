/// Post-processing stages and their uniform blocks.
///
/// A stage is an opaque effect the render device knows how to run. The core
/// only tracks its identity, the camera it samples (scene stages) and the
/// uniform values it is driven with. Uniform blocks are `#[repr(C)]` Pod
/// structs uploaded as raw bytes.

use bytemuck::{Pod, Zeroable};
use super::settings::RenderSettings;

/// Every stage the pipeline can schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Scene render feeding the luminant bloom chain
    BloomScene,
    /// Bloom of the isolated luminant objects
    LuminantBloom,
    /// Screen-space ambient occlusion of the base scene
    AmbientOcclusion,
    /// Plain scene render of the main chain
    MainScene,
    /// Supersampled scene render, replaces `MainScene` while enabled
    Supersample,
    /// Whole-scene bloom applied on top of the main render
    SceneBloom,
    /// AO modulation of the main buffer
    PixelMerger,
    /// Additive blend of the bloom buffer
    PixelAdder,
    Saturation,
    Contrast,
    Brightness,
    Sharpness,
    Fxaa,
    ColorBalance,
    Gamma,
}

impl StageId {
    /// Stages that render the scene graph instead of reading a buffer
    pub fn samples_scene(self) -> bool {
        matches!(
            self,
            StageId::BloomScene | StageId::MainScene | StageId::Supersample | StageId::AmbientOcclusion
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            StageId::BloomScene => "bloom_scene",
            StageId::LuminantBloom => "luminant_bloom",
            StageId::AmbientOcclusion => "ambient_occlusion",
            StageId::MainScene => "main_scene",
            StageId::Supersample => "supersample",
            StageId::SceneBloom => "scene_bloom",
            StageId::PixelMerger => "pixel_merger",
            StageId::PixelAdder => "pixel_adder",
            StageId::Saturation => "saturation",
            StageId::Contrast => "contrast",
            StageId::Brightness => "brightness",
            StageId::Sharpness => "sharpness",
            StageId::Fxaa => "fxaa",
            StageId::ColorBalance => "color_balance",
            StageId::Gamma => "gamma",
        }
    }
}

// ============================================================================
// Uniform blocks
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BloomUniforms {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
    pub _pad: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AmbientOcclusionUniforms {
    pub kernel_radius: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// `AoOutput` discriminant
    pub output: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SupersampleUniforms {
    /// 2^level jittered samples per pixel
    pub sample_level: u32,
    pub unbiased: u32,
    pub _pad: [u32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MergerUniforms {
    pub merge: u32,
    pub show_ao: u32,
    pub _pad: [u32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AdderUniforms {
    pub weight_base: f32,
    pub weight_added: f32,
    pub _pad: [f32; 2],
}

/// Single-value stages (saturation, contrast, brightness, sharpness, gamma)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ScalarUniforms {
    pub value: f32,
    pub _pad: [f32; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FxaaUniforms {
    /// Reciprocal of the buffer size in pixels
    pub resolution: [f32; 2],
    pub _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ColorBalanceUniforms {
    pub shadows: [f32; 4],
    pub midtones: [f32; 4],
    pub highlights: [f32; 4],
}

/// Weights of the pixel adder: base buffer 1, bloom buffer 3
pub const ADDER_WEIGHTS: (f32, f32) = (1.0, 3.0);

/// Uniform state of one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageParams {
    /// Scene render without uniforms of its own
    Scene,
    Supersample(SupersampleUniforms),
    Bloom(BloomUniforms),
    AmbientOcclusion(AmbientOcclusionUniforms),
    Merger(MergerUniforms),
    Adder(AdderUniforms),
    Scalar(ScalarUniforms),
    Fxaa(FxaaUniforms),
    ColorBalance(ColorBalanceUniforms),
}

impl StageParams {
    /// Current values for `id` taken from `settings`
    pub fn from_settings(id: StageId, settings: &RenderSettings) -> Self {
        let scalar = |value: f32| StageParams::Scalar(ScalarUniforms { value, _pad: [0.0; 3] });
        match id {
            StageId::BloomScene | StageId::MainScene => StageParams::Scene,
            StageId::Supersample => StageParams::Supersample(SupersampleUniforms {
                sample_level: settings.supersample_level,
                unbiased: settings.supersample_unbiased as u32,
                _pad: [0; 2],
            }),
            StageId::LuminantBloom => StageParams::Bloom(BloomUniforms {
                strength: settings.luminant_bloom_strength,
                radius: settings.luminant_bloom_radius,
                threshold: settings.luminant_bloom_threshold,
                _pad: 0.0,
            }),
            StageId::SceneBloom => StageParams::Bloom(BloomUniforms {
                strength: settings.scene_bloom_strength(),
                radius: settings.bloom_radius,
                threshold: settings.bloom_threshold,
                _pad: 0.0,
            }),
            StageId::AmbientOcclusion => StageParams::AmbientOcclusion(AmbientOcclusionUniforms {
                kernel_radius: settings.ao_kernel_radius,
                min_distance: settings.ao_min_distance,
                max_distance: settings.ao_max_distance,
                output: settings.ao_output as u32,
            }),
            StageId::PixelMerger => StageParams::Merger(MergerUniforms {
                merge: settings.ao_enabled as u32,
                show_ao: settings.ao_show_map as u32,
                _pad: [0; 2],
            }),
            StageId::PixelAdder => StageParams::Adder(AdderUniforms {
                weight_base: ADDER_WEIGHTS.0,
                weight_added: ADDER_WEIGHTS.1,
                _pad: [0.0; 2],
            }),
            StageId::Saturation => scalar(settings.saturation),
            StageId::Contrast => scalar(settings.contrast),
            StageId::Brightness => scalar(settings.brightness),
            StageId::Sharpness => scalar(settings.sharpness),
            StageId::Gamma => scalar(settings.gamma),
            StageId::Fxaa => StageParams::Fxaa(FxaaUniforms { resolution: [0.0; 2], _pad: [0.0; 2] }),
            StageId::ColorBalance => StageParams::ColorBalance(ColorBalanceUniforms {
                shadows: settings.shadows.extend(0.0).to_array(),
                midtones: settings.midtones.extend(0.0).to_array(),
                highlights: settings.highlights.extend(0.0).to_array(),
            }),
        }
    }

    /// Raw uniform bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            StageParams::Scene => &[],
            StageParams::Supersample(u) => bytemuck::bytes_of(u),
            StageParams::Bloom(u) => bytemuck::bytes_of(u),
            StageParams::AmbientOcclusion(u) => bytemuck::bytes_of(u),
            StageParams::Merger(u) => bytemuck::bytes_of(u),
            StageParams::Adder(u) => bytemuck::bytes_of(u),
            StageParams::Scalar(u) => bytemuck::bytes_of(u),
            StageParams::Fxaa(u) => bytemuck::bytes_of(u),
            StageParams::ColorBalance(u) => bytemuck::bytes_of(u),
        }
    }
}

/// One scheduled stage of a chain
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub id: StageId,
    pub params: StageParams,
    /// Camera a scene-sampling stage was created for
    pub camera: Option<String>,
}

impl Stage {
    pub fn new(id: StageId, settings: &RenderSettings) -> Self {
        Self { id, params: StageParams::from_settings(id, settings), camera: None }
    }

    /// Scene-sampling stage bound to a camera
    pub fn for_camera(id: StageId, settings: &RenderSettings, camera: &str) -> Self {
        Self { camera: Some(camera.to_string()), ..Self::new(id, settings) }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
