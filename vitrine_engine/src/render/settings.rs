/// RenderSettings: every tunable of the render pipeline.
///
/// Defaults reproduce the viewer's stock look. The pipeline keeps one live
/// copy and derives each stage's uniforms from it.

use std::collections::BTreeMap;
use glam::Vec3;
use crate::error::Result;
use crate::ui::ParameterValue;

/// Tone mapping operator applied by scene-sampling stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ToneMapping {
    None = 0,
    Linear = 1,
    Reinhard = 2,
    Cineon = 3,
    AcesFilmic = 4,
}

impl ToneMapping {
    pub const ALL: [ToneMapping; 5] = [
        ToneMapping::None,
        ToneMapping::Linear,
        ToneMapping::Reinhard,
        ToneMapping::Cineon,
        ToneMapping::AcesFilmic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToneMapping::None => "None",
            ToneMapping::Linear => "Linear",
            ToneMapping::Reinhard => "Reinhard",
            ToneMapping::Cineon => "Cineon",
            ToneMapping::AcesFilmic => "ACESFilmic",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }
}

/// Buffer the AO stage writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AoOutput {
    Default = 0,
    Ssao = 1,
    Blur = 2,
    Beauty = 3,
    Depth = 4,
    Normal = 5,
}

/// Highest accepted supersample level (2^5 = 32 samples)
pub const MAX_SUPERSAMPLE_LEVEL: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // Whole-scene bloom of the main chain
    pub bloom_intensity: f32,
    pub bloom_percentage: f32,
    pub bloom_threshold: f32,
    pub bloom_radius: f32,

    // Bloom of the luminant objects
    pub luminant_bloom_strength: f32,
    pub luminant_bloom_radius: f32,
    pub luminant_bloom_threshold: f32,

    pub ao_enabled: bool,
    pub ao_kernel_radius: f32,
    pub ao_min_distance: f32,
    pub ao_max_distance: f32,
    pub ao_output: AoOutput,
    /// Merge stage shows the AO buffer alone
    pub ao_show_map: bool,

    pub sharpness: f32,
    pub fxaa_enabled: bool,
    pub supersampling_enabled: bool,
    pub supersample_level: u32,
    pub supersample_unbiased: bool,

    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,

    pub shadows: Vec3,
    pub midtones: Vec3,
    pub highlights: Vec3,

    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub gamma: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bloom_intensity: 0.0,
            bloom_percentage: 1.0,
            bloom_threshold: 0.0,
            bloom_radius: 0.0,
            luminant_bloom_strength: 3.0,
            luminant_bloom_radius: 1.0,
            luminant_bloom_threshold: 0.0,
            ao_enabled: true,
            ao_kernel_radius: 0.115,
            ao_min_distance: 0.00004,
            ao_max_distance: 0.1,
            ao_output: AoOutput::Blur,
            ao_show_map: false,
            sharpness: 0.2,
            fxaa_enabled: true,
            supersampling_enabled: false,
            supersample_level: 1,
            supersample_unbiased: true,
            saturation: 1.0,
            contrast: 0.0,
            brightness: 0.0,
            shadows: Vec3::ZERO,
            midtones: Vec3::ZERO,
            highlights: Vec3::ZERO,
            tone_mapping: ToneMapping::Linear,
            exposure: 1.0,
            gamma: 2.2,
        }
    }
}

impl RenderSettings {
    /// Strength of the whole-scene bloom stage
    pub fn scene_bloom_strength(&self) -> f32 {
        self.bloom_intensity * self.bloom_percentage
    }

    /// Check every value the pipeline would upload
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("bloom intensity", self.bloom_intensity),
            ("bloom percentage", self.bloom_percentage),
            ("bloom threshold", self.bloom_threshold),
            ("bloom radius", self.bloom_radius),
            ("luminant bloom strength", self.luminant_bloom_strength),
            ("luminant bloom radius", self.luminant_bloom_radius),
            ("luminant bloom threshold", self.luminant_bloom_threshold),
            ("AO kernel radius", self.ao_kernel_radius),
            ("AO min distance", self.ao_min_distance),
            ("AO max distance", self.ao_max_distance),
            ("sharpness", self.sharpness),
            ("saturation", self.saturation),
            ("contrast", self.contrast),
            ("brightness", self.brightness),
            ("exposure", self.exposure),
            ("gamma", self.gamma),
        ];
        for (name, value) in scalars {
            check_finite(name, value)?;
        }
        for (name, color) in [
            ("shadows", self.shadows),
            ("midtones", self.midtones),
            ("highlights", self.highlights),
        ] {
            check_color(name, color)?;
        }

        check_non_negative("bloom radius", self.bloom_radius)?;
        check_non_negative("AO kernel radius", self.ao_kernel_radius)?;
        check_non_negative("AO min distance", self.ao_min_distance)?;
        check_non_negative("AO max distance", self.ao_max_distance)?;
        check_non_negative("exposure", self.exposure)?;
        check_positive("gamma", self.gamma)?;
        check_supersample_level(self.supersample_level)
    }

    /// Flat `group/param -> value` export of the current settings
    pub fn export_parameters(&self) -> BTreeMap<String, String> {
        let entries: [(&str, ParameterValue); 23] = [
            ("Bloom/Intensity", self.bloom_intensity.into()),
            ("Bloom/Percentage", self.bloom_percentage.into()),
            ("Bloom/Threshold", self.bloom_threshold.into()),
            ("Bloom/Radius", self.bloom_radius.into()),
            ("SSAO/Enabled", self.ao_enabled.into()),
            ("SSAO/KernelRadius", self.ao_kernel_radius.into()),
            ("SSAO/MinDistance", self.ao_min_distance.into()),
            ("SSAO/MaxDistance", self.ao_max_distance.into()),
            ("SSAO/ShowAOMap", self.ao_show_map.into()),
            ("SSAO/ShowNormalMap", (self.ao_output == AoOutput::Normal).into()),
            ("Sharpness/Sharpness", self.sharpness.into()),
            ("AntiAliasing/FXAA", self.fxaa_enabled.into()),
            ("AntiAliasing/SSAA", self.supersampling_enabled.into()),
            ("AntiAliasing/SampleLevel", (self.supersample_level as f32).into()),
            ("ColorGrading/Saturation", self.saturation.into()),
            ("ColorGrading/Contrast", self.contrast.into()),
            ("ColorGrading/Brightness", self.brightness.into()),
            ("ColorBalance/Shadows", self.shadows.into()),
            ("ColorBalance/Midtones", self.midtones.into()),
            ("ColorBalance/Highlights", self.highlights.into()),
            ("ToneMapping/Mode", ParameterValue::Text(self.tone_mapping.name().to_string())),
            ("ToneMapping/Exposure", self.exposure.into()),
            ("Gamma/Gamma", self.gamma.into()),
        ];
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect()
    }
}

// ============================================================================
// Parameter checks shared with the pipeline setters
// ============================================================================

pub(crate) fn check_finite(name: &str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(crate::engine_invalid_param!("vitrine::RenderSettings", "{} must be finite (got {})", name, value))
    }
}

pub(crate) fn check_non_negative(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(crate::engine_invalid_param!("vitrine::RenderSettings", "{} must not be negative (got {})", name, value))
    }
}

pub(crate) fn check_positive(name: &str, value: f32) -> Result<()> {
    check_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(crate::engine_invalid_param!("vitrine::RenderSettings", "{} must be positive (got {})", name, value))
    }
}

pub(crate) fn check_color(name: &str, color: Vec3) -> Result<()> {
    if color.is_finite() {
        Ok(())
    } else {
        Err(crate::engine_invalid_param!("vitrine::RenderSettings", "{} color must be finite (got {})", name, color))
    }
}

pub(crate) fn check_supersample_level(level: u32) -> Result<()> {
    if level <= MAX_SUPERSAMPLE_LEVEL {
        Ok(())
    } else {
        Err(crate::engine_invalid_param!("vitrine::RenderSettings",
            "supersample level must be in 0..={} (got {})", MAX_SUPERSAMPLE_LEVEL, level))
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
