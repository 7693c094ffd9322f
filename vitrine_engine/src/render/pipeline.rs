/// RenderPipeline: four pass chains composited into one frame.
///
/// Chain layout:
/// - bloom: `BloomScene, LuminantBloom`
/// - ambient occlusion: `AmbientOcclusion`
/// - main: `MainScene | Supersample, SceneBloom`
/// - final: `PixelMerger, PixelAdder, Saturation, Contrast, Brightness,
///   Sharpness, [Fxaa], ColorBalance, Gamma`
///
/// Scene-sampling stages are bound to the active camera by `setup`; nothing
/// renders before the first setup. Frame order: isolate, bloom chain, AO
/// chain (if enabled), restore, main chain, final chain, present. The
/// restore runs even when an effect chain fails.

use glam::Vec3;
use crate::camera::{Camera, Viewport};
use crate::error::Result;
use crate::engine_bail;
use crate::scene::{Drawable, Light};
use super::chain::{ChainKind, PassChain};
use super::device::{BufferId, RenderDevice, StageInvocation};
use super::render_scene::{Background, RenderScene};
use super::settings::{
    check_color, check_finite, check_non_negative, check_positive, check_supersample_level,
    AoOutput, RenderSettings, ToneMapping,
};
use super::stage::{FxaaUniforms, Stage, StageId, StageParams};

/// Counters of the last rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// 1-based index of the frame
    pub frame: u64,
    pub stages_executed: u32,
    /// Stages that sampled the scene graph
    pub scene_samples: u32,
    pub ambient_occlusion: bool,
}

/// Latest outputs of the upstream chains, as read by the final chain
#[derive(Debug, Clone, Copy)]
struct UpstreamBuffers {
    main: Option<BufferId>,
    ambient_occlusion: Option<BufferId>,
    bloom: Option<BufferId>,
}

pub struct RenderPipeline {
    device: Box<dyn RenderDevice>,
    settings: RenderSettings,
    scene: RenderScene,
    bloom: PassChain,
    ambient_occlusion: PassChain,
    main: PassChain,
    final_chain: PassChain,
    bound_camera: Option<String>,
    should_render: bool,
    paused: bool,
    buffer_size: Option<Viewport>,
    frame: u64,
    stats: FrameStats,
}

impl RenderPipeline {
    pub fn new(device: Box<dyn RenderDevice>) -> Self {
        Self::build(device, RenderSettings::default())
    }

    /// Pipeline built from `settings`, which must pass validation
    pub fn with_settings(device: Box<dyn RenderDevice>, settings: RenderSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::build(device, settings))
    }

    fn build(device: Box<dyn RenderDevice>, settings: RenderSettings) -> Self {
        let mut bloom = PassChain::new(ChainKind::Bloom);
        bloom.push(Stage::new(StageId::LuminantBloom, &settings));

        let mut main = PassChain::new(ChainKind::Main);
        main.push(Stage::new(StageId::SceneBloom, &settings));

        let mut final_chain = PassChain::new(ChainKind::Final);
        for id in [
            StageId::PixelMerger,
            StageId::PixelAdder,
            StageId::Saturation,
            StageId::Contrast,
            StageId::Brightness,
            StageId::Sharpness,
            StageId::Fxaa,
            StageId::ColorBalance,
            StageId::Gamma,
        ] {
            if id == StageId::Fxaa && !settings.fxaa_enabled {
                continue;
            }
            final_chain.push(Stage::new(id, &settings));
        }

        let scene = RenderScene::new();
        Self {
            device,
            settings,
            scene,
            bloom,
            ambient_occlusion: PassChain::new(ChainKind::AmbientOcclusion),
            main,
            final_chain,
            bound_camera: None,
            should_render: false,
            paused: false,
            buffer_size: None,
            frame: 0,
            stats: FrameStats::default(),
        }
    }

    // ===== CONTENT =====

    /// Admit an owner's drawables and lights into the base scene
    pub fn add(&mut self, owner: &str, drawables: Vec<Drawable>, lights: Vec<Light>) {
        crate::engine_debug!("vitrine::RenderPipeline",
            "Adding '{}' ({} drawables, {} lights)", owner, drawables.len(), lights.len());
        self.scene.add(owner, drawables, lights);
    }

    pub fn remove(&mut self, owner: &str) {
        if self.scene.remove(owner) {
            crate::engine_debug!("vitrine::RenderPipeline", "Removed '{}'", owner);
        }
    }

    pub fn scene(&self) -> &RenderScene {
        &self.scene
    }

    // ===== CAMERA BINDING =====

    /// Recreate the scene-sampling stages (bloom scene, AO, main scene or
    /// supersample) for `camera` and enable rendering.
    pub fn setup(&mut self, camera: &str) {
        self.should_render = false;

        self.bloom.remove(StageId::BloomScene);
        self.ambient_occlusion.remove(StageId::AmbientOcclusion);
        self.main.remove(StageId::MainScene);
        self.main.remove(StageId::Supersample);

        let scene_stage = self.main_scene_stage();
        let settings = &self.settings;
        self.bloom.insert(0, Stage::for_camera(StageId::BloomScene, settings, camera));
        self.ambient_occlusion.insert(0, Stage::for_camera(StageId::AmbientOcclusion, settings, camera));
        self.main.insert(0, Stage::for_camera(scene_stage, settings, camera));

        self.bound_camera = Some(camera.to_string());
        self.should_render = true;
        crate::engine_info!("vitrine::RenderPipeline", "Scene stages bound to camera '{}'", camera);
    }

    pub fn bound_camera(&self) -> Option<&str> {
        self.bound_camera.as_deref()
    }

    fn main_scene_stage(&self) -> StageId {
        if self.settings.supersampling_enabled {
            StageId::Supersample
        } else {
            StageId::MainScene
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    // ===== FRAME =====

    /// Render one frame seen through `camera`.
    ///
    /// Returns `Ok(false)` when rendering is skipped (no camera bound yet,
    /// paused, or an empty viewport).
    pub fn render(&mut self, camera: &Camera) -> Result<bool> {
        let viewport = *camera.viewport();
        if !self.should_render || self.paused || viewport.is_empty() {
            crate::engine_trace!("vitrine::RenderPipeline", "Frame skipped");
            return Ok(false);
        }

        self.ensure_buffers(viewport)?;
        self.update_fxaa_resolution(viewport);

        let mut stats = FrameStats { frame: self.frame + 1, ..FrameStats::default() };

        self.scene.isolate_for_effects();
        let effects = self.run_effect_chains(camera, &mut stats);
        self.scene.restore_for_final();
        effects?;

        self.run_chain(ChainKind::Main, camera, &mut stats)?;
        self.run_chain(ChainKind::Final, camera, &mut stats)?;

        let Some(output) = self.final_chain.latest() else {
            engine_bail!("vitrine::RenderPipeline", "Final chain produced no buffer");
        };
        self.device.present(output)?;

        self.frame += 1;
        self.stats = stats;
        Ok(true)
    }

    fn run_effect_chains(&mut self, camera: &Camera, stats: &mut FrameStats) -> Result<()> {
        self.run_chain(ChainKind::Bloom, camera, stats)?;
        if self.settings.ao_enabled {
            self.run_chain(ChainKind::AmbientOcclusion, camera, stats)?;
            stats.ambient_occlusion = true;
        }
        Ok(())
    }

    fn run_chain(&mut self, kind: ChainKind, camera: &Camera, stats: &mut FrameStats) -> Result<()> {
        let upstream = UpstreamBuffers {
            main: self.main.latest(),
            ambient_occlusion: if self.settings.ao_enabled { self.ambient_occlusion.latest() } else { None },
            bloom: self.bloom.latest(),
        };
        let tone_mapping = self.settings.tone_mapping;
        let exposure = self.settings.exposure;

        let Self { device, scene, bloom, ambient_occlusion, main, final_chain, .. } = self;
        let chain = match kind {
            ChainKind::Bloom => bloom,
            ChainKind::AmbientOcclusion => ambient_occlusion,
            ChainKind::Main => main,
            ChainKind::Final => final_chain,
        };

        let mut previous: Option<BufferId> = None;
        for (index, stage) in chain.stages().iter().enumerate() {
            let Some(output) = chain.output_for(index) else {
                engine_bail!("vitrine::RenderPipeline", "No buffers for the {} chain", kind.label());
            };

            let inputs: Vec<BufferId> = match stage.id {
                StageId::PixelMerger => [upstream.main, upstream.ambient_occlusion].into_iter().flatten().collect(),
                StageId::PixelAdder => [previous, upstream.bloom].into_iter().flatten().collect(),
                id if id.samples_scene() => Vec::new(),
                _ => previous.into_iter().collect(),
            };
            let snapshot = stage
                .id
                .samples_scene()
                .then(|| scene.snapshot(camera, tone_mapping, exposure));

            device.execute_stage(&StageInvocation {
                chain: kind,
                stage: stage.id,
                inputs: &inputs,
                output,
                uniforms: stage.params.as_bytes(),
                scene: snapshot.as_ref(),
            })?;

            stats.stages_executed += 1;
            if snapshot.is_some() {
                stats.scene_samples += 1;
            }
            previous = Some(output);
        }

        if let Some(latest) = previous {
            chain.set_latest(latest);
        }
        Ok(())
    }

    /// Create the chain buffers on first use, then follow the viewport size
    fn ensure_buffers(&mut self, viewport: Viewport) -> Result<()> {
        if self.buffer_size == Some(viewport) {
            return Ok(());
        }

        let (width, height) = (viewport.width, viewport.height);
        let Self { device, bloom, ambient_occlusion, main, final_chain, buffer_size, .. } = self;
        for chain in [bloom, ambient_occlusion, main, final_chain] {
            match chain.buffers() {
                [Some(a), Some(b)] => {
                    device.resize_color_buffer(a, width, height)?;
                    device.resize_color_buffer(b, width, height)?;
                }
                _ => {
                    let label = chain.kind().label();
                    let a = device.create_color_buffer(&format!("{}_a", label), width, height)?;
                    let b = device.create_color_buffer(&format!("{}_b", label), width, height)?;
                    chain.set_buffers([a, b]);
                }
            }
        }
        *buffer_size = Some(viewport);
        crate::engine_debug!("vitrine::RenderPipeline", "Chain buffers sized {}x{}", width, height);
        Ok(())
    }

    fn update_fxaa_resolution(&mut self, viewport: Viewport) {
        if let Some(stage) = self.final_chain.stage_mut(StageId::Fxaa) {
            stage.params = StageParams::Fxaa(FxaaUniforms {
                resolution: [1.0 / viewport.width as f32, 1.0 / viewport.height as f32],
                _pad: [0.0; 2],
            });
        }
    }

    // ===== INSPECTION =====

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn chain(&self, kind: ChainKind) -> &PassChain {
        match kind {
            ChainKind::Bloom => &self.bloom,
            ChainKind::AmbientOcclusion => &self.ambient_occlusion,
            ChainKind::Main => &self.main,
            ChainKind::Final => &self.final_chain,
        }
    }

    pub fn stage_ids(&self, kind: ChainKind) -> Vec<StageId> {
        self.chain(kind).stage_ids()
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frame
    }

    // ===== UNIFORM STATE =====

    /// Re-derive the uniforms of `id` from the settings, wherever it is
    /// scheduled
    fn refresh(&mut self, id: StageId) {
        let settings = &self.settings;
        for chain in [&mut self.bloom, &mut self.ambient_occlusion, &mut self.main, &mut self.final_chain] {
            if let Some(stage) = chain.stage_mut(id) {
                stage.params = StageParams::from_settings(id, settings);
            }
        }
    }

    pub fn set_environment(&mut self, background: Background) {
        self.scene.set_environment(background);
    }

    /// Use an equirectangular environment map as the background
    pub fn set_environment_map(&mut self, handle: &str) {
        self.set_environment(Background::EnvironmentMap(handle.to_string()));
    }

    pub fn set_bloom_percentage(&mut self, percentage: f32) -> Result<()> {
        check_finite("bloom percentage", percentage)?;
        self.settings.bloom_percentage = percentage;
        self.refresh(StageId::SceneBloom);
        Ok(())
    }

    pub fn set_bloom_intensity(&mut self, intensity: f32) -> Result<()> {
        check_finite("bloom intensity", intensity)?;
        self.settings.bloom_intensity = intensity;
        self.refresh(StageId::SceneBloom);
        Ok(())
    }

    pub fn set_bloom_threshold(&mut self, threshold: f32) -> Result<()> {
        check_finite("bloom threshold", threshold)?;
        self.settings.bloom_threshold = threshold;
        self.refresh(StageId::SceneBloom);
        Ok(())
    }

    pub fn set_bloom_radius(&mut self, radius: f32) -> Result<()> {
        check_non_negative("bloom radius", radius)?;
        self.settings.bloom_radius = radius;
        self.refresh(StageId::SceneBloom);
        Ok(())
    }

    /// Toggle AO. The merge stage stays scheduled and passes the main
    /// buffer through while AO is off.
    pub fn set_ao_enabled(&mut self, enabled: bool) {
        self.settings.ao_enabled = enabled;
        self.refresh(StageId::PixelMerger);
        crate::engine_debug!("vitrine::RenderPipeline", "Ambient occlusion {}", on_off(enabled));
    }

    pub fn set_ao_kernel_radius(&mut self, radius: f32) -> Result<()> {
        check_non_negative("AO kernel radius", radius)?;
        self.settings.ao_kernel_radius = radius;
        self.refresh(StageId::AmbientOcclusion);
        Ok(())
    }

    pub fn set_ao_min_distance(&mut self, distance: f32) -> Result<()> {
        check_non_negative("AO min distance", distance)?;
        self.settings.ao_min_distance = distance;
        self.refresh(StageId::AmbientOcclusion);
        Ok(())
    }

    pub fn set_ao_max_distance(&mut self, distance: f32) -> Result<()> {
        check_non_negative("AO max distance", distance)?;
        self.settings.ao_max_distance = distance;
        self.refresh(StageId::AmbientOcclusion);
        Ok(())
    }

    /// Show the blurred AO map alone instead of the modulated scene
    pub fn set_ao_show_map(&mut self, show: bool) {
        self.settings.ao_output = AoOutput::Blur;
        self.settings.ao_show_map = show;
        self.refresh(StageId::AmbientOcclusion);
        self.refresh(StageId::PixelMerger);
    }

    /// Show the AO normal buffer alone; turning it off returns to Blur
    pub fn set_ao_show_normal_map(&mut self, show: bool) {
        self.settings.ao_output = if show { AoOutput::Normal } else { AoOutput::Blur };
        self.settings.ao_show_map = show;
        self.refresh(StageId::AmbientOcclusion);
        self.refresh(StageId::PixelMerger);
    }

    pub fn set_sharpness(&mut self, sharpness: f32) -> Result<()> {
        check_finite("sharpness", sharpness)?;
        self.settings.sharpness = sharpness;
        self.refresh(StageId::Sharpness);
        Ok(())
    }

    /// Insert FXAA just before color balance, or remove it
    pub fn set_fxaa_enabled(&mut self, enabled: bool) {
        if enabled == self.settings.fxaa_enabled {
            return;
        }
        if enabled {
            let index = self.final_chain.len().saturating_sub(2);
            self.final_chain.insert(index, Stage::new(StageId::Fxaa, &self.settings));
            if let Some(size) = self.buffer_size {
                self.update_fxaa_resolution(size);
            }
        } else {
            self.final_chain.remove(StageId::Fxaa);
        }
        self.settings.fxaa_enabled = enabled;
        crate::engine_debug!("vitrine::RenderPipeline", "FXAA {}", on_off(enabled));
    }

    /// Swap the main chain's scene stage between plain and supersampled
    pub fn set_supersampling_enabled(&mut self, enabled: bool) {
        if enabled == self.settings.supersampling_enabled {
            return;
        }
        self.settings.supersampling_enabled = enabled;

        if let Some(camera) = self.bound_camera.clone() {
            let (from, to) = if enabled {
                (StageId::MainScene, StageId::Supersample)
            } else {
                (StageId::Supersample, StageId::MainScene)
            };
            self.main.remove(from);
            self.main.insert(0, Stage::for_camera(to, &self.settings, &camera));
        }
        crate::engine_debug!("vitrine::RenderPipeline", "Supersampling {}", on_off(enabled));
    }

    pub fn set_supersample_level(&mut self, level: u32) -> Result<()> {
        check_supersample_level(level)?;
        self.settings.supersample_level = level;
        self.refresh(StageId::Supersample);
        Ok(())
    }

    pub fn set_shadows_color_balance(&mut self, rgb: Vec3) -> Result<()> {
        check_color("shadows", rgb)?;
        self.settings.shadows = rgb;
        self.refresh(StageId::ColorBalance);
        Ok(())
    }

    pub fn set_midtones_color_balance(&mut self, rgb: Vec3) -> Result<()> {
        check_color("midtones", rgb)?;
        self.settings.midtones = rgb;
        self.refresh(StageId::ColorBalance);
        Ok(())
    }

    pub fn set_highlights_color_balance(&mut self, rgb: Vec3) -> Result<()> {
        check_color("highlights", rgb)?;
        self.settings.highlights = rgb;
        self.refresh(StageId::ColorBalance);
        Ok(())
    }

    /// Applied by the scene-sampling stages, not by a composite stage
    pub fn set_tone_mapping(&mut self, tone_mapping: ToneMapping) {
        self.settings.tone_mapping = tone_mapping;
    }

    pub fn set_exposure(&mut self, exposure: f32) -> Result<()> {
        check_non_negative("exposure", exposure)?;
        self.settings.exposure = exposure;
        Ok(())
    }

    pub fn set_saturation(&mut self, saturation: f32) -> Result<()> {
        check_finite("saturation", saturation)?;
        self.settings.saturation = saturation;
        self.refresh(StageId::Saturation);
        Ok(())
    }

    pub fn set_contrast(&mut self, contrast: f32) -> Result<()> {
        check_finite("contrast", contrast)?;
        self.settings.contrast = contrast;
        self.refresh(StageId::Contrast);
        Ok(())
    }

    pub fn set_brightness(&mut self, brightness: f32) -> Result<()> {
        check_finite("brightness", brightness)?;
        self.settings.brightness = brightness;
        self.refresh(StageId::Brightness);
        Ok(())
    }

    pub fn set_gamma(&mut self, gamma: f32) -> Result<()> {
        check_positive("gamma", gamma)?;
        self.settings.gamma = gamma;
        self.refresh(StageId::Gamma);
        Ok(())
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        let Self { device, bloom, ambient_occlusion, main, final_chain, .. } = self;
        for chain in [bloom, ambient_occlusion, main, final_chain] {
            for buffer in chain.buffers().into_iter().flatten() {
                device.destroy_color_buffer(buffer);
            }
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
