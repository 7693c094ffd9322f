//! Integration tests for the multi-pass render pipeline driven by a World
//!
//! Stage outputs are compared through the MockDevice's symbolic buffer
//! contents, so ordering and merge equivalence are checked without pixels.
//!
//! Run with: cargo test --test pipeline_integration_tests

use std::sync::Arc;
use vitrine_engine::glam::Vec3;
use vitrine_engine::vitrine::World;
use vitrine_engine::vitrine::camera::Viewport;
use vitrine_engine::vitrine::orbit::OrbitalCamera;
use vitrine_engine::vitrine::render::{ChainKind, MockDevice, MockDeviceLog, StageId, ToneMapping};
use vitrine_engine::vitrine::scene::{Drawable, LightObject, Material, MeshData, MeshObject, Surface};

const VIEWPORT: Viewport = Viewport { width: 256, height: 256 };

// ============================================================================
// HELPERS
// ============================================================================

fn product() -> MeshObject {
    let mesh = Arc::new(MeshData::cuboid(Vec3::ONE));
    let paint = Arc::new(Material::new("paint", Vec3::new(0.8, 0.1, 0.1)));
    let glass = Arc::new(Material::new("glass", Vec3::ONE).with_transparency(0.25));
    let led = Arc::new(Material::new("led", Vec3::ONE).with_emissive(Vec3::new(0.0, 1.0, 0.0)));
    MeshObject::from_drawables("Product", vec![
        Drawable::new("body", mesh.clone(), paint.clone()).with_surfaces(vec![
            Surface::new("shell", paint),
            Surface::new("screen", glass),
        ]),
        Drawable::new("status_led", mesh, led).luminant(true),
    ])
}

fn camera(name: &str, z: f32) -> OrbitalCamera {
    let mut camera = OrbitalCamera::new(name, 45.0, Vec3::ZERO);
    camera.set_position(Vec3::new(0.0, 0.0, z));
    camera
}

fn viewer() -> (World, MockDeviceLog) {
    let device = MockDevice::new();
    let log = device.log();
    let mut world = World::new(Box::new(device));
    world.register(Box::new(product()));
    world.register(Box::new(LightObject::ambient("Ambient", Vec3::ONE, 0.6)));
    world.register(Box::new(camera("Camera", 6.0)));
    world.set_active_camera("Camera");
    (world, log)
}

/// Stage order of the last frame with `removed` filtered out
fn order_without(log: &MockDeviceLog, removed: &[StageId]) -> Vec<StageId> {
    log.last_frame_order().into_iter().filter(|id| !removed.contains(id)).collect()
}

// ============================================================================
// COMPOSITE ORDER TESTS
// ============================================================================

#[test]
fn test_integration_default_composite() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();

    assert_eq!(
        log.last_presented().as_deref(),
        Some("gamma(color_balance(fxaa(sharpness(brightness(contrast(saturation(add(mul(bloom(scene),ao),bloom(scene))))))))")
    );
    let stats = world.pipeline().last_frame_stats();
    assert_eq!(stats.stages_executed, 14);
    assert!(stats.ambient_occlusion);
}

#[test]
fn test_integration_effect_chains_run_before_main() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();

    let order = log.last_frame_order();
    let position = |id: StageId| order.iter().position(|s| *s == id).unwrap();
    assert!(position(StageId::BloomScene) < position(StageId::AmbientOcclusion));
    assert!(position(StageId::AmbientOcclusion) < position(StageId::MainScene));
    assert!(position(StageId::SceneBloom) < position(StageId::PixelMerger));
    assert_eq!(order.last(), Some(&StageId::Gamma));
}

/// Regression: AO off equals the merge stage passing the main buffer through
#[test]
fn test_integration_ao_off_bypasses_merge() {
    let (mut world, log) = viewer();
    world.pipeline_mut().set_ao_enabled(false);
    world.tick(VIEWPORT).unwrap();

    let merger = log.last_record(StageId::PixelMerger).unwrap();
    let main = log.last_record(StageId::SceneBloom).unwrap();
    assert_eq!(merger.content, main.content);
    assert_eq!(merger.inputs, vec![main.output]);
    assert!(!log.last_frame_order().contains(&StageId::AmbientOcclusion));

    assert_eq!(
        log.last_presented().as_deref(),
        Some("gamma(color_balance(fxaa(sharpness(brightness(contrast(saturation(add(bloom(scene),bloom(scene))))))))")
    );
}

#[test]
fn test_integration_ao_toggle_restores_modulation() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();
    let with_ao = log.last_presented();

    world.pipeline_mut().set_ao_enabled(false);
    world.tick(VIEWPORT).unwrap();
    assert_ne!(log.last_presented(), with_ao);

    world.pipeline_mut().set_ao_enabled(true);
    world.tick(VIEWPORT).unwrap();
    assert_eq!(log.last_presented(), with_ao);
}

// ============================================================================
// STRUCTURAL TOGGLE TESTS
// ============================================================================

#[test]
fn test_integration_fxaa_toggle_preserves_relative_order() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();
    let baseline = order_without(&log, &[StageId::Fxaa]);

    world.pipeline_mut().set_fxaa_enabled(false);
    world.tick(VIEWPORT).unwrap();
    assert_eq!(log.last_frame_order(), baseline);

    world.pipeline_mut().set_fxaa_enabled(true);
    world.tick(VIEWPORT).unwrap();
    assert_eq!(order_without(&log, &[StageId::Fxaa]), baseline);
    let final_chain = world.pipeline().stage_ids(ChainKind::Final);
    let fxaa = final_chain.iter().position(|id| *id == StageId::Fxaa).unwrap();
    assert_eq!(final_chain[fxaa + 1], StageId::ColorBalance);
}

#[test]
fn test_integration_supersampling_toggle_preserves_relative_order() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();
    let baseline = order_without(&log, &[StageId::MainScene, StageId::Supersample]);

    for enabled in [true, false, true] {
        world.pipeline_mut().set_supersampling_enabled(enabled);
        world.tick(VIEWPORT).unwrap();
        assert_eq!(order_without(&log, &[StageId::MainScene, StageId::Supersample]), baseline);
        assert_eq!(log.last_frame_order().contains(&StageId::Supersample), enabled);
        assert_eq!(log.last_frame_order().contains(&StageId::MainScene), !enabled);
    }
}

#[test]
fn test_integration_combined_toggles() {
    let (mut world, log) = viewer();
    world.pipeline_mut().set_fxaa_enabled(false);
    world.pipeline_mut().set_supersampling_enabled(true);
    world.pipeline_mut().set_supersample_level(3).unwrap();
    world.tick(VIEWPORT).unwrap();

    assert_eq!(
        log.last_presented().as_deref(),
        Some("gamma(color_balance(sharpness(brightness(contrast(saturation(add(mul(bloom(ssaa),ao),bloom(scene))))))))")
    );
}

// ============================================================================
// MATERIAL SWAP TESTS
// ============================================================================

#[test]
fn test_integration_isolation_and_restore_each_frame() {
    let (mut world, log) = viewer();
    world.pipeline_mut().set_environment_map("showroom.hdr");

    for _ in 0..2 {
        world.tick(VIEWPORT).unwrap();

        let bloom = log.last_record(StageId::BloomScene).unwrap().scene.unwrap();
        assert_eq!(bloom.surface("shell").and_then(|s| s.material.as_deref()), Some("neutral_black"));
        assert!(bloom.surface("screen").is_none());
        assert_eq!(bloom.surface("status_led").and_then(|s| s.material.as_deref()), Some("led"));

        let main = log.last_record(StageId::MainScene).unwrap().scene.unwrap();
        assert_eq!(main.surface("shell").and_then(|s| s.material.as_deref()), Some("paint"));
        assert_eq!(main.surface("screen").and_then(|s| s.material.as_deref()), Some("glass"));
        assert!(main.surface("status_led").is_none());
        assert_eq!(main.lights.len(), 1);
        assert_eq!(
            main.background,
            vitrine_engine::vitrine::render::Background::EnvironmentMap("showroom.hdr".into())
        );
    }
}

#[test]
fn test_integration_tone_mapping_applies_to_scene_sampling() {
    let (mut world, log) = viewer();
    world.pipeline_mut().set_tone_mapping(ToneMapping::AcesFilmic);
    world.pipeline_mut().set_exposure(0.7).unwrap();
    world.tick(VIEWPORT).unwrap();

    for stage in [StageId::BloomScene, StageId::AmbientOcclusion, StageId::MainScene] {
        let scene = log.last_record(stage).unwrap().scene.unwrap();
        assert_eq!(scene.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(scene.exposure, 0.7);
    }
    assert!(!log.last_frame_order().iter().any(|id| id.label().contains("tone")));
}

// ============================================================================
// CAMERA SWITCH TESTS
// ============================================================================

#[test]
fn test_integration_camera_switch_rebinds_scene_stages() {
    let (mut world, log) = viewer();
    world.register(Box::new(camera("Closeup", 2.5)));
    world.tick(VIEWPORT).unwrap();
    let far_view = *log.last_record(StageId::MainScene).unwrap().scene.unwrap().camera.view_matrix();

    assert!(world.set_active_camera("Closeup"));
    world.tick(VIEWPORT).unwrap();
    let near_view = *log.last_record(StageId::MainScene).unwrap().scene.unwrap().camera.view_matrix();
    assert_ne!(far_view, near_view);

    for kind in [ChainKind::Bloom, ChainKind::AmbientOcclusion, ChainKind::Main] {
        let first = &world.pipeline().chain(kind).stages()[0];
        assert_eq!(first.camera.as_deref(), Some("Closeup"));
    }
    // The rest of the graph is untouched
    assert_eq!(world.pipeline().stage_ids(ChainKind::Final).len(), 9);
}

#[test]
fn test_integration_camera_switch_keeps_supersampling() {
    let (mut world, _log) = viewer();
    world.pipeline_mut().set_supersampling_enabled(true);
    world.register(Box::new(camera("Closeup", 2.5)));
    world.set_active_camera("Closeup");

    assert_eq!(
        world.pipeline().stage_ids(ChainKind::Main),
        vec![StageId::Supersample, StageId::SceneBloom]
    );
}

#[test]
fn test_integration_resize_follows_viewport() {
    let (mut world, log) = viewer();
    world.tick(VIEWPORT).unwrap();
    world.tick(VIEWPORT).unwrap();
    assert_eq!(log.resize_count(), 0);

    world.tick(Viewport::new(1280, 720)).unwrap();
    assert_eq!(log.resize_count(), 8);
    assert_eq!(world.camera().map(|c| c.aspect()), Some(1280.0 / 720.0));

    // A minimized window renders nothing but keeps the callbacks going
    let frames = log.frame_count();
    world.tick(Viewport::new(0, 0)).unwrap();
    assert_eq!(log.frame_count(), frames);
    assert_eq!(world.frame_count(), 4);
}
