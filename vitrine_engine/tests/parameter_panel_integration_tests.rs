//! Integration tests for the parameter panel driving a live pipeline
//!
//! The panel owns the callbacks; they reach the world through a shared
//! handle, the way a host UI wires its widgets.
//!
//! Run with: cargo test --test parameter_panel_integration_tests

use std::cell::RefCell;
use std::rc::Rc;
use vitrine_engine::glam::Vec3;
use vitrine_engine::vitrine::World;
use vitrine_engine::vitrine::camera::Viewport;
use vitrine_engine::vitrine::orbit::OrbitalCamera;
use vitrine_engine::vitrine::render::{MockDevice, MockDeviceLog, StageId, ToneMapping};
use vitrine_engine::vitrine::ui::{ParameterPanel, ParameterValue};

type SharedWorld = Rc<RefCell<World>>;

// ============================================================================
// HELPERS
// ============================================================================

fn shared_world() -> (SharedWorld, MockDeviceLog) {
    let device = MockDevice::new();
    let log = device.log();
    let mut world = World::new(Box::new(device));
    let mut camera = OrbitalCamera::new("Camera", 45.0, Vec3::ZERO);
    camera.set_position(Vec3::new(0.0, 1.0, 5.0));
    world.register(Box::new(camera));
    world.set_active_camera("Camera");
    (Rc::new(RefCell::new(world)), log)
}

/// Panel with the controls a viewer's debug sidebar carries
fn panel_for(world: &SharedWorld) -> ParameterPanel {
    let mut panel = ParameterPanel::new("Render");

    let w = world.clone();
    panel.add_slider("Gamma", "Gamma", 2.2, 0.5, 4.0, move |value, _delta| {
        let _ = w.borrow_mut().pipeline_mut().set_gamma(value as f32);
    });
    let w = world.clone();
    panel.add_checkbox("SSAO", "Enabled", true, move |enabled| {
        w.borrow_mut().pipeline_mut().set_ao_enabled(enabled);
    });
    let w = world.clone();
    panel.add_checkbox("AntiAliasing", "FXAA", true, move |enabled| {
        w.borrow_mut().pipeline_mut().set_fxaa_enabled(enabled);
    });
    let w = world.clone();
    panel.add_color("ColorBalance", "Shadows", Vec3::ZERO, move |rgb| {
        let _ = w.borrow_mut().pipeline_mut().set_shadows_color_balance(rgb);
    });
    let modes: Vec<&str> = ToneMapping::ALL.iter().map(|m| m.name()).collect();
    let w = world.clone();
    panel.add_dropdown("ToneMapping", "Mode", &modes, Some("Linear"), move |name| {
        if let Some(mode) = ToneMapping::from_name(name) {
            w.borrow_mut().pipeline_mut().set_tone_mapping(mode);
        }
    });
    panel
}

// ============================================================================
// PANEL TO PIPELINE TESTS
// ============================================================================

#[test]
fn test_integration_panel_controls_reach_pipeline() {
    let (world, log) = shared_world();
    let mut panel = panel_for(&world);

    panel.set_element_value("Gamma", "Gamma", ParameterValue::Number(1.8)).unwrap();
    panel.set_element_value("AntiAliasing", "FXAA", ParameterValue::Bool(false)).unwrap();
    panel.set_element_value("ToneMapping", "Mode", ParameterValue::Text("Reinhard".into())).unwrap();
    world.borrow_mut().tick(Viewport::new(64, 64)).unwrap();

    let world = world.borrow();
    let settings = world.pipeline().settings();
    assert_eq!(settings.gamma, 1.8);
    assert!(!settings.fxaa_enabled);
    assert_eq!(settings.tone_mapping, ToneMapping::Reinhard);
    assert!(!log.last_frame_order().contains(&StageId::Fxaa));
}

#[test]
fn test_integration_panel_export_matches_pipeline_export() {
    let (world, _log) = shared_world();
    let mut panel = panel_for(&world);

    panel.set_element_value("Gamma", "Gamma", ParameterValue::Number(1.8)).unwrap();
    panel.set_element_value("SSAO", "Enabled", ParameterValue::Bool(false)).unwrap();
    panel
        .set_element_value("ColorBalance", "Shadows", ParameterValue::Color(Vec3::new(0.5, 0.0, 0.25)))
        .unwrap();

    let from_panel = panel.export_map();
    let from_pipeline = world.borrow().pipeline().settings().export_parameters();
    for (key, value) in &from_panel {
        assert_eq!(from_pipeline.get(key), Some(value), "mismatch for {}", key);
    }
    assert_eq!(from_panel.len(), 5);
}

#[test]
fn test_integration_slider_clamps_before_pipeline() {
    let (world, _log) = shared_world();
    let mut panel = panel_for(&world);

    panel.set_element_value("Gamma", "Gamma", ParameterValue::Number(-3.0)).unwrap();
    assert_eq!(world.borrow().pipeline().settings().gamma, 0.5);
    assert_eq!(panel.export_map().get("Gamma/Gamma").map(String::as_str), Some("0.5"));
}

#[test]
fn test_integration_unknown_dropdown_option_rejected() {
    let (world, _log) = shared_world();
    let mut panel = panel_for(&world);

    assert!(panel.set_element_value("ToneMapping", "Mode", ParameterValue::Text("Filmic".into())).is_err());
    assert_eq!(world.borrow().pipeline().settings().tone_mapping, ToneMapping::Linear);
    assert_eq!(panel.export_map().get("ToneMapping/Mode").map(String::as_str), Some("\"Linear\""));
}

#[test]
fn test_integration_export_button_hands_out_text() {
    let (world, _log) = shared_world();
    let mut panel = panel_for(&world);
    let exported = Rc::new(RefCell::new(String::new()));
    let sink = exported.clone();
    panel.add_export_button("", "Export", move |text| *sink.borrow_mut() = text.to_string());

    assert!(panel.press("", "Export"));
    let text = exported.borrow();
    assert!(text.starts_with("{\n\tGamma/Gamma : 2.2,\n"));
    assert!(text.ends_with("\n}"));
    assert!(text.contains("\tToneMapping/Mode : \"Linear\""));
}
