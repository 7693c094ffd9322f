use std::cell::RefCell;
use std::rc::Rc;
use glam::Vec3;
use super::*;

// ============================================================================
// Value formatting
// ============================================================================

#[test]
fn test_json_formatting() {
    assert_eq!(ParameterValue::Number(1.0).to_json(), "1");
    assert_eq!(ParameterValue::from(0.2f32).to_json(), "0.2");
    assert_eq!(ParameterValue::Number(f64::NAN).to_json(), "null");
    assert_eq!(ParameterValue::Bool(true).to_json(), "true");
    assert_eq!(ParameterValue::from("Linear").to_json(), "\"Linear\"");
    assert_eq!(ParameterValue::Text("a\"b".into()).to_json(), "\"a\\\"b\"");
    assert_eq!(
        ParameterValue::Color(Vec3::new(1.0, 0.5, 0.0)).to_json(),
        "{\"r\":1,\"g\":0.5,\"b\":0}"
    );
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn test_slider_reports_value_and_delta() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let record = calls.clone();
    let mut panel = ParameterPanel::new("Debug");
    panel.add_slider("Bloom", "Intensity", 0.5, 0.0, 2.0, move |v, d| record.borrow_mut().push((v, d)));

    panel.set_element_value("Bloom", "Intensity", ParameterValue::Number(1.5)).unwrap();
    panel.set_element_value("Bloom", "Intensity", ParameterValue::Number(1.0)).unwrap();

    assert_eq!(*calls.borrow(), vec![(1.5, 1.0), (1.0, -0.5)]);
    assert_eq!(panel.get_element_value("Bloom", "Intensity"), Some(ParameterValue::Number(1.0)));
}

#[test]
fn test_slider_clamps_to_range() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_slider("Gamma", "Gamma", 2.2, 0.1, 5.0, |_, _| {});
    panel.set_element_value("Gamma", "Gamma", ParameterValue::Number(9.0)).unwrap();
    assert_eq!(panel.get_element_value("Gamma", "Gamma"), Some(ParameterValue::Number(5.0)));
}

#[test]
fn test_wrong_value_type_is_rejected() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_checkbox("SSAO", "Enabled", true, |_| {});

    let result = panel.set_element_value("SSAO", "Enabled", ParameterValue::Number(1.0));
    assert!(matches!(result, Err(crate::error::Error::InvalidParameter(_))));
    assert_eq!(panel.get_element_value("SSAO", "Enabled"), Some(ParameterValue::Bool(true)));
}

#[test]
fn test_missing_control_is_ignored() {
    let mut panel = ParameterPanel::new("Debug");
    assert!(!panel.set_element_value("Nope", "Nothing", true.into()).unwrap());
    assert!(panel.get_element_value("Nope", "Nothing").is_none());
    assert!(!panel.press("Nope", "Nothing"));
}

#[test]
fn test_dropdown_defaults_to_first_option() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_dropdown("ToneMapping", "Mode", &["None", "Linear"], None, |_| {});
    assert_eq!(panel.get_element_value("ToneMapping", "Mode"), Some(ParameterValue::from("None")));
}

#[test]
fn test_dropdown_accepts_only_listed_options() {
    let chosen = Rc::new(RefCell::new(String::new()));
    let record = chosen.clone();
    let mut panel = ParameterPanel::new("Debug");
    panel.add_dropdown("ToneMapping", "Mode", &["None", "Linear"], Some("Linear"), move |v| {
        *record.borrow_mut() = v.to_string();
    });

    assert!(panel.set_element_value("ToneMapping", "Mode", "None".into()).unwrap());
    assert_eq!(*chosen.borrow(), "None");
    assert!(panel.set_element_value("ToneMapping", "Mode", "Bogus".into()).is_err());
    assert_eq!(panel.get_element_value("ToneMapping", "Mode"), Some(ParameterValue::from("None")));
}

#[test]
fn test_button_press_runs_callback() {
    let presses = Rc::new(RefCell::new(0));
    let counter = presses.clone();
    let mut panel = ParameterPanel::new("Debug");
    panel.add_button("Camera", "Reset", move || *counter.borrow_mut() += 1);

    assert!(panel.press("Camera", "Reset"));
    assert!(panel.press("Camera", "Reset"));
    assert_eq!(*presses.borrow(), 2);
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_export_text_in_registration_order() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_slider("Bloom", "Intensity", 0.0, 0.0, 3.0, |_, _| {});
    panel.add_checkbox("", "Stats", false, |_| {});
    panel.add_color("ColorBalance", "Shadows", Vec3::ZERO, |_| {});

    assert_eq!(
        panel.export_text(),
        "{\n\tBloom/Intensity : 0,\n\tStats : false,\n\tColorBalance/Shadows : {\"r\":0,\"g\":0,\"b\":0}\n}"
    );
}

#[test]
fn test_export_tracks_changes() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_checkbox("SSAO", "Enabled", true, |_| {});
    panel.set_element_value("SSAO", "Enabled", false.into()).unwrap();

    let map = panel.export_map();
    assert_eq!(map.get("SSAO/Enabled").map(String::as_str), Some("false"));
}

#[test]
fn test_export_button_receives_text_and_is_not_exported() {
    let exported = Rc::new(RefCell::new(String::new()));
    let sink = exported.clone();
    let mut panel = ParameterPanel::new("Debug");
    panel.add_slider("", "Speed", 60.0, 0.0, 120.0, |_, _| {});
    panel.add_export_button("", "Export", move |text| *sink.borrow_mut() = text.to_string());

    assert!(panel.press("", "Export"));
    assert_eq!(*exported.borrow(), "{\n\tSpeed : 60\n}");
    assert!(!panel.export_map().contains_key("Export"));
}

#[test]
fn test_button_exports_empty_string() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_button("Camera", "Reset", || {});
    assert_eq!(panel.export_map().get("Camera/Reset").map(String::as_str), Some("\"\""));
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_group_and_element_visibility() {
    let mut panel = ParameterPanel::new("Debug");
    panel.add_checkbox("SSAO", "Enabled", true, |_| {});

    panel.hide_group("SSAO");
    panel.hide_element("SSAO", "Enabled");
    assert_eq!(panel.is_group_visible("SSAO"), Some(false));
    assert_eq!(panel.is_element_visible("SSAO", "Enabled"), Some(false));

    panel.show_group("SSAO");
    assert_eq!(panel.is_group_visible("SSAO"), Some(true));
    assert_eq!(panel.is_group_visible("Missing"), None);
    assert_eq!(panel.groups(), vec!["SSAO"]);
}
