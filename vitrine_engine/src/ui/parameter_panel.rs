/// ParameterPanel: model of the debug parameter panel.
///
/// Controls are addressed by `group/param`. Every control except the export
/// button records its current value under an export key (`group/param`, or
/// bare `param` for the root group) in first-registration order. The widget
/// toolkit drawing the panel is the host's business; it drives the model
/// through `set_element_value` and `press`.

use std::collections::BTreeMap;
use std::fmt;
use glam::Vec3;
use rustc_hash::FxHashMap;
use crate::error::Result;

/// Value held by a control, formatted like JSON on export
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Color(Vec3),
}

impl ParameterValue {
    pub fn to_json(&self) -> String {
        match self {
            ParameterValue::Number(n) => json_number(*n),
            ParameterValue::Bool(b) => b.to_string(),
            ParameterValue::Text(s) => json_string(s),
            ParameterValue::Color(c) => format!(
                "{{\"r\":{},\"g\":{},\"b\":{}}}",
                json_number(f32_to_f64(c.x)),
                json_number(f32_to_f64(c.y)),
                json_number(f32_to_f64(c.z)),
            ),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParameterValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Vec3> {
        match self {
            ParameterValue::Color(c) => Some(*c),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<f32> for ParameterValue {
    fn from(value: f32) -> Self {
        ParameterValue::Number(f32_to_f64(value))
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<Vec3> for ParameterValue {
    fn from(value: Vec3) -> Self {
        ParameterValue::Color(value)
    }
}

/// Widen through the shortest decimal form so 0.2f32 exports as 0.2
fn f32_to_f64(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::NAN)
}

fn json_number(value: f64) -> String {
    if value.is_finite() {
        format!("{}", value)
    } else {
        "null".to_string()
    }
}

fn json_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// Controls
// ============================================================================

enum Control {
    Slider {
        min: f64,
        max: f64,
        value: f64,
        on_change: Box<dyn FnMut(f64, f64)>,
    },
    Checkbox {
        value: bool,
        on_change: Box<dyn FnMut(bool)>,
    },
    Color {
        value: Vec3,
        on_change: Box<dyn FnMut(Vec3)>,
    },
    Dropdown {
        options: Vec<String>,
        value: String,
        on_change: Box<dyn FnMut(&str)>,
    },
    Button {
        on_press: Box<dyn FnMut()>,
    },
    Export {
        on_export: Box<dyn FnMut(&str)>,
    },
}

impl Control {
    fn value(&self) -> Option<ParameterValue> {
        match self {
            Control::Slider { value, .. } => Some(ParameterValue::Number(*value)),
            Control::Checkbox { value, .. } => Some(ParameterValue::Bool(*value)),
            Control::Color { value, .. } => Some(ParameterValue::Color(*value)),
            Control::Dropdown { value, .. } => Some(ParameterValue::Text(value.clone())),
            Control::Button { .. } => Some(ParameterValue::Text(String::new())),
            Control::Export { .. } => None,
        }
    }
}

struct Element {
    control: Control,
    visible: bool,
}

pub struct ParameterPanel {
    title: String,
    visible: bool,
    open: bool,
    elements: FxHashMap<String, Element>,
    groups: Vec<(String, bool)>,
    values: Vec<(String, String)>,
}

fn element_key(group: &str, param: &str) -> String {
    format!("{}/{}", group, param)
}

fn export_key(group: &str, param: &str) -> String {
    if group.is_empty() {
        param.to_string()
    } else {
        element_key(group, param)
    }
}

impl ParameterPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            visible: true,
            open: true,
            elements: FxHashMap::default(),
            groups: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    // ===== CONTROL REGISTRATION =====

    /// Numeric slider. The callback receives the new value and its change
    /// since the previous value.
    pub fn add_slider<F>(&mut self, group: &str, param: &str, default: f64, min: f64, max: f64, on_change: F)
    where
        F: FnMut(f64, f64) + 'static,
    {
        self.add(group, param, Control::Slider { min, max, value: default, on_change: Box::new(on_change) });
    }

    pub fn add_checkbox<F>(&mut self, group: &str, param: &str, default: bool, on_change: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.add(group, param, Control::Checkbox { value: default, on_change: Box::new(on_change) });
    }

    pub fn add_color<F>(&mut self, group: &str, param: &str, default: Vec3, on_change: F)
    where
        F: FnMut(Vec3) + 'static,
    {
        self.add(group, param, Control::Color { value: default, on_change: Box::new(on_change) });
    }

    /// Drop-down over `options`; `default` falls back to the first option
    pub fn add_dropdown<F>(&mut self, group: &str, param: &str, options: &[&str], default: Option<&str>, on_change: F)
    where
        F: FnMut(&str) + 'static,
    {
        let value = default
            .or_else(|| options.first().copied())
            .unwrap_or_default()
            .to_string();
        let options = options.iter().map(|o| o.to_string()).collect();
        self.add(group, param, Control::Dropdown { options, value, on_change: Box::new(on_change) });
    }

    pub fn add_button<F>(&mut self, group: &str, param: &str, on_press: F)
    where
        F: FnMut() + 'static,
    {
        self.add(group, param, Control::Button { on_press: Box::new(on_press) });
    }

    /// Button handing the export text to `on_export` when pressed
    pub fn add_export_button<F>(&mut self, group: &str, param: &str, on_export: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.add(group, param, Control::Export { on_export: Box::new(on_export) });
    }

    fn add(&mut self, group: &str, param: &str, control: Control) {
        if !group.is_empty() && !self.groups.iter().any(|(name, _)| name == group) {
            self.groups.push((group.to_string(), true));
        }
        if let Some(value) = control.value() {
            self.record(&export_key(group, param), &value);
        }
        self.elements.insert(element_key(group, param), Element { control, visible: true });
    }

    fn record(&mut self, key: &str, value: &ParameterValue) {
        let json = value.to_json();
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = json,
            None => self.values.push((key.to_string(), json)),
        }
    }

    // ===== VALUES =====

    /// Set a control's value as if the user had changed it; its callback
    /// fires. Returns `Ok(false)` when no such control exists.
    pub fn set_element_value(&mut self, group: &str, param: &str, value: ParameterValue) -> Result<bool> {
        let Some(element) = self.elements.get_mut(&element_key(group, param)) else {
            crate::engine_trace!("vitrine::ParameterPanel", "No control {}/{}", group, param);
            return Ok(false);
        };

        let recorded = match (&mut element.control, value) {
            (Control::Slider { min, max, value, on_change }, ParameterValue::Number(new_value))
                if !new_value.is_nan() =>
            {
                let clamped = new_value.clamp(*min, *max);
                let delta = clamped - *value;
                *value = clamped;
                on_change(clamped, delta);
                ParameterValue::Number(clamped)
            }
            (Control::Checkbox { value, on_change }, ParameterValue::Bool(new_value)) => {
                *value = new_value;
                on_change(new_value);
                ParameterValue::Bool(new_value)
            }
            (Control::Color { value, on_change }, ParameterValue::Color(new_value)) => {
                *value = new_value;
                on_change(new_value);
                ParameterValue::Color(new_value)
            }
            (Control::Dropdown { options, value, on_change }, ParameterValue::Text(new_value))
                if options.contains(&new_value) =>
            {
                on_change(&new_value);
                *value = new_value;
                ParameterValue::Text(value.clone())
            }
            (_, value) => {
                return Err(crate::engine_invalid_param!("vitrine::ParameterPanel",
                    "{} does not accept {}", element_key(group, param), value));
            }
        };

        self.record(&export_key(group, param), &recorded);
        Ok(true)
    }

    pub fn get_element_value(&self, group: &str, param: &str) -> Option<ParameterValue> {
        self.elements.get(&element_key(group, param))?.control.value()
    }

    /// Press a button or export button. Returns false when no such button exists.
    pub fn press(&mut self, group: &str, param: &str) -> bool {
        let text = self.export_text();
        match self.elements.get_mut(&element_key(group, param)) {
            Some(Element { control: Control::Button { on_press }, .. }) => {
                on_press();
                true
            }
            Some(Element { control: Control::Export { on_export }, .. }) => {
                on_export(&text);
                true
            }
            _ => false,
        }
    }

    // ===== EXPORT =====

    pub fn export_map(&self) -> BTreeMap<String, String> {
        self.values.iter().cloned().collect()
    }

    /// Brace-delimited export: one tab-indented `key : value` line per
    /// entry, in registration order
    pub fn export_text(&self) -> String {
        let lines: Vec<String> = self
            .values
            .iter()
            .map(|(key, value)| format!("\t{} : {}", key, value))
            .collect();
        format!("{{\n{}\n}}", lines.join(",\n"))
    }

    // ===== VISIBILITY =====

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show_group(&mut self, group: &str) {
        self.set_group_visible(group, true);
    }

    pub fn hide_group(&mut self, group: &str) {
        self.set_group_visible(group, false);
    }

    fn set_group_visible(&mut self, group: &str, visible: bool) {
        if let Some(entry) = self.groups.iter_mut().find(|(name, _)| name == group) {
            entry.1 = visible;
        }
    }

    /// `None` for unknown groups
    pub fn is_group_visible(&self, group: &str) -> Option<bool> {
        self.groups.iter().find(|(name, _)| name == group).map(|(_, visible)| *visible)
    }

    pub fn show_element(&mut self, group: &str, param: &str) {
        if let Some(element) = self.elements.get_mut(&element_key(group, param)) {
            element.visible = true;
        }
    }

    pub fn hide_element(&mut self, group: &str, param: &str) {
        if let Some(element) = self.elements.get_mut(&element_key(group, param)) {
            element.visible = false;
        }
    }

    pub fn is_element_visible(&self, group: &str, param: &str) -> Option<bool> {
        self.elements.get(&element_key(group, param)).map(|e| e.visible)
    }

    /// Group names in creation order
    pub fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(|(name, _)| name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "parameter_panel_tests.rs"]
mod tests;
