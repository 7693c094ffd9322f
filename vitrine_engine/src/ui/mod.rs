//! UI module: the parameter panel model consumed by the host's widgets.

mod parameter_panel;

pub use parameter_panel::{ParameterPanel, ParameterValue};
