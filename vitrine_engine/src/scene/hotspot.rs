/// Hotspot: a clickable marker anchored at a world point.
///
/// Each frame the anchor is projected with the active camera; the widget is
/// shown at that pixel while the anchor is the nearest surface there and
/// hidden otherwise. The widget itself belongs to the host UI.

use glam::{Vec2, Vec3};
use crate::input::InputEvent;
use super::context::SceneContext;
use super::message::{Message, Payload};
use super::scene_object::SceneObject;

/// Default click tolerance around the projected anchor, in pixels
pub const DEFAULT_PICK_RADIUS: f32 = 16.0;

/// Screen-space widget driven by a hotspot
pub trait HotspotWidget {
    fn show(&mut self);
    fn hide(&mut self);
    /// Raster position, origin top-left
    fn set_position(&mut self, raster: Vec2);
}

/// Broadcast when a visible hotspot is clicked
#[derive(Debug, Clone, PartialEq)]
pub struct HotspotClicked {
    pub hotspot: String,
    pub anchor: Vec3,
}

pub struct Hotspot {
    name: String,
    anchor: Vec3,
    widget: Box<dyn HotspotWidget>,
    visible: bool,
    raster: Vec2,
    pick_radius: f32,
}

impl Hotspot {
    pub fn new(name: &str, anchor: Vec3, widget: Box<dyn HotspotWidget>) -> Self {
        Self {
            name: name.to_string(),
            anchor,
            widget,
            visible: false,
            raster: Vec2::ZERO,
            pick_radius: DEFAULT_PICK_RADIUS,
        }
    }

    pub fn with_pick_radius(mut self, pick_radius: f32) -> Self {
        self.pick_radius = pick_radius.max(0.0);
        self
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn set_anchor(&mut self, anchor: Vec3) {
        self.anchor = anchor;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Last raster position the widget was placed at
    pub fn raster(&self) -> Vec2 {
        self.raster
    }

    fn show(&mut self) {
        self.visible = true;
        self.widget.show();
    }

    fn hide(&mut self) {
        self.visible = false;
        self.widget.hide();
    }
}

impl SceneObject for Hotspot {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_start(&mut self, ctx: &mut SceneContext<'_>) {
        self.show();
        ctx.subscribe_input(&self.name);
    }

    fn on_render(&mut self, ctx: &mut SceneContext<'_>) {
        let (raster, visible) = ctx.raster_coord_if_nearest(self.anchor);
        if visible {
            self.raster = raster;
            self.widget.set_position(raster);
            self.show();
        } else {
            self.hide();
        }
    }

    fn on_end(&mut self, ctx: &mut SceneContext<'_>) {
        self.hide();
        ctx.unsubscribe_input(&self.name);
    }

    fn on_message(&mut self, ctx: &mut SceneContext<'_>, message: &Message) {
        if let Some(InputEvent::Click { x, y }) = message.get::<InputEvent>() {
            if self.visible && Vec2::new(*x, *y).distance(self.raster) <= self.pick_radius {
                ctx.broadcast(&self.name, Payload::new(HotspotClicked {
                    hotspot: self.name.clone(),
                    anchor: self.anchor,
                }));
            }
        }
    }
}
