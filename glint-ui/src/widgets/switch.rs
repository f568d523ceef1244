use glint_core::{Color, Size, Vec2};

use super::{Align, Background, Item, Shape};
use crate::animation::{Easing, ValueAnimation};
use crate::event::{MouseEvent, MouseEventKind};
use crate::painter::Painter;

/// Seconds the indicator takes to cross the track.
pub const SWITCH_ANIMATION_SECS: f32 = 0.2;

/// An on/off toggle: a capsule track with a sliding circular indicator.
pub struct Switch {
    pub size: Size,
    pub background: Option<Background>,
    pub indicator_color: Color,
    pub container_alignment: Align,
    checked: bool,
    /// 0 at the left end of the track, 1 at the right.
    indicator_position: f32,
    animation: ValueAnimation<f32>,
    on_toggled: Option<Box<dyn FnMut(bool)>>,
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

impl Switch {
    pub fn new() -> Self {
        Self {
            size: Size::new(80.0, 32.0),
            background: Some(Background::new(Color::BLACK, Shape::Capsule)),
            indicator_color: Color::WHITE,
            container_alignment: Align::default(),
            checked: false,
            indicator_position: 0.0,
            animation: ValueAnimation::new(0.0, 1.0, SWITCH_ANIMATION_SECS, Easing::InOutQuadratic),
            on_toggled: None,
        }
    }

    /// Call `callback` with the new state whenever the switch toggles.
    pub fn on_toggled(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_toggled = Some(Box::new(callback));
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn indicator_position(&self) -> f32 {
        self.indicator_position
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }

    pub fn set_checked(&mut self, checked: bool) {
        if checked == self.checked {
            return;
        }
        self.checked = checked;
        let (from, to) = if checked { (0.0, 1.0) } else { (1.0, 0.0) };
        self.animation.start_value = from;
        self.animation.end_value = to;
        self.indicator_position = self.animation.start();
        if let Some(callback) = self.on_toggled.as_mut() {
            callback(checked);
        }
    }
}

impl Item for Switch {
    fn measure(&mut self, _painter: &mut Painter) -> Size {
        self.size
    }

    fn size(&self) -> Size {
        self.size
    }

    fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    fn container_alignment(&self) -> Align {
        self.container_alignment
    }

    fn render_contents(&self, painter: &mut Painter, pos: Vec2, depth: i32) {
        let radius = 0.5 * self.size.height;
        let x = radius + self.indicator_position * (self.size.width - 2.0 * radius);
        let center = pos + Vec2::new(x, radius);
        painter.draw_circle(center, 0.75 * radius, self.indicator_color, depth + 1);
    }

    fn mouse_event(&mut self, event: &MouseEvent) -> bool {
        if event.kind == MouseEventKind::Click {
            self.toggle();
            return true;
        }
        false
    }

    fn update(&mut self, elapsed: f32) {
        if let Some(value) = self.animation.update(elapsed) {
            self.indicator_position = value;
        }
    }
}
