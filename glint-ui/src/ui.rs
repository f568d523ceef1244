//! Root of a widget tree.

use glint_core::{Size, Vec2};

use crate::event::{MouseButtons, MouseEvent, MouseTracker};
use crate::painter::Painter;
use crate::widgets::Item;

/// Owns the root item, drives layout and turns raw pointer input into
/// widget events.
pub struct Ui {
    root: Box<dyn Item>,
    position: Vec2,
    tracker: MouseTracker,
}

impl Ui {
    pub fn new(root: impl Item + 'static, position: Vec2) -> Self {
        Self {
            root: Box::new(root),
            position,
            tracker: MouseTracker::new(),
        }
    }

    pub fn root(&self) -> &dyn Item {
        self.root.as_ref()
    }

    pub fn root_mut(&mut self) -> &mut dyn Item {
        self.root.as_mut()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Measure the whole tree.  Call after changing any widget and
    /// before rendering.
    pub fn layout(&mut self, painter: &mut Painter) -> Size {
        self.root.measure(painter)
    }

    /// Draw the tree.  The painter must be between `begin` and `end`.
    pub fn render(&self, painter: &mut Painter) {
        self.root.render(painter, self.position, 0);
    }

    pub fn update(&mut self, elapsed: f32) {
        self.root.update(elapsed);
    }

    /// Deliver `event` (in window coordinates) to the tree.
    pub fn mouse_event(&mut self, event: &MouseEvent) -> bool {
        self.root.mouse_event(&event.translated(self.position))
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> bool {
        let events = self.tracker.cursor_moved(position);
        self.dispatch(&events)
    }

    pub fn button_pressed(&mut self, button: MouseButtons) -> bool {
        let events = self.tracker.button_pressed(button);
        self.dispatch(&events)
    }

    pub fn button_released(&mut self, button: MouseButtons) -> bool {
        let events = self.tracker.button_released(button);
        self.dispatch(&events)
    }

    fn dispatch(&mut self, events: &[MouseEvent]) -> bool {
        events
            .iter()
            .fold(false, |handled, event| self.mouse_event(event) || handled)
    }
}
