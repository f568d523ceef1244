//! Mouse events and gesture synthesis.

use std::ops::{BitOr, BitOrAssign};

use glint_core::Vec2;

/// Set of held mouse buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MouseButtons(u8);

impl MouseButtons {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1 << 0);
    pub const MIDDLE: Self = Self(1 << 1);
    pub const RIGHT: Self = Self(1 << 2);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for MouseButtons {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MouseButtons {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    Press,
    Release,
    Click,
    DragBegin,
    DragMove,
    DragEnd,
}

/// A mouse event.  `position` is relative to the receiving item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub buttons: MouseButtons,
    pub position: Vec2,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, buttons: MouseButtons, position: Vec2) -> Self {
        Self { kind, buttons, position }
    }

    /// Same event with the position moved by `-offset`.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            position: self.position - offset,
            ..*self
        }
    }

    pub fn is_drag(&self) -> bool {
        matches!(
            self.kind,
            MouseEventKind::DragBegin | MouseEventKind::DragMove | MouseEventKind::DragEnd
        )
    }
}

/// Distance the cursor must travel with a button held before a press
/// turns into a drag.
pub const DRAG_THRESHOLD: f32 = 4.0;

/// Turns raw button and motion input into press, click and drag events.
#[derive(Debug, Default)]
pub struct MouseTracker {
    position: Vec2,
    buttons: MouseButtons,
    press_position: Option<Vec2>,
    dragging: bool,
}

impl MouseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn button_pressed(&mut self, button: MouseButtons) -> Vec<MouseEvent> {
        self.buttons |= button;
        if self.press_position.is_none() {
            self.press_position = Some(self.position);
        }
        vec![self.event(MouseEventKind::Press, self.position)]
    }

    pub fn cursor_moved(&mut self, position: Vec2) -> Vec<MouseEvent> {
        self.position = position;
        let Some(start) = self.press_position else {
            return Vec::new();
        };
        if self.dragging {
            return vec![self.event(MouseEventKind::DragMove, position)];
        }
        if (position - start).length() < DRAG_THRESHOLD {
            return Vec::new();
        }
        self.dragging = true;
        vec![
            self.event(MouseEventKind::DragBegin, start),
            self.event(MouseEventKind::DragMove, position),
        ]
    }

    pub fn button_released(&mut self, button: MouseButtons) -> Vec<MouseEvent> {
        let mut events = vec![self.event(MouseEventKind::Release, self.position)];
        if self.press_position.is_some() {
            let kind = if self.dragging {
                MouseEventKind::DragEnd
            } else {
                MouseEventKind::Click
            };
            events.push(self.event(kind, self.position));
        }
        self.buttons.remove(button);
        if self.buttons.is_empty() {
            self.press_position = None;
            self.dragging = false;
        }
        events
    }

    fn event(&self, kind: MouseEventKind, position: Vec2) -> MouseEvent {
        MouseEvent::new(kind, self.buttons, position)
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(events: &[MouseEvent]) -> Vec<MouseEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_press_release_is_click() {
        let mut tracker = MouseTracker::new();
        tracker.cursor_moved(Vec2::new(10.0, 10.0));
        assert_eq!(kinds(&tracker.button_pressed(MouseButtons::LEFT)), [MouseEventKind::Press]);
        tracker.cursor_moved(Vec2::new(11.0, 10.0));
        let events = tracker.button_released(MouseButtons::LEFT);
        assert_eq!(kinds(&events), [MouseEventKind::Release, MouseEventKind::Click]);
        assert_eq!(events[1].buttons, MouseButtons::LEFT);
    }

    #[test]
    fn test_drag_sequence() {
        let mut tracker = MouseTracker::new();
        tracker.cursor_moved(Vec2::new(10.0, 10.0));
        tracker.button_pressed(MouseButtons::LEFT);

        let events = tracker.cursor_moved(Vec2::new(10.0, 30.0));
        assert_eq!(kinds(&events), [MouseEventKind::DragBegin, MouseEventKind::DragMove]);
        assert_eq!(events[0].position, Vec2::new(10.0, 10.0));
        assert!(tracker.is_dragging());

        assert_eq!(kinds(&tracker.cursor_moved(Vec2::new(10.0, 31.0))), [MouseEventKind::DragMove]);
        let events = tracker.button_released(MouseButtons::LEFT);
        assert_eq!(kinds(&events), [MouseEventKind::Release, MouseEventKind::DragEnd]);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_motion_without_button_is_silent() {
        let mut tracker = MouseTracker::new();
        assert!(tracker.cursor_moved(Vec2::new(100.0, 100.0)).is_empty());
    }

    #[test]
    fn test_translated_event() {
        let e = MouseEvent::new(MouseEventKind::Click, MouseButtons::LEFT, Vec2::new(50.0, 40.0));
        assert_eq!(e.translated(Vec2::new(10.0, 10.0)).position, Vec2::new(40.0, 30.0));
        assert!(!e.is_drag());
    }

    #[test]
    fn test_buttons() {
        let mut b = MouseButtons::LEFT | MouseButtons::RIGHT;
        assert!(b.contains(MouseButtons::LEFT));
        assert!(!b.contains(MouseButtons::MIDDLE));
        b.remove(MouseButtons::LEFT);
        assert_eq!(b, MouseButtons::RIGHT);
    }
}
