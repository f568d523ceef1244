//! Retained widget tree.
//!
//! Every widget implements [`Item`].  Sizes are computed by an explicit
//! [`Item::measure`] pass (driven by [`Ui::layout`](crate::Ui::layout))
//! and cached; [`Item::render`] then draws at a position handed down by
//! the parent.  Backgrounds draw at the item's depth and contents at
//! `depth + 1`, so children always sort above their parent.

mod container;
mod image;
mod label;
mod rectangle;
mod scroll_area;
mod switch;
mod text;

pub use container::{Column, Container, Row};
pub use image::Image;
pub use label::Label;
pub use rectangle::Rectangle;
pub use scroll_area::ScrollArea;
pub use switch::Switch;
pub use text::{MultiLineText, TextLine};

use glint_core::{Color, Rect, Size, Vec2};

use crate::event::MouseEvent;
use crate::painter::Painter;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Placement of content inside a larger box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Align {
    pub h: HAlign,
    pub v: VAlign,
}

impl Align {
    pub const fn new(h: HAlign, v: VAlign) -> Self {
        Self { h, v }
    }

    pub const CENTER: Self = Self::new(HAlign::Center, VAlign::Center);

    /// Offset of a `content` box inside an `available` box.
    pub fn offset(self, available: Size, content: Size) -> Vec2 {
        Vec2::new(
            self.h_offset(available.width, content.width),
            self.v_offset(available.height, content.height),
        )
    }

    pub fn h_offset(self, available: f32, content: f32) -> f32 {
        match self.h {
            HAlign::Left => 0.0,
            HAlign::Center => 0.5 * (available - content),
            HAlign::Right => available - content,
        }
    }

    pub fn v_offset(self, available: f32, content: f32) -> f32 {
        match self.v {
            VAlign::Top => 0.0,
            VAlign::Center => 0.5 * (available - content),
            VAlign::Bottom => available - content,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub const fn uniform(m: f32) -> Self {
        Self { top: m, bottom: m, left: m, right: m }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// `outer` with the margins removed.
    pub fn shrink(&self, outer: Size) -> Size {
        Size::new(outer.width - self.horizontal(), outer.height - self.vertical())
    }

    /// `inner` with the margins added.
    pub fn grow(&self, inner: Size) -> Size {
        Size::new(inner.width + self.horizontal(), inner.height + self.vertical())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Shape {
    #[default]
    Rectangle,
    Capsule,
    RoundedRectangle(f32),
}

/// Fill drawn behind an item.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Background {
    pub color: Color,
    pub shape: Shape,
}

impl Background {
    pub const fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    pub const fn rect(color: Color) -> Self {
        Self::new(color, Shape::Rectangle)
    }

    pub fn draw(&self, painter: &mut Painter, rect: Rect, depth: i32) {
        match self.shape {
            Shape::Rectangle => painter.draw_rect(rect, self.color, depth),
            Shape::Capsule => painter.draw_capsule(rect, self.color, depth),
            Shape::RoundedRectangle(radius) => painter.draw_rounded_rect(rect, radius, self.color, depth),
        }
    }
}

/// A node in the widget tree.
pub trait Item {
    /// Lay the item (and its children) out and cache the resulting size.
    fn measure(&mut self, painter: &mut Painter) -> Size;

    /// Size computed by the last [`measure`](Item::measure).
    fn size(&self) -> Size;

    fn background(&self) -> Option<&Background> {
        None
    }

    /// Alignment requested from the parent container.
    fn container_alignment(&self) -> Align {
        Align::default()
    }

    /// Draw the item's contents at `pos`.
    fn render_contents(&self, painter: &mut Painter, pos: Vec2, depth: i32);

    /// Cull against the clip rectangle, then draw background and contents.
    fn render(&self, painter: &mut Painter, pos: Vec2, depth: i32) {
        let rect = Rect::from_pos_size(pos, self.size());
        if !painter.clip_rect().intersects(&rect) {
            return;
        }
        if let Some(background) = self.background() {
            background.draw(painter, rect, depth);
        }
        self.render_contents(painter, pos, depth);
    }

    /// Handle `event` (position relative to this item).  Returns `true`
    /// when consumed.
    fn mouse_event(&mut self, _event: &MouseEvent) -> bool {
        false
    }

    fn update(&mut self, _elapsed: f32) {}
}

/// Run `draw` with the painter clipped to `clip ∩ current clip`,
/// restoring the previous clip afterwards.
pub(crate) fn with_clip(painter: &mut Painter, clip: Rect, draw: impl FnOnce(&mut Painter)) {
    let previous = painter.clip_rect();
    painter.set_clip_rect(previous.intersection(&clip));
    draw(painter);
    painter.set_clip_rect(previous);
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_offsets() {
        let available = Size::new(100.0, 50.0);
        let content = Size::new(40.0, 10.0);
        assert_eq!(Align::default().offset(available, content), Vec2::new(0.0, 20.0));
        assert_eq!(Align::CENTER.offset(available, content), Vec2::new(30.0, 20.0));
        let br = Align::new(HAlign::Right, VAlign::Bottom);
        assert_eq!(br.offset(available, content), Vec2::new(60.0, 40.0));
    }

    #[test]
    fn test_margins() {
        let m = Margins { top: 1.0, bottom: 2.0, left: 3.0, right: 4.0 };
        assert_eq!(m.grow(Size::new(10.0, 10.0)), Size::new(17.0, 13.0));
        assert_eq!(m.shrink(Size::new(17.0, 13.0)), Size::new(10.0, 10.0));
        assert_eq!(m.top_left(), Vec2::new(3.0, 1.0));
    }
}
