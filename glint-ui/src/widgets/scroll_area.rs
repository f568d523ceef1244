use glint_core::{Rect, Size, Vec2};

use super::{with_clip, Align, Background, Item, Margins};
use crate::event::{MouseEvent, MouseEventKind};
use crate::painter::Painter;

/// A fixed-size viewport onto a larger item, scrolled by dragging.
pub struct ScrollArea {
    pub viewport: Size,
    pub margins: Margins,
    pub background: Option<Background>,
    pub container_alignment: Align,
    content: Box<dyn Item>,
    /// Content position relative to the viewport; never positive.
    offset: Vec2,
    dragging: bool,
    content_grabbed: bool,
    last_drag_position: Vec2,
    size: Size,
}

impl ScrollArea {
    pub fn new(viewport: Size, content: impl Item + 'static) -> Self {
        Self {
            viewport,
            margins: Margins::default(),
            background: None,
            container_alignment: Align::default(),
            content: Box::new(content),
            offset: Vec2::ZERO,
            dragging: false,
            content_grabbed: false,
            last_drag_position: Vec2::ZERO,
            size: Size::ZERO,
        }
    }

    pub fn content(&self) -> &dyn Item {
        self.content.as_ref()
    }

    pub fn scroll_offset(&self) -> Vec2 {
        self.offset
    }

    /// Move the content by `delta`, keeping it covering the viewport.
    pub fn scroll_by(&mut self, delta: Vec2) {
        let content = self.content.size();
        let min = Vec2::new(
            (self.viewport.width - content.width).min(0.0),
            (self.viewport.height - content.height).min(0.0),
        );
        self.offset = (self.offset + delta).max(min).min(Vec2::ZERO);
    }

    fn content_origin(&self) -> Vec2 {
        self.margins.top_left() + self.offset
    }
}

impl Item for ScrollArea {
    fn measure(&mut self, painter: &mut Painter) -> Size {
        self.content.measure(painter);
        self.scroll_by(Vec2::ZERO);
        self.size = self.margins.grow(self.viewport);
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
        let viewport_pos = pos + self.margins.top_left();
        let viewport = Rect::from_pos_size(viewport_pos, self.viewport);
        with_clip(painter, viewport, |painter| {
            self.content.render(painter, viewport_pos + self.offset, depth + 1);
        });
    }

    fn mouse_event(&mut self, event: &MouseEvent) -> bool {
        let inside = Rect::from_pos_size(Vec2::ZERO, self.size).contains(event.position);
        let content_event = event.translated(self.content_origin());
        match event.kind {
            MouseEventKind::DragBegin => {
                if !inside {
                    return false;
                }
                if self.content.mouse_event(&content_event) {
                    self.content_grabbed = true;
                } else {
                    self.dragging = true;
                    self.last_drag_position = event.position;
                }
                true
            }
            MouseEventKind::DragMove => {
                if self.content_grabbed {
                    self.content.mouse_event(&content_event)
                } else if self.dragging {
                    self.scroll_by(event.position - self.last_drag_position);
                    self.last_drag_position = event.position;
                    true
                } else {
                    false
                }
            }
            MouseEventKind::DragEnd => {
                let handled = if self.content_grabbed {
                    self.content.mouse_event(&content_event)
                } else {
                    self.dragging
                };
                self.dragging = false;
                self.content_grabbed = false;
                handled
            }
            _ => inside && self.content.mouse_event(&content_event),
        }
    }

    fn update(&mut self, elapsed: f32) {
        self.content.update(elapsed);
    }
}
