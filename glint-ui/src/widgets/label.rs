use glint_core::{Color, Rect, Size, Vec2};
use glint_text::Font;
use log::debug;

use super::{with_clip, Align, Background, Item, Margins};
use crate::event::{MouseEvent, MouseEventKind};
use crate::painter::Painter;

/// A single line of text.
///
/// With a fixed width or height smaller than the text, the label clips
/// its contents to the area inside the margins.
#[derive(Debug, Default)]
pub struct Label {
    pub text: String,
    /// `None` uses the painter's default font.
    pub font: Option<Font>,
    pub color: Color,
    pub margins: Margins,
    pub alignment: Align,
    pub container_alignment: Align,
    pub background: Option<Background>,
    /// Overrides the measured width when positive.
    pub fixed_width: f32,
    /// Overrides the measured height when positive.
    pub fixed_height: f32,
    resolved_font: Option<Font>,
    content: Size,
    size: Size,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: Color::BLACK,
            ..Self::default()
        }
    }

    pub fn with_font(font: Font, text: impl Into<String>) -> Self {
        Self {
            font: Some(font),
            ..Self::new(text)
        }
    }

    /// Size of the text as of the last measure.
    pub fn content_size(&self) -> Size {
        self.content
    }
}

impl Item for Label {
    fn measure(&mut self, painter: &mut Painter) -> Size {
        let font = self.font.clone().unwrap_or_else(|| painter.default_font().clone());
        let width = painter.fonts().text_width(&font, &self.text);
        self.content = Size::new(width, font.pixel_height as f32);
        self.resolved_font = Some(font);

        let natural = self.margins.grow(self.content);
        self.size = Size::new(
            if self.fixed_width > 0.0 { self.fixed_width } else { natural.width },
            if self.fixed_height > 0.0 { self.fixed_height } else { natural.height },
        );
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
        let Some(font) = &self.resolved_font else {
            return;
        };
        let available = self.margins.shrink(self.size);
        if available.width < 0.0 || available.height < 0.0 {
            return;
        }

        let top_left = pos + self.margins.top_left();
        let text_pos = top_left + self.alignment.offset(available, self.content);
        let draw = |painter: &mut Painter| {
            painter.set_font(font);
            painter.draw_text(&self.text, text_pos, self.color, depth + 1);
        };

        let clipped = available.width < self.content.width - 0.5 || available.height < self.content.height - 0.5;
        if clipped {
            with_clip(painter, Rect::from_pos_size(top_left, available), draw);
        } else {
            draw(painter);
        }
    }

    fn mouse_event(&mut self, event: &MouseEvent) -> bool {
        if event.kind == MouseEventKind::Click {
            debug!("Clicked label {:?}", self.text);
        }
        false
    }
}
