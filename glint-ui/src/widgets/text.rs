use glint_core::{Color, Rect, Size, Vec2};
use glint_text::{Font, FontCache};

use super::{with_clip, Align, Background, Item, Margins};
use crate::painter::Painter;

/// One wrapped line and its advance width.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f32,
}

/// Text wrapped at spaces to a fixed width.
#[derive(Debug, Default)]
pub struct MultiLineText {
    pub text: String,
    pub font: Option<Font>,
    pub color: Color,
    pub margins: Margins,
    pub alignment: Align,
    pub container_alignment: Align,
    pub background: Option<Background>,
    /// Total width, margins included.  Lines wrap to fit inside it.
    pub fixed_width: f32,
    pub fixed_height: f32,
    resolved_font: Option<Font>,
    lines: Vec<TextLine>,
    content: Size,
    size: Size,
}

impl MultiLineText {
    pub fn new(text: impl Into<String>, fixed_width: f32) -> Self {
        Self {
            text: text.into(),
            color: Color::BLACK,
            fixed_width,
            ..Self::default()
        }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }
}

/// Greedy word wrap: break at the last space before the running width
/// exceeds `available`.  A word wider than `available` gets a line of
/// its own.
pub(crate) fn break_lines(fonts: &mut FontCache, font: &Font, text: &str, available: f32) -> Vec<TextLine> {
    let mut lines = Vec::new();
    if available < 0.0 {
        return lines;
    }

    #[derive(Clone, Copy)]
    struct Position {
        index: usize,
        x: f32,
    }

    let mut advance = |ch: char| fonts.glyph(font, ch).map_or(0.0, |g| g.advance);
    let space = advance(' ');
    let line = |start: Position, end: Position| TextLine {
        text: text[start.index..end.index].to_string(),
        width: end.x - start.x,
    };

    let mut row_start = Position { index: 0, x: 0.0 };
    let mut last_break: Option<Position> = None;
    let mut x = 0.0;

    for (index, ch) in text.char_indices() {
        if ch == ' ' {
            let here = Position { index, x };
            if x - row_start.x > available {
                match last_break {
                    Some(brk) => {
                        lines.push(line(row_start, brk));
                        row_start = Position { index: brk.index + 1, x: brk.x + space };
                        last_break = Some(here);
                    }
                    None => {
                        lines.push(line(row_start, here));
                        row_start = Position { index: index + 1, x: x + space };
                    }
                }
            } else {
                last_break = Some(here);
            }
        }
        x += advance(ch);
    }

    if row_start.index < text.len() {
        let end = Position { index: text.len(), x };
        match last_break {
            Some(brk) if x - row_start.x > available && brk.index >= row_start.index => {
                lines.push(line(row_start, brk));
                lines.push(line(Position { index: brk.index + 1, x: brk.x + space }, end));
            }
            _ => lines.push(line(row_start, end)),
        }
    }
    lines
}

impl Item for MultiLineText {
    fn measure(&mut self, painter: &mut Painter) -> Size {
        let font = self.font.clone().unwrap_or_else(|| painter.default_font().clone());
        let available = self.fixed_width - self.margins.horizontal();
        self.lines = break_lines(painter.fonts(), &font, &self.text, available);

        let width = self.lines.iter().map(|l| l.width).fold(0.0, f32::max);
        self.content = Size::new(width, self.lines.len() as f32 * font.pixel_height as f32);
        self.resolved_font = Some(font);

        let height = if self.fixed_height > 0.0 {
            self.fixed_height
        } else {
            self.content.height + self.margins.vertical()
        };
        self.size = Size::new(self.fixed_width, height);
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
        let line_height = font.pixel_height as f32;
        let draw = |painter: &mut Painter| {
            painter.set_font(font);
            let mut y = top_left.y + self.alignment.v_offset(available.height, self.content.height);
            for line in &self.lines {
                let x = top_left.x + self.alignment.h_offset(available.width, line.width);
                painter.draw_text(&line.text, Vec2::new(x, y), self.color, depth + 1);
                y += line_height;
            }
        };

        let clipped = available.width < self.content.width - 0.5 || available.height < self.content.height - 0.5;
        if clipped {
            with_clip(painter, Rect::from_pos_size(top_left, available), draw);
        } else {
            draw(painter);
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
