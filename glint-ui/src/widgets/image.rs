use glint_core::{Color, Rect, Size, Vec2};
use glint_render::PackedImage;

use super::{Align, Background, Item, Margins};
use crate::painter::Painter;

/// An image from the pixmap cache, drawn at its natural size.
#[derive(Debug)]
pub struct Image {
    /// Path relative to the images directory.
    pub source: String,
    pub color: Color,
    pub margins: Margins,
    pub alignment: Align,
    pub container_alignment: Align,
    pub background: Option<Background>,
    pub fixed_width: f32,
    pub fixed_height: f32,
    pixmap: Option<PackedImage>,
    size: Size,
}

impl Image {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            color: Color::WHITE,
            margins: Margins::default(),
            alignment: Align::default(),
            container_alignment: Align::default(),
            background: None,
            fixed_width: 0.0,
            fixed_height: 0.0,
            pixmap: None,
            size: Size::ZERO,
        }
    }

    pub fn pixmap(&self) -> Option<&PackedImage> {
        self.pixmap.as_ref()
    }
}

impl Item for Image {
    fn measure(&mut self, painter: &mut Painter) -> Size {
        self.pixmap = painter.pixmaps().pixmap(&self.source);
        let natural = self.margins.grow(
            self.pixmap
                .as_ref()
                .map_or(Size::ZERO, |p| Size::new(p.width as f32, p.height as f32)),
        );
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
        let Some(pixmap) = &self.pixmap else {
            return;
        };
        let available = self.margins.shrink(self.size);
        let natural = Size::new(pixmap.width as f32, pixmap.height as f32);
        let top_left = pos + self.margins.top_left();
        let image_pos = top_left + self.alignment.offset(available, natural);
        let rect = Rect::from_pos_size(image_pos, natural);

        let clipped = available.width < natural.width - 0.5 || available.height < natural.height - 0.5;
        if clipped {
            let clip = Rect::from_pos_size(top_left, available);
            painter.draw_pixmap_clipped(pixmap, rect, clip, self.color, depth + 1);
        } else {
            painter.draw_pixmap(pixmap, rect, self.color, depth + 1);
        }
    }
}
