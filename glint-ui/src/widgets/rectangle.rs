use glint_core::{Size, Vec2};

use super::{Align, Background, Item};
use crate::painter::Painter;

/// A fixed-size box, drawn only through its background.
#[derive(Debug, Default)]
pub struct Rectangle {
    pub size: Size,
    pub background: Option<Background>,
    pub container_alignment: Align,
}

impl Rectangle {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Size::new(width, height),
            ..Self::default()
        }
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }
}

impl Item for Rectangle {
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

    fn render_contents(&self, _painter: &mut Painter, _pos: Vec2, _depth: i32) {}
}
