use glint_core::{Rect, Size, Vec2};

use super::{Align, Background, Item, Margins};
use crate::event::{MouseEvent, MouseEventKind};
use crate::painter::Painter;

struct Child {
    item: Box<dyn Item>,
    offset: Vec2,
}

impl Child {
    fn rect(&self) -> Rect {
        Rect::from_pos_size(self.offset, self.item.size())
    }
}

/// Children, spacing and margins shared by [`Row`] and [`Column`].
///
/// A child that accepts `DragBegin` keeps receiving the drag until
/// `DragEnd`, wherever the cursor goes.
#[derive(Default)]
pub struct Container {
    pub margins: Margins,
    pub spacing: f32,
    pub background: Option<Background>,
    pub container_alignment: Align,
    children: Vec<Child>,
    grabbed: Option<usize>,
    size: Size,
}

impl Container {
    pub fn add_item(&mut self, item: Box<dyn Item>) {
        self.children.push(Child {
            item,
            offset: Vec2::ZERO,
        });
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Offset of child `index` relative to the container, as of the last
    /// measure.
    pub fn child_offset(&self, index: usize) -> Option<Vec2> {
        self.children.get(index).map(|c| c.offset)
    }

    pub fn child(&self, index: usize) -> Option<&dyn Item> {
        self.children.get(index).map(|c| c.item.as_ref())
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Item + 'static)> {
        self.children.get_mut(index).map(|c| c.item.as_mut())
    }

    fn total_spacing(&self) -> f32 {
        self.children.len().saturating_sub(1) as f32 * self.spacing
    }

    fn render_children(&self, painter: &mut Painter, pos: Vec2, depth: i32) {
        for child in &self.children {
            child.item.render(painter, pos + child.offset, depth + 1);
        }
    }

    fn update_children(&mut self, elapsed: f32) {
        for child in &mut self.children {
            child.item.update(elapsed);
        }
    }

    fn route_mouse_event(&mut self, event: &MouseEvent) -> bool {
        if let Some(index) = self.grabbed {
            if matches!(event.kind, MouseEventKind::DragMove | MouseEventKind::DragEnd) {
                if event.kind == MouseEventKind::DragEnd {
                    self.grabbed = None;
                }
                if let Some(child) = self.children.get_mut(index) {
                    return child.item.mouse_event(&event.translated(child.offset));
                }
            }
        }

        if !Rect::from_pos_size(Vec2::ZERO, self.size).contains(event.position) {
            return false;
        }
        for (index, child) in self.children.iter_mut().enumerate() {
            if !child.rect().contains(event.position) {
                continue;
            }
            if child.item.mouse_event(&event.translated(child.offset)) {
                if event.kind == MouseEventKind::DragBegin {
                    self.grabbed = Some(index);
                }
                return true;
            }
        }
        false
    }
}

macro_rules! container_item {
    ($ty:ty) => {
        impl $ty {
            pub fn add_item(&mut self, item: impl Item + 'static) {
                self.base.add_item(Box::new(item));
            }

            /// Builder form of [`add_item`](Self::add_item).
            pub fn with_item(mut self, item: impl Item + 'static) -> Self {
                self.add_item(item);
                self
            }

            pub fn with_margins(mut self, margins: Margins) -> Self {
                self.base.margins = margins;
                self
            }

            pub fn with_spacing(mut self, spacing: f32) -> Self {
                self.base.spacing = spacing;
                self
            }

            pub fn with_background(mut self, background: Background) -> Self {
                self.base.background = Some(background);
                self
            }

            pub fn container(&self) -> &Container {
                &self.base
            }

            pub fn container_mut(&mut self) -> &mut Container {
                &mut self.base
            }
        }

        impl Item for $ty {
            fn measure(&mut self, painter: &mut Painter) -> Size {
                for child in &mut self.base.children {
                    child.item.measure(painter);
                }
                self.base.size = self.layout();
                self.base.size
            }

            fn size(&self) -> Size {
                self.base.size
            }

            fn background(&self) -> Option<&Background> {
                self.base.background.as_ref()
            }

            fn container_alignment(&self) -> Align {
                self.base.container_alignment
            }

            fn render_contents(&self, painter: &mut Painter, pos: Vec2, depth: i32) {
                self.base.render_children(painter, pos, depth);
            }

            fn mouse_event(&mut self, event: &MouseEvent) -> bool {
                self.base.route_mouse_event(event)
            }

            fn update(&mut self, elapsed: f32) {
                self.base.update_children(elapsed);
            }
        }
    };
}

/// Stacks children top to bottom.
#[derive(Default)]
pub struct Column {
    base: Container,
    pub minimum_width: f32,
}

impl Column {
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the column from its (already measured) children and place
    /// each one, aligned horizontally by its container alignment.
    fn layout(&mut self) -> Size {
        let base = &mut self.base;
        let margins = base.margins;
        let mut inner = Size::new((self.minimum_width - margins.horizontal()).max(0.0), base.total_spacing());
        for child in &base.children {
            let size = child.item.size();
            inner.width = inner.width.max(size.width);
            inner.height += size.height;
        }

        let mut y = margins.top;
        for child in &mut base.children {
            let size = child.item.size();
            let x = child.item.container_alignment().h_offset(inner.width, size.width);
            child.offset = Vec2::new(margins.left + x, y);
            y += size.height + base.spacing;
        }
        margins.grow(inner)
    }
}

container_item!(Column);

/// Stacks children left to right.
#[derive(Default)]
pub struct Row {
    base: Container,
    pub minimum_height: f32,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    fn layout(&mut self) -> Size {
        let base = &mut self.base;
        let margins = base.margins;
        let mut inner = Size::new(base.total_spacing(), (self.minimum_height - margins.vertical()).max(0.0));
        for child in &base.children {
            let size = child.item.size();
            inner.width += size.width;
            inner.height = inner.height.max(size.height);
        }

        let mut x = margins.left;
        for child in &mut base.children {
            let size = child.item.size();
            let y = child.item.container_alignment().v_offset(inner.height, size.height);
            child.offset = Vec2::new(x, margins.top + y);
            x += size.width + base.spacing;
        }
        margins.grow(inner)
    }
}

container_item!(Row);
