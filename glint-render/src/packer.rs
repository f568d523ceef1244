//! Shelf bin packer for a single atlas page.
//!
//! The page is filled top to bottom with horizontal shelves.  A shelf's
//! height is fixed by the image that opened it; later images go on the
//! first shelf that still has room for their width and is at least as
//! tall.  Placements are never moved.
//!
//! ```text
//!  y=0  ┌────┬───┬──┬────────────┐
//!       │ A  │ B │C │  free      │  shelf 0 (height of A)
//!  y=h0 ├────┴──┬┴──┴──┬─────────┤
//!       │  D    │  E   │  free   │  shelf 1 (height of D)
//!       ├───────┴──────┴─────────┤
//!       │          free          │
//!       └────────────────────────┘
//! ```

use glint_core::{PixelBuffer, PixelFormat, PixelRect};

/// One horizontal strip of the page.
#[derive(Clone, Copy, Debug)]
struct Shelf {
    y: u32,
    height: u32,
    /// Next free X position.
    cursor_x: u32,
}

/// Packs images into one fixed-size page and keeps the page pixels.
#[derive(Debug)]
pub struct BinPacker {
    pixels: PixelBuffer,
    shelves: Vec<Shelf>,
    /// Union of placements not yet uploaded.
    dirty: Option<PixelRect>,
}

impl BinPacker {
    /// Create an empty `width × height` page.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            pixels: PixelBuffer::blank(width, height, format),
            shelves: Vec::new(),
            dirty: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.pixels.format()
    }

    /// The whole page, including placed images.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn shelf_count(&self) -> usize {
        self.shelves.len()
    }

    /// `true` until the first non-empty image is placed.
    pub fn is_empty(&self) -> bool {
        self.shelves.is_empty()
    }

    /// Region changed since the last [`take_dirty`](Self::take_dirty).
    pub fn dirty_region(&self) -> Option<PixelRect> {
        self.dirty
    }

    /// Return and clear the dirty region.
    pub fn take_dirty(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    /// Place `image` on the page and copy its pixels in.
    ///
    /// Returns the placement in page pixels, or `None` when the format
    /// differs or there is no room.
    pub fn insert(&mut self, image: &PixelBuffer) -> Option<PixelRect> {
        if image.format() != self.format() {
            return None;
        }
        if image.is_empty() {
            return Some(PixelRect::new(0, 0, image.width(), image.height()));
        }

        let rect = self.allocate(image.width(), image.height())?;
        self.pixels.blit(image, rect.x, rect.y);
        self.dirty = Some(match self.dirty {
            Some(d) => d.union(&rect),
            None => rect,
        });
        Some(rect)
    }

    fn allocate(&mut self, width: u32, height: u32) -> Option<PixelRect> {
        let page_w = self.width();
        let page_h = self.height();

        for shelf in &mut self.shelves {
            if height <= shelf.height && page_w - shelf.cursor_x >= width {
                let rect = PixelRect::new(shelf.cursor_x, shelf.y, width, height);
                shelf.cursor_x += width;
                return Some(rect);
            }
        }

        let y = self.shelves.last().map(|s| s.y + s.height).unwrap_or(0);
        if width > page_w || y + height > page_h {
            return None;
        }
        self.shelves.push(Shelf {
            y,
            height,
            cursor_x: width,
        });
        Some(PixelRect::new(0, y, width, height))
    }
}

// ===================================================================
// Tests
// ===================================================================
