//! Texture atlas: a growable list of packed pages, each backed by one
//! lazily created GPU texture.
//!
//! ```text
//!  add_pixmap(image)
//!       │
//!       ├─▶ page 0 ─ insert? ──▶ PackedImage { tex_coord, texture: page 0 }
//!       ├─▶ page 1 ─ insert? ──▶ …
//!       └─▶ new page (appended) ─ insert
//!
//!  batcher bind(texture)
//!       │
//!       └─▶ create GPU texture (first bind) or upload dirty region
//! ```
//!
//! Pages are shared between the atlas and every [`PackedImage`] placed
//! on them; packed coordinates stay valid for the atlas lifetime.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use glint_core::{PixelBuffer, PixelFormat, PixelRect, Rect, Vec2};
use log::{debug, error, warn};

use crate::backend::{GpuBackend, TextureId};
use crate::packer::BinPacker;

/// One atlas page: packer plus the GPU texture mirroring it.
struct AtlasPage {
    packer: RefCell<BinPacker>,
    texture: Cell<Option<TextureId>>,
}

/// Shared handle to an atlas page texture.
///
/// Equality is by identity: two handles are equal when
/// they refer to the same page.
#[derive(Clone)]
pub struct AtlasTexture(Rc<AtlasPage>);

impl AtlasTexture {
    fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self(Rc::new(AtlasPage {
            packer: RefCell::new(BinPacker::new(width, height, format)),
            texture: Cell::new(None),
        }))
    }

    /// Identity key, stable for the page lifetime.
    pub fn key(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// GPU texture backing this page, if it has been bound at least once.
    pub fn texture_id(&self) -> Option<TextureId> {
        self.0.texture.get()
    }

    /// `true` when pixels were added since the last upload.
    pub fn is_dirty(&self) -> bool {
        self.0.texture.get().is_none() || self.0.packer.borrow().dirty_region().is_some()
    }

    /// Make the page current on `backend`, creating the GPU texture on
    /// first use and uploading any region packed since the last bind.
    pub fn bind(&self, backend: &mut dyn GpuBackend) {
        let mut packer = self.0.packer.borrow_mut();
        let id = match self.0.texture.get() {
            Some(id) => {
                if let Some(region) = packer.take_dirty() {
                    backend.upload_texture(id, region, packer.pixels());
                }
                id
            }
            None => {
                let id = backend.create_texture(packer.width(), packer.height(), packer.format());
                let whole = PixelRect::new(0, 0, packer.width(), packer.height());
                backend.upload_texture(id, whole, packer.pixels());
                packer.take_dirty();
                self.0.texture.set(Some(id));
                id
            }
        };
        backend.bind_texture(Some(id));
    }

    fn insert(&self, image: &PixelBuffer) -> Option<PixelRect> {
        self.0.packer.borrow_mut().insert(image)
    }

    fn size(&self) -> (u32, u32) {
        let p = self.0.packer.borrow();
        (p.width(), p.height())
    }
}

impl PartialEq for AtlasTexture {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for AtlasTexture {}

impl fmt::Debug for AtlasTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtlasTexture")
            .field("key", &self.key())
            .field("texture", &self.texture_id())
            .finish()
    }
}

/// An image placed in an atlas.
#[derive(Clone, Debug, PartialEq)]
pub struct PackedImage {
    pub width: u32,
    pub height: u32,
    /// Normalised `[0, 1]` texture coordinates on `texture`.
    pub tex_coord: Rect,
    pub texture: AtlasTexture,
}

/// Append-only collection of atlas pages sharing one size and format.
pub struct TextureAtlas {
    page_width: u32,
    page_height: u32,
    format: PixelFormat,
    pages: Vec<AtlasTexture>,
}

impl TextureAtlas {
    pub fn new(page_width: u32, page_height: u32, format: PixelFormat) -> Self {
        Self {
            page_width,
            page_height,
            format,
            pages: Vec::new(),
        }
    }

    pub fn page_width(&self) -> u32 {
        self.page_width
    }

    pub fn page_height(&self) -> u32 {
        self.page_height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Texture handle of page `index`.
    pub fn page(&self, index: usize) -> Option<&AtlasTexture> {
        self.pages.get(index)
    }

    /// Run `f` with read access to the packer of page `index`.
    pub fn with_page<R>(&self, index: usize, f: impl FnOnce(&BinPacker) -> R) -> Option<R> {
        self.pages.get(index).map(|p| f(&p.0.packer.borrow()))
    }

    /// Pack `image` into the first page with room, appending one page if
    /// none has any.
    pub fn add_pixmap(&mut self, image: &PixelBuffer) -> Option<PackedImage> {
        if image.format() != self.format {
            warn!(
                "Atlas expects {:?} pixels, got {:?}",
                self.format,
                image.format()
            );
            return None;
        }
        if image.width() > self.page_width || image.height() > self.page_height {
            warn!(
                "Image {}×{} is larger than atlas page {}×{}",
                image.width(),
                image.height(),
                self.page_width,
                self.page_height
            );
            return None;
        }

        for page in &self.pages {
            if let Some(rect) = page.insert(image) {
                return Some(Self::packed(page, image, rect));
            }
        }

        let page = AtlasTexture::new(self.page_width, self.page_height, self.format);
        let Some(rect) = page.insert(image) else {
            error!(
                "Image {}×{} did not fit on a fresh {}×{} page",
                image.width(),
                image.height(),
                self.page_width,
                self.page_height
            );
            return None;
        };
        self.pages.push(page.clone());
        debug!("Atlas grew to {} page(s)", self.pages.len());
        Some(Self::packed(&page, image, rect))
    }

    fn packed(page: &AtlasTexture, image: &PixelBuffer, rect: PixelRect) -> PackedImage {
        let (w, h) = page.size();
        let inv = Vec2::new(1.0 / w as f32, 1.0 / h as f32);
        let min = Vec2::new(rect.x as f32, rect.y as f32).scale(inv);
        let max = Vec2::new(rect.right() as f32, rect.bottom() as f32).scale(inv);
        PackedImage {
            width: image.width(),
            height: image.height(),
            tex_coord: Rect::new(min, max),
            texture: page.clone(),
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
