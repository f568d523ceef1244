//! Font registry keyed by name and pixel height.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use glint_core::PixelFormat;
use glint_render::TextureAtlas;
use log::{error, info};

use crate::face::{FontFace, GlyphSource, LineMetrics};
use crate::glyphs::{Glyph, GlyphCache};

/// Default side length of a glyph atlas page.
pub const DEFAULT_GLYPH_PAGE_SIZE: u32 = 512;

/// A font face name at a pixel height.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Font {
    pub name: String,
    pub pixel_height: u32,
}

impl Font {
    pub fn new(name: impl Into<String>, pixel_height: u32) -> Self {
        Self {
            name: name.into(),
            pixel_height,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}px", self.name, self.pixel_height)
    }
}

/// Owns the glyph atlas and one [`GlyphCache`] per [`Font`].
///
/// Fonts load from `<fonts_dir>/<name>.ttf` on first use.  A font that
/// fails to load is logged once and remembered as absent.
pub struct FontCache {
    fonts_dir: PathBuf,
    atlas: TextureAtlas,
    caches: HashMap<Font, Option<GlyphCache>>,
}

impl FontCache {
    pub fn new(fonts_dir: impl AsRef<Path>, page_size: u32) -> Self {
        Self {
            fonts_dir: fonts_dir.as_ref().to_path_buf(),
            atlas: TextureAtlas::new(page_size, page_size, PixelFormat::Grayscale),
            caches: HashMap::new(),
        }
    }

    pub fn fonts_dir(&self) -> &Path {
        &self.fonts_dir
    }

    /// The shared grayscale glyph atlas.
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    /// Register an in-memory glyph source for `font`, replacing any
    /// cached entry.
    pub fn insert_source(&mut self, font: Font, source: Box<dyn GlyphSource>) {
        self.caches.insert(font, Some(GlyphCache::new(source)));
    }

    /// Whether `font` has been loaded successfully.
    pub fn is_loaded(&self, font: &Font) -> bool {
        matches!(self.caches.get(font), Some(Some(_)))
    }

    pub fn glyph(&mut self, font: &Font, ch: char) -> Option<&Glyph> {
        let cache = Self::entry(&mut self.caches, &self.fonts_dir, font)?;
        cache.glyph(&mut self.atlas, ch)
    }

    /// Line metrics of `font`, or `None` when it is unavailable.
    pub fn metrics(&mut self, font: &Font) -> Option<LineMetrics> {
        Self::entry(&mut self.caches, &self.fonts_dir, font).map(|c| c.metrics())
    }

    /// Width of `text` in `font`; zero when the font is unavailable.
    pub fn text_width(&mut self, font: &Font, text: &str) -> f32 {
        match Self::entry(&mut self.caches, &self.fonts_dir, font) {
            Some(cache) => cache.text_width(&mut self.atlas, text),
            None => 0.0,
        }
    }

    fn entry<'a>(
        caches: &'a mut HashMap<Font, Option<GlyphCache>>,
        fonts_dir: &Path,
        font: &Font,
    ) -> Option<&'a mut GlyphCache> {
        caches
            .entry(font.clone())
            .or_insert_with(|| {
                let path = fonts_dir.join(format!("{}.ttf", font.name));
                match FontFace::load(&path, font.pixel_height) {
                    Ok(face) => {
                        info!("Loaded font {font} from {}", path.display());
                        Some(GlyphCache::new(Box::new(face)))
                    }
                    Err(e) => {
                        error!("Failed to load font {font}: {e}");
                        None
                    }
                }
            })
            .as_mut()
    }
}

// ===================================================================
// Tests
// ===================================================================
