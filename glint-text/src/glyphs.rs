//! Per-face glyph cache.

use std::collections::HashMap;

use glint_core::Rect;
use glint_render::{PackedImage, TextureAtlas};
use log::{trace, warn};

use crate::face::{GlyphSource, LineMetrics};

/// A rasterised glyph ready for drawing.
#[derive(Clone, Debug)]
pub struct Glyph {
    /// Bitmap bounds relative to the pen on the baseline.
    pub bbox: Rect,
    pub advance: f32,
    /// `None` for blank glyphs and for glyphs that did not fit the atlas.
    pub image: Option<PackedImage>,
}

/// Glyphs of one face at one pixel height, rasterised on first request
/// and packed into a shared atlas.
pub struct GlyphCache {
    source: Box<dyn GlyphSource>,
    metrics: LineMetrics,
    glyphs: HashMap<char, Option<Glyph>>,
}

impl GlyphCache {
    pub fn new(source: Box<dyn GlyphSource>) -> Self {
        let metrics = source.metrics();
        Self {
            source,
            metrics,
            glyphs: HashMap::new(),
        }
    }

    pub fn metrics(&self) -> LineMetrics {
        self.metrics
    }

    /// Number of characters looked up so far, including missing ones.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The glyph for `ch`, rasterising and packing it into `atlas` on
    /// first use.  `None` when the face has no such glyph.
    pub fn glyph(&mut self, atlas: &mut TextureAtlas, ch: char) -> Option<&Glyph> {
        let source = &mut self.source;
        self.glyphs
            .entry(ch)
            .or_insert_with(|| {
                let raster = source.rasterize(ch)?;
                let image = if raster.bitmap.is_empty() {
                    None
                } else {
                    let packed = atlas.add_pixmap(&raster.bitmap);
                    if packed.is_none() {
                        warn!("Glyph {ch:?} could not be packed, drawing without bitmap");
                    }
                    packed
                };
                trace!("Cached glyph {ch:?} advance {}", raster.advance);
                Some(Glyph {
                    bbox: raster.bbox,
                    advance: raster.advance,
                    image,
                })
            })
            .as_ref()
    }

    /// Sum of the advances of every glyph in `text` the face can render.
    pub fn text_width(&mut self, atlas: &mut TextureAtlas, text: &str) -> f32 {
        text.chars()
            .filter_map(|ch| self.glyph(atlas, ch).map(|g| g.advance))
            .sum()
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::face::RasterizedGlyph;
    use glint_core::{PixelBuffer, PixelFormat, Vec2};

    /// Renders every ASCII letter as a solid `w`×`h` block; space is blank.
    pub(crate) struct BlockGlyphs {
        pub width: u32,
        pub height: u32,
        pub rasterized: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl BlockGlyphs {
        pub(crate) fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                rasterized: Default::default(),
            }
        }
    }

    impl GlyphSource for BlockGlyphs {
        fn metrics(&self) -> LineMetrics {
            LineMetrics {
                ascent: self.height as f32,
                descent: 2.0,
                line_gap: 1.0,
                pixel_height: self.height,
            }
        }

        fn rasterize(&mut self, ch: char) -> Option<RasterizedGlyph> {
            self.rasterized.set(self.rasterized.get() + 1);
            let advance = self.width as f32 + 1.0;
            match ch {
                ' ' => Some(RasterizedGlyph {
                    bitmap: PixelBuffer::blank(0, 0, PixelFormat::Grayscale),
                    bbox: Rect::default(),
                    advance,
                }),
                c if c.is_ascii_alphanumeric() => Some(RasterizedGlyph {
                    bitmap: PixelBuffer::filled(self.width, self.height, PixelFormat::Grayscale, &[255]),
                    bbox: Rect::new(
                        Vec2::new(0.0, -(self.height as f32)),
                        Vec2::new(self.width as f32, 0.0),
                    ),
                    advance,
                }),
                _ => None,
            }
        }
    }

    fn atlas() -> TextureAtlas {
        TextureAtlas::new(64, 64, PixelFormat::Grayscale)
    }

    #[test]
    fn test_glyph_rasterised_once() {
        let source = BlockGlyphs::new(8, 10);
        let count = source.rasterized.clone();
        let mut cache = GlyphCache::new(Box::new(source));
        let mut atlas = atlas();

        let first = cache.glyph(&mut atlas, 'a').unwrap().clone();
        let again = cache.glyph(&mut atlas, 'a').unwrap().clone();
        assert_eq!(count.get(), 1);
        assert_eq!(first.image, again.image);
        assert_eq!(first.advance, 9.0);
        assert_eq!(atlas.page_count(), 1);
    }

    #[test]
    fn test_blank_glyph_has_no_image() {
        let mut cache = GlyphCache::new(Box::new(BlockGlyphs::new(8, 10)));
        let mut atlas = atlas();
        let space = cache.glyph(&mut atlas, ' ').unwrap();
        assert!(space.image.is_none());
        assert_eq!(space.advance, 9.0);
        assert_eq!(atlas.page_count(), 0);
    }

    #[test]
    fn test_missing_glyph_is_cached_as_absent() {
        let source = BlockGlyphs::new(8, 10);
        let count = source.rasterized.clone();
        let mut cache = GlyphCache::new(Box::new(source));
        let mut atlas = atlas();
        assert!(cache.glyph(&mut atlas, '€').is_none());
        assert!(cache.glyph(&mut atlas, '€').is_none());
        assert_eq!(count.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_text_width_skips_missing_glyphs() {
        let mut cache = GlyphCache::new(Box::new(BlockGlyphs::new(8, 10)));
        let mut atlas = atlas();
        assert_eq!(cache.text_width(&mut atlas, "ab c"), 36.0);
        assert_eq!(cache.text_width(&mut atlas, "a€b"), 18.0);
        assert_eq!(cache.text_width(&mut atlas, ""), 0.0);
    }

    #[test]
    fn test_oversized_glyph_keeps_advance() {
        let mut cache = GlyphCache::new(Box::new(BlockGlyphs::new(100, 10)));
        let mut atlas = atlas();
        let glyph = cache.glyph(&mut atlas, 'W').unwrap();
        assert!(glyph.image.is_none());
        assert_eq!(glyph.advance, 101.0);
    }
}
