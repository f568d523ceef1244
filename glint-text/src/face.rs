//! Font faces and glyph rasterisation.
//!
//! [`GlyphSource`] is the seam between the glyph cache and whatever
//! produces glyph bitmaps.  [`FontFace`] implements it with `swash`,
//! rendering outlines to 8-bit coverage masks at a fixed pixel height.

use std::path::{Path, PathBuf};

use glint_core::{PixelBuffer, PixelFormat, Rect, Vec2};
use log::warn;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::{zeno, CacheKey, FontRef};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Not a usable font file: {0}")]
    InvalidFont(String),
}

/// Vertical metrics of a face at its pixel height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line (positive).
    pub descent: f32,
    pub line_gap: f32,
    pub pixel_height: u32,
}

impl LineMetrics {
    /// Baseline-to-baseline distance.
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }
}

/// A glyph bitmap with its placement relative to the pen position.
#[derive(Clone, Debug)]
pub struct RasterizedGlyph {
    /// Grayscale coverage; may be empty (e.g. space).
    pub bitmap: PixelBuffer,
    /// Bitmap bounds relative to the pen on the baseline, Y down.
    pub bbox: Rect,
    pub advance: f32,
}

/// Produces glyph bitmaps for one face at one size.
pub trait GlyphSource {
    fn metrics(&self) -> LineMetrics;
    /// Rasterise `ch`, or `None` when the face has no glyph for it.
    fn rasterize(&mut self, ch: char) -> Option<RasterizedGlyph>;
}

/// A font file rasterised with `swash`.
pub struct FontFace {
    data: Vec<u8>,
    offset: u32,
    key: CacheKey,
    pixel_height: u32,
    context: ScaleContext,
}

impl FontFace {
    /// Load the first face of the font at `path`.
    pub fn load(path: impl AsRef<Path>, pixel_height: u32) -> Result<Self, FontError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, pixel_height)
            .map_err(|_| FontError::InvalidFont(path.display().to_string()))
    }

    /// Parse the first face in `data`.
    pub fn from_bytes(data: Vec<u8>, pixel_height: u32) -> Result<Self, FontError> {
        let font = FontRef::from_index(&data, 0)
            .ok_or_else(|| FontError::InvalidFont(format!("{} bytes", data.len())))?;
        let (offset, key) = (font.offset, font.key);
        Ok(Self {
            data,
            offset,
            key,
            pixel_height,
            context: ScaleContext::new(),
        })
    }

    pub fn pixel_height(&self) -> u32 {
        self.pixel_height
    }

    fn font(&self) -> FontRef<'_> {
        FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        }
    }
}

impl GlyphSource for FontFace {
    fn metrics(&self) -> LineMetrics {
        let m = self.font().metrics(&[]).scale(self.pixel_height as f32);
        LineMetrics {
            ascent: m.ascent,
            descent: m.descent,
            line_gap: m.leading,
            pixel_height: self.pixel_height,
        }
    }

    fn rasterize(&mut self, ch: char) -> Option<RasterizedGlyph> {
        let font = FontRef {
            data: &self.data,
            offset: self.offset,
            key: self.key,
        };
        let glyph_id = font.charmap().map(ch);
        if glyph_id == 0 {
            return None;
        }
        let size = self.pixel_height as f32;
        let advance = font.glyph_metrics(&[]).scale(size).advance_width(glyph_id);

        let mut scaler = self.context.builder(font).size(size).hint(true).build();
        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(zeno::Format::Alpha)
        .render(&mut scaler, glyph_id);

        let (bitmap, bbox) = match image {
            Some(image) => {
                let p = image.placement;
                let bitmap = match PixelBuffer::new(p.width, p.height, PixelFormat::Grayscale, image.data) {
                    Ok(bitmap) => bitmap,
                    Err(e) => {
                        warn!("Discarding bitmap for {ch:?}: {e}");
                        PixelBuffer::blank(0, 0, PixelFormat::Grayscale)
                    }
                };
                let min = Vec2::new(p.left as f32, -p.top as f32);
                let max = min + Vec2::new(bitmap.width() as f32, bitmap.height() as f32);
                (bitmap, Rect::new(min, max))
            }
            None => (PixelBuffer::blank(0, 0, PixelFormat::Grayscale), Rect::default()),
        };

        Some(RasterizedGlyph { bitmap, bbox, advance })
    }
}
