//! # glint-text
//!
//! Glyph rasterisation and caching for Glint.
//!
//! Glyphs are rasterised on first use by a [`GlyphSource`] (normally a
//! `swash`-backed [`FontFace`]) and packed into a shared grayscale
//! [`TextureAtlas`](glint_render::TextureAtlas) owned by the
//! [`FontCache`].

pub mod cache;
pub mod face;
pub mod glyphs;

pub use cache::{Font, FontCache, DEFAULT_GLYPH_PAGE_SIZE};
pub use face::{FontError, FontFace, GlyphSource, LineMetrics, RasterizedGlyph};
pub use glyphs::{Glyph, GlyphCache};
