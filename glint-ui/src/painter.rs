//! Immediate-mode drawing front end.
//!
//! The painter culls against the current clip rectangle, picks the
//! shader program for each primitive and hands quads to the
//! [`SpriteBatcher`].  Rounded shapes are composed from patches of the
//! circle program: texture coordinates `(0,0)..(1,1)` span the whole
//! disc, so a patch mapping to `0.5` on an axis stretches the disc's
//! centre line.

use glint_core::{Color, PixelRect, Rect, Size, Vec2};
use glint_render::{orthographic, PackedImage, RenderContext, ShaderProgram, SpriteBatcher};
use glint_text::{Font, FontCache};
use log::warn;

use crate::config::UiConfig;
use crate::pixmaps::PixmapCache;

/// Owns the render context, the batcher and the glyph and image caches.
pub struct Painter {
    ctx: RenderContext,
    batcher: SpriteBatcher,
    fonts: FontCache,
    pixmaps: PixmapCache,
    default_font: Font,
    font: Option<Font>,
    clip_rect: Rect,
    window: Size,
}

impl Painter {
    pub fn new(ctx: RenderContext, config: &UiConfig) -> Self {
        Self {
            ctx,
            batcher: SpriteBatcher::with_capacity(config.vertex_buffer_floats),
            fonts: FontCache::new(config.fonts_dir(), config.glyph_page_size),
            pixmaps: PixmapCache::new(config.images_dir(), config.pixmap_page_size),
            default_font: config.default_font(),
            font: None,
            clip_rect: Rect::default(),
            window: Size::ZERO,
        }
    }

    // ── Frame ──────────────────────────────────────────────────────

    /// Start a frame covering `window`: reset the font, clip to the whole
    /// window and start a new batch.
    pub fn begin(&mut self, window: Size) {
        self.set_window_size(window.width, window.height);
        self.font = None;
        self.batcher.begin();
        self.set_clip_rect(Rect::from_pos_size(Vec2::ZERO, window));
    }

    /// Draw everything still pending.
    pub fn end(&mut self) {
        self.batcher.flush(&mut self.ctx);
    }

    /// Update the projection so `(0, 0)` is the top-left of a
    /// `width`×`height` window.
    pub fn set_window_size(&mut self, width: f32, height: f32) {
        self.window = Size::new(width, height);
        self.batcher.set_transform_matrix(orthographic(width, height));
    }

    pub fn window_size(&self) -> Size {
        self.window
    }

    // ── State ──────────────────────────────────────────────────────

    pub fn set_font(&mut self, font: &Font) {
        self.font = Some(font.clone());
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    /// Font used by widgets that were not given one.
    pub fn default_font(&self) -> &Font {
        &self.default_font
    }

    /// Flush pending primitives and restrict drawing to `rect`.
    pub fn set_clip_rect(&mut self, rect: Rect) {
        self.clip_rect = rect;
        self.batcher.flush(&mut self.ctx);
        self.ctx.backend.set_scissor(scissor(rect));
    }

    pub fn clip_rect(&self) -> Rect {
        self.clip_rect
    }

    pub fn fonts(&mut self) -> &mut FontCache {
        &mut self.fonts
    }

    pub fn pixmaps(&mut self) -> &mut PixmapCache {
        &mut self.pixmaps
    }

    pub fn context(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    pub fn batcher(&self) -> &SpriteBatcher {
        &self.batcher
    }

    // ── Primitives ─────────────────────────────────────────────────

    pub fn draw_rect(&mut self, rect: Rect, color: Color, depth: i32) {
        if !self.clip_rect.intersects(&rect) {
            return;
        }
        self.batcher.set_batch_program(ShaderProgram::Flat);
        self.batcher.add_flat(&mut self.ctx, rect, color, depth);
    }

    pub fn draw_pixmap(&mut self, pixmap: &PackedImage, rect: Rect, color: Color, depth: i32) {
        if !self.clip_rect.intersects(&rect) {
            return;
        }
        self.batcher.set_batch_program(ShaderProgram::Decal);
        self.batcher.add_image(&mut self.ctx, pixmap, rect, color, depth);
    }

    /// Draw the part of `pixmap` (stretched over `rect`) that falls inside
    /// `clip`, with texture coordinates remapped to the visible part.
    pub fn draw_pixmap_clipped(&mut self, pixmap: &PackedImage, rect: Rect, clip: Rect, color: Color, depth: i32) {
        let visible = rect.intersection(&clip);
        if visible.is_empty() || !self.clip_rect.intersects(&visible) {
            return;
        }
        let tc = pixmap.tex_coord;
        let tex_pos = |p: Vec2| {
            (p - rect.min)
                .scale(tc.max - tc.min)
                .div_by(rect.max - rect.min)
                + tc.min
        };
        let tex_coord = Rect::new(tex_pos(visible.min), tex_pos(visible.max));
        self.batcher.set_batch_program(ShaderProgram::Decal);
        self.batcher
            .add_sprite(&mut self.ctx, Some(&pixmap.texture), visible, tex_coord, color, depth);
    }

    /// Draw a single line of text with its top edge at `pos.y`.
    pub fn draw_text(&mut self, text: &str, pos: Vec2, color: Color, depth: i32) {
        let Some(font) = self.font.as_ref() else {
            warn!("draw_text called with no font set");
            return;
        };
        let ascent = self.fonts.metrics(font).map_or(0.0, |m| m.ascent);
        self.batcher.set_batch_program(ShaderProgram::Text);

        let mut pen = Vec2::new(pos.x, pos.y + ascent);
        for ch in text.chars() {
            let Some(glyph) = self.fonts.glyph(font, ch) else {
                continue;
            };
            if let Some(image) = &glyph.image {
                let rect = glyph.bbox.translated(pen);
                if self.clip_rect.intersects(&rect) {
                    self.batcher.add_image(&mut self.ctx, image, rect, color, depth);
                }
            }
            pen.x += glyph.advance;
        }
    }

    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, depth: i32) {
        let r = Vec2::new(radius, radius);
        let rect = Rect::new(center - r, center + r);
        if !self.clip_rect.intersects(&rect) {
            return;
        }
        self.batcher.set_batch_program(ShaderProgram::Circle);
        self.patch(rect, Rect::from_xywh(0.0, 0.0, 1.0, 1.0), color, depth);
    }

    /// A rectangle with fully rounded ends along its longer axis.
    pub fn draw_capsule(&mut self, rect: Rect, color: Color, depth: i32) {
        if !self.clip_rect.intersects(&rect) {
            return;
        }
        self.batcher.set_batch_program(ShaderProgram::Circle);
        let center = rect.center();

        if rect.width() > rect.height() {
            let radius = 0.5 * rect.height();
            let xs = [rect.min.x, rect.min.x + radius, rect.max.x - radius, rect.max.x];
            let (y0, y1) = (center.y - radius, center.y + radius);
            let us = [(0.0, 0.5), (0.5, 0.5), (0.5, 1.0)];
            for (i, (u0, u1)) in us.into_iter().enumerate() {
                let quad = Rect::new(Vec2::new(xs[i], y0), Vec2::new(xs[i + 1], y1));
                self.patch(quad, Rect::new(Vec2::new(u0, 0.0), Vec2::new(u1, 1.0)), color, depth);
            }
        } else {
            let radius = 0.5 * rect.width();
            let ys = [rect.min.y, rect.min.y + radius, rect.max.y - radius, rect.max.y];
            let (x0, x1) = (center.x - radius, center.x + radius);
            let vs = [(0.0, 0.5), (0.5, 0.5), (0.5, 1.0)];
            for (i, (v0, v1)) in vs.into_iter().enumerate() {
                let quad = Rect::new(Vec2::new(x0, ys[i]), Vec2::new(x1, ys[i + 1]));
                self.patch(quad, Rect::new(Vec2::new(0.0, v0), Vec2::new(1.0, v1)), color, depth);
            }
        }
    }

    /// A rectangle with quarter-circle corners of `corner_radius`, clamped
    /// to half the smaller side.
    pub fn draw_rounded_rect(&mut self, rect: Rect, corner_radius: f32, color: Color, depth: i32) {
        if !self.clip_rect.intersects(&rect) {
            return;
        }
        self.batcher.set_batch_program(ShaderProgram::Circle);
        let radius = corner_radius.min(0.5 * rect.width()).min(0.5 * rect.height());

        let xs = [rect.min.x, rect.min.x + radius, rect.max.x - radius, rect.max.x];
        let ys = [rect.min.y, rect.min.y + radius, rect.max.y - radius, rect.max.y];
        let ts = [(0.0, 0.5), (0.5, 0.5), (0.5, 1.0)];

        for (row, (v0, v1)) in ts.into_iter().enumerate() {
            for (col, (u0, u1)) in ts.into_iter().enumerate() {
                let quad = Rect::new(Vec2::new(xs[col], ys[row]), Vec2::new(xs[col + 1], ys[row + 1]));
                let tex = Rect::new(Vec2::new(u0, v0), Vec2::new(u1, v1));
                self.patch(quad, tex, color, depth);
            }
        }
    }

    fn patch(&mut self, rect: Rect, tex_coord: Rect, color: Color, depth: i32) {
        self.batcher
            .add_sprite(&mut self.ctx, None, rect, tex_coord, color, depth);
    }
}

/// Whole-pixel scissor for `rect`, clamped at the window origin.
fn scissor(rect: Rect) -> PixelRect {
    let x = rect.min.x.max(0.0);
    let y = rect.min.y.max(0.0);
    PixelRect::new(
        x as u32,
        y as u32,
        (rect.max.x - x).max(0.0) as u32,
        (rect.max.y - y).max(0.0) as u32,
    )
}

// ===================================================================
// Tests
// ===================================================================
