//! Sprite batcher: collects quads for a frame, sorts them to minimise
//! state changes and streams them to the GPU.
//!
//! ## Flush pipeline
//!
//! ```text
//!  pending sprites (insertion order)
//!       │  stable sort by (depth, texture, program)
//!       ▼
//!  runs of equal (texture, program)
//!       │  per run:
//!       │    expand quads → 6 vertices each → DynamicBuffer
//!       │    bind texture      (only if it changed)
//!       │    switch program    (only if it changed; re-enable attributes)
//!       ▼
//!  one draw_triangles per run
//! ```
//!
//! Untextured sprites sort before textured ones at the same depth.

use glint_core::{Color, Rect, Vec2};
use log::{error, trace, warn};

use crate::atlas::{AtlasTexture, PackedImage};
use crate::buffer::{DynamicBuffer, DEFAULT_CAPACITY_FLOATS};
use crate::context::RenderContext;
use crate::shaders::{ShaderProgram, Uniform};
use crate::vertex::{Attribute, Mat4, QuadVertex, SpriteVertex, IDENTITY, QUAD_INDICES};

/// Vertices emitted per quad.
const VERTICES_PER_QUAD: usize = 6;

/// One pending quad.
#[derive(Clone, Debug)]
struct Sprite {
    program: ShaderProgram,
    texture: Option<AtlasTexture>,
    corners: [QuadVertex; 4],
    depth: i32,
}

impl Sprite {
    fn texture_key(&self) -> Option<usize> {
        self.texture.as_ref().map(AtlasTexture::key)
    }
}

/// Counters accumulated since the last [`SpriteBatcher::begin`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub flushes: u32,
    pub draw_calls: u32,
    pub quads: u32,
}

/// Depth-sorting, state-coalescing quad batcher.
pub struct SpriteBatcher {
    sprites: Vec<Sprite>,
    max_quads: usize,
    buffer: DynamicBuffer,
    transform: Mat4,
    program: ShaderProgram,
    /// Reused vertex staging area.
    scratch: Vec<SpriteVertex>,
    /// Reused sort permutation.
    order: Vec<usize>,
    stats: BatchStats,
}

impl SpriteBatcher {
    /// Batcher backed by the default 4 MiB vertex buffer.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_FLOATS)
    }

    /// Batcher whose vertex buffer holds `capacity_floats` floats, raised
    /// to one quad when smaller.  The pending-quad limit is derived from it.
    pub fn with_capacity(capacity_floats: usize) -> Self {
        let quad_floats = VERTICES_PER_QUAD * SpriteVertex::FLOATS;
        if capacity_floats < quad_floats {
            warn!("Vertex buffer of {capacity_floats} float(s) cannot hold a quad; using {quad_floats}");
        }
        let capacity_floats = capacity_floats.max(quad_floats);
        let max_quads = capacity_floats / quad_floats;
        Self {
            sprites: Vec::new(),
            max_quads,
            buffer: DynamicBuffer::new(capacity_floats * std::mem::size_of::<f32>()),
            transform: IDENTITY,
            program: ShaderProgram::Flat,
            scratch: Vec::new(),
            order: Vec::new(),
            stats: BatchStats::default(),
        }
    }

    pub fn set_transform_matrix(&mut self, matrix: Mat4) {
        self.transform = matrix;
    }

    pub fn transform_matrix(&self) -> Mat4 {
        self.transform
    }

    /// Program attached to sprites added from now on.
    pub fn set_batch_program(&mut self, program: ShaderProgram) {
        self.program = program;
    }

    pub fn batch_program(&self) -> ShaderProgram {
        self.program
    }

    /// Most quads held before an implicit flush.
    pub fn max_quads(&self) -> usize {
        self.max_quads
    }

    pub fn pending(&self) -> usize {
        self.sprites.len()
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// The vertex buffer, for inspection.
    pub fn buffer(&self) -> &DynamicBuffer {
        &self.buffer
    }

    /// Start a frame: drop pending sprites and start a buffer generation.
    pub fn begin(&mut self) {
        self.sprites.clear();
        self.buffer.begin();
        self.stats = BatchStats::default();
    }

    /// Queue a solid rectangle.
    pub fn add_flat(&mut self, ctx: &mut RenderContext, rect: Rect, color: Color, depth: i32) {
        self.add_sprite(ctx, None, rect, Rect::default(), color, depth);
    }

    /// Queue `image` stretched over `rect`.
    pub fn add_image(&mut self, ctx: &mut RenderContext, image: &PackedImage, rect: Rect, color: Color, depth: i32) {
        self.add_sprite(ctx, Some(&image.texture), rect, image.tex_coord, color, depth);
    }

    /// Queue an axis-aligned quad covering `rect` with texture
    /// coordinates `tex_coord`.
    pub fn add_sprite(
        &mut self,
        ctx: &mut RenderContext,
        texture: Option<&AtlasTexture>,
        rect: Rect,
        tex_coord: Rect,
        color: Color,
        depth: i32,
    ) {
        let (p0, p1) = (rect.min, rect.max);
        let (t0, t1) = (tex_coord.min, tex_coord.max);
        let corners = [
            QuadVertex::new(p0, t0, color),
            QuadVertex::new(Vec2::new(p1.x, p0.y), Vec2::new(t1.x, t0.y), color),
            QuadVertex::new(p1, t1, color),
            QuadVertex::new(Vec2::new(p0.x, p1.y), Vec2::new(t0.x, t1.y), color),
        ];
        self.add_quad(ctx, texture, corners, depth);
    }

    /// Queue an arbitrary quad.  Corners go clockwise from top-left.
    pub fn add_quad(
        &mut self,
        ctx: &mut RenderContext,
        texture: Option<&AtlasTexture>,
        corners: [QuadVertex; 4],
        depth: i32,
    ) {
        if self.sprites.len() >= self.max_quads {
            self.flush(ctx);
        }
        self.sprites.push(Sprite {
            program: self.program,
            texture: texture.cloned(),
            corners,
            depth,
        });
    }

    /// Draw every pending sprite.  No-op when nothing is pending.
    pub fn flush(&mut self, ctx: &mut RenderContext) {
        if self.sprites.is_empty() {
            return;
        }

        self.order.clear();
        self.order.extend(0..self.sprites.len());
        let sprites = &self.sprites;
        self.order
            .sort_by_key(|&i| (sprites[i].depth, sprites[i].texture_key(), sprites[i].program));

        let backend = ctx.backend.as_mut();
        let shaders = &mut ctx.shaders;
        shaders.reset_current();

        let mut current_texture: Option<usize> = None;
        let mut current_program: Option<ShaderProgram> = None;
        let mut program_ready = false;
        let mut enabled: Vec<u32> = Vec::with_capacity(3);
        let mut draw_calls = 0;

        let mut start = 0;
        while start < self.order.len() {
            let head = &self.sprites[self.order[start]];
            let run_key = (head.texture_key(), head.program);
            let end = self.order[start..]
                .iter()
                .position(|&i| (self.sprites[i].texture_key(), self.sprites[i].program) != run_key)
                .map_or(self.order.len(), |n| start + n);

            // ── Vertex data ─────────────────────────────────────
            self.scratch.clear();
            for &i in &self.order[start..end] {
                let corners = &self.sprites[i].corners;
                self.scratch.extend(QUAD_INDICES.iter().map(|&c| SpriteVertex::from(corners[c])));
            }
            let offset = match self.buffer.write(backend, bytemuck::cast_slice(&self.scratch)) {
                Ok(offset) => offset,
                Err(e) => {
                    error!("Dropping {} quad(s): {e}", end - start);
                    start = end;
                    continue;
                }
            };

            // ── Texture ─────────────────────────────────────────
            if current_texture != run_key.0 {
                current_texture = run_key.0;
                match &head.texture {
                    Some(texture) => texture.bind(backend),
                    None => backend.bind_texture(None),
                }
            }

            // ── Program ─────────────────────────────────────────
            if current_program != Some(run_key.1) {
                for location in enabled.drain(..) {
                    backend.disable_attribute(location);
                }
                current_program = Some(run_key.1);
                program_ready = match shaders.use_program(backend, run_key.1) {
                    Some(program) => {
                        if let Some(loc) = program.uniform_location(Uniform::Mvp) {
                            backend.set_uniform_matrix(loc, &self.transform);
                        }
                        if let Some(loc) = program.uniform_location(Uniform::BaseColorTexture) {
                            backend.set_uniform_sampler(loc, 0);
                        }
                        for attribute in [Attribute::Position, Attribute::TexCoord, Attribute::Color] {
                            let (Some(loc), Some(desc)) = (
                                program.attribute_location(attribute),
                                SpriteVertex::LAYOUT.attribute(attribute),
                            ) else {
                                continue;
                            };
                            backend.enable_attribute(loc, desc, SpriteVertex::LAYOUT.stride);
                            enabled.push(loc);
                        }
                        true
                    }
                    None => false,
                };
            }

            // ── Draw ────────────────────────────────────────────
            if program_ready {
                let quads = end - start;
                backend.draw_triangles(
                    (offset / SpriteVertex::SIZE) as u32,
                    (quads * VERTICES_PER_QUAD) as u32,
                );
                draw_calls += 1;
                self.stats.quads += quads as u32;
            }
            start = end;
        }

        for location in enabled.drain(..) {
            backend.disable_attribute(location);
        }

        trace!("Flushed {} sprite(s) in {draw_calls} draw call(s)", self.sprites.len());
        self.stats.draw_calls += draw_calls;
        self.stats.flushes += 1;
        self.sprites.clear();
    }
}

impl Default for SpriteBatcher {
    fn default() -> Self {
        Self::new()
    }
}

// ===================================================================
// Tests
// ===================================================================
