//! Vertex data types and the explicit attribute layout shared by every
//! sprite program.
//!
//! Vertices are interleaved as `position(2) | tex_coord(2) | color(4)`,
//! eight `f32`s per vertex.  Programs bind a subset of these attributes;
//! the layout table below is the single source of truth for offsets.

use bytemuck::{Pod, Zeroable};
use glint_core::{Color, Vec2};

// ── Attributes ──────────────────────────────────────────────────────

/// Named vertex attributes understood by the sprite programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    TexCoord,
    Color,
}

impl Attribute {
    /// Name used to look up the attribute location in a program.
    pub const fn name(self) -> &'static str {
        match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "tex_coord",
            Attribute::Color => "color",
        }
    }
}

/// Offset and width of one attribute inside [`SpriteVertex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexAttributeDesc {
    pub attribute: Attribute,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
    /// Number of `f32` components.
    pub components: u32,
}

/// Hand-written description of an interleaved vertex format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VertexLayout {
    /// Bytes between consecutive vertices.
    pub stride: u32,
    pub attributes: &'static [VertexAttributeDesc],
}

impl VertexLayout {
    /// Find the descriptor for `attribute`, if this layout carries it.
    pub fn attribute(&self, attribute: Attribute) -> Option<VertexAttributeDesc> {
        self.attributes.iter().copied().find(|a| a.attribute == attribute)
    }
}

// ── Sprite vertex ───────────────────────────────────────────────────

/// One interleaved vertex as written to the GPU buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    /// `f32`s per vertex.
    pub const FLOATS: usize = 8;
    /// Bytes per vertex.
    pub const SIZE: usize = std::mem::size_of::<SpriteVertex>();

    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: Self::SIZE as u32,
        attributes: &[
            VertexAttributeDesc { attribute: Attribute::Position, offset: 0, components: 2 },
            VertexAttributeDesc { attribute: Attribute::TexCoord, offset: 8, components: 2 },
            VertexAttributeDesc { attribute: Attribute::Color, offset: 16, components: 4 },
        ],
    };
}

/// One corner of a sprite quad before expansion to triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuadVertex {
    pub position: Vec2,
    pub tex_coord: Vec2,
    pub color: Color,
}

impl QuadVertex {
    pub fn new(position: Vec2, tex_coord: Vec2, color: Color) -> Self {
        Self { position, tex_coord, color }
    }
}

impl From<QuadVertex> for SpriteVertex {
    fn from(v: QuadVertex) -> Self {
        Self {
            position: [v.position.x, v.position.y],
            tex_coord: [v.tex_coord.x, v.tex_coord.y],
            color: v.color.to_array(),
        }
    }
}

/// Corner order used to split a quad into two triangles.
pub const QUAD_INDICES: [usize; 6] = [0, 1, 2, 2, 3, 0];

// ── Transform ───────────────────────────────────────────────────────

/// Column-major 4×4 matrix, as uploaded to the `mvp` uniform.
pub type Mat4 = [[f32; 4]; 4];

pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Orthographic projection mapping `(0, 0)` to the top-left corner and
/// `(width, height)` to the bottom-right corner of the viewport.
pub fn orthographic(width: f32, height: f32) -> Mat4 {
    let sx = 2.0 / width;
    let sy = -2.0 / height; // flip Y for top-left origin
    [
        [sx, 0.0, 0.0, 0.0],
        [0.0, sy, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0, 1.0],
    ]
}

// ===================================================================
// Tests
// ===================================================================
