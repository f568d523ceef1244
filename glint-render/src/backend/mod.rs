//! The GPU seam.
//!
//! Everything above this module (shader cache, atlas, batcher, painter)
//! talks to the GPU only through [`GpuBackend`].  Two implementations
//! ship with the crate:
//!
//! - [`RecordingBackend`]: records calls for tests and benchmarks.
//! - [`WgpuBackend`]: drives a real device through `wgpu`.

mod context;
mod gpu;
mod recording;

pub use self::context::{GpuContext, GpuError};
pub use self::gpu::WgpuBackend;
pub use self::recording::{Command, CommandLog, RecordingBackend};

use crate::vertex::{Mat4, VertexAttributeDesc, VertexLayout};
use glint_core::{Color, PixelBuffer, PixelFormat, PixelRect};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to build program '{label}': {message}")]
    ProgramBuild { label: String, message: String },
    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("No surface attached")]
    NoSurface,
}

/// Opaque handle to a linked GPU program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Opaque handle to a GPU texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Binds a named attribute to a fixed location when a program is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeBinding {
    pub name: &'static str,
    pub location: u32,
}

/// Everything needed to build one program.
#[derive(Clone, Debug)]
pub struct ProgramDesc<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    pub attributes: &'a [AttributeBinding],
    pub layout: VertexLayout,
}

/// Per-frame counters reported by [`GpuBackend::end_frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub vertices: u32,
    pub texture_uploads: u32,
}

/// Low-level GPU operations used by the renderer.
///
/// The trait is object safe; the renderer holds a `Box<dyn GpuBackend>`.
pub trait GpuBackend {
    // ── Programs ────────────────────────────────────────────────────

    /// Compile and link a program.  On failure the error carries the
    /// compiler diagnostic.
    fn create_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle, BackendError>;
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;
    fn use_program(&mut self, program: ProgramHandle);
    fn set_uniform_matrix(&mut self, location: u32, matrix: &Mat4);
    fn set_uniform_sampler(&mut self, location: u32, unit: u32);

    // ── Textures ────────────────────────────────────────────────────

    fn create_texture(&mut self, width: u32, height: u32, format: PixelFormat) -> TextureId;
    /// Upload the `region` of `pixels` into the same region of `texture`.
    /// `pixels` covers the whole texture.
    fn upload_texture(&mut self, texture: TextureId, region: PixelRect, pixels: &PixelBuffer);
    fn bind_texture(&mut self, texture: Option<TextureId>);

    // ── Vertex data ─────────────────────────────────────────────────

    /// Replace the current vertex buffer with a fresh allocation of
    /// `size` bytes.  Data still referenced by in-flight draws stays
    /// valid.
    fn allocate_vertex_buffer(&mut self, size: usize);
    fn write_vertex_buffer(&mut self, offset: usize, data: &[u8]);
    fn enable_attribute(&mut self, location: u32, desc: VertexAttributeDesc, stride: u32);
    fn disable_attribute(&mut self, location: u32);

    // ── Drawing ─────────────────────────────────────────────────────

    fn draw_triangles(&mut self, first_vertex: u32, vertex_count: u32);
    /// Restrict drawing to `rect`, in pixels with a top-left origin.
    fn set_scissor(&mut self, rect: PixelRect);

    // ── Frame ───────────────────────────────────────────────────────

    fn resize(&mut self, width: u32, height: u32);
    fn begin_frame(&mut self, clear: Color) -> Result<(), BackendError>;
    fn end_frame(&mut self) -> Result<FrameStats, BackendError>;
}
