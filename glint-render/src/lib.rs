//! # glint-render
//!
//! Sprite batching and texture atlasing for Glint, on top of a small GPU
//! seam with a `wgpu` implementation.
//!
//! ## Architecture
//!
//! ```text
//!  Painter (glint-ui)
//!       │  add_sprite / add_image / add_quad
//!       ▼
//!  SpriteBatcher ──── sort + coalesce ────▶ DynamicBuffer (orphaning)
//!       │                                        │
//!       │  bind(page)                            │ write
//!       ▼                                        ▼
//!  TextureAtlas pages ──────────────────▶ dyn GpuBackend
//!                                      (WgpuBackend | RecordingBackend)
//! ```
//!
//! ## Crate modules
//!
//! - [`backend`]: the `GpuBackend` trait and its implementations
//! - [`vertex`]: vertex layout and projection helpers
//! - [`shaders`]: lazily built program cache
//! - [`buffer`]: streaming vertex buffer
//! - [`packer`]: shelf packer for one atlas page
//! - [`atlas`]: multi-page texture atlas
//! - [`batcher`]: the sprite batcher
//! - [`context`]: backend plus shader cache, passed explicitly

pub mod atlas;
pub mod backend;
pub mod batcher;
pub mod buffer;
pub mod context;
pub mod packer;
pub mod shaders;
pub mod vertex;

// Re-exports for convenience
pub use atlas::{AtlasTexture, PackedImage, TextureAtlas};
pub use backend::{FrameStats, GpuBackend, GpuContext, RecordingBackend, WgpuBackend};
pub use batcher::{BatchStats, SpriteBatcher};
pub use buffer::DynamicBuffer;
pub use context::RenderContext;
pub use packer::BinPacker;
pub use shaders::{ShaderLoader, ShaderManager, ShaderProgram};
pub use vertex::{orthographic, Mat4, QuadVertex, SpriteVertex};
