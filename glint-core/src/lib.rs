//! # glint-core
//!
//! Plain data types shared by every Glint crate: points, rectangles,
//! colours and CPU pixel buffers.  Nothing here touches the GPU.
//!
//! ## Crate modules
//!
//! - [`geometry`]: `Vec2`, `Size`, `Rect`, `PixelRect`
//! - [`color`]: linear RGBA colour
//! - [`pixels`]: `PixelFormat` and `PixelBuffer`

pub mod color;
pub mod geometry;
pub mod pixels;

// Re-exports for convenience
pub use color::Color;
pub use geometry::{PixelRect, Rect, Size, Vec2};
pub use pixels::{PixelBuffer, PixelError, PixelFormat};
