//! CPU-side pixel storage.
//!
//! A [`PixelBuffer`] is a tightly packed, row-major image in one of two
//! formats.  Buffers handed to the atlas are read-only; atlas pages own a
//! mutable backing buffer that they write with [`PixelBuffer::blit`].

use crate::geometry::PixelRect;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PixelError {
    #[error("Pixel data is {actual} bytes, expected {expected} for {width}×{height} {format:?}")]
    SizeMismatch {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },
}

/// Pixel layout of a buffer or texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// One byte of coverage per pixel (glyph masks).
    Grayscale,
    /// Four bytes per pixel, 8-bit RGBA.
    Rgba,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Grayscale => 1,
            PixelFormat::Rgba => 4,
        }
    }
}

/// Owned row-major pixel data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `data`, checking it holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self, PixelError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(PixelError::SizeMismatch {
                width,
                height,
                format,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, format, data })
    }

    /// A zero-filled buffer.
    pub fn blank(width: u32, height: u32, format: PixelFormat) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel();
        Self { width, height, format, data: vec![0; len] }
    }

    /// A buffer with every pixel set to `pixel`.
    ///
    /// `pixel` must be `format.bytes_per_pixel()` bytes long; extra bytes
    /// are ignored and missing bytes are zero.
    pub fn filled(width: u32, height: u32, format: PixelFormat, pixel: &[u8]) -> Self {
        let bpp = format.bytes_per_pixel();
        let mut px = vec![0u8; bpp];
        for (dst, src) in px.iter_mut().zip(pixel) {
            *dst = *src;
        }
        let data = px.repeat(width as usize * height as usize);
        Self { width, height, format, data }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes in one row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// `true` when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Copy `src` into this buffer with its top-left corner at `(x, y)`.
    ///
    /// The caller guarantees matching formats and that the target region
    /// lies inside this buffer; rows falling outside are skipped.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        debug_assert_eq!(self.format, src.format);
        if src.is_empty() || x >= self.width || y >= self.height {
            return;
        }
        let bpp = self.format.bytes_per_pixel();
        let dst_stride = self.stride();
        let copy_w = src.width.min(self.width - x) as usize * bpp;
        let rows = src.height.min(self.height - y) as usize;
        for row in 0..rows {
            let s = row * src.stride();
            let d = (y as usize + row) * dst_stride + x as usize * bpp;
            self.data[d..d + copy_w].copy_from_slice(&src.data[s..s + copy_w]);
        }
    }

    /// Copy out the pixels under `rect` as a tightly packed buffer.
    pub fn sub_image(&self, rect: PixelRect) -> PixelBuffer {
        let bpp = self.format.bytes_per_pixel();
        let w = rect.width.min(self.width.saturating_sub(rect.x));
        let h = rect.height.min(self.height.saturating_sub(rect.y));
        let mut data = Vec::with_capacity(w as usize * h as usize * bpp);
        for row in 0..h as usize {
            let start = (rect.y as usize + row) * self.stride() + rect.x as usize * bpp;
            data.extend_from_slice(&self.data[start..start + w as usize * bpp]);
        }
        PixelBuffer { width: w, height: h, format: self.format, data }
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        assert!(PixelBuffer::new(2, 2, PixelFormat::Rgba, vec![0; 16]).is_ok());
        let err = PixelBuffer::new(2, 2, PixelFormat::Rgba, vec![0; 4]).unwrap_err();
        assert!(matches!(err, PixelError::SizeMismatch { expected: 16, actual: 4, .. }));
    }

    #[test]
    fn test_blank_and_filled() {
        let b = PixelBuffer::blank(3, 2, PixelFormat::Grayscale);
        assert_eq!(b.data().len(), 6);
        assert!(b.data().iter().all(|&p| p == 0));

        let f = PixelBuffer::filled(2, 1, PixelFormat::Rgba, &[1, 2, 3, 4]);
        assert_eq!(f.data(), &[1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_blit_places_rows() {
        let mut page = PixelBuffer::blank(4, 4, PixelFormat::Grayscale);
        let src = PixelBuffer::new(2, 2, PixelFormat::Grayscale, vec![1, 2, 3, 4]).unwrap();
        page.blit(&src, 1, 2);
        assert_eq!(
            page.data(),
            &[
                0, 0, 0, 0, //
                0, 0, 0, 0, //
                0, 1, 2, 0, //
                0, 3, 4, 0,
            ]
        );
    }

    #[test]
    fn test_sub_image() {
        let data: Vec<u8> = (0..16).collect();
        let page = PixelBuffer::new(4, 4, PixelFormat::Grayscale, data).unwrap();
        let sub = page.sub_image(PixelRect::new(1, 1, 2, 2));
        assert_eq!(sub.data(), &[5, 6, 9, 10]);
    }

    #[test]
    fn test_zero_size_is_empty() {
        let b = PixelBuffer::new(0, 5, PixelFormat::Rgba, vec![]).unwrap();
        assert!(b.is_empty());
    }
}
