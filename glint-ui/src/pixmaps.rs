//! Image cache backed by an RGBA atlas.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glint_core::{PixelBuffer, PixelError, PixelFormat};
use glint_render::{PackedImage, TextureAtlas};
use log::{debug, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageLoadError {
    #[error(transparent)]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Pixels(#[from] PixelError),
}

/// Decode the image at `path` into RGBA8 pixels.
pub fn load_image(path: impl AsRef<Path>) -> Result<PixelBuffer, ImageLoadError> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, PixelFormat::Rgba, rgba.into_raw())?)
}

/// Images keyed by source name, packed on first use.
///
/// `pixmap("icons/ok.png")` loads `<images_dir>/icons/ok.png`.  Load and
/// packing failures are logged once and remembered as absent.
pub struct PixmapCache {
    images_dir: PathBuf,
    atlas: TextureAtlas,
    pixmaps: HashMap<String, Option<PackedImage>>,
}

impl PixmapCache {
    pub fn new(images_dir: impl AsRef<Path>, page_size: u32) -> Self {
        Self {
            images_dir: images_dir.as_ref().to_path_buf(),
            atlas: TextureAtlas::new(page_size, page_size, PixelFormat::Rgba),
            pixmaps: HashMap::new(),
        }
    }

    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    pub fn pixmap(&mut self, source: &str) -> Option<PackedImage> {
        if let Some(cached) = self.pixmaps.get(source) {
            return cached.clone();
        }
        let path = self.images_dir.join(source);
        let packed = match load_image(&path) {
            Ok(pixels) => {
                debug!("Loaded image {} ({}×{})", path.display(), pixels.width(), pixels.height());
                self.atlas.add_pixmap(&pixels)
            }
            Err(e) => {
                warn!("Failed to load image {}: {e}", path.display());
                None
            }
        };
        self.pixmaps.insert(source.to_string(), packed.clone());
        packed
    }

    /// Pack in-memory `pixels` under `source`, replacing any cached entry.
    pub fn insert(&mut self, source: &str, pixels: &PixelBuffer) -> Option<PackedImage> {
        let packed = self.atlas.add_pixmap(pixels);
        self.pixmaps.insert(source.to_string(), packed.clone());
        packed
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn red(w: u32, h: u32) -> PixelBuffer {
        PixelBuffer::filled(w, h, PixelFormat::Rgba, &[255, 0, 0, 255])
    }

    #[test]
    fn test_missing_image_cached_as_absent() {
        let mut cache = PixmapCache::new("/nonexistent/glint/images", 64);
        assert!(cache.pixmap("nope.png").is_none());
        assert!(cache.pixmap("nope.png").is_none());
        assert_eq!(cache.atlas().page_count(), 0);
    }

    #[test]
    fn test_inserted_image_is_returned() {
        let mut cache = PixmapCache::new("/nonexistent/glint/images", 64);
        let packed = cache.insert("red", &red(16, 8)).unwrap();
        assert_eq!((packed.width, packed.height), (16, 8));
        assert_eq!(cache.pixmap("red"), Some(packed));
    }

    #[test]
    fn test_grayscale_rejected() {
        let mut cache = PixmapCache::new("/nonexistent/glint/images", 64);
        let gray = PixelBuffer::blank(4, 4, PixelFormat::Grayscale);
        assert!(cache.insert("gray", &gray).is_none());
        assert!(cache.pixmap("gray").is_none());
    }

    #[test]
    fn test_decodes_png_from_disk() {
        let dir = std::env::temp_dir().join(format!("glint-pixmaps-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let img = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        img.save(dir.join("tiny.png")).unwrap();

        let mut cache = PixmapCache::new(&dir, 64);
        let packed = cache.pixmap("tiny.png").unwrap();
        assert_eq!((packed.width, packed.height), (3, 2));

        let pixels = load_image(dir.join("tiny.png")).unwrap();
        assert_eq!(&pixels.data()[..4], &[1, 2, 3, 4]);
        std::fs::remove_dir_all(&dir).ok();
    }
}
