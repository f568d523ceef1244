//! Packing properties over mixed image sizes.

use glint_core::{PixelBuffer, PixelFormat, PixelRect};
use glint_render::{BinPacker, TextureAtlas};

/// Deterministic pseudo-random sizes in `1..=max`.
fn sizes(n: usize, max: u32) -> Vec<(u32, u32)> {
    let mut state: u32 = 0x9e37_79b9;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let w = state % max + 1;
            let h = (state / max) % max + 1;
            (w, h)
        })
        .collect()
}

#[test]
fn placements_never_overlap_and_stay_in_bounds() {
    let mut page = BinPacker::new(128, 128, PixelFormat::Grayscale);
    let mut placed: Vec<PixelRect> = Vec::new();
    for (w, h) in sizes(200, 24) {
        if let Some(r) = page.insert(&PixelBuffer::blank(w, h, PixelFormat::Grayscale)) {
            assert!(r.right() <= 128 && r.bottom() <= 128);
            assert_eq!((r.width, r.height), (w, h));
            for other in &placed {
                assert!(!r.intersects(other), "{r:?} overlaps {other:?}");
            }
            placed.push(r);
        }
    }
    assert!(!placed.is_empty());
}

#[test]
fn failed_insert_leaves_page_unchanged() {
    let mut page = BinPacker::new(32, 32, PixelFormat::Grayscale);
    page.insert(&PixelBuffer::blank(20, 20, PixelFormat::Grayscale)).unwrap();
    page.take_dirty();
    let shelves = page.shelf_count();
    assert!(page.insert(&PixelBuffer::blank(20, 20, PixelFormat::Grayscale)).is_none());
    assert_eq!(page.shelf_count(), shelves);
    assert_eq!(page.dirty_region(), None);
}

#[test]
fn atlas_grows_one_page_at_a_time() {
    let mut atlas = TextureAtlas::new(64, 64, PixelFormat::Rgba);
    for (w, h) in sizes(300, 40) {
        let before = atlas.page_count();
        let packed = atlas
            .add_pixmap(&PixelBuffer::blank(w, h, PixelFormat::Rgba))
            .expect("every image fits a page");
        assert!(atlas.page_count() <= before + 1);
        assert!(packed.tex_coord.min.x >= 0.0 && packed.tex_coord.max.x <= 1.0);
        assert!(packed.tex_coord.min.y >= 0.0 && packed.tex_coord.max.y <= 1.0);
    }
    assert!(atlas.page_count() > 1);
}

#[test]
fn three_glyphs_then_large_image_opens_second_page() {
    let mut atlas = TextureAtlas::new(32, 32, PixelFormat::Grayscale);
    let glyph = PixelBuffer::filled(10, 10, PixelFormat::Grayscale, &[1]);
    let a = atlas.add_pixmap(&glyph).unwrap();
    let b = atlas.add_pixmap(&glyph).unwrap();
    let c = atlas.add_pixmap(&glyph).unwrap();
    assert!(a.tex_coord.max.x <= b.tex_coord.min.x);
    assert!(b.tex_coord.max.x <= c.tex_coord.min.x);
    assert_eq!(atlas.page_count(), 1);

    let big = atlas
        .add_pixmap(&PixelBuffer::filled(30, 30, PixelFormat::Grayscale, &[1]))
        .unwrap();
    assert_eq!(atlas.page_count(), 2);
    assert_eq!(Some(&big.texture), atlas.page(1));
}
