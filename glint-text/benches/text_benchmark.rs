//! Benchmarks for glyph lookup and text measurement.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glint_core::{PixelBuffer, PixelFormat, Rect, Vec2};
use glint_text::{Font, FontCache, GlyphSource, LineMetrics, RasterizedGlyph};

struct Blocks;

impl GlyphSource for Blocks {
    fn metrics(&self) -> LineMetrics {
        LineMetrics { ascent: 12.0, descent: 4.0, line_gap: 0.0, pixel_height: 16 }
    }

    fn rasterize(&mut self, ch: char) -> Option<RasterizedGlyph> {
        let w = 4 + (ch as u32 % 9);
        Some(RasterizedGlyph {
            bitmap: PixelBuffer::filled(w, 12, PixelFormat::Grayscale, &[200]),
            bbox: Rect::new(Vec2::new(0.0, -12.0), Vec2::new(w as f32, 0.0)),
            advance: w as f32 + 1.0,
        })
    }
}

const TEXT: &str = "The quick brown fox jumps over the lazy dog. 0123456789";

fn bench_text_width(c: &mut Criterion) {
    let font = Font::new("blocks", 16);

    c.bench_function("text_width_warm", |b| {
        let mut fonts = FontCache::new("fonts", 512);
        fonts.insert_source(font.clone(), Box::new(Blocks));
        fonts.text_width(&font, TEXT);
        b.iter(|| black_box(fonts.text_width(&font, black_box(TEXT))));
    });

    c.bench_function("text_width_cold", |b| {
        b.iter(|| {
            let mut fonts = FontCache::new("fonts", 512);
            fonts.insert_source(font.clone(), Box::new(Blocks));
            black_box(fonts.text_width(&font, black_box(TEXT)))
        });
    });
}

criterion_group!(benches, bench_text_width);
criterion_main!(benches);
