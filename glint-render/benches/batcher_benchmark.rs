//! Benchmarks for sprite batching: sort, coalesce and vertex expansion.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glint_core::{Color, PixelBuffer, PixelFormat, Rect};
use glint_render::{
    PackedImage, RecordingBackend, RenderContext, ShaderLoader, ShaderProgram, SpriteBatcher,
    TextureAtlas,
};

fn context() -> RenderContext {
    RenderContext::new(Box::new(RecordingBackend::new()), ShaderLoader::Embedded)
}

fn glyphs(n: usize) -> Vec<PackedImage> {
    let mut atlas = TextureAtlas::new(256, 256, PixelFormat::Grayscale);
    (0..n)
        .filter_map(|i| {
            let w = 6 + (i % 7) as u32;
            let h = 9 + (i % 5) as u32;
            atlas.add_pixmap(&PixelBuffer::blank(w, h, PixelFormat::Grayscale))
        })
        .collect()
}

fn bench_flat_rects(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush_flat");
    for &count in &[100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut ctx = context();
            let mut batcher = SpriteBatcher::new();
            b.iter(|| {
                batcher.begin();
                for i in 0..count {
                    let fi = i as f32;
                    let rect = Rect::from_xywh((fi * 7.3) % 1920.0, (fi * 13.7) % 1080.0, 40.0, 20.0);
                    batcher.add_flat(&mut ctx, rect, Color::WHITE, (i % 4) as i32);
                }
                batcher.flush(&mut ctx);
                black_box(batcher.stats());
            });
        });
    }
    group.finish();
}

fn bench_mixed_text(c: &mut Criterion) {
    let packed = glyphs(200);
    c.bench_function("flush_mixed_text_5000", |b| {
        let mut ctx = context();
        let mut batcher = SpriteBatcher::new();
        b.iter(|| {
            batcher.begin();
            for i in 0..5_000 {
                let fi = i as f32;
                let rect = Rect::from_xywh((fi * 9.0) % 1920.0, (fi * 3.0) % 1080.0, 8.0, 12.0);
                if i % 10 == 0 {
                    batcher.set_batch_program(ShaderProgram::Flat);
                    batcher.add_flat(&mut ctx, rect, Color::BLACK, 0);
                } else {
                    batcher.set_batch_program(ShaderProgram::Text);
                    batcher.add_image(&mut ctx, &packed[i % packed.len()], rect, Color::WHITE, 1);
                }
            }
            batcher.flush(&mut ctx);
            black_box(batcher.stats());
        });
    });
}

criterion_group!(benches, bench_flat_rects, bench_mixed_text);
criterion_main!(benches);
