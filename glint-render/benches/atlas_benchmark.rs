//! Benchmarks for shelf packing and atlas growth.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glint_core::{PixelBuffer, PixelFormat};
use glint_render::TextureAtlas;

fn images(n: usize) -> Vec<PixelBuffer> {
    (0..n)
        .map(|i| {
            let w = 4 + (i * 7 % 29) as u32;
            let h = 4 + (i * 13 % 23) as u32;
            PixelBuffer::blank(w, h, PixelFormat::Grayscale)
        })
        .collect()
}

fn bench_add_pixmap(c: &mut Criterion) {
    let mut group = c.benchmark_group("atlas_add_pixmap");
    for &count in &[100, 1_000, 5_000] {
        let imgs = images(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &imgs, |b, imgs| {
            b.iter(|| {
                let mut atlas = TextureAtlas::new(512, 512, PixelFormat::Grayscale);
                for img in imgs {
                    black_box(atlas.add_pixmap(black_box(img)));
                }
                black_box(atlas.page_count());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_add_pixmap);
criterion_main!(benches);
