//! End-to-end batching against the recording backend.

use glint_core::{Color, PixelBuffer, PixelFormat, Rect};
use glint_render::backend::{Command, CommandLog, RecordingBackend};
use glint_render::{RenderContext, ShaderLoader, ShaderProgram, SpriteBatcher, SpriteVertex, TextureAtlas};

fn context() -> (RenderContext, CommandLog) {
    let backend = RecordingBackend::new();
    let log = backend.log();
    (RenderContext::new(Box::new(backend), ShaderLoader::Embedded), log)
}

fn cell(i: usize) -> Rect {
    Rect::from_xywh((i % 10) as f32 * 8.0, (i / 10) as f32 * 8.0, 8.0, 8.0)
}

#[test]
fn five_rects_then_three_glyphs() {
    let (mut ctx, log) = context();
    let mut glyphs = TextureAtlas::new(32, 32, PixelFormat::Grayscale);
    let glyph = glyphs
        .add_pixmap(&PixelBuffer::filled(10, 10, PixelFormat::Grayscale, &[200]))
        .unwrap();

    let mut batcher = SpriteBatcher::new();
    batcher.begin();
    batcher.set_batch_program(ShaderProgram::Flat);
    for i in 0..5 {
        batcher.add_flat(&mut ctx, cell(i), Color::BLACK, 0);
    }
    batcher.set_batch_program(ShaderProgram::Text);
    for i in 0..3 {
        batcher.add_image(&mut ctx, &glyph, cell(i), Color::WHITE, 1);
    }
    batcher.flush(&mut ctx);

    let draws = log.draws();
    assert_eq!(draws.len(), 2);
    assert_eq!(draws[0].1, 5 * 6);
    assert_eq!(draws[1].1, 3 * 6);

    // The Flat program is bound before the Text program.
    let commands = log.commands();
    let use_positions: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Command::UseProgram(_)))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(use_positions.len(), 2);
    let draw_positions: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, Command::DrawTriangles { .. }))
        .map(|(i, _)| i)
        .collect();
    assert!(use_positions[0] < draw_positions[0]);
    assert!(draw_positions[0] < use_positions[1]);
}

#[test]
fn depth_order_is_respected_across_textures() {
    let (mut ctx, log) = context();
    let mut images = TextureAtlas::new(16, 16, PixelFormat::Rgba);
    let a = images.add_pixmap(&PixelBuffer::blank(16, 16, PixelFormat::Rgba)).unwrap();
    let b = images.add_pixmap(&PixelBuffer::blank(16, 16, PixelFormat::Rgba)).unwrap();

    let mut batcher = SpriteBatcher::new();
    batcher.begin();
    batcher.set_batch_program(ShaderProgram::Decal);
    batcher.add_image(&mut ctx, &b, cell(0), Color::WHITE, 2);
    batcher.add_image(&mut ctx, &a, cell(1), Color::WHITE, 0);
    batcher.add_image(&mut ctx, &b, cell(2), Color::WHITE, 1);
    batcher.flush(&mut ctx);

    // Sorted: a@0, b@1, b@2.  The two `b` quads are adjacent and merge.
    assert_eq!(log.draws(), vec![(0, 6), (6, 12)]);

    let data = log.vertex_data();
    let quad_x = |quad: usize| -> f32 {
        let start = quad * 6 * SpriteVertex::SIZE;
        let v: SpriteVertex = bytemuck::pod_read_unaligned(&data[start..start + SpriteVertex::SIZE]);
        v.position[0]
    };
    assert_eq!(quad_x(0), cell(1).min.x);
    assert_eq!(quad_x(1), cell(2).min.x);
    assert_eq!(quad_x(2), cell(0).min.x);
}

#[test]
fn many_quads_stream_through_small_buffer() {
    let (mut ctx, log) = context();
    // Four quads per buffer.
    let mut batcher = SpriteBatcher::with_capacity(4 * 6 * SpriteVertex::FLOATS);
    batcher.begin();
    for i in 0..10 {
        batcher.add_flat(&mut ctx, cell(i), Color::WHITE, 0);
    }
    batcher.flush(&mut ctx);

    let total: u32 = log.draws().iter().map(|(_, n)| n).sum();
    assert_eq!(total, 60);
    assert!(log
        .draws()
        .iter()
        .all(|(first, count)| (first + count) as usize <= 4 * 6));
    assert_eq!(batcher.stats().quads, 10);
}

#[test]
fn second_frame_uploads_only_new_glyphs() {
    let (mut ctx, log) = context();
    let mut glyphs = TextureAtlas::new(64, 64, PixelFormat::Grayscale);
    let first = glyphs
        .add_pixmap(&PixelBuffer::filled(8, 8, PixelFormat::Grayscale, &[255]))
        .unwrap();

    let mut batcher = SpriteBatcher::new();
    batcher.set_batch_program(ShaderProgram::Text);
    batcher.begin();
    batcher.add_image(&mut ctx, &first, cell(0), Color::WHITE, 0);
    batcher.flush(&mut ctx);
    log.clear();

    let second = glyphs
        .add_pixmap(&PixelBuffer::filled(5, 7, PixelFormat::Grayscale, &[255]))
        .unwrap();
    batcher.begin();
    batcher.add_image(&mut ctx, &second, cell(1), Color::WHITE, 0);
    batcher.flush(&mut ctx);

    let uploads: Vec<_> = log
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::UploadTexture { region, .. } => Some(region),
            _ => None,
        })
        .collect();
    assert_eq!(uploads.len(), 1);
    assert_eq!((uploads[0].x, uploads[0].y, uploads[0].width, uploads[0].height), (8, 0, 5, 7));
    assert_eq!(log.count(|c| matches!(c, Command::CreateTexture { .. })), 0);
}
