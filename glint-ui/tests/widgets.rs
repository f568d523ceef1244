//! Widget layout, rendering and event routing.

use std::cell::Cell;
use std::rc::Rc;

use glint_core::{Color, PixelBuffer, PixelFormat, PixelRect, Rect, Size, Vec2};
use glint_render::backend::{Command, CommandLog, RecordingBackend};
use glint_render::{RenderContext, ShaderLoader};
use glint_text::{GlyphSource, LineMetrics, RasterizedGlyph};
use glint_ui::{
    Align, Background, Column, HAlign, Image, Item, Label, Margins, MouseButtons, MouseEvent, MouseEventKind,
    MultiLineText, Painter, Rectangle, Row, ScrollArea, Switch, Ui, UiConfig, VAlign,
};

const WINDOW: Size = Size::new(800.0, 600.0);

/// Every character is an 8px-wide block.
struct Blocks;

impl GlyphSource for Blocks {
    fn metrics(&self) -> LineMetrics {
        LineMetrics { ascent: 16.0, descent: 4.0, line_gap: 0.0, pixel_height: 20 }
    }

    fn rasterize(&mut self, _ch: char) -> Option<RasterizedGlyph> {
        Some(RasterizedGlyph {
            bitmap: PixelBuffer::filled(6, 16, PixelFormat::Grayscale, &[255]),
            bbox: Rect::new(Vec2::new(0.0, -16.0), Vec2::new(6.0, 0.0)),
            advance: 8.0,
        })
    }
}

fn painter() -> (Painter, CommandLog) {
    let backend = RecordingBackend::new();
    let log = backend.log();
    let config = UiConfig {
        asset_root: "/nonexistent/glint".into(),
        default_font_size: 20,
        ..UiConfig::default()
    };
    let mut painter = Painter::new(RenderContext::new(Box::new(backend), ShaderLoader::Embedded), &config);
    let font = painter.default_font().clone();
    painter.fonts().insert_source(font, Box::new(Blocks));
    (painter, log)
}

fn click(position: Vec2) -> MouseEvent {
    MouseEvent::new(MouseEventKind::Click, MouseButtons::LEFT, position)
}

fn drag(kind: MouseEventKind, x: f32, y: f32) -> MouseEvent {
    MouseEvent::new(kind, MouseButtons::LEFT, Vec2::new(x, y))
}

#[test]
fn column_stacks_children() {
    let (mut painter, _log) = painter();
    let mut column = Column::new()
        .with_margins(Margins::uniform(10.0))
        .with_spacing(5.0)
        .with_item(Rectangle::new(100.0, 20.0))
        .with_item(Rectangle::new(50.0, 30.0));

    assert_eq!(column.measure(&mut painter), Size::new(120.0, 75.0));
    assert_eq!(column.container().child_offset(0), Some(Vec2::new(10.0, 10.0)));
    assert_eq!(column.container().child_offset(1), Some(Vec2::new(10.0, 35.0)));
}

#[test]
fn column_aligns_children_horizontally() {
    let (mut painter, _log) = painter();
    let mut centered = Rectangle::new(50.0, 30.0);
    centered.container_alignment = Align::new(HAlign::Center, VAlign::Center);
    let mut right = Rectangle::new(20.0, 10.0);
    right.container_alignment = Align::new(HAlign::Right, VAlign::Center);

    let mut column = Column::new()
        .with_item(Rectangle::new(100.0, 20.0))
        .with_item(centered)
        .with_item(right);
    column.minimum_width = 150.0;
    column.measure(&mut painter);

    assert_eq!(column.size().width, 150.0);
    assert_eq!(column.container().child_offset(1).unwrap().x, 50.0);
    assert_eq!(column.container().child_offset(2).unwrap().x, 130.0);
}

#[test]
fn row_centers_children_vertically() {
    let (mut painter, _log) = painter();
    let mut row = Row::new()
        .with_spacing(4.0)
        .with_item(Rectangle::new(10.0, 10.0))
        .with_item(Rectangle::new(10.0, 30.0));

    assert_eq!(row.measure(&mut painter), Size::new(24.0, 30.0));
    assert_eq!(row.container().child_offset(0), Some(Vec2::new(0.0, 10.0)));
    assert_eq!(row.container().child_offset(1), Some(Vec2::new(14.0, 0.0)));

    row.minimum_height = 50.0;
    assert_eq!(row.measure(&mut painter).height, 50.0);
    assert_eq!(row.container().child_offset(0), Some(Vec2::new(0.0, 20.0)));
}

#[test]
fn label_measures_its_text() {
    let (mut painter, _log) = painter();
    let mut label = Label::new("abc");
    label.margins = Margins::uniform(2.0);
    assert_eq!(label.measure(&mut painter), Size::new(28.0, 24.0));
    assert_eq!(label.content_size(), Size::new(24.0, 20.0));

    label.fixed_width = 100.0;
    assert_eq!(label.measure(&mut painter).width, 100.0);
}

#[test]
fn overflowing_label_clips_and_restores() {
    let (mut painter, log) = painter();
    let mut label = Label::new("a long label");
    label.fixed_width = 20.0;
    label.measure(&mut painter);

    painter.begin(WINDOW);
    label.render(&mut painter, Vec2::new(100.0, 100.0), 0);
    painter.end();

    let scissors: Vec<PixelRect> = log
        .commands()
        .into_iter()
        .filter_map(|c| match c {
            Command::SetScissor(r) => Some(r),
            _ => None,
        })
        .collect();
    assert_eq!(
        scissors,
        vec![
            PixelRect::new(0, 0, 800, 600),
            PixelRect::new(100, 100, 20, 20),
            PixelRect::new(0, 0, 800, 600),
        ]
    );
    // Only the glyphs touching the 20px clip reach the batcher.
    assert_eq!(log.draws(), vec![(0, 18)]);
}

#[test]
fn background_draws_below_contents() {
    let (mut painter, log) = painter();
    let mut column = Column::new()
        .with_background(Background::rect(Color::BLACK))
        .with_margins(Margins::uniform(5.0))
        .with_item(Rectangle::new(10.0, 10.0).with_background(Background::rect(Color::WHITE)));
    column.measure(&mut painter);

    painter.begin(WINDOW);
    column.render(&mut painter, Vec2::ZERO, 0);
    painter.end();

    // Same program and no texture: one draw for both depths.
    assert_eq!(log.draws(), vec![(0, 12)]);
    let data = log.vertex_data();
    let first: glint_render::SpriteVertex = bytemuck::pod_read_unaligned(&data[..glint_render::SpriteVertex::SIZE]);
    assert_eq!(first.color, Color::BLACK.to_array());
}

#[test]
fn item_outside_clip_renders_nothing() {
    let (mut painter, log) = painter();
    let mut rect = Rectangle::new(10.0, 10.0).with_background(Background::rect(Color::BLACK));
    rect.measure(&mut painter);
    painter.begin(WINDOW);
    rect.render(&mut painter, Vec2::new(-20.0, 0.0), 0);
    painter.end();
    assert!(log.draws().is_empty());
}

#[test]
fn image_sizes_to_its_pixmap() {
    let (mut painter, log) = painter();
    painter
        .pixmaps()
        .insert("logo", &PixelBuffer::filled(40, 30, PixelFormat::Rgba, &[255; 4]));

    let mut image = Image::new("logo");
    image.margins = Margins::uniform(5.0);
    assert_eq!(image.measure(&mut painter), Size::new(50.0, 40.0));

    let mut missing = Image::new("missing.png");
    assert_eq!(missing.measure(&mut painter), Size::ZERO);

    painter.begin(WINDOW);
    image.render(&mut painter, Vec2::ZERO, 0);
    missing.render(&mut painter, Vec2::ZERO, 0);
    painter.end();
    assert_eq!(log.draws(), vec![(0, 6)]);
}

#[test]
fn switch_toggles_and_animates() {
    let toggled = Rc::new(Cell::new(None));
    let seen = toggled.clone();
    let mut switch = Switch::new().on_toggled(move |on| seen.set(Some(on)));

    assert!(switch.mouse_event(&click(Vec2::new(10.0, 10.0))));
    assert!(switch.is_checked());
    assert_eq!(toggled.get(), Some(true));
    assert_eq!(switch.indicator_position(), 0.0);

    switch.update(0.1);
    assert!((switch.indicator_position() - 0.5).abs() < 1e-4);
    switch.update(0.2);
    assert_eq!(switch.indicator_position(), 1.0);

    switch.toggle();
    assert_eq!(toggled.get(), Some(false));
    switch.update(1.0);
    assert_eq!(switch.indicator_position(), 0.0);
}

#[test]
fn scroll_area_drag_is_clamped_to_content() {
    let (mut painter, _log) = painter();
    let mut scroll = ScrollArea::new(Size::new(100.0, 100.0), Rectangle::new(100.0, 300.0));
    assert_eq!(scroll.measure(&mut painter), Size::new(100.0, 100.0));

    assert!(scroll.mouse_event(&drag(MouseEventKind::DragBegin, 50.0, 90.0)));
    scroll.mouse_event(&drag(MouseEventKind::DragMove, 50.0, 40.0));
    assert_eq!(scroll.scroll_offset(), Vec2::new(0.0, -50.0));

    scroll.mouse_event(&drag(MouseEventKind::DragMove, 50.0, -500.0));
    assert_eq!(scroll.scroll_offset(), Vec2::new(0.0, -200.0));

    scroll.mouse_event(&drag(MouseEventKind::DragMove, 50.0, 900.0));
    assert_eq!(scroll.scroll_offset(), Vec2::ZERO);

    assert!(scroll.mouse_event(&drag(MouseEventKind::DragEnd, 50.0, 900.0)));
    assert!(!scroll.mouse_event(&drag(MouseEventKind::DragMove, 50.0, 0.0)));
}

#[test]
fn scroll_area_clips_content_to_viewport() {
    let (mut painter, log) = painter();
    let content = Rectangle::new(100.0, 300.0).with_background(Background::rect(Color::BLACK));
    let mut scroll = ScrollArea::new(Size::new(100.0, 100.0), content);
    scroll.margins = Margins::uniform(10.0);
    scroll.measure(&mut painter);

    painter.begin(WINDOW);
    scroll.render(&mut painter, Vec2::new(50.0, 50.0), 0);
    painter.end();

    assert!(log.commands().contains(&Command::SetScissor(PixelRect::new(60, 60, 100, 100))));
    assert_eq!(log.draws(), vec![(0, 6)]);
}

#[test]
fn multi_line_text_wraps_to_width() {
    let (mut painter, _log) = painter();
    // 8px per glyph: "aaa bbb" is 56px and fits in 60.
    let mut text = MultiLineText::new("aaa bbb ccc", 60.0);
    let size = text.measure(&mut painter);
    assert_eq!(text.lines().len(), 2);
    assert_eq!(text.lines()[0].text, "aaa bbb");
    assert_eq!(size, Size::new(60.0, 40.0));
}

#[test]
fn ui_routes_clicks_through_containers() {
    let (mut painter, _log) = painter();
    let toggled = Rc::new(Cell::new(false));
    let seen = toggled.clone();
    let column = Column::new()
        .with_margins(Margins::uniform(10.0))
        .with_item(Label::new("switch"))
        .with_item(Switch::new().on_toggled(move |on| seen.set(on)));

    let mut ui = Ui::new(column, Vec2::new(20.0, 20.0));
    ui.layout(&mut painter);

    // Label is 20px tall, so the switch starts at y = 10 + 20.
    ui.cursor_moved(Vec2::new(20.0 + 10.0 + 40.0, 20.0 + 30.0 + 16.0));
    ui.button_pressed(MouseButtons::LEFT);
    assert!(ui.button_released(MouseButtons::LEFT));
    assert!(toggled.get());

    // A click in the margin reaches nobody.
    ui.cursor_moved(Vec2::new(22.0, 22.0));
    ui.button_pressed(MouseButtons::LEFT);
    assert!(!ui.button_released(MouseButtons::LEFT));
    assert!(toggled.get());
}

#[test]
fn ui_drag_stays_with_grabbing_scroll_area() {
    let (mut painter, _log) = painter();
    let scroll = ScrollArea::new(Size::new(100.0, 100.0), Rectangle::new(100.0, 300.0));
    let column = Column::new().with_item(scroll);
    let mut ui = Ui::new(column, Vec2::ZERO);
    ui.layout(&mut painter);

    ui.cursor_moved(Vec2::new(50.0, 90.0));
    ui.button_pressed(MouseButtons::LEFT);
    // Dragging far outside the column keeps scrolling the grabbed area.
    assert!(ui.cursor_moved(Vec2::new(50.0, -400.0)));
    assert!(ui.button_released(MouseButtons::LEFT));
}
