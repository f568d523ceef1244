//! The widget tree shown by the demo window.

use glint_core::{Color, PixelBuffer, PixelFormat, Size};
use glint_text::Font;
use glint_ui::{
    Align, Background, Column, HAlign, Image, Label, Margins, MultiLineText, Painter, Rectangle,
    Row, ScrollArea, Shape, Switch,
};
use log::info;

const PANEL: u32 = 0xf2f2f5ff;
const ACCENT: u32 = 0x3a7bd5ff;

pub const SWATCH: &str = "demo-swatch";

const LOREM: &str = "Glint batches every rectangle, glyph and image of a frame into a \
handful of draw calls. Glyphs and pixmaps live in shared atlas pages, so text and images \
can be drawn in the same run as flat shapes. Drag this paragraph to scroll it.";

/// Register generated pixmaps the demo tree refers to.
pub fn register_pixmaps(painter: &mut Painter) {
    let (w, h) = (64u32, 64u32);
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let checker = ((x / 8) + (y / 8)) % 2 == 0;
            let r = (x * 255 / (w - 1)) as u8;
            let b = (y * 255 / (h - 1)) as u8;
            data.extend_from_slice(&[r, if checker { 200 } else { 90 }, b, 255]);
        }
    }
    match PixelBuffer::new(w, h, PixelFormat::Rgba, data) {
        Ok(pixels) => {
            if painter.pixmaps().insert(SWATCH, &pixels).is_none() {
                log::warn!("Swatch does not fit the pixmap atlas");
            }
        }
        Err(e) => log::error!("Swatch: {e}"),
    }
}

pub fn build(default_font: &Font) -> Column {
    let title_font = Font::new(default_font.name.clone(), default_font.pixel_height * 3 / 2);

    let mut title = Label::with_font(title_font, "Glint");
    title.margins = Margins::uniform(4.0);

    let mut caption = Label::new("Notifications");
    caption.color = Color::from_hex(0x555555ff);

    let switch = Switch::new().on_toggled(|on| info!("Switch toggled: {on}"));

    let swatches = Row::new()
        .with_spacing(8.0)
        .with_item(Rectangle::new(32.0, 32.0).with_background(Background::rect(Color::from_hex(ACCENT))))
        .with_item(Rectangle::new(32.0, 32.0).with_background(Background::new(Color::from_hex(0xd53a3aff), Shape::RoundedRectangle(8.0))))
        .with_item(Rectangle::new(64.0, 32.0).with_background(Background::new(Color::from_hex(0x3ad57bff), Shape::Capsule)))
        .with_item(Image::new(SWATCH));

    let controls = Row::new().with_spacing(16.0).with_item(switch).with_item(caption);

    let mut paragraph = MultiLineText::new(LOREM, 360.0);
    paragraph.margins = Margins::uniform(8.0);
    let scroll = ScrollArea::new(Size::new(360.0, 120.0), paragraph);

    let mut footer = Label::new("Scroll, click and drag");
    footer.color = Color::from_hex(0x888888ff);
    footer.fixed_width = 360.0;
    footer.alignment = Align { h: HAlign::Right, ..Align::default() };

    Column::new()
        .with_margins(Margins::uniform(16.0))
        .with_spacing(12.0)
        .with_background(Background::new(Color::from_hex(PANEL), Shape::RoundedRectangle(12.0)))
        .with_item(title)
        .with_item(swatches)
        .with_item(controls)
        .with_item(scroll)
        .with_item(footer)
}
