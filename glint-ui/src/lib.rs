//! # glint-ui
//!
//! Painter and retained widget tree for Glint.
//!
//! ## Frame flow
//!
//! ```text
//!  Ui::layout ── measure ──▶ widgets ──▶ FontCache / PixmapCache
//!  Ui::render ── render ───▶ Painter ──▶ SpriteBatcher ──▶ GpuBackend
//! ```
//!
//! A typical frame:
//!
//! ```ignore
//! ui.update(elapsed);
//! ui.layout(&mut painter);
//! painter.context().backend.begin_frame(clear)?;
//! painter.begin(window);
//! ui.render(&mut painter);
//! painter.end();
//! painter.context().backend.end_frame()?;
//! ```

pub mod animation;
pub mod config;
pub mod event;
pub mod painter;
pub mod pixmaps;
pub mod ui;
pub mod widgets;

pub use animation::{Easing, Lerp, ValueAnimation};
pub use config::{ConfigError, UiConfig};
pub use event::{MouseButtons, MouseEvent, MouseEventKind, MouseTracker};
pub use painter::Painter;
pub use pixmaps::{load_image, ImageLoadError, PixmapCache};
pub use ui::Ui;
pub use widgets::{
    Align, Background, Column, HAlign, Image, Item, Label, Margins, MultiLineText, Rectangle, Row,
    ScrollArea, Shape, Switch, VAlign,
};
