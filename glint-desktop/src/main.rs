//! Glint Desktop: widget gallery powered by wgpu.
//!
//! Uses `winit` 0.30 for windowing and input and the `glint-ui`
//! painter on top of the `glint-render` wgpu backend.

mod demo;

use log::{error, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

use glint_core::{Color, Size, Vec2};
use glint_render::backend::BackendError;
use glint_render::{GpuContext, RenderContext, WgpuBackend};
use glint_ui::{MouseButtons, Painter, Ui, UiConfig};

const CONFIG_FILE: &str = "glint.json";
const CLEAR: Color = Color::rgb(0.82, 0.84, 0.88);

/// Everything that exists once the window and GPU are up.
struct Session {
    painter: Painter,
    ui: Ui,
}

/// Winit 0.30 application handler.
struct App {
    config: UiConfig,
    window: Option<Arc<Window>>,
    session: Option<Session>,
    last_frame: Instant,
    frame_count: u64,
}

impl App {
    fn new(config: UiConfig) -> Self {
        Self {
            config,
            window: None,
            session: None,
            last_frame: Instant::now(),
            frame_count: 0,
        }
    }

    fn start(&self, window: &Arc<Window>) -> Result<Session, String> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        let gpu = pollster::block_on(GpuContext::new_with_surface(window.clone(), width, height))
            .map_err(|e| format!("Failed to initialize GPU: {e}"))?;
        info!("GPU: {:?}", gpu.adapter.get_info().name);

        let backend = WgpuBackend::new(gpu, width, height);
        let ctx = RenderContext::new(Box::new(backend), self.config.shader_loader());
        let mut painter = Painter::new(ctx, &self.config);
        painter.set_window_size(width as f32, height as f32);

        demo::register_pixmaps(&mut painter);
        let mut ui = Ui::new(demo::build(painter.default_font()), Vec2::new(40.0, 40.0));
        ui.layout(&mut painter);

        Ok(Session { painter, ui })
    }
}

fn mouse_button(button: MouseButton) -> Option<MouseButtons> {
    match button {
        MouseButton::Left => Some(MouseButtons::LEFT),
        MouseButton::Middle => Some(MouseButtons::MIDDLE),
        MouseButton::Right => Some(MouseButtons::RIGHT),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized.
        }

        let attrs = WindowAttributes::default()
            .with_title("Glint")
            .with_inner_size(LogicalSize::new(800, 600))
            .with_min_inner_size(LogicalSize::new(320, 240));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.start(&window) {
            Ok(session) => {
                let size = window.inner_size();
                info!("Glint Desktop initialized: {}×{}", size.width, size.height);
                self.session = Some(session);
            }
            Err(e) => {
                error!("{e}");
                event_loop.exit();
                return;
            }
        }

        self.last_frame = Instant::now();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let (Some(window), Some(session)) = (self.window.as_ref(), self.session.as_mut()) else {
            return;
        };

        match event {
            // ── Close ───────────────────────────────────────────
            WindowEvent::CloseRequested => {
                info!("Window closed after {} frames", self.frame_count);
                event_loop.exit();
            }

            // ── Resize ──────────────────────────────────────────
            WindowEvent::Resized(new_size) => {
                session.painter.context().backend.resize(new_size.width, new_size.height);
                session
                    .painter
                    .set_window_size(new_size.width as f32, new_size.height as f32);
                window.request_redraw();
            }

            // ── Pointer ─────────────────────────────────────────
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                if session.ui.cursor_moved(Vec2::new(x as f32, y as f32)) {
                    window.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = mouse_button(button) else {
                    return;
                };
                let handled = match state {
                    ElementState::Pressed => session.ui.button_pressed(button),
                    ElementState::Released => session.ui.button_released(button),
                };
                if handled {
                    window.request_redraw();
                }
            }

            // ── Redraw ──────────────────────────────────────────
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let elapsed = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                match render_frame(session, elapsed) {
                    Ok(stats) => {
                        self.frame_count += 1;
                        if self.frame_count % 300 == 0 {
                            info!(
                                "Frame {}: {} draw call(s), {} vertices, {} texture upload(s)",
                                self.frame_count, stats.draw_calls, stats.vertices, stats.texture_uploads
                            );
                        }
                    }
                    Err(BackendError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        let size = window.inner_size();
                        session.painter.context().backend.resize(size.width, size.height);
                    }
                    Err(e) => {
                        error!("Render error: {e}");
                    }
                }
                // Continuous redraws keep animations running.
                window.request_redraw();
            }

            _ => {}
        }
    }
}

fn render_frame(session: &mut Session, elapsed: f32) -> Result<glint_render::FrameStats, BackendError> {
    let Session { painter, ui } = session;
    ui.update(elapsed);
    ui.layout(painter);

    let window: Size = painter.window_size();
    painter.context().backend.begin_frame(CLEAR)?;
    painter.begin(window);
    ui.render(painter);
    painter.end();
    painter.context().backend.end_frame()
}

fn load_config() -> UiConfig {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return UiConfig::default();
    }
    match UiConfig::load(path) {
        Ok(config) => {
            info!("Loaded {}", path.display());
            config
        }
        Err(e) => {
            warn!("{e}; using defaults");
            UiConfig::default()
        }
    }
}

fn main() {
    env_logger::init();

    info!("Starting Glint Desktop...");
    let config = load_config();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Failed to create event loop: {e}");
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {e}");
    }
}
