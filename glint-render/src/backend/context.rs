//! Device, queue and presentation target for [`WgpuBackend`].
//!
//! A context is either headless, in which case the backend renders into
//! an off-screen texture, or bound to a window surface.
//!
//! [`WgpuBackend`]: super::WgpuBackend

use thiserror::Error;
use wgpu::{
    Adapter, CompositeAlphaMode, Device, DeviceDescriptor, Instance, InstanceDescriptor,
    PowerPreference, PresentMode, Queue, RequestAdapterOptions, Surface, SurfaceConfiguration,
    SurfaceError, SurfaceTexture, TextureFormat, TextureUsages,
};

#[derive(Error, Debug)]
pub enum GpuError {
    #[error("No suitable GPU adapter found")]
    NoAdapter,
    #[error("Failed to request device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// A configured window surface.
struct Presentation {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

pub struct GpuContext {
    pub device: Device,
    pub queue: Queue,
    pub adapter: Adapter,
    format: TextureFormat,
    presentation: Option<Presentation>,
}

async fn open_device(
    instance: &Instance,
    surface: Option<&Surface<'static>>,
    label: &str,
) -> Result<(Adapter, Device, Queue), GpuError> {
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::LowPower,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await
        .ok_or(GpuError::NoAdapter)?;
    let (device, queue) = adapter
        .request_device(
            &DeviceDescriptor {
                label: Some(label),
                ..Default::default()
            },
            None,
        )
        .await?;
    Ok((adapter, device, queue))
}

impl GpuContext {
    /// A context with no surface.  Frames go to an off-screen target.
    pub async fn new_headless() -> Result<Self, GpuError> {
        let instance = Instance::new(&InstanceDescriptor::default());
        let (adapter, device, queue) = open_device(&instance, None, "glint-headless").await?;
        Ok(Self {
            device,
            queue,
            adapter,
            format: TextureFormat::Rgba8UnormSrgb,
            presentation: None,
        })
    }

    /// A context presenting to `window`, which must outlive the context
    /// (pass an `Arc<Window>`).
    pub async fn new_with_surface<W>(window: W, width: u32, height: u32) -> Result<Self, GpuError>
    where
        W: wgpu::WasmNotSendSync + Into<wgpu::SurfaceTarget<'static>>,
    {
        let instance = Instance::new(&InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .map_err(|e| GpuError::Surface(e.to_string()))?;
        let (adapter, device, queue) = open_device(&instance, Some(&surface), "glint-windowed").await?;

        let caps = surface.get_capabilities(&adapter);
        // Linear blending in the shaders expects an sRGB target.
        let format = caps
            .formats
            .iter()
            .copied()
            .find(TextureFormat::is_srgb)
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| GpuError::Surface("surface reports no formats".to_string()))?;

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps.alpha_modes.first().copied().unwrap_or(CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);

        Ok(Self {
            device,
            queue,
            adapter,
            format,
            presentation: Some(Presentation { surface, config }),
        })
    }

    pub fn is_headless(&self) -> bool {
        self.presentation.is_none()
    }

    /// Colour format of the render target.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Reconfigure the surface.  Ignored when headless or when either
    /// side is zero (minimised windows).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(p) = &mut self.presentation {
            p.config.width = width;
            p.config.height = height;
            p.surface.configure(&self.device, &p.config);
        }
    }

    /// Surface dimensions, `(0, 0)` when headless.
    pub fn surface_size(&self) -> (u32, u32) {
        self.presentation
            .as_ref()
            .map_or((0, 0), |p| (p.config.width, p.config.height))
    }

    /// The next swapchain image, or `None` when headless.
    pub fn acquire_frame(&self) -> Result<Option<SurfaceTexture>, SurfaceError> {
        self.presentation
            .as_ref()
            .map(|p| p.surface.get_current_texture())
            .transpose()
    }
}

// ===================================================================
// Tests
// ===================================================================
