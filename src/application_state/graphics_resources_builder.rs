//! # Graphics Resources Builder
//!
//! Creates the window and the WebGPU resources the presenter needs.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsError`: Everything that can go wrong while creating them
//! - `create_graphics`: Builds the window, surface, device and queue

use std::sync::Arc;

use thiserror::Error;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration, TextureFormat, TextureUsages};
use winit::{dpi::PhysicalSize, event_loop::ActiveEventLoop, window::Window};

/// Errors raised while creating the window or the GPU context.
#[derive(Error, Debug)]
pub enum GraphicsError {
    /// The window could not be created.
    #[error("could not create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// The window surface could not be created.
    #[error("could not create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// No adapter can draw to the surface.
    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device.
    #[error("could not create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface cannot receive copied RGBA pixels.
    #[error("surface does not accept copied 8-bit RGBA pixels")]
    UnsupportedSurface,
}

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    /// The application window
    pub window: Arc<Window>,
    /// Swap chain surface of the window
    pub surface: Surface<'static>,
    /// Current configuration of `surface`
    pub surface_config: SurfaceConfiguration,
    /// The GPU device
    pub device: Device,
    /// The GPU command queue
    pub queue: Queue,
}

impl Graphics {
    /// Applies `surface_config` to the surface again, e.g. after a resize or a lost surface.
    pub fn configure_surface(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }
}

/// Picks an 8-bit RGBA or BGRA format, preferring linear ones so pixel values are shown
/// unchanged.
fn pick_format(formats: &[TextureFormat]) -> Option<TextureFormat> {
    let preferences = [
        TextureFormat::Rgba8Unorm,
        TextureFormat::Bgra8Unorm,
        TextureFormat::Rgba8UnormSrgb,
        TextureFormat::Bgra8UnormSrgb,
    ];
    preferences
        .into_iter()
        .find(|preferred| formats.contains(preferred))
}

/// Creates the window and all graphics resources, blocking until the device is ready.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
/// * `title` - Window title
/// * `size` - Requested inner size of the window
///
/// # Returns
/// The initialized `Graphics` with the surface configured for copied frames
pub fn create_graphics(
    event_loop: &ActiveEventLoop,
    title: &str,
    size: PhysicalSize<u32>,
) -> Result<Graphics, GraphicsError> {
    let window_attrs = Window::default_attributes()
        .with_title(title)
        .with_inner_size(size);
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });
    let surface = instance.create_surface(window.clone())?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::default(),
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))?;
    log::info!("Using adapter {:?}", adapter.get_info().name);

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("cosmicland device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits()),
        memory_hints: wgpu::MemoryHints::MemoryUsage,
        trace: wgpu::Trace::Off,
    }))?;

    let surface_caps = surface.get_capabilities(&adapter);
    if !surface_caps.usages.contains(TextureUsages::COPY_DST) {
        return Err(GraphicsError::UnsupportedSurface);
    }
    let format = pick_format(&surface_caps.formats).ok_or(GraphicsError::UnsupportedSurface)?;
    let (Some(present_mode), Some(alpha_mode)) = (
        surface_caps.present_modes.first().copied(),
        surface_caps.alpha_modes.first().copied(),
    ) else {
        return Err(GraphicsError::UnsupportedSurface);
    };

    let size = window.inner_size();
    let surface_config = SurfaceConfiguration {
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::COPY_DST,
        format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    log::info!(
        "Configuring {}x{} surface as {:?}",
        surface_config.width,
        surface_config.height,
        format
    );

    let graphics = Graphics {
        window,
        surface,
        surface_config,
        device,
        queue,
    };
    graphics.configure_surface();
    Ok(graphics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_formats_are_preferred() {
        let formats = [
            TextureFormat::Bgra8UnormSrgb,
            TextureFormat::Bgra8Unorm,
            TextureFormat::Rgba16Float,
        ];

        assert_eq!(pick_format(&formats), Some(TextureFormat::Bgra8Unorm));
        assert_eq!(pick_format(&[TextureFormat::Rgba16Float]), None);
    }
}
