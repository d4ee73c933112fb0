//! Puts the CPU pixel surface on screen by copying it into the swap chain texture.

use std::sync::Arc;

use winit::{dpi::PhysicalSize, window::Window};

use crate::engine_state::surface::PixelSurface;

use super::graphics_resources_builder::Graphics;

/// Uploads finished frames to the window.
pub struct Presenter {
    graphics: Graphics,
    /// Scratch buffer for the packed frame, reused between frames.
    staging: Vec<u8>,
}

impl Presenter {
    /// Creates a presenter for an already configured surface.
    pub fn new(graphics: Graphics) -> Self {
        Self {
            graphics,
            staging: Vec::new(),
        }
    }

    /// The window frames are presented to.
    pub fn window(&self) -> &Arc<Window> {
        &self.graphics.window
    }

    /// Reconfigures the swap chain for a new window size.
    pub fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.graphics.surface_config.width = size.width;
        self.graphics.surface_config.height = size.height;
        self.graphics.configure_surface();
    }

    /// Copies `surface` into the next swap chain texture and presents it.
    ///
    /// Lost or outdated swap chains are reconfigured and the frame is skipped.
    pub fn present(&mut self, surface: &PixelSurface) {
        let frame = match self.graphics.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Swap chain lost or outdated, reconfiguring");
                self.graphics.configure_surface();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out waiting for the next swap chain texture");
                return;
            }
            Err(err) => {
                log::error!("Could not acquire swap chain texture: {}", err);
                return;
            }
        };

        let width = surface.width().min(frame.texture.width());
        let height = surface.height().min(frame.texture.height());
        if width == 0 || height == 0 {
            return;
        }

        let swizzle = matches!(
            frame.texture.format(),
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        );
        pack_rows(surface, width, height, swizzle, &mut self.staging);

        self.graphics.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &frame.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &self.staging,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.graphics.queue.submit(std::iter::empty());
        self.graphics.window.pre_present_notify();
        frame.present();
    }
}

/// Packs the top-left `width` x `height` pixels of `surface` into `out` as tightly packed
/// rows, swapping red and blue when `swizzle` is set.
fn pack_rows(surface: &PixelSurface, width: u32, height: u32, swizzle: bool, out: &mut Vec<u8>) {
    out.clear();
    out.reserve(4 * width as usize * height as usize);
    for y in 0..height {
        let row = &surface.row(y)[..width as usize];
        out.extend_from_slice(bytemuck::cast_slice(row));
    }
    if swizzle {
        for pixel in out.chunks_exact_mut(4) {
            pixel.swap(0, 2);
        }
    }
}
