//! # Pixel Surface
//!
//! The CPU-side RGBA buffer screens draw into. The application shell owns it and uploads
//! it to the window once per frame; screens only ever borrow it.
//!
//! All drawing is clipped to the surface, so screens can draw partially off-screen
//! without checking bounds themselves.

use bytemuck::{Pod, Zeroable};

pub mod text;

pub use text::TextSprite;

/// A single 8-bit-per-channel RGBA pixel.
///
/// `#[repr(C)]` keeps the channel order stable so a pixel slice can be handed to the GPU
/// as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    /// Scales the color channels by `factor` (clamped to `0.0..=1.0`), keeping alpha.
    pub fn shaded(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale = |channel: u8| (channel as f32 * factor).round() as u8;
        Rgba {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: self.a,
        }
    }
}

/// A rectangle in surface pixel coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns `true` if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersects this rectangle with `0..width` x `0..height`.
    ///
    /// # Returns
    /// `(x0, y0, x1, y1)` as exclusive pixel bounds, or `None` if nothing is left.
    fn clip(&self, width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
        let x0 = (self.x as i64).max(0);
        let y0 = (self.y as i64).max(0);
        let x1 = (self.x as i64 + self.width as i64).min(width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// An RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelSurface {
    /// Creates a black surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::BLACK; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Changes the surface size. The contents are reset to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, Rgba::BLACK);
    }

    /// Gets the pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// One row of pixels.
    pub fn row(&self, y: u32) -> &[Rgba] {
        let start = y as usize * self.width as usize;
        &self.pixels[start..start + self.width as usize]
    }

    /// The whole buffer as raw RGBA bytes, row by row.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Fills the whole surface with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Fills `rect` with `color`, clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = rect.clip(self.width, self.height) else {
            return;
        };
        let stride = self.width as usize;
        for y in y0..y1 {
            self.pixels[y * stride + x0..y * stride + x1].fill(color);
        }
    }

    /// Draws a one-pixel outline of `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, color: Rgba) {
        if rect.is_empty() {
            return;
        }
        let right = rect.x + rect.width as i32 - 1;
        let bottom = rect.y + rect.height as i32 - 1;
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, bottom, rect.width, 1), color);
        self.fill_rect(Rect::new(rect.x, rect.y, 1, rect.height), color);
        self.fill_rect(Rect::new(right, rect.y, 1, rect.height), color);
    }

    /// Copies a sprite onto the surface with its top-left corner at `(x, y)`.
    ///
    /// Fully transparent sprite pixels are skipped.
    pub fn blit(&mut self, sprite: &TextSprite, x: i32, y: i32) {
        let area = Rect::new(x, y, sprite.width(), sprite.height());
        let Some((x0, y0, x1, y1)) = area.clip(self.width, self.height) else {
            return;
        };
        let stride = self.width as usize;
        for sy in y0..y1 {
            let sprite_y = (sy as i64 - y as i64) as u32;
            for sx in x0..x1 {
                let sprite_x = (sx as i64 - x as i64) as u32;
                let color = sprite.pixel(sprite_x, sprite_y);
                if color.a != 0 {
                    self.pixels[sy * stride + sx] = color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_is_clipped_to_the_surface() {
        let mut surface = PixelSurface::new(4, 3);
        surface.fill_rect(Rect::new(-2, 1, 4, 10), Rgba::WHITE);

        assert_eq!(surface.pixel(0, 0), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(0, 1), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(1, 2), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(2, 2), Some(Rgba::BLACK));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn fully_off_surface_drawing_is_ignored() {
        let mut surface = PixelSurface::new(4, 4);
        surface.fill_rect(Rect::new(10, 10, 5, 5), Rgba::WHITE);
        surface.stroke_rect(Rect::new(-10, -10, 2, 2), Rgba::WHITE);

        assert!(surface.row(0).iter().all(|p| *p == Rgba::BLACK));
    }

    #[test]
    fn stroke_rect_leaves_the_inside_untouched() {
        let mut surface = PixelSurface::new(5, 5);
        surface.stroke_rect(Rect::new(0, 0, 5, 5), Rgba::WHITE);

        assert_eq!(surface.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(4, 4), Some(Rgba::WHITE));
        assert_eq!(surface.pixel(2, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn bytes_are_rgba_row_major() {
        let mut surface = PixelSurface::new(2, 1);
        surface.fill_rect(Rect::new(1, 0, 1, 1), Rgba::rgb(1, 2, 3));

        assert_eq!(surface.as_bytes(), &[0, 0, 0, 255, 1, 2, 3, 255]);
    }

    #[test]
    fn resize_resets_contents() {
        let mut surface = PixelSurface::new(2, 2);
        surface.clear(Rgba::WHITE);
        surface.resize(3, 1);

        assert_eq!(surface.width(), 3);
        assert_eq!(surface.row(0), &[Rgba::BLACK; 3]);
    }
}
