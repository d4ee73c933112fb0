//! Bitmap text for HUD labels and menus.
//!
//! Glyphs are 3x5 cells stored as five rows of three bits (leftmost pixel in the high
//! bit). Text is rasterized once into a [`TextSprite`] and blitted as often as needed, so
//! a label that does not change costs a copy per frame instead of a re-render.
//! Lowercase letters are drawn as uppercase; unknown characters render as blanks.

use phf::phf_map;

use super::Rgba;

/// Width of a glyph cell in font pixels.
pub const GLYPH_WIDTH: u32 = 3;
/// Height of a glyph cell in font pixels.
pub const GLYPH_HEIGHT: u32 = 5;
/// Horizontal gap between glyphs in font pixels.
const GLYPH_SPACING: u32 = 1;

static GLYPHS: phf::Map<char, [u8; 5]> = phf_map! {
    '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
    '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
    '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
    '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
    '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
    '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
    '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
    '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
    '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
    '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
    'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
    'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
    'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
    'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
    'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
    'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
    'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
    'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
    'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
    'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
    'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
    'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
    'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
    'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
    'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
    'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
    'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
    'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
    'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
    'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
    'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
    'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
    'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
    'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
    'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
    'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
    '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
    ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
    '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
    '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
};

/// Text rasterized into a transparent-background pixel block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSprite {
    text: String,
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl TextSprite {
    /// Rasterizes `text` with each font pixel drawn as a `scale` x `scale` square.
    ///
    /// # Arguments
    /// * `text` - The text to draw, on a single line
    /// * `scale` - Integer magnification, at least 1
    /// * `color` - Color of the glyph pixels
    pub fn rasterize(text: &str, scale: u32, color: Rgba) -> Self {
        let scale = scale.max(1);
        let glyph_count = text.chars().count() as u32;
        let advance = (GLYPH_WIDTH + GLYPH_SPACING) * scale;
        let width = (glyph_count * advance).saturating_sub(GLYPH_SPACING * scale);
        let height = GLYPH_HEIGHT * scale;
        let mut pixels = vec![Rgba::TRANSPARENT; width as usize * height as usize];

        for (index, character) in text.chars().enumerate() {
            let Some(rows) = GLYPHS.get(&character.to_ascii_uppercase()) else {
                continue;
            };
            let left = index as u32 * advance;
            for (row, bits) in rows.iter().enumerate() {
                for column in 0..GLYPH_WIDTH {
                    if bits & (0b100 >> column) == 0 {
                        continue;
                    }
                    let px = left + column * scale;
                    let py = row as u32 * scale;
                    for dy in 0..scale {
                        let start = ((py + dy) * width + px) as usize;
                        pixels[start..start + scale as usize].fill(color);
                    }
                }
            }
        }

        Self {
            text: text.to_string(),
            width,
            height,
            pixels,
        }
    }

    /// The text this sprite was rasterized from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The sprite pixel at `(x, y)`; transparent outside the sprite.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width || y >= self.height {
            return Rgba::TRANSPARENT;
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_size_accounts_for_spacing_and_scale() {
        let sprite = TextSprite::rasterize("60 FPS", 2, Rgba::WHITE);

        assert_eq!(sprite.width(), (6 * 4 - 1) * 2);
        assert_eq!(sprite.height(), 10);
        assert_eq!(sprite.text(), "60 FPS");
    }

    #[test]
    fn glyph_pixels_follow_the_bitmap() {
        let sprite = TextSprite::rasterize("1", 1, Rgba::WHITE);

        assert_eq!(sprite.pixel(0, 0), Rgba::TRANSPARENT);
        assert_eq!(sprite.pixel(1, 0), Rgba::WHITE);
        assert_eq!(sprite.pixel(0, 4), Rgba::WHITE);
        assert_eq!(sprite.pixel(2, 4), Rgba::WHITE);
        assert_eq!(sprite.pixel(3, 0), Rgba::TRANSPARENT);
    }

    #[test]
    fn lowercase_and_unknown_characters() {
        let lower = TextSprite::rasterize("fps", 1, Rgba::WHITE);
        let upper = TextSprite::rasterize("FPS", 1, Rgba::WHITE);
        assert_eq!(lower.pixels, upper.pixels);

        let blank = TextSprite::rasterize("#", 1, Rgba::WHITE);
        assert!(blank.pixels.iter().all(|p| *p == Rgba::TRANSPARENT));
    }

    #[test]
    fn empty_text_is_an_empty_sprite() {
        let sprite = TextSprite::rasterize("", 3, Rgba::WHITE);

        assert_eq!(sprite.width(), 0);
        assert_eq!(sprite.pixel(0, 0), Rgba::TRANSPARENT);
    }
}
