//! Fixed-point pixel storage and PPM output.

use std::io::{self, Write};

use scanray_math::Color;

// Channel bit offsets within a packed pixel
#[cfg(target_endian = "little")]
const RED_SHIFT: u32 = 16;
#[cfg(target_endian = "little")]
const BLUE_SHIFT: u32 = 0;
#[cfg(target_endian = "big")]
const RED_SHIFT: u32 = 0;
#[cfg(target_endian = "big")]
const BLUE_SHIFT: u32 = 16;
const GREEN_SHIFT: u32 = 8;

/// Convert one channel to 0-255.
///
/// Values at or above 1 (and NaN) saturate to 255, negatives to 0.
#[inline]
fn channel_to_byte(c: f64) -> u32 {
    let c = if c < 1.0 { c.max(0.0) } else { 1.0 };
    (c * 255.0) as u32 & 0xff
}

/// Pack a color into a 32-bit pixel.
pub fn pack_pixel(color: Color) -> u32 {
    channel_to_byte(color.x) << RED_SHIFT
        | channel_to_byte(color.y) << GREEN_SHIFT
        | channel_to_byte(color.z) << BLUE_SHIFT
}

/// Split a packed pixel into `[r, g, b]`.
pub fn unpack_pixel(pixel: u32) -> [u8; 3] {
    [
        (pixel >> RED_SHIFT) as u8,
        (pixel >> GREEN_SHIFT) as u8,
        (pixel >> BLUE_SHIFT) as u8,
    ]
}

/// A rendered frame of packed pixels, one row per scanline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<u32>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Wrap pixels whose count is already known to match.
    pub(crate) fn from_packed(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get the packed pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = pack_pixel(color);
    }

    /// Get the `[r, g, b]` bytes of the pixel at (x, y).
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        unpack_pixel(self.get(x, y))
    }

    /// All packed pixels in row-major order.
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Convert to tightly packed RGB bytes.
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for &pixel in &self.pixels {
            bytes.extend_from_slice(&unpack_pixel(pixel));
        }
        bytes
    }

    /// Write the frame as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        out.write_all(&self.to_rgb())?;
        out.flush()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
