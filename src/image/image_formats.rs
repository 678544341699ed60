// src/image_formats.rs

//! In-memory pixel buffers.
//!
//! `Image` is the floating point working buffer every layer owns. `RgbaBuffer`
//! is the flat 8-bit raster handed to presenters and codecs; its pixels are
//! `Pod`, so the whole buffer can be viewed as bytes without copying.

use crate::image::color::Color;
use bytemuck::{Pod, Zeroable};

// --- Pixel Type Definitions ---

/// A single RGBA pixel with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }

    pub fn transparent() -> Self {
        Rgba8::default()
    }
}

impl From<Color> for Rgba8 {
    /// Scales by 255 and truncates each channel.
    fn from(c: Color) -> Self {
        Rgba8 {
            r: Color::channel_to_u8(c.red),
            g: Color::channel_to_u8(c.green),
            b: Color::channel_to_u8(c.blue),
            a: Color::channel_to_u8(c.alpha),
        }
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from(arr: [u8; 4]) -> Self {
        Rgba8::new(arr[0], arr[1], arr[2], arr[3])
    }
}

impl From<Rgba8> for [u8; 4] {
    fn from(p: Rgba8) -> Self {
        [p.r, p.g, p.b, p.a]
    }
}

// --- Image Type (Float Color Buffer) ---

/// A dense 2D buffer of colors, row-major.
///
/// The dimensions never change after creation.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl Image {
    /// Creates a new image with the given dimensions, fully transparent.
    pub fn new(width: u32, height: u32) -> Self {
        Image {
            width,
            height,
            data: vec![Color::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Creates an image filled with a single color.
    pub fn from_color(width: u32, height: u32, color: Color) -> Self {
        Image {
            width,
            height,
            data: vec![color; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.data[self.index(x, y)]
    }

    pub fn get_pixel_mut(&mut self, x: u32, y: u32) -> &mut Color {
        let i = self.index(x, y);
        &mut self.data[i]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.data
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(Color::TRANSPARENT);
    }
}

// --- RgbaBuffer Type (8-bit Raster) ---

/// A 2D buffer of 8-bit RGBA pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    data: Vec<Rgba8>,
}

impl RgbaBuffer {
    /// Creates a new buffer, every byte zero.
    pub fn new(width: u32, height: u32) -> Self {
        RgbaBuffer {
            width,
            height,
            data: vec![Rgba8::transparent(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba8 {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgba8) {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize] = pixel;
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.data
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.data
    }

    /// Zeroes every byte.
    pub fn clear(&mut self) {
        self.data.fill(Rgba8::transparent());
    }

    /// Returns raw pixel data as a byte slice.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Returns mutable raw pixel data as a byte slice.
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Copies the raw bytes out, e.g. to hand them to an image codec.
    pub fn into_raw(self) -> Vec<u8> {
        self.as_raw().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_transparent() {
        let img = Image::new(3, 2);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.pixels().len(), 6);
        assert!(img.pixels().iter().all(|c| *c == Color::TRANSPARENT));
    }

    #[test]
    fn test_put_get_and_clear() {
        let mut img = Image::new(4, 4);
        let red = Color::rgb(1.0, 0.0, 0.0);
        img.put_pixel(3, 1, red);
        assert_eq!(img.get_pixel(3, 1), red);
        assert_eq!(img.pixels()[4 + 3], red);
        img.get_pixel_mut(0, 0).alpha = 0.5;
        assert_eq!(img.get_pixel(0, 0).alpha, 0.5);
        img.clear();
        assert_eq!(img.get_pixel(3, 1), Color::TRANSPARENT);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let img = Image::new(2, 2);
        img.get_pixel(2, 0);
    }

    #[test]
    fn test_rgba_from_color_truncates() {
        let px = Rgba8::from(Color::new(1.0, 0.5, 0.0, 0.999));
        assert_eq!(px, Rgba8::new(255, 127, 0, 254));
    }

    #[test]
    fn test_rgba_buffer_raw_view() {
        let mut buf = RgbaBuffer::new(2, 1);
        buf.put_pixel(1, 0, Rgba8::new(1, 2, 3, 4));
        assert_eq!(buf.as_raw(), &[0, 0, 0, 0, 1, 2, 3, 4]);
        buf.as_raw_mut()[0] = 9;
        assert_eq!(buf.get_pixel(0, 0).r, 9);
        buf.clear();
        assert!(buf.into_raw().iter().all(|&b| b == 0));
    }
}
