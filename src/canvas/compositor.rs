//! Recomposition of an invalidated rectangle across the layer stack.
//!
//! For every pixel of the rectangle the stack is walked bottom to top into a
//! float scratch buffer. The bottom layer replaces what is there; layers above
//! it are alpha-composited with the absorptive blend. The scratch is then
//! written twice: straight into the persistence raster as 8-bit RGBA, and
//! blended toward a constant background intensity into the presentation
//! bytes, so transparent regions show a neutral backdrop without it ever
//! reaching the stored layers.

use crate::canvas::layer_stack::{Layer, LayerStack};
use crate::image::color::Color;
use crate::image::geom::Rect;
use crate::image::image_formats::{Image, Rgba8, RgbaBuffer};
use crate::utils::log::trace;

/// Default backdrop intensity behind transparent pixels.
pub const BACKGROUND_DEFAULT: u8 = 0x40;

/// Byte order of each presentation pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgba,
    /// Blue first, as Z-pixmap style presenters expect.
    Bgra,
}

/// One recomposed region ready for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Canvas area the pixels cover, always inside the canvas.
    pub rect: Rect,
    /// Background-blended 8-bit pixels, `rect.width * rect.height * 4` bytes.
    pub pixels: Vec<u8>,
}

/// Receiver of recomposed regions, e.g. a window surface.
pub trait PresentationSink {
    fn present(&mut self, rect: Rect, pixels: &[u8]);
}

impl PresentationSink for Vec<Frame> {
    fn present(&mut self, rect: Rect, pixels: &[u8]) {
        self.push(Frame {
            rect,
            pixels: pixels.to_vec(),
        });
    }
}

impl Frame {
    /// Hands the frame to a sink.
    pub fn present_to<S: PresentationSink + ?Sized>(&self, sink: &mut S) {
        sink.present(self.rect, &self.pixels);
    }
}

/// Composes the full stack at one canvas pixel.
fn composite_pixel(layers: &[&Layer], x: u32, y: u32) -> Color {
    let mut out = Color::TRANSPARENT;
    for (i, layer) in layers.iter().enumerate() {
        let src = layer.image().get_pixel(x, y);
        if i == 0 {
            out = src;
            out.alpha = layer.opacity * src.alpha;
            continue;
        }
        if layer.opacity > 0.0 && src.alpha > 0.0 {
            let alpha = out.alpha;
            let src_alpha = src.alpha;
            let inv_alpha = 1.0 / (alpha * (1.0 - src_alpha) + layer.opacity * src_alpha);
            let below = out.multiply(alpha);
            let above = src.multiply(layer.opacity);
            out = below.blend_absorb(src_alpha, above).multiply(inv_alpha);
            out.alpha = (alpha + layer.opacity * src_alpha).min(1.0);
        }
    }
    out
}

#[cfg(feature = "rayon")]
fn fill_rows<F>(scratch: &mut Image, f: F)
where
    F: Fn(u32, &mut [Color]) + Sync + Send,
{
    use rayon::prelude::*;

    let width = scratch.width() as usize;
    scratch
        .pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| f(i as u32, row));
}

#[cfg(not(feature = "rayon"))]
fn fill_rows<F>(scratch: &mut Image, f: F)
where
    F: Fn(u32, &mut [Color]) + Sync + Send,
{
    let width = scratch.width() as usize;
    scratch
        .pixels_mut()
        .chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| f(i as u32, row));
}

/// Blends a byte toward the background by `1 - f`.
fn over_background(f: f64, background: u8, value: u8) -> u8 {
    ((1.0 - f) * background as f64 + f * value as f64) as u8
}

/// Turns invalidated rectangles into presentation frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compositor {
    pub background: u8,
    pub order: ChannelOrder,
}

impl Default for Compositor {
    fn default() -> Self {
        Compositor {
            background: BACKGROUND_DEFAULT,
            order: ChannelOrder::default(),
        }
    }
}

impl Compositor {
    pub fn new(background: u8, order: ChannelOrder) -> Self {
        Compositor { background, order }
    }

    /// Composes `rect` (already inside the canvas) into a scratch image the
    /// size of the rectangle.
    pub fn compose(&self, layers: &LayerStack, rect: Rect) -> Image {
        let stack: Vec<&Layer> = layers.iter().map(|(_, layer)| layer).collect();
        let mut scratch = Image::new(rect.width, rect.height);
        if rect.is_empty() {
            return scratch;
        }
        let (x0, y0) = (rect.x as u32, rect.y as u32);
        fill_rows(&mut scratch, |i, row| {
            for (j, pixel) in row.iter_mut().enumerate() {
                *pixel = composite_pixel(&stack, x0 + j as u32, y0 + i);
            }
        });
        scratch
    }

    /// Recomposes `invalid` and writes it into `raster`.
    ///
    /// The rectangle is clipped to the raster first. Returns `None` when
    /// nothing of it is left; otherwise returns the background-blended
    /// presentation bytes for the clipped rectangle.
    pub fn update(&self, layers: &LayerStack, invalid: Rect, raster: &mut RgbaBuffer) -> Option<Frame> {
        let (canvas_w, canvas_h) = raster.dimensions();
        let rect = invalid.clamp_to(canvas_w, canvas_h);
        if rect.is_empty() {
            trace!("nothing to compose for {:?}", invalid);
            return None;
        }
        trace!("composing {:?} over {} layers", rect, layers.len());

        let scratch = self.compose(layers, rect);
        let mut pixels = Vec::with_capacity(rect.area() * 4);
        for (i, row) in scratch.pixels().chunks(rect.width as usize).enumerate() {
            let y = rect.y as u32 + i as u32;
            for (j, color) in row.iter().enumerate() {
                let x = rect.x as u32 + j as u32;
                let surface = Rgba8::from(*color);
                raster.put_pixel(x, y, surface);

                let f = color.alpha as f64;
                let bg = self.background;
                let [r, g, b, a] = [surface.r, surface.g, surface.b, surface.a]
                    .map(|v| over_background(f, bg, v));
                match self.order {
                    ChannelOrder::Rgba => pixels.extend_from_slice(&[r, g, b, a]),
                    ChannelOrder::Bgra => pixels.extend_from_slice(&[b, g, r, a]),
                }
            }
        }
        Some(Frame { rect, pixels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    fn stack_with(bottom: Color, top: Option<(Color, f32)>) -> LayerStack {
        let mut stack = LayerStack::new(4, 4);
        let id = stack.add_top_layer();
        *stack.get_mut(id).unwrap().image_mut() = Image::from_color(4, 4, bottom);
        if let Some((color, opacity)) = top {
            let id = stack.add_top_layer();
            let layer = stack.get_mut(id).unwrap();
            *layer.image_mut() = Image::from_color(4, 4, color);
            layer.opacity = opacity;
        }
        stack
    }

    #[test]
    fn test_transparent_top_layer_leaves_bottom() {
        let stack = stack_with(BLUE, Some((Color::TRANSPARENT, 0.5)));
        let scratch = Compositor::default().compose(&stack, Rect::new(1, 1, 2, 2));
        assert_eq!(scratch.dimensions(), (2, 2));
        assert!(scratch.pixels().iter().all(|c| *c == BLUE));
    }

    #[test]
    fn test_bottom_alpha_scaled_by_opacity() {
        let mut stack = stack_with(BLUE, None);
        let id = stack.bottom().unwrap();
        stack.get_mut(id).unwrap().opacity = 0.5;
        let scratch = Compositor::default().compose(&stack, Rect::new(0, 0, 1, 1));
        assert_eq!(scratch.get_pixel(0, 0), Color::new(0.0, 0.0, 1.0, 0.5));
    }

    #[test]
    fn test_opaque_top_over_opaque_bottom() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let stack = stack_with(BLUE, Some((red, 1.0)));
        let c = Compositor::default().compose(&stack, Rect::new(0, 0, 1, 1)).get_pixel(0, 0);
        assert!((c.red - 1.0).abs() < 1e-5);
        assert!(c.blue.abs() < 1e-5);
        assert_eq!(c.alpha, 1.0);
    }

    #[test]
    fn test_half_transparent_top_accumulates_alpha() {
        let red = Color::new(1.0, 0.0, 0.0, 0.5);
        let stack = stack_with(Color::new(0.0, 0.0, 1.0, 0.25), Some((red, 1.0)));
        let c = Compositor::default().compose(&stack, Rect::new(0, 0, 1, 1)).get_pixel(0, 0);
        assert!((c.alpha - 0.75).abs() < 1e-6);
        // premultiplied blend: red 0.5 * 1 / (0.25 * 0.5 + 0.5) = 0.8
        assert!((c.red - 0.8).abs() < 1e-5);
        assert!((c.blue - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_update_writes_raster_and_frame() {
        let stack = stack_with(BLUE, None);
        let mut raster = RgbaBuffer::new(4, 4);
        let compositor = Compositor::new(0x40, ChannelOrder::Rgba);
        let frame = compositor
            .update(&stack, Rect::new(-2, 2, 4, 10), &mut raster)
            .expect("frame");
        assert_eq!(frame.rect, Rect::new(0, 2, 2, 2));
        assert_eq!(frame.pixels.len(), 16);
        assert_eq!(&frame.pixels[..4], &[0, 0, 255, 255]);
        assert_eq!(raster.get_pixel(1, 3), Rgba8::new(0, 0, 255, 255));
        assert_eq!(raster.get_pixel(2, 3), Rgba8::transparent());
    }

    #[test]
    fn test_transparent_pixels_show_background() {
        let stack = stack_with(Color::TRANSPARENT, None);
        let mut raster = RgbaBuffer::new(4, 4);
        let frame = Compositor::new(0x40, ChannelOrder::Bgra)
            .update(&stack, Rect::new(0, 0, 1, 1), &mut raster)
            .unwrap();
        assert_eq!(frame.pixels, vec![0x40, 0x40, 0x40, 0x40]);
        assert_eq!(raster.get_pixel(0, 0), Rgba8::transparent());
    }

    #[test]
    fn test_bgra_order_and_partial_alpha() {
        let stack = stack_with(Color::new(1.0, 0.0, 0.0, 0.5), None);
        let mut raster = RgbaBuffer::new(4, 4);
        let frame = Compositor::new(0, ChannelOrder::Bgra)
            .update(&stack, Rect::new(3, 3, 1, 1), &mut raster)
            .unwrap();
        // surface red = 255, alpha = 127; over a black backdrop by 0.5
        assert_eq!(frame.pixels, vec![0, 0, 127, 63]);
    }

    #[test]
    fn test_update_skips_outside_and_empty() {
        let stack = stack_with(BLUE, None);
        let mut raster = RgbaBuffer::new(4, 4);
        let c = Compositor::default();
        assert!(c.update(&stack, Rect::new(4, 0, 3, 3), &mut raster).is_none());
        assert!(c.update(&stack, Rect::new(1, 1, 0, 3), &mut raster).is_none());
        assert!(c.update(&stack, Rect::empty(), &mut raster).is_none());
        assert_eq!(raster, RgbaBuffer::new(4, 4));
    }

    #[test]
    fn test_frames_collect_into_vec_sink() {
        let stack = stack_with(BLUE, None);
        let mut raster = RgbaBuffer::new(4, 4);
        let frame = Compositor::default()
            .update(&stack, Rect::new(0, 0, 4, 4), &mut raster)
            .unwrap();
        let mut sink: Vec<Frame> = Vec::new();
        frame.present_to(&mut sink);
        assert_eq!(sink, vec![frame]);
    }
}
