pub mod color;
pub mod geom;
pub mod image_formats;
pub mod palette;

pub use color::{BlendMode, Color};
pub use geom::{Point, Rect};
pub use image_formats::{Image, Rgba8, RgbaBuffer};
pub use palette::{Direction, Palette};
