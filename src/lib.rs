//! A raster painting engine: brush stamping, layer compositing and
//! dirty-rectangle bookkeeping beneath a pointer/stylus painting surface.
//!
//! The crate owns no window or input device. It consumes normalized pointer
//! samples and discrete commands, mutates a stack of float RGBA layers, and
//! hands back the recomposed region as 8-bit pixels for presentation, plus a
//! flat RGBA raster of the whole canvas for export.
//!
//! # Quick Start
//!
//! ```
//! use wetpaint::{Brush, Color, Command, DrawingBuilder, PointerSample, Point};
//!
//! let mut drawing = DrawingBuilder::new(64, 64)
//!     .with_brush(Brush { is_drawing: false, ..Brush::solid(4.0, Color::rgb(1.0, 0.0, 0.0)) })
//!     .build()?;
//! drawing.apply(Command::ToggleDrawing)?;
//!
//! drawing.pointer_moved(Point::new(10.0, 10.0));
//! if let Some(frame) = drawing.sample(PointerSample::new(40.0, 20.0, 0.8)) {
//!     // hand frame.rect and frame.pixels to the window surface
//!     assert_eq!(frame.pixels.len(), frame.rect.area() * 4);
//! }
//!
//! // flat RGBA8 canvas for an image codec
//! let bytes = drawing.raster().as_raw();
//! assert_eq!(bytes.len(), 64 * 64 * 4);
//! # Ok::<(), wetpaint::PaintError>(())
//! ```
//!
//! # Features
//!
//! - **Two blend families**: linear and absorptive (pigment-like) mixing
//! - **Soft brushes**: hardness falloff, erasing, smudging and color picking
//! - **Layer stack**: arena-backed, O(1) push/pop at the top
//! - **Dirty rectangles**: only the touched region is recomposed
//! - **Optional parallelism**: enable the `rayon` feature for parallel stamping and compositing

// Core modules
pub mod brush;
pub mod canvas;
pub mod image;
pub mod utils;

// Public drawing API
pub use canvas::{
    ChannelOrder, Command, Compositor, Drawing, DrawingBuilder, DrawingConfig, Frame,
    LayerId, LayerStack, PointerSample, PresentationSink,
};

// Brushes and strokes
pub use brush::{Brush, BrushId, BrushSet, Segment, StrokeOutcome, stroke_segment};

// Image types
pub use image::{BlendMode, Color, Direction, Image, Palette, Point, Rect, Rgba8, RgbaBuffer};

// Error types
pub use utils::error::{PaintError, Result};
