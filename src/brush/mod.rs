pub mod brush;
pub mod stroke;

pub use brush::{Brush, BrushId, BrushSet, RADIUS_MAX};
pub use stroke::{Segment, StrokeOutcome, stroke_segment};
