// Canvas state
pub mod layer_stack;
pub mod drawing;

// Recomposition and presentation
pub mod compositor;

// Configuration
pub mod config;

pub use compositor::{ChannelOrder, Compositor, Frame, PresentationSink};
pub use config::{DrawingBuilder, DrawingConfig};
pub use drawing::{Command, Drawing, PointerSample};
pub use layer_stack::{Layer, LayerId, LayerStack};
