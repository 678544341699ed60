//! Drawing configuration and its builder.
//!
//! # Examples
//!
//! ```
//! use wetpaint::{ChannelOrder, DrawingBuilder};
//!
//! let drawing = DrawingBuilder::new(640, 480)
//!     .with_background(0x20)
//!     .with_channel_order(ChannelOrder::Bgra)
//!     .build()
//!     .unwrap();
//! assert_eq!(drawing.dimensions(), (640, 480));
//! ```

use crate::brush::brush::{Brush, RADIUS_MAX};
use crate::canvas::compositor::{BACKGROUND_DEFAULT, ChannelOrder};
use crate::canvas::drawing::Drawing;
use crate::image::palette::Palette;
use crate::utils::error::{PaintError, Result};

/// Everything a [`Drawing`] is created from.
#[derive(Debug, Clone)]
pub struct DrawingConfig {
    /// Canvas width in pixels (default: 400)
    pub width: u32,
    /// Canvas height in pixels (default: 400)
    pub height: u32,
    /// Backdrop intensity shown through transparent pixels (default: 0x40)
    pub background: u8,
    /// Upper bound for brush radius commands (default: 64)
    pub radius_max: f64,
    /// Byte order of presentation frames (default: RGBA)
    pub channel_order: ChannelOrder,
    /// The brush the drawing starts with; it is stored and active.
    pub brush: Brush,
    /// Colors the palette commands step through.
    pub palette: Palette,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: BACKGROUND_DEFAULT,
            radius_max: RADIUS_MAX,
            channel_order: ChannelOrder::default(),
            brush: Brush::default(),
            palette: Palette::default(),
        }
    }
}

impl DrawingConfig {
    /// Checks the values a drawing cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PaintError::InvalidArg(format!(
                "canvas must not be empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.radius_max >= 0.0) {
            return Err(PaintError::InvalidArg(format!(
                "radius_max must be non-negative, got {}",
                self.radius_max
            )));
        }
        if self.palette.is_empty() {
            return Err(PaintError::InvalidArg("palette must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Builder for a [`Drawing`].
#[derive(Debug, Clone)]
pub struct DrawingBuilder {
    config: DrawingConfig,
}

impl DrawingBuilder {
    /// Starts from the defaults with the given canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            config: DrawingConfig {
                width,
                height,
                ..DrawingConfig::default()
            },
        }
    }

    pub fn with_background(mut self, background: u8) -> Self {
        self.config.background = background;
        self
    }

    pub fn with_radius_max(mut self, radius_max: f64) -> Self {
        self.config.radius_max = radius_max;
        self
    }

    pub fn with_channel_order(mut self, order: ChannelOrder) -> Self {
        self.config.channel_order = order;
        self
    }

    pub fn with_brush(mut self, brush: Brush) -> Self {
        self.config.brush = brush;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.config.palette = palette;
        self
    }

    pub fn config(&self) -> &DrawingConfig {
        &self.config
    }

    /// Validates the configuration and creates the drawing.
    pub fn build(self) -> Result<Drawing> {
        Drawing::new(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DrawingConfig::default();
        assert_eq!((config.width, config.height), (400, 400));
        assert_eq!(config.background, 0x40);
        assert_eq!(config.radius_max, 64.0);
        assert_eq!(config.brush.radius, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_sets_fields() {
        let builder = DrawingBuilder::new(10, 20)
            .with_background(7)
            .with_radius_max(8.0)
            .with_channel_order(ChannelOrder::Bgra);
        let config = builder.config();
        assert_eq!((config.width, config.height), (10, 20));
        assert_eq!(config.background, 7);
        assert_eq!(config.radius_max, 8.0);
        assert_eq!(config.channel_order, ChannelOrder::Bgra);
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(matches!(
            DrawingBuilder::new(0, 10).build(),
            Err(PaintError::InvalidArg(_))
        ));
        assert!(DrawingBuilder::new(10, 10).with_radius_max(-1.0).build().is_err());
        assert!(DrawingBuilder::new(10, 10)
            .with_palette(Palette::new(Vec::new()))
            .build()
            .is_err());
    }
}
