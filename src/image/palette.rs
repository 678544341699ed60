// src/palette.rs

//! The fixed tool palette and the cursor used to step through it.

use crate::image::color::Color;
use crate::utils::error::{PaintError, Result};

pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);

/// Direction of a cycling command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// An ordered list of tool colors with an optional selection.
///
/// Nothing is selected initially; cycling does nothing until a color has
/// been picked by index once.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<Color>,
    selected: Option<usize>,
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(vec![
            RED, GREEN, BLUE, WHITE, BLACK, GRAY, CYAN, MAGENTA, YELLOW,
        ])
    }
}

impl Palette {
    /// Creates a palette from a list of colors.
    pub fn new(colors: Vec<Color>) -> Self {
        Palette {
            colors,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selects the color at `index` and returns it.
    pub fn select(&mut self, index: usize) -> Result<Color> {
        let color = *self.colors.get(index).ok_or_else(|| {
            PaintError::InvalidArg(format!(
                "palette index {} out of range (palette has {} colors)",
                index,
                self.colors.len()
            ))
        })?;
        self.selected = Some(index);
        Ok(color)
    }

    /// Steps the selection one entry, wrapping at both ends.
    ///
    /// Returns `None` while nothing has been selected yet.
    pub fn cycle(&mut self, direction: Direction) -> Option<Color> {
        let current = self.selected?;
        let n = self.colors.len();
        let next = match direction {
            Direction::Forward => (current + 1) % n,
            Direction::Backward => (current + n - 1) % n,
        };
        self.selected = Some(next);
        Some(self.colors[next])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_order() {
        let p = Palette::default();
        assert_eq!(p.len(), 9);
        assert_eq!(p.colors()[0], RED);
        assert_eq!(p.colors()[5], GRAY);
        assert_eq!(p.colors()[8], YELLOW);
    }

    #[test]
    fn test_cycle_requires_selection() {
        let mut p = Palette::default();
        assert_eq!(p.cycle(Direction::Forward), None);
        assert_eq!(p.selected(), None);
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut p = Palette::default();
        assert_eq!(p.select(8).unwrap(), YELLOW);
        assert_eq!(p.cycle(Direction::Forward), Some(RED));
        assert_eq!(p.cycle(Direction::Backward), Some(YELLOW));
        assert_eq!(p.cycle(Direction::Backward), Some(MAGENTA));
    }

    #[test]
    fn test_select_out_of_range() {
        let mut p = Palette::default();
        assert!(matches!(p.select(9), Err(PaintError::InvalidArg(_))));
        assert_eq!(p.selected(), None);
    }
}
