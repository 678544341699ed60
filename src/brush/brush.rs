//! Brush definitions and the set of brushes a drawing knows about.

use crate::image::color::{BlendMode, Color};
use crate::utils::error::{PaintError, Result};
use crate::utils::log::debug;

/// Default brush radius in pixels.
pub const RADIUS_DEFAULT: f64 = 20.0;
/// Largest radius the resize commands allow.
pub const RADIUS_MAX: f64 = 64.0;

/// A single brush: stamp geometry, colors and the behavior flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// Radius at full pressure.
    pub radius: f64,
    /// Soft-edge knob in `(0, 1]`; 1 gives a hard disk.
    pub hardness: f64,
    /// Parametric step between stamps along a segment.
    pub density: f64,
    /// How strongly smudging pulls the paint toward the canvas color.
    pub smudge: f64,
    pub mode: BlendMode,
    /// The paint color.
    pub color: Color,
    /// Pre-mixed into `color` by `medium_color.alpha` before stamping.
    pub medium_color: Color,
    pub is_drawing: bool,
    pub is_erasing: bool,
    pub is_picking: bool,
    pub is_smudging: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Brush {
            radius: RADIUS_DEFAULT,
            hardness: 0.4,
            density: 2.5,
            smudge: 0.5,
            mode: BlendMode::Normal,
            color: Color::new(1.0, 0.1, 0.25, 0.8),
            medium_color: Color::new(0.9, 0.9, 0.75, 0.0),
            is_drawing: false,
            is_erasing: false,
            is_picking: false,
            is_smudging: false,
        }
    }
}

impl Brush {
    /// A hard brush painting `color` with no medium mixed in.
    pub fn solid(radius: f64, color: Color) -> Self {
        Brush {
            radius,
            hardness: 1.0,
            density: 1.0,
            color,
            medium_color: Color::TRANSPARENT,
            is_drawing: true,
            ..Brush::default()
        }
    }

    /// The color a stamp actually lays down: paint pre-mixed with the
    /// medium by the medium's alpha, using the brush's blend mode.
    pub fn stamp_color(&self) -> Color {
        self.mode
            .mix(self.medium_color.alpha, self.color, self.medium_color)
    }

    /// Grows or shrinks the radius, clamped to `[0, radius_max]`.
    pub fn adjust_radius(&mut self, delta: f64, radius_max: f64) {
        self.radius = (self.radius + delta).clamp(0.0, radius_max);
    }

    /// Changes the paint alpha, clamped to `[0, 1]`.
    pub fn adjust_alpha(&mut self, delta: f32) {
        self.color.alpha = (self.color.alpha + delta).clamp(0.0, 1.0);
    }
}

/// Stable handle to a brush in a [`BrushSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrushId(usize);

impl BrushId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// All defined brushes plus the ordered active subset.
///
/// Brushes sit in an arena with free-slot reuse. The active list holds ids
/// in application order; every active brush is applied to every sample.
#[derive(Debug, Clone, Default)]
pub struct BrushSet {
    slots: Vec<Option<Brush>>,
    free: Vec<usize>,
    stored: Vec<BrushId>,
    active: Vec<BrushId>,
}

impl BrushSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a brush and returns its handle. New brushes are not active.
    pub fn insert(&mut self, brush: Brush) -> BrushId {
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(brush);
                BrushId(index)
            }
            None => {
                self.slots.push(Some(brush));
                BrushId(self.slots.len() - 1)
            }
        };
        self.stored.push(id);
        id
    }

    /// Removes a brush, dropping it from the active list too.
    pub fn remove(&mut self, id: BrushId) -> Result<Brush> {
        let brush = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(PaintError::UnknownBrush(id.0))?;
        self.free.push(id.0);
        self.stored.retain(|&b| b != id);
        self.active.retain(|&b| b != id);
        debug!("removed brush {}", id.0);
        Ok(brush)
    }

    /// Appends a stored brush to the end of the active list.
    pub fn activate(&mut self, id: BrushId) -> Result<()> {
        if self.get(id).is_none() {
            return Err(PaintError::UnknownBrush(id.0));
        }
        if !self.active.contains(&id) {
            self.active.push(id);
        }
        Ok(())
    }

    pub fn deactivate(&mut self, id: BrushId) {
        self.active.retain(|&b| b != id);
    }

    pub fn get(&self, id: BrushId) -> Option<&Brush> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: BrushId) -> Option<&mut Brush> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Ids of every stored brush, in insertion order.
    pub fn stored(&self) -> &[BrushId] {
        &self.stored
    }

    /// Ids of the active brushes, in application order.
    pub fn active(&self) -> &[BrushId] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.stored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    /// Runs `f` on every active brush in order.
    pub fn for_each_active(&mut self, mut f: impl FnMut(&mut Brush)) {
        for &id in &self.active {
            if let Some(brush) = self.slots[id.0].as_mut() {
                f(brush);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_color_without_medium_is_paint() {
        let brush = Brush::solid(5.0, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(brush.stamp_color(), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_stamp_color_mixes_medium_by_its_alpha() {
        let mut brush = Brush::solid(5.0, Color::rgb(1.0, 0.0, 0.0));
        brush.medium_color = Color::new(0.0, 0.0, 1.0, 0.5);
        let c = brush.stamp_color();
        assert!((c.red - 0.5).abs() < 1e-6);
        assert!((c.blue - 0.5).abs() < 1e-6);
        assert!((c.alpha - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_adjust_radius_clamps() {
        let mut brush = Brush::default();
        brush.radius = 63.5;
        brush.adjust_radius(1.0, RADIUS_MAX);
        assert_eq!(brush.radius, RADIUS_MAX);
        brush.radius = 0.5;
        brush.adjust_radius(-1.0, RADIUS_MAX);
        assert_eq!(brush.radius, 0.0);
    }

    #[test]
    fn test_adjust_alpha_clamps() {
        let mut brush = Brush::default();
        brush.color.alpha = 0.995;
        brush.adjust_alpha(0.01);
        assert_eq!(brush.color.alpha, 1.0);
        brush.color.alpha = 0.005;
        brush.adjust_alpha(-0.01);
        assert_eq!(brush.color.alpha, 0.0);
    }

    #[test]
    fn test_active_list_keeps_order_and_survives_removal() {
        let mut set = BrushSet::new();
        let a = set.insert(Brush::default());
        let b = set.insert(Brush::default());
        let c = set.insert(Brush::default());
        set.activate(c).unwrap();
        set.activate(a).unwrap();
        set.activate(a).unwrap();
        assert_eq!(set.active(), &[c, a]);

        set.remove(c).unwrap();
        assert_eq!(set.active(), &[a]);
        assert_eq!(set.stored(), &[a, b]);
        assert_eq!(set.remove(c), Err(PaintError::UnknownBrush(c.index())));

        let d = set.insert(Brush::default());
        assert_eq!(d.index(), c.index());
        assert!(set.activate(d).is_ok());
    }

    #[test]
    fn test_for_each_active_touches_only_active() {
        let mut set = BrushSet::new();
        let a = set.insert(Brush::default());
        let b = set.insert(Brush::default());
        set.activate(b).unwrap();
        set.for_each_active(|brush| brush.is_erasing = true);
        assert!(!set.get(a).unwrap().is_erasing);
        assert!(set.get(b).unwrap().is_erasing);
    }
}
