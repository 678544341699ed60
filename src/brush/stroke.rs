//! Stroke rasterization: turning one pointer movement into brush stamps.
//!
//! A segment from the previous pointer position to the new one is sampled at
//! `t = 0, density, 2 * density, ...` while `t < 1 + density`, so the end
//! point always gets a stamp. Each stamp is a filled disk of radius
//! `brush.radius * pressure` written into the layer image.
//!
//! Pixels inside one stamp are independent of each other; the only shared
//! state is the `(sum, count)` accumulator used for smudging and picking,
//! which is reduced per row. With the `rayon` feature the rows run in
//! parallel.

use crate::brush::brush::Brush;
use crate::image::color::Color;
use crate::image::geom::{Point, Rect};
use crate::image::image_formats::Image;
use crate::utils::log::{debug, trace};

/// Multiplier applied to every stamp's soft-edge alpha.
const BRUSH_ALPHA: f64 = 1.0;

/// One pointer movement with the pressure it was made at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
    /// Stylus pressure in `[0, 1]`.
    pub pressure: f64,
}

impl Segment {
    pub fn new(from: Point, to: Point, pressure: f64) -> Self {
        Segment { from, to, pressure }
    }
}

/// What a segment did besides writing pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrokeOutcome {
    /// Union of the bounding boxes of every stamp; empty if nothing was stamped.
    pub invalid: Rect,
    /// Number of stamps laid down.
    pub stamps: usize,
    /// Averaged canvas color from the last stamp of a picking brush.
    pub picked: Option<Color>,
}

impl StrokeOutcome {
    /// Folds the outcome of another brush on the same segment into this one.
    pub fn merge(&mut self, other: StrokeOutcome) {
        self.invalid = self.invalid.union(&other.invalid);
        self.stamps += other.stamps;
        if other.picked.is_some() {
            self.picked = other.picked;
        }
    }
}

/// Running color sum over the pixels a stamp blended into.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulator {
    sum: Color,
    count: u32,
}

impl Accumulator {
    fn push(&mut self, color: Color) {
        self.sum += color;
        self.count += 1;
    }

    fn merge(self, other: Accumulator) -> Accumulator {
        Accumulator {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }

    fn average(self) -> Option<Color> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f32)
        }
    }
}

/// Per-stamp constants shared by every row of the scan.
#[derive(Debug, Clone, Copy)]
struct Stamp<'a> {
    brush: &'a Brush,
    center: Point,
    radius_sq: f64,
    color: Color,
    /// Scanned columns, inclusive, already clipped to the image.
    cols: (u32, u32),
}

impl Stamp<'_> {
    /// Soft-edge alpha for a pixel at squared distance `distance_sq`.
    fn edge_alpha(&self, distance_sq: f64) -> f64 {
        let hardness = self.brush.hardness;
        let alpha = if distance_sq / self.radius_sq >= hardness {
            hardness * hardness * self.radius_sq / distance_sq
        } else {
            1.0
        };
        alpha * BRUSH_ALPHA
    }

    /// Applies the stamp to one image row and returns what it accumulated.
    fn apply_row(&self, y: u32, row: &mut [Color]) -> Accumulator {
        let mut acc = Accumulator::default();
        let dy = y as f64 - self.center.y;
        for x in self.cols.0..=self.cols.1 {
            let dx = x as f64 - self.center.x;
            let distance_sq = dx * dx + dy * dy;
            // also rejects NaN distances
            if !(distance_sq <= self.radius_sq) {
                continue;
            }
            let pixel = &mut row[x as usize];
            let mut final_color = *pixel;
            let alpha = self.edge_alpha(distance_sq) as f32;

            if self.brush.is_erasing {
                if final_color.alpha > 0.0 {
                    let blend_factor = alpha * self.color.alpha;
                    final_color.alpha = (1.0 - blend_factor) * final_color.alpha;
                }
            } else if final_color.alpha > 0.0 {
                let blend_factor = alpha * self.color.alpha;
                final_color = self.brush.mode.mix(blend_factor, final_color, self.color);
                acc.push(final_color);
            } else {
                final_color = self.color;
                final_color.alpha = alpha * self.color.alpha;
            }

            if !self.brush.is_picking {
                *pixel = final_color;
            }
        }
        acc
    }
}

#[cfg(feature = "rayon")]
fn scan_rows(stamp: &Stamp<'_>, band: &mut [Color], width: usize, first_row: u32) -> Accumulator {
    use rayon::prelude::*;

    band.par_chunks_mut(width)
        .enumerate()
        .map(|(k, row)| stamp.apply_row(first_row + k as u32, row))
        .reduce(Accumulator::default, Accumulator::merge)
}

#[cfg(not(feature = "rayon"))]
fn scan_rows(stamp: &Stamp<'_>, band: &mut [Color], width: usize, first_row: u32) -> Accumulator {
    band.chunks_mut(width)
        .enumerate()
        .map(|(k, row)| stamp.apply_row(first_row + k as u32, row))
        .fold(Accumulator::default(), Accumulator::merge)
}

/// Inclusive scan range `[c - ceil(r), c + 2 ceil(r) + 1]` clipped to
/// `[0, limit)`; `None` when nothing of it lies on the image.
fn scan_range(center: i64, r_ceil: i64, limit: u32) -> Option<(u32, u32)> {
    let lo = center.saturating_sub(r_ceil).max(0);
    let hi = center
        .saturating_add(r_ceil.saturating_mul(2))
        .saturating_add(1)
        .min(limit as i64 - 1);
    if lo > hi {
        None
    } else {
        Some((lo as u32, hi as u32))
    }
}

/// Bounding box of one stamp, kept inside the image on the far edges.
///
/// The box is `2 ceil(r) + 1` on a side, anchored at `trunc(center - r)` and
/// pulled back until it ends at or before the image edge. A box larger than
/// the image ends up anchored at a negative coordinate instead of looping.
/// Edges beyond the `i32` range saturate.
pub fn stamp_bounds(center: Point, radius: f64, width: u32, height: u32) -> Rect {
    let size = 2.0 * radius.ceil() + 1.0;
    let span = |c: f64, dim: u32| {
        let dim = dim as f64;
        let start = (c.trunc() - radius).trunc();
        // the end is taken directly so huge radii do not cancel it out
        let lo = start.min(dim - size) as i32;
        let hi = (start + size).min(dim) as i32;
        (lo, (hi as i64 - lo as i64).max(0) as u32)
    };
    let (x, width) = span(center.x, width);
    let (y, height) = span(center.y, height);
    Rect::new(x, y, width, height)
}

/// Lays one brush along a segment into `image`.
///
/// Brushes that are not drawing, or whose density, effective radius or
/// hardness is not positive, leave the image alone and report an empty
/// rectangle. So does a radius that is not finite. After every stamp that blended into existing paint, the
/// averaged color feeds smudging (the paint drifts toward it) and picking
/// (the paint becomes it).
pub fn stroke_segment(image: &mut Image, brush: &mut Brush, segment: &Segment) -> StrokeOutcome {
    let density = brush.density;
    let radius = brush.radius * segment.pressure;
    let smudge = (brush.smudge * segment.pressure) as f32;
    let mut outcome = StrokeOutcome::default();

    if !brush.is_drawing
        || density <= 0.0
        || !(radius > 0.0 && radius.is_finite())
        || brush.hardness <= 0.0
    {
        debug!(
            "brush skipped (drawing: {}, density: {}, radius: {}, hardness: {})",
            brush.is_drawing, density, radius, brush.hardness
        );
        return outcome;
    }

    let (width, height) = image.dimensions();
    let radius_sq = radius * radius;
    let r_ceil = radius.ceil() as i64;

    let mut t = 0.0;
    while t < 1.0 + density {
        let center = segment.from.lerp(t, segment.to);
        t += density;

        let bounds = stamp_bounds(center, radius, width, height);
        outcome.invalid = outcome.invalid.union(&bounds);
        outcome.stamps += 1;

        let cols = scan_range(center.x as i64, r_ceil, width);
        let rows = scan_range(center.y as i64, r_ceil, height);
        let (Some(cols), Some(rows)) = (cols, rows) else {
            continue;
        };

        let stamp = Stamp {
            brush: &*brush,
            center,
            radius_sq,
            color: brush.stamp_color(),
            cols,
        };
        let w = width as usize;
        let band = &mut image.pixels_mut()[rows.0 as usize * w..(rows.1 as usize + 1) * w];
        let acc = scan_rows(&stamp, band, w, rows.0);
        trace!(
            "stamp at ({:.1}, {:.1}) r={:.2}: {} pixels blended",
            center.x, center.y, radius, acc.count
        );

        if let Some(average) = acc.average() {
            if brush.is_smudging {
                brush.color = brush.color.blend_absorb(smudge, average);
            }
            if brush.is_picking {
                brush.color = average;
                outcome.picked = Some(average);
            }
        }
    }
    outcome
}
