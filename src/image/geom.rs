// src/geom.rs

//! Geometric primitives: canvas points and integer rectangles.

/// A position on the canvas in floating point pixel coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Linear interpolation from `self` (t = 0) to `to` (t = 1).
    pub fn lerp(self, t: f64, to: Point) -> Point {
        Point {
            x: t * to.x + (1.0 - t) * self.x,
            y: t * to.y + (1.0 - t) * self.y,
        }
    }
}

/// Represents a 2D rectangle with integer coordinates.
///
/// The rectangle is defined by its top-left corner (`x`, `y`) and its `width` and `height`.
/// This struct is `Copy`, so it can be passed around cheaply by value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an empty rectangle.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the x-coordinate of the right edge (`x + width`), saturating.
    pub fn x_max(&self) -> i32 {
        saturate(self.x as i64 + self.width as i64)
    }

    /// Returns the y-coordinate of the bottom edge (`y + height`), saturating.
    pub fn y_max(&self) -> i32 {
        saturate(self.y as i64 + self.height as i64)
    }

    /// Checks if the rectangle has zero width or height.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks if a point is contained within the rectangle's bounds.
    /// The right and bottom edges are exclusive.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        !self.is_empty() && px >= self.x && px < self.x_max() && py >= self.y && py < self.y_max()
    }

    /// Returns a new rectangle that is the intersection of `self` and `other`.
    pub fn intersection(&self, other: &Rect) -> Rect {
        if self.is_empty() || other.is_empty() {
            return Rect::empty();
        }

        let x = self.x.max(other.x);
        let y = self.y.max(other.y);

        let x_max = self.x_max().min(other.x_max());
        let y_max = self.y_max().min(other.y_max());

        if x >= x_max || y >= y_max {
            Rect::empty()
        } else {
            Rect::new(x, y, extent(x, x_max), extent(y, y_max))
        }
    }

    /// Returns a new rectangle that is the smallest bounding box containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let x = self.x.min(other.x);
        let y = self.y.min(other.y);

        let x_max = self.x_max().max(other.x_max());
        let y_max = self.y_max().max(other.y_max());

        Rect::new(x, y, extent(x, x_max), extent(y, y_max))
    }

    /// Clips the rectangle to a `width` x `height` canvas at the origin.
    pub fn clamp_to(&self, width: u32, height: u32) -> Rect {
        self.intersection(&Rect::new(0, 0, width, height))
    }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Length of `[lo, hi)`, computed wide so it cannot overflow.
fn extent(lo: i32, hi: i32) -> u32 {
    (hi as i64 - lo as i64) as u32
}
