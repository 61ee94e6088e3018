//! Dimensions expressed in pixels or percent of the parent.

use lumen_engine::coords::{Point, Rect};

// ── Measurement ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureUnit {
    #[default]
    Pixels,
    Percent,
}

/// One axis of a size or offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurement {
    pub units: MeasureUnit,
    pub value: f32,
}

impl Measurement {
    #[inline]
    pub const fn pixels(value: f32) -> Self {
        Self { units: MeasureUnit::Pixels, value }
    }

    #[inline]
    pub const fn percent(value: f32) -> Self {
        Self { units: MeasureUnit::Percent, value }
    }

    /// Resolves to whole pixels against the parent's extent on this axis.
    ///
    /// Negative values are allowed and simply shrink or flip.
    #[inline]
    pub fn get_value_in_pixels(self, parent_extent: i32) -> i32 {
        match self.units {
            MeasureUnit::Pixels => self.value as i32,
            MeasureUnit::Percent => (self.value / 100.0 * parent_extent as f32) as i32,
        }
    }
}

// ── MeasureVector ─────────────────────────────────────────────────────────

/// Two independent axes, each pixels or percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeasureVector {
    pub x: Measurement,
    pub y: Measurement,
}

impl MeasureVector {
    #[inline]
    pub const fn new(x: Measurement, y: Measurement) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn pixels(x: f32, y: f32) -> Self {
        Self::new(Measurement::pixels(x), Measurement::pixels(y))
    }

    #[inline]
    pub const fn percent(x: f32, y: f32) -> Self {
        Self::new(Measurement::percent(x), Measurement::percent(y))
    }

    #[inline]
    pub fn get_value_in_pixels(self, parent: Rect) -> Point {
        Point::new(
            self.x.get_value_in_pixels(parent.width),
            self.y.get_value_in_pixels(parent.height),
        )
    }
}

// ── Sides ─────────────────────────────────────────────────────────────────

/// Per-side pixel amounts (padding, extra size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sides {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl Sides {
    pub const ZERO: Sides = Sides { left: 0, right: 0, top: 0, bottom: 0 };

    #[inline]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    #[inline]
    pub const fn all(v: i32) -> Self {
        Self::new(v, v, v, v)
    }

    /// Total inset on the horizontal axis.
    #[inline]
    pub const fn h(self) -> i32 {
        self.left + self.right
    }

    /// Total inset on the vertical axis.
    #[inline]
    pub const fn v(self) -> i32 {
        self.top + self.bottom
    }

    #[inline]
    pub fn grow(self, rect: Rect) -> Rect {
        rect.expand(self.left, self.right, self.top, self.bottom)
    }

    #[inline]
    pub fn shrink(self, rect: Rect) -> Rect {
        rect.expand(-self.left, -self.right, -self.top, -self.bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_ignore_parent() {
        assert_eq!(Measurement::pixels(42.0).get_value_in_pixels(1000), 42);
    }

    #[test]
    fn percent_of_parent() {
        assert_eq!(Measurement::percent(25.0).get_value_in_pixels(400), 100);
    }

    #[test]
    fn percent_truncates() {
        assert_eq!(Measurement::percent(33.0).get_value_in_pixels(10), 3);
    }

    #[test]
    fn negative_percent_flips() {
        assert_eq!(Measurement::percent(-50.0).get_value_in_pixels(200), -100);
    }

    #[test]
    fn vector_resolves_each_axis_independently() {
        let v = MeasureVector::new(Measurement::percent(50.0), Measurement::pixels(20.0));
        assert_eq!(v.get_value_in_pixels(Rect::new(0, 0, 300, 999)), Point::new(150, 20));
    }

    #[test]
    fn sides_grow_and_shrink_are_inverse() {
        let s = Sides::new(1, 2, 3, 4);
        let r = Rect::new(10, 10, 50, 50);
        assert_eq!(s.shrink(s.grow(r)), r);
    }
}
