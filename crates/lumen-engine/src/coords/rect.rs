use super::Point;

/// Axis-aligned rectangle in screen pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn from_origin_size(origin: Point, size: Point) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    #[inline]
    pub const fn left(self) -> i32 {
        self.x
    }

    #[inline]
    pub const fn top(self) -> i32 {
        self.y
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(self) -> Point {
        Point::new(self.width, self.height)
    }

    #[inline]
    pub const fn center(self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Returns a copy moved by `delta`.
    #[inline]
    #[must_use]
    pub fn offset(self, delta: Point) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    /// Grows every side outward by the given amounts (negative values shrink).
    #[inline]
    #[must_use]
    pub fn expand(self, left: i32, right: i32, top: i32, bottom: i32) -> Rect {
        Rect::new(
            self.x - left,
            self.y - top,
            self.width + left + right,
            self.height + top + bottom,
        )
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut r = self;
        if r.width < 0 {
            r.x += r.width;
            r.width = -r.width;
        }
        if r.height < 0 {
            r.y += r.height;
            r.height = -r.height;
        }
        r
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Point) -> bool {
        let r = self.normalized();
        p.x >= r.x && p.y >= r.y && p.x < r.right() && p.y < r.bottom()
    }

    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());

        if x1 <= x0 || y1 <= y0 {
            None
        } else {
            Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
        }
    }

    /// Smallest rectangle covering both inputs.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        let x1 = a.right().max(b.right());
        let y1 = a.bottom().max(b.bottom());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1, 2, 10, 20);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let n = r(10, 0, -4, 5).normalized();
        assert_eq!(n.x, 6);
        assert_eq!(n.width, 4);
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_top_left_inclusive() {
        assert!(r(0, 0, 10, 10).contains(Point::new(0, 0)));
    }

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(!r(0, 0, 10, 10).contains(Point::new(10, 10)));
    }

    #[test]
    fn contains_outside() {
        assert!(!r(0, 0, 10, 10).contains(Point::new(-1, 5)));
        assert!(!r(0, 0, 10, 10).contains(Point::new(5, -1)));
    }

    // ── intersect / union ─────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        let i = r(0, 0, 10, 10).intersect(r(5, 5, 10, 10));
        assert_eq!(i, Some(r(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(r(10, 0, 10, 10)).is_none());
    }

    #[test]
    fn union_covers_both() {
        assert_eq!(r(0, 0, 10, 10).union(r(20, 5, 5, 20)), r(0, 0, 25, 25));
    }

    // ── expand ────────────────────────────────────────────────────────────

    #[test]
    fn expand_grows_each_side() {
        assert_eq!(r(10, 10, 20, 20).expand(1, 2, 3, 4), r(9, 7, 23, 27));
    }

    #[test]
    fn expand_negative_shrinks() {
        assert_eq!(r(0, 0, 100, 80).expand(-10, -10, -5, -5), r(10, 5, 80, 70));
    }
}
