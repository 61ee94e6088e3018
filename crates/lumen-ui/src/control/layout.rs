use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::Renderer;

use crate::control::ControlId;
use crate::controls;
use crate::measure::Sides;
use crate::style::{props, ControlState};
use crate::system::UiSystem;

/// Where a control sits inside its parent's internal rect.
///
/// The nine fixed anchors pin the control to a point of the parent. The auto
/// anchors flow after the previous sibling: `Auto*` stack vertically, the
/// `AutoInline*` ones fill rows and wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    #[default]
    AutoLTR,
    AutoRTL,
    AutoCenter,
    AutoInlineLTR,
    AutoInlineRTL,
}

impl Anchor {
    /// Direction the offset pushes: right/bottom anchors push inward.
    pub const fn offset_sign(self) -> Point {
        match self {
            Anchor::TopLeft | Anchor::CenterLeft | Anchor::TopCenter | Anchor::Center => Point::new(1, 1),
            Anchor::TopRight | Anchor::CenterRight => Point::new(-1, 1),
            Anchor::BottomLeft | Anchor::BottomCenter => Point::new(1, -1),
            Anchor::BottomRight => Point::new(-1, -1),
            Anchor::AutoLTR | Anchor::AutoCenter | Anchor::AutoInlineLTR => Point::new(1, 1),
            Anchor::AutoRTL | Anchor::AutoInlineRTL => Point::new(-1, 1),
        }
    }

    pub const fn is_auto(self) -> bool {
        matches!(
            self,
            Anchor::AutoLTR | Anchor::AutoRTL | Anchor::AutoCenter | Anchor::AutoInlineLTR | Anchor::AutoInlineRTL
        )
    }
}

/// The previous sibling's placement, as seen by auto anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowCursor {
    /// Outer rect of the previous sibling.
    pub rect: Rect,
    pub margin_after: Point,
    /// Lowest bottom edge of the row the previous sibling sits on.
    pub row_bottom: i32,
    /// A dragged sibling doesn't take part in flow.
    pub dragged: bool,
}

impl FlowCursor {
    fn usable(prev: Option<&FlowCursor>) -> Option<&FlowCursor> {
        prev.filter(|p| !p.dragged)
    }

    /// Where the next row starts below this cursor.
    fn next_row(&self, margin_before: Point) -> i32 {
        self.row_bottom + self.margin_after.y + margin_before.y
    }

    /// Cursor after placing `placement` following `prev`.
    pub fn after(prev: Option<&FlowCursor>, placement: &Placement, margin_after: Point, dragged: bool) -> FlowCursor {
        let row_bottom = match Self::usable(prev) {
            Some(p) if placement.same_row => p.row_bottom.max(placement.rect.bottom()),
            _ => placement.rect.bottom(),
        };
        FlowCursor { rect: placement.rect, margin_after, row_bottom, dragged }
    }
}

/// Everything [`place`] needs, already resolved to pixels.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput {
    pub anchor: Anchor,
    pub size: Point,
    pub offset: Point,
    pub parent: Rect,
    pub margin_before: Point,
    pub extra_size: Sides,
    pub dragged_offset: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Outer rect (extra size included).
    pub rect: Rect,
    /// Placed beside the previous sibling rather than on a new row.
    pub same_row: bool,
}

/// Positions a control of `input.size` inside `input.parent`.
pub fn place(input: &LayoutInput, prev: Option<&FlowCursor>) -> Placement {
    let LayoutInput { anchor, size, offset, parent: p, margin_before, extra_size, dragged_offset } = *input;

    if let Some(dragged) = dragged_offset {
        let outer = Point::new(size.x + extra_size.h(), size.y + extra_size.v());
        return Placement { rect: Rect::from_origin_size(p.origin() + dragged, outer), same_row: false };
    }

    let (w, h) = (size.x, size.y);
    let center_x = p.left() + (p.width - w) / 2;
    let center_y = p.top() + (p.height - h) / 2;
    let prev = FlowCursor::usable(prev);
    let row_top = |m: Point| prev.map_or(p.top(), |c| c.next_row(m));

    let (pos, same_row) = match anchor {
        Anchor::TopLeft => (Point::new(p.left(), p.top()), false),
        Anchor::TopCenter => (Point::new(center_x, p.top()), false),
        Anchor::TopRight => (Point::new(p.right() - w, p.top()), false),
        Anchor::CenterLeft => (Point::new(p.left(), center_y), false),
        Anchor::Center => (Point::new(center_x, center_y), false),
        Anchor::CenterRight => (Point::new(p.right() - w, center_y), false),
        Anchor::BottomLeft => (Point::new(p.left(), p.bottom() - h), false),
        Anchor::BottomCenter => (Point::new(center_x, p.bottom() - h), false),
        Anchor::BottomRight => (Point::new(p.right() - w, p.bottom() - h), false),

        Anchor::AutoLTR => (Point::new(p.left(), row_top(margin_before)), false),
        Anchor::AutoRTL => (Point::new(p.right() - w, row_top(margin_before)), false),
        Anchor::AutoCenter => (Point::new(center_x, row_top(margin_before)), false),

        Anchor::AutoInlineLTR => match prev {
            None => (Point::new(p.left(), p.top()), false),
            Some(c) => {
                let x = c.rect.right() + c.margin_after.x + margin_before.x;
                if x + w > p.right() {
                    (Point::new(p.left(), c.next_row(margin_before)), false)
                } else {
                    (Point::new(x, c.rect.top()), true)
                }
            }
        },
        Anchor::AutoInlineRTL => match prev {
            None => (Point::new(p.right() - w, p.top()), false),
            Some(c) => {
                let x = c.rect.left() - c.margin_after.x - margin_before.x - w;
                if x < p.left() {
                    (Point::new(p.right() - w, c.next_row(margin_before)), false)
                } else {
                    (Point::new(x, c.rect.top()), true)
                }
            }
        },
    };

    let pos = pos + offset.scale(anchor.offset_sign());
    Placement { rect: extra_size.grow(Rect::from_origin_size(pos, size)), same_row }
}

// ── per-control layout ────────────────────────────────────────────────────

pub(crate) struct Layout {
    pub placement: Placement,
    pub internal: Rect,
    pub margin_after: Point,
}

impl UiSystem {
    /// Resolves size, anchor, offset and style spacing for one control.
    pub(crate) fn calculate_bounding_rect(
        &mut self,
        id: ControlId,
        renderer: &dyn Renderer,
        parent: Rect,
        prev: Option<&FlowCursor>,
        state: ControlState,
    ) -> Layout {
        let c = &self.controls[id];
        let sheet = c.style_sheet.clone();
        let overrides = Some(&c.override_styles);

        let padding = sheet.get_property(&props::PADDING, state, Sides::ZERO, overrides);
        let extra_size = sheet.get_property(&props::EXTRA_SIZE, state, Sides::ZERO, overrides);
        let margin_before = sheet.get_property(&props::MARGIN_BEFORE, state, Point::ZERO, overrides);
        let margin_after = sheet.get_property(&props::MARGIN_AFTER, state, Point::ZERO, overrides);

        let mut size = c.size.get_value_in_pixels(parent);
        if c.auto_width {
            size.x = c.last_content_size.x + padding.h();
        }
        if c.auto_height {
            size.y = c.last_content_size.y + padding.v();
        }
        let offset = c.offset.get_value_in_pixels(parent);
        let anchor = c.anchor;
        let dragged_offset = c.dragged_offset;

        controls::adjust_size(self, id, renderer, state, padding, &mut size);

        size.x = size.x.max(sheet.min_width.unwrap_or(0));
        size.y = size.y.max(sheet.min_height.unwrap_or(0));

        let input = LayoutInput { anchor, size, offset, parent, margin_before, extra_size, dragged_offset };
        let placement = place(&input, prev);
        let internal = padding.shrink(placement.rect);
        Layout { placement, internal, margin_after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(anchor: Anchor, w: i32, h: i32) -> LayoutInput {
        LayoutInput {
            anchor,
            size: Point::new(w, h),
            offset: Point::ZERO,
            parent: Rect::new(0, 0, 400, 300),
            margin_before: Point::ZERO,
            extra_size: Sides::ZERO,
            dragged_offset: None,
        }
    }

    fn flow(anchor: Anchor, sizes: &[(i32, i32)], parent: Rect) -> Vec<Rect> {
        let mut prev: Option<FlowCursor> = None;
        sizes
            .iter()
            .map(|&(w, h)| {
                let mut i = input(anchor, w, h);
                i.parent = parent;
                let p = place(&i, prev.as_ref());
                prev = Some(FlowCursor::after(prev.as_ref(), &p, Point::ZERO, false));
                p.rect
            })
            .collect()
    }

    // ── fixed anchors ─────────────────────────────────────────────────────

    #[test]
    fn top_right_sits_on_the_right_edge() {
        let r = place(&input(Anchor::TopRight, 50, 20), None).rect;
        assert_eq!(r, Rect::new(350, 0, 50, 20));
    }

    #[test]
    fn center_and_bottom_anchors() {
        assert_eq!(place(&input(Anchor::Center, 100, 50), None).rect, Rect::new(150, 125, 100, 50));
        assert_eq!(place(&input(Anchor::BottomCenter, 100, 50), None).rect, Rect::new(150, 250, 100, 50));
        assert_eq!(place(&input(Anchor::BottomLeft, 10, 10), None).rect, Rect::new(0, 290, 10, 10));
    }

    #[test]
    fn offset_points_inward_for_right_and_bottom() {
        let mut i = input(Anchor::BottomRight, 50, 20);
        i.offset = Point::new(5, 7);
        assert_eq!(place(&i, None).rect, Rect::new(345, 273, 50, 20));

        let mut i = input(Anchor::TopLeft, 50, 20);
        i.offset = Point::new(5, 7);
        assert_eq!(place(&i, None).rect, Rect::new(5, 7, 50, 20));
    }

    #[test]
    fn parent_origin_is_respected() {
        let mut i = input(Anchor::TopRight, 50, 20);
        i.parent = Rect::new(100, 40, 400, 300);
        assert_eq!(place(&i, None).rect, Rect::new(450, 40, 50, 20));
    }

    #[test]
    fn extra_size_grows_outer_rect() {
        let mut i = input(Anchor::TopLeft, 50, 20);
        i.extra_size = Sides::new(2, 3, 4, 5);
        assert_eq!(place(&i, None).rect, Rect::new(-2, -4, 55, 29));
    }

    // ── auto flow ─────────────────────────────────────────────────────────

    #[test]
    fn auto_ltr_stacks_vertically() {
        let rects = flow(Anchor::AutoLTR, &[(400, 10), (400, 20), (400, 5)], Rect::new(0, 0, 400, 300));
        let tops: Vec<i32> = rects.iter().map(|r| r.y).collect();
        assert_eq!(tops, vec![0, 10, 30]);
    }

    #[test]
    fn auto_rtl_aligns_right() {
        let rects = flow(Anchor::AutoRTL, &[(100, 10), (50, 10)], Rect::new(0, 0, 400, 300));
        assert_eq!(rects[0], Rect::new(300, 0, 100, 10));
        assert_eq!(rects[1], Rect::new(350, 10, 50, 10));
    }

    #[test]
    fn margins_separate_rows() {
        let first = place(&input(Anchor::AutoLTR, 400, 10), None);
        let cursor = FlowCursor::after(None, &first, Point::new(0, 4), false);
        let mut second = input(Anchor::AutoLTR, 400, 10);
        second.margin_before = Point::new(0, 6);
        assert_eq!(place(&second, Some(&cursor)).rect.y, 20);
    }

    #[test]
    fn inline_wraps_below_tallest_of_row() {
        let rects = flow(Anchor::AutoInlineLTR, &[(40, 10), (40, 30), (40, 10)], Rect::new(0, 0, 100, 300));
        assert_eq!(rects[0], Rect::new(0, 0, 40, 10));
        assert_eq!(rects[1], Rect::new(40, 0, 40, 30));
        assert_eq!(rects[2], Rect::new(0, 30, 40, 10));
    }

    #[test]
    fn inline_rtl_fills_from_the_right() {
        let rects = flow(Anchor::AutoInlineRTL, &[(40, 10), (40, 20), (40, 10)], Rect::new(0, 0, 100, 300));
        assert_eq!(rects[0], Rect::new(60, 0, 40, 10));
        assert_eq!(rects[1], Rect::new(20, 0, 40, 20));
        assert_eq!(rects[2], Rect::new(60, 20, 40, 10));
    }

    #[test]
    fn dragged_sibling_resets_flow() {
        let first = place(&input(Anchor::AutoLTR, 400, 50), None);
        let cursor = FlowCursor::after(None, &first, Point::ZERO, true);
        assert_eq!(place(&input(Anchor::AutoLTR, 400, 10), Some(&cursor)).rect.y, 0);
    }

    #[test]
    fn dragged_offset_overrides_anchor() {
        let mut i = input(Anchor::BottomRight, 50, 20);
        i.parent = Rect::new(10, 10, 400, 300);
        i.dragged_offset = Some(Point::new(30, 40));
        assert_eq!(place(&i, None).rect, Rect::new(40, 50, 50, 20));
    }
}
