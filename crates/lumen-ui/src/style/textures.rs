use lumen_engine::coords::{Point, Rect};

use crate::measure::Sides;

/// Horizontal alignment of text inside a control's internal rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Texture stretched over the whole bounding rect.
#[derive(Debug, Clone, PartialEq)]
pub struct StretchedTexture {
    pub texture_id: String,
    pub source_rect: Rect,
    /// Grows the destination beyond the bounding rect (shadows, glows).
    pub extra_size: Sides,
}

impl StretchedTexture {
    pub fn dest_rect(&self, rect: Rect) -> Rect {
        self.extra_size.grow(rect)
    }
}

/// Nine-slice texture: fixed-size corners, stretched edges and center.
///
/// `internal_source_rect` is the center slice; the frame is the band between
/// it and `external_source_rect`. `texture_scale` scales the frame thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct FramedTexture {
    pub texture_id: String,
    pub internal_source_rect: Rect,
    pub external_source_rect: Rect,
    pub texture_scale: f32,
}

impl FramedTexture {
    /// Frame thickness in source pixels.
    pub fn frame(&self) -> Sides {
        let i = self.internal_source_rect;
        let e = self.external_source_rect;
        Sides::new(i.left() - e.left(), e.right() - i.right(), i.top() - e.top(), e.bottom() - i.bottom())
    }

    /// `(dest, source)` pairs for the nine slices, skipping empty ones.
    pub fn slices(&self, dest: Rect) -> Vec<(Rect, Rect)> {
        let src = self.frame();
        let scale = |v: i32| (v as f32 * self.texture_scale) as i32;
        let dst = Sides::new(scale(src.left), scale(src.right), scale(src.top), scale(src.bottom));

        let e = self.external_source_rect;
        let i = self.internal_source_rect;
        let src_cols = [(e.left(), src.left), (i.left(), i.width), (i.right(), src.right)];
        let src_rows = [(e.top(), src.top), (i.top(), i.height), (i.bottom(), src.bottom)];
        let mid_w = (dest.width - dst.h()).max(0);
        let mid_h = (dest.height - dst.v()).max(0);
        let dst_cols = [(dest.left(), dst.left), (dest.left() + dst.left, mid_w), (dest.left() + dst.left + mid_w, dst.right)];
        let dst_rows = [(dest.top(), dst.top), (dest.top() + dst.top, mid_h), (dest.top() + dst.top + mid_h, dst.bottom)];

        let mut out = Vec::with_capacity(9);
        for row in 0..3 {
            for col in 0..3 {
                let d = Rect::new(dst_cols[col].0, dst_rows[row].0, dst_cols[col].1, dst_rows[row].1);
                let s = Rect::new(src_cols[col].0, src_rows[row].0, src_cols[col].1, src_rows[row].1);
                if !d.is_empty() && !s.is_empty() {
                    out.push((d, s));
                }
            }
        }
        out
    }
}

/// Texture drawn at its own (scaled) size, placed at the left of the rect.
#[derive(Debug, Clone, PartialEq)]
pub struct IconTexture {
    pub texture_id: String,
    pub source_rect: Rect,
    pub texture_scale: f32,
    pub center_horizontally: bool,
    pub center_vertically: bool,
}

impl IconTexture {
    pub fn size(&self) -> Point {
        Point::new(
            (self.source_rect.width as f32 * self.texture_scale) as i32,
            (self.source_rect.height as f32 * self.texture_scale) as i32,
        )
    }

    pub fn dest_rect(&self, rect: Rect) -> Rect {
        let size = self.size();
        let x = if self.center_horizontally { rect.center().x - size.x / 2 } else { rect.left() };
        let y = if self.center_vertically { rect.center().y - size.y / 2 } else { rect.top() };
        Rect::new(x, y, size.x, size.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed() -> FramedTexture {
        FramedTexture {
            texture_id: "panel".into(),
            internal_source_rect: Rect::new(4, 4, 8, 8),
            external_source_rect: Rect::new(0, 0, 16, 16),
            texture_scale: 2.0,
        }
    }

    #[test]
    fn frame_is_band_between_rects() {
        assert_eq!(framed().frame(), Sides::all(4));
    }

    #[test]
    fn slices_cover_destination() {
        let dest = Rect::new(0, 0, 100, 50);
        let slices = framed().slices(dest);
        assert_eq!(slices.len(), 9);
        let covered = slices.iter().fold(slices[0].0, |acc, (d, _)| acc.union(*d));
        assert_eq!(covered, dest);
        // corners keep the scaled frame size
        assert_eq!(slices[0].0, Rect::new(0, 0, 8, 8));
        assert_eq!(slices[8].0, Rect::new(92, 42, 8, 8));
    }

    #[test]
    fn icon_centered_vertically() {
        let icon = IconTexture {
            texture_id: "check".into(),
            source_rect: Rect::new(0, 0, 10, 10),
            texture_scale: 2.0,
            center_horizontally: false,
            center_vertically: true,
        };
        assert_eq!(icon.dest_rect(Rect::new(100, 100, 200, 40)), Rect::new(100, 110, 20, 20));
    }
}
