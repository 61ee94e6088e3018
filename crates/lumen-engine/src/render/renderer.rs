use crate::coords::{Point, Rect};
use crate::paint::Color;

/// Text styling passed to [`Renderer::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextParams<'a> {
    pub font_id: &'a str,
    pub font_size: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: i32,
    /// Extra horizontal space between characters.
    pub spacing: f32,
}

/// Drawing backend consumed by the UI core.
///
/// Implementations must keep [`measure_text`](Self::measure_text) metrically
/// consistent with [`draw_text`](Self::draw_text): layout is computed from
/// measurements and then drawn at the measured positions.
///
/// Scissor handling is last-set-wins: [`scissor_region`](Self::scissor_region)
/// reports the most recent region until it is replaced or cleared. Callers that
/// nest regions save the previous value and restore it on exit.
pub trait Renderer {
    /// Stretched blit of `source` (texture pixels) into `dest`.
    fn draw_texture(&mut self, effect: Option<&str>, texture_id: &str, dest: Rect, source: Rect, color: Color);

    /// Solid rectangle fill.
    fn draw_rectangle(&mut self, rect: Rect, color: Color);

    /// Draws `text` with its top-left corner at `position`.
    fn draw_text(&mut self, effect: Option<&str>, text: &str, position: Point, params: &TextParams<'_>);

    /// Size `text` occupies when drawn with the same font parameters.
    fn measure_text(&self, text: &str, font_id: &str, font_size: f32, spacing: f32) -> Point;

    /// Height of a single line of text.
    fn text_line_height(&self, font_id: &str, font_size: f32) -> i32;

    fn set_scissor_region(&mut self, region: Rect);

    fn scissor_region(&self) -> Option<Rect>;

    fn clear_scissor_region(&mut self);

    /// The root control's bounding rectangle.
    fn screen_bounds(&self) -> Rect;

    /// Reads back one pixel of a texture (`None` if unknown or out of bounds).
    fn texture_pixel(&self, texture_id: &str, at: Point) -> Option<Color>;
}
