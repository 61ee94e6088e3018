//! Controls whose value is a color read back from their own fill texture.
//!
//! Both kinds need a `fill_texture_stretched` in their stylesheet's default
//! state. The pointer position is mapped into the texture's source rect and
//! the pixel there becomes the value, so the value only updates during
//! `UiSystem::update`, where a renderer is available.

use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use lumen_engine::paint::Color;
use lumen_engine::render::Renderer;

use crate::control::{Anchor, Control, ControlId, EventKind};
use crate::controls::slider::{attach_handle, slider_control};
use crate::controls::{ControlKind, Interaction, Orientation, Panel, SliderState};
use crate::error::{Result, UiError};
use crate::measure::MeasureVector;
use crate::style::{props, ControlState, StretchedTexture, StyleSheet};
use crate::system::UiSystem;

/// Slider range used when the stylesheet has no texture to size it from.
const FALLBACK_MAX: i32 = 255;
/// Picker handle size when its stylesheet has none.
const HANDLE_SIZE: f32 = 8.0;

fn sheet_texture(sheet: &StyleSheet) -> Option<StretchedTexture> {
    sheet.resolve(&props::FILL_TEXTURE_STRETCHED, ControlState::Default, None).map(|(t, _)| t.clone())
}

fn stretched_texture(c: &Control) -> Option<StretchedTexture> {
    c.style_sheet
        .resolve(&props::FILL_TEXTURE_STRETCHED, ControlState::Default, Some(&c.override_styles))
        .map(|(t, _)| t.clone())
}

fn missing_texture() -> UiError {
    UiError::MissingStyleProperty { property: props::FILL_TEXTURE_STRETCHED.name, state: ControlState::Default }
}

/// Nearest pixel to `target` among `points`, by squared RGBA distance.
fn closest_pixel(
    renderer: &dyn Renderer,
    texture_id: &str,
    target: Color,
    points: impl Iterator<Item = Point>,
) -> Option<(Point, Color)> {
    points
        .filter_map(|p| renderer.texture_pixel(texture_id, p).map(|c| (p, c)))
        .min_by_key(|(_, c)| c.distance_sq(target))
}

// ── ColorSlider ───────────────────────────────────────────────────────────

/// A horizontal slider over a color strip; each value is one source column.
#[derive(Debug, Clone)]
pub struct ColorSliderState {
    pub(crate) slider: SliderState,
    pub(crate) color: Color,
}

impl ColorSliderState {
    pub fn slider(&self) -> &SliderState {
        &self.slider
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

#[derive(Default)]
pub struct ColorSlider {
    style_sheet: Option<Rc<StyleSheet>>,
    handle_style_sheet: Option<Rc<StyleSheet>>,
}

impl ColorSlider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn handle_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.handle_style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("ColorSlider"));
        let handle_sheet = self.handle_style_sheet.unwrap_or_else(|| sys.default_style_sheet("ColorSliderHandle"));

        let max = match sheet_texture(&sheet) {
            Some(t) => (t.source_rect.width - 1).max(0),
            None => {
                log::debug!("color slider stylesheet has no stretched texture; using 0..{FALLBACK_MAX}");
                FALLBACK_MAX
            }
        };
        let state = ColorSliderState {
            slider: SliderState::new(Orientation::Horizontal, 0, max),
            color: Color::TRANSPARENT,
        };
        let id = sys.insert(slider_control(ControlKind::ColorSlider(state), sheet));
        attach_handle(sys, id, Orientation::Horizontal, handle_sheet);
        id
    }
}

/// Samples the strip's middle row at the slider's column.
pub(crate) fn update_slider_color(sys: &mut UiSystem, id: ControlId, renderer: &dyn Renderer) {
    let Some(c) = sys.controls.get_mut(id) else { return };
    let Some(texture) = stretched_texture(c) else { return };
    let ControlKind::ColorSlider(s) = &mut c.kind else { return };

    let src = texture.source_rect;
    let max = (src.width - 1).max(0);
    if s.slider.max_value != max {
        s.slider.max_value = max.max(s.slider.min_value);
        s.slider.value = s.slider.quantize(s.slider.value);
    }
    let at = Point::new(src.left() + s.slider.value, src.top() + src.height / 2);
    if let Some(color) = renderer.texture_pixel(&texture.texture_id, at) {
        s.color = color;
    }
}

// ── ColorPicker ───────────────────────────────────────────────────────────

/// A 2D palette with a handle marking the picked pixel.
#[derive(Debug, Clone)]
pub struct ColorPickerState {
    pub(crate) handle: Option<ControlId>,
    /// Picked pixel, in texture coordinates.
    pub(crate) source_point: Point,
    pub(crate) color: Color,
    pub(crate) needs_sample: bool,
}

impl ColorPickerState {
    pub fn handle(&self) -> Option<ControlId> { self.handle }
    pub fn source_point(&self) -> Point { self.source_point }
    pub fn color(&self) -> Color { self.color }
}

#[derive(Default)]
pub struct ColorPicker {
    style_sheet: Option<Rc<StyleSheet>>,
    handle_style_sheet: Option<Rc<StyleSheet>>,
}

impl ColorPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn handle_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.handle_style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("ColorPicker"));
        let handle_sheet = self.handle_style_sheet.unwrap_or_else(|| sys.default_style_sheet("ColorPickerHandle"));
        let origin = sheet_texture(&sheet).map_or(Point::ZERO, |t| t.source_rect.origin());

        let state = ColorPickerState { handle: None, source_point: origin, color: Color::TRANSPARENT, needs_sample: true };
        let mut c = Control::new(ControlKind::ColorPicker(state), sheet);
        c.lock_focus_on_self_while_mouse_down = true;
        let id = sys.insert(c);

        let has_size = handle_sheet.default_width.is_some() || handle_sheet.default_height.is_some();
        let handle = Panel::new().style_sheet(handle_sheet).anchor(Anchor::TopLeft).build(sys);
        let h = &mut sys.controls[handle];
        if !has_size {
            h.size = MeasureVector::pixels(HANDLE_SIZE, HANDLE_SIZE);
        }
        h.transfer_interactions_to = Some(id);
        h.copy_state_from = Some(id);
        h.ignore_scroll_offset = true;
        match sys.add_internal_child(id, handle, true) {
            Ok(()) => {
                if let ControlKind::ColorPicker(p) = &mut sys.controls[id].kind {
                    p.handle = Some(handle);
                }
            }
            Err(e) => log::warn!("color picker handle for {id:?}: {e}"),
        }
        id
    }
}

/// Texture point under a screen point, for a texture drawn over `dest`.
fn source_for(dest: Rect, src: Rect, at: Point) -> Point {
    let map = |pos: i32, d0: i32, dlen: i32, s0: i32, slen: i32| {
        let rel = (pos - d0).clamp(0, (dlen - 1).max(0));
        (s0 + rel * slen / dlen.max(1)).clamp(s0, s0 + (slen - 1).max(0))
    };
    Point::new(
        map(at.x, dest.left(), dest.width, src.left(), src.width),
        map(at.y, dest.top(), dest.height, src.top(), src.height),
    )
}

/// Screen point where a texture point lands when drawn over `dest`.
fn dest_for(dest: Rect, src: Rect, at: Point) -> Point {
    Point::new(
        dest.left() + (at.x - src.left()) * dest.width / src.width.max(1),
        dest.top() + (at.y - src.top()) * dest.height / src.height.max(1),
    )
}

pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, interaction: Interaction) -> bool {
    if !matches!(interaction, Interaction::LeftPressed | Interaction::LeftDown) {
        return false;
    }
    let mouse = sys.input.mouse_position();
    let Some(c) = sys.controls.get_mut(id) else { return false };
    let Some(texture) = stretched_texture(c) else { return false };
    let dest = texture.dest_rect(c.last_bounding_rect);
    let ControlKind::ColorPicker(p) = &mut c.kind else { return false };
    p.source_point = source_for(dest, texture.source_rect, mouse);
    p.needs_sample = true;
    true
}

/// Samples the picked pixel if it moved, then places the handle over it.
pub(crate) fn update(sys: &mut UiSystem, id: ControlId, renderer: &dyn Renderer) {
    let Some(c) = sys.controls.get_mut(id) else { return };
    let Some(texture) = stretched_texture(c) else { return };
    let dest = texture.dest_rect(c.last_bounding_rect);
    let internal = c.last_internal_bounding_rect;
    let ControlKind::ColorPicker(p) = &mut c.kind else { return };

    let mut changed = false;
    if p.needs_sample {
        p.needs_sample = false;
        if let Some(color) = renderer.texture_pixel(&texture.texture_id, p.source_point)
            && color != p.color
        {
            p.color = color;
            changed = true;
        }
    }
    let marker = dest_for(dest, texture.source_rect, p.source_point);
    let handle = p.handle;

    if let Some(h) = handle.and_then(|h| sys.controls.get_mut(h)) {
        let size = h.last_bounding_rect.size();
        let half = Point::new(size.x / 2, size.y / 2);
        let offset = marker - internal.origin() - half;
        h.offset = MeasureVector::pixels(offset.x as f32, offset.y as f32);
    }
    if changed {
        sys.fire(id, EventKind::ValueChanged);
    }
}

// ── color API ─────────────────────────────────────────────────────────────

impl UiSystem {
    /// Last sampled color of a ColorPicker or ColorSlider.
    pub fn color_value(&self, id: ControlId) -> Result<Color> {
        match &self.control(id)?.kind {
            ControlKind::ColorPicker(p) => Ok(p.color),
            ControlKind::ColorSlider(s) => Ok(s.color),
            _ => Err(UiError::WrongControlKind { control: id, expected: "ColorPicker" }),
        }
    }

    /// Moves the control to the texture pixel closest to `color`.
    ///
    /// Pickers search the whole source rect, sliders its middle row.
    pub fn set_color_value(&mut self, id: ControlId, renderer: &dyn Renderer, color: Color) -> Result<()> {
        let c = self.control(id)?;
        let is_picker = match c.kind {
            ControlKind::ColorPicker(_) => true,
            ControlKind::ColorSlider(_) => false,
            _ => return Err(UiError::WrongControlKind { control: id, expected: "ColorPicker" }),
        };
        let texture = stretched_texture(c).ok_or_else(missing_texture)?;
        let src = texture.source_rect;

        if !is_picker {
            let row = src.top() + src.height / 2;
            let points = (src.left()..src.right()).map(|x| Point::new(x, row));
            let (point, found) = closest_pixel(renderer, &texture.texture_id, color, points).ok_or_else(missing_texture)?;
            if let ControlKind::ColorSlider(s) = &mut self.controls[id].kind {
                s.color = found;
            }
            return self.set_slider_value_safe(id, point.x - src.left());
        }

        let points = (src.top()..src.bottom()).flat_map(|y| (src.left()..src.right()).map(move |x| Point::new(x, y)));
        let (point, found) = closest_pixel(renderer, &texture.texture_id, color, points).ok_or_else(missing_texture)?;
        let ControlKind::ColorPicker(p) = &mut self.controls[id].kind else { return Ok(()) };
        p.source_point = point;
        p.needs_sample = false;
        if p.color != found {
            p.color = found;
            self.fire(id, EventKind::ValueChanged);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::measure::Sides;
    use crate::test_support::Harness;

    fn textured_sheet(texture_id: &str, source_rect: Rect) -> Rc<StyleSheet> {
        let mut sheet = StyleSheet::default();
        sheet.set_property(
            &props::FILL_TEXTURE_STRETCHED,
            ControlState::Default,
            Some(StretchedTexture { texture_id: texture_id.to_string(), source_rect, extra_size: Sides::ZERO }),
        );
        Rc::new(sheet)
    }

    fn palette(h: &mut Harness) {
        h.dl.textures.insert_with("palette", 4, 4, |x, y| Color::rgb(x as u8 * 60, y as u8 * 60, 0));
    }

    fn picker(h: &mut Harness) -> ControlId {
        palette(h);
        let root = h.sys.root();
        let id = ColorPicker::new().style_sheet(textured_sheet("palette", Rect::new(0, 0, 4, 4))).build(&mut h.sys);
        {
            let c = h.sys.control_mut(id).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(40.0, 40.0);
        }
        h.sys.add_child(root, id).unwrap();
        h.frame();
        id
    }

    #[test]
    fn source_mapping_scales_and_clamps() {
        let dest = Rect::new(100, 100, 40, 40);
        let src = Rect::new(8, 8, 4, 4);
        assert_eq!(source_for(dest, src, Point::new(125, 115)), Point::new(10, 9));
        assert_eq!(source_for(dest, src, Point::new(0, 500)), Point::new(8, 11));
        assert_eq!(dest_for(dest, src, Point::new(10, 9)), Point::new(120, 110));
    }

    #[test]
    fn picker_starts_on_first_pixel() {
        let mut h = Harness::new();
        let id = picker(&mut h);
        assert_eq!(h.sys.color_value(id).unwrap(), Color::rgb(0, 0, 0));
    }

    #[test]
    fn pressing_samples_pixel_under_pointer() {
        let mut h = Harness::new();
        let id = picker(&mut h);
        let changes = Rc::new(Cell::new(0));
        let seen = changes.clone();
        h.sys.control_mut(id).unwrap().events.set(EventKind::ValueChanged, move |_, _| seen.set(seen.get() + 1));

        h.click_at(25, 15);
        assert_eq!(h.sys.color_value(id).unwrap(), Color::rgb(120, 60, 0));
        assert_eq!(changes.get(), 1);

        let ControlKind::ColorPicker(p) = &h.sys.control(id).unwrap().kind else { panic!("not a picker") };
        let handle = p.handle().unwrap();
        h.frame();
        let marker = h.sys.control(handle).unwrap().last_bounding_rect().center();
        assert_eq!(marker, Point::new(20, 10));
    }

    #[test]
    fn set_color_finds_closest_pixel() {
        let mut h = Harness::new();
        let id = picker(&mut h);
        h.sys.set_color_value(id, &h.dl, Color::rgb(5, 170, 0)).unwrap();
        assert_eq!(h.sys.color_value(id).unwrap(), Color::rgb(0, 180, 0));
        let ControlKind::ColorPicker(p) = &h.sys.control(id).unwrap().kind else { panic!("not a picker") };
        assert_eq!(p.source_point(), Point::new(0, 3));
    }

    #[test]
    fn color_slider_range_follows_texture() {
        let mut h = Harness::new();
        h.dl.textures.insert_with("hue", 10, 1, |x, _| Color::rgb(x as u8 * 20, 0, 0));
        let root = h.sys.root();
        let id = ColorSlider::new().style_sheet(textured_sheet("hue", Rect::new(0, 0, 10, 1))).build(&mut h.sys);
        h.sys.add_child(root, id).unwrap();
        assert_eq!(h.sys.slider_max(id).unwrap(), 9);

        h.sys.set_slider_value(id, 4).unwrap();
        h.frame();
        assert_eq!(h.sys.color_value(id).unwrap(), Color::rgb(80, 0, 0));

        h.sys.set_color_value(id, &h.dl, Color::rgb(118, 0, 0)).unwrap();
        assert_eq!(h.sys.slider_value(id).unwrap(), 6);
        assert_eq!(h.sys.color_value(id).unwrap(), Color::rgb(120, 0, 0));
    }

    #[test]
    fn color_of_other_kinds_is_refused() {
        let mut h = Harness::new();
        let root = h.sys.root();
        assert!(matches!(h.sys.color_value(root), Err(UiError::WrongControlKind { .. })));
    }
}
