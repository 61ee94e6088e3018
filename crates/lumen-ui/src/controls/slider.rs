use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};

use crate::control::{Anchor, Control, ControlId, EventKind};
use crate::controls::{ControlKind, Interaction, Panel};
use crate::error::{Result, UiError};
use crate::measure::{MeasureVector, Measurement};
use crate::style::StyleSheet;
use crate::system::UiSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Integer range control with a draggable handle.
#[derive(Debug, Clone)]
pub struct SliderState {
    pub(crate) min_value: i32,
    pub(crate) max_value: i32,
    pub(crate) value: i32,
    /// Number of steps across the range; 0 = one per unit.
    pub(crate) steps_count: u32,
    pub orientation: Orientation,
    /// Max at the left/top instead of the right/bottom.
    pub flipped_direction: bool,
    /// Ease the handle towards its target instead of snapping.
    pub interpolate_handle: bool,
    /// Wheel events go to the enclosing scrollable panel.
    pub(crate) wheel_scrolls_parent: bool,
    pub(crate) handle: Option<ControlId>,
    pub(crate) handle_offset: f32,
}

impl SliderState {
    pub fn new(orientation: Orientation, min_value: i32, max_value: i32) -> Self {
        Self {
            min_value,
            max_value,
            value: min_value,
            steps_count: 0,
            orientation,
            flipped_direction: false,
            interpolate_handle: true,
            wheel_scrolls_parent: false,
            handle: None,
            handle_offset: 0.0,
        }
    }

    pub fn value(&self) -> i32 { self.value }
    pub fn min_value(&self) -> i32 { self.min_value }
    pub fn max_value(&self) -> i32 { self.max_value }
    pub fn steps_count(&self) -> u32 { self.steps_count }
    pub fn handle(&self) -> Option<ControlId> { self.handle }

    /// Width of the range; wider than `i32` so extreme bounds can't overflow.
    fn range(&self) -> i64 {
        self.max_value as i64 - self.min_value as i64
    }

    fn effective_steps(&self) -> i64 {
        match self.steps_count {
            0 => self.range().max(1),
            n => n as i64,
        }
    }

    /// Value position in [0, 1] (0 for an empty range).
    pub fn relative_value(&self) -> f32 {
        match self.range() {
            0 => 0.0,
            r => ((self.value as i64 - self.min_value as i64) as f64 / r as f64) as f32,
        }
    }

    /// Snaps `value` to the nearest step and into range.
    pub fn quantize(&self, value: i32) -> i32 {
        let range = self.range();
        if range <= 0 {
            return self.min_value;
        }
        let value = value.clamp(self.min_value, self.max_value);
        let steps = self.effective_steps() as f64;
        let index = ((value as i64 - self.min_value as i64) as f64 * steps / range as f64).round();
        self.value_for_step(index)
    }

    fn value_for_step(&self, index: f64) -> i32 {
        let range = self.range() as f64;
        let steps = self.effective_steps() as f64;
        let value = self.min_value as i64 + (index * range / steps).round() as i64;
        value.clamp(self.min_value as i64, self.max_value as i64) as i32
    }

    /// Value under `pointer` when the track spans `track`.
    pub fn value_for_position(&self, track: Rect, pointer: Point) -> i32 {
        let (pos, start, len) = match self.orientation {
            Orientation::Horizontal => (pointer.x, track.left(), track.width),
            Orientation::Vertical => (pointer.y, track.top(), track.height),
        };
        let mut rel = ((pos - start) as f32 / len.max(1) as f32).clamp(0.0, 1.0);
        if self.flipped_direction {
            rel = 1.0 - rel;
        }
        let steps = self.effective_steps() as f64;
        self.value_for_step((rel as f64 * steps).round())
    }

    /// Handle position along a track of `track_len` for a handle of `handle_len`.
    pub fn handle_target(&self, track_len: i32, handle_len: i32) -> f32 {
        let mut rel = self.relative_value();
        if self.flipped_direction {
            rel = 1.0 - rel;
        }
        rel * (track_len - handle_len).max(0) as f32
    }
}

// ── builder ───────────────────────────────────────────────────────────────

pub struct Slider {
    orientation: Orientation,
    min_value: i32,
    max_value: i32,
    value: Option<i32>,
    steps_count: u32,
    flipped_direction: bool,
    interpolate_handle: bool,
    wheel_scrolls_parent: bool,
    style_sheet: Option<Rc<StyleSheet>>,
    handle_style_sheet: Option<Rc<StyleSheet>>,
}

impl Slider {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            min_value: 0,
            max_value: 10,
            value: None,
            steps_count: 0,
            flipped_direction: false,
            interpolate_handle: true,
            wheel_scrolls_parent: false,
            style_sheet: None,
            handle_style_sheet: None,
        }
    }

    pub fn range(mut self, min: i32, max: i32) -> Self { self.min_value = min; self.max_value = max; self }
    pub fn value(mut self, v: i32) -> Self { self.value = Some(v); self }
    pub fn steps_count(mut self, v: u32) -> Self { self.steps_count = v; self }
    pub fn flipped(mut self, v: bool) -> Self { self.flipped_direction = v; self }
    pub fn interpolate_handle(mut self, v: bool) -> Self { self.interpolate_handle = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn handle_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.handle_style_sheet = Some(v); self }
    pub(crate) fn wheel_scrolls_parent(mut self, v: bool) -> Self { self.wheel_scrolls_parent = v; self }

    /// Fails with `InvalidRange` when min > max.
    pub fn build(self, sys: &mut UiSystem) -> Result<ControlId> {
        if self.min_value > self.max_value {
            return Err(UiError::InvalidRange {
                control: ControlId::default(),
                min: self.min_value as i64,
                max: self.max_value as i64,
            });
        }
        Ok(self.insert(sys))
    }

    pub(crate) fn insert(self, sys: &mut UiSystem) -> ControlId {
        let state = self.state();
        let (sheet_name, handle_name) = match self.orientation {
            Orientation::Horizontal => ("Slider", "SliderHandle"),
            Orientation::Vertical => ("VerticalSlider", "VerticalSliderHandle"),
        };
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet(sheet_name));
        let handle_sheet = self.handle_style_sheet.unwrap_or_else(|| sys.default_style_sheet(handle_name));
        let id = sys.insert(slider_control(ControlKind::Slider(state), sheet));
        attach_handle(sys, id, self.orientation, handle_sheet);
        id
    }

    pub(crate) fn state(&self) -> SliderState {
        let mut state = SliderState::new(self.orientation, self.min_value, self.max_value);
        state.steps_count = self.steps_count;
        state.flipped_direction = self.flipped_direction;
        state.interpolate_handle = self.interpolate_handle;
        state.wheel_scrolls_parent = self.wheel_scrolls_parent;
        state.value = state.quantize(self.value.unwrap_or(self.min_value));
        state
    }
}

pub(crate) fn slider_control(kind: ControlKind, sheet: Rc<StyleSheet>) -> Control {
    let mut c = Control::new(kind, sheet);
    c.lock_focus_on_self_while_mouse_down = true;
    c
}

/// Creates the handle as an internal part that forwards interactions.
pub(crate) fn attach_handle(sys: &mut UiSystem, slider: ControlId, orientation: Orientation, sheet: Rc<StyleSheet>) {
    let has_default_size = sheet.default_width.is_some() || sheet.default_height.is_some();
    let handle = Panel::new().style_sheet(sheet).build(sys);
    let c = &mut sys.controls[handle];
    c.anchor = match orientation {
        Orientation::Horizontal => Anchor::CenterLeft,
        Orientation::Vertical => Anchor::TopCenter,
    };
    if !has_default_size {
        c.size = match orientation {
            Orientation::Horizontal => MeasureVector::new(Measurement::pixels(16.0), Measurement::percent(100.0)),
            Orientation::Vertical => MeasureVector::new(Measurement::percent(100.0), Measurement::pixels(16.0)),
        };
    }
    c.transfer_interactions_to = Some(slider);
    c.copy_state_from = Some(slider);
    c.ignore_scroll_offset = true;

    if let Err(e) = sys.add_internal_child(slider, handle, false) {
        log::warn!("slider handle for {slider:?}: {e}");
        return;
    }
    if let Some(s) = sys.controls[slider].kind.slider_mut() {
        s.handle = Some(handle);
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, interaction: Interaction) -> bool {
    let mouse = sys.input.mouse_position();
    let c = &sys.controls[id];
    let track = c.last_internal_bounding_rect;
    let Some(s) = c.kind.slider() else { return false };
    let value = match interaction {
        Interaction::LeftPressed | Interaction::LeftDown => s.value_for_position(track, mouse),
        Interaction::Wheel(_) if s.wheel_scrolls_parent => return false,
        Interaction::Wheel(notches) => {
            let step = (s.range() / s.effective_steps()).max(1);
            let delta = match s.orientation {
                Orientation::Horizontal => notches as i64 * step,
                Orientation::Vertical => -(notches as i64) * step,
            };
            (s.value as i64).saturating_add(delta).clamp(i32::MIN as i64, i32::MAX as i64) as i32
        }
        Interaction::Click => return false,
    };
    if let Err(e) = sys.set_slider_value_safe(id, value) {
        log::warn!("slider {id:?}: {e}");
    }
    true
}

/// Moves the handle towards the value's position.
pub(crate) fn update(sys: &mut UiSystem, id: ControlId, dt: f32) {
    let c = &sys.controls[id];
    let track = c.last_internal_bounding_rect;
    let speed = c.style_sheet.interpolate_offsets_speed.unwrap_or(0.0);
    let Some(s) = c.kind.slider() else { return };
    let Some(handle) = s.handle else { return };
    let Some(h) = sys.controls.get(handle) else { return };
    let handle_size = h.last_bounding_rect.size();

    let (track_len, handle_len) = match s.orientation {
        Orientation::Horizontal => (track.width, handle_size.x),
        Orientation::Vertical => (track.height, handle_size.y),
    };
    let target = s.handle_target(track_len, handle_len);
    let offset = if s.interpolate_handle && speed > 0.0 {
        s.handle_offset + (target - s.handle_offset) * (dt * speed).min(1.0)
    } else {
        target
    };
    let orientation = s.orientation;

    if let Some(s) = sys.controls[id].kind.slider_mut() {
        s.handle_offset = offset;
    }
    if let Some(h) = sys.controls.get_mut(handle) {
        h.offset = match orientation {
            Orientation::Horizontal => MeasureVector::pixels(offset.round(), 0.0),
            Orientation::Vertical => MeasureVector::pixels(0.0, offset.round()),
        };
    }
}

// ── value API ─────────────────────────────────────────────────────────────

impl UiSystem {
    fn slider_state(&self, id: ControlId) -> Result<&SliderState> {
        self.control(id)?.kind.slider().ok_or(UiError::WrongControlKind { control: id, expected: "Slider" })
    }

    fn slider_state_mut(&mut self, id: ControlId) -> Result<&mut SliderState> {
        self.control_mut(id)?
            .kind
            .slider_mut()
            .ok_or(UiError::WrongControlKind { control: id, expected: "Slider" })
    }

    pub fn slider_value(&self, id: ControlId) -> Result<i32> {
        Ok(self.slider_state(id)?.value)
    }

    pub fn slider_min(&self, id: ControlId) -> Result<i32> {
        Ok(self.slider_state(id)?.min_value)
    }

    pub fn slider_max(&self, id: ControlId) -> Result<i32> {
        Ok(self.slider_state(id)?.max_value)
    }

    /// Strict setter: out-of-range values are refused.
    pub fn set_slider_value(&mut self, id: ControlId, value: i32) -> Result<()> {
        let s = self.slider_state(id)?;
        if value < s.min_value || value > s.max_value {
            return Err(UiError::ValueOutOfRange {
                control: id,
                value: value as i64,
                min: s.min_value as i64,
                max: s.max_value as i64,
            });
        }
        self.set_slider_value_safe(id, value)
    }

    /// Clamps and snaps `value` to the nearest step.
    pub fn set_slider_value_safe(&mut self, id: ControlId, value: i32) -> Result<()> {
        let s = self.slider_state_mut(id)?;
        let value = s.quantize(value);
        if s.value != value {
            s.value = value;
            self.fire(id, EventKind::ValueChanged);
        }
        Ok(())
    }

    pub fn set_slider_min(&mut self, id: ControlId, min: i32) -> Result<()> {
        let max = self.slider_state(id)?.max_value;
        self.set_slider_range(id, min, max)
    }

    pub fn set_slider_max(&mut self, id: ControlId, max: i32) -> Result<()> {
        let min = self.slider_state(id)?.min_value;
        self.set_slider_range(id, min, max)
    }

    /// Changes both bounds, re-clamping the value.
    pub fn set_slider_range(&mut self, id: ControlId, min: i32, max: i32) -> Result<()> {
        if min > max {
            return Err(UiError::InvalidRange { control: id, min: min as i64, max: max as i64 });
        }
        let s = self.slider_state_mut(id)?;
        if s.min_value == min && s.max_value == max {
            return Ok(());
        }
        s.min_value = min;
        s.max_value = max;
        let value = s.value;
        self.set_slider_value_safe(id, value)
    }

    /// Changes the step count and re-snaps the current value.
    pub fn set_slider_steps_count(&mut self, id: ControlId, steps: u32) -> Result<()> {
        let s = self.slider_state_mut(id)?;
        s.steps_count = steps;
        let value = s.value;
        self.set_slider_value_safe(id, value)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::test_support::{system, Harness};

    #[test]
    fn quantizes_to_steps() {
        let mut s = SliderState::new(Orientation::Horizontal, 0, 10);
        s.steps_count = 5;
        for v in 0..=10 {
            assert_eq!(s.quantize(v) % 2, 0, "value {v}");
        }
        assert_eq!(s.quantize(3), 4);
        assert_eq!(s.quantize(-4), 0);
        assert_eq!(s.quantize(99), 10);
    }

    #[test]
    fn pointer_maps_to_steps() {
        let mut s = SliderState::new(Orientation::Horizontal, 0, 10);
        s.steps_count = 5;
        let track = Rect::new(100, 0, 100, 20);
        assert_eq!(s.value_for_position(track, Point::new(100, 5)), 0);
        assert_eq!(s.value_for_position(track, Point::new(150, 5)), 6);
        assert_eq!(s.value_for_position(track, Point::new(500, 5)), 10);

        s.flipped_direction = true;
        assert_eq!(s.value_for_position(track, Point::new(100, 5)), 10);
    }

    #[test]
    fn vertical_uses_y_axis() {
        let s = SliderState::new(Orientation::Vertical, 0, 100);
        let track = Rect::new(0, 0, 20, 200);
        assert_eq!(s.value_for_position(track, Point::new(999, 50)), 25);
    }

    #[test]
    fn handle_target_spans_free_track() {
        let mut s = SliderState::new(Orientation::Horizontal, 0, 10);
        s.value = 5;
        assert_eq!(s.handle_target(120, 20), 50.0);
        s.flipped_direction = true;
        s.value = 10;
        assert_eq!(s.handle_target(120, 20), 0.0);
    }

    #[test]
    fn strict_and_safe_setters() {
        let mut sys = system();
        let id = Slider::new(Orientation::Horizontal).range(0, 10).build(&mut sys).unwrap();
        assert!(matches!(sys.set_slider_value(id, 11), Err(UiError::ValueOutOfRange { .. })));
        assert_eq!(sys.slider_value(id).unwrap(), 0);

        sys.set_slider_value_safe(id, 42).unwrap();
        assert_eq!(sys.slider_value(id).unwrap(), 10);

        assert!(matches!(sys.set_slider_range(id, 5, 1), Err(UiError::InvalidRange { .. })));
        assert!(Slider::new(Orientation::Horizontal).range(3, 2).build(&mut sys).is_err());
    }

    #[test]
    fn steps_change_resnaps_value() {
        let mut sys = system();
        let id = Slider::new(Orientation::Horizontal).range(0, 10).value(7).build(&mut sys).unwrap();
        assert_eq!(sys.slider_value(id).unwrap(), 7);
        sys.set_slider_steps_count(id, 5).unwrap();
        assert_eq!(sys.slider_value(id).unwrap(), 8);
    }

    #[test]
    fn full_i32_range_does_not_overflow() {
        let mut sys = system();
        let id = Slider::new(Orientation::Horizontal).range(0, 10).value(5).build(&mut sys).unwrap();
        sys.set_slider_range(id, i32::MIN, i32::MAX).unwrap();
        let v = sys.slider_value(id).unwrap();
        assert!((i32::MIN..=i32::MAX).contains(&v));

        sys.set_slider_value_safe(id, i32::MAX).unwrap();
        assert_eq!(sys.slider_value(id).unwrap(), i32::MAX);
        sys.set_slider_value_safe(id, i32::MIN).unwrap();
        assert_eq!(sys.slider_value(id).unwrap(), i32::MIN);

        let s = sys.control(id).unwrap().kind.slider().unwrap();
        assert_eq!(s.relative_value(), 0.0);
        let track = Rect::new(0, 0, 100, 10);
        assert_eq!(s.value_for_position(track, Point::new(100, 5)), i32::MAX);
        assert_eq!(s.value_for_position(track, Point::new(0, 5)), i32::MIN);
    }

    #[test]
    fn value_changed_fires_once_per_change() {
        let mut sys = system();
        let id = Slider::new(Orientation::Horizontal).range(0, 10).build(&mut sys).unwrap();
        let count = Rc::new(RefCell::new(0));
        let c = count.clone();
        sys.control_mut(id).unwrap().events.set(EventKind::ValueChanged, move |_, _| *c.borrow_mut() += 1);

        sys.set_slider_value(id, 3).unwrap();
        sys.set_slider_value(id, 3).unwrap();
        sys.set_slider_max(id, 2).unwrap();
        assert_eq!(*count.borrow(), 2);
        assert_eq!(sys.slider_value(id).unwrap(), 2);
    }

    #[test]
    fn dragging_handle_moves_value() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let id = Slider::new(Orientation::Horizontal)
            .range(0, 10)
            .steps_count(5)
            .interpolate_handle(false)
            .build(&mut h.sys)
            .unwrap();
        {
            let c = h.sys.control_mut(id).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 20.0);
        }
        h.sys.add_child(root, id).unwrap();
        h.frame();

        h.move_to(2, 10);
        h.press();
        assert_eq!(h.sys.slider_value(id).unwrap(), 0);
        // Focus stays on the slider while the button is held, even off the track.
        h.move_to(300, 200);
        assert_eq!(h.sys.targeted_control(), Some(id));
        assert_eq!(h.sys.slider_value(id).unwrap(), 10);
        h.release();

        let handle = h.sys.control(id).unwrap().kind.slider().unwrap().handle().unwrap();
        h.frame();
        assert_eq!(h.sys.control(handle).unwrap().last_bounding_rect().x, 84);
    }
}
