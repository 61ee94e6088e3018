use std::rc::Rc;

use crate::control::{Anchor, ControlId};
use crate::controls::slider::slider_control;
use crate::controls::{ControlKind, Orientation, Panel, SliderState};
use crate::error::{Result, UiError};
use crate::measure::{MeasureVector, Measurement};
use crate::style::StyleSheet;
use crate::system::UiSystem;

/// A slider without a handle: a fill part grows with the value.
#[derive(Debug, Clone)]
pub struct ProgressBarState {
    pub(crate) slider: SliderState,
    pub(crate) fill: Option<ControlId>,
    /// Let the user set the value by clicking/dragging.
    pub interactive: bool,
}

impl ProgressBarState {
    pub fn fill(&self) -> Option<ControlId> {
        self.fill
    }
}

pub struct ProgressBar {
    min_value: i32,
    max_value: i32,
    value: i32,
    flipped: bool,
    interactive: bool,
    style_sheet: Option<Rc<StyleSheet>>,
    fill_style_sheet: Option<Rc<StyleSheet>>,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self { min_value: 0, max_value: 100, value: 0, flipped: false, interactive: false, style_sheet: None, fill_style_sheet: None }
    }

    pub fn range(mut self, min: i32, max: i32) -> Self { self.min_value = min; self.max_value = max; self }
    pub fn value(mut self, v: i32) -> Self { self.value = v; self }
    /// Fill from the right edge.
    pub fn flipped(mut self, v: bool) -> Self { self.flipped = v; self }
    pub fn interactive(mut self, v: bool) -> Self { self.interactive = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn fill_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.fill_style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> Result<ControlId> {
        if self.min_value > self.max_value {
            return Err(UiError::InvalidRange {
                control: ControlId::default(),
                min: self.min_value as i64,
                max: self.max_value as i64,
            });
        }
        let mut slider = SliderState::new(Orientation::Horizontal, self.min_value, self.max_value);
        slider.flipped_direction = self.flipped;
        slider.value = slider.quantize(self.value);

        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("ProgressBar"));
        let fill_sheet = self.fill_style_sheet.unwrap_or_else(|| sys.default_style_sheet("ProgressBarFill"));
        let state = ProgressBarState { slider, fill: None, interactive: self.interactive };
        let id = sys.insert(slider_control(ControlKind::ProgressBar(state), sheet));

        let fill = Panel::new()
            .style_sheet(fill_sheet)
            .anchor(if self.flipped { Anchor::CenterRight } else { Anchor::CenterLeft })
            .build(sys);
        let c = &mut sys.controls[fill];
        c.copy_state_from = Some(id);
        c.ignore_interactions = true;
        c.ignore_scroll_offset = true;
        sys.add_internal_child(id, fill, false)?;
        if let ControlKind::ProgressBar(p) = &mut sys.controls[id].kind {
            p.fill = Some(fill);
        }
        update(sys, id, 0.0);
        Ok(id)
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Sizes the fill to the value's share of the range.
pub(crate) fn update(sys: &mut UiSystem, id: ControlId, _dt: f32) {
    let ControlKind::ProgressBar(p) = &sys.controls[id].kind else { return };
    let Some(fill) = p.fill else { return };
    let percent = p.slider.relative_value() * 100.0;
    if let Some(c) = sys.controls.get_mut(fill) {
        c.size = MeasureVector::new(Measurement::percent(percent), Measurement::percent(100.0));
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::coords::Rect;

    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn fill_follows_value() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let bar = ProgressBar::new().range(0, 100).value(25).build(&mut h.sys).unwrap();
        {
            let c = h.sys.control_mut(bar).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(200.0, 20.0);
        }
        h.sys.add_child(root, bar).unwrap();
        h.frame();

        let ControlKind::ProgressBar(p) = &h.sys.control(bar).unwrap().kind else { panic!("not a progress bar") };
        let fill = p.fill().unwrap();
        assert_eq!(h.sys.control(fill).unwrap().last_bounding_rect(), Rect::new(0, 0, 50, 20));

        h.sys.set_slider_value(bar, 50).unwrap();
        h.frame();
        assert_eq!(h.sys.control(fill).unwrap().last_bounding_rect().width, 100);
    }

    #[test]
    fn not_interactive_by_default() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let bar = ProgressBar::new().build(&mut h.sys).unwrap();
        h.sys.add_child(root, bar).unwrap();
        h.frame();
        h.click_at(10, 5);
        assert_eq!(h.sys.slider_value(bar).unwrap(), 0);
        assert_eq!(h.sys.targeted_control(), None);
    }
}
