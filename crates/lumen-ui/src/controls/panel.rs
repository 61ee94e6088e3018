use std::rc::Rc;

use crate::control::{Anchor, Control, ControlId, OverflowMode};
use crate::controls::{ControlKind, Orientation, Slider};
use crate::error::Result;
use crate::measure::{MeasureVector, Measurement};
use crate::style::StyleSheet;
use crate::system::UiSystem;

/// Builder for a plain container.
#[derive(Default)]
pub struct Panel {
    style_sheet: Option<Rc<StyleSheet>>,
    size: Option<MeasureVector>,
    anchor: Option<Anchor>,
    vertical_scrollbar: bool,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn size(mut self, v: MeasureVector) -> Self { self.size = Some(v); self }
    pub fn anchor(mut self, v: Anchor) -> Self { self.anchor = Some(v); self }

    /// Clip content and scroll it with a vertical scrollbar.
    pub fn vertical_scrollbar(mut self, v: bool) -> Self { self.vertical_scrollbar = v; self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("Panel"));
        let mut control = Control::new(ControlKind::Panel, sheet);
        if let Some(size) = self.size {
            control.size = size;
        }
        if let Some(anchor) = self.anchor {
            control.anchor = anchor;
        }
        let id = sys.insert(control);
        if self.vertical_scrollbar {
            create_vertical_scrollbar(sys, id);
        }
        id
    }
}

/// Adds a scrollbar to `panel` and switches it to hidden overflow.
pub fn create_vertical_scrollbar(sys: &mut UiSystem, panel: ControlId) -> ControlId {
    if let Some(existing) = sys.controls.get(panel).and_then(|c| c.vertical_scrollbar) {
        return existing;
    }
    let bar = Slider::new(Orientation::Vertical)
        .style_sheet(sys.default_style_sheet("VerticalScrollbar"))
        .handle_style_sheet(sys.default_style_sheet("VerticalScrollbarHandle"))
        .wheel_scrolls_parent(true)
        .insert(sys);

    let c = &mut sys.controls[bar];
    c.anchor = Anchor::TopRight;
    if c.style_sheet.default_height.is_none() {
        c.size.y = Measurement::percent(100.0);
    }
    c.ignore_scroll_offset = true;
    c.visible = false;

    let p = &mut sys.controls[panel];
    p.overflow_mode = OverflowMode::HideOverflow;
    p.vertical_scrollbar = Some(bar);

    if let Err(e) = sys.add_internal_child(panel, bar, true) {
        log::warn!("scrollbar for {panel:?}: {e}");
    }
    bar
}

/// Pixels the content of `id` is scrolled up by.
pub fn scroll_offset(sys: &UiSystem, id: ControlId) -> i32 {
    sys.controls
        .get(id)
        .and_then(|c| c.vertical_scrollbar)
        .and_then(|bar| sys.controls.get(bar))
        .filter(|bar| bar.visible)
        .and_then(|bar| bar.kind.slider())
        .map_or(0, |s| s.value())
}

pub(crate) fn has_active_scrollbar(sys: &UiSystem, id: ControlId) -> bool {
    sys.controls
        .get(id)
        .and_then(|c| c.vertical_scrollbar)
        .and_then(|bar| sys.controls.get(bar))
        .is_some_and(|bar| bar.visible && bar.kind.slider().is_some_and(|s| s.max_value() > 0))
}

/// Syncs the scrollbar range with the overflow; hides it when nothing overflows.
pub(crate) fn update_scrollbar_range(sys: &mut UiSystem, id: ControlId, content_height: i32, visible_height: i32) {
    let Some(bar) = sys.controls.get(id).and_then(|c| c.vertical_scrollbar) else { return };
    let max = (content_height - visible_height).max(0);
    if let Err(e) = sys.set_slider_max(bar, max) {
        log::warn!("scrollbar range for {id:?}: {e}");
        return;
    }
    if let Some(c) = sys.controls.get_mut(bar) {
        c.visible = max > 0;
    }
}

pub(crate) fn scroll_by(sys: &mut UiSystem, id: ControlId, delta: i32) {
    let Some(bar) = sys.controls.get(id).and_then(|c| c.vertical_scrollbar) else { return };
    let value = scroll_offset(sys, id);
    if let Err(e) = sys.set_slider_value_safe(bar, value + delta) {
        log::warn!("scrolling {id:?}: {e}");
    }
}

impl UiSystem {
    /// Scrollbar value of a panel, 0 when it has none or nothing overflows.
    pub fn scroll_offset(&self, id: ControlId) -> i32 {
        scroll_offset(self, id)
    }

    pub fn set_scroll_offset(&mut self, id: ControlId, value: i32) -> Result<()> {
        let Some(bar) = self.control(id)?.vertical_scrollbar else { return Ok(()) };
        self.set_slider_value_safe(bar, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    fn scrolling_panel(h: &mut Harness) -> ControlId {
        let root = h.sys.root();
        let panel = Panel::new()
            .anchor(Anchor::TopLeft)
            .size(MeasureVector::pixels(200.0, 100.0))
            .vertical_scrollbar(true)
            .build(&mut h.sys);
        h.sys.add_child(root, panel).unwrap();
        for _ in 0..5 {
            let row = Panel::new().size(MeasureVector::pixels(150.0, 40.0)).build(&mut h.sys);
            h.sys.add_child(panel, row).unwrap();
        }
        panel
    }

    #[test]
    fn scrollbar_tracks_overflow() {
        let mut h = Harness::new();
        let panel = scrolling_panel(&mut h);
        h.frame();

        let bar = h.sys.control(panel).unwrap().vertical_scrollbar().unwrap();
        assert!(h.sys.control(bar).unwrap().visible);
        assert_eq!(h.sys.slider_max(bar).unwrap(), 100);
        assert!(h.sys.control(bar).unwrap().is_internal());
        assert!(h.sys.control(panel).unwrap().children().iter().all(|&c| c != bar));
    }

    #[test]
    fn wheel_scrolls_content() {
        let mut h = Harness::new();
        let panel = scrolling_panel(&mut h);
        h.frame();
        h.move_to(50, 50);
        h.wheel(-120);

        assert_eq!(h.sys.scroll_offset(panel), 20);
        let first = h.sys.control(panel).unwrap().children()[0];
        assert_eq!(h.sys.control(first).unwrap().last_bounding_rect().y, -20);
    }

    #[test]
    fn no_overflow_hides_scrollbar() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let panel = Panel::new().size(MeasureVector::pixels(200.0, 300.0)).vertical_scrollbar(true).build(&mut h.sys);
        h.sys.add_child(root, panel).unwrap();
        h.frame();
        let bar = h.sys.control(panel).unwrap().vertical_scrollbar().unwrap();
        assert!(!h.sys.control(bar).unwrap().visible);
        assert_eq!(h.sys.scroll_offset(panel), 0);
    }
}
