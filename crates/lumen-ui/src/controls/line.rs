//! Decorative separators.

use std::rc::Rc;

use crate::control::{Control, ControlId};
use crate::controls::ControlKind;
use crate::style::StyleSheet;
use crate::system::UiSystem;

fn build_plain(sys: &mut UiSystem, kind: ControlKind, sheet: Option<Rc<StyleSheet>>) -> ControlId {
    let sheet = sheet.unwrap_or_else(|| sys.default_style_sheet(kind.type_name()));
    let mut c = Control::new(kind, sheet);
    c.ignore_interactions = true;
    sys.insert(c)
}

#[derive(Default)]
pub struct HorizontalLine {
    style_sheet: Option<Rc<StyleSheet>>,
}

impl HorizontalLine {
    pub fn new() -> Self { Self::default() }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        build_plain(sys, ControlKind::HorizontalLine, self.style_sheet)
    }
}

#[derive(Default)]
pub struct VerticalLine {
    style_sheet: Option<Rc<StyleSheet>>,
}

impl VerticalLine {
    pub fn new() -> Self { Self::default() }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        build_plain(sys, ControlKind::VerticalLine, self.style_sheet)
    }
}

/// Empty space `rows` times the sheet's row height tall.
pub struct RowsSpacer {
    rows: u32,
    style_sheet: Option<Rc<StyleSheet>>,
}

impl RowsSpacer {
    pub fn new(rows: u32) -> Self { Self { rows, style_sheet: None } }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        build_plain(sys, ControlKind::RowsSpacer(self.rows), self.style_sheet)
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::coords::Rect;

    use super::*;
    use crate::test_support::Harness;

    #[test]
    fn spacer_pushes_auto_siblings_down() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let spacer = RowsSpacer::new(3).build(&mut h.sys);
        let line = HorizontalLine::new().build(&mut h.sys);
        h.sys.add_child(root, spacer).unwrap();
        h.sys.add_child(root, line).unwrap();
        h.frame();

        assert_eq!(h.sys.control(spacer).unwrap().last_bounding_rect(), Rect::new(0, 0, 800, 60));
        assert_eq!(h.sys.control(line).unwrap().last_bounding_rect(), Rect::new(0, 60, 800, 8));
    }

    #[test]
    fn lines_are_never_targeted() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let line = VerticalLine::new().build(&mut h.sys);
        h.sys.add_child(root, line).unwrap();
        h.move_to(2, 2);
        assert_eq!(h.sys.targeted_control(), None);
    }
}
