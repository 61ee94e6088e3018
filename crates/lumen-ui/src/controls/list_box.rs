use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::Renderer;

use crate::control::{draw_style_layers, Control, ControlId, DrawMode, EventKind, OverflowMode};
use crate::controls::paragraph::{draw_lines, TextStyle};
use crate::controls::{ControlKind, Interaction};
use crate::error::{Result, UiError};
use crate::measure::{MeasureUnit, Sides};
use crate::style::{props, ControlState, StyleSheet, SystemStyleSheet};
use crate::system::UiSystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: String,
    pub text: String,
}

impl ListItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Items, selection and scroll position of a list.
#[derive(Debug, Clone)]
pub struct ListBoxState {
    pub(crate) items: Vec<ListItem>,
    pub(crate) selected: Option<usize>,
    pub(crate) first_visible: usize,
    /// Clicking the selected item clears the selection.
    pub allow_deselect: bool,
    pub(crate) items_style_sheet: Rc<StyleSheet>,
    pub(crate) hovered: Option<usize>,
    /// Where rows were drawn last frame.
    pub(crate) area: Rect,
    pub(crate) item_height: i32,
    pub(crate) visible_rows: usize,
}

impl ListBoxState {
    pub fn new(items_style_sheet: Rc<StyleSheet>) -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            first_visible: 0,
            allow_deselect: false,
            items_style_sheet,
            hovered: None,
            area: Rect::default(),
            item_height: 0,
            visible_rows: 0,
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&ListItem> {
        self.selected.and_then(|i| self.items.get(i))
    }

    /// Item index under `pointer` given last frame's rows.
    pub fn index_at(&self, pointer: Point) -> Option<usize> {
        if self.item_height <= 0 || !self.area.contains(pointer) {
            return None;
        }
        let row = ((pointer.y - self.area.top()) / self.item_height) as usize;
        let index = self.first_visible + row;
        (row < self.visible_rows && index < self.items.len()).then_some(index)
    }

    fn max_first_visible(&self) -> usize {
        self.items.len().saturating_sub(self.visible_rows.max(1))
    }

    /// Scrolls by whole rows; positive notches scroll up.
    pub(crate) fn scroll_rows(&mut self, notches: i32) {
        let first = self.first_visible as i64 - notches as i64;
        self.first_visible = first.clamp(0, self.max_first_visible() as i64) as usize;
    }
}

/// Row height: the items sheet's pixel default height, else one line plus
/// the row padding.
pub(crate) fn item_height(renderer: &dyn Renderer, sheet: &StyleSheet, system: &SystemStyleSheet) -> i32 {
    if let Some(h) = sheet.default_height
        && h.units == MeasureUnit::Pixels
    {
        return h.value as i32;
    }
    let style = TextStyle::resolve(sheet, ControlState::Default, None, system);
    let padding = sheet.get_property(&props::PADDING, ControlState::Default, Sides::ZERO, None);
    style.line_height(renderer) + padding.v()
}

fn row_state(selected: bool, hovered: bool, disabled: bool) -> ControlState {
    match (disabled, selected, hovered) {
        (true, true, _) => ControlState::DisabledChecked,
        (true, false, _) => ControlState::Disabled,
        (false, true, true) => ControlState::TargetedChecked,
        (false, true, false) => ControlState::Checked,
        (false, false, true) => ControlState::Targeted,
        (false, false, false) => ControlState::Default,
    }
}

// ── builder ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct ListBox {
    items: Vec<ListItem>,
    allow_deselect: bool,
    style_sheet: Option<Rc<StyleSheet>>,
    items_style_sheet: Option<Rc<StyleSheet>>,
}

impl ListBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.items.push(ListItem::new(id, text));
        self
    }

    pub fn allow_deselect(mut self, v: bool) -> Self { self.allow_deselect = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn items_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.items_style_sheet = Some(v); self }

    pub(crate) fn state(&mut self, sys: &UiSystem) -> ListBoxState {
        let sheet = self.items_style_sheet.take().unwrap_or_else(|| sys.default_style_sheet("ListBoxItem"));
        let mut state = ListBoxState::new(sheet);
        state.items = std::mem::take(&mut self.items);
        state.allow_deselect = self.allow_deselect;
        state
    }

    pub fn build(mut self, sys: &mut UiSystem) -> ControlId {
        let state = self.state(sys);
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("ListBox"));
        let mut c = Control::new(ControlKind::ListBox(state), sheet);
        c.overflow_mode = OverflowMode::HideOverflow;
        sys.insert(c)
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

/// Draws the visible rows into `area` and records the row geometry.
pub(crate) fn draw_rows(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer, area: Rect, mode: DrawMode) {
    let disabled = sys.is_currently_disabled(id);
    let Some(list) = sys.controls[id].kind.list() else { return };
    let sheet = list.items_style_sheet.clone();
    let height = item_height(renderer, &sheet, &sys.system_style_sheet).max(1);
    let rows = (area.height / height).max(0) as usize;

    let padding = sheet.get_property(&props::PADDING, ControlState::Default, Sides::ZERO, None);
    for (row, index) in (list.first_visible..list.items.len()).take(rows).enumerate() {
        let rect = Rect::new(area.left(), area.top() + row as i32 * height, area.width, height);
        let state = row_state(list.selected == Some(index), list.hovered == Some(index), disabled);
        draw_style_layers(renderer, &sheet, state, None, rect, 1.0, mode);
        let style = TextStyle::resolve(&sheet, state, None, &sys.system_style_sheet);
        draw_lines(renderer, &style, std::slice::from_ref(&list.items[index].text), padding.shrink(rect));
    }

    if let Some(list) = sys.controls[id].kind.list_mut() {
        list.area = area;
        list.item_height = height;
        list.visible_rows = rows;
    }
}

pub(crate) fn update_hovered(sys: &mut UiSystem, id: ControlId) {
    let mouse = sys.input.mouse_position();
    let targeted = sys.targeted == Some(id);
    if let Some(list) = sys.controls[id].kind.list_mut() {
        list.hovered = if targeted { list.index_at(mouse) } else { None };
    }
}

pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, interaction: Interaction) -> bool {
    let mouse = sys.input.mouse_position();
    let Some(list) = sys.controls[id].kind.list_mut() else { return false };
    match interaction {
        Interaction::Click => {
            let Some(index) = list.index_at(mouse) else { return true };
            let next = if list.selected == Some(index) && list.allow_deselect { None } else { Some(index) };
            if let Err(e) = sys.set_selected_index(id, next) {
                log::warn!("list {id:?}: {e}");
            }
            true
        }
        Interaction::Wheel(notches) => {
            list.scroll_rows(notches);
            true
        }
        _ => false,
    }
}

// ── list API ──────────────────────────────────────────────────────────────

impl UiSystem {
    fn list_state(&self, id: ControlId) -> Result<&ListBoxState> {
        self.control(id)?.kind.list().ok_or(UiError::WrongControlKind { control: id, expected: "ListBox" })
    }

    fn list_state_mut(&mut self, id: ControlId) -> Result<&mut ListBoxState> {
        self.control_mut(id)?
            .kind
            .list_mut()
            .ok_or(UiError::WrongControlKind { control: id, expected: "ListBox" })
    }

    pub fn list_items(&self, id: ControlId) -> Result<&[ListItem]> {
        Ok(&self.list_state(id)?.items)
    }

    pub fn add_list_item(&mut self, id: ControlId, item_id: impl Into<String>, text: impl Into<String>) -> Result<()> {
        self.list_state_mut(id)?.items.push(ListItem::new(item_id, text));
        Ok(())
    }

    /// Removes the first item with `item_id`; returns whether one was found.
    pub fn remove_list_item(&mut self, id: ControlId, item_id: &str) -> Result<bool> {
        let list = self.list_state_mut(id)?;
        let Some(index) = list.items.iter().position(|i| i.id == item_id) else { return Ok(false) };
        list.items.remove(index);
        let selection_lost = list.selected == Some(index);
        match list.selected {
            Some(s) if s == index => list.selected = None,
            Some(s) if s > index => list.selected = Some(s - 1),
            _ => {}
        }
        list.first_visible = list.first_visible.min(list.max_first_visible());
        if selection_lost {
            self.fire(id, EventKind::ValueChanged);
        }
        Ok(true)
    }

    pub fn clear_list_items(&mut self, id: ControlId) -> Result<()> {
        let list = self.list_state_mut(id)?;
        list.items.clear();
        list.first_visible = 0;
        let had_selection = list.selected.take().is_some();
        if had_selection {
            self.fire(id, EventKind::ValueChanged);
        }
        Ok(())
    }

    pub fn selected_index(&self, id: ControlId) -> Result<Option<usize>> {
        Ok(self.list_state(id)?.selected)
    }

    pub fn selected_item(&self, id: ControlId) -> Result<Option<&ListItem>> {
        Ok(self.list_state(id)?.selected_item())
    }

    /// Fails with `ValueOutOfRange` for an index past the end.
    pub fn set_selected_index(&mut self, id: ControlId, index: Option<usize>) -> Result<()> {
        let list = self.list_state_mut(id)?;
        if let Some(i) = index
            && i >= list.items.len()
        {
            return Err(UiError::ValueOutOfRange {
                control: id,
                value: i as i64,
                min: 0,
                max: list.items.len() as i64 - 1,
            });
        }
        if list.selected != index {
            list.selected = index;
            self.fire(id, EventKind::ValueChanged);
        }
        Ok(())
    }

    /// Selects the item with `item_id`; returns whether it exists.
    pub fn select_list_item(&mut self, id: ControlId, item_id: &str) -> Result<bool> {
        let index = self.list_state(id)?.items.iter().position(|i| i.id == item_id);
        match index {
            Some(i) => self.set_selected_index(id, Some(i)).map(|_| true),
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Anchor;
    use crate::measure::{MeasureVector, Measurement};
    use crate::test_support::Harness;

    fn row_sheet() -> Rc<StyleSheet> {
        let mut sheet = StyleSheet::default();
        sheet.default_height = Some(Measurement::pixels(20.0));
        Rc::new(sheet)
    }

    fn list(h: &mut Harness, count: usize) -> ControlId {
        let mut builder = ListBox::new().items_style_sheet(row_sheet());
        for i in 0..count {
            builder = builder.item(format!("id{i}"), format!("item {i}"));
        }
        let id = builder.build(&mut h.sys);
        let c = h.sys.control_mut(id).unwrap();
        c.anchor = Anchor::TopLeft;
        c.size = MeasureVector::pixels(100.0, 60.0);
        let root = h.sys.root();
        h.sys.add_child(root, id).unwrap();
        h.frame();
        id
    }

    #[test]
    fn draws_only_rows_that_fit() {
        let mut h = Harness::new();
        list(&mut h, 5);
        assert_eq!(h.dl.texts().collect::<Vec<_>>(), vec!["item 0", "item 1", "item 2"]);
    }

    #[test]
    fn click_selects_row_under_pointer() {
        let mut h = Harness::new();
        let id = list(&mut h, 5);
        h.click_at(10, 45);
        assert_eq!(h.sys.selected_index(id).unwrap(), Some(2));
        assert_eq!(h.sys.selected_item(id).unwrap().unwrap().id, "id2");
    }

    #[test]
    fn wheel_scrolls_rows() {
        let mut h = Harness::new();
        let id = list(&mut h, 5);
        h.move_to(10, 10);
        h.wheel(-120);
        h.wheel(-120);
        h.wheel(-120);
        assert_eq!(h.sys.control(id).unwrap().kind.list().unwrap().first_visible, 2);
        assert_eq!(h.dl.texts().collect::<Vec<_>>(), vec!["item 2", "item 3", "item 4"]);
    }

    #[test]
    fn selection_edits() {
        let mut h = Harness::new();
        let id = list(&mut h, 3);
        assert!(matches!(h.sys.set_selected_index(id, Some(3)), Err(UiError::ValueOutOfRange { .. })));
        assert!(h.sys.select_list_item(id, "id2").unwrap());
        h.sys.remove_list_item(id, "id0").unwrap();
        assert_eq!(h.sys.selected_index(id).unwrap(), Some(1));
        h.sys.remove_list_item(id, "id2").unwrap();
        assert_eq!(h.sys.selected_index(id).unwrap(), None);
        h.sys.clear_list_items(id).unwrap();
        assert!(h.sys.list_items(id).unwrap().is_empty());
    }

    #[test]
    fn row_states() {
        assert_eq!(row_state(true, true, false), ControlState::TargetedChecked);
        assert_eq!(row_state(false, true, false), ControlState::Targeted);
        assert_eq!(row_state(true, false, true), ControlState::DisabledChecked);
    }
}
