use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::Renderer;

use crate::control::{Anchor, Control, ControlId, DrawMode};
use crate::controls::list_box::{draw_rows, item_height};
use crate::controls::paragraph::{draw_lines, TextStyle};
use crate::controls::{ControlKind, Interaction, ListBox, ListBoxState, Panel};
use crate::error::{Result, UiError};
use crate::measure::{MeasureVector, Sides};
use crate::style::{props, ControlState, StyleSheet};
use crate::system::UiSystem;

/// A list that collapses to its selected item. While open, the list is drawn
/// in the overlay pass below the header and the control wins hit-tests.
#[derive(Debug, Clone)]
pub struct DropDownState {
    pub(crate) list: ListBoxState,
    pub(crate) is_open: bool,
    /// Shown in the header when nothing is selected.
    pub placeholder: String,
    /// Rows shown when open.
    pub visible_items: usize,
    pub(crate) overlay_rect: Rect,
    pub(crate) arrow: Option<ControlId>,
}

impl DropDownState {
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn list(&self) -> &ListBoxState {
        &self.list
    }
}

pub struct DropDown {
    list: ListBox,
    placeholder: String,
    visible_items: usize,
    style_sheet: Option<Rc<StyleSheet>>,
    arrow_style_sheet: Option<Rc<StyleSheet>>,
}

impl DropDown {
    pub fn new() -> Self {
        Self { list: ListBox::new(), placeholder: String::new(), visible_items: 6, style_sheet: None, arrow_style_sheet: None }
    }

    pub fn item(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.list = self.list.item(id, text);
        self
    }

    pub fn placeholder(mut self, v: impl Into<String>) -> Self { self.placeholder = v.into(); self }
    pub fn visible_items(mut self, v: usize) -> Self { self.visible_items = v.max(1); self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn items_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.list = self.list.items_style_sheet(v); self }
    pub fn arrow_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.arrow_style_sheet = Some(v); self }

    pub fn build(mut self, sys: &mut UiSystem) -> ControlId {
        let state = DropDownState {
            list: self.list.state(sys),
            is_open: false,
            placeholder: self.placeholder,
            visible_items: self.visible_items,
            overlay_rect: Rect::default(),
            arrow: None,
        };
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("DropDown"));
        let id = sys.insert(Control::new(ControlKind::DropDown(state), sheet));

        let arrow_sheet = self.arrow_style_sheet.unwrap_or_else(|| sys.default_style_sheet("DropDownIcon"));
        let sized = arrow_sheet.default_width.is_some() || arrow_sheet.default_height.is_some();
        let arrow = Panel::new().style_sheet(arrow_sheet).anchor(Anchor::CenterRight).build(sys);
        let c = &mut sys.controls[arrow];
        if !sized {
            c.size = MeasureVector::pixels(16.0, 16.0);
        }
        c.copy_state_from = Some(id);
        c.ignore_interactions = true;
        match sys.add_internal_child(id, arrow, true) {
            Ok(()) => {
                if let ControlKind::DropDown(d) = &mut sys.controls[id].kind {
                    d.arrow = Some(arrow);
                }
            }
            Err(e) => log::warn!("drop-down arrow for {id:?}: {e}"),
        }
        id
    }
}

impl Default for DropDown {
    fn default() -> Self {
        Self::new()
    }
}

fn drop_down(sys: &UiSystem, id: ControlId) -> Option<&DropDownState> {
    match &sys.controls.get(id)?.kind {
        ControlKind::DropDown(d) => Some(d),
        _ => None,
    }
}

fn drop_down_mut(sys: &mut UiSystem, id: ControlId) -> Option<&mut DropDownState> {
    match &mut sys.controls.get_mut(id)?.kind {
        ControlKind::DropDown(d) => Some(d),
        _ => None,
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

/// The collapsed header is one row tall.
pub(crate) fn adjust_size(sys: &mut UiSystem, id: ControlId, renderer: &dyn Renderer, padding: Sides, size: &mut Point) {
    let Some(d) = drop_down(sys, id) else { return };
    size.y = item_height(renderer, &d.list.items_style_sheet, &sys.system_style_sheet) + padding.v();
}

pub(crate) fn draw_header(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer, state: ControlState) {
    let c = &sys.controls[id];
    let ControlKind::DropDown(d) = &c.kind else { return };
    let mut style = TextStyle::resolve(&c.style_sheet, state, Some(&c.override_styles), &sys.system_style_sheet);
    let text = match d.list.selected_item() {
        Some(item) => item.text.clone(),
        None => {
            style.fill = style.fill.fade(0.5);
            d.placeholder.clone()
        }
    };
    let area = c.last_internal_bounding_rect;
    let area = Rect::new(area.x, area.y + (area.height - style.line_height(renderer)) / 2, area.width, area.height);
    draw_lines(renderer, &style, &[text], area);

    if d.is_open {
        sys.run_after_drawing_controls(move |sys, renderer| draw_overlay(sys, id, renderer));
    }
}

/// Draws the open list below the header, outside any ancestor's clipping.
fn draw_overlay(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer) {
    let state = sys.control_state(id);
    let Some(c) = sys.controls.get(id) else { return };
    let ControlKind::DropDown(d) = &c.kind else { return };
    if !d.is_open {
        return;
    }
    let header = c.last_bounding_rect;
    let padding = c.style_sheet.get_property(&props::PADDING, state, Sides::ZERO, Some(&c.override_styles));
    let row = item_height(renderer, &d.list.items_style_sheet, &sys.system_style_sheet).max(1);
    let rows = d.list.items.len().clamp(1, d.visible_items.max(1)) as i32;
    let list_rect = Rect::new(header.x, header.bottom(), header.width, rows * row + padding.v());
    let visible = c.last_visible_bounding_rect.union(list_rect);

    let saved_scissor = renderer.scissor_region();
    renderer.clear_scissor_region();
    sys.draw_control_type(id, renderer, state, list_rect, DrawMode::Overlay);
    draw_rows(sys, id, renderer, padding.shrink(list_rect), DrawMode::Overlay);
    if let Some(region) = saved_scissor {
        renderer.set_scissor_region(region);
    }

    if let Some(c) = sys.controls.get_mut(id) {
        c.last_visible_bounding_rect = visible;
        if let ControlKind::DropDown(d) = &mut c.kind {
            d.overlay_rect = list_rect;
        }
    }
}

pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, _renderer: &dyn Renderer, interaction: Interaction) -> bool {
    let mouse = sys.input.mouse_position();
    let header = sys.controls[id].last_bounding_rect;
    let (is_open, row) = match drop_down_mut(sys, id) {
        Some(d) => (d.is_open, d.list.index_at(mouse)),
        None => return false,
    };
    match interaction {
        Interaction::Click if is_open => {
            if let Some(index) = row {
                if let Err(e) = sys.set_selected_index(id, Some(index)) {
                    log::warn!("drop-down {id:?}: {e}");
                }
                set_open(sys, id, false);
            } else if header.contains(mouse) {
                set_open(sys, id, false);
            }
            true
        }
        Interaction::Click => {
            set_open(sys, id, true);
            true
        }
        Interaction::Wheel(notches) if is_open => {
            if let Some(d) = drop_down_mut(sys, id) {
                d.list.scroll_rows(notches);
            }
            true
        }
        _ => false,
    }
}

/// Tracks the hovered row and closes on a press outside header and list.
pub(crate) fn update(sys: &mut UiSystem, id: ControlId) {
    let mouse = sys.input.mouse_position();
    let pressed = sys.input.left_pressed_now;
    let targeted = sys.targeted == Some(id);
    let Some(c) = sys.controls.get(id) else { return };
    let inside = c.last_visible_bounding_rect.contains(mouse);
    let Some(d) = drop_down_mut(sys, id) else { return };
    if !d.is_open {
        d.list.hovered = None;
        return;
    }
    d.list.hovered = if targeted { d.list.index_at(mouse) } else { None };
    if pressed && !inside {
        set_open(sys, id, false);
    }
}

fn set_open(sys: &mut UiSystem, id: ControlId, open: bool) {
    let Some(c) = sys.controls.get_mut(id) else { return };
    c.top_most_interactions = open;
    if let ControlKind::DropDown(d) = &mut c.kind {
        d.is_open = open;
        if !open {
            d.list.hovered = None;
        }
    }
    log::debug!("drop-down {id:?} open={open}");
}

impl UiSystem {
    pub fn is_drop_down_open(&self, id: ControlId) -> Result<bool> {
        drop_down(self, id)
            .map(|d| d.is_open)
            .ok_or(UiError::WrongControlKind { control: id, expected: "DropDown" })
    }

    pub fn set_drop_down_open(&mut self, id: ControlId, open: bool) -> Result<()> {
        drop_down(self, id).ok_or(UiError::WrongControlKind { control: id, expected: "DropDown" })?;
        set_open(self, id, open);
        Ok(())
    }
}
