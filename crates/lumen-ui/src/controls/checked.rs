use std::rc::Rc;

use crate::control::{Anchor, Control, ControlId, EventKind};
use crate::controls::{ControlKind, Interaction, Paragraph};
use crate::error::{Result, UiError};
use crate::measure::Sides;
use crate::style::{props, ControlState, StyleSheet};
use crate::system::UiSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckedVariant {
    Button,
    Checkbox,
    RadioButton,
    Custom,
}

impl CheckedVariant {
    pub fn type_name(self) -> &'static str {
        match self {
            CheckedVariant::Button => "Button",
            CheckedVariant::Checkbox => "Checkbox",
            CheckedVariant::RadioButton => "RadioButton",
            CheckedVariant::Custom => "CheckedControl",
        }
    }
}

/// A control with a checked flag and click-to-toggle rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedState {
    pub variant: CheckedVariant,
    pub toggle_check_on_click: bool,
    pub can_click_to_uncheck: bool,
    /// Checking this unchecks exclusive siblings.
    pub exclusive_selection: bool,
    pub(crate) label: Option<ControlId>,
}

impl CheckedState {
    fn for_variant(variant: CheckedVariant) -> Self {
        let (toggle, uncheck, exclusive) = match variant {
            CheckedVariant::Button => (false, true, false),
            CheckedVariant::Checkbox => (true, true, false),
            CheckedVariant::RadioButton => (true, false, true),
            CheckedVariant::Custom => (true, true, false),
        };
        Self {
            variant,
            toggle_check_on_click: toggle,
            can_click_to_uncheck: uncheck,
            exclusive_selection: exclusive,
            label: None,
        }
    }

    pub fn label(&self) -> Option<ControlId> {
        self.label
    }
}

// ── builders ──────────────────────────────────────────────────────────────

/// Shared builder behind [`Button`], [`Checkbox`], [`RadioButton`].
pub struct CheckedControl {
    state: CheckedState,
    text: Option<String>,
    checked: bool,
    style_sheet: Option<Rc<StyleSheet>>,
}

impl CheckedControl {
    pub fn new() -> Self {
        Self::with_variant(CheckedVariant::Custom, None)
    }

    fn with_variant(variant: CheckedVariant, text: Option<String>) -> Self {
        Self { state: CheckedState::for_variant(variant), text, checked: false, style_sheet: None }
    }

    pub fn text(mut self, v: impl Into<String>) -> Self { self.text = Some(v.into()); self }
    pub fn checked(mut self, v: bool) -> Self { self.checked = v; self }
    pub fn toggle_check_on_click(mut self, v: bool) -> Self { self.state.toggle_check_on_click = v; self }
    pub fn can_click_to_uncheck(mut self, v: bool) -> Self { self.state.can_click_to_uncheck = v; self }
    pub fn exclusive_selection(mut self, v: bool) -> Self { self.state.exclusive_selection = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let variant = self.state.variant;
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet(variant.type_name()));
        let mut c = Control::new(ControlKind::Checked(self.state), sheet.clone());
        c.is_checked = self.checked;
        let id = sys.insert(c);

        if let Some(text) = self.text {
            let anchor = match variant {
                CheckedVariant::Button => Anchor::Center,
                _ => Anchor::CenterLeft,
            };
            let label = create_label(sys, id, text, sheet, anchor);
            if let ControlKind::Checked(s) = &mut sys.controls[id].kind {
                s.label = label;
            }
        }
        id
    }
}

impl Default for CheckedControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Label paragraph sharing the owner's stylesheet and mirroring its state.
fn create_label(sys: &mut UiSystem, owner: ControlId, text: String, sheet: Rc<StyleSheet>, anchor: Anchor) -> Option<ControlId> {
    let label = Paragraph::new(text).style_sheet(sheet).build(sys);
    let c = &mut sys.controls[label];
    c.anchor = anchor;
    c.draw_fill_textures = false;
    c.copy_state_from = Some(owner);
    c.ignore_interactions = true;
    // The owner already applied these.
    c.override_styles.set(&props::PADDING, Some(Sides::ZERO));
    c.override_styles.set(&props::EXTRA_SIZE, Some(Sides::ZERO));
    c.override_styles.set(&props::MARGIN_BEFORE, Some(Default::default()));
    c.override_styles.set(&props::MARGIN_AFTER, Some(Default::default()));

    match sys.add_internal_child(owner, label, false) {
        Ok(()) => Some(label),
        Err(e) => {
            log::warn!("label for {owner:?}: {e}");
            None
        }
    }
}

pub struct Button;

impl Button {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(text: impl Into<String>) -> CheckedControl {
        CheckedControl::with_variant(CheckedVariant::Button, Some(text.into()))
    }
}

pub struct Checkbox;

impl Checkbox {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(text: impl Into<String>) -> CheckedControl {
        CheckedControl::with_variant(CheckedVariant::Checkbox, Some(text.into()))
    }
}

pub struct RadioButton;

impl RadioButton {
    #[allow(clippy::new_ret_no_self)]
    pub fn new(text: impl Into<String>) -> CheckedControl {
        CheckedControl::with_variant(CheckedVariant::RadioButton, Some(text.into()))
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, interaction: Interaction) -> bool {
    if interaction != Interaction::Click {
        return false;
    }
    let c = &sys.controls[id];
    let ControlKind::Checked(s) = &c.kind else { return false };
    if !s.toggle_check_on_click {
        return true;
    }
    let next = match (c.is_checked, s.can_click_to_uncheck) {
        (false, _) => true,
        (true, true) => false,
        (true, false) => return true,
    };
    if let Err(e) = sys.set_checked(id, next) {
        log::warn!("toggling {id:?}: {e}");
    }
    true
}

// ── checked API ───────────────────────────────────────────────────────────

impl UiSystem {
    fn checked_state(&self, id: ControlId) -> Result<&CheckedState> {
        match &self.control(id)?.kind {
            ControlKind::Checked(s) => Ok(s),
            _ => Err(UiError::WrongControlKind { control: id, expected: "CheckedControl" }),
        }
    }

    pub fn is_checked(&self, id: ControlId) -> Result<bool> {
        self.checked_state(id)?;
        Ok(self.controls[id].is_checked)
    }

    /// Sets the flag, unchecking exclusive siblings first, then fires
    /// ValueChanged and Checked/Unchecked. No-op when unchanged.
    pub fn set_checked(&mut self, id: ControlId, checked: bool) -> Result<()> {
        let exclusive = self.checked_state(id)?.exclusive_selection;
        if self.controls[id].is_checked == checked {
            return Ok(());
        }
        self.controls[id].is_checked = checked;

        if checked && exclusive {
            for sibling in self.siblings(id) {
                let uncheck = matches!(&self.controls[sibling].kind, ControlKind::Checked(s) if s.exclusive_selection)
                    && self.controls[sibling].is_checked;
                if uncheck {
                    self.set_checked(sibling, false)?;
                }
            }
        }

        self.fire(id, EventKind::ValueChanged);
        self.fire(id, if checked { EventKind::Checked } else { EventKind::Unchecked });
        Ok(())
    }

    pub fn toggle_checked(&mut self, id: ControlId) -> Result<()> {
        let checked = self.is_checked(id)?;
        self.set_checked(id, !checked)
    }

    /// The paragraph showing a button's or checkbox's text.
    pub fn checked_label(&self, id: ControlId) -> Result<Option<ControlId>> {
        Ok(self.checked_state(id)?.label)
    }

    /// Controls sharing the same parent list as `id`, excluding it.
    fn siblings(&self, id: ControlId) -> Vec<ControlId> {
        let Some(parent) = self.controls.get(id).and_then(|c| c.parent) else { return Vec::new() };
        let p = &self.controls[parent];
        p.lists_in_draw_order()
            .into_iter()
            .find(|list| list.contains(&id))
            .map(|list| list.iter().copied().filter(|&c| c != id).collect())
            .unwrap_or_default()
    }
}
