//! Concrete control types.
//!
//! Each control is a [`Control`](crate::Control) whose [`ControlKind`] carries
//! the type-specific state. Builders create and wire the parts; the functions
//! at the bottom of this module dispatch the per-kind hooks the generic tree
//! passes call into.

pub mod checked;
pub mod color_picker;
pub mod drop_down;
pub mod line;
pub mod list_box;
pub mod numeric_input;
pub mod panel;
pub mod paragraph;
pub mod progress_bar;
pub mod slider;
pub mod text_input;

use lumen_engine::coords::Point;
use lumen_engine::render::Renderer;

use crate::control::{ControlId, DrawMode};
use crate::measure::{MeasureVector, Measurement, Sides};
use crate::style::ControlState;
use crate::system::UiSystem;

pub use checked::{Button, CheckedControl, CheckedState, CheckedVariant, Checkbox, RadioButton};
pub use color_picker::{ColorPicker, ColorPickerState, ColorSlider, ColorSliderState};
pub use drop_down::{DropDown, DropDownState};
pub use line::{HorizontalLine, RowsSpacer, VerticalLine};
pub use list_box::{ListBox, ListBoxState, ListItem};
pub use numeric_input::{NumericInput, NumericInputState};
pub use panel::Panel;
pub use paragraph::{Paragraph, ParagraphState, TextStyle};
pub use progress_bar::{ProgressBar, ProgressBarState};
pub use slider::{Orientation, Slider, SliderState};
pub use text_input::{TextInput, TextInputState};

/// Pointer interactions forwarded to the targeted control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    LeftPressed,
    /// Held after a press on the same control.
    LeftDown,
    Click,
    /// Whole notches, positive = away from the user.
    Wheel(i32),
}

/// Type-specific state of a control.
pub enum ControlKind {
    Panel,
    Paragraph(ParagraphState),
    Checked(CheckedState),
    Slider(SliderState),
    ProgressBar(ProgressBarState),
    ListBox(ListBoxState),
    DropDown(DropDownState),
    TextInput(TextInputState),
    NumericInput(NumericInputState),
    ColorSlider(ColorSliderState),
    ColorPicker(ColorPickerState),
    HorizontalLine,
    VerticalLine,
    /// Empty vertical space, in rows.
    RowsSpacer(u32),
}

impl ControlKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ControlKind::Panel => "Panel",
            ControlKind::Paragraph(_) => "Paragraph",
            ControlKind::Checked(s) => s.variant.type_name(),
            ControlKind::Slider(_) => "Slider",
            ControlKind::ProgressBar(_) => "ProgressBar",
            ControlKind::ListBox(_) => "ListBox",
            ControlKind::DropDown(_) => "DropDown",
            ControlKind::TextInput(_) => "TextInput",
            ControlKind::NumericInput(_) => "NumericInput",
            ControlKind::ColorSlider(_) => "ColorSlider",
            ControlKind::ColorPicker(_) => "ColorPicker",
            ControlKind::HorizontalLine => "HorizontalLine",
            ControlKind::VerticalLine => "VerticalLine",
            ControlKind::RowsSpacer(_) => "RowsSpacer",
        }
    }

    /// Size used when the stylesheet has no default width/height.
    pub fn default_size(&self) -> MeasureVector {
        let full = Measurement::percent(100.0);
        let px = Measurement::pixels;
        match self {
            ControlKind::Panel => MeasureVector::pixels(300.0, 200.0),
            ControlKind::Paragraph(_) => MeasureVector::new(full, px(0.0)),
            ControlKind::Checked(s) => match s.variant {
                CheckedVariant::Button => MeasureVector::new(full, px(50.0)),
                _ => MeasureVector::new(full, px(30.0)),
            },
            ControlKind::Slider(s) => match s.orientation {
                Orientation::Horizontal => MeasureVector::new(full, px(20.0)),
                Orientation::Vertical => MeasureVector::new(px(20.0), full),
            },
            ControlKind::ProgressBar(_) => MeasureVector::new(full, px(24.0)),
            ControlKind::ListBox(_) => MeasureVector::new(full, px(200.0)),
            ControlKind::DropDown(_) => MeasureVector::new(full, px(40.0)),
            ControlKind::TextInput(_) | ControlKind::NumericInput(_) => MeasureVector::new(full, px(40.0)),
            ControlKind::ColorSlider(_) => MeasureVector::new(full, px(24.0)),
            ControlKind::ColorPicker(_) => MeasureVector::pixels(200.0, 200.0),
            ControlKind::HorizontalLine => MeasureVector::new(full, px(8.0)),
            ControlKind::VerticalLine => MeasureVector::new(px(8.0), full),
            ControlKind::RowsSpacer(_) => MeasureVector::new(full, px(20.0)),
        }
    }

    /// Whether hit-testing may target this control.
    pub fn interactable(&self) -> bool {
        match self {
            ControlKind::Panel
            | ControlKind::Paragraph(_)
            | ControlKind::HorizontalLine
            | ControlKind::VerticalLine
            | ControlKind::RowsSpacer(_) => false,
            ControlKind::ProgressBar(s) => s.interactive,
            _ => true,
        }
    }

    /// Whether a press focuses this control for text commands.
    pub fn accepts_text(&self) -> bool {
        matches!(self, ControlKind::TextInput(_) | ControlKind::NumericInput(_))
    }

    pub(crate) fn slider(&self) -> Option<&SliderState> {
        match self {
            ControlKind::Slider(s) => Some(s),
            ControlKind::ProgressBar(p) => Some(&p.slider),
            ControlKind::ColorSlider(c) => Some(&c.slider),
            _ => None,
        }
    }

    pub(crate) fn slider_mut(&mut self) -> Option<&mut SliderState> {
        match self {
            ControlKind::Slider(s) => Some(s),
            ControlKind::ProgressBar(p) => Some(&mut p.slider),
            ControlKind::ColorSlider(c) => Some(&mut c.slider),
            _ => None,
        }
    }

    pub(crate) fn list(&self) -> Option<&ListBoxState> {
        match self {
            ControlKind::ListBox(l) => Some(l),
            ControlKind::DropDown(d) => Some(&d.list),
            _ => None,
        }
    }

    pub(crate) fn list_mut(&mut self) -> Option<&mut ListBoxState> {
        match self {
            ControlKind::ListBox(l) => Some(l),
            ControlKind::DropDown(d) => Some(&mut d.list),
            _ => None,
        }
    }

    pub(crate) fn text_input(&self) -> Option<&TextInputState> {
        match self {
            ControlKind::TextInput(t) => Some(t),
            ControlKind::NumericInput(n) => Some(&n.input),
            _ => None,
        }
    }
}

// ── per-kind hooks ────────────────────────────────────────────────────────

/// Kind-specific sizing, after the generic size and auto-size were resolved.
pub(crate) fn adjust_size(
    sys: &mut UiSystem,
    id: ControlId,
    renderer: &dyn Renderer,
    state: ControlState,
    padding: Sides,
    size: &mut Point,
) {
    match &sys.controls[id].kind {
        ControlKind::Paragraph(_) => paragraph::adjust_size(sys, id, renderer, state, padding, size),
        ControlKind::DropDown(_) => drop_down::adjust_size(sys, id, renderer, padding, size),
        ControlKind::RowsSpacer(rows) => size.y *= *rows as i32,
        _ => {}
    }
}

/// Content drawn on top of the fill layers (text, rows, caret).
pub(crate) fn draw_kind(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer, state: ControlState, mode: DrawMode) {
    match &sys.controls[id].kind {
        ControlKind::Paragraph(_) => paragraph::draw(sys, id, renderer, state),
        ControlKind::ListBox(_) => {
            let area = sys.controls[id].last_internal_bounding_rect;
            list_box::draw_rows(sys, id, renderer, area, mode);
        }
        ControlKind::DropDown(_) => drop_down::draw_header(sys, id, renderer, state),
        ControlKind::TextInput(_) | ControlKind::NumericInput(_) => text_input::draw(sys, id, renderer, state),
        _ => {}
    }
}

/// Returns true when the kind consumed the interaction.
pub(crate) fn interact(sys: &mut UiSystem, id: ControlId, renderer: &dyn Renderer, interaction: Interaction) -> bool {
    let Some(c) = sys.controls.get(id) else { return false };
    match &c.kind {
        ControlKind::Checked(_) => checked::interact(sys, id, interaction),
        ControlKind::Slider(_) | ControlKind::ProgressBar(_) | ControlKind::ColorSlider(_) => {
            slider::interact(sys, id, interaction)
        }
        ControlKind::ListBox(_) => list_box::interact(sys, id, interaction),
        ControlKind::DropDown(_) => drop_down::interact(sys, id, renderer, interaction),
        ControlKind::ColorPicker(_) => color_picker::interact(sys, id, interaction),
        _ => false,
    }
}

/// Per-frame behaviour: handle interpolation, sampling, closing popups.
pub(crate) fn update_kind(sys: &mut UiSystem, id: ControlId, renderer: &dyn Renderer, dt: f32) {
    let Some(c) = sys.controls.get(id) else { return };
    match &c.kind {
        ControlKind::Slider(_) => slider::update(sys, id, dt),
        ControlKind::ProgressBar(_) => progress_bar::update(sys, id, dt),
        ControlKind::ColorSlider(_) => {
            slider::update(sys, id, dt);
            color_picker::update_slider_color(sys, id, renderer);
        }
        ControlKind::ColorPicker(_) => color_picker::update(sys, id, renderer),
        ControlKind::ListBox(_) => list_box::update_hovered(sys, id),
        ControlKind::DropDown(_) => drop_down::update(sys, id),
        _ => {}
    }
}

pub(crate) fn on_unfocused(sys: &mut UiSystem, id: ControlId) {
    if matches!(sys.controls.get(id).map(|c| &c.kind), Some(ControlKind::NumericInput(_))) {
        numeric_input::clamp_to_range(sys, id);
    }
}
