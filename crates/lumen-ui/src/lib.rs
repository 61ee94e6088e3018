//! Lumen UI: a retained control tree with anchor layout, per-state
//! stylesheets and a frame-stepped orchestrator.
//!
//! ```rust,ignore
//! use lumen_ui::prelude::*;
//!
//! let mut ui = UiSystem::init("theme")?;
//! let root = ui.root();
//! let ok = Button::new("OK").build(&mut ui);
//! ui.add_child(root, ok)?;
//!
//! // Each frame:
//! ui.update(&draw_list, raw_input, dt);
//! draw_list.clear();
//! ui.draw(&mut draw_list);
//! ```

pub mod control;
pub mod controls;
pub mod error;
pub mod input;
pub mod measure;
pub mod style;
pub mod system;

#[cfg(test)]
mod test_support;

pub use control::{Anchor, Control, ControlId, DraggableMode, EventKind, OverflowMode};
pub use error::{Result, UiError};
pub use system::UiSystem;

/// Everything needed to build and drive a UI.
pub mod prelude {
    pub use crate::control::{Anchor, Control, ControlId, DraggableMode, DrawMode, EventKind, OverflowMode};
    pub use crate::controls::{
        Button, Checkbox, CheckedControl, ColorPicker, ColorSlider, DropDown, HorizontalLine, ListBox, ListItem,
        NumericInput, Orientation, Panel, Paragraph, ProgressBar, RadioButton, RowsSpacer, Slider, TextInput,
        VerticalLine,
    };
    pub use crate::error::{Result, UiError};
    pub use crate::input::{RawInput, TextCommand};
    pub use crate::measure::{MeasureVector, Measurement, Sides};
    pub use crate::style::{ControlState, StyleSheet, SystemStyleSheet};
    pub use crate::system::UiSystem;

    pub use lumen_engine::coords::{Point, Rect};
    pub use lumen_engine::paint::Color;
    pub use lumen_engine::render::{DrawList, Renderer};
}
