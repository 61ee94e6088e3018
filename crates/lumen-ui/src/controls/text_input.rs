use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::Renderer;

use crate::control::{Control, ControlId, EventKind, OverflowMode};
use crate::controls::numeric_input;
use crate::controls::paragraph::{draw_lines, TextStyle};
use crate::controls::ControlKind;
use crate::error::{Result, UiError};
use crate::input::TextCommand;
use crate::style::{ControlState, StyleSheet};
use crate::system::UiSystem;

/// Caret width in pixels.
const CARET_WIDTH: i32 = 2;

/// Editable text with a caret (a char index into `value`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputState {
    pub(crate) value: String,
    pub placeholder: String,
    pub(crate) caret: usize,
    pub max_length: Option<usize>,
    pub multiline: bool,
}

impl TextInputState {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value.char_indices().nth(char_index).map_or(self.value.len(), |(b, _)| b)
    }

    /// Applies one command. `accept` may veto or normalize the edited value.
    pub fn apply(&mut self, command: TextCommand, accept: &dyn Fn(&str) -> Option<String>) {
        let mut value = self.value.clone();
        let mut caret = self.caret.min(self.char_count());
        let insert = |value: &mut String, caret: &mut usize, c: char| {
            let at = value.char_indices().nth(*caret).map_or(value.len(), |(b, _)| b);
            value.insert(at, c);
            *caret += 1;
        };

        match command {
            TextCommand::Char(c) => {
                let blocked = (c == '\n' && !self.multiline)
                    || (c.is_control() && c != '\n')
                    || self.max_length.is_some_and(|max| self.char_count() >= max);
                if blocked {
                    return;
                }
                insert(&mut value, &mut caret, c);
            }
            TextCommand::BreakLine => {
                if !self.multiline || self.max_length.is_some_and(|max| self.char_count() >= max) {
                    return;
                }
                insert(&mut value, &mut caret, '\n');
            }
            TextCommand::Backspace => {
                if caret == 0 {
                    return;
                }
                let at = self.byte_index(caret - 1);
                value.remove(at);
                caret -= 1;
            }
            TextCommand::Delete => {
                if caret >= self.char_count() {
                    return;
                }
                value.remove(self.byte_index(caret));
            }
            TextCommand::MoveLeft => {
                self.caret = caret.saturating_sub(1);
                return;
            }
            TextCommand::MoveRight => {
                self.caret = (caret + 1).min(self.char_count());
                return;
            }
            TextCommand::MoveHome => {
                self.caret = 0;
                return;
            }
            TextCommand::MoveEnd => {
                self.caret = self.char_count();
                return;
            }
        }

        let Some(accepted) = accept(&value) else { return };
        // Normalization (e.g. trimmed zeros) shortens the text before the caret.
        let removed = value.chars().count().saturating_sub(accepted.chars().count());
        self.caret = caret.saturating_sub(removed).min(accepted.chars().count());
        self.value = accepted;
    }
}

pub struct TextInput {
    state: TextInputState,
    style_sheet: Option<Rc<StyleSheet>>,
}

impl TextInput {
    pub fn new() -> Self {
        Self { state: TextInputState::default(), style_sheet: None }
    }

    pub fn value(mut self, v: impl Into<String>) -> Self {
        self.state.value = v.into();
        self.state.caret = self.state.char_count();
        self
    }

    pub fn placeholder(mut self, v: impl Into<String>) -> Self { self.state.placeholder = v.into(); self }
    pub fn max_length(mut self, v: usize) -> Self { self.state.max_length = Some(v); self }
    pub fn multiline(mut self, v: bool) -> Self { self.state.multiline = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("TextInput"));
        let mut c = Control::new(ControlKind::TextInput(self.state), sheet);
        c.overflow_mode = OverflowMode::HideOverflow;
        sys.insert(c)
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

/// Feeds this frame's text commands to the focused input.
pub(crate) fn apply_commands(sys: &mut UiSystem, id: ControlId, commands: &[TextCommand]) {
    if sys.is_currently_disabled(id) || sys.is_currently_locked(id) {
        return;
    }
    let Some(c) = sys.controls.get_mut(id) else { return };
    let before = match &c.kind {
        ControlKind::TextInput(t) => t.value.clone(),
        ControlKind::NumericInput(n) => n.input.value.clone(),
        _ => return,
    };
    match &mut c.kind {
        ControlKind::TextInput(t) => {
            for &cmd in commands {
                t.apply(cmd, &|v: &str| Some(v.to_string()));
            }
        }
        ControlKind::NumericInput(n) => {
            let rules = n.rules();
            for &cmd in commands {
                n.input.apply(cmd, &|v: &str| numeric_input::filter(v, &rules));
            }
        }
        _ => {}
    }
    let changed = c.kind.text_input().is_some_and(|t| t.value != before);
    if changed {
        sys.fire(id, EventKind::ValueChanged);
    }
}

pub(crate) fn draw(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer, state: ControlState) {
    let focused = sys.focused == Some(id);
    let blink_on = {
        let interval = sys.system_style_sheet.caret_blink_interval;
        interval <= 0.0 || ((sys.time / interval) as i64) % 2 == 0
    };
    let c = &sys.controls[id];
    let Some(t) = c.kind.text_input() else { return };
    let mut style = TextStyle::resolve(&c.style_sheet, state, Some(&c.override_styles), &sys.system_style_sheet);
    let area = c.last_internal_bounding_rect;

    let showing_placeholder = t.value.is_empty();
    let text = if showing_placeholder { &t.placeholder } else { &t.value };
    let lines: Vec<String> = if t.multiline {
        text.split('\n').map(str::to_string).collect()
    } else {
        vec![text.replace('\n', " ")]
    };
    let caret_style = style.clone();
    if showing_placeholder {
        style.fill = style.fill.fade(0.5);
    }
    draw_lines(renderer, &style, &lines, area);

    if focused && blink_on {
        let rect = caret_rect(renderer, &caret_style, t, area);
        renderer.draw_rectangle(rect, caret_style.fill);
    }
}

/// Where the caret sits: after the text before it, on its line.
fn caret_rect(renderer: &dyn Renderer, style: &TextStyle, t: &TextInputState, area: Rect) -> Rect {
    let line_height = style.line_height(renderer);
    let before: String = t.value.chars().take(t.caret).collect();
    let line_index = before.matches('\n').count() as i32;
    let line_start = before.rsplit('\n').next().unwrap_or("");
    let full_line = t.value.split('\n').nth(line_index as usize).unwrap_or("");

    let x = style.line_x(area, style.width(renderer, full_line)) + style.width(renderer, line_start);
    let origin = Point::new(x, area.top() + line_index * line_height);
    Rect::from_origin_size(origin, Point::new(CARET_WIDTH, line_height))
}

// ── text API ──────────────────────────────────────────────────────────────

impl UiSystem {
    pub fn text_input_value(&self, id: ControlId) -> Result<&str> {
        self.control(id)?
            .kind
            .text_input()
            .map(|t| t.value.as_str())
            .ok_or(UiError::WrongControlKind { control: id, expected: "TextInput" })
    }

    /// Replaces the text (truncated to `max_length`) and moves the caret to the end.
    pub fn set_text_input_value(&mut self, id: ControlId, value: impl Into<String>) -> Result<()> {
        let mut value: String = value.into();
        let t = match &mut self.control_mut(id)?.kind {
            ControlKind::TextInput(t) => t,
            _ => return Err(UiError::WrongControlKind { control: id, expected: "TextInput" }),
        };
        if let Some(max) = t.max_length {
            value = value.chars().take(max).collect();
        }
        if !t.multiline {
            value = value.replace('\n', " ");
        }
        if t.value == value {
            return Ok(());
        }
        t.value = value;
        t.caret = t.char_count();
        self.fire(id, EventKind::ValueChanged);
        Ok(())
    }
}
