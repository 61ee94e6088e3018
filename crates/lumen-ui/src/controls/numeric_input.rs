use std::rc::Rc;

use crate::control::{Anchor, Control, ControlId, EventKind, OverflowMode};
use crate::controls::{Button, ControlKind, TextInputState};
use crate::error::{Result, UiError};
use crate::measure::{MeasureVector, Measurement};
use crate::style::StyleSheet;
use crate::system::UiSystem;

/// Width of each stepper button.
const BUTTON_WIDTH: f32 = 30.0;

/// A text input that only holds a number.
///
/// Typing is filtered as it happens: foreign characters and a second sign or
/// decimal point are rejected, leading zeros are trimmed and values above the
/// max are clamped. The min is only enforced when the input loses focus,
/// otherwise typing "15" with a min of 10 could never get past the "1".
#[derive(Debug, Clone, Default)]
pub struct NumericInputState {
    pub(crate) input: TextInputState,
    pub(crate) min_value: Option<f64>,
    pub(crate) max_value: Option<f64>,
    pub accepts_decimal: bool,
    /// Amount added or removed by the stepper buttons.
    pub step: f64,
    pub(crate) buttons: Option<(ControlId, ControlId)>,
}

impl NumericInputState {
    pub fn min_value(&self) -> Option<f64> { self.min_value }
    pub fn max_value(&self) -> Option<f64> { self.max_value }
    pub fn input(&self) -> &TextInputState { &self.input }

    /// (minus, plus) stepper buttons, if any.
    pub fn buttons(&self) -> Option<(ControlId, ControlId)> {
        self.buttons
    }

    pub(crate) fn rules(&self) -> NumericRules {
        NumericRules {
            accepts_decimal: self.accepts_decimal,
            allows_negative: self.min_value.is_none_or(|min| min < 0.0),
            max_value: self.max_value,
        }
    }

    fn clamp(&self, value: f64) -> f64 {
        let value = match self.max_value {
            Some(max) => value.min(max),
            None => value,
        };
        match self.min_value {
            Some(min) => value.max(min),
            None => value,
        }
    }

    fn format(&self, value: f64) -> String {
        format_value(value, self.accepts_decimal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct NumericRules {
    pub accepts_decimal: bool,
    pub allows_negative: bool,
    pub max_value: Option<f64>,
}

/// Parses the text, treating partial input ("", "-", ".") as no value.
pub fn parse_value(text: &str) -> Option<f64> {
    match text {
        "" | "-" | "." | "-." => None,
        t => t.parse().ok(),
    }
}

fn format_value(value: f64, accepts_decimal: bool) -> String {
    if accepts_decimal {
        format!("{value}")
    } else {
        format!("{}", value.round() as i64)
    }
}

/// Validates and normalizes a candidate value; `None` rejects the edit.
pub(crate) fn filter(candidate: &str, rules: &NumericRules) -> Option<String> {
    let (sign, digits) = match candidate.strip_prefix('-') {
        Some(rest) if rules.allows_negative => ("-", rest),
        Some(_) => return None,
        None => ("", candidate),
    };

    let mut seen_point = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {}
            '.' if rules.accepts_decimal && !seen_point => seen_point = true,
            _ => return None,
        }
    }

    // Keep one zero before a point or when the number is zero.
    let trimmed = digits.trim_start_matches('0');
    let digits = if trimmed.len() == digits.len() {
        digits
    } else if trimmed.is_empty() || trimmed.starts_with('.') {
        &digits[digits.len() - trimmed.len() - 1..]
    } else {
        trimmed
    };
    let normalized = format!("{sign}{digits}");

    // More digits only push a negative value further down, so it can still
    // reach the range; those are corrected on unfocus instead.
    if let (Some(max), Some(value)) = (rules.max_value, parse_value(&normalized))
        && value > max
        && value >= 0.0
    {
        return Some(format_value(max, rules.accepts_decimal));
    }
    Some(normalized)
}

// ── builder ───────────────────────────────────────────────────────────────

pub struct NumericInput {
    state: NumericInputState,
    value: Option<f64>,
    with_buttons: bool,
    style_sheet: Option<Rc<StyleSheet>>,
    button_style_sheet: Option<Rc<StyleSheet>>,
}

impl NumericInput {
    pub fn new() -> Self {
        Self {
            state: NumericInputState { step: 1.0, ..Default::default() },
            value: None,
            with_buttons: false,
            style_sheet: None,
            button_style_sheet: None,
        }
    }

    pub fn min(mut self, v: f64) -> Self { self.state.min_value = Some(v); self }
    pub fn max(mut self, v: f64) -> Self { self.state.max_value = Some(v); self }
    pub fn accepts_decimal(mut self, v: bool) -> Self { self.state.accepts_decimal = v; self }
    pub fn step(mut self, v: f64) -> Self { self.state.step = v; self }
    pub fn value(mut self, v: f64) -> Self { self.value = Some(v); self }
    pub fn placeholder(mut self, v: impl Into<String>) -> Self { self.state.input.placeholder = v.into(); self }
    pub fn buttons(mut self, v: bool) -> Self { self.with_buttons = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }
    pub fn button_style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.button_style_sheet = Some(v); self }

    /// Fails with `InvalidRange` when min > max.
    pub fn build(mut self, sys: &mut UiSystem) -> Result<ControlId> {
        if let (Some(min), Some(max)) = (self.state.min_value, self.state.max_value)
            && min > max
        {
            return Err(UiError::InvalidRange { control: ControlId::default(), min: min as i64, max: max as i64 });
        }
        if let Some(value) = self.value {
            self.state.input.value = self.state.format(self.state.clamp(value));
            self.state.input.caret = self.state.input.value.chars().count();
        }

        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet("NumericInput"));
        let mut c = Control::new(ControlKind::NumericInput(self.state), sheet);
        c.overflow_mode = OverflowMode::HideOverflow;
        let id = sys.insert(c);

        if self.with_buttons {
            let sheet = self.button_style_sheet.unwrap_or_else(|| sys.default_style_sheet("NumericInputButton"));
            let plus = stepper_button(sys, id, "+", 1.0, 0.0, sheet.clone());
            let minus = stepper_button(sys, id, "-", -1.0, BUTTON_WIDTH, sheet);
            if let (Some(minus), Some(plus)) = (minus, plus)
                && let ControlKind::NumericInput(n) = &mut sys.controls[id].kind
            {
                n.buttons = Some((minus, plus));
            }
        }
        Ok(id)
    }
}

impl Default for NumericInput {
    fn default() -> Self {
        Self::new()
    }
}

fn stepper_button(
    sys: &mut UiSystem,
    owner: ControlId,
    text: &str,
    direction: f64,
    offset_x: f32,
    sheet: Rc<StyleSheet>,
) -> Option<ControlId> {
    let button = Button::new(text).style_sheet(sheet.clone()).build(sys);
    let c = &mut sys.controls[button];
    c.anchor = Anchor::CenterRight;
    c.offset = MeasureVector::pixels(offset_x, 0.0);
    if sheet.default_width.is_none() && sheet.default_height.is_none() {
        c.size = MeasureVector::new(Measurement::pixels(BUTTON_WIDTH), Measurement::percent(100.0));
    }
    c.events.set(EventKind::Click, move |sys, _| {
        if let Err(e) = sys.step_numeric_value(owner, direction) {
            log::warn!("numeric stepper for {owner:?}: {e}");
        }
    });

    match sys.add_internal_child(owner, button, true) {
        Ok(()) => Some(button),
        Err(e) => {
            log::warn!("numeric stepper for {owner:?}: {e}");
            None
        }
    }
}

// ── hooks ─────────────────────────────────────────────────────────────────

/// Applies the min/max once editing is over; partial input is cleared.
pub(crate) fn clamp_to_range(sys: &mut UiSystem, id: ControlId) {
    let Some(ControlKind::NumericInput(n)) = sys.controls.get_mut(id).map(|c| &mut c.kind) else { return };
    let fixed = match parse_value(&n.input.value) {
        Some(value) => {
            let clamped = n.clamp(value);
            if clamped == value { return }
            n.format(clamped)
        }
        None if n.input.value.is_empty() => return,
        None => String::new(),
    };
    log::debug!("numeric input {id:?}: '{}' corrected to '{fixed}'", n.input.value);
    n.input.caret = fixed.chars().count();
    n.input.value = fixed;
    sys.fire(id, EventKind::ValueChanged);
}

// ── value API ─────────────────────────────────────────────────────────────

impl UiSystem {
    fn numeric_state(&self, id: ControlId) -> Result<&NumericInputState> {
        match &self.control(id)?.kind {
            ControlKind::NumericInput(n) => Ok(n),
            _ => Err(UiError::WrongControlKind { control: id, expected: "NumericInput" }),
        }
    }

    /// The current number, or `None` while the text is empty or partial.
    pub fn numeric_value(&self, id: ControlId) -> Result<Option<f64>> {
        Ok(parse_value(&self.numeric_state(id)?.input.value))
    }

    /// Sets the number, clamped into [min, max].
    pub fn set_numeric_value(&mut self, id: ControlId, value: f64) -> Result<()> {
        let ControlKind::NumericInput(n) = &mut self.control_mut(id)?.kind else {
            return Err(UiError::WrongControlKind { control: id, expected: "NumericInput" });
        };
        let text = n.format(n.clamp(value));
        if n.input.value == text {
            return Ok(());
        }
        n.input.caret = text.chars().count();
        n.input.value = text;
        self.fire(id, EventKind::ValueChanged);
        Ok(())
    }

    /// Adds `direction * step`; empty input counts as zero.
    pub fn step_numeric_value(&mut self, id: ControlId, direction: f64) -> Result<()> {
        let n = self.numeric_state(id)?;
        let current = parse_value(&n.input.value).unwrap_or(0.0);
        let next = current + direction * n.step;
        self.set_numeric_value(id, next)
    }

    pub fn set_numeric_range(&mut self, id: ControlId, min: Option<f64>, max: Option<f64>) -> Result<()> {
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err(UiError::InvalidRange { control: id, min: lo as i64, max: hi as i64 });
        }
        let ControlKind::NumericInput(n) = &mut self.control_mut(id)?.kind else {
            return Err(UiError::WrongControlKind { control: id, expected: "NumericInput" });
        };
        n.min_value = min;
        n.max_value = max;
        clamp_to_range(self, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;

    fn rules(accepts_decimal: bool, allows_negative: bool, max_value: Option<f64>) -> NumericRules {
        NumericRules { accepts_decimal, allows_negative, max_value }
    }

    #[test]
    fn filter_rejects_foreign_characters() {
        let r = rules(false, true, None);
        assert_eq!(filter("12a", &r), None);
        assert_eq!(filter("1.5", &r), None);
        assert_eq!(filter("--1", &r), None);
        assert_eq!(filter("1-", &r), None);
        assert_eq!(filter("-12", &r), Some("-12".to_string()));
    }

    #[test]
    fn filter_decimal_point_once() {
        let r = rules(true, true, None);
        assert_eq!(filter("1.5", &r), Some("1.5".to_string()));
        assert_eq!(filter("1.5.", &r), None);
        assert_eq!(filter(".", &r), Some(".".to_string()));
    }

    #[test]
    fn filter_trims_leading_zeros() {
        let r = rules(true, true, None);
        assert_eq!(filter("007", &r), Some("7".to_string()));
        assert_eq!(filter("-007", &r), Some("-7".to_string()));
        assert_eq!(filter("00.5", &r), Some("0.5".to_string()));
        assert_eq!(filter("00", &r), Some("0".to_string()));
        assert_eq!(filter("0", &r), Some("0".to_string()));
    }

    #[test]
    fn filter_negative_sign_needs_negative_min() {
        assert_eq!(filter("-1", &rules(false, false, None)), None);
    }

    #[test]
    fn filter_clamps_to_max_while_typing() {
        let r = rules(false, true, Some(50.0));
        assert_eq!(filter("49", &r), Some("49".to_string()));
        assert_eq!(filter("490", &r), Some("50".to_string()));
    }

    #[test]
    fn filter_lets_negative_values_grow_below_negative_max() {
        let r = rules(false, true, Some(-5.0));
        assert_eq!(filter("-1", &r), Some("-1".to_string()));
        assert_eq!(filter("-10", &r), Some("-10".to_string()));
        assert_eq!(filter("3", &r), Some("-5".to_string()));
    }

    #[test]
    fn builder_rejects_inverted_range() {
        let mut h = Harness::new();
        assert!(matches!(
            NumericInput::new().min(5.0).max(1.0).build(&mut h.sys),
            Err(UiError::InvalidRange { .. })
        ));
    }

    #[test]
    fn typing_then_unfocus_clamps_to_min() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let input = NumericInput::new().min(10.0).max(99.0).build(&mut h.sys).unwrap();
        h.sys.control_mut(input).unwrap().anchor = Anchor::TopLeft;
        h.sys.add_child(root, input).unwrap();
        h.frame();

        h.click_at(10, 10);
        h.type_text("0x5");
        assert_eq!(h.sys.numeric_value(input).unwrap(), Some(5.0));

        h.click_at(700, 500);
        assert_eq!(h.sys.numeric_value(input).unwrap(), Some(10.0));
    }

    #[test]
    fn stepper_buttons_change_value() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let input = NumericInput::new().max(6.0).value(5.0).buttons(true).build(&mut h.sys).unwrap();
        {
            let c = h.sys.control_mut(input).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(200.0, 40.0);
        }
        h.sys.add_child(root, input).unwrap();
        h.frame();

        // plus sits at the right edge, minus just left of it
        h.click_at(185, 20);
        assert_eq!(h.sys.numeric_value(input).unwrap(), Some(6.0));
        h.click_at(185, 20);
        assert_eq!(h.sys.numeric_value(input).unwrap(), Some(6.0));
        h.click_at(155, 20);
        assert_eq!(h.sys.numeric_value(input).unwrap(), Some(5.0));
    }

    #[test]
    fn set_value_formats_and_clamps() {
        let mut h = Harness::new();
        let int = NumericInput::new().max(10.0).build(&mut h.sys).unwrap();
        h.sys.set_numeric_value(int, 3.6).unwrap();
        assert_eq!(h.sys.text_input_value(int).unwrap(), "4");
        h.sys.set_numeric_value(int, 42.0).unwrap();
        assert_eq!(h.sys.text_input_value(int).unwrap(), "10");

        let dec = NumericInput::new().accepts_decimal(true).build(&mut h.sys).unwrap();
        h.sys.set_numeric_value(dec, 2.5).unwrap();
        assert_eq!(h.sys.numeric_value(dec).unwrap(), Some(2.5));
    }
}
