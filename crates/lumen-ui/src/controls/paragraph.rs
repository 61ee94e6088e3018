use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use lumen_engine::paint::Color;
use lumen_engine::render::{Renderer, TextParams};

use crate::control::{Control, ControlId};
use crate::controls::ControlKind;
use crate::error::{Result, UiError};
use crate::measure::Sides;
use crate::style::{props, ControlState, StyleSheet, StyleSheetState, SystemStyleSheet, TextAlignment};
use crate::system::UiSystem;

// ── text style ────────────────────────────────────────────────────────────

/// Text properties resolved from a stylesheet for one state.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub effect: Option<String>,
    pub font_id: String,
    pub font_size: f32,
    pub fill: Color,
    pub outline: Color,
    pub outline_width: i32,
    pub spacing: f32,
    pub alignment: TextAlignment,
}

impl TextStyle {
    pub fn resolve(
        sheet: &StyleSheet,
        state: ControlState,
        overrides: Option<&StyleSheetState>,
        system: &SystemStyleSheet,
    ) -> Self {
        Self {
            effect: sheet.resolve(&props::EFFECT_IDENTIFIER, state, overrides).map(|(e, _)| e.clone()),
            font_id: sheet.get_property(&props::FONT_IDENTIFIER, state, system.default_font.clone(), overrides),
            font_size: sheet.get_property(&props::FONT_SIZE, state, system.default_font_size, overrides) as f32,
            fill: sheet.get_property(&props::TEXT_FILL_COLOR, state, Color::WHITE, overrides),
            outline: sheet.get_property(&props::TEXT_OUTLINE_COLOR, state, Color::TRANSPARENT, overrides),
            outline_width: sheet.get_property(&props::TEXT_OUTLINE_WIDTH, state, 0, overrides),
            spacing: sheet.get_property(&props::TEXT_SPACING, state, 0.0, overrides),
            alignment: sheet.get_property(&props::TEXT_ALIGNMENT, state, TextAlignment::Left, overrides),
        }
    }

    pub fn params(&self) -> TextParams<'_> {
        TextParams {
            font_id: &self.font_id,
            font_size: self.font_size,
            fill: self.fill,
            outline: self.outline,
            outline_width: self.outline_width,
            spacing: self.spacing,
        }
    }

    pub fn line_height(&self, renderer: &dyn Renderer) -> i32 {
        renderer.text_line_height(&self.font_id, self.font_size)
    }

    pub fn width(&self, renderer: &dyn Renderer, text: &str) -> i32 {
        renderer.measure_text(text, &self.font_id, self.font_size, self.spacing).x
    }

    /// X where a line of `width` starts inside `area`.
    pub fn line_x(&self, area: Rect, width: i32) -> i32 {
        match self.alignment {
            TextAlignment::Left => area.left(),
            TextAlignment::Center => area.left() + (area.width - width) / 2,
            TextAlignment::Right => area.right() - width,
        }
    }
}

/// Greedy word wrap. Explicit newlines always break; a word wider than
/// `max_width` gets a line of its own.
pub fn wrap_text(renderer: &dyn Renderer, style: &TextStyle, text: &str, max_width: i32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        for word in raw.split(' ') {
            let candidate = if current.is_empty() { word.to_string() } else { format!("{current} {word}") };
            if current.is_empty() || style.width(renderer, &candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }
    lines
}

/// Draws `lines` top-down from `area`'s top edge, aligned per the style.
pub fn draw_lines(renderer: &mut dyn Renderer, style: &TextStyle, lines: &[String], area: Rect) {
    let line_height = style.line_height(renderer);
    let params = style.params();
    for (i, line) in lines.iter().enumerate() {
        let x = style.line_x(area, style.width(renderer, line));
        let y = area.top() + i as i32 * line_height;
        renderer.draw_text(style.effect.as_deref(), line, Point::new(x, y), &params);
    }
}

// ── paragraph ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphState {
    pub(crate) text: String,
    pub word_wrap: bool,
}

/// Builder for text blocks. `title` and `label` only pick a different
/// default stylesheet.
pub struct Paragraph {
    text: String,
    sheet_name: &'static str,
    word_wrap: bool,
    auto_width: bool,
    style_sheet: Option<Rc<StyleSheet>>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), sheet_name: "Paragraph", word_wrap: true, auto_width: false, style_sheet: None }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self { sheet_name: "Title", ..Self::new(text) }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self { sheet_name: "Label", ..Self::new(text) }
    }

    pub fn word_wrap(mut self, v: bool) -> Self { self.word_wrap = v; self }
    /// Shrink-wrap the width to the longest line.
    pub fn auto_width(mut self, v: bool) -> Self { self.auto_width = v; self }
    pub fn style_sheet(mut self, v: Rc<StyleSheet>) -> Self { self.style_sheet = Some(v); self }

    pub fn build(self, sys: &mut UiSystem) -> ControlId {
        let sheet = self.style_sheet.unwrap_or_else(|| sys.default_style_sheet(self.sheet_name));
        let mut c = Control::new(ControlKind::Paragraph(ParagraphState { text: self.text, word_wrap: self.word_wrap }), sheet);
        c.auto_height = true;
        c.auto_width = self.auto_width;
        sys.insert(c)
    }
}

fn text_style(sys: &UiSystem, c: &Control, state: ControlState) -> TextStyle {
    TextStyle::resolve(&c.style_sheet, state, Some(&c.override_styles), &sys.system_style_sheet)
}

fn paragraph_lines(renderer: &dyn Renderer, style: &TextStyle, p: &ParagraphState, max_width: i32) -> Vec<String> {
    if p.word_wrap {
        wrap_text(renderer, style, &p.text, max_width)
    } else if p.text.is_empty() {
        Vec::new()
    } else {
        p.text.split('\n').map(str::to_string).collect()
    }
}

pub(crate) fn adjust_size(
    sys: &mut UiSystem,
    id: ControlId,
    renderer: &dyn Renderer,
    state: ControlState,
    padding: Sides,
    size: &mut Point,
) {
    let c = &sys.controls[id];
    let ControlKind::Paragraph(p) = &c.kind else { return };
    if !c.auto_width && !c.auto_height {
        return;
    }
    let style = text_style(sys, c, state);
    let max_width = if c.auto_width { i32::MAX } else { size.x - padding.h() };
    let lines = paragraph_lines(renderer, &style, p, max_width);
    if c.auto_width {
        size.x = lines.iter().map(|l| style.width(renderer, l)).max().unwrap_or(0) + padding.h();
    }
    if c.auto_height {
        size.y = lines.len() as i32 * style.line_height(renderer) + padding.v();
    }
}

pub(crate) fn draw(sys: &mut UiSystem, id: ControlId, renderer: &mut dyn Renderer, state: ControlState) {
    let c = &sys.controls[id];
    let ControlKind::Paragraph(p) = &c.kind else { return };
    let area = c.last_internal_bounding_rect;
    let style = text_style(sys, c, state);
    let lines = paragraph_lines(renderer, &style, p, area.width);
    draw_lines(renderer, &style, &lines, area);
}

impl UiSystem {
    pub fn paragraph_text(&self, id: ControlId) -> Result<&str> {
        match &self.control(id)?.kind {
            ControlKind::Paragraph(p) => Ok(&p.text),
            _ => Err(UiError::WrongControlKind { control: id, expected: "Paragraph" }),
        }
    }

    pub fn set_paragraph_text(&mut self, id: ControlId, text: impl Into<String>) -> Result<()> {
        match &mut self.control_mut(id)?.kind {
            ControlKind::Paragraph(p) => {
                p.text = text.into();
                Ok(())
            }
            _ => Err(UiError::WrongControlKind { control: id, expected: "Paragraph" }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::Anchor;
    use crate::measure::MeasureVector;
    use crate::test_support::{renderer, system};

    fn style(size: f32) -> TextStyle {
        let mut sheet = StyleSheet::default();
        sheet.set_property(&props::FONT_SIZE, ControlState::Default, Some(size as i32));
        TextStyle::resolve(&sheet, ControlState::Default, None, &SystemStyleSheet::default())
    }

    #[test]
    fn wraps_on_word_boundaries() {
        let dl = renderer();
        // Fallback metrics: 5px per char at size 10.
        let lines = wrap_text(&dl, &style(10.0), "hello world foo", 60);
        assert_eq!(lines, vec!["hello world", "foo"]);
    }

    #[test]
    fn newlines_and_long_words() {
        let dl = renderer();
        let lines = wrap_text(&dl, &style(10.0), "a\nsupercalifragilistic b", 30);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
        assert!(wrap_text(&dl, &style(10.0), "", 30).is_empty());
    }

    #[test]
    fn alignment_positions_lines() {
        let mut s = style(10.0);
        let area = Rect::new(10, 0, 100, 20);
        assert_eq!(s.line_x(area, 40), 10);
        s.alignment = TextAlignment::Center;
        assert_eq!(s.line_x(area, 40), 40);
        s.alignment = TextAlignment::Right;
        assert_eq!(s.line_x(area, 40), 70);
    }

    #[test]
    fn auto_height_follows_wrapped_lines() {
        let mut sys = system();
        let mut dl = renderer();
        let root = sys.root();
        let mut sheet = StyleSheet::default();
        sheet.set_property(&props::FONT_SIZE, ControlState::Default, Some(10));
        let p = Paragraph::new("hello world foo").style_sheet(Rc::new(sheet)).build(&mut sys);
        {
            let c = sys.control_mut(p).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(60.0, 0.0);
        }
        sys.add_child(root, p).unwrap();

        sys.draw(&mut dl);
        assert_eq!(sys.control(p).unwrap().last_bounding_rect(), Rect::new(0, 0, 60, 20));
        assert_eq!(dl.texts().collect::<Vec<_>>(), vec!["hello world", "foo"]);
    }

    #[test]
    fn text_accessors_check_kind() {
        let mut sys = system();
        let p = Paragraph::label("hi").build(&mut sys);
        sys.set_paragraph_text(p, "bye").unwrap();
        assert_eq!(sys.paragraph_text(p).unwrap(), "bye");
        let root = sys.root();
        assert!(matches!(sys.paragraph_text(root), Err(UiError::WrongControlKind { .. })));
    }
}
