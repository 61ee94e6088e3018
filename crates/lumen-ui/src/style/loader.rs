use std::path::{Path, PathBuf};

use lumen_engine::coords::{Point, Rect};
use lumen_engine::paint::Color;
use serde::Deserialize;

use crate::error::{Result, UiError};
use crate::measure::{Measurement, Sides};

use super::sheet::{StyleSheet, StyleSheetState};
use super::state::ControlState;
use super::textures::{FramedTexture, IconTexture, StretchedTexture, TextAlignment};

// ── loader contract ───────────────────────────────────────────────────────

/// Loads stylesheets by identifier (a path relative to some theme root).
pub trait StyleSheetLoader {
    fn load_style_sheet(&self, identifier: &str) -> Result<StyleSheet>;
}

/// Reads JSON stylesheets from a theme folder.
#[derive(Debug, Clone)]
pub struct FileStyleSheetLoader {
    root: PathBuf,
}

impl FileStyleSheetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StyleSheetLoader for FileStyleSheetLoader {
    fn load_style_sheet(&self, identifier: &str) -> Result<StyleSheet> {
        let path = self.root.join(identifier);
        let text = std::fs::read_to_string(&path).map_err(|e| UiError::StyleSheetLoad {
            resource: path.display().to_string(),
            message: e.to_string(),
        })?;
        log::debug!("loading stylesheet '{}'", path.display());
        StyleSheet::from_json_str(&text, identifier)
    }
}

impl StyleSheet {
    /// Parses a JSON stylesheet. `resource` names it in error messages.
    pub fn from_json_str(text: &str, resource: &str) -> Result<StyleSheet> {
        let raw: RawStyleSheet = serde_json::from_str(text).map_err(|e| UiError::StyleSheetLoad {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        raw.convert(resource)
    }
}

// ── raw file shapes ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMeasure {
    Number(f32),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawColor {
    Hex(String),
    Channels([u8; 4]),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSides {
    All(i32),
    Each {
        #[serde(default)]
        left: i32,
        #[serde(default)]
        right: i32,
        #[serde(default)]
        top: i32,
        #[serde(default)]
        bottom: i32,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStretched {
    texture_id: String,
    source_rect: [i32; 4],
    #[serde(default)]
    extra_size: Option<RawSides>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFramed {
    texture_id: String,
    internal_source_rect: [i32; 4],
    external_source_rect: [i32; 4],
    #[serde(default = "one")]
    texture_scale: f32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIcon {
    texture_id: String,
    source_rect: [i32; 4],
    #[serde(default = "one")]
    texture_scale: f32,
    #[serde(default)]
    center_horizontally: bool,
    #[serde(default = "yes")]
    center_vertically: bool,
}

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawState {
    effect_identifier: Option<String>,
    fill_texture_stretched: Option<RawStretched>,
    fill_texture_framed: Option<RawFramed>,
    icon: Option<RawIcon>,
    fill_color: Option<RawColor>,
    tint_color: Option<RawColor>,
    text_alignment: Option<String>,
    font_identifier: Option<String>,
    font_size: Option<i32>,
    text_fill_color: Option<RawColor>,
    text_outline_color: Option<RawColor>,
    text_outline_width: Option<i32>,
    text_spacing: Option<f32>,
    padding: Option<RawSides>,
    extra_size: Option<RawSides>,
    margin_before: Option<[i32; 2]>,
    margin_after: Option<[i32; 2]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawStyleSheet {
    default_width: Option<RawMeasure>,
    default_height: Option<RawMeasure>,
    min_width: Option<i32>,
    min_height: Option<i32>,
    interpolate_states_speed: Option<f32>,
    interpolate_offsets_speed: Option<f32>,
    default: Option<RawState>,
    targeted: Option<RawState>,
    interacted: Option<RawState>,
    checked: Option<RawState>,
    targeted_checked: Option<RawState>,
    disabled: Option<RawState>,
    disabled_checked: Option<RawState>,
}

// ── conversion ────────────────────────────────────────────────────────────

struct Ctx<'a> {
    resource: &'a str,
    state: Option<ControlState>,
}

impl Ctx<'_> {
    fn err(&self, property: &str, message: impl Into<String>) -> UiError {
        UiError::StyleProperty {
            resource: self.resource.to_string(),
            state: self.state,
            property: property.to_string(),
            message: message.into(),
        }
    }

    fn color(&self, property: &str, raw: Option<RawColor>) -> Result<Option<Color>> {
        match raw {
            None => Ok(None),
            Some(RawColor::Channels([r, g, b, a])) => Ok(Some(Color::new(r, g, b, a))),
            Some(RawColor::Hex(text)) => Color::from_hex(&text)
                .map(Some)
                .map_err(|e| self.err(property, e.to_string())),
        }
    }

    fn measure(&self, property: &str, raw: Option<RawMeasure>) -> Result<Option<Measurement>> {
        match raw {
            None => Ok(None),
            Some(RawMeasure::Number(v)) => Ok(Some(Measurement::pixels(v))),
            Some(RawMeasure::Text(text)) => parse_measurement(&text)
                .map(Some)
                .ok_or_else(|| self.err(property, format!("'{text}' is not a pixel count or percentage"))),
        }
    }

    fn texture_scale(&self, property: &str, scale: f32) -> Result<f32> {
        if scale.is_finite() && scale > 0.0 {
            Ok(scale)
        } else {
            Err(self.err(property, format!("texture_scale must be positive, got {scale}")))
        }
    }

    fn state(&self, raw: Option<RawState>) -> Result<Option<StyleSheetState>> {
        let Some(raw) = raw else { return Ok(None) };

        let text_alignment = match raw.text_alignment.as_deref() {
            None => None,
            Some("left") => Some(TextAlignment::Left),
            Some("center") => Some(TextAlignment::Center),
            Some("right") => Some(TextAlignment::Right),
            Some(other) => {
                return Err(self.err("text_alignment", format!("'{other}' is not one of left, center, right")));
            }
        };

        let fill_texture_stretched = match raw.fill_texture_stretched {
            None => None,
            Some(t) => Some(StretchedTexture {
                texture_id: t.texture_id,
                source_rect: rect(t.source_rect),
                extra_size: t.extra_size.map(sides).unwrap_or_default(),
            }),
        };
        let fill_texture_framed = match raw.fill_texture_framed {
            None => None,
            Some(t) => {
                let internal = rect(t.internal_source_rect);
                let external = rect(t.external_source_rect);
                if external.intersect(internal) != Some(internal) {
                    return Err(self.err("fill_texture_framed", "internal_source_rect must lie inside external_source_rect"));
                }
                Some(FramedTexture {
                    texture_id: t.texture_id,
                    internal_source_rect: internal,
                    external_source_rect: external,
                    texture_scale: self.texture_scale("fill_texture_framed", t.texture_scale)?,
                })
            }
        };
        let icon = match raw.icon {
            None => None,
            Some(t) => Some(IconTexture {
                texture_id: t.texture_id,
                source_rect: rect(t.source_rect),
                texture_scale: self.texture_scale("icon", t.texture_scale)?,
                center_horizontally: t.center_horizontally,
                center_vertically: t.center_vertically,
            }),
        };

        if let Some(size) = raw.font_size
            && size <= 0
        {
            return Err(self.err("font_size", format!("must be positive, got {size}")));
        }

        Ok(Some(StyleSheetState {
            effect_identifier: raw.effect_identifier,
            fill_texture_stretched,
            fill_texture_framed,
            icon,
            fill_color: self.color("fill_color", raw.fill_color)?,
            tint_color: self.color("tint_color", raw.tint_color)?,
            text_alignment,
            font_identifier: raw.font_identifier,
            font_size: raw.font_size,
            text_fill_color: self.color("text_fill_color", raw.text_fill_color)?,
            text_outline_color: self.color("text_outline_color", raw.text_outline_color)?,
            text_outline_width: raw.text_outline_width,
            text_spacing: raw.text_spacing,
            padding: raw.padding.map(sides),
            extra_size: raw.extra_size.map(sides),
            margin_before: raw.margin_before.map(|[x, y]| Point::new(x, y)),
            margin_after: raw.margin_after.map(|[x, y]| Point::new(x, y)),
        }))
    }
}

fn rect([x, y, w, h]: [i32; 4]) -> Rect {
    Rect::new(x, y, w, h)
}

fn sides(raw: RawSides) -> Sides {
    match raw {
        RawSides::All(v) => Sides::all(v),
        RawSides::Each { left, right, top, bottom } => Sides::new(left, right, top, bottom),
    }
}

/// `"120"` → pixels, `"50%"` → percent.
fn parse_measurement(text: &str) -> Option<Measurement> {
    let text = text.trim();
    match text.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok().filter(|v| v.is_finite()).map(Measurement::percent),
        None => text.trim_end_matches("px").parse::<f32>().ok().filter(|v| v.is_finite()).map(Measurement::pixels),
    }
}

impl RawStyleSheet {
    fn convert(self, resource: &str) -> Result<StyleSheet> {
        let sheet_ctx = Ctx { resource, state: None };
        let at = |state| Ctx { resource, state: Some(state) };

        for (name, v) in [("min_width", self.min_width), ("min_height", self.min_height)] {
            if let Some(v) = v
                && v < 0
            {
                return Err(sheet_ctx.err(name, format!("must not be negative, got {v}")));
            }
        }

        Ok(StyleSheet {
            default_width: sheet_ctx.measure("default_width", self.default_width)?,
            default_height: sheet_ctx.measure("default_height", self.default_height)?,
            min_width: self.min_width,
            min_height: self.min_height,
            interpolate_states_speed: self.interpolate_states_speed,
            interpolate_offsets_speed: self.interpolate_offsets_speed,
            default: at(ControlState::Default).state(self.default)?,
            targeted: at(ControlState::Targeted).state(self.targeted)?,
            interacted: at(ControlState::Interacted).state(self.interacted)?,
            checked: at(ControlState::Checked).state(self.checked)?,
            targeted_checked: at(ControlState::TargetedChecked).state(self.targeted_checked)?,
            disabled: at(ControlState::Disabled).state(self.disabled)?,
            disabled_checked: at(ControlState::DisabledChecked).state(self.disabled_checked)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::props;

    #[test]
    fn parses_full_sheet() {
        let json = r##"{
            "default_width": "100%",
            "default_height": 40,
            "min_height": 10,
            "interpolate_states_speed": 8.0,
            "default": {
                "fill_texture_framed": {
                    "texture_id": "ui",
                    "internal_source_rect": [4, 4, 8, 8],
                    "external_source_rect": [0, 0, 16, 16],
                    "texture_scale": 2
                },
                "fill_color": "#10203040",
                "text_alignment": "center",
                "padding": 6,
                "margin_after": [0, 4]
            },
            "interacted": { "fill_color": [1, 2, 3, 4], "padding": { "left": 2 } }
        }"##;
        let sheet = StyleSheet::from_json_str(json, "button.json").unwrap();
        assert_eq!(sheet.default_width, Some(Measurement::percent(100.0)));
        assert_eq!(sheet.default_height, Some(Measurement::pixels(40.0)));
        assert_eq!(sheet.min_height, Some(10));
        let d = sheet.get_style(ControlState::Default);
        assert_eq!(d.fill_color, Some(Color::new(16, 32, 48, 64)));
        assert_eq!(d.text_alignment, Some(TextAlignment::Center));
        assert_eq!(d.padding, Some(Sides::all(6)));
        assert_eq!(d.margin_after, Some(Point::new(0, 4)));
        assert_eq!(d.fill_texture_framed.as_ref().unwrap().texture_scale, 2.0);
        assert_eq!(
            sheet.get_property(&props::PADDING, ControlState::Interacted, Sides::ZERO, None),
            Sides::new(2, 0, 0, 0)
        );
    }

    #[test]
    fn bad_color_names_resource_state_and_property() {
        let json = r##"{ "targeted": { "text_fill_color": "#zzzzzz" } }"##;
        match StyleSheet::from_json_str(json, "paragraph.json").unwrap_err() {
            UiError::StyleProperty { resource, state, property, .. } => {
                assert_eq!(resource, "paragraph.json");
                assert_eq!(state, Some(ControlState::Targeted));
                assert_eq!(property, "text_fill_color");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bad_alignment_is_rejected() {
        let json = r#"{ "default": { "text_alignment": "middle" } }"#;
        assert!(matches!(
            StyleSheet::from_json_str(json, "x.json"),
            Err(UiError::StyleProperty { .. })
        ));
    }

    #[test]
    fn bad_measurement_is_rejected() {
        let json = r#"{ "default_width": "wide" }"#;
        match StyleSheet::from_json_str(json, "x.json").unwrap_err() {
            UiError::StyleProperty { property, state, .. } => {
                assert_eq!(property, "default_width");
                assert_eq!(state, None);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn unknown_field_is_a_load_error() {
        let json = r##"{ "default": { "fil_color": "#ffffff" } }"##;
        assert!(matches!(
            StyleSheet::from_json_str(json, "x.json"),
            Err(UiError::StyleSheetLoad { .. })
        ));
    }

    #[test]
    fn framed_internal_outside_external_is_rejected() {
        let json = r#"{ "default": { "fill_texture_framed": {
            "texture_id": "ui", "internal_source_rect": [20, 20, 8, 8], "external_source_rect": [0, 0, 16, 16] } } }"#;
        assert!(StyleSheet::from_json_str(json, "x.json").is_err());
    }

    #[test]
    fn parse_measurement_variants() {
        assert_eq!(parse_measurement("50%"), Some(Measurement::percent(50.0)));
        assert_eq!(parse_measurement("12px"), Some(Measurement::pixels(12.0)));
        assert_eq!(parse_measurement(" 7 "), Some(Measurement::pixels(7.0)));
        assert_eq!(parse_measurement("%"), None);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let loader = FileStyleSheetLoader::new("/definitely/not/here");
        assert!(matches!(
            loader.load_style_sheet("panel.json"),
            Err(UiError::StyleSheetLoad { .. })
        ));
    }
}
