use lumen_engine::coords::Point;
use lumen_engine::paint::Color;

use crate::error::{Result, UiError};
use crate::measure::{Measurement, Sides};

use super::state::ControlState;
use super::textures::{FramedTexture, IconTexture, StretchedTexture, TextAlignment};

// ── StyleSheetState ───────────────────────────────────────────────────────

/// Property bag for one visual state. Unset properties fall through the
/// cascade (see [`StyleSheet::get_property`]).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheetState {
    pub effect_identifier: Option<String>,
    pub fill_texture_stretched: Option<StretchedTexture>,
    pub fill_texture_framed: Option<FramedTexture>,
    pub icon: Option<IconTexture>,
    pub fill_color: Option<Color>,
    pub tint_color: Option<Color>,
    pub text_alignment: Option<TextAlignment>,
    pub font_identifier: Option<String>,
    pub font_size: Option<i32>,
    pub text_fill_color: Option<Color>,
    pub text_outline_color: Option<Color>,
    pub text_outline_width: Option<i32>,
    pub text_spacing: Option<f32>,
    pub padding: Option<Sides>,
    /// Grows the bounding rect after position and size are resolved.
    pub extra_size: Option<Sides>,
    /// Space before this control in auto-anchor flow.
    pub margin_before: Option<Point>,
    /// Space after this control in auto-anchor flow.
    pub margin_after: Option<Point>,
}

impl StyleSheetState {
    pub const EMPTY: StyleSheetState = StyleSheetState {
        effect_identifier: None,
        fill_texture_stretched: None,
        fill_texture_framed: None,
        icon: None,
        fill_color: None,
        tint_color: None,
        text_alignment: None,
        font_identifier: None,
        font_size: None,
        text_fill_color: None,
        text_outline_color: None,
        text_outline_width: None,
        text_spacing: None,
        padding: None,
        extra_size: None,
        margin_before: None,
        margin_after: None,
    };

    #[inline]
    pub fn get<T>(&self, prop: &StyleProperty<T>) -> Option<&T> {
        (prop.get)(self)
    }

    #[inline]
    pub fn set<T>(&mut self, prop: &StyleProperty<T>, value: Option<T>) {
        *(prop.slot)(self) = value;
    }
}

static EMPTY_STATE: StyleSheetState = StyleSheetState::EMPTY;

// ── StyleProperty ─────────────────────────────────────────────────────────

/// Typed accessor for one field of [`StyleSheetState`].
pub struct StyleProperty<T: 'static> {
    pub name: &'static str,
    get: fn(&StyleSheetState) -> Option<&T>,
    slot: fn(&mut StyleSheetState) -> &mut Option<T>,
}

macro_rules! style_properties {
    ($($konst:ident: $ty:ty => $field:ident),* $(,)?) => {
        $(
            pub const $konst: StyleProperty<$ty> = {
                fn get(s: &StyleSheetState) -> Option<&$ty> {
                    s.$field.as_ref()
                }
                fn slot(s: &mut StyleSheetState) -> &mut Option<$ty> {
                    &mut s.$field
                }
                StyleProperty { name: stringify!($field), get, slot }
            };
        )*
    };
}

/// Accessor table for every per-state property.
pub mod props {
    use super::*;

    style_properties! {
        EFFECT_IDENTIFIER: String => effect_identifier,
        FILL_TEXTURE_STRETCHED: StretchedTexture => fill_texture_stretched,
        FILL_TEXTURE_FRAMED: FramedTexture => fill_texture_framed,
        ICON: IconTexture => icon,
        FILL_COLOR: Color => fill_color,
        TINT_COLOR: Color => tint_color,
        TEXT_ALIGNMENT: TextAlignment => text_alignment,
        FONT_IDENTIFIER: String => font_identifier,
        FONT_SIZE: i32 => font_size,
        TEXT_FILL_COLOR: Color => text_fill_color,
        TEXT_OUTLINE_COLOR: Color => text_outline_color,
        TEXT_OUTLINE_WIDTH: i32 => text_outline_width,
        TEXT_SPACING: f32 => text_spacing,
        PADDING: Sides => padding,
        EXTRA_SIZE: Sides => extra_size,
        MARGIN_BEFORE: Point => margin_before,
        MARGIN_AFTER: Point => margin_after,
    }
}

// ── StyleSheet ────────────────────────────────────────────────────────────

/// A control type's look: state-independent sizing plus one bag per state.
///
/// Sheets are shared between controls (`Rc<StyleSheet>`); per-instance tweaks
/// go into a control's override bag, or into a deep copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub default_width: Option<Measurement>,
    pub default_height: Option<Measurement>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    /// States cross-fade at this rate (1/seconds). `None` switches instantly.
    pub interpolate_states_speed: Option<f32>,
    /// Moving parts (slider handles) approach their target at this rate.
    pub interpolate_offsets_speed: Option<f32>,

    pub default: Option<StyleSheetState>,
    pub targeted: Option<StyleSheetState>,
    pub interacted: Option<StyleSheetState>,
    pub checked: Option<StyleSheetState>,
    pub targeted_checked: Option<StyleSheetState>,
    pub disabled: Option<StyleSheetState>,
    pub disabled_checked: Option<StyleSheetState>,
}

impl StyleSheet {
    /// Bag for `state`; an empty bag when the state was never authored.
    pub fn get_style(&self, state: ControlState) -> &StyleSheetState {
        self.slot(state).as_ref().unwrap_or(&EMPTY_STATE)
    }

    /// Bag for `state`, created empty on first write.
    pub fn get_style_mut(&mut self, state: ControlState) -> &mut StyleSheetState {
        self.slot_mut(state).get_or_insert_with(StyleSheetState::default)
    }

    fn slot(&self, state: ControlState) -> &Option<StyleSheetState> {
        match state {
            ControlState::Default => &self.default,
            ControlState::Targeted => &self.targeted,
            ControlState::Interacted => &self.interacted,
            ControlState::Checked => &self.checked,
            ControlState::TargetedChecked => &self.targeted_checked,
            ControlState::Disabled => &self.disabled,
            ControlState::DisabledChecked => &self.disabled_checked,
        }
    }

    fn slot_mut(&mut self, state: ControlState) -> &mut Option<StyleSheetState> {
        match state {
            ControlState::Default => &mut self.default,
            ControlState::Targeted => &mut self.targeted,
            ControlState::Interacted => &mut self.interacted,
            ControlState::Checked => &mut self.checked,
            ControlState::TargetedChecked => &mut self.targeted_checked,
            ControlState::Disabled => &mut self.disabled,
            ControlState::DisabledChecked => &mut self.disabled_checked,
        }
    }

    /// Resolves `prop` for `state`: the override bag first, then the state's
    /// fallback chain (ending at `Default`). Returns the value and the state
    /// whose bag supplied it (`None` when it came from the overrides).
    pub fn resolve<'a, T>(
        &'a self,
        prop: &StyleProperty<T>,
        state: ControlState,
        overrides: Option<&'a StyleSheetState>,
    ) -> Option<(&'a T, Option<ControlState>)> {
        if let Some(v) = overrides.and_then(|o| o.get(prop)) {
            return Some((v, None));
        }
        state
            .fallback_chain()
            .iter()
            .find_map(|&s| self.get_style(s).get(prop).map(|v| (v, Some(s))))
    }

    /// Cascading lookup with a caller-supplied default. Never fails.
    pub fn get_property<T: Clone>(
        &self,
        prop: &StyleProperty<T>,
        state: ControlState,
        default: T,
        overrides: Option<&StyleSheetState>,
    ) -> T {
        self.resolve(prop, state, overrides)
            .map(|(v, _)| v.clone())
            .unwrap_or(default)
    }

    /// Cascading lookup that reports which property and state came up empty.
    pub fn try_get_property<T: Clone>(
        &self,
        prop: &StyleProperty<T>,
        state: ControlState,
        overrides: Option<&StyleSheetState>,
    ) -> Result<T> {
        self.resolve(prop, state, overrides)
            .map(|(v, _)| v.clone())
            .ok_or(UiError::MissingStyleProperty { property: prop.name, state })
    }

    /// Explicit setter; creates the state's bag if needed.
    pub fn set_property<T>(&mut self, prop: &StyleProperty<T>, state: ControlState, value: Option<T>) {
        self.get_style_mut(state).set(prop, value);
    }
}
