use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, UiError};

/// Theme-wide settings, read from `system_style.json` in the theme folder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemStyleSheet {
    pub theme_identifier: String,
    /// Seconds a control keeps showing `Interacted` after a press, so quick
    /// clicks still flash the pressed look.
    pub time_to_lock_interactive_state: f32,
    /// Pixels scrolled per wheel notch.
    pub scroll_step: i32,
    /// Raw wheel units per notch.
    pub wheel_notch: i32,
    /// Seconds between caret blinks in text inputs.
    pub caret_blink_interval: f32,
    /// Font used when a stylesheet sets none.
    pub default_font: String,
    pub default_font_size: i32,
    /// Control type name → stylesheet file, relative to the theme folder.
    pub load_default_stylesheets: BTreeMap<String, String>,
}

impl Default for SystemStyleSheet {
    fn default() -> Self {
        Self {
            theme_identifier: "default".to_string(),
            time_to_lock_interactive_state: 0.1,
            scroll_step: 20,
            wheel_notch: 120,
            caret_blink_interval: 0.5,
            default_font: "default".to_string(),
            default_font_size: 18,
            load_default_stylesheets: BTreeMap::new(),
        }
    }
}

impl SystemStyleSheet {
    pub const FILE_NAME: &'static str = "system_style.json";

    pub fn from_json_str(text: &str, resource: &str) -> Result<Self> {
        let sheet: SystemStyleSheet = serde_json::from_str(text).map_err(|e| UiError::StyleSheetLoad {
            resource: resource.to_string(),
            message: e.to_string(),
        })?;
        sheet.validate(resource)?;
        Ok(sheet)
    }

    /// Reads `<theme_folder>/system_style.json`.
    pub fn load(theme_folder: &Path) -> Result<Self> {
        let path = theme_folder.join(Self::FILE_NAME);
        let resource = path.display().to_string();
        let text = std::fs::read_to_string(&path).map_err(|e| UiError::StyleSheetLoad {
            resource: resource.clone(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text, &resource)
    }

    fn validate(&self, resource: &str) -> Result<()> {
        let bad = |property: &str, message: String| UiError::StyleProperty {
            resource: resource.to_string(),
            state: None,
            property: property.to_string(),
            message,
        };
        if !(self.time_to_lock_interactive_state >= 0.0) {
            return Err(bad("time_to_lock_interactive_state", format!("must be >= 0, got {}", self.time_to_lock_interactive_state)));
        }
        if self.wheel_notch <= 0 {
            return Err(bad("wheel_notch", format!("must be positive, got {}", self.wheel_notch)));
        }
        if self.default_font_size <= 0 {
            return Err(bad("default_font_size", format!("must be positive, got {}", self.default_font_size)));
        }
        Ok(())
    }
}
