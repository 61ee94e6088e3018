//! Per-state stylesheets and their cascade.
//!
//! A [`StyleSheet`] holds one optional [`StyleSheetState`] bag per
//! [`ControlState`]. Lookups go through typed [`StyleProperty`] accessors and
//! fall back along a fixed chain so sheets authored only for
//! Default/Interacted/Disabled still style the composite states.

mod loader;
mod sheet;
mod state;
mod system;
mod textures;

pub use loader::{FileStyleSheetLoader, StyleSheetLoader};
pub use sheet::{props, StyleProperty, StyleSheet, StyleSheetState};
pub use state::ControlState;
pub use system::SystemStyleSheet;
pub use textures::{FramedTexture, IconTexture, StretchedTexture, TextAlignment};
