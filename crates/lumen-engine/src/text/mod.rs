//! Text metrics.

mod font_system;

pub use font_system::{FontLoadError, FontSystem};
