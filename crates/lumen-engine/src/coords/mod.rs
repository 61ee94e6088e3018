//! Coordinate and geometry types shared by the renderer contract and the UI.
//!
//! Canonical space:
//! - Integer screen pixels
//! - Origin top-left
//! - +X right, +Y down

mod point;
mod rect;

pub use point::Point;
pub use rect::Rect;
