//! Lumen engine crate.
//!
//! Backend-neutral pieces consumed by the UI layer: geometry, colors, the
//! renderer contract, text metrics, texture read-back, logging and timing.

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;
pub mod texture;
pub mod time;
