//! Renderer contract and a recording implementation.
//!
//! Responsibilities:
//! - define the drawing / text-measurement / scissor contract the UI consumes
//! - provide [`DrawList`], a backend-agnostic recorder that fulfils the
//!   contract and can be replayed by a GPU backend (or inspected in tests)

mod draw_list;
mod renderer;

pub use draw_list::{DrawCmd, DrawItem, DrawList};
pub use renderer::{Renderer, TextParams};
