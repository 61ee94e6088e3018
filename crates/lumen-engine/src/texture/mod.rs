//! CPU-side texture storage used for pixel read-back.

mod store;

pub use store::{TextureLoadError, TextureStore};
