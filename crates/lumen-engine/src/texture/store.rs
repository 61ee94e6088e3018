use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use image::RgbaImage;

use crate::coords::Point;
use crate::paint::Color;

/// Error returned by [`TextureStore::load_file`].
#[derive(Debug)]
pub struct TextureLoadError {
    pub texture_id: String,
    pub source: image::ImageError,
}

impl fmt::Display for TextureLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "texture load error ({}): {}", self.texture_id, self.source)
    }
}

impl std::error::Error for TextureLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decoded RGBA textures keyed by the identifier stylesheets refer to.
///
/// Backends keep their GPU copies elsewhere; this store only answers size and
/// pixel queries (color pickers sample the texture they are drawn with).
#[derive(Default)]
pub struct TextureStore {
    textures: HashMap<String, RgbaImage>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, image: RgbaImage) {
        self.textures.insert(id.into(), image);
    }

    /// Generates a texture pixel by pixel (gradients, palettes).
    pub fn insert_with(&mut self, id: impl Into<String>, width: u32, height: u32, pixel: impl Fn(u32, u32) -> Color) {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            let c = pixel(x, y);
            image::Rgba([c.r, c.g, c.b, c.a])
        });
        self.insert(id, image);
    }

    /// Decodes an image file and stores it under `id`.
    pub fn load_file(&mut self, id: impl Into<String>, path: impl AsRef<Path>) -> Result<(), TextureLoadError> {
        let id = id.into();
        let image = image::open(path.as_ref())
            .map_err(|source| TextureLoadError { texture_id: id.clone(), source })?
            .to_rgba8();
        log::debug!("loaded texture '{id}' ({}x{})", image.width(), image.height());
        self.textures.insert(id, image);
        Ok(())
    }

    pub fn size(&self, id: &str) -> Option<Point> {
        self.textures
            .get(id)
            .map(|img| Point::new(img.width() as i32, img.height() as i32))
    }

    /// Pixel at `at`, or `None` for unknown textures / out-of-bounds reads.
    pub fn pixel(&self, id: &str, at: Point) -> Option<Color> {
        let img = self.textures.get(id)?;
        if at.x < 0 || at.y < 0 || at.x as u32 >= img.width() || at.y as u32 >= img.height() {
            return None;
        }
        let [r, g, b, a] = img.get_pixel(at.x as u32, at.y as u32).0;
        Some(Color::new(r, g, b, a))
    }
}
