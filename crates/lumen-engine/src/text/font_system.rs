use std::collections::HashMap;
use std::fmt;

use crate::coords::Point;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError {
    pub font_id: String,
    pub message: String,
}

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error ({}): {}", self.font_id, self.message)
    }
}

impl std::error::Error for FontLoadError {}

/// Fonts keyed by the identifier stylesheets refer to (`"default"`, `"title"`, …).
///
/// Identifiers with no loaded font are measured with a fixed-advance fallback
/// (half the font size per character, one font size per line) so layout stays
/// deterministic before any font is registered.
pub struct FontSystem {
    fonts: HashMap<String, fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: HashMap::new() }
    }

    /// Parses and stores a TrueType or OpenType font under `id`.
    pub fn load_font(&mut self, id: impl Into<String>, bytes: &[u8]) -> Result<(), FontLoadError> {
        let id = id.into();
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError { font_id: id.clone(), message: e.to_string() })?;
        log::debug!("loaded font '{id}'");
        self.fonts.insert(id, font);
        Ok(())
    }

    #[inline]
    pub fn has_font(&self, id: &str) -> bool {
        self.fonts.contains_key(id)
    }

    /// Height of a single text line.
    pub fn line_height(&self, id: &str, size: f32) -> i32 {
        match self.fonts.get(id).and_then(|f| f.horizontal_line_metrics(size)) {
            Some(m) => m.new_line_size.ceil() as i32,
            None => size.ceil() as i32,
        }
    }

    /// Bounding box of `text` laid out on one line per `\n`.
    ///
    /// `spacing` is extra horizontal space added between characters.
    #[must_use]
    pub fn measure_text(&self, text: &str, id: &str, size: f32, spacing: f32) -> Point {
        let line_h = self.line_height(id, size);
        let mut width = 0.0f32;
        let mut lines = 0;
        for line in text.split('\n') {
            lines += 1;
            width = width.max(self.line_width(line, id, size, spacing));
        }
        Point::new(width.ceil() as i32, line_h * lines)
    }

    fn line_width(&self, line: &str, id: &str, size: f32, spacing: f32) -> f32 {
        let count = line.chars().count();
        if count == 0 {
            return 0.0;
        }
        let gaps = (count - 1) as f32 * spacing;
        let Some(font) = self.fonts.get(id) else {
            return count as f32 * size * 0.5 + gaps;
        };

        use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(line, size, 0));

        // Pen position after the last glyph, not the bitmap edge, so draw and
        // measure agree on where the next character starts.
        let advance = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);
        advance + gaps
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
