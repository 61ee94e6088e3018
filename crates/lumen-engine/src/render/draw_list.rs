use crate::coords::{Point, Rect};
use crate::paint::Color;
use crate::text::FontSystem;
use crate::texture::TextureStore;

use super::renderer::{Renderer, TextParams};

/// Renderer-agnostic draw command.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Texture {
        effect: Option<String>,
        texture_id: String,
        dest: Rect,
        source: Rect,
        color: Color,
    },
    Rectangle {
        rect: Rect,
        color: Color,
    },
    Text {
        effect: Option<String>,
        text: String,
        position: Point,
        font_id: String,
        font_size: f32,
        fill: Color,
        outline: Color,
        outline_width: i32,
        spacing: f32,
    },
}

/// A recorded command plus the scissor region active when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// `None` = no clipping.
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for a frame.
///
/// Implements [`Renderer`] by appending commands in issue order (which is the
/// paint order: later items are in front). Text is measured through the owned
/// [`FontSystem`] and pixel reads go to the owned [`TextureStore`], so the same
/// resources back layout and rendering.
pub struct DrawList {
    items: Vec<DrawItem>,
    clip: Option<Rect>,
    screen: Rect,
    pub fonts: FontSystem,
    pub textures: TextureStore,
}

impl DrawList {
    pub fn new(screen: Rect) -> Self {
        Self {
            items: Vec::new(),
            clip: None,
            screen,
            fonts: FontSystem::new(),
            textures: TextureStore::new(),
        }
    }

    /// Clears recorded items and the scissor region. Keeps allocated capacity.
    pub fn clear(&mut self) {
        self.items.clear();
        self.clip = None;
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    pub fn set_screen_bounds(&mut self, screen: Rect) {
        self.screen = screen;
    }

    /// Texts drawn this frame, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match &item.cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn push(&mut self, cmd: DrawCmd) {
        // Fully clipped commands are dropped; the backend would discard them anyway.
        if let Some(clip) = self.clip {
            let bounds = match &cmd {
                DrawCmd::Texture { dest, .. } => Some(*dest),
                DrawCmd::Rectangle { rect, .. } => Some(*rect),
                DrawCmd::Text { .. } => None,
            };
            if bounds.is_some_and(|b| b.intersect(clip).is_none()) {
                return;
            }
        }
        self.items.push(DrawItem { cmd, clip_rect: self.clip });
    }
}

impl Renderer for DrawList {
    fn draw_texture(&mut self, effect: Option<&str>, texture_id: &str, dest: Rect, source: Rect, color: Color) {
        self.push(DrawCmd::Texture {
            effect: effect.map(str::to_string),
            texture_id: texture_id.to_string(),
            dest,
            source,
            color,
        });
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.push(DrawCmd::Rectangle { rect, color });
    }

    fn draw_text(&mut self, effect: Option<&str>, text: &str, position: Point, params: &TextParams<'_>) {
        self.push(DrawCmd::Text {
            effect: effect.map(str::to_string),
            text: text.to_string(),
            position,
            font_id: params.font_id.to_string(),
            font_size: params.font_size,
            fill: params.fill,
            outline: params.outline,
            outline_width: params.outline_width,
            spacing: params.spacing,
        });
    }

    fn measure_text(&self, text: &str, font_id: &str, font_size: f32, spacing: f32) -> Point {
        self.fonts.measure_text(text, font_id, font_size, spacing)
    }

    fn text_line_height(&self, font_id: &str, font_size: f32) -> i32 {
        self.fonts.line_height(font_id, font_size)
    }

    fn set_scissor_region(&mut self, region: Rect) {
        self.clip = Some(region);
    }

    fn scissor_region(&self) -> Option<Rect> {
        self.clip
    }

    fn clear_scissor_region(&mut self) {
        self.clip = None;
    }

    fn screen_bounds(&self) -> Rect {
        self.screen
    }

    fn texture_pixel(&self, texture_id: &str, at: Point) -> Option<Color> {
        self.textures.pixel(texture_id, at)
    }
}
