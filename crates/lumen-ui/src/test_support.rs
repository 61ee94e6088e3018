//! Shared fixtures for the inline tests.

use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::DrawList;

use crate::input::{RawInput, TextCommand};
use crate::style::SystemStyleSheet;
use crate::system::UiSystem;

pub const SCREEN: Rect = Rect::new(0, 0, 800, 600);
const DT: f32 = 1.0 / 60.0;

/// A system with the default system stylesheet and no control stylesheets.
pub fn system() -> UiSystem {
    UiSystem::new(SystemStyleSheet::default())
}

/// A recording renderer over an 800x600 screen, using fallback font metrics.
pub fn renderer() -> DrawList {
    DrawList::new(SCREEN)
}

/// Drives whole frames (update, then draw into a fresh list) with a scripted
/// pointer.
pub struct Harness {
    pub sys: UiSystem,
    pub dl: DrawList,
    raw: RawInput,
}

impl Harness {
    pub fn new() -> Self {
        let mut h = Self { sys: system(), dl: renderer(), raw: RawInput::default() };
        h.frame();
        h
    }

    pub fn frame(&mut self) {
        self.sys.update(&self.dl, self.raw.clone(), DT);
        self.dl.clear();
        self.sys.draw(&mut self.dl);
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.raw.mouse_position = Point::new(x, y);
        self.frame();
    }

    pub fn press(&mut self) {
        self.raw.left_button = true;
        self.frame();
    }

    pub fn release(&mut self) {
        self.raw.left_button = false;
        self.frame();
    }

    pub fn click_at(&mut self, x: i32, y: i32) {
        self.move_to(x, y);
        self.press();
        self.release();
    }

    /// Raw wheel units; 120 is one notch away from the user.
    pub fn wheel(&mut self, delta: i32) {
        self.raw.wheel += delta;
        self.frame();
    }

    /// Sends `text` as character commands in a single frame.
    pub fn type_text(&mut self, text: &str) {
        self.raw.text_commands = text.chars().map(TextCommand::Char).collect();
        self.frame();
        self.raw.text_commands.clear();
    }
}
