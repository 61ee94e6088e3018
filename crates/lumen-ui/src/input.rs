//! Per-frame input snapshot.
//!
//! The host polls its platform once per frame and hands the UI a [`RawInput`].
//! [`InputState`] pairs it with the previous frame's raw state and derives the
//! pressed/released-this-frame transitions.

use lumen_engine::coords::Point;

/// Text editing command collected by the host this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCommand {
    /// A committed character.
    Char(char),
    Backspace,
    Delete,
    MoveLeft,
    MoveRight,
    MoveHome,
    MoveEnd,
    BreakLine,
}

/// Raw pointer/button/wheel state as reported by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    /// Cursor position in screen pixels.
    pub mouse_position: Point,
    pub left_button: bool,
    pub right_button: bool,
    pub wheel_button: bool,
    /// Cumulative wheel value; the per-frame delta is derived.
    pub wheel: i32,
    /// Text commands in arrival order.
    pub text_commands: Vec<TextCommand>,
}

/// Immutable snapshot for one frame.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub current: RawInput,
    pub previous: RawInput,

    pub left_pressed_now: bool,
    pub left_released_now: bool,
    pub right_pressed_now: bool,
    pub right_released_now: bool,
    pub wheel_pressed_now: bool,
    pub wheel_released_now: bool,
    /// Wheel change since the previous frame (positive = away from the user).
    pub wheel_delta: i32,
    pub mouse_move: Point,
}

impl InputState {
    pub fn new(current: RawInput, previous: RawInput) -> Self {
        let changed = |now: bool, before: bool| now ^ before;
        Self {
            left_pressed_now: changed(current.left_button, previous.left_button) && current.left_button,
            left_released_now: changed(current.left_button, previous.left_button) && !current.left_button,
            right_pressed_now: changed(current.right_button, previous.right_button) && current.right_button,
            right_released_now: changed(current.right_button, previous.right_button) && !current.right_button,
            wheel_pressed_now: changed(current.wheel_button, previous.wheel_button) && current.wheel_button,
            wheel_released_now: changed(current.wheel_button, previous.wheel_button) && !current.wheel_button,
            wheel_delta: current.wheel - previous.wheel,
            mouse_move: current.mouse_position - previous.mouse_position,
            current,
            previous,
        }
    }

    #[inline]
    pub fn mouse_position(&self) -> Point {
        self.current.mouse_position
    }

    #[inline]
    pub fn left_down(&self) -> bool {
        self.current.left_button
    }

    #[inline]
    pub fn text_commands(&self) -> &[TextCommand] {
        &self.current.text_commands
    }
}
