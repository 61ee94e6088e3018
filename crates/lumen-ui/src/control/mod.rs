//! The retained control tree.
//!
//! Controls live in an arena owned by [`UiSystem`](crate::UiSystem) and refer to
//! each other by [`ControlId`]. Parent links, `copy_state_from` and
//! `transfer_interactions_to` are plain ids: they never keep a control alive and
//! simply stop resolving once the target is destroyed.
//!
//! Per-frame flow:
//! 1. `update` clears every control's frame cache, hit-tests the targeted
//!    control, dispatches interactions and advances timers.
//! 2. `draw` lays out each control from its parent's internal rect and its
//!    previous sibling's rect, renders it, then recurses into children.

mod draw;
mod events;
mod interact;
mod layout;
mod state;
mod tree;

use std::any::Any;
use std::rc::Rc;

use lumen_engine::coords::{Point, Rect};
use slotmap::new_key_type;

use crate::controls::ControlKind;
use crate::measure::MeasureVector;
use crate::style::{ControlState, StyleSheet, StyleSheetState};

pub use draw::{draw_style_layers, DrawMode};
pub use events::{ControlEvents, EventKind, Handler};
pub use interact::confine;
pub(crate) use interact::DragState;
pub use layout::{place, Anchor, FlowCursor, LayoutInput, Placement};

new_key_type! {
    /// Handle into the control arena. Stable across insertions/removals.
    pub struct ControlId;
}

// ── enums ─────────────────────────────────────────────────────────────────

/// Whether (and within what bounds) the user can drag a control around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DraggableMode {
    #[default]
    NotDraggable,
    Draggable,
    DraggableConfinedToParent,
    DraggableConfinedToScreen,
}

/// What happens to children drawn outside the internal rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowMode {
    #[default]
    Overflow,
    /// Clip children to the internal rect.
    HideOverflow,
}

/// Memoized per-frame values, cleared at the start of every update.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FrameCache {
    pub state: Option<ControlState>,
    pub locked: Option<bool>,
    pub disabled: Option<bool>,
    pub visible: Option<bool>,
}

// ── Control ───────────────────────────────────────────────────────────────

/// A node in the UI tree.
pub struct Control {
    pub identifier: Option<String>,
    /// Arbitrary application payload.
    pub user_data: Option<Box<dyn Any>>,

    pub anchor: Anchor,
    pub offset: MeasureVector,
    pub size: MeasureVector,
    /// Width follows the children's extent (plus padding).
    pub auto_width: bool,
    /// Height follows the children's extent (plus padding).
    pub auto_height: bool,

    pub style_sheet: Rc<StyleSheet>,
    /// Takes precedence over the stylesheet for every state.
    pub override_styles: StyleSheetState,

    pub visible: bool,
    pub enabled: bool,
    /// Locked controls ignore input but keep their normal look.
    pub locked: bool,
    pub ignore_interactions: bool,
    pub draggable_mode: DraggableMode,
    pub overflow_mode: OverflowMode,
    /// Hit-tests on this control register on the target instead.
    pub transfer_interactions_to: Option<ControlId>,
    /// Render with another control's state (a button's label, a slider's handle).
    pub copy_state_from: Option<ControlId>,
    /// Forces a state regardless of input.
    pub locked_state: Option<ControlState>,
    /// Hit-tested in a second pass that wins over the base layer (popups).
    pub top_most_interactions: bool,
    /// Stay targeted while the button pressed on it is held.
    pub lock_focus_on_self_while_mouse_down: bool,
    pub can_get_focus_while_mouse_is_down: bool,
    /// Internal children only: lay out against the unscrolled rect.
    pub ignore_scroll_offset: bool,
    pub draw_fill_textures: bool,

    pub events: ControlEvents,
    pub kind: ControlKind,

    pub(crate) parent: Option<ControlId>,
    pub(crate) children: Vec<ControlId>,
    pub(crate) internal_children: Vec<ControlId>,
    pub(crate) internal_children_top_most: Vec<ControlId>,
    pub(crate) is_internal: bool,
    pub(crate) vertical_scrollbar: Option<ControlId>,
    pub(crate) is_checked: bool,

    pub(crate) last_bounding_rect: Rect,
    pub(crate) last_internal_bounding_rect: Rect,
    pub(crate) last_visible_bounding_rect: Rect,
    /// The rect this control was laid out against (parent internal, scrolled).
    pub(crate) last_parent_rect: Rect,
    /// Extent of the children drawn last frame, relative to the internal rect.
    pub(crate) last_content_size: Point,
    /// Set once dragged: position relative to `last_parent_rect`'s origin.
    pub(crate) dragged_offset: Option<Point>,

    pub(crate) interacted_timer: f32,
    pub(crate) last_drawn_state: Option<ControlState>,
    pub(crate) previous_state: ControlState,
    /// 0 → just switched from `previous_state`, 1 → transition done.
    pub(crate) state_transition: f32,
    pub(crate) cache: FrameCache,
}

impl Control {
    /// A detached control of `kind`, sized from the stylesheet defaults (or the
    /// kind's own defaults where the sheet has none).
    pub fn new(kind: ControlKind, style_sheet: Rc<StyleSheet>) -> Self {
        let fallback = kind.default_size();
        let size = MeasureVector::new(
            style_sheet.default_width.unwrap_or(fallback.x),
            style_sheet.default_height.unwrap_or(fallback.y),
        );
        Self {
            identifier: None,
            user_data: None,
            anchor: Anchor::AutoLTR,
            offset: MeasureVector::default(),
            size,
            auto_width: false,
            auto_height: false,
            style_sheet,
            override_styles: StyleSheetState::default(),
            visible: true,
            enabled: true,
            locked: false,
            ignore_interactions: false,
            draggable_mode: DraggableMode::NotDraggable,
            overflow_mode: OverflowMode::Overflow,
            transfer_interactions_to: None,
            copy_state_from: None,
            locked_state: None,
            top_most_interactions: false,
            lock_focus_on_self_while_mouse_down: false,
            can_get_focus_while_mouse_is_down: true,
            ignore_scroll_offset: false,
            draw_fill_textures: true,
            events: ControlEvents::default(),
            kind,
            parent: None,
            children: Vec::new(),
            internal_children: Vec::new(),
            internal_children_top_most: Vec::new(),
            is_internal: false,
            vertical_scrollbar: None,
            is_checked: false,
            last_bounding_rect: Rect::default(),
            last_internal_bounding_rect: Rect::default(),
            last_visible_bounding_rect: Rect::default(),
            last_parent_rect: Rect::default(),
            last_content_size: Point::ZERO,
            dragged_offset: None,
            interacted_timer: 0.0,
            last_drawn_state: None,
            previous_state: ControlState::Default,
            state_transition: 1.0,
            cache: FrameCache::default(),
        }
    }

    pub fn with_identifier(mut self, v: impl Into<String>) -> Self { self.identifier = Some(v.into()); self }
    pub fn with_anchor(mut self, v: Anchor) -> Self { self.anchor = v; self }
    pub fn with_size(mut self, v: MeasureVector) -> Self { self.size = v; self }
    pub fn with_offset(mut self, v: MeasureVector) -> Self { self.offset = v; self }
    pub fn with_draggable(mut self, v: DraggableMode) -> Self { self.draggable_mode = v; self }
    pub fn with_overflow(mut self, v: OverflowMode) -> Self { self.overflow_mode = v; self }

    #[inline]
    pub fn parent(&self) -> Option<ControlId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[ControlId] {
        &self.children
    }

    #[inline]
    pub fn is_internal(&self) -> bool {
        self.is_internal
    }

    #[inline]
    pub fn is_checked(&self) -> bool {
        self.is_checked
    }

    #[inline]
    pub fn vertical_scrollbar(&self) -> Option<ControlId> {
        self.vertical_scrollbar
    }

    /// Outer rect from the last draw (after extra size).
    #[inline]
    pub fn last_bounding_rect(&self) -> Rect {
        self.last_bounding_rect
    }

    /// Area available to children (after padding).
    #[inline]
    pub fn last_internal_bounding_rect(&self) -> Rect {
        self.last_internal_bounding_rect
    }

    /// Outer rect clipped by the active scissor region.
    #[inline]
    pub fn last_visible_bounding_rect(&self) -> Rect {
        self.last_visible_bounding_rect
    }

    #[inline]
    pub fn dragged_offset(&self) -> Option<Point> {
        self.dragged_offset
    }

    /// Forget a dragged position and go back to anchor layout.
    pub fn reset_dragged_position(&mut self) {
        self.dragged_offset = None;
    }

    /// Copy-on-write access to this control's stylesheet.
    pub fn style_sheet_mut(&mut self) -> &mut StyleSheet {
        Rc::make_mut(&mut self.style_sheet)
    }

    /// Every child list: internal, regular children, top-most internal.
    pub(crate) fn lists_in_draw_order(&self) -> [&[ControlId]; 3] {
        [&self.internal_children, &self.children, &self.internal_children_top_most]
    }
}
