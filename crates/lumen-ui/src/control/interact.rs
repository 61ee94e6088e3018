use lumen_engine::coords::{Point, Rect};
use lumen_engine::render::Renderer;

use crate::control::{ControlId, DraggableMode, EventKind};
use crate::controls::{self, Interaction};
use crate::system::UiSystem;

/// Limit on `transfer_interactions_to` hops, in case of cycles.
const MAX_TRANSFER_HOPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DragState {
    pub id: ControlId,
    /// Pointer position relative to the control's origin when the drag began.
    pub grab: Point,
}

/// Clamps `origin` so a box of `size` stays inside `bounds`. Boxes larger than
/// the bounds stick to the top-left edge.
pub fn confine(origin: Point, size: Point, bounds: Rect) -> Point {
    let max_x = (bounds.right() - size.x).max(bounds.left());
    let max_y = (bounds.bottom() - size.y).max(bounds.top());
    Point::new(origin.x.clamp(bounds.left(), max_x), origin.y.clamp(bounds.top(), max_y))
}

impl UiSystem {
    /// All child lists of `id` in paint order.
    pub(crate) fn draw_order(&self, id: ControlId) -> Vec<ControlId> {
        let Some(c) = self.controls.get(id) else { return Vec::new() };
        let mut order = self.internal_draw_order(id);
        order.extend(&c.children);
        order.extend(&c.internal_children_top_most);
        order
    }

    pub(crate) fn is_interactable(&self, id: ControlId) -> bool {
        self.controls.get(id).is_some_and(|c| {
            c.kind.interactable() || c.draggable_mode != DraggableMode::NotDraggable || c.transfer_interactions_to.is_some()
        })
    }

    fn resolve_transfer(&self, mut id: ControlId) -> ControlId {
        for _ in 0..MAX_TRANSFER_HOPS {
            match self.controls.get(id).and_then(|c| c.transfer_interactions_to) {
                Some(next) if self.controls.contains_key(next) => id = next,
                _ => break,
            }
        }
        id
    }

    // ── targeting ─────────────────────────────────────────────────────────

    /// Picks the control under the pointer and fires enter/leave events.
    pub(crate) fn update_targeted_control(&mut self) {
        let previous = self.targeted.filter(|&t| self.controls.contains_key(t));
        let keep = previous.is_some_and(|t| self.keeps_target(t));
        let next = if keep { previous } else { self.find_target() };

        self.targeted = next;
        if next != previous {
            log::trace!("target {previous:?} -> {next:?}");
            if let Some(old) = previous {
                self.fire(old, EventKind::MouseLeave);
            }
            if let Some(new) = next {
                self.fire(new, EventKind::MouseEnter);
            }
        }
    }

    fn keeps_target(&mut self, target: ControlId) -> bool {
        if !self.is_currently_visible(target) {
            return false;
        }
        if self.drag.is_some_and(|d| d.id == target) {
            return true;
        }
        let locks = self.controls[target].lock_focus_on_self_while_mouse_down;
        locks && self.input.left_down() && self.pressed_on == Some(target)
    }

    fn find_target(&mut self) -> Option<ControlId> {
        let mouse = self.input.mouse_position();
        let mut base = None;
        let mut top_most = None;
        self.collect_hits(self.root(), false, mouse, &mut base, &mut top_most);
        top_most.or(base).map(|hit| self.resolve_transfer(hit))
    }

    /// Pre-order walk in paint order; the last hit wins in each layer.
    fn collect_hits(
        &mut self,
        id: ControlId,
        inherited_top_most: bool,
        mouse: Point,
        base: &mut Option<ControlId>,
        top_most: &mut Option<ControlId>,
    ) {
        if !self.is_currently_visible(id) {
            return;
        }
        let c = &self.controls[id];
        let layer_top_most = inherited_top_most || c.top_most_interactions;
        let refuses_focus = !c.can_get_focus_while_mouse_is_down && self.input.left_down();
        let hit = !c.ignore_interactions
            && !refuses_focus
            && c.last_visible_bounding_rect.contains(mouse)
            && self.is_interactable(id);
        if hit {
            if layer_top_most {
                *top_most = Some(id);
            } else {
                *base = Some(id);
            }
        }
        for child in self.draw_order(id) {
            self.collect_hits(child, layer_top_most, mouse, base, top_most);
        }
    }

    // ── focus ─────────────────────────────────────────────────────────────

    /// Moves keyboard focus, firing Unfocused/Focused.
    pub fn focus(&mut self, id: Option<ControlId>) {
        if id == self.focused {
            return;
        }
        if let Some(old) = self.focused.take() {
            controls::on_unfocused(self, old);
            self.fire(old, EventKind::Unfocused);
        }
        self.focused = id;
        if let Some(new) = id {
            self.fire(new, EventKind::Focused);
        }
    }

    // ── dispatch ──────────────────────────────────────────────────────────

    pub(crate) fn dispatch_interactions(&mut self, renderer: &dyn Renderer) {
        let mouse = self.input.mouse_position();
        let left_pressed = self.input.left_pressed_now;
        let left_released = self.input.left_released_now;
        let left_down = self.input.left_down();
        let notches = self.wheel_notches();

        if left_pressed {
            let focus = self.targeted.filter(|&t| self.controls.get(t).is_some_and(|c| c.kind.accepts_text()));
            self.focus(focus);
        }
        if left_released && let Some(drag) = self.drag.take() {
            self.fire(drag.id, EventKind::StopDrag);
        }

        match self.targeted {
            Some(target) => {
                let active = !self.is_currently_disabled(target) && !self.is_currently_locked(target);
                if left_pressed {
                    self.pressed_on = Some(target);
                    if active {
                        self.fire(target, EventKind::LeftMousePressed);
                        controls::interact(self, target, renderer, Interaction::LeftPressed);
                        self.begin_drag(target, mouse);
                    }
                } else if left_down && active && self.pressed_on == Some(target) {
                    controls::interact(self, target, renderer, Interaction::LeftDown);
                }
                if left_released && active {
                    self.fire(target, EventKind::LeftMouseReleased);
                    if self.pressed_on == Some(target) {
                        self.fire(target, EventKind::Click);
                        controls::interact(self, target, renderer, Interaction::Click);
                    }
                }
                if self.input.right_pressed_now && active {
                    self.fire(target, EventKind::RightMousePressed);
                }
                if notches != 0 && active {
                    self.fire(target, EventKind::MouseWheel);
                    if !controls::interact(self, target, renderer, Interaction::Wheel(notches)) {
                        self.scroll_from(Some(target), notches);
                    }
                }
            }
            None => {
                if notches != 0 {
                    self.scroll_from(None, notches);
                }
            }
        }
        if left_released {
            self.pressed_on = None;
        }

        if left_down && !left_pressed {
            self.continue_drag(mouse);
        }

        if let Some(focused) = self.focused
            && !self.input.text_commands().is_empty()
        {
            let commands = self.input.text_commands().to_vec();
            controls::text_input::apply_commands(self, focused, &commands);
        }
    }

    /// Whole wheel notches this frame; sub-notch deltas count as one.
    fn wheel_notches(&self) -> i32 {
        let delta = self.input.wheel_delta;
        match delta / self.system_style_sheet.wheel_notch.max(1) {
            0 => delta.signum(),
            n => n,
        }
    }

    // ── dragging ──────────────────────────────────────────────────────────

    fn begin_drag(&mut self, id: ControlId, mouse: Point) {
        let c = &self.controls[id];
        if c.draggable_mode == DraggableMode::NotDraggable {
            return;
        }
        self.drag = Some(DragState { id, grab: mouse - c.last_bounding_rect.origin() });
        self.fire(id, EventKind::StartDrag);
    }

    fn continue_drag(&mut self, mouse: Point) {
        let Some(drag) = self.drag else { return };
        let screen = self.screen_bounds;
        let Some(c) = self.controls.get_mut(drag.id) else {
            self.drag = None;
            return;
        };
        let size = c.last_bounding_rect.size();
        let parent = c.last_parent_rect;
        let wanted = mouse - drag.grab;
        let origin = match c.draggable_mode {
            DraggableMode::DraggableConfinedToParent => confine(wanted, size, parent),
            DraggableMode::DraggableConfinedToScreen => confine(wanted, size, screen),
            _ => wanted,
        };
        let offset = origin - parent.origin();
        if c.dragged_offset != Some(offset) {
            c.dragged_offset = Some(offset);
            c.last_bounding_rect = Rect::from_origin_size(origin, size);
            self.fire(drag.id, EventKind::Dragged);
        }
    }

    // ── scrolling ─────────────────────────────────────────────────────────

    /// Scrolls the nearest scrollable ancestor of `start`, or the topmost
    /// scrollable control under the pointer.
    fn scroll_from(&mut self, start: Option<ControlId>, notches: i32) {
        let mut cur = start;
        let mut panel = None;
        while let Some(id) = cur {
            if controls::panel::has_active_scrollbar(self, id) {
                panel = Some(id);
                break;
            }
            cur = self.controls.get(id).and_then(|c| c.parent);
        }
        let panel = panel.or_else(|| self.scrollable_under_mouse());
        if let Some(panel) = panel {
            let step = self.system_style_sheet.scroll_step;
            controls::panel::scroll_by(self, panel, -notches * step);
        }
    }

    fn scrollable_under_mouse(&mut self) -> Option<ControlId> {
        let mouse = self.input.mouse_position();
        let mut stack = vec![self.root()];
        let mut found = None;
        while let Some(id) = stack.pop() {
            if !self.is_currently_visible(id) || !self.controls[id].last_visible_bounding_rect.contains(mouse) {
                continue;
            }
            if controls::panel::has_active_scrollbar(self, id) {
                found = Some(id);
            }
            stack.extend(self.draw_order(id).into_iter().rev());
        }
        found
    }

    // ── per-frame update ──────────────────────────────────────────────────

    /// Advances timers and kind-specific behaviour for `id` and its subtree.
    pub(crate) fn update_control(&mut self, id: ControlId, renderer: &dyn Renderer, dt: f32) {
        if !self.is_currently_visible(id) {
            return;
        }
        let c = &mut self.controls[id];
        c.interacted_timer = (c.interacted_timer - dt).max(0.0);
        if c.state_transition < 1.0 {
            let speed = c.style_sheet.interpolate_states_speed.unwrap_or(0.0);
            c.state_transition = if speed > 0.0 { (c.state_transition + dt * speed).min(1.0) } else { 1.0 };
        }

        controls::update_kind(self, id, renderer, dt);

        for child in self.draw_order(id) {
            self.update_control(child, renderer, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::control::{Anchor, EventKind};
    use crate::controls::{Button, Panel};
    use crate::measure::MeasureVector;
    use crate::test_support::Harness;

    #[test]
    fn confine_clamps_inside_bounds() {
        let bounds = Rect::new(0, 0, 100, 100);
        assert_eq!(confine(Point::new(90, -5), Point::new(20, 20), bounds), Point::new(80, 0));
        assert_eq!(confine(Point::new(10, 10), Point::new(20, 20), bounds), Point::new(10, 10));
        assert_eq!(confine(Point::new(10, 10), Point::new(200, 20), bounds), Point::new(0, 10));
    }

    fn fixed_panel(h: &mut Harness, x: f32, y: f32, w: f32, hgt: f32) -> ControlId {
        let id = Panel::new().build(&mut h.sys);
        let c = h.sys.control_mut(id).unwrap();
        c.anchor = Anchor::TopLeft;
        c.offset = MeasureVector::pixels(x, y);
        c.size = MeasureVector::pixels(w, hgt);
        id
    }

    #[test]
    fn later_sibling_wins_hit_test() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let a = Button::new("a").build(&mut h.sys);
        let b = Button::new("b").build(&mut h.sys);
        for id in [a, b] {
            let c = h.sys.control_mut(id).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 40.0);
            h.sys.add_child(root, id).unwrap();
        }
        h.frame();
        h.move_to(10, 10);
        assert_eq!(h.sys.targeted_control(), Some(b));
    }

    #[test]
    fn top_most_layer_wins() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let a = Button::new("a").build(&mut h.sys);
        let b = Button::new("b").build(&mut h.sys);
        for id in [a, b] {
            let c = h.sys.control_mut(id).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 40.0);
            h.sys.add_child(root, id).unwrap();
        }
        h.sys.control_mut(a).unwrap().top_most_interactions = true;
        h.frame();
        h.move_to(10, 10);
        assert_eq!(h.sys.targeted_control(), Some(a));
    }

    #[test]
    fn drag_is_confined_to_parent() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let parent = fixed_panel(&mut h, 0.0, 0.0, 200.0, 200.0);
        let child = fixed_panel(&mut h, 10.0, 10.0, 50.0, 50.0);
        h.sys.control_mut(child).unwrap().draggable_mode = DraggableMode::DraggableConfinedToParent;
        h.sys.add_child(root, parent).unwrap();
        h.sys.add_child(parent, child).unwrap();

        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::StartDrag, EventKind::Dragged, EventKind::StopDrag] {
            let e = events.clone();
            h.sys.control_mut(child).unwrap().events.set(kind, move |_, _| e.borrow_mut().push(kind));
        }

        h.frame();
        h.move_to(20, 20);
        h.press();
        h.move_to(500, 500);
        h.release();

        assert_eq!(h.sys.control(child).unwrap().last_bounding_rect(), Rect::new(150, 150, 50, 50));
        assert_eq!(h.sys.control(child).unwrap().dragged_offset(), Some(Point::new(150, 150)));
        assert_eq!(*events.borrow(), vec![EventKind::StartDrag, EventKind::Dragged, EventKind::StopDrag]);
    }

    #[test]
    fn enter_and_leave_fire_on_target_change() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let b = Button::new("b").build(&mut h.sys);
        {
            let c = h.sys.control_mut(b).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 40.0);
        }
        h.sys.add_child(root, b).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in [EventKind::MouseEnter, EventKind::MouseLeave] {
            let l = log.clone();
            h.sys.events.set(kind, move |_, _| l.borrow_mut().push(kind));
        }

        h.frame();
        h.move_to(10, 10);
        h.move_to(300, 300);
        assert_eq!(*log.borrow(), vec![EventKind::MouseEnter, EventKind::MouseLeave]);
    }

    #[test]
    fn disabled_target_gets_no_click() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let b = Button::new("b").build(&mut h.sys);
        {
            let c = h.sys.control_mut(b).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 40.0);
            c.enabled = false;
        }
        h.sys.add_child(root, b).unwrap();
        let clicks = Rc::new(RefCell::new(0));
        let c = clicks.clone();
        h.sys.control_mut(b).unwrap().events.set(EventKind::Click, move |_, _| *c.borrow_mut() += 1);

        h.frame();
        h.click_at(10, 10);
        assert_eq!(*clicks.borrow(), 0);
    }
}
