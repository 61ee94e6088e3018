use lumen_engine::coords::{Point, Rect};
use lumen_engine::paint::Color;
use lumen_engine::render::Renderer;

use crate::control::{ControlId, FlowCursor, OverflowMode};
use crate::controls;
use crate::style::{props, ControlState, StyleSheet, StyleSheetState};
use crate::system::UiSystem;

/// Which pass a control is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Normal,
    /// Deferred pass run after the whole tree (open drop-down lists).
    Overlay,
}

/// Paints the fill layers of `state` into `rect`: fill color, stretched
/// texture, framed texture, then icon. `alpha` scales every layer's alpha for
/// state cross-fades. Overlay passes skip the icon.
pub fn draw_style_layers(
    renderer: &mut dyn Renderer,
    sheet: &StyleSheet,
    state: ControlState,
    overrides: Option<&StyleSheetState>,
    rect: Rect,
    alpha: f32,
    mode: DrawMode,
) {
    let effect = sheet.resolve(&props::EFFECT_IDENTIFIER, state, overrides).map(|(e, _)| e.as_str());
    let tint = sheet.get_property(&props::TINT_COLOR, state, Color::WHITE, overrides).fade(alpha);

    if let Some((fill, _)) = sheet.resolve(&props::FILL_COLOR, state, overrides) {
        renderer.draw_rectangle(rect, fill.fade(alpha));
    }
    if let Some((tex, _)) = sheet.resolve(&props::FILL_TEXTURE_STRETCHED, state, overrides) {
        renderer.draw_texture(effect, &tex.texture_id, tex.dest_rect(rect), tex.source_rect, tint);
    }
    if let Some((tex, _)) = sheet.resolve(&props::FILL_TEXTURE_FRAMED, state, overrides) {
        for (dest, src) in tex.slices(rect) {
            renderer.draw_texture(effect, &tex.texture_id, dest, src, tint);
        }
    }
    if mode == DrawMode::Normal
        && let Some((icon, _)) = sheet.resolve(&props::ICON, state, overrides)
    {
        renderer.draw_texture(effect, &icon.texture_id, icon.dest_rect(rect), icon.source_rect, tint);
    }
}

/// `rect` clipped to the active scissor; an empty rect at the same origin
/// when fully clipped.
pub(crate) fn clip_to_scissor(renderer: &dyn Renderer, rect: Rect) -> Rect {
    match renderer.scissor_region() {
        Some(region) => rect.intersect(region).unwrap_or(Rect::new(rect.x, rect.y, 0, 0)),
        None => rect,
    }
}

impl UiSystem {
    /// Lays out and draws `id` and its subtree. Returns the flow cursor for
    /// the next sibling.
    pub(crate) fn draw_control(
        &mut self,
        id: ControlId,
        renderer: &mut dyn Renderer,
        parent: Rect,
        prev: Option<&FlowCursor>,
    ) -> Option<FlowCursor> {
        if !self.is_currently_visible(id) {
            return prev.copied();
        }

        let state = self.control_state(id);
        let layout = self.calculate_bounding_rect(id, renderer, parent, prev, state);
        let outer = layout.placement.rect;
        let internal = layout.internal;

        let c = &mut self.controls[id];
        c.last_bounding_rect = outer;
        c.last_internal_bounding_rect = internal;
        c.last_visible_bounding_rect = clip_to_scissor(renderer, outer);
        c.last_parent_rect = parent;
        if c.last_drawn_state != Some(state) {
            let speed = c.style_sheet.interpolate_states_speed.unwrap_or(0.0);
            match c.last_drawn_state {
                Some(before) if speed > 0.0 => {
                    c.previous_state = before;
                    c.state_transition = 0.0;
                }
                _ => c.state_transition = 1.0,
            }
            c.last_drawn_state = Some(state);
        }
        let dragged = c.dragged_offset.is_some();
        let clip = c.overflow_mode == OverflowMode::HideOverflow;

        self.draw_control_type(id, renderer, state, outer, DrawMode::Normal);
        controls::draw_kind(self, id, renderer, state, DrawMode::Normal);

        let saved_scissor = renderer.scissor_region();
        if clip {
            let region = clip_to_scissor(renderer, internal);
            renderer.set_scissor_region(region);
        }
        self.draw_children(id, renderer, internal);
        if clip {
            match saved_scissor {
                Some(region) => renderer.set_scissor_region(region),
                None => renderer.clear_scissor_region(),
            }
        }

        Some(FlowCursor::after(prev, &layout.placement, layout.margin_after, dragged))
    }

    fn draw_children(&mut self, id: ControlId, renderer: &mut dyn Renderer, internal: Rect) {
        let scroll = controls::panel::scroll_offset(self, id);
        let scrolled = internal.offset(Point::new(0, -scroll));

        let internal_children = self.internal_draw_order(id);
        let c = &self.controls[id];
        let children = c.children.clone();
        let top_most = c.internal_children_top_most.clone();

        let mut flow = None;
        for child in internal_children {
            let ignore_scroll = self.controls.get(child).is_some_and(|c| c.ignore_scroll_offset);
            let rect = if ignore_scroll { internal } else { scrolled };
            flow = self.draw_control(child, renderer, rect, flow.as_ref());
        }

        let mut flow = None;
        let mut extent = Point::ZERO;
        for child in children {
            flow = self.draw_control(child, renderer, scrolled, flow.as_ref());
            if let Some(c) = self.controls.get(child)
                && c.cache.visible == Some(true)
            {
                let r = c.last_bounding_rect;
                extent = extent.max(Point::new(r.right() - scrolled.left(), r.bottom() - scrolled.top()));
            }
        }

        let mut flow = None;
        for child in top_most {
            flow = self.draw_control(child, renderer, internal, flow.as_ref());
        }

        if let Some(c) = self.controls.get_mut(id) {
            c.last_content_size = extent;
        }
        controls::panel::update_scrollbar_range(self, id, extent.y, internal.height);
    }

    /// Internal children that ignore scrolling, then the scrolled ones.
    pub(crate) fn internal_draw_order(&self, id: ControlId) -> Vec<ControlId> {
        let Some(c) = self.controls.get(id) else { return Vec::new() };
        let (mut order, scrolled): (Vec<_>, Vec<_>) = c
            .internal_children
            .iter()
            .copied()
            .partition(|&child| self.controls.get(child).is_some_and(|c| c.ignore_scroll_offset));
        order.extend(scrolled);
        order
    }

    /// Draws the control's fill layers, cross-fading from the previous state
    /// while a transition runs.
    pub(crate) fn draw_control_type(
        &self,
        id: ControlId,
        renderer: &mut dyn Renderer,
        state: ControlState,
        rect: Rect,
        mode: DrawMode,
    ) {
        let Some(c) = self.controls.get(id) else { return };
        if !c.draw_fill_textures {
            return;
        }
        let sheet = &*c.style_sheet;
        let overrides = Some(&c.override_styles);
        let t = c.state_transition;
        if t < 1.0 && c.previous_state != state {
            draw_style_layers(renderer, sheet, c.previous_state, overrides, rect, 1.0 - t, mode);
            draw_style_layers(renderer, sheet, state, overrides, rect, t, mode);
        } else {
            draw_style_layers(renderer, sheet, state, overrides, rect, 1.0, mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_engine::coords::Rect;
    use lumen_engine::paint::Color;
    use lumen_engine::render::{DrawCmd, Renderer};

    use super::*;
    use crate::control::{Anchor, OverflowMode};
    use crate::controls::Panel;
    use crate::measure::MeasureVector;
    use crate::style::StyleSheet;
    use crate::test_support::{renderer, system};

    fn filled(color: Color) -> std::rc::Rc<StyleSheet> {
        let mut sheet = StyleSheet::default();
        sheet.set_property(&props::FILL_COLOR, ControlState::Default, Some(color));
        std::rc::Rc::new(sheet)
    }

    #[test]
    fn style_layers_fade_with_alpha() {
        let mut dl = renderer();
        let sheet = filled(Color::rgb(10, 20, 30));
        draw_style_layers(&mut dl, &sheet, ControlState::Targeted, None, Rect::new(0, 0, 5, 5), 0.5, DrawMode::Normal);
        match &dl.items()[0].cmd {
            DrawCmd::Rectangle { color, .. } => assert_eq!(color.a, 128),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hidden_controls_draw_nothing() {
        let mut sys = system();
        let mut dl = renderer();
        let root = sys.root();
        let p = Panel::new().style_sheet(filled(Color::BLACK)).build(&mut sys);
        sys.add_child(root, p).unwrap();
        sys.control_mut(p).unwrap().visible = false;

        sys.draw(&mut dl);
        assert!(dl.items().is_empty());
    }

    #[test]
    fn hide_overflow_clips_children_and_restores_scissor() {
        let mut sys = system();
        let mut dl = renderer();
        let root = sys.root();
        let outer = Panel::new().build(&mut sys);
        let inner = Panel::new().style_sheet(filled(Color::WHITE)).build(&mut sys);
        {
            let c = sys.control_mut(outer).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(100.0, 100.0);
            c.overflow_mode = OverflowMode::HideOverflow;
        }
        {
            let c = sys.control_mut(inner).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(50.0, 50.0);
            c.offset = MeasureVector::pixels(80.0, 80.0);
        }
        sys.add_child(root, outer).unwrap();
        sys.add_child(outer, inner).unwrap();

        sys.draw(&mut dl);
        let inner_c = sys.control(inner).unwrap();
        assert_eq!(inner_c.last_bounding_rect(), Rect::new(80, 80, 50, 50));
        assert_eq!(inner_c.last_visible_bounding_rect(), Rect::new(80, 80, 20, 20));
        assert_eq!(dl.items()[0].clip_rect, Some(Rect::new(0, 0, 100, 100)));
        assert_eq!(dl.scissor_region(), None);
    }

    #[test]
    fn content_size_tracks_children() {
        let mut sys = system();
        let mut dl = renderer();
        let root = sys.root();
        let outer = Panel::new().build(&mut sys);
        sys.control_mut(outer).unwrap().auto_height = true;
        sys.add_child(root, outer).unwrap();
        for _ in 0..3 {
            let child = Panel::new().build(&mut sys);
            sys.control_mut(child).unwrap().size = MeasureVector::pixels(10.0, 20.0);
            sys.add_child(outer, child).unwrap();
        }

        sys.draw(&mut dl);
        assert_eq!(sys.control(outer).unwrap().last_content_size, Point::new(10, 60));
        // Auto height uses last frame's content.
        sys.draw(&mut dl);
        assert_eq!(sys.control(outer).unwrap().last_bounding_rect().height, 60);
    }

    #[test]
    fn unscrolled_internal_parts_draw_first() {
        let mut sys = system();
        let mut dl = renderer();
        let root = sys.root();
        let outer = Panel::new().build(&mut sys);
        sys.add_child(root, outer).unwrap();
        let scrolled = Panel::new().style_sheet(filled(Color::rgb(200, 0, 0))).build(&mut sys);
        let fixed = Panel::new().style_sheet(filled(Color::rgb(0, 0, 200))).build(&mut sys);
        sys.control_mut(fixed).unwrap().ignore_scroll_offset = true;
        for id in [scrolled, fixed] {
            let c = sys.control_mut(id).unwrap();
            c.anchor = Anchor::TopLeft;
            c.size = MeasureVector::pixels(10.0, 10.0);
        }
        sys.add_internal_child(outer, scrolled, false).unwrap();
        sys.add_internal_child(outer, fixed, false).unwrap();
        assert_eq!(sys.internal_draw_order(outer), vec![fixed, scrolled]);

        sys.draw(&mut dl);
        let colors: Vec<Color> = dl
            .items()
            .iter()
            .filter_map(|item| match &item.cmd {
                DrawCmd::Rectangle { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![Color::rgb(0, 0, 200), Color::rgb(200, 0, 0)]);
    }
}
