use crate::control::{Control, ControlId, FrameCache};
use crate::style::ControlState;
use crate::system::UiSystem;

impl UiSystem {
    pub(crate) fn reset_frame_caches(&mut self) {
        for c in self.controls.values_mut() {
            c.cache = FrameCache::default();
        }
    }

    /// Walks up the parent chain; `own` says whether one control sets the
    /// flag, and the result is cached along the way.
    fn inherited_flag(
        &mut self,
        id: ControlId,
        cached: fn(&FrameCache) -> Option<bool>,
        store: fn(&mut FrameCache, bool),
        own: fn(&Control) -> bool,
    ) -> bool {
        let Some(c) = self.controls.get(id) else { return false };
        if let Some(v) = cached(&c.cache) {
            return v;
        }
        let mine = own(c);
        let parent = c.parent;
        let value = mine || parent.is_some_and(|p| self.inherited_flag(p, cached, store, own));
        if let Some(c) = self.controls.get_mut(id) {
            store(&mut c.cache, value);
        }
        value
    }

    /// Locked by itself or any ancestor.
    pub fn is_currently_locked(&mut self, id: ControlId) -> bool {
        self.inherited_flag(id, |c| c.locked, |c, v| c.locked = Some(v), |c| c.locked)
    }

    /// Disabled by itself or any ancestor.
    pub fn is_currently_disabled(&mut self, id: ControlId) -> bool {
        self.inherited_flag(id, |c| c.disabled, |c, v| c.disabled = Some(v), |c| !c.enabled)
    }

    /// Visible only when every ancestor is.
    pub fn is_currently_visible(&mut self, id: ControlId) -> bool {
        if !self.controls.contains_key(id) {
            return false;
        }
        !self.inherited_flag(id, |c| c.visible.map(|v| !v), |c, hidden| c.visible = Some(!hidden), |c| !c.visible)
    }

    /// The state this control renders with this frame.
    pub fn control_state(&mut self, id: ControlId) -> ControlState {
        let Some(c) = self.controls.get_mut(id) else { return ControlState::Default };
        if let Some(state) = c.cache.state {
            return state;
        }
        // Provisional value so copy_state_from cycles terminate.
        c.cache.state = Some(ControlState::Default);
        let state = self.derive_state(id);
        if let Some(c) = self.controls.get_mut(id) {
            c.cache.state = Some(state);
        }
        state
    }

    fn derive_state(&mut self, id: ControlId) -> ControlState {
        let c = &self.controls[id];
        if let Some(state) = c.locked_state {
            return state;
        }
        if let Some(source) = c.copy_state_from
            && source != id
            && self.controls.contains_key(source)
        {
            return self.control_state(source);
        }
        if c.interacted_timer > 0.0 {
            return ControlState::Interacted;
        }

        let checked = c.is_checked;
        if self.is_currently_locked(id) {
            return if checked { ControlState::Checked } else { ControlState::Default };
        }
        if self.is_currently_disabled(id) {
            return if checked { ControlState::DisabledChecked } else { ControlState::Disabled };
        }

        let targeted = self.targeted == Some(id);
        if targeted && self.input.left_down() {
            let hold = self.system_style_sheet.time_to_lock_interactive_state;
            self.controls[id].interacted_timer = hold;
            return ControlState::Interacted;
        }
        match (targeted, checked) {
            (true, true) => ControlState::TargetedChecked,
            (true, false) => ControlState::Targeted,
            (false, true) => ControlState::Checked,
            (false, false) => ControlState::Default,
        }
    }
}
