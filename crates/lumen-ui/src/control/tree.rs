use crate::control::{Control, ControlId};
use crate::error::{Result, UiError};
use crate::system::UiSystem;

/// Which child list of the parent a control lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildList {
    Regular,
    Internal,
    InternalTopMost,
}

impl UiSystem {
    /// Inserts a detached control into the arena.
    pub fn insert(&mut self, control: Control) -> ControlId {
        self.controls.insert(control)
    }

    pub fn contains(&self, id: ControlId) -> bool {
        self.controls.contains_key(id)
    }

    pub fn control(&self, id: ControlId) -> Result<&Control> {
        self.controls.get(id).ok_or(UiError::UnknownControl(id))
    }

    pub fn control_mut(&mut self, id: ControlId) -> Result<&mut Control> {
        self.controls.get_mut(id).ok_or(UiError::UnknownControl(id))
    }

    // ── parenting ─────────────────────────────────────────────────────────

    /// Appends `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        let at = self.control(parent)?.children.len();
        self.attach(parent, child, ChildList::Regular, at)
    }

    /// Inserts `child` at `index` (clamped to the child count).
    pub fn add_child_at(&mut self, parent: ControlId, child: ControlId, index: usize) -> Result<()> {
        self.attach(parent, child, ChildList::Regular, index)
    }

    /// Parts of a composite control: not visible to [`children`](Control::children).
    pub(crate) fn add_internal_child(&mut self, parent: ControlId, child: ControlId, top_most: bool) -> Result<()> {
        let list = if top_most { ChildList::InternalTopMost } else { ChildList::Internal };
        self.attach(parent, child, list, usize::MAX)
    }

    fn attach(&mut self, parent: ControlId, child: ControlId, list: ChildList, index: usize) -> Result<()> {
        self.control(parent)?;
        if let Some(existing) = self.control(child)?.parent {
            return Err(UiError::AlreadyHasParent { child, parent: existing });
        }
        if child == parent || self.is_descendant_of(parent, child) {
            // A control can't contain its own ancestor.
            return Err(UiError::AlreadyHasParent { child, parent });
        }

        let p = &mut self.controls[parent];
        let v = match list {
            ChildList::Regular => &mut p.children,
            ChildList::Internal => &mut p.internal_children,
            ChildList::InternalTopMost => &mut p.internal_children_top_most,
        };
        v.insert(index.min(v.len()), child);

        let c = &mut self.controls[child];
        c.parent = Some(parent);
        c.is_internal = list != ChildList::Regular;
        log::trace!("attached {child:?} to {parent:?} ({list:?})");
        Ok(())
    }

    /// Detaches `child` from `parent`. The child stays alive, parentless.
    /// Internal parts of composite controls are not removable.
    pub fn remove_child(&mut self, parent: ControlId, child: ControlId) -> Result<()> {
        let p = self.control_mut(parent)?;
        let Some(i) = p.children.iter().position(|&c| c == child) else {
            return Err(UiError::NotAChild { parent, child });
        };
        p.children.remove(i);
        if let Some(c) = self.controls.get_mut(child) {
            c.parent = None;
        }
        self.forget_interaction(child);
        Ok(())
    }

    /// Detaches the control from its parent, if any.
    pub fn remove_self(&mut self, id: ControlId) -> Result<()> {
        match self.control(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Removes the control and its whole subtree from the arena.
    pub fn destroy(&mut self, id: ControlId) -> Result<()> {
        if id == self.root() {
            log::warn!("refusing to destroy the root control");
            return Ok(());
        }
        self.remove_self(id)?;
        let mut doomed = Vec::new();
        self.walk_all(id, &mut |cid| doomed.push(cid));
        for cid in doomed {
            self.forget_interaction(cid);
            self.controls.remove(cid);
        }
        Ok(())
    }

    /// Clears targeting/focus/drag references to a control leaving the tree.
    fn forget_interaction(&mut self, id: ControlId) {
        for slot in [&mut self.targeted, &mut self.pressed_on, &mut self.focused] {
            if *slot == Some(id) {
                *slot = None;
            }
        }
        if self.drag.is_some_and(|d| d.id == id) {
            self.drag = None;
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// True when `ancestor` appears on `id`'s parent chain.
    pub fn is_descendant_of(&self, id: ControlId, ancestor: ControlId) -> bool {
        let mut cur = self.controls.get(id).and_then(|c| c.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.controls.get(p).and_then(|c| c.parent);
        }
        false
    }

    /// Regular children, in paint order.
    pub fn iterate_children(&self, id: ControlId) -> impl Iterator<Item = ControlId> + '_ {
        self.controls.get(id).into_iter().flat_map(|c| c.children.iter().copied())
    }

    /// Pre-order walk of `id` and its regular descendants.
    /// The visitor returns `false` to stop descending into a subtree.
    pub fn walk(&self, id: ControlId, visit: &mut dyn FnMut(ControlId, &Control) -> bool) {
        let Some(c) = self.controls.get(id) else { return };
        if !visit(id, c) {
            return;
        }
        for &child in &c.children {
            self.walk(child, visit);
        }
    }

    /// Every descendant including internal parts.
    pub(crate) fn walk_all(&self, id: ControlId, visit: &mut dyn FnMut(ControlId)) {
        let Some(c) = self.controls.get(id) else { return };
        visit(id);
        for list in c.lists_in_draw_order() {
            for &child in list {
                self.walk_all(child, visit);
            }
        }
    }

    /// First control (pre-order, starting at `from`) with this identifier.
    pub fn find_by_identifier(&self, from: ControlId, identifier: &str) -> Option<ControlId> {
        let mut found = None;
        self.walk(from, &mut |id, c| {
            if found.is_none() && c.identifier.as_deref() == Some(identifier) {
                found = Some(id);
            }
            found.is_none()
        });
        found
    }

    // ── ordering ──────────────────────────────────────────────────────────

    /// Moves the control last among its siblings: drawn on top, hit first.
    pub fn bring_to_front(&mut self, id: ControlId) -> Result<()> {
        self.reorder(id, |v, i| {
            let c = v.remove(i);
            v.push(c);
        })
    }

    /// Moves the control first among its siblings.
    pub fn send_to_back(&mut self, id: ControlId) -> Result<()> {
        self.reorder(id, |v, i| {
            let c = v.remove(i);
            v.insert(0, c);
        })
    }

    fn reorder(&mut self, id: ControlId, f: impl FnOnce(&mut Vec<ControlId>, usize)) -> Result<()> {
        let Some(parent) = self.control(id)?.parent else { return Ok(()) };
        let p = self.control_mut(parent)?;
        let Some(i) = p.children.iter().position(|&c| c == id) else {
            return Err(UiError::NotAChild { parent, child: id });
        };
        f(&mut p.children, i);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::controls::{Button, Orientation, Panel, Slider};
    use crate::error::UiError;
    use crate::test_support::system;

    #[test]
    fn second_parent_is_rejected() {
        let mut sys = system();
        let root = sys.root();
        let a = Panel::new().build(&mut sys);
        let b = Panel::new().build(&mut sys);
        let child = Panel::new().build(&mut sys);
        sys.add_child(root, a).unwrap();
        sys.add_child(root, b).unwrap();
        sys.add_child(a, child).unwrap();

        let err = sys.add_child(b, child).unwrap_err();
        assert!(matches!(err, UiError::AlreadyHasParent { parent, .. } if parent == a));
        assert_eq!(sys.control(child).unwrap().parent(), Some(a));
        assert!(sys.control(b).unwrap().children().is_empty());
    }

    #[test]
    fn cycles_are_rejected() {
        let mut sys = system();
        let a = Panel::new().build(&mut sys);
        let b = Panel::new().build(&mut sys);
        sys.add_child(a, b).unwrap();
        assert!(sys.add_child(b, a).is_err());
        assert!(sys.add_child(a, a).is_err());
    }

    #[test]
    fn remove_child_requires_membership() {
        let mut sys = system();
        let root = sys.root();
        let a = Panel::new().build(&mut sys);
        assert!(matches!(sys.remove_child(root, a), Err(UiError::NotAChild { .. })));

        sys.add_child(root, a).unwrap();
        sys.remove_child(root, a).unwrap();
        assert_eq!(sys.control(a).unwrap().parent(), None);
        // Detached controls can be re-parented.
        sys.add_child(root, a).unwrap();
    }

    #[test]
    fn add_child_at_and_reordering() {
        let mut sys = system();
        let root = sys.root();
        let a = Panel::new().build(&mut sys);
        let b = Panel::new().build(&mut sys);
        let c = Panel::new().build(&mut sys);
        sys.add_child(root, a).unwrap();
        sys.add_child(root, b).unwrap();
        sys.add_child_at(root, c, 0).unwrap();
        assert_eq!(sys.iterate_children(root).collect::<Vec<_>>(), vec![c, a, b]);

        sys.bring_to_front(c).unwrap();
        assert_eq!(sys.iterate_children(root).collect::<Vec<_>>(), vec![a, b, c]);
        sys.send_to_back(b).unwrap();
        assert_eq!(sys.iterate_children(root).collect::<Vec<_>>(), vec![b, a, c]);
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut sys = system();
        let root = sys.root();
        let a = Panel::new().build(&mut sys);
        let b = Panel::new().build(&mut sys);
        sys.add_child(root, a).unwrap();
        sys.add_child(a, b).unwrap();

        sys.destroy(a).unwrap();
        assert!(!sys.contains(a));
        assert!(!sys.contains(b));
        assert_eq!(sys.iterate_children(root).count(), 0);
    }

    #[test]
    fn find_and_descendants() {
        let mut sys = system();
        let root = sys.root();
        let a = Panel::new().build(&mut sys);
        let b = Panel::new().build(&mut sys);
        sys.control_mut(b).unwrap().identifier = Some("target".into());
        sys.add_child(root, a).unwrap();
        sys.add_child(a, b).unwrap();

        assert_eq!(sys.find_by_identifier(root, "target"), Some(b));
        assert_eq!(sys.find_by_identifier(root, "missing"), None);
        assert!(sys.is_descendant_of(b, root));
        assert!(!sys.is_descendant_of(a, b));
    }

    #[test]
    fn internal_parts_cannot_be_detached() {
        let mut sys = system();
        let root = sys.root();
        let button = Button::new("OK").build(&mut sys);
        sys.add_child(root, button).unwrap();
        let label = sys.checked_label(button).unwrap().unwrap();

        assert!(matches!(sys.remove_child(button, label), Err(UiError::NotAChild { .. })));
        assert!(matches!(sys.remove_self(label), Err(UiError::NotAChild { .. })));
        assert!(sys.bring_to_front(label).is_err());
        assert_eq!(sys.control(label).unwrap().parent(), Some(button));

        let slider = Slider::new(Orientation::Horizontal).build(&mut sys).unwrap();
        let handle = sys.control(slider).unwrap().kind.slider().unwrap().handle().unwrap();
        assert!(sys.remove_self(handle).is_err());
        assert_eq!(sys.control(handle).unwrap().parent(), Some(slider));
    }
}
