use crate::control::ControlId;
use crate::system::UiSystem;

/// Callback invoked with the system and the control the event happened on.
///
/// Handlers get full mutable access to the system; the handler slot is empty
/// while it runs, so a handler that re-triggers its own event is not re-entered.
pub type Handler = Box<dyn FnMut(&mut UiSystem, ControlId)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseEnter,
    MouseLeave,
    LeftMousePressed,
    LeftMouseReleased,
    Click,
    RightMousePressed,
    MouseWheel,
    ValueChanged,
    Checked,
    Unchecked,
    StartDrag,
    StopDrag,
    Dragged,
    Focused,
    Unfocused,
}

impl EventKind {
    pub const COUNT: usize = 15;

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

/// One optional handler per [`EventKind`].
pub struct ControlEvents {
    handlers: [Option<Handler>; EventKind::COUNT],
}

impl Default for ControlEvents {
    fn default() -> Self {
        Self { handlers: std::array::from_fn(|_| None) }
    }
}

impl ControlEvents {
    /// Installs `handler`, replacing any previous one for `kind`.
    pub fn set(&mut self, kind: EventKind, handler: impl FnMut(&mut UiSystem, ControlId) + 'static) {
        self.handlers[kind.index()] = Some(Box::new(handler));
    }

    pub fn clear(&mut self, kind: EventKind) {
        self.handlers[kind.index()] = None;
    }

    pub fn has(&self, kind: EventKind) -> bool {
        self.handlers[kind.index()].is_some()
    }

    pub(crate) fn take(&mut self, kind: EventKind) -> Option<Handler> {
        self.handlers[kind.index()].take()
    }

    /// Puts a taken handler back unless the handler installed a replacement.
    pub(crate) fn restore(&mut self, kind: EventKind, handler: Handler) {
        let slot = &mut self.handlers[kind.index()];
        if slot.is_none() {
            *slot = Some(handler);
        }
    }
}

impl UiSystem {
    /// Runs the control's handler for `kind`, then the system-wide one.
    pub(crate) fn fire(&mut self, id: ControlId, kind: EventKind) {
        log::trace!("event {kind:?} on {id:?}");

        if let Some(mut handler) = self.controls.get_mut(id).and_then(|c| c.events.take(kind)) {
            handler(self, id);
            if let Some(c) = self.controls.get_mut(id) {
                c.events.restore(kind, handler);
            }
        }

        if let Some(mut handler) = self.events.take(kind) {
            handler(self, id);
            self.events.restore(kind, handler);
        }
    }
}
