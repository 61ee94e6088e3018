//! The UI orchestrator: owns the control arena, the default stylesheets and
//! the per-frame input, and drives one `update` then one `draw` per frame.

use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use lumen_engine::coords::Rect;
use lumen_engine::render::Renderer;
use slotmap::SlotMap;

use crate::control::{Anchor, Control, ControlEvents, ControlId, DragState};
use crate::controls::ControlKind;
use crate::error::Result;
use crate::input::{InputState, RawInput};
use crate::measure::MeasureVector;
use crate::style::{FileStyleSheetLoader, StyleSheet, StyleSheetLoader, SystemStyleSheet};

/// Work queued during the draw pass, run once the whole tree is drawn.
pub type DeferredAction = Box<dyn FnOnce(&mut UiSystem, &mut dyn Renderer)>;

/// Drains chained deferred actions at most this many rounds per frame.
const MAX_DEFERRED_ROUNDS: usize = 16;

pub struct UiSystem {
    pub(crate) controls: SlotMap<ControlId, Control>,
    pub(crate) root: ControlId,

    pub system_style_sheet: SystemStyleSheet,
    style_sheets: HashMap<String, Rc<StyleSheet>>,
    empty_style_sheet: Rc<StyleSheet>,

    /// Global handlers, fired after the control's own for every event.
    pub events: ControlEvents,

    pub(crate) input: InputState,
    prev_raw: RawInput,
    pub(crate) targeted: Option<ControlId>,
    pub(crate) pressed_on: Option<ControlId>,
    pub(crate) focused: Option<ControlId>,
    pub(crate) drag: Option<DragState>,

    post_draw: Vec<DeferredAction>,
    /// Seconds since creation, advanced by `update`.
    pub(crate) time: f32,
    pub(crate) screen_bounds: Rect,
    frame_index: u64,
}

impl UiSystem {
    /// A system with no default stylesheets; every control type starts with
    /// an empty sheet until [`set_default_style_sheet`](Self::set_default_style_sheet).
    pub fn new(system_style_sheet: SystemStyleSheet) -> Self {
        let empty_style_sheet = Rc::new(StyleSheet::default());
        let mut controls = SlotMap::with_key();
        let root = controls.insert(root_control(empty_style_sheet.clone()));
        Self {
            controls,
            root,
            system_style_sheet,
            style_sheets: HashMap::new(),
            empty_style_sheet,
            events: ControlEvents::default(),
            input: InputState::default(),
            prev_raw: RawInput::default(),
            targeted: None,
            pressed_on: None,
            focused: None,
            drag: None,
            post_draw: Vec::new(),
            time: 0.0,
            screen_bounds: Rect::default(),
            frame_index: 0,
        }
    }

    /// Loads `<theme_folder>/system_style.json` and every default stylesheet
    /// it lists.
    pub fn init(theme_folder: impl AsRef<Path>) -> Result<Self> {
        let folder = theme_folder.as_ref();
        let system = SystemStyleSheet::load(folder)?;
        log::info!("loading theme '{}' from {}", system.theme_identifier, folder.display());
        let mut sys = Self::new(system);
        sys.load_default_style_sheets(&FileStyleSheetLoader::new(folder))?;
        Ok(sys)
    }

    /// Loads every entry of `load_default_stylesheets` through `loader`.
    pub fn load_default_style_sheets(&mut self, loader: &dyn StyleSheetLoader) -> Result<()> {
        let entries: Vec<(String, String)> = self
            .system_style_sheet
            .load_default_stylesheets
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (type_name, file) in entries {
            let sheet = loader.load_style_sheet(&file)?;
            log::debug!("default stylesheet for '{type_name}' loaded from '{file}'");
            self.set_default_style_sheet(type_name, sheet);
        }
        Ok(())
    }

    /// Drops every control and all interaction state, then recreates the root.
    /// Default stylesheets and global handlers are kept.
    pub fn reset(&mut self) {
        self.controls.clear();
        self.root = self.controls.insert(root_control(self.empty_style_sheet.clone()));
        self.targeted = None;
        self.pressed_on = None;
        self.focused = None;
        self.drag = None;
        self.post_draw.clear();
        self.input = InputState::default();
        self.prev_raw = RawInput::default();
        log::debug!("ui system reset");
    }

    pub fn root(&self) -> ControlId {
        self.root
    }

    /// The stylesheet new controls of `type_name` get. Unknown types share an
    /// empty sheet, so every property falls back to its caller default.
    pub fn default_style_sheet(&self, type_name: &str) -> Rc<StyleSheet> {
        match self.style_sheets.get(type_name) {
            Some(sheet) => sheet.clone(),
            None => {
                log::debug!("no default stylesheet for '{type_name}'");
                self.empty_style_sheet.clone()
            }
        }
    }

    /// Controls built afterwards pick this up; existing ones keep their sheet.
    pub fn set_default_style_sheet(&mut self, type_name: impl Into<String>, sheet: StyleSheet) {
        self.style_sheets.insert(type_name.into(), Rc::new(sheet));
    }

    pub fn has_default_style_sheet(&self, type_name: &str) -> bool {
        self.style_sheets.contains_key(type_name)
    }

    pub fn targeted_control(&self) -> Option<ControlId> {
        self.targeted
    }

    pub fn focused_control(&self) -> Option<ControlId> {
        self.focused
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Screen rect used for the root in the last `draw`.
    pub fn screen_bounds(&self) -> Rect {
        self.screen_bounds
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Input, targeting, interaction dispatch and per-control updates.
    ///
    /// Layout happens in `draw`, so hit-testing uses the rects of the
    /// previous frame.
    pub fn update(&mut self, renderer: &dyn Renderer, raw: RawInput, dt: f32) {
        self.time += dt;
        self.frame_index += 1;
        let previous = std::mem::replace(&mut self.prev_raw, raw.clone());
        self.input = InputState::new(raw, previous);

        self.reset_frame_caches();
        self.update_targeted_control();
        self.dispatch_interactions(renderer);
        self.update_control(self.root, renderer, dt);
    }

    /// Lays out and draws the tree against the renderer's screen, then runs
    /// the deferred actions queued during the pass.
    pub fn draw(&mut self, renderer: &mut dyn Renderer) {
        let screen = renderer.screen_bounds();
        self.screen_bounds = screen;
        self.draw_control(self.root, renderer, screen, None);

        for _ in 0..MAX_DEFERRED_ROUNDS {
            if self.post_draw.is_empty() {
                return;
            }
            for action in std::mem::take(&mut self.post_draw) {
                action(self, renderer);
            }
        }
        if !self.post_draw.is_empty() {
            log::warn!("dropping {} deferred actions still queued after {MAX_DEFERRED_ROUNDS} rounds", self.post_draw.len());
            self.post_draw.clear();
        }
    }

    /// Queues `action` to run after the current draw pass.
    pub fn run_after_drawing_controls(&mut self, action: impl FnOnce(&mut UiSystem, &mut dyn Renderer) + 'static) {
        self.post_draw.push(Box::new(action));
    }
}

fn root_control(sheet: Rc<StyleSheet>) -> Control {
    let mut c = Control::new(ControlKind::Panel, sheet);
    c.anchor = Anchor::TopLeft;
    c.size = MeasureVector::percent(100.0, 100.0);
    c.identifier = Some("root".to_string());
    c
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use lumen_engine::render::DrawList;

    use super::*;
    use crate::controls::{Button, Panel};
    use crate::test_support::{renderer, system, Harness};

    #[test]
    fn root_fills_the_screen() {
        let mut sys = system();
        let mut dl = renderer();
        sys.draw(&mut dl);
        let root = sys.root();
        assert_eq!(sys.control(root).unwrap().last_bounding_rect(), Rect::new(0, 0, 800, 600));
        assert_eq!(sys.screen_bounds(), Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn missing_default_sheet_falls_back_to_empty() {
        let sys = system();
        let a = sys.default_style_sheet("Nope");
        let b = sys.default_style_sheet("AlsoNope");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(*a, StyleSheet::default());
    }

    #[test]
    fn default_sheet_applies_to_new_controls() {
        let mut sys = system();
        let sheet = StyleSheet { min_height: Some(99), ..Default::default() };
        sys.set_default_style_sheet("Panel", sheet.clone());
        let id = Panel::new().build(&mut sys);
        assert_eq!(*sys.control(id).unwrap().style_sheet, sheet);
    }

    #[test]
    fn deferred_actions_run_after_tree_in_order() {
        let mut h = Harness::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        h.sys.run_after_drawing_controls(move |sys, _| {
            a.borrow_mut().push("first");
            let c = a.clone();
            sys.run_after_drawing_controls(move |_, _| c.borrow_mut().push("chained"));
        });
        h.sys.run_after_drawing_controls(move |_, _| b.borrow_mut().push("second"));
        h.frame();
        assert_eq!(*log.borrow(), vec!["first", "second", "chained"]);

        h.frame();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn reset_drops_controls_and_interaction() {
        let mut h = Harness::new();
        let root = h.sys.root();
        let button = Button::new("ok").build(&mut h.sys);
        h.sys.add_child(root, button).unwrap();
        h.frame();
        h.move_to(10, 10);
        assert_eq!(h.sys.targeted_control(), Some(button));

        h.sys.reset();
        assert!(!h.sys.contains(button));
        assert_eq!(h.sys.targeted_control(), None);
        assert!(h.sys.control(h.sys.root()).unwrap().children().is_empty());
    }

    #[test]
    fn init_reads_theme_folder() {
        let dir = std::env::temp_dir().join(format!("lumen-theme-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join(SystemStyleSheet::FILE_NAME),
            r#"{ "theme_identifier": "test", "load_default_stylesheets": { "Panel": "panel.json" } }"#,
        )
        .unwrap();
        std::fs::write(dir.join("panel.json"), r#"{ "min_height": 12 }"#).unwrap();

        let sys = UiSystem::init(&dir).unwrap();
        assert_eq!(sys.system_style_sheet.theme_identifier, "test");
        assert!(sys.has_default_style_sheet("Panel"));
        assert_eq!(sys.default_style_sheet("Panel").min_height, Some(12));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn init_names_missing_theme_file() {
        let err = UiSystem::init("/definitely/not/a/theme").err().unwrap();
        assert!(err.to_string().contains("system_style.json"));
    }

    #[test]
    fn update_uses_given_renderer() {
        let mut sys = system();
        let dl = DrawList::new(Rect::new(0, 0, 100, 100));
        sys.update(&dl, RawInput::default(), 0.5);
        assert_eq!(sys.time(), 0.5);
        assert_eq!(sys.frame_index(), 1);
    }
}
