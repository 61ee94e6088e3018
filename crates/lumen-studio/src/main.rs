//! Headless showcase: builds a settings window from the bundled theme, plays
//! a scripted sequence of pointer and keyboard frames against it, and prints
//! what the controls ended up holding.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::time::FrameClock;
use lumen_ui::prelude::*;

const SCREEN: Rect = Rect::new(0, 0, 820, 560);

// ── Form ──────────────────────────────────────────────────────────────────

/// Handles to the controls the script pokes at.
struct Form {
    window: ControlId,
    sound: ControlId,
    quality_high: ControlId,
    volume: ControlId,
    progress: ControlId,
    preset: ControlId,
    name: ControlId,
    age: ControlId,
    tint: ControlId,
    apply: ControlId,
}

fn named(ui: &mut UiSystem, id: ControlId, name: &str) -> Result<ControlId> {
    ui.control_mut(id)?.identifier = Some(name.to_string());
    Ok(id)
}

fn build_form(ui: &mut UiSystem) -> Result<Form> {
    let root = ui.root();
    let window = Panel::new()
        .anchor(Anchor::Center)
        .size(MeasureVector::pixels(560.0, 520.0))
        .vertical_scrollbar(true)
        .build(ui);
    ui.control_mut(window)?.draggable_mode = DraggableMode::DraggableConfinedToScreen;
    let window = named(ui, window, "window")?;
    ui.add_child(root, window)?;

    let add = |ui: &mut UiSystem, id: ControlId, name: &str| -> Result<ControlId> {
        let id = named(ui, id, name)?;
        ui.add_child(window, id)?;
        Ok(id)
    };

    let title = Paragraph::title("Settings").build(ui);
    add(ui, title, "title")?;
    let intro = Paragraph::new("Everything below is laid out by auto anchors and styled from the JSON theme.").build(ui);
    add(ui, intro, "intro")?;
    let line = HorizontalLine::new().build(ui);
    add(ui, line, "line")?;

    let sound = Checkbox::new("Enable sound").build(ui);
    let sound = add(ui, sound, "sound")?;
    let low = RadioButton::new("Low quality").checked(true).build(ui);
    add(ui, low, "quality_low")?;
    let high = RadioButton::new("High quality").build(ui);
    let quality_high = add(ui, high, "quality_high")?;

    let volume = Slider::new(Orientation::Horizontal).range(0, 10).steps_count(5).build(ui)?;
    let volume = add(ui, volume, "volume")?;
    let progress = ProgressBar::new().value(30).build(ui)?;
    let progress = add(ui, progress, "progress")?;

    let preset = DropDown::new()
        .placeholder("Choose a preset")
        .item("fast", "Fast")
        .item("balanced", "Balanced")
        .item("pretty", "Pretty")
        .build(ui);
    let preset = add(ui, preset, "preset")?;

    let name = TextInput::new().placeholder("Your name").max_length(24).build(ui);
    let name = add(ui, name, "name")?;
    let age = NumericInput::new().min(1.0).max(120.0).value(30.0).buttons(true).build(ui)?;
    let age = add(ui, age, "age")?;
    let tint = ColorSlider::new().build(ui);
    let tint = add(ui, tint, "tint")?;

    let spacer = RowsSpacer::new(1).build(ui);
    add(ui, spacer, "spacer")?;
    let apply = Button::new("Apply").build(ui);
    let apply = add(ui, apply, "apply")?;

    Ok(Form { window, sound, quality_high, volume, progress, preset, name, age, tint, apply })
}

// ── Driver ────────────────────────────────────────────────────────────────

/// Feeds frames to the UI the way a host main loop would.
struct Driver {
    ui: UiSystem,
    dl: DrawList,
    raw: RawInput,
    clock: FrameClock,
}

impl Driver {
    fn frame(&mut self) {
        let time = self.clock.tick();
        self.ui.update(&self.dl, self.raw.clone(), time.dt);
        self.dl.clear();
        self.ui.draw(&mut self.dl);
        self.raw.text_commands.clear();
    }

    fn center_of(&self, id: ControlId) -> Result<Point> {
        Ok(self.ui.control(id)?.last_visible_bounding_rect().center())
    }

    fn move_to(&mut self, p: Point) {
        self.raw.mouse_position = p;
        self.frame();
    }

    fn click(&mut self, p: Point) {
        self.move_to(p);
        self.raw.left_button = true;
        self.frame();
        self.raw.left_button = false;
        self.frame();
    }

    fn click_control(&mut self, id: ControlId) -> Result<()> {
        let p = self.center_of(id)?;
        self.click(p);
        Ok(())
    }

    fn drag(&mut self, from: Point, to: Point) {
        self.move_to(from);
        self.raw.left_button = true;
        self.frame();
        self.move_to(to);
        self.raw.left_button = false;
        self.frame();
    }

    fn type_text(&mut self, text: &str) {
        self.raw.text_commands = text.chars().map(TextCommand::Char).collect();
        self.frame();
    }
}

fn theme_folder() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("theme")
}

fn identifier(ui: &UiSystem, id: ControlId) -> String {
    ui.control(id)
        .ok()
        .and_then(|c| c.identifier.clone())
        .unwrap_or_else(|| format!("{id:?}"))
}

fn run_script(d: &mut Driver, form: &Form) -> Result<()> {
    println!("  [1] toggling sound and picking high quality");
    d.click_control(form.sound)?;
    d.click_control(form.quality_high)?;

    println!("  [2] dragging the volume handle to the far right");
    let track = d.ui.control(form.volume)?.last_bounding_rect();
    d.drag(Point::new(track.left() + 2, track.center().y), Point::new(track.right() + 40, track.center().y));
    let volume = d.ui.slider_value(form.volume)?;
    d.ui.set_slider_value_safe(form.progress, volume * 10)?;

    println!("  [3] opening the preset list and choosing the second row");
    d.click_control(form.preset)?;
    let header = d.ui.control(form.preset)?.last_bounding_rect();
    let row = Point::new(header.center().x, header.bottom() + header.height + header.height / 2);
    d.click(row);

    println!("  [4] typing a name and bumping the age");
    d.click_control(form.name)?;
    d.type_text("Ada");
    let (_, plus) = match &d.ui.control(form.age)?.kind {
        lumen_ui::controls::ControlKind::NumericInput(n) => n.buttons().ok_or_else(|| anyhow!("age input has no steppers"))?,
        _ => return Err(anyhow!("age is not a numeric input")),
    };
    d.click_control(plus)?;

    println!("  [5] matching the tint to orange");
    d.ui.set_color_value(form.tint, &d.dl, Color::rgb(255, 140, 0))?;

    println!("  [6] scrolling the window and pressing apply");
    d.move_to(d.center_of(form.window)?);
    d.raw.wheel -= 120;
    d.frame();
    d.click_control(form.apply)?;
    Ok(())
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║          LUMEN STUDIO  (headless)      ║");
    println!("  ║   retained controls  ·  json themes    ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let theme = theme_folder();
    let mut ui = UiSystem::init(&theme).with_context(|| format!("loading theme from {}", theme.display()))?;
    ui.events.set(EventKind::ValueChanged, |ui, id| log::info!("value changed: {}", identifier(ui, id)));
    ui.events.set(EventKind::Click, |ui, id| log::debug!("click: {}", identifier(ui, id)));

    let mut dl = DrawList::new(SCREEN);
    dl.textures.insert_with("hue", 256, 1, |x, _| hue(x as f32 / 255.0));

    let form = build_form(&mut ui).context("building the settings form")?;
    let mut driver = Driver { ui, dl, raw: RawInput::default(), clock: FrameClock::new() };
    driver.frame();
    driver.frame();

    run_script(&mut driver, &form).context("running the input script")?;

    let ui = &driver.ui;
    println!();
    println!("  sound     > {}", ui.is_checked(form.sound)?);
    println!("  quality   > {}", if ui.is_checked(form.quality_high)? { "high" } else { "low" });
    println!("  volume    > {}", ui.slider_value(form.volume)?);
    println!("  progress  > {}%", ui.slider_value(form.progress)?);
    println!("  preset    > {}", ui.selected_item(form.preset)?.map_or("-", |i| i.text.as_str()));
    println!("  name      > {}", ui.text_input_value(form.name)?);
    println!("  age       > {}", ui.numeric_value(form.age)?.map_or("-".to_string(), |v| v.to_string()));
    println!("  tint      > {:?}", ui.color_value(form.tint)?);
    println!("  scroll    > {}px", ui.scroll_offset(form.window));
    println!("  drawn     > {} items in the last frame", driver.dl.items().len());
    println!();
    Ok(())
}

/// Fully saturated hue ramp, `t` in [0, 1].
fn hue(t: f32) -> Color {
    let h = (t.clamp(0.0, 1.0) * 6.0) % 6.0;
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let byte = |v: f32| (v * 255.0).round() as u8;
    Color::rgb(byte(r), byte(g), byte(b))
}
