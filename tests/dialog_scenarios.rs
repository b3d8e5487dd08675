//! End-to-end dialog scenarios driven through the public API: a window,
//! a recording surface, and events fed to `Gui::dispatch`.
//!
//! Run with: cargo test --test dialog_scenarios -- --nocapture

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_gui::prelude::*;
use spark_gui::{DialogHandle, RecordingSurface, Rect, SurfaceRef};

// =============================================================================
// Fixtures
// =============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (Gui, Rc<RefCell<RecordingSurface>>) {
    init_tracing();
    let recording = Rc::new(RefCell::new(RecordingSurface::new()));
    let surface: SurfaceRef = recording.clone();
    (Gui::new(presets::flat(), surface, size(640, 480)), recording)
}

fn form() -> VerticalLayout {
    VerticalLayout::new()
        .child(Input::new("").id("name"))
        .child(Input::new("").id("email"))
        .child(Checkbox::new("Subscribe").id("subscribe"))
        .child(Slider::new(SliderOptions { max: 10.0, ..Default::default() }).unwrap().id("volume"))
        .child(Dropdown::new(["Red", "Green", "Blue"]).unwrap().id("color"))
}

fn rect_of(gui: &mut Gui, handle: &DialogHandle, id: &str) -> Rect {
    gui.dialog_mut(handle).and_then(|d| d.control(id)).map(|c| c.rect()).unwrap()
}

fn click(gui: &mut Gui, x: i32, y: i32) {
    gui.dispatch(&Event::press(x, y));
    gui.dispatch(&Event::release(x, y));
}

fn click_center(gui: &mut Gui, rect: Rect) {
    click(gui, rect.x + rect.width / 2, rect.y + rect.height / 2);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_form_values_follow_input() {
    let (mut gui, _) = setup();
    let handle = gui.push(Dialog::new(gui.context(), Frame::new(form()), DialogOptions::default()));

    gui.dispatch(&Event::key(Key::Tab));
    gui.dispatch(&Event::Text("Ada".into()));
    // text is committed when focus moves on
    assert_eq!(gui.dialog(&handle).unwrap().get_value("name"), Some(Value::Text(String::new())));
    gui.dispatch(&Event::key(Key::Tab));

    let subscribe = rect_of(&mut gui, &handle, "subscribe");
    click(&mut gui, subscribe.x + 5, subscribe.y + subscribe.height / 2);
    let volume = rect_of(&mut gui, &handle, "volume");
    click(&mut gui, volume.right() - 1, volume.y + volume.height / 2);
    gui.update(0.016);

    let values = gui.dialog(&handle).unwrap().get_values();
    assert_eq!(values.get("name"), Some(&Value::Text("Ada".into())));
    assert_eq!(values.get("email"), Some(&Value::Text(String::new())));
    assert_eq!(values.get("subscribe"), Some(&Value::Bool(true)));
    assert_eq!(values.get("volume"), Some(&Value::Number(10.0)));
    assert_eq!(values.get("color"), Some(&Value::Choice(Some("Red".into()))));
}

#[test]
fn test_dropdown_popup_round_trip() {
    let (mut gui, _) = setup();
    let handle = gui.push(Dialog::new(gui.context(), Frame::new(form()), DialogOptions::default()));

    let color = rect_of(&mut gui, &handle, "color");
    click_center(&mut gui, color);
    assert_eq!(gui.len(), 2);
    let popup = gui.dialogs()[0].rect();
    assert_eq!(popup.top(), color.y);

    // second row: 2px frame, 4px menu padding, 15px rows 4px apart
    click(&mut gui, popup.x + 10, popup.top() - 32);
    assert_eq!(gui.len(), 1);
    gui.update(0.016);
    assert_eq!(gui.dialog(&handle).unwrap().get_value("color"), Some(Value::Choice(Some("Green".into()))));
}

#[test]
fn test_press_outside_popup_closes_it_without_reopening() {
    let (mut gui, _) = setup();
    let handle = gui.push(Dialog::new(gui.context(), Frame::new(form()), DialogOptions::default()));
    let color = rect_of(&mut gui, &handle, "color");

    click_center(&mut gui, color);
    assert_eq!(gui.len(), 2);
    click_center(&mut gui, color);
    assert_eq!(gui.len(), 1);
    gui.update(0.016);
    assert_eq!(gui.dialog(&handle).unwrap().get_value("color"), Some(Value::Choice(Some("Red".into()))));
}

#[test]
fn test_enter_submits_after_last_field() {
    let (mut gui, _) = setup();
    let submitted = Rc::new(Cell::new(0));
    let sink = submitted.clone();
    let options = DialogOptions {
        on_enter: Some(Box::new(move |dialog: &mut Dialog| {
            sink.set(sink.get() + 1);
            dialog.close();
        })),
        ..Default::default()
    };
    gui.push(Dialog::new(gui.context(), Frame::new(form()), options));

    gui.dispatch(&Event::key(Key::Enter));
    gui.dispatch(&Event::key(Key::Enter));
    assert_eq!(submitted.get(), 0);
    gui.dispatch(&Event::key(Key::Enter));
    assert_eq!(submitted.get(), 1);
    assert!(gui.is_empty());
}

#[test]
fn test_closing_releases_every_allocation() {
    let (mut gui, recording) = setup();
    let content = Frame::new(
        VerticalLayout::new()
            .child(TitleFrame::new("Settings", form()))
            .child(Scrollable::new(form(), ScrollableOptions { max_height: Some(60), ..Default::default() }).unwrap()),
    );
    let handle = gui.push(Dialog::new(gui.context(), content, DialogOptions::default()));
    gui.update(0.016);
    assert!(recording.borrow().live_count() > 0);

    handle.close();
    gui.update(0.016);
    assert!(gui.is_empty());
    assert_eq!(recording.borrow().live_count(), 0);
}

#[test]
fn test_popup_message_stacks_above_and_closes() {
    let (mut gui, _) = setup();
    let handle = gui.push(Dialog::new(gui.context(), Frame::new(form()), DialogOptions::default()));
    gui.push(popup_message(gui.context(), "Saved"));
    assert_eq!(gui.len(), 2);

    // keys go to the topmost dialog first
    gui.dispatch(&Event::key(Key::Escape));
    assert_eq!(gui.len(), 1);
    assert!(gui.dialog(&handle).is_some());
}

#[test]
fn test_resize_keeps_dialog_on_screen() {
    let (mut gui, _) = setup();
    let options = DialogOptions { anchor: Anchor::TopLeft, offset: point(500, 0), ..Default::default() };
    let handle = gui.push(Dialog::new(gui.context(), Frame::new(form()), options));

    gui.dispatch(&Event::Resize { width: 320, height: 240 });
    gui.update(0.016);
    let rect = gui.dialog(&handle).unwrap().rect();
    assert!(rect.right() <= 320);
    assert_eq!(rect.top(), 240);
}
