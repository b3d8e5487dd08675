//! Ready-made popups: a message with an Ok button and an Ok/Cancel
//! confirmation. Both sit at the window center and close themselves.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Dialog, DialogOptions, GuiContext};
use crate::controls::Button;
use crate::frame::Frame;
use crate::layout::{HorizontalLayout, VerticalLayout};
use crate::primitives::Label;
use crate::types::HAlign;

type Shared = Rc<RefCell<Box<dyn FnMut()>>>;

fn shared(callback: impl FnMut() + 'static) -> Shared {
    Rc::new(RefCell::new(Box::new(callback)))
}

fn run(callback: &Shared) {
    let mut callback = callback.borrow_mut();
    (*callback)();
}

/// A button that runs `callback` and closes its dialog.
fn closing_button(text: &str, id: &str, callback: Option<Shared>) -> Button {
    Button::new(text).id(id).on_click(move |ctx| {
        if let Some(callback) = &callback {
            run(callback);
        }
        ctx.close_dialog();
    })
}

/// A dialog showing `text` above an Ok button. Enter and Escape close it.
pub fn popup_message(gui: &GuiContext, text: impl Into<String>) -> Dialog {
    let content = VerticalLayout::new()
        .child(Label::new(text))
        .child(closing_button("Ok", "ok", None));
    Dialog::new(
        gui,
        Frame::new(content),
        DialogOptions {
            on_enter: Some(Box::new(|dialog: &mut Dialog| dialog.close())),
            on_escape: Some(Box::new(|dialog: &mut Dialog| dialog.close())),
            ..Default::default()
        },
    )
}

/// A dialog asking `text` with Ok and Cancel. Enter counts as Ok and
/// Escape as Cancel; either way the dialog closes after the callback.
pub fn popup_confirm(
    gui: &GuiContext,
    text: impl Into<String>,
    on_ok: impl FnMut() + 'static,
    on_cancel: impl FnMut() + 'static,
) -> Dialog {
    let on_ok = shared(on_ok);
    let on_cancel = shared(on_cancel);
    let buttons = HorizontalLayout::new()
        .child(closing_button("Ok", "ok", Some(on_ok.clone())))
        .child(closing_button("Cancel", "cancel", Some(on_cancel.clone())));
    let content = VerticalLayout::new().align(HAlign::Center).child(Label::new(text)).child(buttons);

    let finish = |callback: Shared| -> Box<dyn FnMut(&mut Dialog)> {
        Box::new(move |dialog: &mut Dialog| {
            run(&callback);
            dialog.close();
        })
    };
    Dialog::new(
        gui,
        Frame::new(content),
        DialogOptions {
            on_enter: Some(finish(on_ok)),
            on_escape: Some(finish(on_cancel)),
            ..Default::default()
        },
    )
}
