//! Built-in theme.
//!
//! `flat()` skins every widget from one 128x128 atlas (`spark-flat.png`).
//! Backends that cannot load it still get correct geometry: only the texture
//! lookups change, never the layout.

use std::rc::Rc;

use super::{ImageTemplate, Scope, Theme};
use crate::renderer::Texture;
use crate::types::{Color, insets, point};

/// Name of the atlas the flat theme refers to.
pub const FLAT_ATLAS: &str = "spark-flat.png";

fn frame(tex: &Rc<Texture>, region: [i32; 4], padding: [i32; 4]) -> ImageTemplate {
    let [_, _, w, h] = region;
    ImageTemplate::frame(tex, region, [4, 4, w - 8, h - 8], padding)
}

fn line(tex: &Rc<Texture>, region: [i32; 4]) -> ImageTemplate {
    let [_, _, w, h] = region;
    ImageTemplate::frame(tex, region, [2, 0, w - 4, h], [0, 0, 0, 0])
}

/// Scrollbar skin; `names` are the start, end, start-max and end-max keys.
fn scrollbar(tex: &Rc<Texture>, row: i32, names: [&str; 4]) -> Scope {
    let cell = |col: i32| [col * 8, row, 8, 8];
    Scope::new()
        .with(names[0], ImageTemplate::texture(tex, cell(0)))
        .with(names[1], ImageTemplate::texture(tex, cell(1)))
        .with("image-space", ImageTemplate::frame(tex, cell(2), [2, 2, 4, 4], [0, 0, 0, 0]))
        .with("image-bar", ImageTemplate::frame(tex, cell(3), [2, 2, 4, 4], [0, 0, 0, 0]))
        .with(names[2], ImageTemplate::texture(tex, cell(4)))
        .with(names[3], ImageTemplate::texture(tex, cell(5)))
}

/// The default flat theme.
pub fn flat() -> Theme {
    let tex = Texture::new(FLAT_ATLAS, 128, 128);

    let root = Scope::new()
        .with("font", "Lucida Grande")
        .with("font_size", 12)
        .with("font_size_small", 10)
        .with("text_color", Color::WHITE)
        .with("gui_color", Color::WHITE)
        .with("highlight_color", Color::WHITE.with_alpha(64))
        .with("disabled_color", Color::rgb(160, 160, 160))
        .scope("frame", Scope::new().with("image", frame(&tex, [0, 0, 16, 16], [6, 6, 6, 6])))
        .scope(
            "button",
            Scope::new()
                .with("image-up", frame(&tex, [16, 0, 16, 16], [6, 6, 4, 4]))
                .with("image-down", frame(&tex, [32, 0, 16, 16], [6, 6, 4, 4]))
                .with("image-highlight", frame(&tex, [48, 0, 16, 16], [6, 6, 4, 4]))
                .with("text_color", Color::BLACK),
        )
        .scope(
            "checkbox",
            Scope::new()
                .with("image-checked", ImageTemplate::texture(&tex, [32, 16, 12, 12]))
                .with("image-unchecked", ImageTemplate::texture(&tex, [48, 16, 12, 12]))
                .with("image-highlight", ImageTemplate::texture(&tex, [64, 16, 12, 12]))
                .with("padding", 4),
        )
        .scope(
            "slider",
            Scope::new()
                .with("image-bar", line(&tex, [0, 32, 16, 6]))
                .with("image-knob", ImageTemplate::texture(&tex, [16, 32, 8, 16]))
                .with("image-step", ImageTemplate::texture(&tex, [24, 32, 2, 8]))
                .with("padding", insets(4, 4, 5, 5))
                .with("knob_offset", point(-4, -5))
                .with("step_offset", point(-1, -1)),
        )
        .scope(
            "input",
            Scope::new()
                .with("image", frame(&tex, [0, 16, 16, 16], [4, 4, 4, 4]))
                .with("image-highlight", frame(&tex, [16, 16, 16, 16], [4, 4, 4, 4]))
                .with("image-caret", ImageTemplate::texture(&tex, [32, 32, 2, 2]))
                .with("text_color", Color::BLACK),
        )
        .scope(
            "menuoption",
            Scope::new()
                .with("image-highlight", frame(&tex, [64, 0, 16, 16], [4, 4, 2, 2]))
                .with("highlight_color", Color::rgb(255, 235, 128))
                .scope("selection", Scope::new().with("text_color", Color::BLACK)),
        )
        .scope(
            "dropdown",
            Scope::new()
                .with("image", frame(&tex, [80, 0, 16, 16], [6, 6, 4, 4]))
                .with("image-highlight", frame(&tex, [96, 0, 16, 16], [6, 6, 4, 4]))
                .scope("pulldown", Scope::new().with("image", frame(&tex, [0, 0, 16, 16], [2, 2, 2, 2]))),
        )
        .scope(
            "hscrollbar",
            scrollbar(&tex, 48, ["image-left", "image-right", "image-leftmax", "image-rightmax"]),
        )
        .scope(
            "vscrollbar",
            scrollbar(&tex, 56, ["image-up", "image-down", "image-upmax", "image-downmax"]),
        )
        .scope(
            "section",
            Scope::new()
                .scope("left", Scope::new().with("image", line(&tex, [0, 64, 8, 4])))
                .scope("right", Scope::new().with("image", line(&tex, [0, 64, 8, 4])))
                .scope("center", Scope::new().with("image", frame(&tex, [8, 64, 16, 16], [4, 4, 2, 2])))
                .scope("opened", Scope::new().with("image", ImageTemplate::texture(&tex, [24, 64, 8, 8])))
                .scope("closed", Scope::new().with("image", ImageTemplate::texture(&tex, [32, 64, 8, 8]))),
        )
        .scope(
            "titlebar",
            Scope::new()
                .scope("left", Scope::new().with("image", line(&tex, [0, 80, 8, 16])))
                .scope("right", Scope::new().with("image", line(&tex, [0, 80, 8, 16])))
                .scope("center", Scope::new().with("image", frame(&tex, [8, 80, 16, 16], [6, 6, 4, 4])))
                .scope("frame", Scope::new().with("image", frame(&tex, [24, 80, 16, 16], [6, 6, 6, 6]))),
        );

    Theme::new(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_defines_every_skin() {
        let theme = flat();
        let images: [(&[&str], &str); 13] = [
            (&["frame"], "image"),
            (&["button"], "image-up"),
            (&["button"], "image-down"),
            (&["checkbox"], "image-checked"),
            (&["slider"], "image-knob"),
            (&["input"], "image"),
            (&["input"], "image-caret"),
            (&["menuoption"], "image-highlight"),
            (&["dropdown", "pulldown"], "image"),
            (&["hscrollbar"], "image-leftmax"),
            (&["vscrollbar"], "image-bar"),
            (&["section", "opened"], "image"),
            (&["titlebar", "frame"], "image"),
        ];
        for (path, key) in images {
            assert!(!theme.image(path, key).is_placeholder(), "{path:?}/{key}");
        }
    }

    #[test]
    fn test_flat_scoped_text_colors() {
        let theme = flat();
        assert_eq!(theme.text_color(&["button"]), Color::BLACK);
        assert_eq!(theme.text_color(&["frame"]), Color::WHITE);
    }
}
