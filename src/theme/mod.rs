//! Theme System for spark-gui.
//!
//! A theme is a tree of named scopes. Widgets look values up by a style path
//! (`["button"]`, `["hscrollbar", "bar"]`, ...) plus a key. Lookup walks the
//! path through nested scopes, then searches from the innermost scope reached
//! outward to the root, and finally falls back to the fixed
//! [`ThemeDefaults`] record. Nothing in here fails: a missing color becomes
//! the default color and a missing image becomes a visible placeholder.
//!
//! # Value Types
//!
//! - `ThemeValue::Color` - `gui_color`, `text_color`, `highlight_color`, ...
//! - `ThemeValue::Number` - font sizes, paddings, step sizes
//! - `ThemeValue::Text` - font names
//! - `ThemeValue::Insets` / `ThemeValue::Offset` - margins and nudges
//! - `ThemeValue::Image` - a graphic template that generates live elements
//!
//! # Example
//!
//! ```ignore
//! use spark_gui::theme::{Scope, Theme};
//!
//! let theme = Theme::new(
//!     Scope::new()
//!         .with("text_color", Color::BLACK)
//!         .scope("button", Scope::new().with("image-up", up_template)),
//! );
//! let color = theme.text_color(&["button"]);
//! ```

pub mod presets;
mod template;

pub use template::{GraphicElement, ImageSpec, ImageTemplate, PLACEHOLDER_SIZE};

use std::collections::BTreeMap;

use crate::renderer::FontSpec;
use crate::types::{Color, Insets, Point};

// =============================================================================
// Values and scopes
// =============================================================================

/// A single theme entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ThemeValue {
    Scope(Scope),
    Color(Color),
    Number(i32),
    Text(String),
    Insets(Insets),
    Offset(Point),
    Image(ImageTemplate),
}

impl From<Scope> for ThemeValue {
    fn from(s: Scope) -> Self {
        ThemeValue::Scope(s)
    }
}

impl From<Color> for ThemeValue {
    fn from(c: Color) -> Self {
        ThemeValue::Color(c)
    }
}

impl From<i32> for ThemeValue {
    fn from(n: i32) -> Self {
        ThemeValue::Number(n)
    }
}

impl From<&str> for ThemeValue {
    fn from(s: &str) -> Self {
        ThemeValue::Text(s.to_string())
    }
}

impl From<Insets> for ThemeValue {
    fn from(i: Insets) -> Self {
        ThemeValue::Insets(i)
    }
}

impl From<Point> for ThemeValue {
    fn from(p: Point) -> Self {
        ThemeValue::Offset(p)
    }
}

impl From<ImageTemplate> for ThemeValue {
    fn from(t: ImageTemplate) -> Self {
        ThemeValue::Image(t)
    }
}

/// A named collection of theme values and nested scopes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scope {
    entries: BTreeMap<String, ThemeValue>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder: add a nested scope.
    pub fn scope(self, name: impl Into<String>, scope: Scope) -> Self {
        self.with(name, scope)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ThemeValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.entries.get(key)
    }

    /// Nested scope named `name`, if present.
    pub fn child(&self, name: &str) -> Option<&Scope> {
        match self.entries.get(name) {
            Some(ThemeValue::Scope(s)) => Some(s),
            _ => None,
        }
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// The global default record every lookup ends at.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDefaults {
    pub font: String,
    pub font_size: u32,
    pub font_size_small: u32,
    pub text_color: Color,
    pub gui_color: Color,
    pub highlight_color: Color,
    pub disabled_color: Color,
}

impl Default for ThemeDefaults {
    fn default() -> Self {
        Self {
            font: "Lucida Grande".to_string(),
            font_size: 12,
            font_size_small: 10,
            text_color: Color::WHITE,
            gui_color: Color::WHITE,
            highlight_color: Color::WHITE.with_alpha(64),
            disabled_color: Color::rgb(160, 160, 160),
        }
    }
}

impl ThemeDefaults {
    fn color(&self, key: &str) -> Option<Color> {
        match key {
            "text_color" => Some(self.text_color),
            "gui_color" => Some(self.gui_color),
            "highlight_color" => Some(self.highlight_color),
            "disabled_color" => Some(self.disabled_color),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<i32> {
        match key {
            "font_size" => Some(self.font_size as i32),
            "font_size_small" => Some(self.font_size_small as i32),
            _ => None,
        }
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Read-only scoped style lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Theme {
    root: Scope,
    defaults: ThemeDefaults,
}

impl Theme {
    pub fn new(root: Scope) -> Self {
        Self { root, defaults: ThemeDefaults::default() }
    }

    pub fn with_defaults(root: Scope, defaults: ThemeDefaults) -> Self {
        Self { root, defaults }
    }

    pub fn defaults(&self) -> &ThemeDefaults {
        &self.defaults
    }

    /// Scopes visited by `path`, root first. A missing segment stops the
    /// walk at the deepest scope reached.
    fn chain(&self, path: &[&str]) -> Vec<&Scope> {
        let mut chain = vec![&self.root];
        for segment in path {
            let next = chain.iter().rev().find_map(|scope| scope.child(segment));
            match next {
                Some(scope) => chain.push(scope),
                None => {
                    tracing::trace!(?path, segment, "theme path segment missing");
                    break;
                }
            }
        }
        chain
    }

    /// Resolve `key` under `path`, searching innermost scope outward.
    pub fn resolve(&self, path: &[&str], key: &str) -> Option<&ThemeValue> {
        self.chain(path).into_iter().rev().find_map(|scope| scope.get(key))
    }

    /// Color value, falling back to the defaults record, then white.
    pub fn color(&self, path: &[&str], key: &str) -> Color {
        match self.resolve(path, key) {
            Some(ThemeValue::Color(c)) => *c,
            _ => self.defaults.color(key).unwrap_or_else(|| {
                tracing::warn!(?path, key, "theme color missing");
                Color::WHITE
            }),
        }
    }

    pub fn gui_color(&self, path: &[&str]) -> Color {
        self.color(path, "gui_color")
    }

    pub fn text_color(&self, path: &[&str]) -> Color {
        self.color(path, "text_color")
    }

    pub fn highlight_color(&self, path: &[&str]) -> Color {
        self.color(path, "highlight_color")
    }

    pub fn disabled_color(&self, path: &[&str]) -> Color {
        self.color(path, "disabled_color")
    }

    /// Numeric value, falling back to the defaults record, then zero.
    pub fn number(&self, path: &[&str], key: &str) -> i32 {
        match self.resolve(path, key) {
            Some(ThemeValue::Number(n)) => *n,
            _ => self.defaults.number(key).unwrap_or(0),
        }
    }

    /// Insets value, or zero insets.
    pub fn insets(&self, path: &[&str], key: &str) -> Insets {
        match self.resolve(path, key) {
            Some(ThemeValue::Insets(i)) => *i,
            _ => Insets { left: 0, right: 0, top: 0, bottom: 0 },
        }
    }

    /// Offset value, or the origin.
    pub fn offset(&self, path: &[&str], key: &str) -> Point {
        match self.resolve(path, key) {
            Some(ThemeValue::Offset(p)) => *p,
            _ => Point { x: 0, y: 0 },
        }
    }

    /// Image template, or the placeholder when absent.
    pub fn image(&self, path: &[&str], key: &str) -> ImageTemplate {
        match self.resolve(path, key) {
            Some(ThemeValue::Image(t)) => t.clone(),
            _ => {
                tracing::warn!(?path, key, "theme image missing, using placeholder");
                ImageTemplate::Placeholder
            }
        }
    }

    /// Regular font for a path.
    pub fn font(&self, path: &[&str]) -> FontSpec {
        self.font_sized(path, "font_size")
    }

    /// Small font for a path.
    pub fn small_font(&self, path: &[&str]) -> FontSpec {
        self.font_sized(path, "font_size_small")
    }

    fn font_sized(&self, path: &[&str], size_key: &str) -> FontSpec {
        let name = match self.resolve(path, "font") {
            Some(ThemeValue::Text(name)) => name.clone(),
            _ => self.defaults.font.clone(),
        };
        FontSpec {
            name,
            size: self.number(path, size_key).max(1) as u32,
            bold: false,
            italic: false,
        }
    }
}
