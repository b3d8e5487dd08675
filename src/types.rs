//! Core types for spark-gui.
//!
//! Colors, rectangles, alignment and anchoring. Everything above this module
//! speaks in these terms.
//!
//! # Coordinates
//!
//! `y` increases upward and a widget's `(x, y)` is its lower-left corner.
//! Sizes, points and insets reuse the `taffy::geometry` containers so the
//! field names (`width`/`height`, `x`/`y`, `left`/`right`/`top`/`bottom`)
//! read the same everywhere.

use serde::{Deserialize, Serialize};

/// Width and height in pixels.
pub type Size = taffy::geometry::Size<i32>;

/// A point or pixel offset.
pub type Point = taffy::geometry::Point<i32>;

/// Edge insets in `[left, right, top, bottom]` order.
pub type Insets = taffy::geometry::Rect<i32>;

/// Build a [`Size`].
#[inline]
pub const fn size(width: i32, height: i32) -> Size {
    Size { width, height }
}

/// Build a [`Point`].
#[inline]
pub const fn point(x: i32, y: i32) -> Point {
    Point { x, y }
}

/// Build [`Insets`] from `[left, right, top, bottom]`.
#[inline]
pub const fn insets(left: i32, right: i32, top: i32, bottom: i32) -> Insets {
    Insets { left, right, top, bottom }
}

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Same color with a different alpha.
    #[inline]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Color> for [u8; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

// =============================================================================
// Rect
// =============================================================================

/// An axis-aligned rectangle with its origin at the lower-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Rect at the origin with the given size.
    pub const fn from_size(s: Size) -> Self {
        Self::new(0, 0, s.width, s.height)
    }

    #[inline]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn top(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn size(&self) -> Size {
        size(self.width, self.height)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Check if a point is inside this rect (left/bottom inclusive).
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.top()
    }

    /// True when `other` lies entirely inside this rect.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.top() <= self.top()
    }

    /// Compute intersection of two rects.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.top().min(other.top());

        if x2 > x1 && y2 > y1 {
            Some(Rect::new(x1, y1, x2 - x1, y2 - y1))
        } else {
            None
        }
    }

    /// Shrink by the given insets.
    pub fn inset(&self, by: Insets) -> Rect {
        Rect::new(
            self.x + by.left,
            self.y + by.bottom,
            (self.width - by.left - by.right).max(0),
            (self.height - by.top - by.bottom).max(0),
        )
    }
}

// =============================================================================
// Alignment and anchors
// =============================================================================

/// Horizontal alignment inside a cell or along a cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment inside a cell or along a cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl HAlign {
    /// Offset of an item of `extent` inside `space`.
    #[inline]
    pub fn place(self, space: i32, extent: i32) -> i32 {
        match self {
            HAlign::Left => 0,
            HAlign::Center => (space - extent) / 2,
            HAlign::Right => space - extent,
        }
    }
}

impl VAlign {
    /// Offset from the bottom of an item of `extent` inside `space`.
    #[inline]
    pub fn place(self, space: i32, extent: i32) -> i32 {
        match self {
            VAlign::Bottom => 0,
            VAlign::Center => (space - extent) / 2,
            VAlign::Top => space - extent,
        }
    }
}

/// One of the nine compass anchors of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    #[default]
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// Split into its vertical and horizontal components.
    pub const fn split(self) -> (VAlign, HAlign) {
        match self {
            Anchor::TopLeft => (VAlign::Top, HAlign::Left),
            Anchor::Top => (VAlign::Top, HAlign::Center),
            Anchor::TopRight => (VAlign::Top, HAlign::Right),
            Anchor::Left => (VAlign::Center, HAlign::Left),
            Anchor::Center => (VAlign::Center, HAlign::Center),
            Anchor::Right => (VAlign::Center, HAlign::Right),
            Anchor::BottomLeft => (VAlign::Bottom, HAlign::Left),
            Anchor::Bottom => (VAlign::Bottom, HAlign::Center),
            Anchor::BottomRight => (VAlign::Bottom, HAlign::Right),
        }
    }

    /// The point this anchor names on `rect`.
    pub fn point_on(self, rect: &Rect) -> Point {
        let (v, h) = self.split();
        point(
            rect.x + h.place(rect.width, 0),
            rect.y + v.place(rect.height, 0),
        )
    }
}

/// Position of a child of `child` size so that its `child_anchor` lands on
/// the `anchor` point of `parent`, shifted by `offset`.
///
/// `child_anchor` defaults to `anchor`, which keeps the child inside the
/// parent for a zero offset.
pub fn relative_point(
    parent: &Rect,
    anchor: Anchor,
    child: Size,
    child_anchor: Option<Anchor>,
    offset: Point,
) -> Point {
    let target = anchor.point_on(parent);
    let (v, h) = child_anchor.unwrap_or(anchor).split();
    point(
        target.x - h.place(child.width, 0) + offset.x,
        target.y - v.place(child.height, 0) + offset.y,
    )
}

// =============================================================================
// Tests
// =============================================================================
