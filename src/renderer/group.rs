//! Paint groups.
//!
//! Groups form a tree whose path from the root decides draw order. A dialog
//! group carries a mutable order token so "pop to top" restacks a whole
//! dialog without touching its allocations. Clip groups carry the scissor
//! rectangle of a scrollable and are updated every layout pass.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::Rect;

/// Shared reference to a group.
pub type GroupRef = Rc<Group>;

#[derive(Debug)]
pub enum GroupKind {
    Root,
    Dialog { order: Cell<u64> },
    Layer { order: u32 },
    Clip { rect: Cell<Rect> },
}

/// A node in the paint-order tree.
#[derive(Debug)]
pub struct Group {
    kind: GroupKind,
    parent: Option<GroupRef>,
}

impl Group {
    pub fn root() -> GroupRef {
        Rc::new(Self { kind: GroupKind::Root, parent: None })
    }

    /// Dialog-level group carrying a stacking token.
    pub fn dialog(order: u64, parent: Option<&GroupRef>) -> GroupRef {
        Rc::new(Self {
            kind: GroupKind::Dialog { order: Cell::new(order) },
            parent: parent.cloned(),
        })
    }

    /// Fixed-order child group.
    pub fn ordered(order: u32, parent: &GroupRef) -> GroupRef {
        Rc::new(Self { kind: GroupKind::Layer { order }, parent: Some(parent.clone()) })
    }

    /// Scissor group clipping everything below it to `rect`.
    pub fn clip(rect: Rect, parent: &GroupRef) -> GroupRef {
        Rc::new(Self { kind: GroupKind::Clip { rect: Cell::new(rect) }, parent: Some(parent.clone()) })
    }

    pub fn kind(&self) -> &GroupKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<&GroupRef> {
        self.parent.as_ref()
    }

    /// Restack a dialog group. No effect on other kinds.
    pub fn set_order(&self, token: u64) {
        match &self.kind {
            GroupKind::Dialog { order } => order.set(token),
            _ => tracing::warn!("set_order on a non-dialog group"),
        }
    }

    /// Stacking token of a dialog group.
    pub fn dialog_order(&self) -> Option<u64> {
        match &self.kind {
            GroupKind::Dialog { order } => Some(order.get()),
            _ => None,
        }
    }

    /// Move a clip group's scissor rectangle. No effect on other kinds.
    pub fn set_clip(&self, to: Rect) {
        if let GroupKind::Clip { rect } = &self.kind {
            rect.set(to);
        }
    }

    /// Ordering key: one entry per ancestor, root first.
    pub fn sort_key(&self) -> Vec<u64> {
        let mut key = match &self.parent {
            Some(parent) => parent.sort_key(),
            None => Vec::new(),
        };
        key.push(match &self.kind {
            GroupKind::Root | GroupKind::Clip { .. } => 0,
            GroupKind::Dialog { order } => order.get(),
            GroupKind::Layer { order } => *order as u64,
        });
        key
    }

    /// Effective scissor rectangle: the intersection of all clip ancestors.
    ///
    /// `Some(empty)` means everything is clipped away.
    pub fn clip_rect(&self) -> Option<Rect> {
        let inherited = self.parent.as_ref().and_then(|p| p.clip_rect());
        match (&self.kind, inherited) {
            (GroupKind::Clip { rect }, Some(outer)) => {
                Some(rect.get().intersect(&outer).unwrap_or_default())
            }
            (GroupKind::Clip { rect }, None) => Some(rect.get()),
            (_, inherited) => inherited,
        }
    }
}

// =============================================================================
// Layers
// =============================================================================

/// The four paint layers every dialog and scrollable draws into.
#[derive(Debug, Clone)]
pub struct Layers {
    pub panel: GroupRef,
    pub background: GroupRef,
    pub foreground: GroupRef,
    pub highlight: GroupRef,
}

impl Layers {
    pub fn new(parent: &GroupRef) -> Self {
        Self {
            panel: Group::ordered(0, parent),
            background: Group::ordered(1, parent),
            foreground: Group::ordered(2, parent),
            highlight: Group::ordered(3, parent),
        }
    }
}

// =============================================================================
// Derived-group cache
// =============================================================================

/// Per-dialog cache of groups derived from a parent group, keyed by the
/// parent's identity. Text runs share one derived group per parent instead
/// of creating a group per label.
#[derive(Debug, Default)]
pub struct GroupCache {
    derived: RefCell<HashMap<(usize, u32), GroupRef>>,
}

/// Order of text groups above their parent's meshes.
const TEXT_ORDER: u32 = 1;

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text group stacked above `parent`'s meshes.
    pub fn text_group(&self, parent: &GroupRef) -> GroupRef {
        self.derived(parent, TEXT_ORDER)
    }

    /// A child of `parent` with a fixed order, created once per parent.
    pub fn derived(&self, parent: &GroupRef, order: u32) -> GroupRef {
        let key = (Rc::as_ptr(parent) as usize, order);
        self.derived
            .borrow_mut()
            .entry(key)
            .or_insert_with(|| Group::ordered(order, parent))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.derived.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.derived.borrow().is_empty()
    }

    /// Drop every cached group.
    pub fn clear(&self) {
        self.derived.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_sort_keys() {
        let root = Group::root();
        let dialog = Group::dialog(3, Some(&root));
        let layers = Layers::new(&dialog);
        assert!(layers.panel.sort_key() < layers.background.sort_key());
        assert!(layers.foreground.sort_key() < layers.highlight.sort_key());
    }

    #[test]
    fn test_dialog_order_restacks_descendants() {
        let root = Group::root();
        let low = Layers::new(&Group::dialog(1, Some(&root)));
        let high_dialog = Group::dialog(2, Some(&root));
        let high = Layers::new(&high_dialog);
        assert!(low.highlight.sort_key() < high.panel.sort_key());

        let low_dialog = low.panel.parent().cloned().unwrap();
        low_dialog.set_order(5);
        assert!(low.panel.sort_key() > high.highlight.sort_key());
    }

    #[test]
    fn test_clip_rect_intersects_ancestors() {
        let root = Group::root();
        let outer = Group::clip(Rect::new(0, 0, 100, 100), &root);
        let inner = Group::clip(Rect::new(50, 50, 100, 100), &outer);
        let leaf = Group::ordered(0, &inner);
        assert_eq!(leaf.clip_rect(), Some(Rect::new(50, 50, 50, 50)));

        inner.set_clip(Rect::new(200, 200, 10, 10));
        assert_eq!(leaf.clip_rect(), Some(Rect::default()));
        assert_eq!(root.clip_rect(), None);
    }

    #[test]
    fn test_group_cache_reuses_per_parent() {
        let root = Group::root();
        let a = Group::ordered(0, &root);
        let b = Group::ordered(1, &root);
        let cache = GroupCache::new();

        let ta = cache.text_group(&a);
        assert!(Rc::ptr_eq(&ta, &cache.text_group(&a)));
        assert!(!Rc::ptr_eq(&ta, &cache.text_group(&b)));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
