//! Resumable iteration over a tree.

use crate::arena::{Slot, SlotArena};
use crate::red_black_tree::node::{Link, Node};
use crate::red_black_tree::tree::MAX_HEIGHT;

/// A resumable cursor over a tree, yielding slots in key order.
///
/// The cursor holds a stack of ancestors plus a pending subtree that has not
/// been expanded yet; each call borrows the arena only for the duration of
/// the call. The first call to [`next`](#method.next) yields the minimum
/// key; the first call to [`prev`](#method.prev) on a fresh cursor yields
/// the maximum.
///
/// `next` and `prev` share the one stack but each expands the pending
/// subtree under its own discipline, so interleaving the two directions does
/// not step back to the previously yielded node — a cursor is a drain in one
/// direction, not a bidirectional iterator. The cursor is also invalidated
/// by any mutation of the tree it was created from.
///
/// # Examples
///
/// ```
/// use arena_collections::arena::SlotArena;
/// use arena_collections::red_black_tree::node::Node;
/// use arena_collections::red_black_tree::{tree, Cursor};
///
/// let mut arena = SlotArena::new(16);
/// let mut root = None;
/// for key in vec![2, 1, 3] {
///     let slot = arena.allocate(Node::new(key, ()));
///     tree::insert(&mut arena, &mut root, slot, &mut |a: &u32, b: &u32| a.cmp(b)).unwrap();
/// }
///
/// let mut cursor = Cursor::new(root);
/// assert_eq!(cursor.next(&arena).map(|slot| arena[slot].entry.key), Some(1));
/// assert_eq!(cursor.next(&arena).map(|slot| arena[slot].entry.key), Some(2));
/// assert_eq!(cursor.next(&arena).map(|slot| arena[slot].entry.key), Some(3));
/// assert!(cursor.is_exhausted());
/// ```
pub struct Cursor {
    stack: Vec<Slot>,
    pending: Link,
}

impl Cursor {
    /// Constructs a cursor over the tree rooted at `root`. The stack is
    /// preallocated to the maximum reachable height, so stepping never
    /// reallocates.
    pub fn new(root: Link) -> Self {
        Cursor {
            stack: Vec::with_capacity(MAX_HEIGHT),
            pending: root,
        }
    }

    /// Advances to and returns the next slot in ascending key order, or
    /// `None` once the ascending side is drained.
    pub fn next<K, V>(&mut self, arena: &SlotArena<Node<K, V>>) -> Link {
        while let Some(slot) = self.pending {
            self.stack.push(slot);
            self.pending = arena[slot].left;
        }
        self.stack.pop().map(|slot| {
            self.pending = arena[slot].right;
            slot
        })
    }

    /// Advances to and returns the next slot in descending key order, or
    /// `None` once the descending side is drained.
    pub fn prev<K, V>(&mut self, arena: &SlotArena<Node<K, V>>) -> Link {
        while let Some(slot) = self.pending {
            self.stack.push(slot);
            self.pending = arena[slot].right;
        }
        self.stack.pop().map(|slot| {
            self.pending = arena[slot].left;
            slot
        })
    }

    /// Returns `true` if the cursor has been fully drained to one side.
    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty() && self.pending.is_none()
    }
}
