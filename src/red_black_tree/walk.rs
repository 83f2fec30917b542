//! Whole-tree traversal, counting, and teardown.
//!
//! Each traversal order comes in three strategies with different space
//! behavior:
//!
//! - `walk_*`: explicit-stack iteration, `O(log n)` extra space, the
//!   default.
//! - `walk_*_recursive`: call-stack recursion, `O(log n)` stack frames.
//! - `walk_*_morris`: Morris threading, `O(1)` extra space. These take the
//!   arena mutably because they temporarily repurpose empty right links as
//!   return threads; every thread is unlinked before the walk returns, so
//!   the tree is structurally identical afterward.
//!
//! Visitors receive the slot and a reference to its payload entry, never the
//! link fields, so threading scratch state is not observable.

use crate::arena::{Slot, SlotArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Link, Node};
use crate::red_black_tree::tree::MAX_HEIGHT;

/// Visits every node in preorder using an explicit stack.
pub fn walk_preorder<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut stack = Vec::with_capacity(MAX_HEIGHT);
    if let Some(slot) = root {
        stack.push(slot);
    }
    while let Some(slot) = stack.pop() {
        visit(slot, &arena[slot].entry);
        if let Some(right) = arena[slot].right {
            stack.push(right);
        }
        if let Some(left) = arena[slot].left {
            stack.push(left);
        }
    }
}

/// Visits every node in ascending key order using an explicit stack.
pub fn walk_inorder<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut stack = Vec::with_capacity(MAX_HEIGHT);
    let mut walk = root;
    while walk.is_some() || !stack.is_empty() {
        while let Some(slot) = walk {
            stack.push(slot);
            walk = arena[slot].left;
        }
        let slot = stack.pop().expect("Expected a non-empty stack.");
        visit(slot, &arena[slot].entry);
        walk = arena[slot].right;
    }
}

/// Visits every node in postorder (children before parents) using an
/// explicit stack.
pub fn walk_postorder<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut stack: Vec<Slot> = Vec::with_capacity(MAX_HEIGHT);
    let mut walk = root;
    let mut last: Link = None;
    while walk.is_some() || !stack.is_empty() {
        while let Some(slot) = walk {
            stack.push(slot);
            walk = arena[slot].left;
        }
        let &slot = stack.last().expect("Expected a non-empty stack.");
        let right = arena[slot].right;
        if right.is_some() && right != last {
            walk = right;
        } else {
            visit(slot, &arena[slot].entry);
            last = stack.pop();
        }
    }
}

/// Visits every node in preorder by recursion.
pub fn walk_preorder_recursive<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    if let Some(slot) = root {
        visit(slot, &arena[slot].entry);
        walk_preorder_recursive(arena, arena[slot].left, visit);
        walk_preorder_recursive(arena, arena[slot].right, visit);
    }
}

/// Visits every node in ascending key order by recursion.
pub fn walk_inorder_recursive<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    if let Some(slot) = root {
        walk_inorder_recursive(arena, arena[slot].left, visit);
        visit(slot, &arena[slot].entry);
        walk_inorder_recursive(arena, arena[slot].right, visit);
    }
}

/// Visits every node in postorder by recursion.
pub fn walk_postorder_recursive<K, V, F>(arena: &SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    if let Some(slot) = root {
        walk_postorder_recursive(arena, arena[slot].left, visit);
        walk_postorder_recursive(arena, arena[slot].right, visit);
        visit(slot, &arena[slot].entry);
    }
}

/// Finds the rightmost node below `slot` whose right link has not been
/// threaded back to `stop`.
fn rightmost_below<K, V>(arena: &SlotArena<Node<K, V>>, mut slot: Slot, stop: Slot) -> Slot {
    loop {
        match arena[slot].right {
            Some(right) if right != stop => slot = right,
            _ => return slot,
        }
    }
}

/// Visits every node in ascending key order using Morris threading.
pub fn walk_inorder_morris<K, V, F>(arena: &mut SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut walk = root;
    while let Some(slot) = walk {
        match arena[slot].left {
            None => {
                visit(slot, &arena[slot].entry);
                walk = arena[slot].right;
            }
            Some(left) => {
                let pred = rightmost_below(arena, left, slot);
                if arena[pred].right.is_none() {
                    arena[pred].right = Some(slot);
                    walk = Some(left);
                } else {
                    arena[pred].right = None;
                    visit(slot, &arena[slot].entry);
                    walk = arena[slot].right;
                }
            }
        }
    }
}

/// Visits every node in preorder using Morris threading.
pub fn walk_preorder_morris<K, V, F>(arena: &mut SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut walk = root;
    while let Some(slot) = walk {
        match arena[slot].left {
            None => {
                visit(slot, &arena[slot].entry);
                walk = arena[slot].right;
            }
            Some(left) => {
                let pred = rightmost_below(arena, left, slot);
                if arena[pred].right.is_none() {
                    visit(slot, &arena[slot].entry);
                    arena[pred].right = Some(slot);
                    walk = Some(left);
                } else {
                    arena[pred].right = None;
                    walk = arena[slot].right;
                }
            }
        }
    }
}

/// Reverses the chain of right links starting at `head`, returning the old
/// tail. Applying it twice restores the chain.
fn reverse_right_run<K, V>(arena: &mut SlotArena<Node<K, V>>, head: Slot) -> Slot {
    let mut prev: Link = None;
    let mut walk = Some(head);
    while let Some(slot) = walk {
        let next = arena[slot].right;
        arena[slot].right = prev;
        prev = Some(slot);
        walk = next;
    }
    prev.expect("Expected a non-empty run.")
}

/// Visits the right-link chain starting at `head` from its tail back to
/// `head`, leaving the chain as it was found.
fn visit_run_reversed<K, V, F>(arena: &mut SlotArena<Node<K, V>>, head: Slot, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let tail = reverse_right_run(arena, head);
    let mut walk = Some(tail);
    while let Some(slot) = walk {
        visit(slot, &arena[slot].entry);
        walk = arena[slot].right;
    }
    reverse_right_run(arena, tail);
}

/// Visits every node in postorder using Morris threading.
///
/// Postorder is the concatenation of reversed right-link runs: one run per
/// completed thread, plus the run from the root after the main loop.
pub fn walk_postorder_morris<K, V, F>(arena: &mut SlotArena<Node<K, V>>, root: Link, visit: &mut F)
where
    F: FnMut(Slot, &Entry<K, V>),
{
    let mut walk = root;
    while let Some(slot) = walk {
        match arena[slot].left {
            None => walk = arena[slot].right,
            Some(left) => {
                let pred = rightmost_below(arena, left, slot);
                if arena[pred].right.is_none() {
                    arena[pred].right = Some(slot);
                    walk = Some(left);
                } else {
                    arena[pred].right = None;
                    visit_run_reversed(arena, left, visit);
                    walk = arena[slot].right;
                }
            }
        }
    }
    if let Some(slot) = root {
        visit_run_reversed(arena, slot, visit);
    }
}

/// Returns the number of nodes in the tree. Runs in `O(n)`; callers that
/// need a cheap size query must track it themselves alongside the root link.
pub fn count<K, V>(arena: &SlotArena<Node<K, V>>, root: Link) -> usize {
    let mut total = 0;
    let mut stack = Vec::with_capacity(MAX_HEIGHT);
    if let Some(slot) = root {
        stack.push(slot);
    }
    while let Some(slot) = stack.pop() {
        total += 1;
        if let Some(right) = arena[slot].right {
            stack.push(right);
        }
        if let Some(left) = arena[slot].left {
            stack.push(left);
        }
    }
    total
}

/// Tears down the whole tree, releasing every slot back to the arena and
/// handing each payload to `dispose`. Children are released strictly before
/// their parents, and the root link is cleared.
pub fn clear<K, V, F>(arena: &mut SlotArena<Node<K, V>>, root: &mut Link, dispose: &mut F)
where
    F: FnMut(Entry<K, V>),
{
    let mut stack: Vec<Slot> = Vec::with_capacity(MAX_HEIGHT);
    let mut walk = root.take();
    let mut last: Link = None;
    while walk.is_some() || !stack.is_empty() {
        while let Some(slot) = walk {
            stack.push(slot);
            walk = arena[slot].left;
        }
        let &slot = stack.last().expect("Expected a non-empty stack.");
        let right = arena[slot].right;
        if right.is_some() && right != last {
            walk = right;
        } else {
            last = stack.pop();
            let node = arena.release(slot);
            dispose(node.entry);
        }
    }
}
