//! Search and mutation over arena-slotted red-black trees.
//!
//! Every function takes the arena and the root link explicitly; the tree is
//! identified purely by the root link the caller stores. Ordering decisions
//! go through a caller-supplied comparator closure, so keys never need to
//! implement `Ord` at this layer. Insert and remove record their descent in a
//! fixed-size path array bounded by [`MAX_HEIGHT`](constant.MAX_HEIGHT.html)
//! and repair the tree by walking that array backward, so no operation
//! recurses and no node stores a parent link.

use crate::arena::{Slot, SlotArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Color, Link, Node, Side};
use std::cmp::Ordering;
use std::mem;

/// Upper bound on the height of any reachable tree.
///
/// The red-black invariants bound the height by `2 * log2(n + 1)`, and `n`
/// is bounded by the address space, so twice the word width covers every
/// tree that can exist. Descent paths are recorded in arrays of this size
/// instead of growing allocations.
pub const MAX_HEIGHT: usize = 2 * 8 * mem::size_of::<usize>();

pub fn is_red<K, V>(arena: &SlotArena<Node<K, V>>, link: Link) -> bool {
    match link {
        None => false,
        Some(slot) => arena[slot].color == Color::Red,
    }
}

/// Rotates the subtree rooted at `pivot` toward `side`, returning the slot
/// that now roots the subtree. The caller re-links the returned slot into
/// the pivot's old parent. Colors are left untouched.
fn rotate<K, V>(arena: &mut SlotArena<Node<K, V>>, pivot: Slot, toward: Side) -> Slot {
    let up = arena[pivot]
        .child(toward.opposite())
        .expect("Expected a child node to rotate up.");
    let inner = arena[up].child(toward);
    arena[pivot].set_child(toward.opposite(), inner);
    arena[up].set_child(toward, Some(pivot));
    up
}

fn relink<K, V>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    above: Option<(Slot, Side)>,
    subtree: Slot,
) {
    match above {
        Some((parent, side)) => arena[parent].set_child(side, Some(subtree)),
        None => *root = Some(subtree),
    }
}

/// Returns the node whose key compares equal to `key`, if any.
pub fn find<K, V, Q, F>(arena: &SlotArena<Node<K, V>>, root: Link, key: &Q, cmp: &mut F) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut walk = root;
    while let Some(slot) = walk {
        walk = match cmp(key, &arena[slot].entry.key) {
            Ordering::Less => arena[slot].left,
            Ordering::Greater => arena[slot].right,
            Ordering::Equal => return Some(slot),
        };
    }
    None
}

/// Returns the leftmost node whose key is greater than or equal to `key`.
pub fn lower_bound<K, V, Q, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    key: &Q,
    cmp: &mut F,
) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut best = None;
    let mut walk = root;
    while let Some(slot) = walk {
        walk = if cmp(key, &arena[slot].entry.key) == Ordering::Greater {
            arena[slot].right
        } else {
            best = Some(slot);
            arena[slot].left
        };
    }
    best
}

/// Returns the leftmost node whose key is strictly greater than `key`.
pub fn upper_bound<K, V, Q, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    key: &Q,
    cmp: &mut F,
) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut best = None;
    let mut walk = root;
    while let Some(slot) = walk {
        walk = if cmp(key, &arena[slot].entry.key) == Ordering::Less {
            best = Some(slot);
            arena[slot].left
        } else {
            arena[slot].right
        };
    }
    best
}

/// Returns the rightmost node whose key is less than or equal to `key`.
pub fn rev_lower_bound<K, V, Q, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    key: &Q,
    cmp: &mut F,
) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut best = None;
    let mut walk = root;
    while let Some(slot) = walk {
        walk = if cmp(key, &arena[slot].entry.key) == Ordering::Less {
            arena[slot].left
        } else {
            best = Some(slot);
            arena[slot].right
        };
    }
    best
}

/// Returns the rightmost node whose key is strictly less than `key`.
pub fn rev_upper_bound<K, V, Q, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    key: &Q,
    cmp: &mut F,
) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut best = None;
    let mut walk = root;
    while let Some(slot) = walk {
        walk = if cmp(key, &arena[slot].entry.key) == Ordering::Greater {
            best = Some(slot);
            arena[slot].right
        } else {
            arena[slot].left
        };
    }
    best
}

/// Returns the successor of `key` in the tree, whether or not `key` itself
/// is present.
pub fn find_next<K, V, Q, F>(arena: &SlotArena<Node<K, V>>, root: Link, key: &Q, cmp: &mut F) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    upper_bound(arena, root, key, cmp)
}

/// Returns the predecessor of `key` in the tree, whether or not `key` itself
/// is present.
pub fn find_prev<K, V, Q, F>(arena: &SlotArena<Node<K, V>>, root: Link, key: &Q, cmp: &mut F) -> Link
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    rev_upper_bound(arena, root, key, cmp)
}

/// Returns the node holding the minimum key.
pub fn leftmost<K, V>(arena: &SlotArena<Node<K, V>>, root: Link) -> Link {
    let mut walk = root?;
    while let Some(left) = arena[walk].left {
        walk = left;
    }
    Some(walk)
}

/// Returns the node holding the maximum key.
pub fn rightmost<K, V>(arena: &SlotArena<Node<K, V>>, root: Link) -> Link {
    let mut walk = root?;
    while let Some(right) = arena[walk].right {
        walk = right;
    }
    Some(walk)
}

/// Returns `(lower_bound(key), upper_bound(key))` in one descent.
///
/// The walk shares a single path until it meets an equal key, then splits
/// into two independent continuations: one refining the lower bound in the
/// left subtree, one refining the upper bound in the right subtree. Keys on
/// the shared prefix are compared once instead of twice.
pub fn equal_range<K, V, Q, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    key: &Q,
    cmp: &mut F,
) -> (Link, Link)
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut lower = None;
    let mut upper = None;
    let mut walk = root;
    while let Some(slot) = walk {
        match cmp(key, &arena[slot].entry.key) {
            Ordering::Less => {
                lower = Some(slot);
                upper = Some(slot);
                walk = arena[slot].left;
            }
            Ordering::Greater => walk = arena[slot].right,
            Ordering::Equal => {
                lower = Some(slot);
                let mut down = arena[slot].left;
                while let Some(below) = down {
                    down = if cmp(key, &arena[below].entry.key) == Ordering::Greater {
                        arena[below].right
                    } else {
                        lower = Some(below);
                        arena[below].left
                    };
                }
                let mut down = arena[slot].right;
                while let Some(below) = down {
                    down = if cmp(key, &arena[below].entry.key) == Ordering::Less {
                        upper = Some(below);
                        arena[below].left
                    } else {
                        arena[below].right
                    };
                }
                break;
            }
        }
    }
    (lower, upper)
}

/// Links the slot `new` into the tree.
///
/// Returns `Ok(new)` if the slot was linked, or `Err(existing)` if a node
/// with an equal key is already present, in which case the tree is left
/// untouched and the rejected slot remains the caller's to reuse or release.
/// The slot's links and color are (re)initialized at link time, so a slot
/// returned by [`remove`](fn.remove.html) can be handed straight back.
pub fn insert<K, V, F>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    new: Slot,
    cmp: &mut F,
) -> Result<Slot, Slot>
where
    F: FnMut(&K, &K) -> Ordering,
{
    let mut path = [(Slot::default(), Side::Left); MAX_HEIGHT];
    let mut depth = 0;
    let mut walk = *root;
    while let Some(slot) = walk {
        let side = match cmp(&arena[new].entry.key, &arena[slot].entry.key) {
            Ordering::Less => Side::Left,
            Ordering::Greater => Side::Right,
            Ordering::Equal => return Err(slot),
        };
        path[depth] = (slot, side);
        depth += 1;
        walk = arena[slot].child(side);
    }
    link_and_repair(arena, root, new, &path, depth);
    Ok(new)
}

/// Links the slot `new` into the tree without checking for an equal key.
///
/// Equal keys descend to the right, so repeated insertions of the same key
/// appear in insertion order under inorder traversal. Intended for callers
/// that have already ruled out duplicates, or that want multiset semantics.
pub fn insert_unchecked<K, V, F>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    new: Slot,
    cmp: &mut F,
) -> Slot
where
    F: FnMut(&K, &K) -> Ordering,
{
    let mut path = [(Slot::default(), Side::Left); MAX_HEIGHT];
    let mut depth = 0;
    let mut walk = *root;
    while let Some(slot) = walk {
        let side = match cmp(&arena[new].entry.key, &arena[slot].entry.key) {
            Ordering::Less => Side::Left,
            _ => Side::Right,
        };
        path[depth] = (slot, side);
        depth += 1;
        walk = arena[slot].child(side);
    }
    link_and_repair(arena, root, new, &path, depth);
    new
}

fn link_and_repair<K, V>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    new: Slot,
    path: &[(Slot, Side)],
    depth: usize,
) {
    {
        let node = &mut arena[new];
        node.left = None;
        node.right = None;
        node.color = Color::Red;
    }
    match depth {
        0 => *root = Some(new),
        _ => {
            let (parent, side) = path[depth - 1];
            arena[parent].set_child(side, Some(new));
        }
    }

    let mut level = depth;
    while level >= 1 && arena[path[level - 1].0].color == Color::Red {
        // The root is black, so a red parent always has a recorded parent of
        // its own: `level >= 2` here.
        let (parent, parent_side) = path[level - 1];
        let (grand, grand_side) = path[level - 2];
        let uncle = arena[grand].child(grand_side.opposite());
        if is_red(arena, uncle) {
            arena[parent].color = Color::Black;
            if let Some(slot) = uncle {
                arena[slot].color = Color::Black;
            }
            arena[grand].color = Color::Red;
            level -= 2;
        } else {
            let subtree = if parent_side == grand_side {
                rotate(arena, grand, grand_side.opposite())
            } else {
                let middle = rotate(arena, parent, parent_side.opposite());
                arena[grand].set_child(grand_side, Some(middle));
                rotate(arena, grand, grand_side.opposite())
            };
            arena[subtree].color = Color::Black;
            arena[grand].color = Color::Red;
            let above = if level >= 3 {
                Some(path[level - 3])
            } else {
                None
            };
            relink(arena, root, above, subtree);
            break;
        }
    }

    if let Some(slot) = *root {
        arena[slot].color = Color::Black;
    }
}

/// Unlinks and returns the node whose key compares equal to `key`, or `None`
/// if no such node exists. Ownership of the returned slot reverts to the
/// caller; the slot's payload is untouched.
pub fn remove<K, V, Q, F>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    key: &Q,
    cmp: &mut F,
) -> Option<Slot>
where
    Q: ?Sized,
    F: FnMut(&Q, &K) -> Ordering,
{
    let mut path = [(Slot::default(), Side::Left); MAX_HEIGHT];
    let mut depth = 0;
    let mut walk = *root;
    let target = loop {
        let slot = walk?;
        match cmp(key, &arena[slot].entry.key) {
            Ordering::Less => {
                path[depth] = (slot, Side::Left);
                depth += 1;
                walk = arena[slot].left;
            }
            Ordering::Greater => {
                path[depth] = (slot, Side::Right);
                depth += 1;
                walk = arena[slot].right;
            }
            Ordering::Equal => break slot,
        }
    };
    let target_index = depth;

    let removed_color;
    if let Some(subtree) = arena[target].right {
        // The in-order successor's slot takes over the target's position,
        // color, and children; the successor's own position is what gets
        // physically vacated.
        path[depth] = (target, Side::Right);
        depth += 1;
        let mut succ = subtree;
        while let Some(next) = arena[succ].left {
            path[depth] = (succ, Side::Left);
            depth += 1;
            succ = next;
        }

        let hoisted = arena[succ].right;
        let (succ_parent, side) = path[depth - 1];
        arena[succ_parent].set_child(side, hoisted);

        removed_color = arena[succ].color;
        let (left, right, color) = {
            let node = &arena[target];
            (node.left, node.right, node.color)
        };
        {
            let node = &mut arena[succ];
            node.left = left;
            node.right = right;
            node.color = color;
        }
        path[target_index].0 = succ;
        let above = if target_index >= 1 {
            Some(path[target_index - 1])
        } else {
            None
        };
        relink(arena, root, above, succ);
    } else {
        removed_color = arena[target].color;
        let lifted = arena[target].left;
        match depth {
            0 => *root = lifted,
            _ => {
                let (parent, side) = path[depth - 1];
                arena[parent].set_child(side, lifted);
            }
        }
        if let Some(slot) = lifted {
            // A node with exactly one child is black with a red child;
            // recoloring the child restores the black count outright.
            arena[slot].color = Color::Black;
            return Some(target);
        }
    }

    if removed_color == Color::Black {
        repair_deficit(arena, root, &path, depth);
    }
    Some(target)
}

/// Restores the equal-black-count invariant after a black slot was vacated.
///
/// `path[depth - 1]` names the parent of the vacated position and the side
/// the deficit is on. Each pass either terminates by rotation or recolor, or
/// pushes the deficit one recorded level up.
fn repair_deficit<K, V>(
    arena: &mut SlotArena<Node<K, V>>,
    root: &mut Link,
    path: &[(Slot, Side)],
    depth: usize,
) {
    let mut level = depth;
    while level >= 1 {
        let (parent, side) = path[level - 1];
        let short = arena[parent].child(side);
        if is_red(arena, short) {
            let slot = short.expect("Expected a red child.");
            arena[slot].color = Color::Black;
            return;
        }

        let mut above = if level >= 2 {
            Some(path[level - 2])
        } else {
            None
        };
        let mut sibling = arena[parent]
            .child(side.opposite())
            .expect("Expected a sibling opposite a black deficit.");
        if arena[sibling].color == Color::Red {
            // Red sibling: lift it above the parent. The parent turns red,
            // so whichever case follows terminates without ascending.
            let subtree = rotate(arena, parent, side);
            arena[subtree].color = Color::Black;
            arena[parent].color = Color::Red;
            relink(arena, root, above, subtree);
            above = Some((subtree, side));
            sibling = arena[parent]
                .child(side.opposite())
                .expect("Expected a sibling opposite a black deficit.");
        }

        let near = arena[sibling].child(side);
        let far = arena[sibling].child(side.opposite());
        if !is_red(arena, near) && !is_red(arena, far) {
            arena[sibling].color = Color::Red;
            if arena[parent].color == Color::Red {
                arena[parent].color = Color::Black;
                return;
            }
            level -= 1;
            continue;
        }

        let sibling = if is_red(arena, far) {
            sibling
        } else {
            // Near nephew red: lift it above the sibling so the far nephew
            // of the rotated configuration is red.
            let subtree = rotate(arena, sibling, side.opposite());
            arena[subtree].color = Color::Black;
            arena[sibling].color = Color::Red;
            arena[parent].set_child(side.opposite(), Some(subtree));
            subtree
        };
        let far = arena[sibling]
            .child(side.opposite())
            .expect("Expected a red far nephew.");
        let subtree = rotate(arena, parent, side);
        arena[subtree].color = arena[parent].color;
        arena[parent].color = Color::Black;
        arena[far].color = Color::Black;
        relink(arena, root, above, subtree);
        return;
    }
    // The deficit reached the root: every path is uniformly one black
    // shorter and the tree is valid again.
}

/// Deep-copies the tree rooted at `root` into `target`, preserving shape and
/// colors. `clone` produces the payload for each copied node.
pub fn copy<K, V, F>(
    arena: &SlotArena<Node<K, V>>,
    root: Link,
    target: &mut SlotArena<Node<K, V>>,
    clone: &mut F,
) -> Link
where
    F: FnMut(&Entry<K, V>) -> Entry<K, V>,
{
    root.map(|slot| {
        let (entry, color, left, right) = {
            let node = &arena[slot];
            (clone(&node.entry), node.color, node.left, node.right)
        };
        let left = copy(arena, left, target, clone);
        let right = copy(arena, right, target, clone);
        target.allocate(Node {
            entry,
            color,
            left,
            right,
        })
    })
}
