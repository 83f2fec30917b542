extern crate arena_collections;
extern crate proptest;

use arena_collections::arena::SlotArena;
use arena_collections::red_black_tree::node::{Color, Link, Node};
use arena_collections::red_black_tree::{tree, walk};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;

type IntArena = SlotArena<Node<u16, u16>>;

fn ord(a: &u16, b: &u16) -> Ordering {
    a.cmp(b)
}

fn inorder_keys(arena: &IntArena, root: Link) -> Vec<u16> {
    let mut keys = Vec::new();
    walk::walk_inorder(arena, root, &mut |_, entry| keys.push(entry.key));
    keys
}

// Returns the black height; panics on any violated red-black invariant.
fn black_height(arena: &IntArena, link: Link) -> usize {
    match link {
        None => 1,
        Some(slot) => {
            let node = &arena[slot];
            if node.color == Color::Red {
                assert!(!tree::is_red(arena, node.left));
                assert!(!tree::is_red(arena, node.right));
            }
            let left = black_height(arena, node.left);
            let right = black_height(arena, node.right);
            assert_eq!(left, right);
            left + (node.color == Color::Black) as usize
        }
    }
}

fn height(arena: &IntArena, link: Link) -> usize {
    match link {
        None => 0,
        Some(slot) => {
            1 + usize::max(
                height(arena, arena[slot].left),
                height(arena, arena[slot].right),
            )
        }
    }
}

fn validate(arena: &IntArena, root: Link) {
    if let Some(slot) = root {
        assert_eq!(arena[slot].color, Color::Black);
    }
    black_height(arena, root);
    let keys = inorder_keys(arena, root);
    for pair in keys.windows(2) {
        assert!(pair[0] < pair[1]);
    }
    let bound = 2.0 * (keys.len() as f64 + 1.0).log2();
    assert!(height(arena, root) as f64 <= bound);
}

proptest! {
    #[test]
    fn prop_matches_btreemap(ops in prop::collection::vec((any::<bool>(), 0u16..64), 1..256)) {
        let mut arena = IntArena::new(64);
        let mut root = None;
        let mut mirror = BTreeMap::new();

        for (is_insert, key) in ops {
            if is_insert {
                let slot = arena.allocate(Node::new(key, !key));
                match tree::insert(&mut arena, &mut root, slot, &mut ord) {
                    Ok(_) => prop_assert!(mirror.insert(key, !key).is_none()),
                    Err(existing) => {
                        arena.release(slot);
                        prop_assert!(mirror.contains_key(&key));
                        prop_assert_eq!(arena[existing].entry.key, key);
                    }
                }
            } else {
                let removed = tree::remove(&mut arena, &mut root, &key, &mut ord)
                    .map(|slot| arena.release(slot).entry.key);
                prop_assert_eq!(removed, mirror.remove(&key).map(|_| key));
            }
            validate(&arena, root);
        }

        let keys = inorder_keys(&arena, root);
        let mirror_keys = mirror.keys().cloned().collect::<Vec<u16>>();
        prop_assert_eq!(keys, mirror_keys);
        prop_assert_eq!(walk::count(&arena, root), mirror.len());
        prop_assert_eq!(arena.len(), mirror.len());
    }

    #[test]
    fn prop_traversals_agree(keys in prop::collection::vec(any::<u16>(), 0..128)) {
        let mut arena = IntArena::new(64);
        let mut root = None;
        for key in keys {
            let slot = arena.allocate(Node::new(key, 0));
            if tree::insert(&mut arena, &mut root, slot, &mut ord).is_err() {
                arena.release(slot);
            }
        }

        let mut iterative = Vec::new();
        walk::walk_inorder(&arena, root, &mut |slot, _| iterative.push(slot));
        let mut recursive = Vec::new();
        walk::walk_inorder_recursive(&arena, root, &mut |slot, _| recursive.push(slot));
        let mut morris = Vec::new();
        walk::walk_inorder_morris(&mut arena, root, &mut |slot, _| morris.push(slot));
        prop_assert_eq!(&iterative, &recursive);
        prop_assert_eq!(&iterative, &morris);

        let mut iterative = Vec::new();
        walk::walk_postorder(&arena, root, &mut |slot, _| iterative.push(slot));
        let mut recursive = Vec::new();
        walk::walk_postorder_recursive(&arena, root, &mut |slot, _| recursive.push(slot));
        let mut morris = Vec::new();
        walk::walk_postorder_morris(&mut arena, root, &mut |slot, _| morris.push(slot));
        prop_assert_eq!(&iterative, &recursive);
        prop_assert_eq!(&iterative, &morris);

        // A second inorder pass confirms the threading walks restored every
        // link they touched.
        let mut again = Vec::new();
        walk::walk_inorder(&arena, root, &mut |slot, _| again.push(slot));
        let mut inorder = Vec::new();
        walk::walk_inorder_recursive(&arena, root, &mut |slot, _| inorder.push(slot));
        prop_assert_eq!(again, inorder);
        validate(&arena, root);
    }

    #[test]
    fn prop_bounds_match_linear_scan(
        keys in prop::collection::vec(0u16..512, 0..128),
        probe in 0u16..512,
    ) {
        let mut arena = IntArena::new(64);
        let mut root = None;
        let mut sorted = Vec::new();
        for key in keys {
            let slot = arena.allocate(Node::new(key, 0));
            match tree::insert(&mut arena, &mut root, slot, &mut ord) {
                Ok(_) => sorted.push(key),
                Err(_) => {
                    arena.release(slot);
                }
            }
        }
        sorted.sort();

        let key_of = |link: Link| link.map(|slot| arena[slot].entry.key);
        prop_assert_eq!(
            key_of(tree::lower_bound(&arena, root, &probe, &mut ord)),
            sorted.iter().find(|&&k| k >= probe).cloned()
        );
        prop_assert_eq!(
            key_of(tree::upper_bound(&arena, root, &probe, &mut ord)),
            sorted.iter().find(|&&k| k > probe).cloned()
        );
        prop_assert_eq!(
            key_of(tree::rev_lower_bound(&arena, root, &probe, &mut ord)),
            sorted.iter().rev().find(|&&k| k <= probe).cloned()
        );
        prop_assert_eq!(
            key_of(tree::rev_upper_bound(&arena, root, &probe, &mut ord)),
            sorted.iter().rev().find(|&&k| k < probe).cloned()
        );

        let (lower, upper) = tree::equal_range(&arena, root, &probe, &mut ord);
        prop_assert_eq!(lower, tree::lower_bound(&arena, root, &probe, &mut ord));
        prop_assert_eq!(upper, tree::upper_bound(&arena, root, &probe, &mut ord));
    }
}
