//! Ordered collections backed by typed arenas.
//!
//! The centerpiece is a red-black tree whose nodes live in [`SlotArena`]
//! slots instead of individually boxed allocations. The engine layer in
//! [`red_black_tree`] operates on a root link and an arena the caller owns:
//! slots are allocated and released by the caller, every ordering decision
//! goes through a caller-supplied comparator closure, and removal hands the
//! unlinked slot back instead of freeing it. [`RedBlackMap`] and
//! [`RedBlackSet`] wrap the engine with a `BTreeMap`-style API.
//!
//! [`SlotArena`]: arena/struct.SlotArena.html
//! [`red_black_tree`]: red_black_tree/index.html
//! [`RedBlackMap`]: red_black_tree/struct.RedBlackMap.html
//! [`RedBlackSet`]: red_black_tree/struct.RedBlackSet.html

#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod entry;
pub mod red_black_tree;
