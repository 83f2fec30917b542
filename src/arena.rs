//! Fast, but limited typed allocator.

use std::mem;
use std::ops::{Index, IndexMut};

/// A handle to an occupied slot in a `SlotArena<T>`.
///
/// Slots are plain copyable values, so they can be stored in other data
/// structures (for example as tree links) without borrowing the arena.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Slot {
    chunk_index: usize,
    block_index: usize,
}

enum Block<T> {
    Used(T),
    Free(Option<Slot>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// The arena hands out `Slot` handles instead of references, so objects can
/// freely refer to each other by slot while the arena remains the single
/// owner of their storage. Storage grows in fixed-size chunks and is never
/// reallocated, and released slots are recycled through an internal free
/// list. The underlying containers are plain `Vec`s and the implementation
/// uses no unsafe code.
///
/// # Examples
///
/// ```
/// use arena_collections::arena::SlotArena;
///
/// let mut arena = SlotArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.release(x), 2);
/// ```
pub struct SlotArena<T> {
    head: Option<Slot>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    len: usize,
    capacity: usize,
}

impl<T> SlotArena<T> {
    fn is_valid_slot(&self, slot: Slot) -> bool {
        slot.chunk_index < self.chunks.len()
            && slot.block_index < self.chunks[slot.chunk_index].len()
    }

    /// Constructs a new, empty `SlotArena<T>` with a specific number of
    /// objects per chunk.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let arena: SlotArena<u32> = SlotArena::new(1024);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        SlotArena {
            head: None,
            chunks: Vec::new(),
            chunk_size,
            len: 0,
            capacity: 0,
        }
    }

    /// Allocates an object in the arena and returns its `Slot`. The slot can
    /// later be used to retrieve references to the object and to release it.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new(1024);
    /// let x = arena.allocate(0);
    /// ```
    pub fn allocate(&mut self, value: T) -> Slot {
        if self.len == self.capacity {
            self.chunks.push(Vec::with_capacity(self.chunk_size));
            self.capacity += self.chunk_size;
        }
        self.len += 1;

        match self.head.take() {
            None => {
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Used(value));
                Slot {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                }
            }
            Some(slot) => {
                let free_block = mem::replace(
                    &mut self.chunks[slot.chunk_index][slot.block_index],
                    Block::Used(value),
                );

                match free_block {
                    Block::Free(next_slot) => {
                        self.head = next_slot;
                        slot
                    }
                    Block::Used(_) => panic!("Expected a free block."),
                }
            }
        }
    }

    /// Releases a slot and returns the object it held. The slot becomes
    /// available for reuse by later allocations.
    ///
    /// # Panics
    ///
    /// Panics if `slot` does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.release(x), 0);
    /// ```
    pub fn release(&mut self, slot: Slot) -> T {
        if !self.is_valid_slot(slot) {
            panic!("Error: attempting to release invalid slot.");
        }
        let old_block = mem::replace(
            &mut self.chunks[slot.chunk_index][slot.block_index],
            Block::Free(self.head.take()),
        );
        match old_block {
            Block::Free(_) => panic!("Error: attempting to release free slot."),
            Block::Used(value) => {
                self.len -= 1;
                self.head = Some(slot);
                value
            }
        }
    }

    /// Returns an immutable reference to the object in a slot. Returns `None`
    /// if the slot does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get(x), Some(&0));
    /// ```
    pub fn get(&self, slot: Slot) -> Option<&T> {
        if !self.is_valid_slot(slot) {
            return None;
        }
        match self.chunks[slot.chunk_index][slot.block_index] {
            Block::Used(ref value) => Some(value),
            Block::Free(_) => None,
        }
    }

    /// Returns a mutable reference to the object in a slot. Returns `None` if
    /// the slot does not refer to an occupied block.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new(1024);
    /// let x = arena.allocate(0);
    /// assert_eq!(arena.get_mut(x), Some(&mut 0));
    /// ```
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut T> {
        if !self.is_valid_slot(slot) {
            return None;
        }
        match self.chunks[slot.chunk_index][slot.block_index] {
            Block::Used(ref mut value) => Some(value),
            Block::Free(_) => None,
        }
    }

    /// Returns the number of occupied slots in the arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let mut arena = SlotArena::new(1024);
    /// arena.allocate(0);
    /// assert_eq!(arena.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no objects.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::arena::SlotArena;
    ///
    /// let arena: SlotArena<u32> = SlotArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Index<Slot> for SlotArena<T> {
    type Output = T;

    fn index(&self, slot: Slot) -> &Self::Output {
        self.get(slot).expect("Error: slot out of bounds.")
    }
}

impl<T> IndexMut<Slot> for SlotArena<T> {
    fn index_mut(&mut self, slot: Slot) -> &mut Self::Output {
        self.get_mut(slot).expect("Error: slot out of bounds.")
    }
}
