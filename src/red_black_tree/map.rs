use crate::arena::{Slot, SlotArena};
use crate::entry::Entry;
use crate::red_black_tree::node::{Link, Node};
use crate::red_black_tree::{tree, walk};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::mem;

const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered map implemented using an arena-slotted red-black tree.
///
/// A red-black tree is a self-balancing binary search tree that colors each
/// node red or black to bound its height to at most twice the logarithm of
/// the number of nodes. This map owns a `SlotArena` that stores the nodes,
/// allocating one slot per entry and releasing it again on removal.
///
/// # Examples
///
/// ```
/// use arena_collections::red_black_tree::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// *map.get_mut(&0).unwrap() = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct RedBlackMap<K, V> {
    arena: SlotArena<Node<K, V>>,
    root: Link,
    size: usize,
}

impl<K, V> RedBlackMap<K, V> {
    /// Constructs a new, empty `RedBlackMap<K, V>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        RedBlackMap {
            arena: SlotArena::new(DEFAULT_CHUNK_SIZE),
            root: None,
            size: 0,
        }
    }

    /// Inserts a key-value pair into the map. If the key already exists in
    /// the map, it will return and replace the old key-value pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Ord,
    {
        let slot = self.arena.allocate(Node::new(key, value));
        match tree::insert(&mut self.arena, &mut self.root, slot, &mut |a: &K, b: &K| {
            a.cmp(b)
        }) {
            Ok(_) => {
                self.size += 1;
                None
            }
            Err(existing) => {
                let node = self.arena.release(slot);
                let old = mem::replace(&mut self.arena[existing].entry, node.entry);
                Some((old.key, old.value))
            }
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map,
    /// it will return the associated key-value pair. Otherwise it will
    /// return `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = tree::remove(&mut self.arena, &mut self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })?;
        self.size -= 1;
        let node = self.arena.release(removed);
        let Entry { key, value } = node.entry;
        Some((key, value))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a
    /// particular key. It will return `None` if the key does not exist in
    /// the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })
        .map(|slot| &self.arena[slot].entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let slot = tree::find(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })?;
        Some(&mut self.arena[slot].entry.value)
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        walk::clear(&mut self.arena, &mut self.root, &mut |_| {});
        self.size = 0;
    }

    /// Returns the minimum key of the map. Returns `None` if the map is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&K> {
        tree::leftmost(&self.arena, self.root).map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&K> {
        tree::rightmost(&self.arena, self.root).map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns a key in the map that is less than or equal to a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::rev_lower_bound(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })
        .map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns a key in the map that is greater than or equal to a
    /// particular key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::lower_bound(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })
        .map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns the smallest key in the map that is strictly greater than a
    /// particular key. Returns `None` if such a key does not exist. The key
    /// itself does not need to be in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.succ(&1), Some(&3));
    /// assert_eq!(map.succ(&2), Some(&3));
    /// assert_eq!(map.succ(&3), None);
    /// ```
    pub fn succ<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find_next(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })
        .map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns the largest key in the map that is strictly less than a
    /// particular key. Returns `None` if such a key does not exist. The key
    /// itself does not need to be in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.pred(&3), Some(&1));
    /// assert_eq!(map.pred(&2), Some(&1));
    /// assert_eq!(map.pred(&1), None);
    /// ```
    pub fn pred<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        tree::find_prev(&self.arena, self.root, key, &mut |q: &Q, k: &K| {
            q.cmp(k.borrow())
        })
        .map(|slot| &self.arena[slot].entry.key)
    }

    /// Returns an iterator over the map. The iterator will yield key-value
    /// pairs using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use arena_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> RedBlackMapIter<'_, K, V> {
        RedBlackMapIter {
            arena: &self.arena,
            stack: Vec::new(),
            pending: self.root,
        }
    }
}

impl<K, V> IntoIterator for RedBlackMap<K, V> {
    type IntoIter = RedBlackMapIntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        let RedBlackMap { arena, root, .. } = self;
        RedBlackMapIntoIter {
            arena,
            stack: Vec::new(),
            pending: root,
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RedBlackMap<K, V>
where
    K: 'a,
    V: 'a,
{
    type IntoIter = RedBlackMapIter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `RedBlackMap<K, V>`.
///
/// This iterator traverses the elements of the map in-order and yields owned
/// entries, releasing each slot as it is yielded.
pub struct RedBlackMapIntoIter<K, V> {
    arena: SlotArena<Node<K, V>>,
    stack: Vec<Slot>,
    pending: Link,
}

impl<K, V> Iterator for RedBlackMapIntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.pending {
            self.stack.push(slot);
            self.pending = self.arena[slot].left;
        }
        self.stack.pop().map(|slot| {
            let node = self.arena.release(slot);
            self.pending = node.right;
            let Entry { key, value } = node.entry;
            (key, value)
        })
    }
}

/// An iterator for `RedBlackMap<K, V>`.
///
/// This iterator traverses the elements of the map in-order and yields
/// immutable references.
pub struct RedBlackMapIter<'a, K, V> {
    arena: &'a SlotArena<Node<K, V>>,
    stack: Vec<Slot>,
    pending: Link,
}

impl<'a, K, V> Iterator for RedBlackMapIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(slot) = self.pending {
            self.stack.push(slot);
            self.pending = self.arena[slot].left;
        }
        self.stack.pop().map(|slot| {
            let node = &self.arena[slot];
            self.pending = node.right;
            (&node.entry.key, &node.entry.value)
        })
    }
}

impl<K, V> Default for RedBlackMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for RedBlackMap<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut arena = SlotArena::new(DEFAULT_CHUNK_SIZE);
        let root = tree::copy(&self.arena, self.root, &mut arena, &mut |entry| Entry {
            key: entry.key.clone(),
            value: entry.value.clone(),
        });
        RedBlackMap {
            arena,
            root,
            size: self.size,
        }
    }
}

impl<K, V> fmt::Debug for RedBlackMap<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> PartialEq for RedBlackMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &RedBlackMap<K, V>) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<K, V> Eq for RedBlackMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> Serialize for RedBlackMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.size))?;
        for (key, value) in self {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

struct RedBlackMapVisitor<K, V> {
    marker: PhantomData<(K, V)>,
}

impl<'de, K, V> Visitor<'de> for RedBlackMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = RedBlackMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = RedBlackMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for RedBlackMap<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RedBlackMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackMap;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = RedBlackMap::new();
        let ret_1 = map.insert(1, 1);
        let ret_2 = map.insert(1, 3);
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(ret_1, None);
        assert_eq!(ret_2, Some((1, 1)));
    }

    #[test]
    fn test_remove() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        let ret = map.remove(&1);
        assert!(!map.contains_key(&1));
        assert_eq!(ret, Some((1, 1)));
    }

    #[test]
    fn test_remove_absent() {
        let mut map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.remove(&1), None);
    }

    #[test]
    fn test_get_mut() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_clear() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
        map.insert(1, 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_min_max() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_succ_pred() {
        let mut map = RedBlackMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.succ(&0), Some(&1));
        assert_eq!(map.succ(&1), Some(&3));
        assert_eq!(map.succ(&5), None);

        assert_eq!(map.pred(&6), Some(&5));
        assert_eq!(map.pred(&5), Some(&3));
        assert_eq!(map.pred(&1), None);
    }

    #[test]
    fn test_into_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }

    #[test]
    fn test_clone() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(3, 4);

        let mut cloned = map.clone();
        assert_eq!(map, cloned);

        cloned.insert(5, 6);
        assert_eq!(map.len(), 2);
        assert_eq!(cloned.len(), 3);
    }

    #[test]
    fn test_serde() {
        let mut map = RedBlackMap::new();
        map.insert(1, 2);
        map.insert(3, 4);

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::I32(1),
                Token::I32(2),
                Token::I32(3),
                Token::I32(4),
                Token::MapEnd,
            ],
        );
    }
}
