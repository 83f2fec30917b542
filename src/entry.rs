use std::cmp::Ordering;

/// A key-value pair that is ordered by its key.
#[derive(Serialize, Deserialize, Debug)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Ord for Entry<K, V>
where
    K: Ord,
{
    fn cmp(&self, other: &Entry<K, V>) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<K, V> PartialOrd for Entry<K, V>
where
    K: Ord,
{
    fn partial_cmp(&self, other: &Entry<K, V>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, V> PartialEq for Entry<K, V>
where
    K: Ord,
{
    fn eq(&self, other: &Entry<K, V>) -> bool {
        self.key == other.key
    }
}

impl<K, V> Eq for Entry<K, V> where K: Ord {}
