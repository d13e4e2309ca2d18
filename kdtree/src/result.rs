pub trait ResultSet {
    type Key;
    type Value;

    fn push(&mut self, key: Self::Key, value: Self::Value);

    fn is_full(&self) -> bool;

    fn max_key(&self) -> Option<&Self::Key>;
}

/// Keeps the `num` entries with the smallest keys, sorted by key.
///
/// Entries are inserted in order and the largest one is evicted once the set
/// grows past `num`.
#[derive(Debug, Clone)]
pub struct KnnResultSet<K, V> {
    data: Vec<(K, V)>,
    num: usize,
}

impl<K: PartialOrd, V> KnnResultSet<K, V> {
    pub fn new(num: usize) -> Self {
        KnnResultSet {
            data: Vec::with_capacity(num.min(256) + 1),
            num,
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates the entries from the nearest to the farthest.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.data.iter().map(|(key, value)| (key, value))
    }
}

impl<K, V> IntoIterator for KnnResultSet<K, V> {
    type Item = (K, V);

    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<K: PartialOrd, V> ResultSet for KnnResultSet<K, V> {
    type Key = K;
    type Value = V;

    fn push(&mut self, key: K, value: V) {
        if self.num == 0 {
            return;
        }
        if self.is_full() && self.max_key().map_or(false, |max| *max <= key) {
            return;
        }

        let pos = self.data.partition_point(|(k, _)| *k <= key);
        self.data.insert(pos, (key, value));
        if self.data.len() > self.num {
            self.data.pop();
        }
    }

    fn is_full(&self) -> bool {
        self.data.len() >= self.num
    }

    fn max_key(&self) -> Option<&K> {
        self.data.last().map(|(key, _)| key)
    }
}

/// Keeps every entry whose key is strictly smaller than the radius.
#[derive(Debug, Clone)]
pub struct RadiusResultSet<K, V> {
    data: Vec<(K, V)>,
    radius: K,
}

impl<K: PartialOrd, V> RadiusResultSet<K, V> {
    pub fn new(radius: K) -> Self {
        RadiusResultSet {
            data: Vec::with_capacity(128),
            radius,
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.data.iter().map(|(key, value)| (key, value))
    }
}

impl<K, V> IntoIterator for RadiusResultSet<K, V> {
    type Item = (K, V);

    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<K: PartialOrd, V> ResultSet for RadiusResultSet<K, V> {
    type Key = K;
    type Value = V;

    fn push(&mut self, key: K, value: V) {
        if key < self.radius {
            self.data.push((key, value));
        }
    }

    fn is_full(&self) -> bool {
        true
    }

    fn max_key(&self) -> Option<&K> {
        Some(&self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knn_result_set() {
        let mut rs = KnnResultSet::new(3);
        for (key, value) in [(5.0f32, 0), (1.0, 1), (4.0, 2), (2.0, 3), (9.0, 4), (3.0, 5)] {
            rs.push(key, value);
        }
        assert!(rs.is_full());
        assert_eq!(rs.max_key(), Some(&3.0));
        let values = rs.into_iter().map(|(_, v)| v).collect::<Vec<_>>();
        assert_eq!(values, vec![1, 3, 5]);
    }

    #[test]
    fn test_knn_result_set_not_full() {
        let mut rs = KnnResultSet::new(10);
        rs.push(2.0f64, 'a');
        rs.push(7.0, 'b');
        rs.push(1.0, 'c');
        assert!(!rs.is_full());
        assert_eq!(rs.len(), 3);
        assert_eq!(rs.iter().map(|(k, _)| *k).collect::<Vec<_>>(), vec![1.0, 2.0, 7.0]);
    }

    #[test]
    fn test_radius_result_set_is_strict() {
        let mut rs = RadiusResultSet::new(1.0f32);
        rs.push(0.5, 0);
        rs.push(1.0, 1);
        rs.push(1.5, 2);
        assert_eq!(rs.len(), 1);
        assert_eq!(rs.iter().next(), Some((&0.5, &0)));
    }
}
