use std::ops::{Deref, Index, IndexMut};

/// An unordered cloud of points. The position of a point in the storage is its
/// identity: every search and classification result refers to points by
/// index into this storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCloud<P> {
    storage: Vec<P>,
}

impl<P> PointCloud<P> {
    #[inline]
    pub fn new() -> Self {
        PointCloud {
            storage: Vec::new(),
        }
    }

    #[inline]
    pub fn from_vec(storage: Vec<P>) -> Self {
        PointCloud { storage }
    }

    #[inline]
    pub fn into_vec(self) -> Vec<P> {
        self.storage
    }
}

impl<P: Clone> PointCloud<P> {
    /// Copies the points at `indices`, in that order, into a fresh contiguous
    /// cloud.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    #[inline]
    pub fn create_sub(&self, indices: &[usize]) -> Self {
        PointCloud {
            storage: { indices.iter() }
                .map(|&index| self.storage[index].clone())
                .collect(),
        }
    }
}

impl<P> Default for PointCloud<P> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Deref for PointCloud<P> {
    type Target = [P];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.storage
    }
}

impl<P> AsRef<[P]> for PointCloud<P> {
    #[inline]
    fn as_ref(&self) -> &[P] {
        &self.storage
    }
}

impl<P> Index<usize> for PointCloud<P> {
    type Output = P;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.storage[index]
    }
}

impl<P> IndexMut<usize> for PointCloud<P> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.storage[index]
    }
}

impl<P> From<Vec<P>> for PointCloud<P> {
    #[inline]
    fn from(storage: Vec<P>) -> Self {
        PointCloud::from_vec(storage)
    }
}

impl<P> FromIterator<P> for PointCloud<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        PointCloud::from_vec(iter.into_iter().collect())
    }
}

impl<P> IntoIterator for PointCloud<P> {
    type Item = P;

    type IntoIter = std::vec::IntoIter<P>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.into_iter()
    }
}

impl<'a, P> IntoIterator for &'a PointCloud<P> {
    type Item = &'a P;

    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}
