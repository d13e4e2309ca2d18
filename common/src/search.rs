use nalgebra::{Scalar, Vector3};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchType<T> {
    /// The `k` nearest points.
    Knn(usize),
    /// Every point strictly closer than the radius.
    Radius(T),
}

pub trait Searcher<'a, T: Scalar> {
    /// Collects `(distance, index)` pairs of the points matching `ty` around
    /// `pivot` into `result`, which is cleared first. The order of the pairs
    /// is unspecified.
    fn search(&self, pivot: &Vector3<T>, ty: SearchType<T>, result: &mut Vec<(T, usize)>);
}
