use nalgebra::{RealField, Scalar, Vector3};
use pcseg_common::search::{SearchType, Searcher};
use pcseg_kdtree::{KnnResultSet, RadiusResultSet, ResultSet};

/// Answers every query with a linear scan over all points.
#[derive(Debug, Copy, Clone)]
pub struct BruteForce<'a, T: Scalar> {
    coords: &'a [Vector3<T>],
}

impl<'a, T: Scalar> BruteForce<'a, T> {
    #[inline]
    pub fn new(coords: &'a [Vector3<T>]) -> Self {
        BruteForce { coords }
    }
}

impl<'a, T: RealField + Copy> BruteForce<'a, T> {
    fn scan(&self, pivot: &Vector3<T>, result: &mut impl ResultSet<Key = T, Value = usize>) {
        for (index, coord) in self.coords.iter().enumerate() {
            result.push((coord - pivot).norm(), index);
        }
    }
}

impl<'a, T: RealField + Copy> Searcher<'a, T> for BruteForce<'a, T> {
    fn search(&self, pivot: &Vector3<T>, ty: SearchType<T>, result: &mut Vec<(T, usize)>) {
        result.clear();
        match ty {
            SearchType::Knn(num) => {
                let mut rs = KnnResultSet::new(num);
                self.scan(pivot, &mut rs);
                result.extend(rs);
            }
            SearchType::Radius(radius) => {
                let mut rs = RadiusResultSet::new(radius);
                self.scan(pivot, &mut rs);
                result.extend(rs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brute_force_radius() {
        let points = [
            Vector3::new(0.0f32, 0., 0.),
            Vector3::new(1., 0., 0.),
            Vector3::new(0., 2., 0.),
        ];
        let mut result = Vec::new();
        BruteForce::new(&points).search(&Vector3::zeros(), SearchType::Radius(1.5), &mut result);
        result.sort_by_key(|(_, index)| *index);
        assert_eq!(result, vec![(0., 0), (1., 1)]);
    }
}
