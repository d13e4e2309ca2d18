use bitvec::vec::BitVec;
use nalgebra::{RealField, Scalar, Vector3};
use pcseg_common::{
    filter::Filter,
    search::SearchType,
};
use pcseg_search::searcher;

const RELATIVE_EPSILON: f64 = 1e-6;

/// Calculate the mean distance between each point and its `mean_k` nearest
/// neighbors. If its mean distance is farther than `stddev_mul` standard
/// deviations from the overall mean distance, on either side, then it'll be
/// removed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct OutlierFilter<T: Scalar> {
    pub mean_k: usize,
    pub stddev_mul: T,
}

impl<T: Scalar> OutlierFilter<T> {
    pub fn new(mean_k: usize, stddev_mul: T) -> Self {
        OutlierFilter { mean_k, stddev_mul }
    }
}

impl<T: RealField + Copy> Default for OutlierFilter<T> {
    fn default() -> Self {
        OutlierFilter {
            mean_k: 200,
            stddev_mul: T::one(),
        }
    }
}

impl<T: RealField + Copy> OutlierFilter<T> {
    /// The mean distance of every point to its `mean_k` nearest other points.
    /// A point without any other point gets zero.
    fn mean_distances(&self, coords: &[Vector3<T>]) -> Vec<T> {
        searcher!(searcher in coords);

        let mut result = Vec::new();
        let mut dmean_of_point = |index: usize, coord: &Vector3<T>| {
            searcher.search(coord, SearchType::Knn(self.mean_k + 1), &mut result);
            result.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let (num, sum) = { result.iter() }
                .filter(|(_, other)| *other != index)
                .take(self.mean_k)
                .fold((0usize, T::zero()), |(num, sum), (distance, _)| {
                    (num + 1, sum + *distance)
                });
            if num == 0 {
                T::zero()
            } else {
                sum / nalgebra::convert::<f64, T>(num as f64)
            }
        };

        { coords.iter().enumerate() }
            .map(|(index, coord)| dmean_of_point(index, coord))
            .collect()
    }

    fn keep_mask(&self, distance: &[T]) -> BitVec {
        let mut keep: BitVec = BitVec::with_capacity(distance.len());
        if distance.is_empty() {
            return keep;
        }

        let dnum = nalgebra::convert::<f64, T>(distance.len() as f64);
        let dmean = distance.iter().fold(T::zero(), |acc, &d| acc + d) / dnum;
        let dvar = { distance.iter() }
            .fold(T::zero(), |acc, &d| acc + (d - dmean) * (d - dmean))
            / dnum;
        let dstddev = dvar.sqrt();

        // Spread within rounding of the mean counts as a constant distribution.
        let tolerance = dmean.abs() * nalgebra::convert::<f64, T>(RELATIVE_EPSILON);
        if dstddev <= tolerance {
            keep.resize(distance.len(), true);
            return keep;
        }

        let lower = dmean - dstddev * self.stddev_mul - tolerance;
        let upper = dmean + dstddev * self.stddev_mul + tolerance;
        keep.extend(distance.iter().map(|&d| d >= lower && d <= upper));
        keep
    }

    /// Re-examines `inliers` (indices into `coords`) and moves the ones whose
    /// neighborhood is abnormally sparse or dense into `outliers`.
    ///
    /// Distances are measured among the inliers only.
    pub fn refine(
        &self,
        coords: &[Vector3<T>],
        inliers: &[usize],
        mut outliers: Vec<usize>,
    ) -> (Vec<usize>, Vec<usize>) {
        let subset = inliers.iter().map(|&index| coords[index]).collect::<Vec<_>>();
        let keep = self.keep_mask(&self.mean_distances(&subset));

        let mut kept = Vec::with_capacity(inliers.len());
        for (pos, &index) in inliers.iter().enumerate() {
            if keep[pos] {
                kept.push(index)
            } else {
                outliers.push(index)
            }
        }

        log::debug!(
            "Outlier filter kept {} of {} inliers",
            kept.len(),
            inliers.len()
        );
        (kept, outliers)
    }
}

impl<T: RealField + Copy> Filter<[Vector3<T>]> for OutlierFilter<T> {
    fn filter_indices(&mut self, input: &[Vector3<T>]) -> Vec<usize> {
        self.filter_all_indices(input).0
    }

    fn filter_all_indices(&mut self, input: &[Vector3<T>]) -> (Vec<usize>, Vec<usize>) {
        let indices = (0..input.len()).collect::<Vec<_>>();
        self.refine(input, &indices, Vec::new())
    }
}
