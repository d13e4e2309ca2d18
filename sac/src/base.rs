use nalgebra::{RealField, Scalar};
use rand::RngCore;

/// Parameters of a single plane fit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RansacConfig<T: Scalar> {
    /// Largest perpendicular distance of an inlier to the plane.
    pub threshold: T,
    pub max_iterations: usize,
    /// Pass the winning inliers through an [`OutlierFilter`].
    ///
    /// [`OutlierFilter`]: pcseg_filters::OutlierFilter
    pub remove_outliers: bool,
    /// Smallest absolute cosine between the plane normal and a point normal
    /// for the point to count as an inlier.
    pub normal_alignment_threshold: T,
    pub outlier_filter_k: usize,
    pub outlier_filter_alpha: T,
}

impl<T: RealField + Copy> RansacConfig<T> {
    pub fn new(threshold: T, max_iterations: usize) -> Self {
        RansacConfig {
            threshold,
            max_iterations,
            ..Default::default()
        }
    }

    pub fn with_outlier_removal(mut self, remove_outliers: bool) -> Self {
        self.remove_outliers = remove_outliers;
        self
    }
}

impl<T: RealField + Copy> Default for RansacConfig<T> {
    fn default() -> Self {
        RansacConfig {
            threshold: nalgebra::convert::<f64, T>(0.5),
            max_iterations: 1000,
            remove_outliers: false,
            normal_alignment_threshold: nalgebra::convert::<f64, T>(0.75),
            outlier_filter_k: 200,
            outlier_filter_alpha: T::one(),
        }
    }
}

/// Parameters of a multi-plane segmentation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SegmentConfig<T: Scalar> {
    pub ransac: RansacConfig<T>,
    pub max_objects: usize,
    /// Smallest share of the whole input an object must cover to be kept.
    pub min_inliers_ratio: T,
}

impl<T: RealField + Copy> SegmentConfig<T> {
    pub fn new(ransac: RansacConfig<T>, max_objects: usize, min_inliers_ratio: T) -> Self {
        SegmentConfig {
            ransac,
            max_objects,
            min_inliers_ratio,
        }
    }
}

impl<T: RealField + Copy> Default for SegmentConfig<T> {
    fn default() -> Self {
        SegmentConfig {
            ransac: Default::default(),
            max_objects: 10,
            min_inliers_ratio: nalgebra::convert::<f64, T>(0.05),
        }
    }
}

/// Draws `N` indices in `0..len`, uniformly and with replacement.
pub(crate) fn sample_indices<R: RngCore, const N: usize>(rng: &mut R, len: usize) -> [usize; N] {
    [(); N].map(|_| (rng.next_u64() % len as u64) as usize)
}
