use nalgebra::{RealField, Scalar, Vector3};
use num::ToPrimitive;
use pcseg_common::{normals, point_cloud::PointCloud};
use rand::{rngs::ThreadRng, RngCore};

use crate::{base::SegmentConfig, ransac::PlaneRansac};

/// The planar objects found in a cloud, in extraction order, and the points
/// left over.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation<T: Scalar> {
    pub objects: Vec<PointCloud<Vector3<T>>>,
    pub residual: PointCloud<Vector3<T>>,
}

impl<T: Scalar> Segmentation<T> {
    /// The objects followed by the residual. The residual is always present,
    /// an empty last group means nothing was left over.
    pub fn into_groups(self) -> Vec<PointCloud<Vector3<T>>> {
        let mut groups = self.objects;
        groups.push(self.residual);
        groups
    }
}

/// Peels planes off a cloud one at a time with [`PlaneRansac`].
pub struct MultiPlaneSegmenter<T: Scalar, R: RngCore = ThreadRng> {
    config: SegmentConfig<T>,
    ransac: PlaneRansac<T, R>,
}

impl<T: Scalar + Copy, R: RngCore> MultiPlaneSegmenter<T, R> {
    pub fn new(config: SegmentConfig<T>, rng: R) -> Self {
        MultiPlaneSegmenter {
            config,
            ransac: PlaneRansac::new(config.ransac, rng),
        }
    }

    pub fn config(&self) -> &SegmentConfig<T> {
        &self.config
    }
}

impl<T: RealField + Copy + ToPrimitive, R: RngCore> MultiPlaneSegmenter<T, R> {
    /// Extracts up to `max_objects` planes from `points`.
    ///
    /// Each round fits a plane to the points not yet assigned. The plane is
    /// kept as an object if its inliers make up at least `min_inliers_ratio`
    /// of the whole input (not of the remaining points); the first rejected
    /// plane ends the segmentation.
    ///
    /// The residual holds the unassigned points. It is empty when every point
    /// went into an object or the input is empty, and
    /// [`Segmentation::into_groups`] still appends it as the last group.
    pub fn segment(
        &mut self,
        points: &[Vector3<T>],
        normals: Option<&[Vector3<T>]>,
    ) -> Segmentation<T> {
        let SegmentConfig {
            max_objects,
            min_inliers_ratio,
            ..
        } = self.config;
        let total = nalgebra::convert::<f64, T>(points.len() as f64);

        let mut objects = Vec::new();
        let mut remaining = PointCloud::from_vec(points.to_vec());
        let mut remaining_normals = normals::aligned(normals, points.len())
            .map(|normals| PointCloud::from_vec(normals.to_vec()));

        let mut inliers_ratio = T::one();
        while objects.len() < max_objects && inliers_ratio >= min_inliers_ratio {
            if remaining.is_empty() {
                break;
            }

            let (inliers, outliers) = self.ransac.fit(&remaining, remaining_normals.as_deref());
            inliers_ratio = nalgebra::convert::<f64, T>(inliers.len() as f64) / total;

            if inliers_ratio >= min_inliers_ratio {
                log::debug!(
                    "Object {} has {} points, {} remaining",
                    objects.len(),
                    inliers.len(),
                    outliers.len()
                );
                objects.push(remaining.create_sub(&inliers));
                remaining = remaining.create_sub(&outliers);
                remaining_normals = remaining_normals.map(|normals| normals.create_sub(&outliers));
            }
        }

        Segmentation {
            objects,
            residual: remaining,
        }
    }
}
