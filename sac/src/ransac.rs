use nalgebra::{RealField, Scalar, Vector3};
use num::ToPrimitive;
use pcseg_common::normals;
use pcseg_filters::OutlierFilter;
use rand::{rngs::ThreadRng, RngCore};
use sample_consensus::Estimator;

use crate::{
    base::{sample_indices, RansacConfig},
    plane::{Plane, PlaneEstimator},
};

/// Fits one plane to a point set by random sample consensus.
///
/// Every iteration fits a plane through 3 points drawn with replacement and
/// counts the points within `threshold` of it. When normals are given, a
/// point must also face the same way as the plane (front) or the opposite way
/// (back); the larger of the two sides is the candidate. The candidate with
/// the most inliers over all iterations wins.
pub struct PlaneRansac<T: Scalar, R: RngCore = ThreadRng> {
    pub config: RansacConfig<T>,
    rng: R,
}

impl<T: Scalar, R: RngCore> PlaneRansac<T, R> {
    pub fn new(config: RansacConfig<T>, rng: R) -> Self {
        PlaneRansac { config, rng }
    }
}

impl<T: RealField + Copy + ToPrimitive, R: RngCore> PlaneRansac<T, R> {
    /// Returns the inlier and outlier indices of the best plane found.
    ///
    /// Normals that are not exactly one per point are ignored. Samples that
    /// don't span a plane use up their iteration; if no iteration yields a
    /// plane, every point is an outlier.
    pub fn fit(
        &mut self,
        points: &[Vector3<T>],
        normals: Option<&[Vector3<T>]>,
    ) -> (Vec<usize>, Vec<usize>) {
        if points.is_empty() {
            return (Vec::new(), Vec::new());
        }
        let normals = normals::aligned(normals, points.len());
        let RansacConfig {
            threshold,
            max_iterations,
            remove_outliers,
            normal_alignment_threshold,
            outlier_filter_k,
            outlier_filter_alpha,
        } = self.config;

        let mut best_plane = None;
        let mut best_inliers = Vec::new();
        let mut best_outliers = (0..points.len()).collect::<Vec<_>>();
        let mut degenerate = 0;

        for _ in 0..max_iterations {
            let sample = sample_indices::<_, 3>(&mut self.rng, points.len());
            let data = sample.iter().map(|&index| points[index]);
            let Some(plane) =
                <PlaneEstimator as Estimator<Vector3<T>>>::estimate(&PlaneEstimator, data)
            else {
                degenerate += 1;
                continue;
            };

            let (inliers, mut outliers) = classify(
                &plane,
                points,
                normals,
                threshold,
                normal_alignment_threshold,
            );

            if inliers.len() > best_inliers.len() {
                outliers.sort_unstable();
                best_plane = Some(plane);
                best_inliers = inliers;
                best_outliers = outliers;
            }
        }

        if let Some(plane) = best_plane {
            log::debug!(
                "Best plane {:?} (offset {:?}) has {} of {} inliers, {} degenerate samples",
                plane.normal.as_slice(),
                plane.offset(),
                best_inliers.len(),
                points.len(),
                degenerate
            );
        } else {
            log::debug!("No plane found in {} iterations", max_iterations);
        }

        if remove_outliers && !best_inliers.is_empty() {
            OutlierFilter::new(outlier_filter_k, outlier_filter_alpha).refine(
                points,
                &best_inliers,
                best_outliers,
            )
        } else {
            (best_inliers, best_outliers)
        }
    }
}

/// Splits the indices of `points` into the inliers of `plane` and the rest.
fn classify<T: RealField + Copy>(
    plane: &Plane<T>,
    points: &[Vector3<T>],
    normals: Option<&[Vector3<T>]>,
    threshold: T,
    alignment: T,
) -> (Vec<usize>, Vec<usize>) {
    let mut front = Vec::new();
    let mut back = Vec::new();
    let mut outliers = Vec::new();

    for (index, point) in points.iter().enumerate() {
        if plane.distance(point) > threshold {
            outliers.push(index);
            continue;
        }
        match normals {
            None => front.push(index),
            Some(normals) => {
                let cos = plane.normal.dot(&normals[index]);
                if cos > alignment {
                    front.push(index)
                } else if cos < -alignment {
                    back.push(index)
                } else {
                    outliers.push(index)
                }
            }
        }
    }

    if back.len() > front.len() {
        outliers.append(&mut front);
        (back, outliers)
    } else {
        outliers.append(&mut back);
        (front, outliers)
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn unit(rng: &mut StdRng) -> f64 {
        rng.next_u32() as f64 / u32::MAX as f64 * 2. - 1.
    }

    fn is_partition(inliers: &[usize], outliers: &[usize], len: usize) -> bool {
        let mut all = inliers.iter().chain(outliers).cloned().collect::<Vec<_>>();
        all.sort_unstable();
        all == (0..len).collect::<Vec<_>>()
    }

    #[test]
    fn test_plane_recovery() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut points = (0..1000)
            .map(|_| {
                let (x, y) = (unit(&mut rng), unit(&mut rng));
                Vector3::new(x, y, 0.3 * x - 0.2 * y + 0.5)
            })
            .collect::<Vec<_>>();
        points.extend(
            (0..200).map(|_| Vector3::new(unit(&mut rng), unit(&mut rng), unit(&mut rng))),
        );

        let mut sac = PlaneRansac::new(RansacConfig::new(0.01, 500), StdRng::seed_from_u64(7));
        let (inliers, outliers) = sac.fit(&points, None);

        assert!(inliers.len() >= 950, "only {} inliers", inliers.len());
        assert!((0..1000).all(|index| inliers.binary_search(&index).is_ok()));
        assert!(is_partition(&inliers, &outliers, points.len()));
    }

    #[test]
    fn test_plane_recovery_f32() {
        let mut rng = StdRng::seed_from_u64(4);
        let points = (0..300)
            .map(|i| {
                if i % 3 == 0 {
                    Vector3::new(unit(&mut rng) as f32, 2., unit(&mut rng) as f32)
                } else {
                    let mut next = || unit(&mut rng) as f32;
                    Vector3::new(next(), next(), next())
                }
            })
            .collect::<Vec<_>>();

        let mut sac = PlaneRansac::new(RansacConfig::new(0.001f32, 300), StdRng::seed_from_u64(9));
        let (inliers, _) = sac.fit(&points, None);
        assert_eq!(inliers, (0..300).step_by(3).collect::<Vec<_>>());
    }

    #[test]
    fn test_normals_pick_larger_side() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut points = Vec::new();
        let mut normals = Vec::new();
        for (num, normal) in [
            (300, Vector3::new(0., 0., 1.)),
            (100, Vector3::new(0., 0., -1.)),
            (50, Vector3::new(1., 0., 0.)),
        ] {
            for _ in 0..num {
                points.push(Vector3::new(unit(&mut rng), unit(&mut rng), 0.));
                normals.push(normal);
            }
        }

        let mut sac = PlaneRansac::new(RansacConfig::new(0.01, 50), StdRng::seed_from_u64(3));
        let (inliers, outliers) = sac.fit(&points, Some(&normals));
        assert_eq!(inliers, (0..300).collect::<Vec<_>>());
        assert_eq!(outliers, (300..450).collect::<Vec<_>>());

        // Misaligned normals are ignored.
        let (inliers, outliers) = sac.fit(&points, Some(&normals[..10]));
        assert_eq!(inliers.len(), 450);
        assert!(outliers.is_empty());
    }

    #[test]
    fn test_remove_outliers() {
        let mut points = { 0..200 }
            .map(|i| Vector3::new((i % 20) as f64 * 0.1, (i / 20) as f64 * 0.1, 1.))
            .collect::<Vec<_>>();
        points.push(Vector3::new(50., 0., 1.));
        points.push(Vector3::new(-50., 3., 1.));
        points.push(Vector3::new(0., 0., 5.));

        let mut config = RansacConfig::new(0.01, 100).with_outlier_removal(true);
        config.outlier_filter_k = 10;
        let mut sac = PlaneRansac::new(config, StdRng::seed_from_u64(21));
        let (inliers, outliers) = sac.fit(&points, None);

        assert_eq!(inliers, (0..200).collect::<Vec<_>>());
        assert_eq!(outliers, vec![202, 200, 201]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut sac = PlaneRansac::new(RansacConfig::new(0.1, 20), StdRng::seed_from_u64(0));

        let (inliers, outliers) = sac.fit(&[], None);
        assert!(inliers.is_empty() && outliers.is_empty());

        let line = (0..40)
            .map(|i| Vector3::new(i as f64, 2. * i as f64, -(i as f64)))
            .collect::<Vec<_>>();
        let (inliers, outliers) = sac.fit(&line, None);
        assert!(inliers.is_empty());
        assert_eq!(outliers, (0..40).collect::<Vec<_>>());

        sac.config.max_iterations = 0;
        let (inliers, outliers) = sac.fit(&line, None);
        assert!(inliers.is_empty());
        assert_eq!(outliers.len(), 40);
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut rng = StdRng::seed_from_u64(8);
        let points = (0..500)
            .map(|_| Vector3::new(unit(&mut rng), unit(&mut rng), unit(&mut rng) * 0.05))
            .collect::<Vec<_>>();

        let config = RansacConfig::new(0.02, 30);
        let first = PlaneRansac::new(config, StdRng::seed_from_u64(99)).fit(&points, None);
        let second = PlaneRansac::new(config, StdRng::seed_from_u64(99)).fit(&points, None);
        assert_eq!(first, second);
    }
}
