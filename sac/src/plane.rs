use nalgebra::{RealField, Scalar, Vector3};
use num::ToPrimitive;
use sample_consensus::{Estimator, Model};

/// Sine of the smallest angle between the two sample edges for a sample to
/// span a plane.
const COLLINEAR_EPSILON: f64 = 1e-6;

/// A plane through `coords` with the unit normal `normal`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane<T: Scalar> {
    pub coords: Vector3<T>,
    pub normal: Vector3<T>,
}

impl<T: RealField + Copy> Plane<T> {
    /// The plane through three points, or `None` if they are (nearly)
    /// collinear or coincide.
    pub fn through(a: &Vector3<T>, b: &Vector3<T>, c: &Vector3<T>) -> Option<Self> {
        let xa = b - a;
        let xb = c - a;
        let normal = xa.cross(&xb);

        let limit = nalgebra::convert::<f64, T>(COLLINEAR_EPSILON) * xa.norm() * xb.norm();
        if !(normal.norm() > limit) {
            return None;
        }
        Some(Plane {
            coords: *a,
            normal: normal.normalize(),
        })
    }

    /// The `d` in `normal · x + d = 0`.
    pub fn offset(&self) -> T {
        -self.normal.dot(&self.coords)
    }

    pub fn distance_directed(&self, point: &Vector3<T>) -> T {
        (point - self.coords).dot(&self.normal)
    }

    pub fn distance(&self, point: &Vector3<T>) -> T {
        self.distance_directed(point).abs()
    }

    pub fn project(&self, point: &Vector3<T>) -> Vector3<T> {
        point - self.normal * self.distance_directed(point)
    }
}

impl<T: RealField + Copy + ToPrimitive> Model<Vector3<T>> for Plane<T> {
    fn residual(&self, data: &Vector3<T>) -> f64 {
        self.distance(data).to_f64().unwrap_or(f64::INFINITY)
    }
}

pub struct PlaneEstimator;

impl<T: RealField + Copy + ToPrimitive> Estimator<Vector3<T>> for PlaneEstimator {
    type Model = Plane<T>;

    type ModelIter = Option<Plane<T>>;

    const MIN_SAMPLES: usize = 3;

    fn estimate<I>(&self, mut data: I) -> Self::ModelIter
    where
        I: Iterator<Item = Vector3<T>> + Clone,
    {
        match (data.next(), data.next(), data.next()) {
            (Some(a), Some(b), Some(c)) => Plane::through(&a, &b, &c),
            _ => None,
        }
    }
}
