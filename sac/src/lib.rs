mod base;
mod plane;
mod ransac;
mod segment;

pub use self::{
    base::{RansacConfig, SegmentConfig},
    plane::{Plane, PlaneEstimator},
    ransac::PlaneRansac,
    segment::{MultiPlaneSegmenter, Segmentation},
};
