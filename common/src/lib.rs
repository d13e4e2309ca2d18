pub mod filter;
pub mod normals;
pub mod point_cloud;
pub mod search;

pub use nalgebra::Vector3;
