use nalgebra::{Scalar, Vector3};

/// Returns `normals` only if it holds exactly one normal per point.
///
/// Misaligned normals are treated as not provided at all.
pub fn aligned<'a, T: Scalar>(
    normals: Option<&'a [Vector3<T>]>,
    num_points: usize,
) -> Option<&'a [Vector3<T>]> {
    match normals {
        Some(normals) if normals.len() == num_points => Some(normals),
        Some(normals) => {
            log::warn!(
                "Normals count ({}) is different from points count ({}), normals ignored",
                normals.len(),
                num_points
            );
            None
        }
        None => None,
    }
}
