use std::{error::Error, fmt::Display, io::Write};

use nalgebra::{Scalar, Vector3};

fn aligned<'a, T>(data: &'a [T], num_points: usize, name: &str) -> Option<&'a [T]> {
    if data.is_empty() {
        None
    } else if data.len() != num_points {
        log::warn!(
            "{} size ({}) is different from points size ({}), {} not saved",
            name,
            data.len(),
            num_points,
            name
        );
        None
    } else {
        Some(data)
    }
}

/// Writes `v` records, with a trailing color if `colors` has one per point,
/// then `vn` records if `normals` has one per point, then `f` records with
/// 1-based indices.
///
/// Writing no points at all writes nothing.
pub fn write_obj<W, T>(
    mut writer: W,
    points: &[Vector3<T>],
    normals: &[Vector3<T>],
    colors: &[Vector3<T>],
    faces: &[[usize; 3]],
) -> Result<(), Box<dyn Error>>
where
    W: Write,
    T: Scalar + Display,
{
    if points.is_empty() {
        log::warn!("Saving 0 points to obj file");
        return Ok(());
    }

    let normals = aligned(normals, points.len(), "normals");
    let colors = aligned(colors, points.len(), "colors");

    for (index, point) in points.iter().enumerate() {
        write!(writer, "v {} {} {}", point.x, point.y, point.z)?;
        if let Some(colors) = colors {
            let color = &colors[index];
            write!(writer, " {} {} {}", color.x, color.y, color.z)?;
        }
        writeln!(writer)?;
    }
    for normal in normals.into_iter().flatten() {
        writeln!(writer, "vn {} {} {}", normal.x, normal.y, normal.z)?;
    }
    for [a, b, c] in faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    Ok(())
}
