mod read;
mod write;

use std::{
    error::Error,
    fmt::Display,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

use nalgebra::{Scalar, Vector3};

pub use self::write::write_obj;

/// The vertex data of an OBJ file: `v` and `vn` records.
///
/// `normals` and `colors` are either empty or hold exactly one entry per
/// point.
#[derive(Debug, Clone, PartialEq)]
pub struct Obj<T: Scalar> {
    pub points: Vec<Vector3<T>>,
    pub normals: Vec<Vector3<T>>,
    pub colors: Vec<Vector3<T>>,
}

impl<T: Scalar + Display> Obj<T> {
    pub fn write<W: Write>(&self, faces: &[[usize; 3]], writer: W) -> Result<(), Box<dyn Error>> {
        write_obj(writer, &self.points, &self.normals, &self.colors, faces)
    }
}

/// Loads the points, and the normals and colors if they are complete, of the
/// OBJ file at `path`.
pub fn load_obj<T, P>(path: P) -> Result<Obj<T>, Box<dyn Error>>
where
    T: Scalar + FromStr,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|err| format!("Failed to open input obj file {:?}: {}", path, err))?;
    let obj = Obj::parse(BufReader::new(file))
        .map_err(|err| format!("Failed to load obj file {:?}: {}", path, err))?;

    log::info!(
        "Loaded {} points from obj file {:?}{}",
        obj.points.len(),
        path,
        match (obj.normals.is_empty(), obj.colors.is_empty()) {
            (false, false) => " (with normals and colors)",
            (false, true) => " (with normals)",
            (true, false) => " (with colors)",
            (true, true) => "",
        }
    );
    Ok(obj)
}

/// Saves points, with their normals and colors when those are complete, and
/// triangles to the OBJ file at `path`.
pub fn save_obj<T, P>(
    path: P,
    points: &[Vector3<T>],
    normals: &[Vector3<T>],
    colors: &[Vector3<T>],
    faces: &[[usize; 3]],
) -> Result<(), Box<dyn Error>>
where
    T: Scalar + Display,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .map_err(|err| format!("Failed to open output obj file {:?}: {}", path, err))?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, points, normals, colors, faces)?;
    writer.flush()?;

    log::info!(
        "Saved {} points and {} faces to obj file {:?}",
        points.len(),
        faces.len(),
        path
    );
    Ok(())
}
