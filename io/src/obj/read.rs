use std::{error::Error, io::BufRead, str::FromStr};

use nalgebra::{Scalar, Vector3};

use super::Obj;

fn parse_vector<T: Scalar + FromStr>(fields: &[&str]) -> Option<Vector3<T>> {
    match fields {
        [x, y, z] => Some(Vector3::new(x.parse().ok()?, y.parse().ok()?, z.parse().ok()?)),
        _ => None,
    }
}

/// Drops `data` if it doesn't hold exactly one entry per point.
fn check_aligned<T>(data: &mut Vec<T>, num_points: usize, name: &str) {
    if !data.is_empty() && data.len() != num_points {
        log::warn!(
            "Read {} {} but {} points, {} cleared",
            data.len(),
            name,
            num_points,
            name
        );
        data.clear();
    }
}

impl<T: Scalar + FromStr> Obj<T> {
    /// Reads the `v` and `vn` records of an OBJ file.
    ///
    /// Empty lines and `#` comments are ignored. Any other record, or a `v`
    /// or `vn` record with the wrong number of values, is skipped with a
    /// warning. Fails if reading fails or no point is found.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self, Box<dyn Error>> {
        let mut points = Vec::new();
        let mut normals = Vec::new();
        let mut colors = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line_number = index + 1;

            let mut tokens = line.split_whitespace();
            let ty = match tokens.next() {
                None => continue,
                Some(ty) if ty.starts_with('#') => continue,
                Some(ty) => ty,
            };
            let fields = tokens.collect::<Vec<_>>();

            match ty {
                "v" if fields.len() == 3 || fields.len() == 6 => {
                    let point = parse_vector(&fields[..3]);
                    let color = match fields.len() {
                        6 => parse_vector(&fields[3..]).map(Some),
                        _ => Some(None),
                    };
                    match (point, color) {
                        (Some(point), Some(color)) => {
                            points.push(point);
                            colors.extend(color);
                        }
                        _ => log::warn!(
                            "Failed to read line {}, invalid number in {:?}, line skipped",
                            line_number,
                            line
                        ),
                    }
                }
                "v" => log::warn!(
                    "Failed to read line {}, 3 or 6 values expected but {} read instead, line skipped",
                    line_number,
                    fields.len()
                ),
                "vn" if fields.len() == 3 => match parse_vector(&fields) {
                    Some(normal) => normals.push(normal),
                    None => log::warn!(
                        "Failed to read line {}, invalid number in {:?}, line skipped",
                        line_number,
                        line
                    ),
                },
                "vn" => log::warn!(
                    "Failed to read line {}, 3 values expected but {} read instead, line skipped",
                    line_number,
                    fields.len()
                ),
                _ => log::warn!(
                    "Failed to read line {}, 'v' or 'vn' expected but {:?} read instead, line skipped",
                    line_number,
                    ty
                ),
            }
        }

        if points.is_empty() {
            return Err("No points read".into());
        }
        check_aligned(&mut normals, points.len(), "normals");
        check_aligned(&mut colors, points.len(), "colors");

        Ok(Obj {
            points,
            normals,
            colors,
        })
    }
}
