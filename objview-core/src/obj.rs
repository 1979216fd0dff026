/// Loader for the vertex/normal/face geometry text format
///
/// Three record types are understood, one per line:
///
/// ```text
/// v <x> <y> <z> [<r> <g> <b>]
/// vn <x> <y> <z>
/// f <p1>//<n1> <p2>//<n2> <p3>//<n3>
/// ```
///
/// Every other line is skipped. Face indices are 1-based on disk and only the
/// position index of each corner is kept. After parsing, positions are
/// recentered on their bounding-box midpoint and divided by the largest axis
/// span, so every loaded model fits a unit box without changing its aspect.
use nalgebra::{Point3, Vector3};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, space0, space1, u32 as index},
    combinator::{eof, opt, recognize},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use crate::error::{LoadError, LoadResult};
use crate::geometry::Mesh;

/// Per-axis extrema of a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Bounds {
    /// Bounds of the given points, or `None` when there are none.
    pub fn of(points: &[Point3<f32>]) -> Option<Self> {
        let first = *points.first()?;
        Some(points.iter().skip(1).fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: b.min.inf(p),
                max: b.max.sup(p),
            },
        ))
    }

    pub fn midpoint(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn span(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// The largest of the three axis spans.
    pub fn largest_span(&self) -> f32 {
        self.span().max()
    }
}

/// One parsed line of the input.
#[derive(Debug, Clone, PartialEq)]
enum Record {
    Position(Point3<f32>),
    Normal(Vector3<f32>),
    Face([u32; 3]),
    Skip,
}

/// Load a model from disk, then normalize it.
pub fn load<P: AsRef<Path>>(path: P) -> LoadResult<Mesh> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse(&text)?;
    log::info!(
        "loaded {} ({} vertices, {} normals, {} triangles)",
        path.display(),
        mesh.vertex_count(),
        mesh.normals.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load several independent models in parallel.
///
/// Results come back in the order of `paths`; when several loads fail the
/// error of the earliest path is returned.
pub fn load_all<P: AsRef<Path> + Sync>(paths: &[P]) -> LoadResult<Vec<Mesh>> {
    let results: Vec<LoadResult<Mesh>> = paths.par_iter().map(load).collect();
    results.into_iter().collect()
}

/// Parse model text and normalize the result.
pub fn parse(input: &str) -> LoadResult<Mesh> {
    let mut mesh = Mesh::new();
    let mut faces: Vec<(usize, [u32; 3])> = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line_no = number + 1;
        match parse_line(line_no, line)? {
            Record::Position(p) => mesh.vertices.push(p),
            Record::Normal(n) => mesh.normals.push(n),
            Record::Face(corners) => faces.push((line_no, corners)),
            Record::Skip => log::trace!("skipping line {}: {:?}", line_no, line),
        }
    }

    let vertex_count = mesh.vertices.len();
    mesh.indices.reserve(faces.len() * 3);
    for (line, corners) in faces {
        for index in corners {
            if index as usize > vertex_count {
                return Err(LoadError::IndexOutOfRange {
                    line,
                    index,
                    vertex_count,
                });
            }
            mesh.indices.push(index - 1);
        }
    }

    normalize(&mut mesh.vertices)?;
    Ok(mesh)
}

/// Recenter positions on their bounding-box midpoint and divide by the largest
/// axis span. Fails instead of dividing by a zero span.
pub fn normalize(vertices: &mut [Point3<f32>]) -> LoadResult<Bounds> {
    let bounds = Bounds::of(vertices).ok_or(LoadError::Degenerate { span: 0.0 })?;
    let scale = bounds.largest_span();
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LoadError::Degenerate { span: scale });
    }

    let midpoint = bounds.midpoint();
    log::debug!("normalizing around {:?} by {}", midpoint, scale);
    for v in vertices.iter_mut() {
        *v = Point3::from((*v - midpoint) / scale);
    }
    Ok(bounds)
}

fn parse_line(line_no: usize, line: &str) -> LoadResult<Record> {
    let line = line.trim();
    let (parsed, expected) = match line.split_whitespace().next() {
        Some("v") => (
            position(line),
            "vertex expects `v x y z` with an optional `r g b`",
        ),
        Some("vn") => (normal(line), "normal expects `vn x y z`"),
        Some("f") => (
            face(line),
            "face expects three corners such as `f 1//1 2//2 3//3`",
        ),
        _ => return Ok(Record::Skip),
    };
    let (_, record) = parsed.map_err(|_| LoadError::malformed(line_no, expected))?;

    let problem = match &record {
        Record::Position(p) if !p.iter().all(|c| c.is_finite()) => {
            Some("coordinates must be finite")
        }
        Record::Normal(n) if !n.iter().all(|c| c.is_finite()) => {
            Some("coordinates must be finite")
        }
        Record::Face(corners) if corners.contains(&0) => Some("face indices start at 1"),
        _ => None,
    };
    match problem {
        Some(message) => Err(LoadError::malformed(line_no, message)),
        None => Ok(record),
    }
}

fn position(input: &str) -> IResult<&str, Record> {
    let (input, _) = tag("v")(input)?;
    let (input, (x, y, z)) = vector3(input)?;
    // Per-vertex color is read but not kept.
    let (input, _color) = opt(vector3)(input)?;
    let (input, _) = end(input)?;
    Ok((input, Record::Position(Point3::new(x, y, z))))
}

fn normal(input: &str) -> IResult<&str, Record> {
    let (input, _) = tag("vn")(input)?;
    let (input, (x, y, z)) = vector3(input)?;
    let (input, _) = end(input)?;
    Ok((input, Record::Normal(Vector3::new(x, y, z))))
}

fn face(input: &str) -> IResult<&str, Record> {
    let (input, _) = tag("f")(input)?;
    let (input, a) = preceded(space1, corner)(input)?;
    let (input, b) = preceded(space1, corner)(input)?;
    let (input, c) = preceded(space1, corner)(input)?;
    let (input, _) = end(input)?;
    Ok((input, Record::Face([a, b, c])))
}

/// A face corner: the position index, optionally followed by `//n`, `/t` or
/// `/t/n`. Only the position index is returned.
fn corner(input: &str) -> IResult<&str, u32> {
    let (input, position) = index(input)?;
    let (input, _) = opt(alt((
        recognize(preceded(tag("//"), digit1)),
        recognize(tuple((char('/'), digit1, opt(preceded(char('/'), digit1))))),
    )))(input)?;
    Ok((input, position))
}

fn vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    tuple((
        preceded(space1, float),
        preceded(space1, float),
        preceded(space1, float),
    ))(input)
}

fn end(input: &str) -> IResult<&str, &str> {
    preceded(space0, eof)(input)
}
