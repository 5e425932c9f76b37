//! Wavefront `.obj` reading and writing
//!
//! The reader splits a file into [`ObjFileData`] objects. Each object carries
//! only the positions, texture coordinates and normals its faces use, re-indexed
//! locally, so objects can be turned into model units independently.
//!
//! Supported statements: `mtllib`, `usemtl`, `o`, `v`, `vt`, `vn`, `f`.
//! Faces may use `v`, `v/vt`, `v//vn` or `v/vt/vn`, with negative (relative)
//! indices, and polygons are fan-triangulated.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::{Result, TartanError};

/// Name given to geometry that appears before any `o` statement
pub const DEFAULT_OBJECT_NAME: &str = "DefaultName";

/// One corner of a triangle, as zero-based indices into the object's pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceVertex {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// A single object of an `.obj` file together with its material name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjFileData {
    pub name: String,
    pub material_name: String,
    pub vertices: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<[FaceVertex; 3]>,
}

/// Parsed contents of an `.obj` file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjFile {
    /// Material library file name, relative to the `.obj`
    pub material_library: String,
    pub objects: Vec<ObjFileData>,
}

impl ObjFile {
    pub fn parse(path: impl AsRef<Path>) -> Result<ObjFile> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TartanError::FileNotFound(path.to_path_buf()));
        }
        read_obj(BufReader::new(File::open(path)?))
    }
}

/// Faces of the object currently being read, indexing the file-wide pools
struct PendingObject {
    name: Option<String>,
    material_name: Option<String>,
    faces: Vec<[FaceVertex; 3]>,
}

impl PendingObject {
    fn new(name: Option<String>, material_name: Option<String>) -> Self {
        Self {
            name,
            material_name,
            faces: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Pools {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
}

/// Reads an OBJ stream.
///
/// # Errors
/// * [`TartanError::Malformed`] for unparsable numbers or out-of-range indices
/// * [`TartanError::MissingMaterialName`] when an object has faces but no `usemtl`
/// * [`TartanError::MissingMaterialLibrary`] when there is no `mtllib`
pub fn read_obj<R: BufRead>(reader: R) -> Result<ObjFile> {
    let mut pools = Pools::default();
    let mut material_library: Option<String> = None;
    let mut objects = Vec::new();
    let mut current = PendingObject::new(None, None);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (line, ""),
        };

        match keyword {
            "mtllib" => material_library = Some(rest.to_string()),
            "o" => {
                if current.faces.is_empty() {
                    current.name = Some(rest.to_string());
                } else {
                    // usemtl state carries over into the next object
                    let next =
                        PendingObject::new(Some(rest.to_string()), current.material_name.clone());
                    finish_object(std::mem::replace(&mut current, next), &pools, &mut objects)?;
                }
            }
            "usemtl" => {
                let changes = current.material_name.as_deref() != Some(rest);
                if changes && !current.faces.is_empty() {
                    // Keep one material per object: split on a material change
                    let next = PendingObject::new(current.name.clone(), Some(rest.to_string()));
                    finish_object(std::mem::replace(&mut current, next), &pools, &mut objects)?;
                } else {
                    current.material_name = Some(rest.to_string());
                }
            }
            "v" => {
                let values = parse_floats(rest, line_number)?;
                if values.len() < 3 {
                    return Err(malformed(line_number, "vertex needs three coordinates"));
                }
                pools.positions.push([values[0], values[1], values[2]]);
            }
            "vt" => {
                let values = parse_floats(rest, line_number)?;
                if values.is_empty() {
                    return Err(malformed(line_number, "texture coordinate needs a value"));
                }
                pools.tex_coords.push([values[0], values.get(1).copied().unwrap_or(0.0)]);
            }
            "vn" => {
                let values = parse_floats(rest, line_number)?;
                if values.len() < 3 {
                    return Err(malformed(line_number, "normal needs three components"));
                }
                pools.normals.push([values[0], values[1], values[2]]);
            }
            "f" => {
                let corners = rest
                    .split_whitespace()
                    .map(|token| parse_face_vertex(token, &pools, line_number))
                    .collect::<Result<Vec<_>>>()?;

                if corners.len() < 3 {
                    log::warn!(
                        "Skipping face with {} vertices at line {}",
                        corners.len(),
                        line_number
                    );
                    continue;
                }
                for i in 1..corners.len() - 1 {
                    current.faces.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            other => log::debug!("Ignoring OBJ statement '{}' at line {}", other, line_number),
        }
    }

    finish_object(current, &pools, &mut objects)?;

    let material_library = material_library.ok_or(TartanError::MissingMaterialLibrary)?;
    log::debug!(
        "Read {} OBJ objects using material library '{}'",
        objects.len(),
        material_library
    );

    Ok(ObjFile {
        material_library,
        objects,
    })
}

/// Compacts a pending object's pool references into local pools
fn finish_object(
    pending: PendingObject,
    pools: &Pools,
    objects: &mut Vec<ObjFileData>,
) -> Result<()> {
    let name = pending
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_OBJECT_NAME.to_string());

    if pending.faces.is_empty() {
        log::debug!("Dropping OBJ object '{}' without faces", name);
        return Ok(());
    }

    let material_name = pending
        .material_name
        .filter(|material| !material.is_empty())
        .ok_or_else(|| TartanError::MissingMaterialName {
            object: name.clone(),
        })?;

    let mut data = ObjFileData {
        name,
        material_name,
        ..Default::default()
    };

    let mut position_map = HashMap::new();
    let mut tex_map = HashMap::new();
    let mut normal_map = HashMap::new();

    for face in &pending.faces {
        let mut local = *face;
        for corner in local.iter_mut() {
            corner.position = *position_map.entry(corner.position).or_insert_with(|| {
                data.vertices.push(pools.positions[corner.position]);
                data.vertices.len() - 1
            });
            corner.tex_coord = corner.tex_coord.map(|global| {
                *tex_map.entry(global).or_insert_with(|| {
                    data.tex_coords.push(pools.tex_coords[global]);
                    data.tex_coords.len() - 1
                })
            });
            corner.normal = corner.normal.map(|global| {
                *normal_map.entry(global).or_insert_with(|| {
                    data.normals.push(pools.normals[global]);
                    data.normals.len() - 1
                })
            });
        }
        data.faces.push(local);
    }

    objects.push(data);
    Ok(())
}

fn malformed(line: usize, message: impl Into<String>) -> TartanError {
    TartanError::Malformed {
        line,
        message: message.into(),
    }
}

fn parse_floats(rest: &str, line: usize) -> Result<Vec<f32>> {
    rest.split_whitespace()
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|_| malformed(line, format!("'{}' is not a number", token)))
        })
        .collect()
}

/// Resolves a 1-based (or negative, relative) OBJ index against a pool length
fn resolve_index(token: &str, pool_len: usize, what: &str, line: usize) -> Result<usize> {
    let raw: i64 = token
        .parse()
        .map_err(|_| malformed(line, format!("'{}' is not a {} index", token, what)))?;

    let resolved = match raw {
        0 => None,
        r if r > 0 => Some(r as usize - 1),
        r => (pool_len as i64 + r).try_into().ok(),
    };

    match resolved {
        Some(index) if index < pool_len => Ok(index),
        _ => Err(malformed(
            line,
            format!("{} index {} out of range (have {})", what, raw, pool_len),
        )),
    }
}

fn parse_face_vertex(token: &str, pools: &Pools, line: usize) -> Result<FaceVertex> {
    let mut parts = token.split('/');
    let position = match parts.next() {
        Some(p) if !p.is_empty() => resolve_index(p, pools.positions.len(), "vertex", line)?,
        _ => return Err(malformed(line, format!("face vertex '{}' has no position", token))),
    };

    let tex_coord = match parts.next() {
        Some(t) if !t.is_empty() => Some(resolve_index(t, pools.tex_coords.len(), "texture", line)?),
        _ => None,
    };

    let normal = match parts.next() {
        Some(n) if !n.is_empty() => Some(resolve_index(n, pools.normals.len(), "normal", line)?),
        _ => None,
    };

    Ok(FaceVertex {
        position,
        tex_coord,
        normal,
    })
}

/// Writes objects as OBJ text, numbering pools across the whole file
pub fn write_obj<W: Write>(
    writer: &mut W,
    material_library: &str,
    objects: &[ObjFileData],
) -> Result<()> {
    writeln!(writer, "mtllib {}", material_library)?;

    let (mut v_offset, mut vt_offset, mut vn_offset) = (1usize, 1usize, 1usize);
    for object in objects {
        writeln!(writer, "o {}", object.name)?;
        for v in &object.vertices {
            writeln!(writer, "v {} {} {}", v[0], v[1], v[2])?;
        }
        for vt in &object.tex_coords {
            writeln!(writer, "vt {} {}", vt[0], vt[1])?;
        }
        for vn in &object.normals {
            writeln!(writer, "vn {} {} {}", vn[0], vn[1], vn[2])?;
        }
        writeln!(writer, "usemtl {}", object.material_name)?;

        for face in &object.faces {
            write!(writer, "f")?;
            for corner in face {
                let v = corner.position + v_offset;
                match (corner.tex_coord, corner.normal) {
                    (Some(t), Some(n)) => write!(writer, " {}/{}/{}", v, t + vt_offset, n + vn_offset)?,
                    (Some(t), None) => write!(writer, " {}/{}", v, t + vt_offset)?,
                    (None, Some(n)) => write!(writer, " {}//{}", v, n + vn_offset)?,
                    (None, None) => write!(writer, " {}", v)?,
                }
            }
            writeln!(writer)?;
        }

        v_offset += object.vertices.len();
        vt_offset += object.tex_coords.len();
        vn_offset += object.normals.len();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_OBJECTS: &str = "\
# exported
mtllib scene.mtl
o Floor
v -1 0 -1
v 1 0 -1
v 1 0 1
v -1 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 1 0
usemtl Grey
f 1/1/1 2/2/1 3/3/1 4/4/1
o Marker
v 0 1 0
v 0.5 1 0
v 0 1 0.5
usemtl Red
f -3//1 -2//1 -1//1
";

    fn parse(source: &str) -> Result<ObjFile> {
        read_obj(Cursor::new(source))
    }

    #[test]
    fn test_objects_are_split_and_reindexed() {
        let file = parse(TWO_OBJECTS).expect("valid obj");
        assert_eq!(file.material_library, "scene.mtl");
        assert_eq!(file.objects.len(), 2);

        let floor = &file.objects[0];
        assert_eq!(floor.name, "Floor");
        assert_eq!(floor.material_name, "Grey");
        assert_eq!(floor.vertices.len(), 4);
        assert_eq!(floor.faces.len(), 2, "quad is fan-triangulated");
        assert_eq!(floor.faces[1][2].position, 3);

        let marker = &file.objects[1];
        assert_eq!(marker.name, "Marker");
        assert_eq!(marker.material_name, "Red");
        assert_eq!(marker.vertices, vec![[0.0, 1.0, 0.0], [0.5, 1.0, 0.0], [0.0, 1.0, 0.5]]);
        assert_eq!(marker.faces[0][0].position, 0);
        assert_eq!(marker.faces[0][0].tex_coord, None);
        assert_eq!(marker.faces[0][0].normal, Some(0));
        assert_eq!(marker.normals, vec![[0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_unnamed_object_gets_default_name() {
        let file = parse("mtllib a.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl M\nf 1 2 3\n").expect("valid");
        assert_eq!(file.objects[0].name, DEFAULT_OBJECT_NAME);
    }

    #[test]
    fn test_missing_mtllib_is_an_error() {
        let result = parse("o A\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl M\nf 1 2 3\n");
        assert!(matches!(result, Err(TartanError::MissingMaterialLibrary)));
    }

    #[test]
    fn test_missing_usemtl_is_an_error() {
        let result = parse("mtllib a.mtl\no Lonely\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        match result {
            Err(TartanError::MissingMaterialName { object }) => assert_eq!(object, "Lonely"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_index_reports_line() {
        let result = parse("mtllib a.mtl\nv 0 0 0\nusemtl M\nf 1 2 3\n");
        match result {
            Err(TartanError::Malformed { line, .. }) => assert_eq!(line, 4),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_material_change_splits_object() {
        let source = "mtllib a.mtl\no Box\nv 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n\
                      usemtl A\nf 1 2 3\nusemtl B\nf 2 4 3\n";
        let file = parse(source).expect("valid");
        assert_eq!(file.objects.len(), 2);
        assert_eq!(file.objects[0].name, "Box");
        assert_eq!(file.objects[1].name, "Box");
        assert_eq!(file.objects[1].material_name, "B");
        assert_eq!(file.objects[1].vertices.len(), 3);
    }

    #[test]
    fn test_degenerate_face_is_skipped() {
        let file = parse("mtllib a.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl M\nf 1 2\nf 1 2 3\n").expect("valid");
        assert_eq!(file.objects[0].faces.len(), 1);
    }

    #[test]
    fn test_material_persists_across_objects() {
        let source = "mtllib a.mtl\nusemtl Shared\no A\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
                      o B\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n";
        let file = parse(source).expect("valid");
        assert_eq!(file.objects.len(), 2);
        assert_eq!(file.objects[0].name, "A");
        assert_eq!(file.objects[1].name, "B");
        assert!(file.objects.iter().all(|o| o.material_name == "Shared"));
        assert_eq!(file.objects[1].vertices[0], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_vertex_texture_face_form() {
        let source = "mtllib a.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\n\
                      usemtl M\nf 1/3 2/2 3/1\n";
        let file = parse(source).expect("valid");
        let object = &file.objects[0];
        assert_eq!(object.faces.len(), 1);
        assert!(object.faces[0].iter().all(|c| c.normal.is_none()));
        assert_eq!(object.faces[0][0].tex_coord, Some(0));
        assert_eq!(object.tex_coords[0], [0.0, 1.0]);
        assert!(object.normals.is_empty());
    }

    #[test]
    fn test_negative_index_out_of_range_is_malformed() {
        let result = parse("mtllib a.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl M\nf -1 -2 -4\n");
        match result {
            Err(TartanError::Malformed { line, .. }) => assert_eq!(line, 6),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_repeated_usemtl_keeps_object() {
        let source = "mtllib a.mtl\no Box\nv 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n\
                      usemtl A\nf 1 2 3\nusemtl A\nf 2 4 3\n";
        let file = parse(source).expect("valid");
        assert_eq!(file.objects.len(), 1);
        assert_eq!(file.objects[0].faces.len(), 2);
        assert_eq!(file.objects[0].vertices.len(), 4);
    }

    #[test]
    fn test_groups_smoothing_and_unknown_statements_are_ignored() {
        let source = "mtllib a.mtl\no Thing\ng part\ns 1\nv 0 0 0\nv 1 0 0\nv 0 1 0\n\
                      usemtl M\ncstype bezier\ns off\nf 1 2 3\ng other\nf 3 2 1\n";
        let file = parse(source).expect("valid");
        assert_eq!(file.objects.len(), 1);
        assert_eq!(file.objects[0].name, "Thing");
        assert_eq!(file.objects[0].faces.len(), 2);
    }

    #[test]
    fn test_written_obj_reads_back() {
        let file = parse(TWO_OBJECTS).expect("valid obj");
        let mut out = Vec::new();
        write_obj(&mut out, &file.material_library, &file.objects).expect("write");
        let reread = read_obj(Cursor::new(out)).expect("reread");
        assert_eq!(reread, file);
    }
}
