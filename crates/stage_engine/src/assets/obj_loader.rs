//! OBJ file loader for mesh assets

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::assets::mesh::{MeshAsset, Vertex};

/// Errors produced while reading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// Underlying IO failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A numeric field failed to parse
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The file is structurally invalid
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Stateless OBJ parser
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshAsset, ObjError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map_or_else(|| "mesh".to_string(), |s| s.to_string_lossy().into_owned());

        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut tex_coords = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            match parts[0] {
                "v" => {
                    if parts.len() >= 4 {
                        let x: f32 = parts[1]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid vertex x".to_string()))?;
                        let y: f32 = parts[2]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid vertex y".to_string()))?;
                        let z: f32 = parts[3]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid vertex z".to_string()))?;
                        positions.push([x, y, z]);
                    }
                }
                "vn" => {
                    if parts.len() >= 4 {
                        let x: f32 = parts[1]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid normal x".to_string()))?;
                        let y: f32 = parts[2]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid normal y".to_string()))?;
                        let z: f32 = parts[3]
                            .parse()
                            .map_err(|_| ObjError::ParseError("Invalid normal z".to_string()))?;
                        normals.push([x, y, z]);
                    }
                }
                "vt" => {
                    if parts.len() >= 3 {
                        let u: f32 = parts[1].parse().map_err(|_| {
                            ObjError::ParseError("Invalid tex coord u".to_string())
                        })?;
                        let v: f32 = parts[2].parse().map_err(|_| {
                            ObjError::ParseError("Invalid tex coord v".to_string())
                        })?;
                        tex_coords.push([u, v]);
                    }
                }
                "f" => {
                    if parts.len() >= 4 {
                        let mut face_indices = Vec::new();

                        for vertex_data in &parts[1..] {
                            let indices_parts: Vec<&str> = vertex_data.split('/').collect();

                            if indices_parts.is_empty() {
                                continue;
                            }

                            // Indices are 1-based in OBJ; 0 is malformed
                            let pos_idx = indices_parts[0]
                                .parse::<usize>()
                                .map_err(|_| {
                                    ObjError::ParseError("Invalid position index".to_string())
                                })?
                                .checked_sub(1)
                                .ok_or_else(|| {
                                    ObjError::InvalidFormat(
                                        "Face indices are 1-based, found 0".to_string(),
                                    )
                                })?;

                            let tex_idx = if indices_parts.len() > 1 && !indices_parts[1].is_empty()
                            {
                                indices_parts[1]
                                    .parse::<usize>()
                                    .ok()
                                    .and_then(|i| i.checked_sub(1))
                            } else {
                                None
                            };

                            let normal_idx =
                                if indices_parts.len() > 2 && !indices_parts[2].is_empty() {
                                    indices_parts[2]
                                        .parse::<usize>()
                                        .ok()
                                        .and_then(|i| i.checked_sub(1))
                                } else {
                                    None
                                };

                            let position = positions.get(pos_idx).ok_or_else(|| {
                                ObjError::InvalidFormat("Position index out of bounds".to_string())
                            })?;

                            let tex_coord = tex_idx
                                .and_then(|idx| tex_coords.get(idx))
                                .unwrap_or(&[0.0, 0.0]);

                            let normal = normal_idx
                                .and_then(|idx| normals.get(idx))
                                .unwrap_or(&[0.0, 1.0, 0.0]);

                            vertices.push(Vertex::new(*position, *normal, *tex_coord));
                            face_indices.push(vertices.len() - 1);
                        }

                        // Simple fan triangulation
                        for i in 1..(face_indices.len() - 1) {
                            indices.push(face_indices[0] as u32);
                            indices.push(face_indices[i] as u32);
                            indices.push(face_indices[i + 1] as u32);
                        }
                    }
                }
                _ => {
                    // Ignore other commands
                }
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat(
                "No vertices found in OBJ file".to_string(),
            ));
        }

        Ok(MeshAsset::new(name, vertices, indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_obj(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join("stage_engine_obj_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_simple_triangle() {
        let path = write_obj("triangle.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");

        let mesh = ObjLoader::load_obj(&path).unwrap();
        assert_eq!(mesh.name, "triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
    }

    #[test]
    fn test_zero_face_index_is_rejected() {
        let path = write_obj("zero_index.obj", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");

        match ObjLoader::load_obj(&path) {
            Err(ObjError::InvalidFormat(message)) => assert!(message.contains("1-based")),
            other => panic!("expected InvalidFormat, got {:?}", other.map(|m| m.name)),
        }
    }

    #[test]
    fn test_zero_texture_and_normal_indices_fall_back_to_defaults() {
        let path = write_obj(
            "zero_vt_vn.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0.5 0.5\nvn 0 0 1\nf 1/0/0 2/0/0 3/0/0\n",
        );

        let mesh = ObjLoader::load_obj(&path).unwrap();
        assert_eq!(mesh.vertices[0].tex_coord, [0.0, 0.0]);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_position_index_is_rejected() {
        let path = write_obj("out_of_range.obj", "v 0 0 0\nf 1 2 3\n");

        assert!(matches!(
            ObjLoader::load_obj(&path),
            Err(ObjError::InvalidFormat(_))
        ));
    }
}
