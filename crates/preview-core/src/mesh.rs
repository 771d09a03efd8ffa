//! Mesh loading (OBJ format)

use std::io::BufReader;

use glam::Vec3;
use uuid::Uuid;

/// Renderable geometry of a product model
#[derive(Debug, Clone)]
pub struct Mesh {
    pub id: Uuid,
    pub name: String,
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals (empty if the asset has none)
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates with the origin at the top-left of the texture
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices
    pub indices: Vec<u32>,
    /// Bounding box min
    pub bbox_min: [f32; 3],
    /// Bounding box max
    pub bbox_max: [f32; 3],
}

impl Mesh {
    /// Parse OBJ bytes and keep the first model of the file.
    ///
    /// The first model must be a textured triangle mesh. Material libraries
    /// are ignored; the material comes from the compositor.
    pub fn from_obj_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self, MeshError> {
        let mut reader = BufReader::new(bytes);
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        };

        let (models, _materials) = tobj::load_obj_buf(&mut reader, &options, |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(|e| MeshError::Parse(e.to_string()))?;

        let first = models.into_iter().next().ok_or(MeshError::NoModels)?;
        Self::from_tobj(name.into(), first.mesh)
    }

    fn from_tobj(name: String, mesh: tobj::Mesh) -> Result<Self, MeshError> {
        if mesh.positions.is_empty() || mesh.indices.len() < 3 {
            return Err(MeshError::EmptyMesh);
        }
        if mesh.texcoords.is_empty() {
            return Err(MeshError::MissingTexCoords);
        }

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        let normals: Vec<[f32; 3]> = mesh
            .normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect();
        // OBJ v runs bottom-up, raster rows run top-down
        let uvs: Vec<[f32; 2]> = mesh
            .texcoords
            .chunks_exact(2)
            .map(|t| [t[0], 1.0 - t[1]])
            .collect();

        if uvs.len() != positions.len() {
            return Err(MeshError::Parse(format!(
                "{} texture coordinates for {} vertices",
                uvs.len(),
                positions.len()
            )));
        }
        if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(MeshError::Parse(format!("index {} out of range", bad)));
        }

        let mut result = Self {
            id: Uuid::new_v4(),
            name,
            positions,
            normals,
            uvs,
            indices: mesh.indices,
            bbox_min: [0.0; 3],
            bbox_max: [0.0; 3],
        };
        result.calculate_bounding_box();
        Ok(result)
    }

    /// Recompute the bounding box from positions
    pub fn calculate_bounding_box(&mut self) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &self.positions {
            let v = Vec3::from(*p);
            min = min.min(v);
            max = max.max(v);
        }
        if self.positions.is_empty() {
            min = Vec3::ZERO;
            max = Vec3::ZERO;
        }
        self.bbox_min = min.to_array();
        self.bbox_max = max.to_array();
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex index triples
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }
}

/// Mesh-related errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Asset contains no models")]
    NoModels,
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Mesh has no texture coordinates")]
    MissingTexCoords,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const TEXTURED_TRIANGLE: &str = "\
o panel
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 2.0 0.5
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1 2/2 3/3
";

    #[test]
    fn test_parse_textured_triangle() {
        let mesh = Mesh::from_obj_bytes("panel", TEXTURED_TRIANGLE.as_bytes()).unwrap();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.bbox_min, [0.0, 0.0, 0.0]);
        assert_eq!(mesh.bbox_max, [1.0, 2.0, 0.5]);
        // v flipped into raster space
        assert!(mesh.uvs.contains(&[0.0, 1.0]));
        assert!(mesh.uvs.contains(&[0.0, 0.0]));
    }

    #[test]
    fn test_first_model_wins() {
        let obj = format!("{TEXTURED_TRIANGLE}o second\nv 5 5 5\nv 6 5 5\nv 5 6 5\nvt 0 0\nf 4/1 5/1 6/1\n");
        let mesh = Mesh::from_obj_bytes("panel", obj.as_bytes()).unwrap();
        assert_eq!(mesh.bbox_max, [1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_reject_untextured_mesh() {
        let obj = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let result = Mesh::from_obj_bytes("plain", obj.as_bytes());
        assert_eq!(result.unwrap_err(), MeshError::MissingTexCoords);
    }

    #[test]
    fn test_reject_asset_without_faces() {
        let result = Mesh::from_obj_bytes("points", b"v 0 0 0\nv 1 0 0\n");
        assert!(matches!(
            result,
            Err(MeshError::NoModels | MeshError::EmptyMesh)
        ));

        let result = Mesh::from_obj_bytes("nothing", b"");
        assert!(result.is_err());
    }

    #[test]
    fn test_each_load_gets_a_new_id() {
        let a = Mesh::from_obj_bytes("a", TEXTURED_TRIANGLE.as_bytes()).unwrap();
        let b = Mesh::from_obj_bytes("a", TEXTURED_TRIANGLE.as_bytes()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
