//! Vertex layout for textured meshes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use preview_core::Mesh;

/// Vertex with position, normal and texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
    ];

    /// Vertex buffer layout matching `shaders/textured.wgsl`.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave the vertex streams of `mesh`.
///
/// Assets without normals get smooth normals averaged from the faces that
/// share each vertex.
pub fn mesh_vertices(mesh: &Mesh) -> Vec<MeshVertex> {
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals.clone()
    } else {
        smooth_normals(mesh)
    };

    mesh.positions
        .iter()
        .zip(&normals)
        .zip(&mesh.uvs)
        .map(|((&position, &normal), &uv)| MeshVertex {
            position,
            normal,
            uv,
        })
        .collect()
}

fn smooth_normals(mesh: &Mesh) -> Vec<[f32; 3]> {
    let mut sums = vec![Vec3::ZERO; mesh.positions.len()];
    for tri in mesh.triangles() {
        let [a, b, c] = tri.map(|i| Vec3::from(mesh.positions[i]));
        // Area weighted
        let face = (b - a).cross(c - a);
        for i in tri {
            sums[i] += face;
        }
    }
    sums.into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}
