// ============================================
// Terrain Mesh Builder - Сетка из HeightField
// ============================================
// (n-1)² ячеек, в каждой два треугольника:
//   [topLeft, bottomLeft, topRight, topRight, bottomLeft, bottomRight]
// topLeft = gz*n + gx. Обход против часовой стрелки при взгляде с +Y.
// Диагональ bottomLeft-topRight та же, что в HeightField::try_sample.

use crate::gpu::terrain::heightfield::HeightField;
use super::vertex::MeshVertex;

/// CPU-меш чанка, готовый к загрузке на GPU
#[derive(Debug, Clone, Default)]
pub struct TerrainMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

pub struct TerrainMeshBuilder;

impl TerrainMeshBuilder {
    /// Чистая функция от HeightField
    pub fn build(field: &HeightField) -> TerrainMesh {
        let n = field.vertex_count();
        let inv = 1.0 / (n - 1) as f32;

        let mut vertices = Vec::with_capacity((n * n) as usize);
        for z in 0..n {
            for x in 0..n {
                vertices.push(MeshVertex::new(
                    field.vertex_position(x, z).into(),
                    field.grid_normal(x, z).into(),
                    [x as f32 * inv, z as f32 * inv],
                ));
            }
        }

        TerrainMesh {
            vertices,
            indices: grid_indices(n),
        }
    }
}

/// Индексы сетки n×n вершин
pub fn grid_indices(vertex_count: u32) -> Vec<u32> {
    let n = vertex_count;
    let cells = n.saturating_sub(1);
    let mut indices = Vec::with_capacity((6 * cells * cells) as usize);

    for gz in 0..cells {
        for gx in 0..cells {
            let top_left = gz * n + gx;
            let top_right = top_left + 1;
            let bottom_left = (gz + 1) * n + gx;
            let bottom_right = bottom_left + 1;
            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                top_right,
                top_right,
                bottom_left,
                bottom_right,
            ]);
        }
    }

    debug_assert_eq!(indices.len(), (6 * cells * cells) as usize);
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::terrain::heightfield::ChunkCoord;
    use ultraviolet::Vec3;

    #[test]
    fn test_index_count_and_first_cell() {
        let indices = grid_indices(4);
        assert_eq!(indices.len(), 6 * 3 * 3);
        assert_eq!(&indices[..6], &[0, 4, 1, 1, 4, 5]);
        assert!(indices.iter().all(|&i| i < 16));
    }

    #[test]
    fn test_triangles_face_up() {
        let field = HeightField::flat(ChunkCoord::new(0, 0), 8.0, 5, 0.0).unwrap();
        let mesh = TerrainMeshBuilder::build(&field);
        for tri in mesh.indices.chunks(3) {
            let a = Vec3::from(mesh.vertices[tri[0] as usize].position);
            let b = Vec3::from(mesh.vertices[tri[1] as usize].position);
            let c = Vec3::from(mesh.vertices[tri[2] as usize].position);
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn test_mesh_is_deterministic_and_uvs_span_unit_square() {
        let heights = (0..9).map(|i| i as f32).collect();
        let field = HeightField::from_samples(ChunkCoord::new(1, 1), 10.0, 3, heights).unwrap();
        let first = TerrainMeshBuilder::build(&field);
        let second = TerrainMeshBuilder::build(&field);
        assert_eq!(first.vertices, second.vertices);
        assert_eq!(first.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(first.vertices[8].uv, [1.0, 1.0]);
        assert_eq!(first.vertices[5].position[1], 5.0);
    }
}
