// ============================================
// GPU Chunk - Буферы чанка на GPU
// ============================================

use ultraviolet::Vec3;
use wgpu::util::DeviceExt;

use crate::gpu::terrain::heightfield::ChunkCoord;
use crate::gpu::terrain::mesh::TerrainMesh;

/// GPU буферы для одного чанка
pub struct GpuChunk {
    pub key: ChunkCoord,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// AABB для frustum culling
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
}

impl GpuChunk {
    pub fn new(device: &wgpu::Device, key: ChunkCoord, mesh: &TerrainMesh, bounds_min: Vec3, bounds_max: Vec3) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Chunk {:?} Vertices", key)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Chunk {:?} Indices", key)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            key,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            bounds_min,
            bounds_max,
        }
    }
}
