// ============================================
// GPU Chunk Manager - Управление GPU буферами
// ============================================
// Меш строится один раз на чанк: HeightField неизменяем.

use std::collections::HashMap;
use std::sync::Arc;

use ultraviolet::Vec3;

use crate::gpu::terrain::heightfield::{ChunkCoord, HeightField};
use crate::gpu::terrain::mesh::TerrainMeshBuilder;
use super::chunk::GpuChunk;

/// Менеджер GPU буферов чанков
pub struct GpuChunkManager {
    chunks: HashMap<ChunkCoord, GpuChunk>,
    device: Arc<wgpu::Device>,
}

impl GpuChunkManager {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            chunks: HashMap::new(),
            device,
        }
    }

    /// Строит меш и загружает чанк на GPU (если ещё не загружен)
    pub fn upload(&mut self, field: &HeightField) {
        let key = field.coord();
        if self.chunks.contains_key(&key) {
            return;
        }

        let mesh = TerrainMeshBuilder::build(field);
        let origin = field.origin();
        let (min_h, max_h) = field.height_range();
        let bounds_min = Vec3::new(origin.x, min_h, origin.y);
        let bounds_max = Vec3::new(origin.x + field.size(), max_h, origin.y + field.size());

        let gpu_chunk = GpuChunk::new(&self.device, key, &mesh, bounds_min, bounds_max);
        self.chunks.insert(key, gpu_chunk);
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Итератор по всем GPU чанкам для рендеринга
    pub fn iter(&self) -> impl Iterator<Item = &GpuChunk> {
        self.chunks.values()
    }
}
