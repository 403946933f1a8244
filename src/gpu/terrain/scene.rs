// ============================================
// Terrain Scene - Сетка чанков + водные тайлы
// ============================================

use std::collections::HashMap;

use crate::gpu::core::SceneConfig;
use super::error::TerrainError;
use super::generation::{Heightmap, HeightsGenerator};
use super::heightfield::{ChunkCoord, HeightField, HeightSampler, OUT_OF_BOUNDS_HEIGHT};

/// Плоский квадрат воды над одним чанком
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterTile {
    pub coord: ChunkCoord,
    pub size: f32,
    pub height: f32,
}

impl WaterTile {
    /// Два треугольника, обход как у ячейки террейна
    pub fn vertices(&self) -> [[f32; 3]; 6] {
        let left = -self.size / 2.0 + self.coord.x as f32 * self.size;
        let right = left + self.size;
        let up = -self.size / 2.0 + self.coord.z as f32 * self.size;
        let down = up + self.size;
        let h = self.height;
        [
            [left, h, up],
            [left, h, down],
            [right, h, up],
            [right, h, up],
            [left, h, down],
            [right, h, down],
        ]
    }
}

pub struct TerrainScene {
    chunks: HashMap<ChunkCoord, HeightField>,
    water: Vec<WaterTile>,
    chunk_size: f32,
    water_height: f32,
}

impl TerrainScene {
    /// Собрать все чанки из конфига. Ошибка карты высот всплывает здесь.
    pub fn from_config(config: &SceneConfig) -> Result<Self, TerrainError> {
        let heightmap = match &config.heightmap {
            Some(source) => Some(Heightmap::load(&source.path, source.encoding, source.amplitude)?),
            None => None,
        };
        let generator = HeightsGenerator::new(config.noise_amplitude, config.seed, config.noise_octave);

        let mut fields = Vec::new();
        for z in 0..config.chunks_z as i32 {
            for x in 0..config.chunks_x as i32 {
                let coord = ChunkCoord::new(x, z);
                let field = match &heightmap {
                    Some(map) => HeightField::from_heightmap(coord, config.chunk_size, map.clone())?,
                    None => HeightField::procedural(coord, config.chunk_size, config.vertex_count, &generator)?,
                };
                fields.push(field);
            }
        }

        log::info!(
            "Terrain: {}x{} chunks, size {}, water at {}",
            config.chunks_x,
            config.chunks_z,
            config.chunk_size,
            config.water_height
        );
        Ok(Self::new(fields, config.chunk_size, config.water_height))
    }

    pub fn new(fields: Vec<HeightField>, chunk_size: f32, water_height: f32) -> Self {
        let water = fields
            .iter()
            .map(|f| WaterTile {
                coord: f.coord(),
                size: chunk_size,
                height: water_height,
            })
            .collect();
        let chunks = fields.into_iter().map(|f| (f.coord(), f)).collect();
        Self {
            chunks,
            water,
            chunk_size,
            water_height,
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn water_height(&self) -> f32 {
        self.water_height
    }

    pub fn chunks(&self) -> impl Iterator<Item = &HeightField> {
        self.chunks.values()
    }

    pub fn water_tiles(&self) -> &[WaterTile] {
        &self.water
    }

    /// Чанк, которому принадлежит точка
    pub fn chunk_at(&self, x: f32, z: f32) -> Option<&HeightField> {
        let coord = ChunkCoord::new(
            (x / self.chunk_size + 0.5).floor() as i32,
            (z / self.chunk_size + 0.5).floor() as i32,
        );
        self.chunks.get(&coord)
    }

    pub fn terrain_height(&self, x: f32, z: f32) -> f32 {
        self.chunk_at(x, z)
            .and_then(|c| c.try_sample(x, z))
            .unwrap_or(OUT_OF_BOUNDS_HEIGHT)
    }
}

impl HeightSampler for TerrainScene {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.terrain_height(x, z)
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        self.chunk_at(x, z).is_some_and(|chunk| chunk.covers(x, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_flat_chunks() -> TerrainScene {
        let a = HeightField::flat(ChunkCoord::new(0, 0), 32.0, 4, 1.0).unwrap();
        let b = HeightField::flat(ChunkCoord::new(1, 0), 32.0, 4, 5.0).unwrap();
        TerrainScene::new(vec![a, b], 32.0, -0.7)
    }

    #[test]
    fn test_height_dispatches_to_owning_chunk() {
        let scene = two_flat_chunks();
        assert!((scene.terrain_height(0.0, 0.0) - 1.0).abs() < 1e-5);
        assert!((scene.terrain_height(40.0, 0.0) - 5.0).abs() < 1e-5);
        assert_eq!(scene.terrain_height(0.0, 100.0), OUT_OF_BOUNDS_HEIGHT);
    }

    #[test]
    fn test_water_tiles_cover_chunks() {
        let scene = two_flat_chunks();
        assert_eq!(scene.water_tiles().len(), 2);
        let tile = scene.water_tiles().iter().find(|t| t.coord == ChunkCoord::new(1, 0)).unwrap();
        let v = tile.vertices();
        assert_eq!(v[0], [16.0, -0.7, -16.0]);
        assert_eq!(v[5], [48.0, -0.7, 16.0]);
    }
}
