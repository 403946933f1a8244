// ============================================
// Terrain Module - Карты высот, меши, запросы
// ============================================

pub mod error;
pub mod generation;
pub mod heightfield;
pub mod mesh;
pub mod raycast;
pub mod scene;
pub mod gpu;

// Re-exports
pub use error::TerrainError;
pub use generation::{Heightmap, HeightmapEncoding, HeightsGenerator};
pub use heightfield::{ChunkCoord, HeightField, HeightSampler, OUT_OF_BOUNDS_HEIGHT};
pub use mesh::{MeshVertex, TerrainMesh, TerrainMeshBuilder};
pub use raycast::{RayTerrainIntersector, RAY_RANGE, BISECTION_STEPS};
pub use scene::{TerrainScene, WaterTile};
pub use gpu::GpuChunkManager;
