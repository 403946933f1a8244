// ============================================
// Terrain Generation - Источники высот
// ============================================

pub mod noise;
pub mod heightmap;

pub use noise::{HeightsGenerator, tileable_fbm2d};
pub use heightmap::{Heightmap, HeightmapEncoding};
