// ============================================
// Terrain Errors - Ошибки построения чанка
// ============================================

use std::fmt;

/// Ошибки построения карты высот / чанка
#[derive(Debug)]
pub enum TerrainError {
    Image(image::ImageError),
    /// Ширина карты высот должна совпадать с высотой
    NotSquare { width: u32, height: u32 },
    /// Сетке нужно минимум 2x2 вершины
    TooSmall(u32),
    /// Больше MAX_VERTEX_COUNT вершин на сторону
    TooLarge(u32),
    SampleCount { expected: usize, actual: usize },
}

impl From<image::ImageError> for TerrainError {
    fn from(e: image::ImageError) -> Self {
        TerrainError::Image(e)
    }
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::Image(e) => write!(f, "heightmap decode failed: {}", e),
            TerrainError::NotSquare { width, height } => {
                write!(f, "heightmap must be square, got {}x{}", width, height)
            }
            TerrainError::TooSmall(n) => write!(f, "terrain grid needs at least 2 vertices per side, got {}", n),
            TerrainError::TooLarge(n) => write!(f, "terrain grid of {} vertices per side is too large", n),
            TerrainError::SampleCount { expected, actual } => {
                write!(f, "expected {} height samples, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::Image(e) => Some(e),
            _ => None,
        }
    }
}
