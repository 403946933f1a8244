// ============================================
// Heightmap - Декодирование карты высот из изображения
// ============================================
// Ширина изображения становится vertex_count чанка.
// RgbProduct: height = (R·G·B) / 2^24 - 0.125, затем × amplitude
// Luma16:     height = L / 65535 - 0.125, затем × amplitude

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::gpu::terrain::error::TerrainError;
use crate::gpu::terrain::heightfield::sample_count;

/// Кодирование высот в пикселях
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightmapEncoding {
    /// Совместимость со старыми картами: произведение трёх каналов
    #[default]
    RgbProduct,
    /// Один 16-битный канал яркости
    Luma16,
}

const RGB_PRODUCT_SCALE: f32 = 16_777_216.0;
const HEIGHT_BIAS: f32 = 0.125;

#[inline]
pub fn rgb_product_height(r: u8, g: u8, b: u8, amplitude: f32) -> f32 {
    let rgb = r as f32 * g as f32 * b as f32;
    (rgb / RGB_PRODUCT_SCALE - HEIGHT_BIAS) * amplitude
}

#[inline]
pub fn luma16_height(luma: u16, amplitude: f32) -> f32 {
    (luma as f32 / u16::MAX as f32 - HEIGHT_BIAS) * amplitude
}

/// Декодированная квадратная сетка высот
#[derive(Debug, Clone)]
pub struct Heightmap {
    size: u32,
    heights: Vec<f32>,
}

impl Heightmap {
    /// Загрузить и декодировать файл. Ошибка всплывает до первого кадра.
    pub fn load(path: impl AsRef<Path>, encoding: HeightmapEncoding, amplitude: f32) -> Result<Self, TerrainError> {
        let img = image::open(path.as_ref())?;
        let map = Self::decode(&img, encoding, amplitude)?;
        log::info!(
            "Heightmap {}: {}x{} ({:?})",
            path.as_ref().display(),
            map.size,
            map.size,
            encoding
        );
        Ok(map)
    }

    pub fn decode(img: &DynamicImage, encoding: HeightmapEncoding, amplitude: f32) -> Result<Self, TerrainError> {
        let (width, height) = (img.width(), img.height());
        if width != height {
            return Err(TerrainError::NotSquare { width, height });
        }
        sample_count(width)?;

        let heights = match encoding {
            HeightmapEncoding::RgbProduct => img
                .to_rgb8()
                .pixels()
                .map(|p| rgb_product_height(p[0], p[1], p[2], amplitude))
                .collect(),
            HeightmapEncoding::Luma16 => img
                .to_luma16()
                .pixels()
                .map(|p| luma16_height(p[0], amplitude))
                .collect(),
        };

        Ok(Self { size: width, heights })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Высоты построчно: индекс = x + z * size
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn into_heights(self) -> Vec<f32> {
        self.heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    #[test]
    fn test_rgb_product_formula() {
        assert!((rgb_product_height(0, 0, 0, 20.0) - (-2.5)).abs() < 1e-6);
        let expected = (255.0f32 * 255.0 * 255.0 / 16_777_216.0 - 0.125) * 20.0;
        assert!((rgb_product_height(255, 255, 255, 20.0) - expected).abs() < 1e-4);
        // один нулевой канал обнуляет всё произведение
        assert_eq!(rgb_product_height(255, 0, 255, 20.0), rgb_product_height(0, 0, 0, 20.0));
    }

    #[test]
    fn test_decode_rgb_grid_order() {
        let img = ImageBuffer::from_fn(2, 2, |x, y| {
            if x == 1 && y == 0 { Rgb([255u8, 255, 255]) } else { Rgb([0u8, 0, 0]) }
        });
        let map = Heightmap::decode(&DynamicImage::ImageRgb8(img), HeightmapEncoding::RgbProduct, 20.0).unwrap();
        assert_eq!(map.size(), 2);
        assert!(map.heights()[1] > map.heights()[0]);
        assert_eq!(map.heights()[2], map.heights()[0]);
    }

    #[test]
    fn test_decode_luma16() {
        let img = ImageBuffer::from_fn(2, 2, |_, _| Luma([u16::MAX]));
        let map = Heightmap::decode(&DynamicImage::ImageLuma16(img), HeightmapEncoding::Luma16, 10.0).unwrap();
        assert!(map.heights().iter().all(|h| (h - 8.75).abs() < 1e-4));
    }

    #[test]
    fn test_non_square_is_rejected() {
        let img = ImageBuffer::from_fn(3, 2, |_, _| Rgb([1u8, 1, 1]));
        let err = Heightmap::decode(&DynamicImage::ImageRgb8(img), HeightmapEncoding::RgbProduct, 20.0).unwrap_err();
        assert!(matches!(err, TerrainError::NotSquare { width: 3, height: 2 }));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = Heightmap::load("does/not/exist.png", HeightmapEncoding::RgbProduct, 20.0).unwrap_err();
        assert!(matches!(err, TerrainError::Image(_)));
    }
}
