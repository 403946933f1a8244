// ============================================
// Noise Functions - Шумовые функции для генерации
// ============================================
// Сглаженный value-noise с косинусной интерполяцией.
// Соседние чанки передают глобальные координаты сетки,
// поэтому их края совпадают без швов.

use std::f32::consts::PI;

/// Hash2D с зерном, возвращает значение в диапазоне -1.0..1.0
#[inline(always)]
pub fn hash2d_signed(x: i32, z: i32, seed: i32) -> f32 {
    let n = x.wrapping_mul(374761393)
        .wrapping_add(z.wrapping_mul(668265263))
        .wrapping_add(seed.wrapping_mul(1274126177));
    let n = (n ^ (n >> 13)).wrapping_mul(1911520717);
    let n = n ^ (n >> 16);
    ((n as u32) as f32) / (u32::MAX as f32) * 2.0 - 1.0
}

/// Косинусная интерполяция: f = (1 - cos(t·π)) / 2
#[inline(always)]
pub fn cosine_interpolate(a: f32, b: f32, blend: f32) -> f32 {
    let f = (1.0 - (blend * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

/// Генератор высот для процедурного террейна
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightsGenerator {
    /// Множитель высоты
    pub amplitude: f32,
    pub seed: i32,
    /// Делитель частоты: сколько ячеек сетки на одну точку шума
    pub octave: f32,
}

impl Default for HeightsGenerator {
    fn default() -> Self {
        Self {
            amplitude: 8.0,
            seed: 21,
            octave: 8.0,
        }
    }
}

impl HeightsGenerator {
    pub fn new(amplitude: f32, seed: i32, octave: f32) -> Self {
        Self { amplitude, seed, octave: octave.max(f32::EPSILON) }
    }

    #[inline]
    fn raw(&self, x: i32, z: i32) -> f32 {
        hash2d_signed(x, z, self.seed)
    }

    /// Центр 1/4, стороны 1/8, углы 1/16
    pub fn smooth_noise(&self, x: i32, z: i32) -> f32 {
        let corners = (self.raw(x - 1, z - 1)
            + self.raw(x + 1, z - 1)
            + self.raw(x - 1, z + 1)
            + self.raw(x + 1, z + 1))
            / 16.0;
        let sides = (self.raw(x - 1, z)
            + self.raw(x + 1, z)
            + self.raw(x, z - 1)
            + self.raw(x, z + 1))
            / 8.0;
        let center = self.raw(x, z) / 4.0;
        corners + sides + center
    }

    /// Бикосинусная интерполяция между узлами решётки шума
    pub fn interpolated_noise(&self, x: f32, z: f32) -> f32 {
        let xi = x.floor();
        let zi = z.floor();
        let fx = x - xi;
        let fz = z - zi;
        let (xi, zi) = (xi as i32, zi as i32);

        let v1 = self.smooth_noise(xi, zi);
        let v2 = self.smooth_noise(xi + 1, zi);
        let v3 = self.smooth_noise(xi, zi + 1);
        let v4 = self.smooth_noise(xi + 1, zi + 1);

        let i1 = cosine_interpolate(v1, v2, fx);
        let i2 = cosine_interpolate(v3, v4, fx);
        cosine_interpolate(i1, i2, fz)
    }

    /// Высота в глобальных координатах сетки
    #[inline]
    pub fn height(&self, grid_x: i32, grid_z: i32) -> f32 {
        self.interpolated_noise(grid_x as f32 / self.octave, grid_z as f32 / self.octave) * self.amplitude
    }
}

// ============================================
// Тайлящийся FBM для карт воды (DU/DV, нормали)
// ============================================

#[inline(always)]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// 2D value noise, периодичный по `period` узлам решётки
#[inline]
pub fn tileable_noise2d(x: f32, y: f32, period: i32, seed: i32) -> f32 {
    let xi = x.floor() as i32;
    let yi = y.floor() as i32;
    let xf = smoothstep(x - x.floor());
    let yf = smoothstep(y - y.floor());
    let p = period.max(1);

    let h = |ix: i32, iy: i32| hash2d_signed(ix.rem_euclid(p), iy.rem_euclid(p), seed);
    let n00 = h(xi, yi);
    let n10 = h(xi + 1, yi);
    let n01 = h(xi, yi + 1);
    let n11 = h(xi + 1, yi + 1);

    let nx0 = n00 + xf * (n10 - n00);
    let nx1 = n01 + xf * (n11 - n01);

    nx0 + yf * (nx1 - nx0)
}

/// FBM 2D - несколько октав тайлящегося шума, результат в -1..1
#[inline]
pub fn tileable_fbm2d(x: f32, y: f32, period: i32, octaves: u32, seed: i32) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1;
    let mut max_value = 0.0;

    for octave in 0..octaves {
        let f = frequency as f32;
        value += amplitude * tileable_noise2d(x * f, y * f, period * frequency, seed.wrapping_add(octave as i32));
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2;
    }

    value / max_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_range_and_determinism() {
        for x in -50..50 {
            for z in -50..50 {
                let v = hash2d_signed(x, z, 21);
                assert!((-1.0..=1.0).contains(&v));
                assert_eq!(v, hash2d_signed(x, z, 21));
            }
        }
        assert_ne!(hash2d_signed(3, 7, 21), hash2d_signed(3, 7, 22));
    }

    #[test]
    fn test_interpolation_hits_lattice_points() {
        let generator = HeightsGenerator::default();
        let exact = generator.smooth_noise(2, -3);
        assert!((generator.interpolated_noise(2.0, -3.0) - exact).abs() < 1e-6);
    }

    #[test]
    fn test_negative_coordinates_are_continuous() {
        // floor вместо усечения: нет разрыва около нуля
        let generator = HeightsGenerator::default();
        let left = generator.interpolated_noise(-0.0001, 0.5);
        let right = generator.interpolated_noise(0.0001, 0.5);
        assert!((left - right).abs() < 1e-3);
    }

    #[test]
    fn test_tileable_fbm_wraps() {
        let period = 8;
        let a = tileable_fbm2d(0.3, 0.7, period, 3, 5);
        let b = tileable_fbm2d(0.3 + period as f32, 0.7, period, 3, 5);
        assert!((a - b).abs() < 1e-5);
    }
}
