// ============================================
// HeightField - Сетка высот одного чанка
// ============================================
// Чанк (index_x, index_z) центрирован в (index_x*size, index_z*size).
// Вершина j по X лежит в world_x - size/2 + j * size/(vertex_count-1).
//
// Выборка высоты: ячейка делится диагональю (0,1)-(1,0) на два
// треугольника, ровно так же, как их строит TerrainMeshBuilder.
// Поэтому рендер и физические запросы совпадают.

use rayon::prelude::*;
use ultraviolet::{Vec2, Vec3};

use super::error::TerrainError;
use super::generation::{Heightmap, HeightsGenerator};

/// Значение за пределами чанка
pub const OUT_OF_BOUNDS_HEIGHT: f32 = 0.0;

/// Верхняя граница вершин на сторону: n*n держится в i32, индексы в u32
pub const MAX_VERTEX_COUNT: u32 = 8193;

/// Источник высоты для физических запросов (коллизия, установка, лучи)
pub trait HeightSampler {
    fn height_at(&self, x: f32, z: f32) -> f32;

    /// Есть ли в точке настоящий террейн (а не OUT_OF_BOUNDS_HEIGHT)
    fn covers(&self, _x: f32, _z: f32) -> bool {
        true
    }
}

/// Индекс чанка в сетке сцены
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Барицентрическая интерполяция высоты по треугольнику (p.x, p.y=высота, p.z)
#[inline]
pub fn barycentric(p1: Vec3, p2: Vec3, p3: Vec3, pos: Vec2) -> f32 {
    let det = (p2.z - p3.z) * (p1.x - p3.x) + (p3.x - p2.x) * (p1.z - p3.z);
    let l1 = ((p2.z - p3.z) * (pos.x - p3.x) + (p3.x - p2.x) * (pos.y - p3.z)) / det;
    let l2 = ((p3.z - p1.z) * (pos.x - p3.x) + (p1.x - p3.x) * (pos.y - p3.z)) / det;
    let l3 = 1.0 - l1 - l2;
    l1 * p1.y + l2 * p2.y + l3 * p3.y
}

/// Нормаль по центральным разностям соседей: normalize(hL - hR, 2·cell, hD - hU)
#[inline]
pub fn grid_normal<F>(height: F, x: i32, z: i32, cell_size: f32) -> Vec3
where
    F: Fn(i32, i32) -> f32,
{
    let height_l = height(x - 1, z);
    let height_r = height(x + 1, z);
    let height_d = height(x, z - 1);
    let height_u = height(x, z + 1);
    Vec3::new(height_l - height_r, 2.0 * cell_size, height_d - height_u).normalized()
}

/// Неизменяемая сетка высот чанка
#[derive(Debug, Clone)]
pub struct HeightField {
    coord: ChunkCoord,
    size: f32,
    vertex_count: u32,
    heights: Vec<f32>,
    normals: Vec<Vec3>,
    min_height: f32,
    max_height: f32,
}

impl HeightField {
    /// Процедурный чанк. Шум читается в глобальных координатах сетки.
    pub fn procedural(
        coord: ChunkCoord,
        size: f32,
        vertex_count: u32,
        generator: &HeightsGenerator,
    ) -> Result<Self, TerrainError> {
        let count = sample_count(vertex_count)? as i32;
        let n = vertex_count as i32;
        let base_x = coord.x * (n - 1);
        let base_z = coord.z * (n - 1);

        let heights: Vec<f32> = (0..count)
            .into_par_iter()
            .map(|idx| generator.height(base_x + idx % n, base_z + idx / n))
            .collect();

        // Нормали берут соседей за краем чанка у генератора: стыки без швов
        let cell = size / (n - 1) as f32;
        let normals: Vec<Vec3> = (0..count)
            .into_par_iter()
            .map(|idx| grid_normal(|x, z| generator.height(base_x + x, base_z + z), idx % n, idx / n, cell))
            .collect();

        Ok(Self::assemble(coord, size, vertex_count, heights, normals))
    }

    /// Чанк из декодированной карты высот; vertex_count = ширина карты
    pub fn from_heightmap(coord: ChunkCoord, size: f32, heightmap: Heightmap) -> Result<Self, TerrainError> {
        let vertex_count = heightmap.size();
        Self::from_samples(coord, size, vertex_count, heightmap.into_heights())
    }

    /// Плоский чанк постоянной высоты
    pub fn flat(coord: ChunkCoord, size: f32, vertex_count: u32, height: f32) -> Result<Self, TerrainError> {
        let count = sample_count(vertex_count)?;
        Self::from_samples(coord, size, vertex_count, vec![height; count])
    }

    /// Чанк из готовых высот (построчно, индекс = x + z * vertex_count).
    /// Нормали на границе берут ближайший пиксель.
    pub fn from_samples(
        coord: ChunkCoord,
        size: f32,
        vertex_count: u32,
        heights: Vec<f32>,
    ) -> Result<Self, TerrainError> {
        let expected = sample_count(vertex_count)?;
        if heights.len() != expected {
            return Err(TerrainError::SampleCount { expected, actual: heights.len() });
        }

        let n = vertex_count as i32;
        let cell = size / (n - 1) as f32;
        let clamped = |x: i32, z: i32| heights[(x.clamp(0, n - 1) + z.clamp(0, n - 1) * n) as usize];
        let normals: Vec<Vec3> = (0..expected as i32)
            .into_par_iter()
            .map(|idx| grid_normal(clamped, idx % n, idx / n, cell))
            .collect();

        Ok(Self::assemble(coord, size, vertex_count, heights, normals))
    }

    fn assemble(coord: ChunkCoord, size: f32, vertex_count: u32, heights: Vec<f32>, normals: Vec<Vec3>) -> Self {
        let (min_height, max_height) = heights
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
        Self {
            coord,
            size,
            vertex_count,
            heights,
            normals,
            min_height,
            max_height,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Центр чанка в мире
    pub fn world_center(&self) -> Vec2 {
        Vec2::new(self.coord.x as f32 * self.size, self.coord.z as f32 * self.size)
    }

    /// Угол чанка с минимальными X/Z
    pub fn origin(&self) -> Vec2 {
        self.world_center() - Vec2::broadcast(self.size * 0.5)
    }

    pub fn cell_size(&self) -> f32 {
        self.size / (self.vertex_count - 1) as f32
    }

    pub fn height_range(&self) -> (f32, f32) {
        (self.min_height, self.max_height)
    }

    #[inline]
    pub fn grid_height(&self, x: u32, z: u32) -> f32 {
        self.heights[(x + z * self.vertex_count) as usize]
    }

    #[inline]
    pub fn grid_normal(&self, x: u32, z: u32) -> Vec3 {
        self.normals[(x + z * self.vertex_count) as usize]
    }

    /// Мировая позиция вершины сетки
    pub fn vertex_position(&self, x: u32, z: u32) -> Vec3 {
        let origin = self.origin();
        let cell = self.cell_size();
        Vec3::new(
            origin.x + x as f32 * cell,
            self.grid_height(x, z),
            origin.y + z as f32 * cell,
        )
    }

    /// Высота или None за пределами чанка. Дальний край входит в чанк.
    pub fn try_sample(&self, x: f32, z: f32) -> Option<f32> {
        let origin = self.origin();
        let rel_x = x - origin.x;
        let rel_z = z - origin.y;
        // NaN тоже не проходит
        if !(0.0..=self.size).contains(&rel_x) || !(0.0..=self.size).contains(&rel_z) {
            return None;
        }

        let cell = self.cell_size();
        let last_cell = self.vertex_count - 2;
        let grid_x = ((rel_x / cell).floor() as u32).min(last_cell);
        let grid_z = ((rel_z / cell).floor() as u32).min(last_cell);
        let frac = Vec2::new(rel_x / cell - grid_x as f32, rel_z / cell - grid_z as f32);

        let h00 = self.grid_height(grid_x, grid_z);
        let h10 = self.grid_height(grid_x + 1, grid_z);
        let h01 = self.grid_height(grid_x, grid_z + 1);
        let h11 = self.grid_height(grid_x + 1, grid_z + 1);

        let height = if frac.x <= 1.0 - frac.y {
            barycentric(
                Vec3::new(0.0, h00, 0.0),
                Vec3::new(1.0, h10, 0.0),
                Vec3::new(0.0, h01, 1.0),
                frac,
            )
        } else {
            barycentric(
                Vec3::new(1.0, h10, 0.0),
                Vec3::new(1.0, h11, 1.0),
                Vec3::new(0.0, h01, 1.0),
                frac,
            )
        };
        Some(height)
    }

    /// Высота в мировых координатах; вне чанка OUT_OF_BOUNDS_HEIGHT
    pub fn sample(&self, x: f32, z: f32) -> f32 {
        self.try_sample(x, z).unwrap_or(OUT_OF_BOUNDS_HEIGHT)
    }
}

impl HeightSampler for HeightField {
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self.sample(x, z)
    }

    fn covers(&self, x: f32, z: f32) -> bool {
        self.try_sample(x, z).is_some()
    }
}

/// Число вершин сетки n*n; n вне [2, MAX_VERTEX_COUNT] - ошибка
pub fn sample_count(vertex_count: u32) -> Result<usize, TerrainError> {
    if vertex_count < 2 {
        return Err(TerrainError::TooSmall(vertex_count));
    }
    if vertex_count > MAX_VERTEX_COUNT {
        return Err(TerrainError::TooLarge(vertex_count));
    }
    (vertex_count as usize)
        .checked_mul(vertex_count as usize)
        .ok_or(TerrainError::TooLarge(vertex_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpy(vertex_count: u32) -> HeightField {
        let n = vertex_count as usize;
        let heights = (0..n * n).map(|i| ((i * 7919) % 13) as f32 * 0.37 - 2.0).collect();
        HeightField::from_samples(ChunkCoord::new(0, 0), 32.0, vertex_count, heights).unwrap()
    }

    #[test]
    fn test_flat_terrain_is_zero_everywhere() {
        let field = HeightField::flat(ChunkCoord::new(0, 0), 32.0, 32, 0.0).unwrap();
        assert_eq!(field.sample(5.0, 5.0), 0.0);
        for i in 0..20 {
            let t = -16.0 + i as f32 * 1.6;
            assert_eq!(field.sample(t, -t), 0.0);
        }
    }

    #[test]
    fn test_out_of_bounds_returns_sentinel() {
        let field = HeightField::flat(ChunkCoord::new(0, 0), 32.0, 32, 3.0).unwrap();
        assert_eq!(field.try_sample(16.5, 0.0), None);
        assert_eq!(field.sample(100.0, 0.0), OUT_OF_BOUNDS_HEIGHT);
        assert_eq!(field.sample(f32::NAN, 0.0), OUT_OF_BOUNDS_HEIGHT);
        // дальний край ещё внутри
        assert!((field.sample(16.0, 16.0) - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_chunk_placement() {
        let field = HeightField::flat(ChunkCoord::new(2, -1), 32.0, 5, 0.0).unwrap();
        let first = field.vertex_position(0, 0);
        let last = field.vertex_position(4, 4);
        assert_eq!((first.x, first.z), (48.0, -48.0));
        assert_eq!((last.x, last.z), (80.0, -16.0));
        assert!(field.try_sample(64.0, -32.0).is_some());
    }

    #[test]
    fn test_sample_matches_grid_vertices() {
        let field = bumpy(9);
        for z in 0..9 {
            for x in 0..9 {
                let p = field.vertex_position(x, z);
                assert!((field.sample(p.x, p.z) - p.y).abs() < 1e-4, "vertex {} {}", x, z);
            }
        }
    }

    #[test]
    fn test_diagonal_continuity() {
        let field = bumpy(9);
        let cell = field.cell_size();
        let origin = field.origin();
        let eps = 1e-4;
        for step in 1..10 {
            let t = step as f32 / 10.0;
            // точка на диагонали ячейки (3,4): fx + fz = 1
            let (fx, fz) = (t, 1.0 - t);
            let below = field.sample(origin.x + (3.0 + fx - eps) * cell, origin.y + (4.0 + fz - eps) * cell);
            let above = field.sample(origin.x + (3.0 + fx + eps) * cell, origin.y + (4.0 + fz + eps) * cell);
            assert!((below - above).abs() < 1e-2, "t={} {} vs {}", t, below, above);
        }
    }

    #[test]
    fn test_flat_normals_point_up() {
        let field = HeightField::flat(ChunkCoord::new(0, 0), 32.0, 8, 1.5).unwrap();
        let n = field.grid_normal(0, 7);
        assert!((n - Vec3::unit_y()).mag() < 1e-6);
    }

    #[test]
    fn test_slope_normal_leans_downhill() {
        // высота растёт по X, нормаль смотрит в -X
        let heights = (0..16).map(|i| (i % 4) as f32).collect();
        let field = HeightField::from_samples(ChunkCoord::new(0, 0), 3.0, 4, heights).unwrap();
        let n = field.grid_normal(1, 1);
        assert!(n.x < 0.0 && n.y > 0.0);
        assert!(n.z.abs() < 1e-6);
    }

    #[test]
    fn test_procedural_chunks_share_edges() {
        let generator = HeightsGenerator::default();
        let left = HeightField::procedural(ChunkCoord::new(0, 0), 32.0, 17, &generator).unwrap();
        let right = HeightField::procedural(ChunkCoord::new(1, 0), 32.0, 17, &generator).unwrap();
        for z in 0..17 {
            assert_eq!(left.grid_height(16, z), right.grid_height(0, z));
            assert!((left.grid_normal(16, z) - right.grid_normal(0, z)).mag() < 1e-6);
        }
        let edge_x = left.vertex_position(16, 0).x;
        assert_eq!(edge_x, right.vertex_position(0, 0).x);
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(
            HeightField::flat(ChunkCoord::new(0, 0), 32.0, 1, 0.0),
            Err(TerrainError::TooSmall(1))
        ));
        assert!(matches!(
            HeightField::from_samples(ChunkCoord::new(0, 0), 32.0, 3, vec![0.0; 8]),
            Err(TerrainError::SampleCount { expected: 9, actual: 8 })
        ));
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let generator = HeightsGenerator::new(8.0, 21, 8.0);
        // 46341^2 не помещается в i32
        assert!(matches!(
            HeightField::procedural(ChunkCoord::new(0, 0), 32.0, 46341, &generator),
            Err(TerrainError::TooLarge(46341))
        ));
        assert!(matches!(
            HeightField::flat(ChunkCoord::new(0, 0), 32.0, u32::MAX, 0.0),
            Err(TerrainError::TooLarge(_))
        ));
        assert!(matches!(
            HeightField::from_samples(ChunkCoord::new(0, 0), 32.0, MAX_VERTEX_COUNT + 1, Vec::new()),
            Err(TerrainError::TooLarge(_))
        ));
        assert_eq!(sample_count(MAX_VERTEX_COUNT).unwrap(), (MAX_VERTEX_COUNT as usize).pow(2));
    }
}
