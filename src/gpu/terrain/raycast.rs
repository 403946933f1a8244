// ============================================
// Ray/Terrain Intersection - Бисекция по лучу
// ============================================
// Ищем t ∈ [0, RAY_RANGE], где луч пересекает поверхность.
// Предполагается ровно одно пересечение (террейн подходим сверху);
// нависания не поддерживаются и не обнаруживаются.
//
// Нет цели -> возвращаем позицию камеры (try_intersect -> None).

use ultraviolet::Vec3;

use super::heightfield::HeightSampler;

/// Дальность поиска вдоль луча
pub const RAY_RANGE: f32 = 600.0;
/// Фиксированное число шагов бисекции
pub const BISECTION_STEPS: u32 = 64;

#[derive(Debug, Clone, Copy)]
pub struct RayTerrainIntersector {
    pub range: f32,
    pub steps: u32,
}

impl Default for RayTerrainIntersector {
    fn default() -> Self {
        Self {
            range: RAY_RANGE,
            steps: BISECTION_STEPS,
        }
    }
}

impl RayTerrainIntersector {
    pub fn new(range: f32, steps: u32) -> Self {
        Self { range, steps }
    }

    /// Точка на поверхности или None (луч вверх/горизонтально, нет пересечения)
    pub fn try_intersect<S>(&self, terrain: &S, origin: Vec3, direction: Vec3) -> Option<Vec3>
    where
        S: HeightSampler + ?Sized,
    {
        let finite = direction.x.is_finite() && direction.y.is_finite() && direction.z.is_finite();
        if !finite || direction.y >= 0.0 {
            return None;
        }
        let direction = direction.normalized();

        let point = |t: f32| origin + direction * t;
        let is_above = |t: f32| {
            let p = point(t);
            p.y >= terrain.height_at(p.x, p.z)
        };

        let mut start = 0.0;
        let mut finish = self.range;
        let start_above = is_above(start);
        if start_above == is_above(finish) {
            return None;
        }

        for _ in 0..self.steps {
            let mid = (start + finish) * 0.5;
            if is_above(mid) != start_above {
                finish = mid;
            } else {
                start = mid;
            }
        }

        let hit = point((start + finish) * 0.5);
        Some(Vec3::new(hit.x, terrain.height_at(hit.x, hit.z), hit.z))
    }

    /// То же, но с позицией камеры как «нет цели»
    pub fn intersect<S>(&self, terrain: &S, origin: Vec3, direction: Vec3) -> Vec3
    where
        S: HeightSampler + ?Sized,
    {
        self.try_intersect(terrain, origin, direction).unwrap_or(origin)
    }
}
