// ============================================
// Clip Plane - Плоскость отсечения прохода
// ============================================
// Шейдер отбрасывает фрагмент, если dot(plane, (p, 1)) < 0.
// Механизм никогда не выключается: «без отсечения» -
// плоскость далеко за пределами сцены.

use ultraviolet::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    pub normal: Vec3,
    pub distance: f32,
}

impl ClipPlane {
    /// Оставляет всё ниже y = 99999
    pub const NONE: ClipPlane = ClipPlane {
        normal: Vec3 { x: 0.0, y: -1.0, z: 0.0 },
        distance: 99999.0,
    };

    /// Отражение: остаётся геометрия над водой
    pub fn reflection(water_height: f32) -> Self {
        Self {
            normal: Vec3::unit_y(),
            distance: -water_height,
        }
    }

    /// Преломление: остаётся геометрия под водой
    pub fn refraction(water_height: f32) -> Self {
        Self {
            normal: -Vec3::unit_y(),
            distance: water_height,
        }
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.normal.x, self.normal.y, self.normal.z, self.distance]
    }

    /// Та же проверка, что в шейдере
    pub fn keeps(&self, point: Vec3) -> bool {
        self.normal.dot(point) + self.distance >= 0.0
    }
}
