// ============================================
// Point Lights - Точечные источники с затуханием
// ============================================
// Фонг с затуханием 1 / (c + l*d + q*d^2). Каждый источник
// рисуется маленьким кубом-маркером во всех проходах мира.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use ultraviolet::{Mat4, Vec3};

/// Размер массива в PassUniform (и в шейдерах)
pub const MAX_POINT_LIGHTS: usize = 4;
/// Сторона куба-маркера
pub const MARKER_SCALE: f32 = 0.2;
/// Нижняя граница знаменателя затухания
const MIN_ATTENUATION_DENOM: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    pub position: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 0.0],
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            ambient: [0.05, 0.05, 0.05],
            diffuse: [0.8, 0.8, 0.8],
            specular: [1.0, 1.0, 1.0],
        }
    }
}

impl PointLight {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Множитель освещения на расстоянии `distance`
    pub fn attenuation(&self, distance: f32) -> f32 {
        let denom = self.constant + self.linear * distance + self.quadratic * distance * distance;
        1.0 / denom.max(MIN_ATTENUATION_DENOM)
    }

    pub fn marker_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::from(self.position)) * Mat4::from_scale(MARKER_SCALE)
    }

    pub fn marker_bounds(&self) -> (Vec3, Vec3) {
        let center = Vec3::from(self.position);
        let half = Vec3::broadcast(MARKER_SCALE * 0.5);
        (center - half, center + half)
    }
}

/// Четыре источника вокруг начала координат
pub fn default_point_lights() -> Vec<PointLight> {
    [
        [2.0, 3.0, 2.0],
        [2.3, 2.0, -5.0],
        [-4.0, 2.5, -8.0],
        [0.0, 1.5, -3.0],
    ]
    .into_iter()
    .map(PointLight::at)
    .collect()
}

/// Не больше MAX_POINT_LIGHTS; лишние отбрасываются
pub fn active_lights(lights: &[PointLight]) -> &[PointLight] {
    if lights.len() > MAX_POINT_LIGHTS {
        log::warn!(
            "{} point lights configured, only the first {} are used",
            lights.len(),
            MAX_POINT_LIGHTS
        );
    }
    &lights[..lights.len().min(MAX_POINT_LIGHTS)]
}

/// Раскладка как у `PointLight` в WGSL: 5 x vec4
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub _pad0: [f32; 2],
    pub ambient: [f32; 3],
    pub _pad1: f32,
    pub diffuse: [f32; 3],
    pub _pad2: f32,
    pub specular: [f32; 3],
    pub _pad3: f32,
}

impl From<&PointLight> for PointLightUniform {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position,
            constant: light.constant,
            linear: light.linear,
            quadratic: light.quadratic,
            ambient: light.ambient,
            diffuse: light.diffuse,
            specular: light.specular,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attenuation_falls_off_with_distance() {
        let light = PointLight::default();
        assert!((light.attenuation(0.0) - 1.0).abs() < 1e-6);
        // 1 / (1 + 0.9 + 3.2)
        assert!((light.attenuation(10.0) - 1.0 / 5.1).abs() < 1e-6);
        assert!(light.attenuation(20.0) < light.attenuation(10.0));
    }

    #[test]
    fn test_attenuation_with_zero_terms_stays_finite() {
        let light = PointLight {
            constant: 0.0,
            linear: 0.0,
            quadratic: 0.0,
            ..PointLight::default()
        };
        assert!(light.attenuation(0.0).is_finite());
    }

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 80);
        let uniform = PointLightUniform::from(&PointLight::at([1.0, 2.0, 3.0]));
        assert_eq!(uniform.position, [1.0, 2.0, 3.0]);
        assert_eq!(uniform.quadratic, 0.032);
    }

    #[test]
    fn test_extra_lights_are_dropped() {
        let lights = vec![PointLight::default(); MAX_POINT_LIGHTS + 2];
        assert_eq!(active_lights(&lights).len(), MAX_POINT_LIGHTS);
        assert_eq!(active_lights(&default_point_lights()).len(), 4);
    }

    #[test]
    fn test_marker_is_small_cube_at_light() {
        let light = PointLight::at([2.0, 3.0, 2.0]);
        let (min, max) = light.marker_bounds();
        assert!((max.x - min.x - MARKER_SCALE).abs() < 1e-6);
        let center = light.marker_matrix() * ultraviolet::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!([center.x, center.y, center.z], [2.0, 3.0, 2.0]);
    }
}
