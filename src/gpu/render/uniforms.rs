use bytemuck::{Pod, Zeroable};
use ultraviolet::{Mat4, Vec3};

use crate::gpu::camera::Camera;
use super::clip::ClipPlane;
use super::lights::{PointLight, PointLightUniform, MAX_POINT_LIGHTS};

/// Шаг динамического смещения для uniform-буфера объектов
pub const OBJECT_UNIFORM_STRIDE: u64 = 256;

/// Данные одного прохода (group 0). У каждого прохода свой буфер.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PassUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub light_view_proj: [[f32; 4]; 4],
    pub clip_plane: [f32; 4],
    pub camera_pos: [f32; 3],
    /// 0 = тени выключены (отражение, преломление)
    pub shadow_strength: f32,
    pub light_dir: [f32; 3],
    pub move_offset: f32,
    pub water_height: f32,
    pub near: f32,
    pub far: f32,
    pub time: f32,
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
    pub point_light_count: u32,
    pub _pad: [u32; 3],
}

impl PassUniform {
    /// Проход с точки зрения камеры
    pub fn from_camera(camera: &Camera, clip: ClipPlane) -> Self {
        let view_proj = camera.view_projection_matrix();
        Self {
            view_proj: view_proj.into(),
            inv_view_proj: view_proj.inversed().into(),
            light_view_proj: Mat4::identity().into(),
            clip_plane: clip.as_array(),
            camera_pos: camera.position.into(),
            shadow_strength: 0.0,
            light_dir: [0.0, -1.0, 0.0],
            move_offset: 0.0,
            water_height: 0.0,
            near: camera.near,
            far: camera.far,
            time: 0.0,
            point_lights: [PointLightUniform::zeroed(); MAX_POINT_LIGHTS],
            point_light_count: 0,
            _pad: [0; 3],
        }
    }

    /// Проход из света: view_proj = матрица света
    pub fn from_light(light_view_proj: Mat4, light_dir: Vec3) -> Self {
        Self {
            view_proj: light_view_proj.into(),
            inv_view_proj: light_view_proj.inversed().into(),
            light_view_proj: light_view_proj.into(),
            clip_plane: ClipPlane::NONE.as_array(),
            camera_pos: [0.0; 3],
            shadow_strength: 0.0,
            light_dir: light_dir.into(),
            move_offset: 0.0,
            water_height: 0.0,
            near: 0.0,
            far: 1.0,
            time: 0.0,
            point_lights: [PointLightUniform::zeroed(); MAX_POINT_LIGHTS],
            point_light_count: 0,
            _pad: [0; 3],
        }
    }

    pub fn with_lighting(mut self, light_view_proj: Mat4, light_dir: Vec3, shadow_strength: f32) -> Self {
        self.light_view_proj = light_view_proj.into();
        self.light_dir = light_dir.into();
        self.shadow_strength = shadow_strength;
        self
    }

    pub fn with_water(mut self, water_height: f32, move_offset: f32, time: f32) -> Self {
        self.water_height = water_height;
        self.move_offset = move_offset;
        self.time = time;
        self
    }

    /// Лишние сверх MAX_POINT_LIGHTS не попадают в буфер
    pub fn with_point_lights(mut self, lights: &[PointLight]) -> Self {
        let count = lights.len().min(MAX_POINT_LIGHTS);
        for (slot, light) in self.point_lights.iter_mut().zip(&lights[..count]) {
            *slot = PointLightUniform::from(light);
        }
        self.point_light_count = count as u32;
        self
    }
}

/// Данные одного объекта (group 1, динамическое смещение)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 3],
    /// Подсветка выделенного объекта, добавляется к цвету
    pub highlight: f32,
    /// ID объекта для пикинга (0 = ничего)
    pub object_id: u32,
    pub draw_id: u32,
    pub _pad: [u32; 2],
}

impl ObjectUniform {
    /// Слот 0: террейн (единичная матрица, без ID)
    pub fn terrain() -> Self {
        Self {
            model: Mat4::identity().into(),
            color: [1.0, 1.0, 1.0],
            highlight: 0.0,
            object_id: 0,
            draw_id: 0,
            _pad: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_fit_alignment() {
        assert_eq!(std::mem::size_of::<PassUniform>(), 592);
        assert_eq!(std::mem::size_of::<PassUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
        assert!(std::mem::size_of::<ObjectUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
    }

    #[test]
    fn test_camera_pass_carries_clip_plane() {
        let camera = Camera::new(Vec3::new(0.0, 5.0, 0.0), 1.0);
        let pass = PassUniform::from_camera(&camera, ClipPlane::reflection(-0.7));
        assert_eq!(pass.clip_plane, [0.0, 1.0, 0.0, 0.7]);
        assert_eq!(pass.camera_pos, [0.0, 5.0, 0.0]);
        assert_eq!(pass.point_light_count, 0);
    }

    #[test]
    fn test_point_lights_are_capped() {
        let camera = Camera::new(Vec3::zero(), 1.0);
        let lights = vec![PointLight::at([1.0, 2.0, 3.0]); MAX_POINT_LIGHTS + 1];
        let pass = PassUniform::from_camera(&camera, ClipPlane::NONE).with_point_lights(&lights);
        assert_eq!(pass.point_light_count, MAX_POINT_LIGHTS as u32);
        assert_eq!(pass.point_lights[MAX_POINT_LIGHTS - 1].position, [1.0, 2.0, 3.0]);
        assert_eq!(pass.point_lights[0].linear, 0.09);
    }
}
