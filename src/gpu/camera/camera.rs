// ============================================
// Camera - Свободная камера (yaw/pitch/zoom)
// ============================================
// Углы в градусах. Движение по клавишам идёт в плоскости земли.

use ultraviolet::{Mat4, Vec3};

use crate::gpu::core::config::{MAX_CAMERA_HEIGHT, MIN_CAMERA_CLEARANCE};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = -45.0;
pub const DEFAULT_ZOOM: f32 = 45.0;
const MIN_ZOOM: f32 = 1.0;
const MAX_PITCH: f32 = 89.0;

/// Снимок позы камеры (то, что меняет отражение)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl CameraPose {
    /// Побитовое сравнение, без допусков
    pub fn bits_eq(&self, other: &CameraPose) -> bool {
        let a = [self.position.x, self.position.y, self.position.z, self.yaw, self.pitch];
        let b = [other.position.x, other.position.y, other.position.z, other.yaw, other.pitch];
        a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Вертикальный FOV в градусах
    pub zoom: f32,

    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3, aspect: f32) -> Self {
        Self {
            position,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            zoom: DEFAULT_ZOOM,
            aspect,
            near: 0.1,
            far: 1000.0,
            movement_speed: 10.0,
            mouse_sensitivity: 0.1,
        }
    }

    /// Направление взгляда
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalized()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::unit_y()).normalized()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.front()).normalized()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.yaw = pose.yaw;
        self.pitch = pose.pitch;
    }

    /// Матрица вида (View Matrix)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.front(), self.up())
    }

    /// Матрица проекции (Perspective с Reversed-Z для лучшей точности вдали)
    pub fn projection_matrix(&self) -> Mat4 {
        // Reversed-Z: меняем near и far местами
        ultraviolet::projection::perspective_wgpu_dx(
            self.zoom.to_radians(),
            self.aspect,
            self.far,
            self.near,
        )
    }

    /// Комбинированная матрица View-Projection
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Движение в плоскости земли
    pub fn process_keyboard(&mut self, movement: CameraMovement, dt: f32) {
        let velocity = self.movement_speed * dt;
        let front = self.front();
        let flat_front = Vec3::new(front.x, 0.0, front.z);
        match movement {
            CameraMovement::Forward => self.position += flat_front * velocity,
            CameraMovement::Backward => self.position -= flat_front * velocity,
            CameraMovement::Left => self.position -= self.right() * velocity,
            CameraMovement::Right => self.position += self.right() * velocity,
        }
    }

    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch = (self.pitch + dy * self.mouse_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Приближение вдоль взгляда; шаг отменяется, если выводит за пределы высот
    pub fn process_scroll_height(&mut self, offset: f32, ground: f32) {
        let moved = self.position + self.front() * offset;
        if moved.y >= ground + MIN_CAMERA_CLEARANCE && moved.y <= MAX_CAMERA_HEIGHT {
            self.position = moved;
        }
    }

    pub fn process_scroll_zoom(&mut self, offset: f32) {
        self.zoom = (self.zoom - offset).clamp(MIN_ZOOM, DEFAULT_ZOOM);
    }

    /// Коллизия с землёй
    pub fn keep_above_ground(&mut self, ground: f32) {
        let min_y = ground + MIN_CAMERA_CLEARANCE;
        if self.position.y < min_y {
            self.position.y = min_y;
        }
    }

    /// Луч из камеры через пиксель окна (начало координат сверху слева)
    pub fn cursor_ray(&self, cursor: (f32, f32), window: (u32, u32)) -> Vec3 {
        let (width, height) = (window.0.max(1) as f32, window.1.max(1) as f32);
        let ndc_x = 2.0 * cursor.0 / width - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.1 / height;
        let tan_half = (self.zoom.to_radians() * 0.5).tan();

        let ray = self.front()
            + self.right() * (ndc_x * tan_half * self.aspect)
            + self.up() * (ndc_y * tan_half);
        ray.normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec4;

    #[test]
    fn test_default_front_looks_down_negative_z() {
        let camera = Camera::new(Vec3::zero(), 1.0);
        let front = camera.front();
        assert!(front.y < 0.0);
        assert!(front.z < 0.0);
        assert!(front.x.abs() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::zero(), 1.0);
        camera.process_mouse_movement(0.0, 10_000.0);
        assert_eq!(camera.pitch, 89.0);
    }

    #[test]
    fn test_keyboard_moves_on_ground_plane() {
        let mut camera = Camera::new(Vec3::new(0.0, 5.0, 0.0), 1.0);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert_eq!(camera.position.y, 5.0);
        assert!(camera.position.z < 0.0);
    }

    #[test]
    fn test_scroll_respects_height_limits() {
        let mut camera = Camera::new(Vec3::new(0.0, 1.5, 0.0), 1.0);
        camera.process_scroll_height(2.0, 0.0);
        // шаг вниз ниже зазора отменён
        assert_eq!(camera.position.y, 1.5);
        camera.process_scroll_zoom(100.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn test_ground_collision() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.2, 0.0), 1.0);
        camera.keep_above_ground(3.0);
        assert_eq!(camera.position.y, 4.0);
    }

    #[test]
    fn test_center_cursor_ray_is_front() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0), 16.0 / 9.0);
        let ray = camera.cursor_ray((640.0, 360.0), (1280, 720));
        assert!((ray - camera.front()).mag() < 1e-5);
    }

    #[test]
    fn test_cursor_ray_projects_back_to_cursor() {
        let camera = Camera::new(Vec3::new(0.0, 10.0, 0.0), 16.0 / 9.0);
        let ray = camera.cursor_ray((960.0, 180.0), (1280, 720));
        let p = camera.position + ray * 20.0;
        let clip = camera.view_projection_matrix() * Vec4::new(p.x, p.y, p.z, 1.0);
        let (ndc_x, ndc_y) = (clip.x / clip.w, clip.y / clip.w);
        assert!((ndc_x - 0.5).abs() < 1e-3, "{}", ndc_x);
        assert!((ndc_y - 0.5).abs() < 1e-3, "{}", ndc_y);
    }
}
