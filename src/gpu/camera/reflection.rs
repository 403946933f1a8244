// ============================================
// Mirrored Camera - Камера под плоскостью воды
// ============================================
// Guard зеркалит камеру относительно воды и на Drop
// возвращает сохранённую позу побитово (не пересчитывает её).

use super::camera::{Camera, CameraPose};

pub struct MirroredCamera<'a> {
    camera: &'a mut Camera,
    saved: CameraPose,
}

impl<'a> MirroredCamera<'a> {
    pub fn new(camera: &'a mut Camera, water_height: f32) -> Self {
        let saved = camera.pose();
        let distance = 2.0 * (camera.position.y - water_height);
        camera.position.y -= distance;
        camera.pitch = -camera.pitch;
        Self { camera, saved }
    }

    pub fn camera(&self) -> &Camera {
        self.camera
    }

    pub fn saved_pose(&self) -> CameraPose {
        self.saved
    }
}

impl Drop for MirroredCamera<'_> {
    fn drop(&mut self) {
        self.camera.set_pose(self.saved);
        debug_assert!(
            self.camera.pose().bits_eq(&self.saved),
            "camera pose not restored after reflection pass"
        );
    }
}

/// Выполнить `f` с зеркальной камерой; после возврата поза восстановлена
pub fn with_mirrored_camera<R>(camera: &mut Camera, water_height: f32, f: impl FnOnce(&Camera) -> R) -> R {
    let mirrored = MirroredCamera::new(camera, water_height);
    f(mirrored.camera())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::Vec3;

    #[test]
    fn test_reflection_mirrors_then_restores() {
        let mut camera = Camera::new(Vec3::new(2.0, 5.0, -1.0), 1.5);
        camera.pitch = -30.0;
        let before = camera.pose();

        let seen = with_mirrored_camera(&mut camera, 0.0, |mirrored| (mirrored.position.y, mirrored.pitch));
        assert_eq!(seen, (-5.0, 30.0));

        assert_eq!(camera.position.y, 5.0);
        assert_eq!(camera.pitch, -30.0);
        assert!(camera.pose().bits_eq(&before));
    }

    #[test]
    fn test_mirror_about_raised_water() {
        let mut camera = Camera::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        let guard = MirroredCamera::new(&mut camera, 1.0);
        assert_eq!(guard.camera().position.y, -1.0);
        assert_eq!(guard.saved_pose().position.y, 3.0);
        drop(guard);
        assert_eq!(camera.position.y, 3.0);
    }

    #[test]
    fn test_restore_is_bit_exact_for_awkward_values() {
        let mut camera = Camera::new(Vec3::new(0.1, 0.3 + 1e-7, 7.77), 1.0);
        camera.pitch = -12.345_679;
        let before = camera.pose();
        with_mirrored_camera(&mut camera, -0.7, |_| ());
        assert!(camera.pose().bits_eq(&before));
    }
}
