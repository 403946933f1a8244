// ============================================
// Update System - Движение камеры
// ============================================

use crate::gpu::camera::{Camera, CameraMovement};
use crate::gpu::core::{GameResources, MovementKeys};
use crate::gpu::terrain::HeightSampler;

/// Система обновления
pub struct UpdateSystem;

impl UpdateSystem {
    pub fn update(resources: &mut GameResources, dt: f32) {
        move_camera(&mut resources.camera, resources.keys, &resources.terrain, dt);
    }
}

/// Движение по зажатым клавишам, затем коллизия с землёй
pub fn move_camera<S>(camera: &mut Camera, keys: MovementKeys, terrain: &S, dt: f32)
where
    S: HeightSampler + ?Sized,
{
    let moves = [
        (keys.forward, CameraMovement::Forward),
        (keys.backward, CameraMovement::Backward),
        (keys.left, CameraMovement::Left),
        (keys.right, CameraMovement::Right),
    ];
    for (held, movement) in moves {
        if held {
            camera.process_keyboard(movement, dt);
        }
    }

    let ground = terrain.height_at(camera.position.x, camera.position.z);
    camera.keep_above_ground(ground);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::core::config::MIN_CAMERA_CLEARANCE;
    use ultraviolet::Vec3;

    struct Slope;

    impl HeightSampler for Slope {
        fn height_at(&self, _x: f32, z: f32) -> f32 {
            -z
        }
    }

    #[test]
    fn test_forward_walk_climbs_slope() {
        let mut camera = Camera::new(Vec3::new(0.0, 1.5, 0.0), 1.0);
        camera.yaw = -90.0;
        let keys = MovementKeys {
            forward: true,
            ..MovementKeys::default()
        };

        move_camera(&mut camera, keys, &Slope, 1.0);

        // Вперёд = -Z, земля поднимается
        assert!(camera.position.z < -1.0);
        let ground = -camera.position.z;
        assert!((camera.position.y - (ground + MIN_CAMERA_CLEARANCE)).abs() < 1e-4);
    }

    #[test]
    fn test_no_keys_no_motion() {
        let start = Vec3::new(3.0, 20.0, -4.0);
        let mut camera = Camera::new(start, 1.0);
        move_camera(&mut camera, MovementKeys::default(), &Slope, 0.5);
        assert_eq!(camera.position, start);
    }
}
