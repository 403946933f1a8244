// ============================================
// Init System - Инициализация сцены
// ============================================

use std::sync::Arc;
use std::time::Instant;
use ultraviolet::Vec3;
use winit::window::Window;

use crate::gpu::camera::Camera;
use crate::gpu::core::{GameResources, MovementKeys, SceneConfig};
use crate::gpu::core::config::{WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::gpu::objects::SceneObject;
use crate::gpu::render::{RenderInitError, Renderer};
use crate::gpu::systems::InteractionMode;
use crate::gpu::terrain::{RayTerrainIntersector, TerrainError, TerrainScene};

/// Система инициализации
pub struct InitSystem;

impl InitSystem {
    /// Строит террейн и объекты; ошибка карты высот останавливает запуск
    pub fn create_resources(config: SceneConfig) -> Result<GameResources, TerrainError> {
        let terrain = TerrainScene::from_config(&config)?;
        let objects = config
            .objects
            .iter()
            .map(|placement| SceneObject::placed(&terrain, placement))
            .collect();

        let mut camera = Camera::new(
            Vec3::from(config.camera_start),
            WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32,
        );
        camera.keep_above_ground(terrain.terrain_height(camera.position.x, camera.position.z));

        Ok(GameResources {
            window: None,
            renderer: None,
            config,
            terrain,
            objects,
            ray: RayTerrainIntersector::default(),
            camera,
            mode: InteractionMode::default(),
            selected: None,
            hovered: None,
            start_time: Instant::now(),
            last_frame: Instant::now(),
            keys: MovementKeys::default(),
            mouse_look: false,
            cursor_pos: None,
        })
    }

    /// Инициализация рендеринга (вызывается при resumed)
    pub fn init_rendering(resources: &mut GameResources, window: Arc<Window>) -> Result<(), RenderInitError> {
        let renderer = pollster::block_on(Renderer::new(
            window.clone(),
            &resources.terrain,
            &resources.config,
        ))?;

        resources.camera.resize(renderer.size().width, renderer.size().height);
        resources.window = Some(window);
        resources.renderer = Some(renderer);
        resources.last_frame = Instant::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objects_stand_on_terrain() {
        let resources = InitSystem::create_resources(SceneConfig::default()).unwrap();
        assert_eq!(resources.objects.len(), 3);
        for object in &resources.objects {
            let ground = resources.terrain.terrain_height(object.position.x, object.position.z);
            assert!((object.position.y - (ground + 0.5 * object.scale)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_camera_starts_above_ground() {
        let mut config = SceneConfig::default();
        config.camera_start = [0.0, -50.0, 0.0];
        let resources = InitSystem::create_resources(config).unwrap();
        let ground = resources.terrain.terrain_height(0.0, 0.0);
        assert!(resources.camera.position.y >= ground);
        assert_eq!(resources.mode, InteractionMode::Wandering);
    }
}
