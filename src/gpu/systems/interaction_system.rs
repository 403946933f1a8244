// ============================================
// Interaction System - Выбор и перенос объектов
// ============================================
// Wandering: пикинг выключен. Selecting: клик выбирает объект под курсором.
// Placing: клик ставит выбранный объект в точку террейна под курсором.

use ultraviolet::Vec3;

use crate::gpu::camera::Camera;
use crate::gpu::core::GameResources;
use crate::gpu::objects::SceneObject;
use crate::gpu::terrain::{HeightSampler, RayTerrainIntersector};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Wandering,
    Selecting,
    Placing,
}

impl InteractionMode {
    pub fn next(self) -> Self {
        match self {
            InteractionMode::Wandering => InteractionMode::Selecting,
            InteractionMode::Selecting => InteractionMode::Placing,
            InteractionMode::Placing => InteractionMode::Wandering,
        }
    }

    /// Нужен ли в этом режиме проход пикинга
    pub fn picking_active(self) -> bool {
        self == InteractionMode::Selecting
    }

    pub fn name(self) -> &'static str {
        match self {
            InteractionMode::Wandering => "wandering",
            InteractionMode::Selecting => "selecting",
            InteractionMode::Placing => "placing",
        }
    }
}

/// Система взаимодействия с объектами
pub struct InteractionSystem;

impl InteractionSystem {
    pub fn cycle_mode(resources: &mut GameResources) {
        resources.mode = resources.mode.next();
        if !resources.mode.picking_active() {
            resources.hovered = None;
        }
        log::info!("Mode: {}", resources.mode.name());
    }

    /// Левая кнопка мыши
    pub fn handle_click(resources: &mut GameResources) {
        match resources.mode {
            InteractionMode::Wandering => {}
            InteractionMode::Selecting => {
                resources.selected = resources.hovered;
                match resources.selected {
                    Some(index) => log::info!("Selected object {}", index),
                    None => log::debug!("Nothing under cursor"),
                }
            }
            InteractionMode::Placing => {
                let (Some(index), Some(cursor)) = (resources.selected, resources.cursor_pos) else {
                    return;
                };
                let window = match &resources.window {
                    Some(window) => {
                        let size = window.inner_size();
                        (size.width, size.height)
                    }
                    None => return,
                };
                let Some(object) = resources.objects.get_mut(index) else {
                    return;
                };
                if let Some(point) = place_under_cursor(
                    &resources.ray,
                    &resources.terrain,
                    &resources.camera,
                    (cursor.0 as f32, cursor.1 as f32),
                    window,
                    object,
                ) {
                    log::info!("Moved object {} to ({:.2}, {:.2})", index, point.x, point.z);
                }
            }
        }
    }
}

/// Ставит объект в точку террейна под курсором. None, если луч не попал
/// или попал за пределы сетки чанков (там только высота-заглушка).
pub fn place_under_cursor<S>(
    ray: &RayTerrainIntersector,
    terrain: &S,
    camera: &Camera,
    cursor: (f32, f32),
    window: (u32, u32),
    object: &mut SceneObject,
) -> Option<Vec3>
where
    S: HeightSampler + ?Sized,
{
    let direction = camera.cursor_ray(cursor, window);
    let point = ray.try_intersect(terrain, camera.position, direction)?;
    if !terrain.covers(point.x, point.z) {
        return None;
    }
    object.set_ground(terrain, point.x, point.z);
    Some(point)
}
