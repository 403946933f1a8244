// ============================================
// Resources - Общие ресурсы приложения
// ============================================

use std::sync::Arc;
use std::time::Instant;
use winit::window::Window;

use crate::gpu::camera::Camera;
use crate::gpu::core::SceneConfig;
use crate::gpu::objects::SceneObject;
use crate::gpu::render::Renderer;
use crate::gpu::systems::InteractionMode;
use crate::gpu::terrain::{RayTerrainIntersector, TerrainScene};

/// Зажатые клавиши движения
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Все ресурсы в одном месте
pub struct GameResources {
    // Window & Rendering
    pub window: Option<Arc<Window>>,
    pub renderer: Option<Renderer>,

    // Scene
    pub config: SceneConfig,
    pub terrain: TerrainScene,
    pub objects: Vec<SceneObject>,
    pub ray: RayTerrainIntersector,

    // Camera
    pub camera: Camera,

    // Interaction
    pub mode: InteractionMode,
    pub selected: Option<usize>,
    pub hovered: Option<usize>,

    // Timing
    pub start_time: Instant,
    pub last_frame: Instant,

    // Input state
    pub keys: MovementKeys,
    /// Правая кнопка зажата - мышь крутит камеру
    pub mouse_look: bool,
    /// None, пока курсор вне окна
    pub cursor_pos: Option<(f64, f64)>,
}
