// ============================================
// Core Module - Основные компоненты и ресурсы
// ============================================

pub mod app;
mod resources;
pub mod config;

pub use app::App;
pub use resources::{GameResources, MovementKeys};
pub use config::{SceneConfig, SCENE_CONFIG_PATH};
