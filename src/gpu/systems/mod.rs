// ============================================
// Systems Module - ECS-подобные системы
// ============================================

mod input_system;
mod interaction_system;
mod update_system;
mod render_system;
mod init_system;

pub use input_system::{InputSystem, InputAction};
pub use interaction_system::{InteractionMode, InteractionSystem, place_under_cursor};
pub use update_system::{UpdateSystem, move_camera};
pub use render_system::RenderSystem;
pub use init_system::InitSystem;
