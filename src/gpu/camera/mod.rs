// ============================================
// Camera Module - Камера и её зеркало для отражений
// ============================================

mod camera;
mod reflection;

pub use camera::{Camera, CameraMovement, CameraPose};
pub use reflection::{MirroredCamera, with_mirrored_camera};
