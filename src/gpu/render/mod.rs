// ============================================
// GPU Render Module - Многопроходный рендер сцены с водой
// ============================================

pub mod uniforms;
pub mod clip;
pub mod lights;
pub mod shadow;
pub mod pipelines;
pub mod bind_groups;
pub mod depth;
pub mod target;
pub mod picking;
pub mod water;
pub mod renderer;

pub use renderer::compositor::{FrameContext, FrameOutput, SceneCompositor};
pub use renderer::core::RenderInitError;
pub use renderer::Renderer;
pub use lights::PointLight;
