pub mod world;
pub mod shadow;
pub mod picking;
pub mod final_pass;

use crate::gpu::objects::{ObjectMesh, SceneObject};
use crate::gpu::render::lights::PointLight;
use crate::gpu::terrain::GpuChunkManager;

/// Геометрия сцены, общая для всех проходов
pub struct SceneGeometry<'a> {
    pub chunks: &'a GpuChunkManager,
    pub cube: &'a ObjectMesh,
    pub objects: &'a [SceneObject],
    /// Источники света, рисуются кубами-маркерами
    pub markers: &'a [PointLight],
}

/// Привязки одного прохода: свой PassUniform и общий буфер объектов
pub struct PassBinding<'a> {
    pub pass: &'a wgpu::BindGroup,
    pub objects: &'a wgpu::BindGroup,
}
