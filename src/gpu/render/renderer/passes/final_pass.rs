use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::water::WaterMesh;

use super::world::{begin_color_pass, draw_world};
use super::{PassBinding, SceneGeometry};

/// Final pass - мир с тенями, небо, затем вода поверх
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    pipelines: &Pipelines,
    binding: &PassBinding,
    shadow_bind_group: &wgpu::BindGroup,
    water_bind_group: &wgpu::BindGroup,
    water: &WaterMesh,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    let mut render_pass = begin_color_pass(encoder, "Final Pass", view, depth);
    draw_world(&mut render_pass, pipelines, binding, shadow_bind_group, geometry, view_proj);

    // Water
    if water.vertex_count > 0 {
        render_pass.set_pipeline(&pipelines.water);
        render_pass.set_bind_group(0, binding.pass, &[]);
        render_pass.set_bind_group(1, water_bind_group, &[]);
        render_pass.set_vertex_buffer(0, water.vertex_buffer.slice(..));
        render_pass.draw(0..water.vertex_count, 0..1);
    }
}
