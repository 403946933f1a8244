use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::shadow::ShadowMap;

use super::world::{draw_objects, draw_terrain};
use super::{PassBinding, SceneGeometry};

/// Shadow pass - только глубина из ортографического frustum света
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    shadow: &ShadowMap,
    pipelines: &Pipelines,
    binding: &PassBinding,
    geometry: &SceneGeometry,
    light_view_proj: &[[f32; 4]; 4],
) {
    let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Shadow Pass"),
        color_attachments: &[],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &shadow.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    shadow_pass.set_pipeline(&pipelines.shadow);
    shadow_pass.set_bind_group(0, binding.pass, &[]);
    draw_terrain(&mut shadow_pass, binding, geometry, light_view_proj);
    draw_objects(&mut shadow_pass, binding, geometry, light_view_proj, |object| object.casts_shadow);
}
