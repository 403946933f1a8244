use crate::gpu::objects::SceneObject;
use crate::gpu::render::bind_groups::ObjectBindings;
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::renderer::compositor::{marker_slot, object_slot};
use crate::gpu::render::renderer::culling::is_aabb_visible;

use super::{PassBinding, SceneGeometry};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.78,
    g: 0.86,
    b: 0.95,
    a: 1.0,
};

/// Проход мира в цель вне экрана (отражение, преломление)
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
    pipelines: &Pipelines,
    binding: &PassBinding,
    shadow_bind_group: &wgpu::BindGroup,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    let mut render_pass = begin_color_pass(encoder, label, color, depth);
    draw_world(&mut render_pass, pipelines, binding, shadow_bind_group, geometry, view_proj);
}

pub fn begin_color_pass<'e>(
    encoder: &'e mut wgpu::CommandEncoder,
    label: &str,
    color: &wgpu::TextureView,
    depth: &wgpu::TextureView,
) -> wgpu::RenderPass<'e> {
    encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: color,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0.0), // Reversed-Z: clear to 0 instead of 1
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    })
}

/// Террейн, объекты, маркеры света, затем небо там, где ничего не нарисовано.
/// Плоскость отсечения прохода действует на всё, включая маркеры.
pub fn draw_world(
    render_pass: &mut wgpu::RenderPass<'_>,
    pipelines: &Pipelines,
    binding: &PassBinding,
    shadow_bind_group: &wgpu::BindGroup,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    render_pass.set_pipeline(&pipelines.terrain);
    render_pass.set_bind_group(0, binding.pass, &[]);
    render_pass.set_bind_group(2, shadow_bind_group, &[]);
    draw_terrain(render_pass, binding, geometry, view_proj);

    render_pass.set_pipeline(&pipelines.object);
    draw_objects(render_pass, binding, geometry, view_proj, |_| true);

    render_pass.set_pipeline(&pipelines.marker);
    draw_markers(render_pass, binding, geometry, view_proj);

    render_pass.set_pipeline(&pipelines.sky);
    render_pass.set_bind_group(0, binding.pass, &[]);
    render_pass.draw(0..3, 0..1);
}

/// Все видимые чанки со слотом 0
pub fn draw_terrain(
    render_pass: &mut wgpu::RenderPass<'_>,
    binding: &PassBinding,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    render_pass.set_bind_group(1, binding.objects, &[ObjectBindings::offset(0)]);
    for gpu_chunk in geometry.chunks.iter() {
        if is_aabb_visible(view_proj, gpu_chunk.bounds_min, gpu_chunk.bounds_max) {
            render_pass.set_vertex_buffer(0, gpu_chunk.vertex_buffer.slice(..));
            render_pass.set_index_buffer(gpu_chunk.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu_chunk.index_count, 0, 0..1);
        }
    }
}

/// Видимые объекты, прошедшие фильтр; у каждого свой слот
pub fn draw_objects(
    render_pass: &mut wgpu::RenderPass<'_>,
    binding: &PassBinding,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
    filter: impl Fn(&SceneObject) -> bool,
) {
    render_pass.set_vertex_buffer(0, geometry.cube.vertex_buffer.slice(..));
    render_pass.set_index_buffer(geometry.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

    for (index, object) in geometry.objects.iter().enumerate() {
        if !filter(object) {
            continue;
        }
        let (min, max) = object.bounds();
        if !is_aabb_visible(view_proj, min, max) {
            continue;
        }
        render_pass.set_bind_group(1, binding.objects, &[ObjectBindings::offset(object_slot(index))]);
        render_pass.draw_indexed(0..geometry.cube.index_count, 0, 0..1);
    }
}

/// Кубы-маркеры источников; слоты идут сразу за объектами
pub fn draw_markers(
    render_pass: &mut wgpu::RenderPass<'_>,
    binding: &PassBinding,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    render_pass.set_vertex_buffer(0, geometry.cube.vertex_buffer.slice(..));
    render_pass.set_index_buffer(geometry.cube.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

    for (index, light) in geometry.markers.iter().enumerate() {
        let (min, max) = light.marker_bounds();
        if !is_aabb_visible(view_proj, min, max) {
            continue;
        }
        let slot = marker_slot(geometry.objects.len(), index);
        render_pass.set_bind_group(1, binding.objects, &[ObjectBindings::offset(slot)]);
        render_pass.draw_indexed(0..geometry.cube.index_count, 0, 0..1);
    }
}
