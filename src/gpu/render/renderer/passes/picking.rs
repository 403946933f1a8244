use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::picking::PickingBuffer;

use super::world::{draw_objects, draw_terrain};
use super::{PassBinding, SceneGeometry};

/// Picking pass - ID объектов в цвет. Террейн пишется с ID 0
/// и закрывает объекты за холмами.
pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    picking: &PickingBuffer,
    pipelines: &Pipelines,
    binding: &PassBinding,
    geometry: &SceneGeometry,
    view_proj: &[[f32; 4]; 4],
) {
    let mut pick_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Picking Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: &picking.target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: &picking.target.depth_view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0.0), // Reversed-Z
                store: wgpu::StoreOp::Discard,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    pick_pass.set_pipeline(&pipelines.pick);
    pick_pass.set_bind_group(0, binding.pass, &[]);
    draw_terrain(&mut pick_pass, binding, geometry, view_proj);
    draw_objects(&mut pick_pass, binding, geometry, view_proj, |object| object.pickable);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ultraviolet::{Mat4, Vec3};

    use super::*;
    use crate::gpu::objects::{ObjectMesh, PickTable, SceneObject};
    use crate::gpu::render::bind_groups::{BindGroupLayouts, ObjectBindings, PassBindings};
    use crate::gpu::render::renderer::compositor::object_slots;
    use crate::gpu::render::uniforms::PassUniform;
    use crate::gpu::terrain::GpuChunkManager;

    #[test]
    fn test_three_objects_round_trip() {
        let Some((device, queue)) = crate::gpu::test_support::create_device_queue() else {
            eprintln!("Skipping test_three_objects_round_trip (no GPU)");
            return;
        };
        let device = Arc::new(device);

        let layouts = BindGroupLayouts::new(&device);
        let pipelines = Pipelines::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &layouts);

        // Единичная view_proj: мир = NDC
        let identity: [[f32; 4]; 4] = Mat4::identity().into();
        let passes = PassBindings::new(&device, &layouts.pass, 1);
        passes.write(&queue, 0, &PassUniform::from_light(Mat4::identity(), Vec3::new(0.0, -1.0, 0.0)));

        let objects = vec![
            SceneObject::cube(Vec3::new(-0.6, 0.0, 0.5), 0.4),
            SceneObject::cube(Vec3::new(0.0, 0.0, 0.5), 0.4),
            SceneObject::cube(Vec3::new(0.6, 0.0, 0.5), 0.4),
        ];
        let picks = PickTable::assign(&objects);
        let mut object_bindings = ObjectBindings::new(&device, &layouts.object, 4);
        object_bindings.write(&device, &layouts.object, &queue, &object_slots(&objects, &picks, None, None));

        let chunks = GpuChunkManager::new(Arc::clone(&device));
        let cube = ObjectMesh::cube(&device);
        let geometry = SceneGeometry {
            chunks: &chunks,
            cube: &cube,
            objects: &objects,
            markers: &[],
        };
        let binding = PassBinding {
            pass: passes.bind_group(0),
            objects: object_bindings.bind_group(),
        };

        let picking = PickingBuffer::new(&device, 64, 64);
        let read = |pixel: (u32, u32), draw: bool| {
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Test Encoder"),
            });
            if draw {
                render(&mut encoder, &picking, &pipelines, &binding, &geometry, &identity);
            }
            picking.copy_pixel(&mut encoder, pixel);
            queue.submit(std::iter::once(encoder.finish()));
            picking.read_pixel(&device)
        };

        // центр второго куба
        let middle = read((32, 32), true).unwrap();
        assert_eq!(middle.object_id, 2);
        assert_eq!(middle.draw_id, 2);
        if pipelines.primitive_ids {
            // Видна грань +Z: треугольники 8 и 9 куба
            assert!(matches!(middle.primitive_id, 8 | 9), "primitive {}", middle.primitive_id);
        } else {
            assert_eq!(middle.primitive_id, 0);
        }
        assert_eq!(read((12, 32), false).unwrap().object_id, 1);
        // фон
        let background = read((2, 2), false).unwrap();
        assert_eq!(background.object_id, 0);
        assert!(background.pick_id().is_none());
    }
}
