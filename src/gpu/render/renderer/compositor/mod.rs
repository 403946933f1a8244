// ============================================
// Scene Compositor - Проходы кадра в фиксированном порядке
// ============================================
// Все цели создаются один раз и меняются только при resize.
// Пикинг - единственная блокировка CPU на GPU за кадр.

mod frame;
mod plan;
mod slots;

pub use frame::{FrameContext, FrameOutput};
pub use plan::{FrameLedger, FramePlan, ScenePass};
pub use slots::{marker_slot, marker_slots, object_slot, object_slots};

use std::sync::Arc;

use ultraviolet::Vec3;

use crate::gpu::camera::with_mirrored_camera;
use crate::gpu::core::SceneConfig;
use crate::gpu::objects::{ObjectMesh, PickTable};
use crate::gpu::render::bind_groups::{BindGroupLayouts, ObjectBindings, PassBindings};
use crate::gpu::render::clip::ClipPlane;
use crate::gpu::render::depth::create_depth_texture;
use crate::gpu::render::lights::{active_lights, PointLight};
use crate::gpu::render::picking::{framebuffer_pixel, PickingBuffer};
use crate::gpu::render::pipelines::Pipelines;
use crate::gpu::render::shadow::ShadowMap;
use crate::gpu::render::target::OffscreenTarget;
use crate::gpu::render::uniforms::PassUniform;
use crate::gpu::render::water::{create_water_bind_group, WaterAnimation, WaterInputs, WaterMaps, WaterMesh};
use crate::gpu::terrain::{GpuChunkManager, TerrainScene};

use super::passes::{self, PassBinding, SceneGeometry};

/// Отражение рендерится в половинном разрешении
const REFLECTION_DIVISOR: u32 = 2;

pub struct SceneCompositor {
    layouts: BindGroupLayouts,
    pipelines: Pipelines,
    pass_bindings: PassBindings,
    object_bindings: ObjectBindings,

    chunks: GpuChunkManager,
    cube: ObjectMesh,
    water_mesh: WaterMesh,

    reflection: OffscreenTarget,
    refraction: OffscreenTarget,
    screen_depth: (wgpu::Texture, wgpu::TextureView),
    shadow: ShadowMap,
    picking: PickingBuffer,

    water_maps: WaterMaps,
    water_bind_group: wgpu::BindGroup,
    water: WaterAnimation,
    water_height: f32,
    point_lights: Vec<PointLight>,

    ledger: FrameLedger,
    size: (u32, u32),
}

impl SceneCompositor {
    pub fn new(
        device: &Arc<wgpu::Device>,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        size: (u32, u32),
        terrain: &TerrainScene,
        config: &SceneConfig,
    ) -> Self {
        let (width, height) = (size.0.max(1), size.1.max(1));

        let layouts = BindGroupLayouts::new(device);
        let pipelines = Pipelines::new(device, surface_format, &layouts);
        let pass_bindings = PassBindings::new(device, &layouts.pass, ScenePass::COUNT);
        let point_lights = active_lights(&config.point_lights).to_vec();
        let object_bindings = ObjectBindings::new(
            device,
            &layouts.object,
            config.objects.len() + 1 + point_lights.len(),
        );

        let mut chunks = GpuChunkManager::new(Arc::clone(device));
        for field in terrain.chunks() {
            chunks.upload(field);
        }
        log::info!("Uploaded {} terrain chunks", chunks.len());

        let cube = ObjectMesh::cube(device);
        let water_mesh = WaterMesh::new(device, terrain.water_tiles());

        let reflection = OffscreenTarget::new(
            device,
            "Reflection",
            surface_format,
            wgpu::TextureUsages::TEXTURE_BINDING,
            width / REFLECTION_DIVISOR,
            height / REFLECTION_DIVISOR,
        );
        let refraction = OffscreenTarget::new(
            device,
            "Refraction",
            surface_format,
            wgpu::TextureUsages::TEXTURE_BINDING,
            width,
            height,
        );
        let screen_depth = create_depth_texture(device, width, height, "Screen Depth");
        let shadow = ShadowMap::new(
            device,
            &layouts.shadow,
            config.shadow_resolution,
            config.shadow_extent,
            Vec3::from(config.light_direction),
        );
        let picking = PickingBuffer::new(device, width, height);

        let water_maps = WaterMaps::new(device, queue, config.seed);
        let water_bind_group = create_water_bind_group(
            device,
            &layouts.water,
            &WaterInputs {
                reflection: &reflection.color_view,
                refraction: &refraction.color_view,
                refraction_depth: &refraction.depth_view,
                shadow_depth: &shadow.view,
            },
            &water_maps,
        );

        Self {
            layouts,
            pipelines,
            pass_bindings,
            object_bindings,
            chunks,
            cube,
            water_mesh,
            reflection,
            refraction,
            screen_depth,
            shadow,
            picking,
            water_maps,
            water_bind_group,
            water: WaterAnimation::default(),
            water_height: terrain.water_height(),
            point_lights,
            ledger: FrameLedger::default(),
            size: (width, height),
        }
    }

    /// Пересоздаёт цели, зависящие от размера окна
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size {
            return;
        }
        self.size = (width, height);

        let reflection_changed =
            self.reflection
                .ensure_size(device, (width / REFLECTION_DIVISOR).max(1), (height / REFLECTION_DIVISOR).max(1));
        let refraction_changed = self.refraction.ensure_size(device, width, height);
        self.screen_depth = create_depth_texture(device, width, height, "Screen Depth");
        self.picking.resize(device, width, height);

        if reflection_changed || refraction_changed {
            self.water_bind_group = create_water_bind_group(
                device,
                &self.layouts.water,
                &WaterInputs {
                    reflection: &self.reflection.color_view,
                    refraction: &self.refraction.color_view,
                    refraction_depth: &self.refraction.depth_view,
                    shadow_depth: &self.shadow.view,
                },
                &self.water_maps,
            );
        }
    }

    /// Один кадр: проходы по FramePlan в `view`.
    /// В кадре с пикингом два submit: проходы 1-4 с копией пикселя,
    /// чтение, затем финал с подсветкой этого же кадра.
    pub fn render_frame(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        ctx: &mut FrameContext,
    ) -> FrameOutput {
        let pick_pixel = if ctx.picking_active {
            ctx.cursor
                .and_then(|cursor| framebuffer_pixel(cursor, ctx.window_size, self.picking.size()))
        } else {
            None
        };
        let plan = FramePlan::for_frame(pick_pixel.is_some());

        self.ledger.begin_frame();
        self.water.advance(ctx.delta_time);

        let picks = PickTable::assign(ctx.objects);
        let mut output = FrameOutput::default();
        self.write_objects(device, queue, ctx, &picks, None);

        let h = self.water_height;
        let light_dir = self.shadow.light_dir;
        let focus = Vec3::new(ctx.camera.position.x, h, ctx.camera.position.z);
        let light_vp = self.shadow.light_matrix(focus);
        let (move_offset, time) = (self.water.move_offset(), self.water.time());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });

        for &pass in plan.passes() {
            let uniform = match pass {
                ScenePass::Reflection => with_mirrored_camera(ctx.camera, h, |mirrored| {
                    PassUniform::from_camera(mirrored, ClipPlane::reflection(h))
                }),
                ScenePass::Refraction => PassUniform::from_camera(ctx.camera, ClipPlane::refraction(h)),
                ScenePass::Shadow => PassUniform::from_light(light_vp, light_dir),
                ScenePass::Picking => PassUniform::from_camera(ctx.camera, ClipPlane::NONE),
                ScenePass::Final => PassUniform::from_camera(ctx.camera, ClipPlane::NONE)
                    .with_lighting(light_vp, light_dir, 1.0),
            };
            let uniform = match pass {
                ScenePass::Shadow => uniform,
                ScenePass::Picking => uniform.with_lighting(light_vp, light_dir, 0.0),
                ScenePass::Final => uniform
                    .with_water(h, move_offset, time)
                    .with_point_lights(&self.point_lights),
                ScenePass::Reflection | ScenePass::Refraction => uniform
                    .with_lighting(light_vp, light_dir, 0.0)
                    .with_water(h, move_offset, time)
                    .with_point_lights(&self.point_lights),
            };
            self.pass_bindings.write(queue, pass.index(), &uniform);

            let geometry = SceneGeometry {
                chunks: &self.chunks,
                cube: &self.cube,
                objects: ctx.objects,
                markers: &self.point_lights,
            };
            let binding = PassBinding {
                pass: self.pass_bindings.bind_group(pass.index()),
                objects: self.object_bindings.bind_group(),
            };

            match pass {
                ScenePass::Reflection => passes::world::render(
                    &mut encoder,
                    pass.label(),
                    &self.reflection.color_view,
                    &self.reflection.depth_view,
                    &self.pipelines,
                    &binding,
                    &self.shadow.bind_group,
                    &geometry,
                    &uniform.view_proj,
                ),
                ScenePass::Refraction => passes::world::render(
                    &mut encoder,
                    pass.label(),
                    &self.refraction.color_view,
                    &self.refraction.depth_view,
                    &self.pipelines,
                    &binding,
                    &self.shadow.bind_group,
                    &geometry,
                    &uniform.view_proj,
                ),
                ScenePass::Shadow => passes::shadow::render(
                    &mut encoder,
                    &self.shadow,
                    &self.pipelines,
                    &binding,
                    &geometry,
                    &uniform.view_proj,
                ),
                ScenePass::Picking => {
                    passes::picking::render(
                        &mut encoder,
                        &self.picking,
                        &self.pipelines,
                        &binding,
                        &geometry,
                        &uniform.view_proj,
                    );
                    if let Some(pixel) = pick_pixel {
                        self.picking.copy_pixel(&mut encoder, pixel);
                    }
                    // Блокировка: нужны готовые проходы 1-4
                    let finished = std::mem::replace(
                        &mut encoder,
                        device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Final Encoder"),
                        }),
                    );
                    queue.submit(std::iter::once(finished.finish()));

                    output.pixel = self.picking.read_pixel(device);
                    output.hovered = output
                        .pixel
                        .and_then(|info| info.pick_id())
                        .and_then(|id| picks.resolve(id));
                }
                ScenePass::Final => {
                    debug_assert!(
                        self.ledger.final_inputs_fresh(),
                        "final pass reads targets not written this frame"
                    );
                    passes::final_pass::render(
                        &mut encoder,
                        view,
                        &self.screen_depth.1,
                        &self.pipelines,
                        &binding,
                        &self.shadow.bind_group,
                        &self.water_bind_group,
                        &self.water_mesh,
                        &geometry,
                        &uniform.view_proj,
                    );
                }
            }
            self.ledger.mark_written(pass);

            // Подсветка наведения видна уже в финале этого кадра
            if pass == ScenePass::Picking && output.hovered.is_some() {
                self.write_objects(device, queue, ctx, &picks, output.hovered);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        output
    }

    fn write_objects(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        ctx: &FrameContext,
        picks: &PickTable,
        hovered: Option<usize>,
    ) {
        let mut slots = object_slots(ctx.objects, picks, ctx.selected, hovered);
        slots.extend(marker_slots(ctx.objects.len(), &self.point_lights));
        self.object_bindings.write(device, &self.layouts.object, queue, &slots);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ultraviolet::Vec3;

    use super::*;
    use crate::gpu::camera::Camera;
    use crate::gpu::objects::SceneObject;

    const SIZE: u32 = 64;
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Плоский террейн на высоте 0, вода на 0
    fn flat_config() -> SceneConfig {
        SceneConfig {
            chunk_size: 64.0,
            vertex_count: 16,
            water_height: 0.0,
            noise_amplitude: 0.0,
            shadow_resolution: 512,
            objects: Vec::new(),
            ..SceneConfig::default()
        }
    }

    fn render(
        compositor: &mut SceneCompositor,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &mut Camera,
        objects: &[SceneObject],
        cursor: Option<(f64, f64)>,
    ) -> FrameOutput {
        let mut ctx = FrameContext {
            camera,
            cursor,
            window_size: (SIZE, SIZE),
            delta_time: 0.016,
            picking_active: cursor.is_some(),
            objects,
            selected: None,
        };
        compositor.render_frame(device, queue, view, &mut ctx)
    }

    #[test]
    fn test_frames_restore_camera_and_refresh_targets() {
        let Some((device, queue)) = crate::gpu::test_support::create_device_queue() else {
            eprintln!("Skipping test_frames_restore_camera_and_refresh_targets (no GPU)");
            return;
        };
        let device = Arc::new(device);

        let config = flat_config();
        let terrain = TerrainScene::from_config(&config).unwrap();
        let mut compositor = SceneCompositor::new(&device, &queue, FORMAT, (SIZE, SIZE), &terrain, &config);

        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Compositor Test Target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = target.create_view(&wgpu::TextureViewDescriptor::default());

        // Камера над водой смотрит горизонтально, куб в центре кадра
        let mut camera = Camera::new(Vec3::new(0.0, 5.0, 0.0), 1.0);
        camera.pitch = 0.0;
        let objects = vec![SceneObject::cube(camera.position + camera.front() * 10.0, 4.0)];
        let before = camera.pose();

        let frames = [
            (None, None),
            (Some((32.0, 32.0)), Some(0)),
            // верхний ряд: над кубом только небо
            (Some((32.0, 1.0)), None),
        ];
        for (cursor, expected) in frames {
            let output = render(&mut compositor, &device, &queue, &view, &mut camera, &objects, cursor);

            assert!(camera.pose().bits_eq(&before), "camera moved: {:?}", camera.pose());
            for pass in [ScenePass::Reflection, ScenePass::Refraction, ScenePass::Shadow] {
                assert!(compositor.ledger.is_fresh(pass), "{} is stale", pass.label());
            }
            assert_eq!(compositor.ledger.is_fresh(ScenePass::Picking), cursor.is_some());
            assert_eq!(output.hovered, expected);
            assert_eq!(output.pixel.is_some(), cursor.is_some());
        }
    }
}
