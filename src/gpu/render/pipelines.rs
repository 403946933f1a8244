use crate::gpu::terrain::MeshVertex;

use super::bind_groups::BindGroupLayouts;
use super::depth::DEPTH_FORMAT;
use super::picking::PICK_FORMAT;
use super::water::WaterMesh;

const WORLD_SHADER: &str = include_str!("../shaders/world.wgsl");

/// world.wgsl + fs_pick. С SHADER_PRIMITIVE_INDEX канал b получает
/// номер треугольника, без него остаётся 0.
pub fn pick_shader_source(primitive_index: bool) -> String {
    let pick = if primitive_index {
        include_str!("../shaders/pick_primitive.wgsl")
    } else {
        include_str!("../shaders/pick.wgsl")
    };
    format!("{}{}", WORLD_SHADER, pick)
}

pub struct Pipelines {
    pub terrain: wgpu::RenderPipeline,
    pub object: wgpu::RenderPipeline,
    pub marker: wgpu::RenderPipeline,
    pub sky: wgpu::RenderPipeline,
    pub water: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
    pub pick: wgpu::RenderPipeline,
    /// Пишет ли пикинг номер примитива
    pub primitive_ids: bool,
}

impl Pipelines {
    /// `color_format` - формат экрана; цели отражения и преломления
    /// создаются в нём же, поэтому пайплайны общие.
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, layouts: &BindGroupLayouts) -> Self {
        let world_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("World Shader"),
            source: wgpu::ShaderSource::Wgsl(WORLD_SHADER.into()),
        });

        let primitive_ids = device.features().contains(wgpu::Features::SHADER_PRIMITIVE_INDEX);
        if !primitive_ids {
            log::warn!("SHADER_PRIMITIVE_INDEX unsupported: picking primitive ids are written as 0");
        }
        let pick_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Pick Shader"),
            source: wgpu::ShaderSource::Wgsl(pick_shader_source(primitive_ids).into()),
        });

        let sky_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Sky Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/sky.wgsl").into()),
        });

        let water_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Water Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/water.wgsl").into()),
        });

        let world_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("World Layout"),
            bind_group_layouts: &[&layouts.pass, &layouts.object, &layouts.shadow],
            push_constant_ranges: &[],
        });

        // Тени и пикинг не читают карту теней
        let depth_only_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Depth Only Layout"),
            bind_group_layouts: &[&layouts.pass, &layouts.object],
            push_constant_ranges: &[],
        });

        let sky_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sky Layout"),
            bind_group_layouts: &[&layouts.pass],
            push_constant_ranges: &[],
        });

        let water_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Water Layout"),
            bind_group_layouts: &[&layouts.pass, &layouts.water],
            push_constant_ranges: &[],
        });

        let terrain = mesh_pipeline(
            device,
            "Terrain Pipeline",
            &world_layout,
            &world_shader,
            "fs_terrain",
            color_format,
        );

        let object = mesh_pipeline(
            device,
            "Object Pipeline",
            &world_layout,
            &world_shader,
            "fs_object",
            color_format,
        );

        let marker = mesh_pipeline(
            device,
            "Marker Pipeline",
            &world_layout,
            &world_shader,
            "fs_marker",
            color_format,
        );

        // Float32-цель без смешивания
        let pick = mesh_pipeline(
            device,
            "Pick Pipeline",
            &depth_only_layout,
            &pick_shader,
            "fs_pick",
            PICK_FORMAT,
        );

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&depth_only_layout),
            vertex: wgpu::VertexState {
                module: &world_shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less, // Shadow pass остаётся Less
                stencil: Default::default(),
                bias: wgpu::DepthBiasState {
                    constant: 4,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let sky = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sky Pipeline"),
            layout: Some(&sky_layout),
            vertex: wgpu::VertexState {
                module: &sky_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &sky_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            // Рисуется после геометрии, только там, где глубина осталась 0
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::GreaterEqual,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let water = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Water Pipeline"),
            layout: Some(&water_layout),
            vertex: wgpu::VertexState {
                module: &water_shader,
                entry_point: Some("vs_main"),
                buffers: &[WaterMesh::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &water_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Greater, // Reversed-Z
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            terrain,
            object,
            marker,
            sky,
            water,
            shadow,
            pick,
            primitive_ids,
        }
    }
}

/// Террейн, объекты и пикинг: общий vs_main, разные fragment-входы
fn mesh_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    fragment_entry: &str,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let blend = if format == PICK_FORMAT { None } else { Some(wgpu::BlendState::REPLACE) };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::desc()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Greater, // Reversed-Z
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
