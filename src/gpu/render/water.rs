// ============================================
// Water - Текстуры воды, анимация, привязки
// ============================================
// Слоты 0..5 - контракт с water.wgsl, менять порядок нельзя.

use wgpu::util::DeviceExt;

use crate::gpu::terrain::generation::tileable_fbm2d;
use crate::gpu::terrain::WaterTile;
use super::shadow::create_comparison_sampler;

/// Скорость прокрутки DU/DV (доля текстуры в секунду)
pub const WAVE_SPEED: f32 = 0.1;
pub const WATER_MAP_SIZE: u32 = 128;
const WATER_MAP_PERIOD: i32 = 8;
const WATER_MAP_OCTAVES: u32 = 4;

/// Номер слота = binding в группе воды
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum WaterTextureSlot {
    Reflection = 0,
    Refraction = 1,
    DuDv = 2,
    Normal = 3,
    RefractionDepth = 4,
    ShadowDepth = 5,
}

impl WaterTextureSlot {
    pub const ALL: [WaterTextureSlot; 6] = [
        WaterTextureSlot::Reflection,
        WaterTextureSlot::Refraction,
        WaterTextureSlot::DuDv,
        WaterTextureSlot::Normal,
        WaterTextureSlot::RefractionDepth,
        WaterTextureSlot::ShadowDepth,
    ];

    pub fn binding(self) -> u32 {
        self as u32
    }
}

pub const CLAMP_SAMPLER_BINDING: u32 = 6;
pub const REPEAT_SAMPLER_BINDING: u32 = 7;
pub const COMPARISON_SAMPLER_BINDING: u32 = 8;

/// Смещение волн, всегда в [0, 1)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaterAnimation {
    move_offset: f32,
    time: f32,
}

impl WaterAnimation {
    pub fn advance(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.move_offset = (self.move_offset + dt * WAVE_SPEED).rem_euclid(1.0);
        // rem_euclid может вернуть ровно 1.0 на округлении
        if self.move_offset >= 1.0 {
            self.move_offset = 0.0;
        }
        self.time += dt;
    }

    pub fn move_offset(&self) -> f32 {
        self.move_offset
    }

    pub fn time(&self) -> f32 {
        self.time
    }
}

/// DU/DV: два канала искажения в 0..255, 128 = без сдвига
pub fn dudv_pixels(size: u32, seed: i32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let (u, v) = map_coords(x, y, size);
            let du = tileable_fbm2d(u, v, WATER_MAP_PERIOD, WATER_MAP_OCTAVES, seed);
            let dv = tileable_fbm2d(u, v, WATER_MAP_PERIOD, WATER_MAP_OCTAVES, seed.wrapping_add(101));
            pixels.extend_from_slice(&[to_unorm(du), to_unorm(dv), 0, 255]);
        }
    }
    pixels
}

/// Нормали волн: r = x, g = z, b = вверх
pub fn normal_pixels(size: u32, seed: i32) -> Vec<u8> {
    let height = |x: i32, y: i32| {
        let (u, v) = map_coords(x.rem_euclid(size as i32) as u32, y.rem_euclid(size as i32) as u32, size);
        tileable_fbm2d(u, v, WATER_MAP_PERIOD, WATER_MAP_OCTAVES, seed)
    };

    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let dx = height(x - 1, y) - height(x + 1, y);
            let dz = height(x, y - 1) - height(x, y + 1);
            let n = ultraviolet::Vec3::new(dx * 4.0, 1.0, dz * 4.0).normalized();
            pixels.extend_from_slice(&[to_unorm(n.x), to_unorm(n.z), to_unorm(n.y), 255]);
        }
    }
    pixels
}

fn map_coords(x: u32, y: u32, size: u32) -> (f32, f32) {
    let scale = WATER_MAP_PERIOD as f32 / size as f32;
    (x as f32 * scale, y as f32 * scale)
}

fn to_unorm(v: f32) -> u8 {
    ((v.clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8
}

/// DU/DV, нормали и сэмплеры воды
pub struct WaterMaps {
    pub dudv: wgpu::TextureView,
    pub normal: wgpu::TextureView,
    pub clamp_sampler: wgpu::Sampler,
    pub repeat_sampler: wgpu::Sampler,
    pub comparison_sampler: wgpu::Sampler,
}

impl WaterMaps {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, seed: i32) -> Self {
        let dudv = upload_map(device, queue, "Water DuDv", &dudv_pixels(WATER_MAP_SIZE, seed));
        let normal = upload_map(device, queue, "Water Normal", &normal_pixels(WATER_MAP_SIZE, seed.wrapping_add(7)));

        let clamp_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Water Clamp Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let repeat_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Water Repeat Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            dudv,
            normal,
            clamp_sampler,
            repeat_sampler,
            comparison_sampler: create_comparison_sampler(device),
        }
    }
}

fn upload_map(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, pixels: &[u8]) -> wgpu::TextureView {
    let size = wgpu::Extent3d {
        width: WATER_MAP_SIZE,
        height: WATER_MAP_SIZE,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * WATER_MAP_SIZE),
            rows_per_image: Some(WATER_MAP_SIZE),
        },
        size,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// Входы прохода воды, которые пишут другие проходы
pub struct WaterInputs<'a> {
    pub reflection: &'a wgpu::TextureView,
    pub refraction: &'a wgpu::TextureView,
    pub refraction_depth: &'a wgpu::TextureView,
    pub shadow_depth: &'a wgpu::TextureView,
}

impl<'a> WaterInputs<'a> {
    fn view(&self, maps: &'a WaterMaps, slot: WaterTextureSlot) -> &'a wgpu::TextureView {
        match slot {
            WaterTextureSlot::Reflection => self.reflection,
            WaterTextureSlot::Refraction => self.refraction,
            WaterTextureSlot::DuDv => &maps.dudv,
            WaterTextureSlot::Normal => &maps.normal,
            WaterTextureSlot::RefractionDepth => self.refraction_depth,
            WaterTextureSlot::ShadowDepth => self.shadow_depth,
        }
    }
}

/// Пересоздаётся вместе с целями отражения/преломления
pub fn create_water_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    inputs: &WaterInputs,
    maps: &WaterMaps,
) -> wgpu::BindGroup {
    let mut entries: Vec<wgpu::BindGroupEntry> = WaterTextureSlot::ALL
        .iter()
        .map(|&slot| wgpu::BindGroupEntry {
            binding: slot.binding(),
            resource: wgpu::BindingResource::TextureView(inputs.view(maps, slot)),
        })
        .collect();
    entries.push(wgpu::BindGroupEntry {
        binding: CLAMP_SAMPLER_BINDING,
        resource: wgpu::BindingResource::Sampler(&maps.clamp_sampler),
    });
    entries.push(wgpu::BindGroupEntry {
        binding: REPEAT_SAMPLER_BINDING,
        resource: wgpu::BindingResource::Sampler(&maps.repeat_sampler),
    });
    entries.push(wgpu::BindGroupEntry {
        binding: COMPARISON_SAMPLER_BINDING,
        resource: wgpu::BindingResource::Sampler(&maps.comparison_sampler),
    });

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Water BG"),
        layout,
        entries: &entries,
    })
}

/// Все водные тайлы сцены в одном буфере
pub struct WaterMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl WaterMesh {
    pub fn new(device: &wgpu::Device, tiles: &[WaterTile]) -> Self {
        let vertices: Vec<[f32; 3]> = tiles.iter().flat_map(|t| t.vertices()).collect();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Water Vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_contract() {
        let bindings: Vec<u32> = WaterTextureSlot::ALL.iter().map(|s| s.binding()).collect();
        assert_eq!(bindings, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(WaterTextureSlot::RefractionDepth.binding(), 4);
        assert_eq!(WaterTextureSlot::ShadowDepth.binding(), 5);
    }

    #[test]
    fn test_move_offset_wraps() {
        let mut water = WaterAnimation::default();
        water.advance(5.0);
        assert!((water.move_offset() - 0.5).abs() < 1e-6);
        water.advance(7.0);
        assert!((water.move_offset() - 0.2).abs() < 1e-5);
        for _ in 0..10_000 {
            water.advance(0.016);
            assert!((0.0..1.0).contains(&water.move_offset()));
        }
    }

    #[test]
    fn test_bad_delta_is_ignored() {
        let mut water = WaterAnimation::default();
        water.advance(1.0);
        let before = water.move_offset();
        water.advance(f32::NAN);
        water.advance(-3.0);
        assert_eq!(water.move_offset(), before);
    }

    #[test]
    fn test_normal_map_points_up() {
        let pixels = normal_pixels(32, 3);
        assert_eq!(pixels.len(), 32 * 32 * 4);
        assert!(pixels.chunks(4).all(|p| p[2] > 128));
    }

    #[test]
    fn test_dudv_is_deterministic() {
        assert_eq!(dudv_pixels(16, 5), dudv_pixels(16, 5));
        assert_ne!(dudv_pixels(16, 5), dudv_pixels(16, 6));
    }
}
