use ultraviolet::{Mat4, Vec3, Vec4};

use super::depth::DEPTH_FORMAT;

/// Одна карта теней фиксированного разрешения (не зависит от окна)
pub struct ShadowMap {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    /// group 2 для террейна и объектов
    pub bind_group: wgpu::BindGroup,
    pub resolution: u32,
    pub extent: f32,
    pub light_dir: Vec3,
}

impl ShadowMap {
    pub fn new(
        device: &wgpu::Device,
        shadow_layout: &wgpu::BindGroupLayout,
        resolution: u32,
        extent: f32,
        light_dir: Vec3,
    ) -> Self {
        let resolution = resolution.clamp(1, device.limits().max_texture_dimension_2d);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Shadow Map"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = create_comparison_sampler(device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow BG"),
            layout: shadow_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        log::info!("Shadow map @ {}x{}, extent ±{}", resolution, resolution, extent);

        Self {
            texture,
            view,
            sampler,
            bind_group,
            resolution,
            extent,
            light_dir: light_dir.normalized(),
        }
    }

    /// Матрица света вокруг точки фокуса (точка земли под камерой)
    pub fn light_matrix(&self, focus: Vec3) -> Mat4 {
        light_view_projection(focus, self.light_dir, self.extent, self.resolution)
    }
}

pub fn create_comparison_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("Shadow Sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        compare: Some(wgpu::CompareFunction::LessEqual),
        ..Default::default()
    })
}

/// Ортографическая проекция света с фиксированными границами ±extent.
/// Глаз смещён от фокуса против направления света.
pub fn light_view_projection(focus: Vec3, light_dir: Vec3, extent: f32, resolution: u32) -> Mat4 {
    let light_dir = light_dir.normalized();
    let up = if light_dir.y.abs() > 0.99 {
        Vec3::new(0.0, 0.0, 1.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };

    let eye = focus - light_dir * extent * 2.0;
    let light_view = Mat4::look_at(eye, focus, up);

    let near = 1.0;
    let far = extent * 4.0;
    let light_proj = ultraviolet::projection::orthographic_wgpu_dx(-extent, extent, -extent, extent, near, far);

    let mut light_vp = light_proj * light_view;

    // === СТАБИЛИЗАЦИЯ ===
    // Сдвиг мира кратен текселю, тени не дрожат при движении камеры
    let texel_size_ndc = 2.0 / resolution.max(1) as f32;
    let shadow_origin = light_vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
    light_vp.cols[3].x -= shadow_origin.x % texel_size_ndc;
    light_vp.cols[3].y -= shadow_origin.y % texel_size_ndc;

    light_vp
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(m: Mat4, p: Vec3) -> Vec4 {
        let clip = m * Vec4::new(p.x, p.y, p.z, 1.0);
        clip / clip.w
    }

    #[test]
    fn test_focus_lands_in_center() {
        let focus = Vec3::new(37.0, 2.0, -11.0);
        let m = light_view_projection(focus, Vec3::new(0.3, -0.7, 1.0), 60.0, 4096);
        let ndc = project(m, focus);
        let texel = 2.0 / 4096.0;
        assert!(ndc.x.abs() <= texel && ndc.y.abs() <= texel, "{:?}", ndc);
        // глубина внутри [0, 1]
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_extent_is_fixed_world_size() {
        let focus = Vec3::zero();
        let m = light_view_projection(focus, Vec3::new(0.0, -1.0, 0.0), 50.0, 2048);
        // свет сверху: x мира идёт в x карты
        let edge = project(m, Vec3::new(50.0, 0.0, 0.0));
        assert!((edge.x.abs() - 1.0).abs() < 2e-3, "{:?}", edge);
    }

    #[test]
    fn test_closer_to_light_has_smaller_depth() {
        let m = light_view_projection(Vec3::zero(), Vec3::new(0.0, -1.0, 0.0), 60.0, 1024);
        let high = project(m, Vec3::new(0.0, 10.0, 0.0));
        let low = project(m, Vec3::new(0.0, -10.0, 0.0));
        assert!(high.z < low.z);
    }
}
