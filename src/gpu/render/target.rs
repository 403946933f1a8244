// ============================================
// Offscreen Target - Цвет + глубина вне экрана
// ============================================
// Создаётся один раз, пересоздаётся только при смене
// размера окна.

use super::depth::create_depth_texture;

pub struct OffscreenTarget {
    label: &'static str,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
    width: u32,
    height: u32,
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth: wgpu::Texture,
    pub depth_view: wgpu::TextureView,
}

impl OffscreenTarget {
    pub fn new(
        device: &wgpu::Device,
        label: &'static str,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
        width: u32,
        height: u32,
    ) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let (color, color_view) = create_color_texture(device, label, format, usage, width, height);
        let (depth, depth_view) = create_depth_texture(device, width, height, label);
        Self {
            label,
            format,
            usage,
            width,
            height,
            color,
            color_view,
            depth,
            depth_view,
        }
    }

    /// Возвращает true, если текстуры пересозданы
    pub fn ensure_size(&mut self, device: &wgpu::Device, width: u32, height: u32) -> bool {
        if !needs_resize((self.width, self.height), (width, height)) {
            return false;
        }
        *self = Self::new(device, self.label, self.format, self.usage, width, height);
        log::debug!("{} target resized to {}x{}", self.label, self.width, self.height);
        true
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn create_color_texture(
    device: &wgpu::Device,
    label: &str,
    format: wgpu::TextureFormat,
    usage: wgpu::TextureUsages,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Нулевой размер (свёрнутое окно) не пересоздаёт цели
pub fn needs_resize(current: (u32, u32), requested: (u32, u32)) -> bool {
    requested.0 > 0 && requested.1 > 0 && current != requested
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_only_on_change() {
        assert!(!needs_resize((800, 600), (800, 600)));
        assert!(needs_resize((800, 600), (1024, 600)));
        assert!(!needs_resize((800, 600), (0, 600)));
    }

    #[test]
    fn test_target_keeps_size_until_resize() {
        let Some((device, _queue)) = crate::gpu::test_support::create_device_queue() else {
            eprintln!("Skipping test_target_keeps_size_until_resize (no GPU)");
            return;
        };
        let mut target = OffscreenTarget::new(
            &device,
            "Test Target",
            wgpu::TextureFormat::Rgba8Unorm,
            wgpu::TextureUsages::TEXTURE_BINDING,
            64,
            32,
        );
        assert!(!target.ensure_size(&device, 64, 32));
        assert!(target.ensure_size(&device, 128, 32));
        assert_eq!(target.size(), (128, 32));
        assert_eq!(target.color.width(), 128);
    }
}
