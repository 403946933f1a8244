// ============================================
// Picking Buffer - ID объектов в цвете + чтение пикселя
// ============================================
// r = ID объекта, g = ID вызова отрисовки, b = ID примитива
// (0, если устройство не даёт SHADER_PRIMITIVE_INDEX).
// Чтение одного пикселя - единственная точка блокировки кадра.

use std::sync::mpsc;

use crate::gpu::objects::PickId;
use super::target::OffscreenTarget;

pub const PICK_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
const TEXEL_BYTES: u32 = 16;

/// Раскодированный пиксель буфера пикинга
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelInfo {
    pub object_id: u32,
    pub draw_id: u32,
    pub primitive_id: u32,
}

impl PixelInfo {
    pub fn from_texel(texel: [f32; 4]) -> Self {
        let decode = |v: f32| if v.is_finite() && v > 0.0 { v.round() as u32 } else { 0 };
        Self {
            object_id: decode(texel[0]),
            draw_id: decode(texel[1]),
            primitive_id: decode(texel[2]),
        }
    }

    /// 0 = под курсором ничего нет
    pub fn pick_id(&self) -> Option<PickId> {
        PickId::new(self.object_id)
    }
}

/// Пиксель окна -> пиксель буфера. Масштаб по отношению размеров,
/// ось Y не переворачивается (у текстур wgpu начало сверху слева).
pub fn framebuffer_pixel(cursor: (f64, f64), window: (u32, u32), framebuffer: (u32, u32)) -> Option<(u32, u32)> {
    if window.0 == 0 || window.1 == 0 || framebuffer.0 == 0 || framebuffer.1 == 0 {
        return None;
    }
    let x = (cursor.0 * framebuffer.0 as f64 / window.0 as f64).floor();
    let y = (cursor.1 * framebuffer.1 as f64 / window.1 as f64).floor();
    if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
        return None;
    }
    let (x, y) = (x as u32, y as u32);
    (x < framebuffer.0 && y < framebuffer.1).then_some((x, y))
}

pub struct PickingBuffer {
    pub target: OffscreenTarget,
    readback: wgpu::Buffer,
}

impl PickingBuffer {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let target = OffscreenTarget::new(
            device,
            "Picking",
            PICK_FORMAT,
            wgpu::TextureUsages::COPY_SRC,
            width,
            height,
        );
        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Picking Readback"),
            size: wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { target, readback }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.target.ensure_size(device, width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.target.size()
    }

    /// Копирует один тексель в буфер чтения
    pub fn copy_pixel(&self, encoder: &mut wgpu::CommandEncoder, pixel: (u32, u32)) {
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target.color,
                mip_level: 0,
                origin: wgpu::Origin3d { x: pixel.0, y: pixel.1, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Ждёт GPU и декодирует скопированный тексель.
    /// Вызывать после submit энкодера с copy_pixel.
    pub fn read_pixel(&self, device: &wgpu::Device) -> Option<PixelInfo> {
        let slice = self.readback.slice(..TEXEL_BYTES as u64);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        if let Err(e) = device.poll(wgpu::PollType::Wait) {
            log::error!("Picking poll failed: {:?}", e);
        }

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                log::error!("Picking readback failed: {:?}", e);
                return None;
            }
            Err(_) => return None,
        }

        let info = {
            let data = slice.get_mapped_range();
            let texel: [f32; 4] = bytemuck::pod_read_unaligned(&data[..TEXEL_BYTES as usize]);
            PixelInfo::from_texel(texel)
        };
        self.readback.unmap();

        log::debug!("Picked {:?}", info);
        Some(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_means_nothing() {
        let info = PixelInfo::from_texel([0.0, 0.0, 0.0, 1.0]);
        assert_eq!(info, PixelInfo::default());
        assert!(info.pick_id().is_none());
    }

    #[test]
    fn test_decode_ids() {
        let info = PixelInfo::from_texel([7.0, 3.0, 0.0, 1.0]);
        assert_eq!(info.pick_id().map(PickId::get), Some(7));
        assert_eq!(info.draw_id, 3);
        assert_eq!(PixelInfo::from_texel([7.0, 3.0, 9.0, 1.0]).primitive_id, 9);
        assert_eq!(PixelInfo::from_texel([f32::NAN, -2.0, 0.0, 0.0]).object_id, 0);
    }

    #[test]
    fn test_cursor_maps_without_flip() {
        assert_eq!(framebuffer_pixel((0.0, 0.0), (800, 600), (800, 600)), Some((0, 0)));
        assert_eq!(framebuffer_pixel((10.5, 20.9), (800, 600), (800, 600)), Some((10, 20)));
        // HiDPI: буфер в два раза больше окна
        assert_eq!(framebuffer_pixel((100.0, 50.0), (800, 600), (1600, 1200)), Some((200, 100)));
    }

    #[test]
    fn test_cursor_outside_is_rejected() {
        assert_eq!(framebuffer_pixel((-1.0, 10.0), (800, 600), (800, 600)), None);
        assert_eq!(framebuffer_pixel((800.0, 10.0), (800, 600), (800, 600)), None);
        assert_eq!(framebuffer_pixel((10.0, 600.0), (800, 600), (800, 600)), None);
        assert_eq!(framebuffer_pixel((10.0, 10.0), (0, 600), (800, 600)), None);
    }
}
