// ============================================
// Render System - Система рендеринга
// ============================================

use winit::event_loop::ActiveEventLoop;

use crate::gpu::core::GameResources;
use crate::gpu::render::FrameContext;

/// Система рендеринга
pub struct RenderSystem;

impl RenderSystem {
    pub fn render(resources: &mut GameResources, dt: f32, event_loop: &ActiveEventLoop) {
        let Some(renderer) = &mut resources.renderer else { return };
        let window_size = match &resources.window {
            Some(window) => {
                let size = window.inner_size();
                (size.width, size.height)
            }
            None => return,
        };

        let mut ctx = FrameContext {
            camera: &mut resources.camera,
            cursor: resources.cursor_pos,
            window_size,
            delta_time: dt,
            picking_active: resources.mode.picking_active(),
            objects: &resources.objects,
            selected: resources.selected,
        };

        match renderer.render(&mut ctx) {
            Ok(frame) => {
                if resources.mode.picking_active() {
                    resources.hovered = frame.hovered;
                }
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
