pub mod core;
pub mod compositor;
mod culling;
mod passes;

use std::sync::Arc;

use crate::gpu::core::SceneConfig;
use crate::gpu::terrain::TerrainScene;

use self::core::{RendererState, RenderInitError};
use compositor::{FrameContext, FrameOutput, SceneCompositor};

pub struct Renderer {
    state: RendererState,
    compositor: SceneCompositor,
}

impl Renderer {
    pub async fn new(
        window: Arc<winit::window::Window>,
        terrain: &TerrainScene,
        config: &SceneConfig,
    ) -> Result<Self, RenderInitError> {
        let (surface, device, queue, surface_config, size) = self::core::init_gpu(window).await?;
        let compositor = SceneCompositor::new(
            &device,
            &queue,
            surface_config.format,
            (surface_config.width, surface_config.height),
            terrain,
            config,
        );

        Ok(Self {
            state: RendererState {
                surface,
                device,
                queue,
                config: surface_config,
                size,
            },
            compositor,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.state.size = new_size;
            self.state.config.width = new_size.width;
            self.state.config.height = new_size.height;
            self.state.surface.configure(&self.state.device, &self.state.config);
            self.compositor.resize(&self.state.device, new_size.width, new_size.height);
        }
    }

    /// Рендерит кадр и показывает его
    pub fn render(&mut self, ctx: &mut FrameContext) -> Result<FrameOutput, wgpu::SurfaceError> {
        let output = self.state.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let frame = self
            .compositor
            .render_frame(&self.state.device, &self.state.queue, &view, ctx);

        output.present();
        Ok(frame)
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.state.size
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.state.framebuffer_size()
    }
}
