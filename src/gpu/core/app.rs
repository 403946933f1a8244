// ============================================
// App - Главный обработчик приложения
// ============================================

use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::gpu::core::config::{SCENE_CONFIG_PATH, WINDOW_HEIGHT, WINDOW_TITLE, WINDOW_WIDTH};
use crate::gpu::core::{GameResources, SceneConfig};
use crate::gpu::systems::{
    InitSystem, InputAction, InputSystem, InteractionSystem, RenderSystem, UpdateSystem,
};

/// Главное приложение
pub struct App {
    resources: GameResources,
}

impl App {
    pub fn new(resources: GameResources) -> Self {
        Self { resources }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.resources.window.is_none() {
            let window_attrs = Window::default_attributes()
                .with_title(WINDOW_TITLE)
                .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

            let window = match event_loop.create_window(window_attrs) {
                Ok(window) => Arc::new(window),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            if let Err(e) = InitSystem::init_rendering(&mut self.resources, window) {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = &mut self.resources.renderer {
                    renderer.resize(physical_size);
                    self.resources.camera.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    ..
                },
                ..
            } => {
                if let Some(action) = InputSystem::process_keyboard(&mut self.resources, keycode, state) {
                    match action {
                        InputAction::CycleMode => InteractionSystem::cycle_mode(&mut self.resources),
                        InputAction::Exit => event_loop.exit(),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = (now - self.resources.last_frame).as_secs_f32();
                self.resources.last_frame = now;

                // Update
                UpdateSystem::update(&mut self.resources, dt);

                // Render
                RenderSystem::render(&mut self.resources, dt, event_loop);

                if let Some(window) = &self.resources.window {
                    window.request_redraw();
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let pressed = state == ElementState::Pressed;
                match button {
                    MouseButton::Left if pressed => InteractionSystem::handle_click(&mut self.resources),
                    MouseButton::Right => self.resources.mouse_look = pressed,
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.resources.cursor_pos = Some((position.x, position.y));
            }

            WindowEvent::CursorLeft { .. } => {
                self.resources.cursor_pos = None;
            }

            WindowEvent::MouseWheel { delta, .. } => {
                InputSystem::process_mouse_wheel(&mut self.resources, delta);
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            InputSystem::process_mouse_motion(&mut self.resources, delta);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.resources.window {
            window.request_redraw();
        }
    }
}

/// Запуск приложения
pub fn run() {
    env_logger::init();

    println!("=== Controls ===");
    println!("WASD / arrows - Move");
    println!("RMB + mouse - Look around");
    println!("Mouse wheel - Move along view");
    println!("+/- - Zoom");
    println!("Tab - Switch mode (wandering / selecting / placing)");
    println!("LMB - Select object / place selected object");
    println!("Escape - Quit");
    println!("================");

    let config = SceneConfig::load_or_default(SCENE_CONFIG_PATH);
    let resources = match InitSystem::create_resources(config) {
        Ok(resources) => resources,
        Err(e) => {
            log::error!("Failed to build terrain: {}", e);
            return;
        }
    };

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            log::error!("Failed to create event loop: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(resources);
    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }
}
