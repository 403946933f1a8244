// ============================================
// Input System - Обработка ввода
// ============================================

use winit::{event::ElementState, keyboard::KeyCode};

use crate::gpu::core::{GameResources, MovementKeys};

/// Шаг зума клавишами +/-, градусы FOV
const ZOOM_STEP: f32 = 2.0;
/// Шаг колеса мыши вдоль взгляда
const SCROLL_STEP: f32 = 1.0;

/// Система обработки клавиатуры и мыши
pub struct InputSystem;

impl InputSystem {
    /// Обработка клавиатурного ввода
    pub fn process_keyboard(
        resources: &mut GameResources,
        keycode: KeyCode,
        state: ElementState,
    ) -> Option<InputAction> {
        let pressed = state == ElementState::Pressed;

        match keycode {
            KeyCode::Escape if pressed => Some(InputAction::Exit),
            KeyCode::Tab if pressed => Some(InputAction::CycleMode),

            KeyCode::Equal | KeyCode::NumpadAdd if pressed => {
                resources.camera.process_scroll_zoom(ZOOM_STEP);
                None
            }
            KeyCode::Minus | KeyCode::NumpadSubtract if pressed => {
                resources.camera.process_scroll_zoom(-ZOOM_STEP);
                None
            }

            _ => {
                Self::set_movement_key(&mut resources.keys, keycode, pressed);
                None
            }
        }
    }

    /// WASD и стрелки
    pub fn set_movement_key(keys: &mut MovementKeys, keycode: KeyCode, pressed: bool) {
        match keycode {
            KeyCode::KeyW | KeyCode::ArrowUp => keys.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => keys.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => keys.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => keys.right = pressed,
            _ => {}
        }
    }

    /// Обработка движения мыши (только с зажатой правой кнопкой)
    pub fn process_mouse_motion(resources: &mut GameResources, delta: (f64, f64)) {
        if resources.mouse_look {
            // Экранный Y растёт вниз
            resources
                .camera
                .process_mouse_movement(delta.0 as f32, -delta.1 as f32);
        }
    }

    /// Колесо двигает камеру вдоль взгляда
    pub fn process_mouse_wheel(resources: &mut GameResources, delta: winit::event::MouseScrollDelta) {
        let scroll = match delta {
            winit::event::MouseScrollDelta::LineDelta(_, y) => y,
            winit::event::MouseScrollDelta::PixelDelta(pos) => (pos.y / 100.0) as f32,
        };

        if scroll != 0.0 {
            let position = resources.camera.position;
            let ground = resources.terrain.terrain_height(position.x, position.z);
            resources.camera.process_scroll_height(scroll * SCROLL_STEP, ground);
        }
    }
}

/// Действия, которые могут быть вызваны вводом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    CycleMode,
    Exit,
}
