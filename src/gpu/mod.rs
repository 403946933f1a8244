// ============================================
// GPU Module - Террейн у озера с отражениями
// ============================================
// Карта высот + многопроходный рендер воды (отражение, преломление,
// тени, пикинг объектов). Разделено на модули по ECS-принципам.

pub mod terrain;
pub mod camera;
pub mod objects;
pub mod render;

pub mod core;
pub mod systems;

#[cfg(test)]
mod test_support;

pub use core::app::run;
