// Headless wgpu для тестов. Без адаптера тесты пропускаются.

use wgpu::{Device, DeviceDescriptor, Instance, InstanceDescriptor, Queue, RequestAdapterOptions};

pub fn create_device_queue() -> Option<(Device, Queue)> {
    let instance = Instance::new(&InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok()?;

    let desc = DeviceDescriptor {
        label: Some("lakeshore_test_device"),
        required_features: crate::gpu::render::renderer::core::optional_features(&adapter),
        required_limits: wgpu::Limits::downlevel_defaults(),
        memory_hints: Default::default(),
        trace: wgpu::Trace::Off,
    };

    pollster::block_on(adapter.request_device(&desc)).ok()
}
