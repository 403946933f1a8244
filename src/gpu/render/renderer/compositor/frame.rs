use crate::gpu::camera::Camera;
use crate::gpu::objects::SceneObject;
use crate::gpu::render::picking::PixelInfo;

/// Всё, что кадр получает снаружи. Передаётся по ссылке, глобального
/// состояния нет; камеру композитор временно двигает и возвращает.
pub struct FrameContext<'a> {
    pub camera: &'a mut Camera,
    /// Курсор в пикселях окна; None, если курсор вне окна
    pub cursor: Option<(f64, f64)>,
    pub window_size: (u32, u32),
    pub delta_time: f32,
    pub picking_active: bool,
    pub objects: &'a [SceneObject],
    pub selected: Option<usize>,
}

/// Результат кадра
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutput {
    /// Сырой пиксель пикинга (только в кадрах с пикингом)
    pub pixel: Option<PixelInfo>,
    /// Индекс объекта под курсором
    pub hovered: Option<usize>,
}
