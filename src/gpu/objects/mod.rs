// ============================================
// Objects Module - Размещаемые и выбираемые объекты
// ============================================

mod object;
mod cube;
mod gpu;

pub use object::{PickId, PickTable, SceneObject};
pub use cube::cube_mesh;
pub use gpu::ObjectMesh;
