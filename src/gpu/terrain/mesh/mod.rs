pub mod vertex;
pub mod builder;

pub use vertex::MeshVertex;
pub use builder::{TerrainMesh, TerrainMeshBuilder, grid_indices};
