mod chunk;
mod manager;

pub use chunk::GpuChunk;
pub use manager::GpuChunkManager;
