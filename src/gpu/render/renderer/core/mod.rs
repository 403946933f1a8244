mod state;
mod init;

pub use state::RendererState;
pub use init::{init_gpu, optional_features, RenderInitError};
