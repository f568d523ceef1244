//! Explicit render context threaded through the painter and batcher.

use crate::backend::GpuBackend;
use crate::shaders::{ShaderLoader, ShaderManager};

/// The GPU backend together with the program cache built on it.
pub struct RenderContext {
    pub backend: Box<dyn GpuBackend>,
    pub shaders: ShaderManager,
}

impl RenderContext {
    pub fn new(backend: Box<dyn GpuBackend>, loader: ShaderLoader) -> Self {
        Self {
            backend,
            shaders: ShaderManager::new(loader),
        }
    }
}
