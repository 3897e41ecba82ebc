/// File utilities
pub mod files;

/// Renderer Utilities
pub mod renderer;

pub use renderer::Renderer;
