//! # RedLilium Renderer
//!
//! Cross-API rendering abstraction with recorded command buffers.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Renderer`] - Trait implemented by every backend, with a dispatch table
//!   decoding recorded commands
//! - [`CommandBuffer`] - Append-only recording of plain-old-data commands
//! - [`resources`] - Reference counted GPU resources tagged with their renderer
//! - Backends: OpenGL ES 3 (feature `gles3-backend`) and Null (always available)
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_renderer::{command::ClearGraphics, create_renderer, ClearFlags, CommandBuffer, Context, Renderer};
//!
//! let mut renderer = create_renderer(None, Context::new())?;
//! let mut command_buffer = CommandBuffer::new();
//! ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR, [0.0, 0.0, 0.0, 1.0], 1.0, 0);
//!
//! if renderer.begin_scene() {
//!     renderer.submit_command_buffer(&command_buffer);
//!     renderer.end_scene();
//! }
//! ```

pub mod backend;
pub mod capabilities;
pub mod command;
pub mod context;
pub mod error;
mod instance;
pub mod renderer;
pub mod resources;
pub mod statistics;
pub mod types;

pub use backend::null::NullRenderer;
#[cfg(feature = "gles3-backend")]
pub use backend::gles3::{Gles3Config, Gles3Renderer};
pub use capabilities::Capabilities;
pub use command::{CommandBuffer, CommandDispatchFunctionIndex};
pub use context::{AssertHandler, Context, DefaultAssertHandler, NativeWindow};
pub use error::RendererError;
pub use instance::{create_renderer, RendererInstance};
pub use renderer::{Renderer, RendererCore};
pub use resources::{Resource, ResourceType};
pub use statistics::Statistics;
pub use types::*;

/// Renderer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_null_renderer_is_always_available() {
        let renderer = create_renderer(Some("Null"), Context::new()).unwrap();
        assert_eq!(renderer.name(), backend::null::NAME);
    }
}
