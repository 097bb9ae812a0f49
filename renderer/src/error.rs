//! Renderer error types.
//!
//! Only construction paths return errors. Once a renderer exists, failures
//! are reported through the log and the context's assert handler, and
//! resource factories return `None`.

use thiserror::Error;

/// Errors that can occur while bringing up a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    /// The requested backend is not compiled in or not known.
    #[error("unknown renderer backend: {0}")]
    UnknownBackend(String),
    /// A native library could not be loaded.
    #[error("failed to load native library: {0}")]
    LibraryLoadFailed(String),
    /// A required native entry point is missing.
    #[error("missing native entry point: {0}")]
    MissingEntryPoint(String),
    /// The native context could not be created.
    #[error("context creation failed: {0}")]
    ContextCreationFailed(String),
    /// The device does not meet the minimum requirements.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RendererError::MissingEntryPoint("glDrawArraysInstanced".to_string());
        assert_eq!(error.to_string(), "missing native entry point: glDrawArraysInstanced");

        let error = RendererError::UnknownBackend("Vulkan".to_string());
        assert_eq!(error.to_string(), "unknown renderer backend: Vulkan");
    }
}
