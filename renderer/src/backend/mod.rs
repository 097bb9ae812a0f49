//! Renderer backends.
//!
//! # Available Backends
//!
//! - `null` (always available): accepts every call without a native API
//! - `gles3-backend` (default): OpenGL ES 3 through EGL
//!
//! # Architecture
//!
//! Each backend implements the [`Renderer`](crate::Renderer) trait and defines
//! its dispatch table as an associated constant. Backend objects living inside
//! the shared resource types are stored in the `Native*` handle enums below,
//! one variant per compiled-in backend.

pub mod null;

#[cfg(feature = "gles3-backend")]
pub mod gles3;

macro_rules! native_handle {
    ($(#[$doc:meta])* $name:ident => $gles3:ty) => {
        $(#[$doc])*
        pub enum $name {
            /// Null backend, no native object.
            Null,
            /// OpenGL ES 3 backend object.
            #[cfg(feature = "gles3-backend")]
            Gles3($gles3),
        }

        impl $name {
            /// The OpenGL ES 3 object, if this handle belongs to that backend.
            #[cfg(feature = "gles3-backend")]
            #[allow(unreachable_patterns)]
            pub fn gles3(&self) -> Option<&$gles3> {
                match self {
                    Self::Gles3(native) => Some(native),
                    _ => None,
                }
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    Self::Null => write!(f, concat!(stringify!($name), "::Null")),
                    #[cfg(feature = "gles3-backend")]
                    Self::Gles3(native) => f
                        .debug_tuple(concat!(stringify!($name), "::Gles3"))
                        .field(native)
                        .finish(),
                }
            }
        }
    };
}

native_handle! {
    /// Handle to a native vertex, index or uniform buffer.
    NativeBuffer => gles3::GlObject
}

native_handle! {
    /// Handle to a native texture buffer.
    NativeTextureBuffer => gles3::GlTextureBuffer
}

native_handle! {
    /// Handle to a native texture.
    NativeTexture => gles3::GlTexture
}

native_handle! {
    /// Handle to a native sampler.
    NativeSampler => gles3::GlObject
}

native_handle! {
    /// Handle to a native vertex array.
    NativeVertexArray => gles3::GlObject
}

native_handle! {
    /// Handle to a native shader.
    NativeShader => gles3::GlObject
}

native_handle! {
    /// Handle to a native linked program.
    NativeProgram => gles3::GlProgram
}

native_handle! {
    /// Handle to a native framebuffer.
    NativeFramebuffer => gles3::GlObject
}

native_handle! {
    /// Handle to a native presentation surface.
    NativeSwapChain => gles3::GlSwapChain
}

native_handle! {
    /// Pre-translated native pipeline state.
    NativePipelineState => gles3::GlPipelineState
}
