//! Renderer resources.
//!
//! Resources are created by a renderer's factories and are reference-counted
//! with [`Arc`]. Every resource carries a [`ResourceHeader`] naming the
//! renderer that created it; renderers ignore resources that belong to a
//! different renderer.
//!
//! The closed sum type [`Resource`] has one variant per [`ResourceType`]. The
//! [`Texture`] family and [`RenderTarget`] are narrower sum types used where
//! only those resources are accepted.
//!
//! [`Arc`]: std::sync::Arc

mod buffer;
mod pipeline;
mod render_target;
mod root_signature;
mod sampler;
mod shader;
mod texture;
mod vertex_array;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::statistics::Statistics;

pub use buffer::{
    BufferManager, IndexBuffer, IndirectBuffer, TextureBuffer, UniformBuffer, VertexBuffer,
};
pub use pipeline::{ComputePipelineState, GraphicsPipelineState, GraphicsPipelineStateDescriptor};
pub use render_target::{
    Framebuffer, FramebufferAttachment, RenderPass, RenderTarget, RenderWindow, SwapChain,
    SwapChainWindow,
};
pub use root_signature::{ResourceGroup, RootSignature};
pub use sampler::SamplerState;
pub use shader::{
    ComputeShader, FragmentShader, GeometryShader, Program, ProgramShaders, ShaderLanguage,
    TessellationControlShader, TessellationEvaluationShader, VertexShader,
};
pub use texture::{
    Texture, Texture1D, Texture2D, Texture2DArray, Texture3D, TextureCube, TextureManager,
};
pub use vertex_array::VertexArray;

pub(crate) use buffer::validate_buffer_arguments;
pub(crate) use render_target::framebuffer_size;
pub(crate) use texture::validate_texture_arguments;
pub(crate) use vertex_array::validate_vertex_array_arguments;

// ============================================================================
// Renderer Identity
// ============================================================================

/// Unique identity of a renderer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(u64);

impl RendererId {
    /// Allocate a new, never reused identity.
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identity value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Data common to every resource.
///
/// Creating a header counts the resource in the renderer statistics, dropping
/// it removes the resource from them again.
pub struct ResourceHeader {
    renderer_id: RendererId,
    resource_type: ResourceType,
    statistics: Arc<Statistics>,
}

impl ResourceHeader {
    pub(crate) fn new(
        renderer_id: RendererId,
        resource_type: ResourceType,
        statistics: Arc<Statistics>,
    ) -> Self {
        statistics.resource_created(resource_type);
        Self {
            renderer_id,
            resource_type,
            statistics,
        }
    }

    /// The renderer that created the resource.
    pub fn renderer_id(&self) -> RendererId {
        self.renderer_id
    }

    /// The resource type.
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }
}

impl Drop for ResourceHeader {
    fn drop(&mut self) {
        self.statistics.resource_destroyed(self.resource_type);
    }
}

impl std::fmt::Debug for ResourceHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHeader")
            .field("renderer_id", &self.renderer_id)
            .field("resource_type", &self.resource_type)
            .finish()
    }
}

/// Access to the header of a resource.
pub trait RendererResource {
    /// The resource header.
    fn header(&self) -> &ResourceHeader;

    /// The renderer that created the resource.
    fn renderer_id(&self) -> RendererId {
        self.header().renderer_id()
    }

    /// The resource type.
    fn resource_type(&self) -> ResourceType {
        self.header().resource_type()
    }
}

// ============================================================================
// Resource Sum Types
// ============================================================================

macro_rules! define_resources {
    ($($(#[$doc:meta])* $name:ident,)+) => {
        /// Type of a renderer resource.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum ResourceType {
            $($(#[$doc])* $name,)+
        }

        impl ResourceType {
            /// Every resource type, in declaration order.
            pub const ALL: &'static [ResourceType] = &[$(ResourceType::$name,)+];
            /// Number of resource types.
            pub const COUNT: usize = Self::ALL.len();
        }

        /// A shared reference to any renderer resource.
        #[derive(Debug, Clone)]
        pub enum Resource {
            $($(#[$doc])* $name(Arc<$name>),)+
        }

        /// A non-owning reference to any renderer resource.
        #[derive(Debug, Clone)]
        pub enum WeakResource {
            $($(#[$doc])* $name(Weak<$name>),)+
        }

        impl Resource {
            /// The resource type.
            pub fn resource_type(&self) -> ResourceType {
                match self {
                    $(Self::$name(_) => ResourceType::$name,)+
                }
            }

            /// The resource header.
            pub fn header(&self) -> &ResourceHeader {
                match self {
                    $(Self::$name(resource) => &resource.header,)+
                }
            }

            /// Create a non-owning reference.
            pub fn downgrade(&self) -> WeakResource {
                match self {
                    $(Self::$name(resource) => WeakResource::$name(Arc::downgrade(resource)),)+
                }
            }

            /// Whether both references point to the same resource.
            pub fn ptr_eq(&self, other: &Resource) -> bool {
                match (self, other) {
                    $((Self::$name(a), Self::$name(b)) => Arc::ptr_eq(a, b),)+
                    _ => false,
                }
            }
        }

        impl WeakResource {
            /// Get a shared reference if the resource is still alive.
            pub fn upgrade(&self) -> Option<Resource> {
                match self {
                    $(Self::$name(resource) => resource.upgrade().map(Resource::$name),)+
                }
            }
        }

        $(
            impl From<Arc<$name>> for Resource {
                fn from(resource: Arc<$name>) -> Self {
                    Self::$name(resource)
                }
            }

            impl TryFrom<Resource> for Arc<$name> {
                type Error = Resource;

                fn try_from(resource: Resource) -> Result<Self, Self::Error> {
                    match resource {
                        Resource::$name(resource) => Ok(resource),
                        other => Err(other),
                    }
                }
            }

            impl RendererResource for $name {
                fn header(&self) -> &ResourceHeader {
                    &self.header
                }
            }
        )+
    };
}

define_resources! {
    /// Root signature.
    RootSignature,
    /// Resource group.
    ResourceGroup,
    /// Linked shader program.
    Program,
    /// Vertex array object.
    VertexArray,
    /// Render pass.
    RenderPass,
    /// Swap chain.
    SwapChain,
    /// Framebuffer.
    Framebuffer,
    /// Index buffer.
    IndexBuffer,
    /// Vertex buffer.
    VertexBuffer,
    /// Uniform buffer.
    UniformBuffer,
    /// Texture buffer.
    TextureBuffer,
    /// Indirect buffer.
    IndirectBuffer,
    /// 1D texture.
    Texture1D,
    /// 2D texture.
    Texture2D,
    /// 2D array texture.
    Texture2DArray,
    /// 3D texture.
    Texture3D,
    /// Cube texture.
    TextureCube,
    /// Graphics pipeline state.
    GraphicsPipelineState,
    /// Compute pipeline state.
    ComputePipelineState,
    /// Sampler state.
    SamplerState,
    /// Vertex shader.
    VertexShader,
    /// Tessellation control shader.
    TessellationControlShader,
    /// Tessellation evaluation shader.
    TessellationEvaluationShader,
    /// Geometry shader.
    GeometryShader,
    /// Fragment shader.
    FragmentShader,
    /// Compute shader.
    ComputeShader,
}

impl ResourceType {
    /// Whether this is one of the texture types.
    pub fn is_texture(&self) -> bool {
        matches!(
            self,
            Self::Texture1D
                | Self::Texture2D
                | Self::Texture2DArray
                | Self::Texture3D
                | Self::TextureCube
        )
    }
}

impl Resource {
    /// Narrow to the texture family.
    pub fn as_texture(&self) -> Option<Texture> {
        match self {
            Self::Texture1D(texture) => Some(Texture::Texture1D(texture.clone())),
            Self::Texture2D(texture) => Some(Texture::Texture2D(texture.clone())),
            Self::Texture2DArray(texture) => Some(Texture::Texture2DArray(texture.clone())),
            Self::Texture3D(texture) => Some(Texture::Texture3D(texture.clone())),
            Self::TextureCube(texture) => Some(Texture::TextureCube(texture.clone())),
            _ => None,
        }
    }

    /// Narrow to a render target.
    pub fn as_render_target(&self) -> Option<RenderTarget> {
        match self {
            Self::SwapChain(swap_chain) => Some(RenderTarget::SwapChain(swap_chain.clone())),
            Self::Framebuffer(framebuffer) => Some(RenderTarget::Framebuffer(framebuffer.clone())),
            _ => None,
        }
    }
}

impl From<Texture> for Resource {
    fn from(texture: Texture) -> Self {
        match texture {
            Texture::Texture1D(texture) => Self::Texture1D(texture),
            Texture::Texture2D(texture) => Self::Texture2D(texture),
            Texture::Texture2DArray(texture) => Self::Texture2DArray(texture),
            Texture::Texture3D(texture) => Self::Texture3D(texture),
            Texture::TextureCube(texture) => Self::TextureCube(texture),
        }
    }
}

impl From<RenderTarget> for Resource {
    fn from(render_target: RenderTarget) -> Self {
        match render_target {
            RenderTarget::SwapChain(swap_chain) => Self::SwapChain(swap_chain),
            RenderTarget::Framebuffer(framebuffer) => Self::Framebuffer(framebuffer),
        }
    }
}

// Resources are shared between threads
static_assertions::assert_impl_all!(Resource: Send, Sync);
static_assertions::assert_impl_all!(WeakResource: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_count() {
        assert_eq!(ResourceType::COUNT, 26);
        assert_eq!(ResourceType::ALL[ResourceType::Texture2D as usize], ResourceType::Texture2D);
    }

    #[test]
    fn test_renderer_ids_are_unique() {
        let first = RendererId::next();
        let second = RendererId::next();
        assert_ne!(first, second);
    }

    #[test]
    fn test_header_counts_statistics() {
        let statistics = Arc::new(Statistics::new());
        let header = ResourceHeader::new(
            RendererId::next(),
            ResourceType::SamplerState,
            statistics.clone(),
        );
        assert_eq!(statistics.number_of_resources(ResourceType::SamplerState), 1);
        drop(header);
        assert_eq!(statistics.number_of_resources(ResourceType::SamplerState), 0);
    }
}
