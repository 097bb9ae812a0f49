//! Value types and descriptors used throughout the renderer.
//!
//! This module contains plain-data types that describe resources and fixed
//! function state. They carry no backend objects and can be freely copied,
//! stored and compared.

mod buffer;
mod common;
mod root_signature;
mod sampler;
mod state;
mod texture;
mod vertex;

pub use buffer::{
    BufferUsage, DrawArguments, DrawIndexedArguments, IndexBufferFormat, IndirectBufferFlags,
};
pub use common::{
    ClearFlags, MapType, MappedSubresource, PrimitiveTopology, ScissorRectangle, Viewport,
};
pub use root_signature::{
    DescriptorRange, DescriptorRangeType, RootParameter, RootSignatureDescriptor,
    ShaderVisibility, TEXTURE_BUFFER_EMULATION_MARKER,
};
pub use sampler::{ComparisonFunc, FilterMode, SamplerStateDescriptor, TextureAddressMode};
pub use state::{
    Blend, BlendOp, BlendState, CullMode, DepthStencilState, FillMode, RasterizerState,
    RenderTargetBlendState,
};
pub use texture::{
    TextureDescriptor, TextureFlags, TextureFormat, TextureUsage, mipmap_size, number_of_mipmaps,
};
pub use vertex::{VertexAttribute, VertexAttributeFormat};
