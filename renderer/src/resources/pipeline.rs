//! Pipeline state resources.

use std::sync::Arc;

use crate::backend::NativePipelineState;
use crate::types::{
    BlendState, DepthStencilState, PrimitiveTopology, RasterizerState, VertexAttribute,
};

use super::{ComputeShader, Program, RenderPass, ResourceHeader, RootSignature};

/// Descriptor for creating a graphics pipeline state.
#[derive(Debug, Clone)]
pub struct GraphicsPipelineStateDescriptor {
    /// Binding layout.
    pub root_signature: Arc<RootSignature>,
    /// Linked program.
    pub program: Arc<Program>,
    /// Vertex attribute layout.
    pub vertex_attributes: Vec<VertexAttribute>,
    /// Render pass describing the target formats.
    pub render_pass: Arc<RenderPass>,
    /// Primitive topology.
    pub primitive_topology: PrimitiveTopology,
    /// Rasterizer state.
    pub rasterizer_state: RasterizerState,
    /// Depth stencil state.
    pub depth_stencil_state: DepthStencilState,
    /// Blend state.
    pub blend_state: BlendState,
}

impl GraphicsPipelineStateDescriptor {
    /// Create a descriptor with default fixed function state.
    pub fn new(
        root_signature: Arc<RootSignature>,
        program: Arc<Program>,
        vertex_attributes: Vec<VertexAttribute>,
        render_pass: Arc<RenderPass>,
    ) -> Self {
        Self {
            root_signature,
            program,
            vertex_attributes,
            render_pass,
            primitive_topology: PrimitiveTopology::TriangleList,
            rasterizer_state: RasterizerState::default(),
            depth_stencil_state: DepthStencilState::default(),
            blend_state: BlendState::default(),
        }
    }

    /// Set the primitive topology.
    pub fn with_primitive_topology(mut self, primitive_topology: PrimitiveTopology) -> Self {
        self.primitive_topology = primitive_topology;
        self
    }

    /// Set the rasterizer state.
    pub fn with_rasterizer_state(mut self, rasterizer_state: RasterizerState) -> Self {
        self.rasterizer_state = rasterizer_state;
        self
    }

    /// Set the depth stencil state.
    pub fn with_depth_stencil_state(mut self, depth_stencil_state: DepthStencilState) -> Self {
        self.depth_stencil_state = depth_stencil_state;
        self
    }

    /// Set the blend state.
    pub fn with_blend_state(mut self, blend_state: BlendState) -> Self {
        self.blend_state = blend_state;
        self
    }
}

/// An immutable graphics pipeline state.
///
/// Holds strong references to its root signature, program and render pass.
pub struct GraphicsPipelineState {
    pub(super) header: ResourceHeader,
    descriptor: GraphicsPipelineStateDescriptor,
    native: NativePipelineState,
}

impl GraphicsPipelineState {
    pub(crate) fn new(
        header: ResourceHeader,
        descriptor: GraphicsPipelineStateDescriptor,
        native: NativePipelineState,
    ) -> Self {
        Self {
            header,
            descriptor,
            native,
        }
    }

    /// Creation descriptor.
    pub fn descriptor(&self) -> &GraphicsPipelineStateDescriptor {
        &self.descriptor
    }

    /// Root signature.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.descriptor.root_signature
    }

    /// Program.
    pub fn program(&self) -> &Arc<Program> {
        &self.descriptor.program
    }

    /// Render pass.
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        &self.descriptor.render_pass
    }

    /// Primitive topology.
    pub fn primitive_topology(&self) -> PrimitiveTopology {
        self.descriptor.primitive_topology
    }

    /// Native pre-translated state.
    pub fn native(&self) -> &NativePipelineState {
        &self.native
    }
}

impl std::fmt::Debug for GraphicsPipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsPipelineState")
            .field("primitive_topology", &self.descriptor.primitive_topology)
            .field("native", &self.native)
            .finish()
    }
}

/// An immutable compute pipeline state.
pub struct ComputePipelineState {
    pub(super) header: ResourceHeader,
    root_signature: Arc<RootSignature>,
    compute_shader: Arc<ComputeShader>,
}

impl ComputePipelineState {
    pub(crate) fn new(
        header: ResourceHeader,
        root_signature: Arc<RootSignature>,
        compute_shader: Arc<ComputeShader>,
    ) -> Self {
        Self {
            header,
            root_signature,
            compute_shader,
        }
    }

    /// Root signature.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }

    /// Compute shader.
    pub fn compute_shader(&self) -> &Arc<ComputeShader> {
        &self.compute_shader
    }
}

impl std::fmt::Debug for ComputePipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComputePipelineState").finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(GraphicsPipelineState: Send, Sync);
static_assertions::assert_impl_all!(ComputePipelineState: Send, Sync);
