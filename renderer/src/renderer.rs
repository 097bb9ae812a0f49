//! The renderer interface implemented by every backend.
//!
//! A renderer owns one native device context. Resources are created through
//! its factories; work is recorded into [`CommandBuffer`]s and executed with
//! [`Renderer::submit_command_buffer`], which walks the packets through the
//! backend's [`DispatchTable`].
//!
//! # Frame Structure
//!
//! ```ignore
//! if renderer.begin_scene() {
//!     renderer.submit_command_buffer(&command_buffer);
//!     renderer.end_scene();
//! }
//! swap_chain.present();
//! ```

use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::command::{CommandBuffer, DispatchTable};
use crate::context::Context;
use crate::renderer_assert;
use crate::resources::{
    BufferManager, ComputePipelineState, ComputeShader, Framebuffer, FramebufferAttachment,
    GraphicsPipelineState, GraphicsPipelineStateDescriptor, RenderPass, RenderTarget,
    RendererId, RendererResource, Resource, ResourceGroup, ResourceHeader, ResourceType,
    RootSignature, SamplerState, ShaderLanguage, SwapChain, SwapChainWindow, Texture,
    TextureManager, VertexArray,
};
use crate::statistics::Statistics;
use crate::types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, MapType, MappedSubresource, PrimitiveTopology,
    RootSignatureDescriptor, SamplerStateDescriptor, ScissorRectangle, TextureFormat, Viewport,
};

// ============================================================================
// Renderer Core
// ============================================================================

/// State every backend shares: identity, context, capabilities and statistics.
///
/// Also hosts the backend independent parts of the factories, so backends
/// only add their native objects on top.
pub struct RendererCore {
    id: RendererId,
    context: Context,
    capabilities: Capabilities,
    statistics: Arc<Statistics>,
}

impl RendererCore {
    pub(crate) fn new(context: Context, capabilities: Capabilities) -> Self {
        Self {
            id: RendererId::next(),
            context,
            capabilities,
            statistics: Arc::new(Statistics::new()),
        }
    }

    /// Renderer identity stamped into every resource header.
    pub fn id(&self) -> RendererId {
        self.id
    }

    /// Context the renderer was created with.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Device capabilities.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Resource and draw call counters.
    pub fn statistics(&self) -> &Arc<Statistics> {
        &self.statistics
    }

    /// Header for a new resource of this renderer.
    pub(crate) fn header(&self, resource_type: ResourceType) -> ResourceHeader {
        log::trace!("Creating {resource_type:?}");
        ResourceHeader::new(self.id, resource_type, self.statistics.clone())
    }

    /// Whether the resource was created by this renderer.
    ///
    /// A foreign resource is reported as critical and through the assert
    /// handler; the caller must ignore it.
    pub(crate) fn owns(&self, header: &ResourceHeader) -> bool {
        if header.renderer_id() == self.id {
            return true;
        }
        log::error!(
            "{:?} of renderer {} used with renderer {}",
            header.resource_type(),
            header.renderer_id().raw(),
            self.id.raw()
        );
        renderer_assert!(
            self.context,
            false,
            "Renderer mismatch for {:?}",
            header.resource_type()
        )
    }

    pub(crate) fn create_render_pass(
        &self,
        color_attachment_formats: &[TextureFormat],
        depth_stencil_attachment_format: Option<TextureFormat>,
        number_of_multisamples: u32,
    ) -> Option<Arc<RenderPass>> {
        let maximum = self.capabilities.maximum_number_of_simultaneous_render_targets;
        if !renderer_assert!(
            self.context,
            color_attachment_formats.len() as u32 <= maximum,
            "{} color attachments exceed the maximum of {maximum}",
            color_attachment_formats.len()
        ) {
            return None;
        }
        if color_attachment_formats
            .iter()
            .chain(depth_stencil_attachment_format.as_ref())
            .any(|format| *format == TextureFormat::Unknown)
        {
            log::error!("Render pass attachments need a known format");
            return None;
        }
        if let Some(format) = depth_stencil_attachment_format {
            if !format.is_depth() {
                log::error!("{format:?} is not a depth stencil format");
                return None;
            }
        }
        let maximum_multisamples = u32::from(self.capabilities.maximum_number_of_multisamples);
        let number_of_multisamples = if number_of_multisamples > maximum_multisamples {
            log::warn!(
                "{number_of_multisamples} multisamples requested, clamped to {maximum_multisamples}"
            );
            maximum_multisamples
        } else {
            number_of_multisamples.max(1)
        };
        Some(Arc::new(RenderPass::new(
            self.header(ResourceType::RenderPass),
            color_attachment_formats.to_vec(),
            depth_stencil_attachment_format,
            number_of_multisamples,
        )))
    }

    pub(crate) fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Option<Arc<RootSignature>> {
        Some(Arc::new(RootSignature::new(
            self.header(ResourceType::RootSignature),
            descriptor.clone(),
        )))
    }

    pub(crate) fn create_resource_group(
        &self,
        root_signature: &Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
        texture_buffers_as_uniform_buffers: bool,
    ) -> Option<Arc<ResourceGroup>> {
        if !self.owns(root_signature.header()) {
            return None;
        }
        if !resources.iter().all(|resource| self.owns(resource.header())) {
            return None;
        }
        if let Some(sampler_states) = sampler_states {
            if !sampler_states.iter().flatten().all(|sampler| self.owns(sampler.header())) {
                return None;
            }
        }
        ResourceGroup::new(
            self.header(ResourceType::ResourceGroup),
            root_signature.clone(),
            root_parameter_index,
            resources,
            sampler_states,
            texture_buffers_as_uniform_buffers,
        )
        .map(Arc::new)
    }

    /// Check the backend independent parts of a graphics pipeline descriptor.
    pub(crate) fn validate_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor,
    ) -> bool {
        if !self.owns(descriptor.root_signature.header())
            || !self.owns(descriptor.program.header())
            || !self.owns(descriptor.render_pass.header())
        {
            return false;
        }
        match descriptor.primitive_topology {
            PrimitiveTopology::Unknown => {
                log::error!("Graphics pipeline state needs a primitive topology");
                false
            }
            PrimitiveTopology::PatchList(vertices) => renderer_assert!(
                self.context,
                vertices >= 1
                    && u32::from(vertices) <= self.capabilities.maximum_number_of_patch_vertices,
                "Patch list with {vertices} vertices is not supported"
            ),
            _ => true,
        }
    }

    pub(crate) fn create_compute_pipeline_state(
        &self,
        root_signature: &Arc<RootSignature>,
        compute_shader: &Arc<ComputeShader>,
    ) -> Option<Arc<ComputePipelineState>> {
        if !renderer_assert!(
            self.context,
            self.capabilities.compute_shader,
            "Compute shaders are not supported"
        ) {
            return None;
        }
        if !self.owns(root_signature.header()) || !self.owns(compute_shader.header()) {
            return None;
        }
        Some(Arc::new(ComputePipelineState::new(
            self.header(ResourceType::ComputePipelineState),
            root_signature.clone(),
            compute_shader.clone(),
        )))
    }

    /// Check a framebuffer's attachments, returning its size.
    pub(crate) fn validate_framebuffer(
        &self,
        render_pass: &Arc<RenderPass>,
        color_attachments: &[FramebufferAttachment],
        depth_stencil_attachment: Option<&FramebufferAttachment>,
    ) -> Option<(u32, u32)> {
        if !self.owns(render_pass.header()) {
            return None;
        }
        if !renderer_assert!(
            self.context,
            color_attachments.len() as u32
                <= self.capabilities.maximum_number_of_simultaneous_render_targets,
            "{} color attachments exceed the maximum",
            color_attachments.len()
        ) {
            return None;
        }
        for attachment in color_attachments.iter().chain(depth_stencil_attachment) {
            if !self.owns(attachment.texture.header()) {
                return None;
            }
            if attachment.mipmap_index >= attachment.texture.number_of_mipmaps() {
                log::error!(
                    "Framebuffer attachment mipmap {} does not exist",
                    attachment.mipmap_index
                );
                return None;
            }
        }
        if let Some(attachment) = depth_stencil_attachment {
            if !attachment.texture.format().is_depth() {
                log::error!("{:?} cannot be a depth stencil attachment", attachment.texture.format());
                return None;
            }
        }
        let size = crate::resources::framebuffer_size(color_attachments, depth_stencil_attachment);
        if size.is_none() {
            log::error!("Framebuffer needs at least one attachment");
        }
        size
    }
}

impl std::fmt::Debug for RendererCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RendererCore")
            .field("id", &self.id)
            .field("device_name", &self.capabilities.device_name)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Renderer Trait
// ============================================================================

/// A backend renderer.
///
/// Factories return `None` on invalid input after logging the cause; they
/// never panic unless the context's assert handler decides so.
pub trait Renderer: Sized {
    /// Decode function per command kind.
    const DISPATCH_TABLE: DispatchTable<Self>;

    /// Shared renderer state.
    fn core(&self) -> &RendererCore;

    /// Backend name, e.g. `"OpenGLES3"`.
    fn name(&self) -> &'static str;

    fn id(&self) -> RendererId {
        self.core().id()
    }

    fn context(&self) -> &Context {
        self.core().context()
    }

    fn capabilities(&self) -> &Capabilities {
        self.core().capabilities()
    }

    fn statistics(&self) -> &Statistics {
        self.core().statistics()
    }

    /// Whether the native debug layer is active.
    fn is_debug_enabled(&self) -> bool {
        false
    }

    /// Whether the resource belongs to this renderer; reports a mismatch.
    fn owns_resource(&self, header: &ResourceHeader) -> bool {
        self.core().owns(header)
    }

    // ------------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------------

    fn create_render_pass(
        &self,
        color_attachment_formats: &[TextureFormat],
        depth_stencil_attachment_format: Option<TextureFormat>,
        number_of_multisamples: u32,
    ) -> Option<Arc<RenderPass>> {
        self.core().create_render_pass(
            color_attachment_formats,
            depth_stencil_attachment_format,
            number_of_multisamples,
        )
    }

    fn create_swap_chain(
        &self,
        render_pass: &Arc<RenderPass>,
        window: SwapChainWindow,
    ) -> Option<Arc<SwapChain>>;

    fn create_framebuffer(
        &self,
        render_pass: &Arc<RenderPass>,
        color_attachments: &[FramebufferAttachment],
        depth_stencil_attachment: Option<&FramebufferAttachment>,
    ) -> Option<Arc<Framebuffer>>;

    fn create_buffer_manager(&self) -> Arc<dyn BufferManager>;

    fn create_texture_manager(&self) -> Arc<dyn TextureManager>;

    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Option<Arc<RootSignature>> {
        self.core().create_root_signature(descriptor)
    }

    fn create_resource_group(
        &self,
        root_signature: &Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
    ) -> Option<Arc<ResourceGroup>>;

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor,
    ) -> Option<Arc<GraphicsPipelineState>>;

    fn create_compute_pipeline_state(
        &self,
        root_signature: &Arc<RootSignature>,
        compute_shader: &Arc<ComputeShader>,
    ) -> Option<Arc<ComputePipelineState>> {
        self.core()
            .create_compute_pipeline_state(root_signature, compute_shader)
    }

    fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> Option<Arc<SamplerState>>;

    /// Shader language by name, or the default language for `None`.
    fn shader_language(&self, name: Option<&str>) -> Option<Arc<dyn ShaderLanguage>>;

    fn is_shader_language_supported(&self, name: &str) -> bool {
        self.shader_language(Some(name)).is_some()
    }

    // ------------------------------------------------------------------------
    // Resource Access
    // ------------------------------------------------------------------------

    /// Map a subresource for CPU access.
    fn map(
        &mut self,
        resource: &Resource,
        subresource: u32,
        map_type: MapType,
    ) -> Option<MappedSubresource>;

    fn unmap(&mut self, resource: &Resource, subresource: u32);

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    /// Start a frame. Returns `false` when nothing can be rendered.
    fn begin_scene(&mut self) -> bool;

    fn end_scene(&mut self);

    /// Execute a command buffer through the dispatch table.
    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        command_buffer.submit_to_renderer(self);
    }

    /// Hand recorded native work to the device without waiting.
    fn flush(&mut self);

    /// Block until the device finished all work.
    fn finish(&mut self);

    // ------------------------------------------------------------------------
    // Graphics
    // ------------------------------------------------------------------------

    fn set_graphics_root_signature(&mut self, root_signature: Option<&Arc<RootSignature>>);

    fn set_graphics_pipeline_state(
        &mut self,
        graphics_pipeline_state: Option<&Arc<GraphicsPipelineState>>,
    );

    fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    );

    fn set_graphics_vertex_array(&mut self, vertex_array: Option<&Arc<VertexArray>>);

    /// Viewports in top-left origin coordinates.
    fn set_graphics_viewports(&mut self, viewports: &[Viewport]);

    /// Scissor rectangles in top-left origin coordinates.
    fn set_graphics_scissor_rectangles(&mut self, scissor_rectangles: &[ScissorRectangle]);

    fn set_graphics_render_target(&mut self, render_target: Option<&RenderTarget>);

    /// Clear the whole current render target, ignoring the scissor rectangle.
    fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32);

    fn draw_graphics(&mut self, arguments: &[DrawArguments]);

    fn draw_indexed_graphics(&mut self, arguments: &[DrawIndexedArguments]);

    // ------------------------------------------------------------------------
    // Resource Operations
    // ------------------------------------------------------------------------

    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: &Texture,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    );

    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: &RenderTarget,
        source_multisample_framebuffer: &Arc<Framebuffer>,
    );

    fn copy_resource(&mut self, destination_resource: &Resource, source_resource: &Resource);

    // ------------------------------------------------------------------------
    // Debug
    // ------------------------------------------------------------------------

    fn set_debug_marker(&mut self, name: &str);

    fn begin_debug_event(&mut self, name: &str);

    fn end_debug_event(&mut self);
}

static_assertions::assert_impl_all!(RendererCore: Send, Sync);
