//! Null backend.
//!
//! Accepts every call without touching a native API. Resources are fully
//! validated and counted like on a real backend, and every executed command
//! is remembered, which makes this backend the reference for testing the
//! command layer.

use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::command::{self, CommandBuffer, CommandDispatchFunctionIndex, CommandPacket, DispatchTable};
use crate::context::Context;
use crate::renderer::{Renderer, RendererCore};
use crate::resources::{
    validate_buffer_arguments, validate_texture_arguments, validate_vertex_array_arguments,
    BufferManager, ComputeShader, FragmentShader, Framebuffer, FramebufferAttachment,
    GeometryShader, GraphicsPipelineState, GraphicsPipelineStateDescriptor, IndexBuffer,
    IndirectBuffer, Program, ProgramShaders, RenderPass, RenderTarget, RendererResource,
    Resource, ResourceGroup, ResourceType, RootSignature, SamplerState, ShaderLanguage,
    SwapChain, SwapChainWindow, TessellationControlShader, TessellationEvaluationShader,
    Texture, Texture1D, Texture2D, Texture2DArray, Texture3D, TextureBuffer, TextureCube,
    TextureManager, UniformBuffer, VertexArray, VertexBuffer, VertexShader,
};
use crate::types::{
    BufferUsage, ClearFlags, DrawArguments, DrawIndexedArguments, IndexBufferFormat,
    IndirectBufferFlags, MapType, MappedSubresource, PrimitiveTopology, SamplerStateDescriptor,
    ScissorRectangle, TextureDescriptor, TextureFormat, VertexAttribute, Viewport,
};

use super::{
    NativeBuffer, NativeFramebuffer, NativePipelineState, NativeProgram, NativeSampler,
    NativeShader, NativeSwapChain, NativeTexture, NativeTextureBuffer, NativeVertexArray,
};

/// Name of the null backend.
pub const NAME: &str = "Null";

/// Name of the null shading language.
pub const SHADER_LANGUAGE_NAME: &str = "Null";

fn capabilities() -> Capabilities {
    Capabilities {
        device_name: "Null".to_owned(),
        maximum_number_of_viewports: 16,
        maximum_number_of_simultaneous_render_targets: 8,
        maximum_texture_dimension: 16384,
        maximum_number_of_2d_texture_array_slices: 2048,
        maximum_uniform_buffer_size: 64 * 1024,
        maximum_texture_buffer_size: 128 * 1024 * 1024,
        maximum_indirect_buffer_size: 128 * 1024,
        maximum_number_of_multisamples: 8,
        maximum_anisotropy: 16,
        individual_uniforms: true,
        instanced_arrays: true,
        draw_instanced: true,
        base_vertex: true,
        native_multithreading: true,
        vertex_shader: true,
        maximum_number_of_patch_vertices: 32,
        maximum_number_of_geometry_shader_output_vertices: 1024,
        fragment_shader: true,
        compute_shader: true,
        ..Capabilities::default()
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Renderer without a native API.
pub struct NullRenderer {
    core: Arc<RendererCore>,
    executed_commands: Vec<CommandDispatchFunctionIndex>,
    graphics_root_signature: Option<Arc<RootSignature>>,
    render_target: Option<RenderTarget>,
    viewports: Vec<Viewport>,
    debug_event_depth: u32,
    in_scene: bool,
}

impl NullRenderer {
    /// Create a null renderer.
    pub fn new(context: Context) -> Self {
        log::info!("Creating null renderer");
        Self {
            core: Arc::new(RendererCore::new(context, capabilities())),
            executed_commands: Vec::new(),
            graphics_root_signature: None,
            render_target: None,
            viewports: Vec::new(),
            debug_event_depth: 0,
            in_scene: false,
        }
    }

    /// Command kinds executed so far, in execution order.
    ///
    /// Nested command buffers contribute their own commands, not the
    /// execute command itself.
    pub fn executed_commands(&self) -> &[CommandDispatchFunctionIndex] {
        &self.executed_commands
    }

    /// Forget the executed commands.
    pub fn clear_executed_commands(&mut self) {
        self.executed_commands.clear();
    }

    /// Currently bound graphics root signature.
    pub fn graphics_root_signature(&self) -> Option<&Arc<RootSignature>> {
        self.graphics_root_signature.as_ref()
    }

    /// Currently bound render target.
    pub fn render_target(&self) -> Option<&RenderTarget> {
        self.render_target.as_ref()
    }

    /// Viewports of the last viewport command.
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    /// Number of debug events opened and not yet closed.
    pub fn debug_event_depth(&self) -> u32 {
        self.debug_event_depth
    }

    fn executed(&mut self, command: CommandDispatchFunctionIndex) {
        log::trace!("Null renderer: {command:?}");
        self.executed_commands.push(command);
    }

    fn owns_optional<T: RendererResource>(&self, resource: Option<&Arc<T>>) -> bool {
        resource.map_or(true, |resource| self.core.owns(resource.header()))
    }
}

impl std::fmt::Debug for NullRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NullRenderer")
            .field("core", &self.core)
            .field("executed_commands", &self.executed_commands.len())
            .finish_non_exhaustive()
    }
}

fn set_compute_root_signature(_: &CommandBuffer, _: &CommandPacket<'_>, renderer: &mut NullRenderer) {
    renderer.executed(CommandDispatchFunctionIndex::SetComputeRootSignature);
}

fn set_compute_pipeline_state(_: &CommandBuffer, _: &CommandPacket<'_>, renderer: &mut NullRenderer) {
    renderer.executed(CommandDispatchFunctionIndex::SetComputePipelineState);
}

fn set_compute_resource_group(_: &CommandBuffer, _: &CommandPacket<'_>, renderer: &mut NullRenderer) {
    renderer.executed(CommandDispatchFunctionIndex::SetComputeResourceGroup);
}

fn dispatch_compute(_: &CommandBuffer, _: &CommandPacket<'_>, renderer: &mut NullRenderer) {
    renderer.executed(CommandDispatchFunctionIndex::DispatchCompute);
}

impl Renderer for NullRenderer {
    const DISPATCH_TABLE: DispatchTable<Self> = [
        command::execute_command_buffer,
        command::set_graphics_root_signature,
        command::set_graphics_pipeline_state,
        command::set_graphics_resource_group,
        command::set_graphics_vertex_array,
        command::set_graphics_viewports,
        command::set_graphics_scissor_rectangles,
        command::set_graphics_render_target,
        command::clear_graphics,
        command::draw_graphics,
        command::draw_indexed_graphics,
        set_compute_root_signature,
        set_compute_pipeline_state,
        set_compute_resource_group,
        dispatch_compute,
        command::set_texture_minimum_maximum_mipmap_index,
        command::resolve_multisample_framebuffer,
        command::copy_resource,
        command::set_debug_marker,
        command::begin_debug_event,
        command::end_debug_event,
    ];

    fn core(&self) -> &RendererCore {
        &self.core
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn create_swap_chain(
        &self,
        render_pass: &Arc<RenderPass>,
        window: SwapChainWindow,
    ) -> Option<Arc<SwapChain>> {
        if !self.core.owns(render_pass.header()) {
            return None;
        }
        let render_window = match window {
            SwapChainWindow::Native(_) => None,
            SwapChainWindow::Render(render_window) => Some(render_window),
        };
        Some(Arc::new(SwapChain::new(
            self.core.header(ResourceType::SwapChain),
            render_pass.clone(),
            render_window,
            NativeSwapChain::Null,
        )))
    }

    fn create_framebuffer(
        &self,
        render_pass: &Arc<RenderPass>,
        color_attachments: &[FramebufferAttachment],
        depth_stencil_attachment: Option<&FramebufferAttachment>,
    ) -> Option<Arc<Framebuffer>> {
        let (width, height) =
            self.core
                .validate_framebuffer(render_pass, color_attachments, depth_stencil_attachment)?;
        Some(Arc::new(Framebuffer::new(
            self.core.header(ResourceType::Framebuffer),
            render_pass.clone(),
            color_attachments.to_vec(),
            depth_stencil_attachment.cloned(),
            width,
            height,
            NativeFramebuffer::Null,
        )))
    }

    fn create_buffer_manager(&self) -> Arc<dyn BufferManager> {
        Arc::new(NullBufferManager {
            core: self.core.clone(),
        })
    }

    fn create_texture_manager(&self) -> Arc<dyn TextureManager> {
        Arc::new(NullTextureManager {
            core: self.core.clone(),
        })
    }

    fn create_resource_group(
        &self,
        root_signature: &Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
    ) -> Option<Arc<ResourceGroup>> {
        self.core.create_resource_group(
            root_signature,
            root_parameter_index,
            resources,
            sampler_states,
            false,
        )
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor,
    ) -> Option<Arc<GraphicsPipelineState>> {
        if !self.core.validate_graphics_pipeline_state(descriptor) {
            return None;
        }
        Some(Arc::new(GraphicsPipelineState::new(
            self.core.header(ResourceType::GraphicsPipelineState),
            descriptor.clone(),
            NativePipelineState::Null,
        )))
    }

    fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> Option<Arc<SamplerState>> {
        Some(Arc::new(SamplerState::new(
            self.core.header(ResourceType::SamplerState),
            descriptor.clone(),
            NativeSampler::Null,
        )))
    }

    fn shader_language(&self, name: Option<&str>) -> Option<Arc<dyn ShaderLanguage>> {
        match name {
            None | Some(SHADER_LANGUAGE_NAME) => Some(Arc::new(NullShaderLanguage {
                core: self.core.clone(),
            })),
            Some(_) => None,
        }
    }

    fn map(
        &mut self,
        resource: &Resource,
        _subresource: u32,
        _map_type: MapType,
    ) -> Option<MappedSubresource> {
        if !self.core.owns(resource.header()) {
            return None;
        }
        match resource {
            Resource::IndirectBuffer(buffer) => {
                let size = buffer.size();
                // SAFETY: the indirect buffer storage is at least `size` bytes
                // and lives as long as the buffer.
                Some(unsafe { MappedSubresource::new(buffer.data_pointer(), size as usize, size, size) })
            }
            _ => {
                log::trace!("Null renderer: {:?} has no memory to map", resource.resource_type());
                None
            }
        }
    }

    fn unmap(&mut self, _resource: &Resource, _subresource: u32) {}

    fn begin_scene(&mut self) -> bool {
        if self.in_scene {
            log::warn!("begin_scene called twice without end_scene");
        }
        self.in_scene = true;
        self.core.statistics().reset_frame();
        true
    }

    fn end_scene(&mut self) {
        if !self.in_scene {
            log::warn!("end_scene called without begin_scene");
        }
        self.in_scene = false;
        self.graphics_root_signature = None;
        self.render_target = None;
    }

    fn flush(&mut self) {}

    fn finish(&mut self) {}

    fn set_graphics_root_signature(&mut self, root_signature: Option<&Arc<RootSignature>>) {
        if self.owns_optional(root_signature) {
            self.graphics_root_signature = root_signature.cloned();
            self.executed(CommandDispatchFunctionIndex::SetGraphicsRootSignature);
        }
    }

    fn set_graphics_pipeline_state(
        &mut self,
        graphics_pipeline_state: Option<&Arc<GraphicsPipelineState>>,
    ) {
        if self.owns_optional(graphics_pipeline_state) {
            self.executed(CommandDispatchFunctionIndex::SetGraphicsPipelineState);
        }
    }

    fn set_graphics_resource_group(
        &mut self,
        _root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    ) {
        if self.owns_optional(resource_group) {
            self.executed(CommandDispatchFunctionIndex::SetGraphicsResourceGroup);
        }
    }

    fn set_graphics_vertex_array(&mut self, vertex_array: Option<&Arc<VertexArray>>) {
        if self.owns_optional(vertex_array) {
            self.executed(CommandDispatchFunctionIndex::SetGraphicsVertexArray);
        }
    }

    fn set_graphics_viewports(&mut self, viewports: &[Viewport]) {
        self.viewports = viewports.to_vec();
        self.executed(CommandDispatchFunctionIndex::SetGraphicsViewports);
    }

    fn set_graphics_scissor_rectangles(&mut self, _scissor_rectangles: &[ScissorRectangle]) {
        self.executed(CommandDispatchFunctionIndex::SetGraphicsScissorRectangles);
    }

    fn set_graphics_render_target(&mut self, render_target: Option<&RenderTarget>) {
        if render_target.map_or(true, |render_target| self.core.owns(render_target.header())) {
            self.render_target = render_target.cloned();
            self.executed(CommandDispatchFunctionIndex::SetGraphicsRenderTarget);
        }
    }

    fn clear_graphics(&mut self, _flags: ClearFlags, _color: [f32; 4], _z: f32, _stencil: u32) {
        self.executed(CommandDispatchFunctionIndex::ClearGraphics);
    }

    fn draw_graphics(&mut self, arguments: &[DrawArguments]) {
        self.core.statistics().draw_calls_issued(arguments.len() as u32);
        self.executed(CommandDispatchFunctionIndex::DrawGraphics);
    }

    fn draw_indexed_graphics(&mut self, arguments: &[DrawIndexedArguments]) {
        self.core.statistics().draw_calls_issued(arguments.len() as u32);
        self.executed(CommandDispatchFunctionIndex::DrawIndexedGraphics);
    }

    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: &Texture,
        _minimum_mipmap_index: u32,
        _maximum_mipmap_index: u32,
    ) {
        if self.core.owns(texture.header()) {
            self.executed(CommandDispatchFunctionIndex::SetTextureMinimumMaximumMipmapIndex);
        }
    }

    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: &RenderTarget,
        source_multisample_framebuffer: &Arc<Framebuffer>,
    ) {
        if self.core.owns(destination_render_target.header())
            && self.core.owns(source_multisample_framebuffer.header())
        {
            self.executed(CommandDispatchFunctionIndex::ResolveMultisampleFramebuffer);
        }
    }

    fn copy_resource(&mut self, destination_resource: &Resource, source_resource: &Resource) {
        if self.core.owns(destination_resource.header()) && self.core.owns(source_resource.header()) {
            self.executed(CommandDispatchFunctionIndex::CopyResource);
        }
    }

    fn set_debug_marker(&mut self, name: &str) {
        log::trace!("Null renderer: debug marker {name:?}");
        self.executed(CommandDispatchFunctionIndex::SetDebugMarker);
    }

    fn begin_debug_event(&mut self, name: &str) {
        log::trace!("Null renderer: begin debug event {name:?}");
        self.debug_event_depth += 1;
        self.executed(CommandDispatchFunctionIndex::BeginDebugEvent);
    }

    fn end_debug_event(&mut self) {
        if self.debug_event_depth == 0 {
            log::warn!("Debug event closed without being opened");
        }
        self.debug_event_depth = self.debug_event_depth.saturating_sub(1);
        self.executed(CommandDispatchFunctionIndex::EndDebugEvent);
    }
}

// ============================================================================
// Buffer Manager
// ============================================================================

struct NullBufferManager {
    core: Arc<RendererCore>,
}

impl BufferManager for NullBufferManager {
    fn create_vertex_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<VertexBuffer>> {
        validate_buffer_arguments("vertex buffer", size, data).then(|| {
            Arc::new(VertexBuffer::new(
                self.core.header(ResourceType::VertexBuffer),
                size,
                usage,
                NativeBuffer::Null,
            ))
        })
    }

    fn create_index_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
        format: IndexBufferFormat,
    ) -> Option<Arc<IndexBuffer>> {
        validate_buffer_arguments("index buffer", size, data).then(|| {
            Arc::new(IndexBuffer::new(
                self.core.header(ResourceType::IndexBuffer),
                size,
                usage,
                format,
                NativeBuffer::Null,
            ))
        })
    }

    fn create_vertex_array(
        &self,
        attributes: &[VertexAttribute],
        vertex_buffers: &[Arc<VertexBuffer>],
        index_buffer: Option<Arc<IndexBuffer>>,
    ) -> Option<Arc<VertexArray>> {
        if !validate_vertex_array_arguments(attributes, vertex_buffers) {
            return None;
        }
        if !vertex_buffers.iter().all(|buffer| self.core.owns(buffer.header()))
            || !index_buffer.as_ref().map_or(true, |buffer| self.core.owns(buffer.header()))
        {
            return None;
        }
        Some(Arc::new(VertexArray::new(
            self.core.header(ResourceType::VertexArray),
            attributes.to_vec(),
            vertex_buffers.to_vec(),
            index_buffer,
            NativeVertexArray::Null,
        )))
    }

    fn create_uniform_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<UniformBuffer>> {
        validate_buffer_arguments("uniform buffer", size, data).then(|| {
            Arc::new(UniformBuffer::new(
                self.core.header(ResourceType::UniformBuffer),
                size,
                usage,
                NativeBuffer::Null,
            ))
        })
    }

    fn create_texture_buffer(
        &self,
        size: u32,
        format: TextureFormat,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<TextureBuffer>> {
        if format == TextureFormat::Unknown {
            log::error!("Cannot create texture buffer with unknown format");
            return None;
        }
        validate_buffer_arguments("texture buffer", size, data).then(|| {
            Arc::new(TextureBuffer::new(
                self.core.header(ResourceType::TextureBuffer),
                size,
                format,
                usage,
                NativeTextureBuffer::Null,
            ))
        })
    }

    fn create_indirect_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        flags: IndirectBufferFlags,
        usage: BufferUsage,
    ) -> Option<Arc<IndirectBuffer>> {
        validate_buffer_arguments("indirect buffer", size, data).then(|| {
            Arc::new(IndirectBuffer::new(
                self.core.header(ResourceType::IndirectBuffer),
                size,
                data,
                flags,
                usage,
            ))
        })
    }
}

// ============================================================================
// Texture Manager
// ============================================================================

struct NullTextureManager {
    core: Arc<RendererCore>,
}

impl NullTextureManager {
    fn create<T>(
        &self,
        resource_type: ResourceType,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
        new: fn(crate::resources::ResourceHeader, TextureDescriptor, u32, NativeTexture) -> T,
    ) -> Option<Arc<T>> {
        let number_of_mipmaps = validate_texture_arguments(resource_type, descriptor, data)?;
        Some(Arc::new(new(
            self.core.header(resource_type),
            descriptor.clone(),
            number_of_mipmaps,
            NativeTexture::Null,
        )))
    }
}

impl TextureManager for NullTextureManager {
    fn create_texture_1d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture1D>> {
        self.create(ResourceType::Texture1D, descriptor, data, Texture1D::new)
    }

    fn create_texture_2d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture2D>> {
        self.create(ResourceType::Texture2D, descriptor, data, Texture2D::new)
    }

    fn create_texture_2d_array(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture2DArray>> {
        self.create(ResourceType::Texture2DArray, descriptor, data, Texture2DArray::new)
    }

    fn create_texture_3d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture3D>> {
        self.create(ResourceType::Texture3D, descriptor, data, Texture3D::new)
    }

    fn create_texture_cube(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<TextureCube>> {
        self.create(ResourceType::TextureCube, descriptor, data, TextureCube::new)
    }
}

// ============================================================================
// Shader Language
// ============================================================================

struct NullShaderLanguage {
    core: Arc<RendererCore>,
}

impl ShaderLanguage for NullShaderLanguage {
    fn name(&self) -> &'static str {
        SHADER_LANGUAGE_NAME
    }

    fn create_vertex_shader_from_source_code(
        &self,
        _vertex_attributes: &[VertexAttribute],
        _source_code: &str,
    ) -> Option<Arc<VertexShader>> {
        Some(Arc::new(VertexShader::new(
            self.core.header(ResourceType::VertexShader),
            NativeShader::Null,
        )))
    }

    fn create_tessellation_control_shader_from_source_code(
        &self,
        _source_code: &str,
    ) -> Option<Arc<TessellationControlShader>> {
        Some(Arc::new(TessellationControlShader::new(
            self.core.header(ResourceType::TessellationControlShader),
            NativeShader::Null,
        )))
    }

    fn create_tessellation_evaluation_shader_from_source_code(
        &self,
        _source_code: &str,
    ) -> Option<Arc<TessellationEvaluationShader>> {
        Some(Arc::new(TessellationEvaluationShader::new(
            self.core.header(ResourceType::TessellationEvaluationShader),
            NativeShader::Null,
        )))
    }

    fn create_geometry_shader_from_source_code(
        &self,
        _source_code: &str,
        _input_topology: PrimitiveTopology,
        _output_topology: PrimitiveTopology,
        number_of_output_vertices: u32,
    ) -> Option<Arc<GeometryShader>> {
        let maximum = self
            .core
            .capabilities()
            .maximum_number_of_geometry_shader_output_vertices;
        if number_of_output_vertices > maximum {
            log::error!("Geometry shader emits {number_of_output_vertices} vertices, maximum is {maximum}");
            return None;
        }
        Some(Arc::new(GeometryShader::new(
            self.core.header(ResourceType::GeometryShader),
            NativeShader::Null,
        )))
    }

    fn create_fragment_shader_from_source_code(
        &self,
        _source_code: &str,
    ) -> Option<Arc<FragmentShader>> {
        Some(Arc::new(FragmentShader::new(
            self.core.header(ResourceType::FragmentShader),
            NativeShader::Null,
        )))
    }

    fn create_compute_shader_from_source_code(
        &self,
        _source_code: &str,
    ) -> Option<Arc<ComputeShader>> {
        Some(Arc::new(ComputeShader::new(
            self.core.header(ResourceType::ComputeShader),
            NativeShader::Null,
        )))
    }

    fn create_program(
        &self,
        root_signature: &Arc<RootSignature>,
        vertex_attributes: &[VertexAttribute],
        shaders: ProgramShaders,
    ) -> Option<Arc<Program>> {
        if !self.core.owns(root_signature.header()) {
            return None;
        }
        Some(Arc::new(Program::new(
            self.core.header(ResourceType::Program),
            root_signature.clone(),
            vertex_attributes.to_vec(),
            shaders,
            NativeProgram::Null,
        )))
    }
}

static_assertions::assert_impl_all!(NullRenderer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DrawGraphics, ExecuteCommandBuffer, SetDebugMarker};

    #[test]
    fn test_dispatch_table_order() {
        for (index, kind) in CommandDispatchFunctionIndex::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
        assert_eq!(NullRenderer::DISPATCH_TABLE.len(), CommandDispatchFunctionIndex::COUNT);
    }

    #[test]
    fn test_draws_are_counted() {
        let mut renderer = NullRenderer::new(Context::new());
        let mut command_buffer = CommandBuffer::new();
        DrawGraphics::create_inline(
            &mut command_buffer,
            &[DrawArguments::new(3, 1), DrawArguments::new(6, 1)],
        );
        assert!(renderer.begin_scene());
        renderer.submit_command_buffer(&command_buffer);
        renderer.end_scene();
        assert_eq!(renderer.statistics().number_of_draw_calls(), 2);
    }

    #[test]
    fn test_nested_execution_is_flattened() {
        let mut renderer = NullRenderer::new(Context::new());
        let mut nested = CommandBuffer::new();
        SetDebugMarker::create(&mut nested, "nested");
        let nested = Arc::new(nested);

        let mut command_buffer = CommandBuffer::new();
        ExecuteCommandBuffer::create(&mut command_buffer, &nested);
        SetDebugMarker::create(&mut command_buffer, "outer");
        renderer.submit_command_buffer(&command_buffer);

        assert_eq!(
            renderer.executed_commands(),
            &[CommandDispatchFunctionIndex::SetDebugMarker; 2]
        );
    }

    #[test]
    fn test_null_shader_language() {
        let renderer = NullRenderer::new(Context::new());
        assert!(renderer.is_shader_language_supported("Null"));
        assert!(!renderer.is_shader_language_supported("GLSLES"));
        assert_eq!(renderer.shader_language(None).map(|language| language.name()), Some("Null"));
    }
}
