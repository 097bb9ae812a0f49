//! Runtime backend selection.

use std::sync::Arc;

use crate::backend::null::{self, NullRenderer};
use crate::command::{CommandBuffer, CommandPacket, DispatchTable};
use crate::context::Context;
use crate::error::RendererError;
use crate::renderer::{Renderer, RendererCore};
use crate::resources::{
    BufferManager, ComputePipelineState, ComputeShader, Framebuffer, FramebufferAttachment,
    GraphicsPipelineState, GraphicsPipelineStateDescriptor, RenderPass, RenderTarget, Resource,
    ResourceGroup, RootSignature, SamplerState, ShaderLanguage, SwapChain, SwapChainWindow,
    Texture, TextureManager, VertexArray,
};
use crate::types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, MapType, MappedSubresource,
    RootSignatureDescriptor, SamplerStateDescriptor, ScissorRectangle, TextureFormat, Viewport,
};

#[cfg(feature = "gles3-backend")]
use crate::backend::gles3::{self, Gles3Renderer};

/// A renderer of any compiled-in backend.
///
/// Implements [`Renderer`] by forwarding to the backend, including command
/// buffer submission, which runs the backend's own dispatch table.
#[derive(Debug)]
pub enum RendererInstance {
    Null(NullRenderer),
    #[cfg(feature = "gles3-backend")]
    Gles3(Box<Gles3Renderer>),
}

macro_rules! forward {
    ($self:ident, $renderer:ident => $call:expr) => {
        match $self {
            RendererInstance::Null($renderer) => $call,
            #[cfg(feature = "gles3-backend")]
            RendererInstance::Gles3($renderer) => $call,
        }
    };
}

/// Create a renderer by backend name.
///
/// `None` picks the first backend that initializes, falling back to the null
/// backend. Names are matched case-insensitively.
pub fn create_renderer(name: Option<&str>, context: Context) -> Result<RendererInstance, RendererError> {
    match name.map(str::to_ascii_lowercase).as_deref() {
        Some("null") => {
            log::info!("Using the {} renderer", null::NAME);
            Ok(RendererInstance::Null(NullRenderer::new(context)))
        }
        #[cfg(feature = "gles3-backend")]
        Some("opengles3") => {
            let renderer = Gles3Renderer::new(context)?;
            log::info!("Using the {} renderer", gles3::NAME);
            Ok(RendererInstance::Gles3(Box::new(renderer)))
        }
        Some(_) => Err(RendererError::UnknownBackend(name.unwrap_or_default().to_owned())),
        None => Ok(default_renderer(context)),
    }
}

#[cfg(feature = "gles3-backend")]
fn default_renderer(context: Context) -> RendererInstance {
    match Gles3Renderer::new(context.clone()) {
        Ok(renderer) => {
            log::info!("Using the {} renderer", gles3::NAME);
            RendererInstance::Gles3(Box::new(renderer))
        }
        Err(error) => {
            log::warn!("{} renderer unavailable ({error}), falling back to {}", gles3::NAME, null::NAME);
            RendererInstance::Null(NullRenderer::new(context))
        }
    }
}

#[cfg(not(feature = "gles3-backend"))]
fn default_renderer(context: Context) -> RendererInstance {
    log::info!("Using the {} renderer", null::NAME);
    RendererInstance::Null(NullRenderer::new(context))
}

impl RendererInstance {
    /// The null renderer, if selected.
    pub fn as_null(&self) -> Option<&NullRenderer> {
        match self {
            Self::Null(renderer) => Some(renderer),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// The OpenGL ES 3 renderer, if selected.
    #[cfg(feature = "gles3-backend")]
    pub fn as_gles3(&self) -> Option<&Gles3Renderer> {
        match self {
            Self::Gles3(renderer) => Some(renderer),
            _ => None,
        }
    }
}

/// Run the selected backend's decode function for command kind `INDEX`.
fn dispatch<const INDEX: usize>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    instance: &mut RendererInstance,
) {
    match instance {
        RendererInstance::Null(renderer) => {
            NullRenderer::DISPATCH_TABLE[INDEX](command_buffer, packet, renderer)
        }
        #[cfg(feature = "gles3-backend")]
        RendererInstance::Gles3(renderer) => {
            Gles3Renderer::DISPATCH_TABLE[INDEX](command_buffer, packet, renderer)
        }
    }
}

impl Renderer for RendererInstance {
    const DISPATCH_TABLE: DispatchTable<Self> = [
        dispatch::<0>,
        dispatch::<1>,
        dispatch::<2>,
        dispatch::<3>,
        dispatch::<4>,
        dispatch::<5>,
        dispatch::<6>,
        dispatch::<7>,
        dispatch::<8>,
        dispatch::<9>,
        dispatch::<10>,
        dispatch::<11>,
        dispatch::<12>,
        dispatch::<13>,
        dispatch::<14>,
        dispatch::<15>,
        dispatch::<16>,
        dispatch::<17>,
        dispatch::<18>,
        dispatch::<19>,
        dispatch::<20>,
    ];

    fn core(&self) -> &RendererCore {
        forward!(self, renderer => renderer.core())
    }

    fn name(&self) -> &'static str {
        forward!(self, renderer => renderer.name())
    }

    fn is_debug_enabled(&self) -> bool {
        forward!(self, renderer => renderer.is_debug_enabled())
    }

    fn create_render_pass(
        &self,
        color_attachment_formats: &[TextureFormat],
        depth_stencil_attachment_format: Option<TextureFormat>,
        number_of_multisamples: u32,
    ) -> Option<Arc<RenderPass>> {
        forward!(self, renderer => renderer.create_render_pass(
            color_attachment_formats,
            depth_stencil_attachment_format,
            number_of_multisamples,
        ))
    }

    fn create_swap_chain(
        &self,
        render_pass: &Arc<RenderPass>,
        window: SwapChainWindow,
    ) -> Option<Arc<SwapChain>> {
        forward!(self, renderer => renderer.create_swap_chain(render_pass, window))
    }

    fn create_framebuffer(
        &self,
        render_pass: &Arc<RenderPass>,
        color_attachments: &[FramebufferAttachment],
        depth_stencil_attachment: Option<&FramebufferAttachment>,
    ) -> Option<Arc<Framebuffer>> {
        forward!(self, renderer => renderer.create_framebuffer(
            render_pass,
            color_attachments,
            depth_stencil_attachment,
        ))
    }

    fn create_buffer_manager(&self) -> Arc<dyn BufferManager> {
        forward!(self, renderer => renderer.create_buffer_manager())
    }

    fn create_texture_manager(&self) -> Arc<dyn TextureManager> {
        forward!(self, renderer => renderer.create_texture_manager())
    }

    fn create_root_signature(
        &self,
        descriptor: &RootSignatureDescriptor,
    ) -> Option<Arc<RootSignature>> {
        forward!(self, renderer => renderer.create_root_signature(descriptor))
    }

    fn create_resource_group(
        &self,
        root_signature: &Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
    ) -> Option<Arc<ResourceGroup>> {
        forward!(self, renderer => renderer.create_resource_group(
            root_signature,
            root_parameter_index,
            resources,
            sampler_states,
        ))
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor,
    ) -> Option<Arc<GraphicsPipelineState>> {
        forward!(self, renderer => renderer.create_graphics_pipeline_state(descriptor))
    }

    fn create_compute_pipeline_state(
        &self,
        root_signature: &Arc<RootSignature>,
        compute_shader: &Arc<ComputeShader>,
    ) -> Option<Arc<ComputePipelineState>> {
        forward!(self, renderer => renderer.create_compute_pipeline_state(root_signature, compute_shader))
    }

    fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> Option<Arc<SamplerState>> {
        forward!(self, renderer => renderer.create_sampler_state(descriptor))
    }

    fn shader_language(&self, name: Option<&str>) -> Option<Arc<dyn ShaderLanguage>> {
        forward!(self, renderer => renderer.shader_language(name))
    }

    fn map(
        &mut self,
        resource: &Resource,
        subresource: u32,
        map_type: MapType,
    ) -> Option<MappedSubresource> {
        forward!(self, renderer => renderer.map(resource, subresource, map_type))
    }

    fn unmap(&mut self, resource: &Resource, subresource: u32) {
        forward!(self, renderer => renderer.unmap(resource, subresource))
    }

    fn begin_scene(&mut self) -> bool {
        forward!(self, renderer => renderer.begin_scene())
    }

    fn end_scene(&mut self) {
        forward!(self, renderer => renderer.end_scene())
    }

    fn submit_command_buffer(&mut self, command_buffer: &CommandBuffer) {
        forward!(self, renderer => renderer.submit_command_buffer(command_buffer))
    }

    fn flush(&mut self) {
        forward!(self, renderer => renderer.flush())
    }

    fn finish(&mut self) {
        forward!(self, renderer => renderer.finish())
    }

    fn set_graphics_root_signature(&mut self, root_signature: Option<&Arc<RootSignature>>) {
        forward!(self, renderer => renderer.set_graphics_root_signature(root_signature))
    }

    fn set_graphics_pipeline_state(
        &mut self,
        graphics_pipeline_state: Option<&Arc<GraphicsPipelineState>>,
    ) {
        forward!(self, renderer => renderer.set_graphics_pipeline_state(graphics_pipeline_state))
    }

    fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    ) {
        forward!(self, renderer => renderer.set_graphics_resource_group(root_parameter_index, resource_group))
    }

    fn set_graphics_vertex_array(&mut self, vertex_array: Option<&Arc<VertexArray>>) {
        forward!(self, renderer => renderer.set_graphics_vertex_array(vertex_array))
    }

    fn set_graphics_viewports(&mut self, viewports: &[Viewport]) {
        forward!(self, renderer => renderer.set_graphics_viewports(viewports))
    }

    fn set_graphics_scissor_rectangles(&mut self, scissor_rectangles: &[ScissorRectangle]) {
        forward!(self, renderer => renderer.set_graphics_scissor_rectangles(scissor_rectangles))
    }

    fn set_graphics_render_target(&mut self, render_target: Option<&RenderTarget>) {
        forward!(self, renderer => renderer.set_graphics_render_target(render_target))
    }

    fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32) {
        forward!(self, renderer => renderer.clear_graphics(flags, color, z, stencil))
    }

    fn draw_graphics(&mut self, arguments: &[DrawArguments]) {
        forward!(self, renderer => renderer.draw_graphics(arguments))
    }

    fn draw_indexed_graphics(&mut self, arguments: &[DrawIndexedArguments]) {
        forward!(self, renderer => renderer.draw_indexed_graphics(arguments))
    }

    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: &Texture,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) {
        forward!(self, renderer => renderer.set_texture_minimum_maximum_mipmap_index(
            texture,
            minimum_mipmap_index,
            maximum_mipmap_index,
        ))
    }

    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: &RenderTarget,
        source_multisample_framebuffer: &Arc<Framebuffer>,
    ) {
        forward!(self, renderer => renderer.resolve_multisample_framebuffer(
            destination_render_target,
            source_multisample_framebuffer,
        ))
    }

    fn copy_resource(&mut self, destination_resource: &Resource, source_resource: &Resource) {
        forward!(self, renderer => renderer.copy_resource(destination_resource, source_resource))
    }

    fn set_debug_marker(&mut self, name: &str) {
        forward!(self, renderer => renderer.set_debug_marker(name))
    }

    fn begin_debug_event(&mut self, name: &str) {
        forward!(self, renderer => renderer.begin_debug_event(name))
    }

    fn end_debug_event(&mut self) {
        forward!(self, renderer => renderer.end_debug_event())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandDispatchFunctionIndex, DrawGraphics, SetDebugMarker};

    #[test]
    fn test_create_null_renderer_by_name() {
        let renderer = create_renderer(Some("NULL"), Context::new()).unwrap();
        assert_eq!(renderer.name(), "Null");
        assert!(renderer.as_null().is_some());
    }

    #[test]
    fn test_unknown_backend_is_an_error() {
        let error = create_renderer(Some("Direct3D12"), Context::new()).unwrap_err();
        assert!(matches!(error, RendererError::UnknownBackend(name) if name == "Direct3D12"));
    }

    #[test]
    fn test_submission_runs_the_backend_table() {
        let mut renderer = create_renderer(Some("Null"), Context::new()).unwrap();
        let mut command_buffer = CommandBuffer::new();
        SetDebugMarker::create(&mut command_buffer, "marker");
        DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1)]);

        assert!(renderer.begin_scene());
        renderer.submit_command_buffer(&command_buffer);
        renderer.end_scene();

        let null = renderer.as_null().unwrap();
        assert_eq!(
            null.executed_commands(),
            &[CommandDispatchFunctionIndex::SetDebugMarker, CommandDispatchFunctionIndex::DrawGraphics]
        );
        assert_eq!(renderer.statistics().number_of_draw_calls(), 1);
    }
}
