//! OpenGL ES 3 backend.
//!
//! EGL and the GLES library are linked at runtime. Every native call goes
//! through a [`GlFunctions`] table, so the backend runs on a real driver
//! ([`GlowFunctions`]) or headless on [`RecordingFunctions`].
//!
//! # Emulation
//!
//! Features missing from core OpenGL ES 3 are emulated:
//!
//! - indirect draws are CPU loops over the indirect buffer bytes
//! - base instance goes through the `drawIdUniform` uniform without
//!   `GL_EXT_base_instance`
//! - texture buffers become uniform buffers without `GL_EXT_texture_buffer`
//! - 1D textures are 2D textures of height one
//! - viewports and scissor rectangles are flipped to the lower-left origin

mod buffer_manager;
mod conversion;
mod device;
mod egl_context;
mod extensions;
pub mod functions;
mod glow_functions;
mod recording;
mod resources;
mod runtime_linking;
mod shader_language;
mod texture_manager;

use std::sync::Arc;

use crate::command::{self, CommandBuffer, CommandPacket, DispatchTable};
use crate::context::Context;
use crate::error::RendererError;
use crate::renderer::{Renderer, RendererCore};
use crate::renderer_assert;
use crate::resources::{
    BufferManager, Framebuffer, FramebufferAttachment, GraphicsPipelineState,
    GraphicsPipelineStateDescriptor, RenderPass, RenderTarget, RendererResource, Resource,
    ResourceGroup, ResourceType, RootSignature, SamplerState, ShaderLanguage, SwapChain,
    SwapChainWindow, Texture, TextureManager, VertexArray,
};
use crate::types::{
    ClearFlags, DrawArguments, DrawIndexedArguments, MapType, MappedSubresource,
    PrimitiveTopology, SamplerStateDescriptor, ScissorRectangle, TextureAddressMode,
    TextureFormat, Viewport,
};

use super::{NativeFramebuffer, NativePipelineState, NativeSampler, NativeSwapChain};

use self::buffer_manager::Gles3BufferManager;
use self::conversion::{
    convert_address_mode, convert_comparison_func, convert_filter_mode,
    convert_index_buffer_format, convert_map_type, convert_pipeline_state,
    convert_primitive_topology, framebuffer_status_message, texture_target,
};
use self::device::Gles3Device;
use self::egl_context::EglContext;
use self::functions::*;
use self::runtime_linking::RuntimeLinking;
use self::shader_language::Gles3ShaderLanguage;
use self::texture_manager::Gles3TextureManager;

pub use self::extensions::Extensions;
pub use self::glow_functions::GlowFunctions;
pub use self::recording::{GlCall, RecordingFunctions};
pub use self::resources::{
    GlBlendState, GlObject, GlObjectKind, GlPipelineState, GlProgram, GlSwapChain, GlTexture,
    GlTextureBuffer,
};
pub use self::shader_language::{DRAW_ID_UNIFORM_NAME, NAME as SHADER_LANGUAGE_NAME};

/// Name of the OpenGL ES 3 backend.
pub const NAME: &str = "OpenGLES3";

/// Name of the debug event wrapping an emulated multi-draw.
const MULTI_DRAW_EVENT_NAME: &str = "Multi-draw-indirect emulation";

// ============================================================================
// Configuration
// ============================================================================

/// Creation options of the OpenGL ES 3 renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Gles3Config {
    /// Color format requested from the EGL config.
    pub preferred_color_format: TextureFormat,
    /// Depth format requested from the EGL config, `None` for no depth buffer.
    pub preferred_depth_stencil_format: Option<TextureFormat>,
    /// Multisample count of window surfaces.
    pub number_of_multisamples: u32,
    /// Request a `KHR_debug` context.
    pub debug_context: bool,
    /// EGL library to load instead of the platform default.
    pub egl_library: Option<String>,
}

impl Default for Gles3Config {
    fn default() -> Self {
        Self {
            preferred_color_format: TextureFormat::R8G8B8A8,
            preferred_depth_stencil_format: Some(TextureFormat::D32Float),
            number_of_multisamples: 1,
            debug_context: cfg!(debug_assertions),
            egl_library: None,
        }
    }
}

impl Gles3Config {
    pub fn with_preferred_color_format(mut self, format: TextureFormat) -> Self {
        self.preferred_color_format = format;
        self
    }

    pub fn with_preferred_depth_stencil_format(mut self, format: Option<TextureFormat>) -> Self {
        self.preferred_depth_stencil_format = format;
        self
    }

    pub fn with_multisamples(mut self, number_of_multisamples: u32) -> Self {
        self.number_of_multisamples = number_of_multisamples.max(1);
        self
    }

    pub fn with_debug_context(mut self, debug_context: bool) -> Self {
        self.debug_context = debug_context;
        self
    }

    pub fn with_egl_library(mut self, path: impl Into<String>) -> Self {
        self.egl_library = Some(path.into());
        self
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// The OpenGL ES 3 renderer.
///
/// Holds a cache of the current bindings; native binds that would not change
/// anything are skipped.
pub struct Gles3Renderer {
    device: Arc<Gles3Device>,
    shader_language: Arc<Gles3ShaderLanguage>,
    debug_enabled: bool,

    graphics_root_signature: Option<Arc<RootSignature>>,
    graphics_pipeline_state: Option<Arc<GraphicsPipelineState>>,
    vertex_array: Option<Arc<VertexArray>>,
    render_target: Option<RenderTarget>,

    /// Program in use, zero for none.
    program: u32,
    draw_id_uniform_location: i32,
    /// Start instance last uploaded to `drawIdUniform`.
    draw_id: u32,
    primitive_mode: u32,
    index_type: u32,
    bytes_per_index: u32,
    scissor_test: bool,
    depth_mask: bool,
    /// Front face of the bound pipeline, before any clip origin inversion.
    front_face: u32,
    /// Clip control origin in effect, zero without `GL_EXT_clip_control`.
    clip_origin: u32,

    in_scene: bool,
    debug_event_depth: u32,
}

impl Gles3Renderer {
    /// Create a renderer with the default configuration.
    pub fn new(context: Context) -> Result<Self, RendererError> {
        Self::with_config(context, Gles3Config::default())
    }

    /// Load EGL and GLES, create a context unless the application provides
    /// one, and create the renderer.
    pub fn with_config(context: Context, config: Gles3Config) -> Result<Self, RendererError> {
        let linking = Arc::new(RuntimeLinking::load(config.egl_library.as_deref())?);
        let egl = if context.use_external_context() {
            log::info!("Using the current external OpenGL ES context");
            None
        } else {
            Some(Arc::new(EglContext::new(
                linking.clone(),
                context.native_window(),
                &config,
            )?))
        };
        // SAFETY: the context created above is current on this thread; an
        // external context must be current by contract of `use_external_context`.
        let gl = unsafe { GlowFunctions::from_runtime_linking(linking)? };
        let version = gl.get_string(glow::VERSION);
        if !version.starts_with("OpenGL ES 3") {
            return Err(RendererError::FeatureNotSupported(format!(
                "OpenGL ES 3 is required, the context reports {version:?}"
            )));
        }
        Ok(Self::from_device(Gles3Device::new(context, Arc::new(gl), egl, &config), &config))
    }

    /// Create a renderer on an existing function table, without EGL.
    ///
    /// The context behind `gl` must be current. Used with
    /// [`RecordingFunctions`] to run the backend headless.
    pub fn with_functions(context: Context, gl: Arc<dyn GlFunctions>) -> Self {
        Self::with_functions_and_config(context, gl, &Gles3Config::default())
    }

    /// Like [`with_functions`](Self::with_functions) with an explicit configuration.
    pub fn with_functions_and_config(
        context: Context,
        gl: Arc<dyn GlFunctions>,
        config: &Gles3Config,
    ) -> Self {
        Self::from_device(Gles3Device::new(context, gl, None, config), config)
    }

    fn from_device(device: Gles3Device, config: &Gles3Config) -> Self {
        let debug_enabled = config.debug_context && device.extensions.khr_debug;
        let clip_origin = if device.extensions.clip_control {
            UPPER_LEFT_EXT
        } else {
            0
        };
        let device = Arc::new(device);
        log::info!("Created {NAME} renderer {:?}", device.core.id());
        Self {
            shader_language: Arc::new(Gles3ShaderLanguage::new(device.clone())),
            device,
            debug_enabled,
            graphics_root_signature: None,
            graphics_pipeline_state: None,
            vertex_array: None,
            render_target: None,
            program: 0,
            draw_id_uniform_location: -1,
            draw_id: u32::MAX,
            primitive_mode: glow::TRIANGLES,
            index_type: glow::UNSIGNED_SHORT,
            bytes_per_index: 2,
            scissor_test: false,
            depth_mask: true,
            front_face: glow::CCW,
            clip_origin,
            in_scene: false,
            debug_event_depth: 0,
        }
    }

    /// Detected extensions.
    pub fn extensions(&self) -> &Extensions {
        &self.device.extensions
    }

    /// Currently bound graphics root signature.
    pub fn graphics_root_signature(&self) -> Option<&Arc<RootSignature>> {
        self.graphics_root_signature.as_ref()
    }

    /// Currently bound render target.
    pub fn render_target(&self) -> Option<&RenderTarget> {
        self.render_target.as_ref()
    }

    fn gl(&self) -> &dyn GlFunctions {
        self.device.gl.as_ref()
    }

    fn core_owns_optional<T: RendererResource>(&self, resource: Option<&Arc<T>>) -> bool {
        resource.map_or(true, |resource| self.device.core.owns(resource.header()))
    }

    fn set_capability(&self, capability: u32, enabled: bool) {
        if enabled {
            self.gl().enable(capability);
        } else {
            self.gl().disable(capability);
        }
    }

    /// Height of the current render target, one without a target.
    fn render_target_height(&self) -> u32 {
        self.render_target
            .as_ref()
            .map_or(1, |render_target| render_target.width_and_height().1)
    }

    /// Front face to hand to GL. An upper left clip origin mirrors the
    /// window space winding.
    fn native_front_face(&self) -> u32 {
        match (self.clip_origin, self.front_face) {
            (UPPER_LEFT_EXT, glow::CCW) => glow::CW,
            (UPPER_LEFT_EXT, _) => glow::CCW,
            (_, front_face) => front_face,
        }
    }

    /// Swap chains present with a lower left origin, framebuffers are sampled
    /// as textures and keep the upper left one.
    fn update_clip_origin(&mut self, render_target: Option<&RenderTarget>) {
        if !self.device.extensions.clip_control {
            return;
        }
        let origin = match render_target {
            Some(RenderTarget::SwapChain(_)) => LOWER_LEFT_EXT,
            Some(RenderTarget::Framebuffer(_)) => UPPER_LEFT_EXT,
            None => return,
        };
        if origin == self.clip_origin {
            return;
        }
        self.clip_origin = origin;
        let gl = self.gl();
        gl.clip_control(origin, ZERO_TO_ONE_EXT);
        gl.front_face(self.native_front_face());
    }

    fn use_program(&mut self, program: &GlProgram) {
        if self.program != program.name() {
            self.gl().use_program(program.name());
            self.program = program.name();
            self.draw_id_uniform_location = program.draw_id_uniform_location();
            self.draw_id = u32::MAX;
        }
    }

    /// Upload the start instance to `drawIdUniform` when it changed.
    fn update_draw_id(&mut self, start_instance_location: u32) {
        if self.draw_id_uniform_location >= 0 && self.draw_id != start_instance_location {
            self.gl()
                .uniform_1_u32(self.draw_id_uniform_location, start_instance_location);
            self.draw_id = start_instance_location;
        }
    }

    fn apply_pipeline_state(&mut self, state: &GlPipelineState) {
        let gl = self.device.gl.clone();
        self.primitive_mode = state.primitive_mode;

        match state.cull_face {
            Some(mode) => {
                gl.enable(glow::CULL_FACE);
                gl.cull_face(mode);
            }
            None => gl.disable(glow::CULL_FACE),
        }
        self.front_face = state.front_face;
        gl.front_face(self.native_front_face());
        match state.polygon_offset {
            Some((factor, units)) => {
                gl.enable(glow::POLYGON_OFFSET_FILL);
                gl.polygon_offset(factor, units);
            }
            None => gl.disable(glow::POLYGON_OFFSET_FILL),
        }

        self.set_capability(glow::SCISSOR_TEST, state.scissor_test);
        self.scissor_test = state.scissor_test;
        self.set_capability(glow::DEPTH_TEST, state.depth_test);
        gl.depth_func(state.depth_func);
        gl.depth_mask(state.depth_mask);
        self.depth_mask = state.depth_mask;

        match &state.blend {
            Some(blend) => {
                gl.enable(glow::BLEND);
                gl.blend_func_separate(
                    blend.source_rgb,
                    blend.destination_rgb,
                    blend.source_alpha,
                    blend.destination_alpha,
                );
                gl.blend_equation_separate(blend.equation_rgb, blend.equation_alpha);
            }
            None => gl.disable(glow::BLEND),
        }
        let [red, green, blue, alpha] = state.color_mask;
        gl.color_mask(red, green, blue, alpha);
    }

    /// Regenerate the mipmaps of framebuffer textures flagged for it.
    fn generate_framebuffer_mipmaps(&self, framebuffer: &Framebuffer) {
        let gl = self.gl();
        for attachment in framebuffer.color_attachments() {
            if !attachment
                .texture
                .flags()
                .contains(crate::types::TextureFlags::GENERATE_MIPMAPS)
            {
                continue;
            }
            let (Some(native), Some((target, binding_query))) = (
                attachment.texture.native().gles3(),
                texture_target(attachment.texture.resource_type()),
            ) else {
                continue;
            };
            if native.is_renderbuffer() {
                continue;
            }
            let previous = self.device.bound(binding_query);
            gl.bind_texture(target, native.name());
            gl.generate_mipmap(target);
            gl.bind_texture(target, previous);
        }
    }

    /// Attach a texture level to the framebuffer bound at `GL_FRAMEBUFFER`.
    fn attach(&self, attachment_point: u32, attachment: &FramebufferAttachment) -> bool {
        let Some(native) = attachment.texture.native().gles3() else {
            log::error!("Framebuffer attachment has no OpenGL ES texture");
            return false;
        };
        let gl = self.gl();
        let level = attachment.mipmap_index as i32;
        if native.is_renderbuffer() {
            gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, attachment_point, native.name());
            return true;
        }
        match attachment.texture.resource_type() {
            ResourceType::Texture2DArray | ResourceType::Texture3D => gl.framebuffer_texture_layer(
                glow::FRAMEBUFFER,
                attachment_point,
                native.name(),
                level,
                attachment.layer_index as i32,
            ),
            ResourceType::TextureCube => gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_point,
                glow::TEXTURE_CUBE_MAP_POSITIVE_X + attachment.layer_index,
                native.name(),
                level,
            ),
            _ => gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                attachment_point,
                glow::TEXTURE_2D,
                native.name(),
                level,
            ),
        }
        true
    }

    fn map_buffer(&self, name: u32, size: u32, map_type: MapType) -> Option<MappedSubresource> {
        let gl = self.gl();
        let previous = self.device.bound(glow::COPY_WRITE_BUFFER_BINDING);
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, name);
        let pointer = gl.map_buffer_range(glow::COPY_WRITE_BUFFER, 0, size as i32, convert_map_type(map_type));
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, previous);
        match std::ptr::NonNull::new(pointer) {
            // SAFETY: the driver keeps `size` bytes mapped until `unmap`.
            Some(pointer) => Some(unsafe { MappedSubresource::new(pointer, size as usize, size, size) }),
            None => {
                log::error!("glMapBufferRange failed for buffer {name}");
                None
            }
        }
    }

    fn unmap_buffer(&self, name: u32) {
        let gl = self.gl();
        let previous = self.device.bound(glow::COPY_WRITE_BUFFER_BINDING);
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, name);
        gl.unmap_buffer(glow::COPY_WRITE_BUFFER);
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, previous);
    }

    /// Bind the resources of a group to the units and blocks of its ranges.
    fn bind_resource_group(&self, root_parameter_index: u32, resource_group: &ResourceGroup) {
        let gl = self.gl();
        let Some(parameter) = resource_group.root_signature().parameter(root_parameter_index) else {
            return;
        };
        let ranges = parameter.descriptor_ranges();
        for (index, (resource, range)) in resource_group.resources().iter().zip(ranges).enumerate() {
            let unit = range.base_shader_register;
            match resource {
                Resource::UniformBuffer(buffer) => {
                    let (Some(binding), Some(native)) = (
                        resource_group.uniform_block_binding_index(index),
                        buffer.native().gles3(),
                    ) else {
                        continue;
                    };
                    gl.bind_buffer_base(glow::UNIFORM_BUFFER, binding, native.name());
                }
                Resource::TextureBuffer(buffer) => {
                    let Some(native) = buffer.native().gles3() else {
                        continue;
                    };
                    if let Some(binding) = resource_group.uniform_block_binding_index(index) {
                        gl.bind_buffer_base(glow::UNIFORM_BUFFER, binding, native.buffer());
                    } else if let Some(texture) = native.texture() {
                        gl.active_texture(glow::TEXTURE0 + unit);
                        gl.bind_texture(TEXTURE_BUFFER_EXT, texture);
                    } else {
                        log::error!(
                            "Texture buffer {:?} is emulated but its range is no uniform block",
                            range.base_shader_register_name
                        );
                    }
                }
                Resource::SamplerState(sampler) => {
                    if let Some(native) = sampler.native().gles3() {
                        gl.bind_sampler(unit, native.name());
                    }
                }
                _ => {
                    let Some(texture) = resource.as_texture() else {
                        log::error!(
                            "{:?} cannot be bound through a resource group",
                            resource.resource_type()
                        );
                        continue;
                    };
                    let Some(native) = texture.native().gles3() else {
                        continue;
                    };
                    if native.is_renderbuffer() {
                        log::error!("Multisample textures cannot be sampled, resolve them first");
                        continue;
                    }
                    gl.active_texture(glow::TEXTURE0 + unit);
                    gl.bind_texture(native.target(), native.name());
                    let sampler = resource_group
                        .sampler_states()
                        .get(index)
                        .and_then(Option::as_ref)
                        .and_then(|sampler| sampler.native().gles3());
                    if let Some(sampler) = sampler {
                        gl.bind_sampler(unit, sampler.name());
                    }
                }
            }
        }
    }

    /// Blit between two temporary framebuffers viewing texture level zero.
    fn copy_texture(&self, destination: &Texture, source: &Texture) {
        let (Some(destination_native), Some(source_native)) =
            (destination.native().gles3(), source.native().gles3())
        else {
            return;
        };
        let (width, height) = (source.width(0), source.height(0));
        if !renderer_assert!(
            self.device.core.context(),
            (destination.width(0), destination.height(0)) == (width, height)
                && destination.format() == source.format(),
            "Copied textures must share size and format"
        ) {
            return;
        }

        let gl = self.device.gl.clone();
        let attachment_point = if source.format().is_depth() {
            glow::DEPTH_ATTACHMENT
        } else {
            glow::COLOR_ATTACHMENT0
        };
        let mask = if source.format().is_depth() {
            glow::DEPTH_BUFFER_BIT
        } else {
            glow::COLOR_BUFFER_BIT
        };
        let previous_read = self.device.bound(glow::READ_FRAMEBUFFER_BINDING);
        let previous_draw = self.device.bound(glow::DRAW_FRAMEBUFFER_BINDING);

        let read = GlObject::new(gl.clone(), GlObjectKind::Framebuffer, gl.create_framebuffer());
        let draw = GlObject::new(gl.clone(), GlObjectKind::Framebuffer, gl.create_framebuffer());
        for (framebuffer, native) in [(&read, source_native), (&draw, destination_native)] {
            gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.name());
            if native.is_renderbuffer() {
                gl.framebuffer_renderbuffer(glow::FRAMEBUFFER, attachment_point, native.name());
            } else {
                gl.framebuffer_texture_2d(glow::FRAMEBUFFER, attachment_point, native.target(), native.name(), 0);
            }
        }
        gl.bind_framebuffer(glow::READ_FRAMEBUFFER, read.name());
        gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, draw.name());
        let rectangle = [0, 0, width as i32, height as i32];
        gl.blit_framebuffer(rectangle, rectangle, mask, glow::NEAREST);
        gl.bind_framebuffer(glow::READ_FRAMEBUFFER, previous_read);
        gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, previous_draw);
    }
}

impl std::fmt::Debug for Gles3Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gles3Renderer")
            .field("device", &self.device)
            .field("program", &self.program)
            .field("in_scene", &self.in_scene)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Dispatch
// ============================================================================

fn compute_unsupported(command: &str) {
    log::error!("OpenGL ES 3 renderer has no compute support, ignoring {command}");
}

fn set_compute_root_signature(_: &CommandBuffer, _: &CommandPacket<'_>, _: &mut Gles3Renderer) {
    compute_unsupported("SetComputeRootSignature");
}

fn set_compute_pipeline_state(_: &CommandBuffer, _: &CommandPacket<'_>, _: &mut Gles3Renderer) {
    compute_unsupported("SetComputePipelineState");
}

fn set_compute_resource_group(_: &CommandBuffer, _: &CommandPacket<'_>, _: &mut Gles3Renderer) {
    compute_unsupported("SetComputeResourceGroup");
}

fn dispatch_compute(_: &CommandBuffer, _: &CommandPacket<'_>, _: &mut Gles3Renderer) {
    compute_unsupported("DispatchCompute");
}

impl Renderer for Gles3Renderer {
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
        &self.device.core
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn is_debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    // ------------------------------------------------------------------------
    // Factories
    // ------------------------------------------------------------------------

    fn create_swap_chain(
        &self,
        render_pass: &Arc<RenderPass>,
        window: SwapChainWindow,
    ) -> Option<Arc<SwapChain>> {
        if !self.device.core.owns(render_pass.header()) {
            return None;
        }
        let (native, render_window) = match window {
            SwapChainWindow::Native(window) => match &self.device.egl {
                Some(egl) => (GlSwapChain::with_surface(egl.create_window_surface(&window)?), None),
                None => {
                    log::debug!("No EGL context, the application presents the swap chain");
                    (GlSwapChain::external(self.device.gl.clone()), None)
                }
            },
            SwapChainWindow::Render(render_window) => {
                let (width, height) = render_window.width_and_height();
                (GlSwapChain::headless(width, height), Some(render_window))
            }
        };
        log::trace!("Created swap chain {native:?}");
        Some(Arc::new(SwapChain::new(
            self.device.core.header(ResourceType::SwapChain),
            render_pass.clone(),
            render_window,
            NativeSwapChain::Gles3(native),
        )))
    }

    fn create_framebuffer(
        &self,
        render_pass: &Arc<RenderPass>,
        color_attachments: &[FramebufferAttachment],
        depth_stencil_attachment: Option<&FramebufferAttachment>,
    ) -> Option<Arc<Framebuffer>> {
        let (width, height) = self.device.core.validate_framebuffer(
            render_pass,
            color_attachments,
            depth_stencil_attachment,
        )?;
        let gl = self.device.gl.clone();
        let name = gl.create_framebuffer();
        if name == 0 {
            log::error!("glGenFramebuffers returned no framebuffer");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Framebuffer, name);
        let previous = self.device.bound(glow::FRAMEBUFFER_BINDING);
        gl.bind_framebuffer(glow::FRAMEBUFFER, name);

        let mut attached = true;
        let mut draw_buffers = Vec::with_capacity(color_attachments.len());
        for (index, attachment) in color_attachments.iter().enumerate() {
            let attachment_point = glow::COLOR_ATTACHMENT0 + index as u32;
            attached &= self.attach(attachment_point, attachment);
            draw_buffers.push(attachment_point);
        }
        if let Some(attachment) = depth_stencil_attachment {
            attached &= self.attach(glow::DEPTH_ATTACHMENT, attachment);
        }
        if draw_buffers.is_empty() {
            gl.draw_buffers(&[glow::NONE]);
        } else {
            gl.draw_buffers(&draw_buffers);
        }
        let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);
        gl.bind_framebuffer(glow::FRAMEBUFFER, previous);

        if !attached {
            return None;
        }
        if status != glow::FRAMEBUFFER_COMPLETE {
            log::error!("Incomplete framebuffer: {}", framebuffer_status_message(status));
            return None;
        }
        log::trace!("Created framebuffer {name} of {width}x{height}");
        Some(Arc::new(Framebuffer::new(
            self.device.core.header(ResourceType::Framebuffer),
            render_pass.clone(),
            color_attachments.to_vec(),
            depth_stencil_attachment.cloned(),
            width,
            height,
            NativeFramebuffer::Gles3(object),
        )))
    }

    fn create_buffer_manager(&self) -> Arc<dyn BufferManager> {
        Arc::new(Gles3BufferManager::new(self.device.clone()))
    }

    fn create_texture_manager(&self) -> Arc<dyn TextureManager> {
        Arc::new(Gles3TextureManager::new(self.device.clone()))
    }

    fn create_resource_group(
        &self,
        root_signature: &Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
    ) -> Option<Arc<ResourceGroup>> {
        self.device.core.create_resource_group(
            root_signature,
            root_parameter_index,
            resources,
            sampler_states,
            self.device.texture_buffers_as_uniform_buffers(),
        )
    }

    fn create_graphics_pipeline_state(
        &self,
        descriptor: &GraphicsPipelineStateDescriptor,
    ) -> Option<Arc<GraphicsPipelineState>> {
        let core = &self.device.core;
        if !core.validate_graphics_pipeline_state(descriptor) {
            return None;
        }
        if descriptor.program.native().gles3().is_none() {
            log::error!("Graphics pipeline state program was not linked by OpenGL ES");
            return None;
        }
        if let PrimitiveTopology::PatchList(_) = descriptor.primitive_topology {
            if !renderer_assert!(
                core.context(),
                self.device.extensions.tessellation_shader,
                "Patch lists need GL_EXT_tessellation_shader"
            ) {
                return None;
            }
        }
        let Some(primitive_mode) = convert_primitive_topology(descriptor.primitive_topology) else {
            log::error!("Unsupported primitive topology {:?}", descriptor.primitive_topology);
            return None;
        };
        Some(Arc::new(GraphicsPipelineState::new(
            core.header(ResourceType::GraphicsPipelineState),
            descriptor.clone(),
            NativePipelineState::Gles3(convert_pipeline_state(descriptor, primitive_mode)),
        )))
    }

    fn create_sampler_state(
        &self,
        descriptor: &SamplerStateDescriptor,
    ) -> Option<Arc<SamplerState>> {
        let core = &self.device.core;
        let extensions = &self.device.extensions;
        let maximum_anisotropy = u32::from(core.capabilities().maximum_anisotropy);
        let filter = convert_filter_mode(descriptor.filter);
        renderer_assert!(
            core.context(),
            !filter.anisotropic || descriptor.max_anisotropy <= maximum_anisotropy,
            "Maximum anisotropy {} exceeds the supported {maximum_anisotropy}",
            descriptor.max_anisotropy
        );

        let gl = self.device.gl.clone();
        let name = gl.create_sampler();
        if name == 0 {
            log::error!("glGenSamplers returned no sampler");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Sampler, name);

        gl.sampler_parameter_i32(name, glow::TEXTURE_MIN_FILTER, filter.minification as i32);
        gl.sampler_parameter_i32(name, glow::TEXTURE_MAG_FILTER, filter.magnification as i32);
        gl.sampler_parameter_i32(name, glow::TEXTURE_WRAP_S, convert_address_mode(descriptor.address_u, extensions) as i32);
        gl.sampler_parameter_i32(name, glow::TEXTURE_WRAP_T, convert_address_mode(descriptor.address_v, extensions) as i32);
        gl.sampler_parameter_i32(name, glow::TEXTURE_WRAP_R, convert_address_mode(descriptor.address_w, extensions) as i32);
        gl.sampler_parameter_f32(name, glow::TEXTURE_MIN_LOD, descriptor.min_lod);
        gl.sampler_parameter_f32(name, glow::TEXTURE_MAX_LOD, descriptor.max_lod);
        if descriptor.mip_lod_bias != 0.0 {
            log::debug!("OpenGL ES samplers have no mip LOD bias, ignoring {}", descriptor.mip_lod_bias);
        }

        if filter.comparison {
            gl.sampler_parameter_i32(name, glow::TEXTURE_COMPARE_MODE, glow::COMPARE_REF_TO_TEXTURE as i32);
            gl.sampler_parameter_i32(
                name,
                glow::TEXTURE_COMPARE_FUNC,
                convert_comparison_func(descriptor.comparison_func) as i32,
            );
        }
        if filter.anisotropic && extensions.texture_filter_anisotropic {
            let anisotropy = descriptor.max_anisotropy.clamp(1, maximum_anisotropy.max(1));
            gl.sampler_parameter_f32(name, TEXTURE_MAX_ANISOTROPY_EXT, anisotropy as f32);
        }
        let uses_border = [descriptor.address_u, descriptor.address_v, descriptor.address_w]
            .contains(&TextureAddressMode::Border);
        if uses_border && extensions.texture_border_clamp {
            gl.sampler_parameter_f32_slice(name, TEXTURE_BORDER_COLOR_EXT, &descriptor.border_color);
        }

        log::trace!("Created sampler {name}");
        Some(Arc::new(SamplerState::new(
            core.header(ResourceType::SamplerState),
            descriptor.clone(),
            NativeSampler::Gles3(object),
        )))
    }

    fn shader_language(&self, name: Option<&str>) -> Option<Arc<dyn ShaderLanguage>> {
        match name {
            None | Some(SHADER_LANGUAGE_NAME) => Some(self.shader_language.clone() as Arc<dyn ShaderLanguage>),
            Some(_) => None,
        }
    }

    // ------------------------------------------------------------------------
    // Resource Access
    // ------------------------------------------------------------------------

    fn map(
        &mut self,
        resource: &Resource,
        _subresource: u32,
        map_type: MapType,
    ) -> Option<MappedSubresource> {
        if !self.device.core.owns(resource.header()) {
            return None;
        }
        let (name, size) = match resource {
            Resource::IndirectBuffer(buffer) => {
                let size = buffer.size();
                // SAFETY: the indirect buffer storage is `size` bytes of CPU
                // memory living as long as the buffer.
                return Some(unsafe { MappedSubresource::new(buffer.data_pointer(), size as usize, size, size) });
            }
            Resource::VertexBuffer(buffer) => (buffer.native().gles3()?.name(), buffer.size()),
            Resource::IndexBuffer(buffer) => (buffer.native().gles3()?.name(), buffer.size()),
            Resource::UniformBuffer(buffer) => (buffer.native().gles3()?.name(), buffer.size()),
            Resource::TextureBuffer(buffer) => (buffer.native().gles3()?.buffer(), buffer.size()),
            _ => {
                log::error!("{:?} cannot be mapped by OpenGL ES", resource.resource_type());
                return None;
            }
        };
        self.map_buffer(name, size, map_type)
    }

    fn unmap(&mut self, resource: &Resource, _subresource: u32) {
        if !self.device.core.owns(resource.header()) {
            return;
        }
        let name = match resource {
            Resource::VertexBuffer(buffer) => buffer.native().gles3().map(GlObject::name),
            Resource::IndexBuffer(buffer) => buffer.native().gles3().map(GlObject::name),
            Resource::UniformBuffer(buffer) => buffer.native().gles3().map(GlObject::name),
            Resource::TextureBuffer(buffer) => buffer.native().gles3().map(GlTextureBuffer::buffer),
            _ => None,
        };
        if let Some(name) = name {
            self.unmap_buffer(name);
        }
    }

    // ------------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------------

    fn begin_scene(&mut self) -> bool {
        if self.in_scene {
            log::warn!("begin_scene called twice without end_scene");
        }
        let current = self
            .device
            .egl
            .as_ref()
            .map_or(true, |egl| egl.make_current_default());
        self.in_scene = current;
        self.device.core.statistics().reset_frame();
        current
    }

    fn end_scene(&mut self) {
        if !self.in_scene {
            log::warn!("end_scene called without begin_scene");
        }
        self.in_scene = false;
        if self.debug_event_depth > 0 {
            log::warn!("{} debug events left open at the end of the scene", self.debug_event_depth);
        }
        self.set_graphics_render_target(None);
        self.graphics_root_signature = None;
        self.graphics_pipeline_state = None;
        self.vertex_array = None;
        // Forget the program so the next scene starts from a clean cache.
        self.program = 0;
        self.draw_id_uniform_location = -1;
        self.draw_id = u32::MAX;
    }

    fn flush(&mut self) {
        self.gl().flush();
    }

    fn finish(&mut self) {
        self.gl().finish();
    }

    // ------------------------------------------------------------------------
    // Graphics
    // ------------------------------------------------------------------------

    fn set_graphics_root_signature(&mut self, root_signature: Option<&Arc<RootSignature>>) {
        if self.core_owns_optional(root_signature) {
            self.graphics_root_signature = root_signature.cloned();
        }
    }

    fn set_graphics_pipeline_state(
        &mut self,
        graphics_pipeline_state: Option<&Arc<GraphicsPipelineState>>,
    ) {
        if !self.core_owns_optional(graphics_pipeline_state) {
            return;
        }
        let unchanged = match (&self.graphics_pipeline_state, graphics_pipeline_state) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        if let Some(pipeline_state) = graphics_pipeline_state {
            let (Some(state), Some(program)) = (
                pipeline_state.native().gles3(),
                pipeline_state.program().native().gles3(),
            ) else {
                log::error!("Graphics pipeline state has no OpenGL ES objects");
                return;
            };
            self.use_program(program);
            self.apply_pipeline_state(state);
        }
        self.graphics_pipeline_state = graphics_pipeline_state.cloned();
    }

    fn set_graphics_resource_group(
        &mut self,
        root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    ) {
        if !self.core_owns_optional(resource_group) {
            return;
        }
        let Some(resource_group) = resource_group else {
            return;
        };
        let context = self.device.core.context();
        let Some(root_signature) = &self.graphics_root_signature else {
            renderer_assert!(context, false, "No graphics root signature set");
            return;
        };
        if !renderer_assert!(
            context,
            Arc::ptr_eq(root_signature, resource_group.root_signature())
                && resource_group.root_parameter_index() == root_parameter_index,
            "Resource group was created for another root parameter than {root_parameter_index}"
        ) {
            return;
        }
        self.bind_resource_group(root_parameter_index, resource_group);
    }

    fn set_graphics_vertex_array(&mut self, vertex_array: Option<&Arc<VertexArray>>) {
        if !self.core_owns_optional(vertex_array) {
            return;
        }
        let unchanged = match (&self.vertex_array, vertex_array) {
            (Some(current), Some(new)) => Arc::ptr_eq(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        let name = vertex_array
            .and_then(|vertex_array| vertex_array.native().gles3())
            .map_or(0, GlObject::name);
        self.gl().bind_vertex_array(name);
        if let Some(index_buffer) = vertex_array.and_then(|vertex_array| vertex_array.index_buffer()) {
            self.index_type = convert_index_buffer_format(index_buffer.format());
            self.bytes_per_index = index_buffer.bytes_per_element();
        }
        self.vertex_array = vertex_array.cloned();
    }

    fn set_graphics_viewports(&mut self, viewports: &[Viewport]) {
        let Some(viewport) = viewports.first() else {
            return;
        };
        if viewports.len() > 1 {
            log::debug!("OpenGL ES supports a single viewport, ignoring {} more", viewports.len() - 1);
        }
        let height = self.render_target_height() as f32;
        let y = height - viewport.top_left_y - viewport.height;
        self.gl().viewport(
            viewport.top_left_x as i32,
            y as i32,
            viewport.width as i32,
            viewport.height as i32,
        );
        self.gl().depth_range(viewport.min_depth, viewport.max_depth);
    }

    fn set_graphics_scissor_rectangles(&mut self, scissor_rectangles: &[ScissorRectangle]) {
        let Some(rectangle) = scissor_rectangles.first() else {
            return;
        };
        if scissor_rectangles.len() > 1 {
            log::debug!(
                "OpenGL ES supports a single scissor rectangle, ignoring {} more",
                scissor_rectangles.len() - 1
            );
        }
        let height = self.render_target_height() as i32;
        self.gl().scissor(
            rectangle.top_left_x,
            height - rectangle.bottom_right_y,
            rectangle.width(),
            rectangle.height(),
        );
    }

    fn set_graphics_render_target(&mut self, render_target: Option<&RenderTarget>) {
        if let Some(render_target) = render_target {
            if !self.device.core.owns(render_target.header()) {
                return;
            }
        }
        let unchanged = match (&self.render_target, render_target) {
            (Some(current), Some(new)) => current.ptr_eq(new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        if let Some(RenderTarget::Framebuffer(previous)) = &self.render_target {
            if previous.generates_mipmaps() {
                self.generate_framebuffer_mipmaps(previous);
            }
        }
        match render_target {
            Some(RenderTarget::SwapChain(swap_chain)) => {
                if let Some(native) = swap_chain.native().gles3() {
                    if !native.make_current() {
                        log::error!("Could not make the swap chain surface current");
                    }
                }
                self.gl().bind_framebuffer(glow::FRAMEBUFFER, 0);
            }
            Some(RenderTarget::Framebuffer(framebuffer)) => {
                let name = framebuffer.native().gles3().map_or(0, GlObject::name);
                self.gl().bind_framebuffer(glow::FRAMEBUFFER, name);
            }
            None => self.gl().bind_framebuffer(glow::FRAMEBUFFER, 0),
        }
        self.update_clip_origin(render_target);
        self.render_target = render_target.cloned();
    }

    fn clear_graphics(&mut self, flags: ClearFlags, color: [f32; 4], z: f32, stencil: u32) {
        let gl = self.device.gl.clone();
        let mut mask = 0;
        if flags.contains(ClearFlags::COLOR) {
            gl.clear_color(color[0], color[1], color[2], color[3]);
            mask |= glow::COLOR_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::DEPTH) {
            gl.clear_depth(z);
            mask |= glow::DEPTH_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::STENCIL) {
            gl.clear_stencil(stencil as i32);
            mask |= glow::STENCIL_BUFFER_BIT;
        }
        if mask == 0 {
            return;
        }

        // Clears cover the whole render target.
        if self.scissor_test {
            gl.disable(glow::SCISSOR_TEST);
        }
        let force_depth_mask = flags.contains(ClearFlags::DEPTH) && !self.depth_mask;
        if force_depth_mask {
            gl.depth_mask(true);
        }
        gl.clear(mask);
        if self.scissor_test {
            gl.enable(glow::SCISSOR_TEST);
        }
        if force_depth_mask {
            gl.depth_mask(false);
        }
    }

    fn draw_graphics(&mut self, arguments: &[DrawArguments]) {
        if arguments.is_empty() {
            return;
        }
        let emulated = arguments.len() > 1;
        if emulated {
            self.begin_debug_event(MULTI_DRAW_EVENT_NAME);
        }
        let base_instance = self.device.extensions.base_instance;
        for draw in arguments {
            let gl = self.device.gl.clone();
            if draw.start_instance_location > 0 && base_instance {
                gl.draw_arrays_instanced_base_instance(
                    self.primitive_mode,
                    draw.start_vertex_location as i32,
                    draw.vertex_count_per_instance as i32,
                    draw.instance_count as i32,
                    draw.start_instance_location,
                );
            } else {
                self.update_draw_id(draw.start_instance_location);
                gl.draw_arrays_instanced(
                    self.primitive_mode,
                    draw.start_vertex_location as i32,
                    draw.vertex_count_per_instance as i32,
                    draw.instance_count as i32,
                );
            }
        }
        self.device
            .core
            .statistics()
            .draw_calls_issued(arguments.len() as u32);
        if emulated {
            self.end_debug_event();
        }
    }

    fn draw_indexed_graphics(&mut self, arguments: &[DrawIndexedArguments]) {
        if arguments.is_empty() {
            return;
        }
        let has_index_buffer = self
            .vertex_array
            .as_ref()
            .is_some_and(|vertex_array| vertex_array.index_buffer().is_some());
        if !renderer_assert!(
            self.device.core.context(),
            has_index_buffer,
            "Indexed draw without a vertex array holding an index buffer"
        ) {
            return;
        }

        let emulated = arguments.len() > 1;
        if emulated {
            self.begin_debug_event(MULTI_DRAW_EVENT_NAME);
        }
        let base_instance = self.device.extensions.base_instance;
        let base_vertex = self.device.extensions.draw_elements_base_vertex;
        let mut issued = 0;
        for draw in arguments {
            if draw.base_vertex_location != 0
                && !renderer_assert!(
                    self.device.core.context(),
                    base_vertex,
                    "Base vertex {} needs GL_EXT_draw_elements_base_vertex",
                    draw.base_vertex_location
                )
            {
                continue;
            }
            let gl = self.device.gl.clone();
            let Some(offset) = draw
                .start_index_location
                .checked_mul(self.bytes_per_index)
                .and_then(|offset| i32::try_from(offset).ok())
            else {
                log::error!(
                    "Start index location {} is outside of the index buffer range",
                    draw.start_index_location
                );
                continue;
            };
            let count = draw.index_count_per_instance as i32;
            let instances = draw.instance_count as i32;
            if draw.start_instance_location > 0 && base_instance {
                gl.draw_elements_instanced_base_vertex_base_instance(
                    self.primitive_mode,
                    count,
                    self.index_type,
                    offset,
                    instances,
                    draw.base_vertex_location,
                    draw.start_instance_location,
                );
            } else {
                self.update_draw_id(draw.start_instance_location);
                if draw.base_vertex_location != 0 {
                    gl.draw_elements_instanced_base_vertex(
                        self.primitive_mode,
                        count,
                        self.index_type,
                        offset,
                        instances,
                        draw.base_vertex_location,
                    );
                } else {
                    gl.draw_elements_instanced(self.primitive_mode, count, self.index_type, offset, instances);
                }
            }
            issued += 1;
        }
        self.device.core.statistics().draw_calls_issued(issued);
        if emulated {
            self.end_debug_event();
        }
    }

    // ------------------------------------------------------------------------
    // Resource Operations
    // ------------------------------------------------------------------------

    fn set_texture_minimum_maximum_mipmap_index(
        &mut self,
        texture: &Texture,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) {
        if !self.device.core.owns(texture.header()) {
            return;
        }
        let (Some(native), Some((target, binding_query))) =
            (texture.native().gles3(), texture_target(texture.resource_type()))
        else {
            return;
        };
        if native.is_renderbuffer() {
            log::debug!("Multisample textures have a single mipmap");
            return;
        }
        let gl = self.gl();
        let previous = self.device.bound(binding_query);
        gl.bind_texture(target, native.name());
        gl.tex_parameter_i32(target, glow::TEXTURE_BASE_LEVEL, minimum_mipmap_index as i32);
        gl.tex_parameter_i32(target, glow::TEXTURE_MAX_LEVEL, maximum_mipmap_index as i32);
        gl.bind_texture(target, previous);
    }

    fn resolve_multisample_framebuffer(
        &mut self,
        destination_render_target: &RenderTarget,
        source_multisample_framebuffer: &Arc<Framebuffer>,
    ) {
        let core = &self.device.core;
        if !core.owns(destination_render_target.header())
            || !core.owns(source_multisample_framebuffer.header())
        {
            return;
        }
        let Some(source) = source_multisample_framebuffer.native().gles3() else {
            return;
        };
        let destination = match destination_render_target {
            RenderTarget::SwapChain(_) => 0,
            RenderTarget::Framebuffer(framebuffer) => framebuffer.native().gles3().map_or(0, GlObject::name),
        };
        let (width, height) = source_multisample_framebuffer.width_and_height();
        let rectangle = [0, 0, width as i32, height as i32];

        let gl = self.gl();
        let previous_read = self.device.bound(glow::READ_FRAMEBUFFER_BINDING);
        let previous_draw = self.device.bound(glow::DRAW_FRAMEBUFFER_BINDING);
        gl.bind_framebuffer(glow::READ_FRAMEBUFFER, source.name());
        gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, destination);
        gl.blit_framebuffer(rectangle, rectangle, glow::COLOR_BUFFER_BIT, glow::NEAREST);
        gl.bind_framebuffer(glow::READ_FRAMEBUFFER, previous_read);
        gl.bind_framebuffer(glow::DRAW_FRAMEBUFFER, previous_draw);
    }

    fn copy_resource(&mut self, destination_resource: &Resource, source_resource: &Resource) {
        let core = &self.device.core;
        if !core.owns(destination_resource.header()) || !core.owns(source_resource.header()) {
            return;
        }
        match (destination_resource.as_texture(), source_resource.as_texture()) {
            (Some(destination), Some(source))
                if destination.resource_type() == ResourceType::Texture2D
                    && source.resource_type() == ResourceType::Texture2D =>
            {
                self.copy_texture(&destination, &source);
            }
            _ => log::error!(
                "OpenGL ES can only copy 2D textures, not {:?} to {:?}",
                source_resource.resource_type(),
                destination_resource.resource_type()
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Debug
    // ------------------------------------------------------------------------

    fn set_debug_marker(&mut self, name: &str) {
        if self.device.extensions.khr_debug {
            self.gl().debug_message_insert(
                DEBUG_SOURCE_APPLICATION_KHR,
                DEBUG_TYPE_MARKER_KHR,
                1,
                DEBUG_SEVERITY_NOTIFICATION_KHR,
                name,
            );
        }
    }

    fn begin_debug_event(&mut self, name: &str) {
        self.debug_event_depth += 1;
        if self.device.extensions.khr_debug {
            self.gl().push_debug_group(DEBUG_SOURCE_APPLICATION_KHR, 1, name);
        }
    }

    fn end_debug_event(&mut self) {
        if self.debug_event_depth == 0 {
            log::warn!("Debug event closed without being opened");
            return;
        }
        self.debug_event_depth -= 1;
        if self.device.extensions.khr_debug {
            self.gl().pop_debug_group();
        }
    }
}

static_assertions::assert_impl_all!(Gles3Renderer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandDispatchFunctionIndex;

    fn renderer(gl: &Arc<RecordingFunctions>) -> Gles3Renderer {
        Gles3Renderer::with_functions(Context::new(), gl.clone())
    }

    #[test]
    fn test_dispatch_table_covers_every_command() {
        assert_eq!(Gles3Renderer::DISPATCH_TABLE.len(), CommandDispatchFunctionIndex::COUNT);
    }

    #[test]
    fn test_compute_is_unsupported() {
        let gl = Arc::new(RecordingFunctions::new());
        let renderer = renderer(&gl);
        assert!(!renderer.capabilities().compute_shader);
        assert!(!renderer.capabilities().native_multithreading);
        assert!(renderer
            .shader_language(None)
            .and_then(|language| language.create_compute_shader_from_source_code(""))
            .is_none());
    }

    #[test]
    fn test_shader_language_lookup() {
        let gl = Arc::new(RecordingFunctions::new());
        let renderer = renderer(&gl);
        assert_eq!(renderer.name(), "OpenGLES3");
        assert!(renderer.is_shader_language_supported("GLSLES"));
        assert!(!renderer.is_shader_language_supported("HLSL"));
    }

    #[test]
    fn test_debug_events_need_khr_debug() {
        let gl = Arc::new(RecordingFunctions::new());
        let mut renderer = renderer(&gl);
        renderer.begin_debug_event("frame");
        renderer.set_debug_marker("marker");
        renderer.end_debug_event();
        assert_eq!(gl.count("push_debug_group"), 0);

        let gl = Arc::new(RecordingFunctions::new().with_extensions(&["GL_KHR_debug"]));
        let mut renderer = self::renderer(&gl);
        renderer.begin_debug_event("frame");
        renderer.set_debug_marker("marker");
        renderer.end_debug_event();
        renderer.end_debug_event();
        assert_eq!(gl.count("push_debug_group"), 1);
        assert_eq!(gl.count("debug_message_insert"), 1);
        assert_eq!(gl.count("pop_debug_group"), 1);
    }

    #[test]
    fn test_sampler_state_parameters() {
        let gl = Arc::new(RecordingFunctions::new());
        let renderer = renderer(&gl);
        let sampler = renderer
            .create_sampler_state(
                &SamplerStateDescriptor::new()
                    .with_filter(crate::types::FilterMode::ComparisonMinMagMipPoint)
                    .with_comparison(crate::types::ComparisonFunc::LessEqual)
                    .with_max_anisotropy(1),
            )
            .unwrap();
        assert!(sampler.native().gles3().is_some());
        let parameters: Vec<i64> = gl
            .calls_named("sampler_parameter_i32")
            .iter()
            .map(|call| call.arguments[1])
            .collect();
        assert!(parameters.contains(&i64::from(glow::TEXTURE_WRAP_R)));
        assert!(parameters.contains(&i64::from(glow::TEXTURE_COMPARE_FUNC)));
    }
}
