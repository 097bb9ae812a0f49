//! [`GlFunctions`] on top of `glow`.
//!
//! Core OpenGL ES 3 calls go through [`glow::Context`]. The extension entry
//! points glow does not expose for ES are resolved as raw function pointers
//! through the same loader and skipped when the driver lacks them.

use std::ffi::{c_char, c_void};
use std::num::NonZeroU32;
use std::sync::Arc;

use glow::HasContext;

use crate::error::RendererError;

use super::functions::*;
use super::runtime_linking::RuntimeLinking;

type TexBufferFn = unsafe extern "system" fn(u32, u32, u32);
type ClipControlFn = unsafe extern "system" fn(u32, u32);
type DrawArraysInstancedBaseInstanceFn = unsafe extern "system" fn(u32, i32, i32, i32, u32);
type DrawElementsInstancedBaseVertexFn =
    unsafe extern "system" fn(u32, i32, u32, *const c_void, i32, i32);
type DrawElementsInstancedBaseVertexBaseInstanceFn =
    unsafe extern "system" fn(u32, i32, u32, *const c_void, i32, i32, u32);
type DebugMessageInsertFn = unsafe extern "system" fn(u32, u32, u32, u32, i32, *const c_char);
type PushDebugGroupFn = unsafe extern "system" fn(u32, u32, i32, *const c_char);
type PopDebugGroupFn = unsafe extern "system" fn();

/// Entry points without which the backend cannot work.
const REQUIRED_ENTRY_POINTS: &[&str] = &[
    "glGetString",
    "glGetIntegerv",
    "glGenBuffers",
    "glBindBufferBase",
    "glMapBufferRange",
    "glGenVertexArrays",
    "glVertexAttribIPointer",
    "glVertexAttribDivisor",
    "glTexImage3D",
    "glGenSamplers",
    "glGenFramebuffers",
    "glBlitFramebuffer",
    "glRenderbufferStorageMultisample",
    "glDrawBuffers",
    "glCreateProgram",
    "glUniformBlockBinding",
    "glUniform1ui",
    "glDrawArraysInstanced",
    "glDrawElementsInstanced",
];

#[derive(Default)]
struct ExtensionFunctions {
    tex_buffer: Option<TexBufferFn>,
    clip_control: Option<ClipControlFn>,
    draw_arrays_instanced_base_instance: Option<DrawArraysInstancedBaseInstanceFn>,
    draw_elements_instanced_base_vertex: Option<DrawElementsInstancedBaseVertexFn>,
    draw_elements_instanced_base_vertex_base_instance:
        Option<DrawElementsInstancedBaseVertexBaseInstanceFn>,
    debug_message_insert: Option<DebugMessageInsertFn>,
    push_debug_group: Option<PushDebugGroupFn>,
    pop_debug_group: Option<PopDebugGroupFn>,
}

/// Resolve the first available name as a function pointer of type `F`.
///
/// # Safety
///
/// `F` must be an `extern "system"` function pointer type matching the
/// signature of every listed entry point.
unsafe fn load_function<F: Copy>(
    loader: &mut impl FnMut(&str) -> *const c_void,
    names: &[&str],
) -> Option<F> {
    debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const c_void>());
    names.iter().find_map(|name| {
        let pointer = loader(name);
        (!pointer.is_null()).then(|| std::mem::transmute_copy::<*const c_void, F>(&pointer))
    })
}

/// The production function table.
pub struct GlowFunctions {
    gl: glow::Context,
    extensions: ExtensionFunctions,
    linking: Option<Arc<RuntimeLinking>>,
}

impl GlowFunctions {
    /// Load every entry point through `loader`.
    ///
    /// Fails with [`RendererError::MissingEntryPoint`] naming the first
    /// required entry point the loader cannot resolve.
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread, and the pointers
    /// returned by `loader` must stay valid for the lifetime of the table.
    pub unsafe fn from_loader(
        mut loader: impl FnMut(&str) -> *const c_void,
    ) -> Result<Self, RendererError> {
        if let Some(missing) = REQUIRED_ENTRY_POINTS
            .iter()
            .find(|name| loader(name).is_null())
        {
            return Err(RendererError::MissingEntryPoint((*missing).to_owned()));
        }
        let extensions = ExtensionFunctions {
            tex_buffer: load_function(&mut loader, &["glTexBufferEXT", "glTexBufferOES"]),
            clip_control: load_function(&mut loader, &["glClipControlEXT"]),
            draw_arrays_instanced_base_instance: load_function(
                &mut loader,
                &["glDrawArraysInstancedBaseInstanceEXT"],
            ),
            draw_elements_instanced_base_vertex: load_function(
                &mut loader,
                &[
                    "glDrawElementsInstancedBaseVertexEXT",
                    "glDrawElementsInstancedBaseVertexOES",
                ],
            ),
            draw_elements_instanced_base_vertex_base_instance: load_function(
                &mut loader,
                &["glDrawElementsInstancedBaseVertexBaseInstanceEXT"],
            ),
            debug_message_insert: load_function(&mut loader, &["glDebugMessageInsertKHR"]),
            push_debug_group: load_function(&mut loader, &["glPushDebugGroupKHR"]),
            pop_debug_group: load_function(&mut loader, &["glPopDebugGroupKHR"]),
        };
        let gl = glow::Context::from_loader_function(|name| loader(name));
        Ok(Self {
            gl,
            extensions,
            linking: None,
        })
    }

    /// Load every entry point from runtime linked libraries.
    ///
    /// # Safety
    ///
    /// A GL context created through `linking` must be current on the calling
    /// thread.
    pub unsafe fn from_runtime_linking(linking: Arc<RuntimeLinking>) -> Result<Self, RendererError> {
        let mut functions = Self::from_loader(|name| linking.get_proc_address(name))?;
        functions.linking = Some(linking);
        Ok(functions)
    }
}

impl std::fmt::Debug for GlowFunctions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowFunctions")
            .field("version", self.gl.version())
            .finish_non_exhaustive()
    }
}

// SAFETY: the table only holds function pointers and immutable driver
// information. GL calls themselves are issued from the thread owning the
// current context, which the renderer guarantees.
unsafe impl Send for GlowFunctions {}
unsafe impl Sync for GlowFunctions {}

fn buffer(name: u32) -> Option<glow::NativeBuffer> {
    NonZeroU32::new(name).map(glow::NativeBuffer)
}

fn texture(name: u32) -> Option<glow::NativeTexture> {
    NonZeroU32::new(name).map(glow::NativeTexture)
}

fn sampler(name: u32) -> Option<glow::NativeSampler> {
    NonZeroU32::new(name).map(glow::NativeSampler)
}

fn vertex_array(name: u32) -> Option<glow::NativeVertexArray> {
    NonZeroU32::new(name).map(glow::NativeVertexArray)
}

fn framebuffer(name: u32) -> Option<glow::NativeFramebuffer> {
    NonZeroU32::new(name).map(glow::NativeFramebuffer)
}

fn renderbuffer(name: u32) -> Option<glow::NativeRenderbuffer> {
    NonZeroU32::new(name).map(glow::NativeRenderbuffer)
}

fn shader(name: u32) -> Option<glow::NativeShader> {
    NonZeroU32::new(name).map(glow::NativeShader)
}

fn program(name: u32) -> Option<glow::NativeProgram> {
    NonZeroU32::new(name).map(glow::NativeProgram)
}

fn location(location: i32) -> Option<glow::NativeUniformLocation> {
    (location >= 0).then(|| glow::NativeUniformLocation(location as u32))
}

fn created<T>(kind: &str, result: Result<T, String>, name: impl FnOnce(T) -> NonZeroU32) -> u32 {
    match result {
        Ok(object) => name(object).get(),
        Err(error) => {
            log::error!("Failed to create GL {kind}: {error}");
            0
        }
    }
}

// Every method below forwards to the driver. SAFETY for all of them: the
// caller guarantees a current context, and object names are only ever names
// this table created.
impl GlFunctions for GlowFunctions {
    fn get_string(&self, name: u32) -> String {
        unsafe { self.gl.get_parameter_string(name) }
    }

    fn get_integer(&self, parameter: u32) -> i32 {
        unsafe { self.gl.get_parameter_i32(parameter) }
    }

    fn extensions(&self) -> Vec<String> {
        self.gl.supported_extensions().iter().cloned().collect()
    }

    fn current_drawable_size(&self) -> Option<(u32, u32)> {
        let egl = self.linking.as_ref()?.egl();
        let display = egl.get_current_display()?;
        let surface = egl.get_current_surface(khronos_egl::DRAW)?;
        let query = |attribute| {
            egl.query_surface(display, surface, attribute)
                .ok()
                .map(|value| value.max(1) as u32)
        };
        Some((query(khronos_egl::WIDTH)?, query(khronos_egl::HEIGHT)?))
    }

    fn get_error(&self) -> u32 {
        unsafe { self.gl.get_error() }
    }

    fn flush(&self) {
        unsafe { self.gl.flush() }
    }

    fn finish(&self) {
        unsafe { self.gl.finish() }
    }

    fn enable(&self, capability: u32) {
        unsafe { self.gl.enable(capability) }
    }

    fn disable(&self, capability: u32) {
        unsafe { self.gl.disable(capability) }
    }

    fn is_enabled(&self, capability: u32) -> bool {
        unsafe { self.gl.is_enabled(capability) }
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.viewport(x, y, width, height) }
    }

    fn depth_range(&self, near: f32, far: f32) {
        unsafe { self.gl.depth_range_f32(near, far) }
    }

    fn scissor(&self, x: i32, y: i32, width: i32, height: i32) {
        unsafe { self.gl.scissor(x, y, width, height) }
    }

    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32) {
        unsafe { self.gl.clear_color(red, green, blue, alpha) }
    }

    fn clear_depth(&self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) }
    }

    fn clear_stencil(&self, stencil: i32) {
        unsafe { self.gl.clear_stencil(stencil) }
    }

    fn clear(&self, mask: u32) {
        unsafe { self.gl.clear(mask) }
    }

    fn depth_mask(&self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) }
    }

    fn depth_func(&self, function: u32) {
        unsafe { self.gl.depth_func(function) }
    }

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        unsafe { self.gl.color_mask(red, green, blue, alpha) }
    }

    fn cull_face(&self, mode: u32) {
        unsafe { self.gl.cull_face(mode) }
    }

    fn front_face(&self, mode: u32) {
        unsafe { self.gl.front_face(mode) }
    }

    fn polygon_offset(&self, factor: f32, units: f32) {
        unsafe { self.gl.polygon_offset(factor, units) }
    }

    fn blend_func_separate(&self, source_rgb: u32, destination_rgb: u32, source_alpha: u32, destination_alpha: u32) {
        unsafe {
            self.gl
                .blend_func_separate(source_rgb, destination_rgb, source_alpha, destination_alpha)
        }
    }

    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32) {
        unsafe { self.gl.blend_equation_separate(mode_rgb, mode_alpha) }
    }

    fn create_buffer(&self) -> u32 {
        created("buffer", unsafe { self.gl.create_buffer() }, |object| object.0)
    }

    fn delete_buffer(&self, name: u32) {
        if let Some(object) = buffer(name) {
            unsafe { self.gl.delete_buffer(object) }
        }
    }

    fn bind_buffer(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_buffer(target, buffer(name)) }
    }

    fn bind_buffer_base(&self, target: u32, index: u32, name: u32) {
        unsafe { self.gl.bind_buffer_base(target, index, buffer(name)) }
    }

    fn buffer_data(&self, target: u32, size: i32, data: Option<&[u8]>, usage: u32) {
        unsafe {
            match data {
                Some(data) if data.len() == size as usize => {
                    self.gl.buffer_data_u8_slice(target, data, usage)
                }
                Some(data) => {
                    self.gl.buffer_data_size(target, size, usage);
                    let length = data.len().min(size.max(0) as usize);
                    self.gl.buffer_sub_data_u8_slice(target, 0, &data[..length]);
                }
                None => self.gl.buffer_data_size(target, size, usage),
            }
        }
    }

    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target, offset, data) }
    }

    fn map_buffer_range(&self, target: u32, offset: i32, length: i32, access: u32) -> *mut u8 {
        unsafe { self.gl.map_buffer_range(target, offset, length, access) }
    }

    fn unmap_buffer(&self, target: u32) {
        unsafe {
            self.gl.unmap_buffer(target);
        }
    }

    fn create_vertex_array(&self) -> u32 {
        created("vertex array", unsafe { self.gl.create_vertex_array() }, |object| object.0)
    }

    fn delete_vertex_array(&self, name: u32) {
        if let Some(object) = vertex_array(name) {
            unsafe { self.gl.delete_vertex_array(object) }
        }
    }

    fn bind_vertex_array(&self, name: u32) {
        unsafe { self.gl.bind_vertex_array(vertex_array(name)) }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, data_type: u32, normalized: bool, stride: i32, offset: i32) {
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, data_type, normalized, stride, offset)
        }
    }

    fn vertex_attrib_pointer_i32(&self, index: u32, size: i32, data_type: u32, stride: i32, offset: i32) {
        unsafe { self.gl.vertex_attrib_pointer_i32(index, size, data_type, stride, offset) }
    }

    fn vertex_attrib_divisor(&self, index: u32, divisor: u32) {
        unsafe { self.gl.vertex_attrib_divisor(index, divisor) }
    }

    fn create_texture(&self) -> u32 {
        created("texture", unsafe { self.gl.create_texture() }, |object| object.0)
    }

    fn delete_texture(&self, name: u32) {
        if let Some(object) = texture(name) {
            unsafe { self.gl.delete_texture(object) }
        }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(unit) }
    }

    fn bind_texture(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_texture(target, texture(name)) }
    }

    fn tex_image_2d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, format: u32, data_type: u32, data: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_2d(
                target,
                level,
                internal_format,
                width,
                height,
                0,
                format,
                data_type,
                data,
            )
        }
    }

    fn tex_image_3d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, depth: i32, format: u32, data_type: u32, data: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_3d(
                target,
                level,
                internal_format,
                width,
                height,
                depth,
                0,
                format,
                data_type,
                data,
            )
        }
    }

    fn compressed_tex_image_2d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, data: &[u8]) {
        unsafe {
            self.gl.compressed_tex_image_2d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                0,
                data.len() as i32,
                data,
            )
        }
    }

    fn compressed_tex_image_3d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, depth: i32, data: &[u8]) {
        unsafe {
            self.gl.compressed_tex_image_3d(
                target,
                level,
                internal_format as i32,
                width,
                height,
                depth,
                0,
                data.len() as i32,
                data,
            )
        }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(target, parameter, value) }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { self.gl.generate_mipmap(target) }
    }

    fn tex_buffer(&self, target: u32, internal_format: u32, name: u32) {
        if let Some(tex_buffer) = self.extensions.tex_buffer {
            unsafe { tex_buffer(target, internal_format, name) }
        }
    }

    fn create_sampler(&self) -> u32 {
        created("sampler", unsafe { self.gl.create_sampler() }, |object| object.0)
    }

    fn delete_sampler(&self, name: u32) {
        if let Some(object) = sampler(name) {
            unsafe { self.gl.delete_sampler(object) }
        }
    }

    fn bind_sampler(&self, unit: u32, name: u32) {
        unsafe { self.gl.bind_sampler(unit, sampler(name)) }
    }

    fn sampler_parameter_i32(&self, name: u32, parameter: u32, value: i32) {
        if let Some(object) = sampler(name) {
            unsafe { self.gl.sampler_parameter_i32(object, parameter, value) }
        }
    }

    fn sampler_parameter_f32(&self, name: u32, parameter: u32, value: f32) {
        if let Some(object) = sampler(name) {
            unsafe { self.gl.sampler_parameter_f32(object, parameter, value) }
        }
    }

    fn sampler_parameter_f32_slice(&self, name: u32, parameter: u32, values: &[f32]) {
        if let Some(object) = sampler(name) {
            let mut values = values.to_vec();
            unsafe { self.gl.sampler_parameter_f32_slice(object, parameter, &mut values) }
        }
    }

    fn create_framebuffer(&self) -> u32 {
        created("framebuffer", unsafe { self.gl.create_framebuffer() }, |object| object.0)
    }

    fn delete_framebuffer(&self, name: u32) {
        if let Some(object) = framebuffer(name) {
            unsafe { self.gl.delete_framebuffer(object) }
        }
    }

    fn bind_framebuffer(&self, target: u32, name: u32) {
        unsafe { self.gl.bind_framebuffer(target, framebuffer(name)) }
    }

    fn framebuffer_texture_2d(&self, target: u32, attachment: u32, texture_target: u32, name: u32, level: i32) {
        unsafe {
            self.gl
                .framebuffer_texture_2d(target, attachment, texture_target, texture(name), level)
        }
    }

    fn framebuffer_texture_layer(&self, target: u32, attachment: u32, name: u32, level: i32, layer: i32) {
        unsafe {
            self.gl
                .framebuffer_texture_layer(target, attachment, texture(name), level, layer)
        }
    }

    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, name: u32) {
        unsafe {
            self.gl
                .framebuffer_renderbuffer(target, attachment, glow::RENDERBUFFER, renderbuffer(name))
        }
    }

    fn check_framebuffer_status(&self, target: u32) -> u32 {
        unsafe { self.gl.check_framebuffer_status(target) }
    }

    fn draw_buffers(&self, buffers: &[u32]) {
        unsafe { self.gl.draw_buffers(buffers) }
    }

    fn blit_framebuffer(&self, source: [i32; 4], destination: [i32; 4], mask: u32, filter: u32) {
        let [source_x0, source_y0, source_x1, source_y1] = source;
        let [destination_x0, destination_y0, destination_x1, destination_y1] = destination;
        unsafe {
            self.gl.blit_framebuffer(
                source_x0,
                source_y0,
                source_x1,
                source_y1,
                destination_x0,
                destination_y0,
                destination_x1,
                destination_y1,
                mask,
                filter,
            )
        }
    }

    fn create_renderbuffer(&self) -> u32 {
        created("renderbuffer", unsafe { self.gl.create_renderbuffer() }, |object| object.0)
    }

    fn delete_renderbuffer(&self, name: u32) {
        if let Some(object) = renderbuffer(name) {
            unsafe { self.gl.delete_renderbuffer(object) }
        }
    }

    fn bind_renderbuffer(&self, name: u32) {
        unsafe { self.gl.bind_renderbuffer(glow::RENDERBUFFER, renderbuffer(name)) }
    }

    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32) {
        unsafe {
            self.gl.renderbuffer_storage_multisample(
                glow::RENDERBUFFER,
                samples,
                internal_format,
                width,
                height,
            )
        }
    }

    fn create_shader(&self, shader_type: u32) -> u32 {
        created("shader", unsafe { self.gl.create_shader(shader_type) }, |object| object.0)
    }

    fn delete_shader(&self, name: u32) {
        if let Some(object) = shader(name) {
            unsafe { self.gl.delete_shader(object) }
        }
    }

    fn shader_source(&self, name: u32, source: &str) {
        if let Some(object) = shader(name) {
            unsafe { self.gl.shader_source(object, source) }
        }
    }

    fn compile_shader(&self, name: u32) {
        if let Some(object) = shader(name) {
            unsafe { self.gl.compile_shader(object) }
        }
    }

    fn get_shader_compile_status(&self, name: u32) -> bool {
        shader(name).map_or(false, |object| unsafe { self.gl.get_shader_compile_status(object) })
    }

    fn get_shader_info_log(&self, name: u32) -> String {
        shader(name).map_or_else(String::new, |object| unsafe { self.gl.get_shader_info_log(object) })
    }

    fn create_program(&self) -> u32 {
        created("program", unsafe { self.gl.create_program() }, |object| object.0)
    }

    fn delete_program(&self, name: u32) {
        if let Some(object) = program(name) {
            unsafe { self.gl.delete_program(object) }
        }
    }

    fn attach_shader(&self, program_name: u32, shader_name: u32) {
        if let (Some(program), Some(shader)) = (program(program_name), shader(shader_name)) {
            unsafe { self.gl.attach_shader(program, shader) }
        }
    }

    fn bind_attrib_location(&self, name: u32, index: u32, attribute: &str) {
        if let Some(object) = program(name) {
            unsafe { self.gl.bind_attrib_location(object, index, attribute) }
        }
    }

    fn link_program(&self, name: u32) {
        if let Some(object) = program(name) {
            unsafe { self.gl.link_program(object) }
        }
    }

    fn get_program_link_status(&self, name: u32) -> bool {
        program(name).map_or(false, |object| unsafe { self.gl.get_program_link_status(object) })
    }

    fn get_program_info_log(&self, name: u32) -> String {
        program(name).map_or_else(String::new, |object| unsafe { self.gl.get_program_info_log(object) })
    }

    fn use_program(&self, name: u32) {
        unsafe { self.gl.use_program(program(name)) }
    }

    fn get_uniform_location(&self, name: u32, uniform: &str) -> i32 {
        program(name)
            .and_then(|object| unsafe { self.gl.get_uniform_location(object, uniform) })
            .map_or(-1, |location| location.0 as i32)
    }

    fn get_uniform_block_index(&self, name: u32, block: &str) -> u32 {
        program(name)
            .and_then(|object| unsafe { self.gl.get_uniform_block_index(object, block) })
            .unwrap_or(INVALID_INDEX)
    }

    fn uniform_block_binding(&self, name: u32, index: u32, binding: u32) {
        if let Some(object) = program(name) {
            unsafe { self.gl.uniform_block_binding(object, index, binding) }
        }
    }

    fn uniform_1_i32(&self, uniform: i32, value: i32) {
        unsafe { self.gl.uniform_1_i32(location(uniform).as_ref(), value) }
    }

    fn uniform_1_u32(&self, uniform: i32, value: u32) {
        unsafe { self.gl.uniform_1_u32(location(uniform).as_ref(), value) }
    }

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instance_count: i32) {
        unsafe { self.gl.draw_arrays_instanced(mode, first, count, instance_count) }
    }

    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32) {
        unsafe {
            self.gl
                .draw_elements_instanced(mode, count, index_type, offset, instance_count)
        }
    }

    fn draw_arrays_instanced_base_instance(&self, mode: u32, first: i32, count: i32, instance_count: i32, base_instance: u32) {
        if let Some(draw) = self.extensions.draw_arrays_instanced_base_instance {
            unsafe { draw(mode, first, count, instance_count, base_instance) }
        }
    }

    fn draw_elements_instanced_base_vertex(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32) {
        if let Some(draw) = self.extensions.draw_elements_instanced_base_vertex {
            unsafe {
                draw(
                    mode,
                    count,
                    index_type,
                    offset as usize as *const c_void,
                    instance_count,
                    base_vertex,
                )
            }
        }
    }

    fn draw_elements_instanced_base_vertex_base_instance(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32, base_instance: u32) {
        if let Some(draw) = self.extensions.draw_elements_instanced_base_vertex_base_instance {
            unsafe {
                draw(
                    mode,
                    count,
                    index_type,
                    offset as usize as *const c_void,
                    instance_count,
                    base_vertex,
                    base_instance,
                )
            }
        }
    }

    fn clip_control(&self, origin: u32, depth: u32) {
        if let Some(clip_control) = self.extensions.clip_control {
            unsafe { clip_control(origin, depth) }
        }
    }

    fn debug_message_insert(&self, source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
        if let Some(insert) = self.extensions.debug_message_insert {
            unsafe {
                insert(
                    source,
                    message_type,
                    id,
                    severity,
                    message.len() as i32,
                    message.as_ptr().cast(),
                )
            }
        }
    }

    fn push_debug_group(&self, source: u32, id: u32, message: &str) {
        if let Some(push) = self.extensions.push_debug_group {
            unsafe { push(source, id, message.len() as i32, message.as_ptr().cast()) }
        }
    }

    fn pop_debug_group(&self) {
        if let Some(pop) = self.extensions.pop_debug_group {
            unsafe { pop() }
        }
    }
}

static_assertions::assert_impl_all!(GlowFunctions: Send, Sync);
