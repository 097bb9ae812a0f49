//! The OpenGL ES 3 function table.
//!
//! Every native call of the backend goes through [`GlFunctions`]. Object names
//! are plain `u32` values with zero meaning "no object"; uniform locations are
//! `i32` values with `-1` meaning "not found". The production implementation
//! forwards to `glow`, the recording implementation logs every call so the
//! backend can be tested without a GPU.

/// `GL_INVALID_INDEX`, returned for unknown uniform blocks.
pub const INVALID_INDEX: u32 = u32::MAX;

// Extension enums glow does not define.
pub const ETC1_RGB8_OES: u32 = 0x8D64;
pub const COMPRESSED_RGB_S3TC_DXT1_EXT: u32 = 0x83F0;
pub const COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
pub const COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
pub const COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;
pub const COMPRESSED_SRGB_S3TC_DXT1_EXT: u32 = 0x8C4C;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT: u32 = 0x8C4D;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT: u32 = 0x8C4E;
pub const COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT: u32 = 0x8C4F;
pub const COMPRESSED_RED_RGTC1_EXT: u32 = 0x8DBB;
pub const COMPRESSED_RED_GREEN_RGTC2_EXT: u32 = 0x8DBD;
pub const R16_EXT: u32 = 0x822A;
pub const RG16_SNORM_EXT: u32 = 0x8F99;
pub const BGRA_EXT: u32 = 0x80E1;
pub const TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FE;
pub const MAX_TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FF;
pub const TEXTURE_BUFFER_EXT: u32 = 0x8C2A;
pub const MAX_TEXTURE_BUFFER_SIZE_EXT: u32 = 0x8C2B;
pub const TEXTURE_BORDER_COLOR_EXT: u32 = 0x1004;
pub const CLAMP_TO_BORDER_EXT: u32 = 0x812D;
pub const LOWER_LEFT_EXT: u32 = 0x8CA1;
pub const UPPER_LEFT_EXT: u32 = 0x8CA2;
pub const NEGATIVE_ONE_TO_ONE_EXT: u32 = 0x935E;
pub const ZERO_TO_ONE_EXT: u32 = 0x935F;
pub const PATCHES_EXT: u32 = 0x000E;
pub const MAX_PATCH_VERTICES_EXT: u32 = 0x8E7D;
pub const MAX_GEOMETRY_OUTPUT_VERTICES_EXT: u32 = 0x8DE0;
pub const GEOMETRY_SHADER_EXT: u32 = 0x8DD9;
pub const TESS_CONTROL_SHADER_EXT: u32 = 0x8E88;
pub const TESS_EVALUATION_SHADER_EXT: u32 = 0x8E87;
pub const DEBUG_SOURCE_APPLICATION_KHR: u32 = 0x824A;
pub const DEBUG_TYPE_MARKER_KHR: u32 = 0x8268;
pub const DEBUG_SEVERITY_NOTIFICATION_KHR: u32 = 0x826B;

/// OpenGL ES 3 entry points used by the backend.
///
/// Implementations must only be called while their context is current on the
/// calling thread. Extension entry points are no-ops when the extension is
/// missing; the backend checks the extension before calling them.
#[allow(clippy::too_many_arguments)]
pub trait GlFunctions: Send + Sync {
    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    fn get_string(&self, name: u32) -> String;
    fn get_integer(&self, parameter: u32) -> i32;
    fn extensions(&self) -> Vec<String>;
    /// Size of the surface the default framebuffer draws to, when the
    /// platform can tell.
    fn current_drawable_size(&self) -> Option<(u32, u32)>;
    fn get_error(&self) -> u32;
    fn flush(&self);
    fn finish(&self);

    // ------------------------------------------------------------------------
    // Fixed Function State
    // ------------------------------------------------------------------------

    fn enable(&self, capability: u32);
    fn disable(&self, capability: u32);
    fn is_enabled(&self, capability: u32) -> bool;
    fn viewport(&self, x: i32, y: i32, width: i32, height: i32);
    fn depth_range(&self, near: f32, far: f32);
    fn scissor(&self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&self, red: f32, green: f32, blue: f32, alpha: f32);
    fn clear_depth(&self, depth: f32);
    fn clear_stencil(&self, stencil: i32);
    fn clear(&self, mask: u32);
    fn depth_mask(&self, enabled: bool);
    fn depth_func(&self, function: u32);
    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool);
    fn cull_face(&self, mode: u32);
    fn front_face(&self, mode: u32);
    fn polygon_offset(&self, factor: f32, units: f32);
    fn blend_func_separate(&self, source_rgb: u32, destination_rgb: u32, source_alpha: u32, destination_alpha: u32);
    fn blend_equation_separate(&self, mode_rgb: u32, mode_alpha: u32);

    // ------------------------------------------------------------------------
    // Buffers
    // ------------------------------------------------------------------------

    fn create_buffer(&self) -> u32;
    fn delete_buffer(&self, buffer: u32);
    fn bind_buffer(&self, target: u32, buffer: u32);
    fn bind_buffer_base(&self, target: u32, index: u32, buffer: u32);
    fn buffer_data(&self, target: u32, size: i32, data: Option<&[u8]>, usage: u32);
    fn buffer_sub_data(&self, target: u32, offset: i32, data: &[u8]);
    fn map_buffer_range(&self, target: u32, offset: i32, length: i32, access: u32) -> *mut u8;
    fn unmap_buffer(&self, target: u32);

    // ------------------------------------------------------------------------
    // Vertex Arrays
    // ------------------------------------------------------------------------

    fn create_vertex_array(&self) -> u32;
    fn delete_vertex_array(&self, vertex_array: u32);
    fn bind_vertex_array(&self, vertex_array: u32);
    fn enable_vertex_attrib_array(&self, index: u32);
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, data_type: u32, normalized: bool, stride: i32, offset: i32);
    fn vertex_attrib_pointer_i32(&self, index: u32, size: i32, data_type: u32, stride: i32, offset: i32);
    fn vertex_attrib_divisor(&self, index: u32, divisor: u32);

    // ------------------------------------------------------------------------
    // Textures
    // ------------------------------------------------------------------------

    fn create_texture(&self) -> u32;
    fn delete_texture(&self, texture: u32);
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: u32);
    fn tex_image_2d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, format: u32, data_type: u32, data: Option<&[u8]>);
    fn tex_image_3d(&self, target: u32, level: i32, internal_format: i32, width: i32, height: i32, depth: i32, format: u32, data_type: u32, data: Option<&[u8]>);
    fn compressed_tex_image_2d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, data: &[u8]);
    fn compressed_tex_image_3d(&self, target: u32, level: i32, internal_format: u32, width: i32, height: i32, depth: i32, data: &[u8]);
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);
    fn generate_mipmap(&self, target: u32);
    /// `glTexBufferEXT`.
    fn tex_buffer(&self, target: u32, internal_format: u32, buffer: u32);

    // ------------------------------------------------------------------------
    // Samplers
    // ------------------------------------------------------------------------

    fn create_sampler(&self) -> u32;
    fn delete_sampler(&self, sampler: u32);
    fn bind_sampler(&self, unit: u32, sampler: u32);
    fn sampler_parameter_i32(&self, sampler: u32, parameter: u32, value: i32);
    fn sampler_parameter_f32(&self, sampler: u32, parameter: u32, value: f32);
    fn sampler_parameter_f32_slice(&self, sampler: u32, parameter: u32, values: &[f32]);

    // ------------------------------------------------------------------------
    // Framebuffers
    // ------------------------------------------------------------------------

    fn create_framebuffer(&self) -> u32;
    fn delete_framebuffer(&self, framebuffer: u32);
    fn bind_framebuffer(&self, target: u32, framebuffer: u32);
    fn framebuffer_texture_2d(&self, target: u32, attachment: u32, texture_target: u32, texture: u32, level: i32);
    fn framebuffer_texture_layer(&self, target: u32, attachment: u32, texture: u32, level: i32, layer: i32);
    fn framebuffer_renderbuffer(&self, target: u32, attachment: u32, renderbuffer: u32);
    fn check_framebuffer_status(&self, target: u32) -> u32;
    fn draw_buffers(&self, buffers: &[u32]);
    fn blit_framebuffer(&self, source: [i32; 4], destination: [i32; 4], mask: u32, filter: u32);
    fn create_renderbuffer(&self) -> u32;
    fn delete_renderbuffer(&self, renderbuffer: u32);
    fn bind_renderbuffer(&self, renderbuffer: u32);
    fn renderbuffer_storage_multisample(&self, samples: i32, internal_format: u32, width: i32, height: i32);

    // ------------------------------------------------------------------------
    // Shaders and Programs
    // ------------------------------------------------------------------------

    fn create_shader(&self, shader_type: u32) -> u32;
    fn delete_shader(&self, shader: u32);
    fn shader_source(&self, shader: u32, source: &str);
    fn compile_shader(&self, shader: u32);
    fn get_shader_compile_status(&self, shader: u32) -> bool;
    fn get_shader_info_log(&self, shader: u32) -> String;
    fn create_program(&self) -> u32;
    fn delete_program(&self, program: u32);
    fn attach_shader(&self, program: u32, shader: u32);
    fn bind_attrib_location(&self, program: u32, index: u32, name: &str);
    fn link_program(&self, program: u32);
    fn get_program_link_status(&self, program: u32) -> bool;
    fn get_program_info_log(&self, program: u32) -> String;
    fn use_program(&self, program: u32);
    fn get_uniform_location(&self, program: u32, name: &str) -> i32;
    fn get_uniform_block_index(&self, program: u32, name: &str) -> u32;
    fn uniform_block_binding(&self, program: u32, index: u32, binding: u32);
    fn uniform_1_i32(&self, location: i32, value: i32);
    fn uniform_1_u32(&self, location: i32, value: u32);

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    fn draw_arrays_instanced(&self, mode: u32, first: i32, count: i32, instance_count: i32);
    fn draw_elements_instanced(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32);
    /// `glDrawArraysInstancedBaseInstanceEXT`.
    fn draw_arrays_instanced_base_instance(&self, mode: u32, first: i32, count: i32, instance_count: i32, base_instance: u32);
    /// `glDrawElementsInstancedBaseVertexEXT` or its OES twin.
    fn draw_elements_instanced_base_vertex(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32);
    /// `glDrawElementsInstancedBaseVertexBaseInstanceEXT`.
    fn draw_elements_instanced_base_vertex_base_instance(&self, mode: u32, count: i32, index_type: u32, offset: i32, instance_count: i32, base_vertex: i32, base_instance: u32);

    // ------------------------------------------------------------------------
    // Extensions
    // ------------------------------------------------------------------------

    /// `glClipControlEXT`.
    fn clip_control(&self, origin: u32, depth: u32);
    /// `glDebugMessageInsertKHR`.
    fn debug_message_insert(&self, source: u32, message_type: u32, id: u32, severity: u32, message: &str);
    /// `glPushDebugGroupKHR`.
    fn push_debug_group(&self, source: u32, id: u32, message: &str);
    /// `glPopDebugGroupKHR`.
    fn pop_debug_group(&self);
}
