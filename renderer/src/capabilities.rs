//! Device capabilities.

use crate::types::TextureFormat;

/// What the device behind a renderer can do.
///
/// Filled once when the renderer is created and never changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    /// Human readable device name.
    pub device_name: String,
    /// Preferred swap chain color format.
    pub preferred_swap_chain_color_texture_format: TextureFormat,
    /// Preferred swap chain depth format.
    pub preferred_swap_chain_depth_stencil_texture_format: TextureFormat,
    /// Maximum number of viewports, always at least one.
    pub maximum_number_of_viewports: u32,
    /// Maximum number of simultaneous render targets, always at least one.
    pub maximum_number_of_simultaneous_render_targets: u32,
    /// Maximum texture dimension.
    pub maximum_texture_dimension: u32,
    /// Maximum number of 2D texture array slices, zero without support.
    pub maximum_number_of_2d_texture_array_slices: u32,
    /// Maximum uniform buffer size in bytes.
    pub maximum_uniform_buffer_size: u32,
    /// Maximum texture buffer size in texels.
    pub maximum_texture_buffer_size: u32,
    /// Maximum indirect buffer size in bytes.
    pub maximum_indirect_buffer_size: u32,
    /// Maximum number of multisamples, always at least one.
    pub maximum_number_of_multisamples: u8,
    /// Maximum anisotropy, always at least one.
    pub maximum_anisotropy: u8,
    /// Whether clip space origin is the upper left corner.
    pub upper_left_origin: bool,
    /// Whether clip space depth ranges from zero to one.
    pub zero_to_one_clip_z: bool,
    /// Whether individual uniforms can be set.
    pub individual_uniforms: bool,
    /// Whether per-instance vertex attributes are supported.
    pub instanced_arrays: bool,
    /// Whether instanced draw calls are supported.
    pub draw_instanced: bool,
    /// Whether draw calls with a base vertex are supported.
    pub base_vertex: bool,
    /// Whether resources can be created from multiple threads at the same time.
    pub native_multithreading: bool,
    /// Whether shaders can be created from bytecode.
    pub shader_bytecode: bool,
    /// Whether vertex shaders are supported.
    pub vertex_shader: bool,
    /// Maximum tessellation patch vertex count, zero without tessellation.
    pub maximum_number_of_patch_vertices: u32,
    /// Maximum geometry shader output vertices, zero without geometry shaders.
    pub maximum_number_of_geometry_shader_output_vertices: u32,
    /// Whether fragment shaders are supported.
    pub fragment_shader: bool,
    /// Whether compute shaders are supported.
    pub compute_shader: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            device_name: String::new(),
            preferred_swap_chain_color_texture_format: TextureFormat::R8G8B8A8,
            preferred_swap_chain_depth_stencil_texture_format: TextureFormat::D32Float,
            maximum_number_of_viewports: 1,
            maximum_number_of_simultaneous_render_targets: 1,
            maximum_texture_dimension: 0,
            maximum_number_of_2d_texture_array_slices: 0,
            maximum_uniform_buffer_size: 0,
            maximum_texture_buffer_size: 0,
            maximum_indirect_buffer_size: 0,
            maximum_number_of_multisamples: 1,
            maximum_anisotropy: 1,
            upper_left_origin: true,
            zero_to_one_clip_z: true,
            individual_uniforms: false,
            instanced_arrays: false,
            draw_instanced: false,
            base_vertex: false,
            native_multithreading: false,
            shader_bytecode: false,
            vertex_shader: false,
            maximum_number_of_patch_vertices: 0,
            maximum_number_of_geometry_shader_output_vertices: 0,
            fragment_shader: false,
            compute_shader: false,
        }
    }
}
