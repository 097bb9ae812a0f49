//! State shared by the OpenGL ES 3 renderer and its factories.

use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::context::Context;
use crate::renderer::RendererCore;
use crate::types::TextureFormat;

use super::egl_context::EglContext;
use super::extensions::Extensions;
use super::functions::*;
use super::Gles3Config;

/// Size limit of CPU side indirect buffers.
const MAXIMUM_INDIRECT_BUFFER_SIZE: u32 = 128 * 1024;

/// The device behind a renderer: function table, extensions and context.
///
/// Shared by the renderer, the buffer and texture managers and the shader
/// language, so resources created by any of them carry the same identity.
pub(crate) struct Gles3Device {
    pub(crate) core: RendererCore,
    pub(crate) gl: Arc<dyn GlFunctions>,
    pub(crate) extensions: Extensions,
    pub(crate) egl: Option<Arc<EglContext>>,
}

impl Gles3Device {
    /// Detect extensions and capabilities of the current context.
    pub(crate) fn new(
        context: Context,
        gl: Arc<dyn GlFunctions>,
        egl: Option<Arc<EglContext>>,
        config: &Gles3Config,
    ) -> Self {
        let extensions = Extensions::from_names(&gl.extensions());
        let capabilities = query_capabilities(gl.as_ref(), &extensions, config);
        log::info!(
            "OpenGL ES device {:?}: {}",
            capabilities.device_name,
            gl.get_string(glow::VERSION)
        );
        if extensions.clip_control {
            gl.clip_control(UPPER_LEFT_EXT, ZERO_TO_ONE_EXT);
        }
        Self {
            core: RendererCore::new(context, capabilities),
            gl,
            extensions,
            egl,
        }
    }

    /// Whether texture buffers are emulated through uniform buffers.
    pub(crate) fn texture_buffers_as_uniform_buffers(&self) -> bool {
        self.extensions.texture_buffers_as_uniform_buffers()
    }

    /// Name bound to a binding point, from its `GL_*_BINDING` query.
    pub(crate) fn bound(&self, binding_query: u32) -> u32 {
        self.gl.get_integer(binding_query).max(0) as u32
    }
}

impl std::fmt::Debug for Gles3Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gles3Device")
            .field("core", &self.core)
            .field("extensions", &self.extensions)
            .field("egl", &self.egl.is_some())
            .finish()
    }
}

fn positive(value: i32) -> u32 {
    value.max(0) as u32
}

fn query_capabilities(
    gl: &dyn GlFunctions,
    extensions: &Extensions,
    config: &Gles3Config,
) -> Capabilities {
    let maximum_uniform_buffer_size = positive(gl.get_integer(glow::MAX_UNIFORM_BLOCK_SIZE));
    let maximum_texture_buffer_size = if extensions.texture_buffer {
        positive(gl.get_integer(MAX_TEXTURE_BUFFER_SIZE_EXT))
    } else {
        // One texel of the only emulated format is 16 bytes.
        maximum_uniform_buffer_size / 16
    };
    let maximum_anisotropy = if extensions.texture_filter_anisotropic {
        positive(gl.get_integer(MAX_TEXTURE_MAX_ANISOTROPY_EXT)).clamp(1, 16) as u8
    } else {
        1
    };
    Capabilities {
        device_name: gl.get_string(glow::RENDERER),
        preferred_swap_chain_color_texture_format: config.preferred_color_format,
        preferred_swap_chain_depth_stencil_texture_format: config
            .preferred_depth_stencil_format
            .unwrap_or(TextureFormat::Unknown),
        maximum_number_of_viewports: 1,
        maximum_number_of_simultaneous_render_targets: positive(gl.get_integer(glow::MAX_DRAW_BUFFERS)).max(1),
        maximum_texture_dimension: positive(gl.get_integer(glow::MAX_TEXTURE_SIZE)),
        maximum_number_of_2d_texture_array_slices: positive(gl.get_integer(glow::MAX_ARRAY_TEXTURE_LAYERS)),
        maximum_uniform_buffer_size,
        maximum_texture_buffer_size,
        maximum_indirect_buffer_size: MAXIMUM_INDIRECT_BUFFER_SIZE,
        maximum_number_of_multisamples: positive(gl.get_integer(glow::MAX_SAMPLES)).clamp(1, 255) as u8,
        maximum_anisotropy,
        upper_left_origin: extensions.clip_control,
        zero_to_one_clip_z: extensions.clip_control,
        individual_uniforms: true,
        instanced_arrays: true,
        draw_instanced: true,
        base_vertex: extensions.draw_elements_base_vertex,
        native_multithreading: false,
        shader_bytecode: false,
        vertex_shader: true,
        maximum_number_of_patch_vertices: if extensions.tessellation_shader {
            positive(gl.get_integer(MAX_PATCH_VERTICES_EXT))
        } else {
            0
        },
        maximum_number_of_geometry_shader_output_vertices: if extensions.geometry_shader {
            positive(gl.get_integer(MAX_GEOMETRY_OUTPUT_VERTICES_EXT))
        } else {
            0
        },
        fragment_shader: true,
        compute_shader: false,
    }
}

static_assertions::assert_impl_all!(Gles3Device: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::gles3::recording::RecordingFunctions;

    #[test]
    fn test_capabilities_without_extensions() {
        let gl = Arc::new(RecordingFunctions::new());
        let device = Gles3Device::new(Context::new(), gl.clone(), None, &Gles3Config::default());
        let capabilities = device.core.capabilities();
        assert_eq!(capabilities.device_name, "Recording");
        assert_eq!(capabilities.maximum_number_of_simultaneous_render_targets, 4);
        assert_eq!(capabilities.maximum_texture_buffer_size, 16384 / 16);
        assert!(!capabilities.upper_left_origin);
        assert!(!capabilities.zero_to_one_clip_z);
        assert!(!capabilities.base_vertex);
        assert!(!capabilities.native_multithreading);
        assert!(!capabilities.compute_shader);
        assert_eq!(gl.count("clip_control"), 0);
    }

    #[test]
    fn test_clip_control_is_enabled_at_creation() {
        let gl = Arc::new(RecordingFunctions::new().with_extensions(&[
            "GL_EXT_clip_control",
            "GL_EXT_texture_buffer",
            "GL_OES_draw_elements_base_vertex",
        ]).with_parameter(MAX_TEXTURE_BUFFER_SIZE_EXT, 65536));
        let device = Gles3Device::new(Context::new(), gl.clone(), None, &Gles3Config::default());
        let capabilities = device.core.capabilities();
        assert!(capabilities.upper_left_origin);
        assert!(capabilities.zero_to_one_clip_z);
        assert!(capabilities.base_vertex);
        assert_eq!(capabilities.maximum_texture_buffer_size, 65536);
        assert_eq!(
            gl.calls_named("clip_control")[0].arguments,
            vec![i64::from(UPPER_LEFT_EXT), i64::from(ZERO_TO_ONE_EXT)]
        );
        assert!(!device.texture_buffers_as_uniform_buffers());
    }
}
