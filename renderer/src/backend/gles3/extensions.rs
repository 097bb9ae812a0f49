//! OpenGL ES extension detection.

/// Extensions the backend uses when available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extensions {
    /// `GL_EXT_texture_buffer`: native texture buffers.
    pub texture_buffer: bool,
    /// `GL_EXT_base_instance`: draws with a start instance.
    pub base_instance: bool,
    /// `GL_EXT_draw_elements_base_vertex` or `GL_OES_draw_elements_base_vertex`.
    pub draw_elements_base_vertex: bool,
    /// `GL_OES_element_index_uint`: 32-bit indices.
    pub element_index_uint: bool,
    /// `GL_EXT_clip_control`: upper left origin and zero to one depth.
    pub clip_control: bool,
    /// `GL_KHR_debug`: debug markers and groups.
    pub khr_debug: bool,
    /// `GL_EXT_texture_filter_anisotropic`.
    pub texture_filter_anisotropic: bool,
    /// `GL_EXT_texture_border_clamp`.
    pub texture_border_clamp: bool,
    /// `GL_EXT_texture_compression_s3tc`.
    pub texture_compression_s3tc: bool,
    /// `GL_EXT_texture_compression_s3tc_srgb`.
    pub texture_compression_s3tc_srgb: bool,
    /// `GL_EXT_texture_compression_rgtc`.
    pub texture_compression_rgtc: bool,
    /// `GL_OES_compressed_ETC1_RGB8_texture`.
    pub compressed_etc1_rgb8_texture: bool,
    /// `GL_EXT_texture_norm16`.
    pub texture_norm16: bool,
    /// `GL_EXT_texture_format_BGRA8888`.
    pub texture_format_bgra8888: bool,
    /// `GL_EXT_geometry_shader`.
    pub geometry_shader: bool,
    /// `GL_EXT_tessellation_shader`.
    pub tessellation_shader: bool,
}

impl Extensions {
    /// Detect extensions from the names reported by the driver.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let has = |wanted: &str| names.iter().any(|name| name.as_ref() == wanted);
        let extensions = Self {
            texture_buffer: has("GL_EXT_texture_buffer"),
            base_instance: has("GL_EXT_base_instance"),
            draw_elements_base_vertex: has("GL_EXT_draw_elements_base_vertex")
                || has("GL_OES_draw_elements_base_vertex"),
            element_index_uint: has("GL_OES_element_index_uint"),
            clip_control: has("GL_EXT_clip_control"),
            khr_debug: has("GL_KHR_debug"),
            texture_filter_anisotropic: has("GL_EXT_texture_filter_anisotropic"),
            texture_border_clamp: has("GL_EXT_texture_border_clamp")
                || has("GL_OES_texture_border_clamp"),
            texture_compression_s3tc: has("GL_EXT_texture_compression_s3tc"),
            texture_compression_s3tc_srgb: has("GL_EXT_texture_compression_s3tc_srgb"),
            texture_compression_rgtc: has("GL_EXT_texture_compression_rgtc"),
            compressed_etc1_rgb8_texture: has("GL_OES_compressed_ETC1_RGB8_texture"),
            texture_norm16: has("GL_EXT_texture_norm16"),
            texture_format_bgra8888: has("GL_EXT_texture_format_BGRA8888"),
            geometry_shader: has("GL_EXT_geometry_shader"),
            tessellation_shader: has("GL_EXT_tessellation_shader"),
        };
        log::debug!("Detected {extensions:?}");
        extensions
    }

    /// Whether texture buffers are emulated through uniform buffers.
    pub fn texture_buffers_as_uniform_buffers(&self) -> bool {
        !self.texture_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_names() {
        let extensions = Extensions::from_names(&[
            "GL_OES_draw_elements_base_vertex",
            "GL_KHR_debug",
            "GL_EXT_texture_buffer_object",
        ]);
        assert!(extensions.draw_elements_base_vertex);
        assert!(extensions.khr_debug);
        assert!(!extensions.texture_buffer);
        assert!(extensions.texture_buffers_as_uniform_buffers());
        assert!(!extensions.base_instance);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(Extensions::from_names::<&str>(&[]), Extensions::default());
    }
}
