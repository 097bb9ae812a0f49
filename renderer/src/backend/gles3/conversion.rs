//! Conversions from renderer types to OpenGL ES enums.

use crate::resources::{GraphicsPipelineStateDescriptor, ResourceType};
use crate::types::{
    Blend, BlendOp, BufferUsage, ComparisonFunc, CullMode, FilterMode, IndexBufferFormat,
    MapType, PrimitiveTopology, TextureAddressMode, TextureFormat, VertexAttributeFormat,
};

use super::extensions::Extensions;
use super::functions::*;
use super::resources::{GlBlendState, GlPipelineState};

/// Upload parameters of a texture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlTextureFormat {
    pub internal_format: u32,
    pub format: u32,
    pub data_type: u32,
    pub compressed: bool,
}

impl GlTextureFormat {
    const fn uncompressed(internal_format: u32, format: u32, data_type: u32) -> Self {
        Self {
            internal_format,
            format,
            data_type,
            compressed: false,
        }
    }

    const fn compressed(internal_format: u32) -> Self {
        Self {
            internal_format,
            format: 0,
            data_type: 0,
            compressed: true,
        }
    }
}

/// GL upload parameters of a texture format, `None` when the device lacks the
/// extension the format needs.
pub fn convert_texture_format(
    format: TextureFormat,
    extensions: &Extensions,
) -> Option<GlTextureFormat> {
    let converted = match format {
        TextureFormat::R8 => GlTextureFormat::uncompressed(glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        TextureFormat::R8G8B8 => GlTextureFormat::uncompressed(glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE),
        TextureFormat::R8G8B8A8 => GlTextureFormat::uncompressed(glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::R8G8B8A8Srgb => {
            GlTextureFormat::uncompressed(glow::SRGB8_ALPHA8, glow::RGBA, glow::UNSIGNED_BYTE)
        }
        TextureFormat::B8G8R8A8 if extensions.texture_format_bgra8888 => {
            GlTextureFormat::uncompressed(BGRA_EXT, BGRA_EXT, glow::UNSIGNED_BYTE)
        }
        TextureFormat::R11G11B10F => GlTextureFormat::uncompressed(
            glow::R11F_G11F_B10F,
            glow::RGB,
            glow::UNSIGNED_INT_10F_11F_11F_REV,
        ),
        TextureFormat::R16Unorm if extensions.texture_norm16 => {
            GlTextureFormat::uncompressed(R16_EXT, glow::RED, glow::UNSIGNED_SHORT)
        }
        TextureFormat::R32Uint => GlTextureFormat::uncompressed(glow::R32UI, glow::RED_INTEGER, glow::UNSIGNED_INT),
        TextureFormat::R32Float => GlTextureFormat::uncompressed(glow::R32F, glow::RED, glow::FLOAT),
        TextureFormat::R16G16Snorm if extensions.texture_norm16 => {
            GlTextureFormat::uncompressed(RG16_SNORM_EXT, glow::RG, glow::SHORT)
        }
        TextureFormat::R16G16Float => GlTextureFormat::uncompressed(glow::RG16F, glow::RG, glow::HALF_FLOAT),
        TextureFormat::R16G16B16A16F => GlTextureFormat::uncompressed(glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT),
        TextureFormat::R32G32B32A32F => GlTextureFormat::uncompressed(glow::RGBA32F, glow::RGBA, glow::FLOAT),
        TextureFormat::Bc1 if extensions.texture_compression_s3tc => {
            GlTextureFormat::compressed(COMPRESSED_RGBA_S3TC_DXT1_EXT)
        }
        TextureFormat::Bc1Srgb if extensions.texture_compression_s3tc_srgb => {
            GlTextureFormat::compressed(COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT)
        }
        TextureFormat::Bc2 if extensions.texture_compression_s3tc => {
            GlTextureFormat::compressed(COMPRESSED_RGBA_S3TC_DXT3_EXT)
        }
        TextureFormat::Bc2Srgb if extensions.texture_compression_s3tc_srgb => {
            GlTextureFormat::compressed(COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT)
        }
        TextureFormat::Bc3 if extensions.texture_compression_s3tc => {
            GlTextureFormat::compressed(COMPRESSED_RGBA_S3TC_DXT5_EXT)
        }
        TextureFormat::Bc3Srgb if extensions.texture_compression_s3tc_srgb => {
            GlTextureFormat::compressed(COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT)
        }
        TextureFormat::Bc4 if extensions.texture_compression_rgtc => {
            GlTextureFormat::compressed(COMPRESSED_RED_RGTC1_EXT)
        }
        TextureFormat::Bc5 if extensions.texture_compression_rgtc => {
            GlTextureFormat::compressed(COMPRESSED_RED_GREEN_RGTC2_EXT)
        }
        TextureFormat::Etc1 if extensions.compressed_etc1_rgb8_texture => {
            GlTextureFormat::compressed(ETC1_RGB8_OES)
        }
        TextureFormat::D32Float => {
            GlTextureFormat::uncompressed(glow::DEPTH_COMPONENT32F, glow::DEPTH_COMPONENT, glow::FLOAT)
        }
        _ => return None,
    };
    Some(converted)
}

pub fn convert_buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::StreamDraw => glow::STREAM_DRAW,
        BufferUsage::StreamRead => glow::STREAM_READ,
        BufferUsage::StreamCopy => glow::STREAM_COPY,
        BufferUsage::StaticDraw => glow::STATIC_DRAW,
        BufferUsage::StaticRead => glow::STATIC_READ,
        BufferUsage::StaticCopy => glow::STATIC_COPY,
        BufferUsage::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferUsage::DynamicRead => glow::DYNAMIC_READ,
        BufferUsage::DynamicCopy => glow::DYNAMIC_COPY,
    }
}

pub fn convert_index_buffer_format(format: IndexBufferFormat) -> u32 {
    match format {
        IndexBufferFormat::UnsignedChar => glow::UNSIGNED_BYTE,
        IndexBufferFormat::UnsignedShort => glow::UNSIGNED_SHORT,
        IndexBufferFormat::UnsignedInt => glow::UNSIGNED_INT,
    }
}

pub fn convert_primitive_topology(topology: PrimitiveTopology) -> Option<u32> {
    match topology {
        PrimitiveTopology::Unknown => None,
        PrimitiveTopology::PointList => Some(glow::POINTS),
        PrimitiveTopology::LineList => Some(glow::LINES),
        PrimitiveTopology::LineStrip => Some(glow::LINE_STRIP),
        PrimitiveTopology::TriangleList => Some(glow::TRIANGLES),
        PrimitiveTopology::TriangleStrip => Some(glow::TRIANGLE_STRIP),
        PrimitiveTopology::PatchList(_) => Some(PATCHES_EXT),
    }
}

pub fn convert_comparison_func(function: ComparisonFunc) -> u32 {
    match function {
        ComparisonFunc::Never => glow::NEVER,
        ComparisonFunc::Less => glow::LESS,
        ComparisonFunc::Equal => glow::EQUAL,
        ComparisonFunc::LessEqual => glow::LEQUAL,
        ComparisonFunc::Greater => glow::GREATER,
        ComparisonFunc::NotEqual => glow::NOTEQUAL,
        ComparisonFunc::GreaterEqual => glow::GEQUAL,
        ComparisonFunc::Always => glow::ALWAYS,
    }
}

pub fn convert_blend(blend: Blend) -> u32 {
    match blend {
        Blend::Zero => glow::ZERO,
        Blend::One => glow::ONE,
        Blend::SrcColor => glow::SRC_COLOR,
        Blend::InvSrcColor => glow::ONE_MINUS_SRC_COLOR,
        Blend::SrcAlpha => glow::SRC_ALPHA,
        Blend::InvSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        Blend::DestAlpha => glow::DST_ALPHA,
        Blend::InvDestAlpha => glow::ONE_MINUS_DST_ALPHA,
        Blend::DestColor => glow::DST_COLOR,
        Blend::InvDestColor => glow::ONE_MINUS_DST_COLOR,
        Blend::SrcAlphaSat => glow::SRC_ALPHA_SATURATE,
    }
}

pub fn convert_blend_op(operation: BlendOp) -> u32 {
    match operation {
        BlendOp::Add => glow::FUNC_ADD,
        BlendOp::Subtract => glow::FUNC_SUBTRACT,
        BlendOp::RevSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendOp::Min => glow::MIN,
        BlendOp::Max => glow::MAX,
    }
}

pub fn convert_address_mode(mode: TextureAddressMode, extensions: &Extensions) -> u32 {
    match mode {
        TextureAddressMode::Wrap => glow::REPEAT,
        TextureAddressMode::Mirror | TextureAddressMode::MirrorOnce => glow::MIRRORED_REPEAT,
        TextureAddressMode::Clamp => glow::CLAMP_TO_EDGE,
        TextureAddressMode::Border if extensions.texture_border_clamp => CLAMP_TO_BORDER_EXT,
        TextureAddressMode::Border => {
            log::debug!("Border address mode needs GL_EXT_texture_border_clamp, using clamp to edge");
            glow::CLAMP_TO_EDGE
        }
    }
}

/// Sampler filter state of a filter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlFilter {
    pub minification: u32,
    pub magnification: u32,
    pub comparison: bool,
    pub anisotropic: bool,
}

pub fn convert_filter_mode(filter: FilterMode) -> GlFilter {
    use FilterMode::*;

    let (minification, magnification) = match filter {
        MinMagMipPoint | ComparisonMinMagMipPoint => (glow::NEAREST_MIPMAP_NEAREST, glow::NEAREST),
        MinMagPointMipLinear | ComparisonMinMagPointMipLinear => {
            (glow::NEAREST_MIPMAP_LINEAR, glow::NEAREST)
        }
        MinPointMagLinearMipPoint | ComparisonMinPointMagLinearMipPoint => {
            (glow::NEAREST_MIPMAP_NEAREST, glow::LINEAR)
        }
        MinPointMagMipLinear | ComparisonMinPointMagMipLinear => {
            (glow::NEAREST_MIPMAP_LINEAR, glow::LINEAR)
        }
        MinLinearMagMipPoint | ComparisonMinLinearMagMipPoint => {
            (glow::LINEAR_MIPMAP_NEAREST, glow::NEAREST)
        }
        MinLinearMagPointMipLinear | ComparisonMinLinearMagPointMipLinear => {
            (glow::LINEAR_MIPMAP_LINEAR, glow::NEAREST)
        }
        MinMagLinearMipPoint | ComparisonMinMagLinearMipPoint => {
            (glow::LINEAR_MIPMAP_NEAREST, glow::LINEAR)
        }
        MinMagMipLinear | ComparisonMinMagMipLinear | Anisotropic | ComparisonAnisotropic => {
            (glow::LINEAR_MIPMAP_LINEAR, glow::LINEAR)
        }
    };
    GlFilter {
        minification,
        magnification,
        comparison: matches!(
            filter,
            ComparisonMinMagMipPoint
                | ComparisonMinMagPointMipLinear
                | ComparisonMinPointMagLinearMipPoint
                | ComparisonMinPointMagMipLinear
                | ComparisonMinLinearMagMipPoint
                | ComparisonMinLinearMagPointMipLinear
                | ComparisonMinMagLinearMipPoint
                | ComparisonMinMagMipLinear
                | ComparisonAnisotropic
        ),
        anisotropic: matches!(filter, Anisotropic | ComparisonAnisotropic),
    }
}

/// Component count, component type and normalization of a vertex attribute.
pub fn convert_vertex_attribute_format(format: VertexAttributeFormat) -> (i32, u32, bool) {
    let components = format.number_of_components() as i32;
    match format {
        VertexAttributeFormat::Float1
        | VertexAttributeFormat::Float2
        | VertexAttributeFormat::Float3
        | VertexAttributeFormat::Float4 => (components, glow::FLOAT, false),
        VertexAttributeFormat::R8G8B8A8Unorm => (components, glow::UNSIGNED_BYTE, true),
        VertexAttributeFormat::R8G8B8A8Uint => (components, glow::UNSIGNED_BYTE, false),
        VertexAttributeFormat::Short2 | VertexAttributeFormat::Short4 => {
            (components, glow::SHORT, false)
        }
        VertexAttributeFormat::Uint1 => (components, glow::UNSIGNED_INT, false),
    }
}

/// `glMapBufferRange` access bits of a map type.
pub fn convert_map_type(map_type: MapType) -> u32 {
    match map_type {
        MapType::Read => glow::MAP_READ_BIT,
        MapType::Write => glow::MAP_WRITE_BIT,
        MapType::ReadWrite => glow::MAP_READ_BIT | glow::MAP_WRITE_BIT,
        MapType::WriteDiscard => glow::MAP_WRITE_BIT | glow::MAP_INVALIDATE_BUFFER_BIT,
        MapType::WriteNoOverwrite => glow::MAP_WRITE_BIT | glow::MAP_UNSYNCHRONIZED_BIT,
    }
}

/// Texture bind target and the matching binding query of a texture type.
pub fn texture_target(resource_type: ResourceType) -> Option<(u32, u32)> {
    match resource_type {
        // 1D textures are 2D textures of height one.
        ResourceType::Texture1D | ResourceType::Texture2D => {
            Some((glow::TEXTURE_2D, glow::TEXTURE_BINDING_2D))
        }
        ResourceType::Texture2DArray => Some((glow::TEXTURE_2D_ARRAY, glow::TEXTURE_BINDING_2D_ARRAY)),
        ResourceType::Texture3D => Some((glow::TEXTURE_3D, glow::TEXTURE_BINDING_3D)),
        ResourceType::TextureCube => Some((glow::TEXTURE_CUBE_MAP, glow::TEXTURE_BINDING_CUBE_MAP)),
        _ => None,
    }
}

/// Human readable reason of an incomplete framebuffer.
pub fn framebuffer_status_message(status: u32) -> &'static str {
    match status {
        glow::FRAMEBUFFER_COMPLETE => "framebuffer complete",
        glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => {
            "not all framebuffer attachment points are framebuffer attachment complete"
        }
        glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
            "no images are attached to the framebuffer"
        }
        glow::FRAMEBUFFER_INCOMPLETE_DIMENSIONS => {
            "not all attached images have the same width and height"
        }
        glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => {
            "attached images do not share the same number of samples"
        }
        glow::FRAMEBUFFER_UNSUPPORTED => {
            "the combination of internal formats of the attached images is not supported"
        }
        glow::FRAMEBUFFER_UNDEFINED => "the default framebuffer does not exist",
        _ => "unknown framebuffer status",
    }
}

/// Translate the fixed function state of a graphics pipeline.
pub fn convert_pipeline_state(
    descriptor: &GraphicsPipelineStateDescriptor,
    primitive_mode: u32,
) -> GlPipelineState {
    let rasterizer = &descriptor.rasterizer_state;
    let depth_stencil = &descriptor.depth_stencil_state;
    let target = &descriptor.blend_state.render_target[0];

    let polygon_offset = (rasterizer.depth_bias != 0 || rasterizer.slope_scaled_depth_bias != 0.0)
        .then_some((rasterizer.slope_scaled_depth_bias, rasterizer.depth_bias as f32));
    let blend = target.blend_enable.then(|| GlBlendState {
        source_rgb: convert_blend(target.src_blend),
        destination_rgb: convert_blend(target.dest_blend),
        equation_rgb: convert_blend_op(target.blend_op),
        source_alpha: convert_blend(target.src_blend_alpha),
        destination_alpha: convert_blend(target.dest_blend_alpha),
        equation_alpha: convert_blend_op(target.blend_op_alpha),
    });
    let mask = target.render_target_write_mask;

    GlPipelineState {
        primitive_mode,
        cull_face: match rasterizer.cull_mode {
            CullMode::None => None,
            CullMode::Front => Some(glow::FRONT),
            CullMode::Back => Some(glow::BACK),
        },
        front_face: if rasterizer.front_counter_clockwise {
            glow::CCW
        } else {
            glow::CW
        },
        polygon_offset,
        scissor_test: rasterizer.scissor_enable,
        depth_test: depth_stencil.depth_enable,
        depth_mask: depth_stencil.depth_write_enable,
        depth_func: convert_comparison_func(depth_stencil.depth_func),
        blend,
        color_mask: [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0, mask & 8 != 0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_formats_need_extensions() {
        let none = Extensions::default();
        assert_eq!(convert_texture_format(TextureFormat::Bc1, &none), None);
        assert_eq!(convert_texture_format(TextureFormat::Unknown, &none), None);

        let s3tc = Extensions {
            texture_compression_s3tc: true,
            ..Extensions::default()
        };
        let converted = convert_texture_format(TextureFormat::Bc3, &s3tc);
        assert_eq!(converted.map(|format| format.compressed), Some(true));
        assert_eq!(
            converted.map(|format| format.internal_format),
            Some(COMPRESSED_RGBA_S3TC_DXT5_EXT)
        );
    }

    #[test]
    fn test_core_formats() {
        let none = Extensions::default();
        let rgba = convert_texture_format(TextureFormat::R8G8B8A8, &none);
        assert_eq!(
            rgba,
            Some(GlTextureFormat::uncompressed(glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE))
        );
        let depth = convert_texture_format(TextureFormat::D32Float, &none);
        assert_eq!(depth.map(|format| format.format), Some(glow::DEPTH_COMPONENT));
    }

    #[test]
    fn test_filter_mode() {
        let filter = convert_filter_mode(FilterMode::ComparisonMinMagMipLinear);
        assert!(filter.comparison);
        assert!(!filter.anisotropic);
        assert_eq!(filter.minification, glow::LINEAR_MIPMAP_LINEAR);

        let filter = convert_filter_mode(FilterMode::MinPointMagLinearMipPoint);
        assert_eq!(
            (filter.minification, filter.magnification),
            (glow::NEAREST_MIPMAP_NEAREST, glow::LINEAR)
        );
    }

    #[test]
    fn test_map_type_access_bits() {
        assert_eq!(convert_map_type(MapType::Read), glow::MAP_READ_BIT);
        assert_eq!(
            convert_map_type(MapType::WriteDiscard),
            glow::MAP_WRITE_BIT | glow::MAP_INVALIDATE_BUFFER_BIT
        );
    }

    #[test]
    fn test_framebuffer_status_messages_are_distinct() {
        let statuses = [
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT,
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT,
            glow::FRAMEBUFFER_INCOMPLETE_DIMENSIONS,
            glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE,
            glow::FRAMEBUFFER_UNSUPPORTED,
            glow::FRAMEBUFFER_UNDEFINED,
            0,
        ];
        let mut messages: Vec<_> = statuses.iter().map(|s| framebuffer_status_message(*s)).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), statuses.len());
    }

    #[test]
    fn test_patch_list_topology() {
        assert_eq!(convert_primitive_topology(PrimitiveTopology::PatchList(3)), Some(PATCHES_EXT));
        assert_eq!(convert_primitive_topology(PrimitiveTopology::Unknown), None);
    }
}
