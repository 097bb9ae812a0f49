//! Buffer and vertex array creation.
//!
//! Uploads go through `GL_COPY_WRITE_BUFFER`, which no draw state depends
//! on, and every touched binding point is restored afterwards.

use std::sync::Arc;

use crate::backend::{NativeBuffer, NativeTextureBuffer, NativeVertexArray};
use crate::renderer_assert;
use crate::resources::{
    validate_buffer_arguments, validate_vertex_array_arguments, BufferManager, IndexBuffer,
    IndirectBuffer, RendererResource, ResourceType, TextureBuffer, UniformBuffer, VertexArray,
    VertexBuffer,
};
use crate::types::{
    BufferUsage, IndexBufferFormat, IndirectBufferFlags, TextureFormat, VertexAttribute,
};

use super::conversion::{convert_buffer_usage, convert_texture_format, convert_vertex_attribute_format};
use super::device::Gles3Device;
use super::functions::*;
use super::resources::{GlObject, GlObjectKind, GlTextureBuffer};

const TEXTURE_BINDING_BUFFER_EXT: u32 = 0x8C2C;

pub(crate) struct Gles3BufferManager {
    device: Arc<Gles3Device>,
}

impl Gles3BufferManager {
    pub(crate) fn new(device: Arc<Gles3Device>) -> Self {
        Self { device }
    }

    fn create_buffer_object(&self, size: u32, data: Option<&[u8]>, usage: BufferUsage) -> Option<GlObject> {
        let gl = &self.device.gl;
        let name = gl.create_buffer();
        if name == 0 {
            log::error!("glGenBuffers returned no buffer");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Buffer, name);
        let previous = self.device.bound(glow::COPY_WRITE_BUFFER_BINDING);
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, name);
        gl.buffer_data(
            glow::COPY_WRITE_BUFFER,
            size as i32,
            data.map(|data| &data[..size as usize]),
            convert_buffer_usage(usage),
        );
        gl.bind_buffer(glow::COPY_WRITE_BUFFER, previous);
        Some(object)
    }
}

impl BufferManager for Gles3BufferManager {
    fn create_vertex_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<VertexBuffer>> {
        if !validate_buffer_arguments("vertex buffer", size, data) {
            return None;
        }
        let object = self.create_buffer_object(size, data, usage)?;
        Some(Arc::new(VertexBuffer::new(
            self.device.core.header(ResourceType::VertexBuffer),
            size,
            usage,
            NativeBuffer::Gles3(object),
        )))
    }

    fn create_index_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
        format: IndexBufferFormat,
    ) -> Option<Arc<IndexBuffer>> {
        if format == IndexBufferFormat::UnsignedInt
            && !renderer_assert!(
                self.device.core.context(),
                self.device.extensions.element_index_uint,
                "32-bit index buffers need GL_OES_element_index_uint"
            )
        {
            return None;
        }
        if !validate_buffer_arguments("index buffer", size, data) {
            return None;
        }
        let object = self.create_buffer_object(size, data, usage)?;
        Some(Arc::new(IndexBuffer::new(
            self.device.core.header(ResourceType::IndexBuffer),
            size,
            usage,
            format,
            NativeBuffer::Gles3(object),
        )))
    }

    fn create_vertex_array(
        &self,
        attributes: &[VertexAttribute],
        vertex_buffers: &[Arc<VertexBuffer>],
        index_buffer: Option<Arc<IndexBuffer>>,
    ) -> Option<Arc<VertexArray>> {
        let core = &self.device.core;
        if !validate_vertex_array_arguments(attributes, vertex_buffers) {
            return None;
        }
        if !vertex_buffers.iter().all(|buffer| core.owns(buffer.header()))
            || !index_buffer.as_ref().map_or(true, |buffer| core.owns(buffer.header()))
        {
            return None;
        }

        let gl = &self.device.gl;
        let name = gl.create_vertex_array();
        if name == 0 {
            log::error!("glGenVertexArrays returned no vertex array");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::VertexArray, name);
        let previous_vertex_array = self.device.bound(glow::VERTEX_ARRAY_BINDING);
        let previous_array_buffer = self.device.bound(glow::ARRAY_BUFFER_BINDING);
        gl.bind_vertex_array(name);

        for (index, attribute) in attributes.iter().enumerate() {
            let index = index as u32;
            let vertex_buffer = &vertex_buffers[attribute.input_slot as usize];
            let Some(buffer) = vertex_buffer.native().gles3() else {
                log::error!("Vertex buffer of attribute {:?} has no native buffer", attribute.name);
                continue;
            };
            gl.bind_buffer(glow::ARRAY_BUFFER, buffer.name());
            let (components, data_type, normalized) = convert_vertex_attribute_format(attribute.format);
            if attribute.format.is_integer() && !normalized {
                gl.vertex_attrib_pointer_i32(
                    index,
                    components,
                    data_type,
                    attribute.stride_in_bytes as i32,
                    attribute.aligned_byte_offset as i32,
                );
            } else {
                gl.vertex_attrib_pointer_f32(
                    index,
                    components,
                    data_type,
                    normalized,
                    attribute.stride_in_bytes as i32,
                    attribute.aligned_byte_offset as i32,
                );
            }
            gl.enable_vertex_attrib_array(index);
            if attribute.instances_per_element > 0 {
                gl.vertex_attrib_divisor(index, attribute.instances_per_element);
            }
        }
        if let Some(buffer) = index_buffer.as_ref().and_then(|buffer| buffer.native().gles3()) {
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, buffer.name());
        }

        gl.bind_vertex_array(previous_vertex_array);
        gl.bind_buffer(glow::ARRAY_BUFFER, previous_array_buffer);
        Some(Arc::new(VertexArray::new(
            core.header(ResourceType::VertexArray),
            attributes.to_vec(),
            vertex_buffers.to_vec(),
            index_buffer,
            NativeVertexArray::Gles3(object),
        )))
    }

    fn create_uniform_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<UniformBuffer>> {
        if !validate_buffer_arguments("uniform buffer", size, data) {
            return None;
        }
        let maximum = self.device.core.capabilities().maximum_uniform_buffer_size;
        if size > maximum {
            log::error!("Uniform buffer of {size} bytes exceeds the maximum of {maximum}");
            return None;
        }
        let object = self.create_buffer_object(size, data, usage)?;
        Some(Arc::new(UniformBuffer::new(
            self.device.core.header(ResourceType::UniformBuffer),
            size,
            usage,
            NativeBuffer::Gles3(object),
        )))
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
        if !validate_buffer_arguments("texture buffer", size, data) {
            return None;
        }
        let emulated = self.device.texture_buffers_as_uniform_buffers();
        let texture_format = if emulated {
            if format != TextureFormat::R32G32B32A32F {
                log::error!(
                    "Texture buffers are emulated through uniform buffers, which only support R32G32B32A32F, not {format:?}"
                );
                return None;
            }
            None
        } else {
            match convert_texture_format(format, &self.device.extensions) {
                Some(texture_format) if !texture_format.compressed => Some(texture_format),
                _ => {
                    log::error!("{format:?} is not supported for texture buffers");
                    return None;
                }
            }
        };

        let buffer = self.create_buffer_object(size, data, usage)?;
        let texture = match texture_format {
            Some(texture_format) => {
                let gl = &self.device.gl;
                let name = gl.create_texture();
                if name == 0 {
                    log::error!("glGenTextures returned no texture");
                    return None;
                }
                let texture = GlObject::new(gl.clone(), GlObjectKind::Texture, name);
                let previous = self.device.bound(TEXTURE_BINDING_BUFFER_EXT);
                gl.bind_texture(TEXTURE_BUFFER_EXT, name);
                gl.tex_buffer(TEXTURE_BUFFER_EXT, texture_format.internal_format, buffer.name());
                gl.bind_texture(TEXTURE_BUFFER_EXT, previous);
                Some(texture)
            }
            None => None,
        };
        Some(Arc::new(TextureBuffer::new(
            self.device.core.header(ResourceType::TextureBuffer),
            size,
            format,
            usage,
            NativeTextureBuffer::Gles3(GlTextureBuffer::new(buffer, texture)),
        )))
    }

    fn create_indirect_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        flags: IndirectBufferFlags,
        usage: BufferUsage,
    ) -> Option<Arc<IndirectBuffer>> {
        if !validate_buffer_arguments("indirect buffer", size, data) {
            return None;
        }
        let maximum = self.device.core.capabilities().maximum_indirect_buffer_size;
        if size > maximum {
            log::error!("Indirect buffer of {size} bytes exceeds the maximum of {maximum}");
            return None;
        }
        Some(Arc::new(IndirectBuffer::new(
            self.device.core.header(ResourceType::IndirectBuffer),
            size,
            data,
            flags,
            usage,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::gles3::recording::RecordingFunctions;
    use crate::backend::gles3::Gles3Config;
    use crate::context::Context;

    fn manager(gl: Arc<RecordingFunctions>) -> Gles3BufferManager {
        Gles3BufferManager::new(Arc::new(Gles3Device::new(
            Context::new(),
            gl,
            None,
            &Gles3Config::default(),
        )))
    }

    #[test]
    fn test_vertex_buffer_upload_restores_binding() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        let buffer = manager
            .create_vertex_buffer(16, Some(&[0; 16]), BufferUsage::StaticDraw)
            .unwrap();
        let name = buffer.native().gles3().unwrap().name();
        let binds = gl.calls_named("bind_buffer");
        assert_eq!(binds[0].arguments, vec![i64::from(glow::COPY_WRITE_BUFFER), i64::from(name)]);
        assert_eq!(binds[1].arguments, vec![i64::from(glow::COPY_WRITE_BUFFER), 0]);
        drop(buffer);
        assert_eq!(gl.calls_named("delete_buffer")[0].arguments, vec![i64::from(name)]);
    }

    #[test]
    fn test_emulated_texture_buffer_accepts_only_float4() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        assert!(manager
            .create_texture_buffer(64, TextureFormat::R8G8B8A8, None, BufferUsage::StaticDraw)
            .is_none());
        let buffer = manager
            .create_texture_buffer(64, TextureFormat::R32G32B32A32F, None, BufferUsage::StaticDraw)
            .unwrap();
        assert_eq!(buffer.native().gles3().unwrap().texture(), None);
        assert_eq!(gl.count("tex_buffer"), 0);
    }

    #[test]
    fn test_native_texture_buffer() {
        let gl = Arc::new(RecordingFunctions::new().with_extensions(&["GL_EXT_texture_buffer"]));
        let manager = manager(gl.clone());
        let buffer = manager
            .create_texture_buffer(64, TextureFormat::R32Float, None, BufferUsage::DynamicDraw)
            .unwrap();
        let native = buffer.native().gles3().unwrap();
        assert!(native.texture().is_some());
        let call = &gl.calls_named("tex_buffer")[0];
        assert_eq!(call.arguments[0], i64::from(TEXTURE_BUFFER_EXT));
        assert_eq!(call.arguments[2], i64::from(native.buffer()));
    }

    #[test]
    fn test_uniform_buffer_size_limit() {
        let manager = manager(Arc::new(RecordingFunctions::new()));
        assert!(manager.create_uniform_buffer(16384, None, BufferUsage::DynamicDraw).is_some());
        assert!(manager.create_uniform_buffer(16385, None, BufferUsage::DynamicDraw).is_none());
    }
}
