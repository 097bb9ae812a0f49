//! Texture creation.
//!
//! 1D textures become 2D textures of height one and multisample render
//! targets become renderbuffers. Initial data is uploaded level by level
//! from its mip-major layout.

use std::sync::Arc;

use crate::backend::NativeTexture;
use crate::resources::{
    validate_texture_arguments, ResourceHeader, ResourceType, Texture1D, Texture2D,
    Texture2DArray, Texture3D, TextureCube, TextureManager,
};
use crate::types::{mipmap_size, TextureDescriptor, TextureFlags};

use super::conversion::{convert_texture_format, texture_target, GlTextureFormat};
use super::device::Gles3Device;
use super::resources::{GlObject, GlObjectKind, GlTexture};

pub(crate) struct Gles3TextureManager {
    device: Arc<Gles3Device>,
}

/// Dimensions of one mip level: width, height and slices (layers, depth or faces).
fn level_extent(resource_type: ResourceType, descriptor: &TextureDescriptor, mipmap: u32) -> (u32, u32, u32) {
    let width = mipmap_size(descriptor.width, mipmap);
    match resource_type {
        ResourceType::Texture1D => (width, 1, 1),
        ResourceType::Texture2D => (width, mipmap_size(descriptor.height, mipmap), 1),
        ResourceType::Texture2DArray => (width, mipmap_size(descriptor.height, mipmap), descriptor.depth),
        ResourceType::Texture3D => (
            width,
            mipmap_size(descriptor.height, mipmap),
            mipmap_size(descriptor.depth, mipmap),
        ),
        ResourceType::TextureCube => (width, width, 6),
        _ => (width, 1, 1),
    }
}

impl Gles3TextureManager {
    pub(crate) fn new(device: Arc<Gles3Device>) -> Self {
        Self { device }
    }

    fn create<T>(
        &self,
        resource_type: ResourceType,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
        new: fn(ResourceHeader, TextureDescriptor, u32, NativeTexture) -> T,
    ) -> Option<Arc<T>> {
        let number_of_mipmaps = validate_texture_arguments(resource_type, descriptor, data)?;
        let maximum = self.device.core.capabilities().maximum_texture_dimension;
        if descriptor.width > maximum || descriptor.height > maximum {
            log::error!(
                "{resource_type:?} of {}x{} exceeds the maximum dimension {maximum}",
                descriptor.width,
                descriptor.height
            );
            return None;
        }
        let Some(format) = convert_texture_format(descriptor.format, &self.device.extensions) else {
            log::error!("{:?} is not supported by this device", descriptor.format);
            return None;
        };
        let texture = if descriptor.number_of_multisamples > 1 {
            self.create_renderbuffer(descriptor, format)?
        } else {
            self.create_texture(resource_type, descriptor, data, format, number_of_mipmaps)?
        };
        Some(Arc::new(new(
            self.device.core.header(resource_type),
            descriptor.clone(),
            number_of_mipmaps,
            NativeTexture::Gles3(texture),
        )))
    }

    fn create_renderbuffer(&self, descriptor: &TextureDescriptor, format: GlTextureFormat) -> Option<GlTexture> {
        let gl = &self.device.gl;
        let name = gl.create_renderbuffer();
        if name == 0 {
            log::error!("glGenRenderbuffers returned no renderbuffer");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Renderbuffer, name);
        let maximum = u32::from(self.device.core.capabilities().maximum_number_of_multisamples);
        let previous = self.device.bound(glow::RENDERBUFFER_BINDING);
        gl.bind_renderbuffer(name);
        gl.renderbuffer_storage_multisample(
            descriptor.number_of_multisamples.min(maximum) as i32,
            format.internal_format,
            descriptor.width as i32,
            descriptor.height as i32,
        );
        gl.bind_renderbuffer(previous);
        Some(GlTexture::new(object, glow::RENDERBUFFER, format.internal_format))
    }

    fn create_texture(
        &self,
        resource_type: ResourceType,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
        format: GlTextureFormat,
        number_of_mipmaps: u32,
    ) -> Option<GlTexture> {
        let (target, binding_query) = texture_target(resource_type)?;
        let gl = &self.device.gl;
        let name = gl.create_texture();
        if name == 0 {
            log::error!("glGenTextures returned no texture");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Texture, name);
        let previous = self.device.bound(binding_query);
        gl.bind_texture(target, name);

        let levels_with_data = match data {
            Some(_) if descriptor.flags.contains(TextureFlags::DATA_CONTAINS_MIPMAPS) => number_of_mipmaps,
            Some(_) => 1,
            None => 0,
        };
        let mut offset = 0usize;
        for mipmap in 0..number_of_mipmaps {
            let (width, height, slices) = level_extent(resource_type, descriptor, mipmap);
            let slice_size = descriptor.format.slice_size(width, height) as usize;
            let level_size = slice_size * slices as usize;
            let level_data = match data {
                Some(data) if mipmap < levels_with_data => {
                    let level = &data[offset..offset + level_size];
                    offset += level_size;
                    Some(level)
                }
                _ => None,
            };
            self.upload_level(resource_type, target, mipmap as i32, (width, height, slices), format, level_data);
        }

        gl.tex_parameter_i32(target, glow::TEXTURE_BASE_LEVEL, 0);
        gl.tex_parameter_i32(target, glow::TEXTURE_MAX_LEVEL, number_of_mipmaps as i32 - 1);
        if number_of_mipmaps > 1
            && levels_with_data == 1
            && descriptor.flags.contains(TextureFlags::GENERATE_MIPMAPS)
            && !format.compressed
        {
            gl.generate_mipmap(target);
        }
        gl.bind_texture(target, previous);
        Some(GlTexture::new(object, target, format.internal_format))
    }

    fn upload_level(
        &self,
        resource_type: ResourceType,
        target: u32,
        level: i32,
        (width, height, slices): (u32, u32, u32),
        format: GlTextureFormat,
        data: Option<&[u8]>,
    ) {
        let gl = &self.device.gl;
        match resource_type {
            ResourceType::Texture2DArray | ResourceType::Texture3D => {
                if format.compressed {
                    let zeroed;
                    let data = match data {
                        Some(data) => data,
                        None => {
                            zeroed = vec![0; (compressed_slice_size(width, height, format) * slices) as usize];
                            &zeroed
                        }
                    };
                    gl.compressed_tex_image_3d(
                        target,
                        level,
                        format.internal_format,
                        width as i32,
                        height as i32,
                        slices as i32,
                        data,
                    );
                } else {
                    gl.tex_image_3d(
                        target,
                        level,
                        format.internal_format as i32,
                        width as i32,
                        height as i32,
                        slices as i32,
                        format.format,
                        format.data_type,
                        data,
                    );
                }
            }
            ResourceType::TextureCube => {
                let face_size = data.map_or(0, |data| data.len() / 6);
                for face in 0..6u32 {
                    let face_data = data.map(|data| &data[face as usize * face_size..(face as usize + 1) * face_size]);
                    self.upload_2d(glow::TEXTURE_CUBE_MAP_POSITIVE_X + face, level, width, height, format, face_data);
                }
            }
            _ => self.upload_2d(target, level, width, height, format, data),
        }
    }

    fn upload_2d(
        &self,
        target: u32,
        level: i32,
        width: u32,
        height: u32,
        format: GlTextureFormat,
        data: Option<&[u8]>,
    ) {
        let gl = &self.device.gl;
        if format.compressed {
            let zeroed;
            let data = match data {
                Some(data) => data,
                None => {
                    zeroed = vec![0; compressed_slice_size(width, height, format) as usize];
                    &zeroed
                }
            };
            gl.compressed_tex_image_2d(target, level, format.internal_format, width as i32, height as i32, data);
        } else {
            gl.tex_image_2d(
                target,
                level,
                format.internal_format as i32,
                width as i32,
                height as i32,
                format.format,
                format.data_type,
                data,
            );
        }
    }
}

/// Bytes of a zero filled compressed slice, for levels created without data.
fn compressed_slice_size(width: u32, height: u32, format: GlTextureFormat) -> u32 {
    use super::functions::*;
    let block_size = match format.internal_format {
        COMPRESSED_RGBA_S3TC_DXT1_EXT
        | COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT
        | COMPRESSED_RED_RGTC1_EXT
        | ETC1_RGB8_OES => 8,
        _ => 16,
    };
    width.div_ceil(4) * height.div_ceil(4) * block_size
}

impl TextureManager for Gles3TextureManager {
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
        let maximum = self
            .device
            .core
            .capabilities()
            .maximum_number_of_2d_texture_array_slices;
        if descriptor.depth > maximum {
            log::error!("2D array texture with {} layers exceeds the maximum of {maximum}", descriptor.depth);
            return None;
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::gles3::recording::RecordingFunctions;
    use crate::backend::gles3::Gles3Config;
    use crate::context::Context;
    use crate::types::TextureFormat;

    fn manager(gl: Arc<RecordingFunctions>) -> Gles3TextureManager {
        Gles3TextureManager::new(Arc::new(Gles3Device::new(
            Context::new(),
            gl,
            None,
            &Gles3Config::default(),
        )))
    }

    #[test]
    fn test_texture_1d_is_2d_of_height_one() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        let texture = manager
            .create_texture_1d(&TextureDescriptor::new_1d(64, TextureFormat::R8).with_mipmaps(1), None)
            .unwrap();
        assert_eq!(texture.native().gles3().unwrap().target(), glow::TEXTURE_2D);
        let upload = &gl.calls_named("tex_image_2d")[0];
        assert_eq!(upload.arguments[0], i64::from(glow::TEXTURE_2D));
        assert_eq!(&upload.arguments[3..5], &[64, 1]);
    }

    #[test]
    fn test_mipmap_chain_upload() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        let descriptor = TextureDescriptor::new_2d(4, 4, TextureFormat::R8G8B8A8)
            .with_flags(TextureFlags::SHADER_RESOURCE | TextureFlags::DATA_CONTAINS_MIPMAPS);
        let data = vec![0u8; (16 + 4 + 1) * 4];
        let texture = manager.create_texture_2d(&descriptor, Some(&data)).unwrap();
        assert_eq!(texture.number_of_mipmaps(), 3);
        let uploads = gl.calls_named("tex_image_2d");
        assert_eq!(uploads.len(), 3);
        assert_eq!(uploads.iter().map(|call| call.arguments[7]).collect::<Vec<_>>(), vec![64, 16, 4]);
        assert_eq!(gl.count("generate_mipmap"), 0);
    }

    #[test]
    fn test_cube_uploads_six_faces() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        let descriptor = TextureDescriptor::new_cube(2, TextureFormat::R8G8B8A8).with_mipmaps(1);
        manager.create_texture_cube(&descriptor, Some(&[0u8; 2 * 2 * 4 * 6])).unwrap();
        let targets: Vec<i64> = gl
            .calls_named("tex_image_2d")
            .iter()
            .map(|call| call.arguments[0])
            .collect();
        let expected: Vec<i64> = (0..6).map(|face| i64::from(glow::TEXTURE_CUBE_MAP_POSITIVE_X + face)).collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_multisample_render_target_is_renderbuffer() {
        let gl = Arc::new(RecordingFunctions::new());
        let manager = manager(gl.clone());
        let descriptor = TextureDescriptor::new_2d(32, 32, TextureFormat::R8G8B8A8)
            .with_flags(TextureFlags::RENDER_TARGET)
            .with_multisamples(4);
        let texture = manager.create_texture_2d(&descriptor, None).unwrap();
        assert!(texture.native().gles3().unwrap().is_renderbuffer());
        assert_eq!(
            gl.calls_named("renderbuffer_storage_multisample")[0].arguments,
            vec![4, i64::from(glow::RGBA8), 32, 32]
        );
    }

    #[test]
    fn test_unsupported_format() {
        let manager = manager(Arc::new(RecordingFunctions::new()));
        let descriptor = TextureDescriptor::new_2d(4, 4, TextureFormat::Bc1);
        assert!(manager.create_texture_2d(&descriptor, None).is_none());
    }
}
