//! Texture resources and the texture manager factory.

use std::sync::Arc;

use crate::backend::NativeTexture;
use crate::types::{TextureDescriptor, TextureFlags, TextureFormat, mipmap_size};

use super::{ResourceHeader, ResourceType};

/// Factory for texture resources.
///
/// Obtained from [`Renderer::create_texture_manager`](crate::Renderer::create_texture_manager).
/// Initial data is laid out mip-major: every slice or face of mip 0, then
/// every slice or face of mip 1, and so on. Every method returns `None` and
/// logs the cause on invalid input.
pub trait TextureManager: Send + Sync {
    /// Create a 1D texture. Only `width` of the descriptor is used.
    fn create_texture_1d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture1D>>;

    /// Create a 2D texture.
    fn create_texture_2d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture2D>>;

    /// Create a 2D array texture with `depth` layers.
    fn create_texture_2d_array(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture2DArray>>;

    /// Create a 3D texture.
    fn create_texture_3d(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<Texture3D>>;

    /// Create a cube texture with `width` sized faces.
    fn create_texture_cube(
        &self,
        descriptor: &TextureDescriptor,
        data: Option<&[u8]>,
    ) -> Option<Arc<TextureCube>>;
}

/// Number of bytes of mip-major initial data for a texture.
///
/// `slices` is the number of layers (2D arrays), depth slices (3D) or faces
/// (cube). 3D textures shrink their depth with every mip level.
pub(crate) fn expected_texture_data_size(
    resource_type: ResourceType,
    descriptor: &TextureDescriptor,
    number_of_mipmaps: u32,
) -> usize {
    let (width, height, slices) = match resource_type {
        ResourceType::Texture1D => (descriptor.width, 1, 1),
        ResourceType::Texture2D => (descriptor.width, descriptor.height, 1),
        ResourceType::Texture2DArray | ResourceType::Texture3D => {
            (descriptor.width, descriptor.height, descriptor.depth)
        }
        ResourceType::TextureCube => (descriptor.width, descriptor.width, 6),
        _ => return 0,
    };
    (0..number_of_mipmaps)
        .map(|mipmap| {
            let slices = if resource_type == ResourceType::Texture3D {
                mipmap_size(slices, mipmap)
            } else {
                slices
            };
            descriptor
                .format
                .slice_size(mipmap_size(width, mipmap), mipmap_size(height, mipmap)) as usize
                * slices as usize
        })
        .sum()
}

/// Check the common texture creation arguments, logging the cause on failure.
///
/// Returns the resolved number of mipmaps.
pub(crate) fn validate_texture_arguments(
    resource_type: ResourceType,
    descriptor: &TextureDescriptor,
    data: Option<&[u8]>,
) -> Option<u32> {
    let (width, height, depth) = match resource_type {
        ResourceType::Texture1D => (descriptor.width, 1, 1),
        ResourceType::Texture2D => (descriptor.width, descriptor.height, 1),
        ResourceType::TextureCube => (descriptor.width, descriptor.width, 1),
        _ => (descriptor.width, descriptor.height, descriptor.depth),
    };
    if width == 0 || height == 0 || depth == 0 {
        log::error!(
            "Cannot create {resource_type:?} with zero dimension {width}x{height}x{depth}"
        );
        return None;
    }
    if descriptor.format == TextureFormat::Unknown {
        log::error!("Cannot create {resource_type:?} with unknown format");
        return None;
    }
    if descriptor.flags.contains(TextureFlags::RENDER_TARGET) && data.is_some() {
        log::error!("Render target {resource_type:?} must not be created with initial data");
        return None;
    }
    if descriptor.number_of_multisamples > 1
        && (resource_type != ResourceType::Texture2D
            || !descriptor.flags.contains(TextureFlags::RENDER_TARGET))
    {
        log::error!("Only 2D render target textures can be multisampled");
        return None;
    }
    let largest = match resource_type {
        ResourceType::Texture3D => width.max(height).max(depth),
        _ => width.max(height),
    };
    let number_of_mipmaps = if descriptor.number_of_multisamples > 1 {
        1
    } else {
        descriptor.resolve_number_of_mipmaps(largest)
    };
    if let Some(data) = data {
        let levels = if descriptor.flags.contains(TextureFlags::DATA_CONTAINS_MIPMAPS) {
            number_of_mipmaps
        } else {
            1
        };
        let expected = expected_texture_data_size(resource_type, descriptor, levels);
        if data.len() < expected {
            log::error!(
                "Cannot create {resource_type:?}: {} bytes of initial data, {expected} required",
                data.len()
            );
            return None;
        }
    }
    Some(number_of_mipmaps)
}

macro_rules! texture_resource {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name {
            pub(super) header: ResourceHeader,
            descriptor: TextureDescriptor,
            number_of_mipmaps: u32,
            native: NativeTexture,
        }

        impl $name {
            pub(crate) fn new(
                header: ResourceHeader,
                descriptor: TextureDescriptor,
                number_of_mipmaps: u32,
                native: NativeTexture,
            ) -> Self {
                Self {
                    header,
                    descriptor,
                    number_of_mipmaps,
                    native,
                }
            }

            /// Creation descriptor.
            pub fn descriptor(&self) -> &TextureDescriptor {
                &self.descriptor
            }

            /// Texel format.
            pub fn format(&self) -> TextureFormat {
                self.descriptor.format
            }

            /// Creation flags.
            pub fn flags(&self) -> TextureFlags {
                self.descriptor.flags
            }

            /// Number of mipmap levels.
            pub fn number_of_mipmaps(&self) -> u32 {
                self.number_of_mipmaps
            }

            /// Width in texels.
            pub fn width(&self) -> u32 {
                self.descriptor.width
            }

            /// Native handle.
            pub fn native(&self) -> &NativeTexture {
                &self.native
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("descriptor", &self.descriptor)
                    .field("number_of_mipmaps", &self.number_of_mipmaps)
                    .field("native", &self.native)
                    .finish()
            }
        }

        static_assertions::assert_impl_all!($name: Send, Sync);
    };
}

texture_resource! {
    /// A 1D texture.
    Texture1D
}

texture_resource! {
    /// A 2D texture, optionally multisampled.
    Texture2D
}

texture_resource! {
    /// A 2D array texture.
    Texture2DArray
}

texture_resource! {
    /// A 3D texture.
    Texture3D
}

texture_resource! {
    /// A cube texture.
    TextureCube
}

impl Texture2D {
    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Number of multisamples.
    pub fn number_of_multisamples(&self) -> u32 {
        self.descriptor.number_of_multisamples
    }
}

impl Texture2DArray {
    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Number of layers.
    pub fn number_of_slices(&self) -> u32 {
        self.descriptor.depth
    }
}

impl Texture3D {
    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Depth in texels.
    pub fn depth(&self) -> u32 {
        self.descriptor.depth
    }
}

// ============================================================================
// Texture Family
// ============================================================================

/// A shared reference to a texture of any dimensionality.
#[derive(Debug, Clone)]
pub enum Texture {
    /// 1D texture.
    Texture1D(Arc<Texture1D>),
    /// 2D texture.
    Texture2D(Arc<Texture2D>),
    /// 2D array texture.
    Texture2DArray(Arc<Texture2DArray>),
    /// 3D texture.
    Texture3D(Arc<Texture3D>),
    /// Cube texture.
    TextureCube(Arc<TextureCube>),
}

impl Texture {
    /// The resource header.
    pub fn header(&self) -> &ResourceHeader {
        match self {
            Self::Texture1D(texture) => &texture.header,
            Self::Texture2D(texture) => &texture.header,
            Self::Texture2DArray(texture) => &texture.header,
            Self::Texture3D(texture) => &texture.header,
            Self::TextureCube(texture) => &texture.header,
        }
    }

    /// Creation descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        match self {
            Self::Texture1D(texture) => texture.descriptor(),
            Self::Texture2D(texture) => texture.descriptor(),
            Self::Texture2DArray(texture) => texture.descriptor(),
            Self::Texture3D(texture) => texture.descriptor(),
            Self::TextureCube(texture) => texture.descriptor(),
        }
    }

    /// Number of mipmap levels.
    pub fn number_of_mipmaps(&self) -> u32 {
        match self {
            Self::Texture1D(texture) => texture.number_of_mipmaps(),
            Self::Texture2D(texture) => texture.number_of_mipmaps(),
            Self::Texture2DArray(texture) => texture.number_of_mipmaps(),
            Self::Texture3D(texture) => texture.number_of_mipmaps(),
            Self::TextureCube(texture) => texture.number_of_mipmaps(),
        }
    }

    /// Native handle.
    pub fn native(&self) -> &NativeTexture {
        match self {
            Self::Texture1D(texture) => texture.native(),
            Self::Texture2D(texture) => texture.native(),
            Self::Texture2DArray(texture) => texture.native(),
            Self::Texture3D(texture) => texture.native(),
            Self::TextureCube(texture) => texture.native(),
        }
    }

    /// Width of the given mipmap level.
    pub fn width(&self, mipmap_index: u32) -> u32 {
        mipmap_size(self.descriptor().width, mipmap_index)
    }

    /// Height of the given mipmap level; one for 1D textures.
    pub fn height(&self, mipmap_index: u32) -> u32 {
        match self {
            Self::Texture1D(_) => 1,
            Self::TextureCube(texture) => mipmap_size(texture.width(), mipmap_index),
            _ => mipmap_size(self.descriptor().height, mipmap_index),
        }
    }

    /// Texel format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor().format
    }

    /// Creation flags.
    pub fn flags(&self) -> TextureFlags {
        self.descriptor().flags
    }

    /// The resource type.
    pub fn resource_type(&self) -> ResourceType {
        self.header().resource_type()
    }

    /// Whether both references point to the same texture.
    pub fn ptr_eq(&self, other: &Texture) -> bool {
        match (self, other) {
            (Self::Texture1D(a), Self::Texture1D(b)) => Arc::ptr_eq(a, b),
            (Self::Texture2D(a), Self::Texture2D(b)) => Arc::ptr_eq(a, b),
            (Self::Texture2DArray(a), Self::Texture2DArray(b)) => Arc::ptr_eq(a, b),
            (Self::Texture3D(a), Self::Texture3D(b)) => Arc::ptr_eq(a, b),
            (Self::TextureCube(a), Self::TextureCube(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! texture_from {
    ($($name:ident),+) => {
        $(
            impl From<Arc<$name>> for Texture {
                fn from(texture: Arc<$name>) -> Self {
                    Self::$name(texture)
                }
            }
        )+
    };
}

texture_from!(Texture1D, Texture2D, Texture2DArray, Texture3D, TextureCube);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_data_size_mip_major() {
        let descriptor = TextureDescriptor::new_2d_array(4, 4, 3, TextureFormat::R8);
        // 16 + 4 + 1 bytes per layer, three layers
        assert_eq!(
            expected_texture_data_size(ResourceType::Texture2DArray, &descriptor, 3),
            63
        );
        let descriptor = TextureDescriptor::new_cube(2, TextureFormat::R8G8B8A8);
        assert_eq!(expected_texture_data_size(ResourceType::TextureCube, &descriptor, 2), 120);
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let descriptor = TextureDescriptor::new_2d(0, 16, TextureFormat::R8G8B8A8);
        assert_eq!(validate_texture_arguments(ResourceType::Texture2D, &descriptor, None), None);
    }

    #[test]
    fn test_validate_rejects_render_target_data() {
        let descriptor = TextureDescriptor::new_2d(2, 2, TextureFormat::R8)
            .with_flags(TextureFlags::RENDER_TARGET);
        assert_eq!(
            validate_texture_arguments(ResourceType::Texture2D, &descriptor, Some(&[0; 4])),
            None
        );
    }

    #[test]
    fn test_validate_resolves_mipmaps() {
        let descriptor = TextureDescriptor::new_2d(8, 8, TextureFormat::R8)
            .with_flags(TextureFlags::GENERATE_MIPMAPS | TextureFlags::SHADER_RESOURCE);
        assert_eq!(
            validate_texture_arguments(ResourceType::Texture2D, &descriptor, Some(&[0; 64])),
            Some(4)
        );
    }
}
