//! Texture types and descriptors.

use bitflags::bitflags;

/// Texture format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    // 8-bit formats
    /// 8-bit red channel, unsigned normalized.
    R8,

    // 24/32-bit formats
    /// 8-bit RGB channels, unsigned normalized.
    R8G8B8,
    /// 8-bit RGBA channels, unsigned normalized.
    #[default]
    R8G8B8A8,
    /// 8-bit RGBA channels, sRGB.
    R8G8B8A8Srgb,
    /// 8-bit BGRA channels, unsigned normalized.
    B8G8R8A8,
    /// Packed 11/11/10-bit RGB float.
    R11G11B10F,
    /// 16-bit red channel, unsigned normalized.
    R16Unorm,
    /// 32-bit red channel, unsigned integer.
    R32Uint,
    /// 32-bit red channel, float.
    R32Float,
    /// 16-bit RG channels, signed normalized.
    R16G16Snorm,
    /// 16-bit RG channels, float.
    R16G16Float,

    // 64/128-bit formats
    /// 16-bit RGBA channels, float.
    R16G16B16A16F,
    /// 32-bit RGBA channels, float.
    R32G32B32A32F,

    // Block compressed formats
    /// DXT1 compressed RGB(A), 8 bytes per 4x4 block.
    Bc1,
    /// DXT1 compressed RGB(A), sRGB.
    Bc1Srgb,
    /// DXT3 compressed RGBA, 16 bytes per 4x4 block.
    Bc2,
    /// DXT3 compressed RGBA, sRGB.
    Bc2Srgb,
    /// DXT5 compressed RGBA, 16 bytes per 4x4 block.
    Bc3,
    /// DXT5 compressed RGBA, sRGB.
    Bc3Srgb,
    /// One channel compressed, 8 bytes per 4x4 block.
    Bc4,
    /// Two channel compressed, 16 bytes per 4x4 block.
    Bc5,
    /// ETC1 compressed RGB, 8 bytes per 4x4 block.
    Etc1,

    // Depth formats
    /// 32-bit depth, float.
    D32Float,

    /// Unknown format, rejected by every factory.
    Unknown,
}

impl TextureFormat {
    /// Returns true if this is a depth format.
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::D32Float)
    }

    /// Returns true if this is a block compressed format.
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Self::Bc1
                | Self::Bc1Srgb
                | Self::Bc2
                | Self::Bc2Srgb
                | Self::Bc3
                | Self::Bc3Srgb
                | Self::Bc4
                | Self::Bc5
                | Self::Etc1
        )
    }

    /// Returns the size in bytes per pixel, or per 4x4 block for compressed formats.
    pub fn block_size(&self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::R8 => 1,
            Self::R16Unorm => 2,
            Self::R8G8B8 => 3,
            Self::R8G8B8A8
            | Self::R8G8B8A8Srgb
            | Self::B8G8R8A8
            | Self::R11G11B10F
            | Self::R32Uint
            | Self::R32Float
            | Self::R16G16Snorm
            | Self::R16G16Float
            | Self::D32Float => 4,
            Self::R16G16B16A16F => 8,
            Self::R32G32B32A32F => 16,
            Self::Bc1 | Self::Bc1Srgb | Self::Bc4 | Self::Etc1 => 8,
            Self::Bc2 | Self::Bc2Srgb | Self::Bc3 | Self::Bc3Srgb | Self::Bc5 => 16,
        }
    }

    /// Number of bytes of one row of `width` texels.
    pub fn row_size(&self, width: u32) -> u32 {
        if self.is_compressed() {
            width.div_ceil(4) * self.block_size()
        } else {
            width * self.block_size()
        }
    }

    /// Number of bytes of one `width` x `height` slice.
    pub fn slice_size(&self, width: u32, height: u32) -> u32 {
        if self.is_compressed() {
            self.row_size(width) * height.div_ceil(4)
        } else {
            self.row_size(width) * height
        }
    }
}

bitflags! {
    /// Texture creation flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureFlags: u32 {
        /// The initial data contains the complete mipmap chain, mip-major.
        const DATA_CONTAINS_MIPMAPS = 1 << 0;
        /// Generate the mipmap chain at creation and after rendering into it.
        const GENERATE_MIPMAPS = 1 << 1;
        /// The texture can be attached to a framebuffer.
        const RENDER_TARGET = 1 << 2;
        /// The texture can be read by shaders.
        const SHADER_RESOURCE = 1 << 3;
        /// The texture can be written by shaders.
        const UNORDERED_ACCESS = 1 << 4;
    }
}

impl Default for TextureFlags {
    fn default() -> Self {
        Self::SHADER_RESOURCE
    }
}

/// Expected update pattern of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureUsage {
    /// Written by the GPU, read by the GPU.
    #[default]
    Default,
    /// Written once at creation, never changed.
    Immutable,
    /// Written regularly by the CPU.
    Dynamic,
    /// Staging texture for CPU transfers.
    Staging,
}

/// Number of mipmaps of a full chain for the given largest dimension.
pub fn number_of_mipmaps(largest_dimension: u32) -> u32 {
    if largest_dimension == 0 {
        0
    } else {
        32 - largest_dimension.leading_zeros()
    }
}

/// Size of a dimension at the given mipmap level, never below one.
pub fn mipmap_size(size: u32, mipmap_index: u32) -> u32 {
    (size >> mipmap_index.min(31)).max(1)
}

/// Descriptor for creating a texture.
///
/// Dimensions unused by a texture type are ignored (`height` for 1D textures,
/// `depth` for 2D textures, and so on). `depth` is the layer count for 2D array
/// textures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Depth in texels, or number of layers.
    pub depth: u32,
    /// Texture format.
    pub format: TextureFormat,
    /// Creation flags.
    pub flags: TextureFlags,
    /// Update pattern hint.
    pub usage: TextureUsage,
    /// Number of multisamples, 2D render targets only.
    pub number_of_multisamples: u32,
    /// Explicit number of mipmaps; derived from the flags when `None`.
    pub number_of_mipmaps: Option<u32>,
}

impl TextureDescriptor {
    /// Create a new 1D texture descriptor.
    pub fn new_1d(width: u32, format: TextureFormat) -> Self {
        Self::new_3d(width, 1, 1, format)
    }

    /// Create a new 2D texture descriptor.
    pub fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        Self::new_3d(width, height, 1, format)
    }

    /// Create a new 2D array texture descriptor.
    pub fn new_2d_array(width: u32, height: u32, layers: u32, format: TextureFormat) -> Self {
        Self::new_3d(width, height, layers, format)
    }

    /// Create a new 3D texture descriptor.
    pub fn new_3d(width: u32, height: u32, depth: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            depth,
            format,
            flags: TextureFlags::default(),
            usage: TextureUsage::default(),
            number_of_multisamples: 1,
            number_of_mipmaps: None,
        }
    }

    /// Create a new cube texture descriptor.
    pub fn new_cube(size: u32, format: TextureFormat) -> Self {
        Self::new_2d(size, size, format)
    }

    /// Set the creation flags.
    pub fn with_flags(mut self, flags: TextureFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the usage hint.
    pub fn with_usage(mut self, usage: TextureUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Set the number of multisamples.
    pub fn with_multisamples(mut self, count: u32) -> Self {
        self.number_of_multisamples = count;
        self
    }

    /// Set an explicit number of mipmaps.
    pub fn with_mipmaps(mut self, count: u32) -> Self {
        self.number_of_mipmaps = Some(count);
        self
    }

    /// Resolve the number of mipmaps for the given dimensions.
    ///
    /// An explicit count wins; otherwise textures that carry or generate mipmaps
    /// get the full chain and all others a single level.
    pub fn resolve_number_of_mipmaps(&self, largest_dimension: u32) -> u32 {
        let full_chain = number_of_mipmaps(largest_dimension).max(1);
        match self.number_of_mipmaps {
            Some(count) => count.clamp(1, full_chain),
            None if self
                .flags
                .intersects(TextureFlags::DATA_CONTAINS_MIPMAPS | TextureFlags::GENERATE_MIPMAPS) =>
            {
                full_chain
            }
            None => 1,
        }
    }
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self::new_2d(1, 1, TextureFormat::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_of_mipmaps() {
        assert_eq!(number_of_mipmaps(0), 0);
        assert_eq!(number_of_mipmaps(1), 1);
        assert_eq!(number_of_mipmaps(256), 9);
        assert_eq!(number_of_mipmaps(300), 9);
    }

    #[test]
    fn test_mipmap_size_clamps_to_one() {
        assert_eq!(mipmap_size(64, 3), 8);
        assert_eq!(mipmap_size(64, 10), 1);
    }

    #[test]
    fn test_compressed_slice_size() {
        assert_eq!(TextureFormat::Bc1.slice_size(4, 4), 8);
        assert_eq!(TextureFormat::Bc3.slice_size(5, 5), 64);
        assert_eq!(TextureFormat::R8G8B8A8.slice_size(4, 2), 32);
    }

    #[test]
    fn test_resolve_number_of_mipmaps() {
        let descriptor = TextureDescriptor::new_2d(64, 32, TextureFormat::R8G8B8A8);
        assert_eq!(descriptor.resolve_number_of_mipmaps(64), 1);

        let descriptor = descriptor.with_flags(TextureFlags::GENERATE_MIPMAPS);
        assert_eq!(descriptor.resolve_number_of_mipmaps(64), 7);

        let descriptor = descriptor.with_mipmaps(3);
        assert_eq!(descriptor.resolve_number_of_mipmaps(64), 3);
    }
}
