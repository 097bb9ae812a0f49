//! Sampler types and descriptors.

/// Texture filtering for minification, magnification and mip selection.
///
/// Names read as `Min{..}Mag{..}Mip{..}`; the `Comparison` variants additionally
/// compare the fetched value against a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    /// Point sampling everywhere.
    MinMagMipPoint,
    /// Point minification and magnification, linear mip.
    MinMagPointMipLinear,
    /// Point minification, linear magnification, point mip.
    MinPointMagLinearMipPoint,
    /// Point minification, linear magnification and mip.
    MinPointMagMipLinear,
    /// Linear minification, point magnification and mip.
    MinLinearMagMipPoint,
    /// Linear minification, point magnification, linear mip.
    MinLinearMagPointMipLinear,
    /// Linear minification and magnification, point mip.
    MinMagLinearMipPoint,
    /// Linear sampling everywhere.
    #[default]
    MinMagMipLinear,
    /// Anisotropic filtering.
    Anisotropic,
    /// Comparison, point sampling everywhere.
    ComparisonMinMagMipPoint,
    /// Comparison, point minification and magnification, linear mip.
    ComparisonMinMagPointMipLinear,
    /// Comparison, point minification, linear magnification, point mip.
    ComparisonMinPointMagLinearMipPoint,
    /// Comparison, point minification, linear magnification and mip.
    ComparisonMinPointMagMipLinear,
    /// Comparison, linear minification, point magnification and mip.
    ComparisonMinLinearMagMipPoint,
    /// Comparison, linear minification, point magnification, linear mip.
    ComparisonMinLinearMagPointMipLinear,
    /// Comparison, linear minification and magnification, point mip.
    ComparisonMinMagLinearMipPoint,
    /// Comparison, linear sampling everywhere.
    ComparisonMinMagMipLinear,
    /// Comparison with anisotropic filtering.
    ComparisonAnisotropic,
}

impl FilterMode {
    /// Whether this mode compares against a reference value.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Self::ComparisonMinMagMipPoint
                | Self::ComparisonMinMagPointMipLinear
                | Self::ComparisonMinPointMagLinearMipPoint
                | Self::ComparisonMinPointMagMipLinear
                | Self::ComparisonMinLinearMagMipPoint
                | Self::ComparisonMinLinearMagPointMipLinear
                | Self::ComparisonMinMagLinearMipPoint
                | Self::ComparisonMinMagMipLinear
                | Self::ComparisonAnisotropic
        )
    }

    /// Whether this mode uses anisotropic filtering.
    pub fn is_anisotropic(&self) -> bool {
        matches!(self, Self::Anisotropic | Self::ComparisonAnisotropic)
    }
}

/// Texture coordinate addressing outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureAddressMode {
    /// Repeat the texture.
    #[default]
    Wrap,
    /// Repeat the texture, mirrored on every repetition.
    Mirror,
    /// Clamp to the edge texel.
    Clamp,
    /// Use the border color.
    Border,
    /// Mirror once around zero, then clamp.
    MirrorOnce,
}

/// Comparison function for depth testing and comparison sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComparisonFunc {
    /// Never passes.
    #[default]
    Never,
    /// Passes if less.
    Less,
    /// Passes if equal.
    Equal,
    /// Passes if less or equal.
    LessEqual,
    /// Passes if greater.
    Greater,
    /// Passes if not equal.
    NotEqual,
    /// Passes if greater or equal.
    GreaterEqual,
    /// Always passes.
    Always,
}

/// Descriptor for creating a sampler state.
///
/// Defaults match the Direct3D defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerStateDescriptor {
    /// Filter mode.
    pub filter: FilterMode,
    /// Address mode for the U coordinate.
    pub address_u: TextureAddressMode,
    /// Address mode for the V coordinate.
    pub address_v: TextureAddressMode,
    /// Address mode for the W coordinate.
    pub address_w: TextureAddressMode,
    /// Offset added to the computed mip level.
    pub mip_lod_bias: f32,
    /// Maximum anisotropy, only used by anisotropic filter modes.
    pub max_anisotropy: u32,
    /// Comparison function for comparison filter modes.
    pub comparison_func: ComparisonFunc,
    /// Border color for [`TextureAddressMode::Border`].
    pub border_color: [f32; 4],
    /// Lower clamp of the mip level range.
    pub min_lod: f32,
    /// Upper clamp of the mip level range.
    pub max_lod: f32,
}

impl SamplerStateDescriptor {
    /// Create a new sampler descriptor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a point sampling descriptor.
    pub fn point() -> Self {
        Self {
            filter: FilterMode::MinMagMipPoint,
            ..Default::default()
        }
    }

    /// Set the filter mode.
    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    /// Set the address mode for all coordinates.
    pub fn with_address_mode(mut self, mode: TextureAddressMode) -> Self {
        self.address_u = mode;
        self.address_v = mode;
        self.address_w = mode;
        self
    }

    /// Set the maximum anisotropy.
    pub fn with_max_anisotropy(mut self, max_anisotropy: u32) -> Self {
        self.max_anisotropy = max_anisotropy;
        self
    }

    /// Set the comparison function.
    pub fn with_comparison(mut self, comparison_func: ComparisonFunc) -> Self {
        self.comparison_func = comparison_func;
        self
    }
}

impl Default for SamplerStateDescriptor {
    fn default() -> Self {
        Self {
            filter: FilterMode::MinMagMipLinear,
            address_u: TextureAddressMode::Clamp,
            address_v: TextureAddressMode::Clamp,
            address_w: TextureAddressMode::Clamp,
            mip_lod_bias: 0.0,
            max_anisotropy: 16,
            comparison_func: ComparisonFunc::Never,
            border_color: [0.0; 4],
            min_lod: -f32::MAX,
            max_lod: f32::MAX,
        }
    }
}
