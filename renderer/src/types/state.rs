//! Fixed-function pipeline state descriptions.
//!
//! All defaults match the Direct3D defaults.

use super::ComparisonFunc;

// ============================================================================
// Rasterizer
// ============================================================================

/// Polygon fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Draw lines between vertices.
    Wireframe,
    /// Fill the triangles.
    #[default]
    Solid,
}

/// Which triangles are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CullMode {
    /// Draw all triangles.
    None,
    /// Cull front facing triangles.
    Front,
    /// Cull back facing triangles.
    #[default]
    Back,
}

/// Rasterizer state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerState {
    /// Polygon fill mode.
    pub fill_mode: FillMode,
    /// Cull mode.
    pub cull_mode: CullMode,
    /// Whether counter-clockwise triangles are front facing.
    pub front_counter_clockwise: bool,
    /// Constant depth value added to each pixel.
    pub depth_bias: i32,
    /// Maximum depth bias.
    pub depth_bias_clamp: f32,
    /// Scale of the slope dependent depth bias.
    pub slope_scaled_depth_bias: f32,
    /// Whether clipping against the depth range is enabled.
    pub depth_clip_enable: bool,
    /// Whether multisample anti-aliasing is enabled.
    pub multisample_enable: bool,
    /// Whether line anti-aliasing is enabled.
    pub antialiased_line_enable: bool,
    /// Whether the scissor test is enabled.
    pub scissor_enable: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Back,
            front_counter_clockwise: false,
            depth_bias: 0,
            depth_bias_clamp: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_clip_enable: true,
            multisample_enable: false,
            antialiased_line_enable: false,
            scissor_enable: false,
        }
    }
}

// ============================================================================
// Depth Stencil
// ============================================================================

/// Depth stencil state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthStencilState {
    /// Whether the depth test is enabled.
    pub depth_enable: bool,
    /// Whether depth values are written.
    pub depth_write_enable: bool,
    /// Depth comparison function.
    pub depth_func: ComparisonFunc,
    /// Whether the stencil test is enabled.
    pub stencil_enable: bool,
    /// Stencil read mask.
    pub stencil_read_mask: u8,
    /// Stencil write mask.
    pub stencil_write_mask: u8,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_enable: true,
            depth_write_enable: true,
            depth_func: ComparisonFunc::Less,
            stencil_enable: false,
            stencil_read_mask: 0xff,
            stencil_write_mask: 0xff,
        }
    }
}

// ============================================================================
// Blend
// ============================================================================

/// Blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blend {
    /// `0`.
    Zero,
    /// `1`.
    One,
    /// Source color.
    SrcColor,
    /// `1 - source color`.
    InvSrcColor,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    InvSrcAlpha,
    /// Destination alpha.
    DestAlpha,
    /// `1 - destination alpha`.
    InvDestAlpha,
    /// Destination color.
    DestColor,
    /// `1 - destination color`.
    InvDestColor,
    /// Source alpha clamped to `1 - destination alpha`.
    SrcAlphaSat,
}

/// Blend operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendOp {
    /// `source + destination`.
    #[default]
    Add,
    /// `source - destination`.
    Subtract,
    /// `destination - source`.
    RevSubtract,
    /// `min(source, destination)`.
    Min,
    /// `max(source, destination)`.
    Max,
}

/// Blend state of a single render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetBlendState {
    /// Whether blending is enabled.
    pub blend_enable: bool,
    /// Source color factor.
    pub src_blend: Blend,
    /// Destination color factor.
    pub dest_blend: Blend,
    /// Color operation.
    pub blend_op: BlendOp,
    /// Source alpha factor.
    pub src_blend_alpha: Blend,
    /// Destination alpha factor.
    pub dest_blend_alpha: Blend,
    /// Alpha operation.
    pub blend_op_alpha: BlendOp,
    /// Write mask, bit 0 red to bit 3 alpha.
    pub render_target_write_mask: u8,
}

impl Default for RenderTargetBlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_blend: Blend::One,
            dest_blend: Blend::Zero,
            blend_op: BlendOp::Add,
            src_blend_alpha: Blend::One,
            dest_blend_alpha: Blend::Zero,
            blend_op_alpha: BlendOp::Add,
            render_target_write_mask: 0x0f,
        }
    }
}

/// Blend state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// Whether alpha-to-coverage is enabled.
    pub alpha_to_coverage_enable: bool,
    /// Whether every render target uses its own blend state.
    pub independent_blend_enable: bool,
    /// Per render target blend state.
    pub render_target: [RenderTargetBlendState; 8],
}

impl BlendState {
    /// Standard `src_alpha, 1 - src_alpha` blending on the first render target.
    pub fn alpha_blending() -> Self {
        let mut state = Self::default();
        state.render_target[0] = RenderTargetBlendState {
            blend_enable: true,
            src_blend: Blend::SrcAlpha,
            dest_blend: Blend::InvSrcAlpha,
            src_blend_alpha: Blend::One,
            dest_blend_alpha: Blend::InvSrcAlpha,
            ..Default::default()
        };
        state
    }
}
