//! Render passes, swap chains and framebuffers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::backend::{NativeFramebuffer, NativeSwapChain};
use crate::context::NativeWindow;
use crate::types::{TextureFlags, TextureFormat};

use super::{ResourceHeader, Texture};

// ============================================================================
// Render Pass
// ============================================================================

/// Formats of the attachments a pipeline renders into.
pub struct RenderPass {
    pub(super) header: ResourceHeader,
    color_attachment_formats: Vec<TextureFormat>,
    depth_stencil_attachment_format: Option<TextureFormat>,
    number_of_multisamples: u32,
}

impl RenderPass {
    pub(crate) fn new(
        header: ResourceHeader,
        color_attachment_formats: Vec<TextureFormat>,
        depth_stencil_attachment_format: Option<TextureFormat>,
        number_of_multisamples: u32,
    ) -> Self {
        Self {
            header,
            color_attachment_formats,
            depth_stencil_attachment_format,
            number_of_multisamples,
        }
    }

    /// Color attachment formats.
    pub fn color_attachment_formats(&self) -> &[TextureFormat] {
        &self.color_attachment_formats
    }

    /// Number of color attachments.
    pub fn number_of_color_attachments(&self) -> u32 {
        self.color_attachment_formats.len() as u32
    }

    /// Depth stencil attachment format, if any.
    pub fn depth_stencil_attachment_format(&self) -> Option<TextureFormat> {
        self.depth_stencil_attachment_format
    }

    /// Number of multisamples.
    pub fn number_of_multisamples(&self) -> u32 {
        self.number_of_multisamples
    }
}

impl std::fmt::Debug for RenderPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPass")
            .field("color_attachment_formats", &self.color_attachment_formats)
            .field("depth_stencil_attachment_format", &self.depth_stencil_attachment_format)
            .field("number_of_multisamples", &self.number_of_multisamples)
            .finish()
    }
}

// ============================================================================
// Swap Chain
// ============================================================================

/// A window implemented outside the renderer.
///
/// Lets applications present through their own windowing layer instead of a
/// native window handle.
pub trait RenderWindow: Send + Sync {
    /// Current client area size.
    fn width_and_height(&self) -> (u32, u32);

    /// Present the rendered frame.
    fn present(&self);
}

/// The window a swap chain presents to.
#[derive(Clone)]
pub enum SwapChainWindow {
    /// A platform window.
    Native(NativeWindow),
    /// A window implemented by the application.
    Render(Arc<dyn RenderWindow>),
}

impl std::fmt::Debug for SwapChainWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native(window) => f.debug_tuple("SwapChainWindow::Native").field(window).finish(),
            Self::Render(_) => write!(f, "SwapChainWindow::Render"),
        }
    }
}

const NO_PENDING_INTERVAL: u32 = u32::MAX;

/// A presentable render target bound to a window.
///
/// A vertical synchronization interval change is recorded and applied lazily
/// by the next [`present`](Self::present).
pub struct SwapChain {
    pub(super) header: ResourceHeader,
    render_pass: Arc<RenderPass>,
    render_window: Option<Arc<dyn RenderWindow>>,
    pending_vertical_synchronization_interval: AtomicU32,
    native: NativeSwapChain,
}

impl SwapChain {
    pub(crate) fn new(
        header: ResourceHeader,
        render_pass: Arc<RenderPass>,
        render_window: Option<Arc<dyn RenderWindow>>,
        native: NativeSwapChain,
    ) -> Self {
        Self {
            header,
            render_pass,
            render_window,
            pending_vertical_synchronization_interval: AtomicU32::new(NO_PENDING_INTERVAL),
            native,
        }
    }

    /// Render pass describing the back buffer formats.
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        &self.render_pass
    }

    /// Native handle.
    pub fn native(&self) -> &NativeSwapChain {
        &self.native
    }

    /// Current back buffer size.
    pub fn width_and_height(&self) -> (u32, u32) {
        if let Some(window) = &self.render_window {
            return window.width_and_height();
        }
        match &self.native {
            NativeSwapChain::Null => (1, 1),
            #[cfg(feature = "gles3-backend")]
            NativeSwapChain::Gles3(swap_chain) => swap_chain.width_and_height(),
        }
    }

    /// Request a vertical synchronization interval for the following presents.
    pub fn set_vertical_synchronization_interval(&self, interval: u32) {
        self.pending_vertical_synchronization_interval
            .store(interval, Ordering::Relaxed);
    }

    /// Interval waiting to be applied by the next present.
    pub fn pending_vertical_synchronization_interval(&self) -> Option<u32> {
        match self
            .pending_vertical_synchronization_interval
            .load(Ordering::Relaxed)
        {
            NO_PENDING_INTERVAL => None,
            interval => Some(interval),
        }
    }

    /// Present the back buffer, applying a pending synchronization interval first.
    pub fn present(&self) {
        let interval = match self
            .pending_vertical_synchronization_interval
            .swap(NO_PENDING_INTERVAL, Ordering::Relaxed)
        {
            NO_PENDING_INTERVAL => None,
            interval => Some(interval),
        };
        match &self.native {
            NativeSwapChain::Null => {
                if let Some(interval) = interval {
                    log::trace!("Null swap chain: vertical synchronization interval {interval}");
                }
            }
            #[cfg(feature = "gles3-backend")]
            NativeSwapChain::Gles3(swap_chain) => {
                swap_chain.present(interval, self.render_window.is_none());
            }
        }
        if let Some(window) = &self.render_window {
            window.present();
        }
    }

    /// Adapt the back buffers to the current window size.
    ///
    /// Window surfaces follow their window automatically, so this only logs.
    pub fn resize_buffers(&self) {
        let (width, height) = self.width_and_height();
        log::debug!("Swap chain resized to {width}x{height}");
    }
}

impl std::fmt::Debug for SwapChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapChain")
            .field("render_window", &self.render_window.is_some())
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Framebuffer
// ============================================================================

/// A texture level attached to a framebuffer.
#[derive(Debug, Clone)]
pub struct FramebufferAttachment {
    /// Attached texture.
    pub texture: Texture,
    /// Mipmap level to render into.
    pub mipmap_index: u32,
    /// Layer of an array texture or face of a cube texture.
    pub layer_index: u32,
}

impl FramebufferAttachment {
    /// Attach mipmap 0, layer 0 of a texture.
    pub fn new(texture: impl Into<Texture>) -> Self {
        Self {
            texture: texture.into(),
            mipmap_index: 0,
            layer_index: 0,
        }
    }

    /// Set the mipmap level.
    pub fn with_mipmap_index(mut self, mipmap_index: u32) -> Self {
        self.mipmap_index = mipmap_index;
        self
    }

    /// Set the layer.
    pub fn with_layer_index(mut self, layer_index: u32) -> Self {
        self.layer_index = layer_index;
        self
    }
}

/// Size shared by all attachments.
///
/// Attachments should agree; on a mismatch the smallest extent wins and the
/// mismatch is reported.
pub(crate) fn framebuffer_size(
    color_attachments: &[FramebufferAttachment],
    depth_stencil_attachment: Option<&FramebufferAttachment>,
) -> Option<(u32, u32)> {
    let mut size: Option<(u32, u32)> = None;
    for attachment in color_attachments.iter().chain(depth_stencil_attachment) {
        let width = attachment.texture.width(attachment.mipmap_index);
        let height = attachment.texture.height(attachment.mipmap_index);
        size = Some(match size {
            None => (width, height),
            Some((current_width, current_height)) => {
                if current_width != width || current_height != height {
                    log::warn!(
                        "Framebuffer attachments disagree in size: {current_width}x{current_height} and {width}x{height}"
                    );
                }
                (current_width.min(width), current_height.min(height))
            }
        });
    }
    size
}

/// An offscreen render target made of texture attachments.
///
/// Keeps its textures alive until it is dropped. Color textures created with
/// [`TextureFlags::GENERATE_MIPMAPS`] get their mipmaps regenerated once
/// rendering into the framebuffer is finished.
pub struct Framebuffer {
    pub(super) header: ResourceHeader,
    render_pass: Arc<RenderPass>,
    color_attachments: Vec<FramebufferAttachment>,
    depth_stencil_attachment: Option<FramebufferAttachment>,
    width: u32,
    height: u32,
    native: NativeFramebuffer,
}

impl Framebuffer {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        header: ResourceHeader,
        render_pass: Arc<RenderPass>,
        color_attachments: Vec<FramebufferAttachment>,
        depth_stencil_attachment: Option<FramebufferAttachment>,
        width: u32,
        height: u32,
        native: NativeFramebuffer,
    ) -> Self {
        Self {
            header,
            render_pass,
            color_attachments,
            depth_stencil_attachment,
            width,
            height,
            native,
        }
    }

    /// Render pass describing the attachment formats.
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        &self.render_pass
    }

    /// Color attachments.
    pub fn color_attachments(&self) -> &[FramebufferAttachment] {
        &self.color_attachments
    }

    /// Depth stencil attachment, if any.
    pub fn depth_stencil_attachment(&self) -> Option<&FramebufferAttachment> {
        self.depth_stencil_attachment.as_ref()
    }

    /// Width and height shared by all attachments.
    pub fn width_and_height(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether any color texture wants its mipmaps regenerated after rendering.
    pub fn generates_mipmaps(&self) -> bool {
        self.color_attachments
            .iter()
            .any(|attachment| attachment.texture.flags().contains(TextureFlags::GENERATE_MIPMAPS))
    }

    /// Native handle.
    pub fn native(&self) -> &NativeFramebuffer {
        &self.native
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_attachments", &self.color_attachments.len())
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Render Target
// ============================================================================

/// Anything a graphics command can render into.
#[derive(Debug, Clone)]
pub enum RenderTarget {
    /// A window back buffer.
    SwapChain(Arc<SwapChain>),
    /// An offscreen framebuffer.
    Framebuffer(Arc<Framebuffer>),
}

impl RenderTarget {
    /// The resource header.
    pub fn header(&self) -> &ResourceHeader {
        match self {
            Self::SwapChain(swap_chain) => &swap_chain.header,
            Self::Framebuffer(framebuffer) => &framebuffer.header,
        }
    }

    /// Current size.
    pub fn width_and_height(&self) -> (u32, u32) {
        match self {
            Self::SwapChain(swap_chain) => swap_chain.width_and_height(),
            Self::Framebuffer(framebuffer) => framebuffer.width_and_height(),
        }
    }

    /// Render pass of the target.
    pub fn render_pass(&self) -> &Arc<RenderPass> {
        match self {
            Self::SwapChain(swap_chain) => swap_chain.render_pass(),
            Self::Framebuffer(framebuffer) => framebuffer.render_pass(),
        }
    }

    /// Whether both references point to the same target.
    pub fn ptr_eq(&self, other: &RenderTarget) -> bool {
        match (self, other) {
            (Self::SwapChain(a), Self::SwapChain(b)) => Arc::ptr_eq(a, b),
            (Self::Framebuffer(a), Self::Framebuffer(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Arc<SwapChain>> for RenderTarget {
    fn from(swap_chain: Arc<SwapChain>) -> Self {
        Self::SwapChain(swap_chain)
    }
}

impl From<Arc<Framebuffer>> for RenderTarget {
    fn from(framebuffer: Arc<Framebuffer>) -> Self {
        Self::Framebuffer(framebuffer)
    }
}

static_assertions::assert_impl_all!(RenderPass: Send, Sync);
static_assertions::assert_impl_all!(SwapChain: Send, Sync);
static_assertions::assert_impl_all!(Framebuffer: Send, Sync);
