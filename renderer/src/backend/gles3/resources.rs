//! Native OpenGL ES 3 objects stored inside the shared resource types.
//!
//! Every object owns its GL name and deletes it on drop through the function
//! table it was created with.

use std::sync::Arc;

use super::functions::GlFunctions;

// ============================================================================
// Object
// ============================================================================

/// Kind of a GL object name, selects the delete call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlObjectKind {
    Buffer,
    Texture,
    Renderbuffer,
    Sampler,
    VertexArray,
    Framebuffer,
    Shader,
    Program,
}

/// An owned GL object name.
pub struct GlObject {
    name: u32,
    kind: GlObjectKind,
    gl: Arc<dyn GlFunctions>,
}

impl GlObject {
    pub(crate) fn new(gl: Arc<dyn GlFunctions>, kind: GlObjectKind, name: u32) -> Self {
        Self { name, kind, gl }
    }

    /// The GL object name.
    pub fn name(&self) -> u32 {
        self.name
    }

    /// The object kind.
    pub fn kind(&self) -> GlObjectKind {
        self.kind
    }
}

impl Drop for GlObject {
    fn drop(&mut self) {
        log::trace!("Deleting GL {:?} {}", self.kind, self.name);
        match self.kind {
            GlObjectKind::Buffer => self.gl.delete_buffer(self.name),
            GlObjectKind::Texture => self.gl.delete_texture(self.name),
            GlObjectKind::Renderbuffer => self.gl.delete_renderbuffer(self.name),
            GlObjectKind::Sampler => self.gl.delete_sampler(self.name),
            GlObjectKind::VertexArray => self.gl.delete_vertex_array(self.name),
            GlObjectKind::Framebuffer => self.gl.delete_framebuffer(self.name),
            GlObjectKind::Shader => self.gl.delete_shader(self.name),
            GlObjectKind::Program => self.gl.delete_program(self.name),
        }
    }
}

impl std::fmt::Debug for GlObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self.kind, self.name)
    }
}

// ============================================================================
// Textures
// ============================================================================

/// A texture, or a renderbuffer standing in for a multisample texture.
#[derive(Debug)]
pub struct GlTexture {
    object: GlObject,
    target: u32,
    internal_format: u32,
}

impl GlTexture {
    pub(crate) fn new(object: GlObject, target: u32, internal_format: u32) -> Self {
        Self {
            object,
            target,
            internal_format,
        }
    }

    /// The GL texture or renderbuffer name.
    pub fn name(&self) -> u32 {
        self.object.name()
    }

    /// Bind target, `GL_RENDERBUFFER` for renderbuffers.
    pub fn target(&self) -> u32 {
        self.target
    }

    /// Sized internal format.
    pub fn internal_format(&self) -> u32 {
        self.internal_format
    }

    /// Whether this is a renderbuffer.
    pub fn is_renderbuffer(&self) -> bool {
        self.object.kind() == GlObjectKind::Renderbuffer
    }
}

/// A texture buffer: a buffer object and, unless emulated through a uniform
/// buffer, the buffer texture viewing it.
#[derive(Debug)]
pub struct GlTextureBuffer {
    buffer: GlObject,
    texture: Option<GlObject>,
}

impl GlTextureBuffer {
    pub(crate) fn new(buffer: GlObject, texture: Option<GlObject>) -> Self {
        Self { buffer, texture }
    }

    /// The buffer object name.
    pub fn buffer(&self) -> u32 {
        self.buffer.name()
    }

    /// The buffer texture name, `None` when emulated as a uniform buffer.
    pub fn texture(&self) -> Option<u32> {
        self.texture.as_ref().map(GlObject::name)
    }
}

// ============================================================================
// Program
// ============================================================================

/// A linked program and the location of its instance offset uniform.
#[derive(Debug)]
pub struct GlProgram {
    object: GlObject,
    draw_id_uniform_location: i32,
}

impl GlProgram {
    pub(crate) fn new(object: GlObject, draw_id_uniform_location: i32) -> Self {
        Self {
            object,
            draw_id_uniform_location,
        }
    }

    /// The GL program name.
    pub fn name(&self) -> u32 {
        self.object.name()
    }

    /// Location of `drawIdUniform`, `-1` when the program has none.
    pub fn draw_id_uniform_location(&self) -> i32 {
        self.draw_id_uniform_location
    }
}

// ============================================================================
// Pipeline State
// ============================================================================

/// Fixed function state translated to GL enums at creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GlPipelineState {
    pub primitive_mode: u32,
    pub cull_face: Option<u32>,
    pub front_face: u32,
    pub polygon_offset: Option<(f32, f32)>,
    pub scissor_test: bool,
    pub depth_test: bool,
    pub depth_mask: bool,
    pub depth_func: u32,
    pub blend: Option<GlBlendState>,
    pub color_mask: [bool; 4],
}

/// Blend factors and equations of the first render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlBlendState {
    pub source_rgb: u32,
    pub destination_rgb: u32,
    pub equation_rgb: u32,
    pub source_alpha: u32,
    pub destination_alpha: u32,
    pub equation_alpha: u32,
}

// ============================================================================
// Swap Chain
// ============================================================================

/// Where the pixels of a swap chain go.
enum SwapChainSurface {
    /// Owned EGL window surface.
    Window(super::egl_context::EglWindowSurface),
    /// Surface current in an application owned context, sized on every query.
    External(Arc<dyn GlFunctions>),
    /// Application render window or test function table.
    Headless(u32, u32),
}

/// A presentation surface.
///
/// Window surfaces are owned EGL surfaces. Swap chains of an external
/// context ask the function table for the size of the current draw surface,
/// and headless ones only report a fixed size; both present through the
/// application.
pub struct GlSwapChain {
    surface: SwapChainSurface,
}

impl GlSwapChain {
    pub(crate) fn with_surface(surface: super::egl_context::EglWindowSurface) -> Self {
        Self {
            surface: SwapChainSurface::Window(surface),
        }
    }

    pub(crate) fn external(gl: Arc<dyn GlFunctions>) -> Self {
        Self {
            surface: SwapChainSurface::External(gl),
        }
    }

    pub(crate) fn headless(width: u32, height: u32) -> Self {
        Self {
            surface: SwapChainSurface::Headless(width.max(1), height.max(1)),
        }
    }

    /// Surface size in pixels.
    pub fn width_and_height(&self) -> (u32, u32) {
        match &self.surface {
            SwapChainSurface::Window(surface) => surface.width_and_height(),
            SwapChainSurface::External(gl) => gl.current_drawable_size().unwrap_or_else(|| {
                log::warn!("The external context reports no draw surface size");
                (1, 1)
            }),
            SwapChainSurface::Headless(width, height) => (*width, *height),
        }
    }

    /// Make the window surface current for rendering.
    pub(crate) fn make_current(&self) -> bool {
        match &self.surface {
            SwapChainSurface::Window(surface) => surface.make_current(),
            _ => true,
        }
    }

    /// Apply a pending swap interval and, when asked, swap the buffers.
    pub fn present(&self, vertical_synchronization_interval: Option<u32>, swap_buffers: bool) {
        let SwapChainSurface::Window(surface) = &self.surface else {
            return;
        };
        if let Some(interval) = vertical_synchronization_interval {
            surface.set_swap_interval(interval);
        }
        if swap_buffers {
            surface.swap_buffers();
        }
    }
}

impl std::fmt::Debug for GlSwapChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlSwapChain")
            .field("window_surface", &matches!(self.surface, SwapChainSurface::Window(_)))
            .field("width_and_height", &self.width_and_height())
            .finish()
    }
}

static_assertions::assert_impl_all!(GlObject: Send, Sync);
static_assertions::assert_impl_all!(GlSwapChain: Send, Sync);
