//! EGL display, context and surfaces.
//!
//! The context is created once per renderer. Without a native window it
//! renders into a 1x1 pbuffer until a swap chain supplies a window surface;
//! with one, the window's surface doubles as the default surface.

use std::sync::Arc;

use khronos_egl as egl;
use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

use crate::context::NativeWindow;
use crate::error::RendererError;
use crate::types::TextureFormat;

use super::runtime_linking::{EglInstance, RuntimeLinking};
use super::Gles3Config;

const OPENGL_ES3_BIT: egl::Int = 0x40;
const CONTEXT_FLAGS_KHR: egl::Int = 0x30FC;
const CONTEXT_OPENGL_DEBUG_BIT_KHR: egl::Int = 0x0001;

fn native_display(display: &RawDisplayHandle) -> egl::NativeDisplayType {
    match display {
        RawDisplayHandle::Xlib(handle) => handle
            .display
            .map_or(egl::DEFAULT_DISPLAY, |display| display.as_ptr()),
        _ => egl::DEFAULT_DISPLAY,
    }
}

fn native_window(window: &RawWindowHandle) -> Option<egl::NativeWindowType> {
    match window {
        RawWindowHandle::Xlib(handle) => Some(handle.window as egl::NativeWindowType),
        RawWindowHandle::Xcb(handle) => Some(handle.window.get() as egl::NativeWindowType),
        RawWindowHandle::Win32(handle) => Some(handle.hwnd.get() as egl::NativeWindowType),
        RawWindowHandle::AndroidNdk(handle) => Some(handle.a_native_window.as_ptr()),
        other => {
            log::error!("Window handle {other:?} is not supported by the EGL backend");
            None
        }
    }
}

fn config_attributes(config: &Gles3Config, window: bool) -> Vec<egl::Int> {
    let alpha_size = match config.preferred_color_format {
        TextureFormat::R8G8B8 => 0,
        _ => 8,
    };
    let depth_size = if config.preferred_depth_stencil_format.is_some() { 24 } else { 0 };
    let mut attributes = vec![
        egl::RED_SIZE,
        8,
        egl::GREEN_SIZE,
        8,
        egl::BLUE_SIZE,
        8,
        egl::ALPHA_SIZE,
        alpha_size,
        egl::DEPTH_SIZE,
        depth_size,
        egl::RENDERABLE_TYPE,
        OPENGL_ES3_BIT,
        egl::SURFACE_TYPE,
        if window { egl::WINDOW_BIT } else { egl::PBUFFER_BIT },
    ];
    if config.number_of_multisamples > 1 {
        attributes.extend([
            egl::SAMPLE_BUFFERS,
            1,
            egl::SAMPLES,
            config.number_of_multisamples as egl::Int,
        ]);
    }
    attributes.push(egl::NONE);
    attributes
}

// ============================================================================
// Context
// ============================================================================

/// An initialized EGL display with an OpenGL ES 3 context.
pub struct EglContext {
    linking: Arc<RuntimeLinking>,
    display: egl::Display,
    config: egl::Config,
    context: egl::Context,
    default_surface: Option<egl::Surface>,
    default_window: Option<RawWindowHandle>,
}

impl EglContext {
    /// Initialize EGL and create a context, current on the calling thread.
    pub fn new(
        linking: Arc<RuntimeLinking>,
        window: Option<&NativeWindow>,
        config: &Gles3Config,
    ) -> Result<Self, RendererError> {
        let egl = linking.egl();
        let native_display = window.map_or(egl::DEFAULT_DISPLAY, |window| native_display(&window.display));
        // SAFETY: the display handle comes from the application's window
        // system and stays valid while the window exists.
        let display = unsafe { egl.get_display(native_display) }
            .ok_or_else(|| RendererError::ContextCreationFailed("no EGL display".to_owned()))?;
        let (major, minor) = egl
            .initialize(display)
            .map_err(|error| RendererError::ContextCreationFailed(format!("eglInitialize: {error}")))?;
        log::info!("Initialized EGL {major}.{minor}");

        let fail = |message: String| {
            let _ = egl.terminate(display);
            RendererError::ContextCreationFailed(message)
        };

        let egl_config = egl
            .choose_first_config(display, &config_attributes(config, window.is_some()))
            .map_err(|error| fail(format!("eglChooseConfig: {error}")))?
            .ok_or_else(|| fail("no EGL config supports OpenGL ES 3".to_owned()))?;
        egl.bind_api(egl::OPENGL_ES_API)
            .map_err(|error| fail(format!("eglBindAPI: {error}")))?;

        let context = Self::create_context(egl, display, egl_config, config.debug_context)
            .map_err(|error| fail(format!("eglCreateContext: {error}")))?;

        let default_surface = match window {
            Some(window) => {
                let Some(native) = native_window(&window.window) else {
                    let _ = egl.destroy_context(display, context);
                    return Err(fail("unsupported window handle".to_owned()));
                };
                // SAFETY: the window handle is valid while the window exists,
                // which the application guarantees for the renderer lifetime.
                unsafe { egl.create_window_surface(display, egl_config, native, None) }
            }
            None => egl.create_pbuffer_surface(
                display,
                egl_config,
                &[egl::WIDTH, 1, egl::HEIGHT, 1, egl::NONE],
            ),
        };
        let default_surface = match default_surface {
            Ok(surface) => Some(surface),
            Err(error) => {
                log::warn!("Could not create the default EGL surface: {error}");
                None
            }
        };

        let context = Self {
            linking: linking.clone(),
            display,
            config: egl_config,
            context,
            default_surface,
            default_window: window.map(|window| window.window),
        };
        if !context.make_current_default() {
            return Err(RendererError::ContextCreationFailed(
                "eglMakeCurrent failed".to_owned(),
            ));
        }
        Ok(context)
    }

    fn create_context(
        egl: &EglInstance,
        display: egl::Display,
        config: egl::Config,
        debug: bool,
    ) -> Result<egl::Context, egl::Error> {
        if debug {
            let attributes = [
                egl::CONTEXT_CLIENT_VERSION,
                3,
                CONTEXT_FLAGS_KHR,
                CONTEXT_OPENGL_DEBUG_BIT_KHR,
                egl::NONE,
            ];
            match egl.create_context(display, config, None, &attributes) {
                Ok(context) => return Ok(context),
                Err(error) => log::warn!("Debug context unavailable ({error}), creating a regular one"),
            }
        }
        egl.create_context(display, config, None, &[egl::CONTEXT_CLIENT_VERSION, 3, egl::NONE])
    }

    /// Make the context current on its default surface.
    pub fn make_current_default(&self) -> bool {
        self.make_current(self.default_surface)
    }

    fn make_current(&self, surface: Option<egl::Surface>) -> bool {
        match self
            .linking
            .egl()
            .make_current(self.display, surface, surface, Some(self.context))
        {
            Ok(()) => true,
            Err(error) => {
                log::error!("eglMakeCurrent failed: {error}");
                false
            }
        }
    }

    /// Create a presentable surface for a window.
    ///
    /// The window the context was created for reuses the default surface,
    /// as EGL allows a single surface per window.
    pub fn create_window_surface(
        self: &Arc<Self>,
        window: &NativeWindow,
    ) -> Option<EglWindowSurface> {
        if self.default_window == Some(window.window) {
            if let Some(surface) = self.default_surface {
                return Some(EglWindowSurface {
                    context: self.clone(),
                    surface,
                    owned: false,
                });
            }
        }
        let native = native_window(&window.window)?;
        // SAFETY: see `EglContext::new`.
        match unsafe {
            self.linking
                .egl()
                .create_window_surface(self.display, self.config, native, None)
        } {
            Ok(surface) => Some(EglWindowSurface {
                context: self.clone(),
                surface,
                owned: true,
            }),
            Err(error) => {
                log::error!("eglCreateWindowSurface failed: {error}");
                None
            }
        }
    }
}

impl Drop for EglContext {
    fn drop(&mut self) {
        let egl = self.linking.egl();
        let _ = egl.make_current(self.display, None, None, None);
        if let Some(surface) = self.default_surface.take() {
            let _ = egl.destroy_surface(self.display, surface);
        }
        let _ = egl.destroy_context(self.display, self.context);
        let _ = egl.terminate(self.display);
        log::debug!("Destroyed EGL context");
    }
}

impl std::fmt::Debug for EglContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EglContext")
            .field("default_surface", &self.default_surface.is_some())
            .finish_non_exhaustive()
    }
}

// SAFETY: the EGL handles are opaque pointers owned by this value. The
// renderer serializes every use of the context through `&mut self`.
unsafe impl Send for EglContext {}
unsafe impl Sync for EglContext {}

// ============================================================================
// Window Surface
// ============================================================================

/// A window surface of an [`EglContext`].
pub struct EglWindowSurface {
    context: Arc<EglContext>,
    surface: egl::Surface,
    owned: bool,
}

impl EglWindowSurface {
    /// Surface size in pixels.
    pub fn width_and_height(&self) -> (u32, u32) {
        let egl = self.context.linking.egl();
        let query = |attribute| {
            egl.query_surface(self.context.display, self.surface, attribute)
                .map_or(1, |value| value.max(1) as u32)
        };
        (query(egl::WIDTH), query(egl::HEIGHT))
    }

    /// Make the context current on this surface.
    pub fn make_current(&self) -> bool {
        self.context.make_current(Some(self.surface))
    }

    /// Set the swap interval of the current surface.
    pub fn set_swap_interval(&self, interval: u32) {
        if let Err(error) = self
            .context
            .linking
            .egl()
            .swap_interval(self.context.display, interval as egl::Int)
        {
            log::warn!("eglSwapInterval({interval}) failed: {error}");
        }
    }

    /// Present the back buffer.
    pub fn swap_buffers(&self) {
        if let Err(error) = self
            .context
            .linking
            .egl()
            .swap_buffers(self.context.display, self.surface)
        {
            log::error!("eglSwapBuffers failed: {error}");
        }
    }
}

impl Drop for EglWindowSurface {
    fn drop(&mut self) {
        if self.owned {
            self.context.make_current_default();
            let _ = self
                .context
                .linking
                .egl()
                .destroy_surface(self.context.display, self.surface);
        }
    }
}

// SAFETY: see `EglContext`.
unsafe impl Send for EglWindowSurface {}
unsafe impl Sync for EglWindowSurface {}
