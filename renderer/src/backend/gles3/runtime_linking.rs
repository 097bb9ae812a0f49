//! Runtime loading of the EGL and OpenGL ES libraries.
//!
//! Nothing is linked at build time; both libraries are opened when the
//! renderer is created, so a missing driver is an initialization error
//! instead of a load failure of the application.

use std::ffi::c_void;

use crate::error::RendererError;

/// EGL 1.4 entry points loaded from the system library.
pub type EglInstance = khronos_egl::DynamicInstance<khronos_egl::EGL1_4>;

#[cfg(target_os = "windows")]
const GLES_LIBRARY_NAMES: &[&str] = &["libGLESv2.dll"];

#[cfg(not(target_os = "windows"))]
const GLES_LIBRARY_NAMES: &[&str] = &["libGLESv2.so.2", "libGLESv2.so"];

/// The opened EGL and OpenGL ES libraries.
///
/// Must outlive every function pointer resolved through it.
pub struct RuntimeLinking {
    egl: EglInstance,
    gles: Option<libloading::Library>,
}

impl RuntimeLinking {
    /// Open the system libraries, or the EGL library at `egl_library` when given.
    pub fn load(egl_library: Option<&str>) -> Result<Self, RendererError> {
        // SAFETY: loading EGL runs the library's initializers; nothing else
        // touches it before this returns.
        let egl = unsafe {
            match egl_library {
                Some(path) => EglInstance::load_required_from_filename(path),
                None => EglInstance::load_required(),
            }
        }
        .map_err(|error| RendererError::LibraryLoadFailed(format!("EGL: {error}")))?;

        let gles = GLES_LIBRARY_NAMES.iter().find_map(|name| {
            // SAFETY: as above, for the OpenGL ES library.
            match unsafe { libloading::Library::new(name) } {
                Ok(library) => {
                    log::debug!("Loaded {name}");
                    Some(library)
                }
                Err(error) => {
                    log::trace!("Could not load {name}: {error}");
                    None
                }
            }
        });
        if gles.is_none() {
            log::warn!("No OpenGL ES library found, resolving every entry point through EGL");
        }
        Ok(Self { egl, gles })
    }

    /// The EGL entry points.
    pub fn egl(&self) -> &EglInstance {
        &self.egl
    }

    /// Resolve a GL entry point, null when unavailable.
    ///
    /// Core entry points come from the OpenGL ES library; extensions fall
    /// back to `eglGetProcAddress`.
    pub fn get_proc_address(&self, name: &str) -> *const c_void {
        if let Some(library) = &self.gles {
            // SAFETY: the symbol is only used as an opaque address here.
            if let Ok(symbol) = unsafe { library.get::<unsafe extern "system" fn()>(name.as_bytes()) } {
                return *symbol as *const c_void;
            }
        }
        self.egl
            .get_proc_address(name)
            .map_or(std::ptr::null(), |function| function as *const c_void)
    }
}

impl std::fmt::Debug for RuntimeLinking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeLinking")
            .field("gles_library", &self.gles.is_some())
            .finish_non_exhaustive()
    }
}
