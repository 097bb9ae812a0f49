//! Renderer construction context and assertion routing.

use std::sync::Arc;

use raw_window_handle::{RawDisplayHandle, RawWindowHandle};

/// Decides what happens when a renderer assertion fails.
///
/// Renderer assertions guard caller misuse (capability violations, foreign
/// resources, invalid indices). They never unwind on their own; the handler
/// returns `true` to request a break into the debugger, which the renderer
/// turns into a panic.
pub trait AssertHandler: Send + Sync {
    /// Handle a failed assertion. Returns `true` to abort.
    fn handle_assert(&self, expression: &str, file: &str, line: u32, message: &str) -> bool;
}

/// Logs failed assertions and aborts in debug builds only.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAssertHandler;

impl AssertHandler for DefaultAssertHandler {
    fn handle_assert(&self, expression: &str, file: &str, line: u32, message: &str) -> bool {
        log::error!("Renderer assertion failed: {expression} ({file}:{line}): {message}");
        cfg!(debug_assertions)
    }
}

/// Native handles of a platform window.
///
/// Raw handles are plain pointers and are only read while the renderer or
/// swap chain is being created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeWindow {
    /// Window handle.
    pub window: RawWindowHandle,
    /// Display connection the window belongs to.
    pub display: RawDisplayHandle,
}

/// Context a renderer is created with.
///
/// # Example
///
/// ```ignore
/// let context = Context::new().with_assert_handler(Arc::new(MyHandler));
/// let renderer = create_renderer("OpenGLES3", context)?;
/// ```
#[derive(Clone)]
pub struct Context {
    assert_handler: Arc<dyn AssertHandler>,
    native_window: Option<NativeWindow>,
    use_external_context: bool,
}

impl Context {
    /// Create a headless context with the default assert handler.
    pub fn new() -> Self {
        Self {
            assert_handler: Arc::new(DefaultAssertHandler),
            native_window: None,
            use_external_context: false,
        }
    }

    /// Set the assert handler.
    pub fn with_assert_handler(mut self, assert_handler: Arc<dyn AssertHandler>) -> Self {
        self.assert_handler = assert_handler;
        self
    }

    /// Set the main native window.
    pub fn with_native_window(mut self, native_window: NativeWindow) -> Self {
        self.native_window = Some(native_window);
        self
    }

    /// Use a native context which is already current instead of creating one.
    pub fn with_external_context(mut self, use_external_context: bool) -> Self {
        self.use_external_context = use_external_context;
        self
    }

    /// The assert handler.
    pub fn assert_handler(&self) -> &dyn AssertHandler {
        self.assert_handler.as_ref()
    }

    /// The main native window, if any.
    pub fn native_window(&self) -> Option<&NativeWindow> {
        self.native_window.as_ref()
    }

    /// Whether the renderer runs on a context owned by the caller.
    pub fn use_external_context(&self) -> bool {
        self.use_external_context
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("native_window", &self.native_window)
            .field("use_external_context", &self.use_external_context)
            .finish_non_exhaustive()
    }
}

// SAFETY: the raw window handles are opaque values that are only dereferenced
// by the native API during creation.
unsafe impl Send for Context {}
unsafe impl Sync for Context {}

/// Check a condition through the context's assert handler.
///
/// Evaluates to the condition, so the caller can skip the rejected operation:
///
/// ```ignore
/// if !renderer_assert!(context, count <= 8, "too many attachments: {count}") {
///     return None;
/// }
/// ```
#[macro_export]
macro_rules! renderer_assert {
    ($context:expr, $condition:expr, $($message:tt)+) => {{
        let passed: bool = $condition;
        if !passed {
            let message = format!($($message)+);
            if $context.assert_handler().handle_assert(
                stringify!($condition),
                file!(),
                line!(),
                &message,
            ) {
                panic!("renderer assertion failed: {message}");
            }
        }
        passed
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct CountingHandler(AtomicU32);

    impl AssertHandler for CountingHandler {
        fn handle_assert(&self, _: &str, _: &str, _: u32, _: &str) -> bool {
            self.0.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    #[test]
    fn test_assert_macro_routes_to_handler() {
        let handler = Arc::new(CountingHandler::default());
        let context = Context::new().with_assert_handler(handler.clone());
        assert!(renderer_assert!(context, 1 + 1 == 2, "math"));
        assert!(!renderer_assert!(context, 1 + 1 == 3, "math {}", 3));
        assert_eq!(handler.0.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_context_defaults() {
        let context = Context::default();
        assert!(context.native_window().is_none());
        assert!(!context.use_external_context());
    }
}
