//! Common types shared across the renderer.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

// ============================================================================
// Viewport
// ============================================================================

/// Viewport configuration for rendering.
///
/// # Coordinate System
///
/// The renderer uses the **Direct3D coordinate convention** for viewports and
/// scissor rectangles:
///
/// - **Origin**: Top-left corner of the render target
/// - **Depth range**: `[0, 1]`
///
/// Backends whose native origin is bottom-left (OpenGL family) flip the Y
/// coordinate using the height of the render target that is current when the
/// command executes.
///
/// # Example
///
/// ```ignore
/// let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
/// SetGraphicsViewports::create(&mut command_buffer, &[viewport]);
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Viewport {
    /// X coordinate of the viewport's top-left corner.
    pub top_left_x: f32,
    /// Y coordinate of the viewport's top-left corner.
    pub top_left_y: f32,
    /// Width of the viewport.
    pub width: f32,
    /// Height of the viewport.
    pub height: f32,
    /// Minimum depth value (default: 0.0).
    pub min_depth: f32,
    /// Maximum depth value (default: 1.0).
    pub max_depth: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            top_left_x: 0.0,
            top_left_y: 0.0,
            width: 0.0,
            height: 0.0,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

impl Viewport {
    /// Create a new viewport with the standard `[0, 1]` depth range.
    pub fn new(top_left_x: f32, top_left_y: f32, width: f32, height: f32) -> Self {
        Self {
            top_left_x,
            top_left_y,
            width,
            height,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }

    /// Create a viewport from dimensions with origin at (0, 0).
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(0.0, 0.0, width as f32, height as f32)
    }

    /// Set the depth range.
    pub fn with_depth_range(mut self, min_depth: f32, max_depth: f32) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }
}

// ============================================================================
// Scissor Rectangle
// ============================================================================

/// Scissor rectangle for clipping rendering, top-left origin.
///
/// Only used when the bound pipeline state enables the scissor test.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct ScissorRectangle {
    /// X coordinate of the top-left corner.
    pub top_left_x: i32,
    /// Y coordinate of the top-left corner.
    pub top_left_y: i32,
    /// X coordinate of the bottom-right corner (exclusive).
    pub bottom_right_x: i32,
    /// Y coordinate of the bottom-right corner (exclusive).
    pub bottom_right_y: i32,
}

impl ScissorRectangle {
    /// Create a new scissor rectangle from its corners.
    pub fn new(top_left_x: i32, top_left_y: i32, bottom_right_x: i32, bottom_right_y: i32) -> Self {
        Self {
            top_left_x,
            top_left_y,
            bottom_right_x,
            bottom_right_y,
        }
    }

    /// Create a scissor rectangle from dimensions with origin at (0, 0).
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// Width of the rectangle.
    pub fn width(&self) -> i32 {
        self.bottom_right_x - self.top_left_x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> i32 {
        self.bottom_right_y - self.top_left_y
    }
}

// ============================================================================
// Clear
// ============================================================================

bitflags! {
    /// Which render target parts a clear command touches.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        /// Clear color buffers.
        const COLOR = 1 << 0;
        /// Clear the depth buffer.
        const DEPTH = 1 << 1;
        /// Clear the stencil buffer.
        const STENCIL = 1 << 2;
        /// Clear color and depth buffers.
        const COLOR_DEPTH = Self::COLOR.bits() | Self::DEPTH.bits();
    }
}

// ============================================================================
// Primitive Topology
// ============================================================================

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Unknown topology, rejected by every backend.
    Unknown,
    /// List of points.
    PointList,
    /// List of independent lines.
    LineList,
    /// Connected line strip.
    LineStrip,
    /// List of independent triangles.
    #[default]
    TriangleList,
    /// Connected triangle strip.
    TriangleStrip,
    /// Tessellation patch list with the given number of control points (1..=32).
    PatchList(u8),
}

impl PrimitiveTopology {
    /// Number of control points if this is a patch list.
    pub fn patch_control_points(&self) -> Option<u32> {
        match self {
            Self::PatchList(points) => Some(u32::from(*points)),
            _ => None,
        }
    }
}

// ============================================================================
// Mapping
// ============================================================================

/// CPU access requested when mapping a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapType {
    /// Read-only access.
    Read,
    /// Write-only access, previous contents preserved.
    Write,
    /// Read and write access.
    ReadWrite,
    /// Write access, previous contents are discarded.
    WriteDiscard,
    /// Write access, caller promises not to overwrite data in flight.
    WriteNoOverwrite,
}

impl MapType {
    /// Whether the mapping allows reading.
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Whether the mapping allows writing.
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Read)
    }
}

/// CPU view of a mapped resource.
///
/// The pointer stays valid until the resource is unmapped. The renderer does
/// not synchronize CPU writes against GPU reads; fencing is the caller's job.
#[derive(Debug)]
pub struct MappedSubresource {
    data: std::ptr::NonNull<u8>,
    size: usize,
    /// Bytes between two rows.
    pub row_pitch: u32,
    /// Bytes between two depth slices.
    pub depth_pitch: u32,
}

impl MappedSubresource {
    /// Wrap a native mapping.
    ///
    /// # Safety
    ///
    /// `data` must point to at least `size` bytes which stay valid and
    /// exclusively accessible through this mapping until it is unmapped.
    pub unsafe fn new(data: std::ptr::NonNull<u8>, size: usize, row_pitch: u32, depth_pitch: u32) -> Self {
        Self {
            data,
            size,
            row_pitch,
            depth_pitch,
        }
    }

    /// Size of the mapped region in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw pointer to the mapped memory.
    pub fn as_ptr(&self) -> *mut u8 {
        self.data.as_ptr()
    }

    /// Mapped memory as a mutable byte slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: guaranteed by the contract of `MappedSubresource::new`.
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.size) }
    }

    /// Copy `bytes` into the mapped memory at `offset`.
    ///
    /// Returns `false` and writes nothing if the range exceeds the mapping.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> bool {
        let Some(end) = offset.checked_add(bytes.len()) else {
            return false;
        };
        if end > self.size {
            return false;
        }
        self.as_mut_slice()[offset..end].copy_from_slice(bytes);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_defaults() {
        let viewport = Viewport::from_dimensions(800, 600);
        assert_eq!(viewport.width, 800.0);
        assert_eq!(viewport.height, 600.0);
        assert_eq!(viewport.min_depth, 0.0);
        assert_eq!(viewport.max_depth, 1.0);
    }

    #[test]
    fn test_scissor_rectangle_size() {
        let rectangle = ScissorRectangle::new(10, 20, 110, 70);
        assert_eq!(rectangle.width(), 100);
        assert_eq!(rectangle.height(), 50);
    }

    #[test]
    fn test_clear_flags_combination() {
        assert_eq!(ClearFlags::COLOR_DEPTH, ClearFlags::COLOR | ClearFlags::DEPTH);
        assert!(!ClearFlags::COLOR_DEPTH.contains(ClearFlags::STENCIL));
    }

    #[test]
    fn test_mapped_subresource_write_bounds() {
        let mut storage = [0u8; 8];
        let pointer = std::ptr::NonNull::new(storage.as_mut_ptr()).unwrap();
        let mut mapped = unsafe { MappedSubresource::new(pointer, storage.len(), 8, 8) };
        assert!(mapped.write(4, &[1, 2, 3, 4]));
        assert!(!mapped.write(6, &[1, 2, 3]));
        assert_eq!(storage, [0, 0, 0, 0, 1, 2, 3, 4]);
    }
}
