//! Buffer resources and the buffer manager factory.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{NativeBuffer, NativeTextureBuffer};
use crate::types::{
    BufferUsage, DrawArguments, DrawIndexedArguments, IndexBufferFormat, IndirectBufferFlags,
    TextureFormat, VertexAttribute,
};

use super::{ResourceHeader, VertexArray};

/// Factory for buffer resources and vertex arrays.
///
/// Obtained from [`Renderer::create_buffer_manager`](crate::Renderer::create_buffer_manager).
/// Every method returns `None` and logs the cause on invalid input.
pub trait BufferManager: Send + Sync {
    /// Create a vertex buffer of `size` bytes.
    fn create_vertex_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<VertexBuffer>>;

    /// Create an index buffer of `size` bytes.
    fn create_index_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
        format: IndexBufferFormat,
    ) -> Option<Arc<IndexBuffer>>;

    /// Create a vertex array.
    ///
    /// Every attribute's `input_slot` must index `vertex_buffers`.
    fn create_vertex_array(
        &self,
        attributes: &[VertexAttribute],
        vertex_buffers: &[Arc<VertexBuffer>],
        index_buffer: Option<Arc<IndexBuffer>>,
    ) -> Option<Arc<VertexArray>>;

    /// Create a uniform buffer of `size` bytes.
    fn create_uniform_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<UniformBuffer>>;

    /// Create a texture buffer of `size` bytes.
    fn create_texture_buffer(
        &self,
        size: u32,
        format: TextureFormat,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Option<Arc<TextureBuffer>>;

    /// Create an indirect buffer of `size` bytes.
    fn create_indirect_buffer(
        &self,
        size: u32,
        data: Option<&[u8]>,
        flags: IndirectBufferFlags,
        usage: BufferUsage,
    ) -> Option<Arc<IndirectBuffer>>;
}

/// Check the common buffer creation arguments, logging the cause on failure.
pub(crate) fn validate_buffer_arguments(kind: &str, size: u32, data: Option<&[u8]>) -> bool {
    if size == 0 {
        log::error!("Cannot create {kind} with zero size");
        return false;
    }
    if let Some(data) = data {
        if data.len() < size as usize {
            log::error!(
                "Cannot create {kind}: {} bytes of initial data for a {size} byte buffer",
                data.len()
            );
            return false;
        }
    }
    true
}

// ============================================================================
// Vertex Buffer
// ============================================================================

/// A buffer of vertex data.
pub struct VertexBuffer {
    pub(super) header: ResourceHeader,
    size: u32,
    usage: BufferUsage,
    native: NativeBuffer,
}

impl VertexBuffer {
    pub(crate) fn new(
        header: ResourceHeader,
        size: u32,
        usage: BufferUsage,
        native: NativeBuffer,
    ) -> Self {
        Self {
            header,
            size,
            usage,
            native,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Native handle.
    pub fn native(&self) -> &NativeBuffer {
        &self.native
    }
}

impl std::fmt::Debug for VertexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("size", &self.size)
            .field("usage", &self.usage)
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Index Buffer
// ============================================================================

/// A buffer of vertex indices.
pub struct IndexBuffer {
    pub(super) header: ResourceHeader,
    size: u32,
    usage: BufferUsage,
    format: IndexBufferFormat,
    native: NativeBuffer,
}

impl IndexBuffer {
    pub(crate) fn new(
        header: ResourceHeader,
        size: u32,
        usage: BufferUsage,
        format: IndexBufferFormat,
        native: NativeBuffer,
    ) -> Self {
        Self {
            header,
            size,
            usage,
            format,
            native,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Index element format.
    pub fn format(&self) -> IndexBufferFormat {
        self.format
    }

    /// Size of one index in bytes.
    pub fn bytes_per_element(&self) -> u32 {
        self.format.bytes_per_element()
    }

    /// Native handle.
    pub fn native(&self) -> &NativeBuffer {
        &self.native
    }
}

impl std::fmt::Debug for IndexBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Uniform Buffer
// ============================================================================

/// A buffer of shader constants.
pub struct UniformBuffer {
    pub(super) header: ResourceHeader,
    size: u32,
    usage: BufferUsage,
    native: NativeBuffer,
}

impl UniformBuffer {
    pub(crate) fn new(
        header: ResourceHeader,
        size: u32,
        usage: BufferUsage,
        native: NativeBuffer,
    ) -> Self {
        Self {
            header,
            size,
            usage,
            native,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Native handle.
    pub fn native(&self) -> &NativeBuffer {
        &self.native
    }
}

impl std::fmt::Debug for UniformBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniformBuffer")
            .field("size", &self.size)
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Texture Buffer
// ============================================================================

/// A buffer read by shaders as a one-dimensional array of texels.
pub struct TextureBuffer {
    pub(super) header: ResourceHeader,
    size: u32,
    format: TextureFormat,
    usage: BufferUsage,
    native: NativeTextureBuffer,
}

impl TextureBuffer {
    pub(crate) fn new(
        header: ResourceHeader,
        size: u32,
        format: TextureFormat,
        usage: BufferUsage,
        native: NativeTextureBuffer,
    ) -> Self {
        Self {
            header,
            size,
            format,
            usage,
            native,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Texel format.
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Native handle.
    pub fn native(&self) -> &NativeTextureBuffer {
        &self.native
    }
}

impl std::fmt::Debug for TextureBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureBuffer")
            .field("size", &self.size)
            .field("format", &self.format)
            .field("native", &self.native)
            .finish()
    }
}

// ============================================================================
// Indirect Buffer
// ============================================================================

/// A buffer of draw argument structures.
///
/// Indirect draws are emulated on the CPU, so the content lives in plain
/// memory and is read when a draw command is submitted. The storage is
/// 32-bit aligned and never reallocated.
pub struct IndirectBuffer {
    pub(super) header: ResourceHeader,
    size: u32,
    flags: IndirectBufferFlags,
    usage: BufferUsage,
    data: Mutex<Vec<u32>>,
}

impl IndirectBuffer {
    pub(crate) fn new(
        header: ResourceHeader,
        size: u32,
        data: Option<&[u8]>,
        flags: IndirectBufferFlags,
        usage: BufferUsage,
    ) -> Self {
        let mut storage = vec![0u32; size.div_ceil(4) as usize];
        if let Some(data) = data {
            let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut storage);
            let length = data.len().min(size as usize);
            bytes[..length].copy_from_slice(&data[..length]);
        }
        Self {
            header,
            size,
            flags,
            usage,
            data: Mutex::new(storage),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Which argument structures the buffer holds.
    pub fn flags(&self) -> IndirectBufferFlags {
        self.flags
    }

    /// Usage hint.
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Copy `bytes` into the buffer at `offset`.
    ///
    /// Returns `false` and writes nothing if the range exceeds the buffer.
    pub fn write(&self, offset: u32, bytes: &[u8]) -> bool {
        let start = offset as usize;
        let Some(end) = start.checked_add(bytes.len()) else {
            return false;
        };
        if end > self.size as usize {
            return false;
        }
        let mut storage = self.data.lock();
        let destination: &mut [u8] = bytemuck::cast_slice_mut(storage.as_mut_slice());
        destination[start..end].copy_from_slice(bytes);
        true
    }

    /// Write draw arguments starting at `offset`.
    pub fn write_draw_arguments(&self, offset: u32, arguments: &[DrawArguments]) -> bool {
        self.write(offset, bytemuck::cast_slice(arguments))
    }

    /// Write indexed draw arguments starting at `offset`.
    pub fn write_draw_indexed_arguments(
        &self,
        offset: u32,
        arguments: &[DrawIndexedArguments],
    ) -> bool {
        self.write(offset, bytemuck::cast_slice(arguments))
    }

    /// Run `f` with the buffer content.
    pub fn with_data<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let storage = self.data.lock();
        let bytes: &[u8] = bytemuck::cast_slice(storage.as_slice());
        f(&bytes[..self.size as usize])
    }

    /// Pointer to the start of the storage, stable for the buffer's lifetime.
    pub(crate) fn data_pointer(&self) -> std::ptr::NonNull<u8> {
        let mut storage = self.data.lock();
        let pointer = storage.as_mut_ptr().cast::<u8>();
        std::ptr::NonNull::new(pointer).unwrap_or(std::ptr::NonNull::dangling())
    }
}

impl std::fmt::Debug for IndirectBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndirectBuffer")
            .field("size", &self.size)
            .field("flags", &self.flags)
            .finish()
    }
}

// Ensure buffers are Send + Sync
static_assertions::assert_impl_all!(VertexBuffer: Send, Sync);
static_assertions::assert_impl_all!(IndexBuffer: Send, Sync);
static_assertions::assert_impl_all!(UniformBuffer: Send, Sync);
static_assertions::assert_impl_all!(TextureBuffer: Send, Sync);
static_assertions::assert_impl_all!(IndirectBuffer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{RendererId, ResourceType};
    use crate::statistics::Statistics;

    fn header(resource_type: ResourceType) -> ResourceHeader {
        ResourceHeader::new(RendererId::next(), resource_type, Arc::new(Statistics::new()))
    }

    #[test]
    fn test_validate_buffer_arguments() {
        assert!(!validate_buffer_arguments("vertex buffer", 0, None));
        assert!(!validate_buffer_arguments("vertex buffer", 16, Some(&[0; 8])));
        assert!(validate_buffer_arguments("vertex buffer", 16, Some(&[0; 16])));
    }

    #[test]
    fn test_indirect_buffer_initial_data() {
        let arguments = [DrawArguments::new(3, 1), DrawArguments::new(6, 2)];
        let buffer = IndirectBuffer::new(
            header(ResourceType::IndirectBuffer),
            32,
            Some(bytemuck::cast_slice(&arguments)),
            IndirectBufferFlags::DRAW_ARGUMENTS,
            BufferUsage::StaticDraw,
        );
        let decoded: Vec<DrawArguments> =
            buffer.with_data(|bytes| bytemuck::cast_slice(bytes).to_vec());
        assert_eq!(decoded, arguments);
    }

    #[test]
    fn test_indirect_buffer_write_bounds() {
        let buffer = IndirectBuffer::new(
            header(ResourceType::IndirectBuffer),
            20,
            None,
            IndirectBufferFlags::DRAW_INDEXED_ARGUMENTS,
            BufferUsage::DynamicDraw,
        );
        assert!(buffer.write_draw_indexed_arguments(0, &[DrawIndexedArguments::new(3, 1)]));
        assert!(!buffer.write(16, &[0; 8]));
        assert_eq!(buffer.with_data(|bytes| bytes.len()), 20);
    }
}
