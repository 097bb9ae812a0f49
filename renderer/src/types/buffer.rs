//! Buffer types and draw argument structures.

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

/// Expected update frequency and access pattern of a buffer.
///
/// This is a hint for the driver, it never restricts what the buffer can be
/// used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Written once by the CPU, read a few times by the GPU.
    StreamDraw,
    /// Written once by the GPU, read a few times by the CPU.
    StreamRead,
    /// Written once by the GPU, read a few times by the GPU.
    StreamCopy,
    /// Written once by the CPU, read many times by the GPU.
    #[default]
    StaticDraw,
    /// Written once by the GPU, read many times by the CPU.
    StaticRead,
    /// Written once by the GPU, read many times by the GPU.
    StaticCopy,
    /// Written repeatedly by the CPU, read many times by the GPU.
    DynamicDraw,
    /// Written repeatedly by the GPU, read many times by the CPU.
    DynamicRead,
    /// Written repeatedly by the GPU, read many times by the GPU.
    DynamicCopy,
}

/// Element format of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexBufferFormat {
    /// 8-bit indices.
    UnsignedChar,
    /// 16-bit indices.
    #[default]
    UnsignedShort,
    /// 32-bit indices, not available on every backend.
    UnsignedInt,
}

impl IndexBufferFormat {
    /// Size of one index in bytes.
    pub fn bytes_per_element(&self) -> u32 {
        match self {
            Self::UnsignedChar => 1,
            Self::UnsignedShort => 2,
            Self::UnsignedInt => 4,
        }
    }
}

bitflags! {
    /// Which draw argument structures an indirect buffer holds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct IndirectBufferFlags: u32 {
        /// The buffer holds [`DrawArguments`].
        const DRAW_ARGUMENTS = 1 << 0;
        /// The buffer holds [`DrawIndexedArguments`].
        const DRAW_INDEXED_ARGUMENTS = 1 << 1;
    }
}

impl Default for IndirectBufferFlags {
    fn default() -> Self {
        Self::DRAW_ARGUMENTS
    }
}

// ============================================================================
// Draw Arguments
// ============================================================================

/// Arguments for a non-indexed instanced draw call.
///
/// Matches the layout of `D3D12_DRAW_ARGUMENTS` / `VkDrawIndirectCommand`, so a
/// byte array of these can be used directly as indirect buffer content.
///
/// # Memory Layout
///
/// - Total size: 16 bytes
/// - Alignment: 4 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct DrawArguments {
    /// Number of vertices to draw per instance.
    pub vertex_count_per_instance: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// Index of the first vertex to draw.
    pub start_vertex_location: u32,
    /// Value added to the instance ID before reading per-instance data.
    pub start_instance_location: u32,
}

impl DrawArguments {
    /// Size of the struct in bytes.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    /// Create draw arguments for `vertex_count` vertices and `instance_count` instances.
    pub fn new(vertex_count_per_instance: u32, instance_count: u32) -> Self {
        Self {
            vertex_count_per_instance,
            instance_count,
            start_vertex_location: 0,
            start_instance_location: 0,
        }
    }

    /// Set the first vertex index.
    pub fn with_start_vertex(mut self, start_vertex_location: u32) -> Self {
        self.start_vertex_location = start_vertex_location;
        self
    }

    /// Set the first instance index.
    pub fn with_start_instance(mut self, start_instance_location: u32) -> Self {
        self.start_instance_location = start_instance_location;
        self
    }
}

/// Arguments for an indexed instanced draw call.
///
/// # Memory Layout
///
/// - Total size: 20 bytes
/// - Alignment: 4 bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct DrawIndexedArguments {
    /// Number of indices to draw per instance.
    pub index_count_per_instance: u32,
    /// Number of instances to draw.
    pub instance_count: u32,
    /// Location of the first index read from the index buffer.
    pub start_index_location: u32,
    /// Value added to each index before reading from the vertex buffer.
    pub base_vertex_location: i32,
    /// Value added to the instance ID before reading per-instance data.
    pub start_instance_location: u32,
}

impl DrawIndexedArguments {
    /// Size of the struct in bytes.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    /// Create draw arguments for `index_count` indices and `instance_count` instances.
    pub fn new(index_count_per_instance: u32, instance_count: u32) -> Self {
        Self {
            index_count_per_instance,
            instance_count,
            start_index_location: 0,
            base_vertex_location: 0,
            start_instance_location: 0,
        }
    }

    /// Set the first index.
    pub fn with_start_index(mut self, start_index_location: u32) -> Self {
        self.start_index_location = start_index_location;
        self
    }

    /// Set the base vertex offset.
    pub fn with_base_vertex(mut self, base_vertex_location: i32) -> Self {
        self.base_vertex_location = base_vertex_location;
        self
    }

    /// Set the first instance index.
    pub fn with_start_instance(mut self, start_instance_location: u32) -> Self {
        self.start_instance_location = start_instance_location;
        self
    }
}

static_assertions::const_assert_eq!(DrawArguments::SIZE, 16);
static_assertions::const_assert_eq!(DrawIndexedArguments::SIZE, 20);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_format_sizes() {
        assert_eq!(IndexBufferFormat::UnsignedChar.bytes_per_element(), 1);
        assert_eq!(IndexBufferFormat::UnsignedShort.bytes_per_element(), 2);
        assert_eq!(IndexBufferFormat::UnsignedInt.bytes_per_element(), 4);
    }

    #[test]
    fn test_draw_arguments_builder() {
        let arguments = DrawArguments::new(36, 100)
            .with_start_vertex(6)
            .with_start_instance(2);
        assert_eq!(arguments.vertex_count_per_instance, 36);
        assert_eq!(arguments.instance_count, 100);
        assert_eq!(arguments.start_vertex_location, 6);
        assert_eq!(arguments.start_instance_location, 2);
    }

    #[test]
    fn test_draw_indexed_arguments_bytes() {
        let arguments = DrawIndexedArguments::new(3, 1).with_base_vertex(-4);
        let bytes = bytemuck::bytes_of(&arguments);
        assert_eq!(bytes.len(), DrawIndexedArguments::SIZE as usize);
        let decoded: DrawIndexedArguments = bytemuck::pod_read_unaligned(bytes);
        assert_eq!(decoded.base_vertex_location, -4);
    }
}
