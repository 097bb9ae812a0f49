//! Vertex attribute layout.

/// Format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeFormat {
    /// One 32-bit float.
    Float1,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Four unsigned bytes, normalized to `[0, 1]`.
    R8G8B8A8Unorm,
    /// Four unsigned bytes, integer.
    R8G8B8A8Uint,
    /// Two signed shorts, integer.
    Short2,
    /// Four signed shorts, integer.
    Short4,
    /// One unsigned 32-bit integer.
    Uint1,
}

impl VertexAttributeFormat {
    /// Number of components.
    pub fn number_of_components(&self) -> u32 {
        match self {
            Self::Float1 | Self::Uint1 => 1,
            Self::Float2 | Self::Short2 => 2,
            Self::Float3 => 3,
            Self::Float4 | Self::R8G8B8A8Unorm | Self::R8G8B8A8Uint | Self::Short4 => 4,
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float1 | Self::Uint1 | Self::R8G8B8A8Unorm | Self::R8G8B8A8Uint | Self::Short2 => 4,
            Self::Float2 | Self::Short4 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }

    /// Whether the shader reads the attribute as an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::R8G8B8A8Uint | Self::Short2 | Self::Short4 | Self::Uint1)
    }
}

/// A single vertex attribute.
///
/// The attribute's position in the attribute list is its location; the
/// GLSL attribute `name` is bound to that location before program linking.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Data format.
    pub format: VertexAttributeFormat,
    /// Attribute name in the shader.
    pub name: String,
    /// Semantic name for HLSL style backends.
    pub semantic_name: String,
    /// Semantic index for HLSL style backends.
    pub semantic_index: u32,
    /// Index of the vertex buffer this attribute is read from.
    pub input_slot: u32,
    /// Byte offset inside one vertex.
    pub aligned_byte_offset: u32,
    /// Distance between two vertices in bytes.
    pub stride_in_bytes: u32,
    /// Zero for per-vertex data, otherwise the number of instances sharing one element.
    pub instances_per_element: u32,
}

impl VertexAttribute {
    /// Create a per-vertex attribute.
    pub fn new(
        name: impl Into<String>,
        format: VertexAttributeFormat,
        aligned_byte_offset: u32,
        stride_in_bytes: u32,
    ) -> Self {
        let name = name.into();
        Self {
            format,
            semantic_name: name.to_uppercase(),
            name,
            semantic_index: 0,
            input_slot: 0,
            aligned_byte_offset,
            stride_in_bytes,
            instances_per_element: 0,
        }
    }

    /// Set the vertex buffer slot.
    pub fn with_input_slot(mut self, input_slot: u32) -> Self {
        self.input_slot = input_slot;
        self
    }

    /// Make this a per-instance attribute.
    pub fn with_instances_per_element(mut self, instances_per_element: u32) -> Self {
        self.instances_per_element = instances_per_element;
        self
    }
}
