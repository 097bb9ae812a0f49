//! Vertex array resource.

use std::sync::Arc;

use crate::backend::NativeVertexArray;
use crate::types::VertexAttribute;

use super::{IndexBuffer, ResourceHeader, VertexBuffer};

/// Vertex buffers, attribute layout and an optional index buffer bound as a unit.
pub struct VertexArray {
    pub(super) header: ResourceHeader,
    attributes: Vec<VertexAttribute>,
    vertex_buffers: Vec<Arc<VertexBuffer>>,
    index_buffer: Option<Arc<IndexBuffer>>,
    native: NativeVertexArray,
}

impl VertexArray {
    pub(crate) fn new(
        header: ResourceHeader,
        attributes: Vec<VertexAttribute>,
        vertex_buffers: Vec<Arc<VertexBuffer>>,
        index_buffer: Option<Arc<IndexBuffer>>,
        native: NativeVertexArray,
    ) -> Self {
        Self {
            header,
            attributes,
            vertex_buffers,
            index_buffer,
            native,
        }
    }

    /// Attribute layout.
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Vertex buffers, indexed by attribute input slot.
    pub fn vertex_buffers(&self) -> &[Arc<VertexBuffer>] {
        &self.vertex_buffers
    }

    /// Index buffer, if any.
    pub fn index_buffer(&self) -> Option<&Arc<IndexBuffer>> {
        self.index_buffer.as_ref()
    }

    /// Native handle.
    pub fn native(&self) -> &NativeVertexArray {
        &self.native
    }
}

/// Check that every attribute reads from an existing vertex buffer.
pub(crate) fn validate_vertex_array_arguments(
    attributes: &[VertexAttribute],
    vertex_buffers: &[Arc<VertexBuffer>],
) -> bool {
    match attributes
        .iter()
        .find(|attribute| attribute.input_slot as usize >= vertex_buffers.len())
    {
        Some(attribute) => {
            log::error!(
                "Vertex attribute {:?} reads input slot {} but only {} vertex buffers are given",
                attribute.name,
                attribute.input_slot,
                vertex_buffers.len()
            );
            false
        }
        None => true,
    }
}

impl std::fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexArray")
            .field("attributes", &self.attributes.len())
            .field("vertex_buffers", &self.vertex_buffers.len())
            .field("index_buffer", &self.index_buffer.is_some())
            .field("native", &self.native)
            .finish()
    }
}

static_assertions::assert_impl_all!(VertexArray: Send, Sync);
