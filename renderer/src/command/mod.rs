//! Command recording and dispatch.
//!
//! Commands are plain-old-data structs recorded into a [`CommandBuffer`]. Each
//! command kind has a fixed [`CommandDispatchFunctionIndex`]; backends provide
//! a [`DispatchTable`] with one decode function per index.

mod commands;
mod dispatch;
mod packet;

pub use commands::{
    BeginDebugEvent, ClearGraphics, CopyResource, DispatchCompute, DrawGraphics,
    DrawIndexedGraphics, EndDebugEvent, ExecuteCommandBuffer, ResolveMultisampleFramebuffer,
    SetComputePipelineState, SetComputeResourceGroup, SetComputeRootSignature, SetDebugMarker,
    SetGraphicsPipelineState, SetGraphicsResourceGroup, SetGraphicsRootSignature,
    SetGraphicsScissorRectangles, SetGraphicsVertexArray, SetGraphicsViewports,
    SetGraphicsRenderTarget, SetTextureMinimumMaximumMipmapIndex,
};
pub use dispatch::{
    begin_debug_event, clear_graphics, copy_resource, draw_graphics, draw_indexed_graphics,
    end_debug_event, execute_command_buffer, resolve_multisample_framebuffer, set_debug_marker,
    set_graphics_pipeline_state, set_graphics_render_target, set_graphics_resource_group,
    set_graphics_root_signature, set_graphics_scissor_rectangles, set_graphics_vertex_array,
    set_graphics_viewports, set_texture_minimum_maximum_mipmap_index, DispatchFunction,
    DispatchTable,
};
pub use packet::{CommandBuffer, CommandPacket, PacketHeader, Packets, ResourceSlot, LAST_PACKET};

/// Dispatch table index of every command kind.
///
/// The numbering is part of the recorded packet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum CommandDispatchFunctionIndex {
    ExecuteCommandBuffer = 0,
    SetGraphicsRootSignature,
    SetGraphicsPipelineState,
    SetGraphicsResourceGroup,
    SetGraphicsVertexArray,
    SetGraphicsViewports,
    SetGraphicsScissorRectangles,
    SetGraphicsRenderTarget,
    ClearGraphics,
    DrawGraphics,
    DrawIndexedGraphics,
    SetComputeRootSignature,
    SetComputePipelineState,
    SetComputeResourceGroup,
    DispatchCompute,
    SetTextureMinimumMaximumMipmapIndex,
    ResolveMultisampleFramebuffer,
    CopyResource,
    SetDebugMarker,
    BeginDebugEvent,
    EndDebugEvent,
}

impl CommandDispatchFunctionIndex {
    /// Every index, in numeric order.
    pub const ALL: [Self; 21] = [
        Self::ExecuteCommandBuffer,
        Self::SetGraphicsRootSignature,
        Self::SetGraphicsPipelineState,
        Self::SetGraphicsResourceGroup,
        Self::SetGraphicsVertexArray,
        Self::SetGraphicsViewports,
        Self::SetGraphicsScissorRectangles,
        Self::SetGraphicsRenderTarget,
        Self::ClearGraphics,
        Self::DrawGraphics,
        Self::DrawIndexedGraphics,
        Self::SetComputeRootSignature,
        Self::SetComputePipelineState,
        Self::SetComputeResourceGroup,
        Self::DispatchCompute,
        Self::SetTextureMinimumMaximumMipmapIndex,
        Self::ResolveMultisampleFramebuffer,
        Self::CopyResource,
        Self::SetDebugMarker,
        Self::BeginDebugEvent,
        Self::EndDebugEvent,
    ];

    /// Number of command kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Convert a raw packet index.
    pub fn from_u32(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A recordable command.
///
/// Commands are plain old data so they can be copied into packet memory and
/// read back without deserialization.
pub trait Command: bytemuck::Pod {
    /// The dispatch table slot handling this command.
    const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_indices_are_dense() {
        for (position, index) in CommandDispatchFunctionIndex::ALL.iter().enumerate() {
            assert_eq!(*index as usize, position);
            assert_eq!(CommandDispatchFunctionIndex::from_u32(position as u32), Some(*index));
        }
        assert_eq!(CommandDispatchFunctionIndex::from_u32(21), None);
    }
}
