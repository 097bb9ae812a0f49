//! Command structs and their recording functions.
//!
//! Every command is a `#[repr(C)]` plain-old-data struct. Resources are stored
//! as [`ResourceSlot`]s into the command buffer's reference table; variable
//! length payloads (viewports, inline draw arguments, debug names) go into the
//! packet's auxiliary memory.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};

use crate::resources::{
    ComputePipelineState, Framebuffer, GraphicsPipelineState, IndirectBuffer, RenderTarget,
    Resource, ResourceGroup, RootSignature, Texture, VertexArray,
};
use crate::types::{ClearFlags, DrawArguments, DrawIndexedArguments, ScissorRectangle, Viewport};

use super::{Command, CommandBuffer, CommandDispatchFunctionIndex, ResourceSlot};

macro_rules! impl_command {
    ($($name:ident),+ $(,)?) => {
        $(
            impl Command for $name {
                const DISPATCH_FUNCTION_INDEX: CommandDispatchFunctionIndex =
                    CommandDispatchFunctionIndex::$name;
            }
        )+
    };
}

impl_command!(
    ExecuteCommandBuffer,
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
);

fn record_optional<T>(command_buffer: &mut CommandBuffer, resource: Option<&Arc<T>>) -> ResourceSlot
where
    Resource: From<Arc<T>>,
{
    command_buffer.record_optional_resource(resource.cloned().map(Resource::from))
}

// ============================================================================
// Command Buffer
// ============================================================================

/// Execute another command buffer in place.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ExecuteCommandBuffer {
    pub command_buffer: ResourceSlot,
}

impl ExecuteCommandBuffer {
    /// Record execution of `command_buffer_to_execute`.
    ///
    /// Empty command buffers are skipped at record time.
    pub fn create(command_buffer: &mut CommandBuffer, command_buffer_to_execute: &Arc<CommandBuffer>) {
        if command_buffer_to_execute.is_empty() {
            return;
        }
        let slot = command_buffer.record_command_buffer(command_buffer_to_execute);
        command_buffer.add_command(Self { command_buffer: slot }, &[]);
    }
}

// ============================================================================
// Graphics State
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRootSignature {
    pub root_signature: ResourceSlot,
}

impl SetGraphicsRootSignature {
    /// Record binding (or with `None`, unbinding) the graphics root signature.
    pub fn create(command_buffer: &mut CommandBuffer, root_signature: Option<&Arc<RootSignature>>) {
        let root_signature = record_optional(command_buffer, root_signature);
        command_buffer.add_command(Self { root_signature }, &[]);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsPipelineState {
    pub graphics_pipeline_state: ResourceSlot,
}

impl SetGraphicsPipelineState {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        graphics_pipeline_state: Option<&Arc<GraphicsPipelineState>>,
    ) {
        let graphics_pipeline_state = record_optional(command_buffer, graphics_pipeline_state);
        command_buffer.add_command(Self { graphics_pipeline_state }, &[]);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsResourceGroup {
    pub root_parameter_index: u32,
    pub resource_group: ResourceSlot,
}

impl SetGraphicsResourceGroup {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    ) {
        let resource_group = record_optional(command_buffer, resource_group);
        command_buffer.add_command(
            Self {
                root_parameter_index,
                resource_group,
            },
            &[],
        );
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsVertexArray {
    pub vertex_array: ResourceSlot,
}

impl SetGraphicsVertexArray {
    pub fn create(command_buffer: &mut CommandBuffer, vertex_array: Option<&Arc<VertexArray>>) {
        let vertex_array = record_optional(command_buffer, vertex_array);
        command_buffer.add_command(Self { vertex_array }, &[]);
    }
}

/// Set viewports, stored as auxiliary data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsViewports {
    pub number_of_viewports: u32,
}

impl SetGraphicsViewports {
    pub fn create(command_buffer: &mut CommandBuffer, viewports: &[Viewport]) {
        command_buffer.add_command(
            Self {
                number_of_viewports: viewports.len() as u32,
            },
            bytemuck::cast_slice(viewports),
        );
    }

    /// Record a single viewport covering `width` x `height` at the origin.
    pub fn create_from_dimensions(command_buffer: &mut CommandBuffer, width: u32, height: u32) {
        Self::create(command_buffer, &[Viewport::from_dimensions(width, height)]);
    }
}

/// Set scissor rectangles, stored as auxiliary data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsScissorRectangles {
    pub number_of_scissor_rectangles: u32,
}

impl SetGraphicsScissorRectangles {
    pub fn create(command_buffer: &mut CommandBuffer, scissor_rectangles: &[ScissorRectangle]) {
        command_buffer.add_command(
            Self {
                number_of_scissor_rectangles: scissor_rectangles.len() as u32,
            },
            bytemuck::cast_slice(scissor_rectangles),
        );
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetGraphicsRenderTarget {
    pub render_target: ResourceSlot,
}

impl SetGraphicsRenderTarget {
    pub fn create(command_buffer: &mut CommandBuffer, render_target: Option<&RenderTarget>) {
        let render_target =
            command_buffer.record_optional_resource(render_target.cloned().map(Resource::from));
        command_buffer.add_command(Self { render_target }, &[]);
    }
}

// ============================================================================
// Graphics Operations
// ============================================================================

/// Clear the current render target.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ClearGraphics {
    pub clear_flags: u32,
    pub color: [f32; 4],
    pub z: f32,
    pub stencil: u32,
}

impl ClearGraphics {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        clear_flags: ClearFlags,
        color: [f32; 4],
        z: f32,
        stencil: u32,
    ) {
        command_buffer.add_command(
            Self {
                clear_flags: clear_flags.bits(),
                color,
                z,
                stencil,
            },
            &[],
        );
    }

    /// The clear flags, unknown bits dropped.
    pub fn flags(&self) -> ClearFlags {
        ClearFlags::from_bits_truncate(self.clear_flags)
    }
}

/// Non-indexed draws, read from an indirect buffer or from auxiliary data.
///
/// With [`ResourceSlot::NONE`] as indirect buffer the draw arguments follow
/// the command inline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawGraphics {
    pub indirect_buffer: ResourceSlot,
    pub indirect_buffer_offset: u32,
    pub number_of_draws: u32,
}

impl DrawGraphics {
    /// Record draws whose arguments live in `indirect_buffer` at `indirect_buffer_offset`.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        indirect_buffer: &Arc<IndirectBuffer>,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) {
        let indirect_buffer = command_buffer.record_resource(&Resource::from(indirect_buffer.clone()));
        command_buffer.add_command(
            Self {
                indirect_buffer,
                indirect_buffer_offset,
                number_of_draws,
            },
            &[],
        );
    }

    /// Record draws with the arguments stored in the command buffer.
    pub fn create_inline(command_buffer: &mut CommandBuffer, arguments: &[DrawArguments]) {
        command_buffer.add_command(
            Self {
                indirect_buffer: ResourceSlot::NONE,
                indirect_buffer_offset: 0,
                number_of_draws: arguments.len() as u32,
            },
            bytemuck::cast_slice(arguments),
        );
    }
}

/// Indexed draws, read from an indirect buffer or from auxiliary data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawIndexedGraphics {
    pub indirect_buffer: ResourceSlot,
    pub indirect_buffer_offset: u32,
    pub number_of_draws: u32,
}

impl DrawIndexedGraphics {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        indirect_buffer: &Arc<IndirectBuffer>,
        indirect_buffer_offset: u32,
        number_of_draws: u32,
    ) {
        let indirect_buffer = command_buffer.record_resource(&Resource::from(indirect_buffer.clone()));
        command_buffer.add_command(
            Self {
                indirect_buffer,
                indirect_buffer_offset,
                number_of_draws,
            },
            &[],
        );
    }

    pub fn create_inline(command_buffer: &mut CommandBuffer, arguments: &[DrawIndexedArguments]) {
        command_buffer.add_command(
            Self {
                indirect_buffer: ResourceSlot::NONE,
                indirect_buffer_offset: 0,
                number_of_draws: arguments.len() as u32,
            },
            bytemuck::cast_slice(arguments),
        );
    }
}

// ============================================================================
// Compute
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputeRootSignature {
    pub root_signature: ResourceSlot,
}

impl SetComputeRootSignature {
    pub fn create(command_buffer: &mut CommandBuffer, root_signature: Option<&Arc<RootSignature>>) {
        let root_signature = record_optional(command_buffer, root_signature);
        command_buffer.add_command(Self { root_signature }, &[]);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputePipelineState {
    pub compute_pipeline_state: ResourceSlot,
}

impl SetComputePipelineState {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        compute_pipeline_state: Option<&Arc<ComputePipelineState>>,
    ) {
        let compute_pipeline_state = record_optional(command_buffer, compute_pipeline_state);
        command_buffer.add_command(Self { compute_pipeline_state }, &[]);
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetComputeResourceGroup {
    pub root_parameter_index: u32,
    pub resource_group: ResourceSlot,
}

impl SetComputeResourceGroup {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        root_parameter_index: u32,
        resource_group: Option<&Arc<ResourceGroup>>,
    ) {
        let resource_group = record_optional(command_buffer, resource_group);
        command_buffer.add_command(
            Self {
                root_parameter_index,
                resource_group,
            },
            &[],
        );
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct DispatchCompute {
    pub group_count_x: u32,
    pub group_count_y: u32,
    pub group_count_z: u32,
}

impl DispatchCompute {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) {
        command_buffer.add_command(
            Self {
                group_count_x,
                group_count_y,
                group_count_z,
            },
            &[],
        );
    }
}

// ============================================================================
// Resource Operations
// ============================================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SetTextureMinimumMaximumMipmapIndex {
    pub texture: ResourceSlot,
    pub minimum_mipmap_index: u32,
    pub maximum_mipmap_index: u32,
}

impl SetTextureMinimumMaximumMipmapIndex {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        texture: &Texture,
        minimum_mipmap_index: u32,
        maximum_mipmap_index: u32,
    ) {
        let texture = command_buffer.record_resource(&Resource::from(texture.clone()));
        command_buffer.add_command(
            Self {
                texture,
                minimum_mipmap_index,
                maximum_mipmap_index,
            },
            &[],
        );
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct ResolveMultisampleFramebuffer {
    pub destination_render_target: ResourceSlot,
    pub source_multisample_framebuffer: ResourceSlot,
}

impl ResolveMultisampleFramebuffer {
    pub fn create(
        command_buffer: &mut CommandBuffer,
        destination_render_target: &RenderTarget,
        source_multisample_framebuffer: &Arc<Framebuffer>,
    ) {
        let destination_render_target =
            command_buffer.record_resource(&Resource::from(destination_render_target.clone()));
        let source_multisample_framebuffer =
            command_buffer.record_resource(&Resource::from(source_multisample_framebuffer.clone()));
        command_buffer.add_command(
            Self {
                destination_render_target,
                source_multisample_framebuffer,
            },
            &[],
        );
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct CopyResource {
    pub destination_resource: ResourceSlot,
    pub source_resource: ResourceSlot,
}

impl CopyResource {
    pub fn create(command_buffer: &mut CommandBuffer, destination_resource: &Resource, source_resource: &Resource) {
        let destination_resource = command_buffer.record_resource(destination_resource);
        let source_resource = command_buffer.record_resource(source_resource);
        command_buffer.add_command(
            Self {
                destination_resource,
                source_resource,
            },
            &[],
        );
    }
}

// ============================================================================
// Debug
// ============================================================================

/// Insert a debug marker, the UTF-8 name stored as auxiliary data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetDebugMarker;

impl SetDebugMarker {
    pub fn create(command_buffer: &mut CommandBuffer, name: &str) {
        command_buffer.add_command(Self, name.as_bytes());
    }
}

/// Open a debug event, the UTF-8 name stored as auxiliary data.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeginDebugEvent;

impl BeginDebugEvent {
    pub fn create(command_buffer: &mut CommandBuffer, name: &str) {
        command_buffer.add_command(Self, name.as_bytes());
    }
}

/// Close the innermost debug event.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EndDebugEvent;

impl EndDebugEvent {
    pub fn create(command_buffer: &mut CommandBuffer) {
        command_buffer.add_command(Self, &[]);
    }
}

// SAFETY: zero-sized types without fields are trivially zeroable and valid
// for any (empty) bit pattern.
unsafe impl Zeroable for SetDebugMarker {}
unsafe impl Pod for SetDebugMarker {}
unsafe impl Zeroable for BeginDebugEvent {}
unsafe impl Pod for BeginDebugEvent {}
unsafe impl Zeroable for EndDebugEvent {}
unsafe impl Pod for EndDebugEvent {}

static_assertions::const_assert_eq!(std::mem::size_of::<ClearGraphics>(), 28);
static_assertions::const_assert_eq!(std::mem::size_of::<EndDebugEvent>(), 0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewports_stored_as_auxiliary_data() {
        let mut command_buffer = CommandBuffer::new();
        let viewports = [Viewport::new(1.0, 2.0, 3.0, 4.0), Viewport::from_dimensions(8, 8)];
        SetGraphicsViewports::create(&mut command_buffer, &viewports);

        let packet = command_buffer.packets().next().unwrap();
        let command = packet.command::<SetGraphicsViewports>().unwrap();
        assert_eq!(command.number_of_viewports, 2);
        let decoded: &[Viewport] = bytemuck::cast_slice(packet.auxiliary());
        assert_eq!(decoded, &viewports);
    }

    #[test]
    fn test_clear_flags_round_trip() {
        let mut command_buffer = CommandBuffer::new();
        ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR_DEPTH, [0.5; 4], 1.0, 0);
        let packet = command_buffer.packets().next().unwrap();
        let command = packet.command::<ClearGraphics>().unwrap();
        assert_eq!(command.flags(), ClearFlags::COLOR_DEPTH);
        assert_eq!(command.z, 1.0);
    }

    #[test]
    fn test_empty_nested_command_buffer_is_not_recorded() {
        let mut command_buffer = CommandBuffer::new();
        ExecuteCommandBuffer::create(&mut command_buffer, &Arc::new(CommandBuffer::new()));
        assert!(command_buffer.is_empty());
    }

    #[test]
    fn test_unbinding_records_no_resource() {
        let mut command_buffer = CommandBuffer::new();
        SetGraphicsRootSignature::create(&mut command_buffer, None);
        let packet = command_buffer.packets().next().unwrap();
        let command = packet.command::<SetGraphicsRootSignature>().unwrap();
        assert!(command.root_signature.is_none());
    }

    #[test]
    fn test_debug_marker_name() {
        let mut command_buffer = CommandBuffer::new();
        SetDebugMarker::create(&mut command_buffer, "Shadow pass");
        let packet = command_buffer.packets().next().unwrap();
        assert_eq!(packet.auxiliary(), b"Shadow pass");
    }
}
