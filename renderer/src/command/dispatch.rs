//! Backend independent decode functions.
//!
//! Each function reads one packet and calls the matching [`Renderer`] method.
//! Backends assemble their [`DispatchTable`] from these, plus their own
//! functions for the compute commands.

use bytemuck::Pod;

use crate::renderer::Renderer;
use crate::renderer_assert;
use crate::resources::{
    Framebuffer, GraphicsPipelineState, IndirectBuffer, RendererResource, ResourceGroup,
    RootSignature, VertexArray,
};
use crate::types::{DrawArguments, DrawIndexedArguments, ScissorRectangle, Viewport};

use super::commands::*;
use super::{CommandBuffer, CommandDispatchFunctionIndex, CommandPacket, ResourceSlot};

/// Decode one packet and execute it on a renderer.
pub type DispatchFunction<R> = fn(&CommandBuffer, &CommandPacket<'_>, &mut R);

/// One decode function per [`CommandDispatchFunctionIndex`].
pub type DispatchTable<R> = [DispatchFunction<R>; CommandDispatchFunctionIndex::COUNT];

fn auxiliary_slice<'a, T: Pod>(packet: &CommandPacket<'a>, count: u32) -> Option<&'a [T]> {
    match bytemuck::try_cast_slice::<u8, T>(packet.auxiliary()) {
        Ok(items) if items.len() >= count as usize => Some(&items[..count as usize]),
        Ok(_) => {
            log::error!("Auxiliary data of packet at offset {} is too small", packet.offset());
            None
        }
        Err(error) => {
            log::error!("Invalid auxiliary data of packet at offset {}: {error}", packet.offset());
            None
        }
    }
}

fn auxiliary_name<'a>(packet: &CommandPacket<'a>) -> std::borrow::Cow<'a, str> {
    String::from_utf8_lossy(packet.auxiliary())
}

/// Resolve the draw arguments of a draw command and hand them to `draw`.
fn with_draw_arguments<R: Renderer, T: Pod>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
    indirect_buffer: ResourceSlot,
    indirect_buffer_offset: u32,
    number_of_draws: u32,
    draw: fn(&mut R, &[T]),
) {
    if number_of_draws == 0 {
        return;
    }
    if indirect_buffer.is_none() {
        if let Some(arguments) = auxiliary_slice::<T>(packet, number_of_draws) {
            draw(renderer, arguments);
        }
        return;
    }

    let Some(indirect_buffer) = command_buffer.resolve_required::<IndirectBuffer>(indirect_buffer) else {
        return;
    };
    if !renderer.owns_resource(indirect_buffer.header()) {
        return;
    }
    if !renderer_assert!(
        renderer.context(),
        indirect_buffer_offset % 4 == 0,
        "Indirect buffer offset {indirect_buffer_offset} is not a multiple of four"
    ) {
        return;
    }

    let start = indirect_buffer_offset as usize;
    let end = start + number_of_draws as usize * std::mem::size_of::<T>();
    indirect_buffer.with_data(|bytes| {
        match bytes.get(start..end).map(bytemuck::try_cast_slice::<u8, T>) {
            Some(Ok(arguments)) => draw(renderer, arguments),
            _ => log::error!(
                "Indirect draw reads bytes {start}..{end} outside of a {} byte indirect buffer",
                bytes.len()
            ),
        }
    });
}

// ============================================================================
// Command Buffer
// ============================================================================

pub fn execute_command_buffer<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<ExecuteCommandBuffer>() else {
        return;
    };
    if let Some(nested) = command_buffer.command_buffer(command.command_buffer) {
        renderer.submit_command_buffer(&nested);
    }
}

// ============================================================================
// Graphics State
// ============================================================================

pub fn set_graphics_root_signature<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsRootSignature>() else {
        return;
    };
    if let Some(root_signature) = command_buffer.resolve_binding::<RootSignature>(command.root_signature) {
        renderer.set_graphics_root_signature(root_signature.as_ref());
    }
}

pub fn set_graphics_pipeline_state<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsPipelineState>() else {
        return;
    };
    if let Some(pipeline_state) =
        command_buffer.resolve_binding::<GraphicsPipelineState>(command.graphics_pipeline_state)
    {
        renderer.set_graphics_pipeline_state(pipeline_state.as_ref());
    }
}

pub fn set_graphics_resource_group<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsResourceGroup>() else {
        return;
    };
    if let Some(resource_group) = command_buffer.resolve_binding::<ResourceGroup>(command.resource_group) {
        renderer.set_graphics_resource_group(command.root_parameter_index, resource_group.as_ref());
    }
}

pub fn set_graphics_vertex_array<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsVertexArray>() else {
        return;
    };
    if let Some(vertex_array) = command_buffer.resolve_binding::<VertexArray>(command.vertex_array) {
        renderer.set_graphics_vertex_array(vertex_array.as_ref());
    }
}

pub fn set_graphics_viewports<R: Renderer>(
    _command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsViewports>() else {
        return;
    };
    if let Some(viewports) = auxiliary_slice::<Viewport>(packet, command.number_of_viewports) {
        renderer.set_graphics_viewports(viewports);
    }
}

pub fn set_graphics_scissor_rectangles<R: Renderer>(
    _command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsScissorRectangles>() else {
        return;
    };
    if let Some(rectangles) =
        auxiliary_slice::<ScissorRectangle>(packet, command.number_of_scissor_rectangles)
    {
        renderer.set_graphics_scissor_rectangles(rectangles);
    }
}

pub fn set_graphics_render_target<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetGraphicsRenderTarget>() else {
        return;
    };
    if command.render_target.is_none() {
        renderer.set_graphics_render_target(None);
        return;
    }
    let Some(resource) = command_buffer.resource(command.render_target) else {
        return;
    };
    match resource.as_render_target() {
        Some(render_target) => renderer.set_graphics_render_target(Some(&render_target)),
        None => log::error!("{:?} is not a render target", resource.resource_type()),
    }
}

// ============================================================================
// Graphics Operations
// ============================================================================

pub fn clear_graphics<R: Renderer>(
    _command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    if let Some(command) = packet.command::<ClearGraphics>() {
        renderer.clear_graphics(command.flags(), command.color, command.z, command.stencil);
    }
}

pub fn draw_graphics<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<DrawGraphics>() else {
        return;
    };
    with_draw_arguments::<R, DrawArguments>(
        command_buffer,
        packet,
        renderer,
        command.indirect_buffer,
        command.indirect_buffer_offset,
        command.number_of_draws,
        R::draw_graphics,
    );
}

pub fn draw_indexed_graphics<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<DrawIndexedGraphics>() else {
        return;
    };
    with_draw_arguments::<R, DrawIndexedArguments>(
        command_buffer,
        packet,
        renderer,
        command.indirect_buffer,
        command.indirect_buffer_offset,
        command.number_of_draws,
        R::draw_indexed_graphics,
    );
}

// ============================================================================
// Resource Operations
// ============================================================================

pub fn set_texture_minimum_maximum_mipmap_index<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<SetTextureMinimumMaximumMipmapIndex>() else {
        return;
    };
    let Some(resource) = command_buffer.resource(command.texture) else {
        return;
    };
    match resource.as_texture() {
        Some(texture) => renderer.set_texture_minimum_maximum_mipmap_index(
            &texture,
            command.minimum_mipmap_index,
            command.maximum_mipmap_index,
        ),
        None => log::error!("{:?} is not a texture", resource.resource_type()),
    }
}

pub fn resolve_multisample_framebuffer<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<ResolveMultisampleFramebuffer>() else {
        return;
    };
    let Some(destination) = command_buffer
        .resource(command.destination_render_target)
        .and_then(|resource| resource.as_render_target())
    else {
        return;
    };
    if let Some(source) = command_buffer.resolve_required::<Framebuffer>(command.source_multisample_framebuffer) {
        renderer.resolve_multisample_framebuffer(&destination, &source);
    }
}

pub fn copy_resource<R: Renderer>(
    command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    let Some(command) = packet.command::<CopyResource>() else {
        return;
    };
    let destination = command_buffer.resource(command.destination_resource);
    let source = command_buffer.resource(command.source_resource);
    if let (Some(destination), Some(source)) = (destination, source) {
        renderer.copy_resource(&destination, &source);
    }
}

// ============================================================================
// Debug
// ============================================================================

pub fn set_debug_marker<R: Renderer>(
    _command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    renderer.set_debug_marker(&auxiliary_name(packet));
}

pub fn begin_debug_event<R: Renderer>(
    _command_buffer: &CommandBuffer,
    packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    renderer.begin_debug_event(&auxiliary_name(packet));
}

pub fn end_debug_event<R: Renderer>(
    _command_buffer: &CommandBuffer,
    _packet: &CommandPacket<'_>,
    renderer: &mut R,
) {
    renderer.end_debug_event();
}
