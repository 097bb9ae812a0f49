//! Command buffer integration tests.
//!
//! Exercise recording and submission through the public API against the null
//! backend, which remembers every command it executes.
//!
//! # Test Categories
//!
//! - **Packet Chain Tests**: packets are linked in append order
//! - **Auxiliary Data Tests**: variable sized payloads survive recording
//! - **Submission Tests**: resubmission, nesting and stale references

mod common;

use std::sync::Arc;

use rstest::rstest;

use common::{test_context, Scene};
use redlilium_renderer::command::{
    BeginDebugEvent, ClearGraphics, DrawGraphics, DrawIndexedGraphics, EndDebugEvent,
    ExecuteCommandBuffer, SetDebugMarker, SetGraphicsPipelineState, SetGraphicsRenderTarget,
    SetGraphicsResourceGroup, SetGraphicsRootSignature, SetGraphicsScissorRectangles,
    SetGraphicsVertexArray, SetGraphicsViewports, LAST_PACKET,
};
use redlilium_renderer::{
    ClearFlags, CommandBuffer, CommandDispatchFunctionIndex, DrawArguments, DrawIndexedArguments,
    NullRenderer, Renderer, ScissorRectangle, Viewport,
};

fn null_renderer() -> NullRenderer {
    let (context, _) = test_context();
    NullRenderer::new(context)
}

/// Record a full frame for `scene`.
fn record_frame(command_buffer: &mut CommandBuffer, scene: &Scene) {
    SetGraphicsRenderTarget::create(command_buffer, Some(&scene.render_target()));
    SetGraphicsViewports::create_from_dimensions(command_buffer, common::WIDTH, common::HEIGHT);
    ClearGraphics::create(command_buffer, ClearFlags::COLOR_DEPTH, [0.5, 0.5, 0.5, 1.0], 1.0, 0);
    SetGraphicsRootSignature::create(command_buffer, Some(&scene.root_signature));
    SetGraphicsPipelineState::create(command_buffer, Some(&scene.pipeline_state));
    SetGraphicsResourceGroup::create(command_buffer, 0, Some(&scene.texture_group));
    SetGraphicsResourceGroup::create(command_buffer, 1, Some(&scene.uniform_group));
    SetGraphicsVertexArray::create(command_buffer, Some(&scene.vertex_array));
    DrawIndexedGraphics::create_inline(command_buffer, &[DrawIndexedArguments::new(6, 1)]);
}

// ============================================================================
// Packet Chain Tests
// ============================================================================

/// Traversal visits exactly the recorded packets, in insertion order.
#[rstest]
#[case::single(1)]
#[case::few(5)]
#[case::many(300)]
fn test_packet_chain_integrity(#[case] number_of_commands: usize) {
    let mut command_buffer = CommandBuffer::new();
    let mut expected = Vec::with_capacity(number_of_commands);
    for index in 0..number_of_commands {
        match index % 3 {
            0 => {
                SetDebugMarker::create(&mut command_buffer, &format!("marker {index}"));
                expected.push(CommandDispatchFunctionIndex::SetDebugMarker);
            }
            1 => {
                SetGraphicsViewports::create(&mut command_buffer, &[Viewport::from_dimensions(64, 64); 2]);
                expected.push(CommandDispatchFunctionIndex::SetGraphicsViewports);
            }
            _ => {
                DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1)]);
                expected.push(CommandDispatchFunctionIndex::DrawGraphics);
            }
        }
    }

    let packets: Vec<_> = command_buffer.packets().collect();
    assert_eq!(packets.len(), number_of_commands);
    assert_eq!(command_buffer.number_of_commands() as usize, number_of_commands);
    let kinds: Vec<_> = packets
        .iter()
        .map(|packet| packet.dispatch_function_index().unwrap())
        .collect();
    assert_eq!(kinds, expected);

    let last = packets.last().unwrap();
    assert_eq!(last.header().next_packet_offset, LAST_PACKET);
    for pair in packets.windows(2) {
        assert_eq!(pair[0].header().next_packet_offset, pair[1].offset());
        assert_eq!(pair[1].offset() % 8, 0);
    }
}

// ============================================================================
// Auxiliary Data Tests
// ============================================================================

/// Bytes written into the auxiliary region are read back unchanged.
#[rstest]
#[case::one_byte(1)]
#[case::unaligned(13)]
#[case::large(4096)]
fn test_auxiliary_data_round_trip(#[case] size: u32) {
    let payload: Vec<u8> = (0..size).map(|index| (index * 7 % 251) as u8).collect();
    let mut command_buffer = CommandBuffer::new();
    command_buffer
        .add_command_with_auxiliary_size(SetDebugMarker, size)
        .copy_from_slice(&payload);
    EndDebugEvent::create(&mut command_buffer);

    let packets: Vec<_> = command_buffer.packets().collect();
    assert_eq!(packets[0].auxiliary(), payload.as_slice());
    assert_eq!(packets[0].header().auxiliary_memory_size, size);
    assert!(packets[1].auxiliary().is_empty());
}

#[test]
fn test_viewports_reach_the_renderer() {
    let mut renderer = null_renderer();
    let viewports = [
        Viewport::new(0.0, 0.0, 400.0, 300.0),
        Viewport::new(400.0, 300.0, 400.0, 300.0),
        Viewport::new(10.0, 20.0, 30.0, 40.0),
    ];
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsViewports::create(&mut command_buffer, &viewports);
    SetGraphicsScissorRectangles::create(&mut command_buffer, &[ScissorRectangle::new(0, 0, 8, 8)]);
    renderer.submit_command_buffer(&command_buffer);

    assert_eq!(renderer.viewports(), &viewports);
}

// ============================================================================
// Submission Tests
// ============================================================================

#[test]
fn test_resubmission_is_idempotent() {
    let mut renderer = null_renderer();
    let scene = Scene::new(&renderer, false);
    let mut command_buffer = CommandBuffer::new();
    record_frame(&mut command_buffer, &scene);

    let mut submissions = Vec::new();
    for _ in 0..2 {
        assert!(renderer.begin_scene());
        renderer.submit_command_buffer(&command_buffer);
        renderer.end_scene();
        submissions.push(renderer.executed_commands().to_vec());
        renderer.clear_executed_commands();
    }

    assert_eq!(submissions[0].len(), command_buffer.number_of_commands() as usize);
    assert_eq!(submissions[0], submissions[1]);
    assert_eq!(renderer.statistics().number_of_draw_calls(), 1);
}

#[test]
fn test_submit_and_clear_empties_the_buffer() {
    let mut renderer = null_renderer();
    let mut command_buffer = CommandBuffer::with_capacity(256);
    SetDebugMarker::create(&mut command_buffer, "frame");
    let capacity = command_buffer.capacity();

    command_buffer.submit_to_renderer_and_clear(&mut renderer);

    assert!(command_buffer.is_empty());
    assert_eq!(command_buffer.packets().count(), 0);
    assert_eq!(command_buffer.capacity(), capacity);
    assert_eq!(renderer.executed_commands(), &[CommandDispatchFunctionIndex::SetDebugMarker]);

    // An empty buffer submits nothing.
    command_buffer.submit_to_renderer(&mut renderer);
    assert_eq!(renderer.executed_commands().len(), 1);
}

/// Nested buffers run depth first, in place of their execute command.
#[test]
fn test_nested_command_buffers_execute_in_place() {
    let mut renderer = null_renderer();

    let mut innermost = CommandBuffer::new();
    DrawGraphics::create_inline(&mut innermost, &[DrawArguments::new(3, 1)]);
    let innermost = Arc::new(innermost);

    let mut inner = CommandBuffer::new();
    SetDebugMarker::create(&mut inner, "inner");
    ExecuteCommandBuffer::create(&mut inner, &innermost);
    let inner = Arc::new(inner);

    let mut outer = CommandBuffer::new();
    BeginDebugEvent::create(&mut outer, "outer");
    ExecuteCommandBuffer::create(&mut outer, &inner);
    ExecuteCommandBuffer::create(&mut outer, &Arc::new(CommandBuffer::new()));
    EndDebugEvent::create(&mut outer);

    // The empty nested buffer is not recorded.
    assert_eq!(outer.number_of_commands(), 3);

    renderer.submit_command_buffer(&outer);
    assert_eq!(
        renderer.executed_commands(),
        &[
            CommandDispatchFunctionIndex::BeginDebugEvent,
            CommandDispatchFunctionIndex::SetDebugMarker,
            CommandDispatchFunctionIndex::DrawGraphics,
            CommandDispatchFunctionIndex::EndDebugEvent,
        ]
    );
    assert_eq!(renderer.debug_event_depth(), 0);
}

#[test]
fn test_dropped_nested_buffer_is_skipped() {
    let mut renderer = null_renderer();
    let mut nested = CommandBuffer::new();
    SetDebugMarker::create(&mut nested, "nested");
    let nested = Arc::new(nested);

    let mut command_buffer = CommandBuffer::new();
    ExecuteCommandBuffer::create(&mut command_buffer, &nested);
    EndDebugEvent::create(&mut command_buffer);
    drop(nested);

    renderer.submit_command_buffer(&command_buffer);
    assert_eq!(renderer.executed_commands(), &[CommandDispatchFunctionIndex::EndDebugEvent]);
}

/// Command buffers hold weak references: a destroyed resource is skipped.
#[test]
fn test_destroyed_resource_is_skipped() {
    let mut renderer = null_renderer();
    let scene = Scene::new(&renderer, false);
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsVertexArray::create(&mut command_buffer, Some(&scene.vertex_array));
    SetDebugMarker::create(&mut command_buffer, "after");
    drop(scene);

    renderer.submit_command_buffer(&command_buffer);
    assert_eq!(renderer.executed_commands(), &[CommandDispatchFunctionIndex::SetDebugMarker]);
}

#[rstest]
#[case::inline(false)]
#[case::indirect(true)]
fn test_multi_draw_counts_every_draw(#[case] indirect: bool) {
    let mut renderer = null_renderer();
    let scene = Scene::new(&renderer, false);
    let arguments = [
        DrawIndexedArguments::new(3, 1),
        DrawIndexedArguments::new(3, 2).with_start_instance(5),
        DrawIndexedArguments::new(6, 1).with_start_index(3),
    ];
    let indirect_buffer = scene.indexed_indirect_buffer(&arguments);

    let mut command_buffer = CommandBuffer::new();
    if indirect {
        DrawIndexedGraphics::create(&mut command_buffer, &indirect_buffer, 0, 3);
    } else {
        DrawIndexedGraphics::create_inline(&mut command_buffer, &arguments);
    }

    assert!(renderer.begin_scene());
    renderer.submit_command_buffer(&command_buffer);
    renderer.end_scene();
    assert_eq!(renderer.statistics().number_of_draw_calls(), 3);
}
