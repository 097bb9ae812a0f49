//! OpenGL ES 3 backend integration tests.
//!
//! The backend runs headless on [`RecordingFunctions`]; tests record command
//! buffers, submit them and check the native calls that came out.
//!
//! # Test Categories
//!
//! - **Binding Tests**: uniform block bindings follow the root signature
//! - **Coordinate Tests**: viewport and scissor flipping to a lower-left origin
//! - **Draw Emulation Tests**: multi-draw loops and the `drawIdUniform` cache
//! - **Capability Tests**: extension gated features
//! - **Frame Tests**: clears, resubmission and presentation

#![cfg(feature = "gles3-backend")]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use rstest::rstest;

use common::{test_context, CountingAsserts, Scene, HEIGHT, WIDTH};
use raw_window_handle::{RawDisplayHandle, RawWindowHandle, XlibDisplayHandle, XlibWindowHandle};
use redlilium_renderer::backend::gles3::{GlCall, RecordingFunctions};
use redlilium_renderer::command::{
    ClearGraphics, DrawGraphics, DrawIndexedGraphics, SetGraphicsPipelineState,
    SetGraphicsRenderTarget, SetGraphicsResourceGroup, SetGraphicsRootSignature,
    SetGraphicsScissorRectangles, SetGraphicsVertexArray, SetGraphicsViewports,
};
use redlilium_renderer::resources::{FramebufferAttachment, RenderTarget, SwapChainWindow};
use redlilium_renderer::{
    BufferUsage, ClearFlags, CommandBuffer, DrawArguments, DrawIndexedArguments,
    Gles3Renderer, IndexBufferFormat, MapType, NativeWindow, Renderer, Resource,
    ScissorRectangle, TextureDescriptor, TextureFlags, TextureFormat, Viewport,
};

struct Fixture {
    gl: Arc<RecordingFunctions>,
    renderer: Gles3Renderer,
    asserts: Arc<CountingAsserts>,
    scene: Scene,
}

impl Fixture {
    fn new(extensions: &[&str]) -> Self {
        Self::with_scissor(extensions, false)
    }

    fn with_scissor(extensions: &[&str], scissor_enable: bool) -> Self {
        let (context, asserts) = test_context();
        let gl = Arc::new(RecordingFunctions::new().with_extensions(extensions));
        let renderer = Gles3Renderer::with_functions(context, gl.clone());
        let scene = Scene::new(&renderer, scissor_enable);
        gl.clear_calls();
        Self {
            gl,
            renderer,
            asserts,
            scene,
        }
    }

    /// Record the state every draw needs.
    fn record_bindings(&self, command_buffer: &mut CommandBuffer) {
        let scene = &self.scene;
        SetGraphicsRenderTarget::create(command_buffer, Some(&scene.render_target()));
        SetGraphicsRootSignature::create(command_buffer, Some(&scene.root_signature));
        SetGraphicsPipelineState::create(command_buffer, Some(&scene.pipeline_state));
        SetGraphicsResourceGroup::create(command_buffer, 0, Some(&scene.texture_group));
        SetGraphicsResourceGroup::create(command_buffer, 1, Some(&scene.uniform_group));
        SetGraphicsVertexArray::create(command_buffer, Some(&scene.vertex_array));
    }

    fn submit_frame(&mut self, command_buffer: &CommandBuffer) {
        assert!(self.renderer.begin_scene());
        self.renderer.submit_command_buffer(command_buffer);
        self.renderer.end_scene();
    }

    fn draw_id_uniform_location(&self) -> i64 {
        let program = self.scene.pipeline_state.program();
        i64::from(program.native().gles3().unwrap().draw_id_uniform_location())
    }

    /// A 256x128 single color framebuffer whose texture carries `flags`.
    fn create_framebuffer(&self, flags: TextureFlags) -> RenderTarget {
        let render_pass = self
            .renderer
            .create_render_pass(&[TextureFormat::R8G8B8A8], None, 1)
            .unwrap();
        let color = self
            .renderer
            .create_texture_manager()
            .create_texture_2d(
                &TextureDescriptor::new_2d(256, 128, TextureFormat::R8G8B8A8)
                    .with_flags(TextureFlags::RENDER_TARGET | flags),
                None,
            )
            .unwrap();
        let framebuffer = self
            .renderer
            .create_framebuffer(&render_pass, &[FramebufferAttachment::new(color)], None)
            .unwrap();
        RenderTarget::Framebuffer(framebuffer)
    }

    fn uniform_buffer_name(&self) -> i64 {
        match &self.scene.uniform_group.resources()[0] {
            Resource::UniformBuffer(buffer) => i64::from(buffer.native().gles3().unwrap().name()),
            other => panic!("unexpected resource {other:?}"),
        }
    }
}

fn arguments(calls: &[GlCall]) -> Vec<Vec<i64>> {
    calls.iter().map(|call| call.arguments.clone()).collect()
}

// ============================================================================
// Binding Tests
// ============================================================================

/// The uniform block binding only depends on the root signature layout.
#[test]
fn test_uniform_binding_independent_of_bind_order() {
    let mut fixture = Fixture::new(&[]);
    assert_eq!(fixture.scene.uniform_group.uniform_block_binding_index(0), Some(0));
    assert_eq!(fixture.scene.texture_group.uniform_block_binding_index(0), None);

    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRootSignature::create(&mut command_buffer, Some(&fixture.scene.root_signature));
    SetGraphicsResourceGroup::create(&mut command_buffer, 1, Some(&fixture.scene.uniform_group));
    SetGraphicsResourceGroup::create(&mut command_buffer, 0, Some(&fixture.scene.texture_group));
    fixture.submit_frame(&command_buffer);

    assert_eq!(
        arguments(&fixture.gl.calls_named("bind_buffer_base")),
        vec![vec![i64::from(glow::UNIFORM_BUFFER), 0, fixture.uniform_buffer_name()]]
    );
    assert_eq!(
        arguments(&fixture.gl.calls_named("active_texture")),
        vec![vec![i64::from(glow::TEXTURE0)]]
    );
    let texture_binds = fixture.gl.calls_named("bind_texture");
    assert_eq!(texture_binds[0].arguments[0], i64::from(glow::TEXTURE_2D));
    // The texture's sampler and the sampler range both use unit zero.
    assert!(fixture
        .gl
        .calls_named("bind_sampler")
        .iter()
        .all(|call| call.arguments[0] == 0));
    assert_eq!(fixture.asserts.count(), 0);
}

#[test]
fn test_resource_group_needs_root_signature() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsResourceGroup::create(&mut command_buffer, 1, Some(&fixture.scene.uniform_group));
    fixture.submit_frame(&command_buffer);

    assert_eq!(fixture.gl.count("bind_buffer_base"), 0);
    assert_eq!(fixture.asserts.count(), 1);
}

// ============================================================================
// Coordinate Tests
// ============================================================================

/// Full frame: the viewport covering the 800x600 target lands at the origin.
#[test]
fn test_full_frame_viewport() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsViewports::create(
        &mut command_buffer,
        &[Viewport::new(0.0, 0.0, WIDTH as f32, HEIGHT as f32)],
    );
    DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1)]);
    fixture.submit_frame(&command_buffer);

    assert_eq!(arguments(&fixture.gl.calls_named("viewport")), vec![vec![0, 0, 800, 600]]);
    let depth_range = fixture.gl.calls_named("depth_range");
    assert_eq!(depth_range[0].floats, vec![0.0, 1.0]);
    assert_eq!(
        arguments(&fixture.gl.calls_named("draw_arrays_instanced")),
        vec![vec![i64::from(glow::TRIANGLES), 0, 3, 1]]
    );
    assert_eq!(fixture.renderer.statistics().number_of_draw_calls(), 1);
}

/// Native viewport origin is `H - y0 - h`.
#[rstest]
#[case::full_screen(0.0, 600.0, 0)]
#[case::top_half(0.0, 300.0, 300)]
#[case::bottom_half(300.0, 300.0, 0)]
#[case::band(100.0, 50.0, 450)]
fn test_viewport_y_flip(#[case] top_left_y: f32, #[case] height: f32, #[case] expected_y: i64) {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&fixture.scene.render_target()));
    SetGraphicsViewports::create(&mut command_buffer, &[Viewport::new(10.0, top_left_y, 200.0, height)]);
    fixture.submit_frame(&command_buffer);

    assert_eq!(
        arguments(&fixture.gl.calls_named("viewport")),
        vec![vec![10, expected_y, 200, height as i64]]
    );
}

/// Swap chains on an application owned context flip against the surface
/// size reported at bind time.
#[test]
fn test_external_swap_chain_uses_drawable_height() {
    let (context, asserts) = test_context();
    let gl = Arc::new(RecordingFunctions::new().with_drawable_size(WIDTH, HEIGHT));
    let mut renderer = Gles3Renderer::with_functions(context.with_external_context(true), gl.clone());
    let render_pass = renderer.create_render_pass(&[TextureFormat::R8G8B8A8], None, 1).unwrap();
    let window = NativeWindow {
        window: RawWindowHandle::Xlib(XlibWindowHandle::new(1)),
        display: RawDisplayHandle::Xlib(XlibDisplayHandle::new(None, 0)),
    };
    let swap_chain = renderer
        .create_swap_chain(&render_pass, SwapChainWindow::Native(window))
        .unwrap();
    assert_eq!(swap_chain.width_and_height(), (WIDTH, HEIGHT));

    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&RenderTarget::SwapChain(swap_chain.clone())));
    SetGraphicsViewports::create(&mut command_buffer, &[Viewport::new(0.0, 0.0, 800.0, 100.0)]);
    gl.clear_calls();
    assert!(renderer.begin_scene());
    renderer.submit_command_buffer(&command_buffer);
    renderer.end_scene();
    assert_eq!(arguments(&gl.calls_named("viewport")), vec![vec![0, 500, 800, 100]]);

    // Resized surface.
    gl.set_drawable_size(WIDTH, 400);
    gl.clear_calls();
    assert!(renderer.begin_scene());
    renderer.submit_command_buffer(&command_buffer);
    renderer.end_scene();
    assert_eq!(arguments(&gl.calls_named("viewport")), vec![vec![0, 300, 800, 100]]);
    assert_eq!(asserts.count(), 0);
}

#[test]
fn test_scissor_rectangle_y_flip() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&fixture.scene.render_target()));
    SetGraphicsScissorRectangles::create(&mut command_buffer, &[ScissorRectangle::new(10, 20, 110, 220)]);
    fixture.submit_frame(&command_buffer);

    assert_eq!(arguments(&fixture.gl.calls_named("scissor")), vec![vec![10, 380, 100, 200]]);
}

// ============================================================================
// Draw Emulation Tests
// ============================================================================

/// Indirect indexed draws with start instances {0, 5, 5}.
#[rstest]
#[case::indirect(true)]
#[case::inline(false)]
fn test_draw_id_uploaded_only_on_change(#[case] indirect: bool) {
    let mut fixture = Fixture::new(&[]);
    let draws = [
        DrawIndexedArguments::new(3, 1),
        DrawIndexedArguments::new(3, 2).with_start_instance(5),
        DrawIndexedArguments::new(6, 1).with_start_index(3).with_start_instance(5),
    ];
    let indirect_buffer = fixture.scene.indexed_indirect_buffer(&draws);

    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    if indirect {
        DrawIndexedGraphics::create(&mut command_buffer, &indirect_buffer, 0, 3);
    } else {
        DrawIndexedGraphics::create_inline(&mut command_buffer, &draws);
    }
    fixture.submit_frame(&command_buffer);

    let location = fixture.draw_id_uniform_location();
    assert!(location >= 0);
    assert_eq!(
        arguments(&fixture.gl.calls_named("uniform_1_u32")),
        vec![vec![location, 0], vec![location, 5]]
    );
    let triangles = i64::from(glow::TRIANGLES);
    let short = i64::from(glow::UNSIGNED_SHORT);
    assert_eq!(
        arguments(&fixture.gl.calls_named("draw_elements_instanced")),
        vec![
            vec![triangles, 3, short, 0, 1],
            vec![triangles, 3, short, 0, 2],
            vec![triangles, 6, short, 6, 1],
        ]
    );

    // Every draw follows the upload it depends on.
    let names = fixture.gl.call_names();
    let sequence: Vec<_> = names
        .iter()
        .filter(|name| matches!(**name, "uniform_1_u32" | "draw_elements_instanced"))
        .copied()
        .collect();
    assert_eq!(
        sequence,
        vec![
            "uniform_1_u32",
            "draw_elements_instanced",
            "uniform_1_u32",
            "draw_elements_instanced",
            "draw_elements_instanced",
        ]
    );
    assert_eq!(fixture.renderer.statistics().number_of_draw_calls(), 3);
}

#[test]
fn test_native_base_instance() {
    let mut fixture = Fixture::new(&["GL_EXT_base_instance"]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    DrawGraphics::create_inline(
        &mut command_buffer,
        &[DrawArguments::new(3, 1), DrawArguments::new(3, 4).with_start_instance(7)],
    );
    fixture.submit_frame(&command_buffer);

    assert_eq!(fixture.gl.count("draw_arrays_instanced"), 1);
    assert_eq!(
        arguments(&fixture.gl.calls_named("draw_arrays_instanced_base_instance")),
        vec![vec![i64::from(glow::TRIANGLES), 0, 3, 4, 7]]
    );
    assert_eq!(
        arguments(&fixture.gl.calls_named("uniform_1_u32")),
        vec![vec![fixture.draw_id_uniform_location(), 0]]
    );
}

#[test]
fn test_multi_draw_is_wrapped_in_debug_group() {
    let mut fixture = Fixture::new(&["GL_KHR_debug"]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1); 2]);
    DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1)]);
    fixture.submit_frame(&command_buffer);

    let groups = fixture.gl.calls_named("push_debug_group");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].text.as_deref(), Some("Multi-draw-indirect emulation"));
    assert_eq!(fixture.gl.count("pop_debug_group"), 1);
    assert_eq!(fixture.gl.count("draw_arrays_instanced"), 3);
}

// ============================================================================
// Capability Tests
// ============================================================================

/// 32-bit indices need `GL_OES_element_index_uint`.
#[rstest]
#[case::without_extension(&[], false)]
#[case::with_extension(&["GL_OES_element_index_uint"], true)]
fn test_index_format_support(#[case] extensions: &[&str], #[case] supported: bool) {
    let fixture = Fixture::new(extensions);
    let index_buffer = fixture.scene.buffer_manager.create_index_buffer(
        16,
        Some(&[0; 16]),
        BufferUsage::StaticDraw,
        IndexBufferFormat::UnsignedInt,
    );

    assert_eq!(index_buffer.is_some(), supported);
    assert_eq!(fixture.gl.count("create_buffer"), usize::from(supported));
    assert_eq!(fixture.asserts.count(), u32::from(!supported));
}

#[test]
fn test_base_vertex_without_extension_is_skipped() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    DrawIndexedGraphics::create_inline(
        &mut command_buffer,
        &[DrawIndexedArguments::new(3, 1).with_base_vertex(4), DrawIndexedArguments::new(3, 1)],
    );
    fixture.submit_frame(&command_buffer);

    assert_eq!(fixture.asserts.count(), 1);
    assert_eq!(fixture.gl.count("draw_elements_instanced_base_vertex"), 0);
    assert_eq!(fixture.gl.count("draw_elements_instanced"), 1);
    assert_eq!(fixture.renderer.statistics().number_of_draw_calls(), 1);
}

#[test]
fn test_base_vertex_with_extension() {
    let mut fixture = Fixture::new(&["GL_OES_draw_elements_base_vertex"]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    DrawIndexedGraphics::create_inline(&mut command_buffer, &[DrawIndexedArguments::new(3, 1).with_base_vertex(4)]);
    fixture.submit_frame(&command_buffer);

    let draws = fixture.gl.calls_named("draw_elements_instanced_base_vertex");
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].arguments[5], 4);
    assert_eq!(fixture.asserts.count(), 0);
}

/// A start index whose byte offset does not fit is dropped, later draws still run.
#[test]
fn test_out_of_range_start_index_is_skipped() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    DrawIndexedGraphics::create_inline(
        &mut command_buffer,
        &[
            DrawIndexedArguments::new(3, 1).with_start_index(u32::MAX),
            DrawIndexedArguments::new(3, 1).with_start_index(6),
        ],
    );
    fixture.submit_frame(&command_buffer);

    assert_eq!(
        arguments(&fixture.gl.calls_named("draw_elements_instanced")),
        vec![vec![i64::from(glow::TRIANGLES), 3, i64::from(glow::UNSIGNED_SHORT), 12, 1]]
    );
    assert_eq!(fixture.renderer.statistics().number_of_draw_calls(), 1);
}

// ============================================================================
// Frame Tests
// ============================================================================

/// Clears cover the whole target even with an enabled scissor test.
#[test]
fn test_clear_ignores_scissor() {
    let mut fixture = Fixture::with_scissor(&[], true);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsScissorRectangles::create(&mut command_buffer, &[ScissorRectangle::new(100, 100, 200, 200)]);
    ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR_DEPTH, [0.0, 0.0, 0.0, 1.0], 1.0, 0);
    fixture.submit_frame(&command_buffer);

    let calls = fixture.gl.calls();
    let clear = calls.iter().position(|call| call.name == "clear").unwrap();
    let scissor_test = i64::from(glow::SCISSOR_TEST);
    assert_eq!(calls[clear].arguments[0], i64::from(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT));

    let last_scissor_change_before_clear = calls[..clear]
        .iter()
        .rev()
        .find(|call| matches!(call.name, "enable" | "disable") && call.arguments[0] == scissor_test)
        .unwrap();
    assert_eq!(last_scissor_change_before_clear.name, "disable");
    let first_scissor_change_after_clear = calls[clear..]
        .iter()
        .find(|call| matches!(call.name, "enable" | "disable") && call.arguments[0] == scissor_test)
        .unwrap();
    assert_eq!(first_scissor_change_after_clear.name, "enable");
}

#[test]
fn test_resubmission_issues_same_native_calls() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsViewports::create_from_dimensions(&mut command_buffer, WIDTH, HEIGHT);
    ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR, [0.0; 4], 1.0, 0);
    DrawIndexedGraphics::create_inline(&mut command_buffer, &[DrawIndexedArguments::new(6, 1).with_start_instance(2)]);

    fixture.submit_frame(&command_buffer);
    let first = fixture.gl.calls();
    fixture.gl.clear_calls();
    fixture.submit_frame(&command_buffer);
    let second = fixture.gl.calls();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_redundant_bindings_are_skipped() {
    let mut fixture = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsPipelineState::create(&mut command_buffer, Some(&fixture.scene.pipeline_state));
    SetGraphicsVertexArray::create(&mut command_buffer, Some(&fixture.scene.vertex_array));
    fixture.submit_frame(&command_buffer);

    assert_eq!(fixture.gl.count("use_program"), 1);
    // One bind for the vertex array; unbinding is not part of end_scene.
    assert_eq!(fixture.gl.count("bind_vertex_array"), 1);
}

#[test]
fn test_swap_chain_present_reaches_window() {
    let fixture = Fixture::new(&[]);
    assert_eq!(fixture.scene.swap_chain.width_and_height(), (WIDTH, HEIGHT));
    fixture.scene.swap_chain.set_vertical_synchronization_interval(1);
    fixture.scene.swap_chain.present();
    assert_eq!(fixture.scene.window.presents.load(Ordering::Relaxed), 1);
    assert_eq!(fixture.scene.swap_chain.pending_vertical_synchronization_interval(), None);
}

#[test]
fn test_framebuffer_render_target() {
    let mut fixture = Fixture::new(&[]);
    let render_pass = fixture
        .renderer
        .create_render_pass(&[TextureFormat::R8G8B8A8], Some(TextureFormat::D32Float), 1)
        .unwrap();
    let texture_manager = fixture.renderer.create_texture_manager();
    let color = texture_manager
        .create_texture_2d(
            &TextureDescriptor::new_2d(256, 128, TextureFormat::R8G8B8A8).with_flags(TextureFlags::RENDER_TARGET),
            None,
        )
        .unwrap();
    let depth = texture_manager
        .create_texture_2d(
            &TextureDescriptor::new_2d(256, 128, TextureFormat::D32Float).with_flags(TextureFlags::RENDER_TARGET),
            None,
        )
        .unwrap();
    let framebuffer = fixture
        .renderer
        .create_framebuffer(
            &render_pass,
            &[FramebufferAttachment::new(color)],
            Some(&FramebufferAttachment::new(depth)),
        )
        .unwrap();
    assert_eq!(framebuffer.width_and_height(), (256, 128));
    assert_eq!(
        arguments(&fixture.gl.calls_named("draw_buffers")),
        vec![vec![i64::from(glow::COLOR_ATTACHMENT0)]]
    );

    // Viewports flip against the framebuffer height.
    fixture.gl.clear_calls();
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&RenderTarget::Framebuffer(framebuffer.clone())));
    SetGraphicsViewports::create(&mut command_buffer, &[Viewport::new(0.0, 0.0, 256.0, 64.0)]);
    fixture.submit_frame(&command_buffer);
    assert_eq!(arguments(&fixture.gl.calls_named("viewport")), vec![vec![0, 64, 256, 64]]);
    let framebuffer_name = i64::from(framebuffer.native().gles3().unwrap().name());
    assert!(fixture
        .gl
        .calls_named("bind_framebuffer")
        .iter()
        .any(|call| call.arguments == vec![i64::from(glow::FRAMEBUFFER), framebuffer_name]));
}

#[test]
fn test_incomplete_framebuffer_is_rejected() {
    let fixture = Fixture::new(&[]);
    let render_pass = fixture
        .renderer
        .create_render_pass(&[TextureFormat::R8G8B8A8], None, 1)
        .unwrap();
    let color = fixture
        .renderer
        .create_texture_manager()
        .create_texture_2d(
            &TextureDescriptor::new_2d(64, 64, TextureFormat::R8G8B8A8).with_flags(TextureFlags::RENDER_TARGET),
            None,
        )
        .unwrap();
    fixture.gl.set_framebuffer_status(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);

    let framebuffer = fixture
        .renderer
        .create_framebuffer(&render_pass, &[FramebufferAttachment::new(color)], None);
    assert!(framebuffer.is_none());
    assert_eq!(fixture.gl.count("delete_framebuffer"), 1);
}

#[test]
fn test_map_uniform_buffer() {
    let mut fixture = Fixture::new(&[]);
    let resource = fixture.scene.uniform_group.resources()[0].clone();
    let mapped = fixture.renderer.map(&resource, 0, MapType::WriteDiscard).unwrap();
    assert_eq!(mapped.size(), 64);
    fixture.renderer.unmap(&resource, 0);

    assert_eq!(fixture.gl.count("map_buffer_range"), 1);
    assert_eq!(fixture.gl.count("unmap_buffer"), 1);
}

/// Resources of another renderer are reported and ignored.
#[test]
fn test_foreign_resource_is_ignored() {
    let mut fixture = Fixture::new(&[]);
    let other = Fixture::new(&[]);
    let mut command_buffer = CommandBuffer::new();
    SetGraphicsVertexArray::create(&mut command_buffer, Some(&other.scene.vertex_array));
    fixture.submit_frame(&command_buffer);

    assert_eq!(fixture.asserts.count(), 1);
    assert_eq!(fixture.gl.count("bind_vertex_array"), 0);
}


/// Swap chains draw with a lower left clip origin and framebuffers with an
/// upper left one; the winding is mirrored along with it.
#[test]
fn test_clip_origin_follows_render_target() {
    let mut fixture = Fixture::new(&["GL_EXT_clip_control"]);
    let framebuffer = fixture.create_framebuffer(TextureFlags::empty());
    fixture.gl.clear_calls();
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&framebuffer));
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&fixture.scene.render_target()));
    fixture.submit_frame(&command_buffer);

    let lower_left = vec![0x8CA1, 0x935F];
    let upper_left = vec![0x8CA2, 0x935F];
    assert_eq!(
        arguments(&fixture.gl.calls_named("clip_control")),
        vec![lower_left.clone(), upper_left, lower_left]
    );
    // GL default before the pipeline, then the scene's clockwise pipeline.
    let clockwise = vec![i64::from(glow::CW)];
    let counter_clockwise = vec![i64::from(glow::CCW)];
    assert_eq!(
        arguments(&fixture.gl.calls_named("front_face")),
        vec![counter_clockwise.clone(), clockwise.clone(), counter_clockwise, clockwise]
    );

    let calls = fixture.gl.calls();
    let last_clip_control = calls.iter().rposition(|call| call.name == "clip_control").unwrap();
    assert_eq!(calls[last_clip_control + 1].name, "front_face");
}

/// Mipmaps of a render target texture are rebuilt once rendering to it ends.
#[test]
fn test_framebuffer_mipmaps_generated_on_target_switch() {
    let mut fixture = Fixture::new(&[]);
    let framebuffer = fixture.create_framebuffer(TextureFlags::GENERATE_MIPMAPS);
    fixture.gl.clear_calls();
    let mut command_buffer = CommandBuffer::new();
    fixture.record_bindings(&mut command_buffer);
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&framebuffer));
    ClearGraphics::create(&mut command_buffer, ClearFlags::COLOR, [0.0; 4], 1.0, 0);
    DrawGraphics::create_inline(&mut command_buffer, &[DrawArguments::new(3, 1)]);
    SetGraphicsRenderTarget::create(&mut command_buffer, Some(&fixture.scene.render_target()));
    fixture.submit_frame(&command_buffer);

    let calls = fixture.gl.calls();
    let position = |name: &str| calls.iter().position(|call| call.name == name).unwrap();
    let (clear, draw, generate) = (position("clear"), position("draw_arrays_instanced"), position("generate_mipmap"));
    assert!(clear < draw && draw < generate);
    assert_eq!(calls[generate].arguments, vec![i64::from(glow::TEXTURE_2D)]);
    assert_eq!(fixture.gl.count("generate_mipmap"), 1);
    let default_framebuffer = vec![i64::from(glow::FRAMEBUFFER), 0];
    let next_bind = calls[draw..]
        .iter()
        .position(|call| call.name == "bind_framebuffer")
        .unwrap()
        + draw;
    assert_eq!(calls[next_bind].arguments, default_framebuffer);
    assert!(generate < next_bind);
}
