//! Common utilities for renderer integration tests.
//!
//! Builds a small but complete scene (root signature, program, pipeline
//! state, vertex array, resource groups and an 800x600 render target) on any
//! backend, so tests only record and check commands.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use redlilium_renderer::resources::{
    BufferManager, GraphicsPipelineState, GraphicsPipelineStateDescriptor, IndirectBuffer,
    ProgramShaders, RenderTarget, RenderWindow, Resource, ResourceGroup, RootSignature,
    SwapChain, SwapChainWindow, VertexArray,
};
use redlilium_renderer::{
    AssertHandler, BufferUsage, Context, DescriptorRange, IndexBufferFormat, IndirectBufferFlags,
    RasterizerState, Renderer, ResourceType, RootParameter, RootSignatureDescriptor,
    SamplerStateDescriptor, ShaderVisibility, TextureDescriptor, TextureFormat, VertexAttribute,
    VertexAttributeFormat,
};

/// Width of the test render target.
pub const WIDTH: u32 = 800;
/// Height of the test render target.
pub const HEIGHT: u32 = 600;

/// Install the test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Context
// ============================================================================

/// Counts failed assertions instead of aborting.
#[derive(Debug, Default)]
pub struct CountingAsserts(AtomicU32);

impl CountingAsserts {
    pub fn count(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

impl AssertHandler for CountingAsserts {
    fn handle_assert(&self, expression: &str, _file: &str, _line: u32, message: &str) -> bool {
        log::debug!("Assertion failed in test: {expression}: {message}");
        self.0.fetch_add(1, Ordering::Relaxed);
        false
    }
}

/// A context whose failed assertions are counted, never fatal.
pub fn test_context() -> (Context, Arc<CountingAsserts>) {
    init_logging();
    let asserts = Arc::new(CountingAsserts::default());
    (Context::new().with_assert_handler(asserts.clone()), asserts)
}

/// Window of a fixed size that presents nothing.
#[derive(Debug)]
pub struct TestWindow {
    pub width: u32,
    pub height: u32,
    pub presents: AtomicU32,
}

impl TestWindow {
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        Arc::new(Self {
            width,
            height,
            presents: AtomicU32::new(0),
        })
    }
}

impl RenderWindow for TestWindow {
    fn width_and_height(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&self) {
        self.presents.fetch_add(1, Ordering::Relaxed);
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Everything a draw needs, created on one renderer.
pub struct Scene {
    pub buffer_manager: Arc<dyn BufferManager>,
    pub window: Arc<TestWindow>,
    pub swap_chain: Arc<SwapChain>,
    pub root_signature: Arc<RootSignature>,
    pub pipeline_state: Arc<GraphicsPipelineState>,
    pub vertex_array: Arc<VertexArray>,
    /// Group of root parameter 0: a 2D texture and its sampler.
    pub texture_group: Arc<ResourceGroup>,
    /// Group of root parameter 1: one uniform buffer.
    pub uniform_group: Arc<ResourceGroup>,
}

/// Root signature with P0 = [Texture2D t0, Sampler s0] and P1 = [UniformBuffer b0].
pub fn root_signature_descriptor() -> RootSignatureDescriptor {
    RootSignatureDescriptor::new()
        .with_parameter(RootParameter::descriptor_table(vec![
            DescriptorRange::shader_resource(0, "AlbedoMap", ResourceType::Texture2D, ShaderVisibility::Fragment),
            DescriptorRange::sampler(0, ShaderVisibility::Fragment),
        ]))
        .with_parameter(RootParameter::descriptor_table(vec![DescriptorRange::uniform_buffer(
            0,
            "UniformBlockDynamicVs",
            ShaderVisibility::Vertex,
        )]))
}

pub fn vertex_attributes() -> Vec<VertexAttribute> {
    vec![
        VertexAttribute::new("Position", VertexAttributeFormat::Float3, 0, 20),
        VertexAttribute::new("TexCoord", VertexAttributeFormat::Float2, 12, 20),
    ]
}

impl Scene {
    /// Create the scene; `scissor_enable` goes into the pipeline's rasterizer state.
    pub fn new<R: Renderer>(renderer: &R, scissor_enable: bool) -> Self {
        let render_pass = renderer
            .create_render_pass(&[TextureFormat::R8G8B8A8], None, 1)
            .expect("render pass");
        let window = TestWindow::new(WIDTH, HEIGHT);
        let swap_chain = renderer
            .create_swap_chain(&render_pass, SwapChainWindow::Render(window.clone()))
            .expect("swap chain");

        let root_signature = renderer
            .create_root_signature(&root_signature_descriptor())
            .expect("root signature");

        let attributes = vertex_attributes();
        let language = renderer.shader_language(None).expect("shader language");
        let vertex = language
            .create_vertex_shader_from_source_code(&attributes, "void main() {}")
            .expect("vertex shader");
        let fragment = language
            .create_fragment_shader_from_source_code("void main() {}")
            .expect("fragment shader");
        let program = language
            .create_program(&root_signature, &attributes, ProgramShaders::new(vertex, fragment))
            .expect("program");

        let descriptor = GraphicsPipelineStateDescriptor::new(
            root_signature.clone(),
            program,
            attributes.clone(),
            render_pass,
        )
        .with_rasterizer_state(RasterizerState {
            scissor_enable,
            ..RasterizerState::default()
        });
        let pipeline_state = renderer
            .create_graphics_pipeline_state(&descriptor)
            .expect("pipeline state");

        let buffer_manager = renderer.create_buffer_manager();
        let vertex_buffer = buffer_manager
            .create_vertex_buffer(3 * 20, Some(&[0; 60]), BufferUsage::StaticDraw)
            .expect("vertex buffer");
        let index_buffer = buffer_manager
            .create_index_buffer(12, Some(&[0; 12]), BufferUsage::StaticDraw, IndexBufferFormat::UnsignedShort)
            .expect("index buffer");
        let vertex_array = buffer_manager
            .create_vertex_array(&attributes, &[vertex_buffer], Some(index_buffer))
            .expect("vertex array");

        let texture = renderer
            .create_texture_manager()
            .create_texture_2d(&TextureDescriptor::new_2d(4, 4, TextureFormat::R8G8B8A8), None)
            .expect("texture");
        let sampler = renderer
            .create_sampler_state(&SamplerStateDescriptor::point())
            .expect("sampler");
        let texture_group = renderer
            .create_resource_group(
                &root_signature,
                0,
                &[Resource::from(texture), Resource::from(sampler.clone())],
                Some(&[Some(sampler), None]),
            )
            .expect("texture resource group");

        let uniform_buffer = buffer_manager
            .create_uniform_buffer(64, None, BufferUsage::DynamicDraw)
            .expect("uniform buffer");
        let uniform_group = renderer
            .create_resource_group(&root_signature, 1, &[Resource::from(uniform_buffer)], None)
            .expect("uniform resource group");

        Self {
            buffer_manager,
            window,
            swap_chain,
            root_signature,
            pipeline_state,
            vertex_array,
            texture_group,
            uniform_group,
        }
    }

    pub fn render_target(&self) -> RenderTarget {
        RenderTarget::SwapChain(self.swap_chain.clone())
    }

    /// Indirect buffer holding indexed draw arguments.
    pub fn indexed_indirect_buffer(
        &self,
        arguments: &[redlilium_renderer::DrawIndexedArguments],
    ) -> Arc<IndirectBuffer> {
        let bytes: &[u8] = bytemuck::cast_slice(arguments);
        self.buffer_manager
            .create_indirect_buffer(
                bytes.len() as u32,
                Some(bytes),
                IndirectBufferFlags::DRAW_INDEXED_ARGUMENTS,
                BufferUsage::StaticDraw,
            )
            .expect("indirect buffer")
    }
}
