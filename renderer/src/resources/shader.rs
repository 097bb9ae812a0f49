//! Shaders, programs and the shader language factory.
//!
//! Shader source code is opaque to the renderer; it is handed to the native
//! compiler as is.

use std::sync::Arc;

use crate::backend::{NativeProgram, NativeShader};
use crate::types::{PrimitiveTopology, VertexAttribute};

use super::{ResourceHeader, RootSignature};

/// Factory for shaders and programs of one shading language.
///
/// Obtained from [`Renderer::shader_language`](crate::Renderer::shader_language).
/// Compile and link failures log the native info log and return `None`.
/// Stages the device does not support are rejected the same way.
pub trait ShaderLanguage: Send + Sync {
    /// Name of the shading language, e.g. `"GLSLES"`.
    fn name(&self) -> &'static str;

    /// Compile a vertex shader.
    fn create_vertex_shader_from_source_code(
        &self,
        vertex_attributes: &[VertexAttribute],
        source_code: &str,
    ) -> Option<Arc<VertexShader>>;

    /// Compile a tessellation control shader.
    fn create_tessellation_control_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<TessellationControlShader>>;

    /// Compile a tessellation evaluation shader.
    fn create_tessellation_evaluation_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<TessellationEvaluationShader>>;

    /// Compile a geometry shader.
    fn create_geometry_shader_from_source_code(
        &self,
        source_code: &str,
        input_topology: PrimitiveTopology,
        output_topology: PrimitiveTopology,
        number_of_output_vertices: u32,
    ) -> Option<Arc<GeometryShader>>;

    /// Compile a fragment shader.
    fn create_fragment_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<FragmentShader>>;

    /// Compile a compute shader.
    fn create_compute_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<ComputeShader>>;

    /// Link shaders into a program.
    ///
    /// Vertex attribute names are bound to their list position before
    /// linking; uniform blocks and samplers are bound from the root
    /// signature's descriptor ranges afterwards.
    fn create_program(
        &self,
        root_signature: &Arc<RootSignature>,
        vertex_attributes: &[VertexAttribute],
        shaders: ProgramShaders,
    ) -> Option<Arc<Program>>;
}

macro_rules! shader_resource {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub struct $name {
            pub(super) header: ResourceHeader,
            native: NativeShader,
        }

        impl $name {
            pub(crate) fn new(header: ResourceHeader, native: NativeShader) -> Self {
                Self { header, native }
            }

            /// Native handle.
            pub fn native(&self) -> &NativeShader {
                &self.native
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("native", &self.native)
                    .finish()
            }
        }

        static_assertions::assert_impl_all!($name: Send, Sync);
    };
}

shader_resource! {
    /// A compiled vertex shader.
    VertexShader
}

shader_resource! {
    /// A compiled tessellation control shader.
    TessellationControlShader
}

shader_resource! {
    /// A compiled tessellation evaluation shader.
    TessellationEvaluationShader
}

shader_resource! {
    /// A compiled geometry shader.
    GeometryShader
}

shader_resource! {
    /// A compiled fragment shader.
    FragmentShader
}

shader_resource! {
    /// A compiled compute shader.
    ComputeShader
}

/// The shader stages linked into a program.
#[derive(Debug, Clone, Default)]
pub struct ProgramShaders {
    /// Vertex shader.
    pub vertex: Option<Arc<VertexShader>>,
    /// Tessellation control shader.
    pub tessellation_control: Option<Arc<TessellationControlShader>>,
    /// Tessellation evaluation shader.
    pub tessellation_evaluation: Option<Arc<TessellationEvaluationShader>>,
    /// Geometry shader.
    pub geometry: Option<Arc<GeometryShader>>,
    /// Fragment shader.
    pub fragment: Option<Arc<FragmentShader>>,
}

impl ProgramShaders {
    /// A vertex and fragment shader pair.
    pub fn new(vertex: Arc<VertexShader>, fragment: Arc<FragmentShader>) -> Self {
        Self {
            vertex: Some(vertex),
            fragment: Some(fragment),
            ..Default::default()
        }
    }
}

/// A linked program.
pub struct Program {
    pub(super) header: ResourceHeader,
    root_signature: Arc<RootSignature>,
    vertex_attributes: Vec<VertexAttribute>,
    shaders: ProgramShaders,
    native: NativeProgram,
}

impl Program {
    pub(crate) fn new(
        header: ResourceHeader,
        root_signature: Arc<RootSignature>,
        vertex_attributes: Vec<VertexAttribute>,
        shaders: ProgramShaders,
        native: NativeProgram,
    ) -> Self {
        Self {
            header,
            root_signature,
            vertex_attributes,
            shaders,
            native,
        }
    }

    /// The root signature the program was linked against.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }

    /// Vertex attributes, in location order.
    pub fn vertex_attributes(&self) -> &[VertexAttribute] {
        &self.vertex_attributes
    }

    /// Linked shader stages.
    pub fn shaders(&self) -> &ProgramShaders {
        &self.shaders
    }

    /// Native handle.
    pub fn native(&self) -> &NativeProgram {
        &self.native
    }
}

impl std::fmt::Debug for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Program")
            .field("vertex_attributes", &self.vertex_attributes.len())
            .field("native", &self.native)
            .finish()
    }
}

static_assertions::assert_impl_all!(Program: Send, Sync);
