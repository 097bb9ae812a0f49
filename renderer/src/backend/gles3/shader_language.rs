//! The GLSL ES shader language: compilation and program linking.

use std::sync::Arc;

use crate::backend::{NativeProgram, NativeShader};
use crate::renderer_assert;
use crate::resources::{
    ComputeShader, FragmentShader, GeometryShader, Program, ProgramShaders, RendererResource,
    ResourceType, RootSignature, ShaderLanguage, TessellationControlShader,
    TessellationEvaluationShader, VertexShader,
};
use crate::types::{DescriptorRangeType, PrimitiveTopology, VertexAttribute};

use super::device::Gles3Device;
use super::functions::*;
use super::resources::{GlObject, GlObjectKind, GlProgram};

/// Name of the OpenGL ES shading language.
pub const NAME: &str = "GLSLES";

/// Uniform holding the start instance when base instance draws are emulated.
pub const DRAW_ID_UNIFORM_NAME: &str = "drawIdUniform";

pub(crate) struct Gles3ShaderLanguage {
    device: Arc<Gles3Device>,
}

impl Gles3ShaderLanguage {
    pub(crate) fn new(device: Arc<Gles3Device>) -> Self {
        Self { device }
    }

    fn compile(&self, shader_type: u32, stage: &str, source_code: &str) -> Option<GlObject> {
        let gl = &self.device.gl;
        let name = gl.create_shader(shader_type);
        if name == 0 {
            log::error!("glCreateShader returned no {stage} shader");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Shader, name);
        gl.shader_source(name, source_code);
        gl.compile_shader(name);
        if !gl.get_shader_compile_status(name) {
            log::error!("Failed to compile {stage} shader: {}", gl.get_shader_info_log(name));
            return None;
        }
        Some(object)
    }

    /// Bind uniform blocks and sampler uniforms of a linked program from the
    /// root signature, returning the `drawIdUniform` location.
    fn bind_root_signature(&self, program: u32, root_signature: &RootSignature) -> i32 {
        let gl = &self.device.gl;
        let texture_buffers_as_uniform_buffers = self.device.texture_buffers_as_uniform_buffers();
        let descriptor = root_signature.descriptor();
        let previous = self.device.bound(glow::CURRENT_PROGRAM);
        gl.use_program(program);

        for (parameter_index, parameter) in descriptor.parameters.iter().enumerate() {
            for (range_index, range) in parameter.descriptor_ranges().iter().enumerate() {
                let name = &range.base_shader_register_name;
                if let Some(binding) = descriptor.uniform_block_binding_index(
                    parameter_index,
                    range_index,
                    texture_buffers_as_uniform_buffers,
                ) {
                    let index = gl.get_uniform_block_index(program, name);
                    if index == INVALID_INDEX {
                        log::debug!("Uniform block {name:?} is not active in program {program}");
                    } else {
                        gl.uniform_block_binding(program, index, binding);
                    }
                } else if range.range_type == DescriptorRangeType::Srv {
                    let location = gl.get_uniform_location(program, name);
                    if location < 0 {
                        log::debug!("Sampler uniform {name:?} is not active in program {program}");
                    } else {
                        gl.uniform_1_i32(location, range.base_shader_register as i32);
                    }
                }
            }
        }

        let draw_id_uniform_location = gl.get_uniform_location(program, DRAW_ID_UNIFORM_NAME);
        gl.use_program(previous);
        draw_id_uniform_location
    }
}

impl ShaderLanguage for Gles3ShaderLanguage {
    fn name(&self) -> &'static str {
        NAME
    }

    fn create_vertex_shader_from_source_code(
        &self,
        _vertex_attributes: &[VertexAttribute],
        source_code: &str,
    ) -> Option<Arc<VertexShader>> {
        let object = self.compile(glow::VERTEX_SHADER, "vertex", source_code)?;
        Some(Arc::new(VertexShader::new(
            self.device.core.header(ResourceType::VertexShader),
            NativeShader::Gles3(object),
        )))
    }

    fn create_tessellation_control_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<TessellationControlShader>> {
        if !renderer_assert!(
            self.device.core.context(),
            self.device.extensions.tessellation_shader,
            "Tessellation shaders need GL_EXT_tessellation_shader"
        ) {
            return None;
        }
        let object = self.compile(TESS_CONTROL_SHADER_EXT, "tessellation control", source_code)?;
        Some(Arc::new(TessellationControlShader::new(
            self.device.core.header(ResourceType::TessellationControlShader),
            NativeShader::Gles3(object),
        )))
    }

    fn create_tessellation_evaluation_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<TessellationEvaluationShader>> {
        if !renderer_assert!(
            self.device.core.context(),
            self.device.extensions.tessellation_shader,
            "Tessellation shaders need GL_EXT_tessellation_shader"
        ) {
            return None;
        }
        let object = self.compile(TESS_EVALUATION_SHADER_EXT, "tessellation evaluation", source_code)?;
        Some(Arc::new(TessellationEvaluationShader::new(
            self.device.core.header(ResourceType::TessellationEvaluationShader),
            NativeShader::Gles3(object),
        )))
    }

    fn create_geometry_shader_from_source_code(
        &self,
        source_code: &str,
        _input_topology: PrimitiveTopology,
        _output_topology: PrimitiveTopology,
        number_of_output_vertices: u32,
    ) -> Option<Arc<GeometryShader>> {
        if !renderer_assert!(
            self.device.core.context(),
            self.device.extensions.geometry_shader,
            "Geometry shaders need GL_EXT_geometry_shader"
        ) {
            return None;
        }
        let maximum = self
            .device
            .core
            .capabilities()
            .maximum_number_of_geometry_shader_output_vertices;
        if number_of_output_vertices > maximum {
            log::error!("Geometry shader emits {number_of_output_vertices} vertices, maximum is {maximum}");
            return None;
        }
        let object = self.compile(GEOMETRY_SHADER_EXT, "geometry", source_code)?;
        Some(Arc::new(GeometryShader::new(
            self.device.core.header(ResourceType::GeometryShader),
            NativeShader::Gles3(object),
        )))
    }

    fn create_fragment_shader_from_source_code(
        &self,
        source_code: &str,
    ) -> Option<Arc<FragmentShader>> {
        let object = self.compile(glow::FRAGMENT_SHADER, "fragment", source_code)?;
        Some(Arc::new(FragmentShader::new(
            self.device.core.header(ResourceType::FragmentShader),
            NativeShader::Gles3(object),
        )))
    }

    fn create_compute_shader_from_source_code(
        &self,
        _source_code: &str,
    ) -> Option<Arc<ComputeShader>> {
        log::error!("OpenGL ES 3 renderer does not support compute shaders");
        None
    }

    fn create_program(
        &self,
        root_signature: &Arc<RootSignature>,
        vertex_attributes: &[VertexAttribute],
        shaders: ProgramShaders,
    ) -> Option<Arc<Program>> {
        let core = &self.device.core;
        if !core.owns(root_signature.header()) {
            return None;
        }
        let ProgramShaders {
            vertex,
            tessellation_control,
            tessellation_evaluation,
            geometry,
            fragment,
        } = &shaders;
        let mut shader_names = Vec::with_capacity(5);
        macro_rules! collect_stage {
            ($stage:expr) => {
                if let Some(shader) = $stage {
                    if !core.owns(shader.header()) {
                        return None;
                    }
                    match shader.native().gles3() {
                        Some(object) => shader_names.push(object.name()),
                        None => {
                            log::error!("Shader without native object passed to program linking");
                            return None;
                        }
                    }
                }
            };
        }
        collect_stage!(vertex);
        collect_stage!(tessellation_control);
        collect_stage!(tessellation_evaluation);
        collect_stage!(geometry);
        collect_stage!(fragment);

        let gl = &self.device.gl;
        let name = gl.create_program();
        if name == 0 {
            log::error!("glCreateProgram returned no program");
            return None;
        }
        let object = GlObject::new(gl.clone(), GlObjectKind::Program, name);
        for shader in &shader_names {
            gl.attach_shader(name, *shader);
        }
        for (index, attribute) in vertex_attributes.iter().enumerate() {
            gl.bind_attrib_location(name, index as u32, &attribute.name);
        }
        gl.link_program(name);
        if !gl.get_program_link_status(name) {
            log::error!("Failed to link program: {}", gl.get_program_info_log(name));
            return None;
        }

        let draw_id_uniform_location = self.bind_root_signature(name, root_signature);
        log::trace!("Linked program {name}, drawIdUniform at {draw_id_uniform_location}");
        Some(Arc::new(Program::new(
            core.header(ResourceType::Program),
            root_signature.clone(),
            vertex_attributes.to_vec(),
            shaders,
            NativeProgram::Gles3(GlProgram::new(object, draw_id_uniform_location)),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::gles3::recording::RecordingFunctions;
    use crate::backend::gles3::Gles3Config;
    use crate::context::{AssertHandler, Context};
    use crate::renderer::RendererCore;
    use crate::types::{
        DescriptorRange, RootParameter, RootSignatureDescriptor, ShaderVisibility,
        VertexAttributeFormat,
    };

    struct IgnoreAsserts;

    impl AssertHandler for IgnoreAsserts {
        fn handle_assert(&self, _: &str, _: &str, _: u32, _: &str) -> bool {
            false
        }
    }

    fn language(gl: Arc<RecordingFunctions>) -> (Arc<Gles3Device>, Gles3ShaderLanguage) {
        let context = Context::new().with_assert_handler(Arc::new(IgnoreAsserts));
        let device = Arc::new(Gles3Device::new(context, gl, None, &Gles3Config::default()));
        (device.clone(), Gles3ShaderLanguage::new(device))
    }

    fn root_signature(core: &RendererCore) -> Arc<RootSignature> {
        core.create_root_signature(
            &RootSignatureDescriptor::new()
                .with_parameter(RootParameter::descriptor_table(vec![
                    DescriptorRange::uniform_buffer(0, "UniformBlockDynamicVs", ShaderVisibility::Vertex),
                    DescriptorRange::shader_resource(
                        1,
                        "AlbedoMap",
                        ResourceType::Texture2D,
                        ShaderVisibility::Fragment,
                    ),
                ]))
                .with_parameter(RootParameter::descriptor_table(vec![
                    DescriptorRange::uniform_buffer(0, "UniformBlockDynamicFs", ShaderVisibility::Fragment),
                ])),
        )
        .unwrap()
    }

    #[test]
    fn test_compile_failure_deletes_shader() {
        let gl = Arc::new(RecordingFunctions::new());
        let (_, language) = language(gl.clone());
        gl.set_compile_status(false);
        assert!(language.create_fragment_shader_from_source_code("broken").is_none());
        assert_eq!(gl.count("delete_shader"), 1);
    }

    #[test]
    fn test_link_binds_attributes_and_root_signature() {
        let gl = Arc::new(RecordingFunctions::new());
        let (device, language) = language(gl.clone());
        let attributes = vec![
            VertexAttribute::new("Position", VertexAttributeFormat::Float3, 0, 20),
            VertexAttribute::new("TexCoord", VertexAttributeFormat::Float2, 12, 20),
        ];
        let vertex = language.create_vertex_shader_from_source_code(&attributes, "void main() {}").unwrap();
        let fragment = language.create_fragment_shader_from_source_code("void main() {}").unwrap();
        let program = language
            .create_program(&root_signature(&device.core), &attributes, ProgramShaders::new(vertex, fragment))
            .unwrap();

        let names: Vec<_> = gl
            .calls_named("bind_attrib_location")
            .into_iter()
            .map(|call| (call.arguments[1], call.text.unwrap()))
            .collect();
        assert_eq!(names, vec![(0, "Position".to_owned()), (1, "TexCoord".to_owned())]);

        let bindings: Vec<i64> = gl
            .calls_named("uniform_block_binding")
            .iter()
            .map(|call| call.arguments[2])
            .collect();
        assert_eq!(bindings, vec![0, 1]);
        assert_eq!(gl.calls_named("uniform_1_i32")[0].arguments[1], 1);
        assert!(program.native().gles3().unwrap().draw_id_uniform_location() >= 0);
    }

    #[test]
    fn test_geometry_shader_needs_extension() {
        let (_, language) = language(Arc::new(RecordingFunctions::new()));
        let shader = language.create_geometry_shader_from_source_code(
            "",
            PrimitiveTopology::TriangleList,
            PrimitiveTopology::TriangleStrip,
            3,
        );
        assert!(shader.is_none());
    }

    #[test]
    fn test_compute_is_unsupported() {
        let (_, language) = language(Arc::new(RecordingFunctions::new()));
        assert!(language.create_compute_shader_from_source_code("").is_none());
        assert_eq!(language.name(), "GLSLES");
    }
}
