//! Root signature layout descriptors.
//!
//! A root signature is an ordered list of root parameters. A parameter is
//! either a descriptor table (an ordered list of descriptor ranges, bound as
//! one resource group) or a block of root constants. Parameter and range
//! indices are stable and are what commands refer to.

use crate::resources::ResourceType;

/// Kind of a descriptor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorRangeType {
    /// Shader resource view (textures, texture buffers).
    Srv,
    /// Unordered access view.
    Uav,
    /// Uniform buffer view.
    Ubv,
    /// Sampler state.
    Sampler,
}

/// Shader stages that can see a root parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderVisibility {
    /// Every stage.
    #[default]
    All,
    /// Vertex shader.
    Vertex,
    /// Tessellation control shader.
    TessellationControl,
    /// Tessellation evaluation shader.
    TessellationEvaluation,
    /// Geometry shader.
    Geometry,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

/// Name substring which marks a texture buffer range for uniform buffer emulation.
pub const TEXTURE_BUFFER_EMULATION_MARKER: &str = "TextureBuffer";

/// A range of descriptors inside a descriptor table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorRange {
    /// Range kind.
    pub range_type: DescriptorRangeType,
    /// Number of descriptors, always one for backends without descriptor arrays.
    pub number_of_descriptors: u32,
    /// First shader register; the texture unit or sampler unit on OpenGL ES.
    pub base_shader_register: u32,
    /// Register space.
    pub register_space: u32,
    /// Name of the uniform block or sampler uniform in the shader.
    pub base_shader_register_name: String,
    /// Root parameter holding the sampler for this texture range.
    pub sampler_root_parameter_index: Option<u32>,
    /// Expected resource type.
    pub resource_type: ResourceType,
    /// Stages that see this range.
    pub shader_visibility: ShaderVisibility,
    /// Emulate this texture buffer range as a uniform buffer when texture
    /// buffers are unavailable, regardless of its name.
    pub emulate_as_uniform_buffer: bool,
}

impl DescriptorRange {
    /// Create a descriptor range.
    pub fn new(
        range_type: DescriptorRangeType,
        base_shader_register: u32,
        base_shader_register_name: impl Into<String>,
        resource_type: ResourceType,
        shader_visibility: ShaderVisibility,
    ) -> Self {
        Self {
            range_type,
            number_of_descriptors: 1,
            base_shader_register,
            register_space: 0,
            base_shader_register_name: base_shader_register_name.into(),
            sampler_root_parameter_index: None,
            resource_type,
            shader_visibility,
            emulate_as_uniform_buffer: false,
        }
    }

    /// Create a uniform buffer range.
    pub fn uniform_buffer(
        base_shader_register: u32,
        name: impl Into<String>,
        shader_visibility: ShaderVisibility,
    ) -> Self {
        Self::new(
            DescriptorRangeType::Ubv,
            base_shader_register,
            name,
            ResourceType::UniformBuffer,
            shader_visibility,
        )
    }

    /// Create a shader resource range for a texture or texture buffer.
    pub fn shader_resource(
        base_shader_register: u32,
        name: impl Into<String>,
        resource_type: ResourceType,
        shader_visibility: ShaderVisibility,
    ) -> Self {
        Self::new(
            DescriptorRangeType::Srv,
            base_shader_register,
            name,
            resource_type,
            shader_visibility,
        )
    }

    /// Create a sampler range.
    pub fn sampler(base_shader_register: u32, shader_visibility: ShaderVisibility) -> Self {
        Self::new(
            DescriptorRangeType::Sampler,
            base_shader_register,
            "",
            ResourceType::SamplerState,
            shader_visibility,
        )
    }

    /// Set the root parameter holding the sampler of this range.
    pub fn with_sampler_root_parameter_index(mut self, index: u32) -> Self {
        self.sampler_root_parameter_index = Some(index);
        self
    }

    /// Force uniform buffer emulation for this texture buffer range.
    pub fn with_uniform_buffer_emulation(mut self) -> Self {
        self.emulate_as_uniform_buffer = true;
        self
    }

    /// Whether this range is a texture buffer that may be emulated as a uniform buffer.
    pub fn is_uniform_buffer_emulation_candidate(&self) -> bool {
        self.resource_type == ResourceType::TextureBuffer
            && (self.emulate_as_uniform_buffer
                || self
                    .base_shader_register_name
                    .contains(TEXTURE_BUFFER_EMULATION_MARKER))
    }

    /// Whether this range occupies a uniform block binding.
    pub fn uses_uniform_block(&self, texture_buffers_as_uniform_buffers: bool) -> bool {
        match self.range_type {
            DescriptorRangeType::Ubv => true,
            DescriptorRangeType::Srv => {
                texture_buffers_as_uniform_buffers && self.is_uniform_buffer_emulation_candidate()
            }
            DescriptorRangeType::Uav | DescriptorRangeType::Sampler => false,
        }
    }
}

/// A root parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RootParameter {
    /// Ordered descriptor ranges bound together as a resource group.
    DescriptorTable {
        /// Descriptor ranges.
        ranges: Vec<DescriptorRange>,
        /// Stages that see this table.
        shader_visibility: ShaderVisibility,
    },
    /// 32-bit constants written directly into the root signature.
    Constants {
        /// Shader register.
        shader_register: u32,
        /// Number of 32-bit values.
        number_of_values: u32,
        /// Stages that see the constants.
        shader_visibility: ShaderVisibility,
    },
}

impl RootParameter {
    /// Create a descriptor table visible to every stage.
    pub fn descriptor_table(ranges: Vec<DescriptorRange>) -> Self {
        Self::DescriptorTable {
            ranges,
            shader_visibility: ShaderVisibility::All,
        }
    }

    /// Descriptor ranges of this parameter, empty for root constants.
    pub fn descriptor_ranges(&self) -> &[DescriptorRange] {
        match self {
            Self::DescriptorTable { ranges, .. } => ranges,
            Self::Constants { .. } => &[],
        }
    }
}

/// Descriptor for creating a root signature.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RootSignatureDescriptor {
    /// Root parameters.
    pub parameters: Vec<RootParameter>,
}

impl RootSignatureDescriptor {
    /// Create an empty root signature descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root parameter.
    pub fn with_parameter(mut self, parameter: RootParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Uniform block binding index of a descriptor range.
    ///
    /// Binding indices are assigned by counting uniform block ranges in
    /// (parameter, range) order starting from zero. Program linking and
    /// resource group binding both go through this function.
    pub fn uniform_block_binding_index(
        &self,
        parameter_index: usize,
        range_index: usize,
        texture_buffers_as_uniform_buffers: bool,
    ) -> Option<u32> {
        let range = self
            .parameters
            .get(parameter_index)?
            .descriptor_ranges()
            .get(range_index)?;
        if !range.uses_uniform_block(texture_buffers_as_uniform_buffers) {
            return None;
        }
        let preceding = self
            .parameters
            .iter()
            .enumerate()
            .flat_map(|(index, parameter)| {
                parameter
                    .descriptor_ranges()
                    .iter()
                    .enumerate()
                    .map(move |(inner, range)| ((index, inner), range))
            })
            .take_while(|(position, _)| *position < (parameter_index, range_index))
            .filter(|(_, range)| range.uses_uniform_block(texture_buffers_as_uniform_buffers))
            .count();
        Some(preceding as u32)
    }

    /// Uniform block binding indices of every range, grouped by parameter.
    pub fn uniform_block_binding_table(
        &self,
        texture_buffers_as_uniform_buffers: bool,
    ) -> Vec<Vec<Option<u32>>> {
        let mut next = 0;
        self.parameters
            .iter()
            .map(|parameter| {
                parameter
                    .descriptor_ranges()
                    .iter()
                    .map(|range| {
                        range
                            .uses_uniform_block(texture_buffers_as_uniform_buffers)
                            .then(|| {
                                next += 1;
                                next - 1
                            })
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_descriptor() -> RootSignatureDescriptor {
        RootSignatureDescriptor::new()
            .with_parameter(RootParameter::descriptor_table(vec![
                DescriptorRange::uniform_buffer(0, "UniformBlockDynamicVs", ShaderVisibility::Vertex),
                DescriptorRange::shader_resource(
                    0,
                    "AlbedoMap",
                    ResourceType::Texture2D,
                    ShaderVisibility::Fragment,
                ),
            ]))
            .with_parameter(RootParameter::descriptor_table(vec![
                DescriptorRange::uniform_buffer(1, "PassUniformBuffer", ShaderVisibility::All),
                DescriptorRange::shader_resource(
                    1,
                    "InstanceTextureBuffer",
                    ResourceType::TextureBuffer,
                    ShaderVisibility::Vertex,
                ),
                DescriptorRange::uniform_buffer(2, "MaterialUniformBuffer", ShaderVisibility::All),
            ]))
    }

    #[test]
    fn test_uniform_block_binding_indices_count_in_order() {
        let descriptor = scene_descriptor();
        assert_eq!(descriptor.uniform_block_binding_index(0, 0, false), Some(0));
        assert_eq!(descriptor.uniform_block_binding_index(0, 1, false), None);
        assert_eq!(descriptor.uniform_block_binding_index(1, 0, false), Some(1));
        assert_eq!(descriptor.uniform_block_binding_index(1, 1, false), None);
        assert_eq!(descriptor.uniform_block_binding_index(1, 2, false), Some(2));
    }

    #[test]
    fn test_emulated_texture_buffers_take_uniform_block_bindings() {
        let descriptor = scene_descriptor();
        assert_eq!(descriptor.uniform_block_binding_index(1, 1, true), Some(2));
        assert_eq!(descriptor.uniform_block_binding_index(1, 2, true), Some(3));
    }

    #[test]
    fn test_binding_table_matches_single_lookup() {
        let descriptor = scene_descriptor();
        for emulate in [false, true] {
            let table = descriptor.uniform_block_binding_table(emulate);
            for (parameter_index, ranges) in table.iter().enumerate() {
                for (range_index, binding) in ranges.iter().enumerate() {
                    assert_eq!(
                        *binding,
                        descriptor.uniform_block_binding_index(parameter_index, range_index, emulate)
                    );
                }
            }
        }
    }

    #[test]
    fn test_explicit_emulation_flag() {
        let range = DescriptorRange::shader_resource(
            0,
            "Instances",
            ResourceType::TextureBuffer,
            ShaderVisibility::Vertex,
        );
        assert!(!range.is_uniform_buffer_emulation_candidate());
        assert!(range.with_uniform_buffer_emulation().is_uniform_buffer_emulation_candidate());
    }
}
