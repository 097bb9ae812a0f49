//! Root signatures and resource groups.

use std::sync::Arc;

use crate::types::{RootParameter, RootSignatureDescriptor};

use super::{Resource, ResourceHeader, SamplerState};

/// The binding layout shared by pipeline states and resource groups.
pub struct RootSignature {
    pub(super) header: ResourceHeader,
    descriptor: RootSignatureDescriptor,
}

impl RootSignature {
    pub(crate) fn new(header: ResourceHeader, descriptor: RootSignatureDescriptor) -> Self {
        Self { header, descriptor }
    }

    /// Layout descriptor.
    pub fn descriptor(&self) -> &RootSignatureDescriptor {
        &self.descriptor
    }

    /// Root parameters.
    pub fn parameters(&self) -> &[RootParameter] {
        &self.descriptor.parameters
    }

    /// Root parameter at `index`.
    pub fn parameter(&self, index: u32) -> Option<&RootParameter> {
        self.descriptor.parameters.get(index as usize)
    }
}

impl std::fmt::Debug for RootSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootSignature")
            .field("parameters", &self.descriptor.parameters.len())
            .finish()
    }
}

/// A fixed set of resources bound together to one root parameter.
///
/// Holds strong references to its root signature, its resources and their
/// sampler states. The uniform block binding index of every resource is
/// resolved once at creation.
pub struct ResourceGroup {
    pub(super) header: ResourceHeader,
    root_signature: Arc<RootSignature>,
    root_parameter_index: u32,
    resources: Vec<Resource>,
    sampler_states: Vec<Option<Arc<SamplerState>>>,
    uniform_block_binding_indices: Vec<Option<u32>>,
}

impl ResourceGroup {
    /// Validate the arguments and build a resource group.
    ///
    /// `resources` must hold exactly one resource per descriptor range of the
    /// root parameter, each of the range's resource type. `sampler_states`,
    /// when given, holds one optional sampler per resource.
    pub(crate) fn new(
        header: ResourceHeader,
        root_signature: Arc<RootSignature>,
        root_parameter_index: u32,
        resources: &[Resource],
        sampler_states: Option<&[Option<Arc<SamplerState>>]>,
        texture_buffers_as_uniform_buffers: bool,
    ) -> Option<Self> {
        let Some(parameter) = root_signature.parameter(root_parameter_index) else {
            log::error!("Invalid root parameter index {root_parameter_index} for resource group");
            return None;
        };
        let RootParameter::DescriptorTable { ranges, .. } = parameter else {
            log::error!("Root parameter {root_parameter_index} is not a descriptor table");
            return None;
        };
        if ranges.len() != resources.len() {
            log::error!(
                "Resource group for root parameter {root_parameter_index} needs {} resources, got {}",
                ranges.len(),
                resources.len()
            );
            return None;
        }
        for (index, (range, resource)) in ranges.iter().zip(resources).enumerate() {
            if range.resource_type != resource.resource_type() {
                log::error!(
                    "Resource {index} of group {root_parameter_index} is a {:?}, range expects {:?}",
                    resource.resource_type(),
                    range.resource_type
                );
                return None;
            }
        }
        let sampler_states = match sampler_states {
            Some(samplers) if samplers.len() != resources.len() => {
                log::error!(
                    "Resource group needs one optional sampler per resource, got {}",
                    samplers.len()
                );
                return None;
            }
            Some(samplers) => samplers.to_vec(),
            None => vec![None; resources.len()],
        };
        let uniform_block_binding_indices = (0..ranges.len())
            .map(|range_index| {
                root_signature.descriptor().uniform_block_binding_index(
                    root_parameter_index as usize,
                    range_index,
                    texture_buffers_as_uniform_buffers,
                )
            })
            .collect();
        Some(Self {
            header,
            root_signature,
            root_parameter_index,
            resources: resources.to_vec(),
            sampler_states,
            uniform_block_binding_indices,
        })
    }

    /// The root signature the group was created from.
    pub fn root_signature(&self) -> &Arc<RootSignature> {
        &self.root_signature
    }

    /// The root parameter the group belongs to.
    pub fn root_parameter_index(&self) -> u32 {
        self.root_parameter_index
    }

    /// Resources, one per descriptor range.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Optional sampler state of every resource.
    pub fn sampler_states(&self) -> &[Option<Arc<SamplerState>>] {
        &self.sampler_states
    }

    /// Uniform block binding index of the resource at `index`.
    pub fn uniform_block_binding_index(&self, index: usize) -> Option<u32> {
        self.uniform_block_binding_indices.get(index).copied().flatten()
    }
}

impl std::fmt::Debug for ResourceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceGroup")
            .field("root_parameter_index", &self.root_parameter_index)
            .field("resources", &self.resources.len())
            .field("uniform_block_binding_indices", &self.uniform_block_binding_indices)
            .finish()
    }
}

static_assertions::assert_impl_all!(RootSignature: Send, Sync);
static_assertions::assert_impl_all!(ResourceGroup: Send, Sync);
