//! Sampler state resource.

use crate::backend::NativeSampler;
use crate::types::SamplerStateDescriptor;

use super::ResourceHeader;

/// An immutable sampler state.
///
/// Backends translate the descriptor into native enums once at creation.
pub struct SamplerState {
    pub(super) header: ResourceHeader,
    descriptor: SamplerStateDescriptor,
    native: NativeSampler,
}

impl SamplerState {
    pub(crate) fn new(
        header: ResourceHeader,
        descriptor: SamplerStateDescriptor,
        native: NativeSampler,
    ) -> Self {
        Self {
            header,
            descriptor,
            native,
        }
    }

    /// Creation descriptor.
    pub fn descriptor(&self) -> &SamplerStateDescriptor {
        &self.descriptor
    }

    /// Native handle.
    pub fn native(&self) -> &NativeSampler {
        &self.native
    }
}

impl std::fmt::Debug for SamplerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SamplerState")
            .field("filter", &self.descriptor.filter)
            .field("native", &self.native)
            .finish()
    }
}

static_assertions::assert_impl_all!(SamplerState: Send, Sync);
