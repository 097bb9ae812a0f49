//! Renderer statistics.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::resources::ResourceType;

/// Live resource counters and per-frame draw call counter.
///
/// Every resource increments the counter of its type when it is created and
/// decrements it when it is dropped, so the counters always reflect the number
/// of resources alive right now.
#[derive(Debug)]
pub struct Statistics {
    resources: [AtomicU32; ResourceType::COUNT],
    draw_calls: AtomicU32,
}

impl Statistics {
    /// Create zeroed statistics.
    pub fn new() -> Self {
        Self {
            resources: std::array::from_fn(|_| AtomicU32::new(0)),
            draw_calls: AtomicU32::new(0),
        }
    }

    /// Number of live resources of the given type.
    pub fn number_of_resources(&self, resource_type: ResourceType) -> u32 {
        self.resources[resource_type as usize].load(Ordering::Relaxed)
    }

    /// Number of live resources of all types.
    pub fn total_number_of_resources(&self) -> u32 {
        self.resources
            .iter()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Number of native draw calls issued since the last frame reset.
    pub fn number_of_draw_calls(&self) -> u32 {
        self.draw_calls.load(Ordering::Relaxed)
    }

    pub(crate) fn resource_created(&self, resource_type: ResourceType) {
        self.resources[resource_type as usize].fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn resource_destroyed(&self, resource_type: ResourceType) {
        self.resources[resource_type as usize].fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn draw_calls_issued(&self, count: u32) {
        self.draw_calls.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn reset_frame(&self) {
        self.draw_calls.store(0, Ordering::Relaxed);
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_counters() {
        let statistics = Statistics::new();
        statistics.resource_created(ResourceType::VertexBuffer);
        statistics.resource_created(ResourceType::VertexBuffer);
        statistics.resource_created(ResourceType::Texture2D);
        statistics.resource_destroyed(ResourceType::VertexBuffer);
        assert_eq!(statistics.number_of_resources(ResourceType::VertexBuffer), 1);
        assert_eq!(statistics.number_of_resources(ResourceType::Texture2D), 1);
        assert_eq!(statistics.total_number_of_resources(), 2);
    }

    #[test]
    fn test_draw_calls_reset_per_frame() {
        let statistics = Statistics::new();
        statistics.draw_calls_issued(3);
        assert_eq!(statistics.number_of_draw_calls(), 3);
        statistics.reset_frame();
        assert_eq!(statistics.number_of_draw_calls(), 0);
    }
}
