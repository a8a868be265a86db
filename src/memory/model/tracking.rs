/*!
 * Usage Tracking
 * Lifetime counters for the memory model
 */

use crate::core::types::Size;

/// Lifetime counters, kept apart from the block list so failed
/// operations never touch the layout
#[derive(Debug, Clone, Default)]
pub(super) struct UsageTracking {
    pub peak_used: Size,
    pub allocation_count: usize,
    pub failed_allocations: usize,
    pub free_count: usize,
    pub compaction_count: usize,
}

impl UsageTracking {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_allocation(&mut self, used_after: Size) {
        self.allocation_count += 1;
        if used_after > self.peak_used {
            self.peak_used = used_after;
        }
    }

    pub fn add_failure(&mut self) {
        self.failed_allocations += 1;
    }

    pub fn add_free(&mut self) {
        self.free_count += 1;
    }

    pub fn add_compaction(&mut self) {
        self.compaction_count += 1;
    }
}
