/*!
 * Fragmentation Accounting
 * Read-only measurements of the memory model
 */

use super::super::types::{ExternalFragmentation, MemorySnapshot, MemoryStats};
use super::MemoryModel;
use crate::core::limits::SIMULATED_WASTE_PER_BLOCK;
use crate::core::types::Size;

impl MemoryModel {
    /// Units held by processes
    pub fn used_memory(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| !block.is_free())
            .map(|block| block.size)
            .sum()
    }

    /// Size of the largest free block (0 when memory is full)
    pub fn largest_free_block(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .map(|block| block.size)
            .max()
            .unwrap_or(0)
    }

    /// Total free space and the number of blocks it is split across
    ///
    /// More, smaller free blocks for the same total means worse fragmentation.
    pub fn external_fragmentation(&self) -> ExternalFragmentation {
        self.blocks
            .iter()
            .filter(|block| block.is_free())
            .fold(
                ExternalFragmentation {
                    total_free: 0,
                    free_blocks: 0,
                },
                |acc, block| ExternalFragmentation {
                    total_free: acc.total_free + block.size,
                    free_blocks: acc.free_blocks + 1,
                },
            )
    }

    /// Simulated internal fragmentation
    ///
    /// Allocation is exact-size, so real internal fragmentation is always 0.
    /// This teaching metric charges one unit for every owned block larger than
    /// the large-block threshold, as if such blocks were rounded up.
    pub fn internal_fragmentation_simulated(&self) -> Size {
        self.blocks
            .iter()
            .filter(|block| !block.is_free() && block.size > self.large_block_threshold)
            .count()
            * SIMULATED_WASTE_PER_BLOCK
    }

    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryStats {
        let used = self.used_memory();
        let fragmentation = self.external_fragmentation();

        MemoryStats {
            total_memory: self.total_memory,
            used_memory: used,
            available_memory: fragmentation.total_free,
            usage_percentage: self.usage_ratio(used) * 100.0,
            allocated_blocks: self.blocks.len() - fragmentation.free_blocks,
            free_blocks: fragmentation.free_blocks,
            largest_free_block: self.largest_free_block(),
            peak_used_memory: self.tracking.peak_used,
            allocation_count: self.tracking.allocation_count,
            failed_allocations: self.tracking.failed_allocations,
            free_count: self.tracking.free_count,
            compaction_count: self.tracking.compaction_count,
        }
    }

    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            stats: self.stats(),
            blocks: self.blocks.clone(),
        }
    }
}
