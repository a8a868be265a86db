/*!
 * Memory Model
 *
 * Contiguous, partition-based memory over a fixed address space.
 *
 * ## Layout
 *
 * The address space `[0, capacity)` is covered by an ordered list of blocks,
 * each either free or owned by exactly one named process:
 *
 * ```text
 *   0        20                 50          64
 *   ├────────┼──────────────────┼───────────┤
 *   │  Free  │        P2        │   Free    │
 *   └────────┴──────────────────┴───────────┘
 * ```
 *
 * ## Operations
 *
 * - **First-fit allocation**: the lowest-addressed free block that is large
 *   enough is either retyped (exact fit) or split (partial fit)
 * - **Coalescing**: freeing a process merges it with free neighbours
 * - **Compaction**: owned blocks slide to address 0 in their original order,
 *   leaving one trailing free block
 * - **Fragmentation accounting**: external (free space and its spread) and a
 *   simulated internal metric
 *
 * The list always partitions the address space with no gaps, no zero-sized
 * blocks, no two neighbouring free blocks and at most one block per process.
 */

mod allocator;
mod compaction;
mod fragmentation;
mod tracking;

use super::render::MemoryMap;
use super::traits::{Allocator, MemoryInfo, Visualize};
use super::types::*;
use crate::core::limits::{DISPLAY_UNITS_PER_LINE, LARGE_BLOCK_THRESHOLD, MAX_TOTAL_MEMORY};
use crate::core::types::{Address, Size};
use std::collections::HashSet;
use tracing::info;
use tracking::UsageTracking;

/// Partitioned memory model
#[derive(Debug, Clone)]
pub struct MemoryModel {
    // Ordered by ascending start address
    blocks: Vec<Block>,
    total_memory: Size,
    large_block_threshold: Size,
    row_width: usize,
    tracking: UsageTracking,
}

impl MemoryModel {
    /// Create a model whose whole address space is one free block
    ///
    /// Capacity must lie in `1..=MAX_TOTAL_MEMORY`.
    pub fn new(capacity: Size) -> MemoryResult<Self> {
        if capacity == 0 || capacity > MAX_TOTAL_MEMORY {
            return Err(MemoryError::InvalidCapacity {
                requested: capacity,
            });
        }

        info!(capacity, "Memory model initialized with a single free block");
        Ok(Self {
            blocks: vec![Block::free(0, capacity)],
            total_memory: capacity,
            large_block_threshold: LARGE_BLOCK_THRESHOLD,
            row_width: DISPLAY_UNITS_PER_LINE,
            tracking: UsageTracking::new(),
        })
    }

    /// Set the size above which an owned block counts towards the
    /// simulated internal fragmentation metric
    pub fn with_large_block_threshold(mut self, threshold: Size) -> Self {
        self.large_block_threshold = threshold;
        self
    }

    /// Set the number of cells per row of the rendered map
    pub fn with_row_width(mut self, width: usize) -> Self {
        self.row_width = width.max(1);
        self
    }

    pub fn capacity(&self) -> Size {
        self.total_memory
    }

    /// Blocks in ascending address order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block owned by a process
    pub fn find(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.owner.is_process(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Check every structural invariant of the block list
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let first = self.blocks.first().ok_or(InvariantViolation::Empty)?;
        if first.start != 0 {
            return Err(InvariantViolation::BadOrigin(first.start));
        }

        let mut expected: Address = 0;
        let mut owners = HashSet::new();
        for (index, block) in self.blocks.iter().enumerate() {
            if block.start != expected {
                return Err(InvariantViolation::Discontiguous {
                    index,
                    start: block.start,
                    expected,
                });
            }
            if block.size == 0 {
                return Err(InvariantViolation::ZeroSize(index));
            }
            if let Some(name) = block.owner.process() {
                if !owners.insert(name) {
                    return Err(InvariantViolation::DuplicateOwner(name.clone()));
                }
            }
            expected = block.end();
        }

        if expected != self.total_memory {
            return Err(InvariantViolation::BadEnd {
                end: expected,
                capacity: self.total_memory,
            });
        }

        if let Some(index) = self
            .blocks
            .windows(2)
            .position(|pair| pair[0].is_free() && pair[1].is_free())
        {
            return Err(InvariantViolation::AdjacentFree(index, index + 1));
        }

        Ok(())
    }

    /// Render the address space as a fixed-width character map
    pub fn render(&self) -> String {
        MemoryMap::new(&self.blocks, self.total_memory, self.row_width).to_string()
    }
}

// Implement trait interfaces
impl Allocator for MemoryModel {
    fn allocate(&mut self, name: &str, size: Size) -> MemoryResult<Address> {
        MemoryModel::allocate(self, name, size)
    }

    fn free(&mut self, name: &str) -> MemoryResult<Size> {
        MemoryModel::free(self, name)
    }

    fn compact(&mut self) -> CompactionReport {
        MemoryModel::compact(self)
    }
}

impl MemoryInfo for MemoryModel {
    fn stats(&self) -> MemoryStats {
        MemoryModel::stats(self)
    }

    fn external_fragmentation(&self) -> ExternalFragmentation {
        MemoryModel::external_fragmentation(self)
    }

    fn internal_fragmentation_simulated(&self) -> Size {
        MemoryModel::internal_fragmentation_simulated(self)
    }

    fn snapshot(&self) -> MemorySnapshot {
        MemoryModel::snapshot(self)
    }
}

impl Visualize for MemoryModel {
    fn render(&self) -> String {
        MemoryModel::render(self)
    }
}
