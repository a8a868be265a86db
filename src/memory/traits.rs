/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::types::*;
use crate::core::types::{Address, Size};

/// Placement interface for named processes
pub trait Allocator {
    /// Load a process of `size` units, returning its start address
    fn allocate(&mut self, name: &str, size: Size) -> MemoryResult<Address>;

    /// Release the block held by a process, returning its size
    fn free(&mut self, name: &str) -> MemoryResult<Size>;

    /// Move every owned block to the front of memory
    fn compact(&mut self) -> CompactionReport;
}

/// Memory statistics provider
pub trait MemoryInfo {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Total free space and the number of blocks it is split across
    fn external_fragmentation(&self) -> ExternalFragmentation;

    /// Pedagogical stand-in for internal fragmentation
    fn internal_fragmentation_simulated(&self) -> Size;

    /// Statistics plus a copy of the block layout
    fn snapshot(&self) -> MemorySnapshot;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

/// Textual projection of the address space
pub trait Visualize {
    fn render(&self) -> String;
}
