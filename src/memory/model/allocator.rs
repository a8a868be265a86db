/*!
 * First-Fit Allocator
 * Allocation and deallocation logic
 */

use super::super::types::{Block, MemoryError, MemoryPressure, MemoryResult, Owner, ProcessName};
use super::MemoryModel;
use crate::core::limits::FREE_BLOCK_NAME;
use crate::core::types::{Address, Size};
use tracing::{info, instrument, warn};

impl MemoryModel {
    /// Load a process into the first free block large enough to hold it
    ///
    /// An exact fit retypes the free block in place; a larger block is split
    /// into the new process followed by the residual free space.
    #[instrument(level = "debug", skip(self))]
    pub fn allocate(&mut self, name: &str, size: Size) -> MemoryResult<Address> {
        if size == 0 {
            return Err(MemoryError::InvalidSize { requested: size });
        }

        let name = ProcessName::from(name);
        if name.is_reserved() {
            return Err(MemoryError::ReservedName(name));
        }
        if self.contains(name.as_str()) {
            return Err(MemoryError::DuplicateName(name));
        }

        let Some(index) = self
            .blocks
            .iter()
            .position(|block| block.is_free() && block.size >= size)
        else {
            let fragmentation = self.external_fragmentation();
            let largest_free = self.largest_free_block();
            self.tracking.add_failure();
            warn!(
                "No contiguous space for '{}': requested {} units, largest free block {} units ({} free in {} blocks)",
                name, size, largest_free, fragmentation.total_free, fragmentation.free_blocks
            );
            return Err(MemoryError::InsufficientSpace {
                name,
                requested: size,
                largest_free,
                total_free: fragmentation.total_free,
            });
        };

        let candidate = &mut self.blocks[index];
        let address = candidate.start;
        if candidate.size == size {
            candidate.owner = Owner::Process(name.clone());
        } else {
            candidate.start += size;
            candidate.size -= size;
            self.blocks
                .insert(index, Block::owned(name.clone(), address, size));
        }

        let used = self.used_memory();
        self.tracking.add_allocation(used);
        debug_assert!(self.verify().is_ok(), "allocate broke the block list");

        if let Some(level) = self.check_memory_pressure(used) {
            warn!(
                "Memory pressure {}: Loaded '{}' ({} units) at {} ({:.1}% used: {} / {})",
                level,
                name,
                size,
                address,
                self.usage_ratio(used) * 100.0,
                used,
                self.total_memory
            );
        } else {
            info!("Loaded '{}' ({} units) at {}", name, size, address);
        }

        Ok(address)
    }

    /// Release the block held by a process and merge it with free neighbours
    #[instrument(level = "debug", skip(self))]
    pub fn free(&mut self, name: &str) -> MemoryResult<Size> {
        if name == FREE_BLOCK_NAME {
            return Err(MemoryError::InvalidOperation(
                format!("cannot free a '{}' block", FREE_BLOCK_NAME).into(),
            ));
        }

        let Some(block) = self
            .blocks
            .iter_mut()
            .find(|block| block.owner.is_process(name))
        else {
            warn!("Attempted to free unknown process '{}'", name);
            return Err(MemoryError::NotFound(name.into()));
        };

        block.owner = Owner::Free;
        let size = block.size;
        let address = block.start;
        let merged = self.merge_adjacent_free();
        self.tracking.add_free();
        debug_assert!(self.verify().is_ok(), "free broke the block list");

        info!(
            "Freed '{}' ({} units at {}), merged {} neighbouring free block(s), {} units now free",
            name,
            size,
            address,
            merged,
            self.total_memory - self.used_memory()
        );

        Ok(size)
    }

    pub(super) fn usage_ratio(&self, used: Size) -> f64 {
        used as f64 / self.total_memory as f64
    }

    /// Pressure level worth reporting, if usage reached at least medium
    pub(super) fn check_memory_pressure(&self, used: Size) -> Option<MemoryPressure> {
        match MemoryPressure::from_ratio(self.usage_ratio(used)) {
            MemoryPressure::Low => None,
            level => Some(level),
        }
    }
}
