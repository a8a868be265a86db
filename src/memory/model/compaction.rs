/*!
 * Coalescing and Compaction
 * Free-space consolidation for the memory model
 */

use super::super::types::{Block, CompactionReport};
use super::MemoryModel;
use tracing::{debug, info, instrument};

impl MemoryModel {
    /// Fold every free block into an immediately preceding free block
    ///
    /// Returns the number of blocks absorbed.
    pub(super) fn merge_adjacent_free(&mut self) -> usize {
        let before = self.blocks.len();
        self.blocks.dedup_by(|next, merged| {
            if merged.is_free() && next.is_free() {
                merged.size += next.size;
                true
            } else {
                false
            }
        });

        let absorbed = before - self.blocks.len();
        if absorbed > 0 {
            debug!(
                "Coalesced {} free block(s), {} blocks remain",
                absorbed,
                self.blocks.len()
            );
        }
        absorbed
    }

    /// Slide every owned block to the front of memory, preserving order,
    /// and gather all free space into a single trailing block
    #[instrument(level = "debug", skip(self))]
    pub fn compact(&mut self) -> CompactionReport {
        let mut compacted = Vec::with_capacity(self.blocks.len());
        let mut offset = 0;
        let mut relocated = 0;

        for block in std::mem::take(&mut self.blocks) {
            if block.is_free() {
                continue;
            }
            if block.start != offset {
                relocated += 1;
            }
            let size = block.size;
            compacted.push(Block {
                start: offset,
                ..block
            });
            offset += size;
        }

        let free_space = self.total_memory - offset;
        if free_space > 0 {
            compacted.push(Block::free(offset, free_space));
        }
        self.blocks = compacted;
        self.tracking.add_compaction();
        debug_assert!(self.verify().is_ok(), "compact broke the block list");

        info!(
            "Memory compacted: relocated {} block(s), {} units free at {}",
            relocated, free_space, offset
        );

        CompactionReport {
            relocated,
            free_space,
        }
    }
}
