/*!
 * Memory Map Rendering
 * Character-per-unit view of the address space
 */

use super::types::Block;
use crate::core::limits::FREE_GLYPH;
use crate::core::types::Size;
use std::fmt;

/// Borrowed view of a block list, drawn one cell per unit
///
/// ```text
///   Memory state (20 units):
///   |A|A|A|A|B|B|.|.|.|.|.|.|.|.|.|.|
///   |.|.|.|.|
/// ```
///
/// Owned units show the first character of the owner's name; the glyph is
/// cosmetic and two processes may share it.
pub struct MemoryMap<'a> {
    blocks: &'a [Block],
    capacity: Size,
    row_width: usize,
}

impl<'a> MemoryMap<'a> {
    pub fn new(blocks: &'a [Block], capacity: Size, row_width: usize) -> Self {
        Self {
            blocks,
            capacity,
            row_width: row_width.max(1),
        }
    }

    fn cells(&self) -> Vec<char> {
        let mut cells = vec![FREE_GLYPH; self.capacity];
        for block in self.blocks {
            if let Some(name) = block.owner.process() {
                let start = block.start.min(self.capacity);
                let end = block.end().min(self.capacity);
                cells[start..end].fill(name.glyph());
            }
        }
        cells
    }
}

impl fmt::Display for MemoryMap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory state ({} units):", self.capacity)?;
        for row in self.cells().chunks(self.row_width) {
            for glyph in row {
                write!(f, "|{}", glyph)?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}
