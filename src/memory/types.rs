/*!
 * Memory Types
 * Common types for the partitioned memory model
 */

use crate::core::limits::{
    FALLBACK_GLYPH, FREE_BLOCK_NAME, PRESSURE_CRITICAL_RATIO, PRESSURE_HIGH_RATIO,
    PRESSURE_MEDIUM_RATIO,
};
use crate::core::types::{Address, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use smartstring::alias::String as SmartString;
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Errors reported by the memory model
///
/// Every failing operation leaves the model exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Invalid memory capacity: {requested} units")]
    #[diagnostic(
        code(memory::invalid_capacity),
        help("The simulated address space needs between 1 and 65536 units.")
    )]
    InvalidCapacity { requested: Size },

    #[error("Invalid process size: {requested} units")]
    #[diagnostic(
        code(memory::invalid_size),
        help("Processes must request at least one unit.")
    )]
    InvalidSize { requested: Size },

    #[error("Process name '{0}' is reserved")]
    #[diagnostic(
        code(memory::reserved_name),
        help("Process names must be non-empty and must not be 'Free'.")
    )]
    ReservedName(ProcessName),

    #[error("Process '{0}' is already loaded")]
    #[diagnostic(
        code(memory::duplicate_name),
        help("Free the existing process first or pick a different name.")
    )]
    DuplicateName(ProcessName),

    #[error("Not enough contiguous free memory for process '{name}' ({requested} units): largest free block is {largest_free} units, {total_free} units free in total")]
    #[diagnostic(
        code(memory::insufficient_space),
        help("Free a process to make room, or compact memory to merge free blocks.")
    )]
    InsufficientSpace {
        name: ProcessName,
        requested: Size,
        largest_free: Size,
        total_free: Size,
    },

    #[error("Invalid operation: {0}")]
    #[diagnostic(
        code(memory::invalid_operation),
        help("Free blocks are released automatically; free a process by its name.")
    )]
    InvalidOperation(SmartString),

    #[error("Process '{0}' not found")]
    #[diagnostic(
        code(memory::not_found),
        help("Use `show` to list the processes currently loaded.")
    )]
    NotFound(ProcessName),
}

impl MemoryError {
    /// Whether compacting memory would let the failed request succeed
    pub fn compaction_would_help(&self) -> bool {
        matches!(
            self,
            MemoryError::InsufficientSpace { requested, total_free, .. } if total_free >= requested
        )
    }
}

/// Structural invariant broken by the block list
///
/// Never produced by the public operations; surfaced by `MemoryModel::verify`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("block list is empty")]
    Empty,

    #[error("first block starts at {0}, expected 0")]
    BadOrigin(Address),

    #[error("gap or overlap at block {index}: starts at {start}, expected {expected}")]
    Discontiguous {
        index: usize,
        start: Address,
        expected: Address,
    },

    #[error("block {0} has zero size")]
    ZeroSize(usize),

    #[error("blocks end at {end}, capacity is {capacity}")]
    BadEnd { end: Address, capacity: Size },

    #[error("blocks {0} and {1} are both free")]
    AdjacentFree(usize, usize),

    #[error("process '{0}' owns more than one block")]
    DuplicateOwner(ProcessName),
}

/// Process identifier
///
/// Short names (≤23 bytes) are stored inline without a heap allocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessName(SmartString);

impl ProcessName {
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this name is empty or collides with the free-block sentinel
    #[inline]
    pub fn is_reserved(&self) -> bool {
        self.0.is_empty() || self.as_str() == FREE_BLOCK_NAME
    }

    /// Character drawn for this process in the memory map
    #[inline]
    pub fn glyph(&self) -> char {
        self.0.chars().next().unwrap_or(FALLBACK_GLYPH)
    }
}

impl From<&str> for ProcessName {
    #[inline]
    fn from(s: &str) -> Self {
        Self(SmartString::from(s))
    }
}

impl From<String> for ProcessName {
    #[inline]
    fn from(s: String) -> Self {
        Self(SmartString::from(s))
    }
}

impl AsRef<str> for ProcessName {
    #[inline(always)]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for ProcessName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl fmt::Display for ProcessName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who holds a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Owner {
    Free,
    Process(ProcessName),
}

impl Owner {
    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, Owner::Free)
    }

    /// Name of the owning process, if any
    #[inline]
    pub fn process(&self) -> Option<&ProcessName> {
        match self {
            Owner::Free => None,
            Owner::Process(name) => Some(name),
        }
    }

    #[inline]
    pub fn is_process(&self, name: &str) -> bool {
        self.process().is_some_and(|owner| owner.as_str() == name)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Free => f.write_str(FREE_BLOCK_NAME),
            Owner::Process(name) => write!(f, "{}", name),
        }
    }
}

/// Contiguous extent of the address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub owner: Owner,
    pub start: Address,
    pub size: Size,
}

impl Block {
    pub fn free(start: Address, size: Size) -> Self {
        Self {
            owner: Owner::Free,
            start,
            size,
        }
    }

    pub fn owned(name: ProcessName, start: Address, size: Size) -> Self {
        Self {
            owner: Owner::Process(name),
            start,
            size,
        }
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_free()
    }

    /// One past the last address covered by this block
    #[inline]
    pub fn end(&self) -> Address {
        self.start + self.size
    }
}

/// External fragmentation report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalFragmentation {
    /// Sum of the sizes of all free blocks
    pub total_free: Size,
    /// Number of free blocks the free space is split across
    pub free_blocks: usize,
}

/// Outcome of a physical compaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactionReport {
    /// Owned blocks whose start address changed
    pub relocated: usize,
    /// Size of the single trailing free block (0 when memory is full)
    pub free_space: Size,
}

/// Memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    pub peak_used_memory: Size,
    pub allocation_count: usize,
    pub failed_allocations: usize,
    pub free_count: usize,
    pub compaction_count: usize,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        MemoryPressure::from_ratio(self.usage_percentage / 100.0)
    }
}

/// Block layout together with the statistics derived from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub stats: MemoryStats,
    /// Blocks in ascending address order
    pub blocks: Vec<Block>,
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl MemoryPressure {
    pub fn from_ratio(usage_ratio: f64) -> Self {
        if usage_ratio >= PRESSURE_CRITICAL_RATIO {
            MemoryPressure::Critical
        } else if usage_ratio >= PRESSURE_HIGH_RATIO {
            MemoryPressure::High
        } else if usage_ratio >= PRESSURE_MEDIUM_RATIO {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
