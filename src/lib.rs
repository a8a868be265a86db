/*!
 * Partition Simulator Library
 * Contiguous memory management with first-fit placement, coalescing,
 * and compaction
 */

pub mod config;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod shell;

// Re-exports
pub use config::SimConfig;
pub use memory::{
    Allocator, Block, CompactionReport, ExternalFragmentation, MemoryError, MemoryInfo,
    MemoryModel, MemoryResult, MemoryStats, Owner, ProcessName, Visualize,
};
pub use monitoring::init_tracing;
pub use shell::{Command, Session};
