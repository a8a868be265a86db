/*!
 * Memory Module
 * Partitioned memory model, accounting, and rendering
 */

pub mod model;
pub mod render;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use model::MemoryModel;
pub use render::MemoryMap;
pub use traits::*;
pub use types::*;
