/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults, thresholds, and magic numbers.
 * Organized by domain for maintainability and discoverability.
 */

use crate::core::types::Size;

// =============================================================================
// MEMORY
// =============================================================================

/// Capacity used when the requested one is missing or out of range (64 units)
pub const DEFAULT_TOTAL_MEMORY: Size = 64;

/// Largest capacity the simulator accepts (64K units)
/// The memory map keeps one cell per unit, so this also bounds rendering
pub const MAX_TOTAL_MEMORY: Size = 64 * 1024;

/// Name reserved for unowned extents; processes may not use it
pub const FREE_BLOCK_NAME: &str = "Free";

/// Owned blocks strictly larger than this count towards the simulated
/// internal fragmentation metric
pub const LARGE_BLOCK_THRESHOLD: Size = 5;

/// Units charged per large block by the simulated internal fragmentation metric
pub const SIMULATED_WASTE_PER_BLOCK: Size = 1;

// =============================================================================
// MEMORY PRESSURE
// =============================================================================

/// Usage ratio at which pressure is reported as medium
pub const PRESSURE_MEDIUM_RATIO: f64 = 0.60;

/// Usage ratio at which pressure is reported as high
pub const PRESSURE_HIGH_RATIO: f64 = 0.80;

/// Usage ratio at which pressure is reported as critical
pub const PRESSURE_CRITICAL_RATIO: f64 = 0.95;

// =============================================================================
// DISPLAY
// =============================================================================

/// Cells per row of the memory map
pub const DISPLAY_UNITS_PER_LINE: usize = 16;

/// Glyph drawn for free units
pub const FREE_GLYPH: char = '.';

/// Glyph drawn for owned units whose name has no printable first character
pub const FALLBACK_GLYPH: char = '#';
