/*!
 * Core Types
 * Common types used across the simulator
 */

/// Offset into the simulated address space
pub type Address = usize;

/// Length of an extent, in memory units
pub type Size = usize;
