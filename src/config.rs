/*!
 * Simulator Configuration
 * Environment-driven settings with validated fallbacks
 */

use crate::core::limits::{
    DEFAULT_TOTAL_MEMORY, DISPLAY_UNITS_PER_LINE, LARGE_BLOCK_THRESHOLD, MAX_TOTAL_MEMORY,
};
use crate::core::types::Size;
use crate::memory::{MemoryModel, MemoryResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// Simulator settings
///
/// Environment variables:
/// - SIM_CAPACITY: capacity to use without prompting
/// - SIM_DEFAULT_CAPACITY: fallback when the requested capacity is out of range
///
/// Both capacities are ignored above `MAX_TOTAL_MEMORY`.
/// - SIM_ROW_WIDTH: cells per row of the memory map
/// - SIM_LARGE_BLOCK_THRESHOLD: size above which a block counts towards the
///   simulated internal fragmentation metric
/// - SIM_TRACE_JSON: emit logs as JSON (`1` or `true`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub capacity: Option<Size>,
    pub default_capacity: Size,
    pub row_width: usize,
    pub large_block_threshold: Size,
    pub trace_json: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: None,
            default_capacity: DEFAULT_TOTAL_MEMORY,
            row_width: DISPLAY_UNITS_PER_LINE,
            large_block_threshold: LARGE_BLOCK_THRESHOLD,
            trace_json: false,
        }
    }
}

impl SimConfig {
    /// Load settings from the environment, keeping defaults for anything
    /// missing or invalid
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            capacity: capacity_var("SIM_CAPACITY"),
            default_capacity: capacity_var("SIM_DEFAULT_CAPACITY")
                .unwrap_or(defaults.default_capacity),
            row_width: positive_var("SIM_ROW_WIDTH").unwrap_or(defaults.row_width),
            large_block_threshold: parsed_var("SIM_LARGE_BLOCK_THRESHOLD")
                .unwrap_or(defaults.large_block_threshold),
            trace_json: std::env::var("SIM_TRACE_JSON")
                .map(|v| v == "1" || v == "true")
                .unwrap_or(defaults.trace_json),
        }
    }

    /// Substitute the default capacity for a request outside
    /// `1..=MAX_TOTAL_MEMORY`
    pub fn initial_capacity(&self, requested: i64) -> Size {
        match Size::try_from(requested) {
            Ok(capacity) if capacity > 0 && capacity <= MAX_TOTAL_MEMORY => capacity,
            _ => {
                warn!(
                    "Invalid memory size ({}), using {} units instead",
                    requested, self.default_capacity
                );
                self.default_capacity
            }
        }
    }

    /// Build a model sized by `initial_capacity` and styled by these settings
    pub fn build_model(&self, requested: i64) -> MemoryResult<MemoryModel> {
        Ok(MemoryModel::new(self.initial_capacity(requested))?
            .with_row_width(self.row_width)
            .with_large_block_threshold(self.large_block_threshold))
    }
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid number", key, raw);
            None
        }
    }
}

fn positive_var(key: &str) -> Option<Size> {
    match parsed_var::<Size>(key)? {
        0 => {
            warn!("Ignoring {}=0: must be positive", key);
            None
        }
        value => Some(value),
    }
}

fn capacity_var(key: &str) -> Option<Size> {
    match positive_var(key)? {
        value if value > MAX_TOTAL_MEMORY => {
            warn!(
                "Ignoring {}={}: exceeds the maximum of {} units",
                key, value, MAX_TOTAL_MEMORY
            );
            None
        }
        value => Some(value),
    }
}
