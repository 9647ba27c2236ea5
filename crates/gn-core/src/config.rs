//! Layout configuration.

use crate::model::Cell;
use serde::{Deserialize, Serialize};

/// Tunables for the grid layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Fixed spacing between adjacent rows and columns. Default: **10**.
    pub gap: f32,

    /// Length of a row or column that holds no measured item. Default: **100**.
    pub default_length: f32,

    /// Half-width of the window materialized around index 0, so the
    /// initial grid spans `-initial_count..initial_count`. Default: **10**.
    pub initial_count: i32,

    /// Extra indices materialized beyond the furthest occupied row or
    /// column. Default: **5**.
    pub redundancy: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap: 10.0,
            default_length: 100.0,
            initial_count: 10,
            redundancy: 5,
        }
    }
}

impl LayoutConfig {
    /// `initial_count`, clamped to `0..=Cell::MAX_INDEX`.
    pub fn window_count(&self) -> i32 {
        self.initial_count.clamp(0, Cell::MAX_INDEX)
    }

    /// `redundancy`, clamped to `0..=Cell::MAX_INDEX`.
    pub fn margin(&self) -> i32 {
        self.redundancy.clamp(0, Cell::MAX_INDEX)
    }
}
