pub mod recenter;
pub mod repulsion;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepulsionOptions {
    /// Pairs at or beyond this distance do not repel.
    pub threshold_distance: f64,
    /// Force per unit of distance short of the threshold.
    pub force_scale: f64,
}

impl Default for RepulsionOptions {
    fn default() -> Self {
        Self {
            threshold_distance: 300.0,
            force_scale: 0.0000001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecenterOptions {
    /// Fraction of the center-of-mass drift removed per tick.
    pub damping: f64,
}

impl Default for RecenterOptions {
    fn default() -> Self {
        Self { damping: 0.001 }
    }
}
