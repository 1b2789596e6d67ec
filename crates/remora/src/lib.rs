#![forbid(unsafe_code)]

//! Per-tick layout forces for force-settled mind maps.
//!
//! `remora` does not integrate anything itself: it computes the forces and translations that a
//! physics world applies between its own steps. One tick is
//!
//! 1. shape restoration (outlines rebuilt from positions, rotation discarded),
//! 2. recentering toward the original viewport center,
//! 3. after the world stepped, the pairwise repulsion ("explosion") pass.

pub mod algo;

pub use algo::{RecenterOptions, RepulsionOptions};

use narwhal_core::geom::{Bounds, Point, Vector};
use narwhal_core::{GraphModel, VertexHandle};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutForce {
    pub repulsion: RepulsionOptions,
    pub recenter: RecenterOptions,
}

impl LayoutForce {
    pub fn new(repulsion: RepulsionOptions, recenter: RecenterOptions) -> Self {
        Self {
            repulsion,
            recenter,
        }
    }

    /// Accumulated repulsion per position, indexed like `positions`.
    pub fn explosion(&self, positions: &[Point]) -> Vec<Vector> {
        algo::repulsion::explosion(positions, &self.repulsion)
    }

    /// Accumulated repulsion for every vertex of `model`, in vertex order.
    pub fn explosion_for(&self, model: &GraphModel) -> Vec<(VertexHandle, Vector)> {
        let positions = model.positions();
        let forces = self.explosion(&positions);
        model
            .vertices()
            .map(|(h, _)| h)
            .zip(forces)
            .collect()
    }

    /// Damped offset of `bounds`' center from the original viewport center.
    pub fn center_of_mass_offset(&self, bounds: &Bounds, original_bounds: &Bounds) -> Vector {
        algo::recenter::center_of_mass_offset(bounds, original_bounds, &self.recenter)
    }

    /// Rebuilds every outline from its vertex position.
    pub fn restore_shapes(&self, model: &mut GraphModel) {
        model.restore_outlines();
    }

    /// Shifts every vertex back by the damped center-of-mass offset of the current outlines.
    ///
    /// Returns the offset that was subtracted, or `None` for an empty model.
    pub fn recenter(&self, model: &mut GraphModel, original_bounds: &Bounds) -> Option<Vector> {
        let bounds = model.bounds()?;
        Some(self.recenter_within(model, &bounds, original_bounds))
    }

    /// Like [`LayoutForce::recenter`], for a cluster whose union bounds were read elsewhere
    /// (typically from the physics world's bodies).
    ///
    /// Outlines are rebuilt afterwards so drawing and the next force pass agree on the same
    /// boundary.
    pub fn recenter_within(
        &self,
        model: &mut GraphModel,
        bounds: &Bounds,
        original_bounds: &Bounds,
    ) -> Vector {
        let offset = self.center_of_mass_offset(bounds, original_bounds);
        model.translate(-offset);
        model.restore_outlines();
        tracing::trace!(dx = offset.x, dy = offset.y, "recentered");
        offset
    }
}

/// Total magnitude of a force set, handy for convergence diagnostics.
pub fn total_magnitude(forces: &[Vector]) -> f64 {
    forces.iter().map(|f| f.length()).sum()
}

