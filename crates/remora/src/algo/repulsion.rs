use super::RepulsionOptions;
use narwhal_core::geom::{self, Point, Vector};

/// Force on `a` from `b`: along the normalized `a - b` with magnitude
/// `force_scale * (threshold - |a - b|)`, zero at or beyond the threshold.
///
/// Coincident points have no direction to push along and get no force.
pub fn force_between(a: Point, b: Point, opts: &RepulsionOptions) -> Vector {
    let delta = a - b;
    let shortfall = (opts.threshold_distance - delta.length()).max(0.0);
    geom::normalize_or_zero(delta) * (opts.force_scale * shortfall)
}

/// Accumulated repulsion for every position over all ordered pairs.
///
/// Each position is visited as the pushed member against every other position, so a pair
/// contributes once to each of its members. This is a full O(n²) pass.
pub fn explosion(positions: &[Point], opts: &RepulsionOptions) -> Vec<Vector> {
    let mut forces = vec![geom::vector(0.0, 0.0); positions.len()];
    for (i, &a) in positions.iter().enumerate() {
        for (j, &b) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            forces[i] += force_between(a, b, opts);
        }
    }
    forces
}
