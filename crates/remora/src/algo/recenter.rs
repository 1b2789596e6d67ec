use super::RecenterOptions;
use narwhal_core::geom::{self, Bounds, Vector};

/// Offset of the center of `bounds` from the center of `original_bounds`, scaled by the damping
/// factor. The original center is taken as `original_bounds.max / 2`, i.e. the original
/// viewport is assumed to start at the origin.
pub fn center_of_mass_offset(
    bounds: &Bounds,
    original_bounds: &Bounds,
    opts: &RecenterOptions,
) -> Vector {
    let center = geom::bounds_center(bounds);
    geom::vector(
        (center.x - original_bounds.max.x / 2.0) * opts.damping,
        (center.y - original_bounds.max.y / 2.0) * opts.damping,
    )
}
