use narwhal_core::geom::{Bounds, Point, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub usize);

/// Rigid-body world the mind map lives in.
///
/// The driver only creates bodies and springs, moves bodies, overwrites their outlines and
/// applies forces; integration and constraint resolution are up to the world. Calls naming an
/// unknown body are ignored.
pub trait PhysicsWorld {
    /// Adds a body centered on `position` whose boundary is `outline` (world space).
    fn create_body(&mut self, position: Point, outline: &[Point]) -> BodyId;

    /// Adds a spring between two bodies with a rest length and stiffness.
    fn create_constraint(
        &mut self,
        a: BodyId,
        b: BodyId,
        length: f64,
        stiffness: f64,
    ) -> ConstraintId;

    fn position(&self, body: BodyId) -> Option<Point>;

    /// Teleports a body; its outline moves with it.
    fn set_position(&mut self, body: BodyId, position: Point);

    fn bounds(&self, body: BodyId) -> Option<Bounds>;

    /// Replaces a body's world-space outline, discarding any rotation the world applied.
    fn set_outline(&mut self, body: BodyId, outline: &[Point]);

    /// Accumulates a force for the next step.
    fn apply_force(&mut self, body: BodyId, force: Vector);

    /// Advances the simulation by one tick.
    fn step(&mut self);
}
