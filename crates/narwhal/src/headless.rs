//! Small Verlet world for driving mind maps without an external engine.
//!
//! Bodies integrate with position Verlet and air friction; springs correct positions directly,
//! split by inverse mass. There is no collision, gravity or rotation.

use crate::physics::{BodyId, ConstraintId, PhysicsWorld};
use narwhal_core::geom::{Bounds, Point, Vector, bounds_of, vector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeadlessOptions {
    /// Tick length in milliseconds.
    pub delta: f64,
    /// Fraction of velocity lost per tick.
    pub air_friction: f64,
    /// Mass per unit of outline area.
    pub density: f64,
    pub constraint_iterations: usize,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            delta: 1000.0 / 60.0,
            air_friction: 0.01,
            density: 0.001,
            constraint_iterations: 2,
        }
    }
}

#[derive(Debug, Clone)]
struct Body {
    position: Point,
    position_prev: Point,
    force: Vector,
    inverse_mass: f64,
    outline: Vec<Point>,
}

impl Body {
    fn translate(&mut self, offset: Vector) {
        self.position = self.position + offset;
        for p in &mut self.outline {
            *p = *p + offset;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Spring {
    a: BodyId,
    b: BodyId,
    length: f64,
    stiffness: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessWorld {
    options: HeadlessOptions,
    bodies: Vec<Body>,
    springs: Vec<Spring>,
    steps: u64,
}

impl HeadlessWorld {
    pub fn new(options: HeadlessOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &HeadlessOptions {
        &self.options
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.springs.len()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Displacement of the last step.
    pub fn velocity(&self, body: BodyId) -> Option<Vector> {
        self.bodies
            .get(body.0)
            .map(|b| b.position - b.position_prev)
    }

    fn integrate(&mut self) {
        let dt2 = self.options.delta * self.options.delta;
        let keep = 1.0 - self.options.air_friction;
        for body in &mut self.bodies {
            let velocity =
                (body.position - body.position_prev) * keep + body.force * (body.inverse_mass * dt2);
            body.position_prev = body.position;
            body.translate(velocity);
            body.force = vector(0.0, 0.0);
        }
    }

    fn solve_springs(&mut self) {
        for spring in &self.springs {
            let (Some(a), Some(b)) = (self.bodies.get(spring.a.0), self.bodies.get(spring.b.0))
            else {
                continue;
            };
            if spring.a == spring.b {
                continue;
            }
            let delta = b.position - a.position;
            let current = delta.length();
            let total_inverse = a.inverse_mass + b.inverse_mass;
            if current <= f64::EPSILON || total_inverse <= 0.0 {
                continue;
            }
            let correction = delta * ((current - spring.length) / current * spring.stiffness);
            let share_a = a.inverse_mass / total_inverse;
            let share_b = b.inverse_mass / total_inverse;
            self.bodies[spring.a.0].translate(correction * share_a);
            self.bodies[spring.b.0].translate(-correction * share_b);
        }
    }
}

fn polygon_area(outline: &[Point]) -> f64 {
    let n = outline.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let p = outline[i];
            let q = outline[(i + 1) % n];
            p.x * q.y - q.x * p.y
        })
        .sum();
    (twice / 2.0).abs()
}

impl PhysicsWorld for HeadlessWorld {
    fn create_body(&mut self, position: Point, outline: &[Point]) -> BodyId {
        let mass = polygon_area(outline) * self.options.density;
        let inverse_mass = if mass > 0.0 { 1.0 / mass } else { 1.0 };
        self.bodies.push(Body {
            position,
            position_prev: position,
            force: vector(0.0, 0.0),
            inverse_mass,
            outline: outline.to_vec(),
        });
        BodyId(self.bodies.len() - 1)
    }

    fn create_constraint(
        &mut self,
        a: BodyId,
        b: BodyId,
        length: f64,
        stiffness: f64,
    ) -> ConstraintId {
        self.springs.push(Spring {
            a,
            b,
            length,
            stiffness,
        });
        ConstraintId(self.springs.len() - 1)
    }

    fn position(&self, body: BodyId) -> Option<Point> {
        self.bodies.get(body.0).map(|b| b.position)
    }

    /// Moves the previous position along, so teleporting adds no velocity.
    fn set_position(&mut self, body: BodyId, position: Point) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            let offset = position - b.position;
            b.position_prev = b.position_prev + offset;
            b.translate(offset);
        }
    }

    fn bounds(&self, body: BodyId) -> Option<Bounds> {
        self.bodies.get(body.0).and_then(|b| bounds_of(&b.outline))
    }

    fn set_outline(&mut self, body: BodyId, outline: &[Point]) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.outline.clear();
            b.outline.extend_from_slice(outline);
        }
    }

    fn apply_force(&mut self, body: BodyId, force: Vector) {
        if let Some(b) = self.bodies.get_mut(body.0) {
            b.force = b.force + force;
        }
    }

    fn step(&mut self) {
        self.integrate();
        for _ in 0..self.options.constraint_iterations {
            self.solve_springs();
        }
        self.steps += 1;
        tracing::trace!(step = self.steps, bodies = self.bodies.len(), "world stepped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narwhal_core::geom::point;

    fn square(center: Point, half: f64) -> Vec<Point> {
        vec![
            point(center.x - half, center.y - half),
            point(center.x + half, center.y - half),
            point(center.x + half, center.y + half),
            point(center.x - half, center.y + half),
        ]
    }

    #[test]
    fn mass_follows_outline_area() {
        let outline = square(point(0.0, 0.0), 10.0);
        assert_eq!(polygon_area(&outline), 400.0);
        let mut world = HeadlessWorld::default();
        let id = world.create_body(point(0.0, 0.0), &outline);
        assert!((world.bodies[id.0].inverse_mass - 1.0 / 0.4).abs() < 1e-12);
    }

    #[test]
    fn resting_body_stays_put() {
        let mut world = HeadlessWorld::default();
        let id = world.create_body(point(5.0, 5.0), &square(point(5.0, 5.0), 1.0));
        for _ in 0..10 {
            world.step();
        }
        assert_eq!(world.position(id), Some(point(5.0, 5.0)));
        assert_eq!(world.steps(), 10);
    }

    #[test]
    fn force_accelerates_and_friction_damps() {
        let mut world = HeadlessWorld::default();
        let id = world.create_body(point(0.0, 0.0), &square(point(0.0, 0.0), 10.0));
        world.apply_force(id, vector(1e-5, 0.0));
        world.step();
        let v1 = world.velocity(id).expect("body").x;
        assert!(v1 > 0.0);
        world.step();
        let v2 = world.velocity(id).expect("body").x;
        assert!(v2 < v1 && v2 > 0.0, "{v1} {v2}");
        let bounds = world.bounds(id).expect("outline");
        let p = world.position(id).expect("body");
        assert!((bounds.min.x - (p.x - 10.0)).abs() < 1e-12, "outline moves with body");
    }

    #[test]
    fn spring_pulls_toward_rest_length() {
        let mut world = HeadlessWorld::new(HeadlessOptions {
            air_friction: 1.0,
            ..HeadlessOptions::default()
        });
        let a = world.create_body(point(0.0, 0.0), &square(point(0.0, 0.0), 10.0));
        let b = world.create_body(point(300.0, 0.0), &square(point(300.0, 0.0), 10.0));
        world.create_constraint(a, b, 100.0, 0.1);
        assert_eq!(world.constraint_count(), 1);

        let mut last = 300.0;
        for _ in 0..20 {
            world.step();
            let d = (world.position(b).expect("b") - world.position(a).expect("a")).length();
            assert!(d < last && d > 100.0, "{d}");
            last = d;
        }
    }

    #[test]
    fn teleport_adds_no_velocity() {
        let mut world = HeadlessWorld::default();
        let id = world.create_body(point(0.0, 0.0), &square(point(0.0, 0.0), 1.0));
        world.set_position(id, point(50.0, 50.0));
        world.step();
        assert_eq!(world.position(id), Some(point(50.0, 50.0)));
        assert_eq!(world.bounds(id).expect("outline").min, point(49.0, 49.0));
    }

    #[test]
    fn unknown_bodies_are_ignored() {
        let mut world = HeadlessWorld::default();
        world.apply_force(BodyId(3), vector(1.0, 1.0));
        world.set_position(BodyId(3), point(1.0, 1.0));
        world.create_constraint(BodyId(0), BodyId(1), 10.0, 1.0);
        world.step();
        assert!(world.position(BodyId(3)).is_none());
        assert_eq!(world.body_count(), 0);
    }
}
