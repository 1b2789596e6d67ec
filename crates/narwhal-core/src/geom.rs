//! Geometry aliases and the segment primitives used for edge clipping.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Vector = euclid::Vector2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;
pub type Bounds = euclid::Box2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

pub fn vector(x: f64, y: f64) -> Vector {
    euclid::vec2(x, y)
}

pub fn size(width: f64, height: f64) -> Size {
    euclid::size2(width, height)
}

/// Unit vector along `v`, or the zero vector when `v` has no length.
pub fn normalize_or_zero(v: Vector) -> Vector {
    let len = v.length();
    if len == 0.0 || !len.is_finite() {
        return vector(0.0, 0.0);
    }
    v / len
}

/// Smallest box containing every point, or `None` for an empty input.
pub fn bounds_of(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(Bounds::new(min, max))
}

/// Union of all boxes, or `None` for an empty input.
pub fn union_bounds<I>(boxes: I) -> Option<Bounds>
where
    I: IntoIterator<Item = Bounds>,
{
    boxes.into_iter().reduce(|acc, b| {
        Bounds::new(
            point(acc.min.x.min(b.min.x), acc.min.y.min(b.min.y)),
            point(acc.max.x.max(b.max.x), acc.max.y.max(b.max.y)),
        )
    })
}

/// Midpoint of a box computed as `max/2 + min/2`.
pub fn bounds_center(b: &Bounds) -> Point {
    point(b.max.x / 2.0 + b.min.x / 2.0, b.max.y / 2.0 + b.min.y / 2.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn direction(&self) -> Vector {
        self.b - self.a
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }
}

/// Sign agreement as `a/|a| == b/|b|`: zero never agrees with anything, itself included.
pub fn same_sign(a: f64, b: f64) -> bool {
    a != 0.0 && b != 0.0 && (a < 0.0) == (b < 0.0)
}

/// Intersection point of two segments.
///
/// Each segment's endpoints are classified against the other segment's line with signed-area
/// tests; the segments miss when both endpoints of either one fall strictly on the same side.
/// Endpoints lying exactly on the other line pass the side test, so touching segments
/// intersect. Parallel and co-linear pairs resolve to `None` through the zero determinant.
pub fn intersect(p: &Segment, q: &Segment) -> Option<Point> {
    let (p1, p2, q1, q2) = (p.a, p.b, q.a, q.b);

    // Line through p as `a1 x + b1 y + c1 = 0`.
    let a1 = p2.y - p1.y;
    let b1 = p1.x - p2.x;
    let c1 = p2.x * p1.y - p1.x * p2.y;

    let r3 = a1 * q1.x + b1 * q1.y + c1;
    let r4 = a1 * q2.x + b1 * q2.y + c1;
    if r3 != 0.0 && r4 != 0.0 && same_sign(r3, r4) {
        return None;
    }

    let a2 = q2.y - q1.y;
    let b2 = q1.x - q2.x;
    let c2 = q2.x * q1.y - q1.x * q2.y;

    let r1 = a2 * p1.x + b2 * p1.y + c2;
    let r2 = a2 * p2.x + b2 * p2.y + c2;
    if r1 != 0.0 && r2 != 0.0 && same_sign(r1, r2) {
        return None;
    }

    let denom = a1 * b2 - a2 * b1;
    if denom == 0.0 {
        return None;
    }

    let x = (b1 * c2 - b2 * c1) / denom;
    let y = (a2 * c1 - a1 * c2) / denom;
    Some(point(x, y))
}

/// Closed boundary of a polygon: each point paired with its successor, the last with the first.
pub fn polygon_to_segments(points: &[Point]) -> Vec<Segment> {
    let n = points.len();
    (0..n)
        .map(|i| Segment::new(points[i], points[(i + 1) % n]))
        .collect()
}

/// Where the segment `interior -> external` leaves `polygon`.
///
/// Boundary segments are tried in polygon order and the first hit wins, which for non-convex
/// outlines is not necessarily the hit nearest to `interior`. Without any hit (e.g. `external`
/// inside the polygon) the interior point is returned.
pub fn point_on_polygon_boundary_towards(
    interior: Point,
    polygon: &[Point],
    external: Point,
) -> Point {
    let ray = Segment::new(interior, external);
    polygon_to_segments(polygon)
        .iter()
        .find_map(|edge| intersect(&ray, edge))
        .unwrap_or(interior)
}

/// Like [`point_on_polygon_boundary_towards`], but picks the hit closest to `interior`.
pub fn nearest_point_on_polygon_boundary_towards(
    interior: Point,
    polygon: &[Point],
    external: Point,
) -> Point {
    let ray = Segment::new(interior, external);
    polygon_to_segments(polygon)
        .iter()
        .filter_map(|edge| intersect(&ray, edge))
        .min_by(|p, q| {
            (*p - interior)
                .square_length()
                .partial_cmp(&(*q - interior).square_length())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(interior)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(point(ax, ay), point(bx, by))
    }

    fn square(cx: f64, cy: f64, half: f64) -> Vec<Point> {
        vec![
            point(cx - half, cy - half),
            point(cx + half, cy - half),
            point(cx + half, cy + half),
            point(cx - half, cy + half),
        ]
    }

    #[test]
    fn same_sign_treats_zero_as_signless() {
        assert!(same_sign(2.0, 5.0));
        assert!(same_sign(-2.0, -0.5));
        assert!(!same_sign(-2.0, 5.0));
        assert!(!same_sign(0.0, 5.0));
        assert!(!same_sign(-3.0, 0.0));
        assert!(!same_sign(0.0, 0.0));
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 10.0, 0.0);
        assert_eq!(intersect(&a, &b), Some(point(5.0, 5.0)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(0.0, 5.0, 10.0, 5.0);
        assert_eq!(intersect(&a, &b), None);
        assert_eq!(intersect(&b, &a), None);
    }

    #[test]
    fn colinear_overlap_falls_back_to_none() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(5.0, 0.0, 15.0, 0.0);
        assert_eq!(intersect(&a, &b), None);
    }

    #[test]
    fn touching_endpoint_counts_as_intersection() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(10.0, 0.0, 10.0, 10.0);
        assert_eq!(intersect(&a, &b), Some(point(10.0, 0.0)));
    }

    #[test]
    fn segments_that_would_cross_if_extended_miss() {
        let a = seg(0.0, 0.0, 4.0, 4.0);
        let b = seg(0.0, 10.0, 10.0, 0.0);
        assert_eq!(intersect(&a, &b), None);
    }

    #[test]
    fn intersect_is_symmetric() {
        let cases = [
            (seg(0.0, 0.0, 10.0, 10.0), seg(0.0, 10.0, 10.0, 0.0)),
            (seg(-3.0, 1.5, 7.25, -2.0), seg(1.0, -6.0, 2.0, 9.0)),
            (seg(0.0, 0.0, 10.0, 0.0), seg(0.0, 5.0, 10.0, 5.0)),
            (seg(0.1, 0.2, 100.3, 50.7), seg(40.0, -10.0, 60.0, 90.0)),
        ];
        for (a, b) in cases {
            assert_eq!(intersect(&a, &b), intersect(&b, &a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn polygon_segments_wrap_around() {
        let pts = square(0.0, 0.0, 1.0);
        let segs = polygon_to_segments(&pts);
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[3].a, pts[3]);
        assert_eq!(segs[3].b, pts[0]);
        assert!(polygon_to_segments(&[]).is_empty());
    }

    #[test]
    fn boundary_point_lies_on_the_side_facing_the_target() {
        let pts = square(0.0, 0.0, 10.0);
        let hit = point_on_polygon_boundary_towards(point(0.0, 0.0), &pts, point(100.0, 0.0));
        assert_eq!(hit, point(10.0, 0.0));

        let hit = point_on_polygon_boundary_towards(point(0.0, 0.0), &pts, point(0.0, -50.0));
        assert_eq!(hit, point(0.0, -10.0));
    }

    #[test]
    fn boundary_search_without_crossing_returns_interior() {
        let pts = square(0.0, 0.0, 10.0);
        let c = point(1.0, 2.0);
        assert_eq!(point_on_polygon_boundary_towards(c, &pts, c), c);
        assert_eq!(
            point_on_polygon_boundary_towards(c, &pts, point(3.0, 3.0)),
            c
        );
    }

    #[test]
    fn first_hit_follows_segment_order_for_concave_outlines() {
        // "C" shape opening to the right; the inner wall (-5, *) precedes the outer back wall
        // (-10, *) in polygon order.
        let pts = vec![
            point(-10.0, -10.0),
            point(10.0, -10.0),
            point(10.0, -5.0),
            point(-5.0, -5.0),
            point(-5.0, 5.0),
            point(10.0, 5.0),
            point(10.0, 10.0),
            point(-10.0, 10.0),
        ];
        let from = point(-30.0, 0.0);
        let towards = point(8.0, 0.0);
        assert_eq!(
            point_on_polygon_boundary_towards(from, &pts, towards),
            point(-5.0, 0.0)
        );
        assert_eq!(
            nearest_point_on_polygon_boundary_towards(from, &pts, towards),
            point(-10.0, 0.0)
        );
    }

    #[test]
    fn union_and_center_of_boxes() {
        let a = Bounds::new(point(0.0, 0.0), point(2.0, 2.0));
        let b = Bounds::new(point(-4.0, 1.0), point(1.0, 6.0));
        let u = union_bounds([a, b]).expect("non-empty");
        assert_eq!(u.min, point(-4.0, 0.0));
        assert_eq!(u.max, point(2.0, 6.0));
        assert_eq!(bounds_center(&u), point(-1.0, 3.0));
        assert!(union_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn normalize_or_zero_handles_degenerate_vectors() {
        assert_eq!(normalize_or_zero(vector(0.0, 0.0)), vector(0.0, 0.0));
        assert_eq!(normalize_or_zero(vector(3.0, 4.0)), vector(0.6, 0.8));
    }
}
