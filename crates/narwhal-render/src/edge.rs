//! Connector geometry between vertex outlines.
//!
//! An edge runs between its endpoints' centers, clipped where it leaves each outline. Several
//! edges over the same ordered pair fan out as quadratic curves with growing curvature; when
//! the opposite direction is also present every edge of the pair bends, so the two groups sit
//! on opposite sides of the chord. The arrowhead is an equilateral triangle at the target end.

use crate::surface::DrawingSurface;
use narwhal_core::geom::{
    Point, Segment, Vector, nearest_point_on_polygon_boundary_towards,
    point_on_polygon_boundary_towards, vector,
};
use narwhal_core::{Edge, EdgeHandle, GraphModel, Vertex, VertexHandle};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Which crossing wins when a connector crosses an outline more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundarySearch {
    /// First crossing in outline order.
    #[default]
    FirstHit,
    /// Crossing closest to the vertex center.
    Nearest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeRouteOptions {
    /// Curvature of the outermost fanned edge, relative to chord length.
    pub fan_curvature: f64,
    /// Side length of the arrowhead triangle.
    pub arrow_size: f64,
    pub line_width: f64,
    pub boundary_search: BoundarySearch,
}

impl Default for EdgeRouteOptions {
    fn default() -> Self {
        Self {
            fan_curvature: 0.4,
            arrow_size: 8.0,
            line_width: 1.0,
            boundary_search: BoundarySearch::FirstHit,
        }
    }
}

/// Position of an edge among the edges sharing its ordered endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FanSlot {
    pub index: usize,
    pub count: usize,
    /// Some edge runs target -> source.
    pub has_reverse: bool,
}

impl FanSlot {
    pub fn is_curved(&self) -> bool {
        self.count > 1 || self.has_reverse
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EdgePath {
    Straight { start: Point, end: Point },
    Curved { start: Point, control: Point, end: Point },
}

impl EdgePath {
    pub fn start(&self) -> Point {
        match *self {
            Self::Straight { start, .. } | Self::Curved { start, .. } => start,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Self::Straight { end, .. } | Self::Curved { end, .. } => end,
        }
    }

    /// Direction of travel at the end point.
    pub fn end_tangent(&self) -> Vector {
        match *self {
            Self::Straight { start, end } => end - start,
            Self::Curved { control, end, .. } => end - control,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRoute {
    #[serde(skip)]
    pub edge: EdgeHandle,
    pub slot: FanSlot,
    pub curvature: f64,
    pub path: EdgePath,
    /// Tip, then the two base corners. `None` for a degenerate tangent.
    pub arrow: Option<[Point; 3]>,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeRouter {
    pub options: EdgeRouteOptions,
}

impl EdgeRouter {
    pub fn new(options: EdgeRouteOptions) -> Self {
        Self { options }
    }

    fn boundary(&self, vertex: &Vertex, towards: Point) -> Point {
        match self.options.boundary_search {
            BoundarySearch::FirstHit => {
                point_on_polygon_boundary_towards(vertex.position(), vertex.outline(), towards)
            }
            BoundarySearch::Nearest => nearest_point_on_polygon_boundary_towards(
                vertex.position(),
                vertex.outline(),
                towards,
            ),
        }
    }

    /// Center-to-center segment trimmed to both outlines.
    ///
    /// An endpoint whose outline is not crossed (overlapping vertices) stays at its center.
    pub fn clip_between(&self, source: &Vertex, target: &Vertex) -> Segment {
        let a = self.boundary(source, target.position());
        let b = self.boundary(target, source.position());
        Segment::new(a, b)
    }

    /// Clipped segment for `edge`, or `None` when an endpoint is not in `model`.
    pub fn clipped_segment(&self, model: &GraphModel, edge: &Edge) -> Option<Segment> {
        let source = model.vertex(edge.source())?;
        let target = model.vertex(edge.target())?;
        Some(self.clip_between(source, target))
    }

    /// Fan slot of every edge, indexed like `model.edges()`.
    pub fn fan_slots(model: &GraphModel) -> Vec<FanSlot> {
        let mut groups: FxHashMap<(VertexHandle, VertexHandle), usize> = FxHashMap::default();
        let mut index_in_group = Vec::with_capacity(model.edges().len());
        for edge in model.edges() {
            let count = groups.entry((edge.source(), edge.target())).or_insert(0);
            index_in_group.push(*count);
            *count += 1;
        }

        model
            .edges()
            .iter()
            .zip(index_in_group)
            .map(|(edge, index)| {
                let (s, t) = (edge.source(), edge.target());
                FanSlot {
                    index,
                    count: groups.get(&(s, t)).copied().unwrap_or(1),
                    has_reverse: s != t && groups.contains_key(&(t, s)),
                }
            })
            .collect()
    }

    /// Relative curvature for a slot: `fan_curvature * i / n`, shifted by one slot when the
    /// reverse direction is present so no edge of the pair stays on the chord.
    pub fn curvature(&self, slot: &FanSlot) -> f64 {
        if !slot.is_curved() {
            return 0.0;
        }
        let count = slot.count.max(1) as f64;
        let index = if slot.has_reverse {
            slot.index + 1
        } else {
            slot.index
        };
        self.options.fan_curvature * index as f64 / count
    }

    /// Quadratic control point: chord midpoint pushed clockwise by `curvature * chord length`.
    pub fn control_point(from: Point, to: Point, curvature: f64) -> Point {
        let d = to - from;
        // y grows downward, so (-dy, dx) is the clockwise normal.
        let normal = vector(-d.y, d.x);
        from.lerp(to, 0.5) + normal * curvature
    }

    pub fn route(&self, source: &Vertex, target: &Vertex, slot: FanSlot) -> (f64, EdgePath) {
        let curvature = self.curvature(&slot);
        if !slot.is_curved() {
            let seg = self.clip_between(source, target);
            return (
                curvature,
                EdgePath::Straight {
                    start: seg.a,
                    end: seg.b,
                },
            );
        }

        let control = Self::control_point(source.position(), target.position(), curvature);
        let path = EdgePath::Curved {
            start: self.boundary(source, control),
            control,
            end: self.boundary(target, control),
        };
        (curvature, path)
    }

    /// Routes every edge whose endpoints both exist, in edge order.
    pub fn route_all(&self, model: &GraphModel) -> Vec<EdgeRoute> {
        let slots = Self::fan_slots(model);
        let mut out = Vec::with_capacity(slots.len());
        for ((handle, edge), slot) in model.edge_handles().zip(slots) {
            let (Some(source), Some(target)) =
                (model.vertex(edge.source()), model.vertex(edge.target()))
            else {
                tracing::trace!(edge = handle.index(), "edge endpoint missing; not routed");
                continue;
            };
            let (curvature, path) = self.route(source, target, slot);
            let tangent = path.end_tangent();
            let tangent = if tangent.square_length() > 0.0 {
                tangent
            } else {
                target.position() - source.position()
            };
            out.push(EdgeRoute {
                edge: handle,
                slot,
                curvature,
                path,
                arrow: self.arrowhead(path.end(), tangent),
            });
        }
        out
    }

    /// Equilateral triangle with its apex on `tip`, pointing along `tangent`.
    ///
    /// The unit triangle points up (apex at the origin, base below it); it is rotated by
    /// `atan2(tangent) + pi/2`, scaled by `arrow_size` and moved to `tip`.
    pub fn arrowhead(&self, tip: Point, tangent: Vector) -> Option<[Point; 3]> {
        let len = tangent.length();
        if len <= 0.0 || !len.is_finite() {
            return None;
        }
        let angle = tangent.y.atan2(tangent.x) + std::f64::consts::FRAC_PI_2;
        let (sin, cos) = angle.sin_cos();
        let scale = self.options.arrow_size;
        let place = |x: f64, y: f64| {
            let rx = x * cos - y * sin;
            let ry = x * sin + y * cos;
            tip + vector(rx, ry) * scale
        };
        let h = 3f64.sqrt() / 2.0;
        Some([place(0.0, 0.0), place(-0.5, h), place(0.5, h)])
    }

    pub fn draw_route<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        route: &EdgeRoute,
        paint: &str,
    ) {
        surface.begin_path();
        match route.path {
            EdgePath::Straight { start, end } => {
                surface.move_to(start);
                surface.line_to(end);
            }
            EdgePath::Curved {
                start,
                control,
                end,
            } => {
                surface.move_to(start);
                surface.quadratic_curve_to(control, end);
            }
        }
        surface.stroke(paint, self.options.line_width);

        if let Some([tip, left, right]) = route.arrow {
            surface.begin_path();
            surface.move_to(tip);
            surface.line_to(left);
            surface.line_to(right);
            surface.close_path();
            surface.fill(paint);
        }
    }

    /// Routes and draws every edge of `model`.
    pub fn draw<S: DrawingSurface + ?Sized>(
        &self,
        surface: &mut S,
        model: &GraphModel,
        paint: &str,
    ) -> Vec<EdgeRoute> {
        let routes = self.route_all(model);
        for route in &routes {
            self.draw_route(surface, route, paint);
        }
        routes
    }
}
