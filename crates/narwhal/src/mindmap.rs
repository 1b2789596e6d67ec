use crate::config::MindMapOptions;
use crate::document::GraphDocument;
use crate::headless::HeadlessWorld;
use crate::observer::{FrameObserver, FrameStats, TracingObserver};
use crate::physics::{BodyId, ConstraintId, PhysicsWorld};
use crate::{Error, Result};
use narwhal_core::geom::{Bounds, Point, union_bounds};
use narwhal_core::model::ID_KEY;
use narwhal_core::{EdgeHandle, GraphModel, Identity, Properties, VertexHandle};
use narwhal_render::{DrawingSurface, EdgeRoute, EdgeRouter, TextFitter, draw_labels};
use remora::LayoutForce;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Frame driver tying a [`GraphModel`] to a physics world and a drawing surface.
///
/// A tick runs, in order:
///
/// 1. before step: pull positions from the world, restore outlines, recenter on the union of
///    the world's body bounds, push back;
/// 2. the world step;
/// 3. after step: pull positions, restore outlines, draw nodes, captions and edges, then apply
///    the repulsion forces for the next step.
///
/// Nothing happens until [`MindMap::run`] enables the loop.
pub struct MindMap<W: PhysicsWorld = HeadlessWorld, O: FrameObserver = TracingObserver> {
    model: GraphModel,
    world: W,
    observer: O,
    options: MindMapOptions,
    layout: LayoutForce,
    router: EdgeRouter,
    fitter: TextFitter,
    /// Indexed by vertex handle.
    bodies: Vec<BodyId>,
    /// Indexed by edge handle; `None` when an endpoint has no body.
    constraints: Vec<Option<ConstraintId>>,
    original_bounds: Bounds,
    enabled: bool,
    tick: u64,
}

impl MindMap {
    pub fn new(options: MindMapOptions) -> Self {
        let world = HeadlessWorld::new(options.physics.clone());
        Self::with_world(options, world, TracingObserver)
    }
}

impl Default for MindMap {
    fn default() -> Self {
        Self::new(MindMapOptions::default())
    }
}

impl<W: PhysicsWorld, O: FrameObserver> MindMap<W, O> {
    pub fn with_world(options: MindMapOptions, world: W, observer: O) -> Self {
        Self {
            model: GraphModel::new(options.model.clone()),
            world,
            observer,
            layout: options.layout.clone(),
            router: EdgeRouter::new(options.edges.clone()),
            fitter: TextFitter::new(options.fit.clone()),
            original_bounds: options.model.viewport(),
            options,
            bodies: Vec::new(),
            constraints: Vec::new(),
            enabled: false,
            tick: 0,
        }
    }

    pub fn model(&self) -> &GraphModel {
        &self.model
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn options(&self) -> &MindMapOptions {
        &self.options
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn body(&self, vertex: VertexHandle) -> Option<BodyId> {
        self.bodies.get(vertex.index()).copied()
    }

    pub fn constraint(&self, edge: EdgeHandle) -> Option<ConstraintId> {
        self.constraints.get(edge.index()).copied().flatten()
    }

    /// Adds a vertex and its rectangular body.
    pub fn add_vertex(&mut self, properties: Properties) -> Result<VertexHandle> {
        let handle = self.model.add_vertex(properties)?;
        if let Some(vertex) = self.model.vertex(handle) {
            let body = self.world.create_body(vertex.position(), vertex.outline());
            self.bodies.push(body);
        }
        Ok(handle)
    }

    /// Adds an edge and, when both endpoints have bodies, its spring.
    pub fn add_edge(
        &mut self,
        source: VertexHandle,
        verb: impl Into<String>,
        target: VertexHandle,
        properties: Properties,
    ) -> EdgeHandle {
        let handle = self.model.add_edge(source, verb, target, properties);
        let constraint = match (self.body(source), self.body(target), self.model.edge(handle)) {
            (Some(a), Some(b), Some(edge)) => Some(self.world.create_constraint(
                a,
                b,
                edge.rest_length(),
                edge.stiffness(),
            )),
            _ => None,
        };
        self.constraints.push(constraint);
        handle
    }

    /// Adds every vertex of `doc`, then every edge.
    ///
    /// The whole document is checked first: a missing or repeated vertex id, or an edge naming
    /// an id that is neither in the document nor already in the map, fails the load with the
    /// map left unchanged.
    pub fn load_document(&mut self, doc: &GraphDocument) -> Result<()> {
        let mut incoming = FxHashSet::default();
        for properties in &doc.vertices {
            let id = properties
                .get(ID_KEY)
                .and_then(Identity::from_value)
                .ok_or(narwhal_core::Error::MissingIdentity)?;
            if self.model.handle_of(&id).is_some() || incoming.contains(&id) {
                return Err(narwhal_core::Error::DuplicateIdentity { id }.into());
            }
            incoming.insert(id);
        }
        for record in &doc.edges {
            for endpoint in [&record.source, &record.target] {
                let known = Identity::from_value(endpoint)
                    .is_some_and(|id| incoming.contains(&id) || self.model.handle_of(&id).is_some());
                if !known {
                    return Err(Error::UnknownVertex {
                        id: endpoint.to_string(),
                    });
                }
            }
        }

        for properties in &doc.vertices {
            self.add_vertex(properties.clone())?;
        }
        for record in &doc.edges {
            let source = self.resolve(&record.source)?;
            let target = self.resolve(&record.target)?;
            self.add_edge(source, record.verb.clone(), target, record.properties.clone());
        }
        tracing::debug!(
            vertices = doc.vertices.len(),
            edges = doc.edges.len(),
            "document loaded"
        );
        Ok(())
    }

    fn resolve(&self, id: &serde_json::Value) -> Result<VertexHandle> {
        Identity::from_value(id)
            .and_then(|identity| self.model.handle_of(&identity))
            .ok_or_else(|| Error::UnknownVertex { id: id.to_string() })
    }

    pub fn run(&mut self) {
        self.enabled = true;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs one frame, drawing onto `surface`. `None` while stopped.
    pub fn tick(&mut self, surface: &mut dyn DrawingSurface) -> Option<FrameStats> {
        self.frame(Some(surface))
    }

    /// Runs one frame without drawing. `None` while stopped.
    pub fn advance(&mut self) -> Option<FrameStats> {
        self.frame(None)
    }

    /// Draws the current state without stepping.
    pub fn draw(&self, surface: &mut dyn DrawingSurface) -> (usize, usize) {
        self.draw_bodies(&mut *surface);
        let labels = draw_labels(&mut *surface, &self.model, &self.fitter, &self.options.labels);
        let routes = self
            .router
            .draw(&mut *surface, &self.model, &self.options.edge_color);
        (labels.len(), routes.len())
    }

    fn frame(&mut self, surface: Option<&mut dyn DrawingSurface>) -> Option<FrameStats> {
        if !self.enabled {
            return None;
        }
        self.tick += 1;

        self.pull_positions();
        self.layout.restore_shapes(&mut self.model);
        self.push_outlines();
        let recenter_offset = self.world_bounds().map(|bounds| {
            self.layout
                .recenter_within(&mut self.model, &bounds, &self.original_bounds)
        });
        self.push_positions();

        let mut stats = FrameStats {
            tick: self.tick,
            vertex_count: self.model.vertex_count(),
            recenter_offset,
            ..FrameStats::default()
        };
        self.observer.before_step(&stats);

        self.world.step();

        self.pull_positions();
        self.layout.restore_shapes(&mut self.model);
        self.push_outlines();
        if let Some(surface) = surface {
            let (labels, edges) = self.draw(surface);
            stats.labels_drawn = labels;
            stats.edges_drawn = edges;
        }

        let forces = self.layout.explosion_for(&self.model);
        stats.total_repulsion = forces.iter().map(|(_, f)| f.length()).sum();
        for (vertex, force) in forces {
            if let Some(body) = self.body(vertex) {
                self.world.apply_force(body, force);
            }
        }
        self.observer.after_step(&stats);
        Some(stats)
    }

    fn draw_bodies(&self, surface: &mut dyn DrawingSurface) {
        for (_, vertex) in self.model.vertices() {
            let Some((first, rest)) = vertex.outline().split_first() else {
                continue;
            };
            surface.begin_path();
            surface.move_to(*first);
            for p in rest {
                surface.line_to(*p);
            }
            surface.close_path();
            if let Some(fill) = &self.options.node_fill {
                surface.fill(fill);
            }
            surface.stroke(&self.options.node_stroke, 1.0);
        }
    }

    /// Union of the bounds the world reports for every body.
    fn world_bounds(&self) -> Option<Bounds> {
        union_bounds(self.bodies.iter().filter_map(|body| self.world.bounds(*body)))
    }

    fn pull_positions(&mut self) {
        let Self {
            model,
            world,
            bodies,
            ..
        } = self;
        for (handle, vertex) in model.vertices_mut() {
            let Some(body) = bodies.get(handle.index()) else {
                continue;
            };
            if let Some(p) = world.position(*body) {
                vertex.set_position(p);
            }
        }
    }

    fn push_positions(&mut self) {
        for (handle, vertex) in self.model.vertices() {
            if let Some(body) = self.bodies.get(handle.index()) {
                self.world.set_position(*body, vertex.position());
                self.world.set_outline(*body, vertex.outline());
            }
        }
    }

    fn push_outlines(&mut self) {
        for (handle, vertex) in self.model.vertices() {
            if let Some(body) = self.bodies.get(handle.index()) {
                self.world.set_outline(*body, vertex.outline());
            }
        }
    }

    /// Current layout: vertex positions and routed edges.
    pub fn snapshot(&self) -> LayoutSnapshot {
        let fallback = &self.options.labels.fallback_name;
        let vertices = self
            .model
            .vertices()
            .map(|(_, v)| VertexSnapshot {
                id: v.id().clone(),
                label: v.label().map(str::to_string),
                name: v.display_name(fallback),
                position: v.position(),
                bounds: v.bounds(),
            })
            .collect();

        let edges = self
            .router
            .route_all(&self.model)
            .into_iter()
            .filter_map(|route| {
                let edge = self.model.edge(route.edge)?;
                Some(EdgeSnapshot {
                    id: edge.id().cloned(),
                    verb: edge.verb().to_string(),
                    source: self.model.vertex(edge.source())?.id().clone(),
                    target: self.model.vertex(edge.target())?.id().clone(),
                    route,
                })
            })
            .collect();

        LayoutSnapshot {
            tick: self.tick,
            vertices,
            edges,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub tick: u64,
    pub vertices: Vec<VertexSnapshot>,
    pub edges: Vec<EdgeSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexSnapshot {
    pub id: Identity,
    pub label: Option<String>,
    pub name: String,
    pub position: Point,
    pub bounds: Option<Bounds>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSnapshot {
    pub id: Option<Identity>,
    pub verb: String,
    pub source: Identity,
    pub target: Identity,
    pub route: EdgeRoute,
}
