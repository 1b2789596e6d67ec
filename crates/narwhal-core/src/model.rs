use crate::error::{Error, Result};
use crate::geom::{self, Bounds, Point, Size, Vector};
use crate::rng::XorShift64Star;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved property key holding a vertex's (or edge's) identity.
pub const ID_KEY: &str = "id";
/// Reserved property key holding a vertex's semantic category.
pub const LABEL_KEY: &str = "label";
/// Property drawn as the vertex caption.
pub const NAME_KEY: &str = "name";

/// Externally assigned identity. Strings and integers are kept as-is; any other JSON value is
/// keyed by its canonical JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum Identity {
    Int(i64),
    Text(String),
    Json(String),
}

impl Identity {
    /// `None` for JSON `null`, which counts as an absent identity.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(Self::Text(s.clone())),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Json(n.to_string()),
            }),
            other => Some(Self::Json(other.to_string())),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) | Self::Json(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Identity {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Identity {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Ordered key/value property bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Map<String, Value>> for Properties {
    fn from(value: serde_json::Map<String, Value>) -> Self {
        Self(value.into_iter().collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexHandle(usize);

impl VertexHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeHandle(usize);

impl EdgeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelOptions {
    /// Viewport spans `(0, 0)..(viewport_width, viewport_height)`; new vertices start at its center.
    pub viewport_width: f64,
    pub viewport_height: f64,
    pub node_width: f64,
    pub node_height: f64,
    /// Upper bound of the per-axis random offset added to a new vertex's position.
    pub jitter: f64,
    pub random_seed: u64,
    pub edge_length: f64,
    pub edge_stiffness: f64,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            node_width: 100.0,
            node_height: 20.0,
            jitter: 1.0,
            random_seed: 1,
            edge_length: 100.0,
            edge_stiffness: 0.0002,
        }
    }
}

impl ModelOptions {
    pub fn viewport(&self) -> Bounds {
        Bounds::new(
            geom::point(0.0, 0.0),
            geom::point(self.viewport_width, self.viewport_height),
        )
    }

    pub fn node_size(&self) -> Size {
        geom::size(self.node_width, self.node_height)
    }
}

/// Outline of an axis-aligned rectangle around its centroid, clockwise from the top-left corner.
pub fn rectangle_shape(size: Size) -> Vec<Vector> {
    let hw = size.width / 2.0;
    let hh = size.height / 2.0;
    vec![
        geom::vector(-hw, -hh),
        geom::vector(hw, -hh),
        geom::vector(hw, hh),
        geom::vector(-hw, hh),
    ]
}

#[derive(Debug, Clone)]
pub struct Vertex {
    id: Identity,
    label: Option<String>,
    properties: Properties,
    position: Point,
    shape: Vec<Vector>,
    outline: Vec<Point>,
    edges: Vec<EdgeHandle>,
}

impl Vertex {
    fn new(
        id: Identity,
        label: Option<String>,
        properties: Properties,
        position: Point,
        shape: Vec<Vector>,
    ) -> Self {
        let mut v = Self {
            id,
            label,
            properties,
            position,
            shape,
            outline: Vec::new(),
            edges: Vec::new(),
        };
        v.restore_outline();
        v
    }

    pub fn id(&self) -> &Identity {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Non-reserved properties, in insertion order.
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the vertex. The world-space outline is left alone until the next
    /// [`Vertex::restore_outline`].
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Boundary points relative to the centroid.
    pub fn shape(&self) -> &[Vector] {
        &self.shape
    }

    /// Boundary points in world space as of the last [`Vertex::restore_outline`].
    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    /// Rebuilds the world-space outline as `position + local offset`, discarding any rotation.
    pub fn restore_outline(&mut self) {
        let position = self.position;
        self.outline.clear();
        self.outline
            .extend(self.shape.iter().map(|offset| position + *offset));
    }

    pub fn bounds(&self) -> Option<Bounds> {
        geom::bounds_of(&self.outline)
    }

    /// Outgoing edges, in creation order.
    pub fn edges(&self) -> &[EdgeHandle] {
        &self.edges
    }

    /// Caption text: the `name` property, or `fallback` when it is absent, null, false or empty.
    pub fn display_name(&self, fallback: &str) -> String {
        match self.properties.get(NAME_KEY) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => fallback.to_string(),
            Some(Value::String(s)) if s.is_empty() => fallback.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    id: Option<Identity>,
    verb: String,
    source: VertexHandle,
    target: VertexHandle,
    properties: Properties,
    rest_length: f64,
    stiffness: f64,
}

impl Edge {
    pub fn id(&self) -> Option<&Identity> {
        self.id.as_ref()
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn source(&self) -> VertexHandle {
        self.source
    }

    pub fn target(&self) -> VertexHandle {
        self.target
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn rest_length(&self) -> f64 {
        self.rest_length
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }
}

/// Vertices keyed by identity (iterated in insertion order) plus every edge in creation order.
#[derive(Debug, Clone)]
pub struct GraphModel {
    options: ModelOptions,
    vertices: IndexMap<Identity, Vertex>,
    edges: Vec<Edge>,
    rng: XorShift64Star,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new(ModelOptions::default())
    }
}

impl GraphModel {
    pub fn new(options: ModelOptions) -> Self {
        let rng = XorShift64Star::new(options.random_seed);
        Self {
            options,
            vertices: IndexMap::new(),
            edges: Vec::new(),
            rng,
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Adds a vertex with the default rectangular outline.
    ///
    /// `properties` must carry an `id`; `id` and `label` are lifted out of the bag into named
    /// fields. On failure the model is left untouched.
    pub fn add_vertex(&mut self, properties: Properties) -> Result<VertexHandle> {
        let shape = rectangle_shape(self.options.node_size());
        self.add_vertex_with_shape(properties, shape)
    }

    /// Adds a vertex whose outline is `shape`, given relative to the centroid.
    pub fn add_vertex_with_shape(
        &mut self,
        mut properties: Properties,
        shape: Vec<Vector>,
    ) -> Result<VertexHandle> {
        let id = properties
            .get(ID_KEY)
            .and_then(Identity::from_value)
            .ok_or(Error::MissingIdentity)?;
        if self.vertices.contains_key(&id) {
            return Err(Error::DuplicateIdentity { id });
        }
        properties.remove(ID_KEY);
        let label = properties.remove(LABEL_KEY).and_then(|v| match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

        let center = geom::bounds_center(&self.options.viewport());
        let jitter = self.options.jitter;
        let dx = self.rng.next_f64_unit() * jitter;
        let dy = self.rng.next_f64_unit() * jitter;
        let position = geom::point(center.x + dx, center.y + dy);

        tracing::debug!(%id, x = position.x, y = position.y, "vertex added");
        let vertex = Vertex::new(id.clone(), label, properties, position, shape);
        let (index, _) = self.vertices.insert_full(id, vertex);
        Ok(VertexHandle(index))
    }

    /// Appends an edge to `source`'s edge list and to the global sequence.
    ///
    /// Neither endpoint is validated. Handles are plain indices into this model's vertex order:
    /// a handle taken from another model resolves to whichever local vertex has the same index,
    /// and one with no local vertex at its index is recorded but skipped by consumers that need
    /// both endpoints. Keeping handles and models paired is up to the caller.
    pub fn add_edge(
        &mut self,
        source: VertexHandle,
        verb: impl Into<String>,
        target: VertexHandle,
        mut properties: Properties,
    ) -> EdgeHandle {
        let id = properties
            .remove(ID_KEY)
            .and_then(|v| Identity::from_value(&v));
        let handle = EdgeHandle(self.edges.len());
        let edge = Edge {
            id,
            verb: verb.into(),
            source,
            target,
            properties,
            rest_length: self.options.edge_length,
            stiffness: self.options.edge_stiffness,
        };
        tracing::debug!(
            verb = %edge.verb,
            source = source.0,
            target = target.0,
            "edge added"
        );
        match self.vertices.get_index_mut(source.0) {
            Some((_, vertex)) => vertex.edges.push(handle),
            None => tracing::debug!(source = source.0, "edge source is not in this model"),
        }
        self.edges.push(edge);
        handle
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, handle: VertexHandle) -> Option<&Vertex> {
        self.vertices.get_index(handle.0).map(|(_, v)| v)
    }

    pub fn vertex_mut(&mut self, handle: VertexHandle) -> Option<&mut Vertex> {
        self.vertices.get_index_mut(handle.0).map(|(_, v)| v)
    }

    pub fn handle_of(&self, id: &Identity) -> Option<VertexHandle> {
        self.vertices.get_index_of(id).map(VertexHandle)
    }

    pub fn vertex_by_id(&self, id: &Identity) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexHandle, &Vertex)> {
        self.vertices
            .values()
            .enumerate()
            .map(|(i, v)| (VertexHandle(i), v))
    }

    pub fn vertices_mut(&mut self) -> impl Iterator<Item = (VertexHandle, &mut Vertex)> {
        self.vertices
            .values_mut()
            .enumerate()
            .map(|(i, v)| (VertexHandle(i), v))
    }

    /// Edges in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
        self.edges.get(handle.0)
    }

    pub fn edge_handles(&self) -> impl Iterator<Item = (EdgeHandle, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeHandle(i), e))
    }

    /// Rebuilds every vertex's world-space outline from its position.
    pub fn restore_outlines(&mut self) {
        for vertex in self.vertices.values_mut() {
            vertex.restore_outline();
        }
    }

    /// Union of all world-space outline bounds.
    pub fn bounds(&self) -> Option<Bounds> {
        geom::union_bounds(self.vertices.values().filter_map(Vertex::bounds))
    }

    pub fn positions(&self) -> Vec<Point> {
        self.vertices.values().map(Vertex::position).collect()
    }

    /// Moves every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector) {
        for vertex in self.vertices.values_mut() {
            vertex.position = vertex.position + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => Properties::from(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn identity_from_json_values() {
        assert_eq!(Identity::from_value(&json!(1)), Some(Identity::Int(1)));
        assert_eq!(Identity::from_value(&json!("a")), Some(Identity::from("a")));
        assert_eq!(
            Identity::from_value(&json!(1.5)),
            Some(Identity::Json("1.5".to_string()))
        );
        assert_eq!(
            Identity::from_value(&json!([1, 2])),
            Some(Identity::Json("[1,2]".to_string()))
        );
        assert_eq!(Identity::from_value(&Value::Null), None);
        assert_ne!(Identity::from(1), Identity::from("1"));
    }

    #[test]
    fn reserved_keys_are_lifted_out_of_the_bag() {
        let mut g = GraphModel::default();
        let h = g
            .add_vertex(props(json!({
                "label": "person", "id": 1, "name": "marko", "age": 29
            })))
            .expect("add");
        let v = g.vertex(h).expect("vertex");
        assert_eq!(v.id(), &Identity::Int(1));
        assert_eq!(v.label(), Some("person"));
        let keys: Vec<&str> = v.properties().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["name", "age"]);
        assert_eq!(v.display_name("Unknown"), "marko");
    }

    #[test]
    fn missing_identity_is_rejected_regardless_of_other_keys() {
        let mut g = GraphModel::default();
        for p in [
            json!({}),
            json!({"label": "person", "name": "x"}),
            json!({"id": null, "name": "x"}),
            json!({"ID": 3}),
        ] {
            assert_eq!(g.add_vertex(props(p)).unwrap_err(), Error::MissingIdentity);
        }
        assert!(g.is_empty());
    }

    #[test]
    fn duplicate_identity_is_rejected_and_model_unchanged() {
        let mut g = GraphModel::default();
        g.add_vertex(props(json!({"id": 7, "name": "a"})))
            .expect("first");
        let err = g
            .add_vertex(props(json!({"id": 7, "name": "b"})))
            .unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateIdentity {
                id: Identity::Int(7)
            }
        );
        assert_eq!(g.vertex_count(), 1);
        let v = g.vertex_by_id(&Identity::Int(7)).expect("vertex");
        assert_eq!(v.display_name("Unknown"), "a");
    }

    #[test]
    fn new_vertices_start_near_viewport_center_with_small_offset() {
        let mut g = GraphModel::default();
        let a = g.add_vertex(props(json!({"id": 1}))).expect("a");
        let b = g.add_vertex(props(json!({"id": 2}))).expect("b");
        let pa = g.vertex(a).expect("a").position();
        let pb = g.vertex(b).expect("b").position();
        for p in [pa, pb] {
            assert!((400.0..401.0).contains(&p.x), "{p:?}");
            assert!((300.0..301.0).contains(&p.y), "{p:?}");
        }
        assert_ne!(pa, pb);
    }

    #[test]
    fn placement_is_reproducible_for_a_seed() {
        let build = || {
            let mut g = GraphModel::default();
            for id in 1..=4 {
                g.add_vertex(props(json!({ "id": id }))).expect("add");
            }
            g.positions()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn outline_is_rectangle_around_position() {
        let mut g = GraphModel::default();
        let h = g.add_vertex(props(json!({"id": "n"}))).expect("add");
        let v = g.vertex_mut(h).expect("vertex");
        v.set_position(geom::point(10.0, 20.0));
        v.restore_outline();
        assert_eq!(
            v.outline(),
            &[
                geom::point(-40.0, 10.0),
                geom::point(60.0, 10.0),
                geom::point(60.0, 30.0),
                geom::point(-40.0, 30.0),
            ]
        );
        let b = v.bounds().expect("bounds");
        assert_eq!(b.min, geom::point(-40.0, 10.0));
        assert_eq!(b.max, geom::point(60.0, 30.0));
    }

    #[test]
    fn triangle_graph_round_trips() {
        let mut g = GraphModel::default();
        let h: Vec<VertexHandle> = (1..=3)
            .map(|id| g.add_vertex(props(json!({ "id": id }))).expect("add"))
            .collect();
        g.add_edge(h[0], "knows", h[1], Properties::new());
        g.add_edge(h[1], "knows", h[2], Properties::new());
        g.add_edge(h[2], "knows", h[0], Properties::new());

        let ids: Vec<Identity> = g.vertices().map(|(_, v)| v.id().clone()).collect();
        assert_eq!(ids, [Identity::Int(1), Identity::Int(2), Identity::Int(3)]);
        assert_eq!(g.edges().len(), 3);
        for (handle, vertex) in g.vertices() {
            assert_eq!(vertex.edges().len(), 1);
            let edge = g.edge(vertex.edges()[0]).expect("edge");
            assert_eq!(edge.source(), handle);
        }
    }

    #[test]
    fn edge_endpoints_resolve_by_index_in_this_model() {
        let mut local = GraphModel::default();
        let a = local.add_vertex(props(json!({"id": 1}))).expect("a");
        let mut other = GraphModel::default();
        let first = other.add_vertex(props(json!({"id": 10}))).expect("first");
        let second = other.add_vertex(props(json!({"id": 11}))).expect("second");

        let aliased = local.add_edge(a, "knows", first, Properties::new());
        let target = local.edge(aliased).expect("edge").target();
        assert_eq!(
            local.vertex(target).map(Vertex::id),
            Some(&Identity::Int(1)),
            "index 0 names the local vertex"
        );

        let dangling = local.add_edge(a, "knows", second, Properties::new());
        let target = local.edge(dangling).expect("edge").target();
        assert!(local.vertex(target).is_none());
        assert_eq!(local.edges().len(), 2);
        assert_eq!(local.vertex(a).expect("a").edges().len(), 2);
    }

    #[test]
    fn edges_take_defaults_and_identity_from_properties() {
        let mut g = GraphModel::default();
        let a = g.add_vertex(props(json!({"id": 1}))).expect("a");
        let b = g.add_vertex(props(json!({"id": 2}))).expect("b");
        let e = g.add_edge(a, "created", b, props(json!({"id": 9, "weight": 0.4})));
        let edge = g.edge(e).expect("edge");
        assert_eq!(edge.id(), Some(&Identity::Int(9)));
        assert_eq!(edge.verb(), "created");
        assert_eq!(edge.rest_length(), 100.0);
        assert_eq!(edge.stiffness(), 0.0002);
        assert_eq!(edge.properties().get("weight"), Some(&json!(0.4)));
        assert!(!edge.properties().contains_key("id"));
    }

    #[test]
    fn edge_with_foreign_source_is_still_recorded() {
        let mut other = GraphModel::default();
        let mut foreign = None;
        for id in 1..=5 {
            foreign = Some(other.add_vertex(props(json!({ "id": id }))).expect("add"));
        }
        let foreign = foreign.expect("handle");

        let mut g = GraphModel::default();
        let a = g.add_vertex(props(json!({"id": 1}))).expect("a");
        g.add_edge(foreign, "knows", a, Properties::new());
        assert_eq!(g.edges().len(), 1);
        assert!(g.vertex(a).expect("a").edges().is_empty());
    }

    #[test]
    fn display_name_falls_back_for_falsy_names() {
        let mut g = GraphModel::default();
        let cases = [
            (json!({"id": 1}), "Unknown"),
            (json!({"id": 2, "name": ""}), "Unknown"),
            (json!({"id": 3, "name": null}), "Unknown"),
            (json!({"id": 4, "name": 42}), "42"),
        ];
        for (p, expected) in cases {
            let h = g.add_vertex(props(p)).expect("add");
            assert_eq!(g.vertex(h).expect("v").display_name("Unknown"), expected);
        }
    }

    #[test]
    fn translate_and_bounds_cover_all_vertices() {
        let mut g = GraphModel::default();
        let a = g.add_vertex(props(json!({"id": 1}))).expect("a");
        let b = g.add_vertex(props(json!({"id": 2}))).expect("b");
        g.vertex_mut(a).expect("a").set_position(geom::point(0.0, 0.0));
        g.vertex_mut(b).expect("b").set_position(geom::point(200.0, 100.0));
        g.translate(geom::vector(10.0, -10.0));
        g.restore_outlines();
        let bounds = g.bounds().expect("bounds");
        assert_eq!(bounds.min, geom::point(-40.0, -20.0));
        assert_eq!(bounds.max, geom::point(260.0, 100.0));
    }
}
