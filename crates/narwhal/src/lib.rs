#![forbid(unsafe_code)]

//! `narwhal` renders a graph as a force-settled mind map.
//!
//! Vertices are rectangular bodies in a physics world, edges are soft springs. Every tick the
//! [`MindMap`] driver restores node outlines, recenters the cluster, lets the world step, then
//! draws captions and edges and pushes overlapping nodes apart.
//!
//! The physics world and the drawing surface are seams: [`physics::PhysicsWorld`] and
//! [`narwhal_render::DrawingSurface`]. [`headless::HeadlessWorld`] and
//! [`narwhal_render::SvgSurface`] are the bundled implementations.

pub mod config;
pub mod document;
pub mod headless;
pub mod mindmap;
pub mod observer;
pub mod physics;

pub use narwhal_core::*;

pub use config::MindMapOptions;
pub use document::{EdgeRecord, GraphDocument};
pub use headless::{HeadlessOptions, HeadlessWorld};
pub use mindmap::{EdgeSnapshot, LayoutSnapshot, MindMap, VertexSnapshot};
pub use observer::{FrameObserver, FrameStats, NoopObserver, TracingObserver};
pub use physics::{BodyId, ConstraintId, PhysicsWorld};

pub mod render {
    pub use narwhal_render::*;
}

pub mod layout {
    pub use remora::*;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] narwhal_core::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("edge refers to unknown vertex `{id}`")]
    UnknownVertex { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
