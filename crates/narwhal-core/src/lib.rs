#![forbid(unsafe_code)]

//! Mind-map graph model and segment geometry (headless).
//!
//! `narwhal-core` owns the vertex/edge substrate that the layout (`remora`), routing and
//! label fitting (`narwhal-render`) crates traverse every frame. It has no knowledge of the
//! physics world or the drawing surface; those are wired together by the `narwhal` crate.

pub mod error;
pub mod geom;
pub mod model;
mod rng;

pub use error::{Error, Result};
pub use geom::{Bounds, Point, Segment, Size, Vector};
pub use model::{
    Edge, EdgeHandle, GraphModel, Identity, ModelOptions, Properties, Vertex, VertexHandle,
};
