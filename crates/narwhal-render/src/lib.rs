#![forbid(unsafe_code)]

//! Drawing side of a narwhal mind map.
//!
//! - [`edge`]: clips connectors to node outlines, fans out parallel edges, places arrowheads.
//! - [`fit`]: bisects a font size so a caption fills its node.
//! - [`label`]: draws each vertex caption with the fitted size.
//! - [`surface`]: the canvas-like seam everything draws through; [`svg`] implements it.

pub mod edge;
pub mod fit;
pub mod label;
pub mod surface;
pub mod svg;
pub mod text;

pub use edge::{BoundarySearch, EdgePath, EdgeRoute, EdgeRouteOptions, EdgeRouter, FanSlot};
pub use fit::{FitOptions, FittedText, TextFitter, fit_text};
pub use label::{LabelStyle, PlacedLabel, draw_labels};
pub use surface::{DrawOp, DrawingSurface, RecordingSurface};
pub use svg::SvgSurface;
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
