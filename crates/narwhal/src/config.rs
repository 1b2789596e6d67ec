use crate::Result;
use crate::headless::HeadlessOptions;
use narwhal_core::ModelOptions;
use narwhal_render::{EdgeRouteOptions, FitOptions, LabelStyle};
use remora::LayoutForce;
use serde::{Deserialize, Serialize};

/// Every tunable of a mind map. Missing JSON keys keep their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MindMapOptions {
    pub model: ModelOptions,
    pub layout: LayoutForce,
    pub edges: EdgeRouteOptions,
    pub fit: FitOptions,
    pub labels: LabelStyle,
    pub physics: HeadlessOptions,
    pub edge_color: String,
    pub node_stroke: String,
    /// Node outlines are left unfilled when `None`.
    pub node_fill: Option<String>,
    pub background: String,
}

impl Default for MindMapOptions {
    fn default() -> Self {
        Self {
            model: ModelOptions::default(),
            layout: LayoutForce::default(),
            edges: EdgeRouteOptions::default(),
            fit: FitOptions::default(),
            labels: LabelStyle::default(),
            physics: HeadlessOptions::default(),
            edge_color: "#8a8f98".to_string(),
            node_stroke: "#bbbbbb".to_string(),
            node_fill: None,
            background: "#18181d".to_string(),
        }
    }
}

impl MindMapOptions {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
