//! JSON graph documents.
//!
//! ```json
//! {
//!   "vertices": [{ "id": 1, "label": "person", "name": "marko" }],
//!   "edges": [{ "source": 1, "verb": "knows", "target": 2, "properties": { "id": 7 } }]
//! }
//! ```

use crate::Result;
use narwhal_core::Properties;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub vertices: Vec<Properties>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

/// An edge between two vertex ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: Value,
    pub verb: String,
    pub target: Value,
    #[serde(default)]
    pub properties: Properties,
}

impl GraphDocument {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
