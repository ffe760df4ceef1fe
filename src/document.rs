use crate::ir::{Edge, LayoutPreference, Node, ViewMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid graph document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized board state: the node and edge lists plus the view they are
/// laid out for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_preference: Option<LayoutPreference>,
}

impl GraphDocument {
    pub fn from_json(input: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode.unwrap_or_default()
    }

    pub fn layout_preference(&self) -> LayoutPreference {
        self.layout_preference.unwrap_or_default()
    }
}
