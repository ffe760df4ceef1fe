use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Analysis,
    Management,
    Workflow,
}

impl ViewMode {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "analysis" => Some(Self::Analysis),
            "management" => Some(Self::Management),
            "workflow" => Some(Self::Workflow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LayoutPreference {
    #[default]
    Organic,
    Horizontal,
    Vertical,
}

impl LayoutPreference {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "ORGANIC" => Some(Self::Organic),
            "HORIZONTAL" => Some(Self::Horizontal),
            "VERTICAL" => Some(Self::Vertical),
            _ => None,
        }
    }
}

/// Flow direction of a layered layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopDown,
    LeftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    #[default]
    Topic,
    Task,
    Video,
    Link,
    Person,
    Document,
    Note,
    Project,
    Root,
}

impl NodeType {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "topic" => Some(Self::Topic),
            "task" => Some(Self::Task),
            "video" => Some(Self::Video),
            "link" => Some(Self::Link),
            "person" => Some(Self::Person),
            "document" => Some(Self::Document),
            "note" => Some(Self::Note),
            "project" => Some(Self::Project),
            "root" => Some(Self::Root),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    Todo,
    InProgress,
    Done,
    Blocked,
}

impl NodeStatus {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "todo" => Some(Self::Todo),
            "in-progress" | "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeShape {
    RoundedRect,
    Circle,
    Diamond,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NodePosition {
    pub x: f32,
    pub y: f32,
}

impl NodePosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVisual {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<NodeShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_multiplier: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeWorkflow {
    /// ISO-8601 date or date-time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub visual: NodeVisual,
    #[serde(default)]
    pub position: NodePosition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<NodeWorkflow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_ids: Option<Vec<String>>,
    /// Per-type payloads (`video`, `person`, `task`, `resources`, ...) that
    /// layout carries through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            node_type,
            description: None,
            visual: NodeVisual::default(),
            position: NodePosition::default(),
            workflow: None,
            tags: None,
            status: None,
            progress: None,
            parent_id: None,
            children_ids: None,
            extra: Map::new(),
        }
    }

    pub fn with_start(mut self, start: impl Into<String>) -> Self {
        self.workflow.get_or_insert_with(NodeWorkflow::default).start = Some(start.into());
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.visual.width = Some(width);
        self.visual.height = Some(height);
        self
    }

    pub fn workflow_start(&self) -> Option<&str> {
        self.workflow.as_ref().and_then(|w| w.start.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Prerequisite,
    DependsOn,
    Related,
    Blocks,
    Reference,
    Next,
    #[default]
    Solid,
    Dashed,
    Faded,
}

impl EdgeKind {
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "prerequisite" => Some(Self::Prerequisite),
            "depends_on" => Some(Self::DependsOn),
            "related" => Some(Self::Related),
            "blocks" => Some(Self::Blocks),
            "reference" => Some(Self::Reference),
            "next" => Some(Self::Next),
            "solid" => Some(Self::Solid),
            "dashed" => Some(Self::Dashed),
            "faded" => Some(Self::Faded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

fn default_edge_weight() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default)]
    pub style: EdgeStyle,
    #[serde(default = "default_edge_weight")]
    pub weight: f32,
    #[serde(default = "default_edge_weight")]
    pub opacity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            id: format!("{from}->{to}"),
            from,
            to,
            kind: EdgeKind::Solid,
            style: EdgeStyle::Solid,
            weight: 1.0,
            opacity: 1.0,
            label: None,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("node {0} cannot connect to itself")]
    SelfLoop(String),
    #[error("edge {from} -> {to} already exists")]
    Duplicate { from: String, to: String },
}

/// Checks whether a new directed edge `from -> to` may be added.
pub fn validate_connection(from: &str, to: &str, edges: &[Edge]) -> Result<(), ConnectionError> {
    if from == to {
        return Err(ConnectionError::SelfLoop(from.to_string()));
    }
    if edges.iter().any(|edge| edge.from == from && edge.to == to) {
        return Err(ConnectionError::Duplicate {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(())
}
