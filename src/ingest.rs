use crate::config::IngestConfig;
use crate::ir::{
    Edge, EdgeKind, EdgeStyle, LayoutPreference, Node, NodeShape, NodeStatus, NodeType,
    NodeVisual, NodeWorkflow, ViewMode,
};
use crate::layout::{Layouter, add_days, format_iso, parse_workflow_date};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json\s*|\s*```").unwrap());

/// Per-type payloads carried over from the model output verbatim.
const PAYLOAD_KEYS: [&str; 3] = ["video", "person", "task"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("empty response from the model")]
    Empty,
    #[error("failed to parse model response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    #[serde(default)]
    nodes: Vec<RawNode>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNode {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "type", default)]
    node_type: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    workflow: Option<NodeWorkflow>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEdge {
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

/// Nodes and edges produced from one model response, already laid out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeneratedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Removes Markdown code fences the model sometimes wraps its JSON in.
pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_string()
}

/// Converts a model response into board records with the default ingest
/// settings. See [`ingest_ai_response_with`].
pub fn ingest_ai_response(
    text: &str,
    mode: ViewMode,
    layouter: &mut Layouter,
) -> Result<GeneratedGraph, IngestError> {
    ingest_ai_response_with(text, mode, layouter, &IngestConfig::default())
}

/// Converts a model response into board records.
///
/// Missing ids become UUIDs and visuals get their per-type defaults. In the
/// management and workflow views every node without a start date is
/// scheduled `index` days from now, and management tasks without an end
/// finish `default_task_days` after their start. The result is positioned
/// for `mode` with the organic preference.
pub fn ingest_ai_response_with(
    text: &str,
    mode: ViewMode,
    layouter: &mut Layouter,
    config: &IngestConfig,
) -> Result<GeneratedGraph, IngestError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(IngestError::Empty);
    }
    let raw: RawResponse = serde_json::from_str(&cleaned)?;
    let now = layouter.now();
    let stamp = format_iso(now);

    let mut nodes: Vec<Node> = raw
        .nodes
        .into_iter()
        .map(|raw_node| build_node(raw_node, config, &stamp))
        .collect();

    if matches!(mode, ViewMode::Management | ViewMode::Workflow) {
        for (idx, node) in nodes.iter_mut().enumerate() {
            let workflow = node.workflow.get_or_insert_with(NodeWorkflow::default);
            if workflow.start.as_deref().is_none_or(str::is_empty) {
                workflow.start = Some(format_iso(add_days(now, idx as u64)));
            }
            if mode == ViewMode::Management && workflow.end.as_deref().is_none_or(str::is_empty) {
                workflow.end = workflow
                    .start
                    .as_deref()
                    .and_then(parse_workflow_date)
                    .map(|start| format_iso(add_days(start, config.default_task_days.max(0) as u64)));
            }
        }
    }

    let edges: Vec<Edge> = raw
        .edges
        .into_iter()
        .filter_map(build_edge)
        .collect();

    debug!(
        mode = ?mode,
        nodes = nodes.len(),
        edges = edges.len(),
        "ingested model response"
    );

    let nodes = layouter.reapply(&nodes, &edges, mode, LayoutPreference::Organic);
    Ok(GeneratedGraph { nodes, edges })
}

fn build_node(raw: RawNode, config: &IngestConfig, stamp: &str) -> Node {
    let node_type = raw
        .node_type
        .as_deref()
        .and_then(NodeType::from_token)
        .unwrap_or_default();
    let color = match node_type {
        NodeType::Person => Some(config.person_color.clone()),
        NodeType::Video => Some(config.video_color.clone()),
        NodeType::Task => Some(config.task_color.clone()),
        _ => None,
    };

    let mut extra = Map::new();
    let mut rest = raw.rest;
    for key in PAYLOAD_KEYS {
        if let Some(payload) = rest.remove(key).filter(|value| !value.is_null()) {
            extra.insert(key.to_string(), payload);
        }
    }
    extra.insert("createdAt".to_string(), Value::from(stamp));
    extra.insert("updatedAt".to_string(), Value::from(stamp));
    extra.insert("createdBy".to_string(), Value::from("ai"));

    let id = raw
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut node = Node::new(id, node_type);
    node.title = raw.title.unwrap_or_default();
    node.description = Some(raw.description.unwrap_or_default());
    node.tags = Some(Vec::new());
    node.status = Some(
        raw.status
            .as_deref()
            .and_then(NodeStatus::from_token)
            .unwrap_or(NodeStatus::Todo),
    );
    node.progress = Some(0.0);
    node.children_ids = Some(Vec::new());
    node.visual = NodeVisual {
        color,
        shape: Some(NodeShape::RoundedRect),
        size_multiplier: Some(1.0),
        collapsed: Some(false),
        ..NodeVisual::default()
    };
    node.workflow = Some(raw.workflow.unwrap_or_default());
    node.extra = extra;
    node
}

/// Edges missing either endpoint are dropped.
fn build_edge(raw: RawEdge) -> Option<Edge> {
    let from = raw.from.filter(|id| !id.is_empty())?;
    let to = raw.to.filter(|id| !id.is_empty())?;
    let kind_token = raw.kind.as_deref().unwrap_or("solid");
    let mut edge = Edge::new(from, to);
    edge.id = Uuid::new_v4().to_string();
    edge.kind = EdgeKind::from_token(kind_token).unwrap_or_default();
    edge.style = if edge.kind == EdgeKind::Related {
        EdgeStyle::Dashed
    } else {
        EdgeStyle::Solid
    };
    edge.label = raw.label;
    Some(edge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NoJitter;
    use chrono::NaiveDate;

    fn layouter() -> Layouter {
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Layouter::default().with_now(now).with_jitter(NoJitter)
    }

    const RESPONSE: &str = r#"```json
{
  "nodes": [
    {"id": "hub", "type": "topic", "title": "Launch"},
    {"type": "person", "title": "Ada", "person": {"role": "lead"}},
    {"type": "task", "title": "Ship", "status": "in-progress", "workflow": {"start": "2026-10-19"}},
    {"type": "video", "title": "Demo"}
  ],
  "edges": [
    {"from": "hub", "to": "x", "kind": "related"},
    {"from": "hub", "to": "y"},
    {"from": "", "to": "y"}
  ]
}
```"#;

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn fills_node_defaults() {
        let graph = ingest_ai_response(RESPONSE, ViewMode::Analysis, &mut layouter()).unwrap();
        assert_eq!(graph.nodes.len(), 4);

        let hub = &graph.nodes[0];
        assert_eq!(hub.id, "hub");
        assert_eq!(hub.status, Some(NodeStatus::Todo));
        assert_eq!(hub.tags.as_deref(), Some(&[][..]));
        assert_eq!(hub.extra["createdBy"], "ai");
        assert_eq!(hub.visual.color, None);

        let person = &graph.nodes[1];
        assert!(Uuid::parse_str(&person.id).is_ok());
        assert_eq!(person.visual.color.as_deref(), Some("#8b5cf6"));
        assert_eq!(person.extra["person"]["role"], "lead");

        assert_eq!(graph.nodes[2].status, Some(NodeStatus::InProgress));
        assert_eq!(graph.nodes[2].visual.color.as_deref(), Some("#10b981"));
        assert_eq!(graph.nodes[3].visual.color.as_deref(), Some("#ef4444"));
        assert_eq!(graph.nodes[3].visual.size_multiplier, Some(1.0));
    }

    #[test]
    fn edges_get_fresh_ids_and_styles() {
        let graph = ingest_ai_response(RESPONSE, ViewMode::Analysis, &mut layouter()).unwrap();
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].kind, EdgeKind::Related);
        assert_eq!(graph.edges[0].style, EdgeStyle::Dashed);
        assert_eq!(graph.edges[1].kind, EdgeKind::Solid);
        assert_eq!(graph.edges[1].style, EdgeStyle::Solid);
        assert_ne!(graph.edges[0].id, graph.edges[1].id);
        assert!(Uuid::parse_str(&graph.edges[0].id).is_ok());
    }

    #[test]
    fn management_fills_missing_dates() {
        let graph = ingest_ai_response(RESPONSE, ViewMode::Management, &mut layouter()).unwrap();
        let hub = graph.nodes[0].workflow.as_ref().unwrap();
        assert_eq!(hub.start.as_deref(), Some("2026-10-16T00:00:00.000Z"));
        assert_eq!(hub.end.as_deref(), Some("2026-10-18T00:00:00.000Z"));

        let person = graph.nodes[1].workflow.as_ref().unwrap();
        assert_eq!(person.start.as_deref(), Some("2026-10-17T00:00:00.000Z"));

        // Explicit starts are kept; the end still defaults to two days later.
        let task = graph.nodes[2].workflow.as_ref().unwrap();
        assert_eq!(task.start.as_deref(), Some("2026-10-19"));
        assert_eq!(task.end.as_deref(), Some("2026-10-21T00:00:00.000Z"));
        assert_eq!(graph.nodes[2].position.x, 1040.0);
    }

    #[test]
    fn workflow_fills_starts_only() {
        let graph = ingest_ai_response(RESPONSE, ViewMode::Workflow, &mut layouter()).unwrap();
        let demo = graph.nodes[3].workflow.as_ref().unwrap();
        assert_eq!(demo.start.as_deref(), Some("2026-10-19T00:00:00.000Z"));
        assert_eq!(demo.end, None);
    }

    #[test]
    fn analysis_leaves_dates_alone_and_lays_out_organically() {
        let graph = ingest_ai_response(RESPONSE, ViewMode::Analysis, &mut layouter()).unwrap();
        assert_eq!(graph.nodes[0].workflow_start(), None);
        // Every node is a root (edges point at unknown ids), so all sit at the origin.
        assert!(
            graph
                .nodes
                .iter()
                .all(|node| node.visual.size_multiplier == Some(1.5))
        );
    }

    #[test]
    fn rejects_empty_and_malformed_responses() {
        assert!(matches!(
            ingest_ai_response("```json\n```", ViewMode::Analysis, &mut layouter()),
            Err(IngestError::Empty)
        ));
        assert!(matches!(
            ingest_ai_response("not json", ViewMode::Analysis, &mut layouter()),
            Err(IngestError::Parse(_))
        ));
    }

    #[test]
    fn null_titles_and_endpoints_are_tolerated() {
        let text = r#"{
  "nodes": [{"id": "a", "type": "task", "title": null}, {"id": "b", "title": "B"}],
  "edges": [{"from": "a", "to": "b"}, {"from": null, "to": "b"}, {"from": "a", "to": null}]
}"#;
        let graph = ingest_ai_response(text, ViewMode::Analysis, &mut layouter()).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].title, "");
        assert_eq!(graph.nodes[1].title, "B");
        assert_eq!(graph.edges.len(), 1);
        assert_eq!((graph.edges[0].from.as_str(), graph.edges[0].to.as_str()), ("a", "b"));
    }

    #[test]
    fn custom_colors_apply() {
        let config = IngestConfig {
            task_color: "#000000".to_string(),
            ..IngestConfig::default()
        };
        let graph = ingest_ai_response_with(
            r#"{"nodes":[{"type":"task","title":"t"}]}"#,
            ViewMode::Analysis,
            &mut layouter(),
            &config,
        )
        .unwrap();
        assert_eq!(graph.nodes[0].visual.color.as_deref(), Some("#000000"));
    }
}
