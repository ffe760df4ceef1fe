use super::*;

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

/// A node as seen by a layered backend: identity plus its box size.
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredNode {
    pub id: String,
    pub width: f32,
    pub height: f32,
}

/// Hierarchical layout algorithm producing node center points.
pub trait LayeredBackend {
    fn name(&self) -> &'static str;

    /// Returns the center of every node the backend placed. Edges whose
    /// endpoints are not among `nodes` must be ignored.
    fn compute_centers(
        &self,
        nodes: &[LayeredNode],
        edges: &[Edge],
        direction: Direction,
        config: &LayeredConfig,
    ) -> HashMap<String, (f32, f32)>;
}

fn dagre_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::TopDown => "tb",
        Direction::LeftRight => "lr",
    }
}

/// Sugiyama-style layout through `dagre_rust`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreBackend;

impl LayeredBackend for DagreBackend {
    fn name(&self) -> &'static str {
        "dagre"
    }

    fn compute_centers(
        &self,
        nodes: &[LayeredNode],
        edges: &[Edge],
        direction: Direction,
        config: &LayeredConfig,
    ) -> HashMap<String, (f32, f32)> {
        let mut centers = HashMap::new();
        if nodes.is_empty() {
            return centers;
        }

        let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
            DagreGraph::new(Some(GraphOption {
                directed: Some(true),
                multigraph: Some(false),
                compound: Some(false),
            }));

        let mut graph_config = DagreConfig::default();
        graph_config.rankdir = Some(dagre_rankdir(direction).to_string());
        graph_config.nodesep = Some(config.node_spacing);
        graph_config.ranksep = Some(config.rank_spacing);
        graph_config.marginx = Some(config.margin_x);
        graph_config.marginy = Some(config.margin_y);
        dagre_graph.set_graph(graph_config);

        let mut node_set: HashSet<&str> = HashSet::with_capacity(nodes.len());
        for layered in nodes {
            if !node_set.insert(layered.id.as_str()) {
                continue;
            }
            let mut node = DagreNode::default();
            node.width = layered.width;
            node.height = layered.height;
            dagre_graph.set_node(layered.id.clone(), Some(node));
        }

        let mut edge_set: HashSet<(&str, &str)> = HashSet::new();
        for edge in edges {
            // Self-loops carry no rank constraint.
            if edge.from == edge.to {
                continue;
            }
            if !node_set.contains(edge.from.as_str()) || !node_set.contains(edge.to.as_str()) {
                continue;
            }
            if !edge_set.insert((edge.from.as_str(), edge.to.as_str())) {
                continue;
            }
            let edge_label = DagreEdge::default();
            let _ = dagre_graph.set_edge(&edge.from, &edge.to, Some(edge_label), None);
        }

        dagre_layout::run_layout(&mut dagre_graph);

        for layered in nodes {
            let Some(dagre_node) = dagre_graph.node(&layered.id) else {
                continue;
            };
            if dagre_node.x.is_finite() && dagre_node.y.is_finite() {
                centers.insert(layered.id.clone(), (dagre_node.x, dagre_node.y));
            }
        }
        centers
    }
}

/// Box size handed to the layered backend; unset or non-positive sizes
/// fall back to the configured defaults.
pub fn layered_size(node: &Node, config: &LayeredConfig) -> (f32, f32) {
    let width = node
        .visual
        .width
        .filter(|w| *w > 0.0)
        .unwrap_or(config.default_width);
    let height = node
        .visual
        .height
        .filter(|h| *h > 0.0)
        .unwrap_or(config.default_height);
    (width, height)
}

/// Hierarchical layout: positions come from `backend` centers converted to
/// top-left coordinates. Sizes, shapes and order are left untouched.
pub fn apply_layered_layout(
    mut nodes: Vec<Node>,
    edges: &[Edge],
    direction: Direction,
    config: &LayeredConfig,
    backend: &dyn LayeredBackend,
) -> Vec<Node> {
    if nodes.is_empty() {
        return nodes;
    }

    let layered: Vec<LayeredNode> = nodes
        .iter()
        .map(|node| {
            let (width, height) = layered_size(node, config);
            LayeredNode {
                id: node.id.clone(),
                width,
                height,
            }
        })
        .collect();

    let mut centers = backend.compute_centers(&layered, edges, direction, config);
    if centers.is_empty() {
        debug!(
            backend = backend.name(),
            nodes = layered.len(),
            "layered backend produced no positions, using ranked fallback"
        );
        centers = RankedBackend.compute_centers(&layered, edges, direction, config);
    }

    for (node, sized) in nodes.iter_mut().zip(&layered) {
        if let Some(&(cx, cy)) = centers.get(&node.id) {
            node.position = NodePosition::new(cx - sized.width / 2.0, cy - sized.height / 2.0);
        }
    }

    nodes
}
