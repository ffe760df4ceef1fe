use crate::config::LayeredConfig;
use crate::ir::{LayoutPreference, Node, ViewMode};
use crate::layout::{LayoutBounds, compute_bounds, layered_size};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub view_mode: String,
    pub preference: String,
    pub width: f32,
    pub height: f32,
    pub bounds: LayoutBounds,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub kind: String,
    pub shape: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub size_multiplier: Option<f32>,
}

impl LayoutDump {
    pub fn from_nodes(
        nodes: &[Node],
        mode: ViewMode,
        preference: LayoutPreference,
        config: &LayeredConfig,
    ) -> Self {
        let bounds = compute_bounds(nodes, config);
        let nodes = nodes
            .iter()
            .map(|node| {
                let (width, height) = layered_size(node, config);
                NodeDump {
                    id: node.id.clone(),
                    kind: format!("{:?}", node.node_type),
                    shape: node.visual.shape.map(|shape| format!("{shape:?}")),
                    x: node.position.x,
                    y: node.position.y,
                    width,
                    height,
                    size_multiplier: node.visual.size_multiplier,
                }
            })
            .collect();

        LayoutDump {
            view_mode: format!("{mode:?}"),
            preference: format!("{preference:?}"),
            width: bounds.width(),
            height: bounds.height(),
            bounds,
            nodes,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    nodes: &[Node],
    mode: ViewMode,
    preference: LayoutPreference,
    config: &LayeredConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_nodes(nodes, mode, preference, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
