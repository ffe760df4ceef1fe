use serde::Serialize;

use crate::config::LayeredConfig;
use crate::ir::Node;

use super::layered_size;

/// Axis-aligned box enclosing every positioned node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl LayoutBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn contains(&self, node: &Node, config: &LayeredConfig) -> bool {
        let (width, height) = layered_size(node, config);
        node.position.x >= self.min_x
            && node.position.y >= self.min_y
            && node.position.x + width <= self.max_x
            && node.position.y + height <= self.max_y
    }
}

impl Default for LayoutBounds {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1.0,
            max_y: 1.0,
        }
    }
}

/// Bounding box of `nodes`, sizing each node the way the layered layout
/// does. An empty slice yields a 1x1 box at the origin.
pub fn compute_bounds(nodes: &[Node], config: &LayeredConfig) -> LayoutBounds {
    let mut min_x = f32::MAX;
    let mut min_y = f32::MAX;
    let mut max_x = f32::MIN;
    let mut max_y = f32::MIN;
    for node in nodes {
        let (width, height) = layered_size(node, config);
        min_x = min_x.min(node.position.x);
        min_y = min_y.min(node.position.y);
        max_x = max_x.max(node.position.x + width);
        max_y = max_y.max(node.position.y + height);
    }
    if min_x > max_x || min_y > max_y {
        return LayoutBounds::default();
    }
    LayoutBounds {
        min_x,
        min_y,
        max_x,
        max_y,
    }
}
