use super::*;

/// First-fit row allocation over horizontal bar extents.
struct RowPacker {
    row_ends: Vec<f32>,
    gap: f32,
}

impl RowPacker {
    fn new(gap: f32) -> Self {
        Self {
            row_ends: Vec::new(),
            gap,
        }
    }

    fn place(&mut self, x: f32, width: f32) -> usize {
        let end = x + width + self.gap;
        if let Some(row) = self.row_ends.iter().position(|row_end| *row_end <= x) {
            self.row_ends[row] = end;
            return row;
        }
        self.row_ends.push(end);
        self.row_ends.len() - 1
    }
}

/// Gantt-style layout: x follows the start date relative to `today`, rows
/// follow start order.
///
/// Nodes are ordered by start timestamp (undated or unparseable starts sort
/// as the epoch, ties keep input order). Each node is offset by its whole-day
/// distance from `today`, or by its sorted index when undated, clamped to
/// `[min_days, max_days]`. The returned vector keeps the input order.
pub fn apply_timeline_layout(
    mut nodes: Vec<Node>,
    today: NaiveDate,
    config: &TimelineConfig,
) -> Vec<Node> {
    let starts: Vec<Option<NaiveDateTime>> = nodes
        .iter()
        .map(|node| node.workflow_start().and_then(parse_workflow_date))
        .collect();

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    order.sort_by_key(|&idx| {
        starts[idx]
            .map(|start| start.and_utc().timestamp_millis())
            .unwrap_or(0)
    });

    let mut packer = RowPacker::new(config.packing_gap);
    for (rank, &idx) in order.iter().enumerate() {
        let days = match starts[idx] {
            Some(start) => days_between(today, start.date()),
            None => rank as i64,
        };
        let days = days.max(config.min_days).min(config.max_days);
        let x = config.origin_x + days as f32 * config.column_width + config.bar_inset;
        let row = match config.row_packing {
            RowPacking::Waterfall => rank,
            RowPacking::Packed => packer.place(x, config.bar_width),
        };

        let node = &mut nodes[idx];
        node.position = NodePosition::new(x, config.top_margin + row as f32 * config.row_height);
        node.visual.width = Some(config.bar_width);
        node.visual.height = Some(config.bar_height);
        node.visual.shape = Some(NodeShape::RoundedRect);
    }

    nodes
}
