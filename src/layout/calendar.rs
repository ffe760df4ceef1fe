use super::*;

/// Week-grid layout keyed off `workflow.start`.
pub fn apply_calendar_layout(
    mut nodes: Vec<Node>,
    now: NaiveDateTime,
    config: &CalendarConfig,
) -> Vec<Node> {
    let week = config.days_per_week.max(1);
    let window = config.undated_window.max(1);
    let mut cell_counts: HashMap<(i64, i64), usize> = HashMap::new();

    for (i, node) in nodes.iter_mut().enumerate() {
        let index = i as i64;
        let date = node
            .workflow_start()
            .and_then(parse_workflow_date)
            .unwrap_or_else(|| add_days(now, index.rem_euclid(window) as u64));

        let diff_days = ceil_days(now, date).max(0);
        let mut row = diff_days / week;
        let mut col = diff_days % week;
        if row > config.max_row {
            row = config.max_row;
            col = index % week;
        }

        let count = cell_counts.entry((row, col)).or_insert(0);
        let stack_index = *count;
        *count += 1;

        node.position = NodePosition::new(
            config.origin_x + col as f32 * config.cell_width + config.cell_inset_x,
            config.origin_y
                + row as f32 * config.cell_height
                + config.cell_header
                + stack_index as f32 * config.stack_step,
        );
        node.visual.width = Some(config.item_width);
        node.visual.height = Some(config.item_height);
        node.visual.shape = Some(NodeShape::RoundedRect);
    }

    nodes
}
