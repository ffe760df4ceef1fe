use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganicConfig {
    /// Radius added per BFS level.
    pub ring_spacing: f32,
    /// Rotation in radians applied per level so rings do not line up.
    pub ring_rotation: f32,
    /// Maximum jitter offset in pixels on each axis.
    pub jitter: f32,
    pub root_size_multiplier: f32,
    pub node_size_multiplier: f32,
}

impl Default for OrganicConfig {
    fn default() -> Self {
        Self {
            ring_spacing: 300.0,
            ring_rotation: 0.5,
            jitter: 25.0,
            root_size_multiplier: 1.5,
            node_size_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowPacking {
    /// One row per node in start-date order.
    #[default]
    Waterfall,
    /// First-fit interval packing on the projected bar extents.
    Packed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub origin_x: f32,
    pub bar_inset: f32,
    pub top_margin: f32,
    pub column_width: f32,
    pub row_height: f32,
    pub min_days: i64,
    pub max_days: i64,
    pub bar_width: f32,
    pub bar_height: f32,
    pub row_packing: RowPacking,
    /// Horizontal gap required between bars sharing a packed row.
    pub packing_gap: f32,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            origin_x: 120.0,
            bar_inset: 20.0,
            top_margin: 150.0,
            column_width: 300.0,
            row_height: 120.0,
            min_days: -5,
            max_days: 60,
            bar_width: 280.0,
            bar_height: 90.0,
            row_packing: RowPacking::Waterfall,
            packing_gap: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_width: f32,
    pub cell_height: f32,
    pub cell_inset_x: f32,
    pub cell_header: f32,
    pub stack_step: f32,
    pub days_per_week: i64,
    /// Highest row index; later dates wrap into this row by node index.
    pub max_row: i64,
    /// Undated nodes cycle through this many days starting today.
    pub undated_window: i64,
    pub item_width: f32,
    pub item_height: f32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 60.0,
            cell_width: 250.0,
            cell_height: 200.0,
            cell_inset_x: 10.0,
            cell_header: 40.0,
            stack_step: 45.0,
            days_per_week: 7,
            max_row: 5,
            undated_window: 14,
            item_width: 230.0,
            item_height: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayeredBackendKind {
    #[default]
    Dagre,
    Ranked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayeredConfig {
    pub backend: LayeredBackendKind,
    pub default_width: f32,
    pub default_height: f32,
    pub node_spacing: f32,
    pub rank_spacing: f32,
    pub margin_x: f32,
    pub margin_y: f32,
    /// Barycenter ordering passes used by the ranked backend.
    pub order_passes: usize,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            backend: LayeredBackendKind::Dagre,
            default_width: 180.0,
            default_height: 100.0,
            node_spacing: 50.0,
            rank_spacing: 50.0,
            margin_x: 0.0,
            margin_y: 0.0,
            order_passes: 4,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub organic: OrganicConfig,
    pub timeline: TimelineConfig,
    pub calendar: CalendarConfig,
    pub layered: LayeredConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    pub person_color: String,
    pub video_color: String,
    pub task_color: String,
    /// Days between a generated management task's start and end.
    pub default_task_days: i64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            person_color: "#8b5cf6".to_string(), // violet-500
            video_color: "#ef4444".to_string(),  // red-500
            task_color: "#10b981".to_string(),   // emerald-500
            default_task_days: 2,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrganicConfigFile {
    ring_spacing: Option<f32>,
    ring_rotation: Option<f32>,
    jitter: Option<f32>,
    root_size_multiplier: Option<f32>,
    node_size_multiplier: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelineConfigFile {
    origin_x: Option<f32>,
    bar_inset: Option<f32>,
    top_margin: Option<f32>,
    column_width: Option<f32>,
    row_height: Option<f32>,
    min_days: Option<i64>,
    max_days: Option<i64>,
    bar_width: Option<f32>,
    bar_height: Option<f32>,
    row_packing: Option<RowPacking>,
    packing_gap: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarConfigFile {
    origin_x: Option<f32>,
    origin_y: Option<f32>,
    cell_width: Option<f32>,
    cell_height: Option<f32>,
    cell_inset_x: Option<f32>,
    cell_header: Option<f32>,
    stack_step: Option<f32>,
    max_row: Option<i64>,
    undated_window: Option<i64>,
    item_width: Option<f32>,
    item_height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayeredConfigFile {
    backend: Option<LayeredBackendKind>,
    default_width: Option<f32>,
    default_height: Option<f32>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    margin_x: Option<f32>,
    margin_y: Option<f32>,
    order_passes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IngestConfigFile {
    person_color: Option<String>,
    video_color: Option<String>,
    task_color: Option<String>,
    default_task_days: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    organic: Option<OrganicConfigFile>,
    timeline: Option<TimelineConfigFile>,
    calendar: Option<CalendarConfigFile>,
    layered: Option<LayeredConfigFile>,
    ingest: Option<IngestConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document and applies it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents)
            .map_err(|_| anyhow::anyhow!("invalid layout config: {json_err}"))?,
    };
    let mut config = Config::default();

    if let Some(organic) = parsed.organic {
        let target = &mut config.layout.organic;
        if let Some(v) = organic.ring_spacing {
            target.ring_spacing = v;
        }
        if let Some(v) = organic.ring_rotation {
            target.ring_rotation = v;
        }
        if let Some(v) = organic.jitter {
            target.jitter = v.max(0.0);
        }
        if let Some(v) = organic.root_size_multiplier {
            target.root_size_multiplier = v;
        }
        if let Some(v) = organic.node_size_multiplier {
            target.node_size_multiplier = v;
        }
    }

    if let Some(timeline) = parsed.timeline {
        let target = &mut config.layout.timeline;
        if let Some(v) = timeline.origin_x {
            target.origin_x = v;
        }
        if let Some(v) = timeline.bar_inset {
            target.bar_inset = v;
        }
        if let Some(v) = timeline.top_margin {
            target.top_margin = v;
        }
        if let Some(v) = timeline.column_width {
            target.column_width = v;
        }
        if let Some(v) = timeline.row_height {
            target.row_height = v;
        }
        if let Some(v) = timeline.min_days {
            target.min_days = v;
        }
        if let Some(v) = timeline.max_days {
            target.max_days = v;
        }
        if let Some(v) = timeline.bar_width {
            target.bar_width = v;
        }
        if let Some(v) = timeline.bar_height {
            target.bar_height = v;
        }
        if let Some(v) = timeline.row_packing {
            target.row_packing = v;
        }
        if let Some(v) = timeline.packing_gap {
            target.packing_gap = v;
        }
        if target.max_days < target.min_days {
            anyhow::bail!(
                "timeline.maxDays ({}) is smaller than timeline.minDays ({})",
                target.max_days,
                target.min_days
            );
        }
    }

    if let Some(calendar) = parsed.calendar {
        let target = &mut config.layout.calendar;
        if let Some(v) = calendar.origin_x {
            target.origin_x = v;
        }
        if let Some(v) = calendar.origin_y {
            target.origin_y = v;
        }
        if let Some(v) = calendar.cell_width {
            target.cell_width = v;
        }
        if let Some(v) = calendar.cell_height {
            target.cell_height = v;
        }
        if let Some(v) = calendar.cell_inset_x {
            target.cell_inset_x = v;
        }
        if let Some(v) = calendar.cell_header {
            target.cell_header = v;
        }
        if let Some(v) = calendar.stack_step {
            target.stack_step = v;
        }
        if let Some(v) = calendar.max_row {
            target.max_row = v.max(0);
        }
        if let Some(v) = calendar.undated_window {
            target.undated_window = v.max(1);
        }
        if let Some(v) = calendar.item_width {
            target.item_width = v;
        }
        if let Some(v) = calendar.item_height {
            target.item_height = v;
        }
    }

    if let Some(layered) = parsed.layered {
        let target = &mut config.layout.layered;
        if let Some(v) = layered.backend {
            target.backend = v;
        }
        if let Some(v) = layered.default_width {
            target.default_width = v;
        }
        if let Some(v) = layered.default_height {
            target.default_height = v;
        }
        if let Some(v) = layered.node_spacing {
            target.node_spacing = v;
        }
        if let Some(v) = layered.rank_spacing {
            target.rank_spacing = v;
        }
        if let Some(v) = layered.margin_x {
            target.margin_x = v;
        }
        if let Some(v) = layered.margin_y {
            target.margin_y = v;
        }
        if let Some(v) = layered.order_passes {
            target.order_passes = v;
        }
    }

    if let Some(ingest) = parsed.ingest {
        let target = &mut config.ingest;
        if let Some(v) = ingest.person_color {
            target.person_color = v;
        }
        if let Some(v) = ingest.video_color {
            target.video_color = v;
        }
        if let Some(v) = ingest.task_color {
            target.task_color = v;
        }
        if let Some(v) = ingest.default_task_days {
            target.default_task_days = v;
        }
    }

    Ok(config)
}
