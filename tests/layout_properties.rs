//! Property-based invariants for the layout dispatcher.
//!
//! Verifies:
//! 1. Inputs are never modified and pinned layouts are repeatable
//! 2. Organic rings: roots at the origin, every other node on a whole ring
//! 3. Timeline x stays inside the clamp window
//! 4. Calendar positions stay on the week grid, at most in the last row
//! 5. Packed timeline rows never overlap
//! 6. The ranked backend places every node inside its margins

use std::collections::HashMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use jirai_layout::config::{LayoutConfig, RowPacking, TimelineConfig};
use jirai_layout::ir::{Edge, LayoutPreference, Node, NodeType, ViewMode};
use jirai_layout::layout::{
    LayeredBackend, NoJitter, RankedBackend, apply_timeline_layout, assign_levels,
};
use jirai_layout::Layouter;
use proptest::prelude::*;

// ── Strategy helpers ──────────────────────────────────────────────────

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 16)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn pinned() -> Layouter {
    Layouter::default()
        .with_now(now())
        .with_jitter(NoJitter)
        .with_backend(RankedBackend)
}

fn arb_start() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("not a date".to_string())),
        (-120i64..400).prop_map(|offset| {
            let base = now().date();
            let date = if offset >= 0 {
                base.checked_add_days(Days::new(offset as u64))
            } else {
                base.checked_sub_days(Days::new(offset.unsigned_abs()))
            };
            date.map(|d| d.format("%Y-%m-%d").to_string())
        }),
    ]
}

fn arb_graph() -> impl Strategy<Value = (Vec<Node>, Vec<Edge>)> {
    (1usize..24).prop_flat_map(|count| {
        let starts = prop::collection::vec(arb_start(), count);
        let edges = prop::collection::vec((0..count + 2, 0..count + 2), 0..count * 2);
        (starts, edges).prop_map(move |(starts, pairs)| {
            let nodes: Vec<Node> = starts
                .into_iter()
                .enumerate()
                .map(|(idx, start)| {
                    let node = Node::new(format!("n{idx}"), NodeType::Task);
                    match start {
                        Some(start) => node.with_start(start),
                        None => node,
                    }
                })
                .collect();
            // Indices past the node list produce dangling endpoints.
            let edges = pairs
                .into_iter()
                .map(|(from, to)| Edge::new(format!("n{from}"), format!("n{to}")))
                .collect();
            (nodes, edges)
        })
    })
}

fn arb_view() -> impl Strategy<Value = (ViewMode, LayoutPreference)> {
    prop_oneof![
        Just((ViewMode::Analysis, LayoutPreference::Organic)),
        Just((ViewMode::Analysis, LayoutPreference::Horizontal)),
        Just((ViewMode::Analysis, LayoutPreference::Vertical)),
        Just((ViewMode::Management, LayoutPreference::Organic)),
        Just((ViewMode::Workflow, LayoutPreference::Organic)),
    ]
}

// ── Properties ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn layout_is_pure_and_repeatable((nodes, edges) in arb_graph(), (mode, preference) in arb_view()) {
        let snapshot = nodes.clone();
        let first = pinned().reapply(&nodes, &edges, mode, preference);
        let second = pinned().reapply(&nodes, &edges, mode, preference);
        prop_assert_eq!(&nodes, &snapshot);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), nodes.len());
        for (before, after) in nodes.iter().zip(&first) {
            prop_assert_eq!(&before.id, &after.id);
            prop_assert!(after.position.x.is_finite() && after.position.y.is_finite());
        }
    }

    #[test]
    fn organic_nodes_sit_on_whole_rings((nodes, edges) in arb_graph()) {
        let out = pinned().reapply(&nodes, &edges, ViewMode::Analysis, LayoutPreference::Organic);
        let levels: HashMap<usize, usize> = assign_levels(&nodes, &edges).into_iter().collect();
        prop_assert_eq!(levels.len(), nodes.len());
        for (idx, node) in out.iter().enumerate() {
            let level = levels[&idx] as f32;
            let radius = node.position.x.hypot(node.position.y);
            prop_assert!((radius - level * 300.0).abs() < 0.05, "{} at {}", node.id, radius);
        }
    }

    #[test]
    fn timeline_x_stays_in_the_clamp_window((nodes, _) in arb_graph()) {
        let config = TimelineConfig::default();
        let out = apply_timeline_layout(nodes, now().date(), &config);
        let min_x = config.origin_x + config.min_days as f32 * config.column_width + config.bar_inset;
        let max_x = config.origin_x + config.max_days as f32 * config.column_width + config.bar_inset;
        for node in &out {
            prop_assert!(node.position.x >= min_x && node.position.x <= max_x);
        }
    }

    #[test]
    fn packed_timeline_rows_never_overlap((nodes, _) in arb_graph()) {
        let config = TimelineConfig {
            row_packing: RowPacking::Packed,
            ..TimelineConfig::default()
        };
        let out = apply_timeline_layout(nodes, now().date(), &config);
        for (i, a) in out.iter().enumerate() {
            for b in &out[i + 1..] {
                if a.position.y == b.position.y {
                    prop_assert!((a.position.x - b.position.x).abs() >= config.bar_width);
                }
            }
        }
    }

    #[test]
    fn calendar_cells_stay_on_the_grid((nodes, edges) in arb_graph()) {
        let config = LayoutConfig::default().calendar;
        let out = pinned().reapply(&nodes, &edges, ViewMode::Workflow, LayoutPreference::Organic);
        for node in &out {
            let col = (node.position.x - config.origin_x - config.cell_inset_x) / config.cell_width;
            prop_assert!((col - col.round()).abs() < 1e-4);
            prop_assert!((0.0..7.0).contains(&col.round()));

            // y = origin + row * cell_height + header + stack * 45 with row <= max_row.
            let offset = node.position.y - config.origin_y - config.cell_header;
            let on_grid = (0..=config.max_row).any(|row| {
                let rest = offset - row as f32 * config.cell_height;
                let steps = rest / config.stack_step;
                rest >= 0.0 && (steps - steps.round()).abs() < 1e-3
            });
            prop_assert!(on_grid, "{} at y {}", node.id, node.position.y);
        }
    }

    #[test]
    fn ranked_backend_places_every_known_node((nodes, edges) in arb_graph()) {
        let layered: Vec<_> = nodes
            .iter()
            .map(|node| jirai_layout::layout::LayeredNode {
                id: node.id.clone(),
                width: 180.0,
                height: 100.0,
            })
            .collect();
        let centers = RankedBackend.compute_centers(
            &layered,
            &edges,
            jirai_layout::ir::Direction::TopDown,
            &LayoutConfig::default().layered,
        );
        prop_assert_eq!(centers.len(), nodes.len());
        for node in &nodes {
            let (x, y) = centers[&node.id];
            prop_assert!(x >= 90.0 && y >= 50.0, "{} at ({}, {})", node.id, x, y);
        }
    }
}
