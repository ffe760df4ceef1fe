mod adjacency;
mod calendar;
mod dates;
mod jitter;
mod layered;
mod organic;
mod ranking;
mod timeline;
pub(crate) mod types;
pub use adjacency::*;
pub use calendar::*;
pub use dates::*;
pub use jitter::*;
pub use layered::*;
pub use organic::*;
pub use ranking::*;
pub use timeline::*;
pub use types::*;

use crate::config::{
    CalendarConfig, LayeredBackendKind, LayeredConfig, LayoutConfig, OrganicConfig, RowPacking,
    TimelineConfig,
};
use crate::ir::{
    Direction, Edge, LayoutPreference, Node, NodePosition, NodeShape, NodeType, ViewMode,
};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Configured layout dispatcher.
///
/// Holds the layout constants plus the two sources of non-determinism (the
/// clock and the organic jitter), so callers can pin both for reproducible
/// output.
pub struct Layouter {
    config: LayoutConfig,
    now: Option<NaiveDateTime>,
    jitter: Box<dyn JitterSource>,
    backend: Option<Box<dyn LayeredBackend>>,
}

impl Default for Layouter {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Layouter {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            now: None,
            jitter: Box::new(RandomJitter::new()),
            backend: None,
        }
    }

    /// Pins the clock used by the timeline and calendar layouts.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Box::new(jitter);
        self
    }

    /// Overrides the layered backend selected by `config.layered.backend`.
    pub fn with_backend(mut self, backend: impl LayeredBackend + 'static) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Current wall-clock time in UTC unless pinned with [`Layouter::with_now`].
    pub fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Utc::now().naive_utc())
    }

    /// Returns freshly positioned copies of `nodes`; the inputs are never
    /// modified.
    pub fn reapply(
        &mut self,
        nodes: &[Node],
        edges: &[Edge],
        mode: ViewMode,
        preference: LayoutPreference,
    ) -> Vec<Node> {
        let owned = nodes.to_vec();
        debug!(
            mode = ?mode,
            preference = ?preference,
            nodes = nodes.len(),
            edges = edges.len(),
            "reapplying layout"
        );
        match (mode, preference) {
            (ViewMode::Management, _) => {
                apply_timeline_layout(owned, self.now().date(), &self.config.timeline)
            }
            (ViewMode::Workflow, _) => {
                apply_calendar_layout(owned, self.now(), &self.config.calendar)
            }
            (ViewMode::Analysis, LayoutPreference::Horizontal) => {
                self.layered(owned, edges, Direction::LeftRight)
            }
            (ViewMode::Analysis, LayoutPreference::Vertical) => {
                self.layered(owned, edges, Direction::TopDown)
            }
            (ViewMode::Analysis, LayoutPreference::Organic) => {
                apply_organic_layout(owned, edges, &self.config.organic, &mut *self.jitter)
            }
        }
    }

    fn layered(&self, nodes: Vec<Node>, edges: &[Edge], direction: Direction) -> Vec<Node> {
        let config = &self.config.layered;
        if let Some(backend) = &self.backend {
            return apply_layered_layout(nodes, edges, direction, config, backend.as_ref());
        }
        match config.backend {
            LayeredBackendKind::Dagre => {
                apply_layered_layout(nodes, edges, direction, config, &DagreBackend)
            }
            LayeredBackendKind::Ranked => {
                apply_layered_layout(nodes, edges, direction, config, &RankedBackend)
            }
        }
    }
}

/// Lays out `nodes` for the given view with default settings, the system
/// clock and random jitter.
pub fn reapply_layout(
    nodes: &[Node],
    edges: &[Edge],
    mode: ViewMode,
    preference: LayoutPreference,
) -> Vec<Node> {
    Layouter::default().reapply(nodes, edges, mode, preference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn pinned() -> Layouter {
        Layouter::default().with_now(fixed_now()).with_jitter(NoJitter)
    }

    fn star() -> (Vec<Node>, Vec<Edge>) {
        let nodes = vec![
            Node::new("root", NodeType::Topic),
            Node::new("a", NodeType::Topic),
            Node::new("b", NodeType::Topic),
        ];
        let edges = vec![Edge::new("root", "a"), Edge::new("root", "b")];
        (nodes, edges)
    }

    #[test]
    fn inputs_are_left_untouched_and_output_is_repeatable() {
        let (nodes, edges) = star();
        let before = nodes.clone();
        let modes = [
            (ViewMode::Analysis, LayoutPreference::Organic),
            (ViewMode::Analysis, LayoutPreference::Horizontal),
            (ViewMode::Analysis, LayoutPreference::Vertical),
            (ViewMode::Management, LayoutPreference::Organic),
            (ViewMode::Workflow, LayoutPreference::Vertical),
        ];
        for (mode, preference) in modes {
            let first = pinned()
                .with_backend(RankedBackend)
                .reapply(&nodes, &edges, mode, preference);
            let second = pinned()
                .with_backend(RankedBackend)
                .reapply(&nodes, &edges, mode, preference);
            assert_eq!(first, second, "{mode:?}/{preference:?}");
            assert_eq!(first.len(), nodes.len());
        }
        assert_eq!(nodes, before);
    }

    #[test]
    fn organic_star_puts_children_opposite_each_other() {
        let (nodes, edges) = star();
        let out = pinned().reapply(&nodes, &edges, ViewMode::Analysis, LayoutPreference::Organic);
        assert_eq!(out[0].position, NodePosition::new(0.0, 0.0));
        for child in &out[1..] {
            assert!((child.position.x.hypot(child.position.y) - 300.0).abs() < 1e-3);
        }
        let angle_a = out[1].position.y.atan2(out[1].position.x);
        let angle_b = out[2].position.y.atan2(out[2].position.x);
        let separation = (angle_a - angle_b).abs();
        assert!((separation - PI).abs() < 1e-4, "separation {separation}");
    }

    #[test]
    fn management_ignores_preference() {
        let nodes = vec![Node::new("t", NodeType::Task).with_start("2026-10-19")];
        for preference in [LayoutPreference::Organic, LayoutPreference::Vertical] {
            let out = pinned().reapply(&nodes, &[], ViewMode::Management, preference);
            assert_eq!(out[0].position.x, 1040.0);
        }
    }

    #[test]
    fn workflow_uses_the_calendar_grid() {
        let nodes = vec![Node::new("t", NodeType::Task).with_start("2026-10-16")];
        let out = pinned().reapply(&nodes, &[], ViewMode::Workflow, LayoutPreference::Organic);
        assert_eq!(out[0].position, NodePosition::new(10.0, 100.0));
        assert_eq!(out[0].visual.height, Some(40.0));
    }

    #[test]
    fn preference_picks_layered_direction() {
        let nodes = vec![
            Node::new("a", NodeType::Topic),
            Node::new("b", NodeType::Topic),
        ];
        let edges = vec![Edge::new("a", "b")];
        let mut layouter = pinned().with_backend(RankedBackend);

        let lr = layouter.reapply(&nodes, &edges, ViewMode::Analysis, LayoutPreference::Horizontal);
        assert!(lr[1].position.x > lr[0].position.x);
        assert_eq!(lr[1].position.y, lr[0].position.y);

        let tb = layouter.reapply(&nodes, &edges, ViewMode::Analysis, LayoutPreference::Vertical);
        assert!(tb[1].position.y > tb[0].position.y);
        assert_eq!(tb[1].position.x, tb[0].position.x);
    }

    #[test]
    fn configured_backend_is_used_without_override() {
        let mut config = LayoutConfig::default();
        config.layered.backend = LayeredBackendKind::Ranked;
        let nodes = vec![Node::new("a", NodeType::Topic)];
        let out = Layouter::new(config).with_now(fixed_now()).reapply(
            &nodes,
            &[],
            ViewMode::Analysis,
            LayoutPreference::Vertical,
        );
        // The ranked backend puts a lone node's box at the margin.
        assert_eq!(out[0].position, NodePosition::new(0.0, 0.0));
    }

    #[test]
    fn empty_graphs_stay_empty_in_every_mode() {
        for mode in [ViewMode::Analysis, ViewMode::Management, ViewMode::Workflow] {
            assert!(reapply_layout(&[], &[], mode, LayoutPreference::Horizontal).is_empty());
            assert!(reapply_layout(&[], &[], mode, LayoutPreference::Organic).is_empty());
        }
    }
}
