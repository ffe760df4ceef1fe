use super::*;

use std::f32::consts::TAU;

/// BFS level assignment for the radial layout.
///
/// Returns `(node index, level)` pairs in assignment order: breadth-first
/// discovery order from every root, followed by the unreachable nodes in
/// input order (all pinned to level 1). Only the first node carrying a
/// given id takes part; ids reached through dangling edges are dropped.
pub fn assign_levels(nodes: &[Node], edges: &[Edge]) -> Vec<(usize, usize)> {
    let ids: Vec<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    bfs_levels(&ids, &build_adjacency(nodes, edges))
}

/// Level assignment over `ids` and a prebuilt adjacency; indices refer to
/// `ids`. Shared with the ranked layered backend.
pub(super) fn bfs_levels(ids: &[&str], adjacency: &Adjacency<'_>) -> Vec<(usize, usize)> {
    let Some(&first) = ids.first() else {
        return Vec::new();
    };
    let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
    for (idx, &id) in ids.iter().enumerate() {
        index_of.entry(id).or_insert(idx);
    }

    let mut roots: Vec<&str> = ids
        .iter()
        .copied()
        .filter(|id| !adjacency.has_incoming(id))
        .collect();
    if roots.is_empty() {
        roots.push(first);
    }

    let mut visited: HashSet<&str> = HashSet::with_capacity(ids.len());
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    for root in roots {
        if visited.insert(root) {
            queue.push_back((root, 0));
        }
    }

    let mut assigned: Vec<(&str, usize)> = Vec::with_capacity(ids.len());
    while let Some((id, level)) = queue.pop_front() {
        assigned.push((id, level));
        for &next in adjacency.neighbors(id) {
            if visited.insert(next) {
                queue.push_back((next, level + 1));
            }
        }
    }
    for &id in ids {
        if visited.insert(id) {
            assigned.push((id, 1));
        }
    }

    assigned
        .into_iter()
        .filter_map(|(id, level)| index_of.get(id).map(|idx| (*idx, level)))
        .collect()
}

/// Concentric-ring layout around the inferred roots.
pub fn apply_organic_layout(
    mut nodes: Vec<Node>,
    edges: &[Edge],
    config: &OrganicConfig,
    jitter: &mut dyn JitterSource,
) -> Vec<Node> {
    if nodes.is_empty() {
        return nodes;
    }

    let mut by_level: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, level) in assign_levels(&nodes, edges) {
        by_level.entry(level).or_default().push(idx);
    }
    trace!(levels = by_level.len(), "organic levels assigned");

    for (&level, members) in &by_level {
        if level == 0 {
            for &idx in members {
                let node = &mut nodes[idx];
                node.position = NodePosition::new(0.0, 0.0);
                node.visual.size_multiplier = Some(config.root_size_multiplier);
                node.visual.shape = Some(NodeShape::Circle);
            }
            continue;
        }

        let radius = level as f32 * config.ring_spacing;
        let angle_step = TAU / members.len() as f32;
        let rotation = level as f32 * config.ring_rotation;
        for (i, &idx) in members.iter().enumerate() {
            let angle = i as f32 * angle_step + rotation;
            let dx = jitter.offset(config.jitter);
            let dy = jitter.offset(config.jitter);
            let node = &mut nodes[idx];
            node.position = NodePosition::new(radius * angle.cos() + dx, radius * angle.sin() + dy);
            node.visual.size_multiplier = Some(config.node_size_multiplier);
            node.visual.shape = Some(if node.node_type == NodeType::Person {
                NodeShape::Circle
            } else {
                NodeShape::RoundedRect
            });
        }
    }

    nodes
}
