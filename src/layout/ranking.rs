use super::*;

use super::organic::bfs_levels;

/// Built-in layered backend. Ranks are the breadth-first levels used by
/// the organic layout, ordered within each rank by the mean slot of their
/// parents, then packed along the direction axis.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankedBackend;

impl LayeredBackend for RankedBackend {
    fn name(&self) -> &'static str {
        "ranked"
    }

    fn compute_centers(
        &self,
        nodes: &[LayeredNode],
        edges: &[Edge],
        direction: Direction,
        config: &LayeredConfig,
    ) -> HashMap<String, (f32, f32)> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(nodes.len());
        let unique: Vec<&LayeredNode> = nodes
            .iter()
            .filter(|node| seen.insert(node.id.as_str()))
            .collect();
        if unique.is_empty() {
            return HashMap::new();
        }

        let ids: Vec<&str> = unique.iter().map(|node| node.id.as_str()).collect();
        let adjacency = Adjacency::from_parts(
            ids.iter().copied(),
            edges.iter().filter(|edge| {
                edge.from != edge.to
                    && seen.contains(edge.from.as_str())
                    && seen.contains(edge.to.as_str())
            }),
        );
        let ranks = rank_buckets(&ids, &adjacency, config.order_passes);
        trace!(ranks = ranks.len(), nodes = ids.len(), "ranked layers assigned");

        // (extent along the rank axis, extent across it)
        let extents = |idx: usize| -> (f32, f32) {
            let node = unique[idx];
            match direction {
                Direction::LeftRight => (node.width, node.height),
                Direction::TopDown => (node.height, node.width),
            }
        };

        let layers: Vec<(f32, f32)> = ranks
            .iter()
            .map(|bucket| {
                let thickness = bucket.iter().map(|&idx| extents(idx).0).fold(0.0, f32::max);
                let gaps = bucket.len().saturating_sub(1) as f32 * config.node_spacing;
                let span = bucket.iter().map(|&idx| extents(idx).1).sum::<f32>() + gaps;
                (thickness, span)
            })
            .collect();
        let widest = layers.iter().map(|&(_, span)| span).fold(0.0, f32::max);
        let (margin_main, margin_cross) = match direction {
            Direction::LeftRight => (config.margin_x, config.margin_y),
            Direction::TopDown => (config.margin_y, config.margin_x),
        };

        let mut centers = HashMap::with_capacity(ids.len());
        let mut main = margin_main;
        for (bucket, &(thickness, span)) in ranks.iter().zip(&layers) {
            let mut cross = margin_cross + (widest - span) / 2.0;
            for &idx in bucket {
                let (_, extent) = extents(idx);
                let along = main + thickness / 2.0;
                let across = cross + extent / 2.0;
                let center = match direction {
                    Direction::LeftRight => (along, across),
                    Direction::TopDown => (across, along),
                };
                centers.insert(ids[idx].to_string(), center);
                cross += extent + config.node_spacing;
            }
            main += thickness + config.rank_spacing;
        }
        centers
    }
}

/// Groups indices of `ids` by BFS level, discovery order first, then
/// reorders every rank after the first by parent barycenter.
fn rank_buckets(ids: &[&str], adjacency: &Adjacency<'_>, passes: usize) -> Vec<Vec<usize>> {
    let mut ranks: Vec<Vec<usize>> = Vec::new();
    for (idx, level) in bfs_levels(ids, adjacency) {
        if ranks.len() <= level {
            ranks.resize_with(level + 1, Vec::new);
        }
        ranks[level].push(idx);
    }
    ranks.retain(|bucket| !bucket.is_empty());

    let slot_of: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(idx, &id)| (id, idx))
        .collect();
    let mut parents: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for (from, &id) in ids.iter().enumerate() {
        for next in adjacency.neighbors(id) {
            if let Some(&to) = slot_of.get(next) {
                parents[to].push(from);
            }
        }
    }
    order_by_parents(&mut ranks, &parents, passes);
    ranks
}

fn order_by_parents(ranks: &mut [Vec<usize>], parents: &[Vec<usize>], passes: usize) {
    if ranks.len() <= 1 {
        return;
    }
    let mut slot = vec![0.0_f32; parents.len()];
    for _ in 0..passes.max(1) {
        for bucket in ranks.iter() {
            for (pos, &idx) in bucket.iter().enumerate() {
                slot[idx] = pos as f32;
            }
        }
        for bucket in ranks.iter_mut().skip(1) {
            // Parentless nodes keep their slot; the sort is stable.
            let keys: HashMap<usize, f32> = bucket
                .iter()
                .map(|&idx| {
                    let above = &parents[idx];
                    let key = if above.is_empty() {
                        slot[idx]
                    } else {
                        above.iter().map(|&p| slot[p]).sum::<f32>() / above.len() as f32
                    };
                    (idx, key)
                })
                .collect();
            bucket.sort_by(|a, b| keys[a].total_cmp(&keys[b]));
            for (pos, &idx) in bucket.iter().enumerate() {
                slot[idx] = pos as f32;
            }
        }
    }
}
