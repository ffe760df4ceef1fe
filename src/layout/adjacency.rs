use std::collections::{HashMap, HashSet};

use crate::ir::{Edge, Node};

/// Directed adjacency derived from an edge list.
#[derive(Debug, Default)]
pub struct Adjacency<'a> {
    /// Outgoing neighbors per id, in edge order. Every node id and every
    /// edge endpoint has a (possibly empty) bucket.
    pub outgoing: HashMap<&'a str, Vec<&'a str>>,
    /// Ids that appear as the target of at least one edge.
    pub targets: HashSet<&'a str>,
}

impl<'a> Adjacency<'a> {
    pub fn neighbors(&self, id: &str) -> &[&'a str] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_incoming(&self, id: &str) -> bool {
        self.targets.contains(id)
    }
}

impl<'a> Adjacency<'a> {
    /// Adjacency over an explicit id list. Parallel and duplicate edges are
    /// kept; dangling endpoints get buckets like any other id.
    pub fn from_parts(
        ids: impl IntoIterator<Item = &'a str>,
        edges: impl IntoIterator<Item = &'a Edge>,
    ) -> Self {
        let mut outgoing: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for id in ids {
            outgoing.entry(id).or_default();
        }
        let mut targets = HashSet::new();
        for edge in edges {
            outgoing.entry(edge.to.as_str()).or_default();
            outgoing
                .entry(edge.from.as_str())
                .or_default()
                .push(edge.to.as_str());
            targets.insert(edge.to.as_str());
        }
        Adjacency { outgoing, targets }
    }
}

pub fn build_adjacency<'a>(nodes: &'a [Node], edges: &'a [Edge]) -> Adjacency<'a> {
    Adjacency::from_parts(nodes.iter().map(|node| node.id.as_str()), edges)
}
