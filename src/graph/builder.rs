//! Graph builder with efficient edge handling
//!
//! This module provides a mutable graph builder that uses FxHashMap
//! for O(1) edge lookups during construction.

use rustc_hash::FxHashMap;

use super::components::connected_components;
use crate::stats::pairs::LemmaPair;

/// A node in the graph builder
#[derive(Debug, Clone)]
pub struct BuilderNode {
    /// The lemma for this node
    pub lemma: String,
    /// Adjacency list: target node ID -> edge weight
    pub edges: FxHashMap<u32, u32>,
}

impl BuilderNode {
    /// Create a new node
    pub fn new(lemma: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            edges: FxHashMap::default(),
        }
    }

    /// Sum of incident edge weights
    pub fn strength(&self) -> u64 {
        self.edges.values().map(|&w| u64::from(w)).sum()
    }
}

/// A mutable, undirected graph builder.
///
/// Node IDs follow the order in which lemmas were first seen.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    /// Maps lemma -> node ID
    lemma_to_id: FxHashMap<String, u32>,
    /// Node storage
    nodes: Vec<BuilderNode>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    /// Create a new empty graph builder
    pub fn new() -> Self {
        Self {
            lemma_to_id: FxHashMap::default(),
            nodes: Vec::new(),
        }
    }

    /// Create a graph builder with pre-allocated capacity
    pub fn with_capacity(node_capacity: usize) -> Self {
        Self {
            lemma_to_id: FxHashMap::with_capacity_and_hasher(node_capacity, Default::default()),
            nodes: Vec::with_capacity(node_capacity),
        }
    }

    /// Get or create a node for the given lemma, returning its ID
    pub fn get_or_create_node(&mut self, lemma: &str) -> u32 {
        if let Some(&id) = self.lemma_to_id.get(lemma) {
            return id;
        }

        let id = self.nodes.len() as u32;
        self.lemma_to_id.insert(lemma.to_string(), id);
        self.nodes.push(BuilderNode::new(lemma));
        id
    }

    /// Increment the edge weight between two nodes
    ///
    /// If the edge doesn't exist, it's created with the given weight. Weights
    /// saturate at `u32::MAX`.
    pub fn increment_edge(&mut self, from: u32, to: u32, weight: u32) {
        if from == to {
            return; // No self-loops
        }

        // Add edge in both directions (undirected graph)
        if let Some(node) = self.nodes.get_mut(from as usize) {
            let w = node.edges.entry(to).or_insert(0);
            *w = w.saturating_add(weight);
        }
        if let Some(node) = self.nodes.get_mut(to as usize) {
            let w = node.edges.entry(from).or_insert(0);
            *w = w.saturating_add(weight);
        }
    }

    /// Build a graph from weighted co-occurrence pairs.
    ///
    /// One node per distinct lemma, one edge per pair with the pair count as
    /// its weight. Nodes are numbered in the order lemmas appear in `pairs`.
    pub fn from_pairs(pairs: &[(LemmaPair, u32)]) -> Self {
        let mut builder = Self::with_capacity(pairs.len());
        for (pair, weight) in pairs {
            let a = builder.get_or_create_node(pair.first());
            let b = builder.get_or_create_node(pair.second());
            builder.increment_edge(a, b, *weight);
        }
        builder
    }

    /// Drop every connected component with exactly `size` nodes.
    ///
    /// Surviving nodes are renumbered but keep their relative order.
    /// Returns the number of nodes removed.
    pub fn prune_components(&mut self, size: usize) -> usize {
        let doomed: Vec<bool> = {
            let mut doomed = vec![false; self.nodes.len()];
            for component in connected_components(self) {
                if component.len() == size {
                    for id in component {
                        doomed[id as usize] = true;
                    }
                }
            }
            doomed
        };

        let removed = doomed.iter().filter(|&&d| d).count();
        if removed == 0 {
            return 0;
        }

        // old ID -> new ID for survivors
        let mut remap: Vec<Option<u32>> = vec![None; self.nodes.len()];
        let mut next = 0u32;
        for (old, gone) in doomed.iter().enumerate() {
            if !gone {
                remap[old] = Some(next);
                next += 1;
            }
        }

        let old_nodes = std::mem::take(&mut self.nodes);
        self.lemma_to_id.clear();
        for (old, node) in old_nodes.into_iter().enumerate() {
            let Some(new_id) = remap[old] else {
                continue;
            };
            let edges = node
                .edges
                .into_iter()
                .filter_map(|(target, w)| remap[target as usize].map(|t| (t, w)))
                .collect();
            self.lemma_to_id.insert(node.lemma.clone(), new_id);
            self.nodes.push(BuilderNode {
                lemma: node.lemma,
                edges,
            });
        }

        removed
    }

    /// Get the number of nodes in the graph
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the total number of edges (counting each undirected edge once)
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum::<usize>() / 2
    }

    /// Get a node by ID
    pub fn get_node(&self, id: u32) -> Option<&BuilderNode> {
        self.nodes.get(id as usize)
    }

    /// Get a node ID by lemma
    pub fn get_node_id(&self, lemma: &str) -> Option<u32> {
        self.lemma_to_id.get(lemma).copied()
    }

    /// Get the lemma for a node ID
    pub fn get_lemma(&self, id: u32) -> Option<&str> {
        self.nodes.get(id as usize).map(|n| n.lemma.as_str())
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = (u32, &BuilderNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (i as u32, n))
    }

    /// Check if the graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
