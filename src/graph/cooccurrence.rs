//! The pruned co-occurrence graph handed to the presentation layer.
//!
//! Nodes carry their strength (weighted degree) for sizing; edges carry the
//! number of documents in which both lemmas appear. No layout is computed
//! here.

use serde::{Deserialize, Serialize};

use super::builder::GraphBuilder;
use super::csr::CsrGraph;
use crate::stats::pairs::LemmaPair;

/// Components of exactly this many nodes are pruned as uninformative.
pub const ISOLATED_PAIR_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub lemma: String,
    /// Sum of incident edge weights
    pub strength: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Undirected weighted graph with no two-node components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooccurrenceGraph {
    /// Nodes in the order their lemmas first appeared in the pair list
    pub nodes: Vec<GraphNode>,
    /// Each undirected edge once
    pub edges: Vec<GraphEdge>,
}

impl CooccurrenceGraph {
    /// Build, prune and size a graph from ranked pairs.
    ///
    /// Every isolated pair (a component of two nodes) is removed along with
    /// its edge; larger components survive regardless of density.
    pub fn from_pairs(pairs: &[(LemmaPair, u32)]) -> Self {
        let mut builder = GraphBuilder::from_pairs(pairs);
        builder.prune_components(ISOLATED_PAIR_SIZE);
        Self::from_csr(&CsrGraph::from_builder(&builder))
    }

    /// Emit nodes and edges from a frozen graph
    pub fn from_csr(csr: &CsrGraph) -> Self {
        let nodes = (0..csr.num_nodes as u32)
            .map(|id| GraphNode {
                lemma: csr.lemma(id).to_string(),
                strength: csr.node_strength(id),
            })
            .collect();
        let edges = csr
            .undirected_edges()
            .map(|(source, target, weight)| GraphEdge {
                source: csr.lemma(source).to_string(),
                target: csr.lemma(target).to_string(),
                weight,
            })
            .collect();
        Self { nodes, edges }
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Strength of `lemma`, if it is a node
    pub fn strength(&self, lemma: &str) -> Option<u64> {
        self.nodes
            .iter()
            .find(|n| n.lemma == lemma)
            .map(|n| n.strength)
    }

    /// Weight of the edge between `a` and `b`, in either order
    pub fn edge_weight(&self, a: &str, b: &str) -> Option<u32> {
        self.edges
            .iter()
            .find(|e| (e.source == a && e.target == b) || (e.source == b && e.target == a))
            .map(|e| e.weight)
    }
}
