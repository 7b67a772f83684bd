//! Frozen adjacency in Compressed Sparse Row layout
//!
//! Once pruning is done the builder's hash maps are no longer needed. This
//! module flattens them into sorted arrays so edges come out in a stable
//! order, and sums each node's incident weights into its strength.

use super::builder::GraphBuilder;

/// Read-only co-occurrence graph, one row of sorted neighbours per node
#[derive(Debug, Clone)]
pub struct CsrGraph {
    pub num_nodes: usize,
    /// Row `i` spans `targets[offsets[i]..offsets[i + 1]]`
    pub offsets: Vec<usize>,
    /// Neighbour IDs, ascending within each row
    pub targets: Vec<u32>,
    /// Co-occurrence counts, parallel to `targets`
    pub weights: Vec<u32>,
    /// Sum of incident weights per node
    pub strength: Vec<u64>,
    pub lemmas: Vec<String>,
}

impl CsrGraph {
    /// Freeze a builder; node IDs are kept as-is
    pub fn from_builder(builder: &GraphBuilder) -> Self {
        let num_nodes = builder.node_count();
        let mut graph = Self {
            num_nodes,
            offsets: Vec::with_capacity(num_nodes + 1),
            targets: Vec::new(),
            weights: Vec::new(),
            strength: Vec::with_capacity(num_nodes),
            lemmas: Vec::with_capacity(num_nodes),
        };
        graph.offsets.push(0);

        for (_, node) in builder.nodes() {
            let mut row: Vec<(u32, u32)> = node.edges.iter().map(|(&t, &w)| (t, w)).collect();
            row.sort_unstable_by_key(|&(t, _)| t);

            graph
                .strength
                .push(row.iter().map(|&(_, w)| u64::from(w)).sum());
            for (target, weight) in row {
                graph.targets.push(target);
                graph.weights.push(weight);
            }
            graph.offsets.push(graph.targets.len());
            graph.lemmas.push(node.lemma.clone());
        }

        graph
    }

    /// `(neighbour, weight)` for `node`, ascending by neighbour
    pub fn neighbors(&self, node: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        let row = self.offsets[node as usize]..self.offsets[node as usize + 1];
        row.map(move |i| (self.targets[i], self.weights[i]))
    }

    pub fn node_strength(&self, node: u32) -> u64 {
        self.strength[node as usize]
    }

    pub fn lemma(&self, node: u32) -> &str {
        &self.lemmas[node as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Each undirected edge once, as `(lower ID, higher ID, weight)`
    pub fn undirected_edges(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        (0..self.num_nodes as u32).flat_map(move |source| {
            self.neighbors(source)
                .filter(move |&(target, _)| source < target)
                .map(move |(target, weight)| (source, target, weight))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 猫-犬 (1), 犬-鳥 (2), 猫-鳥 (4)
    fn triangle() -> CsrGraph {
        let mut builder = GraphBuilder::new();
        let cat = builder.get_or_create_node("猫");
        let dog = builder.get_or_create_node("犬");
        let bird = builder.get_or_create_node("鳥");
        builder.increment_edge(cat, dog, 1);
        builder.increment_edge(dog, bird, 2);
        builder.increment_edge(cat, bird, 4);
        CsrGraph::from_builder(&builder)
    }

    #[test]
    fn test_layout() {
        let csr = triangle();
        assert_eq!(csr.num_nodes, 3);
        assert_eq!(csr.lemmas, vec!["猫", "犬", "鳥"]);
        assert_eq!(csr.offsets, vec![0, 2, 4, 6]);
    }

    #[test]
    fn test_rows_sorted_by_neighbour() {
        let csr = triangle();
        let row: Vec<_> = csr.neighbors(2).collect();
        assert_eq!(row, vec![(0, 4), (1, 2)]);
    }

    #[test]
    fn test_strength_sums_incident_weights() {
        let csr = triangle();
        assert_eq!(csr.node_strength(0), 5);
        assert_eq!(csr.node_strength(1), 3);
        assert_eq!(csr.node_strength(2), 6);
    }

    #[test]
    fn test_undirected_edges_once() {
        let edges: Vec<_> = triangle().undirected_edges().collect();
        assert_eq!(edges, vec![(0, 1, 1), (0, 2, 4), (1, 2, 2)]);
    }

    #[test]
    fn test_empty_graph() {
        let csr = CsrGraph::from_builder(&GraphBuilder::new());
        assert!(csr.is_empty());
        assert_eq!(csr.offsets, vec![0]);
        assert_eq!(csr.undirected_edges().count(), 0);
    }
}
