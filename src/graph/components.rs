//! Connected component labelling
//!
//! Breadth-first search over the builder's adjacency lists. Components are
//! returned in order of their lowest node ID, with member IDs sorted.

use std::collections::VecDeque;

use super::builder::GraphBuilder;

/// Group node IDs into connected components.
pub fn connected_components(graph: &GraphBuilder) -> Vec<Vec<u32>> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start as u32);

        let mut members = Vec::new();
        while let Some(id) = queue.pop_front() {
            members.push(id);
            let Some(node) = graph.get_node(id) else {
                continue;
            };
            for &next in node.edges.keys() {
                if !visited[next as usize] {
                    visited[next as usize] = true;
                    queue.push_back(next);
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Size of every component, in the same order as [`connected_components`]
pub fn component_sizes(graph: &GraphBuilder) -> Vec<usize> {
    connected_components(graph).iter().map(Vec::len).collect()
}
