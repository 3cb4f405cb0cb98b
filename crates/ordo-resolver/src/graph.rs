//! Install graph of a resolved package set: install ordering and tree rendering.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use ordo_core::identity::{PackageId, PackageIdentity};

use crate::candidate::ResolverPackage;

/// Resolved packages with an edge from every dependent to each of its
/// dependencies that is part of the set.
#[derive(Debug, Clone, Default)]
pub struct InstallGraph {
    graph: DiGraph<PackageIdentity, ()>,
    /// Lookup from package id to node index.
    index: HashMap<PackageId, NodeIndex>,
}

impl InstallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from solver output. Absent candidates are skipped;
    /// node order follows `candidates`.
    pub fn from_candidates<'a>(candidates: impl IntoIterator<Item = &'a ResolverPackage>) -> Self {
        let present: Vec<&ResolverPackage> =
            candidates.into_iter().filter(|c| !c.is_absent()).collect();

        let mut graph = Self::new();
        for candidate in &present {
            if let Some(identity) = candidate.identity() {
                graph.add_node(identity);
            }
        }
        for candidate in &present {
            let Some(from) = graph.find(candidate.id()) else {
                continue;
            };
            for dep in candidate.dependencies() {
                if let Some(to) = graph.find(&dep.id) {
                    graph.add_edge(from, to);
                }
            }
        }
        graph
    }

    /// Add or retrieve a node. If the id already exists, returns the existing index.
    pub fn add_node(&mut self, identity: PackageIdentity) -> NodeIndex {
        if let Some(&idx) = self.index.get(&identity.id) {
            return idx;
        }
        let id = identity.id.clone();
        let idx = self.graph.add_node(identity);
        self.index.insert(id, idx);
        idx
    }

    /// Add a dependency edge from `from` to `to`. Self-edges and duplicates are ignored.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if from != to && !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn find(&self, id: &PackageId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &PackageIdentity {
        &self.graph[idx]
    }

    /// Direct dependencies of a node, in declaration order.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Outgoing)
    }

    /// Reverse dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors(idx, Direction::Incoming)
    }

    // petgraph walks adjacency lists newest first; sort back into insertion order.
    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, direction).collect();
        edges.sort_by_key(|e| e.id());
        edges
            .into_iter()
            .map(|e| match direction {
                Direction::Outgoing => e.target(),
                Direction::Incoming => e.source(),
            })
            .collect()
    }

    /// Packages ordered so that every dependency precedes its dependents.
    ///
    /// Layered Kahn sort: each round takes, in insertion order, every remaining
    /// package whose dependencies are all placed. Packages caught in a cycle
    /// are appended in insertion order.
    pub fn install_order(&self) -> Vec<PackageIdentity> {
        let mut placed = vec![false; self.graph.node_count()];
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut remaining: Vec<NodeIndex> = self.graph.node_indices().collect();

        while !remaining.is_empty() {
            let ready: Vec<NodeIndex> = remaining
                .iter()
                .copied()
                .filter(|&idx| {
                    self.graph
                        .neighbors_directed(idx, Direction::Outgoing)
                        .all(|dep| placed[dep.index()])
                })
                .collect();

            if ready.is_empty() {
                let cycle: Vec<String> = remaining
                    .iter()
                    .map(|&idx| self.graph[idx].to_string())
                    .collect();
                tracing::warn!(
                    "Dependency cycle among {}; installing them in resolution order",
                    cycle.join(", ")
                );
                order.extend(remaining.iter().map(|&idx| self.graph[idx].clone()));
                break;
            }

            for &idx in &ready {
                placed[idx.index()] = true;
                order.push(self.graph[idx].clone());
            }
            remaining.retain(|idx| !placed[idx.index()]);
        }

        order
    }

    /// Print the dependency tree below each of `roots` to a string.
    ///
    /// Roots that are not part of the graph are skipped.
    pub fn render_tree(&self, roots: &[PackageId]) -> String {
        let mut output = String::new();
        for root in roots {
            let Some(idx) = self.find(root) else {
                continue;
            };
            output.push_str(&format!("{}\n", self.graph[idx]));

            let mut visited = HashSet::new();
            visited.insert(idx);
            let deps = self.dependencies_of(idx);
            let count = deps.len();
            for (i, child) in deps.into_iter().enumerate() {
                self.render_subtree(&mut output, child, "", i == count - 1, &mut visited);
            }
        }
        output
    }

    fn render_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        // Cycle: print the node once more but stop descending.
        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.into_iter().enumerate() {
            self.render_subtree(output, child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
