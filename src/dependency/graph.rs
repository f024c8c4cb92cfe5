//! Name-keyed dependency graph for schema objects.
//!
//! Nodes are registered in discovery order (tables first, then views as
//! the dumper finds them); edges say "dependent references referenced".
//! References may be registered before the referenced object is known;
//! resolution happens at sort time, and references that never resolve to
//! a known node are dropped silently (the scanner that feeds this graph
//! is heuristic, see the parser module).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::config::MAX_DEPENDENCY_DEPTH;
use crate::error::{ViewError, ViewResult};

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Insertion order doubles as the tie-break order of the sort
    nodes: Vec<String>,
    index: HashMap<String, usize>,
    /// Raw referenced names per dependent, resolved lazily
    references: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an object. Idempotent; first registration fixes the
    /// object's position in the tie-break order.
    pub fn add_node(&mut self, name: &str) {
        if !self.index.contains_key(name) {
            self.index.insert(name.to_string(), self.nodes.len());
            self.nodes.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Record that `dependent` references each of `referenced`. Names that
    /// never become nodes are ignored at sort time.
    pub fn depends(&mut self, dependent: &str, referenced: &[String]) {
        self.references
            .entry(dependent.to_string())
            .or_default()
            .extend(referenced.iter().cloned());
    }

    /// All nodes in an order where every object follows everything it
    /// references. Ties keep insertion order.
    pub fn sorted(&self) -> ViewResult<Vec<String>> {
        // resolve raw references into edges between known nodes
        let mut depends_on: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        let mut dependents_of: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];

        for (dependent, referenced) in &self.references {
            let Some(&dep_idx) = self.index.get(dependent) else {
                continue;
            };
            for name in referenced {
                let Some(&ref_idx) = self.index.get(name) else {
                    continue;
                };
                if ref_idx == dep_idx || depends_on[dep_idx].contains(&ref_idx) {
                    continue;
                }
                depends_on[dep_idx].push(ref_idx);
                dependents_of[ref_idx].push(dep_idx);
            }
        }

        let mut remaining: Vec<usize> = depends_on.iter().map(Vec::len).collect();
        let mut depth: Vec<usize> = vec![0; self.nodes.len()];

        // Kahn's algorithm; the ready pool is drained in insertion order so
        // independent objects keep a stable, reproducible position
        let mut ready: BinaryHeap<Reverse<usize>> = (0..self.nodes.len())
            .filter(|&i| remaining[i] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);

            for &dependent in &dependents_of[node] {
                depth[dependent] = depth[dependent].max(depth[node] + 1);
                if depth[dependent] > MAX_DEPENDENCY_DEPTH {
                    return Err(ViewError::DependencyDepthExceeded {
                        depth: depth[dependent],
                        max_depth: MAX_DEPENDENCY_DEPTH,
                    });
                }
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < self.nodes.len() {
            let cycle: Vec<String> = (0..self.nodes.len())
                .filter(|&i| remaining[i] > 0)
                .map(|i| self.nodes[i].clone())
                .collect();
            return Err(ViewError::CircularDependency { cycle });
        }

        Ok(order.into_iter().map(|i| self.nodes[i].clone()).collect())
    }
}
