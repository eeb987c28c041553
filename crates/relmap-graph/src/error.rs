//! Error types for relmap-graph

use thiserror::Error;

/// A topological sort could not order every vertex because the graph has a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("graph is not acyclic: {unsorted} of {total} vertices could not be ordered")]
pub struct CycleError {
    /// Vertices left behind by the sort.
    pub unsorted: usize,
    /// Vertices in the graph.
    pub total: usize,
}
