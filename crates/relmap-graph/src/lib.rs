//! # relmap-graph
//!
//! Small graph toolkit behind relmap's dependency ordering.
//!
//! - [`MapDigraph`]: directed graph with one labelled arc per ordered vertex pair
//! - [`StrongConnection`]: Tarjan decomposition and contraction of cycles
//! - [`IndegreeTopologicalSort`]: Kahn-style ordering with deterministic tie-breaks
//!
//! # Example
//!
//! ```
//! use relmap_graph::{IndegreeTopologicalSort, MapDigraph, StrongConnection};
//!
//! let mut graph: MapDigraph<&str, ()> = MapDigraph::new();
//! graph.put_arc("gallery", "exhibit", ());
//! graph.put_arc("exhibit", "gallery", ());
//! graph.put_arc("exhibit", "artist_exhibit", ());
//!
//! let contracted = StrongConnection::new(graph).contract();
//! let order: Vec<_> = IndegreeTopologicalSort::new(&contracted).collect();
//! assert_eq!(order, [&vec!["gallery", "exhibit"], &vec!["artist_exhibit"]]);
//! ```

pub mod digraph;
pub mod error;
pub mod strong;
pub mod topo;


pub use digraph::MapDigraph;
pub use error::CycleError;
pub use strong::StrongConnection;
pub use topo::{IndegreeTopologicalSort, topological_order};
