use crate::digraph::MapDigraph;
use crate::error::CycleError;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// Kahn-style topological iteration over a [`MapDigraph`].
///
/// A vertex is emitted once every arc pointing at it has been consumed. When
/// several vertices are ready at once, the one with the lowest rank goes
/// first; by default the rank is the vertex insertion position.
///
/// Iteration stops early when the graph has a cycle. Check
/// [`is_complete`](Self::is_complete) afterwards, or use
/// [`into_sorted`](Self::into_sorted).
#[derive(Debug)]
pub struct IndegreeTopologicalSort<'a, V, E> {
    graph: &'a MapDigraph<V, E>,
    indegree: Vec<usize>,
    rank: Vec<usize>,
    ready: BinaryHeap<Reverse<(usize, usize)>>,
    emitted: usize,
}

impl<'a, V, E> IndegreeTopologicalSort<'a, V, E>
where
    V: Clone + Eq + Hash,
{
    /// Ties broken by vertex insertion order.
    pub fn new(graph: &'a MapDigraph<V, E>) -> Self {
        let rank = (0..graph.order()).collect();
        Self::with_rank(graph, rank)
    }

    /// Ties broken by `key`, then by insertion order.
    pub fn by_key<K, F>(graph: &'a MapDigraph<V, E>, key: F) -> Self
    where
        K: Ord,
        F: Fn(&V) -> K,
    {
        let mut positions: Vec<usize> = (0..graph.order()).collect();
        positions.sort_by_key(|&pos| key(graph.vertex_at(pos)));

        let mut rank = vec![0; positions.len()];
        for (r, &pos) in positions.iter().enumerate() {
            rank[pos] = r;
        }
        Self::with_rank(graph, rank)
    }

    fn with_rank(graph: &'a MapDigraph<V, E>, rank: Vec<usize>) -> Self {
        let indegree = graph.indegrees().to_vec();
        let ready = indegree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(pos, _)| Reverse((rank[pos], pos)))
            .collect();

        Self {
            graph,
            indegree,
            rank,
            ready,
            emitted: 0,
        }
    }

    /// Whether every vertex has been emitted.
    pub fn is_complete(&self) -> bool {
        self.emitted == self.graph.order()
    }

    /// Drain the iterator, failing if a cycle kept some vertices back.
    pub fn into_sorted(mut self) -> Result<Vec<&'a V>, CycleError> {
        let sorted: Vec<&'a V> = self.by_ref().collect();
        if self.is_complete() {
            Ok(sorted)
        } else {
            Err(CycleError {
                unsorted: self.graph.order() - self.emitted,
                total: self.graph.order(),
            })
        }
    }
}

impl<'a, V, E> Iterator for IndegreeTopologicalSort<'a, V, E>
where
    V: Clone + Eq + Hash,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let Reverse((_, pos)) = self.ready.pop()?;
        self.emitted += 1;

        for &to in self.graph.successors_at(pos) {
            self.indegree[to] -= 1;
            if self.indegree[to] == 0 {
                self.ready.push(Reverse((self.rank[to], to)));
            }
        }

        Some(self.graph.vertex_at(pos))
    }
}

/// Topologically order `graph`, breaking ties by insertion order.
pub fn topological_order<V, E>(graph: &MapDigraph<V, E>) -> Result<Vec<&V>, CycleError>
where
    V: Clone + Eq + Hash,
{
    IndegreeTopologicalSort::new(graph).into_sorted()
}
