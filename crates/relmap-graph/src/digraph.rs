use std::collections::HashMap;
use std::hash::Hash;

/// A directed graph keyed by vertex value, with at most one labelled arc per
/// ordered vertex pair.
///
/// Vertices keep their insertion order, which is the order every iteration
/// method (and the default topological tie-break) observes. Several parallel
/// relations between the same two vertices are expected to be folded into one
/// list-valued label by the caller:
///
/// ```
/// use relmap_graph::MapDigraph;
///
/// let mut graph: MapDigraph<&str, Vec<&str>> = MapDigraph::new();
/// match graph.get_arc_mut(&"artist", &"painting") {
///     Some(fks) => fks.push("ARTIST_ID"),
///     None => {
///         graph.put_arc("artist", "painting", vec!["ARTIST_ID"]);
///     }
/// }
/// assert_eq!(graph.size(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MapDigraph<V, E> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    arcs: HashMap<(usize, usize), E>,
    /// Outgoing neighbours per vertex, in arc insertion order.
    successors: Vec<Vec<usize>>,
    indegree: Vec<usize>,
}

impl<V, E> Default for MapDigraph<V, E> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            arcs: HashMap::new(),
            successors: Vec::new(),
            indegree: Vec::new(),
        }
    }
}

impl<V, E> MapDigraph<V, E>
where
    V: Clone + Eq + Hash,
{
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            index: HashMap::with_capacity(vertices),
            arcs: HashMap::new(),
            successors: Vec::with_capacity(vertices),
            indegree: Vec::with_capacity(vertices),
        }
    }

    /// Add a vertex. A no-op when the vertex is already present.
    ///
    /// Returns the insertion position of the vertex.
    pub fn add_vertex(&mut self, vertex: V) -> usize {
        if let Some(&pos) = self.index.get(&vertex) {
            return pos;
        }
        let pos = self.vertices.len();
        self.index.insert(vertex.clone(), pos);
        self.vertices.push(vertex);
        self.successors.push(Vec::new());
        self.indegree.push(0);
        pos
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// Insertion position of a vertex, if present.
    pub fn position(&self, vertex: &V) -> Option<usize> {
        self.index.get(vertex).copied()
    }

    /// The label of the arc `origin -> destination`, if any.
    pub fn get_arc(&self, origin: &V, destination: &V) -> Option<&E> {
        let key = (self.position(origin)?, self.position(destination)?);
        self.arcs.get(&key)
    }

    /// Mutable access to the label of the arc `origin -> destination`.
    pub fn get_arc_mut(&mut self, origin: &V, destination: &V) -> Option<&mut E> {
        let key = (self.position(origin)?, self.position(destination)?);
        self.arcs.get_mut(&key)
    }

    /// Insert the arc `origin -> destination`, adding missing vertices.
    ///
    /// A second call for the same ordered pair overwrites the label and returns
    /// the previous one.
    pub fn put_arc(&mut self, origin: V, destination: V, label: E) -> Option<E> {
        let from = self.add_vertex(origin);
        let to = self.add_vertex(destination);
        self.put_arc_at(from, to, label)
    }

    pub(crate) fn put_arc_at(&mut self, from: usize, to: usize, label: E) -> Option<E> {
        let previous = self.arcs.insert((from, to), label);
        if previous.is_none() {
            self.successors[from].push(to);
            self.indegree[to] += 1;
        }
        previous
    }

    pub(crate) fn arc_at_mut(&mut self, from: usize, to: usize) -> Option<&mut E> {
        self.arcs.get_mut(&(from, to))
    }

    pub fn has_arc(&self, origin: &V, destination: &V) -> bool {
        self.get_arc(origin, destination).is_some()
    }

    /// Number of vertices.
    pub fn order(&self) -> usize {
        self.vertices.len()
    }

    /// Number of arcs.
    pub fn size(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.iter()
    }

    /// Direct successors of a vertex, in arc insertion order.
    pub fn successors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = &'a V> + use<'a, V, E> {
        let outgoing = self
            .position(vertex)
            .map(|pos| self.successors[pos].as_slice())
            .unwrap_or(&[]);
        outgoing.iter().map(move |&to| &self.vertices[to])
    }

    /// Number of arcs ending at `vertex` (0 for unknown vertices).
    pub fn indegree(&self, vertex: &V) -> usize {
        self.position(vertex).map_or(0, |pos| self.indegree[pos])
    }

    /// Number of arcs leaving `vertex` (0 for unknown vertices).
    pub fn outdegree(&self, vertex: &V) -> usize {
        self.position(vertex)
            .map_or(0, |pos| self.successors[pos].len())
    }

    /// All arcs as `(origin, destination, label)`, grouped by origin in vertex
    /// insertion order.
    pub fn arcs(&self) -> impl Iterator<Item = (&V, &V, &E)> {
        self.successors.iter().enumerate().flat_map(move |(from, tos)| {
            tos.iter().map(move |&to| {
                (
                    &self.vertices[from],
                    &self.vertices[to],
                    &self.arcs[&(from, to)],
                )
            })
        })
    }

    pub(crate) fn vertex_at(&self, pos: usize) -> &V {
        &self.vertices[pos]
    }

    pub(crate) fn successors_at(&self, pos: usize) -> &[usize] {
        &self.successors[pos]
    }

    pub(crate) fn indegrees(&self) -> &[usize] {
        &self.indegree
    }

    /// Split the graph into its vertex list and its arcs, consuming the labels.
    pub(crate) fn into_parts(self) -> (Vec<V>, Vec<(usize, usize, E)>) {
        let MapDigraph {
            vertices,
            mut arcs,
            successors,
            ..
        } = self;

        let mut ordered = Vec::with_capacity(arcs.len());
        for (from, tos) in successors.into_iter().enumerate() {
            for to in tos {
                if let Some(label) = arcs.remove(&(from, to)) {
                    ordered.push((from, to, label));
                }
            }
        }
        (vertices, ordered)
    }
}
