use crate::digraph::MapDigraph;
use std::hash::Hash;

const UNVISITED: usize = usize::MAX;

/// Strongly connected component decomposition (Tarjan) of a [`MapDigraph`].
///
/// Components are reported with their members in vertex insertion order, and
/// the components themselves are ordered by their earliest member.
#[derive(Debug)]
pub struct StrongConnection<V, E> {
    graph: MapDigraph<V, E>,
}

impl<V, E> StrongConnection<V, E>
where
    V: Clone + Eq + Hash,
{
    pub fn new(graph: MapDigraph<V, E>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &MapDigraph<V, E> {
        &self.graph
    }

    /// The strongly connected components as vertex lists.
    pub fn components(&self) -> Vec<Vec<V>> {
        self.component_positions()
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .map(|pos| self.graph.vertex_at(pos).clone())
                    .collect()
            })
            .collect()
    }

    /// Collapse every component into a single vertex.
    ///
    /// The result has one vertex per component and an arc between two
    /// components iff the source graph has at least one arc between their
    /// members. The labels of all such arcs are collected in source arc order.
    /// Arcs inside a component (self-loops included) are dropped, so the
    /// contracted graph is always acyclic.
    pub fn contract(self) -> MapDigraph<Vec<V>, Vec<E>> {
        let components = self.component_positions();
        let (vertices, arcs) = self.graph.into_parts();

        let mut component_of = vec![0; vertices.len()];
        for (component, members) in components.iter().enumerate() {
            for &pos in members {
                component_of[pos] = component;
            }
        }

        let mut slots: Vec<Option<V>> = vertices.into_iter().map(Some).collect();
        let mut contracted: MapDigraph<Vec<V>, Vec<E>> =
            MapDigraph::with_capacity(components.len());
        for members in &components {
            let vertex: Vec<V> = members.iter().filter_map(|&pos| slots[pos].take()).collect();
            contracted.add_vertex(vertex);
        }

        for (from, to, label) in arcs {
            let (origin, destination) = (component_of[from], component_of[to]);
            if origin == destination {
                continue;
            }
            match contracted.arc_at_mut(origin, destination) {
                Some(labels) => labels.push(label),
                None => {
                    contracted.put_arc_at(origin, destination, vec![label]);
                }
            }
        }

        contracted
    }

    fn component_positions(&self) -> Vec<Vec<usize>> {
        let n = self.graph.order();
        let mut index = vec![UNVISITED; n];
        let mut lowlink = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<usize> = Vec::new();
        let mut next_index = 0;
        let mut components = Vec::new();

        for root in 0..n {
            if index[root] != UNVISITED {
                continue;
            }

            // (vertex, next successor to visit)
            let mut calls: Vec<(usize, usize)> = vec![(root, 0)];
            index[root] = next_index;
            lowlink[root] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root] = true;

            while let Some(frame) = calls.last_mut() {
                let v = frame.0;
                let successors = self.graph.successors_at(v);

                if frame.1 < successors.len() {
                    let w = successors[frame.1];
                    frame.1 += 1;

                    if index[w] == UNVISITED {
                        index[w] = next_index;
                        lowlink[w] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w] = true;
                        calls.push((w, 0));
                    } else if on_stack[w] {
                        lowlink[v] = lowlink[v].min(index[w]);
                    }
                    continue;
                }

                calls.pop();
                if let Some(&(parent, _)) = calls.last() {
                    lowlink[parent] = lowlink[parent].min(lowlink[v]);
                }

                if lowlink[v] == index[v] {
                    let mut members = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w] = false;
                        members.push(w);
                        if w == v {
                            break;
                        }
                    }
                    members.sort_unstable();
                    components.push(members);
                }
            }
        }

        components.sort_by_key(|members| members[0]);
        components
    }
}
