use crate::error::{MapError, MapResult};
use crate::map::DbRelationship;
use relmap_graph::{MapDigraph, StrongConnection, topological_order};
use std::collections::HashMap;
use std::hash::Hash;

/// A row of a self-referencing table, as seen by the row sorter.
pub trait ReflexiveRow {
    type Key: Eq + Hash + Clone;

    /// Identity of this row (usually its primary key values).
    fn row_key(&self) -> Self::Key;

    /// Identity of the row this one references through `relationship`.
    ///
    /// `None` when the foreign key is null or the relationship does not apply.
    fn referenced_key(&self, relationship: &DbRelationship) -> Option<Self::Key>;
}

/// Order `rows` so every master precedes the rows referencing it.
///
/// References to rows outside the batch and rows referencing themselves impose
/// no constraint. Unconstrained rows keep their relative order. Row keys must be
/// unique within the batch; a repeated key is a precondition error and leaves
/// `rows` untouched.
pub(crate) fn sort_rows<R: ReflexiveRow>(
    entity: &str,
    relationships: &[DbRelationship],
    rows: &mut Vec<R>,
    delete_order: bool,
) -> MapResult<()> {
    if relationships.is_empty() || rows.len() < 2 {
        return Ok(());
    }

    let mut graph: MapDigraph<usize, ()> = MapDigraph::with_capacity(rows.len());
    let mut positions: HashMap<R::Key, usize> = HashMap::with_capacity(rows.len());
    for (pos, row) in rows.iter().enumerate() {
        graph.add_vertex(pos);
        if let Some(first) = positions.insert(row.row_key(), pos) {
            return Err(MapError::precondition(format!(
                "rows of '{entity}' at batch positions {first} and {pos} share a row key"
            )));
        }
    }
    for (pos, row) in rows.iter().enumerate() {
        for rel in relationships {
            let master = row
                .referenced_key(rel)
                .and_then(|key| positions.get(&key).copied());
            if let Some(master) = master.filter(|&m| m != pos) {
                graph.put_arc(master, pos, ());
            }
        }
    }

    let strong = StrongConnection::new(graph);
    if let Some(cycle) = strong.components().into_iter().find(|c| c.len() > 1) {
        return Err(MapError::RowCycle(format!(
            "{} rows of '{}' reference each other in a cycle (batch positions {:?})",
            cycle.len(),
            entity,
            cycle
        )));
    }
    let mut order: Vec<usize> = topological_order(strong.graph())
        .map_err(|err| MapError::RowCycle(format!("rows of '{entity}': {err}")))?
        .into_iter()
        .copied()
        .collect();
    if delete_order {
        order.reverse();
    }

    tracing::trace!(
        target: "relmap.sort",
        entity,
        rows = rows.len(),
        arcs = strong.graph().size(),
        "sorted reflexive rows"
    );

    let mut slots: Vec<Option<R>> = rows.drain(..).map(Some).collect();
    rows.extend(order.into_iter().filter_map(|pos| slots[pos].take()));
    Ok(())
}
