use super::config::{ReflexivePolicy, SorterConfig, TieBreak};
use crate::map::{Catalog, DbAttribute, DbEntity, DbRelationship};
use relmap_graph::{IndegreeTopologicalSort, MapDigraph, StrongConnection};
use std::collections::HashMap;
use std::sync::Arc;

/// One strongly connected group of entities and its position in commit order.
#[derive(Debug)]
pub struct ComponentRecord {
    index: usize,
    entities: Vec<Arc<DbEntity>>,
}

impl ComponentRecord {
    /// Topological rank: masters have lower indices than their dependents.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Members in catalog declaration order.
    pub fn entities(&self) -> &[Arc<DbEntity>] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.iter().any(|e| e.name == entity)
    }
}

/// Immutable snapshot produced by a reindex.
#[derive(Debug)]
pub struct SorterIndex {
    components: HashMap<String, Arc<ComponentRecord>>,
    ordered: Vec<Arc<ComponentRecord>>,
    reflexive: HashMap<String, Vec<DbRelationship>>,
    arcs: usize,
}

impl SorterIndex {
    pub(crate) fn build(catalog: &Catalog, config: &SorterConfig) -> Self {
        let entities: Vec<&Arc<DbEntity>> = catalog.db_entities().collect();
        let mut graph: MapDigraph<String, Vec<DbAttribute>> =
            MapDigraph::with_capacity(entities.len());
        for entity in &entities {
            graph.add_vertex(entity.name.clone());
        }

        let mut reflexive: HashMap<String, Vec<DbRelationship>> = HashMap::new();
        for rel in catalog.relationship_sides() {
            let constrains = (!rel.is_to_many() && !rel.is_to_dependent_pk()) || rel.is_to_master_pk();
            if !constrains {
                continue;
            }

            // Arcs go from the referenced (master) entity to the referencing one.
            let destination = &rel.source_entity().name;
            let origin = &rel.target_entity().name;

            for (_, target) in rel.attribute_pairs() {
                if !target.primary_key {
                    continue;
                }

                if rel.is_reflexive() {
                    let recorded = reflexive.entry(destination.clone()).or_default();
                    let record = match config.reflexive_policy {
                        ReflexivePolicy::FirstPerEntity => recorded.is_empty(),
                        ReflexivePolicy::EveryRelationship => !recorded.contains(&rel),
                    };
                    if record {
                        tracing::trace!(
                            target: "relmap.sort",
                            entity = %destination,
                            relationship = %rel.name(),
                            "recorded reflexive relationship"
                        );
                        recorded.push(rel.clone());
                    }
                }

                match graph.get_arc_mut(origin, destination) {
                    Some(label) => label.push(target.clone()),
                    None => {
                        graph.put_arc(origin.clone(), destination.clone(), vec![target.clone()]);
                    }
                }
                tracing::trace!(
                    target: "relmap.sort",
                    origin = %origin,
                    destination = %destination,
                    column = %target.name,
                    "dependency arc"
                );
            }
        }

        let arcs = graph.size();
        let contracted = StrongConnection::new(graph).contract();
        let sort = match config.tie_break {
            TieBreak::InsertionOrder => IndegreeTopologicalSort::new(&contracted),
            TieBreak::EntityName => IndegreeTopologicalSort::by_key(&contracted, |members| {
                members.iter().min().cloned()
            }),
        };
        let sorted = match sort.into_sorted() {
            Ok(sorted) => sorted,
            Err(err) => panic!("contracted dependency graph is not acyclic: {err}"),
        };

        let by_name: HashMap<&str, &Arc<DbEntity>> =
            entities.iter().map(|e| (e.name.as_str(), *e)).collect();
        let mut components = HashMap::with_capacity(entities.len());
        let mut ordered = Vec::with_capacity(sorted.len());
        for (index, members) in sorted.into_iter().enumerate() {
            let record = Arc::new(ComponentRecord {
                index,
                entities: members
                    .iter()
                    .filter_map(|name| by_name.get(name.as_str()).map(|e| Arc::clone(e)))
                    .collect(),
            });
            for name in members {
                components.insert(name.clone(), Arc::clone(&record));
            }
            ordered.push(record);
        }

        Self {
            components,
            ordered,
            reflexive,
            arcs,
        }
    }

    pub fn component(&self, entity: &str) -> Option<&Arc<ComponentRecord>> {
        self.components.get(entity)
    }

    pub fn component_index(&self, entity: &str) -> Option<usize> {
        self.component(entity).map(|c| c.index)
    }

    /// Components in commit order.
    pub fn components(&self) -> &[Arc<ComponentRecord>] {
        &self.ordered
    }

    /// Recorded self-referencing relationships of `entity`.
    pub fn reflexive_relationships(&self, entity: &str) -> &[DbRelationship] {
        self.reflexive
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_reflexive(&self, entity: &str) -> bool {
        !self.reflexive_relationships(entity).is_empty()
    }

    /// Number of dependency arcs before contraction.
    pub fn arc_count(&self) -> usize {
        self.arcs
    }

    pub fn entity_count(&self) -> usize {
        self.components.len()
    }
}
