use super::data_map::DataMap;
use super::entity::{DbEntity, ObjEntity};
use super::join::Direction;
use super::relationship::{CompiledJoin, DbRelationship, MappingNamespace};
use crate::error::{MapError, MapResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Generator of process-unique names for unmapped relationship directions.
///
/// Owned by (or shared between) catalogs rather than global, so tests can pick
/// a prefix and reset the counter.
#[derive(Debug)]
pub struct RuntimeNames {
    prefix: String,
    counter: AtomicU64,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self::new("runtimeRelationship")
    }
}

impl RuntimeNames {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Next synthetic name (`runtimeRelationship0`, `runtimeRelationship1`, ...).
    pub fn next_name(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}", self.prefix, n)
    }

    /// How many names have been handed out since creation or the last reset.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.counter.store(0, Ordering::Relaxed);
    }
}

/// The compiled, read-only schema: entities, joins and per-entity relationships.
///
/// Built once from one or more [`DataMap`]s; nothing in it changes afterwards.
/// Entities keep their declaration order across all maps.
#[derive(Debug)]
pub struct Catalog {
    db_entities: Vec<Arc<DbEntity>>,
    db_index: HashMap<String, usize>,
    obj_entities: Vec<Arc<ObjEntity>>,
    obj_index: HashMap<String, usize>,
    joins: Vec<Arc<CompiledJoin>>,
    /// Named relationships by source entity.
    relationships: HashMap<String, Vec<DbRelationship>>,
    names: Arc<RuntimeNames>,
}

impl MappingNamespace for Catalog {
    fn db_entity(&self, name: &str) -> Option<&Arc<DbEntity>> {
        self.db_index.get(name).map(|&i| &self.db_entities[i])
    }
}

impl Catalog {
    /// Compile a single data map with a fresh runtime name generator.
    pub fn from_data_map(map: DataMap) -> MapResult<Self> {
        Self::compile([map], Arc::new(RuntimeNames::default()))
    }

    /// Resolve every declaration of `maps` into a catalog.
    pub fn compile(
        maps: impl IntoIterator<Item = DataMap>,
        names: Arc<RuntimeNames>,
    ) -> MapResult<Self> {
        let maps: Vec<DataMap> = maps.into_iter().collect();
        let mut catalog = Catalog {
            db_entities: Vec::new(),
            db_index: HashMap::new(),
            obj_entities: Vec::new(),
            obj_index: HashMap::new(),
            joins: Vec::new(),
            relationships: HashMap::new(),
            names,
        };

        for map in &maps {
            for entity in &map.db_entities {
                if catalog.db_index.contains_key(&entity.name) {
                    return Err(MapError::configuration(format!(
                        "duplicate db entity '{}' in data map '{}'",
                        entity.name, map.name
                    )));
                }
                catalog
                    .db_index
                    .insert(entity.name.clone(), catalog.db_entities.len());
                catalog.db_entities.push(Arc::new(entity.clone()));
            }
        }

        for map in &maps {
            for entity in &map.obj_entities {
                if catalog.obj_index.contains_key(&entity.name) {
                    return Err(MapError::configuration(format!(
                        "duplicate obj entity '{}' in data map '{}'",
                        entity.name, map.name
                    )));
                }
                if MappingNamespace::db_entity(&catalog, &entity.db_entity).is_none() {
                    return Err(MapError::schema_resolution(format!(
                        "obj entity '{}' maps to unknown db entity '{}'",
                        entity.name, entity.db_entity
                    )));
                }
                catalog
                    .obj_index
                    .insert(entity.name.clone(), catalog.obj_entities.len());
                catalog.obj_entities.push(Arc::new(entity.clone()));
            }
        }

        for entity in &catalog.obj_entities {
            for rel in &entity.relationships {
                if !catalog.obj_index.contains_key(&rel.target) {
                    return Err(MapError::schema_resolution(format!(
                        "obj relationship '{}.{}' targets unknown obj entity '{}'",
                        entity.name, rel.name, rel.target
                    )));
                }
            }
        }

        let mut joins = Vec::new();
        for map in &maps {
            for join in &map.joins {
                joins.push(join.compile(&catalog, &catalog.names)?);
            }
        }

        // Only mapped directions are registered on their source entity.
        for join in &joins {
            for direction in Direction::BOTH {
                if join.is_runtime(direction) {
                    continue;
                }
                let rel = join.relationship(direction);
                let source = rel.source_entity().name.clone();
                let registered = catalog.relationships.entry(source).or_default();
                if registered.iter().any(|r| r.name() == rel.name()) {
                    return Err(MapError::configuration(format!(
                        "duplicate relationship '{}' on db entity '{}'",
                        rel.name(),
                        rel.source_entity().name
                    )));
                }
                registered.push(rel);
            }
        }
        catalog.joins = joins;

        tracing::debug!(
            target: "relmap.map",
            data_maps = maps.len(),
            db_entities = catalog.db_entities.len(),
            obj_entities = catalog.obj_entities.len(),
            joins = catalog.joins.len(),
            "compiled catalog"
        );

        Ok(catalog)
    }

    pub fn db_entity(&self, name: &str) -> Option<&Arc<DbEntity>> {
        MappingNamespace::db_entity(self, name)
    }

    /// Like [`db_entity`](Self::db_entity), failing with a schema resolution error.
    pub fn require_db_entity(&self, name: &str) -> MapResult<&Arc<DbEntity>> {
        self.db_entity(name)
            .ok_or_else(|| MapError::schema_resolution(format!("no db entity named '{name}'")))
    }

    /// Db entities in declaration order.
    pub fn db_entities(&self) -> impl Iterator<Item = &Arc<DbEntity>> {
        self.db_entities.iter()
    }

    /// Declaration position of a db entity.
    pub fn db_entity_position(&self, name: &str) -> Option<usize> {
        self.db_index.get(name).copied()
    }

    pub fn obj_entity(&self, name: &str) -> Option<&Arc<ObjEntity>> {
        self.obj_index.get(name).map(|&i| &self.obj_entities[i])
    }

    pub fn require_obj_entity(&self, name: &str) -> MapResult<&Arc<ObjEntity>> {
        self.obj_entity(name)
            .ok_or_else(|| MapError::schema_resolution(format!("no obj entity named '{name}'")))
    }

    pub fn obj_entities(&self) -> impl Iterator<Item = &Arc<ObjEntity>> {
        self.obj_entities.iter()
    }

    /// The db entity behind an obj entity.
    pub fn db_entity_for(&self, entity: &ObjEntity) -> MapResult<&Arc<DbEntity>> {
        self.require_db_entity(&entity.db_entity)
    }

    pub fn joins(&self) -> &[Arc<CompiledJoin>] {
        &self.joins
    }

    /// Named relationships whose source is `entity`.
    pub fn relationships(&self, entity: &str) -> &[DbRelationship] {
        self.relationships
            .get(entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn relationship(&self, entity: &str, name: &str) -> Option<&DbRelationship> {
        self.relationships(entity).iter().find(|r| r.name() == name)
    }

    /// Every relationship side, runtime ones included: both directions of each
    /// join, in join declaration order.
    pub fn relationship_sides(&self) -> impl Iterator<Item = DbRelationship> + '_ {
        self.joins
            .iter()
            .flat_map(|join| Direction::BOTH.map(|direction| join.relationship(direction)))
    }

    pub fn runtime_names(&self) -> &Arc<RuntimeNames> {
        &self.names
    }
}
