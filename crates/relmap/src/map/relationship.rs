use super::catalog::RuntimeNames;
use super::entity::{DbAttribute, DbEntity};
use super::join::{DbJoin, Direction};
use crate::error::{MapError, MapResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Lookup of db entities by name, used while compiling joins.
pub trait MappingNamespace {
    fn db_entity(&self, name: &str) -> Option<&Arc<DbEntity>>;
}

/// A [`DbJoin`] resolved against live entities.
///
/// Holds both navigation directions; [`DbRelationship`] handles point into it.
#[derive(Debug)]
pub struct CompiledJoin {
    declaration: DbJoin,
    entities: [Arc<DbEntity>; 2],
    names: [String; 2],
    runtime: [bool; 2],
    /// Columns of `entities[0]` and `entities[1]`, aligned with the condition pairs.
    columns: [Vec<DbAttribute>; 2],
}

impl DbJoin {
    /// Resolve entity and column names and name both directions.
    ///
    /// A direction without a mapped name gets a synthetic name from `names`
    /// and is flagged runtime-only: it is navigable but never registered on
    /// its source entity.
    pub fn compile(
        &self,
        namespace: &impl MappingNamespace,
        names: &RuntimeNames,
    ) -> MapResult<Arc<CompiledJoin>> {
        if self.condition.pairs().is_empty() {
            return Err(MapError::configuration(format!(
                "join {} -> {} has no column pairs",
                self.entities[0], self.entities[1]
            )));
        }
        let resolve = |direction: Direction| -> MapResult<Arc<DbEntity>> {
            let name = self.entity(direction);
            namespace.db_entity(name).cloned().ok_or_else(|| {
                MapError::schema_resolution(format!(
                    "join {} -> {}: no db entity named '{}'",
                    self.entities[0], self.entities[1], name
                ))
            })
        };
        let left = resolve(Direction::Left)?;
        let right = resolve(Direction::Right)?;

        let mut left_columns = Vec::with_capacity(self.condition.pairs().len());
        let mut right_columns = Vec::with_capacity(self.condition.pairs().len());
        for pair in self.condition.pairs() {
            left_columns.push(column(&left, &pair.left)?);
            right_columns.push(column(&right, &pair.right)?);
        }

        let mut resolved_names: [String; 2] = Default::default();
        let mut runtime = [false; 2];
        for direction in Direction::BOTH {
            let i = direction.index();
            match self.name(direction) {
                Some(name) => resolved_names[i] = name.to_string(),
                None => {
                    resolved_names[i] = names.next_name();
                    runtime[i] = true;
                }
            }
        }

        Ok(Arc::new(CompiledJoin {
            declaration: self.clone(),
            entities: [left, right],
            names: resolved_names,
            runtime,
            columns: [left_columns, right_columns],
        }))
    }
}

fn column(entity: &DbEntity, name: &str) -> MapResult<DbAttribute> {
    entity.attribute(name).cloned().ok_or_else(|| {
        MapError::schema_resolution(format!(
            "no column '{}' in db entity '{}'",
            name, entity.name
        ))
    })
}

impl CompiledJoin {
    pub fn declaration(&self) -> &DbJoin {
        &self.declaration
    }

    pub fn entity(&self, direction: Direction) -> &Arc<DbEntity> {
        &self.entities[direction.index()]
    }

    pub fn name(&self, direction: Direction) -> &str {
        &self.names[direction.index()]
    }

    pub fn is_runtime(&self, direction: Direction) -> bool {
        self.runtime[direction.index()]
    }

    pub fn columns(&self, direction: Direction) -> &[DbAttribute] {
        &self.columns[direction.index()]
    }

    /// The relationship navigating this join in `direction`.
    pub fn relationship(self: &Arc<Self>, direction: Direction) -> DbRelationship {
        DbRelationship {
            join: Arc::clone(self),
            direction,
        }
    }
}

impl fmt::Display for CompiledJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.declaration, f)
    }
}

/// Source and target columns of a relationship, by join shape.
#[derive(Debug, Clone, Copy)]
pub enum JoinAttributes<'a> {
    Single {
        source: &'a DbAttribute,
        target: &'a DbAttribute,
    },
    Multi {
        source: &'a [DbAttribute],
        target: &'a [DbAttribute],
    },
}

/// One navigable side of a join.
///
/// A cheap handle (shared join + direction). Two handles are equal when they
/// point at the same compiled join in the same direction, so
/// `rel.reverse().reverse() == rel` always holds.
#[derive(Clone)]
pub struct DbRelationship {
    join: Arc<CompiledJoin>,
    direction: Direction,
}

impl DbRelationship {
    pub fn name(&self) -> &str {
        self.join.name(self.direction)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn join(&self) -> &Arc<CompiledJoin> {
        &self.join
    }

    /// Name of the data map that owns the join.
    pub fn data_map(&self) -> &str {
        &self.join.declaration.data_map
    }

    pub fn source_entity(&self) -> &Arc<DbEntity> {
        self.join.entity(self.direction)
    }

    pub fn target_entity(&self) -> &Arc<DbEntity> {
        self.join.entity(self.direction.opposite())
    }

    pub fn reverse(&self) -> DbRelationship {
        DbRelationship {
            join: Arc::clone(&self.join),
            direction: self.direction.opposite(),
        }
    }

    pub fn is_to_many(&self) -> bool {
        self.join.declaration.to_many.is_to_many(self.direction)
    }

    pub fn is_to_dependent_pk(&self) -> bool {
        self.join
            .declaration
            .to_dependent_pk
            .is_to_dep_pk(self.direction)
    }

    /// True when the reverse side is to-dependent-PK, i.e. this side leads
    /// from the dependent row to its master.
    pub fn is_to_master_pk(&self) -> bool {
        self.join
            .declaration
            .to_dependent_pk
            .is_to_master_pk_from(self.direction)
    }

    /// True when every target column is part of the target primary key.
    pub fn is_to_pk(&self) -> bool {
        self.target_attributes().iter().all(|a| a.primary_key)
    }

    /// Synthetic side of a join direction that has no mapped name.
    pub fn is_runtime(&self) -> bool {
        self.join.is_runtime(self.direction)
    }

    pub fn is_reflexive(&self) -> bool {
        self.source_entity().name == self.target_entity().name
    }

    pub fn source_attributes(&self) -> &[DbAttribute] {
        self.join.columns(self.direction)
    }

    pub fn target_attributes(&self) -> &[DbAttribute] {
        self.join.columns(self.direction.opposite())
    }

    /// `(source, target)` column pairs in condition order.
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&DbAttribute, &DbAttribute)> {
        self.source_attributes()
            .iter()
            .zip(self.target_attributes())
    }

    pub fn join_attributes(&self) -> JoinAttributes<'_> {
        let source = self.source_attributes();
        let target = self.target_attributes();
        if self.join.declaration.condition.is_multi() {
            JoinAttributes::Multi { source, target }
        } else {
            JoinAttributes::Single {
                source: &source[0],
                target: &target[0],
            }
        }
    }

    pub fn contains_source_attribute(&self, attribute: &DbAttribute) -> bool {
        match self.join_attributes() {
            JoinAttributes::Single { source, .. } => source == attribute,
            JoinAttributes::Multi { source, .. } => source.contains(attribute),
        }
    }
}

impl PartialEq for DbRelationship {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.join, &other.join) && self.direction == other.direction
    }
}

impl Eq for DbRelationship {}

impl Hash for DbRelationship {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.join).hash(state);
        self.direction.hash(state);
    }
}

impl fmt::Debug for DbRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbRelationship")
            .field("name", &self.name())
            .field("source", &self.source_entity().name)
            .field("target", &self.target_entity().name)
            .field("to_many", &self.is_to_many())
            .field("to_dependent_pk", &self.is_to_dependent_pk())
            .field("runtime", &self.is_runtime())
            .finish()
    }
}

impl fmt::Display for DbRelationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.source_entity().name, self.name())
    }
}
