use super::join::{DbJoin, JoinCondition, ToDependentPkSemantics, ToManySemantics};
use crate::error::{MapError, MapResult};

/// Builder for [`DbJoin`] declarations.
///
/// Every field is required; `build()` reports what is missing or malformed.
///
/// ```
/// use relmap::map::{DbJoinBuilder, JoinCondition, ToManySemantics, ToDependentPkSemantics};
///
/// let join = DbJoinBuilder::new()
///     .condition(JoinCondition::single("ARTIST_ID", "ARTIST_ID"))
///     .entities(["ARTIST", "PAINTING"])
///     .names([Some("paintingArray"), Some("toArtist")])
///     .to_many_semantics(ToManySemantics::OneToMany)
///     .to_dep_pk_semantics(ToDependentPkSemantics::None)
///     .data_map("gallery")
///     .build()
///     .unwrap();
/// assert_eq!(join.entities[1], "PAINTING");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DbJoinBuilder {
    condition: Option<JoinCondition>,
    entities: Option<Vec<String>>,
    names: Option<Vec<Option<String>>>,
    to_dependent_pk: Option<ToDependentPkSemantics>,
    to_many: Option<ToManySemantics>,
    data_map: Option<String>,
}

impl DbJoinBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, condition: JoinCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// The left and right entity names.
    pub fn entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = Some(entities.into_iter().map(Into::into).collect());
        self
    }

    /// The left and right relationship names; `None` leaves a direction unmapped.
    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(|n| n.map(Into::into)).collect());
        self
    }

    pub fn to_dep_pk_semantics(mut self, semantics: ToDependentPkSemantics) -> Self {
        self.to_dependent_pk = Some(semantics);
        self
    }

    pub fn to_many_semantics(mut self, semantics: ToManySemantics) -> Self {
        self.to_many = Some(semantics);
        self
    }

    pub fn data_map(mut self, name: impl Into<String>) -> Self {
        self.data_map = Some(name.into());
        self
    }

    pub fn build(self) -> MapResult<DbJoin> {
        let mut missing = Vec::new();
        if self.condition.is_none() {
            missing.push("condition");
        }
        if self.entities.is_none() {
            missing.push("entities");
        }
        if self.names.is_none() {
            missing.push("names");
        }
        if self.to_dependent_pk.is_none() {
            missing.push("to_dependent_pk");
        }
        if self.to_many.is_none() {
            missing.push("to_many");
        }
        if self.data_map.is_none() {
            missing.push("data_map");
        }

        let (
            Some(condition),
            Some(entities),
            Some(names),
            Some(to_dependent_pk),
            Some(to_many),
            Some(data_map),
        ) = (
            self.condition,
            self.entities,
            self.names,
            self.to_dependent_pk,
            self.to_many,
            self.data_map,
        )
        else {
            return Err(MapError::configuration(format!(
                "missing parameters to create join: {}",
                missing.join(", ")
            )));
        };

        let entities: [String; 2] = entities.try_into().map_err(|e: Vec<String>| {
            MapError::configuration(format!(
                "wrong parameter count: a join needs 2 entities, got {}",
                e.len()
            ))
        })?;
        let names: [Option<String>; 2] = names.try_into().map_err(|n: Vec<Option<String>>| {
            MapError::configuration(format!(
                "wrong parameter count: a join needs 2 names, got {}",
                n.len()
            ))
        })?;
        if condition.pairs().is_empty() {
            return Err(MapError::configuration(format!(
                "join {} -> {} has no column pairs",
                entities[0], entities[1]
            )));
        }

        Ok(DbJoin {
            condition,
            entities,
            names,
            to_many,
            to_dependent_pk,
            data_map,
        })
    }
}
