use super::builder::DbJoinBuilder;
use super::entity::{DbEntity, ObjEntity};
use super::join::DbJoin;
use crate::error::MapResult;
use serde::{Deserialize, Serialize};

/// A named group of declarations: db entities, obj entities and joins.
///
/// This is the serde descriptor a [`Catalog`](crate::Catalog) is compiled from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataMap {
    pub name: String,
    #[serde(default)]
    pub db_entities: Vec<DbEntity>,
    #[serde(default)]
    pub obj_entities: Vec<ObjEntity>,
    #[serde(default)]
    pub joins: Vec<DbJoin>,
}

impl DataMap {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_db_entity(&mut self, entity: DbEntity) {
        self.db_entities.push(entity);
    }

    pub fn with_db_entity(mut self, entity: DbEntity) -> Self {
        self.add_db_entity(entity);
        self
    }

    pub fn add_obj_entity(&mut self, entity: ObjEntity) {
        self.obj_entities.push(entity);
    }

    pub fn with_obj_entity(mut self, entity: ObjEntity) -> Self {
        self.add_obj_entity(entity);
        self
    }

    /// Add a join; it becomes owned by this map.
    pub fn add_join(&mut self, mut join: DbJoin) {
        join.data_map = self.name.clone();
        self.joins.push(join);
    }

    pub fn with_join(mut self, join: DbJoin) -> Self {
        self.add_join(join);
        self
    }

    /// A join builder with the data map already filled in.
    pub fn join_builder(&self) -> DbJoinBuilder {
        DbJoinBuilder::new().data_map(self.name.clone())
    }

    pub fn from_json(json: &str) -> MapResult<Self> {
        let mut map: DataMap = serde_json::from_str(json)?;
        for join in &mut map.joins {
            join.data_map = map.name.clone();
        }
        Ok(map)
    }

    /// Pretty JSON with joins in serialization order.
    pub fn to_json_pretty(&self) -> MapResult<String> {
        let mut joins: Vec<&DbJoin> = self.joins.iter().collect();
        joins.sort_by(|a, b| a.serialization_order(b));

        #[derive(Serialize)]
        struct Ordered<'a> {
            name: &'a str,
            db_entities: &'a [DbEntity],
            obj_entities: &'a [ObjEntity],
            joins: Vec<&'a DbJoin>,
        }

        Ok(serde_json::to_string_pretty(&Ordered {
            name: &self.name,
            db_entities: &self.db_entities,
            obj_entities: &self.obj_entities,
            joins,
        })?)
    }
}
