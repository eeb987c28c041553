//! Schema metadata: db/obj entities, joins and their compiled relationships.
//!
//! Declarations ([`DataMap`], [`DbJoin`]) are plain serde data. [`Catalog::compile`]
//! resolves them into shared, read-only [`DbRelationship`] handles.

mod builder;
mod catalog;
mod data_map;
mod entity;
mod join;
mod relationship;


pub use builder::DbJoinBuilder;
pub use catalog::{Catalog, RuntimeNames};
pub use data_map::DataMap;
pub use entity::{DbAttribute, DbEntity, ObjAttribute, ObjEntity, ObjRelationship};
pub use join::{
    ColumnPair, DbJoin, Direction, JoinCondition, ToDependentPkSemantics, ToManySemantics,
};
pub use relationship::{CompiledJoin, DbRelationship, JoinAttributes, MappingNamespace};
