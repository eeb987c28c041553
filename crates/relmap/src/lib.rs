//! # relmap
//!
//! Dependency ordering and path translation over a relational schema map.
//!
//! ## Features
//!
//! - **Schema map**: db/obj entities and bidirectional joins, declared in code
//!   or JSON ([`DataMap`]) and compiled into a read-only [`Catalog`]
//! - **Entity sorting**: commit/delete-safe ordering of entities, of arbitrary
//!   items resolving to an entity, and of rows of self-referencing tables
//!   ([`EntitySorter`])
//! - **Path translation**: dotted object/db paths with outer join and split
//!   alias markers resolved into join chains, memoized per query
//!   ([`PathTranslator`])
//!
//! ## Example
//!
//! ```
//! use relmap::{Catalog, DataMap, PathTranslator, TranslatorContext};
//! use std::sync::Arc;
//!
//! let json = r#"{
//!   "name": "gallery",
//!   "db_entities": [
//!     { "name": "ARTIST", "attributes": [
//!         { "name": "ARTIST_ID", "primary_key": true }, { "name": "ARTIST_NAME" } ] },
//!     { "name": "PAINTING", "attributes": [
//!         { "name": "PAINTING_ID", "primary_key": true }, { "name": "ARTIST_ID" } ] }
//!   ],
//!   "obj_entities": [
//!     { "name": "Painting", "db_entity": "PAINTING",
//!       "relationships": [ { "name": "toArtist", "target": "Artist", "db_path": "toArtist" } ] },
//!     { "name": "Artist", "db_entity": "ARTIST",
//!       "attributes": [ { "name": "name", "db_path": "ARTIST_NAME" } ] }
//!   ],
//!   "joins": [
//!     { "condition": { "single": { "left": "ARTIST_ID", "right": "ARTIST_ID" } },
//!       "entities": ["ARTIST", "PAINTING"],
//!       "names": ["paintingArray", "toArtist"],
//!       "to_many": "one_to_many" }
//!   ]
//! }"#;
//!
//! let catalog = Arc::new(Catalog::from_data_map(DataMap::from_json(json)?)?);
//! let painting = catalog.require_obj_entity("Painting")?;
//!
//! let translator = PathTranslator::new(Arc::new(TranslatorContext::new(Arc::clone(&catalog))));
//! let result = translator.translate_path(painting, "toArtist.name", None)?;
//! assert_eq!(result.final_path(), "toArtist.ARTIST_NAME");
//! # Ok::<(), relmap::MapError>(())
//! ```

pub mod error;
pub mod map;
pub mod sort;
pub mod translate;

#[cfg(test)]
mod testing;

pub use error::{MapError, MapResult};
pub use map::{Catalog, DataMap, DbAttribute, DbEntity, DbJoin, DbRelationship, ObjEntity};
pub use sort::{EntitySorter, ReflexiveRow, SorterConfig};
pub use translate::{JoinType, PathTranslationResult, PathTranslator, TranslatorContext};
