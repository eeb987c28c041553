//! Translation of dotted attribute/relationship paths into join chains.
//!
//! A path is a `.`-separated list of segments. A segment may carry a split
//! alias (`toArtist#a`) and an outer join marker (`toArtist+`). Object paths
//! are resolved against obj entities and expanded through their db mapping;
//! database paths navigate db relationships directly. Joins needed by a path
//! are registered in the [`TranslatorContext`] table tree.

mod cache;
mod context;
mod processor;
mod result;
mod segment;

#[cfg(test)]
mod tests;

pub use cache::PathCacheStats;
pub use context::{JoinType, TableTree, TableTreeNode, TranslatorContext};
pub use result::{PathTerminal, PathTranslationResult};
pub use segment::{OUTER_JOIN_INDICATOR, PathSegment, SPLIT_PATH_INDICATOR, split_path};

use crate::error::{MapError, MapResult};
use crate::map::{DbEntity, ObjEntity};
use cache::ResultCache;
use processor::PathWalk;
use std::sync::Arc;

/// Memoizing path translator bound to one [`TranslatorContext`].
///
/// Results are cached per `(parent path, entity, path)` for the lifetime of
/// the translator, failures included. Concurrent translations of one key
/// compute it once and share the result.
#[derive(Debug)]
pub struct PathTranslator {
    context: Arc<TranslatorContext>,
    obj_cache: ResultCache,
    db_cache: ResultCache,
}

impl PathTranslator {
    pub fn new(context: Arc<TranslatorContext>) -> Self {
        Self {
            context,
            obj_cache: ResultCache::default(),
            db_cache: ResultCache::default(),
        }
    }

    pub fn context(&self) -> &Arc<TranslatorContext> {
        &self.context
    }

    /// Translate an object path starting at `entity`.
    pub fn translate_path(
        &self,
        entity: &ObjEntity,
        path: &str,
        parent: Option<&str>,
    ) -> MapResult<Arc<PathTranslationResult>> {
        let key = cache_key(parent, &entity.name, path);
        self.obj_cache.get_or_translate(key, || {
            tracing::debug!(
                target: "relmap.translate",
                entity = %entity.name,
                path,
                parent = parent.unwrap_or(""),
                "object path cache miss"
            );
            let mut walk = PathWalk::new(self.context.catalog());
            let result = walk.obj_path(entity, path, parent.unwrap_or(""))?;
            self.context.commit(&walk.into_joins());
            Ok(result)
        })
    }

    /// Translate a database path starting at `entity`.
    ///
    /// With `flattened` set, a terminal relationship is always joined.
    /// The flag is not part of the cache key.
    pub fn translate_db_path(
        &self,
        entity: &DbEntity,
        path: &str,
        parent: Option<&str>,
        flattened: bool,
    ) -> MapResult<Arc<PathTranslationResult>> {
        let key = cache_key(parent, &entity.name, path);
        self.db_cache.get_or_translate(key, || {
            tracing::debug!(
                target: "relmap.translate",
                entity = %entity.name,
                path,
                parent = parent.unwrap_or(""),
                flattened,
                "db path cache miss"
            );
            let mut walk = PathWalk::new(self.context.catalog());
            let result = walk.db_path(entity, path, parent.unwrap_or(""), flattened)?;
            self.context.commit(&walk.into_joins());
            Ok(result)
        })
    }

    /// Translate `relationship.path.PK_COLUMN` (or a bare `PK_COLUMN`) to the
    /// primary key column of the entity at the end of the relationship path.
    ///
    /// The final relationship is always joined: LEFT OUTER when the prefix ends
    /// with `+`, INNER otherwise. Not cached.
    pub fn translate_id_path(
        &self,
        entity: &ObjEntity,
        path: &str,
    ) -> MapResult<Arc<PathTranslationResult>> {
        let (prefix, pk_name) = path.rsplit_once('.').unwrap_or(("", path));

        if prefix.is_empty() {
            if pk_name.is_empty() {
                return Err(MapError::invalid_path("can't translate empty dbid path"));
            }
            let db = self.context.catalog().db_entity_for(entity)?;
            let pk = db.attribute(pk_name).ok_or_else(|| no_such_pk(path))?;
            return Ok(Arc::new(PathTranslationResult::new(
                String::new(),
                PathTerminal::Id(pk.clone()),
            )));
        }

        let resolved = self.translate_path(entity, prefix, None)?;
        let relationship = resolved.db_relationship().ok_or_else(|| {
            MapError::path_resolution(format!(
                "can't translate dbid path '{path}': can't resolve relationship '{prefix}'"
            ))
        })?;

        let join_type = JoinType::for_outer(prefix.ends_with(OUTER_JOIN_INDICATOR));
        self.context
            .add_join_table(resolved.final_path(), relationship, join_type);

        let pk = relationship
            .target_entity()
            .attribute(pk_name)
            .ok_or_else(|| no_such_pk(path))?;
        Ok(Arc::new(PathTranslationResult::new(
            resolved.final_path().to_string(),
            PathTerminal::Id(pk.clone()),
        )))
    }

    pub fn obj_cache_stats(&self) -> PathCacheStats {
        self.obj_cache.stats()
    }

    pub fn db_cache_stats(&self) -> PathCacheStats {
        self.db_cache.stats()
    }
}

fn cache_key(parent: Option<&str>, entity: &str, path: &str) -> String {
    format!("{}.{}.{}", parent.unwrap_or(""), entity, path)
}

fn no_such_pk(path: &str) -> MapError {
    MapError::path_resolution(format!("can't translate dbid path '{path}': no such pk"))
}
