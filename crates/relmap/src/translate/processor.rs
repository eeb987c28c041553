use super::context::{JoinType, PendingJoin};
use super::result::{PathTerminal, PathTranslationResult};
use super::segment::{PathSegment, append_path, split_path};
use crate::error::{MapError, MapResult};
use crate::map::{Catalog, DbEntity, DbRelationship, ObjEntity, ObjRelationship};

/// Walks one path against the catalog, collecting the joins it needs.
///
/// Nothing is registered here; the caller commits [`into_joins`](Self::into_joins)
/// once the whole path resolved.
pub(crate) struct PathWalk<'a> {
    catalog: &'a Catalog,
    joins: Vec<PendingJoin>,
}

impl<'a> PathWalk<'a> {
    pub(crate) fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            joins: Vec::new(),
        }
    }

    pub(crate) fn into_joins(self) -> Vec<PendingJoin> {
        self.joins
    }

    pub(crate) fn db_path(
        &mut self,
        entity: &'a DbEntity,
        path: &str,
        base: &str,
        flattened: bool,
    ) -> MapResult<PathTranslationResult> {
        let segments = split_path(path)?;
        let Some((last, init)) = segments.split_last() else {
            return Err(MapError::invalid_path("empty path"));
        };

        let mut entity = entity;
        let mut current = base.to_string();
        for segment in init {
            if entity.has_attribute(segment.name) {
                return Err(attribute_not_last(segment.name, path));
            }
            let rel = self.db_relationship(entity, segment.name, path)?;
            current = self.join(rel, *segment, &current);
            entity = rel.target_entity().as_ref();
        }

        if let Some(attribute) = entity.attribute(last.name) {
            if last.has_markers() {
                return Err(markers_on_attribute(last.name, path));
            }
            return Ok(PathTranslationResult::new(
                append_path(&current, last.name),
                PathTerminal::Attribute(attribute.clone()),
            ));
        }
        let rel = self.db_relationship(entity, last.name, path)?;
        Ok(self.terminate(rel, *last, &current, flattened))
    }

    pub(crate) fn obj_path(
        &mut self,
        entity: &'a ObjEntity,
        path: &str,
        base: &str,
    ) -> MapResult<PathTranslationResult> {
        let segments = split_path(path)?;
        let Some((last, init)) = segments.split_last() else {
            return Err(MapError::invalid_path("empty path"));
        };

        let mut obj = entity;
        let mut db = self.catalog.db_entity_for(obj)?.as_ref();
        let mut current = base.to_string();
        for segment in init {
            if obj.attribute(segment.name).is_some() {
                return Err(attribute_not_last(segment.name, path));
            }
            let rel = obj
                .relationship(segment.name)
                .ok_or_else(|| unresolved(&obj.name, segment.name, path))?;
            (db, current) = self.obj_hops(db, rel, *segment, &current)?;
            obj = self.catalog.require_obj_entity(&rel.target)?.as_ref();
        }

        if let Some(attribute) = obj.attribute(last.name) {
            if last.has_markers() {
                return Err(markers_on_attribute(last.name, path));
            }
            return self.db_path(db, &attribute.db_path, &current, true);
        }
        let rel = obj
            .relationship(last.name)
            .ok_or_else(|| unresolved(&obj.name, last.name, path))?;
        let (init_hops, last_hop) = match rel.db_path.rsplit_once('.') {
            Some((init, last)) => (init, last),
            None => ("", rel.db_path.as_str()),
        };
        let (db, current) = if init_hops.is_empty() {
            (db, current)
        } else {
            self.hops(db, init_hops, &rel.db_path, *last, &current)?
        };
        let db_rel = self.db_relationship(db, last_hop, &rel.db_path)?;
        Ok(self.terminate(db_rel, last.with_name(last_hop), &current, false))
    }

    /// Join every db hop of an obj relationship crossed in the middle of a path.
    fn obj_hops(
        &mut self,
        db: &'a DbEntity,
        rel: &'a ObjRelationship,
        segment: PathSegment<'_>,
        base: &str,
    ) -> MapResult<(&'a DbEntity, String)> {
        self.hops(db, &rel.db_path, &rel.db_path, segment, base)
    }

    /// Join each relationship of the dotted `hops`, carrying `segment`'s markers.
    fn hops(
        &mut self,
        db: &'a DbEntity,
        hops: &'a str,
        db_path: &str,
        segment: PathSegment<'_>,
        base: &str,
    ) -> MapResult<(&'a DbEntity, String)> {
        let mut db = db;
        let mut current = base.to_string();
        for hop in hops.split('.') {
            let db_rel = self.db_relationship(db, hop, db_path)?;
            current = self.join(db_rel, segment.with_name(hop), &current);
            db = db_rel.target_entity().as_ref();
        }
        Ok((db, current))
    }

    fn db_relationship(
        &self,
        entity: &DbEntity,
        name: &str,
        path: &str,
    ) -> MapResult<&'a DbRelationship> {
        self.catalog
            .relationship(&entity.name, name)
            .ok_or_else(|| unresolved(&entity.name, name, path))
    }

    fn join(&mut self, rel: &DbRelationship, segment: PathSegment<'_>, base: &str) -> String {
        let path = append_path(base, segment);
        self.joins.push(PendingJoin {
            path: path.clone(),
            relationship: rel.clone(),
            join_type: JoinType::for_outer(segment.outer),
        });
        path
    }

    /// A path ending on a relationship. To-one relationships to the target
    /// primary key resolve to the source foreign key without a join.
    fn terminate(
        &mut self,
        rel: &DbRelationship,
        segment: PathSegment<'_>,
        base: &str,
        force_join: bool,
    ) -> PathTranslationResult {
        if force_join || rel.is_to_many() || !rel.is_to_pk() {
            let path = self.join(rel, segment, base);
            let columns = rel.target_entity().primary_keys().cloned().collect();
            PathTranslationResult::new(
                path.clone(),
                PathTerminal::Relationship {
                    relationship: rel.clone(),
                    joined: true,
                    column_path: path,
                    columns,
                },
            )
        } else {
            PathTranslationResult::new(
                append_path(base, segment),
                PathTerminal::Relationship {
                    relationship: rel.clone(),
                    joined: false,
                    column_path: base.to_string(),
                    columns: rel.source_attributes().to_vec(),
                },
            )
        }
    }
}

fn unresolved(entity: &str, component: &str, path: &str) -> MapError {
    MapError::path_resolution(format!(
        "can't resolve path component '{component}' of '{path}' in entity '{entity}'"
    ))
}

fn attribute_not_last(attribute: &str, path: &str) -> MapError {
    MapError::path_resolution(format!(
        "attribute '{attribute}' must be the last component of '{path}'"
    ))
}

fn markers_on_attribute(attribute: &str, path: &str) -> MapError {
    MapError::invalid_path(format!(
        "attribute '{attribute}' in '{path}' can't carry join markers"
    ))
}
