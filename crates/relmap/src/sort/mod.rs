//! Commit and delete ordering of db entities.
//!
//! [`EntitySorter`] turns the catalog's to-one relationships into a dependency
//! graph, collapses cycles into components and ranks the components
//! topologically. Collections of entities (or anything that resolves to one)
//! are then sorted by component rank.
//!
//! ```
//! use relmap::{Catalog, DataMap, DbEntity, EntitySorter, SorterConfig};
//! use relmap::map::{JoinCondition, ToDependentPkSemantics, ToManySemantics};
//! use std::sync::Arc;
//!
//! let mut map = DataMap::new("shop")
//!     .with_db_entity(DbEntity::new("ORDER_LINE").with_primary_key(&["ID"]).with_columns(&["ORDER_ID"]))
//!     .with_db_entity(DbEntity::new("ORDERS").with_primary_key(&["ID"]));
//! let join = map
//!     .join_builder()
//!     .condition(JoinCondition::single("ORDER_ID", "ID"))
//!     .entities(["ORDER_LINE", "ORDERS"])
//!     .names([Some("toOrder"), Some("lines")])
//!     .to_many_semantics(ToManySemantics::ManyToOne)
//!     .to_dep_pk_semantics(ToDependentPkSemantics::None)
//!     .build()?;
//! map.add_join(join);
//!
//! let catalog = Arc::new(Catalog::from_data_map(map)?);
//! let sorter = EntitySorter::new(SorterConfig::default());
//! sorter.set_catalog(Arc::clone(&catalog));
//!
//! let mut entities: Vec<_> = catalog.db_entities().cloned().collect();
//! sorter.sort_db_entities(&mut entities, false)?;
//! assert_eq!(entities[0].name, "ORDERS");
//! # Ok::<(), relmap::MapError>(())
//! ```

mod config;
mod index;
mod rows;


pub use config::{ReflexivePolicy, SorterConfig, TieBreak};
pub use index::{ComponentRecord, SorterIndex};
pub use rows::ReflexiveRow;

use crate::error::{MapError, MapResult};
use crate::map::{Catalog, DbEntity};
use std::cmp::Reverse;
use std::sync::{Arc, Mutex, RwLock};

/// Sorts entities, rows and objects into a referentially safe order.
///
/// The index is built lazily by the first sort, or explicitly with
/// [`reindex`](Self::reindex), and published as an immutable snapshot: readers
/// see either the previous index or the complete new one. Replacing the
/// catalog drops the index.
#[derive(Debug, Default)]
pub struct EntitySorter {
    config: SorterConfig,
    catalog: RwLock<Option<Arc<Catalog>>>,
    index: RwLock<Option<Arc<SorterIndex>>>,
    reindex_lock: Mutex<()>,
}

impl EntitySorter {
    pub fn new(config: SorterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// A sorter already bound to `catalog`.
    pub fn with_catalog(catalog: Arc<Catalog>, config: SorterConfig) -> Self {
        let sorter = Self::new(config);
        sorter.set_catalog(catalog);
        sorter
    }

    pub fn config(&self) -> &SorterConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog
            .read()
            .expect("entity sorter catalog lock poisoned")
            .clone()
    }

    /// Bind a new catalog. The current index is dropped.
    pub fn set_catalog(&self, catalog: Arc<Catalog>) {
        let mut current = self
            .catalog
            .write()
            .expect("entity sorter catalog lock poisoned");
        *current = Some(catalog);
        self.index
            .write()
            .expect("entity sorter index lock poisoned")
            .take();
        tracing::debug!(target: "relmap.sort", "entity sorter invalidated: catalog replaced");
    }

    /// Drop the current index; the next sort rebuilds it.
    pub fn invalidate(&self) {
        let _catalog = self
            .catalog
            .read()
            .expect("entity sorter catalog lock poisoned");
        let dropped = self
            .index
            .write()
            .expect("entity sorter index lock poisoned")
            .take();
        if dropped.is_some() {
            tracing::debug!(target: "relmap.sort", "entity sorter invalidated");
        }
    }

    pub fn is_indexed(&self) -> bool {
        self.index
            .read()
            .expect("entity sorter index lock poisoned")
            .is_some()
    }

    /// Rebuild the index from the current catalog.
    ///
    /// Reindexing is exclusive. The index is built without blocking readers
    /// and installed only if the catalog was not replaced in the meantime.
    pub fn reindex(&self) -> MapResult<Arc<SorterIndex>> {
        let _guard = self
            .reindex_lock
            .lock()
            .expect("entity sorter reindex mutex poisoned");
        self.rebuild()
    }

    /// The current index, building it first if needed.
    pub fn index(&self) -> MapResult<Arc<SorterIndex>> {
        if let Some(index) = self.installed() {
            return Ok(index);
        }
        let _guard = self
            .reindex_lock
            .lock()
            .expect("entity sorter reindex mutex poisoned");
        // Another caller may have finished a reindex while we waited.
        match self.installed() {
            Some(index) => Ok(index),
            None => self.rebuild(),
        }
    }

    fn installed(&self) -> Option<Arc<SorterIndex>> {
        self.index
            .read()
            .expect("entity sorter index lock poisoned")
            .clone()
    }

    fn rebuild(&self) -> MapResult<Arc<SorterIndex>> {
        let catalog = self.catalog().ok_or_else(|| {
            MapError::precondition("entity sorter has no catalog; reindex before sorting")
        })?;

        tracing::debug!(
            target: "relmap.sort",
            entities = catalog.db_entities().count(),
            joins = catalog.joins().len(),
            "reindex started"
        );
        let index = Arc::new(SorterIndex::build(&catalog, &self.config));

        let current = self
            .catalog
            .read()
            .expect("entity sorter catalog lock poisoned");
        let unchanged = current
            .as_ref()
            .is_some_and(|c| Arc::ptr_eq(c, &catalog));
        if unchanged {
            *self
                .index
                .write()
                .expect("entity sorter index lock poisoned") = Some(Arc::clone(&index));
        }
        drop(current);

        tracing::debug!(
            target: "relmap.sort",
            entities = index.entity_count(),
            arcs = index.arc_count(),
            components = index.components().len(),
            installed = unchanged,
            "reindex finished"
        );
        Ok(index)
    }

    /// Component rank of `entity` in the current index.
    pub fn component_index(&self, entity: &str) -> MapResult<usize> {
        self.index()?
            .component_index(entity)
            .ok_or_else(|| unknown_entity(entity))
    }

    /// Stable in-place sort by component rank.
    ///
    /// Insert order puts masters first; `delete_order` reverses the component
    /// order. Entities of one component keep their input order in both modes.
    /// Nothing is reordered when an entity is unknown to the index.
    pub fn sort_db_entities(
        &self,
        entities: &mut [Arc<DbEntity>],
        delete_order: bool,
    ) -> MapResult<()> {
        self.sort_by_entity(entities, |e| e.name.as_str(), delete_order)
    }

    /// [`sort_db_entities`](Self::sort_db_entities) for items that resolve to an entity name.
    pub fn sort_by_entity<T, F>(
        &self,
        items: &mut [T],
        entity_of: F,
        delete_order: bool,
    ) -> MapResult<()>
    where
        F: Fn(&T) -> &str,
    {
        let index = self.index()?;
        if let Some(unknown) = items
            .iter()
            .map(&entity_of)
            .find(|name| index.component(name).is_none())
        {
            return Err(unknown_entity(unknown));
        }

        let rank = |item: &T| index.component_index(entity_of(item)).unwrap_or(usize::MAX);
        if delete_order {
            items.sort_by_key(|item| Reverse(rank(item)));
        } else {
            items.sort_by_key(rank);
        }
        Ok(())
    }

    /// Order rows of one table so referenced rows come before referencing ones.
    ///
    /// Only matters for entities with a recorded self-referencing relationship;
    /// rows of other entities are left as they are. Rows referencing each other
    /// in a cycle fail with [`MapError::RowCycle`].
    pub fn sort_rows_for_entity<R: ReflexiveRow>(
        &self,
        entity: &str,
        rows: &mut Vec<R>,
        delete_order: bool,
    ) -> MapResult<()> {
        let index = self.index()?;
        if index.component(entity).is_none() {
            return Err(unknown_entity(entity));
        }
        self::rows::sort_rows(
            entity,
            index.reflexive_relationships(entity),
            rows,
            delete_order,
        )
    }
}

fn unknown_entity(entity: &str) -> MapError {
    MapError::schema_resolution(format!("entity '{entity}' is not part of the sorter index"))
}
