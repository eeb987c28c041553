use crate::map::{Catalog, DbRelationship};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How a joined table is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

impl JoinType {
    pub fn for_outer(outer: bool) -> Self {
        if outer { Self::LeftOuter } else { Self::Inner }
    }
}

/// A table reachable from the query root through a db path.
#[derive(Debug, Clone)]
pub struct TableTreeNode {
    path: String,
    alias: String,
    relationship: Option<DbRelationship>,
    join_type: JoinType,
}

impl TableTreeNode {
    /// Db path from the root; empty for the root itself.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The relationship joining this table; `None` for the root.
    pub fn relationship(&self) -> Option<&DbRelationship> {
        self.relationship.as_ref()
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

/// Ordered set of joined tables, keyed by db path.
///
/// The root is `t0`; every new path gets the next alias.
#[derive(Debug, Clone)]
pub struct TableTree {
    nodes: Vec<TableTreeNode>,
    by_path: HashMap<String, usize>,
}

impl Default for TableTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TableTree {
    pub fn new() -> Self {
        let root = TableTreeNode {
            path: String::new(),
            alias: "t0".to_string(),
            relationship: None,
            join_type: JoinType::Inner,
        };
        Self {
            nodes: vec![root],
            by_path: HashMap::from([(String::new(), 0)]),
        }
    }

    /// Register a join; returns false when `path` is already present.
    pub fn add_join_table(
        &mut self,
        path: &str,
        relationship: &DbRelationship,
        join_type: JoinType,
    ) -> bool {
        if self.by_path.contains_key(path) {
            return false;
        }
        let alias = format!("t{}", self.nodes.len());
        tracing::trace!(
            target: "relmap.translate",
            path,
            alias = %alias,
            relationship = %relationship,
            ?join_type,
            "join table registered"
        );
        self.by_path.insert(path.to_string(), self.nodes.len());
        self.nodes.push(TableTreeNode {
            path: path.to_string(),
            alias,
            relationship: Some(relationship.clone()),
            join_type,
        });
        true
    }

    pub fn node(&self, path: &str) -> Option<&TableTreeNode> {
        self.by_path.get(path).map(|&i| &self.nodes[i])
    }

    pub fn alias(&self, path: &str) -> Option<&str> {
        self.node(path).map(TableTreeNode::alias)
    }

    pub fn root(&self) -> &TableTreeNode {
        &self.nodes[0]
    }

    /// Joined tables in registration order, root excluded.
    pub fn joins(&self) -> &[TableTreeNode] {
        &self.nodes[1..]
    }

    /// Number of tables, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root is present.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }
}

/// A join collected while walking a path, not yet registered.
#[derive(Debug, Clone)]
pub(crate) struct PendingJoin {
    pub(crate) path: String,
    pub(crate) relationship: DbRelationship,
    pub(crate) join_type: JoinType,
}

/// Per-query state shared by path translations: the catalog and the table tree.
#[derive(Debug)]
pub struct TranslatorContext {
    catalog: Arc<Catalog>,
    table_tree: Mutex<TableTree>,
}

impl TranslatorContext {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            table_tree: Mutex::new(TableTree::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn add_join_table(
        &self,
        path: &str,
        relationship: &DbRelationship,
        join_type: JoinType,
    ) -> bool {
        self.table_tree
            .lock()
            .expect("table tree mutex poisoned")
            .add_join_table(path, relationship, join_type)
    }

    /// Register every join of one resolved path under a single lock.
    pub(crate) fn commit(&self, joins: &[PendingJoin]) {
        if joins.is_empty() {
            return;
        }
        let mut tree = self.table_tree.lock().expect("table tree mutex poisoned");
        for join in joins {
            tree.add_join_table(&join.path, &join.relationship, join.join_type);
        }
    }

    /// A copy of the current table tree.
    pub fn table_tree(&self) -> TableTree {
        self.table_tree
            .lock()
            .expect("table tree mutex poisoned")
            .clone()
    }

    pub fn join_count(&self) -> usize {
        self.table_tree
            .lock()
            .expect("table tree mutex poisoned")
            .joins()
            .len()
    }
}
