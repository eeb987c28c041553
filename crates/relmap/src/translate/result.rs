use super::segment::append_path;
use crate::map::{DbAttribute, DbRelationship};

/// What a translated path ends on.
#[derive(Debug, Clone)]
pub enum PathTerminal {
    /// A column of the table at the parent of the final path.
    Attribute(DbAttribute),
    /// A relationship. `columns` live in the table at `column_path`: the
    /// joined target table (its primary key) or the source table (the foreign
    /// key) when the relationship was not joined.
    Relationship {
        relationship: DbRelationship,
        joined: bool,
        column_path: String,
        columns: Vec<DbAttribute>,
    },
    /// A primary key column reached through an id path.
    Id(DbAttribute),
}

/// Outcome of translating one path.
#[derive(Debug, Clone)]
pub struct PathTranslationResult {
    final_path: String,
    terminal: PathTerminal,
}

impl PathTranslationResult {
    pub(crate) fn new(final_path: String, terminal: PathTerminal) -> Self {
        Self {
            final_path,
            terminal,
        }
    }

    /// Full db path of the terminal, parent path included.
    pub fn final_path(&self) -> &str {
        &self.final_path
    }

    pub fn terminal(&self) -> &PathTerminal {
        &self.terminal
    }

    pub fn db_relationship(&self) -> Option<&DbRelationship> {
        match &self.terminal {
            PathTerminal::Relationship { relationship, .. } => Some(relationship),
            _ => None,
        }
    }

    pub fn is_joined(&self) -> bool {
        matches!(self.terminal, PathTerminal::Relationship { joined: true, .. })
    }

    /// Resolved columns.
    pub fn attributes(&self) -> Vec<&DbAttribute> {
        match &self.terminal {
            PathTerminal::Attribute(attribute) | PathTerminal::Id(attribute) => vec![attribute],
            PathTerminal::Relationship { columns, .. } => columns.iter().collect(),
        }
    }

    /// Dotted db path of each resolved column.
    pub fn attribute_paths(&self) -> Vec<String> {
        match &self.terminal {
            PathTerminal::Attribute(_) => vec![self.final_path.clone()],
            PathTerminal::Id(attribute) => vec![append_path(&self.final_path, &attribute.name)],
            PathTerminal::Relationship {
                column_path,
                columns,
                ..
            } => columns
                .iter()
                .map(|c| append_path(column_path, &c.name))
                .collect(),
        }
    }
}
