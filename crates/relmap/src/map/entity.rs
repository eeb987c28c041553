use serde::{Deserialize, Serialize};

/// A column of a [`DbEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DbAttribute {
    /// Column name.
    pub name: String,
    /// Whether this column is part of the primary key.
    #[serde(default)]
    pub primary_key: bool,
    /// Whether this column is NOT NULL.
    #[serde(default)]
    pub mandatory: bool,
}

impl DbAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: false,
            mandatory: false,
        }
    }

    /// A mandatory primary key column.
    pub fn pk(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: true,
            mandatory: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }
}

/// A database table.
///
/// Relationships are not stored on the entity itself; the compiled
/// [`Catalog`](crate::Catalog) keeps them per source entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbEntity {
    /// Table name.
    pub name: String,
    /// Columns in declaration order.
    #[serde(default)]
    pub attributes: Vec<DbAttribute>,
}

impl DbEntity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a column to this entity.
    pub fn add_attribute(&mut self, attribute: DbAttribute) {
        self.attributes.push(attribute);
    }

    /// Add plain (non-key) columns.
    pub fn with_columns(mut self, columns: &[&str]) -> Self {
        for col in columns {
            self.attributes.push(DbAttribute::new(*col));
        }
        self
    }

    /// Add primary key columns, or flag existing columns as primary key.
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        for col in columns {
            match self.attributes.iter_mut().find(|a| a.name == *col) {
                Some(attr) => {
                    attr.primary_key = true;
                    attr.mandatory = true;
                }
                None => self.attributes.push(DbAttribute::pk(*col)),
            }
        }
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&DbAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Primary key columns in declaration order.
    pub fn primary_keys(&self) -> impl Iterator<Item = &DbAttribute> {
        self.attributes.iter().filter(|a| a.primary_key)
    }
}

/// An object property mapped to a (possibly flattened) column path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjAttribute {
    pub name: String,
    /// Dotted db path; the last component is a column, any before it are
    /// relationships (`toArtist.ARTIST_NAME`).
    pub db_path: String,
}

impl ObjAttribute {
    pub fn is_flattened(&self) -> bool {
        self.db_path.contains('.')
    }
}

/// An object relationship mapped onto one or more db relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjRelationship {
    pub name: String,
    /// Target object entity name.
    pub target: String,
    /// Dotted db relationship path (`artistExhibitArray.toExhibit`).
    pub db_path: String,
}

impl ObjRelationship {
    pub fn is_flattened(&self) -> bool {
        self.db_path.contains('.')
    }

    pub fn db_path_components(&self) -> impl Iterator<Item = &str> {
        self.db_path.split('.')
    }
}

/// An object-level view of a [`DbEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjEntity {
    pub name: String,
    /// Name of the backing db entity.
    pub db_entity: String,
    #[serde(default)]
    pub attributes: Vec<ObjAttribute>,
    #[serde(default)]
    pub relationships: Vec<ObjRelationship>,
}

impl ObjEntity {
    pub fn new(name: impl Into<String>, db_entity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            db_entity: db_entity.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_attribute(mut self, name: impl Into<String>, db_path: impl Into<String>) -> Self {
        self.attributes.push(ObjAttribute {
            name: name.into(),
            db_path: db_path.into(),
        });
        self
    }

    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        db_path: impl Into<String>,
    ) -> Self {
        self.relationships.push(ObjRelationship {
            name: name.into(),
            target: target.into(),
            db_path: db_path.into(),
        });
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&ObjAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&ObjRelationship> {
        self.relationships.iter().find(|r| r.name == name)
    }
}
