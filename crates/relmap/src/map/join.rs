use crate::error::{MapError, MapResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One of the two navigation directions of a join.
///
/// `Left` navigates from `entities[0]` to `entities[1]`, `Right` the other way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Left, Direction::Right];

    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Index into the two-element arrays of a [`DbJoin`].
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// A column of the left entity matched with a column of the right entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnPair {
    pub left: String,
    pub right: String,
}

impl ColumnPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }

    /// The column on the `direction` source side.
    pub fn source(&self, direction: Direction) -> &str {
        match direction {
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    /// The column on the `direction` target side.
    pub fn target(&self, direction: Direction) -> &str {
        self.source(direction.opposite())
    }
}

/// Join condition shape: one column pair or several.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    Single(ColumnPair),
    Multi(Vec<ColumnPair>),
}

impl JoinCondition {
    pub fn single(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::Single(ColumnPair::new(left, right))
    }

    pub fn multi<I, L, R>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, R)>,
        L: Into<String>,
        R: Into<String>,
    {
        Self::Multi(
            pairs
                .into_iter()
                .map(|(l, r)| ColumnPair::new(l, r))
                .collect(),
        )
    }

    /// All pairs, whatever the shape.
    pub fn pairs(&self) -> &[ColumnPair] {
        match self {
            Self::Single(pair) => std::slice::from_ref(pair),
            Self::Multi(pairs) => pairs,
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }
}

/// Per-direction to-many flags of a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToManySemantics {
    OneToOne,
    /// The left side is to-many.
    OneToMany,
    /// The right side is to-many.
    ManyToOne,
    ManyToMany,
}

impl ToManySemantics {
    pub fn from_flags(left_to_many: bool, right_to_many: bool) -> Self {
        match (left_to_many, right_to_many) {
            (false, false) => Self::OneToOne,
            (true, false) => Self::OneToMany,
            (false, true) => Self::ManyToOne,
            (true, true) => Self::ManyToMany,
        }
    }

    pub fn is_to_many(self, direction: Direction) -> bool {
        match direction {
            Direction::Left => matches!(self, Self::OneToMany | Self::ManyToMany),
            Direction::Right => matches!(self, Self::ManyToOne | Self::ManyToMany),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::OneToOne => "ONE_TO_ONE",
            Self::OneToMany => "ONE_TO_MANY",
            Self::ManyToOne => "MANY_TO_ONE",
            Self::ManyToMany => "MANY_TO_MANY",
        }
    }
}

/// Which side of a join, if any, points at a dependent primary key.
///
/// At most one side can: a row whose primary key is also its foreign key has a
/// single master.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToDependentPkSemantics {
    #[default]
    None,
    /// The left side is to-dependent-PK.
    Left,
    /// The right side is to-dependent-PK.
    Right,
}

impl ToDependentPkSemantics {
    pub fn from_flags(left: bool, right: bool) -> MapResult<Self> {
        match (left, right) {
            (false, false) => Ok(Self::None),
            (true, false) => Ok(Self::Left),
            (false, true) => Ok(Self::Right),
            (true, true) => Err(MapError::configuration(
                "both sides of a join cannot be to-dependent-pk",
            )),
        }
    }

    pub fn is_to_dep_pk(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (Self::Left, Direction::Left) | (Self::Right, Direction::Right)
        )
    }

    /// True when exactly one direction is to-dependent-PK, so a master side exists.
    pub fn is_to_master_pk(self) -> bool {
        !matches!(self, Self::None)
    }

    /// True when navigating in `direction` leads from the dependent row to its master.
    pub fn is_to_master_pk_from(self, direction: Direction) -> bool {
        self.is_to_dep_pk(direction.opposite())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }
}

/// Declaration of a relationship between two db entities.
///
/// Both navigation directions share the join condition. Index 0 of `entities`
/// and `names` is the left side, index 1 the right side. A `None` name means
/// the direction is not part of the mapping and gets a synthetic runtime name
/// when compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbJoin {
    pub condition: JoinCondition,
    pub entities: [String; 2],
    pub names: [Option<String>; 2],
    pub to_many: ToManySemantics,
    #[serde(default)]
    pub to_dependent_pk: ToDependentPkSemantics,
    /// Name of the owning data map, assigned when the join is added to one.
    #[serde(skip)]
    pub data_map: String,
}

impl DbJoin {
    /// Source entity name for `direction`.
    pub fn entity(&self, direction: Direction) -> &str {
        &self.entities[direction.index()]
    }

    /// Relationship name for `direction`, if mapped.
    pub fn name(&self, direction: Direction) -> Option<&str> {
        self.names[direction.index()].as_deref()
    }

    /// Serialization order: left entity name, then (when both are named) left
    /// relationship name.
    pub fn serialization_order(&self, other: &Self) -> Ordering {
        let by_entity = self.entities[0].cmp(&other.entities[0]);
        match (by_entity, &self.names[0], &other.names[0]) {
            (Ordering::Equal, Some(a), Some(b)) => a.cmp(b),
            _ => by_entity,
        }
    }
}

impl fmt::Display for DbJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DbJoin : {}", self.to_many.name())?;
        for pair in self.condition.pairs() {
            write!(
                f,
                " ({}.{}, {}.{})",
                self.entities[0], pair.left, self.entities[1], pair.right
            )?;
        }
        Ok(())
    }
}
