/// How ties between independent components are broken during reindex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TieBreak {
    /// The component whose earliest entity was declared first goes first.
    #[default]
    InsertionOrder,
    /// The component with the lexicographically smallest entity name goes first.
    EntityName,
}

/// Which self-referencing relationships are recorded per entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReflexivePolicy {
    /// Only the first reflexive relationship found for an entity is kept.
    #[default]
    FirstPerEntity,
    /// Every reflexive relationship of an entity is kept, each once.
    EveryRelationship,
}

/// Configuration for [`EntitySorter`](super::EntitySorter).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SorterConfig {
    pub tie_break: TieBreak,
    pub reflexive_policy: ReflexivePolicy,
}

impl SorterConfig {
    /// Defaults: insertion-order tie-break, first reflexive relationship per entity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_reflexive_policy(mut self, policy: ReflexivePolicy) -> Self {
        self.reflexive_policy = policy;
        self
    }
}
