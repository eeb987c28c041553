use crate::error::{MapError, MapResult};
use std::fmt;

/// Suffix marking a segment as a LEFT OUTER join.
pub const OUTER_JOIN_INDICATOR: char = '+';

/// Separator between a segment name and its split-path alias.
pub const SPLIT_PATH_INDICATOR: char = '#';

/// One `name[#alias][+]` component of a dotted path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment<'a> {
    pub name: &'a str,
    pub alias: Option<&'a str>,
    pub outer: bool,
}

impl<'a> PathSegment<'a> {
    pub fn parse(raw: &'a str) -> MapResult<Self> {
        let (rest, outer) = match raw.strip_suffix(OUTER_JOIN_INDICATOR) {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        let (name, alias) = match rest.split_once(SPLIT_PATH_INDICATOR) {
            Some((name, alias)) => (name, Some(alias)),
            None => (rest, None),
        };

        if name.is_empty() {
            return Err(MapError::invalid_path(format!("empty segment in '{raw}'")));
        }
        if alias.is_some_and(str::is_empty) {
            return Err(MapError::invalid_path(format!("empty alias in segment '{raw}'")));
        }
        let stray = |s: &str| s.contains(OUTER_JOIN_INDICATOR) || s.contains(SPLIT_PATH_INDICATOR);
        if stray(name) || alias.is_some_and(stray) {
            return Err(MapError::invalid_path(format!("malformed segment '{raw}'")));
        }

        Ok(Self { name, alias, outer })
    }

    /// Segments carrying an alias or an outer join marker only make sense on
    /// relationships.
    pub fn has_markers(&self) -> bool {
        self.outer || self.alias.is_some()
    }

    /// This segment's markers applied to another name.
    pub fn with_name(&self, name: &'a str) -> Self {
        Self { name, ..*self }
    }
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)?;
        if let Some(alias) = self.alias {
            write!(f, "{SPLIT_PATH_INDICATOR}{alias}")?;
        }
        if self.outer {
            write!(f, "{OUTER_JOIN_INDICATOR}")?;
        }
        Ok(())
    }
}

/// Split a dotted path into segments.
pub fn split_path(path: &str) -> MapResult<Vec<PathSegment<'_>>> {
    if path.is_empty() {
        return Err(MapError::invalid_path("empty path"));
    }
    path.split('.').map(PathSegment::parse).collect()
}

/// `base.segment`, or just `segment` at the root.
pub(crate) fn append_path(base: &str, segment: impl fmt::Display) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}
