//! Parsed, not yet validated, filter and sort atoms

use std::fmt;

use serde::{Deserialize, Serialize};

use super::operator::Operator;

/// One `(field, operator, value)` unit as written by the caller
///
/// The field is still raw text and the value has not been coerced; both are
/// checked when the atom is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterAtom {
    pub field: String,
    pub operator: Operator,
    pub value: String,
    /// Marker directly before the value (`*`, `"` or `'`)
    pub prefix: Option<char>,
    /// Marker directly after the value
    pub suffix: Option<char>,
}

impl FilterAtom {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            prefix: None,
            suffix: None,
        }
    }

    #[must_use]
    pub fn with_markers(mut self, prefix: Option<char>, suffix: Option<char>) -> Self {
        self.prefix = prefix;
        self.suffix = suffix;
        self
    }
}

impl fmt::Display for FilterAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.field, self.operator.token().unwrap_or(":"))?;
        if let Some(prefix) = self.prefix {
            write!(f, "{}", prefix)?;
        }
        write!(f, "{}", self.value)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix)?;
        }
        Ok(())
    }
}

/// Ordered collection of atoms for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtomList(Vec<FilterAtom>);

impl AtomList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, atom: FilterAtom) {
        self.0.push(atom);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterAtom> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[FilterAtom] {
        &self.0
    }
}

impl FromIterator<FilterAtom> for AtomList {
    fn from_iter<I: IntoIterator<Item = FilterAtom>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AtomList {
    type Item = &'a FilterAtom;
    type IntoIter = std::slice::Iter<'a, FilterAtom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// SQL `ORDER BY` keyword
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Parse a direction word, ignoring case
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if word.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// One `(field, direction)` sort key as written by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortAtom {
    pub field: String,
    pub direction: SortDirection,
}

impl SortAtom {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_display_restores_markers() {
        let atom = FilterAtom::new("firstName", Operator::Equals, "jo")
            .with_markers(Some('*'), Some('*'));
        assert_eq!(atom.to_string(), "firstName:*jo*");
    }

    #[test]
    fn test_atom_list_preserves_order() {
        let list: AtomList = ["a", "b", "c"]
            .into_iter()
            .map(|f| FilterAtom::new(f, Operator::Equals, "1"))
            .collect();
        let fields: Vec<&str> = list.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!(SortDirection::parse("ASC"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::parse("up"), None);
        assert_eq!(SortDirection::Desc.as_sql(), "DESC");
    }
}
