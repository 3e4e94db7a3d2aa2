//! Expression tokenizer
//!
//! Splits raw query-parameter strings into [`FilterAtom`]s and
//! [`SortAtom`]s. Grammars are compiled once per dialect from the operator
//! catalog. Strings that do not match are dropped or rejected according to
//! the [`MalformedPolicy`].
//!
//! # Example
//!
//! ```rust
//! use user_service::filter::{Dialect, Operator, Tokenizer};
//!
//! let atoms = Tokenizer::new(Dialect::Criteria).tokenize(["age>18", "???"]);
//! assert_eq!(atoms.len(), 1);
//! let atom = &atoms.as_slice()[0];
//! assert_eq!(atom.field, "age");
//! assert_eq!(atom.operator, Operator::GreaterThan);
//! assert_eq!(atom.value, "18");
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::atom::{AtomList, FilterAtom, SortAtom, SortDirection};
use super::dialect::{Dialect, MalformedPolicy};
use super::error::{FilterError, FilterResult};
use super::operator::Operator;

fn operator_group(dialect: Dialect) -> String {
    dialect
        .operator_tokens()
        .into_iter()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("|")
}

static CRITERIA_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    let ops = operator_group(Dialect::Criteria);
    Regex::new(&format!(r"^(\w+?)({ops})(.+)$")).expect("criteria grammar is valid")
});

static SPECIFICATION_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    let ops = operator_group(Dialect::Specification);
    Regex::new(&format!(r#"^(\w+?)({ops})([*"']?)(.+?)([*"']?)$"#))
        .expect("specification grammar is valid")
});

static SORT_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\w+)(?:[:,](asc|desc))?$").expect("sort grammar is valid")
});

/// Turns raw expressions into atoms for one dialect
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    dialect: Dialect,
}

impl Tokenizer {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn grammar(&self) -> &'static Regex {
        match self.dialect {
            Dialect::Criteria => &CRITERIA_GRAMMAR,
            Dialect::Specification => &SPECIFICATION_GRAMMAR,
        }
    }

    /// Parse a single expression, `None` if it does not match the grammar
    #[must_use]
    pub fn parse(&self, raw: &str) -> Option<FilterAtom> {
        let caps = self.grammar().captures(raw.trim())?;
        let operator = Operator::from_token(caps.get(2)?.as_str())?;
        let field = caps.get(1)?.as_str();

        if self.dialect.captures_markers() {
            let marker = |i: usize| caps.get(i).and_then(|m| m.as_str().chars().next());
            Some(
                FilterAtom::new(field, operator, caps.get(4)?.as_str())
                    .with_markers(marker(3), marker(5)),
            )
        } else {
            Some(FilterAtom::new(field, operator, caps.get(3)?.as_str()))
        }
    }

    /// Tokenize leniently: malformed expressions are dropped
    pub fn tokenize<I, S>(&self, raws: I) -> AtomList
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raws.into_iter()
            .filter_map(|raw| {
                let raw = raw.as_ref();
                let atom = self.parse(raw);
                if atom.is_none() {
                    debug!(dialect = ?self.dialect, expression = raw, "Dropping malformed filter expression");
                }
                atom
            })
            .collect()
    }

    /// Tokenize strictly: the first malformed expression fails the call
    pub fn tokenize_strict<I, S>(&self, raws: I) -> FilterResult<AtomList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raws.into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                self.parse(raw)
                    .ok_or_else(|| FilterError::MalformedExpression(raw.to_string()))
            })
            .collect()
    }

    /// Tokenize under the given policy
    pub fn tokenize_with<I, S>(&self, raws: I, policy: MalformedPolicy) -> FilterResult<AtomList>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match policy {
            MalformedPolicy::Ignore => Ok(self.tokenize(raws)),
            MalformedPolicy::Reject => self.tokenize_strict(raws),
        }
    }
}

/// Parse one sort expression: `field`, `field:dir` or `field,dir`
#[must_use]
pub fn parse_sort(raw: &str) -> Option<SortAtom> {
    let caps = SORT_GRAMMAR.captures(raw.trim())?;
    let direction = caps
        .get(2)
        .and_then(|m| SortDirection::parse(m.as_str()))
        .unwrap_or_default();
    Some(SortAtom::new(caps.get(1)?.as_str(), direction))
}

/// Tokenize sort expressions, dropping malformed ones
pub fn tokenize_sort<I, S>(raws: I) -> Vec<SortAtom>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raws.into_iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            let atom = parse_sort(raw);
            if atom.is_none() {
                debug!(expression = raw, "Dropping malformed sort expression");
            }
            atom
        })
        .collect()
}

/// Tokenize sort expressions under the given policy
pub fn tokenize_sort_with<I, S>(raws: I, policy: MalformedPolicy) -> FilterResult<Vec<SortAtom>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match policy {
        MalformedPolicy::Ignore => Ok(tokenize_sort(raws)),
        MalformedPolicy::Reject => raws
            .into_iter()
            .map(|raw| {
                let raw = raw.as_ref();
                parse_sort(raw).ok_or_else(|| FilterError::MalformedExpression(raw.to_string()))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> Tokenizer {
        Tokenizer::new(Dialect::Criteria)
    }

    fn specification() -> Tokenizer {
        Tokenizer::new(Dialect::Specification)
    }

    #[test]
    fn test_criteria_equals() {
        let atom = criteria().parse("firstName:John").unwrap();
        assert_eq!(atom, FilterAtom::new("firstName", Operator::Equals, "John"));
    }

    #[test]
    fn test_criteria_every_simple_operator() {
        let cases = [
            ("age:1", Operator::Equals),
            ("age!1", Operator::NotEquals),
            ("age>1", Operator::GreaterThan),
            ("age<1", Operator::LessThan),
            ("age~1", Operator::Like),
        ];
        for (raw, expected) in cases {
            assert_eq!(criteria().parse(raw).unwrap().operator, expected, "{raw}");
        }
    }

    #[test]
    fn test_criteria_keeps_markers_in_value() {
        let atom = criteria().parse("firstName:*oh*").unwrap();
        assert_eq!(atom.value, "*oh*");
        assert_eq!(atom.prefix, None);
    }

    #[test]
    fn test_first_operator_splits_field() {
        // The lazy field group stops at the first operator token.
        let atom = criteria().parse("email:a:b").unwrap();
        assert_eq!(atom.field, "email");
        assert_eq!(atom.value, "a:b");
    }

    #[test]
    fn test_garbage_yields_no_atoms() {
        assert!(criteria().tokenize(["???"]).is_empty());
        assert!(specification().tokenize(["???", "", "name:"]).is_empty());
    }

    #[test]
    fn test_tokenize_preserves_order_and_drops_malformed() {
        let atoms = criteria().tokenize(["b:2", "nonsense", "a:1"]);
        let fields: Vec<&str> = atoms.iter().map(|a| a.field.as_str()).collect();
        assert_eq!(fields, vec!["b", "a"]);
    }

    #[test]
    fn test_tokenize_strict_reports_first_malformed() {
        let err = criteria().tokenize_strict(["a:1", "???", "!!!"]).unwrap_err();
        assert_eq!(err, FilterError::MalformedExpression("???".to_string()));
    }

    #[test]
    fn test_tokenize_with_policy() {
        assert_eq!(
            criteria()
                .tokenize_with(["x"], MalformedPolicy::Ignore)
                .unwrap()
                .len(),
            0
        );
        assert!(criteria()
            .tokenize_with(["x"], MalformedPolicy::Reject)
            .is_err());
    }

    #[test]
    fn test_specification_wildcard_markers() {
        let contains = specification().parse("firstName:*oh*").unwrap();
        assert_eq!(contains.value, "oh");
        assert_eq!(contains.prefix, Some('*'));
        assert_eq!(contains.suffix, Some('*'));

        let starts = specification().parse("firstName:Jo*").unwrap();
        assert_eq!(starts.value, "Jo");
        assert_eq!(starts.prefix, None);
        assert_eq!(starts.suffix, Some('*'));

        let ends = specification().parse("firstName:*hn").unwrap();
        assert_eq!(ends.value, "hn");
        assert_eq!(ends.prefix, Some('*'));
        assert_eq!(ends.suffix, None);
    }

    #[test]
    fn test_specification_quotes() {
        let atom = specification().parse("lastName:\"Smith\"").unwrap();
        assert_eq!(atom.value, "Smith");
        assert_eq!(atom.prefix, Some('"'));
        assert_eq!(atom.suffix, Some('"'));
    }

    #[test]
    fn test_specification_keeps_leading_minus() {
        let atom = specification().parse("id>-5").unwrap();
        assert_eq!(atom.value, "-5");
        assert_eq!(atom.prefix, None);
    }

    #[test]
    fn test_parse_sort_forms() {
        assert_eq!(
            parse_sort("firstName,asc"),
            Some(SortAtom::new("firstName", SortDirection::Asc))
        );
        assert_eq!(
            parse_sort("lastName:DESC"),
            Some(SortAtom::new("lastName", SortDirection::Desc))
        );
        assert_eq!(
            parse_sort("id"),
            Some(SortAtom::new("id", SortDirection::Asc))
        );
        assert_eq!(parse_sort("id;drop"), None);
    }

    #[test]
    fn test_tokenize_sort_keeps_compound_order() {
        let sort = tokenize_sort(["firstName,asc", "bogus sort", "lastName,desc"]);
        assert_eq!(
            sort,
            vec![
                SortAtom::new("firstName", SortDirection::Asc),
                SortAtom::new("lastName", SortDirection::Desc),
            ]
        );
    }

    #[test]
    fn test_tokenize_sort_with_reject() {
        let err = tokenize_sort_with(["id,sideways"], MalformedPolicy::Reject).unwrap_err();
        assert!(matches!(err, FilterError::MalformedExpression(_)));
    }
}
