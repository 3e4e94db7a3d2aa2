//! Operator catalog
//!
//! The catalog is the single table describing every comparison operator:
//! its literal token (if it is spelled directly in an expression), whether
//! it belongs to the simple subset accepted by the criteria dialect, and the
//! kind of comparison it compiles to. The tokenizer builds its operator
//! alternation from this table.

use std::fmt;

/// Comparison operator of a filter atom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `field:value`
    Equals,
    /// `field!value`
    NotEquals,
    /// `field>value`
    GreaterThan,
    /// `field<value`
    LessThan,
    /// `field~pattern` with SQL `LIKE` wildcards
    Like,
    /// `field:value*` (specification dialect)
    StartsWith,
    /// `field:*value` (specification dialect)
    EndsWith,
    /// `field:*value*` (specification dialect)
    Contains,
}

/// What an operator compares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semantics {
    /// Exact match
    Equality,
    /// Exact mismatch
    Inequality,
    /// Strict ordering against the value
    Ordering,
    /// Textual pattern match
    Pattern,
}

/// One row of the operator catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSpec {
    pub operator: Operator,
    /// Literal token; `None` for operators derived from value markers
    pub token: Option<&'static str>,
    /// Member of the simple subset
    pub simple: bool,
    pub semantics: Semantics,
}

/// The operator catalog, in tokenizer match order
pub const CATALOG: &[OperatorSpec] = &[
    OperatorSpec {
        operator: Operator::Equals,
        token: Some(":"),
        simple: true,
        semantics: Semantics::Equality,
    },
    OperatorSpec {
        operator: Operator::NotEquals,
        token: Some("!"),
        simple: true,
        semantics: Semantics::Inequality,
    },
    OperatorSpec {
        operator: Operator::GreaterThan,
        token: Some(">"),
        simple: true,
        semantics: Semantics::Ordering,
    },
    OperatorSpec {
        operator: Operator::LessThan,
        token: Some("<"),
        simple: true,
        semantics: Semantics::Ordering,
    },
    OperatorSpec {
        operator: Operator::Like,
        token: Some("~"),
        simple: true,
        semantics: Semantics::Pattern,
    },
    OperatorSpec {
        operator: Operator::StartsWith,
        token: None,
        simple: false,
        semantics: Semantics::Pattern,
    },
    OperatorSpec {
        operator: Operator::EndsWith,
        token: None,
        simple: false,
        semantics: Semantics::Pattern,
    },
    OperatorSpec {
        operator: Operator::Contains,
        token: None,
        simple: false,
        semantics: Semantics::Pattern,
    },
];

impl Operator {
    /// Catalog row for this operator
    #[must_use]
    pub fn spec(self) -> &'static OperatorSpec {
        CATALOG
            .iter()
            .find(|spec| spec.operator == self)
            .unwrap_or(&CATALOG[0])
    }

    #[must_use]
    pub fn token(self) -> Option<&'static str> {
        self.spec().token
    }

    #[must_use]
    pub fn is_simple(self) -> bool {
        self.spec().simple
    }

    #[must_use]
    pub fn semantics(self) -> Semantics {
        self.spec().semantics
    }

    /// Look up an operator by its literal token
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        CATALOG
            .iter()
            .find(|spec| spec.token == Some(token))
            .map(|spec| spec.operator)
    }

    /// Canonical name, used when the operator has no token
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Like => "like",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token() {
            Some(token) => write!(f, "{}", token),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Tokens of the given operators, longest first so that a multi-character
/// token is never shadowed by one of its prefixes in a regex alternation.
#[must_use]
pub fn token_alternation(operators: impl IntoIterator<Item = Operator>) -> Vec<&'static str> {
    let mut tokens: Vec<&'static str> = operators
        .into_iter()
        .filter_map(Operator::token)
        .collect();
    tokens.sort_by(|a, b| b.len().cmp(&a.len()));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_operator_has_a_catalog_row() {
        for op in [
            Operator::Equals,
            Operator::NotEquals,
            Operator::GreaterThan,
            Operator::LessThan,
            Operator::Like,
            Operator::StartsWith,
            Operator::EndsWith,
            Operator::Contains,
        ] {
            assert_eq!(op.spec().operator, op);
        }
    }

    #[test]
    fn test_simple_subset() {
        let simple: Vec<Operator> = CATALOG
            .iter()
            .filter(|spec| spec.simple)
            .map(|spec| spec.operator)
            .collect();
        assert_eq!(
            simple,
            vec![
                Operator::Equals,
                Operator::NotEquals,
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::Like,
            ]
        );
    }

    #[test]
    fn test_from_token() {
        assert_eq!(Operator::from_token(":"), Some(Operator::Equals));
        assert_eq!(Operator::from_token("!"), Some(Operator::NotEquals));
        assert_eq!(Operator::from_token(">"), Some(Operator::GreaterThan));
        assert_eq!(Operator::from_token("<"), Some(Operator::LessThan));
        assert_eq!(Operator::from_token("~"), Some(Operator::Like));
        assert_eq!(Operator::from_token("="), None);
    }

    #[test]
    fn test_derived_operators_have_no_token() {
        assert!(Operator::StartsWith.token().is_none());
        assert!(Operator::EndsWith.token().is_none());
        assert!(Operator::Contains.token().is_none());
        assert_eq!(Operator::Contains.to_string(), "contains");
    }

    #[test]
    fn test_token_alternation_skips_derived_operators() {
        let tokens = token_alternation(CATALOG.iter().map(|spec| spec.operator));
        assert_eq!(tokens.len(), 5);
        assert!(tokens.contains(&":"));
        assert!(tokens.contains(&"~"));
    }

    #[test]
    fn test_semantics() {
        assert_eq!(Operator::Equals.semantics(), Semantics::Equality);
        assert_eq!(Operator::NotEquals.semantics(), Semantics::Inequality);
        assert_eq!(Operator::LessThan.semantics(), Semantics::Ordering);
        assert_eq!(Operator::Contains.semantics(), Semantics::Pattern);
    }
}
