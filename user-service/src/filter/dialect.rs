//! Filter dialects
//!
//! Two dialects share one tokenizer and one compiler. A [`Dialect`] decides
//! which operators the grammar recognizes, whether marker characters around
//! the value are captured, and how compiled comparisons are combined.

use serde::{Deserialize, Serialize};

use super::operator::{token_alternation, Operator, CATALOG};

/// How the compiler combines the comparisons of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationRule {
    /// Every comparison is ANDed, left to right
    ChainedAnd,
    /// Comparisons on the same field are ORed; the per-field groups are ANDed
    GroupedByField,
}

/// A filter grammar plus its combination rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// `search-with-criteria`: simple operators, chained AND, no markers
    Criteria,
    /// `search-with-specifications`: full catalog, grouped OR/AND, markers
    Specification,
}

impl Dialect {
    #[must_use]
    pub const fn combination(self) -> CombinationRule {
        match self {
            Self::Criteria => CombinationRule::ChainedAnd,
            Self::Specification => CombinationRule::GroupedByField,
        }
    }

    /// Whether `*`, `"` and `'` around the value are split off as markers
    #[must_use]
    pub const fn captures_markers(self) -> bool {
        matches!(self, Self::Specification)
    }

    /// Whether an operator may appear in a compiled atom of this dialect
    #[must_use]
    pub fn accepts(self, operator: Operator) -> bool {
        match self {
            Self::Criteria => operator.is_simple(),
            Self::Specification => true,
        }
    }

    /// Literal tokens recognized by the grammar, longest first
    #[must_use]
    pub fn operator_tokens(self) -> Vec<&'static str> {
        token_alternation(
            CATALOG
                .iter()
                .map(|spec| spec.operator)
                .filter(|op| self.accepts(*op)),
        )
    }
}

/// What happens to an expression that does not match the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop it silently (logged at debug level)
    #[default]
    Ignore,
    /// Fail the whole request
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criteria_rejects_derived_operators() {
        assert!(Dialect::Criteria.accepts(Operator::Like));
        assert!(!Dialect::Criteria.accepts(Operator::Contains));
        assert!(Dialect::Specification.accepts(Operator::Contains));
    }

    #[test]
    fn test_both_dialects_share_literal_tokens() {
        let mut criteria = Dialect::Criteria.operator_tokens();
        let mut spec = Dialect::Specification.operator_tokens();
        criteria.sort_unstable();
        spec.sort_unstable();
        assert_eq!(criteria, spec);
    }

    #[test]
    fn test_combination_rules() {
        assert_eq!(Dialect::Criteria.combination(), CombinationRule::ChainedAnd);
        assert_eq!(
            Dialect::Specification.combination(),
            CombinationRule::GroupedByField
        );
        assert!(!Dialect::Criteria.captures_markers());
    }

    #[test]
    fn test_malformed_policy_deserializes_lowercase() {
        let policy: MalformedPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(policy, MalformedPolicy::Reject);
        assert_eq!(MalformedPolicy::default(), MalformedPolicy::Ignore);
    }
}
