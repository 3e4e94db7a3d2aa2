//! Predicate compiler
//!
//! Resolves each atom against the allow-listed fields, checks the operator
//! against the dialect and the field kind, coerces the value, and combines
//! the resulting comparisons according to the dialect's
//! [`CombinationRule`].

use std::marker::PhantomData;

use super::atom::{AtomList, FilterAtom};
use super::dialect::{CombinationRule, Dialect};
use super::error::{FilterError, FilterResult};
use super::field::FilterField;
use super::operator::{Operator, Semantics};
use super::predicate::{Comparison, Predicate};

const WILDCARD: char = '*';

/// Compiles atom lists into predicates over fields of type `F`
#[derive(Debug, Clone, Copy)]
pub struct PredicateCompiler<F> {
    dialect: Dialect,
    _field: PhantomData<fn() -> F>,
}

impl<F: FilterField> PredicateCompiler<F> {
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            _field: PhantomData,
        }
    }

    /// Compile every atom, failing on the first invalid one in input order
    ///
    /// An empty list compiles to [`Predicate::Always`].
    pub fn compile(&self, atoms: &AtomList) -> FilterResult<Predicate<F>> {
        match self.dialect.combination() {
            CombinationRule::ChainedAnd => atoms.iter().try_fold(Predicate::Always, |acc, atom| {
                let (field, comparison) = self.compile_atom(atom)?;
                Ok(acc.and(Predicate::compare(field, comparison)))
            }),
            CombinationRule::GroupedByField => {
                let mut groups: Vec<(F, Vec<Predicate<F>>)> = Vec::new();
                for atom in atoms {
                    let (field, comparison) = self.compile_atom(atom)?;
                    let predicate = Predicate::compare(field, comparison);
                    match groups.iter_mut().find(|(f, _)| *f == field) {
                        Some((_, branch)) => branch.push(predicate),
                        None => groups.push((field, vec![predicate])),
                    }
                }
                Ok(Predicate::all(
                    groups.into_iter().map(|(_, branch)| Predicate::any(branch)),
                ))
            }
        }
    }

    /// Resolve, check and coerce a single atom
    pub fn compile_atom(&self, atom: &FilterAtom) -> FilterResult<(F, Comparison)> {
        let field = F::from_name(&atom.field)
            .ok_or_else(|| FilterError::UnknownField(atom.field.clone()))?;
        let name = field.name();
        let kind = field.kind();

        let operator = effective_operator(atom).ok_or_else(|| FilterError::InvalidValue {
            field: name.to_string(),
            value: atom.to_string(),
            expected: format!("no wildcard with operator '{}'", atom.operator),
        })?;

        let unsupported = || FilterError::UnsupportedOperator {
            field: name.to_string(),
            operator,
        };
        if !self.dialect.accepts(operator) {
            return Err(unsupported());
        }
        match operator.semantics() {
            Semantics::Ordering if !kind.is_ordered() => return Err(unsupported()),
            Semantics::Pattern if !kind.is_textual() => return Err(unsupported()),
            _ => {}
        }

        let raw = atom.value.as_str();
        let coerce = || {
            kind.coerce(raw).ok_or_else(|| FilterError::InvalidValue {
                field: name.to_string(),
                value: raw.to_string(),
                expected: kind.to_string(),
            })
        };

        let comparison = match operator {
            Operator::Equals => Comparison::Equals(coerce()?),
            Operator::NotEquals => Comparison::NotEquals(coerce()?),
            Operator::GreaterThan => Comparison::GreaterThan(coerce()?),
            Operator::LessThan => Comparison::LessThan(coerce()?),
            Operator::Like => Comparison::Like(raw.to_string()),
            Operator::StartsWith => Comparison::StartsWith(raw.to_string()),
            Operator::EndsWith => Comparison::EndsWith(raw.to_string()),
            Operator::Contains => Comparison::Contains(raw.to_string()),
        };
        Ok((field, comparison))
    }
}

/// Operator after applying wildcard markers; `None` if wildcards are misused
fn effective_operator(atom: &FilterAtom) -> Option<Operator> {
    let leading = atom.prefix == Some(WILDCARD);
    let trailing = atom.suffix == Some(WILDCARD);
    match (leading, trailing) {
        (false, false) => Some(atom.operator),
        _ if atom.operator != Operator::Equals => None,
        (true, true) => Some(Operator::Contains),
        (true, false) => Some(Operator::EndsWith),
        (false, true) => Some(Operator::StartsWith),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::field::tests::{Person, PersonField};
    use crate::filter::field::FieldValue;
    use crate::filter::tokenizer::Tokenizer;

    fn compile(dialect: Dialect, raws: &[&str]) -> FilterResult<Predicate<PersonField>> {
        let atoms = Tokenizer::new(dialect).tokenize(raws.iter().copied());
        PredicateCompiler::new(dialect).compile(&atoms)
    }

    fn people() -> Vec<Person> {
        vec![
            Person::new("John", 30, "admin"),
            Person::new("Joan", 17, "user"),
            Person::new("Alice", 45, "user"),
            Person::new("Bob", 18, "admin"),
        ]
    }

    fn names(predicate: &Predicate<PersonField>) -> Vec<String> {
        people()
            .into_iter()
            .filter(|p| predicate.matches(p))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_single_equals_matches_exactly() {
        for dialect in [Dialect::Criteria, Dialect::Specification] {
            let p = compile(dialect, &["name:John"]).unwrap();
            assert_eq!(names(&p), vec!["John"]);
        }
    }

    #[test]
    fn test_empty_atom_list_is_no_filter() {
        let p = compile(Dialect::Criteria, &["???", "garbage"]).unwrap();
        assert!(p.is_always());
        assert_eq!(names(&p).len(), 4);
    }

    #[test]
    fn test_criteria_is_conjunction_independent_of_order() {
        let forward = compile(Dialect::Criteria, &["age>17", "role:admin", "name~J%"]).unwrap();
        let reverse = compile(Dialect::Criteria, &["name~J%", "role:admin", "age>17"]).unwrap();
        assert_eq!(forward.conjuncts().len(), 3);
        assert_eq!(reverse.conjuncts().len(), 3);
        assert_eq!(names(&forward), vec!["John"]);
        assert_eq!(names(&forward), names(&reverse));
    }

    #[test]
    fn test_criteria_repeated_field_is_still_and() {
        let p = compile(Dialect::Criteria, &["name:John", "name:Bob"]).unwrap();
        assert!(names(&p).is_empty());
    }

    #[test]
    fn test_specification_groups_by_field() {
        let p = compile(
            Dialect::Specification,
            &["name:John", "age>20", "name:Alice", "role:user"],
        )
        .unwrap();

        // (name = John OR name = Alice) AND age > 20 AND role = user
        let parts = p.conjuncts();
        assert_eq!(parts.len(), 3);
        assert!(matches!(&parts[0], Predicate::Or(branch) if branch.len() == 2));
        assert!(matches!(&parts[1], Predicate::Compare { field: PersonField::Age, .. }));
        assert!(matches!(&parts[2], Predicate::Compare { field: PersonField::Role, .. }));
        assert_eq!(names(&p), vec!["Alice"]);
    }

    #[test]
    fn test_specification_groups_case_insensitive_field_names() {
        let p = compile(Dialect::Specification, &["name:John", "NAME:Bob"]).unwrap();
        assert_eq!(names(&p), vec!["John", "Bob"]);
    }

    #[test]
    fn test_specification_wildcards() {
        let starts = compile(Dialect::Specification, &["name:Jo*"]).unwrap();
        assert_eq!(names(&starts), vec!["John", "Joan"]);

        let ends = compile(Dialect::Specification, &["name:*ce"]).unwrap();
        assert_eq!(names(&ends), vec!["Alice"]);

        let contains = compile(Dialect::Specification, &["name:*o*"]).unwrap();
        assert_eq!(names(&contains), vec!["John", "Joan", "Bob"]);
    }

    #[test]
    fn test_specification_quoted_value_is_exact() {
        let p = compile(Dialect::Specification, &["name:\"Bob\""]).unwrap();
        assert_eq!(names(&p), vec!["Bob"]);
    }

    #[test]
    fn test_wildcard_on_other_operator_is_invalid_value() {
        let err = compile(Dialect::Specification, &["name!Jo*"]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_unknown_field() {
        let err = compile(Dialect::Criteria, &["password:secret"]).unwrap_err();
        assert_eq!(err, FilterError::UnknownField("password".to_string()));
    }

    #[test]
    fn test_first_failing_atom_is_reported() {
        let err = compile(Dialect::Criteria, &["age:x", "nope:1"]).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue {
                field: "age".to_string(),
                value: "x".to_string(),
                expected: "integer".to_string(),
            }
        );
    }

    #[test]
    fn test_ordering_on_enum_is_unsupported() {
        let err = compile(Dialect::Criteria, &["role>admin"]).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperator {
                field: "role".to_string(),
                operator: Operator::GreaterThan,
            }
        );
    }

    #[test]
    fn test_like_on_integer_is_unsupported() {
        let err = compile(Dialect::Criteria, &["age~1%"]).unwrap_err();
        assert!(matches!(err, FilterError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_criteria_rejects_derived_operator_atoms() {
        let atom = FilterAtom::new("name", Operator::Equals, "Jo").with_markers(None, Some('*'));
        let err = PredicateCompiler::<PersonField>::new(Dialect::Criteria)
            .compile(&AtomList::from_iter([atom]))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::UnsupportedOperator {
                field: "name".to_string(),
                operator: Operator::StartsWith,
            }
        );
    }

    #[test]
    fn test_date_comparison() {
        let (field, comparison) = PredicateCompiler::<PersonField>::new(Dialect::Criteria)
            .compile_atom(&FilterAtom::new("born", Operator::LessThan, "2001-01-01"))
            .unwrap();
        assert_eq!(field, PersonField::Born);
        assert!(matches!(comparison, Comparison::LessThan(FieldValue::Date(_))));
        let p = Predicate::compare(field, comparison);
        assert_eq!(names(&p).len(), 4);
    }

    #[test]
    fn test_enum_value_is_case_insensitive() {
        let p = compile(Dialect::Criteria, &["role:ADMIN"]).unwrap();
        assert_eq!(names(&p), vec!["John", "Bob"]);
    }
}
