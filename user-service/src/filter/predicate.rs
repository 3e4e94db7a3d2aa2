//! Compiled predicates
//!
//! A [`Predicate`] is an immutable boolean condition over one record. It can
//! be evaluated in memory against any [`FilterRecord`] or, with the
//! `database` feature, rendered into a parameterized SQL `WHERE` fragment.
//! Both paths give the same answer for the same data.

use super::field::{FieldValue, FilterField, FilterRecord};

/// Comparison applied to a single field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    Equals(FieldValue),
    NotEquals(FieldValue),
    GreaterThan(FieldValue),
    LessThan(FieldValue),
    /// SQL `LIKE` pattern: `%` any run, `_` one character, `\` escapes
    Like(String),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
}

impl Comparison {
    /// Evaluate against an actual field value
    ///
    /// Absent values never match, mirroring SQL `NULL` comparison rules.
    #[must_use]
    pub fn evaluate(&self, actual: &FieldValue) -> bool {
        if matches!(actual, FieldValue::Null) {
            return false;
        }
        match self {
            Self::Equals(expected) => actual == expected,
            Self::NotEquals(expected) => actual != expected,
            Self::GreaterThan(bound) => actual > bound,
            Self::LessThan(bound) => actual < bound,
            Self::Like(pattern) => actual.as_text().is_some_and(|t| like_matches(t, pattern)),
            Self::StartsWith(prefix) => actual.as_text().is_some_and(|t| t.starts_with(prefix.as_str())),
            Self::EndsWith(suffix) => actual.as_text().is_some_and(|t| t.ends_with(suffix.as_str())),
            Self::Contains(needle) => actual.as_text().is_some_and(|t| t.contains(needle.as_str())),
        }
    }
}

/// Boolean condition over records with fields of type `F`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate<F> {
    /// Matches every record; the identity of AND
    Always,
    Compare { field: F, comparison: Comparison },
    And(Vec<Predicate<F>>),
    Or(Vec<Predicate<F>>),
}

impl<F: FilterField> Predicate<F> {
    pub fn compare(field: F, comparison: Comparison) -> Self {
        Self::Compare { field, comparison }
    }

    /// Conjunction, flattening nested ANDs and absorbing `Always`
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Always, p) | (p, Self::Always) => p,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, Self::And(right)) => {
                let mut all = Vec::with_capacity(right.len() + 1);
                all.push(p);
                all.extend(right);
                Self::And(all)
            }
            (left, right) => Self::And(vec![left, right]),
        }
    }

    /// Disjunction, flattening nested ORs; `Always` absorbs the other side
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Always, _) | (_, Self::Always) => Self::Always,
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), p) => {
                left.push(p);
                Self::Or(left)
            }
            (p, Self::Or(right)) => {
                let mut any = Vec::with_capacity(right.len() + 1);
                any.push(p);
                any.extend(right);
                Self::Or(any)
            }
            (left, right) => Self::Or(vec![left, right]),
        }
    }

    /// AND of every predicate; `Always` when there are none
    pub fn all(predicates: impl IntoIterator<Item = Self>) -> Self {
        predicates.into_iter().fold(Self::Always, Self::and)
    }

    /// OR of every predicate; an empty OR when there are none (matches nothing)
    pub fn any(predicates: impl IntoIterator<Item = Self>) -> Self {
        predicates
            .into_iter()
            .reduce(Self::or)
            .unwrap_or_else(|| Self::Or(Vec::new()))
    }

    #[must_use]
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Always)
    }

    /// Top-level AND operands
    #[must_use]
    pub fn conjuncts(&self) -> &[Self] {
        match self {
            Self::Always => &[],
            Self::And(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    /// Evaluate in memory
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: FilterRecord<Field = F>,
    {
        match self {
            Self::Always => true,
            Self::Compare { field, comparison } => comparison.evaluate(&record.field_value(*field)),
            Self::And(parts) => parts.iter().all(|p| p.matches(record)),
            Self::Or(parts) => parts.iter().any(|p| p.matches(record)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LikeToken {
    AnyRun,
    One,
    Literal(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::AnyRun,
            '_' => LikeToken::One,
            '\\' => LikeToken::Literal(chars.next().unwrap_or('\\')),
            other => LikeToken::Literal(other),
        });
    }
    tokens
}

/// Match text against a SQL `LIKE` pattern (case-sensitive)
#[must_use]
pub fn like_matches(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let tokens = like_tokens(pattern);

    let (mut t, mut p) = (0, 0);
    // Position of the last `%` and the text index it is currently covering up to.
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match tokens.get(p) {
            Some(LikeToken::AnyRun) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(LikeToken::One) => {
                t += 1;
                p += 1;
            }
            Some(LikeToken::Literal(c)) if *c == text[t] => {
                t += 1;
                p += 1;
            }
            _ => match backtrack {
                Some((star, covered)) => {
                    p = star + 1;
                    t = covered + 1;
                    backtrack = Some((star, covered + 1));
                }
                None => return false,
            },
        }
    }

    tokens[p..].iter().all(|tok| *tok == LikeToken::AnyRun)
}

/// Escape `LIKE` metacharacters so the text matches literally
#[must_use]
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(feature = "database")]
pub use sql::comparable_column;

#[cfg(feature = "database")]
mod sql {
    use sqlx::{Postgres, QueryBuilder};

    use super::{escape_like, Comparison, Predicate};
    use crate::filter::field::{FieldKind, FieldValue, FilterField};

    /// Column expression that compares and sorts the way [`Predicate::matches`] does
    ///
    /// Text is compared byte-wise (`COLLATE "C"`) and enums by name, so
    /// native enum columns are read through `::text`.
    pub fn comparable_column<F: FilterField>(field: F) -> String {
        match field.kind() {
            FieldKind::Text => format!("{} COLLATE \"C\"", field.column()),
            FieldKind::Enum(_) => format!("{}::text COLLATE \"C\"", field.column()),
            _ => field.column().to_string(),
        }
    }

    fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: &FieldValue) {
        match value {
            FieldValue::Text(s) => qb.push_bind(s.clone()),
            FieldValue::Integer(n) => qb.push_bind(*n),
            FieldValue::Date(d) => qb.push_bind(*d),
            FieldValue::Timestamp(ts) => qb.push_bind(*ts),
            FieldValue::Enum(s) => qb.push_bind(s.to_string()),
            FieldValue::Null => qb.push("NULL"),
        };
    }

    impl<F: FilterField> Predicate<F> {
        /// Append this predicate as a parenthesized SQL condition
        ///
        /// Column names come from [`FilterField::column`]; every value is a
        /// bound parameter.
        pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
            match self {
                Self::Always => {
                    qb.push("TRUE");
                }
                Self::Compare { field, comparison } => {
                    let column = comparable_column(*field);
                    let column = column.as_str();
                    match comparison {
                        Comparison::Equals(FieldValue::Null) => {
                            qb.push("FALSE");
                        }
                        Comparison::Equals(v) => {
                            qb.push(column).push(" = ");
                            push_value(qb, v);
                        }
                        Comparison::NotEquals(v) => {
                            qb.push(column).push(" <> ");
                            push_value(qb, v);
                        }
                        Comparison::GreaterThan(v) => {
                            qb.push(column).push(" > ");
                            push_value(qb, v);
                        }
                        Comparison::LessThan(v) => {
                            qb.push(column).push(" < ");
                            push_value(qb, v);
                        }
                        Comparison::Like(pattern) => {
                            qb.push(column).push(" LIKE ").push_bind(pattern.clone());
                        }
                        Comparison::StartsWith(s) => {
                            qb.push(column)
                                .push(" LIKE ")
                                .push_bind(format!("{}%", escape_like(s)));
                        }
                        Comparison::EndsWith(s) => {
                            qb.push(column)
                                .push(" LIKE ")
                                .push_bind(format!("%{}", escape_like(s)));
                        }
                        Comparison::Contains(s) => {
                            qb.push(column)
                                .push(" LIKE ")
                                .push_bind(format!("%{}%", escape_like(s)));
                        }
                    }
                }
                Self::And(parts) => push_joined(qb, parts, " AND ", "TRUE"),
                Self::Or(parts) => push_joined(qb, parts, " OR ", "FALSE"),
            }
        }
    }

    fn push_joined<F: FilterField>(
        qb: &mut QueryBuilder<'_, Postgres>,
        parts: &[Predicate<F>],
        separator: &str,
        empty: &str,
    ) {
        if parts.is_empty() {
            qb.push(empty);
            return;
        }
        qb.push("(");
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                qb.push(separator);
            }
            part.push_sql(qb);
        }
        qb.push(")");
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::filter::field::tests::PersonField;

        fn render(predicate: &Predicate<PersonField>) -> String {
            let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM people WHERE ");
            predicate.push_sql(&mut qb);
            qb.sql().to_string()
        }

        #[test]
        fn test_always_renders_true() {
            assert_eq!(
                render(&Predicate::Always),
                "SELECT * FROM people WHERE TRUE"
            );
        }

        #[test]
        fn test_grouped_predicate_renders_with_binds() {
            let predicate = Predicate::any([
                Predicate::compare(PersonField::Name, Comparison::StartsWith("Jo".into())),
                Predicate::compare(PersonField::Name, Comparison::Equals(FieldValue::Text("Al".into()))),
            ])
            .and(Predicate::compare(
                PersonField::Age,
                Comparison::GreaterThan(FieldValue::Integer(18)),
            ));
            assert_eq!(
                render(&predicate),
                "SELECT * FROM people WHERE ((name COLLATE \"C\" LIKE $1 \
                 OR name COLLATE \"C\" = $2) AND age > $3)"
            );
        }

        #[test]
        fn test_enum_and_text_columns_compare_bytewise() {
            assert_eq!(comparable_column(PersonField::Role), "role::text COLLATE \"C\"");
            assert_eq!(comparable_column(PersonField::Name), "name COLLATE \"C\"");
            assert_eq!(comparable_column(PersonField::Born), "born");
        }
    }
}
