//! Errors raised while tokenizing or compiling filter expressions

use thiserror::Error;

use super::operator::Operator;

/// Result type for filter engine operations
pub type FilterResult<T> = std::result::Result<T, FilterError>;

/// Failure to turn a filter or sort expression into a predicate
///
/// Every variant is a caller mistake: retrying the same expression cannot
/// succeed, so these map to client errors at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The expression names a field outside the allow-list
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The raw value cannot be coerced to the field's kind
    #[error("invalid value '{value}' for field '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// The operator is not accepted by the dialect or by the field's kind
    #[error("operator '{operator}' is not supported for field '{field}'")]
    UnsupportedOperator { field: String, operator: Operator },

    /// The expression does not match the grammar (strict mode only)
    #[error("malformed expression '{0}'")]
    MalformedExpression(String),
}

impl FilterError {
    /// Field the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField(field) => Some(field),
            Self::InvalidValue { field, .. } | Self::UnsupportedOperator { field, .. } => {
                Some(field)
            }
            Self::MalformedExpression(_) => None,
        }
    }

    /// Offending raw value or expression, if any
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::InvalidValue { value, .. } => Some(value),
            Self::MalformedExpression(expression) => Some(expression),
            Self::UnknownField(_) | Self::UnsupportedOperator { .. } => None,
        }
    }
}
