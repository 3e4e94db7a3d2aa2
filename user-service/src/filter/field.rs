//! Allow-listed fields and typed values
//!
//! A filter expression names fields by their external (camelCase) name. The
//! compiler resolves that name through [`FilterField::from_name`], so only
//! fields an entity explicitly lists can ever reach a predicate or a SQL
//! statement. Each field carries a [`FieldKind`] that drives value coercion
//! and decides which operators make sense for it.
//!
//! # Example
//!
//! ```rust
//! use user_service::filter::{FieldKind, FieldValue};
//!
//! assert_eq!(FieldKind::Integer.coerce("42"), Some(FieldValue::Integer(42)));
//! assert_eq!(FieldKind::Integer.coerce("forty-two"), None);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, NaiveDate, Utc};

/// Native kind of a queryable field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text
    Text,
    /// Signed 64-bit integer
    Integer,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// Instant, RFC 3339
    Timestamp,
    /// One of a closed set of names in declaration order; a value is a
    /// name (any case) or its position in the list
    Enum(&'static [&'static str]),
}

impl FieldKind {
    /// Coerce raw expression text into a typed value
    ///
    /// Returns `None` when the text is not a valid value of this kind.
    #[must_use]
    pub fn coerce(&self, raw: &str) -> Option<FieldValue> {
        match self {
            Self::Text => Some(FieldValue::Text(raw.to_string())),
            Self::Integer => raw.trim().parse::<i64>().ok().map(FieldValue::Integer),
            Self::Date => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .map(FieldValue::Date),
            Self::Timestamp => DateTime::parse_from_rfc3339(raw.trim())
                .ok()
                .map(|ts| FieldValue::Timestamp(ts.with_timezone(&Utc))),
            Self::Enum(names) => names
                .iter()
                .copied()
                .find(|name| name.eq_ignore_ascii_case(raw.trim()))
                .or_else(|| {
                    let ordinal = raw.trim().parse::<usize>().ok()?;
                    names.get(ordinal).copied()
                })
                .map(FieldValue::Enum),
        }
    }

    /// Whether `<` and `>` are meaningful for this kind
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        !matches!(self, Self::Enum(_))
    }

    /// Whether pattern operators apply to this kind
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Integer => write!(f, "integer"),
            Self::Date => write!(f, "date (YYYY-MM-DD)"),
            Self::Timestamp => write!(f, "timestamp (RFC 3339)"),
            Self::Enum(names) => write!(f, "one of [{}]", names.join(", ")),
        }
    }
}

/// A value coerced to a field's kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    /// Canonical enum name as listed in the field's [`FieldKind::Enum`]
    Enum(&'static str),
    /// Absent optional value; never equal to or ordered against anything
    Null,
}

impl FieldValue {
    /// Text view used by pattern operators
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Date(a), Self::Date(b)) => a.partial_cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.partial_cmp(b),
            (Self::Enum(a), Self::Enum(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            Self::Enum(s) => write!(f, "{}", s),
            Self::Null => write!(f, "null"),
        }
    }
}

/// An allow-listed, typed field of a filterable entity
///
/// Implementors are usually fieldless enums listing every queryable
/// attribute. Fields that must never be filtered on are simply left out.
pub trait FilterField: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every queryable field
    const FIELDS: &'static [Self];

    /// External name used in expressions and responses
    fn name(&self) -> &'static str;

    /// Native kind used for coercion and operator checks
    fn kind(&self) -> FieldKind;

    /// Storage column backing this field
    fn column(&self) -> &'static str;

    /// Resolve an external name, ignoring ASCII case
    fn from_name(name: &str) -> Option<Self> {
        Self::FIELDS
            .iter()
            .copied()
            .find(|field| field.name().eq_ignore_ascii_case(name))
    }
}

/// A record whose fields can be read as typed values
pub trait FilterRecord {
    type Field: FilterField;

    fn field_value(&self, field: Self::Field) -> FieldValue;
}
