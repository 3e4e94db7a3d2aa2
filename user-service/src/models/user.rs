//! User entity and its queryable fields

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{FieldKind, FieldValue, FilterField, FilterRecord};

use super::address::Address;

/// Error returned when parsing an unknown enum name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of [{expected}], got '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str, names: &[&str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected: names.join(", "),
        }
    }
}

/// Gender of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const NAMES: &'static [&'static str] = &["male", "female", "other"];
    const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }

    /// Look up by declaration order (`0` = male)
    #[must_use]
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    /// Accepts a name (any case) or a declaration-order ordinal
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .or_else(|| s.parse::<usize>().ok().and_then(Self::from_ordinal))
            .ok_or_else(|| UnknownVariant::new("gender", s, Self::NAMES))
    }
}

/// Role of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserType {
    Sysadmin,
    Admin,
    Manager,
    User,
}

impl UserType {
    pub const NAMES: &'static [&'static str] = &["sysadmin", "admin", "manager", "user"];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sysadmin => "sysadmin",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

impl FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Sysadmin, Self::Admin, Self::Manager, Self::User]
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("type", s, Self::NAMES))
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum UserStatus {
    Active,
    Inactive,
    #[default]
    None,
}

impl UserStatus {
    pub const NAMES: &'static [&'static str] = &["active", "inactive", "none"];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::None => "none",
        }
    }
}

impl FromStr for UserStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Active, Self::Inactive, Self::None]
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("status", s, Self::NAMES))
    }
}

macro_rules! string_conversions {
    ($($ty:ty),*) => {$(
        impl TryFrom<String> for $ty {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )*};
}

string_conversions!(Gender, UserType, UserStatus);

/// A stored user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub status: UserStatus,
    pub addresses: Vec<Address>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller may filter and sort users on
///
/// `password` is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Gender,
    Phone,
    Email,
    Username,
    Type,
    Status,
    CreatedAt,
}

impl FilterField for UserField {
    const FIELDS: &'static [Self] = &[
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::DateOfBirth,
        Self::Gender,
        Self::Phone,
        Self::Email,
        Self::Username,
        Self::Type,
        Self::Status,
        Self::CreatedAt,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::DateOfBirth => "dateOfBirth",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Username => "username",
            Self::Type => "type",
            Self::Status => "status",
            Self::CreatedAt => "createdAt",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Id => FieldKind::Integer,
            Self::DateOfBirth => FieldKind::Date,
            Self::CreatedAt => FieldKind::Timestamp,
            Self::Gender => FieldKind::Enum(Gender::NAMES),
            Self::Type => FieldKind::Enum(UserType::NAMES),
            Self::Status => FieldKind::Enum(UserStatus::NAMES),
            Self::FirstName
            | Self::LastName
            | Self::Phone
            | Self::Email
            | Self::Username => FieldKind::Text,
        }
    }

    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::DateOfBirth => "date_of_birth",
            Self::Gender => "gender",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Username => "username",
            Self::Type => "\"type\"",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }
}

impl FilterRecord for User {
    type Field = UserField;

    fn field_value(&self, field: UserField) -> FieldValue {
        match field {
            UserField::Id => FieldValue::Integer(self.id),
            UserField::FirstName => FieldValue::Text(self.first_name.clone()),
            UserField::LastName => FieldValue::Text(self.last_name.clone()),
            UserField::DateOfBirth => FieldValue::Date(self.date_of_birth),
            UserField::Gender => self
                .gender
                .map_or(FieldValue::Null, |g| FieldValue::Enum(g.as_str())),
            UserField::Phone => FieldValue::Text(self.phone.clone()),
            UserField::Email => FieldValue::Text(self.email.clone()),
            UserField::Username => FieldValue::Text(self.username.clone()),
            UserField::Type => self
                .user_type
                .map_or(FieldValue::Null, |t| FieldValue::Enum(t.as_str())),
            UserField::Status => FieldValue::Enum(self.status.as_str()),
            UserField::CreatedAt => FieldValue::Timestamp(self.created_at),
        }
    }
}
