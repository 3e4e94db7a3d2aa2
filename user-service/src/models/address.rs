//! Postal addresses attached to a user

use serde::{Deserialize, Serialize};

/// Address of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub apartment_number: Option<String>,
    pub floor: Option<String>,
    pub building: Option<String>,
    pub street_number: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Caller-defined category (home, office, ...)
    pub address_type: Option<i32>,
}
