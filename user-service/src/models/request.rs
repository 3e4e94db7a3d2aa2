//! Request bodies and the validated values they turn into

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use super::address::Address;
use super::user::{Gender, User, UserStatus, UserType};

/// A request body failed validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn blank(field: &str) -> Self {
        Self(format!("{} must be not blank", field))
    }
}

fn required(field: &str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::blank(field))
    } else {
        Ok(value)
    }
}

fn optional(field: &str, value: Option<String>) -> Result<Option<String>, ValidationError> {
    value.map(|v| required(field, v)).transpose()
}

/// Body of `POST /user/add`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub user_type: Option<UserType>,
    pub addresses: Vec<Address>,
}

/// A user ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Option<Gender>,
    pub phone: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub user_type: Option<UserType>,
    pub status: UserStatus,
    pub addresses: Vec<Address>,
}

impl CreateUserRequest {
    /// Check required fields; new users always start with status `none`
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        Ok(NewUser {
            first_name: required("firstName", self.first_name)?,
            last_name: required("lastName", self.last_name)?,
            date_of_birth: self
                .date_of_birth
                .ok_or_else(|| ValidationError::blank("dateOfBirth"))?,
            gender: self.gender,
            phone: required("phone", self.phone)?,
            email: required("email", self.email)?,
            username: required("username", self.username)?,
            password: required("password", self.password)?,
            user_type: self.user_type,
            status: UserStatus::None,
            addresses: self.addresses,
        })
    }
}

/// Body of `PUT /user/upd`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    #[serde(alias = "type")]
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
}

/// Partial update of a stored user; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub status: Option<UserStatus>,
    pub user_type: Option<UserType>,
    pub gender: Option<Gender>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<(i64, UserChanges), ValidationError> {
        if self.id < 1 {
            return Err(ValidationError(
                "id must be greater than or equal to 1".to_string(),
            ));
        }
        let changes = UserChanges {
            first_name: optional("firstName", self.first_name)?,
            last_name: optional("lastName", self.last_name)?,
            phone: optional("phone", self.phone)?,
            email: optional("email", self.email)?,
            password: optional("password", self.password)?,
            status: self.status,
            user_type: self.user_type,
            gender: self.gender,
        };
        Ok((self.id, changes))
    }
}

impl UserChanges {
    /// Only a status change
    pub fn status(status: UserStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply to a user in place
    pub fn apply(&self, user: &mut User) {
        if let Some(v) = &self.first_name {
            user.first_name.clone_from(v);
        }
        if let Some(v) = &self.last_name {
            user.last_name.clone_from(v);
        }
        if let Some(v) = &self.phone {
            user.phone.clone_from(v);
        }
        if let Some(v) = &self.email {
            user.email.clone_from(v);
        }
        if let Some(v) = &self.password {
            user.password.clone_from(v);
        }
        if let Some(v) = self.status {
            user.status = v;
        }
        if let Some(v) = self.user_type {
            user.user_type = Some(v);
        }
        if let Some(v) = self.gender {
            user.gender = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateUserRequest {
        serde_json::from_value(serde_json::json!({
            "firstName": "John",
            "lastName": "Doe",
            "dateOfBirth": "1990-04-12",
            "gender": "male",
            "phone": "0123456789",
            "email": "john@example.com",
            "username": "john",
            "password": "secret",
            "type": "user",
            "addresses": [{ "city": "Hanoi", "addressType": 1 }]
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_create_request() {
        let user = create_request().validate().unwrap();
        assert_eq!(user.first_name, "John");
        assert_eq!(user.status, UserStatus::None);
        assert_eq!(user.user_type, Some(UserType::User));
        assert_eq!(user.addresses[0].city.as_deref(), Some("Hanoi"));
    }

    #[test]
    fn test_blank_first_name_is_rejected() {
        let mut request = create_request();
        request.first_name = "   ".to_string();
        assert_eq!(
            request.validate().unwrap_err().to_string(),
            "firstName must be not blank"
        );
    }

    #[test]
    fn test_missing_date_of_birth_is_rejected() {
        let mut request = create_request();
        request.date_of_birth = None;
        assert_eq!(
            request.validate().unwrap_err(),
            ValidationError::blank("dateOfBirth")
        );
    }

    #[test]
    fn test_update_requires_positive_id() {
        let request = UpdateUserRequest::default();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let request: UpdateUserRequest = serde_json::from_value(serde_json::json!({
            "id": 1,
            "lastName": "Smith",
            "status": "active"
        }))
        .unwrap();
        let (id, changes) = request.validate().unwrap();
        assert_eq!(id, 1);
        assert_eq!(changes.last_name.as_deref(), Some("Smith"));
        assert_eq!(changes.status, Some(UserStatus::Active));
        assert!(changes.first_name.is_none());
        assert!(!changes.is_empty());
    }
}
