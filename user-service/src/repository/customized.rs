//! Fixed-shape user query
//!
//! Optional exact matches on first name, last name and gender, always
//! ordered by descending `id`. Unlike the search endpoints this path never
//! goes through the tokenizer; the clauses are built directly.

use crate::filter::{Comparison, FieldValue, Predicate, SortDirection};
use crate::models::{Gender, UserField};
use crate::pagination::{PageRequest, SortKey};

/// Parameters of the customized query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomizedQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
}

impl CustomizedQuery {
    /// Empty strings count as absent
    pub fn new(first_name: Option<String>, last_name: Option<String>, gender: Option<Gender>) -> Self {
        Self {
            first_name: first_name.filter(|s| !s.is_empty()),
            last_name: last_name.filter(|s| !s.is_empty()),
            gender,
        }
    }

    /// Conjunction of the clauses that are present
    pub fn predicate(&self) -> Predicate<UserField> {
        let text = |field, value: &Option<String>| {
            value.as_ref().map(|v| {
                Predicate::compare(field, Comparison::Equals(FieldValue::Text(v.clone())))
            })
        };
        let gender = self.gender.map(|g| {
            Predicate::compare(
                UserField::Gender,
                Comparison::Equals(FieldValue::Enum(g.as_str())),
            )
        });

        Predicate::all(
            [
                text(UserField::FirstName, &self.first_name),
                text(UserField::LastName, &self.last_name),
                gender,
            ]
            .into_iter()
            .flatten(),
        )
    }

    /// Page request with the fixed `id DESC` order
    pub fn page_request(&self, page_index: u32, page_size: u32) -> PageRequest<UserField> {
        PageRequest::new(page_index, page_size).with_sort(vec![SortKey {
            field: UserField::Id,
            direction: SortDirection::Desc,
        }])
    }
}
