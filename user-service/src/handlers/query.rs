//! Query-string extraction for list and search endpoints
//!
//! Filter and sort expressions arrive as repeated parameters
//! (`?search=a&search=b`), which a plain `Query<T>` struct cannot collect,
//! so [`ListQuery`] keeps every pair in request order.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use super::error::ApiError;
use crate::models::Gender;
use crate::repository::CustomizedQuery;
use crate::service::Paging;

/// Every `name=value` pair of the query string, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pairs: Vec<(String, String)>,
}

impl ListQuery {
    #[must_use]
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Every value of a repeated parameter
    pub fn all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .collect()
    }

    /// First non-empty value of a parameter
    pub fn first(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, value)| key == name && !value.trim().is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// First value of a parameter parsed as an integer
    pub fn integer(&self, name: &str) -> Result<Option<i64>, ApiError> {
        self.first(name)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| {
                    let mut error = ApiError::bad_request(format!(
                        "Invalid parameter '{}': expected an integer",
                        name
                    ));
                    error.field = Some(name.to_string());
                    error.value = Some(raw.to_string());
                    error
                })
            })
            .transpose()
    }

    /// Paging under the given parameter names
    pub fn paging(&self, page: &str, size: &str) -> Result<Paging, ApiError> {
        Ok(Paging::new(self.integer(page)?, self.integer(size)?).with_sort(self.all("sort")))
    }

    /// Parameters of the customized query; `gender` is a name or an ordinal
    pub fn customized(&self) -> Result<CustomizedQuery, ApiError> {
        let gender = self
            .first("gender")
            .map(str::parse::<Gender>)
            .transpose()?;
        Ok(CustomizedQuery::new(
            self.first("firstName").map(str::to_string),
            self.first("lastName").map(str::to_string),
            gender,
        ))
    }
}

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self::new(pairs))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::handlers::ApiErrorKind;

    async fn extract(uri: &str) -> ListQuery {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ListQuery::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_repeated_parameters_keep_order() {
        let query = extract("/user/search?search=lastName%3ADoe&page=1&search=age%3E18").await;
        assert_eq!(query.all("search"), vec!["lastName:Doe", "age>18"]);
        assert_eq!(query.integer("page").unwrap(), Some(1));
        assert_eq!(query.integer("size").unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_value_counts_as_absent() {
        let query = extract("/user/list?page=&sort=firstName,desc").await;
        let paging = query.paging("page", "size").unwrap();
        assert_eq!(paging.page, None);
        assert_eq!(paging.sort, vec!["firstName,desc"]);
    }

    #[test]
    fn test_non_integer_is_bad_request() {
        let query = ListQuery::new(vec![("pageNo".to_string(), "two".to_string())]);
        let err = query.integer("pageNo").unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.field.as_deref(), Some("pageNo"));
        assert_eq!(err.value.as_deref(), Some("two"));
    }

    #[test]
    fn test_customized_gender_by_ordinal() {
        let query = ListQuery::new(vec![
            ("gender".to_string(), "1".to_string()),
            ("firstName".to_string(), String::new()),
        ]);
        let customized = query.customized().unwrap();
        assert_eq!(customized.gender, Some(Gender::Female));
        assert_eq!(customized.first_name, None);

        let query = ListQuery::new(vec![("gender".to_string(), "7".to_string())]);
        assert!(query.customized().is_err());
    }
}
