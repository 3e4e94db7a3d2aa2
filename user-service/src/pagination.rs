//! Pagination and sort normalization
//!
//! Endpoints disagree on how pages are numbered: some take a 0-based `page`,
//! others a 1-based `pageNo`. [`PageNormalizer`] turns whatever the caller
//! sent into a single 0-based [`PageRequest`] with a bounded page size and a
//! resolved, allow-listed sort order.
//!
//! # Example
//!
//! ```rust
//! use user_service::pagination::{PageNormalizer, PageNumbering};
//! use user_service::models::UserField;
//!
//! let normalizer = PageNormalizer::new(PageNumbering::OneBased, 20, 100);
//! let request = normalizer.normalize::<UserField>(Some(1), None, &[]).unwrap();
//! assert_eq!(request.page_index, 0);
//! assert_eq!(request.page_size, 20);
//! assert_eq!(request.offset(), 0);
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use crate::filter::{
    FieldValue, FilterError, FilterField, FilterRecord, FilterResult, SortAtom, SortDirection,
};

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum allowed items per page
pub const MAX_PAGE_SIZE: u32 = 100;

/// How an endpoint numbers its pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumbering {
    ZeroBased,
    OneBased,
}

impl PageNumbering {
    /// Convert a caller-supplied page number into a 0-based index
    ///
    /// Missing or out-of-range numbers land on the first page.
    #[must_use]
    pub fn to_index(self, page: Option<i64>) -> u32 {
        let page = page.unwrap_or(match self {
            Self::ZeroBased => 0,
            Self::OneBased => 1,
        });
        let index = match self {
            Self::ZeroBased => page,
            Self::OneBased => page - 1,
        };
        u32::try_from(index.max(0)).unwrap_or(u32::MAX)
    }
}

/// A resolved sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: FilterField> SortKey<F> {
    /// Compare two records on this key
    ///
    /// Absent values sort after present ones in ascending order, as in
    /// PostgreSQL.
    pub fn compare<R>(&self, a: &R, b: &R) -> Ordering
    where
        R: FilterRecord<Field = F>,
    {
        let ordering = match (a.field_value(self.field), b.field_value(self.field)) {
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (FieldValue::Null, _) => Ordering::Greater,
            (_, FieldValue::Null) => Ordering::Less,
            (x, y) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A normalized, 0-based page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    pub page_index: u32,
    pub page_size: u32,
    /// Compound order; the first key is the primary one
    pub sort: Vec<SortKey<F>>,
}

impl<F: FilterField> PageRequest<F> {
    #[must_use]
    pub fn new(page_index: u32, page_size: u32) -> Self {
        Self {
            page_index,
            page_size,
            sort: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Vec<SortKey<F>>) -> Self {
        self.sort = sort;
        self
    }

    /// Number of rows to skip
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    /// Number of rows to return
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }

    /// Compare two records on every sort key in turn
    pub fn compare<R>(&self, a: &R, b: &R) -> Ordering
    where
        R: FilterRecord<Field = F>,
    {
        self.sort
            .iter()
            .fold(Ordering::Equal, |acc, key| acc.then_with(|| key.compare(a, b)))
    }
}

/// Builds [`PageRequest`]s for one endpoint's numbering scheme
#[derive(Debug, Clone, Copy)]
pub struct PageNormalizer {
    numbering: PageNumbering,
    default_page_size: u32,
    max_page_size: u32,
}

impl PageNormalizer {
    #[must_use]
    pub fn new(numbering: PageNumbering, default_page_size: u32, max_page_size: u32) -> Self {
        let max_page_size = max_page_size.max(1);
        Self {
            numbering,
            default_page_size: default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }

    /// Normalize page number, page size and sort atoms
    ///
    /// Sort fields outside the allow-list are rejected.
    pub fn normalize<F: FilterField>(
        &self,
        page: Option<i64>,
        size: Option<i64>,
        sort: &[SortAtom],
    ) -> FilterResult<PageRequest<F>> {
        let page_size = match size {
            None => self.default_page_size,
            Some(n) => u32::try_from(n.clamp(1, i64::from(self.max_page_size)))
                .unwrap_or(self.default_page_size),
        };

        let sort = sort
            .iter()
            .map(|atom| {
                F::from_name(&atom.field)
                    .map(|field| SortKey {
                        field,
                        direction: atom.direction,
                    })
                    .ok_or_else(|| FilterError::UnknownField(atom.field.clone()))
            })
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(PageRequest {
            page_index: self.numbering.to_index(page),
            page_size,
            sort,
        })
    }
}

/// One page of results plus the total match count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_index: u32, page_size: u32, total_elements: u64) -> Self {
        Self {
            items,
            page_index,
            page_size,
            total_elements,
        }
    }

    /// Number of pages needed for every match
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.page_size))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::field::tests::{Person, PersonField};

    fn one_based() -> PageNormalizer {
        PageNormalizer::new(PageNumbering::OneBased, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    fn zero_based() -> PageNormalizer {
        PageNormalizer::new(PageNumbering::ZeroBased, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    #[test]
    fn test_first_page_on_both_numberings() {
        let a: PageRequest<PersonField> = one_based().normalize(Some(1), None, &[]).unwrap();
        let b: PageRequest<PersonField> = zero_based().normalize(Some(0), None, &[]).unwrap();
        assert_eq!(a.page_index, 0);
        assert_eq!(b.page_index, 0);
    }

    #[test]
    fn test_one_based_conversion() {
        assert_eq!(PageNumbering::OneBased.to_index(Some(3)), 2);
        assert_eq!(PageNumbering::OneBased.to_index(Some(0)), 0);
        assert_eq!(PageNumbering::OneBased.to_index(Some(-4)), 0);
        assert_eq!(PageNumbering::OneBased.to_index(None), 0);
    }

    #[test]
    fn test_zero_based_clamps_negative() {
        assert_eq!(PageNumbering::ZeroBased.to_index(Some(-1)), 0);
        assert_eq!(PageNumbering::ZeroBased.to_index(Some(4)), 4);
    }

    #[test]
    fn test_page_size_default_and_clamp() {
        let n = zero_based();
        let default: PageRequest<PersonField> = n.normalize(None, None, &[]).unwrap();
        assert_eq!(default.page_size, 20);
        let big: PageRequest<PersonField> = n.normalize(None, Some(5000), &[]).unwrap();
        assert_eq!(big.page_size, 100);
        let zero: PageRequest<PersonField> = n.normalize(None, Some(0), &[]).unwrap();
        assert_eq!(zero.page_size, 1);
    }

    #[test]
    fn test_offset() {
        let request: PageRequest<PersonField> = zero_based().normalize(Some(3), Some(10), &[]).unwrap();
        assert_eq!(request.offset(), 30);
        assert_eq!(request.limit(), 10);
    }

    #[test]
    fn test_unknown_sort_field_is_rejected() {
        let err = zero_based()
            .normalize::<PersonField>(None, None, &[SortAtom::new("salary", SortDirection::Asc)])
            .unwrap_err();
        assert_eq!(err, FilterError::UnknownField("salary".to_string()));
    }

    #[test]
    fn test_compound_sort_order() {
        let request: PageRequest<PersonField> = zero_based()
            .normalize(
                None,
                None,
                &[
                    SortAtom::new("role", SortDirection::Asc),
                    SortAtom::new("age", SortDirection::Desc),
                ],
            )
            .unwrap();
        assert_eq!(request.sort.len(), 2);
        assert_eq!(request.sort[0].field, PersonField::Role);

        let mut people = vec![
            Person::new("a", 20, "user"),
            Person::new("b", 40, "admin"),
            Person::new("c", 50, "user"),
            Person::new("d", 10, "admin"),
        ];
        people.sort_by(|x, y| request.compare(x, y));
        let names: Vec<&str> = people.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(Page::new(Vec::<u8>::new(), 0, 20, 0).total_pages(), 0);
        assert_eq!(Page::new(Vec::<u8>::new(), 0, 20, 20).total_pages(), 1);
        assert_eq!(Page::new(Vec::<u8>::new(), 0, 20, 21).total_pages(), 2);
    }
}
