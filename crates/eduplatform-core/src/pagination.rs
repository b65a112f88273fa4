//! Page-based pagination.
//!
//! List endpoints accept `?page=<n>&pageSize=<n>`:
//!
//! - `page` is 1-indexed and defaults to 1 (values below 1 become 1)
//! - `pageSize` defaults to 10 and is clamped to [1, 100]
//!
//! Unparsable values fall back to the defaults rather than rejecting the
//! request.
//!
//! # Example JSON Response
//!
//! ```json
//! {
//!   "items": [...],
//!   "page": 2,
//!   "pageSize": 10,
//!   "total": 42,
//!   "totalPages": 5
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Deserializes a query value leniently: empty or non-numeric strings become `None`.
fn deserialize_lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.and_then(|s| s.trim().parse::<i64>().ok()))
}

/// Query parameters for page-based pagination.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page_size: Option<i64>,
}

impl PageParams {
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn page_size(&self) -> i64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows to skip for the current page. Saturates instead of
    /// overflowing for absurd page numbers.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

/// A page of results together with its position in the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, params: &PageParams, total: i64) -> Self {
        let page_size = params.page_size();
        Self {
            items,
            page: params.page(),
            page_size,
            total,
            total_pages: (total + page_size - 1) / page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<i64>, page_size: Option<i64>) -> PageParams {
        PageParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let p = PageParams::default();
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(params(None, Some(0)).page_size(), 1);
        assert_eq!(params(None, Some(-3)).page_size(), 1);
        assert_eq!(params(None, Some(500)).page_size(), 100);
        assert_eq!(params(None, Some(25)).page_size(), 25);
    }

    #[test]
    fn test_page_below_one_becomes_one() {
        assert_eq!(params(Some(0), None).page(), 1);
        assert_eq!(params(Some(-7), None).page(), 1);
    }

    #[test]
    fn test_offset_from_page() {
        assert_eq!(params(Some(3), Some(20)).offset(), 40);
        assert_eq!(params(Some(2), None).offset(), 10);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let p: PageParams =
            serde_json::from_str(r#"{"page":"9223372036854775807","pageSize":"100"}"#).unwrap();
        assert_eq!(p.page(), i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
        assert_eq!(params(Some(i64::MAX), Some(1)).offset(), i64::MAX - 1);
    }

    #[test]
    fn test_lenient_query_parsing() {
        let p: PageParams = serde_json::from_str(r#"{"page":"abc","pageSize":""}"#).unwrap();
        assert_eq!(p.page(), 1);
        assert_eq!(p.page_size(), 10);

        let p: PageParams = serde_json::from_str(r#"{"page":"4","pageSize":"5"}"#).unwrap();
        assert_eq!(p.page(), 4);
        assert_eq!(p.page_size(), 5);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let p = params(Some(1), Some(10));
        assert_eq!(Paginated::new(Vec::<u8>::new(), &p, 0).total_pages, 0);
        assert_eq!(Paginated::new(Vec::<u8>::new(), &p, 10).total_pages, 1);
        assert_eq!(Paginated::new(Vec::<u8>::new(), &p, 11).total_pages, 2);
    }

    #[test]
    fn test_paginated_serializes_camel_case() {
        let page = Paginated::new(vec![1, 2], &params(Some(1), Some(2)), 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pageSize"], 2);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["items"], serde_json::json!([1, 2]));
    }
}
