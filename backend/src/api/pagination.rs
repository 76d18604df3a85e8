//! Page-number pagination with a `limit` override.
//!
//! Responses use the `{"count", "next", "previous", "results"}` envelope;
//! `next`/`previous` keep every other query parameter of the request.

use axum::http::Uri;
use serde::Serialize;
use url::form_urlencoded;

use crate::{
    errors::{ApiError, ApiResult},
    utils::query::QueryPairs,
};

pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl PageParams {
    pub fn from_query(query: &QueryPairs, default_limit: u32) -> ApiResult<Self> {
        let page = query.parsed::<u32>("page")?.unwrap_or(1);
        let limit = query
            .parsed::<u32>("limit")?
            .unwrap_or(default_limit)
            .clamp(1, MAX_PAGE_SIZE);
        if page == 0 {
            return Err(ApiError::NotFound("Invalid page.".to_string()));
        }
        Ok(Self { page, limit })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    /// Pages past the last one are not found; the first page always exists.
    pub fn ensure_in_range(&self, count: i64) -> ApiResult<()> {
        if self.page > 1 && self.offset() >= count {
            return Err(ApiError::NotFound("Invalid page.".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, params: &PageParams, uri: &Uri) -> Self {
        let has_next = params.offset() + params.limit() < count;
        Self {
            count,
            next: has_next.then(|| page_link(uri, params.page + 1)),
            previous: (params.page > 1).then(|| page_link(uri, params.page - 1)),
            results,
        }
    }
}

fn page_link(uri: &Uri, page: u32) -> String {
    let query = QueryPairs::parse(uri.query());
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in query.pairs().filter(|(key, _)| *key != "page") {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("page", &page.to_string());

    format!("{}?{}", uri.path(), serializer.finish())
}
