//! Query string access that keeps repeated keys (`?tags=a&tags=b`).

use std::str::FromStr;

use url::form_urlencoded;

use crate::errors::{ApiError, ApiResult};

#[derive(Debug, Clone, Default)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Parses the first value of `key`; an empty value counts as absent.
    pub fn parsed<T: FromStr>(&self, key: &str) -> ApiResult<Option<T>> {
        match self.get(key).filter(|value| !value.is_empty()) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|_| ApiError::validation(format!("Invalid value for {key}: {value:?}."))),
            None => Ok(None),
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        matches!(self.get(key), Some("1" | "true" | "True"))
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
