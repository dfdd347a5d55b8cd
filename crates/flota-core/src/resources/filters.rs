use std::collections::BTreeMap;

use serde_json::Value;

/// Well-known filter name for free-text search.
pub const SEARCH: &str = "search";

/// Well-known filter name for the page-size cap.
pub const LIMIT: &str = "limit";

/// Named filters for a list read.
///
/// Besides `search` and `limit`, every entry is an equality filter on the
/// column of the same name. Entries are kept sorted, so two filter sets with
/// the same content compare and serialize identically however they were built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    entries: BTreeMap<String, String>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search. Blank terms are dropped.
    pub fn search(mut self, term: &str) -> Self {
        let term = term.trim();
        if !term.is_empty() {
            self.entries.insert(SEARCH.to_string(), term.to_string());
        }
        self
    }

    /// Page-size cap. Zero means "no cap" and is dropped.
    pub fn limit(mut self, n: u32) -> Self {
        if n != 0 {
            self.entries.insert(LIMIT.to_string(), n.to_string());
        }
        self
    }

    /// Equality filter on `field`. `search` and `limit` given this way get
    /// the same normalization as their dedicated builders; a non-numeric
    /// limit is dropped.
    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match field {
            SEARCH => self.search(&value),
            LIMIT => match value.trim().parse() {
                Ok(n) => self.limit(n),
                Err(_) => self,
            },
            _ => {
                self.entries.insert(field.to_string(), value);
                self
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.get(LIMIT).and_then(|v| v.parse().ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable JSON rendering used as the filter half of a cache key.
    pub fn canonical(&self) -> String {
        let map: serde_json::Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        Value::Object(map).to_string()
    }
}
