use super::error::FilterError;
use super::parser::FilterSpec;
use std::collections::BTreeMap;
use tracing::debug;

/// Which filter keys a command forwards to the server, and how.
///
/// Keys named neither as list nor as search keys stay local.
#[derive(Debug, Clone, Default)]
pub struct QueryPolicy {
    list_keys: Vec<String>,
    search_keys: Vec<String>,
}

impl QueryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys sent as a repeated query parameter (`status=a&status=b`)
    pub fn list(mut self, keys: &[&str]) -> Self {
        self.list_keys = keys.iter().map(|k| k.to_lowercase()).collect();
        self
    }

    /// Keys sent inside the JSON `search` object
    pub fn search(mut self, keys: &[&str]) -> Self {
        self.search_keys = keys.iter().map(|k| k.to_lowercase()).collect();
        self
    }

    /// Split the remote-bound part of `spec` into a [`QueryPlan`]
    pub fn plan(&self, spec: &FilterSpec) -> Result<QueryPlan, FilterError> {
        let list: Vec<String> = self
            .list_keys
            .iter()
            .flat_map(|key| spec.values(key))
            .map(str::to_string)
            .collect();

        let mut search: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for key in &self.search_keys {
            let values = spec.values(key);
            if !values.is_empty() {
                search.insert(key.as_str(), values);
            }
        }

        let search = if search.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&search)
                    .map_err(|e| FilterError::SearchEncoding(e.to_string()))?,
            )
        };

        let plan = QueryPlan { list, search };
        debug!(list = ?plan.list, search = ?plan.search, "query plan");
        Ok(plan)
    }
}

/// The remote-bound subset of a [`FilterSpec`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPlan {
    list: Vec<String>,
    search: Option<String>,
}

impl QueryPlan {
    /// Values for the repeated query parameter, in input order
    pub fn list(&self) -> &[String] {
        &self.list
    }

    /// JSON search object, absent when no search filter carries a value
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}
