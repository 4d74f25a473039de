use super::error::{FilterError, PartialMatch};
use super::parser::FilterSpec;
use indexmap::IndexMap;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::debug;

/// A response item that local filters can inspect field by field
pub trait Record {
    /// The value of `field` as text, `None` when the record has no such field
    fn field(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl Record for Value {
    fn field(&self, field: &str) -> Option<Cow<'_, str>> {
        match self.get(field)? {
            Value::String(s) => Some(Cow::Borrowed(s)),
            Value::Null => None,
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}

/// Maps human-facing filter values to the identifiers records carry
/// (e.g. `kubernetes` to `Kubernetes`). Aliases are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct RemapTable {
    aliases: HashMap<String, String>,
}

impl RemapTable {
    pub fn new<I, A, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, T)>,
        A: AsRef<str>,
        T: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(alias, target)| (alias.as_ref().to_lowercase(), target.into()))
                .collect(),
        }
    }

    /// Internal identifier for `alias`; unknown aliases pass through unchanged
    pub fn resolve<'a>(&'a self, alias: &'a str) -> &'a str {
        self.aliases
            .get(&alias.to_lowercase())
            .map(String::as_str)
            .unwrap_or(alias)
    }
}

#[derive(Debug, Clone)]
struct LocalField {
    key: String,
    field: String,
    remap: Option<RemapTable>,
}

/// Single-valued filter keys a command applies to the response itself
#[derive(Debug, Clone, Default)]
pub struct LocalFilterPolicy {
    fields: Vec<LocalField>,
}

impl LocalFilterPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `key` against the record field of the same name
    pub fn field(self, key: &str) -> Self {
        self.push(key, key, None)
    }

    /// Compare `key` against a differently named record field
    pub fn renamed(self, key: &str, field: &str) -> Self {
        self.push(key, field, None)
    }

    /// Compare `key` against its field after translating the value through `remap`
    pub fn remapped(self, key: &str, remap: RemapTable) -> Self {
        self.push(key, key, Some(remap))
    }

    fn push(mut self, key: &str, field: &str, remap: Option<RemapTable>) -> Self {
        self.fields.push(LocalField {
            key: key.to_lowercase(),
            field: field.to_string(),
            remap,
        });
        self
    }

    /// Resolve the active predicates for one invocation.
    ///
    /// Keys the user left unset or set to an empty value are inactive.
    pub fn predicates(&self, spec: &FilterSpec) -> Result<Vec<Predicate>, FilterError> {
        let mut predicates = Vec::new();
        for local in &self.fields {
            let Some(value) = spec.get_single(&local.key)? else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            let expected = match &local.remap {
                Some(remap) => remap.resolve(value),
                None => value,
            };
            predicates.push(Predicate {
                field: local.field.clone(),
                expected: expected.to_string(),
            });
        }
        Ok(predicates)
    }
}

/// Field equality check for one local filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub field: String,
    pub expected: String,
}

impl Predicate {
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        record
            .field(&self.field)
            .is_some_and(|actual| actual == self.expected.as_str())
    }
}

/// Remove every record failing any predicate; returns how many were removed
pub fn retain_matching<R: Record>(
    records: &mut IndexMap<String, R>,
    predicates: &[Predicate],
) -> usize {
    if predicates.is_empty() {
        return 0;
    }

    let unwanted: Vec<String> = records
        .iter()
        .filter(|(_, record)| !predicates.iter().all(|p| p.matches(*record)))
        .map(|(id, _)| id.clone())
        .collect();

    for id in &unwanted {
        records.shift_remove(id);
    }

    debug!(removed = unwanted.len(), kept = records.len(), "applied local filters");
    unwanted.len()
}

/// Report requested values of `key` that none of the `present` names match
pub fn missing_values<'a, I>(key: &str, requested: &[String], present: I) -> Option<PartialMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<String> = requested
        .iter()
        .filter(|value| !present.contains(&value.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        None
    } else {
        Some(PartialMatch {
            key: key.to_string(),
            missing,
        })
    }
}
