use super::error::FilterError;
use std::collections::HashMap;
use tracing::debug;

/// Whether a filter key holds one value or accumulates many
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Holds at most one effective value; a repeated key overwrites (last wins)
    Single,
    /// Accumulates every occurrence in input order
    Multi,
}

impl Arity {
    fn name(self) -> &'static str {
        match self {
            Arity::Single => "single",
            Arity::Multi => "multi",
        }
    }
}

/// The universe of filter keys a command accepts, each tagged with its arity.
///
/// Every command builds its own value and passes it to [`FilterSpec::parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterKeys {
    single: Vec<String>,
    multi: Vec<String>,
}

impl FilterKeys {
    pub fn new(single: &[&str], multi: &[&str]) -> Self {
        Self {
            single: single.iter().map(|k| k.to_lowercase()).collect(),
            multi: multi.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Arity of a (case-insensitive) key, or `None` if the command does not know it
    pub fn arity(&self, key: &str) -> Option<Arity> {
        let key = key.to_lowercase();
        if self.single.contains(&key) {
            Some(Arity::Single)
        } else if self.multi.contains(&key) {
            Some(Arity::Multi)
        } else {
            None
        }
    }

    fn available(&self) -> String {
        self.single
            .iter()
            .chain(&self.multi)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Split a `key=value` token on its first `=`.
///
/// The value may itself contain `=`; `None` means the token has no `=` at all.
pub fn split_key_value(token: &str) -> Option<(&str, &str)> {
    token.split_once('=')
}

/// Parsed filters for one command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    keys: FilterKeys,
    single: HashMap<String, String>,
    multi: HashMap<String, Vec<String>>,
}

impl FilterSpec {
    /// Parse raw `--filter` tokens against the keys a command accepts.
    ///
    /// Keys are matched case-insensitively and stored lowercase. A repeated
    /// single-valued key keeps the last value given.
    pub fn parse<S: AsRef<str>>(tokens: &[S], keys: &FilterKeys) -> Result<Self, FilterError> {
        let mut spec = FilterSpec {
            keys: keys.clone(),
            ..Default::default()
        };

        for token in tokens {
            let token = token.as_ref();
            let (name, value) = split_key_value(token)
                .ok_or_else(|| FilterError::MalformedFilter(token.to_string()))?;
            let key = name.to_lowercase();

            match keys.arity(&key) {
                Some(Arity::Single) => {
                    if let Some(previous) = spec.single.insert(key.clone(), value.to_string()) {
                        debug!(filter = %key, %previous, value, "single-valued filter overwritten");
                    }
                }
                Some(Arity::Multi) => {
                    spec.multi.entry(key).or_default().push(value.to_string());
                }
                None => {
                    return Err(FilterError::UnknownFilterKey {
                        key,
                        available: keys.available(),
                    });
                }
            }
        }

        debug!(single = ?spec.single, multi = ?spec.multi, "parsed filters");
        Ok(spec)
    }

    /// Check if no filter was given
    pub fn is_empty(&self) -> bool {
        self.single.is_empty() && self.multi.values().all(Vec::is_empty)
    }

    /// Value of a single-valued key, `None` when the user did not set it
    pub fn get_single(&self, key: &str) -> Result<Option<&str>, FilterError> {
        let key = self.expect_arity(key, Arity::Single)?;
        Ok(self.single.get(&key).map(String::as_str))
    }

    /// All values of a multi-valued key in input order, empty when unset
    pub fn get_multi(&self, key: &str) -> Result<&[String], FilterError> {
        let key = self.expect_arity(key, Arity::Multi)?;
        Ok(self.multi.get(&key).map(Vec::as_slice).unwrap_or_default())
    }

    /// Every value recorded under `key`, whatever its arity
    pub fn values(&self, key: &str) -> Vec<&str> {
        let key = key.to_lowercase();
        match self.keys.arity(&key) {
            Some(Arity::Single) => self.single.get(&key).map(String::as_str).into_iter().collect(),
            Some(Arity::Multi) => self
                .multi
                .get(&key)
                .map(|values| values.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    fn expect_arity(&self, key: &str, expected: Arity) -> Result<String, FilterError> {
        let key = key.to_lowercase();
        if self.keys.arity(&key) == Some(expected) {
            Ok(key)
        } else {
            Err(FilterError::WrongArity {
                key,
                expected: expected.name(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logs_keys() -> FilterKeys {
        FilterKeys::new(&["compute_backend", "docker_img", "status"], &["step"])
    }

    #[test]
    fn test_parse_single_and_multi_values() {
        let spec = FilterSpec::parse(
            &["status=running", "step=fit", "step=plot", "step=fit"],
            &logs_keys(),
        )
        .unwrap();

        assert_eq!(spec.get_single("status").unwrap(), Some("running"));
        assert_eq!(spec.get_single("docker_img").unwrap(), None);
        assert_eq!(spec.get_multi("step").unwrap(), ["fit", "plot", "fit"]);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let spec = FilterSpec::parse(&["STATUS=failed", "Step=a"], &logs_keys()).unwrap();
        assert_eq!(spec.get_single("status").unwrap(), Some("failed"));
        assert_eq!(spec.get_single("Status").unwrap(), Some("failed"));
        assert_eq!(spec.get_multi("step").unwrap(), ["a"]);
    }

    #[test]
    fn test_value_keeps_everything_after_first_equals() {
        let spec = FilterSpec::parse(&["docker_img=repo/img:tag=x"], &logs_keys()).unwrap();
        assert_eq!(spec.get_single("docker_img").unwrap(), Some("repo/img:tag=x"));
    }

    #[test]
    fn test_repeated_single_key_last_value_wins() {
        let spec =
            FilterSpec::parse(&["status=running", "status=failed"], &logs_keys()).unwrap();
        assert_eq!(spec.get_single("status").unwrap(), Some("failed"));
        assert_eq!(spec.values("status"), vec!["failed"]);
    }

    #[test]
    fn test_missing_equals_is_malformed() {
        let err = FilterSpec::parse(&["status=running", "step"], &logs_keys()).unwrap_err();
        assert_eq!(err, FilterError::MalformedFilter("step".to_string()));
    }

    #[test]
    fn test_unknown_key_rejected_at_any_position() {
        let valid = ["status=running", "step=a", "docker_img=x"];
        for position in 0..=valid.len() {
            let mut tokens: Vec<&str> = valid.to_vec();
            tokens.insert(position, "Colour=blue");

            let err = FilterSpec::parse(&tokens, &logs_keys()).unwrap_err();
            match err {
                FilterError::UnknownFilterKey { key, available } => {
                    assert_eq!(key, "colour");
                    assert_eq!(available, "compute_backend, docker_img, status, step");
                }
                other => panic!("unexpected error at position {position}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parse_is_deterministic() {
        let tokens = ["step=b", "status=failed", "step=a", "compute_backend=slurm"];
        let first = FilterSpec::parse(&tokens, &logs_keys()).unwrap();
        let second = FilterSpec::parse(&tokens, &logs_keys()).unwrap();
        assert_eq!(first, second);

        let bad = ["step=b", "nope=1"];
        assert_eq!(
            FilterSpec::parse(&bad, &logs_keys()).unwrap_err(),
            FilterSpec::parse(&bad, &logs_keys()).unwrap_err()
        );
    }

    #[test]
    fn test_getters_reject_wrong_arity() {
        let spec = FilterSpec::parse(&["step=a"], &logs_keys()).unwrap();
        assert!(matches!(
            spec.get_single("step"),
            Err(FilterError::WrongArity { expected: "single", .. })
        ));
        assert!(matches!(
            spec.get_multi("status"),
            Err(FilterError::WrongArity { expected: "multi", .. })
        ));
        assert!(spec.get_multi("unknown").is_err());
    }

    #[test]
    fn test_empty_input_gives_empty_spec() {
        let spec = FilterSpec::parse::<&str>(&[], &logs_keys()).unwrap();
        assert!(spec.is_empty());
        assert!(spec.get_multi("step").unwrap().is_empty());
    }
}
