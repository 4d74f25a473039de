use super::error::FilterError;
use super::parser::FilterSpec;

/// Ordered set of values a filter key accepts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueDomain {
    values: Vec<String>,
    case_insensitive: bool,
}

impl ValueDomain {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            case_insensitive: false,
        }
    }

    /// Accept values regardless of letter case (e.g. `Kubernetes` for `kubernetes`)
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    pub fn contains(&self, value: &str) -> bool {
        if self.case_insensitive {
            self.values.iter().any(|v| v.eq_ignore_ascii_case(value))
        } else {
            self.values.iter().any(|v| v == value)
        }
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl FilterSpec {
    /// Check every value recorded under `key` against `domain`.
    ///
    /// Keys that are never validated explicitly accept any value.
    pub fn validate_values(&self, key: &str, domain: &ValueDomain) -> Result<(), FilterError> {
        match self.values(key).into_iter().find(|v| !domain.contains(v)) {
            Some(value) => Err(FilterError::InvalidFilterValue {
                key: key.to_lowercase(),
                value: value.to_string(),
                accepted: domain.values().join(", "),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterKeys;

    fn statuses() -> ValueDomain {
        ValueDomain::new(["created", "running", "finished", "failed"])
    }

    #[test]
    fn test_every_domain_value_passes() {
        let keys = FilterKeys::new(&[], &["status"]);
        for status in statuses().values() {
            let spec = FilterSpec::parse(&[format!("status={status}")], &keys).unwrap();
            assert!(spec.validate_values("status", &statuses()).is_ok());
        }
    }

    #[test]
    fn test_value_outside_domain_is_rejected_with_accepted_list() {
        let keys = FilterKeys::new(&[], &["status"]);
        let spec = FilterSpec::parse(&["status=running", "status=exploded"], &keys).unwrap();

        let err = spec.validate_values("status", &statuses()).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidFilterValue {
                key: "status".to_string(),
                value: "exploded".to_string(),
                accepted: "created, running, finished, failed".to_string(),
            }
        );
        assert!(err.to_string().contains("'exploded'"));
    }

    #[test]
    fn test_unvalidated_keys_accept_anything() {
        let keys = FilterKeys::new(&["docker_img", "status"], &[]);
        let spec = FilterSpec::parse(&["docker_img=anything"], &keys).unwrap();
        assert!(spec.validate_values("status", &statuses()).is_ok());
    }

    #[test]
    fn test_case_insensitive_domain() {
        let keys = FilterKeys::new(&["compute_backend"], &[]);
        let spec = FilterSpec::parse(&["compute_backend=Kubernetes"], &keys).unwrap();
        let domain = ValueDomain::new(["kubernetes", "htcondor"]);

        assert!(spec.validate_values("compute_backend", &domain).is_err());
        assert!(
            spec.validate_values("compute_backend", &domain.case_insensitive())
                .is_ok()
        );
    }
}
