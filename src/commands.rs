pub mod du;
pub mod list;
pub mod logs;
pub mod ping;
pub mod secrets_add;

/// Compute backend names users type, mapped to the names job logs report
pub const COMPUTE_BACKENDS: [(&str, &str); 3] = [
    ("kubernetes", "Kubernetes"),
    ("htcondor", "HTCondor"),
    ("slurm", "Slurm"),
];

/// Workspace paths hidden from disk usage listings
pub const FILES_BLACKLIST: &[&str] = &[".git/", "/.git/"];

/// Statuses a workflow run can be in
pub fn run_statuses(include_deleted: bool) -> Vec<&'static str> {
    let mut statuses = vec![
        "created", "running", "finished", "failed", "stopped", "queued", "pending",
    ];
    if include_deleted {
        statuses.push("deleted");
    }
    statuses
}

pub(crate) fn has_any_prefix(s: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| s.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_statuses() {
        assert_eq!(run_statuses(false).len(), 7);
        assert_eq!(run_statuses(true).last(), Some(&"deleted"));
    }

    #[test]
    fn test_has_any_prefix() {
        assert!(has_any_prefix(".git/config", FILES_BLACKLIST));
        assert!(has_any_prefix("/.git/HEAD", FILES_BLACKLIST));
        assert!(!has_any_prefix("/data/.git", FILES_BLACKLIST));
    }
}
