use super::{COMPUTE_BACKENDS, run_statuses};
use crate::api::models::{JobLogItem, WorkflowLogs};
use crate::api::{ApiClient, LogsQuery};
use crate::display::{LEADING_MARK, MessageKind, display_json, display_message, format_message, status_color};
use crate::filter::{
    FilterError, FilterKeys, FilterSpec, LocalFilterPolicy, PartialMatch, QueryPolicy, RemapTable,
    ValueDomain, missing_values, retain_matching,
};
use anyhow::Context;
use colored::Colorize;
use std::fmt::Write;
use tracing::debug;

pub const SINGLE_FILTERS: &[&str] = &["compute_backend", "docker_img", "status"];
pub const MULTI_FILTERS: &[&str] = &["step"];

#[derive(Debug, Clone, Default)]
pub struct LogsOptions {
    pub workflow: String,
    pub filters: Vec<String>,
    pub json: bool,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Parse `--filter` tokens for `logs` and check their values
pub fn parse_filters<S: AsRef<str>>(tokens: &[S]) -> Result<FilterSpec, FilterError> {
    let spec = FilterSpec::parse(tokens, &FilterKeys::new(SINGLE_FILTERS, MULTI_FILTERS))?;
    spec.validate_values("status", &ValueDomain::new(run_statuses(true)))?;
    spec.validate_values(
        "compute_backend",
        &ValueDomain::new(COMPUTE_BACKENDS.iter().map(|(alias, _)| *alias)).case_insensitive(),
    )?;
    Ok(spec)
}

fn query_policy() -> QueryPolicy {
    QueryPolicy::new().list(MULTI_FILTERS)
}

fn local_policy() -> LocalFilterPolicy {
    LocalFilterPolicy::new()
        .field("status")
        .field("docker_img")
        .remapped("compute_backend", RemapTable::new(COMPUTE_BACKENDS))
}

/// Apply the local job filters to `logs` in place.
///
/// Requested steps absent from the server response come back as a warning,
/// even when the local filters go on to remove every job.
pub fn filter_job_logs(
    logs: &mut WorkflowLogs,
    spec: &FilterSpec,
) -> Result<Option<PartialMatch>, FilterError> {
    let missing_steps = missing_values(
        "step",
        spec.get_multi("step")?,
        logs.job_logs.values().map(|job| job.job_name.as_str()),
    );

    let predicates = local_policy().predicates(spec)?;
    let removed = retain_matching(&mut logs.job_logs, &predicates);
    debug!(removed, remaining = logs.job_logs.len(), "filtered job logs");

    Ok(missing_steps)
}

/// Fail with [`FilterError::EmptyResult`] when local filters left no job.
///
/// Step filters alone never trigger this; unknown steps are only a warning.
pub fn ensure_jobs_left(logs: &WorkflowLogs, spec: &FilterSpec) -> Result<(), FilterError> {
    if logs.job_logs.is_empty() && !local_policy().predicates(spec)?.is_empty() {
        return Err(FilterError::EmptyResult("job logs".to_string()));
    }
    Ok(())
}

pub fn missing_steps_message(missing: &PartialMatch) -> String {
    format!(
        "The logs of step(s) {} were not found, check for spelling mistakes in the step names",
        missing.missing.join(",")
    )
}

pub fn run(client: &ApiClient, options: &LogsOptions) -> anyhow::Result<()> {
    let spec = parse_filters(&options.filters)?;
    let plan = query_policy().plan(&spec)?;

    let response = client.logs(
        &options.workflow,
        &LogsQuery {
            steps: plan.list().to_vec(),
            page: options.page,
            size: options.size,
        },
    )?;
    let mut logs = response
        .workflow_logs()
        .with_context(|| format!("Failed to decode logs of workflow {}", options.workflow))?;

    let missing_steps = filter_job_logs(&mut logs, &spec)?;
    if let Some(missing) = &missing_steps {
        display_message(&missing_steps_message(missing), MessageKind::Warning, false);
    }
    ensure_jobs_left(&logs, &spec)?;

    if options.json {
        display_json(&logs)?;
    } else {
        print!("{}", format_logs(&logs));
    }
    Ok(())
}

fn section_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", format!("{LEADING_MARK} {title}").bold().yellow());
}

/// Human-readable rendering of workflow, engine and job logs
pub fn format_logs(logs: &WorkflowLogs) -> String {
    let mut out = String::new();

    if let Some(workflow_logs) = logs.workflow_logs.as_deref().filter(|s| !s.is_empty()) {
        section_header(&mut out, "Workflow engine logs");
        let _ = writeln!(out, "{workflow_logs}");
    }

    if let Some(engine) = logs.engine_specific.as_deref().filter(|s| !s.is_empty()) {
        section_header(&mut out, "Engine internal logs");
        let _ = writeln!(out, "{engine}");
    }

    if !logs.job_logs.is_empty() {
        section_header(&mut out, "Job logs");
        for job in logs.job_logs.values() {
            format_job(&mut out, job);
        }
    }

    out
}

fn format_job(out: &mut String, job: &JobLogItem) {
    let color = status_color(&job.status);
    let _ = writeln!(
        out,
        "{}",
        format!("{LEADING_MARK} Step: {}", job.job_name).bold().color(color)
    );

    let fields = [
        ("Workflow ID", job.workflow_uuid.as_str()),
        ("Compute backend", job.compute_backend.as_str()),
        ("Job ID", job.backend_job_id.as_str()),
        ("Docker image", job.docker_img.as_str()),
        ("Command", job.cmd.as_str()),
        ("Status", job.status.as_str()),
        ("Started", job.started_at.as_deref().unwrap_or("")),
        ("Finished", job.finished_at.as_deref().unwrap_or("")),
    ];
    for (title, value) in fields.iter().filter(|(_, value)| !value.is_empty()) {
        let _ = writeln!(out, "{} {value}", format!("{LEADING_MARK} {title}:").color(color));
    }

    if job.logs.is_empty() {
        let _ = writeln!(
            out,
            "{}",
            format_message(
                &format!("Step {} emitted no logs.", job.job_name),
                MessageKind::Info,
                false
            )
        );
    } else {
        let _ = writeln!(out, "{}\n{}", format!("{LEADING_MARK} Logs:").color(color), job.logs);
    }
}
