use super::run_statuses;
use crate::api::models::{Workflow, WorkflowsResponse};
use crate::api::{ApiClient, WorkflowsQuery};
use crate::display::{Table, display_json};
use crate::filter::{FilterError, FilterKeys, FilterSpec, FormatRules, QueryPolicy, ValueDomain};
use chrono::{NaiveDateTime, Utc};

pub const MULTI_FILTERS: &[&str] = &["name", "status"];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Restrict the listing to runs of one workflow
    pub workflow: Option<String>,
    pub filters: Vec<String>,
    pub format: Vec<String>,
    pub json: bool,
    pub include_duration: bool,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub fn parse_filters<S: AsRef<str>>(tokens: &[S]) -> Result<FilterSpec, FilterError> {
    let spec = FilterSpec::parse(tokens, &FilterKeys::new(&[], MULTI_FILTERS))?;
    spec.validate_values("status", &ValueDomain::new(run_statuses(true)))?;
    Ok(spec)
}

fn query_policy() -> QueryPolicy {
    QueryPolicy::new().list(&["status"]).search(&["name"])
}

/// Build the `GET /api/workflows` query for a filter spec
pub fn build_query(options: &ListOptions, spec: &FilterSpec) -> Result<WorkflowsQuery, FilterError> {
    let plan = query_policy().plan(spec)?;
    Ok(WorkflowsQuery {
        workflow: options.workflow.clone(),
        status: plan.list().to_vec(),
        search: plan.search().map(str::to_string),
        page: options.page,
        size: options.size,
    })
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// Run time in seconds; running workflows are measured up to `now`
pub fn workflow_duration(workflow: &Workflow, now: NaiveDateTime) -> Option<i64> {
    let started = parse_timestamp(workflow.progress.run_started_at.as_deref()?)?;
    let finished = match workflow.progress.run_finished_at.as_deref() {
        Some(finished) => parse_timestamp(finished)?,
        None if workflow.status == "running" => now,
        None => return None,
    };
    // server and local clocks may disagree for running workflows
    Some((finished - started).num_seconds().max(0))
}

pub fn format_duration(seconds: i64) -> String {
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    match (hours, minutes) {
        (0, 0) => format!("{seconds}s"),
        (0, _) => format!("{minutes}m {seconds:02}s"),
        _ => format!("{hours}h {minutes:02}m {seconds:02}s"),
    }
}

fn or_dash(value: Option<&str>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Tabulate workflow runs, one row per run
pub fn build_table(response: &WorkflowsResponse, include_duration: bool, now: NaiveDateTime) -> Table {
    let mut header: Vec<String> = ["NAME", "RUN_NUMBER", "CREATED", "STARTED", "ENDED", "STATUS"]
        .into_iter()
        .map(String::from)
        .collect();
    if include_duration {
        header.push("DURATION".to_string());
    }

    let rows = response
        .items
        .iter()
        .map(|workflow| {
            let (name, run_number) = workflow.name_and_run_number();
            let mut row = vec![
                name.to_string(),
                run_number.to_string(),
                workflow.created.clone(),
                or_dash(workflow.progress.run_started_at.as_deref()),
                or_dash(workflow.progress.run_finished_at.as_deref()),
                workflow.status.clone(),
            ];
            if include_duration {
                row.push(
                    workflow_duration(workflow, now)
                        .map(format_duration)
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            row
        })
        .collect();

    Table::new(header, rows)
}

/// Reject a table that filters or format rules emptied.
///
/// An unfiltered empty listing is shown as is.
pub fn ensure_not_empty(
    table: Table,
    spec: &FilterSpec,
    rules: &FormatRules,
) -> Result<Table, FilterError> {
    if table.is_empty() && (!spec.is_empty() || !rules.is_empty()) {
        return Err(FilterError::EmptyResult("workflows".to_string()));
    }
    Ok(table)
}

pub fn run(client: &ApiClient, options: &ListOptions) -> anyhow::Result<()> {
    let spec = parse_filters(&options.filters)?;
    let rules = FormatRules::parse(&options.format);
    let query = build_query(options, &spec)?;

    let response = client.workflows(&query)?;
    let table = rules.project(build_table(
        &response,
        options.include_duration,
        Utc::now().naive_utc(),
    ));

    let table = ensure_not_empty(table, &spec, &rules)?;

    if options.json {
        display_json(&table.to_json())?;
    } else {
        println!("{}", table.render());
    }
    Ok(())
}
