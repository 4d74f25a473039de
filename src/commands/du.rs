use super::{FILES_BLACKLIST, has_any_prefix};
use crate::api::ApiClient;
use crate::api::models::{DiskUsageRequest, DiskUsageResponse};
use crate::display::Table;
use crate::filter::{FilterError, FilterKeys, FilterSpec, QueryPolicy};

pub const MULTI_FILTERS: &[&str] = &["name", "size"];

#[derive(Debug, Clone, Default)]
pub struct DuOptions {
    pub workflow: String,
    pub filters: Vec<String>,
    pub summarize: bool,
    pub human_readable: bool,
}

/// Encode `--filter` tokens as the server-side search of `disk_usage`
pub fn search_filter<S: AsRef<str>>(tokens: &[S]) -> Result<Option<String>, FilterError> {
    let spec = FilterSpec::parse(tokens, &FilterKeys::new(&[], MULTI_FILTERS))?;
    let plan = QueryPolicy::new().search(MULTI_FILTERS).plan(&spec)?;
    Ok(plan.search().map(str::to_string))
}

/// Tabulate workspace entries, hiding version-control internals.
///
/// Fails with [`FilterError::EmptyResult`] when nothing is left to show.
pub fn build_table(response: &DiskUsageResponse, human_readable: bool) -> Result<Table, FilterError> {
    let rows: Vec<Vec<String>> = response
        .disk_usage_info
        .iter()
        .filter(|entry| !has_any_prefix(&entry.name, FILES_BLACKLIST))
        .map(|entry| {
            let size = if human_readable {
                entry.size.human_readable.clone()
            } else {
                entry.size.raw.to_string()
            };
            vec![size, format!(".{}", entry.name)]
        })
        .collect();

    if rows.is_empty() {
        return Err(FilterError::EmptyResult("files".to_string()));
    }
    Ok(Table::new(vec!["SIZE".to_string(), "NAME".to_string()], rows))
}

pub fn run(client: &ApiClient, options: &DuOptions) -> anyhow::Result<()> {
    let search = search_filter(&options.filters)?;
    let response = client.disk_usage(
        &options.workflow,
        &DiskUsageRequest {
            summarize: options.summarize,
            search,
        },
    )?;

    println!("{}", build_table(&response, options.human_readable)?.render());
    Ok(())
}
