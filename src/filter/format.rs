use super::parser::split_key_value;
use crate::display::Table;
use indexmap::IndexMap;

/// Column selection rules from `--format col=value,...`.
///
/// An empty value keeps the column without filtering rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatRules {
    columns: IndexMap<String, String>,
}

impl FormatRules {
    /// Parse rule tokens; a token without `=` keeps that column unfiltered
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let columns = tokens
            .iter()
            .map(|token| {
                let token = token.as_ref();
                let (column, value) = split_key_value(token).unwrap_or((token, ""));
                (column.to_lowercase(), value.to_string())
            })
            .collect();
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn rule(&self, column: &str) -> Option<&str> {
        self.columns.get(&column.to_lowercase()).map(String::as_str)
    }

    /// Restrict `table` to the columns named by the rules, dropping rows whose
    /// cell differs from a non-empty rule value.
    ///
    /// Builds a new header and row set by selection, so the result stays
    /// positionally aligned and projecting twice changes nothing further.
    pub fn project(&self, table: Table) -> Table {
        if self.is_empty() {
            return table;
        }

        let mut kept_columns = Vec::new();
        let mut row_filters = Vec::new();
        for (idx, column) in table.header.iter().enumerate() {
            if let Some(expected) = self.rule(column) {
                kept_columns.push(idx);
                if !expected.is_empty() {
                    row_filters.push((idx, expected));
                }
            }
        }

        let header = kept_columns
            .iter()
            .map(|&idx| table.header[idx].clone())
            .collect();

        let rows = table
            .rows
            .iter()
            .filter(|row| {
                row_filters
                    .iter()
                    .all(|&(idx, expected)| row.get(idx).is_some_and(|cell| cell == expected))
            })
            .map(|row| {
                kept_columns
                    .iter()
                    .filter_map(|&idx| row.get(idx).cloned())
                    .collect()
            })
            .collect();

        Table { header, rows }
    }
}
