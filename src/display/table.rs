use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table as ComfyTable};
use serde_json::{Map, Value};

/// Header plus positionally aligned rows, built right before rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// No rows, or no columns left to show them in
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.header.is_empty()
    }

    /// Draw the table with rounded borders
    pub fn render(&self) -> String {
        let mut table = create_styled_table(&self.header);
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new));
        }
        table.to_string()
    }

    /// One JSON object per row, keyed by lowercase column name
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.rows
                .iter()
                .map(|row| {
                    let object: Map<String, Value> = self
                        .header
                        .iter()
                        .zip(row)
                        .map(|(column, cell)| (column.to_lowercase(), Value::String(cell.clone())))
                        .collect();
                    Value::Object(object)
                })
                .collect(),
        )
    }
}

/// Create a table with the client's border style and the given header
pub fn create_styled_table<S: AsRef<str>>(header: &[S]) -> ComfyTable {
    let mut table = ComfyTable::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.iter().map(|h| Cell::new(h.as_ref())));
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Table {
        Table::new(
            vec!["NAME".to_string(), "STATUS".to_string()],
            vec![
                vec!["alpha".to_string(), "finished".to_string()],
                vec!["beta".to_string(), "failed".to_string()],
            ],
        )
    }

    #[test]
    fn test_render_contains_header_and_cells() {
        let rendered = sample().render();
        assert!(rendered.contains("NAME"));
        assert!(rendered.contains("beta"));
        assert!(rendered.contains("failed"));
    }

    #[test]
    fn test_table_without_columns_is_empty() {
        let table = Table::new(vec![], vec![vec![], vec![]]);
        assert!(table.is_empty());
        assert!(!sample().is_empty());
        assert!(Table::new(vec!["NAME".to_string()], vec![]).is_empty());
    }

    #[test]
    fn test_to_json_uses_lowercase_keys() {
        assert_eq!(
            sample().to_json(),
            json!([
                {"name": "alpha", "status": "finished"},
                {"name": "beta", "status": "failed"}
            ])
        );
    }
}
