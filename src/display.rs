mod message;
mod table;

pub use message::{LEADING_MARK, MessageKind, display_message, format_message, status_color};
pub use table::{Table, create_styled_table};

use serde::Serialize;

/// Pretty-print any serializable value as JSON on stdout
pub fn display_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
