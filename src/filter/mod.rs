//! Filter parsing, partitioning and evaluation
//!
//! Commands accept repeated `--filter key=value` options. Each command declares
//! which keys it knows and whether a key holds one value or many; this module
//! turns the raw tokens into a [`FilterSpec`], splits it into what the server
//! filters and what the client filters, and applies the client-side part.
//!
//! # Syntax
//!
//! ```text
//! key=value            Filter on key (case-insensitive) equal to value
//! key=a key=b          Multi-valued keys accumulate, single-valued keys keep b
//! ```
//!
//! # Pipeline
//!
//! ```text
//! tokens ─ FilterSpec::parse ─ validate_values ─ QueryPolicy::plan ─▶ server
//!                                         └─ LocalFilterPolicy ─ retain_matching ─▶ display
//! ```
//!
//! Independently, `--format col=value` rules ([`FormatRules`]) select the
//! columns and rows of a table right before it is rendered.

pub mod error;
pub mod format;
pub mod local;
pub mod parser;
pub mod query;
pub mod validate;

pub use error::{FilterError, PartialMatch};
pub use format::FormatRules;
pub use local::{LocalFilterPolicy, Predicate, Record, RemapTable, missing_values, retain_matching};
pub use parser::{Arity, FilterKeys, FilterSpec, split_key_value};
pub use query::{QueryPlan, QueryPolicy};
pub use validate::ValueDomain;
