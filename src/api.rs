mod client;
mod error;
pub mod models;

pub use client::{ApiClient, ClientOptions, LogsQuery, WorkflowsQuery};
pub use error::ApiError;
