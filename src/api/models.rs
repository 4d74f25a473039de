use crate::filter::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;

/// Treat a JSON `null` string as empty, the way the server's optional job fields arrive
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error payload returned alongside non-success statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// `GET /api/you`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PingResponse {
    pub email: String,
    pub reana_server_version: String,
}

/// `GET /api/workflows`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowsResponse {
    #[serde(default)]
    pub items: Vec<Workflow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    /// `<name>.<run number>`
    pub name: String,
    pub status: String,
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub progress: WorkflowProgress,
}

impl Workflow {
    /// Split `name.run_number` on its first dot
    pub fn name_and_run_number(&self) -> (&str, &str) {
        self.name.split_once('.').unwrap_or((self.name.as_str(), ""))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowProgress {
    #[serde(default)]
    pub run_started_at: Option<String>,
    #[serde(default)]
    pub run_finished_at: Option<String>,
}

/// `GET /api/workflows/{workflow}/logs`
#[derive(Debug, Clone, Deserialize)]
pub struct LogsResponse {
    /// JSON document holding [`WorkflowLogs`]
    pub logs: String,
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub workflow_name: String,
}

impl LogsResponse {
    pub fn workflow_logs(&self) -> Result<WorkflowLogs, serde_json::Error> {
        serde_json::from_str(&self.logs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowLogs {
    #[serde(default)]
    pub workflow_logs: Option<String>,
    #[serde(default)]
    pub job_logs: IndexMap<String, JobLogItem>,
    #[serde(default)]
    pub engine_specific: Option<String>,
}

/// Log information of one job, keyed by job id in [`WorkflowLogs::job_logs`]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobLogItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub workflow_uuid: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub job_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub compute_backend: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub backend_job_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub docker_img: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cmd: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logs: String,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

impl Record for JobLogItem {
    fn field(&self, field: &str) -> Option<Cow<'_, str>> {
        let value = match field {
            "workflow_uuid" => &self.workflow_uuid,
            "job_name" => &self.job_name,
            "compute_backend" => &self.compute_backend,
            "backend_job_id" => &self.backend_job_id,
            "docker_img" => &self.docker_img,
            "cmd" => &self.cmd,
            "status" => &self.status,
            "logs" => &self.logs,
            "started_at" => self.started_at.as_ref()?,
            "finished_at" => self.finished_at.as_ref()?,
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// Body of `GET /api/workflows/{workflow}/disk_usage`
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DiskUsageRequest {
    pub summarize: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiskUsageResponse {
    #[serde(default)]
    pub disk_usage_info: Vec<DiskUsageEntry>,
    #[serde(default)]
    pub workflow_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskUsageEntry {
    pub name: String,
    pub size: DiskSize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskSize {
    pub raw: u64,
    pub human_readable: String,
}

/// One secret in the body of `POST /api/secrets/`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SecretPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SecretKind,
    /// Base64-encoded content
    pub value: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SecretKind {
    Env,
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_log_nulls_become_empty() {
        let item: JobLogItem = serde_json::from_str(
            r#"{"job_name": "fit", "backend_job_id": null, "status": "finished", "started_at": null}"#,
        )
        .unwrap();

        assert_eq!(item.backend_job_id, "");
        assert_eq!(item.started_at, None);
        assert_eq!(item.field("status").as_deref(), Some("finished"));
        assert_eq!(item.field("started_at"), None);
        assert_eq!(item.field("nonexistent"), None);
    }

    #[test]
    fn test_workflow_logs_preserve_job_order() {
        let response = LogsResponse {
            logs: r#"{"workflow_logs": "engine", "job_logs": {"z": {"job_name": "last"}, "a": {"job_name": "first"}}}"#.to_string(),
            workflow_id: String::new(),
            workflow_name: String::new(),
        };

        let logs = response.workflow_logs().unwrap();
        assert_eq!(logs.job_logs.keys().collect::<Vec<_>>(), ["z", "a"]);
        assert_eq!(logs.engine_specific, None);
    }

    #[test]
    fn test_name_and_run_number() {
        let workflow = Workflow {
            name: "analysis.12.3".to_string(),
            ..Default::default()
        };
        assert_eq!(workflow.name_and_run_number(), ("analysis", "12.3"));

        let workflow = Workflow {
            name: "plain".to_string(),
            ..Default::default()
        };
        assert_eq!(workflow.name_and_run_number(), ("plain", ""));
    }

    #[test]
    fn test_disk_usage_request_omits_absent_search() {
        let body = DiskUsageRequest {
            summarize: true,
            search: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"summarize":true}"#);
    }
}
